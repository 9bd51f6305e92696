use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::product::models::Product;
use crate::inbound::http::router::AppState;

pub async fn get_product(
    State(state): State<AppState>,
    Query(params): Query<GetProductParams>,
) -> Result<ApiSuccess<ProductData>, ApiError> {
    state
        .product_service
        .get_product(params.name.as_deref().unwrap_or_default())
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::OK, product.into()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetProductParams {
    name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductData {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Product> for ProductData {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}
