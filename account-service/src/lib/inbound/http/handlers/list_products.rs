use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::get_product::ProductData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::product::models::Page;
use crate::inbound::http::router::AppState;

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListProductsParams>,
) -> Result<ApiSuccess<Vec<ProductData>>, ApiError> {
    let page = Page::parse(params.page.as_deref(), params.per_page.as_deref());

    state
        .product_service
        .list_products(page)
        .await
        .map_err(ApiError::from)
        .map(|products| {
            ApiSuccess::new(StatusCode::OK, products.iter().map(ProductData::from).collect())
        })
}

/// Raw paging parameters; bad values fall back to defaults instead of
/// rejecting the request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsParams {
    page: Option<String>,
    per_page: Option<String>,
}
