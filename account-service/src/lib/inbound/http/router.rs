use std::sync::Arc;
use std::time::Duration;

use auth::PasswordHasher;
use auth::TokenIssuer;
use axum::body::Body;
use axum::error_handling::HandleErrorLayer;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::MakeRequestUuid;
use tower_http::request_id::PropagateRequestIdLayer;
use tower_http::request_id::SetRequestIdLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_product::get_product;
use super::handlers::health::health;
use super::handlers::list_products::list_products;
use super::handlers::panic_response;
use super::handlers::sign_in::sign_in;
use super::handlers::sign_up::sign_up;
use super::handlers::timeout_response;
use super::middleware::require_bearer;
use crate::domain::authentication::guard::AuthGuard;
use crate::domain::authentication::ports::AuthenticationServicePort;
use crate::domain::authentication::service::AuthenticationService;
use crate::domain::product::ports::ProductRepository;
use crate::domain::product::ports::ProductServicePort;
use crate::domain::product::service::ProductService;
use crate::domain::user::ports::RegistrationServicePort;
use crate::domain::user::service::RegistrationService;
use crate::user::ports::UserRepository;

#[derive(Clone)]
pub struct AppState {
    pub registration_service: Arc<dyn RegistrationServicePort>,
    pub authentication_service: Arc<dyn AuthenticationServicePort>,
    pub product_service: Arc<dyn ProductServicePort>,
    pub auth_guard: Arc<AuthGuard>,
}

impl AppState {
    /// Wire every service over the chosen storage adapters.
    ///
    /// The password hasher and token issuer are shared by all services so
    /// that a token issued at login is accepted by the guard.
    pub fn new<UR, PR>(
        user_repository: Arc<UR>,
        product_repository: Arc<PR>,
        password_hasher: Arc<PasswordHasher>,
        token_issuer: Arc<TokenIssuer>,
        token_lifetime: chrono::Duration,
    ) -> Self
    where
        UR: UserRepository,
        PR: ProductRepository,
    {
        let registration_service = RegistrationService::new(
            Arc::clone(&user_repository),
            Arc::clone(&password_hasher),
        );
        let authentication_service =
            AuthenticationService::new(user_repository, password_hasher, Arc::clone(&token_issuer))
                .with_token_lifetime(token_lifetime);

        Self {
            registration_service: Arc::new(registration_service),
            authentication_service: Arc::new(authentication_service),
            product_service: Arc::new(ProductService::new(product_repository)),
            auth_guard: Arc::new(AuthGuard::new(token_issuer)),
        }
    }
}

pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/sign-up", post(sign_up))
        .route("/auth/sign-in", post(sign_in));

    let protected_routes = Router::new()
        .route("/api/v1/product", get(get_product))
        .route("/api/v1/products", get(list_products))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();

            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
                request_id = %request_id,
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    // Each layer wraps the ones added before it.
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(timeout_response))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(trace_layer)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
