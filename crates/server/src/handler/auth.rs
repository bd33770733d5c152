use crate::middleware::SimpleValidatedJson;
use crate::state::AppState;
use axum::{
    Extension, Json,
    extract::Query,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use shared::abstract_trait::{DynLoginService, DynRegisterService, DynVerifyService};
use shared::domain::requests::{LoginRequest, RegisterRequest, VerifyEmailParams};
use shared::domain::responses::{ApiResponse, TokenResponse, UserResponse, VerifiedResponse};
use shared::errors::HttpError;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created, verification email dispatched", body = ApiResponse<UserResponse>),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Auth"
)]
pub async fn register_user_handler(
    Extension(service): Extension<DynRegisterService>,
    SimpleValidatedJson(body): SimpleValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.register(&body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Email not verified")
    ),
    tag = "Auth"
)]
pub async fn login_user_handler(
    Extension(service): Extension<DynLoginService>,
    SimpleValidatedJson(body): SimpleValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.login(&body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/auth/verify",
    params(VerifyEmailParams),
    responses(
        (status = 200, description = "Email verified", body = ApiResponse<VerifiedResponse>),
        (status = 400, description = "Token rejected or expired"),
        (status = 404, description = "Unknown email")
    ),
    tag = "Auth"
)]
pub async fn verify_email_handler(
    Extension(service): Extension<DynVerifyService>,
    Query(params): Query<VerifyEmailParams>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.redeem(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn auth_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/auth/register", post(register_user_handler))
        .route("/auth/login", post(login_user_handler))
        .route("/auth/verify", get(verify_email_handler))
        .layer(Extension(app_state.di_container.auth_service.register.clone()))
        .layer(Extension(app_state.di_container.auth_service.login.clone()))
        .layer(Extension(app_state.di_container.auth_service.verify.clone()))
        .with_state(app_state)
}
