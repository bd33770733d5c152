use crate::middleware::auth_middleware;
use crate::state::AppState;
use axum::{
    Extension, Json, extract::Multipart, http::StatusCode, middleware, response::IntoResponse,
    routing::post,
};
use shared::abstract_trait::DynWaiverService;
use shared::domain::responses::{ApiResponse, WaiverUploadResponse};
use shared::errors::HttpError;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/upload/waiver",
    tag = "Waiver",
    security(("bearer_auth" = [])),
    request_body(content = String, description = "Multipart form with a `file` part holding the waiver PDF", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Waiver stored, signed URL returned", body = ApiResponse<WaiverUploadResponse>),
        (status = 400, description = "Missing or non-PDF file part"),
        (status = 401, description = "Missing or invalid token"),
        (status = 503, description = "Object storage unavailable")
    )
)]
pub async fn upload_waiver_handler(
    Extension(service): Extension<DynWaiverService>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);

        let bytes = field
            .bytes()
            .await
            .map_err(|e| HttpError::BadRequest(format!("Failed to read file part: {e}")))?;

        let response = service
            .upload_waiver(file_name.as_deref(), content_type.as_deref(), bytes.to_vec())
            .await?;

        return Ok((StatusCode::OK, Json(response)));
    }

    Err(HttpError::BadRequest(
        "Multipart body is missing the `file` part".to_string(),
    ))
}

pub fn waiver_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/upload/waiver", post(upload_waiver_handler))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.waiver_service.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
        .with_state(app_state)
}
