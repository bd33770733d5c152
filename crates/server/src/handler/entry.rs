use crate::middleware::{AuthUser, SimpleValidatedJson, auth_middleware};
use crate::state::AppState;
use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, patch},
};
use shared::abstract_trait::{DynEntryCommandService, DynEntryQueryService};
use shared::domain::requests::{CreateEntryRequest, FindAllEntries, UpdateEntryRequest};
use shared::domain::responses::{
    ApiResponse, ApiResponsePagination, DeleteEntryResponse, EntryResponse,
};
use shared::errors::HttpError;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/entries",
    tag = "Entry",
    security(("bearer_auth" = [])),
    params(FindAllEntries),
    responses(
        (status = 200, description = "Page of repair entries", body = ApiResponsePagination<Vec<EntryResponse>>),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn get_entries(
    Extension(service): Extension<DynEntryQueryService>,
    Query(params): Query<FindAllEntries>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/entries",
    tag = "Entry",
    security(("bearer_auth" = [])),
    request_body = CreateEntryRequest,
    responses(
        (status = 200, description = "Entry created", body = ApiResponse<EntryResponse>),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_entry_handler(
    Extension(service): Extension<DynEntryCommandService>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateEntryRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create(&body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    patch,
    path = "/entries/{id}",
    tag = "Entry",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Public entry id")),
    request_body = UpdateEntryRequest,
    responses(
        (status = 200, description = "Entry updated", body = ApiResponse<EntryResponse>),
        (status = 404, description = "Entry not found"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn update_entry_handler(
    Extension(service): Extension<DynEntryCommandService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateEntryRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update(&user.email, &id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/entries/{id}",
    tag = "Entry",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Public entry id")),
    responses(
        (status = 200, description = "Entry deleted", body = ApiResponse<DeleteEntryResponse>),
        (status = 404, description = "Entry not found"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn delete_entry_handler(
    Extension(service): Extension<DynEntryCommandService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.delete(&user.email, &id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn entry_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/entries", get(get_entries).post(create_entry_handler))
        .route(
            "/entries/{id}",
            patch(update_entry_handler).delete(delete_entry_handler),
        )
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.entry_service.query.clone()))
        .layer(Extension(app_state.di_container.entry_service.command.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
        .with_state(app_state)
}
