use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;
use tracing::instrument;

use crate::app::AppState;
use crate::handlers::errors::{deleted, path_id, service_error_to_response, ApiError, Pagination};
use crate::models::{CreateSubmenuRequest, SubmenuView, UpdateSubmenuRequest};

#[instrument(name = "list_submenus", skip(state))]
pub async fn list_submenus(
    State(state): State<AppState>,
    Path(menu_id): Path<String>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<SubmenuView>>, ApiError> {
    let (offset, limit) = pagination.bounds();

    state
        .submenu_service
        .list_submenus(path_id(&menu_id), offset, limit)
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

#[instrument(name = "get_submenu", skip(state))]
pub async fn get_submenu(
    State(state): State<AppState>,
    Path((menu_id, submenu_id)): Path<(String, String)>,
) -> Result<Json<SubmenuView>, ApiError> {
    state
        .submenu_service
        .get_submenu(path_id(&menu_id), path_id(&submenu_id))
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

#[instrument(name = "create_submenu", skip(state, request), fields(title = %request.title))]
pub async fn create_submenu(
    State(state): State<AppState>,
    Path(menu_id): Path<String>,
    Json(request): Json<CreateSubmenuRequest>,
) -> Result<(StatusCode, Json<SubmenuView>), ApiError> {
    match state
        .submenu_service
        .create_submenu(path_id(&menu_id), request)
        .await
    {
        Ok(submenu) => {
            crate::info_with_trace!(submenu_id = %submenu.id, "Submenu created");
            Ok((StatusCode::CREATED, Json(submenu)))
        }
        Err(err) => Err(service_error_to_response(err)),
    }
}

#[instrument(name = "update_submenu", skip(state, request))]
pub async fn update_submenu(
    State(state): State<AppState>,
    Path((menu_id, submenu_id)): Path<(String, String)>,
    Json(request): Json<UpdateSubmenuRequest>,
) -> Result<Json<SubmenuView>, ApiError> {
    state
        .submenu_service
        .update_submenu(path_id(&menu_id), path_id(&submenu_id), request)
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

#[instrument(name = "delete_submenu", skip(state))]
pub async fn delete_submenu(
    State(state): State<AppState>,
    Path((menu_id, submenu_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    state
        .submenu_service
        .delete_submenu(path_id(&menu_id), path_id(&submenu_id))
        .await
        .map(|()| deleted("Submenu"))
        .map_err(service_error_to_response)
}
