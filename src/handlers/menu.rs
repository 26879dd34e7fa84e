use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;
use tracing::instrument;

use crate::app::AppState;
use crate::handlers::errors::{deleted, path_id, service_error_to_response, ApiError, Pagination};
use crate::models::{CreateMenuRequest, MenuView, UpdateMenuRequest};

/// List menus with their submenu and dish counts
#[instrument(name = "list_menus", skip(state))]
pub async fn list_menus(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<MenuView>>, ApiError> {
    let (offset, limit) = pagination.bounds();

    state
        .menu_service
        .list_menus(offset, limit)
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

#[instrument(name = "get_menu", skip(state))]
pub async fn get_menu(
    State(state): State<AppState>,
    Path(menu_id): Path<String>,
) -> Result<Json<MenuView>, ApiError> {
    state
        .menu_service
        .get_menu(path_id(&menu_id))
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

#[instrument(name = "create_menu", skip(state, request), fields(title = %request.title))]
pub async fn create_menu(
    State(state): State<AppState>,
    Json(request): Json<CreateMenuRequest>,
) -> Result<(StatusCode, Json<MenuView>), ApiError> {
    match state.menu_service.create_menu(request).await {
        Ok(menu) => {
            crate::info_with_trace!(menu_id = %menu.id, "Menu created");
            Ok((StatusCode::CREATED, Json(menu)))
        }
        Err(err) => Err(service_error_to_response(err)),
    }
}

#[instrument(name = "update_menu", skip(state, request))]
pub async fn update_menu(
    State(state): State<AppState>,
    Path(menu_id): Path<String>,
    Json(request): Json<UpdateMenuRequest>,
) -> Result<Json<MenuView>, ApiError> {
    state
        .menu_service
        .update_menu(path_id(&menu_id), request)
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

/// Delete a menu and everything under it
#[instrument(name = "delete_menu", skip(state))]
pub async fn delete_menu(
    State(state): State<AppState>,
    Path(menu_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .menu_service
        .delete_menu(path_id(&menu_id))
        .await
        .map(|()| deleted("Menu"))
        .map_err(service_error_to_response)
}
