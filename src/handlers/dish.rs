use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;
use tracing::instrument;

use crate::app::AppState;
use crate::handlers::errors::{deleted, path_id, service_error_to_response, ApiError, Pagination};
use crate::models::{CreateDishRequest, DishView, UpdateDishRequest};

#[instrument(name = "list_dishes", skip(state))]
pub async fn list_dishes(
    State(state): State<AppState>,
    Path((menu_id, submenu_id)): Path<(String, String)>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<DishView>>, ApiError> {
    let (offset, limit) = pagination.bounds();

    state
        .dish_service
        .list_dishes(path_id(&menu_id), path_id(&submenu_id), offset, limit)
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

#[instrument(name = "get_dish", skip(state))]
pub async fn get_dish(
    State(state): State<AppState>,
    Path((menu_id, submenu_id, dish_id)): Path<(String, String, String)>,
) -> Result<Json<DishView>, ApiError> {
    state
        .dish_service
        .get_dish(path_id(&menu_id), path_id(&submenu_id), path_id(&dish_id))
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

#[instrument(name = "create_dish", skip(state, request), fields(title = %request.title))]
pub async fn create_dish(
    State(state): State<AppState>,
    Path((menu_id, submenu_id)): Path<(String, String)>,
    Json(request): Json<CreateDishRequest>,
) -> Result<(StatusCode, Json<DishView>), ApiError> {
    match state
        .dish_service
        .create_dish(path_id(&menu_id), path_id(&submenu_id), request)
        .await
    {
        Ok(dish) => {
            crate::info_with_trace!(dish_id = %dish.id, "Dish created");
            Ok((StatusCode::CREATED, Json(dish)))
        }
        Err(err) => Err(service_error_to_response(err)),
    }
}

#[instrument(name = "update_dish", skip(state, request))]
pub async fn update_dish(
    State(state): State<AppState>,
    Path((menu_id, submenu_id, dish_id)): Path<(String, String, String)>,
    Json(request): Json<UpdateDishRequest>,
) -> Result<Json<DishView>, ApiError> {
    state
        .dish_service
        .update_dish(
            path_id(&menu_id),
            path_id(&submenu_id),
            path_id(&dish_id),
            request,
        )
        .await
        .map(Json)
        .map_err(service_error_to_response)
}

#[instrument(name = "delete_dish", skip(state))]
pub async fn delete_dish(
    State(state): State<AppState>,
    Path((menu_id, submenu_id, dish_id)): Path<(String, String, String)>,
) -> Result<Json<Value>, ApiError> {
    state
        .dish_service
        .delete_dish(path_id(&menu_id), path_id(&submenu_id), path_id(&dish_id))
        .await
        .map(|()| deleted("Dish"))
        .map_err(service_error_to_response)
}
