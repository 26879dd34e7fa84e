use axum::{
    extract::FromRef,
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

use crate::config::ServerConfig;
use crate::handlers::{
    cors_layer, dish, health_check, menu, metrics_handler, request_validation_middleware,
    security_headers_middleware, submenu,
};
use crate::observability::{observability_middleware, Metrics};
use crate::repositories::{DishRepository, MenuRepository, SubmenuRepository};
use crate::services::{DishService, MenuService, SubmenuService};

pub const API_PREFIX: &str = "/api/v1";

/// Shared application state containing all services
#[derive(Clone)]
pub struct AppState {
    pub menu_service: Arc<MenuService>,
    pub submenu_service: Arc<SubmenuService>,
    pub dish_service: Arc<DishService>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Wire the three catalog services over their repositories, all reporting to `metrics`
    pub fn new(
        menus: Arc<dyn MenuRepository>,
        submenus: Arc<dyn SubmenuRepository>,
        dishes: Arc<dyn DishRepository>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            menu_service: Arc::new(MenuService::new_with_metrics(menus, metrics.clone())),
            submenu_service: Arc::new(SubmenuService::new_with_metrics(
                submenus.clone(),
                metrics.clone(),
            )),
            dish_service: Arc::new(DishService::new_with_metrics(
                dishes,
                submenus,
                metrics.clone(),
            )),
            metrics,
        }
    }
}

impl FromRef<AppState> for Arc<Metrics> {
    fn from_ref(state: &AppState) -> Self {
        state.metrics.clone()
    }
}

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/menus", get(menu::list_menus).post(menu::create_menu))
        .route(
            "/menus/:menu_id",
            get(menu::get_menu)
                .patch(menu::update_menu)
                .delete(menu::delete_menu),
        )
        .route(
            "/menus/:menu_id/submenus",
            get(submenu::list_submenus).post(submenu::create_submenu),
        )
        .route(
            "/menus/:menu_id/submenus/:submenu_id",
            get(submenu::get_submenu)
                .patch(submenu::update_submenu)
                .delete(submenu::delete_submenu),
        )
        .route(
            "/menus/:menu_id/submenus/:submenu_id/dishes",
            get(dish::list_dishes).post(dish::create_dish),
        )
        .route(
            "/menus/:menu_id/submenus/:submenu_id/dishes/:dish_id",
            get(dish::get_dish)
                .patch(dish::update_dish)
                .delete(dish::delete_dish),
        )
}

/// Build the application router
pub fn create_app(state: AppState, server: &ServerConfig) -> Router {
    let metrics = state.metrics.clone();

    let routes = Router::new()
        .route("/health/status", get(health_check))
        .route("/metrics", get(metrics_handler))
        .nest(API_PREFIX, catalog_routes())
        .with_state(state);

    with_middleware(routes, metrics, server)
}

fn with_middleware(routes: Router, metrics: Arc<Metrics>, server: &ServerConfig) -> Router {
    let max_request_size = server.max_request_size;

    // Layers wrap everything added before them, so the last one is outermost.
    // The timeout sits inside observability so a 408 is still counted.
    routes
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(middleware::from_fn(move |req, next| {
            observability_middleware(metrics.clone(), req, next)
        }))
        .layer(middleware::from_fn(move |req, next| {
            request_validation_middleware(max_request_size, req, next)
        }))
        .layer(RequestBodyLimitLayer::new(max_request_size))
        .layer(cors_layer())
        .layer(middleware::from_fn(security_headers_middleware))
}
