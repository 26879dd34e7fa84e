#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use menu_catalog::{
    config::ServerConfig, create_app, repositories::InMemoryCatalog, AppState, Metrics,
};

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("menu_catalog=warn")
        .with_test_writer()
        .try_init();
});

/// A real catalog server over an in-memory store, bound to an ephemeral port
pub struct TestEnvironment {
    pub client: Client,
    pub base_url: String,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        Lazy::force(&TRACING);

        let catalog = Arc::new(InMemoryCatalog::new());
        let metrics = Arc::new(Metrics::new().expect("Failed to create metrics"));
        let state = AppState::new(catalog.clone(), catalog.clone(), catalog, metrics);
        let app = create_app(state, &ServerConfig::default());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local address");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Failed to serve app");
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn menus_url(&self) -> String {
        format!("{}/api/v1/menus", self.base_url)
    }

    pub fn menu_url(&self, menu_id: &str) -> String {
        format!("{}/{}", self.menus_url(), menu_id)
    }

    pub fn submenus_url(&self, menu_id: &str) -> String {
        format!("{}/submenus", self.menu_url(menu_id))
    }

    pub fn submenu_url(&self, menu_id: &str, submenu_id: &str) -> String {
        format!("{}/{}", self.submenus_url(menu_id), submenu_id)
    }

    pub fn dishes_url(&self, menu_id: &str, submenu_id: &str) -> String {
        format!("{}/dishes", self.submenu_url(menu_id, submenu_id))
    }

    pub fn dish_url(&self, menu_id: &str, submenu_id: &str, dish_id: &str) -> String {
        format!("{}/{}", self.dishes_url(menu_id, submenu_id), dish_id)
    }

    pub async fn get(&self, url: &str) -> (StatusCode, Value) {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .expect("Failed to send request");
        read(response).await
    }

    pub async fn post(&self, url: &str, body: Value) -> (StatusCode, Value) {
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .expect("Failed to send request");
        read(response).await
    }

    pub async fn patch(&self, url: &str, body: Value) -> (StatusCode, Value) {
        let response = self
            .client
            .patch(url)
            .json(&body)
            .send()
            .await
            .expect("Failed to send request");
        read(response).await
    }

    pub async fn delete(&self, url: &str) -> (StatusCode, Value) {
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .expect("Failed to send request");
        read(response).await
    }

    /// Create a menu and return its id
    pub async fn create_menu(&self, title: &str) -> String {
        let (status, body) = self
            .post(
                &self.menus_url(),
                json!({"title": title, "description": format!("{} description", title)}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        id_of(&body)
    }

    pub async fn create_submenu(&self, menu_id: &str, title: &str) -> String {
        let (status, body) = self
            .post(
                &self.submenus_url(menu_id),
                json!({"title": title, "description": format!("{} description", title)}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        id_of(&body)
    }

    pub async fn create_dish(&self, menu_id: &str, submenu_id: &str, title: &str, price: &str) -> String {
        let (status, body) = self
            .post(
                &self.dishes_url(menu_id, submenu_id),
                json!({
                    "title": title,
                    "description": format!("{} description", title),
                    "price": price,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        id_of(&body)
    }
}

async fn read(response: reqwest::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

pub fn id_of(body: &Value) -> String {
    body["id"]
        .as_str()
        .expect("response has no id")
        .to_string()
}
