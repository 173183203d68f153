//! Shared helpers for HTTP-level tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use menu_server::core::{AppState, Config};
use menu_server::gateway::MemoryGateway;
use menu_server::menu::fixtures::seed_demo;
use serde_json::{Value, json};
use tower::ServiceExt;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub gateway: Arc<MemoryGateway>,
}

/// App over a seeded in-memory store
pub async fn demo_app() -> TestApp {
    let gateway = Arc::new(MemoryGateway::demo());
    seed_demo(&gateway).await.unwrap();
    let state = AppState::with_gateway(Config::development(), gateway.clone());
    TestApp {
        app: menu_server::api::build_app(state.clone()),
        state,
        gateway,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    /// Sign in and return the session token
    pub async fn sign_in(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/sign-in",
                None,
                json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "sign-in failed: {body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Open a session on the demo table, returning its id
    pub async fn open_demo_session(&self) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/menu/sessions?restaurant=demo&table=demo-table-1",
                None,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "open session failed: {body}");
        body["data"]["session_id"].as_str().unwrap().to_string()
    }

    /// Put items in the cart and check out; returns the order id
    pub async fn place_demo_order(&self) -> String {
        let session = self.open_demo_session().await;
        let (status, _) = self
            .post(
                &format!("/api/menu/sessions/{session}/cart"),
                None,
                json!({ "item_id": "demo-item-burger", "quantity": 2 }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = self
            .post(
                &format!("/api/menu/sessions/{session}/checkout"),
                None,
                json!({ "customer_name": "Sara" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "checkout failed: {body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }
}
