// Each test binary uses a different subset of these helpers
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use carshop_client::api::HttpCarApi;
use carshop_client::config::{normalize_base_url, NotificationConfig};
use carshop_client::controller::CarListController;
use carshop_client::notify::Notifications;
use carshop_client::prompt::Prompter;
use carshop_client::session::{Credential, CredentialStore};

pub const USER: &str = "admin";
pub const PASSWORD: &str = "admin";
pub const TOKEN: &str = "Bearer eyJhbGciOiJIUzI1NiJ9.test";

/// What the mock server should do wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    List,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone)]
pub struct Received {
    pub method: &'static str,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct MockState {
    base_url: String,
    cars: Vec<(u64, Value)>,
    next_id: u64,
    failures: HashMap<Route, StatusCode>,
    garbled_list: bool,
    omit_token: bool,
    received: Vec<Received>,
}

/// In-process carshop server speaking the HAL contract
#[derive(Clone)]
pub struct MockCarshop {
    state: Arc<Mutex<MockState>>,
    pub base_url: String,
}

impl MockCarshop {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = TcpListener::bind(("127.0.0.1", port)).await?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let server = Self {
            state: Arc::new(Mutex::new(MockState {
                base_url: base_url.clone(),
                ..Default::default()
            })),
            base_url,
        };
        server.seed();

        let app = Router::new()
            .route("/login", post(login))
            .route("/api/cars", get(list_cars).post(create_car))
            .route("/api/cars/:id", put(update_car).delete(delete_car))
            .with_state(server.clone());

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        // Give the server a moment to start
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(server)
    }

    fn seed(&self) {
        let mut state = self.state.lock().unwrap();
        for car in [
            json!({"brand": "Ford", "model": "Mustang", "color": "Red", "year": 2021, "fuel": "Gasoline", "price": 59000}),
            json!({"brand": "Nissan", "model": "Leaf", "color": "White", "year": 2019, "fuel": "Electric", "price": 29000}),
            json!({"brand": "Toyota", "model": "Prius", "color": "Silver", "year": 2020, "fuel": "Hybrid", "price": 39000}),
        ] {
            state.next_id += 1;
            let id = state.next_id;
            state.cars.push((id, car));
        }
    }

    pub fn href(&self, id: u64) -> String {
        format!("{}/api/cars/{}", self.base_url, id)
    }

    pub fn api(&self) -> HttpCarApi {
        HttpCarApi::new(normalize_base_url(&self.base_url).unwrap())
    }

    pub fn fail_next(&self, route: Route, status: StatusCode) {
        self.state.lock().unwrap().failures.insert(route, status);
    }

    pub fn garble_list(&self, garbled: bool) {
        self.state.lock().unwrap().garbled_list = garbled;
    }

    pub fn omit_token(&self, omit: bool) {
        self.state.lock().unwrap().omit_token = omit;
    }

    pub fn received(&self) -> Vec<Received> {
        self.state.lock().unwrap().received.clone()
    }

    pub fn mutations(&self) -> Vec<Received> {
        self.received()
            .into_iter()
            .filter(|r| r.method != "GET")
            .collect()
    }

    /// The collection body a fresh GET would return
    pub fn snapshot(&self) -> Value {
        render_collection(&self.state.lock().unwrap())
    }

    /// Controller wired to this server with the given prompter
    pub fn controller(&self, prompter: Arc<ScriptedPrompter>, authenticated: bool) -> CarListController {
        let credentials = CredentialStore::new();
        if authenticated {
            credentials.store(Credential::new(TOKEN));
        }
        CarListController::new(
            Arc::new(self.api()),
            credentials,
            prompter,
            Notifications::new(NotificationConfig::default()),
        )
    }
}

fn render_car(base_url: &str, id: u64, fields: &Value) -> Value {
    let href = format!("{}/api/cars/{}", base_url, id);
    let mut car = fields.clone();
    car["_links"] = json!({
        "self": { "href": href },
        "car": { "href": href }
    });
    car
}

fn render_collection(state: &MockState) -> Value {
    let cars: Vec<Value> = state
        .cars
        .iter()
        .map(|(id, fields)| render_car(&state.base_url, *id, fields))
        .collect();
    json!({
        "_embedded": { "cars": cars },
        "_links": { "self": { "href": format!("{}/api/cars", state.base_url) } }
    })
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Record the request, then apply injected failures and the token check
fn admit(
    server: &MockCarshop,
    route: Route,
    method: &'static str,
    path: String,
    headers: &HeaderMap,
    body: Option<Value>,
) -> Result<(), Response> {
    let mut state = server.state.lock().unwrap();
    let authorization = header_value(headers, header::AUTHORIZATION);
    state.received.push(Received {
        method,
        path,
        authorization: authorization.clone(),
        content_type: header_value(headers, header::CONTENT_TYPE),
        body,
    });

    if let Some(status) = state.failures.remove(&route) {
        return Err((status, Json(json!({"error": "injected failure"}))).into_response());
    }
    if route != Route::Login && authorization.as_deref() != Some(TOKEN) {
        return Err((StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"}))).into_response());
    }
    Ok(())
}

async fn login(State(server): State<MockCarshop>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(response) = admit(&server, Route::Login, "POST", "/login".into(), &headers, Some(body.clone())) {
        return response;
    }

    let valid = body["username"] == USER && body["password"] == PASSWORD;
    let omit = server.state.lock().unwrap().omit_token;
    match (valid, omit) {
        (true, false) => (StatusCode::OK, [(header::AUTHORIZATION, TOKEN)]).into_response(),
        (true, true) => StatusCode::OK.into_response(),
        (false, _) => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn list_cars(State(server): State<MockCarshop>, headers: HeaderMap) -> Response {
    if let Err(response) = admit(&server, Route::List, "GET", "/api/cars".into(), &headers, None) {
        return response;
    }

    let state = server.state.lock().unwrap();
    if state.garbled_list {
        return (StatusCode::OK, "<html>maintenance</html>").into_response();
    }
    Json(render_collection(&state)).into_response()
}

async fn create_car(State(server): State<MockCarshop>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(response) = admit(&server, Route::Create, "POST", "/api/cars".into(), &headers, Some(body.clone())) {
        return response;
    }

    let mut state = server.state.lock().unwrap();
    state.next_id += 1;
    let id = state.next_id;
    state.cars.push((id, body.clone()));
    (StatusCode::CREATED, Json(render_car(&state.base_url, id, &body))).into_response()
}

async fn update_car(
    State(server): State<MockCarshop>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let path = format!("/api/cars/{}", id);
    if let Err(response) = admit(&server, Route::Update, "PUT", path, &headers, Some(body.clone())) {
        return response;
    }

    let mut state = server.state.lock().unwrap();
    match state.cars.iter_mut().find(|(car_id, _)| *car_id == id) {
        Some((_, fields)) => {
            *fields = body;
            StatusCode::OK.into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_car(State(server): State<MockCarshop>, Path(id): Path<u64>, headers: HeaderMap) -> Response {
    let path = format!("/api/cars/{}", id);
    if let Err(response) = admit(&server, Route::Delete, "DELETE", path, &headers, None) {
        return response;
    }

    let mut state = server.state.lock().unwrap();
    let before = state.cars.len();
    state.cars.retain(|(car_id, _)| *car_id != id);
    if state.cars.len() == before {
        StatusCode::NOT_FOUND.into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

/// Answers confirmations from a preset and records alerts
pub struct ScriptedPrompter {
    answer: Mutex<bool>,
    confirmations: Mutex<usize>,
    alerts: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn answering(yes: bool) -> Arc<Self> {
        Arc::new(Self {
            answer: Mutex::new(yes),
            confirmations: Mutex::new(0),
            alerts: Mutex::new(Vec::new()),
        })
    }

    pub fn confirmations(&self) -> usize {
        *self.confirmations.lock().unwrap()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn confirm(&self, _message: &str) -> bool {
        *self.confirmations.lock().unwrap() += 1;
        *self.answer.lock().unwrap()
    }

    async fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}
