//! In-process FinanceGPT backend for client tests
//!
//! Serves the auth endpoints and the streaming socket on an ephemeral
//! loopback port. Behaviour is keyed off the request contents:
//!
//! - login succeeds for password `pw` with token `tok-<local part>`
//! - signup rejects `taken@b.com`, and a non-numeric age with a 422 list
//! - stream query `fail` streams one token then an error frame,
//!   `drop` streams one token then drops the socket without a close frame,
//!   `hang` never answers, anything else echoes the query and token back

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{HeaderMap, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Recommendations sent after every echoed answer
pub const MOCK_RECOMMENDATIONS: [&str; 2] = ["Tell me more", "Compare options"];

#[derive(Default)]
struct Recorded {
    signups: Vec<Value>,
    logout_headers: Vec<String>,
    queries: Vec<Value>,
}

type Shared = Arc<Mutex<Recorded>>;

pub struct MockBackend {
    base_url: String,
    recorded: Shared,
    server: tokio::task::JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let recorded = Shared::default();
        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/signup", post(signup))
            .route("/auth/logout", post(logout))
            .route("/ws/stream", get(stream))
            .with_state(Arc::clone(&recorded));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            recorded,
            server,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn last_signup(&self) -> Option<Value> {
        self.recorded.lock().unwrap().signups.last().cloned()
    }

    pub fn logout_headers(&self) -> Vec<String> {
        self.recorded.lock().unwrap().logout_headers.clone()
    }

    /// Request frames received on the streaming socket, in order
    pub fn queries(&self) -> Vec<Value> {
        self.recorded.lock().unwrap().queries.clone()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn token_for(email: &str) -> String {
    let local = email.split('@').next().unwrap_or(email);
    format!("tok-{}", local)
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let email = body["email"].as_str().unwrap_or_default();
    if body["password"] == "pw" {
        (
            StatusCode::OK,
            Json(json!({"access_token": token_for(email), "token_type": "bearer"})),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Invalid credentials"})),
        )
    }
}

async fn signup(State(recorded): State<Shared>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    recorded.lock().unwrap().signups.push(body.clone());

    let email = body["email"].as_str().unwrap_or_default();
    if email == "taken@b.com" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Email already registered"})),
        );
    }
    if !body["age"].is_i64() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": [
                {"loc": ["body", "age"], "msg": "value is not a valid integer", "type": "type_error.integer"}
            ]})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"access_token": token_for(email), "token_type": "bearer"})),
    )
}

async fn logout(State(recorded): State<Shared>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    match auth {
        Some(value) => {
            recorded.lock().unwrap().logout_headers.push(value);
            (StatusCode::OK, Json(json!({"message": "Logged out"})))
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Not authenticated"})),
        ),
    }
}

async fn stream(ws: WebSocketUpgrade, State(recorded): State<Shared>) -> Response {
    ws.on_upgrade(move |socket| answer(socket, recorded))
}

async fn answer(mut socket: WebSocket, recorded: Shared) {
    let request = loop {
        match socket.recv().await {
            Some(Ok(Message::Text(text))) => break serde_json::from_str::<Value>(&text).unwrap_or(Value::Null),
            Some(Ok(_)) => continue,
            _ => return,
        }
    };
    recorded.lock().unwrap().queries.push(request.clone());

    let query = request["query"].as_str().unwrap_or_default().to_string();
    let token = request["token"].as_str().map(str::to_string);

    let frames: Vec<String> = if query.is_empty() {
        vec![json!({"error": "No query provided"}).to_string()]
    } else if token.is_none() {
        vec![json!({"error": "No token provided"}).to_string()]
    } else {
        match query.as_str() {
            "fail" => vec![
                "Partial".to_string(),
                json!({"error": "Model unavailable"}).to_string(),
            ],
            "drop" => {
                let _ = socket.send(Message::Text("Half an ans".to_string())).await;
                return;
            }
            "hang" => {
                while let Some(Ok(_)) = socket.recv().await {}
                return;
            }
            _ => vec![
                "Echo: ".to_string(),
                query.clone(),
                format!(" [{}]", token.unwrap_or_default()),
                json!({"recommendations": MOCK_RECOMMENDATIONS}).to_string(),
            ],
        }
    };

    for frame in frames {
        if socket.send(Message::Text(frame)).await.is_err() {
            return;
        }
    }
    let _ = socket.send(Message::Close(None)).await;
}
