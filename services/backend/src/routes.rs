//! HTTP routes

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, Method, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::{
    chat::socket::socket_handler, error::AuthError, models::UserSummary, state::AppState,
};

/// Body of the liveness probe at `/`
pub const LIVENESS_TEXT: &str = "yeah ! Backend is working";

/// Request for user registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Plain acknowledgement
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response for user login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: UserSummary,
}

/// Create the router for the backend service
///
/// The auth endpoints are served both at the root and under `/api/auth`.
pub fn create_router(state: AppState, client_origin: HeaderValue) -> Router {
    let auth_routes: Router<AppState> = Router::new()
        .route("/register", post(register))
        .route("/login", post(login));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/socket", get(socket_handler))
        .merge(auth_routes.clone())
        .nest("/api/auth", auth_routes)
        .layer(cors_layer(client_origin))
        .with_state(state)
}

fn cors_layer(client_origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(client_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
}

/// Liveness probe
pub async fn root() -> &'static str {
    LIVENESS_TEXT
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = state.auth_service.store_healthy().await;
    let status = if database { "ok" } else { "degraded" };

    Json(serde_json::json!({
        "status": status,
        "service": "backend",
        "database": database,
    }))
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let Json(payload) = payload.map_err(|e| AuthError::Validation(e.body_text()))?;

    state
        .auth_service
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully.".to_string(),
        }),
    ))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let Json(payload) = payload.map_err(|e| AuthError::Validation(e.body_text()))?;

    let session = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            token: session.token,
            user: session.user,
        }),
    ))
}
