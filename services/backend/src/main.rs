use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use backend::{
    AppState,
    auth::AuthService,
    chat::{ChatRelay, GeminiClient},
    config::AppConfig,
    database,
    jwt::JwtService,
    repositories::UserRepository,
    routes,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting chat backend");

    let config = AppConfig::from_env()?;

    // Initialize database connection pool
    let pool = database::connect(&config.database).await?;

    let user_repository = UserRepository::new(pool);
    let jwt_service = JwtService::new(config.jwt);
    let auth_service = AuthService::new(Arc::new(user_repository), jwt_service);

    let gemini_client = GeminiClient::new(config.gemini)?;
    let chat_relay = ChatRelay::new(Arc::new(gemini_client));

    let app_state = AppState::new(auth_service, chat_relay);

    // Start the web server
    let app = routes::create_router(app_state, config.server.client_origin);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
