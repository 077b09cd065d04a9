use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sessiond::{
    app::build_app,
    config::Config,
    db::connection::create_pool,
    repositories::{PgSessionStore, PgTokenDenylist, PgUserStore},
    services::SessionLifecycle,
    state::AppState,
    utils::jwt::TokenIssuer,
};

fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return "<empty>".into();
    }
    let prefix = s.chars().take(4).collect::<String>();
    format!("{}*** (len={})", prefix, s.len())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sessiond=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        database_url = %config.database_url,
        jwt_secret = %mask_secret(&config.jwt_secret),
        access_token_expiration_minutes = config.access_token_expiration_minutes,
        refresh_token_expiration_days = config.refresh_token_expiration_days,
        "Loaded configuration from environment/.env"
    );

    // Initialize database
    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let users = Arc::new(PgUserStore::new(pool.clone()));
    let lifecycle = SessionLifecycle::new(
        Arc::new(PgSessionStore::new(pool.clone())),
        Arc::new(PgTokenDenylist::new(pool)),
        TokenIssuer::new(config.auth()),
    );
    let state = AppState::new(users, lifecycle, config.clone());

    let app = build_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
