use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flashdeck::{app, config, db};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "flashdeck=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let db_path = config::load_database_path();
  let pool = match db::init_db(&db_path) {
    Ok(pool) => pool,
    Err(e) => {
      tracing::error!("Failed to initialize database: {}", e);
      std::process::exit(1);
    }
  };

  let router = app::build_router(pool);
  let addr = config::server_bind_addr();
  let listener = match tokio::net::TcpListener::bind(&addr).await {
    Ok(listener) => listener,
    Err(e) => {
      tracing::error!("Failed to bind {}: {}", addr, e);
      std::process::exit(1);
    }
  };

  tracing::info!("Listening on http://{}", addr);
  if let Err(e) = axum::serve(listener, router).await {
    tracing::error!("Server error: {}", e);
  }
}
