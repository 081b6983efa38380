use catalog_api::{app, AppState, CatalogStore, MemoryStore, PgStore};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("catalog_api=info")),
        )
        .init();

    // DATABASE_URL selects Postgres; without it the in-memory store serves.
    let store: Arc<dyn CatalogStore> = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect(&url)
                .await?;
            let store = PgStore::new(pool);
            store.ensure_tables().await?;
            tracing::info!("using postgres store");
            Arc::new(store)
        }
        Err(_) => {
            tracing::info!("DATABASE_URL not set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let bind = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".into());
    let listener = TcpListener::bind(&bind).await?;
    tracing::info!("catalog api listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(AppState::new(store))).await?;
    Ok(())
}
