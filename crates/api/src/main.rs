use std::sync::Arc;

use stocktrace_infra::{InMemoryInventoryStore, InventoryStore, PostgresInventoryStore};

#[tokio::main]
async fn main() {
    stocktrace_observability::init();

    let store: Arc<dyn InventoryStore> = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(8)
                .connect(&url)
                .await
                .expect("failed to connect to DATABASE_URL");
            tracing::info!("using Postgres store");
            Arc::new(PostgresInventoryStore::new(pool))
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (state is not durable)");
            Arc::new(InMemoryInventoryStore::new())
        }
    };

    let app = stocktrace_api::app::build_app(store);

    let bind = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
