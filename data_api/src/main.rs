use data_api::app;
use data_api::state::AppState;
use shared::{init_tracing, initialize_db, load_config};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let config = load_config()?;
    let pool = initialize_db(&config.sqlite, true).await?;
    let state = AppState::new(pool.clone(), &config.api.table_name)?;

    let listen_addr = config.api.listen_addr;
    info!(table = config.api.table_name, "starting server at {listen_addr}");
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shared::shutdown_listener(None))
        .await?;

    pool.close().await;
    Ok(())
}
