use shop_hex::application::order_service::OrderService;
use shop_hex::config::{Config, Defaults};
use shop_hex::inbound::http::{HttpServer, HttpServerConfig};
use shop_repo::Repo;
use shop_types::domain::order::NewOrder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for DATABASE_URL / SERVER_PORT when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    let config = Config::from_env(Defaults::ORDERS)?;
    let repo: Repo<NewOrder> =
        Repo::build_with(Some(&config.database_url), config.db_max_connections).await?;
    let service = OrderService::new(repo);

    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
        request_timeout: config.request_timeout,
    };

    HttpServer::orders(service, server_cfg).run().await
}
