use axum::{routing::get, serve, Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super::{customers, orders};
use crate::application::customer_service::CustomerService;
use crate::application::order_service::OrderService;
use crate::errors::AppError;
use shop_types::ports::repository::{CustomerRepository, OrderRepository};

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
    /// Requests running longer are abandoned; dropping the handler future
    /// releases its connection and rolls back any open transaction.
    pub request_timeout: Duration,
}

#[derive(Clone)]
pub struct HttpServer {
    routes: Router,
    pub config: HttpServerConfig,
}

impl HttpServer {
    pub fn customers<R: CustomerRepository>(
        service: CustomerService<R>,
        config: HttpServerConfig,
    ) -> Self {
        Self {
            routes: customers::routes(Arc::new(service)),
            config,
        }
    }

    pub fn orders<R: OrderRepository>(service: OrderService<R>, config: HttpServerConfig) -> Self {
        Self {
            routes: orders::routes(Arc::new(service)),
            config,
        }
    }

    /// Service routes plus `/health`, wrapped in tracing and timeout layers.
    pub fn router(&self) -> Router {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        uri = %request.uri(),
                        "request"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        Router::new()
            .route("/health", get(health))
            .merge(self.routes.clone())
            .layer(TimeoutLayer::new(self.config.request_timeout))
            .layer(trace_layer)
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();
        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

async fn health() -> (axum::http::StatusCode, Json<serde_json::Value>) {
    (
        axum::http::StatusCode::OK,
        Json(serde_json::json!({ "status": "ok" })),
    )
}

pub(super) fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|e| AppError::BadRequest(e.to_string()))
}
