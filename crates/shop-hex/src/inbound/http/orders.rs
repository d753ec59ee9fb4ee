use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::server::parse_id;
use crate::application::order_service::OrderService;
use crate::errors::AppError;
use shop_types::domain::order::{NewItem, Order};
use shop_types::ports::repository::OrderRepository;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: String,
    pub items: Vec<NewItem>,
}

pub(super) fn routes<R: OrderRepository>(service: Arc<OrderService<R>>) -> Router {
    Router::new()
        .route("/orders", post(create_order::<R>).get(list_orders::<R>))
        .route("/orders/{id}", get(get_order::<R>))
        .with_state(service)
}

async fn create_order<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = service
        .create_order(payload.customer_id, payload.items)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn get_order<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    let order = service.get_order(parse_id(&id)?).await?;
    Ok(Json(order))
}

async fn list_orders<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(service.list_orders().await?))
}
