use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::server::parse_id;
use crate::application::customer_service::CustomerService;
use crate::errors::AppError;
use shop_types::domain::customer::{Customer, NewAddress};
use shop_types::ports::repository::CustomerRepository;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub addresses: Vec<NewAddress>,
}

pub(super) fn routes<R: CustomerRepository>(service: Arc<CustomerService<R>>) -> Router {
    Router::new()
        .route(
            "/customers",
            post(create_customer::<R>).get(list_customers::<R>),
        )
        .route("/customers/{id}", get(get_customer::<R>))
        .with_state(service)
}

async fn create_customer<R: CustomerRepository>(
    State(service): State<Arc<CustomerService<R>>>,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let customer = service
        .create_customer(payload.name, payload.email, payload.addresses)
        .await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

async fn get_customer<R: CustomerRepository>(
    State(service): State<Arc<CustomerService<R>>>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, AppError> {
    let customer = service.get_customer(parse_id(&id)?).await?;
    Ok(Json(customer))
}

async fn list_customers<R: CustomerRepository>(
    State(service): State<Arc<CustomerService<R>>>,
) -> Result<Json<Vec<Customer>>, AppError> {
    Ok(Json(service.list_customers().await?))
}
