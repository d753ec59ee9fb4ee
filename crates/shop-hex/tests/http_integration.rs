use async_trait::async_trait;
use shop_hex::application::customer_service::CustomerService;
use shop_hex::application::order_service::OrderService;
use shop_hex::inbound::http::{CreateCustomerRequest, CreateOrderRequest, HttpServer, HttpServerConfig};
use shop_repo::memory::InMemoryRepo;
use shop_types::domain::customer::{Customer, NewAddress, NewCustomer};
use shop_types::domain::order::{NewItem, NewOrder, Order, OrderStatus};
use shop_types::ports::repository::{AggregateRepository, RepoError};
use std::time::Duration;
use uuid::Uuid;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn config(port: u16, request_timeout: Duration) -> HttpServerConfig {
    HttpServerConfig {
        port: port.to_string(),
        request_timeout,
    }
}

async fn spawn(server: HttpServer) -> (String, tokio::task::JoinHandle<()>) {
    let addr = format!("http://127.0.0.1:{}", server.config.port);
    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    // Give the server a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, handle)
}

#[tokio::test]
async fn create_fetch_list_customers_over_http() {
    let port = find_free_port();
    let service = CustomerService::new(InMemoryRepo::<NewCustomer>::new());
    let (addr, handle) = spawn(HttpServer::customers(service, config(port, Duration::from_secs(5)))).await;

    let client = reqwest::Client::new();
    let body = CreateCustomerRequest {
        name: "Ana".into(),
        email: "ana@x.com".into(),
        addresses: vec![NewAddress {
            street: "Rua A".into(),
            city: "Lisboa".into(),
            state: "LX".into(),
            zip: "1000".into(),
        }],
    };
    let res = client
        .post(format!("{}/customers", addr))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let created: Customer = res.json().await.unwrap();
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(created.addresses.len(), 1);
    assert_eq!(created.addresses[0].street, "Rua A");

    let fetched: Customer = client
        .get(format!("{}/customers/{}", addr, created.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, created);

    let list: Vec<Customer> = client
        .get(format!("{}/customers", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list, vec![created]);

    let health = client.get(format!("{}/health", addr)).send().await.unwrap();
    assert_eq!(health.status(), reqwest::StatusCode::OK);

    handle.abort();
}

#[tokio::test]
async fn create_fetch_list_orders_over_http() {
    let port = find_free_port();
    let service = OrderService::new(InMemoryRepo::<NewOrder>::new());
    let (addr, handle) = spawn(HttpServer::orders(service, config(port, Duration::from_secs(5)))).await;

    let client = reqwest::Client::new();
    let body = CreateOrderRequest {
        customer_id: Uuid::new_v4().to_string(),
        items: vec![
            NewItem {
                product_id: "sku-1".into(),
                name: "Widget".into(),
                unit_price_cents: 500,
                quantity: 1,
            },
            NewItem {
                product_id: "sku-2".into(),
                name: "Gizmo".into(),
                unit_price_cents: 125,
                quantity: 4,
            },
        ],
    };
    let res = client
        .post(format!("{}/orders", addr))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let created: Order = res.json().await.unwrap();
    assert_eq!(created.status, OrderStatus::AwaitingPayment);
    assert_eq!(created.total_cents, 1000);

    let fetched: Order = client
        .get(format!("{}/orders/{}", addr, created.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<_> = fetched.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Widget", "Gizmo"]);

    let list: Vec<Order> = client
        .get(format!("{}/orders", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, created.id);

    handle.abort();
}

#[tokio::test]
async fn bad_request_and_not_found_paths() {
    let port = find_free_port();
    let service = OrderService::new(InMemoryRepo::<NewOrder>::new());
    let (addr, handle) = spawn(HttpServer::orders(service, config(port, Duration::from_secs(5)))).await;

    let client = reqwest::Client::new();
    let bad_body = CreateOrderRequest {
        customer_id: "c-1".into(),
        items: vec![],
    };
    let res = client
        .post(format!("{}/orders", addr))
        .json(&bad_body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);

    let negative_price = CreateOrderRequest {
        customer_id: "c-1".into(),
        items: vec![NewItem {
            product_id: "sku-1".into(),
            name: "Widget".into(),
            unit_price_cents: -500,
            quantity: 2,
        }],
    };
    let res = client
        .post(format!("{}/orders", addr))
        .json(&negative_price)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);

    let res = client
        .get(format!("{}/orders/not-a-uuid", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);

    let res = client
        .get(format!("{}/orders/{}", addr, Uuid::new_v4()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("order "));

    handle.abort();
}

/// Never answers within the request deadline.
struct StalledRepo;

#[async_trait]
impl AggregateRepository<NewOrder> for StalledRepo {
    async fn save(&self, _draft: NewOrder) -> Result<Order, RepoError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        unreachable!("request deadline cancels the call")
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Order, RepoError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Err(RepoError::NotFound { kind: "order", id })
    }

    async fn list_all(&self) -> Result<Vec<Order>, RepoError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(vec![])
    }
}

#[tokio::test]
async fn slow_repository_call_hits_request_deadline() {
    let port = find_free_port();
    let service = OrderService::new(StalledRepo);
    let (addr, handle) = spawn(HttpServer::orders(service, config(port, Duration::from_millis(100)))).await;

    let started = std::time::Instant::now();
    let res = reqwest::get(format!("{}/orders", addr)).await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::REQUEST_TIMEOUT);
    assert!(started.elapsed() < Duration::from_secs(5));

    handle.abort();
}
