mod customers;
mod orders;
mod server;

pub use customers::CreateCustomerRequest;
pub use orders::CreateOrderRequest;
pub use server::{HttpServer, HttpServerConfig};
