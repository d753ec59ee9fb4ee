pub mod aggregate;
pub mod customer;
pub mod order;
