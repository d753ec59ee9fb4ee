//! shop-types: aggregate model and repository port shared by the customers
//! and orders services.

pub mod domain;
pub mod ports;
