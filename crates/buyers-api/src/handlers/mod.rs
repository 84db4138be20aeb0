//! API handlers

pub mod buyers;
pub mod health;
pub mod products;
pub mod transactions;
