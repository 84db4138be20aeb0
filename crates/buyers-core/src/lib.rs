//! Buyers Core - Domain models, errors, and shared types
//!
//! This crate defines the types shared by the graph and API layers:
//! - Buyer, product, and transaction records as stored in the graph
//! - Container wrappers matching the graph query result documents
//! - Common error types
//! - Configuration management

pub mod config;

pub use config::{AppConfig, ConfigError, GraphConfig, LoggingConfig, ServerConfig};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for buyers operations
#[derive(Error, Debug)]
pub enum BuyersError {
    #[error("Graph store unavailable: {0}")]
    GraphUnavailable(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BuyersError>;

// ============================================================================
// Domain Models
// ============================================================================

/// A buyer node.
///
/// `ip` is only populated for buyers that made at least one transaction.
/// It is emitted as `Ip` on the wire and accepted as either `ip` or `Ip`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Buyer {
    /// Internal graph identifier
    pub uid: String,

    #[serde(rename = "buyer_id")]
    pub id: String,

    #[serde(rename = "buyer_name")]
    pub name: String,

    #[serde(rename = "buyer_age")]
    pub age: i64,

    #[serde(rename = "Ip", alias = "ip")]
    pub ip: String,
}

/// A product node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub uid: String,

    #[serde(rename = "product_id")]
    pub id: String,

    #[serde(rename = "product_name")]
    pub name: String,

    #[serde(rename = "product_price")]
    pub price: i64,
}

/// A transaction node with its embedded buyer and product edges
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    pub uid: String,

    #[serde(rename = "transaction_id")]
    pub id: String,

    #[serde(rename = "buyer")]
    pub buyers: Vec<Buyer>,

    #[serde(rename = "product")]
    pub products: Vec<Product>,

    pub ip: String,

    pub device: String,
}

/// Products bought by a single buyer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurchaseHistory {
    #[serde(rename = "product")]
    pub products: Vec<Product>,
}

// ============================================================================
// Query Result Containers
// ============================================================================
//
// Each container mirrors the top-level key of a graph query result so the
// document can be decoded directly.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Buyers {
    #[serde(default)]
    pub buyers: Vec<Buyer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Products {
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Transactions {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchasesHistory {
    #[serde(default, rename = "purchasesHistory")]
    pub purchases_history: Vec<PurchaseHistory>,
}
