//! Fixed graph query descriptors
//!
//! Every query the service issues is one of the templates below. Callers can
//! only fill in named leaf variables; templates are never assembled from
//! request input.

use serde::Serialize;
use std::collections::BTreeMap;

/// Buyer whose purchase history is loaded at startup
pub const PURCHASE_HISTORY_BUYER_ID: &str = "ad2ba138";

/// A query template plus its named variables.
///
/// Serializes to the `{"query": ..., "variables": ...}` body Dgraph accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphQuery {
    /// Root function name; also the top-level key of the result document
    #[serde(skip)]
    pub name: &'static str,

    #[serde(rename = "query")]
    pub template: &'static str,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
}

impl GraphQuery {
    pub fn new(name: &'static str, template: &'static str) -> Self {
        Self {
            name,
            template,
            variables: BTreeMap::new(),
        }
    }

    /// Bind a string variable (`$id1` and friends)
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Every buyer node
    pub fn all_buyers() -> Self {
        Self::new(
            "buyers",
            r#"
    query myQuery() {
        buyers(func: has(buyer_id)) {
            uid
            buyer_id
            buyer_name
            buyer_age
        }
    }
    "#,
        )
    }

    /// Buyers that made at least one transaction, with their IP
    pub fn real_buyers() -> Self {
        Self::new(
            "buyers",
            r#"
    query myQuery() {
        buyers(func: has(transaction_id)) {
            buyer_id
            buyer_name
            buyer_age
            ip
        }
    }
    "#,
        )
    }

    /// Products bought by [`PURCHASE_HISTORY_BUYER_ID`]
    pub fn purchase_history() -> Self {
        // The buyer id is part of the template, not a variable.
        Self::new(
            "purchasesHistory",
            r#"
    query myQuery() {
        purchasesHistory(func: eq(buyer_id, "ad2ba138")) {
            product {
                product_id
                product_name
                product_price
            }
        }
    }
    "#,
        )
    }

    pub fn all_products() -> Self {
        Self::new(
            "products",
            r#"
    query myQuery() {
        products(func: has(product_id)) {
            uid
            product_id
            product_name
            product_price
        }
    }
    "#,
        )
    }

    pub fn all_transactions() -> Self {
        Self::new(
            "transactions",
            r#"
    query myQuery() {
        transactions(func: has(transaction_id)) {
            uid
            transaction_id
            buyer {
                buyer_id
                buyer_name
                buyer_age
            }
            product {
                product_id
                product_name
                product_price
            }
            ip
            device
        }
    }
    "#,
        )
    }

    /// Buyers that transacted from `ip`
    pub fn buyers_by_ip(ip: &str) -> Self {
        Self::new(
            "getBuyerByIpAddress",
            r#"
    query myQuery($id1: string) {
        getBuyerByIpAddress(func: eq(ip, $id1)) {
            buyer_id
            buyer_name
            buyer_age
        }
    }
    "#,
        )
        .with_var("$id1", ip)
    }

    /// Products bought by buyers of the given age.
    ///
    /// `age` is the decimal string form; Dgraph variables always travel as
    /// strings and are coerced to the declared `int` type by the store.
    pub fn recommendations_by_age(age: &str) -> Self {
        Self::new(
            "productRecom",
            r#"
    query myQuery($id1: int) {
        productRecom(func: eq(buyer_age, $id1)) {
            product {
                product_name
                product_price
            }
        }
    }
    "#,
        )
        .with_var("$id1", age)
    }
}
