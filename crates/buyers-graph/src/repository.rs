//! Data access over the graph store
//!
//! Each method opens a connection, runs exactly one fixed query, and closes
//! the connection again. The startup listings decode into typed records; the
//! two lookups decode only to check the document shape and hand back the raw
//! bytes the store produced.

use crate::{GraphConnector, GraphQuery};
use buyers_core::{
    Buyer, Buyers, Product, Products, PurchaseHistory, PurchasesHistory, Result, Transaction,
    Transactions,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs the service's fixed queries against a graph store
#[derive(Clone)]
pub struct GraphRepository {
    connector: Arc<dyn GraphConnector>,
}

/// Shape of the buyers-by-IP document
#[derive(Debug, Deserialize)]
struct BuyersByIp {
    #[serde(rename = "getBuyerByIpAddress", default)]
    buyers: Vec<Buyer>,
}

/// Shape of the recommendations document
#[derive(Debug, Deserialize)]
struct ProductRecommendations {
    #[serde(rename = "productRecom", default)]
    recommendations: Vec<PurchaseHistory>,
}

impl GraphRepository {
    pub fn new(connector: Arc<dyn GraphConnector>) -> Self {
        Self { connector }
    }

    /// Open a connection, run one query, close the connection
    async fn execute(&self, query: &GraphQuery) -> Result<Vec<u8>> {
        debug!(query = query.name, "executing graph query");

        let mut conn = self.connector.connect().await?;
        let result = conn.query(query).await;

        if let Err(e) = conn.close().await {
            warn!(query = query.name, error = %e, "error while closing graph connection");
        }

        result
    }

    /// All buyer nodes
    pub async fn buyers(&self) -> Result<Vec<Buyer>> {
        let doc = self.execute(&GraphQuery::all_buyers()).await?;
        let container: Buyers = serde_json::from_slice(&doc)?;
        Ok(container.buyers)
    }

    /// Buyers with at least one transaction
    pub async fn real_buyers(&self) -> Result<Vec<Buyer>> {
        let doc = self.execute(&GraphQuery::real_buyers()).await?;
        let container: Buyers = serde_json::from_slice(&doc)?;
        Ok(container.buyers)
    }

    /// Purchase history of the fixed history buyer
    pub async fn purchases_history(&self) -> Result<Vec<PurchaseHistory>> {
        let doc = self.execute(&GraphQuery::purchase_history()).await?;
        let container: PurchasesHistory = serde_json::from_slice(&doc)?;
        Ok(container.purchases_history)
    }

    pub async fn products(&self) -> Result<Vec<Product>> {
        let doc = self.execute(&GraphQuery::all_products()).await?;
        let container: Products = serde_json::from_slice(&doc)?;
        Ok(container.products)
    }

    pub async fn transactions(&self) -> Result<Vec<Transaction>> {
        let doc = self.execute(&GraphQuery::all_transactions()).await?;
        let container: Transactions = serde_json::from_slice(&doc)?;
        Ok(container.transactions)
    }

    /// Raw `{"getBuyerByIpAddress": [...]}` document for `ip`
    pub async fn buyers_by_ip(&self, ip: &str) -> Result<Vec<u8>> {
        let doc = self.execute(&GraphQuery::buyers_by_ip(ip)).await?;
        let shape: BuyersByIp = serde_json::from_slice(&doc)?;
        debug!(count = shape.buyers.len(), "buyers sharing ip");
        Ok(doc)
    }

    /// Raw `{"productRecom": [...]}` document for buyers aged `age`
    pub async fn recommendations_by_age(&self, age: &str) -> Result<Vec<u8>> {
        let doc = self.execute(&GraphQuery::recommendations_by_age(age)).await?;
        let shape: ProductRecommendations = serde_json::from_slice(&doc)?;
        debug!(count = shape.recommendations.len(), "recommendation groups");
        Ok(doc)
    }
}
