//! Application state management
//!
//! The snapshot is loaded once before the server starts and is read-only
//! afterwards, so handlers share it without locking.
//!
//! Author: Buyers API Team

use buyers_core::{Buyer, BuyersError, Product, PurchaseHistory, Result, Transaction};
use buyers_graph::GraphRepository;
use std::time::Instant;
use tracing::info;

/// Records loaded from the graph store at startup
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Every buyer node
    pub buyers: Vec<Buyer>,
    /// Buyers with at least one transaction; fetched independently of `buyers`
    pub real_buyers: Vec<Buyer>,
    /// Purchase history of the fixed history buyer
    pub purchases_history: Vec<PurchaseHistory>,
    pub products: Vec<Product>,
    pub transactions: Vec<Transaction>,
}

impl Snapshot {
    /// Run the startup queries one after another; the first failure aborts
    pub async fn load(repository: &GraphRepository) -> Result<Self> {
        let buyers = repository.buyers().await?;
        info!(count = buyers.len(), "loaded buyers");

        let real_buyers = repository.real_buyers().await?;
        info!(count = real_buyers.len(), "loaded real buyers");

        let purchases_history = repository.purchases_history().await?;
        info!(count = purchases_history.len(), "loaded purchase history");

        let products = repository.products().await?;
        info!(count = products.len(), "loaded products");

        let transactions = repository.transactions().await?;
        info!(count = transactions.len(), "loaded transactions");

        Ok(Self {
            buyers,
            real_buyers,
            purchases_history,
            products,
            transactions,
        })
    }

    /// First real buyer with the given external id
    pub fn real_buyer(&self, buyer_id: &str) -> Result<&Buyer> {
        self.real_buyers
            .iter()
            .find(|b| b.id == buyer_id)
            .ok_or_else(|| BuyersError::NotFound(format!("realbuyer {buyer_id}")))
    }
}

/// Application state shared across handlers
pub struct AppState {
    /// Startup snapshot
    pub snapshot: Snapshot,
    /// Graph access for the per-request lookups
    pub repository: GraphRepository,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    pub fn new(snapshot: Snapshot, repository: GraphRepository) -> Self {
        Self {
            snapshot,
            repository,
            start_time: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buyers_graph::fixture::FixtureConnector;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_load_runs_five_queries_in_order() {
        let connector = Arc::new(FixtureConnector::new());
        let repository = GraphRepository::new(connector.clone());

        Snapshot::load(&repository).await.unwrap();

        let roots: Vec<&str> = connector.executed().iter().map(|q| q.name).collect();
        assert_eq!(
            roots,
            vec!["buyers", "buyers", "purchasesHistory", "products", "transactions"]
        );
    }

    #[tokio::test]
    async fn test_load_fails_when_store_unreachable() {
        let repository = GraphRepository::new(Arc::new(FixtureConnector::unreachable()));
        assert!(Snapshot::load(&repository).await.is_err());
    }

    #[test]
    fn test_real_buyer_lookup() {
        let snapshot = Snapshot {
            real_buyers: vec![Buyer {
                id: "b1".to_string(),
                ip: "1.2.3.4".to_string(),
                ..Buyer::default()
            }],
            ..Snapshot::default()
        };

        assert_eq!(snapshot.real_buyer("b1").unwrap().ip, "1.2.3.4");
        assert!(matches!(
            snapshot.real_buyer("missing"),
            Err(BuyersError::NotFound(_))
        ));
    }
}
