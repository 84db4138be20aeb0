//! Buyers Graph - Graph store access
//!
//! Provides the connection seam over the graph database (Dgraph), the fixed
//! query descriptors, and the repository that runs them.

use async_trait::async_trait;
use buyers_core::Result;

pub mod dgraph_store;
pub mod query;
pub mod repository;

#[cfg(any(test, feature = "test-utils"))]
pub mod fixture;

pub use dgraph_store::DgraphHttpConnector;
pub use query::GraphQuery;
pub use repository::GraphRepository;

/// Opens connections to a graph store.
///
/// Every query runs on its own connection; connections are never pooled or
/// shared between callers.
#[async_trait]
pub trait GraphConnector: Send + Sync {
    /// Open a fresh connection
    async fn connect(&self) -> Result<Box<dyn GraphConnection>>;
}

/// A single open connection to the graph store
#[async_trait]
pub trait GraphConnection: Send {
    /// Execute a query and return the JSON document the store produced,
    /// keyed by the query's root function name
    async fn query(&mut self, query: &GraphQuery) -> Result<Vec<u8>>;

    /// Close the connection
    async fn close(self: Box<Self>) -> Result<()>;
}
