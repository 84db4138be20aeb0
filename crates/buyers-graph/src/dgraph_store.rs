//! Dgraph implementation of the graph store connection
//!
//! Talks to the Dgraph alpha HTTP endpoint (`POST /query`). Each connection
//! owns its own HTTP client with idle pooling disabled, so closing the
//! connection releases the socket.
//!
//! Author: Buyers API Team

use crate::{GraphConnection, GraphConnector, GraphQuery};
use async_trait::async_trait;
use buyers_core::{BuyersError, GraphConfig, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::value::RawValue;

/// Dgraph HTTP connector
#[derive(Debug, Clone)]
pub struct DgraphHttpConnector {
    endpoint: String,
}

impl DgraphHttpConnector {
    /// Create a connector for the configured alpha node
    pub fn new(config: &GraphConfig) -> Self {
        Self {
            endpoint: format!("{}/query", config.url.trim_end_matches('/')),
        }
    }

    /// Query endpoint this connector posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GraphConnector for DgraphHttpConnector {
    async fn connect(&self) -> Result<Box<dyn GraphConnection>> {
        let client = Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| BuyersError::GraphUnavailable(format!("Dgraph client setup failed: {e}")))?;

        Ok(Box::new(DgraphHttpConnection {
            client,
            endpoint: self.endpoint.clone(),
        }))
    }
}

/// One open connection to a Dgraph alpha
pub struct DgraphHttpConnection {
    client: Client,
    endpoint: String,
}

#[async_trait]
impl GraphConnection for DgraphHttpConnection {
    async fn query(&mut self, query: &GraphQuery) -> Result<Vec<u8>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(query)
            .send()
            .await
            .map_err(|e| BuyersError::GraphUnavailable(format!("Dgraph request failed: {e}")))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| BuyersError::GraphUnavailable(format!("Dgraph response read failed: {e}")))?;

        if !status.is_success() {
            return Err(BuyersError::Query(format!(
                "Dgraph returned {status}: {}",
                String::from_utf8_lossy(&body)
            )));
        }

        extract_data(&body)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        drop(self.client);
        Ok(())
    }
}

/// Dgraph HTTP response envelope
#[derive(Debug, Deserialize)]
struct DgraphResponse {
    data: Option<Box<RawValue>>,
    #[serde(default)]
    errors: Vec<DgraphError>,
}

#[derive(Debug, Deserialize)]
struct DgraphError {
    message: String,
}

/// Pull the `data` document out of a Dgraph response, byte for byte
fn extract_data(body: &[u8]) -> Result<Vec<u8>> {
    let response: DgraphResponse = serde_json::from_slice(body)?;

    if !response.errors.is_empty() {
        let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
        return Err(BuyersError::Query(messages.join("; ")));
    }

    response
        .data
        .map(|data| data.get().as_bytes().to_vec())
        .ok_or_else(|| BuyersError::Query("Dgraph response carried no data".to_string()))
}
