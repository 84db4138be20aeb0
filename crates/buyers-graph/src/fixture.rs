//! In-memory graph store for tests
//!
//! Answers each query with canned documents looked up by the query's root
//! name and records what was executed. Several documents registered under the
//! same root are served in order; the last one keeps answering.

use crate::{GraphConnection, GraphConnector, GraphQuery};
use async_trait::async_trait;
use buyers_core::{BuyersError, Result};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Shared {
    documents: Mutex<HashMap<String, VecDeque<Vec<u8>>>>,
    executed: Mutex<Vec<GraphQuery>>,
    opened: AtomicUsize,
    closed: AtomicUsize,
}

impl Shared {
    fn answer(&self, root: &str) -> Vec<u8> {
        let empty = || format!(r#"{{"{root}":[]}}"#).into_bytes();

        let Ok(mut documents) = self.documents.lock() else {
            return empty();
        };
        match documents.get_mut(root) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_else(empty),
            Some(queue) => queue.front().cloned().unwrap_or_else(empty),
            None => empty(),
        }
    }
}

/// Canned-document graph store
#[derive(Default)]
pub struct FixtureConnector {
    unreachable: bool,
    shared: Arc<Shared>,
}

impl FixtureConnector {
    /// Empty store; unknown roots answer with an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that refuses every connection
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Queue `document` as an answer for queries rooted at `root`
    pub fn with_document(self, root: &str, document: serde_json::Value) -> Self {
        if let Ok(mut documents) = self.shared.documents.lock() {
            documents
                .entry(root.to_string())
                .or_default()
                .push_back(document.to_string().into_bytes());
        }
        self
    }

    /// Queries executed so far, oldest first
    pub fn executed(&self) -> Vec<GraphQuery> {
        self.shared
            .executed
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    pub fn connections_opened(&self) -> usize {
        self.shared.opened.load(Ordering::SeqCst)
    }

    pub fn connections_closed(&self) -> usize {
        self.shared.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GraphConnector for FixtureConnector {
    async fn connect(&self) -> Result<Box<dyn GraphConnection>> {
        if self.unreachable {
            return Err(BuyersError::GraphUnavailable(
                "fixture store is unreachable".to_string(),
            ));
        }

        self.shared.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FixtureConnection {
            shared: self.shared.clone(),
        }))
    }
}

struct FixtureConnection {
    shared: Arc<Shared>,
}

#[async_trait]
impl GraphConnection for FixtureConnection {
    async fn query(&mut self, query: &GraphQuery) -> Result<Vec<u8>> {
        if let Ok(mut executed) = self.shared.executed.lock() {
            executed.push(query.clone());
        }
        Ok(self.shared.answer(query.name))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.shared.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
