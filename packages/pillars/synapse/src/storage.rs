//! Abstract backend storage interface: node upsert,
//! relationship upsert, parameterized query execution, session close.
//! Any engine meeting this shape is acceptable; `InMemoryBackend` is the
//! default and the one exercised by tests. A production deployment
//! would add a `sqlx`-backed implementation of the same trait.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn upsert_node(&self, label: &str, id: &str, props: serde_json::Value) -> Result<(), String>;
    async fn upsert_relationship(
        &self,
        from_id: &str,
        to_id: &str,
        rel_type: &str,
        props: serde_json::Value,
    ) -> Result<(), String>;
    async fn execute(&self, query: &str, params: serde_json::Value) -> Result<(), String>;
    async fn close_session(&self) -> Result<(), String>;
    /// Whether the backend currently reports itself reachable; used by
    /// the retry buffer and the watchdog to decide drain eligibility.
    fn is_reachable(&self) -> bool;
}

/// Reference in-memory backend. Always reachable unless explicitly
/// toggled (used by tests to simulate an outage).
pub struct InMemoryBackend {
    reachable: RwLock<bool>,
    nodes: RwLock<HashMap<String, serde_json::Value>>,
    relationships: RwLock<Vec<(String, String, String, serde_json::Value)>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            reachable: RwLock::new(true),
            nodes: RwLock::new(HashMap::new()),
            relationships: RwLock::new(Vec::new()),
        }
    }

    /// Test/ops hook to simulate a backend outage.
    pub fn set_reachable(&self, reachable: bool) {
        *self.reachable.write() = reachable;
    }

    pub fn node_count(&self) -> usize {
        self.nodes.read().len()
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for InMemoryBackend {
    async fn upsert_node(&self, label: &str, id: &str, props: serde_json::Value) -> Result<(), String> {
        if !*self.reachable.read() {
            return Err("backend unreachable".to_string());
        }
        self.nodes.write().insert(format!("{label}:{id}"), props);
        Ok(())
    }

    async fn upsert_relationship(
        &self,
        from_id: &str,
        to_id: &str,
        rel_type: &str,
        props: serde_json::Value,
    ) -> Result<(), String> {
        if !*self.reachable.read() {
            return Err("backend unreachable".to_string());
        }
        self.relationships
            .write()
            .push((from_id.to_string(), to_id.to_string(), rel_type.to_string(), props));
        Ok(())
    }

    async fn execute(&self, _query: &str, _params: serde_json::Value) -> Result<(), String> {
        if !*self.reachable.read() {
            return Err("backend unreachable".to_string());
        }
        Ok(())
    }

    async fn close_session(&self) -> Result<(), String> {
        Ok(())
    }

    fn is_reachable(&self) -> bool {
        *self.reachable.read()
    }
}
