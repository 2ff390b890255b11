//! The memory graph: NPC nodes, append-only memories, confidence edges,
//! and the outage-resilient `recordMemory` contract.

use aegis_core::{
    ConfidenceEdge, EntityId, MemoryId, MemoryNode, MeshError, MeshTimestamp, NpcBehavioralState,
    NpcId, PlayerAction, QueuedOperation,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::confidence::{action_confidence_delta, decayed_confidence, NEUTRAL};
use crate::decay::{decayed_trauma, DEFAULT_TRAUMA_ALPHA};
use crate::retry_buffer::{RetryBuffer, DEFAULT_CAPACITY, DEFAULT_MAX_AGE};
use crate::storage::StorageBackend;
use crate::wisdom::{rebellion_probability_from_memory, wisdom_score};

/// Aggregated view returned by `get_npc_state`.
#[derive(Debug, Clone)]
pub struct NpcState {
    pub wisdom_score: f64,
    pub trauma_score: f64,
    pub rebellion_probability: f64,
    pub work_efficiency: f64,
    pub morale: f64,
    pub memory_count: usize,
    pub last_event: Option<String>,
}

struct NpcRecord {
    behavioral: NpcBehavioralState,
    memories: Vec<MemoryNode>,
}

pub struct MemoryGraph {
    backend: Arc<dyn StorageBackend>,
    retry_buffer: Arc<RetryBuffer>,
    npcs: RwLock<HashMap<NpcId, NpcRecord>>,
    confidence: RwLock<HashMap<(NpcId, EntityId), ConfidenceEdge>>,
    trauma_alpha: f64,
    confidence_alpha: f64,
}

impl MemoryGraph {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            retry_buffer: Arc::new(RetryBuffer::new(DEFAULT_CAPACITY, DEFAULT_MAX_AGE)),
            npcs: RwLock::new(HashMap::new()),
            confidence: RwLock::new(HashMap::new()),
            trauma_alpha: DEFAULT_TRAUMA_ALPHA,
            confidence_alpha: crate::confidence::DEFAULT_CONFIDENCE_ALPHA,
        }
    }

    pub fn retry_buffer(&self) -> Arc<RetryBuffer> {
        self.retry_buffer.clone()
    }

    pub fn backend(&self) -> Arc<dyn StorageBackend> {
        self.backend.clone()
    }

    fn ensure_npc(&self, npc_id: &NpcId) {
        self.npcs.write().entry(npc_id.clone()).or_insert_with(|| NpcRecord {
            behavioral: NpcBehavioralState::new(npc_id.clone()),
            memories: Vec::new(),
        });
    }

    /// Appends a memory, ensuring the NPC node exists. Transient backend
    /// failures route the write into the retry buffer instead of
    /// failing the caller with fire-and-forget semantics, returning whether
    /// the write was executed or queued; only a buffer-exhausted condition
    /// (impossible here since the buffer evicts, never rejects) would
    /// raise `Backend-Unreachable`.
    pub async fn record_memory(&self, mut memory: MemoryNode) -> Result<&'static str, MeshError> {
        self.ensure_npc(&memory.npc_id);
        memory.raw_trauma_score = memory.trauma_score;

        {
            let mut npcs = self.npcs.write();
            if let Some(record) = npcs.get_mut(&memory.npc_id) {
                record.memories.push(memory.clone());
            }
        }

        let props = serde_json::to_value(&memory).unwrap_or_default();
        match self
            .backend
            .upsert_node("Memory", memory.memory_id.as_str(), props)
            .await
        {
            Ok(()) => Ok("executed"),
            Err(reason) => {
                self.retry_buffer.enqueue(QueuedOperation {
                    query: format!("upsert_node:Memory:{}", memory.memory_id),
                    params: serde_json::to_value(&memory).unwrap_or_default(),
                    enqueued_at: MeshTimestamp::now(),
                });
                tracing::warn!(npc_id = %memory.npc_id, %reason, "memory write queued after backend failure");
                Ok("queued")
            }
        }
    }

    pub fn get_memories(&self, npc_id: &NpcId, limit: usize) -> Vec<MemoryNode> {
        let npcs = self.npcs.read();
        match npcs.get(npc_id) {
            Some(record) => record
                .memories
                .iter()
                .rev()
                .take(limit)
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn get_npc_state(&self, npc_id: &NpcId) -> Option<NpcState> {
        let npcs = self.npcs.read();
        let record = npcs.get(npc_id)?;

        let now = MeshTimestamp::now();
        let decayed: Vec<f64> = record
            .memories
            .iter()
            .map(|m| {
                let hours = now.elapsed_hours_since(&m.timestamp);
                decayed_trauma(m.raw_trauma_score, hours, self.trauma_alpha)
            })
            .collect();
        let avg_trauma = if decayed.is_empty() {
            0.0
        } else {
            decayed.iter().sum::<f64>() / decayed.len() as f64
        };

        let director_confidence = self.get_decayed_confidence(npc_id, &EntityId::director());

        Some(NpcState {
            wisdom_score: wisdom_score(&record.memories),
            trauma_score: avg_trauma,
            rebellion_probability: rebellion_probability_from_memory(avg_trauma, director_confidence),
            work_efficiency: record.behavioral.work_efficiency,
            morale: record.behavioral.morale,
            memory_count: record.memories.len(),
            last_event: record.memories.last().map(|m| m.event.clone()),
        })
    }

    pub fn get_rebellion_probability(&self, npc_id: &NpcId) -> f64 {
        self.get_npc_state(npc_id)
            .map(|s| s.rebellion_probability)
            .unwrap_or(0.0)
    }

    pub fn set_confidence(&self, npc_id: NpcId, entity_id: EntityId, confidence: f64) {
        let edge = ConfidenceEdge {
            npc_id: npc_id.clone(),
            entity_id: entity_id.clone(),
            confidence: confidence.clamp(0.0, 1.0),
            decay_rate: self.confidence_alpha,
            last_updated: MeshTimestamp::now(),
        };
        self.confidence.write().insert((npc_id, entity_id), edge);
    }

    /// Applies an action-driven confidence modifier; creates the edge at
    /// the neutral anchor (0.5) if this is the first write.
    pub fn update_confidence_from_action(
        &self,
        npc_id: NpcId,
        entity_id: EntityId,
        action: PlayerAction,
        intensity: f64,
    ) {
        let delta = action_confidence_delta(action, intensity);
        let mut confidence = self.confidence.write();
        let edge = confidence
            .entry((npc_id.clone(), entity_id.clone()))
            .or_insert_with(|| ConfidenceEdge::new(npc_id, entity_id));
        edge.confidence = (edge.confidence + delta).clamp(0.0, 1.0);
        edge.last_updated = MeshTimestamp::now();
    }

    pub fn get_confidence(&self, npc_id: &NpcId, entity_id: &EntityId) -> Option<f64> {
        self.confidence
            .read()
            .get(&(npc_id.clone(), entity_id.clone()))
            .map(|e| e.confidence)
    }

    pub fn get_confidence_relations(&self, npc_id: &NpcId) -> Vec<ConfidenceEdge> {
        self.confidence
            .read()
            .values()
            .filter(|e| &e.npc_id == npc_id)
            .cloned()
            .collect()
    }

    pub fn get_decayed_confidence(&self, npc_id: &NpcId, entity_id: &EntityId) -> f64 {
        let confidence = self.confidence.read();
        match confidence.get(&(npc_id.clone(), entity_id.clone())) {
            Some(edge) => {
                let hours = MeshTimestamp::now().elapsed_hours_since(&edge.last_updated);
                decayed_confidence(edge.confidence, hours, edge.decay_rate)
            }
            None => NEUTRAL,
        }
    }

    /// Drain-before-shutdown: attempt a final flush; if unreachable,
    /// stop and log rather than blocking termination.
    pub async fn drain_before_shutdown(&self) {
        if self.backend.is_reachable() {
            self.retry_buffer.flush(self.backend.as_ref()).await;
        } else {
            tracing::warn!("backend unreachable at shutdown; retry buffer left intact");
        }
    }

    /// Spawns the auto-flush background task (default interval 5s). The
    /// task exits cleanly once `cancel` fires, propagating the explicit
    /// task-cancel signal a graceful shutdown sends.
    pub fn spawn_auto_flush(
        self: &Arc<Self>,
        interval: Duration,
        cancel: tokio_util::sync::CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        let graph = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        if graph.backend.is_reachable() {
                            graph.retry_buffer.flush(graph.backend.as_ref()).await;
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryBackend;

    fn graph() -> MemoryGraph {
        MemoryGraph::new(Arc::new(InMemoryBackend::new()))
    }

    fn memory(npc_id: &str, trauma: f64) -> MemoryNode {
        MemoryNode {
            memory_id: MemoryId::new(uuid::Uuid::new_v4().to_string()),
            npc_id: NpcId::new(npc_id),
            event: "test_event".to_string(),
            player_action: None,
            wisdom_score: 0.0,
            trauma_score: trauma,
            raw_trauma_score: trauma,
            timestamp: MeshTimestamp::now(),
        }
    }

    #[tokio::test]
    async fn record_memory_creates_npc_node() {
        let g = graph();
        g.record_memory(memory("npc-1", 0.5)).await.unwrap();
        assert!(g.get_npc_state(&NpcId::new("npc-1")).is_some());
    }

    #[tokio::test]
    async fn record_memory_queues_on_backend_outage() {
        let backend = Arc::new(InMemoryBackend::new());
        backend.set_reachable(false);
        let g = MemoryGraph::new(backend);
        let result = g.record_memory(memory("npc-1", 0.5)).await.unwrap();
        assert_eq!(result, "queued");
        assert_eq!(g.retry_buffer().size(), 1);
    }

    #[test]
    fn confidence_defaults_to_neutral_on_first_read() {
        let g = graph();
        let c = g.get_decayed_confidence(&NpcId::new("npc-1"), &EntityId::director());
        assert_eq!(c, NEUTRAL);
    }

    #[test]
    fn action_updates_move_confidence_in_expected_direction() {
        let g = graph();
        g.update_confidence_from_action(
            NpcId::new("npc-1"),
            EntityId::director(),
            PlayerAction::Reward,
            1.0,
        );
        let c = g.get_confidence(&NpcId::new("npc-1"), &EntityId::director()).unwrap();
        assert!(c > NEUTRAL);
    }
}
