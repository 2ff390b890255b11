use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use aegis_arbiter::{BehaviorRegistry, InProcessBehaviorEngineClient};
use aegis_gate::{AuditLog, Pipeline};
use aegis_nexus::ProviderRegistry;
use aegis_synapse::MemoryGraph;
use aegis_telemetry::{Bus, ExporterRegistry};
use aegis_watchdog::{PhoenixRecovery, RecoveryLog, RestartExecutor};
use async_trait::async_trait;

pub struct AppState {
    pub providers: Arc<ProviderRegistry>,
    pub behavior_registry: Arc<BehaviorRegistry>,
    pub memory_graph: Arc<MemoryGraph>,
    pub pipeline: Arc<Pipeline>,
    pub bus: Arc<Bus>,
    pub audit: Arc<AuditLog>,
    pub exporters: Arc<ExporterRegistry>,
    pub phoenix: Arc<PhoenixRecovery>,
    pub started_at: aegis_core::MeshTimestamp,
    pub events_received: AtomicU64,
}

/// Recovery executor for the in-process deployment: nothing external to
/// actually spawn, so "restart" just logs and reports success. A real
/// deployment swaps this for a process-manager or container client.
struct NoopRestartExecutor;

#[async_trait]
impl RestartExecutor for NoopRestartExecutor {
    async fn restart(&self, service: &str) -> Result<(), String> {
        tracing::info!(service, "phoenix recovery: restart acknowledged (no-op executor)");
        Ok(())
    }
}

impl AppState {
    pub fn new(recovery_log_path: std::path::PathBuf) -> Self {
        let backend = Arc::new(aegis_synapse::InMemoryBackend::new());
        let memory_graph = Arc::new(MemoryGraph::new(backend.clone()));
        let behavior_registry = Arc::new(BehaviorRegistry::default());
        let providers = Arc::new(ProviderRegistry::default());
        let bus = Arc::new(Bus::default());
        let audit = Arc::new(AuditLog::default());
        let behavior_client = Arc::new(InProcessBehaviorEngineClient::new(behavior_registry.clone()));

        let pipeline = Arc::new(Pipeline::new(
            providers.clone(),
            behavior_client,
            bus.clone(),
            audit.clone(),
        ));

        let phoenix = Arc::new(PhoenixRecovery::new(
            memory_graph.retry_buffer(),
            backend,
            Arc::new(NoopRestartExecutor),
            Arc::new(RecoveryLog::new(recovery_log_path)),
        ));

        Self {
            providers,
            behavior_registry,
            memory_graph,
            pipeline,
            bus,
            audit,
            exporters: Arc::new(ExporterRegistry::with_reference_exporters()),
            phoenix,
            started_at: aegis_core::MeshTimestamp::now(),
            events_received: AtomicU64::new(0),
        }
    }

    pub fn record_event_received(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }
}
