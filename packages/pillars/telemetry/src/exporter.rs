//! Engine-agnostic adapter fan-out: a detect/register/lookup registry of
//! exporters, each deciding for itself which envelopes it accepts.
//! Concrete transformations are exporter-local; two reference exporters
//! are provided.

use aegis_core::Envelope;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("exporter {exporter} does not accept channel {channel}")]
    NotAccepted { exporter: &'static str, channel: String },
}

pub trait Exporter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this exporter has a transformation for `envelope`'s
    /// channel. Registries skip exporters that don't accept a given
    /// envelope rather than erroring.
    fn accepts(&self, envelope: &Envelope) -> bool;

    fn export(&self, envelope: &Envelope) -> Result<serde_json::Value, ExportError>;
}

/// Signal / node-property reference exporter: represents every envelope
/// as a named signal emission plus a flat property-bag update on a
/// node path, the shape a signal-and-node-tree engine consumes.
pub struct SignalNodePropertyExporter;

impl Exporter for SignalNodePropertyExporter {
    fn name(&self) -> &'static str {
        "signal-node-property"
    }

    fn accepts(&self, _envelope: &Envelope) -> bool {
        true
    }

    fn export(&self, envelope: &Envelope) -> Result<serde_json::Value, ExportError> {
        Ok(serde_json::json!({
            "signal": envelope.channel,
            "node_path": format!("/root/Mesh/{}", envelope.channel),
            "properties": envelope.data,
            "emitted_at": envelope.timestamp.iso8601(),
        }))
    }
}

/// Struct / blackboard / morph-target reference exporter: represents
/// every envelope as a blackboard key update plus an optional
/// morph-target weight derived from rebellion-style payloads, the shape
/// an actor/blueprint engine consumes.
pub struct StructBlackboardExporter;

impl Exporter for StructBlackboardExporter {
    fn name(&self) -> &'static str {
        "struct-blackboard-morph"
    }

    fn accepts(&self, _envelope: &Envelope) -> bool {
        true
    }

    fn export(&self, envelope: &Envelope) -> Result<serde_json::Value, ExportError> {
        let morph_weight = envelope
            .data
            .get("probability")
            .and_then(|v| v.as_f64())
            .map(|p| p.clamp(0.0, 1.0));

        Ok(serde_json::json!({
            "blackboard_key": envelope.channel,
            "struct": envelope.data,
            "morph_targets": { "distress": morph_weight.unwrap_or(0.0) },
        }))
    }
}

pub struct ExporterRegistry {
    exporters: RwLock<Vec<Arc<dyn Exporter>>>,
}

impl ExporterRegistry {
    pub fn new() -> Self {
        Self {
            exporters: RwLock::new(Vec::new()),
        }
    }

    pub fn register(&self, exporter: Arc<dyn Exporter>) {
        tracing::info!(exporter = exporter.name(), "registered telemetry exporter");
        self.exporters.write().push(exporter);
    }

    /// Fans `envelope` out to every registered exporter that accepts it.
    /// Per-exporter errors are swallowed and logged so one broken
    /// exporter never affects another.
    pub fn export_all(&self, envelope: &Envelope) -> Vec<(&'static str, serde_json::Value)> {
        let exporters = self.exporters.read();
        exporters
            .iter()
            .filter(|e| e.accepts(envelope))
            .filter_map(|e| match e.export(envelope) {
                Ok(value) => Some((e.name(), value)),
                Err(err) => {
                    tracing::warn!(exporter = e.name(), error = %err, "exporter failed");
                    None
                }
            })
            .collect()
    }

    /// Reference registry with both shipped exporters registered.
    pub fn with_reference_exporters() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(SignalNodePropertyExporter));
        registry.register(Arc::new(StructBlackboardExporter));
        registry
    }
}

impl Default for ExporterRegistry {
    fn default() -> Self {
        Self::with_reference_exporters()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope() -> Envelope {
        Envelope::new("rebellion-alerts", serde_json::json!({"probability": 0.9}))
    }

    #[test]
    fn both_reference_exporters_transform_the_same_envelope() {
        let registry = ExporterRegistry::default();
        let outputs = registry.export_all(&envelope());
        assert_eq!(outputs.len(), 2);
        let names: Vec<_> = outputs.iter().map(|(n, _)| *n).collect();
        assert!(names.contains(&"signal-node-property"));
        assert!(names.contains(&"struct-blackboard-morph"));
    }

    #[test]
    fn blackboard_exporter_derives_morph_weight_from_probability() {
        let exporter = StructBlackboardExporter;
        let out = exporter.export(&envelope()).unwrap();
        assert_eq!(out["morph_targets"]["distress"], 0.9);
    }
}
