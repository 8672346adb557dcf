//! Prometheus counters for the write paths.

use std::sync::Arc;

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::registry::Registry;

#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    pub entries_logged: Counter,
    pub reactions_toggled: Counter,
    pub flags_toggled: Counter,
    pub comments_added: Counter,
    pub comments_deleted: Counter,
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();
        let entries_logged = Counter::default();
        let reactions_toggled = Counter::default();
        let flags_toggled = Counter::default();
        let comments_added = Counter::default();
        let comments_deleted = Counter::default();

        registry.register("entries_logged", "Contest entries logged", entries_logged.clone());
        registry.register("reactions_toggled", "Reaction toggles applied", reactions_toggled.clone());
        registry.register("flags_toggled", "Fishy flag toggles applied", flags_toggled.clone());
        registry.register("comments_added", "Comments created", comments_added.clone());
        registry.register("comments_deleted", "Comments deleted", comments_deleted.clone());

        Self {
            registry: Arc::new(registry),
            entries_logged,
            reactions_toggled,
            flags_toggled,
            comments_added,
            comments_deleted,
        }
    }

    /// Text exposition for the `/metrics` endpoint.
    pub fn render(&self) -> String {
        let mut buf = String::new();
        // encoding only fails on a formatter error, which String never gives
        let _ = encode(&mut buf, &self.registry);
        buf
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
