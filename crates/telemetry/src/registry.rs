//! Counter registry rendering the Prometheus text exposition format.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use metrics::{Key, KeyName, Label, Level, Metadata, Recorder, SharedString};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

use crate::process::ProcessCollector;
use crate::{MetricsError, Result};

static METADATA: Metadata<'static> =
    Metadata::new(module_path!(), Level::INFO, Some(module_path!()));

/// Declared shape of a registered counter.
#[derive(Debug, Clone)]
struct CounterSchema {
    label_names: Vec<String>,
}

impl CounterSchema {
    /// Orders `labels` by the schema, rejecting missing, extra or repeated keys.
    fn bind(&self, name: &str, labels: &[(&str, &str)]) -> Result<Vec<Label>> {
        let mismatch = || MetricsError::LabelMismatch {
            name: name.to_string(),
            expected: self.label_names.clone(),
            actual: labels.iter().map(|(key, _)| key.to_string()).collect(),
        };

        if labels.len() != self.label_names.len() {
            return Err(mismatch());
        }

        self.label_names
            .iter()
            .map(|label_name| {
                let mut matches = labels.iter().filter(|(key, _)| key == label_name);
                match (matches.next(), matches.next()) {
                    (Some((_, value)), None) => {
                        Ok(Label::new(label_name.clone(), value.to_string()))
                    }
                    _ => Err(mismatch()),
                }
            })
            .collect()
    }
}

/// Registry of default process metrics and custom labelled counters.
///
/// The registry is created once at startup and shared by reference; it is
/// never installed as the global `metrics` recorder. Counter values live in
/// the recorder's atomic storage, so increments and [`serialize`] can run
/// concurrently from any thread.
///
/// [`serialize`]: MetricsRegistry::serialize
pub struct MetricsRegistry {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
    counters: RwLock<HashMap<String, CounterSchema>>,
    process: ProcessCollector,
}

impl MetricsRegistry {
    /// Creates a registry holding only the default process metrics.
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let process = ProcessCollector::new();
        process.describe(&recorder);

        Self {
            recorder,
            handle,
            counters: RwLock::new(HashMap::new()),
            process,
        }
    }

    /// Registers a counter named `name` with a fixed set of label names.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::DuplicateMetric`] if `name` is already taken,
    /// either by a custom counter or by a default process metric.
    pub fn register_counter(&self, name: &str, help: &str, label_names: &[&str]) -> Result<()> {
        let mut counters = self.counters.write().unwrap_or_else(PoisonError::into_inner);
        if counters.contains_key(name) || ProcessCollector::owns(name) {
            return Err(MetricsError::DuplicateMetric {
                name: name.to_string(),
            });
        }

        self.recorder.describe_counter(
            KeyName::from(name.to_string()),
            None,
            SharedString::from(help.to_string()),
        );
        counters.insert(
            name.to_string(),
            CounterSchema {
                label_names: label_names.iter().map(|label| label.to_string()).collect(),
            },
        );

        tracing::debug!(metric = name, labels = ?label_names, "registered counter");
        Ok(())
    }

    /// Increments the counter `name` for the given label combination by one.
    ///
    /// `labels` are `(key, value)` pairs in any order; they must name exactly
    /// the labels declared at registration.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::UnknownMetric`] for an unregistered name and
    /// [`MetricsError::LabelMismatch`] if the label keys differ from the schema.
    pub fn increment(&self, name: &str, labels: &[(&str, &str)]) -> Result<()> {
        self.increment_by(name, labels, 1)
    }

    /// Increments the counter `name` for the given label combination by `value`.
    pub fn increment_by(&self, name: &str, labels: &[(&str, &str)], value: u64) -> Result<()> {
        let bound = {
            let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
            let schema = counters
                .get(name)
                .ok_or_else(|| MetricsError::UnknownMetric {
                    name: name.to_string(),
                })?;
            schema.bind(name, labels)?
        };

        let key = Key::from_parts(name.to_string(), bound);
        self.recorder
            .register_counter(&key, &METADATA)
            .increment(value);
        Ok(())
    }

    /// Renders every metric in the Prometheus text exposition format.
    ///
    /// Default process gauges are refreshed first; custom counters are only
    /// read.
    pub fn serialize(&self) -> String {
        self.process.collect(&self.recorder);
        self.handle.run_upkeep();
        self.handle.render()
    }

    /// Time since the registry was created, the same origin as
    /// `process_uptime_seconds`.
    pub fn uptime(&self) -> Duration {
        self.process.uptime()
    }

    /// Returns the names of all registered counters, sorted.
    pub fn counter_names(&self) -> Vec<String> {
        let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = counters.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MetricsRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsRegistry")
            .field("counters", &self.counter_names())
            .field("process", &self.process)
            .finish_non_exhaustive()
    }
}
