//! Lazily configured counter/gauge/timer families over a `prometheus::Registry`.
//!
//! A `Prom` is built with its registry injected and then configured with
//! `with_counter`, `with_state` and `with_timer`:
//!
//! ```ignore
//! let prom = Prom::new(registry)
//!     .with_counter("demo_queries", "demo http query counter", &["name", "uri", "service_addr"])?;
//! prom.incr("demo_queries", &["/visit", "127.0.0.1:8080"])?;
//! ```
//!
//! Every observation uses the metric name as the leading label value, followed
//! by the extra values. Operations on a family that was never configured are
//! no-ops, and so is every operation on `None::<Prom>` (see [`Recorder`] and
//! [`Configure`]).

use std::sync::Arc;

use prometheus::core::Collector;
use prometheus::proto::{Metric, MetricFamily};
use prometheus::{
    CounterVec, Encoder, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};

use crate::error::{Result, VisitPromError};
use crate::family::{label_values, Family, FamilyKind, FamilySchema};

// Timer buckets are linear: start, width, count.
const TIMER_BUCKET_START: f64 = 0.0;
const TIMER_BUCKET_WIDTH: f64 = 10.0;
const TIMER_BUCKET_COUNT: usize = 1;

#[derive(Clone)]
pub struct Prom {
    registry: Registry,
    counter: Family<CounterVec>,
    state: Family<GaugeVec>,
    timer: Family<HistogramVec>,
}

impl Prom {
    /// Create an unconfigured wrapper that registers its families with `registry`.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            counter: Family::Unset,
            state: Family::Unset,
            timer: Family::Unset,
        }
    }

    /// Wrapper bound to the process-wide default registry.
    pub fn global() -> Self {
        Self::new(prometheus::default_registry().clone())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Configure the counter family. Later calls on the same wrapper are no-ops.
    pub fn with_counter(mut self, name: &str, help: &str, labels: &[&str]) -> Result<Self> {
        let registry = self.registry.clone();
        let schema = FamilySchema::new(FamilyKind::Counter, name, help, labels);
        let configured = self.counter.configure(schema, |schema| {
            let vec = CounterVec::new(Opts::new(&schema.name, &schema.help), labels)
                .map_err(|source| registration_error(schema, source))?;
            register(&registry, schema, vec.clone())?;
            Ok(vec)
        })?;
        log_configure(FamilyKind::Counter, name, configured);
        Ok(self)
    }

    /// Configure the gauge family. Later calls on the same wrapper are no-ops.
    pub fn with_state(mut self, name: &str, help: &str, labels: &[&str]) -> Result<Self> {
        let registry = self.registry.clone();
        let schema = FamilySchema::new(FamilyKind::Gauge, name, help, labels);
        let configured = self.state.configure(schema, |schema| {
            let vec = GaugeVec::new(Opts::new(&schema.name, &schema.help), labels)
                .map_err(|source| registration_error(schema, source))?;
            register(&registry, schema, vec.clone())?;
            Ok(vec)
        })?;
        log_configure(FamilyKind::Gauge, name, configured);
        Ok(self)
    }

    /// Configure the timer (histogram) family. Later calls on the same wrapper are no-ops.
    pub fn with_timer(mut self, name: &str, help: &str, labels: &[&str]) -> Result<Self> {
        let registry = self.registry.clone();
        let schema = FamilySchema::new(FamilyKind::Timer, name, help, labels);
        let configured = self.timer.configure(schema, |schema| {
            let buckets =
                prometheus::linear_buckets(TIMER_BUCKET_START, TIMER_BUCKET_WIDTH, TIMER_BUCKET_COUNT)?;
            let opts = HistogramOpts::new(&schema.name, &schema.help).buckets(buckets);
            let vec = HistogramVec::new(opts, labels)
                .map_err(|source| registration_error(schema, source))?;
            register(&registry, schema, vec.clone())?;
            Ok(vec)
        })?;
        log_configure(FamilyKind::Timer, name, configured);
        Ok(self)
    }

    pub fn counter_schema(&self) -> Option<&FamilySchema> {
        self.counter.schema()
    }

    pub fn state_schema(&self) -> Option<&FamilySchema> {
        self.state.schema()
    }

    pub fn timer_schema(&self) -> Option<&FamilySchema> {
        self.timer.schema()
    }

    /// Increment the counter for `[name] + extra` by one.
    pub fn incr(&self, name: &str, extra: &[&str]) -> Result<()> {
        let Family::Configured { schema, vec } = &self.counter else {
            return Ok(());
        };
        let values = label_values(schema, name, extra)?;
        vec.get_metric_with_label_values(&values)?.inc();
        Ok(())
    }

    /// Add `v` to the counter for `[name] + extra`.
    ///
    /// `v` must be > 0. This is not checked here; the value goes to the
    /// collector as is.
    ///
    /// # Panics
    ///
    /// In debug builds the collector asserts on a negative `v` and panics.
    /// Release builds apply it, decreasing the counter.
    pub fn add(&self, name: &str, v: i64, extra: &[&str]) -> Result<()> {
        let Family::Configured { schema, vec } = &self.counter else {
            return Ok(());
        };
        let values = label_values(schema, name, extra)?;
        vec.get_metric_with_label_values(&values)?.inc_by(v as f64);
        Ok(())
    }

    /// Set the gauge for `[name] + extra` to `v`.
    pub fn set_state(&self, name: &str, v: i64, extra: &[&str]) -> Result<()> {
        let Family::Configured { schema, vec } = &self.state else {
            return Ok(());
        };
        let values = label_values(schema, name, extra)?;
        vec.get_metric_with_label_values(&values)?.set(v as f64);
        Ok(())
    }

    /// Record a timing in milliseconds for `[name] + extra`.
    pub fn timing(&self, name: &str, millis: i64, extra: &[&str]) -> Result<()> {
        let Family::Configured { schema, vec } = &self.timer else {
            return Ok(());
        };
        let values = label_values(schema, name, extra)?;
        vec.get_metric_with_label_values(&values)?.observe(millis as f64);
        Ok(())
    }

    /// Drop every series of the counter family.
    pub fn reset_counter(&self) {
        if let Some(vec) = self.counter.vec() {
            vec.reset();
        }
    }

    /// Drop every series of the gauge family.
    pub fn reset_state(&self) {
        if let Some(vec) = self.state.vec() {
            vec.reset();
        }
    }

    /// Current counter value for `[name] + extra`; `None` when no counter is configured.
    ///
    /// Reads do not create series: an unobserved tuple reads as zero.
    pub fn counter_value(&self, name: &str, extra: &[&str]) -> Result<Option<f64>> {
        let Family::Configured { schema, vec } = &self.counter else {
            return Ok(None);
        };
        let values = label_values(schema, name, extra)?;
        let value = find_metric(&vec.collect(), schema, &values)
            .map(|m| m.get_counter().get_value())
            .unwrap_or(0.0);
        Ok(Some(value))
    }

    /// Current gauge value for `[name] + extra`; `None` when no gauge is configured.
    pub fn state_value(&self, name: &str, extra: &[&str]) -> Result<Option<f64>> {
        let Family::Configured { schema, vec } = &self.state else {
            return Ok(None);
        };
        let values = label_values(schema, name, extra)?;
        let value = find_metric(&vec.collect(), schema, &values)
            .map(|m| m.get_gauge().get_value())
            .unwrap_or(0.0);
        Ok(Some(value))
    }

    /// Number of timings recorded for `[name] + extra`; `None` when no timer is configured.
    pub fn timer_count(&self, name: &str, extra: &[&str]) -> Result<Option<u64>> {
        let Family::Configured { schema, vec } = &self.timer else {
            return Ok(None);
        };
        let values = label_values(schema, name, extra)?;
        let count = find_metric(&vec.collect(), schema, &values)
            .map(|m| m.get_histogram().get_sample_count())
            .unwrap_or(0);
        Ok(Some(count))
    }
}

/// Observation and read surface shared by `Prom` and anything that may hold one.
///
/// Implementors only say where the wrapper is, if anywhere. Every operation
/// on an absent wrapper (`None::<Prom>`) is a silent no-op: mutators return
/// `Ok(())`, readers return `None`.
pub trait Recorder {
    fn as_prom(&self) -> Option<&Prom>;

    fn incr(&self, name: &str, extra: &[&str]) -> Result<()> {
        self.as_prom().map_or(Ok(()), |p| Prom::incr(p, name, extra))
    }

    /// See [`Prom::add`]; the same caller contract and debug-build panic apply.
    fn add(&self, name: &str, v: i64, extra: &[&str]) -> Result<()> {
        self.as_prom().map_or(Ok(()), |p| Prom::add(p, name, v, extra))
    }

    fn set_state(&self, name: &str, v: i64, extra: &[&str]) -> Result<()> {
        self.as_prom().map_or(Ok(()), |p| Prom::set_state(p, name, v, extra))
    }

    fn timing(&self, name: &str, millis: i64, extra: &[&str]) -> Result<()> {
        self.as_prom().map_or(Ok(()), |p| Prom::timing(p, name, millis, extra))
    }

    fn reset_counter(&self) {
        if let Some(p) = self.as_prom() {
            Prom::reset_counter(p);
        }
    }

    fn reset_state(&self) {
        if let Some(p) = self.as_prom() {
            Prom::reset_state(p);
        }
    }

    fn counter_schema(&self) -> Option<&FamilySchema> {
        self.as_prom().and_then(Prom::counter_schema)
    }

    fn state_schema(&self) -> Option<&FamilySchema> {
        self.as_prom().and_then(Prom::state_schema)
    }

    fn timer_schema(&self) -> Option<&FamilySchema> {
        self.as_prom().and_then(Prom::timer_schema)
    }

    fn counter_value(&self, name: &str, extra: &[&str]) -> Result<Option<f64>> {
        self.as_prom().map_or(Ok(None), |p| Prom::counter_value(p, name, extra))
    }

    fn state_value(&self, name: &str, extra: &[&str]) -> Result<Option<f64>> {
        self.as_prom().map_or(Ok(None), |p| Prom::state_value(p, name, extra))
    }

    fn timer_count(&self, name: &str, extra: &[&str]) -> Result<Option<u64>> {
        self.as_prom().map_or(Ok(None), |p| Prom::timer_count(p, name, extra))
    }
}

impl Recorder for Prom {
    fn as_prom(&self) -> Option<&Prom> {
        Some(self)
    }
}

impl<R: Recorder + ?Sized> Recorder for &R {
    fn as_prom(&self) -> Option<&Prom> {
        (**self).as_prom()
    }
}

impl<R: Recorder + ?Sized> Recorder for Arc<R> {
    fn as_prom(&self) -> Option<&Prom> {
        (**self).as_prom()
    }
}

impl<R: Recorder> Recorder for Option<R> {
    fn as_prom(&self) -> Option<&Prom> {
        self.as_ref().and_then(|r| r.as_prom())
    }
}

/// Builder-style configuration that also works on an absent wrapper.
///
/// For `Option<Prom>`, `None` stays `None` and nothing is registered.
pub trait Configure: Sized {
    fn with_counter(self, name: &str, help: &str, labels: &[&str]) -> Result<Self>;
    fn with_state(self, name: &str, help: &str, labels: &[&str]) -> Result<Self>;
    fn with_timer(self, name: &str, help: &str, labels: &[&str]) -> Result<Self>;
}

impl Configure for Prom {
    fn with_counter(self, name: &str, help: &str, labels: &[&str]) -> Result<Self> {
        Prom::with_counter(self, name, help, labels)
    }
    fn with_state(self, name: &str, help: &str, labels: &[&str]) -> Result<Self> {
        Prom::with_state(self, name, help, labels)
    }
    fn with_timer(self, name: &str, help: &str, labels: &[&str]) -> Result<Self> {
        Prom::with_timer(self, name, help, labels)
    }
}

impl<C: Configure> Configure for Option<C> {
    fn with_counter(self, name: &str, help: &str, labels: &[&str]) -> Result<Self> {
        self.map(|c| c.with_counter(name, help, labels)).transpose()
    }
    fn with_state(self, name: &str, help: &str, labels: &[&str]) -> Result<Self> {
        self.map(|c| c.with_state(name, help, labels)).transpose()
    }
    fn with_timer(self, name: &str, help: &str, labels: &[&str]) -> Result<Self> {
        self.map(|c| c.with_timer(name, help, labels)).transpose()
    }
}

/// Encode every family in `registry` in the Prometheus text exposition format.
pub fn encode_text(registry: &Registry) -> Result<String> {
    let mut buf = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buf)?;
    String::from_utf8(buf).map_err(|e| VisitPromError::Internal(format!("exposition not utf-8: {e}")))
}

fn register<C>(registry: &Registry, schema: &FamilySchema, collector: C) -> Result<()>
where
    C: Collector + 'static,
{
    registry
        .register(Box::new(collector))
        .map_err(|source| registration_error(schema, source))
}

fn registration_error(schema: &FamilySchema, source: prometheus::Error) -> VisitPromError {
    VisitPromError::Registration {
        name: schema.name.clone(),
        source,
    }
}

fn log_configure(kind: FamilyKind, name: &str, configured: bool) {
    if configured {
        tracing::debug!(kind = kind.as_str(), family = name, "metric family registered");
    } else {
        tracing::debug!(kind = kind.as_str(), family = name, "metric family already configured, ignoring");
    }
}

// Collected label pairs are sorted by name, so match by name rather than position.
fn find_metric<'a>(
    families: &'a [MetricFamily],
    schema: &FamilySchema,
    values: &[&str],
) -> Option<&'a Metric> {
    families.iter().flat_map(|mf| mf.get_metric()).find(|m| {
        let pairs = m.get_label();
        pairs.len() == values.len()
            && schema.label_names.iter().zip(values).all(|(n, v)| {
                pairs
                    .iter()
                    .any(|p| p.get_name() == n.as_str() && p.get_value() == *v)
            })
    })
}
