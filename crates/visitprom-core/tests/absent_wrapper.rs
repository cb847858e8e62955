//! Operations through `Recorder` on an absent wrapper are silent no-ops.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use prometheus::Registry;
use visitprom_core::{Configure, Prom, Recorder};

fn exercise<R: Recorder>(r: &R) {
    r.incr("demo_queries", &["/a", "svc"]).unwrap();
    r.add("demo_queries", 2, &["/a", "svc"]).unwrap();
    r.set_state("demo_queries", 1, &["/a", "svc"]).unwrap();
    r.timing("demo_queries", 5, &["/a", "svc"]).unwrap();
    r.reset_state();
}

#[test]
fn none_is_a_noop() {
    let absent: Option<Prom> = None;
    exercise(&absent);
    absent.reset_counter();

    let absent_ref: Option<&Prom> = None;
    exercise(&absent_ref);
}

#[test]
fn none_reads_as_absent() {
    let absent: Option<Prom> = None;

    assert!(absent.counter_schema().is_none());
    assert!(absent.state_schema().is_none());
    assert!(absent.timer_schema().is_none());
    assert_eq!(absent.counter_value("demo_queries", &["/a", "svc"]).unwrap(), None);
    assert_eq!(absent.state_value("demo_queries", &[]).unwrap(), None);
    assert_eq!(absent.timer_count("demo_queries", &[]).unwrap(), None);
}

#[test]
fn configuring_none_registers_nothing() {
    let absent: Option<Prom> = None;
    let still_absent = absent
        .with_counter("demo_queries", "demo", &["name", "uri", "service_addr"])
        .unwrap()
        .with_state("demo_state", "gauge", &["name"])
        .unwrap()
        .with_timer("demo_timing", "timer", &["name"])
        .unwrap();

    assert!(still_absent.is_none());
    assert!(prometheus::default_registry()
        .gather()
        .iter()
        .all(|mf| mf.get_name() != "demo_state" && mf.get_name() != "demo_timing"));
}

#[test]
fn configuring_some_configures_the_wrapper() {
    let registry = Registry::new();
    let present = Some(Prom::new(registry.clone()))
        .with_counter("demo_queries", "demo", &["name", "uri", "service_addr"])
        .unwrap();

    present.incr("demo_queries", &["/a", "svc"]).unwrap();
    assert_eq!(present.counter_schema().unwrap().name, "demo_queries");
    assert_eq!(
        present.counter_value("demo_queries", &["/a", "svc"]).unwrap(),
        Some(1.0)
    );
}

#[test]
fn some_forwards_to_the_wrapper() {
    let prom = Prom::new(Registry::new())
        .with_counter("demo_queries", "demo", &["name", "uri", "service_addr"])
        .unwrap();
    let present = Some(Arc::new(prom.clone()));
    exercise(&present);

    assert_eq!(prom.counter_value("demo_queries", &["/a", "svc"]).unwrap(), Some(3.0));

    present.reset_counter();
    assert_eq!(prom.counter_value("demo_queries", &["/a", "svc"]).unwrap(), Some(0.0));
}
