#![allow(dead_code)]

use parking_lot::Mutex;
use std::io;
use std::sync::Arc;
use strata_kernel::{Class, Registry};
use tracing_subscriber::fmt::MakeWriter;

/// Collects formatted log lines in memory.
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

#[derive(Debug)]
pub struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter(Arc::clone(&self.0))
    }
}

/// Runs `f` under a thread-scoped subscriber and returns its result with the log output.
pub fn capture<R>(f: impl FnOnce() -> R) -> (R, String) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let output = String::from_utf8_lossy(&logs.0.lock()).into_owned();
    (result, output)
}

/// `A` with implementations `A1 { m = 3 }` and `A2 { n = "2" }`, and
/// `B { a: A, a_class_type = "A2" }`, on a private registry.
pub struct ScenarioA {
    pub registry: Registry,
    pub a: Class,
    pub a1: Class,
    pub a2: Class,
    pub b: Class,
}

pub fn scenario_a() -> ScenarioA {
    let registry = Registry::new();
    let a = Class::replaceable("A").build();
    let a1 = registry.register(Class::extends(&a, "A1").field("m", 3).build()).expect("A1 registers");
    let a2 = registry.register(Class::extends(&a, "A2").field("n", "2").build()).expect("A2 registers");
    let b = Class::configurable("B").field("a_class_type", "A2").member("a", &a).build();
    ScenarioA { registry, a, a1, a2, b }
}

pub fn keys(tree: &strata_kernel::ConfigTree) -> Vec<String> {
    tree.keys().map(str::to_owned).collect()
}
