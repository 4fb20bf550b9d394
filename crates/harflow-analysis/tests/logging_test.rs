//! Log output of a run: skipped entries surface at WARN, and work happens
//! under the named spans.

use std::sync::{Arc, Mutex};

use harflow_analysis::AnalysisEngine;
use harflow_core::tracing::names;
use harflow_core::types::Transaction;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Registry;

#[derive(Clone, Default)]
struct Recorder {
    warnings: Arc<Mutex<Vec<String>>>,
    spans: Arc<Mutex<Vec<&'static str>>>,
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S> Layer<S> for Recorder
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
        self.spans.lock().unwrap().push(attrs.metadata().name());
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            self.warnings.lock().unwrap().push(visitor.0);
        }
    }
}

fn analyze_recorded(batch: &[Transaction]) -> Recorder {
    let recorder = Recorder::default();
    let subscriber = Registry::default().with(recorder.clone());
    tracing::subscriber::with_default(subscriber, || {
        AnalysisEngine::new().analyze(batch);
    });
    recorder
}

#[test]
fn skipped_redirect_and_referrer_warn() {
    let batch = vec![
        Transaction::new(0, "GET", "https://a.test/old").with_redirect(""),
        Transaction::new(1, "GET", "https://a.test/page").with_request_header("Referer", ""),
    ];
    let recorder = analyze_recorded(&batch);
    let warnings = recorder.warnings.lock().unwrap();
    assert!(warnings.iter().any(|m| m.contains("redirect")), "{warnings:?}");
    assert!(warnings.iter().any(|m| m.contains("referrer")), "{warnings:?}");
}

#[test]
fn clean_batch_does_not_warn() {
    let batch = vec![
        Transaction::new(0, "GET", "https://a.test/"),
        Transaction::new(1, "GET", "https://a.test/next").with_request_header("Referer", "https://a.test/"),
    ];
    let recorder = analyze_recorded(&batch);
    assert!(recorder.warnings.lock().unwrap().is_empty());
}

#[test]
fn run_opens_every_named_span() {
    let batch = vec![
        Transaction::new(0, "GET", "https://a.test/"),
        Transaction::new(1, "GET", "https://a.test/next"),
    ];
    let recorder = analyze_recorded(&batch);
    let spans = recorder.spans.lock().unwrap();
    for name in [names::ANALYSIS, names::TOKENS, names::GRAPH, names::ANALYTICS] {
        assert!(spans.contains(&name), "missing span {name}: {spans:?}");
    }
}
