//! Fixtures shared by unit tests

use faultline_core::{Context, Culprit, Location, LocationId, MacroKind};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{self, SubscriberExt};
use tracing_subscriber::Layer;

pub(crate) fn location(line: u32) -> Location {
    Location {
        file: "src/app.rs",
        line,
        column: 5,
        id: LocationId::from_raw(line as usize),
    }
}

pub(crate) fn context(kind: MacroKind, args: &'static str, culprit: Culprit) -> Context {
    let name = match kind {
        MacroKind::Error => "fault",
        MacroKind::Verify => "verify",
        MacroKind::Try => "attempt",
    };
    Context::new(location(7), "app::run", kind, name, args).with_culprit(culprit)
}

#[derive(Clone, Default)]
struct Warnings(Arc<Mutex<Vec<String>>>);

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for Warnings {
    fn on_event(&self, event: &Event<'_>, _ctx: layer::Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            self.0.lock().push(visitor.0);
        }
    }
}

/// Run `f` and return its output with the WARN messages it emitted
pub(crate) fn warnings_during<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let warnings = Warnings::default();
    let subscriber = tracing_subscriber::registry().with(warnings.clone());
    let out = tracing::subscriber::with_default(subscriber, f);
    let seen = warnings.0.lock().clone();
    (out, seen)
}
