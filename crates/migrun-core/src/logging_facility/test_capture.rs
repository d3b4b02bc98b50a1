//! In-memory event capture for tests
//!
//! `init_test_capture` installs a process-wide subscriber once and hands out
//! handles to the shared event list. Only the fields migrun emits are kept,
//! each in its own typed slot.

use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use super::schema::{
    FIELD_APP_ID, FIELD_COMPONENT, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_ERR_KIND, FIELD_EVENT,
    FIELD_FILE, FIELD_MESSAGE, FIELD_OP, FIELD_SNAPSHOT_DIR,
};

/// One recorded event
#[derive(Clone, Debug, PartialEq)]
pub struct CapturedEvent {
    pub level: Level,
    pub component: Option<String>,
    pub op: Option<String>,
    pub event: Option<String>,
    pub app_id: Option<String>,
    pub file: Option<String>,
    pub snapshot_dir: Option<String>,
    pub duration_ms: Option<u64>,
    pub err_kind: Option<String>,
    pub err_code: Option<String>,
    pub message: Option<String>,
}

impl CapturedEvent {
    fn new(level: Level) -> Self {
        Self {
            level,
            component: None,
            op: None,
            event: None,
            app_id: None,
            file: None,
            snapshot_dir: None,
            duration_ms: None,
            err_kind: None,
            err_code: None,
            message: None,
        }
    }

    /// True for the `event` boundary of operation `op`
    pub fn is(&self, op: &str, event: &str) -> bool {
        self.op.as_deref() == Some(op) && self.event.as_deref() == Some(event)
    }

    fn store(&mut self, name: &str, value: String) {
        let slot = match name {
            FIELD_COMPONENT => &mut self.component,
            FIELD_OP => &mut self.op,
            FIELD_EVENT => &mut self.event,
            FIELD_APP_ID => &mut self.app_id,
            FIELD_FILE => &mut self.file,
            FIELD_SNAPSHOT_DIR => &mut self.snapshot_dir,
            FIELD_ERR_KIND => &mut self.err_kind,
            FIELD_ERR_CODE => &mut self.err_code,
            FIELD_MESSAGE => &mut self.message,
            FIELD_DURATION_MS => {
                self.duration_ms = value.parse().ok();
                return;
            }
            _ => return,
        };
        *slot = Some(value);
    }
}

impl Visit for CapturedEvent {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.store(field.name(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.store(field.name(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.store(field.name(), value.to_string());
    }
}

struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut captured = CapturedEvent::new(*event.metadata().level());
        event.record(&mut captured);

        if let Ok(mut events) = self.events.lock() {
            events.push(captured);
        }
    }
}

/// Shared view of everything captured so far
#[derive(Clone, Default)]
pub struct TestCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Every `event` boundary logged for `op`, oldest first
    pub fn boundaries(&self, op: &str, event: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.is(op, event))
            .collect()
    }

    /// # Panics
    ///
    /// Panics if no `event` boundary was logged for `op`.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let total = self.events().len();
        assert!(
            !self.boundaries(op, event).is_empty(),
            "Expected event op={} event={} not found in {} captured events",
            op,
            event,
            total
        );
    }

    /// Files named by events of `op`, in emission order
    pub fn files_for_op(&self, op: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.op.as_deref() == Some(op))
            .filter_map(|e| e.file)
            .collect()
    }
}

/// Install the capturing subscriber on first use and return a handle to it
///
/// Every test in one binary shares the same event list, so assertions should
/// key on an operation name unique to the test.
///
/// ```
/// use migrun_core::logging_facility::test_capture::init_test_capture;
/// use migrun_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_example");
/// capture.assert_event_exists("doc_example", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

    CAPTURE
        .get_or_init(|| {
            let capture = TestCapture::default();
            let layer = CaptureLayer {
                events: Arc::clone(&capture.events),
            };
            tracing_subscriber::registry().with(layer).init();
            capture
        })
        .clone()
}
