use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{Layer, Registry};

/// Filter applied when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,noughts_web=debug";

/// Output format for the server log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format `{other}` (expected pretty or json)")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        })
    }
}

/// Install the global subscriber for the server process.
///
/// `RUST_LOG` wins over [`DEFAULT_LOG_FILTER`]. Fails if a subscriber is
/// already installed.
pub fn init_logging(format: LogFormat) -> Result<(), Box<dyn Error + Send + Sync>> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().with_current_span(false).try_init(),
    }
}

/// One captured event.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Value of the named field, as recorded.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// In-memory sink for tracing events, for asserting on log output in tests.
///
/// It is itself a [`Layer`]; cloning shares the captured entries.
#[derive(Debug, Clone, Default)]
pub struct TestLogSubscriber {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes events on the current thread here until the guard drops.
    pub fn set_default(&self) -> DefaultGuard {
        tracing::subscriber::set_default(Registry::default().with(self.clone()))
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Entries whose message contains `needle`.
    pub fn find(&self, needle: &str) -> Vec<LogEntry> {
        self.lock()
            .iter()
            .filter(|entry| entry.message.contains(needle))
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: Subscriber> Layer<S> for TestLogSubscriber {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        self.lock().push(LogEntry {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message.unwrap_or_default(),
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl FieldVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{:?}", value));
    }
}

/// Process-wide capture for tests that cannot scope a subscriber to one thread.
///
/// Installs the global default once; every call clears and returns the shared sink.
pub fn init_test_logging() -> TestLogSubscriber {
    static SUBSCRIBER: OnceLock<TestLogSubscriber> = OnceLock::new();

    let subscriber = SUBSCRIBER.get_or_init(|| {
        let sink = TestLogSubscriber::new();
        if tracing::subscriber::set_global_default(Registry::default().with(sink.clone())).is_err()
        {
            eprintln!("a global tracing subscriber is already installed; logs will not be captured");
        }
        sink
    });

    subscriber.clear();
    subscriber.clone()
}
