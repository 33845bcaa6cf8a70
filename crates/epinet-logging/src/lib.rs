//! Structured logging for epinet runs
//!
//! Thin wrapper around `tracing-subscriber` that wires up the layers epinet
//! uses: a console layer on stderr (pretty or JSONL) and an optional JSONL
//! file sink through `tracing-appender`. `RUST_LOG` always overrides the
//! configured level.
//!
//! # Quick Start
//!
//! ```ignore
//! use epinet_logging::{EpinetSubscriberBuilder, LogConfig};
//!
//! // Pretty console output at info level
//! let _guard = EpinetSubscriberBuilder::new().init();
//!
//! // Batch mode: JSONL into ./logs/epinet.log, nothing on the console
//! let _guard = EpinetSubscriberBuilder::new()
//!     .with_config(LogConfig::batch("./logs".into()))
//!     .init();
//! ```
//!
//! Keep the returned guard alive for as long as file output is needed;
//! dropping it flushes the background writer.

pub mod config;

pub use config::{ConsoleConfig, FileConfig, JsonlConfig, LogConfig, RotationStrategy};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::Layered, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Standard span names for consistency across crates
pub mod spans {
    /// One full Monte-Carlo estimation run
    pub const ESTIMATE_R0: &str = "estimate_r0";
    /// A single trial: seed selection, pruning and simulation
    pub const RUN_TRIAL: &str = "run_trial";
    /// A canned scenario from the CLI
    pub const SCENARIO: &str = "scenario";
}

type BaseSubscriber = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<BaseSubscriber> + Send + Sync>;

/// Errors raised while installing the global subscriber
#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("a global subscriber is already installed: {0}")]
    AlreadySet(#[from] tracing_subscriber::util::TryInitError),
}

/// Builder for configuring and initializing the epinet logging subscriber
pub struct EpinetSubscriberBuilder {
    config: LogConfig,
}

impl EpinetSubscriberBuilder {
    /// Create a new subscriber builder with default configuration
    ///
    /// Default: pretty output to stderr at info level
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
        }
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.default_level = level.into();
        self
    }

    /// Enable or disable console output
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config.console.enabled = enabled;
        self
    }

    /// Choose pretty (`true`) or JSONL (`false`) console output
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.config.console.pretty = pretty;
        self
    }

    /// Configure file output
    pub fn with_file_output(mut self, config: FileConfig) -> Self {
        self.config.file = Some(config);
        self
    }

    /// The configuration that will be installed
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.config.default_level))
    }

    fn build_layers(&self) -> (Vec<BoxedLayer>, Option<WorkerGuard>) {
        let mut layers: Vec<BoxedLayer> = Vec::new();
        let jsonl = &self.config.jsonl;

        if self.config.console.enabled {
            if self.config.console.pretty {
                layers.push(
                    fmt::layer()
                        .with_ansi(self.config.console.ansi)
                        .with_target(true)
                        .with_writer(std::io::stderr)
                        .boxed(),
                );
            } else {
                layers.push(
                    fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_list(jsonl.include_spans)
                        .flatten_event(jsonl.flatten_events)
                        .with_file(jsonl.include_location)
                        .with_line_number(jsonl.include_location)
                        .with_writer(std::io::stderr)
                        .boxed(),
                );
            }
        }

        let mut guard = None;
        if let Some(file_config) = &self.config.file {
            let (non_blocking, file_guard) =
                tracing_appender::non_blocking(file_appender(file_config));
            guard = Some(file_guard);
            layers.push(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_current_span(true)
                    .with_span_list(jsonl.include_spans)
                    .flatten_event(jsonl.flatten_events)
                    .with_file(jsonl.include_location)
                    .with_line_number(jsonl.include_location)
                    .with_writer(non_blocking)
                    .boxed(),
            );
        }

        (layers, guard)
    }

    /// Initialize the subscriber globally
    ///
    /// Returns the file writer guard, if file output is configured.
    ///
    /// # Panics
    ///
    /// Panics if a global subscriber has already been set.
    pub fn init(self) -> Option<WorkerGuard> {
        let filter = self.env_filter();
        let (layers, guard) = self.build_layers();
        Registry::default().with(filter).with(layers).init();
        guard
    }

    /// Try to initialize the subscriber globally
    ///
    /// Returns an error if a global subscriber has already been set.
    pub fn try_init(self) -> Result<Option<WorkerGuard>, LogInitError> {
        let filter = self.env_filter();
        let (layers, guard) = self.build_layers();
        Registry::default().with(filter).with(layers).try_init()?;
        Ok(guard)
    }
}

impl Default for EpinetSubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn file_appender(config: &FileConfig) -> RollingFileAppender {
    match config.rotation {
        RotationStrategy::Daily => rolling::daily(&config.directory, &config.prefix),
        RotationStrategy::Hourly => rolling::hourly(&config.directory, &config.prefix),
        RotationStrategy::Never => {
            rolling::never(&config.directory, format!("{}.log", config.prefix))
        }
    }
}

/// Initialize logging for testing (minimal output)
///
/// Safe to call from many tests; only the first call installs anything.
pub fn init_testing() {
    let _ = EpinetSubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .try_init();
}
