//! Logging setup
//!
//! Console output is configured from the CLI verbosity flags. Each scrape run
//! additionally gets a `RunLog`: a tracing dispatcher that writes to the
//! console and to a plain-text log file inside the output directory. The run
//! log is attached to the run's future only, so nothing outside that run
//! writes into its file.

use std::fs::OpenOptions;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::instrument::WithSubscriber;
use tracing::Dispatch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// Builds the console filter for the given verbosity
pub fn console_filter(verbose: u8, quiet: bool) -> EnvFilter {
    if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hadith_scrape=info,warn"),
            1 => EnvFilter::new("hadith_scrape=debug,info"),
            2 => EnvFilter::new("hadith_scrape=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    }
}

/// Filter for the run log file
fn file_filter() -> EnvFilter {
    EnvFilter::new("hadith_scrape=debug,warn")
}

/// Log sink scoped to a single scrape run
pub struct RunLog {
    path: PathBuf,
    dispatch: Dispatch,
}

impl RunLog {
    /// Opens (appending) `dir/file_name` and builds the run dispatcher
    ///
    /// # Arguments
    ///
    /// * `dir` - Output directory; created if missing
    /// * `file_name` - Log file name inside `dir`
    /// * `console` - Console filter, or `None` to log to the file only
    pub fn open(dir: &Path, file_name: &str, console: Option<EnvFilter>) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir)?;

        let path = dir.join(file_name);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        let console_layer = console.map(|filter| {
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_filter(filter)
        });

        let file_layer = fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .with_filter(file_filter());

        let subscriber = Registry::default().with(console_layer).with(file_layer);

        Ok(Self {
            path,
            dispatch: Dispatch::new(subscriber),
        })
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Runs `future` with this log as its subscriber
    pub async fn scope<F: Future>(&self, future: F) -> F::Output {
        future.with_subscriber(self.dispatch.clone()).await
    }
}
