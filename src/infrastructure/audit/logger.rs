//! Fire-and-forget audit channel.
//!
//! [`AuditLogger`] is a cheap, cloneable handle. Submitting a record never
//! blocks and never fails: records go into a bounded queue, or straight to
//! the console when the queue is full. A background [`AuditWorker`] drains
//! the queue and delivers each record to an [`AuditSink`], falling back to a
//! console line when delivery fails.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::record::{AuditRecord, Level, Package};
use super::sink::AuditSink;

/// How long the worker skips the sink after a failed delivery.
pub const SINK_RETRY_COOLDOWN: Duration = Duration::from_secs(30);

/// Handle used by the rest of the application to emit audit records.
#[derive(Clone, Debug)]
pub struct AuditLogger {
    sender: Option<mpsc::Sender<AuditRecord>>,
}

impl AuditLogger {
    /// A logger with no sink. Records are traced at debug level only.
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// Creates a logger and the receiving end of its queue.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<AuditRecord>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { sender: Some(tx) }, rx)
    }

    /// Creates a logger whose records are delivered to `sink` by a spawned worker.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn spawn(sink: Arc<dyn AuditSink>, capacity: usize) -> Self {
        let (logger, rx) = Self::channel(capacity);
        tokio::spawn(AuditWorker::new(sink).run(rx));
        logger
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// True if a worker was attached and has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.as_ref().is_some_and(|tx| tx.is_closed())
    }

    /// Queues a record. Never blocks.
    ///
    /// A record that cannot be queued is written to the console instead.
    pub fn submit(&self, record: AuditRecord) -> Submission {
        let Some(tx) = &self.sender else {
            debug!(target: "audit", "{}", record.console_line());
            return Submission::Untracked;
        };

        match tx.try_send(record) {
            Ok(()) => Submission::Queued,
            Err(mpsc::error::TrySendError::Full(record))
            | Err(mpsc::error::TrySendError::Closed(record)) => {
                write_console(&record);
                Submission::Console
            }
        }
    }

    /// Queues a record given as untyped values.
    ///
    /// Values outside the fixed vocabularies cause the record to be dropped
    /// with a local warning.
    pub fn submit_raw(&self, stack: &str, level: &str, package: &str, message: impl Into<String>) {
        match AuditRecord::parse(stack, level, package, message) {
            Ok(record) => {
                self.submit(record);
            }
            Err(e) => warn!("Dropping audit record: {}", e),
        }
    }

    pub fn log(&self, level: Level, package: Package, message: impl Into<String>) {
        self.submit(AuditRecord::backend(level, package, message));
    }

    pub fn debug(&self, package: Package, message: impl Into<String>) {
        self.log(Level::Debug, package, message);
    }

    pub fn info(&self, package: Package, message: impl Into<String>) {
        self.log(Level::Info, package, message);
    }

    pub fn warn(&self, package: Package, message: impl Into<String>) {
        self.log(Level::Warn, package, message);
    }

    pub fn error(&self, package: Package, message: impl Into<String>) {
        self.log(Level::Error, package, message);
    }
}

/// Where [`AuditLogger::submit`] sent a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Handed to the worker.
    Queued,
    /// Queue full or worker gone; printed locally.
    Console,
    /// No sink configured; traced at debug level.
    Untracked,
}

/// What happened to a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { log_id: Option<String> },
    ConsoleFallback,
}

/// Drains the audit queue into a sink.
pub struct AuditWorker {
    sink: Arc<dyn AuditSink>,
    unavailable_reported: bool,
    retry_cooldown: Duration,
    last_failure: Option<Instant>,
}

impl AuditWorker {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self::with_cooldown(sink, SINK_RETRY_COOLDOWN)
    }

    pub fn with_cooldown(sink: Arc<dyn AuditSink>, retry_cooldown: Duration) -> Self {
        Self {
            sink,
            unavailable_reported: false,
            retry_cooldown,
            last_failure: None,
        }
    }

    /// Processes records until every logger handle is dropped.
    pub async fn run(mut self, mut rx: mpsc::Receiver<AuditRecord>) {
        while let Some(record) = rx.recv().await {
            self.handle(&record).await;
        }
        debug!("Audit worker stopped");
    }

    /// Delivers one record, or writes it to the console if delivery fails.
    ///
    /// The sink-unavailable warning is emitted once per worker. After a
    /// failure the sink is not contacted again until the cooldown elapses.
    pub async fn handle(&mut self, record: &AuditRecord) -> DeliveryOutcome {
        if self.cooling_down() {
            write_console(record);
            return DeliveryOutcome::ConsoleFallback;
        }

        match self.sink.deliver(record).await {
            Ok(receipt) => {
                self.last_failure = None;
                if record.level >= Level::Error {
                    info!(
                        "Log sent successfully: {}",
                        receipt.log_id.as_deref().unwrap_or("-")
                    );
                }
                DeliveryOutcome::Delivered {
                    log_id: receipt.log_id,
                }
            }
            Err(e) => {
                if !self.unavailable_reported {
                    warn!("Audit sink unavailable - using console fallback: {}", e);
                    self.unavailable_reported = true;
                }
                self.last_failure = Some(Instant::now());
                write_console(record);
                DeliveryOutcome::ConsoleFallback
            }
        }
    }

    fn cooling_down(&self) -> bool {
        self.last_failure
            .is_some_and(|at| at.elapsed() < self.retry_cooldown)
    }
}

fn write_console(record: &AuditRecord) {
    let line = record.console_line();
    match record.level {
        Level::Debug => debug!(target: "audit", "{}", line),
        Level::Info => info!(target: "audit", "{}", line),
        Level::Warn => warn!(target: "audit", "{}", line),
        Level::Error | Level::Fatal => error!(target: "audit", "{}", line),
    }
}
