//! Best-effort remote audit logging.
//!
//! Audit records are a side channel next to local `tracing` output. Their
//! delivery can fail at any time without affecting request handling.
//!
//! - [`AuditLogger`] - non-blocking handle used by handlers and services
//! - [`AuditRecord`] - validated `{stack, level, package, message}` record
//! - [`AuditSink`] / [`HttpAuditSink`] - delivery target
//! - [`AuditWorker`] - background delivery with console fallback

mod logger;
mod record;
mod sink;

pub use logger::{AuditLogger, AuditWorker, DeliveryOutcome, SINK_RETRY_COOLDOWN, Submission};
pub use record::{AuditRecord, InvalidField, Level, Package, Stack};
pub use sink::{AuditError, AuditSink, DeliveryReceipt, HttpAuditSink};
