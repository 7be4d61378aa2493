//! Audit record model and its fixed vocabularies.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Origin of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stack {
    Backend,
    Frontend,
}

/// Severity of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

/// Component that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Package {
    Cache,
    Controller,
    CronJob,
    Db,
    Domain,
    Handler,
    Repository,
    Route,
    Service,
}

/// A vocabulary value that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {field}: {value}. Must be one of: {allowed}")]
pub struct InvalidField {
    pub field: &'static str,
    pub value: String,
    pub allowed: &'static str,
}

macro_rules! vocabulary {
    ($ty:ident, $field:literal, { $($text:literal => $variant:ident),+ $(,)? }) => {
        impl $ty {
            const ALLOWED: &'static str = concat!($($text, ", "),+);

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl FromStr for $ty {
            type Err = InvalidField;

            /// Case-insensitive.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(InvalidField {
                        field: $field,
                        value: s.to_string(),
                        allowed: Self::ALLOWED.trim_end_matches(", "),
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

vocabulary!(Stack, "stack", { "backend" => Backend, "frontend" => Frontend });

vocabulary!(Level, "level", {
    "debug" => Debug,
    "info" => Info,
    "warn" => Warn,
    "error" => Error,
    "fatal" => Fatal,
});

vocabulary!(Package, "package", {
    "cache" => Cache,
    "controller" => Controller,
    "cron_job" => CronJob,
    "db" => Db,
    "domain" => Domain,
    "handler" => Handler,
    "repository" => Repository,
    "route" => Route,
    "service" => Service,
});

/// One structured record accepted by the audit sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    pub stack: Stack,
    pub level: Level,
    pub package: Package,
    pub message: String,
}

impl AuditRecord {
    pub fn backend(level: Level, package: Package, message: impl Into<String>) -> Self {
        Self {
            stack: Stack::Backend,
            level,
            package,
            message: message.into(),
        }
    }

    /// Builds a record from untyped values, validating each vocabulary.
    ///
    /// # Errors
    ///
    /// Returns the first field that is not in its vocabulary.
    pub fn parse(
        stack: &str,
        level: &str,
        package: &str,
        message: impl Into<String>,
    ) -> Result<Self, InvalidField> {
        Ok(Self {
            stack: stack.parse()?,
            level: level.parse()?,
            package: package.parse()?,
            message: message.into(),
        })
    }

    /// Console form used when the sink cannot be reached.
    pub fn console_line(&self) -> String {
        format!(
            "[{}] [{}] [{}] {}",
            self.stack.as_str().to_ascii_uppercase(),
            self.level.as_str().to_ascii_uppercase(),
            self.package.as_str().to_ascii_uppercase(),
            self.message
        )
    }
}
