//! Import warnings
//!
//! Problems that do not stop an import (an unsupported method, an unknown
//! auth type) are collected here instead of failing the whole document.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How much of the source a warning lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    /// Nothing the collection needs was lost (scripts, missing examples).
    Info,
    /// A request, body or auth setting was skipped or replaced.
    Warning,
    /// The source was damaged enough that the import is unreliable.
    Error,
}

impl WarningSeverity {
    /// Wire name of the severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for WarningSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal issue, located by a `/`-separated path of item names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportWarning {
    /// Location in the source, e.g. `"Pets/GET /pets"`.
    pub path: String,
    /// What happened.
    pub message: String,
    /// Severity.
    pub severity: WarningSeverity,
}

impl ImportWarning {
    /// Creates a warning.
    pub fn new(
        path: impl Into<String>,
        message: impl Into<String>,
        severity: WarningSeverity,
    ) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity,
        }
    }

    /// Creates an [`WarningSeverity::Info`] entry.
    pub fn info(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, message, WarningSeverity::Info)
    }

    /// Creates a [`WarningSeverity::Warning`] entry.
    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, message, WarningSeverity::Warning)
    }
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.path, self.message)
    }
}

/// Warning counts per severity.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WarningStats {
    /// `info` entries.
    pub info: usize,
    /// `warning` entries.
    pub warnings: usize,
    /// `error` entries.
    pub errors: usize,
}

impl WarningStats {
    /// All entries.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.info + self.warnings + self.errors
    }

    /// The most severe level present, if any.
    #[must_use]
    pub const fn worst(&self) -> Option<WarningSeverity> {
        if self.errors > 0 {
            Some(WarningSeverity::Error)
        } else if self.warnings > 0 {
            Some(WarningSeverity::Warning)
        } else if self.info > 0 {
            Some(WarningSeverity::Info)
        } else {
            None
        }
    }
}

impl<'a> FromIterator<&'a ImportWarning> for WarningStats {
    fn from_iter<I: IntoIterator<Item = &'a ImportWarning>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), |mut stats, warning| {
            match warning.severity {
                WarningSeverity::Info => stats.info += 1,
                WarningSeverity::Warning => stats.warnings += 1,
                WarningSeverity::Error => stats.errors += 1,
            }
            stats
        })
    }
}

/// Joins a parent location and a child name into a warning path.
pub(crate) fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}
