//! Normalization of raw text rows into analysis-ready records.

mod issue;
mod normalizer;
mod record;
mod timestamp;

pub use issue::{CoercionError, NormalizationIssue, Severity, coerce_integer};
pub use normalizer::{Normalization, Normalizer, canonical_label, known_preparers};
pub use record::{Record, RecordSet};
pub use timestamp::TimestampFormat;
