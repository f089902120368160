//! Process-level run ID.
//!
//! Every process ranks under one ULID, generated on first access. It tags the
//! pipeline tracing span and the exported report so log lines and output files
//! from the same run can be matched up.

use once_cell::sync::Lazy;
use ulid::Ulid;

static RUN_ID: Lazy<String> = Lazy::new(|| Ulid::new().to_string());

/// Returns the process-level run ID (26 characters, time-ordered).
#[inline]
pub fn get() -> &'static str {
    &RUN_ID
}
