//! Chunk planning for multi-row inserts and the end-of-run summary.

use std::fmt;
use std::ops::Range;

use crate::environment::Target;
use crate::error::CoreError;

/// Rows per INSERT statement when `BATCH_SIZE` is not set.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// PostgreSQL caps a single statement at 65535 bind parameters.
pub const MAX_BIND_PARAMS: usize = u16::MAX as usize;

/// Validate a chunk size against the per-statement bind-parameter limit for a
/// table with `columns` columns.
pub fn validate_chunk_size(chunk_size: usize, columns: usize) -> Result<(), CoreError> {
    if chunk_size == 0 {
        return Err(CoreError::Validation(
            "Chunk size must be at least 1".to_string(),
        ));
    }
    let params = chunk_size.saturating_mul(columns);
    if params > MAX_BIND_PARAMS {
        return Err(CoreError::Validation(format!(
            "Chunk size {chunk_size} x {columns} columns = {params} bind parameters \
             exceeds the limit of {MAX_BIND_PARAMS}"
        )));
    }
    Ok(())
}

/// Splits `len` rows into consecutive ranges of at most `chunk_size` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    len: usize,
    chunk_size: usize,
}

impl ChunkPlan {
    pub fn new(len: usize, chunk_size: usize, columns: usize) -> Result<Self, CoreError> {
        validate_chunk_size(chunk_size, columns)?;
        Ok(Self { len, chunk_size })
    }

    /// Number of INSERT statements the plan issues.
    pub fn chunk_count(&self) -> usize {
        self.len.div_ceil(self.chunk_size)
    }

    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.len)
            .step_by(self.chunk_size)
            .map(|start| start..(start + self.chunk_size).min(self.len))
    }
}

// ---------------------------------------------------------------------------
// Run summary
// ---------------------------------------------------------------------------

/// Row counts written by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub customers: u64,
    pub orders: u64,
    pub target: Target,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loaded {} customers and {} orders into {}.",
            self.customers, self.orders, self.target
        )
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::environment::Environment;

    #[test]
    fn ranges_cover_every_row_once() {
        let plan = ChunkPlan::new(2500, 1000, 5).unwrap();
        let ranges: Vec<_> = plan.ranges().collect();
        assert_eq!(ranges, vec![0..1000, 1000..2000, 2000..2500]);
        assert_eq!(plan.chunk_count(), 3);
    }

    #[test]
    fn exact_multiple_has_no_trailing_chunk() {
        let plan = ChunkPlan::new(2000, 1000, 5).unwrap();
        assert_eq!(plan.chunk_count(), 2);
        assert_eq!(plan.ranges().last(), Some(1000..2000));
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        let plan = ChunkPlan::new(0, 1000, 5).unwrap();
        assert_eq!(plan.chunk_count(), 0);
        assert_eq!(plan.ranges().count(), 0);
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        assert_matches!(ChunkPlan::new(10, 0, 5), Err(CoreError::Validation(_)));
    }

    #[test]
    fn chunk_size_is_bounded_by_bind_parameters() {
        assert!(validate_chunk_size(13_107, 5).is_ok());
        assert_matches!(
            validate_chunk_size(13_108, 5),
            Err(CoreError::Validation(msg)) if msg.contains("65540")
        );
    }

    #[test]
    fn summary_line_names_target() {
        let summary = LoadSummary {
            customers: 1000,
            orders: 4873,
            target: Environment::Dev.target(),
        };
        assert_eq!(
            summary.to_string(),
            "Loaded 1000 customers and 4873 orders into dev_db.raw."
        );
    }
}
