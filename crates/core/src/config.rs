//! Execution settings for gridded evaluation
//!
//! Results never depend on these settings: sequential and parallel runs
//! produce bit-identical fields. They only decide how cells are scheduled.

use serde::{Deserialize, Serialize};

/// Default cell count below which evaluation stays on the calling thread
pub const DEFAULT_MIN_PARALLEL_CELLS: usize = 4096;

/// How gridded evaluation is scheduled
///
/// Deserializes with per-field defaults, so `{}` is a valid config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputeConfig {
    /// Spread cells across the rayon thread pool
    pub parallel: bool,
    /// Smallest grid (in cells) worth splitting across threads
    pub min_parallel_cells: usize,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_parallel_cells: DEFAULT_MIN_PARALLEL_CELLS,
        }
    }
}

impl ComputeConfig {
    /// Always evaluate on the calling thread
    pub const fn sequential() -> Self {
        Self {
            parallel: false,
            min_parallel_cells: DEFAULT_MIN_PARALLEL_CELLS,
        }
    }

    /// Parallel for any grid size
    pub const fn always_parallel() -> Self {
        Self {
            parallel: true,
            min_parallel_cells: 0,
        }
    }

    /// Whether a grid of `cells` cells should be evaluated in parallel
    #[inline]
    pub const fn use_parallel(&self, cells: usize) -> bool {
        self.parallel && cells >= self.min_parallel_cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold() {
        let config = ComputeConfig::default();
        assert!(!config.use_parallel(DEFAULT_MIN_PARALLEL_CELLS - 1));
        assert!(config.use_parallel(DEFAULT_MIN_PARALLEL_CELLS));
        assert!(!ComputeConfig::sequential().use_parallel(usize::MAX));
        assert!(ComputeConfig::always_parallel().use_parallel(1));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ComputeConfig = serde_json::from_str(r#"{"parallel": false}"#).unwrap();
        assert!(!config.parallel);
        assert_eq!(config.min_parallel_cells, DEFAULT_MIN_PARALLEL_CELLS);

        let config: ComputeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ComputeConfig::default());
    }
}
