//! Despiker Error Types

use thiserror::Error;

/// Errors that can occur while despiking a series
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DespikeError {
    /// Window size or threshold method rejected before any computation
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A window whose first and last argument coincide
    #[error("Window starting at index {start} has zero breadth (argument {argument})")]
    DivisionByZero { start: usize, argument: f64 },

    /// Median rank `count / 2 + 1` falls past the last of `count` windows
    #[error("Median rank {rank} out of range for {count} windows")]
    MedianRankOutOfRange { rank: usize, count: usize },
}
