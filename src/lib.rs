//! Series Despiker
//!
//! Windowed spike removal for ordered (argument, value) series, plus the
//! loading, sweep and CSV reporting used by the `despike` binary.

pub mod despiker;
pub mod error;
pub mod loader;
pub mod report;
pub mod series;
pub mod sweep;

pub use despiker::{
    despike, despike_with_report, DespikeConfig, PassSummary, SpikeCandidate, ThresholdMethod,
};
pub use error::DespikeError;
pub use loader::{find_series_files, load_series, LoadError};
pub use series::{Point, Series};
pub use sweep::{default_sweep, run_sweep, SweepResult, SweepRun};
