/// Configuration Sweep - runs one series through several despiker settings
use crate::despiker::{despike_with_report, DespikeConfig, PassSummary, ThresholdMethod};
use crate::error::DespikeError;
use crate::series::Series;

#[derive(Debug, Clone, PartialEq)]
pub struct SweepRun {
    pub label: String,
    pub config: DespikeConfig,
}

impl SweepRun {
    pub fn new(config: DespikeConfig) -> Self {
        SweepRun {
            label: format!(
                "window={} multipass={} method={}",
                config.window, config.multipass, config.method
            ),
            config,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SweepResult {
    pub run: SweepRun,
    pub series: Series,
    pub passes: Vec<PassSummary>,
}

impl SweepResult {
    pub fn corrected_windows(&self) -> usize {
        self.passes.iter().map(|p| p.corrected).sum()
    }

    /// Largest absolute difference to `original`, 0 for an empty series.
    pub fn max_abs_change(&self, original: &Series) -> f64 {
        original
            .values
            .iter()
            .zip(self.series.values.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

/// Multipass panel (window 5), window panel (one pass), then mean vs median
/// at window 9 with three passes.
pub fn default_sweep() -> Vec<SweepRun> {
    let mut runs = Vec::new();

    for multipass in [1, 3, 5, 7] {
        runs.push(SweepRun::new(DespikeConfig::default().with_multipass(multipass)));
    }

    for window in [3, 9, 15, 21] {
        runs.push(SweepRun::new(DespikeConfig::default().with_window(window)));
    }

    for method in [ThresholdMethod::Mean, ThresholdMethod::Median] {
        runs.push(SweepRun::new(DespikeConfig::new(9, 3, method)));
    }

    runs
}

/// Applies every run to the same original series.
pub fn run_sweep(original: &Series, runs: &[SweepRun]) -> Result<Vec<SweepResult>, DespikeError> {
    runs.iter()
        .map(|run| {
            let arguments = Some(original.arguments.as_slice());
            let (series, passes) = despike_with_report(&original.values, arguments, &run.config)?;
            Ok(SweepResult {
                run: run.clone(),
                series,
                passes,
            })
        })
        .collect()
}
