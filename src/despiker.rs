/// Windowed Despiker
/// Slides a fixed odd-length window over the series, scores every window by the
/// height of an interior extremum over the window's argument span, and smooths
/// windows scoring above the pass threshold by neighbour averaging.
use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::error::DespikeError;
use crate::series::Series;

/// How the per-pass spike threshold is derived from all window ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdMethod {
    #[default]
    Mean,
    Median,
}

impl ThresholdMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThresholdMethod::Mean => "mean",
            ThresholdMethod::Median => "median",
        }
    }
}

impl fmt::Display for ThresholdMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThresholdMethod {
    type Err = DespikeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean" => Ok(ThresholdMethod::Mean),
            "median" => Ok(ThresholdMethod::Median),
            other => Err(DespikeError::InvalidConfiguration(format!(
                "the method should be either 'mean' or 'median', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DespikeConfig {
    /// Window length, odd and at least 3
    pub window: usize,
    /// Number of sequential correction passes
    pub multipass: usize,
    pub method: ThresholdMethod,
}

impl Default for DespikeConfig {
    fn default() -> Self {
        DespikeConfig {
            window: 5,
            multipass: 1,
            method: ThresholdMethod::Mean,
        }
    }
}

impl DespikeConfig {
    pub fn new(window: usize, multipass: usize, method: ThresholdMethod) -> Self {
        DespikeConfig { window, multipass, method }
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_multipass(mut self, multipass: usize) -> Self {
        self.multipass = multipass;
        self
    }

    pub fn with_method(mut self, method: ThresholdMethod) -> Self {
        self.method = method;
        self
    }

    pub fn validate(&self) -> Result<(), DespikeError> {
        if self.window < 3 || self.window % 2 == 0 {
            return Err(DespikeError::InvalidConfiguration(format!(
                "window size should be an odd number >= 3, got {}",
                self.window
            )));
        }
        Ok(())
    }
}

/// Score of one window in one pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeCandidate {
    pub start: usize,
    pub ratio: f64,
}

/// What a single pass did
#[derive(Debug, Clone, PartialEq)]
pub struct PassSummary {
    /// 1-based pass number
    pub pass: usize,
    pub windows: usize,
    /// `None` when the series is shorter than the window
    pub threshold: Option<f64>,
    pub corrected: usize,
}

/// Despike `values` (with optional `arguments`) and return the corrected series.
pub fn despike(
    values: &[f64],
    arguments: Option<&[f64]>,
    config: &DespikeConfig,
) -> Result<Series, DespikeError> {
    despike_with_report(values, arguments, config).map(|(series, _)| series)
}

/// Same as [`despike`], also returning one [`PassSummary`] per pass.
pub fn despike_with_report(
    values: &[f64],
    arguments: Option<&[f64]>,
    config: &DespikeConfig,
) -> Result<(Series, Vec<PassSummary>), DespikeError> {
    config.validate()?;

    let mut series = Series::from_values(values, arguments);
    let mut passes = Vec::with_capacity(config.multipass);

    for pass in 1..=config.multipass {
        let candidates = scan_windows(&series.arguments, &series.values, config.window)?;

        if candidates.is_empty() {
            debug!(
                "pass {}: series of {} points is shorter than window {}, nothing to do",
                pass, series.len(), config.window
            );
            passes.push(PassSummary { pass, windows: 0, threshold: None, corrected: 0 });
            continue;
        }

        let threshold = spike_threshold(&candidates, config.method)?;
        let corrected = correct_spikes(&mut series.values, &candidates, threshold, config.window);

        debug!(
            "pass {}: {} windows, {} threshold {:.6}, {} windows corrected",
            pass, candidates.len(), config.method, threshold, corrected
        );
        passes.push(PassSummary {
            pass,
            windows: candidates.len(),
            threshold: Some(threshold),
            corrected,
        });
    }

    Ok((series, passes))
}

/// Scores every window of the current values. Windows are independent so they
/// are scored in parallel; the result stays in start-index order and the
/// lowest failing window decides the error.
fn scan_windows(
    arguments: &[f64],
    values: &[f64],
    window: usize,
) -> Result<Vec<SpikeCandidate>, DespikeError> {
    if values.len() < window {
        return Ok(Vec::new());
    }

    let scored: Vec<Result<SpikeCandidate, DespikeError>> = (0..values.len() - window + 1)
        .into_par_iter()
        .map(|start| {
            let end = start + window;
            let ratio = window_ratio(&arguments[start..end], &values[start..end])
                .ok_or(DespikeError::DivisionByZero { start, argument: arguments[start] })?;
            Ok(SpikeCandidate { start, ratio })
        })
        .collect();

    scored.into_iter().collect()
}

/// Height over breadth, or `None` when the breadth is zero.
fn window_ratio(arguments: &[f64], values: &[f64]) -> Option<f64> {
    let breadth = arguments[arguments.len() - 1] - arguments[0];
    if breadth == 0.0 {
        return None;
    }
    Some(window_height(values) / breadth)
}

/// `max - min` if either extremum (first occurrence) is an interior point,
/// otherwise 0. Extrema on the window edges are treated as trend.
fn window_height(values: &[f64]) -> f64 {
    let mut min_idx = 0;
    let mut max_idx = 0;

    for (i, &v) in values.iter().enumerate().skip(1) {
        if v < values[min_idx] {
            min_idx = i;
        }
        if v > values[max_idx] {
            max_idx = i;
        }
    }

    let last = values.len() - 1;
    let interior = |i: usize| i > 0 && i < last;

    if interior(min_idx) || interior(max_idx) {
        values[max_idx] - values[min_idx]
    } else {
        0.0
    }
}

/// Threshold for one pass. `candidates` must not be empty.
///
/// The median variant picks the sorted ratio at position `count / 2 + 1`,
/// which does not exist for one or two windows.
fn spike_threshold(
    candidates: &[SpikeCandidate],
    method: ThresholdMethod,
) -> Result<f64, DespikeError> {
    match method {
        ThresholdMethod::Mean => {
            Ok(candidates.iter().map(|c| c.ratio).sum::<f64>() / candidates.len() as f64)
        }
        ThresholdMethod::Median => {
            let mut ratios: Vec<f64> = candidates.iter().map(|c| c.ratio).collect();
            ratios.sort_by(|a, b| a.total_cmp(b));
            let rank = ratios.len() / 2 + 1;
            ratios
                .get(rank)
                .copied()
                .ok_or(DespikeError::MedianRankOutOfRange { rank, count: ratios.len() })
        }
    }
}

/// Left-to-right correction over the shared working copy. Each interior point
/// of a flagged window becomes the mean of its current neighbours, so earlier
/// corrections (in this window or an overlapping earlier one) feed later ones.
fn correct_spikes(
    values: &mut [f64],
    candidates: &[SpikeCandidate],
    threshold: f64,
    window: usize,
) -> usize {
    let mut corrected = 0;

    for candidate in candidates.iter().filter(|c| c.ratio > threshold) {
        for idx in candidate.start + 1..candidate.start + window - 1 {
            values[idx] = (values[idx - 1] + values[idx + 1]) / 2.0;
        }
        trace!(
            "window at {} corrected (ratio {:.6} > {:.6})",
            candidate.start, candidate.ratio, threshold
        );
        corrected += 1;
    }

    corrected
}
