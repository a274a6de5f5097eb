/// Series Model - ordered (argument, value) pairs handed to and returned by the despiker
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A single sample. Serialised as a two element array `[argument, value]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Point {
    pub argument: f64,
    pub value: f64,
}

impl From<(f64, f64)> for Point {
    fn from((argument, value): (f64, f64)) -> Self {
        Point { argument, value }
    }
}

impl From<Point> for (f64, f64) {
    fn from(point: Point) -> Self {
        (point.argument, point.value)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    pub arguments: Vec<f64>,
    pub values: Vec<f64>,
}

impl Series {
    /// Builds a series from values and optional arguments.
    ///
    /// Missing (or empty) arguments become `0..len(values)`. When both are
    /// given the longer sequence is truncated to the shorter one.
    pub fn from_values(values: &[f64], arguments: Option<&[f64]>) -> Self {
        match arguments.filter(|args| !args.is_empty()) {
            Some(args) => {
                let n = values.len().min(args.len());
                if values.len() != args.len() {
                    warn!(
                        "values ({}) and arguments ({}) differ in length, truncating to {}",
                        values.len(), args.len(), n
                    );
                }
                Series {
                    arguments: args[..n].to_vec(),
                    values: values[..n].to_vec(),
                }
            }
            None => Series {
                arguments: (0..values.len()).map(|i| i as f64).collect(),
                values: values.to_vec(),
            },
        }
    }

    pub fn from_points(points: &[Point]) -> Self {
        Series {
            arguments: points.iter().map(|p| p.argument).collect(),
            values: points.iter().map(|p| p.value).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.arguments
            .iter()
            .zip(self.values.iter())
            .map(|(&argument, &value)| Point { argument, value })
    }

    /// Splits into `(arguments, values)`.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.arguments, self.values)
    }
}
