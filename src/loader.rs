/// Series Loader - reads `[argument, value]` series from JSON or CSV files
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::series::{Point, Series};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON series in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid CSV series in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Unsupported series file: {} (expected .json or .csv)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Folder walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesFormat {
    /// Array of `[argument, value]` pairs
    Json,
    /// Header row, then `argument,value` rows
    Csv,
}

impl SeriesFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "json" => Some(SeriesFormat::Json),
            "csv" => Some(SeriesFormat::Csv),
            _ => None,
        }
    }
}

pub fn load_series(path: &Path) -> Result<Series, LoadError> {
    let format = SeriesFormat::from_path(path)
        .ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))?;

    let points = match format {
        SeriesFormat::Json => read_json_points(path)?,
        SeriesFormat::Csv => read_csv_points(path)?,
    };

    Ok(Series::from_points(&points))
}

fn read_json_points(path: &Path) -> Result<Vec<Point>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_csv_points(path: &Path) -> Result<Vec<Point>, LoadError> {
    let csv_error = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = csv::Reader::from_path(path).map_err(csv_error)?;
    let mut points = Vec::new();
    for record in rdr.deserialize::<(f64, f64)>() {
        points.push(Point::from(record.map_err(csv_error)?));
    }
    Ok(points)
}

/// Every `.json` / `.csv` file under `folder`, sorted by path.
pub fn find_series_files(folder: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(folder) {
        let entry = entry?;
        if entry.file_type().is_file() && SeriesFormat::from_path(entry.path()).is_some() {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_json_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "[[0, 1.5], [1, 2.5], [2.5, -3]]").unwrap();

        let series = load_series(&path).unwrap();
        assert_eq!(series.arguments, vec![0.0, 1.0, 2.5]);
        assert_eq!(series.values, vec![1.5, 2.5, -3.0]);
    }

    #[test]
    fn test_json_floats_parse_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exact.json");
        fs::write(
            &path,
            "[[9.500000000000002, -49.065179697269244], [10.1, 0.30000000000000004]]",
        )
        .unwrap();

        let series = load_series(&path).unwrap();
        assert_eq!(series.arguments[0], 9.500000000000002);
        assert_eq!(series.values[0], -49.065179697269244);
        assert_eq!(series.arguments[1], 10.1);
        assert_eq!(series.values[1], 0.1 + 0.2);
    }

    #[test]
    fn test_load_csv_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Data.CSV");
        fs::write(&path, "time,value\n0,10\n1,12.5\n3,9\n").unwrap();

        let series = load_series(&path).unwrap();
        assert_eq!(series.arguments, vec![0.0, 1.0, 3.0]);
        assert_eq!(series.values, vec![10.0, 12.5, 9.0]);
    }

    #[test]
    fn test_malformed_inputs() {
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("bad.json");
        fs::write(&json, "{\"not\": \"pairs\"}").unwrap();
        assert!(matches!(load_series(&json), Err(LoadError::Json { .. })));

        let csv = dir.path().join("bad.csv");
        fs::write(&csv, "time,value\n0,abc\n").unwrap();
        assert!(matches!(load_series(&csv), Err(LoadError::Csv { .. })));

        let txt = dir.path().join("data.txt");
        fs::write(&txt, "0 1\n").unwrap();
        assert!(matches!(load_series(&txt), Err(LoadError::UnsupportedFormat(_))));

        let missing = dir.path().join("missing.json");
        assert!(matches!(load_series(&missing), Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_find_series_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("b.json"), "[]").unwrap();
        fs::write(dir.path().join("a.csv"), "x,y\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(nested.join("c.JSON"), "[]").unwrap();

        let files = find_series_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.csv"),
                PathBuf::from("b.json"),
                PathBuf::from("nested").join("c.JSON"),
            ]
        );
    }
}
