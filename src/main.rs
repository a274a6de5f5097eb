use std::collections::HashSet;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;
use rayon::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use series_despiker::report::{
    comparison_file_name, write_comparison_csv, write_summary_csv, SummaryRow,
};
use series_despiker::{
    default_sweep, find_series_files, load_series, run_sweep, DespikeConfig, SweepRun,
    ThresholdMethod,
};

/// Despike series files and write original vs despiked CSV comparisons
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Series file (.json pairs or .csv) or a folder of them
    #[arg(short, long)]
    input: PathBuf,

    /// Output folder
    #[arg(short, long, default_value = "despiked")]
    output: PathBuf,

    /// Window length (odd, >= 3)
    #[arg(short, long)]
    window: Option<usize>,

    /// Number of passes
    #[arg(short, long)]
    multipass: Option<usize>,

    /// Threshold method: mean or median
    #[arg(long)]
    method: Option<String>,
}

impl Args {
    /// A single run when any despiker option is given, otherwise the default sweep.
    fn runs(&self) -> anyhow::Result<Vec<SweepRun>> {
        if self.window.is_none() && self.multipass.is_none() && self.method.is_none() {
            return Ok(default_sweep());
        }

        let mut config = DespikeConfig::default();
        if let Some(window) = self.window {
            config = config.with_window(window);
        }
        if let Some(multipass) = self.multipass {
            config = config.with_multipass(multipass);
        }
        if let Some(method) = &self.method {
            config = config.with_method(method.parse::<ThresholdMethod>()?);
        }
        config.validate()?;

        Ok(vec![SweepRun::new(config)])
    }
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let runs = args.runs()?;

    create_dir_all(&args.output)
        .with_context(|| format!("creating output folder {}", args.output.display()))?;

    let files = if args.input.is_dir() {
        find_series_files(&args.input)?
    } else {
        vec![args.input.clone()]
    };

    if files.is_empty() {
        warn!("⚠️  No series files found in {}", args.input.display());
        return Ok(());
    }

    let mut output_names = HashSet::new();
    for path in &files {
        let name = comparison_file_name(&args.input, path);
        if !output_names.insert(name.clone()) {
            bail!("{} would overwrite another output file ({})", path.display(), name);
        }
    }

    info!("📁 Found {} series files, {} configurations each", files.len(), runs.len());
    info!("⚡ Using parallel processing on {} cores", num_cpus::get());

    let start_time = Instant::now();

    let outcomes: Vec<(&PathBuf, anyhow::Result<Vec<SummaryRow>>)> = files
        .par_iter()
        .map(|path| (path, process_series_file(path, &args.input, &runs, &args.output)))
        .collect();

    let mut summary = Vec::new();
    let mut failed = 0;
    for (path, outcome) in outcomes {
        match outcome {
            Ok(rows) => summary.extend(rows),
            Err(e) => {
                failed += 1;
                error!("❌ Error processing {}: {:#}", path.display(), e);
            }
        }
    }

    let summary_path = args.output.join("summary.csv");
    write_summary_csv(&summary_path, &summary)
        .with_context(|| format!("writing {}", summary_path.display()))?;

    info!(
        "✅ Processed {} of {} files in {:.2} seconds",
        files.len() - failed,
        files.len(),
        start_time.elapsed().as_secs_f64()
    );
    info!("📊 Summary saved to: {}", summary_path.display());

    Ok(())
}

fn process_series_file(
    path: &Path,
    input_root: &Path,
    runs: &[SweepRun],
    output_dir: &Path,
) -> anyhow::Result<Vec<SummaryRow>> {
    let series = load_series(path)?;

    let filename = match path.strip_prefix(input_root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.display().to_string(),
        _ => path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown")
            .to_string(),
    };

    let results = run_sweep(&series, runs).with_context(|| format!("despiking {}", filename))?;

    let output_path = output_dir.join(comparison_file_name(input_root, path));
    write_comparison_csv(&output_path, &series, &results)
        .with_context(|| format!("writing {}", output_path.display()))?;

    let rows: Vec<SummaryRow> = results
        .iter()
        .map(|result| SummaryRow::new(&filename, &series, result))
        .collect();

    let corrected: usize = rows.iter().map(|r| r.corrected_windows).sum();
    info!(
        "🔧 {}: {} points, {} windows corrected across {} runs",
        filename,
        series.len(),
        corrected,
        rows.len()
    );

    Ok(rows)
}
