//! Command implementations.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use polars::prelude::CsvWriter;
use polars::prelude::SerWriter;

use remit_detect::{
    DEFAULT_SAMPLE_ROWS, FormatRegistry, ReportFormatDetector, learn_profile,
};
use remit_ingest::{read_sample, sniff_path};
use remit_transform::ReportTransformer;

use crate::cli::{DetectArgs, LearnArgs, TransformArgs};
use crate::summary::{print_detection, print_formats, print_transform_report};

pub fn run_detect(registry_path: &Path, args: &DetectArgs) -> Result<i32> {
    let registry = FormatRegistry::open(registry_path)?;
    let detector = ReportFormatDetector::new(registry);
    let detection = detector.detect_with_sample(&args.file, args.sample_rows);
    let recognized = detection.is_recognized();
    print_detection(&detection);
    Ok(if recognized { 0 } else { 1 })
}

pub fn run_transform(registry_path: &Path, args: &TransformArgs) -> Result<i32> {
    let registry = FormatRegistry::open(registry_path)?;
    let transformer = ReportTransformer::with_default_pipelines(ReportFormatDetector::new(registry));

    let mut outcome = match &args.format {
        Some(format) => transformer.transform_as(&args.file, format),
        None => transformer.transform(&args.file),
    };
    print_transform_report(&outcome.report);

    if let Some(error) = &outcome.report.error {
        eprintln!("error: {error}");
        return Ok(1);
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.file));
    let file = File::create(&output)
        .with_context(|| format!("create output file: {}", output.display()))?;
    CsvWriter::new(file)
        .finish(&mut outcome.frame)
        .with_context(|| format!("write canonical table: {}", output.display()))?;
    println!(
        "Wrote {} row(s) to {}",
        outcome.frame.height(),
        output.display()
    );

    Ok(if outcome.report.success { 0 } else { 1 })
}

pub fn run_formats(registry_path: &Path) -> Result<i32> {
    let registry = FormatRegistry::open(registry_path)?;
    print_formats(&registry);
    Ok(0)
}

pub fn run_learn(registry_path: &Path, args: &LearnArgs) -> Result<i32> {
    let dialect = sniff_path(&args.file)?;
    if !dialect.has_header {
        bail!("no header row detected in {}", args.file.display());
    }
    let sample = read_sample(&args.file, dialect, DEFAULT_SAMPLE_ROWS)?;
    if sample.headers.is_empty() {
        bail!("{} has no columns to learn from", args.file.display());
    }

    let description = args
        .description
        .clone()
        .unwrap_or_else(|| format!("Learned from {}", args.file.display()));
    let profile = learn_profile(&args.name, &description, &sample);
    let mapped = profile.column_mappings.len();
    let total = sample.headers.len();

    let mut registry = FormatRegistry::open(registry_path)?;
    registry.add_profile(profile)?;
    println!(
        "Learned profile '{}': {mapped} of {total} column(s) mapped",
        args.name
    );
    Ok(0)
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("report");
    input.with_file_name(format!("{stem}_canonical.csv"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_sits_next_to_the_input() {
        let output = default_output_path(Path::new("/data/jan/settlement.csv"));
        assert_eq!(output, Path::new("/data/jan/settlement_canonical.csv"));
    }
}
