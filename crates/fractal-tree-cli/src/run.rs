use crate::CliError;
use crate::settings::{self, Settings};
use fractal_tree_lib::{DimensionReport, FractalError, FractalTree, estimate_dimension_multi};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Everything the tool reports about one run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub params: fractal_tree_lib::TreeParams,
    pub segments: usize,
    pub leaves: usize,
    /// `[min_x, min_y, max_x, max_y]`
    pub bounds: Option<[f64; 4]>,
    /// `None` when the estimate is degenerate
    pub dimension: Option<DimensionReport>,
    /// Why the estimate is missing, if it is
    pub degenerate: Option<String>,
}

/// Build the tree, estimate its dimension and handle the file outputs
pub fn run(settings: &Settings) -> Result<RunReport, CliError> {
    let params = settings.tree_params();
    let tree = params.build()?;

    if let Some(path) = &settings.save_options {
        settings::save_options(path, &params)?;
    }
    if let Some(path) = &settings.dump_segments {
        dump_segments(path, &tree)?;
    }

    let (dimension, degenerate) = match estimate_dimension_multi(&tree, &settings.epsilons()) {
        Ok(report) => (Some(report), None),
        Err(err @ FractalError::DegenerateEstimate { .. }) => {
            tracing::warn!(%err, "dimension estimate is undefined for this tree");
            (None, Some(err.to_string()))
        }
        Err(err) => return Err(err.into()),
    };

    Ok(RunReport {
        params,
        segments: tree.segment_count(),
        leaves: tree.leaf_count(),
        bounds: tree
            .bounding_rect()
            .map(|rect| [rect.min().x, rect.min().y, rect.max().x, rect.max().y]),
        dimension,
        degenerate,
    })
}

/// Write the pre-order segment list as JSON
fn dump_segments(path: &Path, tree: &FractalTree) -> Result<(), CliError> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer(&mut writer, &tree.segment_records())?;
    writer.flush()?;
    tracing::info!(path = %path.display(), segments = tree.segment_count(), "dumped segments");
    Ok(())
}

/// Print a report as text or JSON
pub fn print_report(report: &RunReport, json: bool, out: &mut impl Write) -> Result<(), CliError> {
    if json {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)?;
        return Ok(());
    }

    let params = &report.params;
    writeln!(
        out,
        "tree: depth {} | angles {}/{} | scale {} | root ({}, {}) length {}",
        params.depth,
        params.left_angle_deg,
        params.right_angle_deg,
        params.scale_factor,
        params.root_start.x,
        params.root_start.y,
        params.root_length,
    )?;
    writeln!(out, "segments: {} ({} leaves)", report.segments, report.leaves)?;
    if let Some([min_x, min_y, max_x, max_y]) = report.bounds {
        writeln!(
            out,
            "bounds: [{min_x:.4}, {min_y:.4}] - [{max_x:.4}, {max_y:.4}]"
        )?;
    }

    match (&report.dimension, &report.degenerate) {
        (Some(dimension), _) => {
            for sample in &dimension.samples {
                writeln!(
                    out,
                    "  epsilon {:e}: count {} -> D = {:.6}",
                    sample.epsilon, sample.count, sample.dimension
                )?;
            }
            writeln!(out, "dimension: {:.6}", dimension.mean)?;
        }
        (None, Some(reason)) => writeln!(out, "dimension: undefined ({reason})")?,
        (None, None) => writeln!(out, "dimension: undefined")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(args: &[&str]) -> Settings {
        Settings::load_from(std::iter::once("fractal-tree").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_run_classic_tree() {
        let report = run(&settings(&["-d", "6"])).unwrap();
        assert_eq!(report.segments, 63);
        assert_eq!(report.leaves, 32);
        let dimension = report.dimension.unwrap();
        assert_eq!(dimension.samples.len(), 3);
        assert!(dimension.mean > 1.0 && dimension.mean < 2.0);
        assert!(report.degenerate.is_none());
    }

    #[test]
    fn test_run_single_segment_is_reported_undefined() {
        let report = run(&settings(&["-d", "1"])).unwrap();
        assert_eq!(report.segments, 1);
        assert!(report.dimension.is_none());
        assert!(report.degenerate.is_some());

        let mut out = Vec::new();
        print_report(&report, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("dimension: undefined"));
    }

    #[test]
    fn test_run_rejects_invalid_params() {
        let result = run(&settings(&["-d", "0"]));
        assert!(matches!(
            result,
            Err(CliError::Fractal(FractalError::InvalidParameter(_)))
        ));
    }

    #[test]
    fn test_run_rejects_non_positive_epsilon() {
        let result = run(&settings(&["-d", "4", "-e", "0.01,0"]));
        assert!(matches!(
            result,
            Err(CliError::Fractal(FractalError::InvalidParameter(_)))
        ));
    }

    #[test]
    fn test_json_report() {
        let report = run(&settings(&["-d", "3", "-e", "0.01"])).unwrap();
        let mut out = Vec::new();
        print_report(&report, true, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["segments"], 7);
        assert_eq!(value["params"]["depth"], 3);
        assert_eq!(value["dimension"]["samples"][0]["epsilon"], 0.01);
    }

    #[test]
    fn test_text_report() {
        let report = run(&settings(&["-d", "3", "-e", "0.01"])).unwrap();
        let mut out = Vec::new();
        print_report(&report, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("segments: 7 (4 leaves)"));
        assert!(text.contains("dimension: "));
        assert!(text.contains("bounds: "));
    }

    #[test]
    fn test_dump_segments() {
        let path = std::env::temp_dir().join(format!(
            "fractal-tree-{}-segments.json",
            std::process::id()
        ));
        let tree = fractal_tree_lib::TreeParams {
            depth: 3,
            ..Default::default()
        }
        .build()
        .unwrap();
        dump_segments(&path, &tree).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 7);
        assert_eq!(records[0]["parent"], serde_json::Value::Null);
        assert_eq!(records[1]["id"], 1);
    }
}
