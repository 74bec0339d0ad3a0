use std::path::Path;

use crate::error::Result;
use crate::optimizer::OptimizerConfig;
use crate::state::save_config;
use crate::tuner::evaluation::EvaluationResult;

/// Write all results to a CSV file.
pub fn write_csv(results: &[EvaluationResult], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "rank",
        "num_sweeps",
        "hot_acceptance",
        "cold_acceptance",
        "magnitude_weight",
        "mean_rms",
        "worst_rms",
        "degenerate_count",
        "mean_elapsed_ms",
    ])?;

    for (i, result) in results.iter().enumerate() {
        wtr.write_record([
            (i + 1).to_string(),
            result.knobs.num_sweeps.to_string(),
            format!("{:.3}", result.knobs.hot_acceptance),
            format!("{:.4}", result.knobs.cold_acceptance),
            format!("{:.3}", result.knobs.magnitude_weight),
            format!("{:.6}", result.mean_rms),
            format!("{:.6}", result.worst_rms),
            result.degenerate_count.to_string(),
            format!("{:.2}", result.mean_elapsed_ms),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write `base` with the best knobs applied, loadable with `--config`.
pub fn write_best_json(best: &EvaluationResult, base: &OptimizerConfig, path: &Path) -> Result<()> {
    let mut config = best.knobs.apply(base);
    config.anneal.seed = None;
    save_config(path, &config)
}

/// Print top-k results to stdout.
pub fn print_topk(results: &[EvaluationResult], k: usize) {
    println!("\n=== Top {} Results (by residual) ===\n", k.min(results.len()));

    for (i, result) in results.iter().take(k).enumerate() {
        println!(
            "#{}: rms={:.5} worst={:.5} degenerate={} time={:.1}ms",
            i + 1,
            result.mean_rms,
            result.worst_rms,
            result.degenerate_count,
            result.mean_elapsed_ms
        );
        println!("    {}", result.knobs.display());
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::load_config;
    use crate::tuner::knobs::TunerKnobs;
    use tempfile::NamedTempFile;

    fn result(num_sweeps: usize, mean_rms: f64) -> EvaluationResult {
        EvaluationResult {
            knobs: TunerKnobs {
                num_sweeps,
                ..Default::default()
            },
            mean_rms,
            worst_rms: mean_rms * 2.0,
            degenerate_count: 0,
            mean_elapsed_ms: 3.5,
            per_seed: Vec::new(),
        }
    }

    #[test]
    fn test_write_csv_rows() {
        let file = NamedTempFile::new().unwrap();
        write_csv(&[result(300, 0.01), result(500, 0.02)], file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("rank,num_sweeps"));
        assert!(lines[1].starts_with("1,300,"));
        assert!(lines[2].starts_with("2,500,"));
    }

    #[test]
    fn test_write_best_json_loads_as_config() {
        let mut base = OptimizerConfig::default();
        base.anneal.num_reads = 12;
        base.anneal.seed = Some(9);

        let file = NamedTempFile::new().unwrap();
        write_best_json(&result(321, 0.01), &base, file.path()).unwrap();

        let loaded = load_config(file.path()).unwrap();
        assert_eq!(loaded.anneal.num_sweeps, 321);
        assert_eq!(loaded.anneal.num_reads, 12);
        assert_eq!(loaded.anneal.seed, None);
    }
}
