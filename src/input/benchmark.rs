//! Code for reading national benchmark intensities from a CSV file.
use super::*;
use crate::benchmark::{BenchmarkResolver, BenchmarkRow};
use log::warn;

const BENCHMARKS_FILE_NAME: &str = "benchmarks.csv";

/// Read the benchmark table, if present.
///
/// Benchmarks are optional: if the file is missing or cannot be parsed, a warning is emitted and
/// every building is compared against the default national averages.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `parameters` - Model parameters
pub fn read_benchmarks(model_dir: &Path, parameters: &ModelParameters) -> BenchmarkResolver {
    let file_path = model_dir.join(BENCHMARKS_FILE_NAME);
    let rows = if file_path.is_file() {
        match read_csv_optional::<BenchmarkRow>(&file_path) {
            Ok(rows) => rows.collect(),
            Err(err) => {
                warn!("Ignoring benchmarks: {err:#}");
                Vec::new()
            }
        }
    } else {
        warn!(
            "No benchmarks file found at {}; default national averages will be used",
            file_path.display()
        );
        Vec::new()
    };

    BenchmarkResolver::new(
        rows,
        parameters.benchmark_strategies.clone(),
        parameters.fallback_country_id,
    )
}
