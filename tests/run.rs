//! Integration tests for the `run` command.
use community_kpis::cli::{RunOpts, handle_run_command};
use community_kpis::log::is_logger_initialised;
use community_kpis::settings::Settings;
use std::path::PathBuf;
use tempfile::tempdir;

/// Get the path to the demo model.
fn get_model_dir() -> PathBuf {
    PathBuf::from("demos/simple")
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("KPI_LOG_LEVEL", "off") };

    // Save results to non-existent directory to check that directory creation works
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        overwrite: false,
    };
    handle_run_command(&get_model_dir(), &opts, Some(Settings::default())).unwrap();
    assert!(is_logger_initialised());

    for file_name in [
        "building_kpis.csv",
        "carrier_kpis.csv",
        "building_finance.csv",
        "community_kpis.csv",
        "community_hourly.csv",
        "building_house_hourly.csv",
        "building_office_hourly.csv",
        "building_school_hourly.csv",
        "kpi_info.log",
        "kpi_error.log",
    ] {
        assert!(output_dir.join(file_name).is_file(), "{file_name} missing");
    }

    // Output folder now has files in it, so it can't be reused without overwriting
    assert_eq!(
        handle_run_command(&get_model_dir(), &opts, Some(Settings::default()))
            .unwrap_err()
            .chain()
            .next()
            .unwrap()
            .to_string(),
        format!(
            "Failed to create output directory: {}",
            output_dir.display()
        )
    );

    // Overwriting is allowed, but logging is already initialised
    let opts = RunOpts {
        output_dir: Some(output_dir),
        overwrite: true,
    };
    assert_eq!(
        handle_run_command(&get_model_dir(), &opts, Some(Settings::default()))
            .unwrap_err()
            .chain()
            .next()
            .unwrap()
            .to_string(),
        "Failed to initialise logging."
    );
}
