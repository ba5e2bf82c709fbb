//! Defines the `ModelParameters` struct, which represents the contents of `model.toml`.
use crate::benchmark::{LookupStrategy, default_lookup_strategies};
use crate::id::{BuildingUseID, CarrierID, CountryID, GenerationSystemID};
use crate::input::{input_err_msg, read_toml};
use crate::kpi::citizen::CitizenFactors;
use crate::units::Dimensionless;
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;

const MODEL_PARAMETERS_FILE_NAME: &str = "model.toml";

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_unit_param_default!(default_discount_rate, Dimensionless, 0.05);
define_param_default!(default_electricity_carrier_id, CarrierID, CarrierID(12));
define_param_default!(default_fallback_country_id, CountryID, CountryID(31));
define_param_default!(default_default_country_id, CountryID, CountryID(31));
define_param_default!(default_financed_system_id, GenerationSystemID, GenerationSystemID(83));
define_param_default!(default_assumed_floor_area, f64, 100.0);
define_param_default!(
    default_residential_use_ids,
    Vec<BuildingUseID>,
    vec![BuildingUseID(1), BuildingUseID(2), BuildingUseID(3)]
);

/// Represents the contents of the entire model file.
///
/// The file is optional and every parameter has a default.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ModelParameters {
    /// The rate at which future cash flows are discounted
    #[serde(default = "default_discount_rate")]
    pub discount_rate: Dimensionless,
    /// The carrier used for electricity drawn from the grid
    #[serde(default = "default_electricity_carrier_id")]
    pub electricity_carrier_id: CarrierID,
    /// Country whose factors and benchmarks are used when a country has no data of its own
    #[serde(default = "default_fallback_country_id")]
    pub fallback_country_id: CountryID,
    /// Country assumed for buildings which don't specify one
    #[serde(default = "default_default_country_id")]
    pub default_country_id: CountryID,
    /// Generation system for which a financial appraisal is carried out
    #[serde(default = "default_financed_system_id")]
    pub financed_system_id: GenerationSystemID,
    /// Building uses charged at the household tariff
    #[serde(default = "default_residential_use_ids")]
    pub residential_use_ids: Vec<BuildingUseID>,
    /// Floor area assumed for buildings with no known area (m²)
    #[serde(default = "default_assumed_floor_area")]
    pub assumed_floor_area: f64,
    /// Order in which benchmark lookups are tried
    #[serde(default = "default_lookup_strategies")]
    pub benchmark_strategies: Vec<LookupStrategy>,
    /// Factors for the everyday-equivalent KPIs
    #[serde(default)]
    pub citizen_factors: CitizenFactors,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            discount_rate: default_discount_rate(),
            electricity_carrier_id: default_electricity_carrier_id(),
            fallback_country_id: default_fallback_country_id(),
            default_country_id: default_default_country_id(),
            financed_system_id: default_financed_system_id(),
            residential_use_ids: default_residential_use_ids(),
            assumed_floor_area: default_assumed_floor_area(),
            benchmark_strategies: default_lookup_strategies(),
            citizen_factors: CitizenFactors::default(),
        }
    }
}

/// Check that the `discount_rate` parameter is valid
fn check_discount_rate(value: Dimensionless) -> Result<()> {
    ensure!(
        value.is_finite() && value > Dimensionless(-1.0),
        "discount_rate must be a finite number greater than -1"
    );

    Ok(())
}

/// Check that the `assumed_floor_area` parameter is valid
fn check_assumed_floor_area(value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value > 0.0,
        "assumed_floor_area must be a finite number greater than zero"
    );

    Ok(())
}

/// Check that the `benchmark_strategies` parameter is valid
fn check_benchmark_strategies(strategies: &[LookupStrategy]) -> Result<()> {
    for (i, strategy) in strategies.iter().enumerate() {
        ensure!(
            !strategies[..i].contains(strategy),
            "benchmark_strategies contains {strategy:?} more than once"
        );
    }

    Ok(())
}

impl ModelParameters {
    /// Read a model file from the specified directory.
    ///
    /// If the file is not present, default values are used.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model configuration files
    ///
    /// # Returns
    ///
    /// The model file contents as a [`ModelParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<ModelParameters> {
        let file_path = model_dir.as_ref().join(MODEL_PARAMETERS_FILE_NAME);
        if !file_path.is_file() {
            return Ok(ModelParameters::default());
        }

        let model_params: ModelParameters = read_toml(&file_path)?;
        model_params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(model_params)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        check_discount_rate(self.discount_rate)?;
        check_assumed_floor_area(self.assumed_floor_area)?;
        check_benchmark_strategies(&self.benchmark_strategies)?;
        self.citizen_factors.validate()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_model_params_from_path_no_file() {
        let dir = tempdir().unwrap();
        assert_eq!(
            ModelParameters::from_path(dir.path()).unwrap(),
            ModelParameters::default()
        );
    }

    #[test]
    fn test_model_params_from_path() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(MODEL_PARAMETERS_FILE_NAME)).unwrap();
            writeln!(
                file,
                "discount_rate = 0.03
residential_use_ids = [1]
benchmark_strategies = [\"exact\", \"fallback_country\"]

[citizen_factors]
pizza_kwh = 1.5"
            )
            .unwrap();
        }

        let params = ModelParameters::from_path(dir.path()).unwrap();
        assert_eq!(params.discount_rate, Dimensionless(0.03));
        assert_eq!(params.residential_use_ids, [BuildingUseID(1)]);
        assert_eq!(
            params.benchmark_strategies,
            [LookupStrategy::Exact, LookupStrategy::FallbackCountry]
        );
        assert_eq!(params.citizen_factors.pizza_kwh.to_bits(), 1.5_f64.to_bits());
        assert_eq!(params.electricity_carrier_id, CarrierID(12));
    }

    #[test]
    fn test_model_params_from_path_invalid() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(MODEL_PARAMETERS_FILE_NAME)).unwrap();
            writeln!(file, "assumed_floor_area = 0.0").unwrap();
        }

        assert!(ModelParameters::from_path(dir.path()).is_err());
    }

    #[rstest]
    #[case(0.05, true)]
    #[case(0.0, true)]
    #[case(-0.5, true)]
    #[case(-1.0, false)]
    #[case(f64::INFINITY, false)]
    #[case(f64::NAN, false)]
    fn test_check_discount_rate(#[case] value: f64, #[case] expected_valid: bool) {
        assert_eq!(
            check_discount_rate(Dimensionless(value)).is_ok(),
            expected_valid
        );
    }

    #[rstest]
    #[case(100.0, true)]
    #[case(0.0, false)]
    #[case(-10.0, false)]
    #[case(f64::NAN, false)]
    fn test_check_assumed_floor_area(#[case] value: f64, #[case] expected_valid: bool) {
        assert_eq!(check_assumed_floor_area(value).is_ok(), expected_valid);
    }

    #[test]
    fn test_check_benchmark_strategies() {
        assert!(check_benchmark_strategies(&default_lookup_strategies()).is_ok());
        assert!(check_benchmark_strategies(&[]).is_ok());
        assert!(
            check_benchmark_strategies(&[LookupStrategy::Exact, LookupStrategy::Exact]).is_err()
        );
    }
}
