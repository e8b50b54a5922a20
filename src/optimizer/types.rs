use serde::{Deserialize, Serialize};

use super::error::ScheduleError;

/// Physical and economic limits for one scheduling request. Immutable once
/// validated; every request gets its own copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleParameters {
    /// State of charge at the start of the horizon.
    pub soc_start: f64,
    pub soc_min: f64,
    pub soc_max: f64,
    /// Accepted for wire compatibility; no constraint reads it. Top-up mode
    /// targets `storage_capacity` instead.
    pub soc_target: f64,
    /// Symmetric cap on instantaneous charge and discharge power.
    pub power_capacity: f64,
    /// Round-trip efficiency, applied on the way in (multiplied) and on the
    /// way out (divided), never symmetrically.
    pub conversion_efficiency: f64,
    /// Physical maximum state of charge; the top-up terminal target.
    pub storage_capacity: f64,
    /// Cost per unit of state of charge above `soc_max` in price-based mode.
    /// Zero keeps the ceiling hard.
    #[serde(default)]
    pub penalty_per_unit: f64,
}

/// Per-period sell (production) and buy (consumption) prices. The shared
/// length is the scheduling horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    pub production: Vec<f64>,
    pub consumption: Vec<f64>,
}

impl PriceSeries {
    pub fn horizon(&self) -> usize {
        self.production.len()
    }
}

/// Solved schedule, one value per period in time order. Produced once by
/// solve-and-extract, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub total_cost: f64,
    pub charge_schedule: Vec<f64>,
    pub discharge_schedule: Vec<f64>,
    pub soc_schedule: Vec<f64>,
}

impl ScheduleParameters {
    /// Check the request against the operating invariants before any model
    /// is built. Fails fast: the first violated rule is reported. Pure.
    pub fn validate(&self, prices: Option<&PriceSeries>) -> Result<(), ScheduleError> {
        if self.soc_min > self.soc_max {
            return Err(ScheduleError::InvalidParameter {
                field: "soc_min",
                message: format!(
                    "soc_min ({}) must not exceed soc_max ({})",
                    self.soc_min, self.soc_max
                ),
            });
        }

        if let Some(series) = prices {
            if series.production.is_empty()
                || series.production.len() != series.consumption.len()
            {
                return Err(ScheduleError::InvalidParameter {
                    field: "prices",
                    message: format!(
                        "production (len {}) and consumption (len {}) must have the same non-zero length",
                        series.production.len(),
                        series.consumption.len()
                    ),
                });
            }
        }

        if self.conversion_efficiency <= 0.0 {
            return Err(ScheduleError::InvalidParameter {
                field: "conversion_efficiency",
                message: format!("must be positive, got {}", self.conversion_efficiency),
            });
        }

        if self.power_capacity < 0.0 {
            return Err(ScheduleError::InvalidParameter {
                field: "power_capacity",
                message: format!("must be non-negative, got {}", self.power_capacity),
            });
        }

        if self.penalty_per_unit < 0.0 {
            return Err(ScheduleError::InvalidParameter {
                field: "penalty_per_unit",
                message: format!("must be non-negative, got {}", self.penalty_per_unit),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn params() -> ScheduleParameters {
        ScheduleParameters {
            soc_start: 10.0,
            soc_min: 0.0,
            soc_max: 50.0,
            soc_target: 40.0,
            power_capacity: 10.0,
            conversion_efficiency: 0.9,
            storage_capacity: 50.0,
            penalty_per_unit: 0.0,
        }
    }

    fn prices(production: usize, consumption: usize) -> PriceSeries {
        PriceSeries {
            production: vec![1.0; production],
            consumption: vec![1.0; consumption],
        }
    }

    #[test]
    fn test_accepts_valid_parameters() {
        assert!(params().validate(None).is_ok());
        assert!(params().validate(Some(&prices(6, 6))).is_ok());
    }

    #[rstest]
    #[case(0.0, 50.0, true)]
    #[case(50.0, 50.0, true)]
    #[case(50.1, 50.0, false)]
    #[case(-10.0, -20.0, false)]
    fn test_soc_band_rule(#[case] soc_min: f64, #[case] soc_max: f64, #[case] ok: bool) {
        let mut p = params();
        p.soc_min = soc_min;
        p.soc_max = soc_max;
        assert_eq!(p.validate(None).is_ok(), ok);
    }

    #[rstest]
    #[case(6, 5)]
    #[case(0, 0)]
    #[case(0, 3)]
    fn test_rejects_bad_price_series(#[case] production: usize, #[case] consumption: usize) {
        let err = params()
            .validate(Some(&prices(production, consumption)))
            .unwrap_err();
        match err {
            ScheduleError::InvalidParameter { field, .. } => assert_eq!(field, "prices"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    #[case(0.0)]
    #[case(-0.9)]
    fn test_rejects_non_positive_efficiency(#[case] efficiency: f64) {
        let mut p = params();
        p.conversion_efficiency = efficiency;
        let err = p.validate(None).unwrap_err();
        match err {
            ScheduleError::InvalidParameter { field, .. } => {
                assert_eq!(field, "conversion_efficiency")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_negative_power_capacity() {
        let mut p = params();
        p.power_capacity = -1.0;
        let err = p.validate(None).unwrap_err();
        match err {
            ScheduleError::InvalidParameter { field, .. } => assert_eq!(field, "power_capacity"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_negative_penalty() {
        let mut p = params();
        p.penalty_per_unit = -0.1;
        let err = p.validate(None).unwrap_err();
        match err {
            ScheduleError::InvalidParameter { field, .. } => assert_eq!(field, "penalty_per_unit"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reports_first_violation_in_rule_order() {
        // Band rule fires before the efficiency rule even though both are
        // violated here.
        let mut p = params();
        p.soc_min = 60.0;
        p.conversion_efficiency = 0.0;
        let err = p.validate(None).unwrap_err();
        match err {
            ScheduleError::InvalidParameter { field, .. } => assert_eq!(field, "soc_min"),
            other => panic!("unexpected error: {other}"),
        }

        // Price rule fires before the efficiency rule.
        let mut p = params();
        p.conversion_efficiency = 0.0;
        let err = p.validate(Some(&prices(6, 5))).unwrap_err();
        match err {
            ScheduleError::InvalidParameter { field, .. } => assert_eq!(field, "prices"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_penalty_defaults_to_zero_when_omitted() {
        let json = r#"{
            "soc_start": 20.0, "soc_min": 10.0, "soc_max": 90.0,
            "soc_target": 90.0, "power_capacity": 10.0,
            "conversion_efficiency": 1.0, "storage_capacity": 100.0
        }"#;
        let p: ScheduleParameters = serde_json::from_str(json).unwrap();
        assert_eq!(p.penalty_per_unit, 0.0);
    }
}
