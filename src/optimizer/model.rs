//! Schedule model builder.
//!
//! Lays out the decision variables, constraints and objective for one
//! request as a linear program. Construction is pure: any physical
//! infeasibility only surfaces at solve time.

use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};

use super::types::{PriceSeries, ScheduleParameters};

/// Fraction of the gap between `soc_max` and `storage_capacity` granted as
/// overshoot allowance at the final step in top-up mode.
const TOP_UP_CEILING_RELAXATION: f64 = 0.1;

/// Objective variant for one request. Flat mode carries its own horizon and
/// unit rate; price-based mode takes the horizon from the series length.
#[derive(Debug, Clone)]
pub enum TariffObjective {
    Flat { horizon: usize, rate: f64 },
    Priced(PriceSeries),
}

impl TariffObjective {
    pub fn horizon(&self) -> usize {
        match self {
            TariffObjective::Flat { horizon, .. } => *horizon,
            TariffObjective::Priced(series) => series.horizon(),
        }
    }
}

/// A fully specified linear program for one scheduling request.
pub struct ScheduleModel {
    pub(crate) vars: ProblemVariables,
    pub(crate) objective: Expression,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) charge: Vec<Variable>,
    pub(crate) discharge: Vec<Variable>,
    pub(crate) soc: Vec<Variable>,
    pub(crate) horizon: usize,
}

impl ScheduleModel {
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Build the program for the given parameters, tariff and top-up flag.
    ///
    /// State balance per step, with efficiency charged on the way in and
    /// the way out:
    ///
    /// ```text
    /// soc[0] = soc_start + eff*charge[0] - discharge[0]/eff
    /// soc[t] = soc[t-1]  + eff*charge[t] - discharge[t]/eff   (t > 0)
    /// ```
    ///
    /// SOC bounds come in three schemes:
    /// - hard band `[soc_min, soc_max]` (flat mode, and price-based mode
    ///   without a penalty);
    /// - soft ceiling (price-based mode with `penalty_per_unit > 0`): the
    ///   floor stays hard, and `excess[t] >= soc[t] - soc_max` feeds the
    ///   objective at `penalty_per_unit` per unit;
    /// - top-up: hard band until the final step, where the ceiling is
    ///   relaxed by 10% of `storage_capacity - soc_max` and the terminal
    ///   state must equal `storage_capacity` exactly.
    pub fn build(params: &ScheduleParameters, tariff: &TariffObjective, top_up: bool) -> Self {
        let horizon = tariff.horizon();
        let eff = params.conversion_efficiency;
        let inv_eff = 1.0 / eff;

        let mut vars = ProblemVariables::new();
        let charge = vars.add_vector(variable().min(0.0).max(params.power_capacity), horizon);
        let discharge = vars.add_vector(variable().min(0.0).max(params.power_capacity), horizon);
        let soc = vars.add_vector(variable().min(0.0), horizon);

        let mut constraints = Vec::with_capacity(3 * horizon + 1);

        for t in 0..horizon {
            let prev: Expression = if t == 0 {
                params.soc_start.into()
            } else {
                soc[t - 1].into()
            };
            let delta = charge[t] * eff - discharge[t] * inv_eff;
            constraints.push(constraint!(soc[t] == prev + delta));
        }

        let soft_ceiling = !top_up
            && matches!(tariff, TariffObjective::Priced(_))
            && params.penalty_per_unit > 0.0;

        let excess = if soft_ceiling {
            vars.add_vector(variable().min(0.0), horizon)
        } else {
            Vec::new()
        };

        if top_up {
            for t in 0..horizon {
                let ceiling = if t + 1 == horizon {
                    params.soc_max
                        + TOP_UP_CEILING_RELAXATION * (params.storage_capacity - params.soc_max)
                } else {
                    params.soc_max
                };
                constraints.push(constraint!(soc[t] >= params.soc_min));
                constraints.push(constraint!(soc[t] <= ceiling));
            }
            if horizon > 0 {
                constraints.push(constraint!(soc[horizon - 1] == params.storage_capacity));
            }
        } else if soft_ceiling {
            for t in 0..horizon {
                constraints.push(constraint!(soc[t] >= params.soc_min));
                constraints.push(constraint!(excess[t] >= soc[t] - params.soc_max));
            }
        } else {
            for t in 0..horizon {
                constraints.push(constraint!(soc[t] >= params.soc_min));
                constraints.push(constraint!(soc[t] <= params.soc_max));
            }
        }

        let energy_cost = match tariff {
            TariffObjective::Flat { rate, .. } => (0..horizon)
                .map(|t| *rate * (charge[t] - discharge[t]))
                .sum::<Expression>(),
            TariffObjective::Priced(series) => (0..horizon)
                .map(|t| charge[t] * series.consumption[t] - discharge[t] * series.production[t])
                .sum::<Expression>(),
        };

        let objective = if soft_ceiling {
            energy_cost
                + excess
                    .iter()
                    .map(|&e| e * params.penalty_per_unit)
                    .sum::<Expression>()
        } else {
            energy_cost
        };

        Self {
            vars,
            objective,
            constraints,
            charge,
            discharge,
            soc,
            horizon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn priced(horizon: usize) -> TariffObjective {
        TariffObjective::Priced(PriceSeries {
            production: vec![1.0; horizon],
            consumption: vec![2.0; horizon],
        })
    }

    #[test]
    fn test_flat_model_shape() {
        let tariff = TariffObjective::Flat {
            horizon: 6,
            rate: 0.1,
        };
        let model = ScheduleModel::build(&params(), &tariff, false);
        assert_eq!(model.horizon(), 6);
        assert_eq!(model.charge.len(), 6);
        assert_eq!(model.discharge.len(), 6);
        assert_eq!(model.soc.len(), 6);
        // 6 balance rows + 12 band rows.
        assert_eq!(model.constraint_count(), 18);
    }

    #[test]
    fn test_top_up_adds_terminal_equality() {
        let tariff = TariffObjective::Flat {
            horizon: 6,
            rate: 0.1,
        };
        let model = ScheduleModel::build(&params(), &tariff, true);
        // 6 balance rows + 12 band rows + the terminal equality.
        assert_eq!(model.constraint_count(), 19);
    }

    #[test]
    fn test_priced_horizon_follows_series() {
        let model = ScheduleModel::build(&params(), &priced(4), false);
        assert_eq!(model.horizon(), 4);
        assert_eq!(model.constraint_count(), 12);
    }

    #[test]
    fn test_penalty_swaps_ceiling_rows_for_excess_rows() {
        let mut p = params();
        p.penalty_per_unit = 0.5;
        let model = ScheduleModel::build(&p, &priced(4), false);
        // 4 balance rows + 4 floor rows + 4 excess rows; same count as the
        // hard band, but the ceiling rows are gone.
        assert_eq!(model.constraint_count(), 12);
    }

    #[test]
    fn test_penalty_is_inert_in_flat_mode() {
        let mut p = params();
        p.penalty_per_unit = 0.5;
        let tariff = TariffObjective::Flat {
            horizon: 6,
            rate: 0.1,
        };
        let model = ScheduleModel::build(&p, &tariff, false);
        assert_eq!(model.constraint_count(), 18);
    }

    #[test]
    fn test_empty_horizon_builds_empty_model() {
        let tariff = TariffObjective::Flat {
            horizon: 0,
            rate: 0.1,
        };
        let model = ScheduleModel::build(&params(), &tariff, true);
        assert_eq!(model.horizon(), 0);
        assert_eq!(model.constraint_count(), 0);
    }
}
