//! Solve & extract.
//!
//! Hands a built [`ScheduleModel`] to the LP backend and translates the
//! outcome into a [`ScheduleResult`] or a typed failure. good_lp only
//! returns a solution when the backend both ran cleanly and proved
//! optimality, so `Ok` covers the spec's two success signals at once.

use good_lp::{default_solver, ResolutionError, Solution, SolverModel, Variable};
use tracing::debug;

use super::error::ScheduleError;
use super::model::ScheduleModel;
use super::types::ScheduleResult;

/// Solve the model and read the optimum back in time order.
///
/// Infeasible or unbounded models are reported, never retried with altered
/// parameters; every other resolution error is a solver fault. A non-finite
/// value read back from a variable or the objective is an extraction
/// failure.
pub fn solve(model: ScheduleModel) -> Result<ScheduleResult, ScheduleError> {
    let ScheduleModel {
        vars,
        objective,
        constraints,
        charge,
        discharge,
        soc,
        horizon,
    } = model;

    let mut problem = vars.minimise(objective.clone()).using(default_solver);
    for c in constraints {
        problem = problem.with(c);
    }

    let solution = match problem.solve() {
        Ok(solution) => solution,
        Err(ResolutionError::Infeasible) | Err(ResolutionError::Unbounded) => {
            return Err(ScheduleError::InfeasibleOrUnbounded)
        }
        Err(other) => return Err(ScheduleError::SolverFault(other.to_string())),
    };

    let mut charge_schedule = Vec::with_capacity(horizon);
    let mut discharge_schedule = Vec::with_capacity(horizon);
    let mut soc_schedule = Vec::with_capacity(horizon);
    for t in 0..horizon {
        charge_schedule.push(read(&solution, charge[t], "charge", t)?);
        discharge_schedule.push(read(&solution, discharge[t], "discharge", t)?);
        soc_schedule.push(read(&solution, soc[t], "soc", t)?);
    }

    let total_cost = solution.eval(&objective);
    if !total_cost.is_finite() {
        return Err(ScheduleError::Extraction(format!(
            "non-finite objective value {total_cost}"
        )));
    }

    debug!(horizon, total_cost, "schedule solved");
    Ok(ScheduleResult {
        total_cost,
        charge_schedule,
        discharge_schedule,
        soc_schedule,
    })
}

fn read<S: Solution>(
    solution: &S,
    var: Variable,
    name: &str,
    t: usize,
) -> Result<f64, ScheduleError> {
    let value = solution.value(var);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScheduleError::Extraction(format!(
            "non-finite value {value} for {name}[{t}]"
        )))
    }
}
