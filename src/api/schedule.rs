use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    api::{error::ApiError, AppState},
    optimizer::{
        solve, PriceSeries, ScheduleModel, ScheduleParameters, ScheduleResult, TariffObjective,
    },
};

/// Query parameters for the flat-tariff operation.
#[derive(Debug, Deserialize)]
pub struct FlatScheduleQuery {
    pub soc_start: f64,
    pub soc_min: f64,
    pub soc_max: f64,
    pub soc_target: f64,
    pub power_capacity: f64,
    pub conversion_efficiency: f64,
    pub storage_capacity: f64,
    #[serde(default)]
    pub top_up: bool,
}

impl FlatScheduleQuery {
    fn into_parts(self) -> (ScheduleParameters, bool) {
        (
            ScheduleParameters {
                soc_start: self.soc_start,
                soc_min: self.soc_min,
                soc_max: self.soc_max,
                soc_target: self.soc_target,
                power_capacity: self.power_capacity,
                conversion_efficiency: self.conversion_efficiency,
                storage_capacity: self.storage_capacity,
                penalty_per_unit: 0.0,
            },
            self.top_up,
        )
    }
}

/// Body for the price-based operation.
#[derive(Debug, Deserialize)]
pub struct PricedScheduleRequest {
    #[serde(flatten)]
    pub params: ScheduleParameters,
    pub prices: PriceSeries,
    #[serde(default)]
    pub top_up: bool,
}

/// GET /api/v1/schedule - flat-tariff schedule over the configured horizon
pub async fn flat_tariff_schedule(
    State(state): State<AppState>,
    Query(query): Query<FlatScheduleQuery>,
) -> Result<Json<ScheduleResult>, ApiError> {
    let (params, top_up) = query.into_parts();
    params.validate(None)?;

    let horizon = state.cfg.tariff.flat_horizon_steps;
    if horizon == 0 {
        return Err(ApiError::BadRequest(
            "flat tariff horizon is configured to zero steps".to_string(),
        ));
    }

    info!(horizon, top_up, "building flat-tariff schedule");
    let tariff = TariffObjective::Flat {
        horizon,
        rate: state.cfg.tariff.flat_rate,
    };
    let model = ScheduleModel::build(&params, &tariff, top_up);
    let result = solve(model)?;
    Ok(Json(result))
}

/// POST /api/v1/schedule - price-based schedule over the series horizon
pub async fn priced_schedule(
    State(_state): State<AppState>,
    Json(request): Json<PricedScheduleRequest>,
) -> Result<Json<ScheduleResult>, ApiError> {
    request.params.validate(Some(&request.prices))?;

    info!(
        horizon = request.prices.horizon(),
        top_up = request.top_up,
        "building price-based schedule"
    );
    let tariff = TariffObjective::Priced(request.prices);
    let model = ScheduleModel::build(&request.params, &tariff, request.top_up);
    let result = solve(model)?;
    Ok(Json(result))
}
