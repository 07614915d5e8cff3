use crate::dtos::SalesStatisticsParams;
use crate::models::SalesStatisticsReport;
use crate::services::record_report;
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Local;
use service_core::error::AppError;

pub async fn sales_statistics(
    State(state): State<AppState>,
    Query(params): Query<SalesStatisticsParams>,
) -> Result<Json<SalesStatisticsReport>, AppError> {
    let period = params.period(Local::now().date_naive())?;

    let result = state.statistics.compute(period).await;
    record_report("sales_statistics", &result);

    Ok(Json(result?))
}
