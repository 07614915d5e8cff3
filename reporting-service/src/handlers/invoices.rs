use crate::dtos::{parse_id, InvoiceLinesParams, InvoiceLinesResponse};
use crate::models::InvoiceLine;
use crate::services::record_report;
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use service_core::error::AppError;

pub async fn invoice_lines(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<InvoiceLinesParams>,
) -> Result<Json<InvoiceLinesResponse<InvoiceLine>>, AppError> {
    let id = parse_id(Some(&id), "ID de factura")?;
    let invoice = params.invoice_ref(id)?;
    let unify = params.unify()?;

    let result = state.invoices.lines(&invoice, unify).await;
    record_report("invoice_lines", &result);
    let (invoice, lines) = result?;

    Ok(Json(InvoiceLinesResponse {
        success: true,
        count: lines.len(),
        data: lines,
        factura_id: invoice.id,
    }))
}
