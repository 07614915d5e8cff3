//! Query parameters and response envelopes.
//!
//! Parameters arrive as raw strings so malformed values produce the same JSON
//! error body as every other failure.

use crate::models::{DateRange, InvoiceKey, InvoiceRef, SalesPeriod};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

#[derive(Debug, Default, Deserialize)]
pub struct EntityIdParams {
    pub id: Option<String>,
}

impl EntityIdParams {
    pub fn entity_id(&self) -> Result<i32, AppError> {
        parse_id(self.id.as_deref(), "ID de entidad")
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EntityRelationsParams {
    pub id: Option<String>,
    pub desde: Option<String>,
    pub hasta: Option<String>,
}

impl EntityRelationsParams {
    pub fn entity_id(&self) -> Result<i32, AppError> {
        parse_id(self.id.as_deref(), "ID de entidad")
    }

    pub fn date_range(&self) -> Result<DateRange, AppError> {
        let range = DateRange {
            from: parse_date(self.desde.as_deref(), "desde")?,
            to: parse_date(self.hasta.as_deref(), "hasta")?,
        };
        if let (Some(from), Some(to)) = (range.from, range.to) {
            if from > to {
                return Err(AppError::bad_request(
                    "'desde' no puede ser posterior a 'hasta'",
                ));
            }
        }
        Ok(range)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InvoiceLinesParams {
    pub unificar: Option<String>,
    #[serde(rename = "cveNroId")]
    pub cve_nro_id: Option<String>,
    #[serde(rename = "faTipFa")]
    pub fa_tip_fa: Option<String>,
    #[serde(rename = "faNroF1")]
    pub fa_nro_f1: Option<String>,
    #[serde(rename = "faNroF2")]
    pub fa_nro_f2: Option<String>,
}

impl InvoiceLinesParams {
    pub fn unify(&self) -> Result<bool, AppError> {
        match self.unificar.as_deref().map(str::trim) {
            None | Some("") | Some("false") | Some("0") => Ok(false),
            Some("true") | Some("1") => Ok(true),
            Some(other) => Err(AppError::bad_request(format!(
                "Valor inválido para 'unificar': {}",
                other
            ))),
        }
    }

    /// Composite key when all four parts are present, surrogate `id` when none are.
    pub fn invoice_ref(&self, id: i32) -> Result<InvoiceRef, AppError> {
        let parts = [
            present(&self.cve_nro_id),
            present(&self.fa_tip_fa),
            present(&self.fa_nro_f1),
            present(&self.fa_nro_f2),
        ];

        match parts {
            [None, None, None, None] => Ok(InvoiceRef::Surrogate(id)),
            [Some(channel), Some(doc_type), Some(n1), Some(n2)] => {
                Ok(InvoiceRef::Composite(InvoiceKey {
                    channel_id: parse_number(channel, "cveNroId")?,
                    document_type: doc_type.to_string(),
                    number_1: parse_number(n1, "faNroF1")?,
                    number_2: parse_number(n2, "faNroF2")?,
                }))
            }
            _ => Err(AppError::bad_request(
                "Clave de factura incompleta: se requieren cveNroId, faTipFa, faNroF1 y faNroF2",
            )),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SalesStatisticsParams {
    pub mes: Option<String>,
    pub anio: Option<String>,
}

impl SalesStatisticsParams {
    /// Missing values default to the month and year of `today`.
    pub fn period(&self, today: NaiveDate) -> Result<SalesPeriod, AppError> {
        let current = SalesPeriod::containing(today);
        let month = match present(&self.mes) {
            Some(raw) => parse_number(raw, "mes")?,
            None => current.month(),
        };
        let year = match present(&self.anio) {
            Some(raw) => parse_number(raw, "anio")?,
            None => current.year(),
        };
        SalesPeriod::new(month, year)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub count: usize,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntityResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(rename = "entidadId")]
    pub entidad_id: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntityListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub count: usize,
    #[serde(rename = "entidadId")]
    pub entidad_id: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvoiceLinesResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub count: usize,
    #[serde(rename = "facturaId")]
    pub factura_id: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeedResponse {
    pub success: bool,
    pub inserted: usize,
    pub existing: i64,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PurgeResponse {
    pub success: bool,
    pub deleted: u64,
    pub message: String,
}

fn present(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number(raw: &str, field: &str) -> Result<i32, AppError> {
    raw.trim().parse::<i32>().map_err(|_| {
        AppError::bad_request(format!("'{}' debe ser un número entero: {}", field, raw))
    })
}

/// A required, strictly positive integer id.
pub fn parse_id(raw: Option<&str>, label: &str) -> Result<i32, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::bad_request(format!("{} requerido", label)))?;

    let id: i32 = raw
        .parse()
        .map_err(|_| AppError::bad_request(format!("{} inválido: {}", label, raw)))?;

    if id <= 0 {
        return Err(AppError::bad_request(format!(
            "{} inválido: debe ser un entero positivo",
            label
        )));
    }
    Ok(id)
}

fn parse_date(raw: Option<&str>, field: &str) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                AppError::bad_request(format!(
                    "Fecha inválida en '{}': se espera AAAA-MM-DD",
                    field
                ))
            }),
    }
}
