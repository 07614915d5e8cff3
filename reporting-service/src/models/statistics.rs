//! Monthly sales statistics.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use sqlx::FromRow;

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;
pub const TOP_ARTICLES_LIMIT: i64 = 5;

/// A validated (month, year) period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesPeriod {
    month: i32,
    year: i32,
}

impl SalesPeriod {
    pub fn new(month: i32, year: i32) -> Result<Self, AppError> {
        if !(1..=12).contains(&month) {
            return Err(AppError::bad_request("El mes debe estar entre 1 y 12"));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(AppError::bad_request(format!(
                "El año debe estar entre {} y {}",
                MIN_YEAR, MAX_YEAR
            )));
        }
        Ok(Self { month, year })
    }

    /// Period containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            month: date.month() as i32,
            year: date.year(),
        }
    }

    pub fn month(&self) -> i32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

#[derive(Debug, Clone, Default, FromRow)]
pub struct SalesSummaryRow {
    pub total_ventas: Option<i64>,
    pub total_facturacion: Option<Decimal>,
    pub promedio_venta: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    #[serde(rename = "TotalVentas")]
    pub invoice_count: i64,
    #[serde(rename = "TotalFacturacion")]
    pub total_billed: Decimal,
    #[serde(rename = "PromedioVenta")]
    pub average_sale: Decimal,
}

impl From<SalesSummaryRow> for SalesSummary {
    fn from(row: SalesSummaryRow) -> Self {
        Self {
            invoice_count: row.total_ventas.unwrap_or_default(),
            total_billed: row.total_facturacion.unwrap_or_default(),
            average_sale: row.promedio_venta.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, FromRow)]
pub struct TopArticleRow {
    pub descripcion: Option<String>,
    pub codigo: Option<String>,
    pub cantidad_vendida: Option<Decimal>,
    pub total_ventas: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopArticle {
    #[serde(rename = "Descripcion")]
    pub description: String,
    #[serde(rename = "Codigo")]
    pub code: String,
    #[serde(rename = "CantidadVendida")]
    pub quantity_sold: Decimal,
    #[serde(rename = "TotalVentas")]
    pub total_sales: Decimal,
}

impl From<TopArticleRow> for TopArticle {
    fn from(row: TopArticleRow) -> Self {
        Self {
            description: super::normalize::text_or_default(row.descripcion),
            code: super::normalize::text_or_default(row.codigo),
            quantity_sold: row.cantidad_vendida.unwrap_or_default(),
            total_sales: row.total_ventas.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, FromRow)]
pub struct DailySalesRow {
    pub dia: i32,
    pub cantidad_ventas: Option<i64>,
    pub total_dia: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySales {
    #[serde(rename = "Dia")]
    pub day: i32,
    #[serde(rename = "CantidadVentas")]
    pub invoice_count: i64,
    #[serde(rename = "TotalDia")]
    pub total: Decimal,
}

impl From<DailySalesRow> for DailySales {
    fn from(row: DailySalesRow) -> Self {
        Self {
            day: row.dia,
            invoice_count: row.cantidad_ventas.unwrap_or_default(),
            total: row.total_dia.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesStatisticsReport {
    pub mes: i32,
    pub anio: i32,
    #[serde(rename = "resumenVentas")]
    pub summary: SalesSummary,
    #[serde(rename = "articulosMasVendidos")]
    pub top_articles: Vec<TopArticle>,
    #[serde(rename = "ventasDiarias")]
    pub daily_sales: Vec<DailySales>,
}
