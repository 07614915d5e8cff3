//! Outstanding debts per entity.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Default, FromRow)]
pub struct DebtRow {
    pub sucnroid: i32,
    pub deunroid: i32,
    pub entnroid: i32,
    pub deufecha: Option<NaiveDate>,
    pub deuimpor: Option<Decimal>,
    pub deusaldo: Option<Decimal>,
}

/// Debt record. Zero and negative balances are real values and pass through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    #[serde(rename = "SucNroId")]
    pub branch_id: i32,
    #[serde(rename = "DeuNroId")]
    pub debt_id: i32,
    #[serde(rename = "EntNroId")]
    pub entity_id: i32,
    #[serde(rename = "DeuFecha")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "DeuImpor")]
    pub amount: Decimal,
    #[serde(rename = "DeuSaldo")]
    pub balance: Decimal,
}

impl From<DebtRow> for Debt {
    fn from(row: DebtRow) -> Self {
        Self {
            branch_id: row.sucnroid,
            debt_id: row.deunroid,
            entity_id: row.entnroid,
            date: row.deufecha,
            amount: row.deuimpor.unwrap_or_default(),
            balance: row.deusaldo.unwrap_or_default(),
        }
    }
}
