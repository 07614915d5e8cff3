//! Accounting movements and their debit/credit presentation.
//!
//! Effective amount = stored amount, negated when the movement type carries a
//! negative sign (`cta_tipmov.ctmsigno < 0`; NULL counts as positive). A
//! positive effective amount is a debit (`Debe`), a negative one a credit
//! (`Haber`). Exactly one side holds the absolute amount; zero leaves both
//! sides at zero. Running balances are `Haber - Debe`.

use super::normalize::text_or_default;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Ledger table a movement was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementSource {
    /// `cta_movimi`
    Current,
    /// `cta_movhis`
    Archived,
}

impl MovementSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementSource::Current => "current",
            MovementSource::Archived => "archived",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            MovementSource::Current => "cta_movimi",
            MovementSource::Archived => "cta_movhis",
        }
    }
}

#[derive(Debug, Clone, Default, FromRow)]
pub struct MovementRow {
    pub sucnroid: i32,
    pub movnroid: i32,
    pub ctmnroid: Option<i32>,
    pub entnroid: i32,
    pub movfecha: Option<NaiveDate>,
    pub movimpor: Option<Decimal>,
    pub cccdescr: Option<String>,
    pub ctmsigno: Option<i16>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    #[serde(rename = "SucNroId")]
    pub branch_id: i32,
    #[serde(rename = "MovNroId")]
    pub movement_id: i32,
    #[serde(rename = "CtmNroId")]
    pub movement_type_id: Option<i32>,
    #[serde(rename = "EntNroId")]
    pub entity_id: i32,
    #[serde(rename = "MovFecha")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "MovImpor")]
    pub amount: Decimal,
    #[serde(rename = "CCCDescr")]
    pub concept: String,
    #[serde(rename = "Debe")]
    pub debit: Decimal,
    #[serde(rename = "Haber")]
    pub credit: Decimal,
    #[serde(rename = "Origen")]
    pub source: MovementSource,
}

impl Movement {
    pub fn from_row(row: MovementRow, source: MovementSource) -> Self {
        let amount = row.movimpor.unwrap_or_default();
        let (debit, credit) = split_debit_credit(amount, row.ctmsigno);
        Self {
            branch_id: row.sucnroid,
            movement_id: row.movnroid,
            movement_type_id: row.ctmnroid,
            entity_id: row.entnroid,
            date: row.movfecha,
            amount,
            concept: text_or_default(row.cccdescr),
            debit,
            credit,
            source,
        }
    }

    /// Contribution to the running balance.
    pub fn balance(&self) -> Decimal {
        self.credit - self.debit
    }
}

/// Split a stored amount into `(debit, credit)` using the movement type's sign flag.
pub fn split_debit_credit(amount: Decimal, type_sign: Option<i16>) -> (Decimal, Decimal) {
    let effective = if type_sign.unwrap_or(1) < 0 {
        -amount
    } else {
        amount
    };

    if effective > Decimal::ZERO {
        (effective, Decimal::ZERO)
    } else if effective < Decimal::ZERO {
        (Decimal::ZERO, effective.abs())
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    }
}
