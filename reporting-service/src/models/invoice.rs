//! Sales invoices and the two ways of addressing them.

use super::normalize::text_or_default;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Composite key of `ven_factur`: sales channel, document type and two sequence numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceKey {
    #[serde(rename = "CVeNroId")]
    pub channel_id: i32,
    #[serde(rename = "FaTipFa")]
    pub document_type: String,
    #[serde(rename = "FaNroF1")]
    pub number_1: i32,
    #[serde(rename = "FaNroF2")]
    pub number_2: i32,
}

/// How a caller points at an invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceRef {
    /// `ven_factur.faid`, used by list views.
    Surrogate(i32),
    Composite(InvoiceKey),
}

#[derive(Debug, Clone, Default, FromRow)]
pub struct InvoiceRow {
    pub faid: i32,
    pub cvenroid: i32,
    pub fatipfa: String,
    pub fanrof1: i32,
    pub fanrof2: i32,
    pub entnroid: i32,
    pub fanumero: Option<String>,
    pub fafecha: Option<NaiveDate>,
    pub fatotal: Option<Decimal>,
    pub faestado: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(rename = "FactNroId")]
    pub id: i32,
    #[serde(flatten)]
    pub key: InvoiceKey,
    #[serde(rename = "EntNroId")]
    pub entity_id: i32,
    #[serde(rename = "FactNumero")]
    pub number: String,
    #[serde(rename = "FactFecha")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "FaTotal")]
    pub total: Decimal,
    #[serde(rename = "FactEstado")]
    pub status: String,
}

impl From<InvoiceRow> for Invoice {
    fn from(row: InvoiceRow) -> Self {
        Self {
            id: row.faid,
            key: InvoiceKey {
                channel_id: row.cvenroid,
                document_type: row.fatipfa.trim().to_string(),
                number_1: row.fanrof1,
                number_2: row.fanrof2,
            },
            entity_id: row.entnroid,
            number: text_or_default(row.fanumero),
            date: row.fafecha,
            total: row.fatotal.unwrap_or_default(),
            status: text_or_default(row.faestado),
        }
    }
}
