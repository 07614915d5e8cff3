//! Consolidated per-entity view.

use super::{ClientProfile, Debt, Entity, Invoice, Movement, SupplierProfile};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRelations {
    pub entity: Entity,
    pub client: Option<ClientProfile>,
    pub proveedor: Option<SupplierProfile>,
    pub deuda: Vec<Debt>,
    #[serde(rename = "movimientosCombinados")]
    pub movimientos_combinados: Vec<Movement>,
    pub facturas: Vec<Invoice>,
}

/// Inclusive date filter; rows without a date are dropped while it is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_active(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        if !self.is_active() {
            return true;
        }
        match date {
            None => false,
            Some(d) => self.from.map_or(true, |f| d >= f) && self.to.map_or(true, |t| d <= t),
        }
    }
}
