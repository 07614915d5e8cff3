//! Invoice lines, the discounted-net derivation and article unification.

use super::normalize::{first_text, is_specified, text_or_default};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

/// `ven_factur1` row left-joined to `art_articu`.
#[derive(Debug, Clone, Default, FromRow)]
pub struct InvoiceLineRow {
    pub derenglon: i32,
    pub artnroid: Option<i32>,
    pub deartdescr: Option<String>,
    pub decanti: Option<Decimal>,
    pub depreun: Option<Decimal>,
    pub denetgr: Option<Decimal>,
    pub depordes: Option<Decimal>,
    pub denetcondto: Option<Decimal>,
    pub deimiva: Option<Decimal>,
    pub detotal: Option<Decimal>,
    pub artcodigo: Option<String>,
    pub artdescr: Option<String>,
    pub artcodabr: Option<String>,
    pub artbarra: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    #[serde(rename = "DeRenglon")]
    pub line_number: i32,
    #[serde(rename = "ArtNroId")]
    pub article_id: Option<i32>,
    #[serde(rename = "ArtCodigo")]
    pub article_code: String,
    #[serde(rename = "ArtCodAbr")]
    pub article_short_code: String,
    #[serde(rename = "ArtBarra")]
    pub barcode: String,
    #[serde(rename = "ArtDescr")]
    pub article_description: String,
    #[serde(rename = "DeArtDescr")]
    pub line_description: String,
    #[serde(rename = "DeCanti")]
    pub quantity: Decimal,
    #[serde(rename = "DePreUn")]
    pub unit_price: Decimal,
    #[serde(rename = "DeNetGr")]
    pub net_gross: Decimal,
    #[serde(rename = "DePorDes")]
    pub discount_percent: Decimal,
    #[serde(rename = "NetoConDto")]
    pub discounted_net: Decimal,
    #[serde(rename = "DeImIva")]
    pub tax_amount: Decimal,
    #[serde(rename = "DeTotal")]
    pub total: Decimal,
    /// Number of stored lines folded into this one.
    #[serde(rename = "LineasUnificadas")]
    pub merged_lines: u32,
}

impl From<InvoiceLineRow> for InvoiceLine {
    fn from(row: InvoiceLineRow) -> Self {
        let net_gross = row.denetgr.unwrap_or_default();
        let discount_percent = row.depordes.unwrap_or_default();
        let discounted_net = row
            .denetcondto
            .unwrap_or_else(|| discounted_net(net_gross, discount_percent));

        Self {
            line_number: row.derenglon,
            article_id: row.artnroid,
            article_code: text_or_default(row.artcodigo),
            article_short_code: text_or_default(row.artcodabr),
            barcode: text_or_default(row.artbarra),
            article_description: first_text(&[
                row.artdescr.as_deref(),
                row.deartdescr.as_deref(),
            ]),
            line_description: first_text(&[
                row.deartdescr.as_deref(),
                row.artdescr.as_deref(),
            ]),
            quantity: row.decanti.unwrap_or_default(),
            unit_price: row.depreun.unwrap_or_default(),
            net_gross,
            discount_percent,
            discounted_net,
            tax_amount: row.deimiva.unwrap_or_default(),
            total: row.detotal.unwrap_or_default(),
            merged_lines: 1,
        }
    }
}

impl InvoiceLine {
    /// Grouping key for unification: article code, then short code, then article id,
    /// then the description.
    pub fn unification_key(&self) -> String {
        if is_specified(&self.article_code) {
            self.article_code.clone()
        } else if is_specified(&self.article_short_code) {
            self.article_short_code.clone()
        } else if let Some(id) = self.article_id {
            id.to_string()
        } else {
            format!("sin-codigo-{}", self.line_description)
        }
    }

    fn absorb(&mut self, other: &InvoiceLine) {
        let quantity = self.quantity + other.quantity;
        if !quantity.is_zero() {
            self.unit_price =
                (self.unit_price * self.quantity + other.unit_price * other.quantity) / quantity;
        }
        self.quantity = quantity;
        self.net_gross += other.net_gross;
        self.discounted_net += other.discounted_net;
        self.tax_amount += other.tax_amount;
        self.total += other.total;
        self.merged_lines += other.merged_lines;
    }
}

/// `net_gross * (1 - discount_percent / 100)`, exact in decimal arithmetic.
pub fn discounted_net(net_gross: Decimal, discount_percent: Decimal) -> Decimal {
    net_gross * (Decimal::ONE - discount_percent / Decimal::ONE_HUNDRED)
}

/// Merge lines sharing an article into one, keeping first-seen order.
///
/// Quantities and amounts are summed; the unit price becomes the
/// quantity-weighted average. Applying it twice changes nothing.
pub fn unify_by_article(lines: Vec<InvoiceLine>) -> Vec<InvoiceLine> {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(lines.len());
    let mut unified: Vec<InvoiceLine> = Vec::with_capacity(lines.len());

    for line in lines {
        let key = line.unification_key();
        match index.get(&key) {
            Some(&pos) => unified[pos].absorb(&line),
            None => {
                index.insert(key, unified.len());
                unified.push(line);
            }
        }
    }

    unified
}
