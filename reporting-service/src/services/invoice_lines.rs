//! Invoice line retrieval with optional per-article unification.

use crate::models::{unify_by_article, Invoice, InvoiceLine, InvoiceRef};
use crate::services::aggregator::EntityAggregator;
use crate::services::store::ReportStore;
use service_core::error::AppError;
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct InvoiceLineResolver {
    store: Arc<dyn ReportStore>,
    entities: EntityAggregator,
}

impl InvoiceLineResolver {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self {
            entities: EntityAggregator::new(store.clone()),
            store,
        }
    }

    /// Lines of one invoice, in line order, or merged per article when `unify` is set.
    #[instrument(skip(self))]
    pub async fn lines(
        &self,
        invoice: &InvoiceRef,
        unify: bool,
    ) -> Result<(Invoice, Vec<InvoiceLine>), AppError> {
        let invoice = self
            .store
            .find_invoice(invoice)
            .await?
            .map(Invoice::from)
            .ok_or_else(|| AppError::not_found(describe_missing(invoice)))?;

        let lines: Vec<InvoiceLine> = self
            .store
            .list_invoice_lines(&invoice.key)
            .await?
            .into_iter()
            .map(InvoiceLine::from)
            .collect();

        debug!(invoice_id = invoice.id, lines = lines.len(), unify, "Invoice lines loaded");

        let lines = if unify { unify_by_article(lines) } else { lines };
        Ok((invoice, lines))
    }

    /// Everything an entity has been invoiced, merged per article.
    #[instrument(skip(self))]
    pub async fn article_summary(&self, entity_id: i32) -> Result<Vec<InvoiceLine>, AppError> {
        self.entities.require_entity(entity_id).await?;

        let lines = self
            .store
            .list_entity_invoice_lines(entity_id)
            .await?
            .into_iter()
            .map(InvoiceLine::from)
            .collect();

        Ok(unify_by_article(lines))
    }
}

fn describe_missing(invoice: &InvoiceRef) -> String {
    match invoice {
        InvoiceRef::Surrogate(id) => format!("Factura {} no encontrada", id),
        InvoiceRef::Composite(key) => format!(
            "Factura {} {}-{} (canal {}) no encontrada",
            key.document_type, key.number_1, key.number_2, key.channel_id
        ),
    }
}
