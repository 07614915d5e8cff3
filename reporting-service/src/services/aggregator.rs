//! Consolidated per-entity view assembled from independent store reads.

use crate::models::{
    ClientProfile, DateRange, Debt, Entity, EntityRelations, Invoice, Movement, MovementSource,
    SupplierProfile,
};
use crate::services::metrics::SUBFETCH_FAILURES_TOTAL;
use crate::services::store::ReportStore;
use service_core::error::AppError;
use std::sync::Arc;
use tracing::{instrument, warn};

#[derive(Clone)]
pub struct EntityAggregator {
    store: Arc<dyn ReportStore>,
}

impl EntityAggregator {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    /// Build the consolidated view of one entity.
    ///
    /// A missing entity is `NotFound`. Once the entity is known, a failing
    /// sub-fetch degrades to its empty value unless the store is unreachable.
    #[instrument(skip(self))]
    pub async fn relations(
        &self,
        entity_id: i32,
        range: DateRange,
    ) -> Result<EntityRelations, AppError> {
        let entity = self.require_entity(entity_id).await?;

        let (client, supplier, debts, current, archived, invoices) = tokio::join!(
            self.store.get_client_profile(entity_id),
            self.store.get_supplier_profile(entity_id),
            self.store.list_debts(entity_id),
            self.store.list_movements(entity_id, MovementSource::Current),
            self.store.list_movements(entity_id, MovementSource::Archived),
            self.store.list_invoices(entity_id),
        );

        let client = tolerate("client", entity_id, client)?;
        let supplier = tolerate("supplier", entity_id, supplier)?;
        let debts = tolerate("debts", entity_id, debts)?;
        let current = tolerate("movements_current", entity_id, current)?;
        let archived = tolerate("movements_archived", entity_id, archived)?;
        let invoices = tolerate("invoices", entity_id, invoices)?;

        let movements = current
            .into_iter()
            .map(|row| Movement::from_row(row, MovementSource::Current))
            .chain(
                archived
                    .into_iter()
                    .map(|row| Movement::from_row(row, MovementSource::Archived)),
            )
            .filter(|m| range.contains(m.date))
            .collect();

        Ok(EntityRelations {
            entity,
            client: client.map(ClientProfile::from),
            proveedor: supplier.map(SupplierProfile::from),
            deuda: debts
                .into_iter()
                .map(Debt::from)
                .filter(|d| range.contains(d.date))
                .collect(),
            movimientos_combinados: movements,
            facturas: invoices.into_iter().map(Invoice::from).collect(),
        })
    }

    /// Fetch the entity or fail with `NotFound`.
    pub async fn require_entity(&self, entity_id: i32) -> Result<Entity, AppError> {
        self.store
            .get_entity(entity_id)
            .await?
            .map(Entity::from)
            .ok_or_else(|| AppError::not_found(format!("Entidad {} no encontrada", entity_id)))
    }
}

/// Swallow a sub-fetch failure into its empty value. Connection failures pass through.
fn tolerate<T: Default>(
    relation: &'static str,
    entity_id: i32,
    result: Result<T, AppError>,
) -> Result<T, AppError> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.is_connection_error() => Err(e),
        Err(e) => {
            warn!(relation, entity_id, error = %e, "Related data unavailable, returning empty");
            SUBFETCH_FAILURES_TOTAL.with_label_values(&[relation]).inc();
            Ok(T::default())
        }
    }
}
