//! Query executor seam between the report components and the relational store.

use crate::models::{
    ClientProfileRow, DailySalesRow, DebtRow, EntityRow, InvoiceKey, InvoiceLineRow, InvoiceRef,
    InvoiceRow, MovementRow, MovementSource, NewEntity, SalesPeriod, SalesSummaryRow,
    SupplierProfileRow, TopArticleRow,
};
use async_trait::async_trait;
use service_core::error::AppError;

/// One typed, parameterized statement per method.
///
/// Implementations never retry. Unreachable stores and expired statements
/// surface as [`AppError::ConnectionError`], malformed statements as
/// [`AppError::DatabaseError`], constraint violations as
/// [`AppError::IntegrityError`].
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn health_check(&self) -> Result<(), AppError>;

    async fn list_entities(&self) -> Result<Vec<EntityRow>, AppError>;

    async fn list_clients(&self, limit: i64) -> Result<Vec<ClientProfileRow>, AppError>;

    async fn list_suppliers(&self) -> Result<Vec<SupplierProfileRow>, AppError>;

    async fn get_entity(&self, entity_id: i32) -> Result<Option<EntityRow>, AppError>;

    async fn get_client_profile(&self, entity_id: i32)
        -> Result<Option<ClientProfileRow>, AppError>;

    async fn get_supplier_profile(
        &self,
        entity_id: i32,
    ) -> Result<Option<SupplierProfileRow>, AppError>;

    async fn list_debts(&self, entity_id: i32) -> Result<Vec<DebtRow>, AppError>;

    async fn list_movements(
        &self,
        entity_id: i32,
        source: MovementSource,
    ) -> Result<Vec<MovementRow>, AppError>;

    async fn list_invoices(&self, entity_id: i32) -> Result<Vec<InvoiceRow>, AppError>;

    async fn find_invoice(&self, invoice: &InvoiceRef) -> Result<Option<InvoiceRow>, AppError>;

    /// Lines of one invoice, ordered by line number.
    async fn list_invoice_lines(&self, key: &InvoiceKey) -> Result<Vec<InvoiceLineRow>, AppError>;

    /// Lines of every sale issued to an entity; credit-note channels (`cvesigno < 0`) are left out.
    async fn list_entity_invoice_lines(
        &self,
        entity_id: i32,
    ) -> Result<Vec<InvoiceLineRow>, AppError>;

    async fn sales_summary(&self, period: SalesPeriod) -> Result<SalesSummaryRow, AppError>;

    async fn top_articles(
        &self,
        period: SalesPeriod,
        limit: i64,
    ) -> Result<Vec<TopArticleRow>, AppError>;

    async fn daily_sales(&self, period: SalesPeriod) -> Result<Vec<DailySalesRow>, AppError>;

    async fn count_entities(&self) -> Result<i64, AppError>;

    /// Insert a bare entity and return its generated id.
    async fn insert_entity(&self, entity: &NewEntity) -> Result<i32, AppError>;

    /// Delete every entity and restart the id sequence; returns the deleted count.
    async fn purge_entities(&self) -> Result<u64, AppError>;
}
