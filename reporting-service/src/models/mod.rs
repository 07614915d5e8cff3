//! Domain models for reporting-service.
//!
//! Each store table has a `*Row` type mirroring its nullable columns and a
//! presentation type with every field resolved.

mod debt;
mod entity;
mod invoice;
mod invoice_line;
mod movement;
mod normalize;
mod relations;
mod statistics;

pub use debt::{Debt, DebtRow};
pub use entity::{
    ClientProfile, ClientProfileRow, Entity, EntityRow, NewEntity, SupplierProfile,
    SupplierProfileRow,
};
pub use invoice::{Invoice, InvoiceKey, InvoiceRef, InvoiceRow};
pub use invoice_line::{discounted_net, unify_by_article, InvoiceLine, InvoiceLineRow};
pub use movement::{split_debit_credit, Movement, MovementRow, MovementSource};
pub use normalize::{text_or_default, NOT_SPECIFIED};
pub use relations::{DateRange, EntityRelations};
pub use statistics::{
    DailySales, DailySalesRow, SalesPeriod, SalesStatisticsReport, SalesSummary, SalesSummaryRow,
    TopArticle, TopArticleRow, TOP_ARTICLES_LIMIT,
};
