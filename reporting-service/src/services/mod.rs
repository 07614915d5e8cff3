pub mod aggregator;
pub mod connection;
pub mod database;
pub mod invoice_lines;
pub mod metrics;
pub mod statistics;
pub mod store;

pub use aggregator::EntityAggregator;
pub use connection::ConnectionManager;
pub use database::Database;
pub use invoice_lines::InvoiceLineResolver;
pub use metrics::{get_metrics, init_metrics, record_report};
pub use statistics::SalesStatistics;
pub use store::ReportStore;
