pub mod admin;
pub mod entities;
pub mod health;
pub mod invoices;
pub mod statistics;

pub use admin::{purge_entities, seed_entities};
pub use entities::{entity_articles, entity_relations, list_clients, list_entities, list_suppliers};
pub use health::{health_check, metrics_endpoint, readiness_check};
pub use invoices::invoice_lines;
pub use statistics::sales_statistics;
