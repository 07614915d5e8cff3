#![allow(dead_code)]

use async_trait::async_trait;
use reporting_service::config::{DatabaseConfig, ReportingConfig};
use reporting_service::models::{
    ClientProfileRow, DailySalesRow, DebtRow, EntityRow, InvoiceKey, InvoiceLineRow, InvoiceRef,
    InvoiceRow, MovementRow, MovementSource, NewEntity, SalesPeriod, SalesSummaryRow,
    SupplierProfileRow, TopArticleRow,
};
use reporting_service::services::ReportStore;
use reporting_service::startup::Application;
use rust_decimal::Decimal;
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Kind of failure a store operation can be told to return.
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Query,
    Connection,
    Integrity,
}

impl Failure {
    fn error(self, operation: &str) -> AppError {
        match self {
            Failure::Query => AppError::DatabaseError(anyhow::anyhow!("{} failed", operation)),
            Failure::Connection => AppError::ConnectionError(anyhow::anyhow!(
                "{} could not reach the database",
                operation
            )),
            Failure::Integrity => {
                AppError::IntegrityError(anyhow::anyhow!("{} violated a constraint", operation))
            }
        }
    }
}

#[derive(Default)]
pub struct StoreData {
    pub entities: Vec<EntityRow>,
    pub clients: Vec<ClientProfileRow>,
    pub suppliers: Vec<SupplierProfileRow>,
    pub debts: Vec<DebtRow>,
    pub current_movements: Vec<MovementRow>,
    pub archived_movements: Vec<MovementRow>,
    pub invoices: Vec<InvoiceRow>,
    pub lines: Vec<(InvoiceKey, InvoiceLineRow)>,
    pub sales_summary: Option<SalesSummaryRow>,
    pub top_articles: Vec<TopArticleRow>,
    pub daily_sales: Vec<DailySalesRow>,
}

/// `ReportStore` over plain vectors, recording every operation it serves.
#[derive(Default)]
pub struct InMemoryStore {
    data: Mutex<StoreData>,
    failures: Mutex<HashMap<&'static str, Failure>>,
    calls: Mutex<Vec<&'static str>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with(setup: impl FnOnce(&mut StoreData)) -> Arc<Self> {
        let store = Self::default();
        setup(&mut store.data.lock().unwrap());
        Arc::new(store)
    }

    pub fn fail(&self, operation: &'static str, failure: Failure) {
        self.failures.lock().unwrap().insert(operation, failure);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn entity_count(&self) -> usize {
        self.data.lock().unwrap().entities.len()
    }

    fn enter(&self, operation: &'static str) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(operation);
        match self.failures.lock().unwrap().get(operation) {
            Some(failure) => Err(failure.error(operation)),
            None => Ok(()),
        }
    }
}

fn invoice_key(row: &InvoiceRow) -> InvoiceKey {
    InvoiceKey {
        channel_id: row.cvenroid,
        document_type: row.fatipfa.trim().to_string(),
        number_1: row.fanrof1,
        number_2: row.fanrof2,
    }
}

#[async_trait]
impl ReportStore for InMemoryStore {
    async fn health_check(&self) -> Result<(), AppError> {
        self.enter("health_check")
    }

    async fn list_entities(&self) -> Result<Vec<EntityRow>, AppError> {
        self.enter("list_entities")?;
        Ok(self.data.lock().unwrap().entities.clone())
    }

    async fn list_clients(&self, limit: i64) -> Result<Vec<ClientProfileRow>, AppError> {
        self.enter("list_clients")?;
        let data = self.data.lock().unwrap();
        Ok(data.clients.iter().take(limit as usize).cloned().collect())
    }

    async fn list_suppliers(&self) -> Result<Vec<SupplierProfileRow>, AppError> {
        self.enter("list_suppliers")?;
        Ok(self.data.lock().unwrap().suppliers.clone())
    }

    async fn get_entity(&self, entity_id: i32) -> Result<Option<EntityRow>, AppError> {
        self.enter("get_entity")?;
        let data = self.data.lock().unwrap();
        Ok(data.entities.iter().find(|e| e.entnroid == entity_id).cloned())
    }

    async fn get_client_profile(
        &self,
        entity_id: i32,
    ) -> Result<Option<ClientProfileRow>, AppError> {
        self.enter("get_client_profile")?;
        let data = self.data.lock().unwrap();
        Ok(data.clients.iter().find(|c| c.entnroid == entity_id).cloned())
    }

    async fn get_supplier_profile(
        &self,
        entity_id: i32,
    ) -> Result<Option<SupplierProfileRow>, AppError> {
        self.enter("get_supplier_profile")?;
        let data = self.data.lock().unwrap();
        Ok(data.suppliers.iter().find(|s| s.entnroid == entity_id).cloned())
    }

    async fn list_debts(&self, entity_id: i32) -> Result<Vec<DebtRow>, AppError> {
        self.enter("list_debts")?;
        let data = self.data.lock().unwrap();
        Ok(data.debts.iter().filter(|d| d.entnroid == entity_id).cloned().collect())
    }

    async fn list_movements(
        &self,
        entity_id: i32,
        source: MovementSource,
    ) -> Result<Vec<MovementRow>, AppError> {
        let data;
        let rows = match source {
            MovementSource::Current => {
                self.enter("list_movements_current")?;
                data = self.data.lock().unwrap();
                &data.current_movements
            }
            MovementSource::Archived => {
                self.enter("list_movements_archived")?;
                data = self.data.lock().unwrap();
                &data.archived_movements
            }
        };
        Ok(rows.iter().filter(|m| m.entnroid == entity_id).cloned().collect())
    }

    async fn list_invoices(&self, entity_id: i32) -> Result<Vec<InvoiceRow>, AppError> {
        self.enter("list_invoices")?;
        let data = self.data.lock().unwrap();
        Ok(data.invoices.iter().filter(|f| f.entnroid == entity_id).cloned().collect())
    }

    async fn find_invoice(&self, invoice: &InvoiceRef) -> Result<Option<InvoiceRow>, AppError> {
        self.enter("find_invoice")?;
        let data = self.data.lock().unwrap();
        Ok(data
            .invoices
            .iter()
            .find(|f| match invoice {
                InvoiceRef::Surrogate(id) => f.faid == *id,
                InvoiceRef::Composite(key) => invoice_key(f) == *key,
            })
            .cloned())
    }

    async fn list_invoice_lines(&self, key: &InvoiceKey) -> Result<Vec<InvoiceLineRow>, AppError> {
        self.enter("list_invoice_lines")?;
        let data = self.data.lock().unwrap();
        let mut lines: Vec<InvoiceLineRow> = data
            .lines
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, line)| line.clone())
            .collect();
        lines.sort_by_key(|line| line.derenglon);
        Ok(lines)
    }

    async fn list_entity_invoice_lines(
        &self,
        entity_id: i32,
    ) -> Result<Vec<InvoiceLineRow>, AppError> {
        self.enter("list_entity_invoice_lines")?;
        let data = self.data.lock().unwrap();
        let keys: Vec<InvoiceKey> = data
            .invoices
            .iter()
            .filter(|f| f.entnroid == entity_id)
            .map(invoice_key)
            .collect();
        Ok(data
            .lines
            .iter()
            .filter(|(k, _)| keys.contains(k))
            .map(|(_, line)| line.clone())
            .collect())
    }

    async fn sales_summary(&self, _period: SalesPeriod) -> Result<SalesSummaryRow, AppError> {
        self.enter("sales_summary")?;
        Ok(self
            .data
            .lock()
            .unwrap()
            .sales_summary
            .clone()
            .unwrap_or(SalesSummaryRow {
                total_ventas: Some(0),
                total_facturacion: Some(Decimal::ZERO),
                promedio_venta: Some(Decimal::ZERO),
            }))
    }

    async fn top_articles(
        &self,
        _period: SalesPeriod,
        limit: i64,
    ) -> Result<Vec<TopArticleRow>, AppError> {
        self.enter("top_articles")?;
        let data = self.data.lock().unwrap();
        Ok(data.top_articles.iter().take(limit as usize).cloned().collect())
    }

    async fn daily_sales(&self, _period: SalesPeriod) -> Result<Vec<DailySalesRow>, AppError> {
        self.enter("daily_sales")?;
        Ok(self.data.lock().unwrap().daily_sales.clone())
    }

    async fn count_entities(&self) -> Result<i64, AppError> {
        self.enter("count_entities")?;
        Ok(self.data.lock().unwrap().entities.len() as i64)
    }

    async fn insert_entity(&self, entity: &NewEntity) -> Result<i32, AppError> {
        self.enter("insert_entity")?;
        let mut data = self.data.lock().unwrap();
        let id = data.entities.iter().map(|e| e.entnroid).max().unwrap_or(0) + 1;
        data.entities.push(EntityRow {
            entnroid: id,
            entnombr: Some(entity.nombre.clone()),
            entemail: Some(entity.email.clone()),
            ..Default::default()
        });
        Ok(id)
    }

    async fn purge_entities(&self) -> Result<u64, AppError> {
        self.enter("purge_entities")?;
        let mut data = self.data.lock().unwrap();
        let deleted = data.entities.len() as u64;
        data.entities.clear();
        Ok(deleted)
    }
}

pub fn entity(id: i32, name: &str) -> EntityRow {
    EntityRow {
        entnroid: id,
        entnombr: Some(name.to_string()),
        ..Default::default()
    }
}

pub fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    pub async fn spawn(store: Arc<InMemoryStore>) -> Self {
        let config = ReportingConfig {
            common: CoreConfig {
                port: 0, // Random port for testing
                request_timeout_secs: 10,
            },
            service_name: "reporting-service-test".to_string(),
            log_level: "info".to_string(),
            otlp_endpoint: None,
            database: DatabaseConfig {
                candidates: vec![],
                max_connections: 1,
                min_connections: 0,
                acquire_timeout_secs: 1,
                query_timeout_secs: 1,
                run_migrations: false,
            },
        };

        let app = Application::build_with_store(config, store.clone())
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client.get(format!("{}/health", address)).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
            store,
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
