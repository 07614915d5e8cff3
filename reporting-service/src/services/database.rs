//! PostgreSQL implementation of [`ReportStore`].

use crate::config::DatabaseConfig;
use crate::models::{
    ClientProfileRow, DailySalesRow, DebtRow, EntityRow, InvoiceKey, InvoiceLineRow, InvoiceRef,
    InvoiceRow, MovementRow, MovementSource, NewEntity, SalesPeriod, SalesSummaryRow,
    SupplierProfileRow, TopArticleRow,
};
use crate::services::connection::ConnectionManager;
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::store::ReportStore;
use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::postgres::PgPool;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

const ENTITY_COLUMNS: &str = "entnroid, entnombr, entemail, entrazsoc, entdomic, entlocal, \
    entprovi, entcodpo, enttelef, enttelef2, entcuit, entactec, entcodigo, entsedronar, \
    entuslog, entfelog";

const INVOICE_COLUMNS: &str =
    "faid, cvenroid, fatipfa, fanrof1, fanrof2, entnroid, fanumero, fafecha, fatotal, faestado";

const LINE_COLUMNS: &str = "d.derenglon, d.artnroid, d.deartdescr, d.decanti, d.depreun, \
    d.denetgr, d.depordes, d.denetcondto, d.deimiva, d.detotal, \
    a.artcodigo, a.artdescr, a.artcodabr, a.artbarra";

/// Invoices in the period whose sales channel counts as a sale.
const SALES_IN_PERIOD: &str = "FROM ven_factur f \
    LEFT JOIN ven_codvta c ON c.cvenroid = f.cvenroid \
    WHERE EXTRACT(MONTH FROM f.fafecha)::int = $1 \
      AND EXTRACT(YEAR FROM f.fafecha)::int = $2 \
      AND COALESCE(c.cvesigno, 1) > 0";

/// Database connection wrapper.
#[derive(Clone)]
pub struct Database {
    connections: Arc<ConnectionManager>,
    query_timeout: Duration,
}

impl Database {
    /// Create the wrapper. No connection is made until the first query.
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            connections: Arc::new(ConnectionManager::new(config)),
            query_timeout: Duration::from_secs(config.query_timeout_secs),
        }
    }

    /// Establish the pool ahead of the first request.
    pub async fn connect(&self) -> Result<(), AppError> {
        self.connections.pool().await.map(|_| ())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        let pool = self.connections.pool().await?;
        sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
            error!(error = %e, "Migration failed");
            AppError::DatabaseError(anyhow::anyhow!("migrations failed"))
        })?;
        info!("Database migrations completed");
        Ok(())
    }

    async fn pool(&self) -> Result<&PgPool, AppError> {
        self.connections.pool().await
    }

    /// Run one statement under the query deadline and record its duration.
    async fn timed<T, F>(&self, operation: &'static str, query: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        let timer = DB_QUERY_DURATION
            .with_label_values(&[operation])
            .start_timer();
        let outcome = tokio::time::timeout(self.query_timeout, query).await;
        timer.observe_duration();

        match outcome {
            Ok(result) => result.map_err(|e| map_sqlx_error(operation, e)),
            Err(_) => {
                warn!(operation, timeout = ?self.query_timeout, "Query timed out");
                Err(AppError::ConnectionError(anyhow::anyhow!(
                    "{} timed out",
                    operation
                )))
            }
        }
    }
}

/// Classify a driver error. The driver text is logged, never returned.
pub fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => {
            error!(operation, error = %err, "Database connection failure");
            AppError::ConnectionError(anyhow::anyhow!("{} could not reach the database", operation))
        }
        sqlx::Error::Database(db_err)
            if db_err.is_unique_violation()
                || db_err.is_foreign_key_violation()
                || db_err.is_check_violation() =>
        {
            warn!(operation, error = %err, "Constraint violation");
            AppError::IntegrityError(anyhow::anyhow!("{} violated a constraint", operation))
        }
        _ => {
            error!(operation, error = %err, "Query failed");
            AppError::DatabaseError(anyhow::anyhow!("{} failed", operation))
        }
    }
}

#[async_trait]
impl ReportStore for Database {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        let pool = self.pool().await?;
        self.timed("health_check", sqlx::query("SELECT 1").execute(pool))
            .await
            .map(|_| ())
    }

    #[instrument(skip(self))]
    async fn list_entities(&self) -> Result<Vec<EntityRow>, AppError> {
        let pool = self.pool().await?;
        let sql = format!("SELECT {ENTITY_COLUMNS} FROM ent_maeentidad ORDER BY entnroid");
        self.timed(
            "list_entities",
            sqlx::query_as::<_, EntityRow>(&sql).fetch_all(pool),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_clients(&self, limit: i64) -> Result<Vec<ClientProfileRow>, AppError> {
        let pool = self.pool().await?;
        self.timed(
            "list_clients",
            sqlx::query_as::<_, ClientProfileRow>(
                r#"
                SELECT c.clinroid, c.entnroid, e.entnombr, c.cliconta, c.clinotas, c.cliestad, c.clicodigo
                FROM clie_maeclientes c
                LEFT JOIN ent_maeentidad e ON e.entnroid = c.entnroid
                ORDER BY c.clinroid
                LIMIT $1
                "#,
            )
            .bind(limit)
            .fetch_all(pool),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_suppliers(&self) -> Result<Vec<SupplierProfileRow>, AppError> {
        let pool = self.pool().await?;
        self.timed(
            "list_suppliers",
            sqlx::query_as::<_, SupplierProfileRow>(
                r#"
                SELECT p.pronroid, p.entnroid, e.entnombr, p.procontac, p.proobser, p.proestad,
                       p.prorubcon, p.prodocideven
                FROM prov_maeprov p
                LEFT JOIN ent_maeentidad e ON e.entnroid = p.entnroid
                ORDER BY p.pronroid
                "#,
            )
            .fetch_all(pool),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn get_entity(&self, entity_id: i32) -> Result<Option<EntityRow>, AppError> {
        let pool = self.pool().await?;
        let sql = format!("SELECT {ENTITY_COLUMNS} FROM ent_maeentidad WHERE entnroid = $1");
        self.timed(
            "get_entity",
            sqlx::query_as::<_, EntityRow>(&sql)
                .bind(entity_id)
                .fetch_optional(pool),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn get_client_profile(
        &self,
        entity_id: i32,
    ) -> Result<Option<ClientProfileRow>, AppError> {
        let pool = self.pool().await?;
        self.timed(
            "get_client_profile",
            sqlx::query_as::<_, ClientProfileRow>(
                r#"
                SELECT c.clinroid, c.entnroid, e.entnombr, c.cliconta, c.clinotas, c.cliestad, c.clicodigo
                FROM clie_maeclientes c
                LEFT JOIN ent_maeentidad e ON e.entnroid = c.entnroid
                WHERE c.entnroid = $1
                "#,
            )
            .bind(entity_id)
            .fetch_optional(pool),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn get_supplier_profile(
        &self,
        entity_id: i32,
    ) -> Result<Option<SupplierProfileRow>, AppError> {
        let pool = self.pool().await?;
        self.timed(
            "get_supplier_profile",
            sqlx::query_as::<_, SupplierProfileRow>(
                r#"
                SELECT p.pronroid, p.entnroid, e.entnombr, p.procontac, p.proobser, p.proestad,
                       p.prorubcon, p.prodocideven
                FROM prov_maeprov p
                LEFT JOIN ent_maeentidad e ON e.entnroid = p.entnroid
                WHERE p.entnroid = $1
                "#,
            )
            .bind(entity_id)
            .fetch_optional(pool),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_debts(&self, entity_id: i32) -> Result<Vec<DebtRow>, AppError> {
        let pool = self.pool().await?;
        self.timed(
            "list_debts",
            sqlx::query_as::<_, DebtRow>(
                r#"
                SELECT sucnroid, deunroid, entnroid, deufecha, deuimpor, deusaldo
                FROM cli_deudas
                WHERE entnroid = $1
                ORDER BY deufecha, deunroid
                "#,
            )
            .bind(entity_id)
            .fetch_all(pool),
        )
        .await
    }

    #[instrument(skip(self), fields(source = source.as_str()))]
    async fn list_movements(
        &self,
        entity_id: i32,
        source: MovementSource,
    ) -> Result<Vec<MovementRow>, AppError> {
        let pool = self.pool().await?;
        let sql = format!(
            "SELECT m.sucnroid, m.movnroid, m.ctmnroid, m.entnroid, m.movfecha, m.movimpor, \
             m.cccdescr, t.ctmsigno \
             FROM {} m \
             LEFT JOIN cta_tipmov t ON t.ctmnroid = m.ctmnroid \
             WHERE m.entnroid = $1",
            source.table()
        );
        self.timed(
            "list_movements",
            sqlx::query_as::<_, MovementRow>(&sql)
                .bind(entity_id)
                .fetch_all(pool),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_invoices(&self, entity_id: i32) -> Result<Vec<InvoiceRow>, AppError> {
        let pool = self.pool().await?;
        let sql = format!(
            "SELECT {INVOICE_COLUMNS} FROM ven_factur WHERE entnroid = $1 ORDER BY fafecha DESC, faid DESC"
        );
        self.timed(
            "list_invoices",
            sqlx::query_as::<_, InvoiceRow>(&sql)
                .bind(entity_id)
                .fetch_all(pool),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_invoice(&self, invoice: &InvoiceRef) -> Result<Option<InvoiceRow>, AppError> {
        let pool = self.pool().await?;
        match invoice {
            InvoiceRef::Surrogate(id) => {
                let sql = format!("SELECT {INVOICE_COLUMNS} FROM ven_factur WHERE faid = $1");
                self.timed(
                    "find_invoice",
                    sqlx::query_as::<_, InvoiceRow>(&sql)
                        .bind(*id)
                        .fetch_optional(pool),
                )
                .await
            }
            InvoiceRef::Composite(key) => {
                let sql = format!(
                    "SELECT {INVOICE_COLUMNS} FROM ven_factur \
                     WHERE cvenroid = $1 AND fatipfa = $2 AND fanrof1 = $3 AND fanrof2 = $4"
                );
                self.timed(
                    "find_invoice",
                    sqlx::query_as::<_, InvoiceRow>(&sql)
                        .bind(key.channel_id)
                        .bind(&key.document_type)
                        .bind(key.number_1)
                        .bind(key.number_2)
                        .fetch_optional(pool),
                )
                .await
            }
        }
    }

    #[instrument(skip(self))]
    async fn list_invoice_lines(&self, key: &InvoiceKey) -> Result<Vec<InvoiceLineRow>, AppError> {
        let pool = self.pool().await?;
        let sql = format!(
            "SELECT {LINE_COLUMNS} \
             FROM ven_factur1 d \
             LEFT JOIN art_articu a ON a.artnroid = d.artnroid \
             WHERE d.cvenroid = $1 AND d.fatipfa = $2 AND d.fanrof1 = $3 AND d.fanrof2 = $4 \
             ORDER BY d.derenglon"
        );
        self.timed(
            "list_invoice_lines",
            sqlx::query_as::<_, InvoiceLineRow>(&sql)
                .bind(key.channel_id)
                .bind(&key.document_type)
                .bind(key.number_1)
                .bind(key.number_2)
                .fetch_all(pool),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_entity_invoice_lines(
        &self,
        entity_id: i32,
    ) -> Result<Vec<InvoiceLineRow>, AppError> {
        let pool = self.pool().await?;
        let sql = format!(
            "SELECT {LINE_COLUMNS} \
             FROM ven_factur f \
             JOIN ven_factur1 d ON d.cvenroid = f.cvenroid AND d.fatipfa = f.fatipfa \
                AND d.fanrof1 = f.fanrof1 AND d.fanrof2 = f.fanrof2 \
             LEFT JOIN ven_codvta c ON c.cvenroid = f.cvenroid \
             LEFT JOIN art_articu a ON a.artnroid = d.artnroid \
             WHERE f.entnroid = $1 \
               AND COALESCE(c.cvesigno, 1) > 0 \
             ORDER BY f.fafecha, f.faid, d.derenglon"
        );
        self.timed(
            "list_entity_invoice_lines",
            sqlx::query_as::<_, InvoiceLineRow>(&sql)
                .bind(entity_id)
                .fetch_all(pool),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn sales_summary(&self, period: SalesPeriod) -> Result<SalesSummaryRow, AppError> {
        let pool = self.pool().await?;
        let sql = format!(
            "SELECT COUNT(*) AS total_ventas, \
                    COALESCE(SUM(COALESCE(f.fatotal, 0)), 0) AS total_facturacion, \
                    COALESCE(AVG(COALESCE(f.fatotal, 0)), 0) AS promedio_venta \
             {SALES_IN_PERIOD}"
        );
        self.timed(
            "sales_summary",
            sqlx::query_as::<_, SalesSummaryRow>(&sql)
                .bind(period.month())
                .bind(period.year())
                .fetch_one(pool),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn top_articles(
        &self,
        period: SalesPeriod,
        limit: i64,
    ) -> Result<Vec<TopArticleRow>, AppError> {
        let pool = self.pool().await?;
        let sql = "SELECT COALESCE(a.artdescr, MAX(d.deartdescr)) AS descripcion, \
                a.artcodigo AS codigo, \
                SUM(d.decanti) AS cantidad_vendida, \
                COALESCE(SUM(d.detotal), 0) AS total_ventas \
            FROM ven_factur f \
            LEFT JOIN ven_codvta c ON c.cvenroid = f.cvenroid \
            JOIN ven_factur1 d ON d.cvenroid = f.cvenroid AND d.fatipfa = f.fatipfa \
                AND d.fanrof1 = f.fanrof1 AND d.fanrof2 = f.fanrof2 \
            LEFT JOIN art_articu a ON a.artnroid = d.artnroid \
            WHERE EXTRACT(MONTH FROM f.fafecha)::int = $1 \
              AND EXTRACT(YEAR FROM f.fafecha)::int = $2 \
              AND COALESCE(c.cvesigno, 1) > 0 \
              AND d.decanti > 0 \
            GROUP BY d.artnroid, a.artcodigo, a.artdescr \
            ORDER BY cantidad_vendida DESC \
            LIMIT $3";
        self.timed(
            "top_articles",
            sqlx::query_as::<_, TopArticleRow>(sql)
                .bind(period.month())
                .bind(period.year())
                .bind(limit)
                .fetch_all(pool),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn daily_sales(&self, period: SalesPeriod) -> Result<Vec<DailySalesRow>, AppError> {
        let pool = self.pool().await?;
        let sql = format!(
            "SELECT EXTRACT(DAY FROM f.fafecha)::int AS dia, \
                    COUNT(*) AS cantidad_ventas, \
                    COALESCE(SUM(COALESCE(f.fatotal, 0)), 0) AS total_dia \
             {SALES_IN_PERIOD} \
             GROUP BY 1 \
             ORDER BY 1"
        );
        self.timed(
            "daily_sales",
            sqlx::query_as::<_, DailySalesRow>(&sql)
                .bind(period.month())
                .bind(period.year())
                .fetch_all(pool),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn count_entities(&self) -> Result<i64, AppError> {
        let pool = self.pool().await?;
        self.timed(
            "count_entities",
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ent_maeentidad").fetch_one(pool),
        )
        .await
    }

    #[instrument(skip(self, entity), fields(nombre = %entity.nombre))]
    async fn insert_entity(&self, entity: &NewEntity) -> Result<i32, AppError> {
        let pool = self.pool().await?;
        let id = self
            .timed(
                "insert_entity",
                sqlx::query_scalar::<_, i32>(
                    r#"
                    INSERT INTO ent_maeentidad (entnombr, entemail, entuslog, entfelog)
                    VALUES ($1, $2, 'admin', NOW())
                    RETURNING entnroid
                    "#,
                )
                .bind(&entity.nombre)
                .bind(&entity.email)
                .fetch_one(pool),
            )
            .await?;

        info!(entity_id = id, "Entity inserted");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn purge_entities(&self) -> Result<u64, AppError> {
        let pool = self.pool().await?;
        let deleted = self
            .timed("purge_entities", async {
                let mut tx = pool.begin().await?;
                let deleted = sqlx::query("DELETE FROM ent_maeentidad")
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();
                sqlx::query(
                    "SELECT setval(pg_get_serial_sequence('ent_maeentidad', 'entnroid'), 1, false)",
                )
                .execute(&mut *tx)
                .await?;
                tx.commit().await?;
                Ok::<_, sqlx::Error>(deleted)
            })
            .await?;

        info!(deleted, "Entities purged and id sequence restarted");
        Ok(deleted)
    }
}
