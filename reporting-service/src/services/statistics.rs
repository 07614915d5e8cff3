//! Monthly sales statistics.

use crate::models::{
    DailySales, SalesPeriod, SalesStatisticsReport, SalesSummary, TopArticle, TOP_ARTICLES_LIMIT,
};
use crate::services::store::ReportStore;
use anyhow::Context;
use service_core::error::AppError;
use std::sync::Arc;
use tracing::{error, instrument};

#[derive(Clone)]
pub struct SalesStatistics {
    store: Arc<dyn ReportStore>,
}

impl SalesStatistics {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    /// Summary, best sellers and per-day totals for one period.
    ///
    /// Any failing query fails the whole report.
    #[instrument(skip(self), fields(mes = period.month(), anio = period.year()))]
    pub async fn compute(&self, period: SalesPeriod) -> Result<SalesStatisticsReport, AppError> {
        let queries = async {
            tokio::try_join!(
                self.store.sales_summary(period),
                self.store.top_articles(period, TOP_ARTICLES_LIMIT),
                self.store.daily_sales(period),
            )
        };

        let (summary, top, daily) = queries
            .await
            .map_err(|e| {
                error!(error = %e, "Sales statistics query failed");
                anyhow::Error::new(e)
            })
            .context("Error al obtener estadísticas de ventas")?;

        Ok(SalesStatisticsReport {
            mes: period.month(),
            anio: period.year(),
            summary: SalesSummary::from(summary),
            top_articles: top.into_iter().map(TopArticle::from).collect(),
            daily_sales: daily.into_iter().map(DailySales::from).collect(),
        })
    }
}
