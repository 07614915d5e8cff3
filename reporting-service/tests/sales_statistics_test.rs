mod common;

use chrono::{Datelike, Local};
use common::{dec, Failure, InMemoryStore, TestApp};
use reporting_service::models::{DailySalesRow, SalesSummaryRow, TopArticleRow};

#[tokio::test]
async fn empty_period_reports_zeros() {
    let app = TestApp::spawn(InMemoryStore::new()).await;

    let response = app.get("/sales-statistics?mes=2&anio=2024").await;
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["mes"], 2);
    assert_eq!(body["anio"], 2024);
    assert_eq!(body["resumenVentas"]["TotalVentas"], 0);
    assert_eq!(body["resumenVentas"]["TotalFacturacion"].as_f64(), Some(0.0));
    assert_eq!(body["resumenVentas"]["PromedioVenta"].as_f64(), Some(0.0));
    assert_eq!(body["articulosMasVendidos"], serde_json::json!([]));
    assert_eq!(body["ventasDiarias"], serde_json::json!([]));
}

#[tokio::test]
async fn report_carries_all_three_sections() {
    let store = InMemoryStore::with(|data| {
        data.sales_summary = Some(SalesSummaryRow {
            total_ventas: Some(3),
            total_facturacion: Some(dec("4500.50")),
            promedio_venta: Some(dec("1500.1666")),
        });
        data.top_articles = (1..=7)
            .map(|i| TopArticleRow {
                descripcion: Some(format!("Artículo {}", i)),
                codigo: None,
                cantidad_vendida: Some(dec("10") - dec(&i.to_string())),
                total_ventas: Some(dec("100")),
            })
            .collect();
        data.daily_sales = vec![DailySalesRow {
            dia: 14,
            cantidad_ventas: Some(3),
            total_dia: Some(dec("4500.50")),
        }];
    });
    let app = TestApp::spawn(store).await;

    let body: serde_json::Value = app
        .get("/sales-statistics?mes=5&anio=2025")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["resumenVentas"]["TotalVentas"], 3);
    assert_eq!(body["resumenVentas"]["TotalFacturacion"].as_f64(), Some(4500.5));

    let top = body["articulosMasVendidos"].as_array().unwrap();
    assert_eq!(top.len(), 5);
    assert_eq!(top[0]["Codigo"], "No especificado");

    assert_eq!(body["ventasDiarias"][0]["Dia"], 14);
    assert_eq!(body["ventasDiarias"][0]["CantidadVentas"], 3);
}

#[tokio::test]
async fn out_of_range_period_runs_no_query() {
    let app = TestApp::spawn(InMemoryStore::new()).await;

    for query in ["mes=13&anio=2024", "mes=0&anio=2024", "mes=6&anio=1999", "mes=6&anio=2101", "mes=x"] {
        let response = app.get(&format!("/sales-statistics?{}", query)).await;
        assert_eq!(response.status().as_u16(), 400, "query {}", query);
    }

    assert!(app.store.calls().is_empty());
}

#[tokio::test]
async fn missing_period_defaults_to_current_month() {
    let app = TestApp::spawn(InMemoryStore::new()).await;
    let today = Local::now().date_naive();

    let body: serde_json::Value = app.get("/sales-statistics").await.json().await.unwrap();
    assert_eq!(body["mes"], today.month());
    assert_eq!(body["anio"], today.year());
}

#[tokio::test]
async fn any_failing_query_fails_the_report() {
    let store = InMemoryStore::new();
    store.fail("daily_sales", Failure::Query);
    let app = TestApp::spawn(store).await;

    let response = app.get("/sales-statistics?mes=5&anio=2025").await;
    assert_eq!(response.status().as_u16(), 500);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Error al obtener estadísticas de ventas");
    assert!(body["details"].as_str().unwrap().contains("daily_sales"));
}
