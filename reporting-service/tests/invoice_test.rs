mod common;

use common::{dec, entity, Failure, InMemoryStore, StoreData, TestApp};
use reporting_service::models::{InvoiceKey, InvoiceLineRow, InvoiceRow};

fn key(number: i32) -> InvoiceKey {
    InvoiceKey {
        channel_id: 1,
        document_type: "A".to_string(),
        number_1: 3,
        number_2: number,
    }
}

fn invoice(faid: i32, entity_id: i32, number: i32) -> InvoiceRow {
    InvoiceRow {
        faid,
        cvenroid: 1,
        fatipfa: "A".to_string(),
        fanrof1: 3,
        fanrof2: number,
        entnroid: entity_id,
        ..Default::default()
    }
}

fn line(number: i32, code: &str, quantity: &str, price: &str) -> InvoiceLineRow {
    let quantity = dec(quantity);
    let price = dec(price);
    InvoiceLineRow {
        derenglon: number,
        artnroid: Some(number),
        artcodigo: Some(code.to_string()),
        artdescr: Some(format!("Porcelanato {}", code)),
        decanti: Some(quantity),
        depreun: Some(price),
        denetgr: Some(quantity * price),
        depordes: Some(dec("10")),
        detotal: Some(quantity * price),
        ..Default::default()
    }
}

fn seeded(data: &mut StoreData) {
    data.entities.push(entity(42, "Cerámica Norte"));
    data.invoices.push(invoice(7, 42, 100));
    data.invoices.push(invoice(8, 42, 101));
    data.lines = vec![
        (key(101), line(2, "P-60", "2", "130")),
        (key(101), line(1, "P-60", "3", "100")),
        (key(101), line(3, "Z-10", "1", "50")),
    ];
}

#[tokio::test]
async fn invoice_without_lines_returns_empty_list() {
    let app = TestApp::spawn(InMemoryStore::with(seeded)).await;

    let response = app.get("/invoice/7").await;
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], serde_json::json!([]));
    assert_eq!(body["count"], 0);
    assert_eq!(body["facturaId"], 7);
}

#[tokio::test]
async fn lines_come_back_in_line_order_with_discounted_net() {
    let app = TestApp::spawn(InMemoryStore::with(seeded)).await;

    let body: serde_json::Value = app.get("/invoice/8").await.json().await.unwrap();
    assert_eq!(body["count"], 3);

    let lines = body["data"].as_array().unwrap();
    let numbers: Vec<i64> = lines.iter().map(|l| l["DeRenglon"].as_i64().unwrap()).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    // 300 at 10% off
    assert_eq!(lines[0]["NetoConDto"].as_f64(), Some(270.0));
}

#[tokio::test]
async fn unified_lines_merge_per_article() {
    let app = TestApp::spawn(InMemoryStore::with(seeded)).await;

    let body: serde_json::Value = app
        .get("/invoice/8?unificar=true")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["count"], 2);

    let merged = &body["data"][0];
    assert_eq!(merged["ArtCodigo"], "P-60");
    assert_eq!(merged["DeCanti"].as_f64(), Some(5.0));
    assert_eq!(merged["DePreUn"].as_f64(), Some(112.0));
    assert_eq!(merged["DeTotal"].as_f64(), Some(560.0));
    assert_eq!(merged["LineasUnificadas"], 2);
}

#[tokio::test]
async fn composite_key_addresses_the_same_invoice() {
    let app = TestApp::spawn(InMemoryStore::with(seeded)).await;

    let body: serde_json::Value = app
        .get("/invoice/1?cveNroId=1&faTipFa=A&faNroF1=3&faNroF2=101")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["facturaId"], 8);
    assert_eq!(body["count"], 3);
}

#[tokio::test]
async fn partial_composite_key_is_bad_request() {
    let app = TestApp::spawn(InMemoryStore::with(seeded)).await;

    let response = app.get("/invoice/8?cveNroId=1&faTipFa=A").await;
    assert_eq!(response.status().as_u16(), 400);
    assert!(app.store.calls().is_empty());
}

#[tokio::test]
async fn unknown_or_malformed_invoice_ids() {
    let app = TestApp::spawn(InMemoryStore::with(seeded)).await;

    let response = app.get("/invoice/555").await;
    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);

    let response = app.get("/invoice/abc").await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app.get("/invoice/8?unificar=quizas").await;
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn line_query_failure_is_reported() {
    let store = InMemoryStore::with(seeded);
    store.fail("list_invoice_lines", Failure::Query);
    let app = TestApp::spawn(store).await;

    let response = app.get("/invoice/8").await;
    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["details"], "list_invoice_lines failed");
}

#[tokio::test]
async fn entity_article_summary_spans_invoices() {
    let store = InMemoryStore::with(|data| {
        seeded(data);
        data.lines.push((key(100), line(1, "Z-10", "4", "50")));
    });
    let app = TestApp::spawn(store).await;

    let body: serde_json::Value = app
        .get("/entity-articles?id=42")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["entidadId"], 42);
    assert_eq!(body["count"], 2);

    let z10 = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|l| l["ArtCodigo"] == "Z-10")
        .unwrap();
    assert_eq!(z10["DeCanti"].as_f64(), Some(5.0));

    let response = app.get("/entity-articles?id=9").await;
    assert_eq!(response.status().as_u16(), 404);
}
