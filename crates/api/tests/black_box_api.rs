use std::sync::Arc;

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;

use storekeep_api::app::services::{build_services, AppServices};
use storekeep_catalog::{BomLine, CatalogStore, Material, Product, Store};
use storekeep_core::{MaterialId, ProductId, StoreId, UserId};
use storekeep_ledger::{NewStockEntry, StockLedger};

struct TestServer {
    base_url: String,
    services: Arc<AppServices>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let services = Arc::new(build_services());
        let app = storekeep_api::app::build_app(services.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            services,
            handle,
        }
    }

    fn seed_store(&self) -> StoreId {
        let store_id = StoreId::new();
        self.services
            .catalog()
            .insert_store(Store::new(store_id, "My Store", UserId::new()).unwrap())
            .unwrap();
        store_id
    }

    fn seed_material(&self, name: &str, price: i64) -> MaterialId {
        let id = MaterialId::new();
        self.services
            .catalog()
            .insert_material(Material::new(id, name, Decimal::from(price)).unwrap())
            .unwrap();
        id
    }

    fn seed_stock(&self, store_id: StoreId, material_id: MaterialId, current: i64, max: i64) {
        self.services
            .stock_ledger()
            .create(NewStockEntry {
                store_id,
                material_id,
                max_capacity: max,
                initial_capacity: current,
            })
            .unwrap();
    }

    fn seed_product(&self, store_id: StoreId, name: &str, bom: Vec<BomLine>) -> ProductId {
        let product = Product::new(ProductId::new(), name, bom).unwrap();
        let id = product.id();
        self.services.catalog().insert_product(product).unwrap();
        self.services
            .catalog()
            .assign_product(store_id, id)
            .unwrap();
        id
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_needs_no_store_header() {
    let server = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", server.base_url))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_store_header_is_unauthorized() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/inventory/", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_store_is_not_found() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/inventory/", server.base_url))
        .header("x-store-id", StoreId::new().to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn restock_preview_and_targeted_batch() {
    let server = TestServer::spawn().await;
    let store_id = server.seed_store();
    let material = server.seed_material("Flour", 100);
    server.seed_stock(store_id, material, 200, 1000);

    let client = reqwest::Client::new();

    // Preview prices the fill-to-max quantity.
    let res = client
        .get(format!("{}/restocks/", server.base_url))
        .header("x-store-id", store_id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["materials"][0]["restock quantity"], json!(800));
    assert_eq!(body["materials"][0]["current_capacity"], json!("200/1000"));
    assert_eq!(body["overall_price"], json!(80000.0));

    // Targeted restock of 20 units at price 100.
    let res = client
        .post(format!("{}/restocks/", server.base_url))
        .header("x-store-id", store_id.to_string())
        .json(&json!({ "materials": [{ "material": material, "quantity": 20 }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["materials"][0]["total_price"], json!(2000.0));
    assert_eq!(body["materials"][0]["capacity"], json!("220/1000"));
    assert_eq!(body["overall_price"], json!(2000.0));
}

#[tokio::test]
async fn empty_restock_fills_to_max_then_reports_all_full() {
    let server = TestServer::spawn().await;
    let store_id = server.seed_store();
    let material = server.seed_material("Flour", 100);
    server.seed_stock(store_id, material, 50, 100);

    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/restocks/", server.base_url))
        .header("x-store-id", store_id.to_string())
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["materials"][0]["quantity"], json!(50));
    assert_eq!(body["overall_price"], json!(5000.0));

    // Everything full now: both the preview and a second fill are 204.
    let res = client
        .get(format!("{}/restocks/", server.base_url))
        .header("x-store-id", store_id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // A bodyless POST is also the fill-to-max request.
    let res = client
        .post(format!("{}/restocks/", server.base_url))
        .header("x-store-id", store_id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn malformed_restock_body_is_rejected_without_mutation() {
    let server = TestServer::spawn().await;
    let store_id = server.seed_store();
    let material = server.seed_material("Flour", 100);
    server.seed_stock(store_id, material, 10, 1000);

    // A present-but-unparseable body must not be mistaken for fill-to-max.
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/restocks/", server.base_url))
        .header("x-store-id", store_id.to_string())
        .header("content-type", "application/json")
        .body(r#"{"materials": "garbage"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(format!("{}/inventory/", server.base_url))
        .header("x-store-id", store_id.to_string())
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["materials"][0]["current_capacity"], json!(10));
}

#[tokio::test]
async fn restock_of_unstocked_material_is_not_found() {
    let server = TestServer::spawn().await;
    let store_id = server.seed_store();
    let material = server.seed_material("Flour", 100);
    server.seed_stock(store_id, material, 50, 100);
    let unstocked = server.seed_material("Sugar", 10);

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/restocks/", server.base_url))
        .header("x-store-id", store_id.to_string())
        .json(&json!({ "materials": [{ "material": unstocked, "quantity": 5 }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sale_batch_subtracts_material_stocks() {
    let server = TestServer::spawn().await;
    let store_id = server.seed_store();
    let m1 = server.seed_material("Flour", 10);
    let m2 = server.seed_material("Sugar", 10);
    server.seed_stock(store_id, m1, 500, 1000);
    server.seed_stock(store_id, m2, 500, 1000);
    let p1 = server.seed_product(
        store_id,
        "Bread",
        vec![BomLine { material_id: m1, quantity_per_unit: 5 }],
    );
    let p2 = server.seed_product(
        store_id,
        "Cake",
        vec![BomLine { material_id: m2, quantity_per_unit: 10 }],
    );

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/multisales/", server.base_url))
        .header("x-store-id", store_id.to_string())
        .json(&json!({ "sales": [
            { "product_id": p1, "quantity": 2 },
            { "product_id": p2, "quantity": 10 },
        ] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Material stocks subtracted successfully"));
    let stocks = body["updated material stocks"].as_array().unwrap();
    assert_eq!(stocks.len(), 2);
    assert_eq!(stocks[0]["material"], json!("Flour"));
    assert_eq!(stocks[0]["total_subtracted_capacity"], json!(10));
    assert_eq!(stocks[0]["remaining capacity"], json!("490/1000"));
    assert_eq!(stocks[1]["remaining capacity"], json!("400/1000"));
}

#[tokio::test]
async fn invalid_sale_reports_per_line_errors_and_mutates_nothing() {
    let server = TestServer::spawn().await;
    let store_id = server.seed_store();
    let m1 = server.seed_material("Flour", 10);
    server.seed_stock(store_id, m1, 500, 1000);
    let p1 = server.seed_product(
        store_id,
        "Bread",
        vec![BomLine { material_id: m1, quantity_per_unit: 5 }],
    );

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/sales/", server.base_url))
        .header("x-store-id", store_id.to_string())
        .json(&json!({ "sales": [
            { "product_id": ProductId::new(), "quantity": 2 },
            { "product_id": p1, "quantity": 1 },
        ] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["error"],
        json!("Sales request failed due to invalid data. Please review the following list of invalid sales")
    );
    assert_eq!(body["sales"][0]["detail"], json!("Invalid product id"));

    // The valid line was not applied.
    let res = client
        .get(format!("{}/inventory/", server.base_url))
        .header("x-store-id", store_id.to_string())
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["materials"][0]["current_capacity"], json!(500));
}

#[tokio::test]
async fn material_stock_crud_enforces_capacity_invariant() {
    let server = TestServer::spawn().await;
    let store_id = server.seed_store();
    let material = server.seed_material("Flour", 10);

    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/material-stocks/", server.base_url))
        .header("x-store-id", store_id.to_string())
        .json(&json!({ "material": material, "current_capacity": 50, "max_capacity": 100 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["percentage_of_capacity"], json!(50.0));

    // Duplicate pair is refused.
    let res = client
        .post(format!("{}/material-stocks/", server.base_url))
        .header("x-store-id", store_id.to_string())
        .json(&json!({ "material": material, "current_capacity": 0, "max_capacity": 10 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Shrinking max below current is refused with the wire message.
    let res = client
        .put(format!("{}/material-stocks/{}", server.base_url, id))
        .header("x-store-id", store_id.to_string())
        .json(&json!({ "max_capacity": 40 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["message"],
        json!("Maximum capacity cannot be lower than current capacity.")
    );

    // Raising max is fine.
    let res = client
        .put(format!("{}/material-stocks/{}", server.base_url, id))
        .header("x-store-id", store_id.to_string())
        .json(&json!({ "max_capacity": 200 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["max_capacity"], json!(200));

    let res = client
        .delete(format!("{}/material-stocks/{}", server.base_url, id))
        .header("x-store-id", store_id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/material-stocks/{}", server.base_url, id))
        .header("x-store-id", store_id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn product_capacity_reports_limiting_material() {
    let server = TestServer::spawn().await;
    let store_id = server.seed_store();
    let m1 = server.seed_material("Flour", 10);
    let m2 = server.seed_material("Sugar", 10);
    server.seed_stock(store_id, m1, 12, 100);
    server.seed_stock(store_id, m2, 9, 100);
    server.seed_product(
        store_id,
        "Cake",
        vec![
            BomLine { material_id: m1, quantity_per_unit: 5 },
            BomLine { material_id: m2, quantity_per_unit: 3 },
        ],
    );

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/product-capacity/", server.base_url))
        .header("x-store-id", store_id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let producible = &body["products"][0]["producible"];
    assert_eq!(producible["kind"], json!("bounded"));
    assert_eq!(producible["quantity"], json!(2));
    assert_eq!(producible["limiting_material"], json!(m1.to_string()));
}

#[tokio::test]
async fn product_assignment_round_trip() {
    let server = TestServer::spawn().await;
    let store_id = server.seed_store();
    let product = Product::new(ProductId::new(), "Bread", vec![]).unwrap();
    let product_id = product.id();
    server.services.catalog().insert_product(product).unwrap();

    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/products/", server.base_url))
        .header("x-store-id", store_id.to_string())
        .json(&json!({ "product_id": product_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Re-assignment conflicts.
    let res = client
        .post(format!("{}/products/", server.base_url))
        .header("x-store-id", store_id.to_string())
        .json(&json!({ "product_id": product_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Listed as sellable.
    let res = client
        .get(format!("{}/sales/", server.base_url))
        .header("x-store-id", store_id.to_string())
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["products"][0]["name"], json!("Bread"));

    let res = client
        .delete(format!("{}/products/{}", server.base_url, product_id))
        .header("x-store-id", store_id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}
