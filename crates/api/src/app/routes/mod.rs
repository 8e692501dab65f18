use axum::{
    routing::{get, post},
    Router,
};

pub mod capacity;
pub mod inventory;
pub mod material_stocks;
pub mod products;
pub mod restocks;
pub mod sales;
pub mod system;

/// Router for all store-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/restocks/", get(restocks::preview).post(restocks::restock))
        .route("/sales/", get(sales::list_products).post(sales::sell))
        .route("/multisales/", post(sales::sell))
        .route(
            "/material-stocks/",
            get(material_stocks::list).post(material_stocks::create),
        )
        .route(
            "/material-stocks/:id",
            get(material_stocks::get_one)
                .put(material_stocks::update)
                .delete(material_stocks::delete),
        )
        .route("/product-capacity/", get(capacity::product_capacity))
        .route("/inventory/", get(inventory::inventory))
        .route("/products/", post(products::assign))
        .route("/products/:id", axum::routing::delete(products::unassign))
}
