// src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{cart_handlers, category_handlers, order_handlers, product_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called from `main.rs` (and the HTTP tests) to configure the Actix app.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      // Admin read surface (bearer token required)
      .route("/carts", web::get().to(cart_handlers::list_carts_handler))
      .route("/orders", web::get().to(order_handlers::list_orders_handler))
      // Catalog surface
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler))
          .route("/{product_id}", web::put().to(product_handlers::update_product_handler))
          .route(
            "/{product_id}",
            web::delete().to(product_handlers::delete_product_handler),
          ),
      )
      .service(
        web::scope("/categories")
          .route("", web::get().to(category_handlers::list_categories_handler))
          .route(
            "/{category_id}",
            web::put().to(category_handlers::update_category_handler),
          )
          .route(
            "/{category_id}",
            web::delete().to(category_handlers::delete_category_handler),
          ),
      )
      .route(
        "/catalog/reconcile",
        web::post().to(product_handlers::reconcile_catalog_handler),
      ),
  );
}
