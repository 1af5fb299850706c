// server/src/web/routes.rs

use actix_web::web;

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      // Health Check Route
      .route("/health", web::get().to(health_check_handler))
      // Authentication Routes
      .service(
        web::scope("/auth")
          .route(
            "/signup",
            web::post().to(crate::web::handlers::auth_handlers::signup_handler),
          )
          .route(
            "/signin",
            web::post().to(crate::web::handlers::auth_handlers::signin_handler),
          ),
      )
      // Cart Routes: one resource, read via GET and mutate via action POSTs
      .service(
        web::scope("/cart")
          .route("", web::get().to(crate::web::handlers::cart_handlers::get_cart_handler))
          .route(
            "",
            web::post().to(crate::web::handlers::cart_handlers::cart_action_handler),
          ),
      )
      // Checkout Routes
      .service(
        web::scope("/checkout").route(
          "",
          web::post().to(crate::web::handlers::checkout_handlers::start_checkout_handler),
        ),
      )
      // Order Routes
      .service(
        web::scope("/orders").route(
          "/{order_id}",
          web::get().to(crate::web::handlers::order_handlers::get_order_handler),
        ),
      )
      // Webhook Routes
      .service(
        web::scope("/webhooks").route(
          "/payment",
          web::post().to(crate::web::handlers::webhook_handlers::payment_webhook_handler),
        ),
      )
      // Product Routes
      .service(
        web::scope("/products")
          .route(
            "",
            web::get().to(crate::web::handlers::product_handlers::list_products_handler),
          )
          .route(
            "/{product_id}",
            web::get().to(crate::web::handlers::product_handlers::get_product_handler),
          ),
      ),
  );
}
