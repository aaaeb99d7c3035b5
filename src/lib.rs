pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::time::Duration;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use db::{create_pool, DbPool};
use infrastructure::payment::PaymentConfig;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::sessions::list_sessions,
        handlers::sessions::create_session,
        handlers::sessions::update_session,
        handlers::sessions::cancel_session,
        handlers::orders::current_cart,
        handlers::orders::get_order,
        handlers::orders::toggle_item,
        handlers::orders::remove_item,
        handlers::orders::trash_cart,
        handlers::orders::place_order,
        handlers::orders::advance_status,
    ),
    components(schemas(
        handlers::sessions::ListSessionsParams,
        handlers::sessions::CreateSessionRequest,
        handlers::sessions::UpdateSessionRequest,
        handlers::sessions::CancelSessionRequest,
        handlers::sessions::SessionResponse,
        handlers::orders::ToggleItemRequest,
        handlers::orders::PlaceOrderRequest,
        handlers::orders::OrderItemResponse,
        handlers::orders::OrderLogResponse,
        handlers::orders::OrderResponse,
    )),
    tags(
        (name = "sessions", description = "Teacher session booking"),
        (name = "orders", description = "Cart and order lifecycle")
    )
)]
struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    payment_timeout: Duration,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let payment_cfg = PaymentConfig {
        timeout: payment_timeout,
    };
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(payment_cfg.clone()))
            .wrap(Logger::default())
            .service(
                web::scope("/teachers").route(
                    "/{teacher_id}/sessions",
                    web::get().to(handlers::sessions::list_sessions),
                ),
            )
            .service(
                web::scope("/sessions")
                    .route("", web::post().to(handlers::sessions::create_session))
                    .route("/{id}", web::patch().to(handlers::sessions::update_session))
                    .route(
                        "/{id}/cancel",
                        web::post().to(handlers::sessions::cancel_session),
                    ),
            )
            .service(
                web::scope("/orders")
                    .route("/cart", web::get().to(handlers::orders::current_cart))
                    .route(
                        "/cart/items/toggle",
                        web::post().to(handlers::orders::toggle_item),
                    )
                    .route("/{id}", web::get().to(handlers::orders::get_order))
                    .route(
                        "/{id}/items/{product_id}",
                        web::delete().to(handlers::orders::remove_item),
                    )
                    .route("/{id}/items", web::delete().to(handlers::orders::trash_cart))
                    .route("/{id}/place", web::post().to(handlers::orders::place_order))
                    .route(
                        "/{id}/advance",
                        web::post().to(handlers::orders::advance_status),
                    ),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
