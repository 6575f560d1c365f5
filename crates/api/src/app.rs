use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::services::payment::{GatewayError, PaymentGateway};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_admin_key, security_headers_middleware, trace_id,
};
use crate::routes::{
    admin_collections, admin_notices, admin_orders, admin_products, admin_testimonials,
    collections, currency, downloads, health, notices, orders, payments, preview, products,
    testimonials, webhooks,
};
use crate::services::{
    build_gateway, DownloadMailer, EmailError, EmailService, FileFetchError, FileFetcher,
    OrderConfirmation,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub confirmation: OrderConfirmation,
    pub fetcher: FileFetcher,
}

/// Failure to build a long-lived collaborator at startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Payment gateway: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Email service: {0}")]
    Email(#[from] EmailError),

    #[error("File fetcher: {0}")]
    FileFetch(#[from] FileFetchError),
}

impl AppState {
    /// Builds every collaborator from configuration.
    pub fn new(config: Config, pool: PgPool) -> Result<Self, StartupError> {
        let gateway = build_gateway(&config.payment)?;
        let mailer: Arc<dyn DownloadMailer> =
            Arc::new(EmailService::new(&config.email, &config.storefront)?);
        let fetcher = FileFetcher::new(&config.storage)?;
        Ok(Self::from_parts(config, pool, gateway, mailer, fetcher))
    }

    /// Assembles state from already-built collaborators.
    pub fn from_parts(
        config: Config,
        pool: PgPool,
        gateway: Arc<dyn PaymentGateway>,
        mailer: Arc<dyn DownloadMailer>,
        fetcher: FileFetcher,
    ) -> Self {
        let confirmation = OrderConfirmation::new(
            pool.clone(),
            gateway.clone(),
            mailer,
            config.storefront.api_base_url.clone(),
        );

        Self {
            pool,
            config: Arc::new(config),
            gateway,
            confirmation,
            fetcher,
        }
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Result<Router, StartupError> {
    Ok(router(AppState::new(config, pool)?))
}

pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Catalogue reads, checkout and delivery
    let storefront_routes = Router::new()
        .route("/api/v1/products", get(products::list_products))
        .route("/api/v1/products/:product_id", get(products::get_product))
        .route("/api/v1/collections", get(collections::list_collections))
        .route("/api/v1/collections/:slug", get(collections::get_collection))
        .route(
            "/api/v1/testimonials",
            get(testimonials::list_testimonials).post(testimonials::submit_testimonial),
        )
        .route("/api/v1/notices/active", get(notices::get_active_notice))
        .route("/api/v1/currency", get(currency::get_currency))
        .route("/api/v1/pay", post(payments::initialize_payment))
        .route("/api/v1/pay/verify", get(payments::verify_payment))
        .route("/api/v1/orders/:order_id", get(orders::get_order_items))
        .route(
            "/api/v1/download/:order_id/:product_id",
            get(downloads::download_file),
        )
        .route("/api/v1/preview/:url", get(preview::preview_pdf))
        .route(
            "/api/v1/webhooks/paystack",
            get(webhooks::paystack_status).post(webhooks::paystack_webhook),
        );

    // Admin routes (require X-Admin-Key)
    let admin_routes = Router::new()
        .route(
            "/api/v1/admin/products",
            get(admin_products::list_products).post(admin_products::create_product),
        )
        .route(
            "/api/v1/admin/products/:product_id",
            put(admin_products::update_product).delete(admin_products::delete_product),
        )
        .route(
            "/api/v1/admin/products/:product_id/move",
            post(admin_products::move_product),
        )
        .route(
            "/api/v1/admin/collections",
            get(admin_collections::list_collections).post(admin_collections::create_collection),
        )
        .route(
            "/api/v1/admin/collections/:collection_id",
            get(admin_collections::get_collection)
                .put(admin_collections::update_collection)
                .delete(admin_collections::delete_collection),
        )
        .route(
            "/api/v1/admin/collections/:collection_id/status",
            put(admin_collections::set_collection_status),
        )
        .route(
            "/api/v1/admin/collections/:collection_id/products",
            put(admin_collections::set_collection_products),
        )
        .route(
            "/api/v1/admin/testimonials",
            get(admin_testimonials::list_testimonials)
                .post(admin_testimonials::create_testimonial),
        )
        .route(
            "/api/v1/admin/testimonials/:testimonial_id",
            put(admin_testimonials::update_testimonial)
                .delete(admin_testimonials::delete_testimonial),
        )
        .route(
            "/api/v1/admin/testimonials/:testimonial_id/approval",
            put(admin_testimonials::set_approval),
        )
        .route(
            "/api/v1/admin/testimonials/:testimonial_id/move",
            post(admin_testimonials::move_testimonial),
        )
        .route(
            "/api/v1/admin/notices",
            get(admin_notices::list_notices).post(admin_notices::create_notice),
        )
        .route(
            "/api/v1/admin/notices/:notice_id",
            put(admin_notices::update_notice).delete(admin_notices::delete_notice),
        )
        .route(
            "/api/v1/admin/notices/:notice_id/status",
            put(admin_notices::set_notice_status),
        )
        .route("/api/v1/admin/orders", get(admin_orders::list_orders))
        .route("/api/v1/admin/orders/:order_id", get(admin_orders::get_order))
        .route("/api/v1/admin/stats", get(admin_orders::get_stats))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_key,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(storefront_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
