//! Commerce API Server
//!
//! Platform services for a modular e-commerce backend: user-defined dynamic
//! properties on business objects, notification definitions, payment plans,
//! inventory and the registered shipping, payment and tax methods.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use sea_orm::{Database, DatabaseConnection};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod cache;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    PostgresDictionaryItemRepository, PostgresDynamicPropertyRepository,
    PostgresFulfillmentCenterRepository, PostgresInventoryRepository,
    PostgresNotificationRepository, PostgresPaymentPlanRepository,
};
use app::{
    CommerceMethodService, DictionaryItemService, DynamicPropertySearchService,
    DynamicPropertyService, InventoryService, NotificationService, PaymentPlanService,
};
use cache::{region::DYNAMIC_PROPERTIES_REGION, CacheRegion, PlatformMemoryCache};
use config::Config;
use domain::entities::{
    CommerceMethod, MethodKind, Notification, NotificationKind, NotificationTemplate,
};

type PropertyStore = PostgresDynamicPropertyRepository;
type ItemStore = PostgresDictionaryItemRepository;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub dynamic_property_service: Arc<DynamicPropertyService<PropertyStore, ItemStore>>,
    pub dictionary_item_service: Arc<DictionaryItemService<ItemStore, PropertyStore>>,
    pub search_service: Arc<DynamicPropertySearchService<PropertyStore, ItemStore>>,
    pub notification_service: Arc<NotificationService<PostgresNotificationRepository>>,
    pub payment_plan_service: Arc<PaymentPlanService<PostgresPaymentPlanRepository>>,
    pub inventory_service:
        Arc<InventoryService<PostgresInventoryRepository, PostgresFulfillmentCenterRepository>>,
    pub commerce_method_service: Arc<CommerceMethodService>,
}

impl AppState {
    /// Wire the Postgres adapters into the services
    pub fn new(db: DatabaseConnection, config: &Config) -> Self {
        let property_repo = Arc::new(PostgresDynamicPropertyRepository::new(db.clone()));
        let item_repo = Arc::new(PostgresDictionaryItemRepository::new(db.clone()));
        let notification_repo = Arc::new(PostgresNotificationRepository::new(db.clone()));
        let plan_repo = Arc::new(PostgresPaymentPlanRepository::new(db.clone()));
        let inventory_repo = Arc::new(PostgresInventoryRepository::new(db.clone()));
        let center_repo = Arc::new(PostgresFulfillmentCenterRepository::new(db));

        let cache = Arc::new(PlatformMemoryCache::new());
        let region = Arc::new(CacheRegion::new(DYNAMIC_PROPERTIES_REGION));

        let dynamic_property_service = Arc::new(DynamicPropertyService::new(
            property_repo.clone(),
            item_repo.clone(),
            region.clone(),
        ));
        for object_type in &config.dynamic_property_types {
            dynamic_property_service.register_type(object_type);
        }

        let dictionary_item_service = Arc::new(DictionaryItemService::new(
            item_repo.clone(),
            property_repo.clone(),
            region.clone(),
        ));

        let search_service = Arc::new(DynamicPropertySearchService::new(
            property_repo,
            item_repo,
            dynamic_property_service.clone(),
            dictionary_item_service.clone(),
            cache,
            region,
        ));

        let notification_service = Arc::new(NotificationService::new(notification_repo));
        register_default_notifications(&notification_service);

        let payment_plan_service = Arc::new(PaymentPlanService::new(plan_repo));
        let inventory_service = Arc::new(InventoryService::new(inventory_repo, center_repo));

        let commerce_method_service = Arc::new(CommerceMethodService::new());
        register_default_methods(&commerce_method_service);

        Self {
            dynamic_property_service,
            dictionary_item_service,
            search_service,
            notification_service,
            payment_plan_service,
            inventory_service,
            commerce_method_service,
        }
    }
}

/// Notification types the platform ships with
fn register_default_notifications(service: &NotificationService<PostgresNotificationRepository>) {
    service.register_notification("RegistrationEmailNotification", || {
        let mut notification =
            Notification::new("RegistrationEmailNotification", NotificationKind::email());
        notification.templates = vec![NotificationTemplate {
            language_code: "en-US".to_string(),
            subject: Some("Welcome".to_string()),
            body: "Thank you for registering.".to_string(),
        }];
        notification
    });

    service.register_notification("OrderPaidEmailNotification", || {
        let mut notification =
            Notification::new("OrderPaidEmailNotification", NotificationKind::email());
        notification.templates = vec![NotificationTemplate {
            language_code: "en-US".to_string(),
            subject: Some("Your order has been paid".to_string()),
            body: "We received the payment for your order.".to_string(),
        }];
        notification
    });

    service.register_notification("PhoneVerificationSmsNotification", || {
        let mut notification =
            Notification::new("PhoneVerificationSmsNotification", NotificationKind::sms());
        notification.templates = vec![NotificationTemplate {
            language_code: "en-US".to_string(),
            subject: None,
            body: "Your verification code is {{ code }}".to_string(),
        }];
        notification
    });
}

/// Methods available without any extra module
fn register_default_methods(service: &CommerceMethodService) {
    service.register(MethodKind::Shipping, "FixedRate", || CommerceMethod {
        description: Some("Flat rate per order".to_string()),
        ..CommerceMethod::new(MethodKind::Shipping, "FixedRate", "Fixed rate")
    });
    service.register(MethodKind::Shipping, "BuyOnlinePickupInStore", || CommerceMethod {
        priority: 1,
        ..CommerceMethod::new(MethodKind::Shipping, "BuyOnlinePickupInStore", "Pickup in store")
    });
    service.register(MethodKind::Payment, "DefaultManualPaymentMethod", || {
        CommerceMethod::new(
            MethodKind::Payment,
            "DefaultManualPaymentMethod",
            "Manual payment",
        )
    });
    service.register(MethodKind::Tax, "FixedRateTaxProvider", || {
        CommerceMethod::new(MethodKind::Tax, "FixedRateTaxProvider", "Fixed rate tax")
    });
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Dynamic properties
        .route(
            "/api/platform/dynamic/types",
            get(handlers::list_types).post(handlers::register_types),
        )
        .route(
            "/api/platform/dynamic/properties/search",
            post(handlers::search_properties),
        )
        .route(
            "/api/platform/dynamic/properties",
            get(handlers::get_properties)
                .put(handlers::save_properties)
                .delete(handlers::delete_properties),
        )
        .route(
            "/api/platform/dynamic/dictionaryitems/search",
            post(handlers::search_dictionary_items),
        )
        .route(
            "/api/platform/dynamic/dictionaryitems",
            get(handlers::get_dictionary_items)
                .put(handlers::save_dictionary_items)
                .delete(handlers::delete_dictionary_items),
        )
        .route(
            "/api/platform/dynamic/values/:object_type/:object_id",
            get(handlers::get_object_values).put(handlers::save_object_values),
        )
        // Notifications
        .route(
            "/api/notifications/types",
            get(handlers::list_notification_types),
        )
        .route(
            "/api/notifications/:notification_type",
            get(handlers::get_notification),
        )
        .route(
            "/api/notifications",
            get(handlers::get_notifications).put(handlers::save_notifications),
        )
        // Payment plans
        .route(
            "/api/subscriptions/plans",
            get(handlers::get_plans)
                .put(handlers::save_plans)
                .delete(handlers::delete_plans),
        )
        // Inventory
        .route(
            "/api/inventory/fulfillmentcenters",
            get(handlers::get_fulfillment_centers)
                .put(handlers::save_fulfillment_centers)
                .delete(handlers::delete_fulfillment_centers),
        )
        .route(
            "/api/inventory/products",
            get(handlers::get_product_inventories),
        )
        .route(
            "/api/inventory/availability",
            get(handlers::get_product_availability),
        )
        .route(
            "/api/inventory",
            get(handlers::get_inventories)
                .put(handlers::save_inventories)
                .delete(handlers::delete_inventories),
        )
        // Shipping, payment and tax methods
        .route("/api/commerce/methods/:kind", get(handlers::list_methods))
        .route(
            "/api/commerce/methods/:kind/:code",
            get(handlers::get_method),
        )
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,commerce_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Commerce API...");

    let config = Config::from_env()?;

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("Database connected");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = router(AppState::new(db, &config));

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
