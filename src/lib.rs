pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::io;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::admin::AdminService;
use application::auth::AuthService;
use application::cart::CartService;
use application::catalog::CatalogService;
use application::checkout::CheckoutService;
use application::wishlist::WishlistService;
use config::Config;
use domain::ports::{BlobStore, KeyValueStore};
use infrastructure::blob_store::DiskBlobStore;
use infrastructure::kv_store::JsonFileStore;
use infrastructure::order_repo::DieselOrderRepository;
use infrastructure::product_repo::DieselProductRepository;
use infrastructure::user_repo::DieselUserRepository;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// The concrete service types the HTTP layer is wired with.
pub type Catalog = CatalogService<DieselProductRepository>;
pub type CartSvc = CartService<DieselProductRepository>;
pub type AuthSvc = AuthService<DieselUserRepository>;
pub type CheckoutSvc = CheckoutService<DieselOrderRepository>;
pub type AdminSvc =
    AdminService<DieselProductRepository, DieselOrderRepository, DieselUserRepository>;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::catalog::list_products,
        handlers::catalog::get_product,
        handlers::catalog::category_landing,
        handlers::cart::view_cart,
        handlers::cart::add_item,
        handlers::cart::set_quantity,
        handlers::cart::remove_item,
        handlers::cart::apply_coupon,
        handlers::checkout::place_order,
        handlers::checkout::my_orders,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::wishlist::view_wishlist,
        handlers::wishlist::toggle_wishlist,
        handlers::admin::login,
        handlers::admin::logout,
        handlers::admin::stats,
        handlers::admin::list_products,
        handlers::admin::create_product,
        handlers::admin::update_product,
        handlers::admin::delete_product,
        handlers::admin::list_orders,
        handlers::admin::get_order,
        handlers::admin::update_order_status,
        handlers::admin::delete_order,
        handlers::admin::list_users,
        handlers::admin::delete_user,
        handlers::admin::upload_image,
    ),
    components(schemas(
        handlers::catalog::ProductResponse,
        handlers::catalog::ProductListResponse,
        handlers::catalog::ProductPageResponse,
        handlers::catalog::TaxonomyGroup,
        handlers::catalog::LandingResponse,
        handlers::cart::CartLineResponse,
        handlers::cart::CartResponse,
        handlers::cart::AddItemRequest,
        handlers::cart::AddItemResponse,
        handlers::cart::SetQuantityRequest,
        handlers::cart::CouponRequest,
        handlers::checkout::PlaceOrderRequest,
        handlers::checkout::PlaceOrderResponse,
        handlers::checkout::OrderLineResponse,
        handlers::checkout::OrderResponse,
        handlers::checkout::OrderListResponse,
        handlers::auth::RegisterRequest,
        handlers::auth::LoginRequest,
        handlers::auth::SessionResponse,
        handlers::wishlist::ToggleRequest,
        handlers::wishlist::WishlistResponse,
        handlers::admin::AdminLoginRequest,
        handlers::admin::StatsResponse,
        handlers::admin::ProductRequest,
        handlers::admin::UpdateStatusRequest,
        handlers::admin::UserResponse,
        handlers::admin::UploadResponse,
    )),
    tags(
        (name = "catalog", description = "Browse and search the product catalog"),
        (name = "cart", description = "The persisted cart ledger"),
        (name = "checkout", description = "Order submission and order history"),
        (name = "auth", description = "Email/password accounts"),
        (name = "wishlist", description = "Saved products"),
        (name = "admin", description = "Dashboard and catalog administration"),
    )
)]
pub struct ApiDoc;

/// Every service the HTTP layer needs, pre-wrapped for `App::app_data`.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: web::Data<Catalog>,
    pub cart: web::Data<CartSvc>,
    pub auth: web::Data<AuthSvc>,
    pub checkout: web::Data<CheckoutSvc>,
    pub admin: web::Data<AdminSvc>,
    pub wishlist: web::Data<WishlistService>,
    pub config: web::Data<Config>,
}

impl AppServices {
    pub fn new(
        pool: DbPool,
        store: Arc<dyn KeyValueStore>,
        blobs: Arc<dyn BlobStore>,
        config: Config,
    ) -> Self {
        let catalog = CatalogService::new(DieselProductRepository::new(pool.clone()));
        let cart = CartService::new(
            DieselProductRepository::new(pool.clone()),
            store.clone(),
            config.shipping_fee.clone(),
        );
        let auth = AuthService::new(DieselUserRepository::new(pool.clone()), store.clone());
        let checkout = CheckoutService::new(
            DieselOrderRepository::new(pool.clone()),
            store.clone(),
            config.shipping_fee.clone(),
        );
        let admin = AdminService::new(
            DieselProductRepository::new(pool.clone()),
            DieselOrderRepository::new(pool.clone()),
            DieselUserRepository::new(pool),
            store.clone(),
            blobs,
            config.admin_password.clone(),
        );
        let wishlist = WishlistService::new(store);

        AppServices {
            catalog: web::Data::new(catalog),
            cart: web::Data::new(cart),
            auth: web::Data::new(auth),
            checkout: web::Data::new(checkout),
            admin: web::Data::new(admin),
            wishlist: web::Data::new(wishlist),
            config: web::Data::new(config),
        }
    }

    /// Registers the services and the whole route tree on an actix app.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.catalog.clone())
            .app_data(self.cart.clone())
            .app_data(self.auth.clone())
            .app_data(self.checkout.clone())
            .app_data(self.admin.clone())
            .app_data(self.wishlist.clone())
            .app_data(self.config.clone())
            .service(
                web::scope("/products")
                    .route("", web::get().to(handlers::catalog::list_products))
                    .route("/{id}", web::get().to(handlers::catalog::get_product)),
            )
            .service(
                web::scope("/categories")
                    .route("/{animal}", web::get().to(handlers::catalog::category_landing)),
            )
            .service(
                web::scope("/cart")
                    .route("", web::get().to(handlers::cart::view_cart))
                    .route("/items", web::post().to(handlers::cart::add_item))
                    .route("/items/{product_id}", web::put().to(handlers::cart::set_quantity))
                    .route(
                        "/items/{product_id}",
                        web::delete().to(handlers::cart::remove_item),
                    )
                    .route("/coupon", web::post().to(handlers::cart::apply_coupon)),
            )
            .service(web::scope("/checkout").route("", web::post().to(handlers::checkout::place_order)))
            .service(web::scope("/orders").route("", web::get().to(handlers::checkout::my_orders)))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(handlers::auth::register))
                    .route("/login", web::post().to(handlers::auth::login))
                    .route("/logout", web::post().to(handlers::auth::logout))
                    .route("/me", web::get().to(handlers::auth::me)),
            )
            .service(
                web::scope("/wishlist")
                    .route("", web::get().to(handlers::wishlist::view_wishlist))
                    .route("/toggle", web::post().to(handlers::wishlist::toggle_wishlist)),
            )
            .service(
                web::scope("/admin")
                    .route("/login", web::post().to(handlers::admin::login))
                    .route("/logout", web::post().to(handlers::admin::logout))
                    .route("/stats", web::get().to(handlers::admin::stats))
                    .route("/products", web::get().to(handlers::admin::list_products))
                    .route("/products", web::post().to(handlers::admin::create_product))
                    .route("/products/{id}", web::put().to(handlers::admin::update_product))
                    .route(
                        "/products/{id}",
                        web::delete().to(handlers::admin::delete_product),
                    )
                    .route("/orders", web::get().to(handlers::admin::list_orders))
                    .route("/orders/{id}", web::get().to(handlers::admin::get_order))
                    .route(
                        "/orders/{id}/status",
                        web::put().to(handlers::admin::update_order_status),
                    )
                    .route("/orders/{id}", web::delete().to(handlers::admin::delete_order))
                    .route("/users", web::get().to(handlers::admin::list_users))
                    .route("/users/{id}", web::delete().to(handlers::admin::delete_user))
                    .route("/images", web::post().to(handlers::admin::upload_image)),
            )
            .service(
                SwaggerUi::new("/docs/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()),
            );
    }
}

/// Build and return an actix-web `Server` bound to the configured host/port.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(pool: DbPool, config: Config) -> io::Result<actix_web::dev::Server> {
    let store: Arc<dyn KeyValueStore> = Arc::new(
        JsonFileStore::new(&config.data_dir)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?,
    );
    let blobs: Arc<dyn BlobStore> = Arc::new(
        DiskBlobStore::new(&config.media_dir, config.media_base_url.clone())
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?,
    );

    let host = config.host.clone();
    let port = config.port;
    let services = AppServices::new(pool, store, blobs, config);

    Ok(HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| services.register(cfg))
    })
    .bind((host, port))?
    .run())
}
