use places_portal::{
    AppState,
    config::AppConfig,
    create_router, logging,
    repository::{PostgresRepository, RepositoryState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;

/// main
///
/// The asynchronous entry point for the application, responsible for initializing
/// all core components: Configuration, Logging, Database, and the HTTP Server.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    // Loads .env file settings before configuration can be read.
    dotenv::dotenv().ok();
    // AppConfig::load() implements the fail-fast principle for missing Production secrets.
    let config = AppConfig::load();

    // 2. Logging Initialization (pretty locally, JSON in production).
    logging::init(&config);

    let system_log = logging::ChannelLogger::new(logging::channels::SYSTEM);
    system_log.info(&format!("Application starting in {:?} mode", config.env));

    // 3. Database Initialization (Postgres)
    // Creates a connection pool to the Postgres instance defined in the configuration.
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    // Schema migrations are embedded at compile time and applied on boot.
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("FATAL: Database migration failed.");

    // Instantiate the Repository, wrapping it in an Arc for thread-safe sharing.
    let repo = Arc::new(PostgresRepository::new(pool)) as RepositoryState;

    // 4. Unified State Assembly
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState { repo, config };

    // 5. Router and Server Startup
    let app = create_router(app_state);

    // Binds the TCP listener and initiates the HTTP server.
    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind HTTP listener.");

    system_log.info(&format!("Listening on {}", bind_addr));
    system_log.info("API Documentation (Swagger UI) available at /swagger-ui");

    // The long-running Axum server process.
    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}
