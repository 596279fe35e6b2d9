use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use common::database::{DatabaseConfig, init_pool};
use common::error::DatabaseError;

use api::repositories::{MedicineRepository, TokenRepository, UserRepository};
use api::routes;
use api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting pharmacy API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Apply pending schema migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;

    info!("Pharmacy API service initialized successfully");

    // Initialize repositories
    let medicine_repository = MedicineRepository::new(pool.clone());
    let token_repository = TokenRepository::new(pool.clone());
    let user_repository = UserRepository::new(pool.clone());

    let app_state = AppState {
        db_pool: pool,
        medicine_repository,
        token_repository,
        user_repository,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
    info!("Pharmacy API service listening on 0.0.0.0:8000");

    axum::serve(listener, app).await?;

    Ok(())
}
