use log::info;
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::AnyPool;

// VARCHAR only: MySQL reports TEXT columns as blobs, which the Any driver
// will not decode into String.
const CREATE_CUSTOMERS: &str = "CREATE TABLE IF NOT EXISTS customers (
    id BIGINT PRIMARY KEY,
    full_name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL,
    phone VARCHAR(32) NOT NULL,
    gender VARCHAR(32) NOT NULL,
    dob VARCHAR(32) NOT NULL,
    address VARCHAR(1024) NOT NULL,
    password VARCHAR(255) NOT NULL,
    latitude DOUBLE,
    longitude DOUBLE,
    user_agent VARCHAR(1024) NOT NULL,
    platform VARCHAR(255) NOT NULL,
    screen_resolution VARCHAR(32) NOT NULL,
    submission_date VARCHAR(32) NOT NULL
)";

/// Opens the shared pool. Connecting eagerly doubles as the startup
/// connection test.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<AnyPool, String> {
    install_default_drivers();

    let pool = AnyPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| e.to_string())?;

    info!("Database connected successfully");
    Ok(pool)
}

pub async fn ensure_schema(pool: &AnyPool) -> Result<(), String> {
    sqlx::query(CREATE_CUSTOMERS)
        .execute(pool)
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}
