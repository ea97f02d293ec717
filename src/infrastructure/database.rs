use crate::entities::{events, pdf_files};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::time::Duration;
use tracing::info;

/// Opens the store handle and makes sure both tables exist.
///
/// The returned connection is owned by the caller and should be handed to
/// [`close_database`] at shutdown.
pub async fn setup_database(db_url: &str) -> anyhow::Result<DatabaseConnection> {
    info!("📂 Database: {}", db_url);

    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(20)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;

    info!("✅ Database connected successfully");

    run_migrations(&db).await?;

    Ok(db)
}

pub async fn run_migrations(db: &DatabaseConnection) -> anyhow::Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    info!("🔄 Running auto-migrations...");

    let stmts = vec![
        (
            "pdf_files",
            schema
                .create_table_from_entity(pdf_files::Entity)
                .if_not_exists()
                .to_owned(),
        ),
        (
            "events",
            schema
                .create_table_from_entity(events::Entity)
                .if_not_exists()
                .to_owned(),
        ),
    ];

    for (name, stmt) in stmts {
        let stmt = builder.build(&stmt);
        db.execute(stmt).await?;
        info!("   - Table '{}' checked/created", name);
    }

    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_pdf_files_upload_date ON pdf_files(upload_date)",
        "CREATE INDEX IF NOT EXISTS idx_events_starts_at ON events(starts_at)",
    ];

    for query in indexes {
        if let Err(e) = db
            .execute(sea_orm::Statement::from_string(builder, query.to_string()))
            .await
        {
            tracing::warn!("   - Index creation warning: {} -> {}", query, e);
        }
    }

    Ok(())
}

/// Closes the store handle opened by [`setup_database`]
pub async fn close_database(db: DatabaseConnection) {
    match db.close().await {
        Ok(()) => info!("🔌 Database connection closed"),
        Err(e) => tracing::warn!("Failed to close database connection cleanly: {}", e),
    }
}
