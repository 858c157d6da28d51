use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Schema, Statement};
use std::env;
use tracing::info;

use crate::domain::admin::entity::system_setting;
use crate::domain::audit::entity::audit_log;
use crate::domain::dream::entity::{dream, interpretation, symbol_dictionary};
use crate::domain::user::entity::{user, user_usage};

pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;
    info!("Successfully connected to the database.");

    let should_update_schema = env::var("DB_SCHEMA_UPDATE")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid DB_SCHEMA_UPDATE value, defaulting to false. Use 'true' or 'false'."
            );
            false
        });

    if should_update_schema {
        create_tables(&db).await?;
    } else {
        info!("Skipping database schema synchronization (DB_SCHEMA_UPDATE is not true).");
    }

    Ok(db)
}

async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    info!("Starting database schema synchronization...");

    // Order matters for foreign keys (parent first, then child).

    // 1. Independent entities
    create_table_if_not_exists(db, &schema, user::Entity).await?;
    create_table_if_not_exists(db, &schema, symbol_dictionary::Entity).await?;
    create_table_if_not_exists(db, &schema, system_setting::Entity).await?;

    // 2. Dependent entities
    create_table_if_not_exists(db, &schema, dream::Entity).await?;
    create_table_if_not_exists(db, &schema, interpretation::Entity).await?;
    create_table_if_not_exists(db, &schema, user_usage::Entity).await?;
    create_table_if_not_exists(db, &schema, audit_log::Entity).await?;

    // A dream owns at most one interpretation; the relation is enforced
    // here rather than by convention.
    create_unique_index_if_not_exists(
        db,
        "uq_interpretations_dream",
        "interpretations",
        &["dream_id"],
    )
    .await?;

    // History and audit views are always filtered/sorted this way.
    create_index_if_not_exists(
        db,
        "idx_dreams_user_created",
        "dreams",
        &["user_id", "created_at"],
    )
    .await?;
    create_index_if_not_exists(db, "idx_audit_logs_created", "audit_logs", &["created_at"])
        .await?;

    info!("Database schema synchronization completed.");
    Ok(())
}

async fn create_index_if_not_exists(
    db: &DatabaseConnection,
    index_name: &str,
    table_name: &str,
    columns: &[&str],
) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let cols = columns.join(", ");
    let sql = format!("CREATE INDEX {} ON {} ({})", index_name, table_name, cols);
    let stmt = Statement::from_string(backend, sql);
    match db.execute(stmt).await {
        Ok(_) => Ok(()),
        Err(e) => {
            let err_str = e.to_string().to_lowercase();
            if err_str.contains("duplicate") || err_str.contains("exists") {
                Ok(())
            } else {
                tracing::error!("Failed to create index {}: {}", index_name, e);
                Err(e)
            }
        }
    }
}

async fn create_unique_index_if_not_exists(
    db: &DatabaseConnection,
    index_name: &str,
    table_name: &str,
    columns: &[&str],
) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let cols = columns.join(", ");
    let sql = format!(
        "CREATE UNIQUE INDEX {} ON {} ({})",
        index_name, table_name, cols
    );
    let stmt = Statement::from_string(backend, sql);
    match db.execute(stmt).await {
        Ok(_) => Ok(()),
        Err(e) => {
            // Ignore duplicate index errors for idempotency.
            let err_str = e.to_string().to_lowercase();
            if err_str.contains("duplicate") || err_str.contains("exists") {
                Ok(())
            } else {
                tracing::error!("Failed to create unique index {}: {}", index_name, e);
                Err(e)
            }
        }
    }
}

async fn create_table_if_not_exists<E>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr>
where
    E: sea_orm::EntityTrait,
{
    let backend = db.get_database_backend();
    let create_stmt: Statement =
        backend.build(schema.create_table_from_entity(entity).if_not_exists());

    match db.execute(create_stmt).await {
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::error!("Failed to create table: {}", e);
            Err(e)
        }
    }
}
