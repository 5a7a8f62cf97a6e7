//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for all lists and cards.

mod ordering;
mod repository;
mod search;

pub use repository::*;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Ordered schema migrations. Entry `n` upgrades the schema to version `n + 1`.
const MIGRATIONS: &[&str] = &[
    // 1: lists and cards
    r#"
    CREATE TABLE IF NOT EXISTS lists (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS cards (
        id TEXT PRIMARY KEY,
        list_id TEXT NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        photo_url TEXT NOT NULL,
        card_number TEXT NOT NULL,
        collection_total INTEGER,
        language TEXT NOT NULL,
        card_order INTEGER NOT NULL,
        condition TEXT NOT NULL,
        card_type TEXT NOT NULL DEFAULT 'Normal',
        grading_note INTEGER CHECK (grading_note BETWEEN 1 AND 10),
        owned INTEGER NOT NULL DEFAULT 0
    );
    "#,
    // 2: one position per card within a list, plus lookup indexes
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_cards_list_order ON cards(list_id, card_order);
    CREATE INDEX IF NOT EXISTS idx_cards_name ON cards(name);
    CREATE INDEX IF NOT EXISTS idx_lists_name ON lists(name);
    "#,
];

/// Latest schema version this build knows how to produce.
pub const SCHEMA_VERSION: i64 = MIGRATIONS.len() as i64;

/// Initialize the read-write connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Open a read-only pool on an existing database.
///
/// Any write issued through this pool fails inside SQLite.
pub async fn open_read_only(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .read_only(true)
        .create_if_missing(false)
        .busy_timeout(std::time::Duration::from_secs(30));

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Current schema version recorded in the `meta` table.
pub async fn schema_version(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT schema_version FROM meta WHERE id = 1")
        .fetch_one(pool)
        .await
}

/// Apply every migration newer than the recorded schema version.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            schema_version INTEGER NOT NULL DEFAULT 0,
            migrated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT OR IGNORE INTO meta (id, schema_version, migrated_at)
        VALUES (1, 0, datetime('now'));
        "#,
    )
    .execute(pool)
    .await?;

    let current = schema_version(pool).await?;

    for (index, sql) in MIGRATIONS.iter().enumerate() {
        let version = index as i64 + 1;
        if version <= current {
            continue;
        }

        let mut tx = pool.begin().await?;
        sqlx::query(sql).execute(&mut *tx).await?;
        sqlx::query("UPDATE meta SET schema_version = ?, migrated_at = ? WHERE id = 1")
            .bind(version)
            .bind(Utc::now().to_rfc3339())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!("Migrated database schema to version {}", version);
    }

    Ok(())
}
