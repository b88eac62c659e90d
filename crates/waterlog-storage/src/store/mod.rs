use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};

pub mod condition;
pub mod intake;
pub mod report;

/// Unified access layer over the application database.
///
/// All methods are `async fn` on top of SeaORM + SQLite; the schema is kept
/// current by `sea-orm-migration`. Every query and mutation takes the owning
/// account id as an explicit parameter.
pub struct WaterStore {
    pub(crate) db: DatabaseConnection,
}

impl WaterStore {
    /// Connect to the database and run pending migrations.
    ///
    /// `db_url` is a full connection URL supplied by the caller, e.g.
    /// `sqlite://data/waterlog.db?mode=rwc` or `sqlite::memory:` in tests.
    pub async fn new(db_url: &str) -> Result<Self> {
        let db = Database::connect(db_url).await?;

        // WAL mode only applies to file-backed SQLite databases
        if db_url.starts_with("sqlite://") {
            db.execute_unprepared("PRAGMA journal_mode=WAL;").await?;
        }

        Migrator::up(&db, None).await?;

        Ok(Self { db })
    }

    pub(crate) fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
