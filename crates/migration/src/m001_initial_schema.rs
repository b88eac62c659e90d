use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m001_initial_schema"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(UP_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(DOWN_SQL)
            .await?;
        Ok(())
    }
}

const UP_SQL: &str = "
CREATE TABLE IF NOT EXISTS intake_logs (
    id TEXT PRIMARY KEY NOT NULL,
    account_id TEXT NOT NULL,
    level TEXT NOT NULL,
    recorded_at TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_intake_logs_account_recorded
    ON intake_logs(account_id, recorded_at DESC);

CREATE TABLE IF NOT EXISTS condition_logs (
    id TEXT PRIMARY KEY NOT NULL,
    account_id TEXT NOT NULL,
    condition_type TEXT NOT NULL,
    note TEXT,
    log_date TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE(account_id, log_date)
);
CREATE INDEX IF NOT EXISTS idx_condition_logs_account_date
    ON condition_logs(account_id, log_date DESC);

CREATE TABLE IF NOT EXISTS ai_reports (
    id TEXT PRIMARY KEY NOT NULL,
    account_id TEXT NOT NULL,
    content TEXT NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    report_type TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_ai_reports_account_created
    ON ai_reports(account_id, created_at DESC);
";

const DOWN_SQL: &str = "
DROP TABLE IF EXISTS ai_reports;
DROP TABLE IF EXISTS condition_logs;
DROP TABLE IF EXISTS intake_logs;
";
