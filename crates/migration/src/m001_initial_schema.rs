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
CREATE TABLE IF NOT EXISTS trains (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    train_id TEXT NOT NULL UNIQUE,
    rail INTEGER NOT NULL,
    cargo TEXT NOT NULL,
    tonnage INTEGER NOT NULL,
    client TEXT NOT NULL,
    depart TEXT NOT NULL,
    arrivee TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'scheduled',
    notes TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_trains_rail ON trains(rail);
CREATE INDEX IF NOT EXISTS idx_trains_status ON trains(status);

CREATE TABLE IF NOT EXISTS alert_config (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    email TEXT NOT NULL,
    delay_min INTEGER NOT NULL DEFAULT 60,
    alert_types TEXT NOT NULL DEFAULT 'all'
);
";

const DOWN_SQL: &str = "
DROP TABLE IF EXISTS alert_config;
DROP TABLE IF EXISTS trains;
";
