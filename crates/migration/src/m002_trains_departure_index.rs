use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m002_trains_departure_index"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Listing and export always sort on departure.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_trains_depart")
                    .table(Alias::new("trains"))
                    .col(Alias::new("depart"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_trains_depart")
                    .table(Alias::new("trains"))
                    .to_owned(),
            )
            .await
    }
}
