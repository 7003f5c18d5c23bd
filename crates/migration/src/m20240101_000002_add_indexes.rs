use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Listing is always ordered by updated_at desc
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_count_updated_at")
                    .table(Count::Table)
                    .col(Count::UpdatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_count_updated_at").table(Count::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Count { Table, UpdatedAt }
