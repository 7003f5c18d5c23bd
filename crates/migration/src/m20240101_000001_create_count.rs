//! Create `count` table.
//!
//! One row per counter: serial id, signed value, last mutation time.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Count::Table)
                    .if_not_exists()
                    .col(pk_auto(Count::Id))
                    .col(integer(Count::Value).not_null().default(0))
                    .col(
                        timestamp_with_time_zone(Count::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Count::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Count { Table, Id, Value, UpdatedAt }
