use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rankings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rankings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Rankings::Key).string().not_null().unique_key())
                    .col(ColumnDef::new(Rankings::Name).string().not_null())
                    .col(ColumnDef::new(Rankings::SourceUrl).string().not_null())
                    .col(
                        ColumnDef::new(Rankings::IntervalMinutes)
                            .integer()
                            .not_null()
                            .default(60),
                    )
                    .col(
                        ColumnDef::new(Rankings::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Rankings::LastCrawledAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Rankings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Rankings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rankings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Rankings {
    Table,
    Id,
    Key,
    Name,
    SourceUrl,
    IntervalMinutes,
    Enabled,
    LastCrawledAt,
    CreatedAt,
    UpdatedAt,
}
