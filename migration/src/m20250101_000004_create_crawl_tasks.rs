use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CrawlTasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CrawlTasks::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CrawlTasks::RankingId).uuid().not_null())
                    .col(ColumnDef::new(CrawlTasks::Trigger).string().not_null())
                    .col(ColumnDef::new(CrawlTasks::Status).string().not_null())
                    .col(
                        ColumnDef::new(CrawlTasks::AttemptCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CrawlTasks::MaxRetries)
                            .integer()
                            .not_null()
                            .default(3),
                    )
                    .col(ColumnDef::new(CrawlTasks::ScheduledAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(CrawlTasks::StartedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(CrawlTasks::CompletedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(CrawlTasks::Error).text())
                    .col(
                        ColumnDef::new(CrawlTasks::BooksSeen)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CrawlTasks::BooksNew)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(CrawlTasks::LockToken).uuid())
                    .col(ColumnDef::new(CrawlTasks::LockExpiresAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(CrawlTasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CrawlTasks::UpdatedAt)
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
            .drop_table(Table::drop().table(CrawlTasks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CrawlTasks {
    Table,
    Id,
    RankingId,
    Trigger,
    Status,
    AttemptCount,
    MaxRetries,
    ScheduledAt,
    StartedAt,
    CompletedAt,
    Error,
    BooksSeen,
    BooksNew,
    LockToken,
    LockExpiresAt,
    CreatedAt,
    UpdatedAt,
}
