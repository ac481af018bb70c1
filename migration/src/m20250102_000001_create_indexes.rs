use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_book_snapshots_book_captured")
                    .table(BookSnapshots::Table)
                    .col(BookSnapshots::BookId)
                    .col(BookSnapshots::CapturedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ranking_snapshots_ranking_captured")
                    .table(RankingSnapshots::Table)
                    .col(RankingSnapshots::RankingId)
                    .col(RankingSnapshots::CapturedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ranking_snapshot_entries_snapshot")
                    .table(RankingSnapshotEntries::Table)
                    .col(RankingSnapshotEntries::SnapshotId)
                    .col(RankingSnapshotEntries::Position)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_crawl_tasks_status_scheduled")
                    .table(CrawlTasks::Table)
                    .col(CrawlTasks::Status)
                    .col(CrawlTasks::ScheduledAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_crawl_tasks_ranking")
                    .table(CrawlTasks::Table)
                    .col(CrawlTasks::RankingId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_book_snapshots_book_captured")
                    .table(BookSnapshots::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_ranking_snapshots_ranking_captured")
                    .table(RankingSnapshots::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_ranking_snapshot_entries_snapshot")
                    .table(RankingSnapshotEntries::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_crawl_tasks_status_scheduled")
                    .table(CrawlTasks::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_crawl_tasks_ranking")
                    .table(CrawlTasks::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum BookSnapshots {
    Table,
    BookId,
    CapturedAt,
}

#[derive(DeriveIden)]
enum RankingSnapshots {
    Table,
    RankingId,
    CapturedAt,
}

#[derive(DeriveIden)]
enum RankingSnapshotEntries {
    Table,
    SnapshotId,
    Position,
}

#[derive(DeriveIden)]
enum CrawlTasks {
    Table,
    Status,
    ScheduledAt,
    RankingId,
}
