use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create ranking_snapshots table
        manager
            .create_table(
                Table::create()
                    .table(RankingSnapshots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RankingSnapshots::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RankingSnapshots::RankingId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RankingSnapshots::EntryCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(RankingSnapshots::TaskId).uuid())
                    .col(
                        ColumnDef::new(RankingSnapshots::CapturedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Entries are denormalized per snapshot for fast board rendering
        manager
            .create_table(
                Table::create()
                    .table(RankingSnapshotEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RankingSnapshotEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RankingSnapshotEntries::SnapshotId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RankingSnapshotEntries::Position)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RankingSnapshotEntries::BookId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RankingSnapshotEntries::Score).double())
                    .col(ColumnDef::new(RankingSnapshotEntries::Popularity).big_integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ranking_snapshot_entries_snapshot_id")
                            .from(
                                RankingSnapshotEntries::Table,
                                RankingSnapshotEntries::SnapshotId,
                            )
                            .to(RankingSnapshots::Table, RankingSnapshots::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(RankingSnapshotEntries::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(RankingSnapshots::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RankingSnapshots {
    Table,
    Id,
    RankingId,
    EntryCount,
    TaskId,
    CapturedAt,
}

#[derive(DeriveIden)]
enum RankingSnapshotEntries {
    Table,
    Id,
    SnapshotId,
    Position,
    BookId,
    Score,
    Popularity,
}
