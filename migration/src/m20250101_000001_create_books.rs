use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create books table
        manager
            .create_table(
                Table::create()
                    .table(Books::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Books::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Books::SourceBookId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Books::Title).string().not_null())
                    .col(ColumnDef::new(Books::Author).string().not_null())
                    .col(ColumnDef::new(Books::Category).string())
                    .col(ColumnDef::new(Books::Status).string().not_null())
                    .col(ColumnDef::new(Books::CoverUrl).string())
                    .col(ColumnDef::new(Books::Intro).text())
                    .col(
                        ColumnDef::new(Books::FirstSeenAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Books::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create book_snapshots table
        manager
            .create_table(
                Table::create()
                    .table(BookSnapshots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookSnapshots::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BookSnapshots::BookId).uuid().not_null())
                    .col(ColumnDef::new(BookSnapshots::Score).double())
                    .col(ColumnDef::new(BookSnapshots::Popularity).big_integer())
                    .col(ColumnDef::new(BookSnapshots::WordCount).big_integer())
                    .col(ColumnDef::new(BookSnapshots::LastChapter).string())
                    .col(
                        ColumnDef::new(BookSnapshots::CapturedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_book_snapshots_book_id")
                            .from(BookSnapshots::Table, BookSnapshots::BookId)
                            .to(Books::Table, Books::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookSnapshots::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Books::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Books {
    Table,
    Id,
    SourceBookId,
    Title,
    Author,
    Category,
    Status,
    CoverUrl,
    Intro,
    FirstSeenAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BookSnapshots {
    Table,
    Id,
    BookId,
    Score,
    Popularity,
    WordCount,
    LastChapter,
    CapturedAt,
}
