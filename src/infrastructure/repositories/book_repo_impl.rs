// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::book::{Book, BookSnapshot};
use crate::domain::repositories::book_repository::{BookQueryParams, BookRepository};
use crate::domain::repositories::crawl_task_repository::RepositoryError;
use crate::infrastructure::database::entities::{book as book_entity, book_snapshot};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 书籍仓库实现
///
/// 基于SeaORM实现的书籍数据访问层
#[derive(Clone)]
pub struct BookRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl BookRepositoryImpl {
    /// 创建新的书籍仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<book_entity::Model> for Book {
    fn from(model: book_entity::Model) -> Self {
        Self {
            id: model.id,
            source_book_id: model.source_book_id,
            title: model.title,
            author: model.author,
            category: model.category,
            status: model.status.parse().unwrap_or_default(),
            cover_url: model.cover_url,
            intro: model.intro,
            first_seen_at: model.first_seen_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Book> for book_entity::ActiveModel {
    fn from(book: Book) -> Self {
        Self {
            id: Set(book.id),
            source_book_id: Set(book.source_book_id.clone()),
            title: Set(book.title.clone()),
            author: Set(book.author.clone()),
            category: Set(book.category.clone()),
            status: Set(book.status.to_string()),
            cover_url: Set(book.cover_url.clone()),
            intro: Set(book.intro.clone()),
            first_seen_at: Set(book.first_seen_at),
            updated_at: Set(book.updated_at),
        }
    }
}

impl From<book_snapshot::Model> for BookSnapshot {
    fn from(model: book_snapshot::Model) -> Self {
        Self {
            id: model.id,
            book_id: model.book_id,
            score: model.score,
            popularity: model.popularity,
            word_count: model.word_count,
            last_chapter: model.last_chapter,
            captured_at: model.captured_at,
        }
    }
}

#[async_trait]
impl BookRepository for BookRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, RepositoryError> {
        let model = book_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_source_id(
        &self,
        source_book_id: &str,
    ) -> Result<Option<Book>, RepositoryError> {
        let model = book_entity::Entity::find()
            .filter(book_entity::Column::SourceBookId.eq(source_book_id))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn upsert(&self, book: &Book) -> Result<(Book, bool), RepositoryError> {
        match self.find_by_source_id(&book.source_book_id).await? {
            Some(existing) => {
                // 更新元数据，保留原ID与首次收录时间
                let mut merged = book.clone();
                merged.id = existing.id;
                merged.first_seen_at = existing.first_seen_at;
                merged.updated_at = Utc::now().into();

                let model: book_entity::ActiveModel = merged.clone().into();
                let updated = model.update(self.db.as_ref()).await?;
                Ok((updated.into(), false))
            }
            None => {
                let model: book_entity::ActiveModel = book.clone().into();
                let inserted = model.insert(self.db.as_ref()).await?;
                Ok((inserted.into(), true))
            }
        }
    }

    async fn query_books(
        &self,
        params: BookQueryParams,
    ) -> Result<(Vec<Book>, u64), RepositoryError> {
        let mut query = book_entity::Entity::find();

        if let Some(keyword) = &params.keyword {
            let pattern = format!("%{}%", keyword);
            query = query.filter(
                Condition::any()
                    .add(book_entity::Column::Title.like(&pattern))
                    .add(book_entity::Column::Author.like(&pattern)),
            );
        }
        if let Some(category) = &params.category {
            query = query.filter(book_entity::Column::Category.eq(category));
        }
        if let Some(status) = &params.status {
            query = query.filter(book_entity::Column::Status.eq(status));
        }

        let total = query.clone().count(self.db.as_ref()).await?;

        let models = query
            .order_by_desc(book_entity::Column::UpdatedAt)
            .offset(params.offset)
            .limit(params.limit)
            .all(self.db.as_ref())
            .await?;

        Ok((models.into_iter().map(Book::from).collect(), total))
    }

    async fn insert_snapshot(&self, snapshot: &BookSnapshot) -> Result<(), RepositoryError> {
        let model = book_snapshot::ActiveModel {
            id: Set(snapshot.id),
            book_id: Set(snapshot.book_id),
            score: Set(snapshot.score),
            popularity: Set(snapshot.popularity),
            word_count: Set(snapshot.word_count),
            last_chapter: Set(snapshot.last_chapter.clone()),
            captured_at: Set(snapshot.captured_at),
        };
        model.insert(self.db.as_ref()).await?;
        Ok(())
    }

    async fn latest_snapshot(
        &self,
        book_id: Uuid,
    ) -> Result<Option<BookSnapshot>, RepositoryError> {
        let model = book_snapshot::Entity::find()
            .filter(book_snapshot::Column::BookId.eq(book_id))
            .order_by_desc(book_snapshot::Column::CapturedAt)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn snapshots_since(
        &self,
        book_id: Uuid,
        since: DateTime<FixedOffset>,
    ) -> Result<Vec<BookSnapshot>, RepositoryError> {
        let models = book_snapshot::Entity::find()
            .filter(book_snapshot::Column::BookId.eq(book_id))
            .filter(book_snapshot::Column::CapturedAt.gte(since))
            .order_by_asc(book_snapshot::Column::CapturedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}
