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

use crate::domain::models::ranking::{Ranking, RankingSnapshot, RankingSnapshotEntry};
use crate::domain::repositories::crawl_task_repository::RepositoryError;
use crate::domain::repositories::ranking_repository::RankingRepository;
use crate::infrastructure::database::entities::{
    ranking as ranking_entity, ranking_snapshot, ranking_snapshot_entry,
};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

/// 榜单仓库实现
///
/// 基于SeaORM实现的榜单数据访问层
#[derive(Clone)]
pub struct RankingRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl RankingRepositoryImpl {
    /// 创建新的榜单仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<ranking_entity::Model> for Ranking {
    fn from(model: ranking_entity::Model) -> Self {
        Self {
            id: model.id,
            key: model.key,
            name: model.name,
            source_url: model.source_url,
            interval_minutes: model.interval_minutes,
            enabled: model.enabled,
            last_crawled_at: model.last_crawled_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Ranking> for ranking_entity::ActiveModel {
    fn from(ranking: Ranking) -> Self {
        Self {
            id: Set(ranking.id),
            key: Set(ranking.key.clone()),
            name: Set(ranking.name.clone()),
            source_url: Set(ranking.source_url.clone()),
            interval_minutes: Set(ranking.interval_minutes),
            enabled: Set(ranking.enabled),
            last_crawled_at: Set(ranking.last_crawled_at),
            created_at: Set(ranking.created_at),
            updated_at: Set(ranking.updated_at),
        }
    }
}

impl From<ranking_snapshot::Model> for RankingSnapshot {
    fn from(model: ranking_snapshot::Model) -> Self {
        Self {
            id: model.id,
            ranking_id: model.ranking_id,
            entry_count: model.entry_count,
            task_id: model.task_id,
            captured_at: model.captured_at,
        }
    }
}

impl From<ranking_snapshot_entry::Model> for RankingSnapshotEntry {
    fn from(model: ranking_snapshot_entry::Model) -> Self {
        Self {
            id: model.id,
            snapshot_id: model.snapshot_id,
            position: model.position,
            book_id: model.book_id,
            score: model.score,
            popularity: model.popularity,
        }
    }
}

#[async_trait]
impl RankingRepository for RankingRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ranking>, RepositoryError> {
        let model = ranking_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<Ranking>, RepositoryError> {
        let model = ranking_entity::Entity::find()
            .filter(ranking_entity::Column::Key.eq(key))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self, enabled_only: bool) -> Result<Vec<Ranking>, RepositoryError> {
        let mut query = ranking_entity::Entity::find();
        if enabled_only {
            query = query.filter(ranking_entity::Column::Enabled.eq(true));
        }
        let models = query
            .order_by_asc(ranking_entity::Column::Key)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn upsert_definition(&self, ranking: &Ranking) -> Result<Ranking, RepositoryError> {
        match self.find_by_key(&ranking.key).await? {
            Some(existing) => {
                // urls.json是定义的唯一来源，但抓取进度保留
                let mut merged = ranking.clone();
                merged.id = existing.id;
                merged.created_at = existing.created_at;
                merged.last_crawled_at = existing.last_crawled_at;
                merged.updated_at = Utc::now().into();

                let model: ranking_entity::ActiveModel = merged.clone().into();
                let updated = model.update(self.db.as_ref()).await?;
                Ok(updated.into())
            }
            None => {
                let model: ranking_entity::ActiveModel = ranking.clone().into();
                let inserted = model.insert(self.db.as_ref()).await?;
                Ok(inserted.into())
            }
        }
    }

    async fn touch_last_crawled(
        &self,
        id: Uuid,
        at: DateTime<FixedOffset>,
    ) -> Result<(), RepositoryError> {
        let model = ranking_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: ranking_entity::ActiveModel = model.into();
        active.last_crawled_at = Set(Some(at));
        active.updated_at = Set(Utc::now().into());
        active.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn insert_snapshot(
        &self,
        snapshot: &RankingSnapshot,
        entries: &[RankingSnapshotEntry],
    ) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        let snapshot_model = ranking_snapshot::ActiveModel {
            id: Set(snapshot.id),
            ranking_id: Set(snapshot.ranking_id),
            entry_count: Set(snapshot.entry_count),
            task_id: Set(snapshot.task_id),
            captured_at: Set(snapshot.captured_at),
        };
        snapshot_model.insert(&txn).await?;

        if !entries.is_empty() {
            let entry_models: Vec<ranking_snapshot_entry::ActiveModel> = entries
                .iter()
                .map(|entry| ranking_snapshot_entry::ActiveModel {
                    id: Set(entry.id),
                    snapshot_id: Set(entry.snapshot_id),
                    position: Set(entry.position),
                    book_id: Set(entry.book_id),
                    score: Set(entry.score),
                    popularity: Set(entry.popularity),
                })
                .collect();
            ranking_snapshot_entry::Entity::insert_many(entry_models)
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    async fn latest_snapshot(
        &self,
        ranking_id: Uuid,
    ) -> Result<Option<RankingSnapshot>, RepositoryError> {
        let model = ranking_snapshot::Entity::find()
            .filter(ranking_snapshot::Column::RankingId.eq(ranking_id))
            .order_by_desc(ranking_snapshot::Column::CapturedAt)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn previous_snapshot(
        &self,
        ranking_id: Uuid,
        before: DateTime<FixedOffset>,
    ) -> Result<Option<RankingSnapshot>, RepositoryError> {
        let model = ranking_snapshot::Entity::find()
            .filter(ranking_snapshot::Column::RankingId.eq(ranking_id))
            .filter(ranking_snapshot::Column::CapturedAt.lt(before))
            .order_by_desc(ranking_snapshot::Column::CapturedAt)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn snapshots_since(
        &self,
        ranking_id: Uuid,
        since: DateTime<FixedOffset>,
    ) -> Result<Vec<RankingSnapshot>, RepositoryError> {
        let models = ranking_snapshot::Entity::find()
            .filter(ranking_snapshot::Column::RankingId.eq(ranking_id))
            .filter(ranking_snapshot::Column::CapturedAt.gte(since))
            .order_by_asc(ranking_snapshot::Column::CapturedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn snapshot_entries(
        &self,
        snapshot_id: Uuid,
    ) -> Result<Vec<RankingSnapshotEntry>, RepositoryError> {
        let models = ranking_snapshot_entry::Entity::find()
            .filter(ranking_snapshot_entry::Column::SnapshotId.eq(snapshot_id))
            .order_by_asc(ranking_snapshot_entry::Column::Position)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn book_positions_since(
        &self,
        book_id: Uuid,
        since: DateTime<FixedOffset>,
    ) -> Result<Vec<(RankingSnapshot, RankingSnapshotEntry)>, RepositoryError> {
        let rows = ranking_snapshot_entry::Entity::find()
            .filter(ranking_snapshot_entry::Column::BookId.eq(book_id))
            .find_also_related(ranking_snapshot::Entity)
            .filter(ranking_snapshot::Column::CapturedAt.gte(since))
            .order_by_asc(ranking_snapshot::Column::CapturedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(entry, snapshot)| snapshot.map(|s| (s.into(), entry.into())))
            .collect())
    }
}
