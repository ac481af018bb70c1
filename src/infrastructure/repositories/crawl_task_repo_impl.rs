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

use crate::domain::models::crawl_task::{CrawlTask, TaskStatus};
use crate::domain::repositories::crawl_task_repository::{
    CrawlTaskRepository, RepositoryError, TaskQueryParams,
};
use crate::infrastructure::database::entities::crawl_task as task_entity;
use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use sea_orm::{
    sea_query::{Expr, LockBehavior, LockType},
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

/// 抓取任务仓库实现
///
/// 基于SeaORM实现的任务状态存储
#[derive(Clone)]
pub struct CrawlTaskRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl CrawlTaskRepositoryImpl {
    /// 创建新的任务仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<task_entity::Model> for CrawlTask {
    fn from(model: task_entity::Model) -> Self {
        Self {
            id: model.id,
            ranking_id: model.ranking_id,
            trigger: model.trigger.parse().unwrap_or_default(),
            status: model.status.parse().unwrap_or_default(),
            attempt_count: model.attempt_count,
            max_retries: model.max_retries,
            scheduled_at: model.scheduled_at,
            started_at: model.started_at,
            completed_at: model.completed_at,
            error: model.error,
            books_seen: model.books_seen,
            books_new: model.books_new,
            lock_token: model.lock_token,
            lock_expires_at: model.lock_expires_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<CrawlTask> for task_entity::ActiveModel {
    fn from(task: CrawlTask) -> Self {
        Self {
            id: Set(task.id),
            ranking_id: Set(task.ranking_id),
            trigger: Set(task.trigger.to_string()),
            status: Set(task.status.to_string()),
            attempt_count: Set(task.attempt_count),
            max_retries: Set(task.max_retries),
            scheduled_at: Set(task.scheduled_at),
            started_at: Set(task.started_at),
            completed_at: Set(task.completed_at),
            error: Set(task.error.clone()),
            books_seen: Set(task.books_seen),
            books_new: Set(task.books_new),
            lock_token: Set(task.lock_token),
            lock_expires_at: Set(task.lock_expires_at),
            created_at: Set(task.created_at),
            updated_at: Set(task.updated_at),
        }
    }
}

#[async_trait]
impl CrawlTaskRepository for CrawlTaskRepositoryImpl {
    async fn create(&self, task: &CrawlTask) -> Result<CrawlTask, RepositoryError> {
        let model: task_entity::ActiveModel = task.clone().into();

        model.insert(self.db.as_ref()).await?;
        Ok(task.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CrawlTask>, RepositoryError> {
        let model = task_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn update(&self, task: &CrawlTask) -> Result<CrawlTask, RepositoryError> {
        let mut model: task_entity::ActiveModel = task.clone().into();
        model.updated_at = Set(Utc::now().into());

        let updated_model = model.update(self.db.as_ref()).await?;
        Ok(updated_model.into())
    }

    async fn acquire_next(&self, worker_id: Uuid) -> Result<Option<CrawlTask>, RepositoryError> {
        let txn = self.db.begin().await?;

        let task = task_entity::Entity::find()
            .filter(task_entity::Column::Status.eq(TaskStatus::Queued.to_string()))
            .filter(
                Condition::any()
                    .add(task_entity::Column::ScheduledAt.is_null())
                    .add(task_entity::Column::ScheduledAt.lte(Utc::now())),
            )
            .order_by_asc(task_entity::Column::CreatedAt)
            .lock_with_behavior(LockType::Update, LockBehavior::SkipLocked)
            .one(&txn)
            .await?;

        if let Some(task) = task {
            let mut active: task_entity::ActiveModel = task.into();
            active.lock_token = Set(Some(worker_id));
            active.lock_expires_at = Set(Some((Utc::now() + Duration::minutes(5)).into()));
            active.status = Set(TaskStatus::Active.to_string());
            active.started_at = Set(Some(Utc::now().into()));
            let current_attempt = *active.attempt_count.as_ref();
            active.attempt_count = Set(current_attempt + 1);
            active.updated_at = Set(Utc::now().into());

            let updated = active.update(&txn).await?;

            txn.commit().await?;

            return Ok(Some(updated.into()));
        }

        txn.commit().await?;
        Ok(None)
    }

    async fn mark_completed(
        &self,
        id: Uuid,
        books_seen: i32,
        books_new: i32,
    ) -> Result<(), RepositoryError> {
        let task = self
            .find_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        let mut updated_task = task.clone();
        updated_task.status = TaskStatus::Completed;
        updated_task.completed_at = Some(Utc::now().into());
        updated_task.books_seen = books_seen;
        updated_task.books_new = books_new;
        updated_task.error = None;
        updated_task.lock_token = None;
        updated_task.lock_expires_at = None;
        self.update(&updated_task).await?;
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), RepositoryError> {
        let task = self
            .find_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        let mut updated_task = task.clone();
        updated_task.status = TaskStatus::Failed;
        updated_task.completed_at = Some(Utc::now().into());
        updated_task.error = Some(error.to_string());
        updated_task.lock_token = None;
        updated_task.lock_expires_at = None;
        self.update(&updated_task).await?;
        Ok(())
    }

    async fn has_pending_for_ranking(&self, ranking_id: Uuid) -> Result<bool, RepositoryError> {
        let count = task_entity::Entity::find()
            .filter(task_entity::Column::RankingId.eq(ranking_id))
            .filter(task_entity::Column::Status.is_in(vec![
                TaskStatus::Queued.to_string(),
                TaskStatus::Active.to_string(),
            ]))
            .count(self.db.as_ref())
            .await?;
        Ok(count > 0)
    }

    async fn reset_stuck_tasks(&self, timeout: chrono::Duration) -> Result<u64, RepositoryError> {
        let threshold = Utc::now() - timeout;

        // Active tasks whose lock expired, or which never got a lock and
        // started too long ago, go back to the queue
        let result = task_entity::Entity::update_many()
            .col_expr(
                task_entity::Column::Status,
                Expr::value(TaskStatus::Queued.to_string()),
            )
            .col_expr(
                task_entity::Column::LockToken,
                Expr::value(Option::<Uuid>::None),
            )
            .col_expr(
                task_entity::Column::LockExpiresAt,
                Expr::value(Option::<DateTime<FixedOffset>>::None),
            )
            .filter(task_entity::Column::Status.eq(TaskStatus::Active.to_string()))
            .filter(
                Condition::any()
                    .add(task_entity::Column::LockExpiresAt.lte(Utc::now()))
                    .add(
                        Condition::all()
                            .add(task_entity::Column::LockExpiresAt.is_null())
                            .add(task_entity::Column::StartedAt.lte(threshold)),
                    ),
            )
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected)
    }

    async fn query_tasks(
        &self,
        params: TaskQueryParams,
    ) -> Result<(Vec<CrawlTask>, u64), RepositoryError> {
        let mut query = task_entity::Entity::find();

        if let Some(ranking_id) = params.ranking_id {
            query = query.filter(task_entity::Column::RankingId.eq(ranking_id));
        }
        if let Some(statuses) = &params.statuses {
            let statuses: Vec<String> = statuses.iter().map(|s| s.to_string()).collect();
            query = query.filter(task_entity::Column::Status.is_in(statuses));
        }
        if let Some(triggers) = &params.triggers {
            let triggers: Vec<String> = triggers.iter().map(|t| t.to_string()).collect();
            query = query.filter(task_entity::Column::Trigger.is_in(triggers));
        }
        if let Some(after) = params.created_after {
            query = query.filter(task_entity::Column::CreatedAt.gte(after));
        }
        if let Some(before) = params.created_before {
            query = query.filter(task_entity::Column::CreatedAt.lte(before));
        }

        let total = query.clone().count(self.db.as_ref()).await?;

        let models = query
            .order_by_desc(task_entity::Column::CreatedAt)
            .offset(params.offset)
            .limit(params.limit)
            .all(self.db.as_ref())
            .await?;

        Ok((models.into_iter().map(CrawlTask::from).collect(), total))
    }
}
