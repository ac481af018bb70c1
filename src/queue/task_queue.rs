// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_task::{CrawlTask, TaskTrigger};
use crate::domain::repositories::crawl_task_repository::CrawlTaskRepository;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// 队列错误类型
#[derive(Error, Debug)]
pub enum QueueError {
    /// 仓库错误
    #[error("Repository error: {0}")]
    Repository(#[from] crate::domain::repositories::crawl_task_repository::RepositoryError),

    /// 榜单已有排队或执行中的任务
    #[error("Ranking {0} already has a pending task")]
    Duplicate(Uuid),
}

/// 任务队列特质
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// 为榜单入队一个抓取任务，同一榜单同时只允许一个未完成任务
    async fn enqueue(
        &self,
        ranking_id: Uuid,
        trigger: TaskTrigger,
        max_retries: i32,
    ) -> Result<CrawlTask, QueueError>;

    /// 出队任务
    async fn dequeue(&self, worker_id: Uuid) -> Result<Option<CrawlTask>, QueueError>;

    /// 完成任务
    async fn complete(
        &self,
        task_id: Uuid,
        books_seen: i32,
        books_new: i32,
    ) -> Result<(), QueueError>;

    /// 失败任务
    async fn fail(&self, task_id: Uuid, error: &str) -> Result<(), QueueError>;
}

/// 数据库任务队列
///
/// 队列状态即crawl_tasks表，实际出队由worker通过acquire_next
/// 主动拉取（SELECT ... FOR UPDATE SKIP LOCKED）
pub struct DatabaseTaskQueue<R: CrawlTaskRepository> {
    /// 任务仓库
    repository: Arc<R>,
}

impl<R: CrawlTaskRepository> DatabaseTaskQueue<R> {
    /// 创建新的任务队列实例
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: CrawlTaskRepository> TaskQueue for DatabaseTaskQueue<R> {
    async fn enqueue(
        &self,
        ranking_id: Uuid,
        trigger: TaskTrigger,
        max_retries: i32,
    ) -> Result<CrawlTask, QueueError> {
        if self.repository.has_pending_for_ranking(ranking_id).await? {
            return Err(QueueError::Duplicate(ranking_id));
        }

        let task = CrawlTask::new(ranking_id, trigger, max_retries);
        let created = self.repository.create(&task).await?;
        Ok(created)
    }

    async fn dequeue(&self, worker_id: Uuid) -> Result<Option<CrawlTask>, QueueError> {
        Ok(self.repository.acquire_next(worker_id).await?)
    }

    async fn complete(
        &self,
        task_id: Uuid,
        books_seen: i32,
        books_new: i32,
    ) -> Result<(), QueueError> {
        self.repository
            .mark_completed(task_id, books_seen, books_new)
            .await?;
        Ok(())
    }

    async fn fail(&self, task_id: Uuid, error: &str) -> Result<(), QueueError> {
        self.repository.mark_failed(task_id, error).await?;
        Ok(())
    }
}
