// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_task::{CrawlTask, TaskStatus, TaskTrigger};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
}

/// 任务查询参数
#[derive(Debug, Default, Clone)]
pub struct TaskQueryParams {
    pub ranking_id: Option<Uuid>,
    pub statuses: Option<Vec<TaskStatus>>,
    pub triggers: Option<Vec<TaskTrigger>>,
    pub created_after: Option<DateTime<FixedOffset>>,
    pub created_before: Option<DateTime<FixedOffset>>,
    pub limit: u64,
    pub offset: u64,
}

/// 抓取任务仓库特质
///
/// 定义抓取任务数据访问接口。任务状态的持久化即任务状态存储，
/// 调度器与worker都通过该接口读写任务。
#[async_trait]
pub trait CrawlTaskRepository: Send + Sync {
    /// 创建新任务
    async fn create(&self, task: &CrawlTask) -> Result<CrawlTask, RepositoryError>;
    /// 根据ID查找任务
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CrawlTask>, RepositoryError>;
    /// 更新任务
    async fn update(&self, task: &CrawlTask) -> Result<CrawlTask, RepositoryError>;
    /// 获取下一个到期的待处理任务并锁定
    async fn acquire_next(&self, worker_id: Uuid) -> Result<Option<CrawlTask>, RepositoryError>;
    /// 标记任务已完成并记录计数
    async fn mark_completed(
        &self,
        id: Uuid,
        books_seen: i32,
        books_new: i32,
    ) -> Result<(), RepositoryError>;
    /// 标记任务已失败并记录原因
    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), RepositoryError>;
    /// 判断榜单是否已有排队或执行中的任务
    async fn has_pending_for_ranking(&self, ranking_id: Uuid) -> Result<bool, RepositoryError>;
    /// 重置卡住的任务（锁已过期但仍处于Active状态）
    async fn reset_stuck_tasks(&self, timeout: chrono::Duration) -> Result<u64, RepositoryError>;
    /// 任务查询
    async fn query_tasks(
        &self,
        params: TaskQueryParams,
    ) -> Result<(Vec<CrawlTask>, u64), RepositoryError>;
}
