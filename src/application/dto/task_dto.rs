// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_task::CrawlTask;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 任务列表查询参数
#[derive(Debug, Deserialize, Validate)]
pub struct TaskListQuery {
    /// 任务状态过滤 (queued/active/completed/failed/cancelled)
    pub status: Option<String>,
    /// 榜单key过滤
    pub ranking: Option<String>,
    #[validate(range(min = 1))]
    pub page: Option<u64>,
    #[validate(range(min = 1, max = 100))]
    pub page_size: Option<u64>,
}

/// 抓取任务DTO
#[derive(Debug, Serialize)]
pub struct TaskDto {
    pub id: Uuid,
    pub ranking_id: Uuid,
    pub trigger: String,
    pub status: String,
    pub attempt_count: i32,
    pub max_retries: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub books_seen: i32,
    pub books_new: i32,
    pub created_at: DateTime<FixedOffset>,
}

impl From<CrawlTask> for TaskDto {
    fn from(task: CrawlTask) -> Self {
        Self {
            id: task.id,
            ranking_id: task.ranking_id,
            trigger: task.trigger.to_string(),
            status: task.status.to_string(),
            attempt_count: task.attempt_count,
            max_retries: task.max_retries,
            scheduled_at: task.scheduled_at,
            started_at: task.started_at,
            completed_at: task.completed_at,
            error: task.error,
            books_seen: task.books_seen,
            books_new: task.books_new,
            created_at: task.created_at,
        }
    }
}
