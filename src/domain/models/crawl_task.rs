// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 抓取任务实体
///
/// 一次定时或手动触发的榜单抓取执行实例。任务具有状态、
/// 重试机制和锁定机制等属性，执行状态持久化在数据库中。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlTask {
    /// 任务唯一标识符
    pub id: Uuid,
    /// 目标榜单ID
    pub ranking_id: Uuid,
    /// 触发方式
    pub trigger: TaskTrigger,
    /// 任务状态，跟踪任务在其生命周期中的当前阶段
    pub status: TaskStatus,
    /// 已尝试次数
    pub attempt_count: i32,
    /// 最大重试次数
    pub max_retries: i32,
    /// 计划执行时间，可选的延迟执行时间
    pub scheduled_at: Option<DateTime<FixedOffset>>,
    /// 开始执行时间
    pub started_at: Option<DateTime<FixedOffset>>,
    /// 完成时间
    pub completed_at: Option<DateTime<FixedOffset>>,
    /// 失败原因
    pub error: Option<String>,
    /// 本次抓取到的书籍总数
    pub books_seen: i32,
    /// 本次新收录的书籍数
    pub books_new: i32,
    /// 锁定令牌，用于多worker下的任务锁定
    pub lock_token: Option<Uuid>,
    /// 锁定过期时间，锁定自动释放的时间点
    pub lock_expires_at: Option<DateTime<FixedOffset>>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

impl CrawlTask {
    /// 创建新的抓取任务
    ///
    /// # 参数
    ///
    /// * `ranking_id` - 目标榜单ID
    /// * `trigger` - 触发方式
    /// * `max_retries` - 最大重试次数
    pub fn new(ranking_id: Uuid, trigger: TaskTrigger, max_retries: i32) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            ranking_id,
            trigger,
            status: TaskStatus::Queued,
            attempt_count: 0,
            max_retries,
            scheduled_at: Some(now),
            started_at: None,
            completed_at: None,
            error: None,
            books_seen: 0,
            books_new: 0,
            lock_token: None,
            lock_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 判断任务是否还可以重试
    pub fn can_retry(&self) -> bool {
        self.attempt_count < self.max_retries
    }

    /// 判断任务是否处于终态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }
}

/// 任务触发方式枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskTrigger {
    /// 调度器按榜单周期触发
    #[default]
    Scheduled,
    /// API手动触发
    Manual,
}

impl fmt::Display for TaskTrigger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskTrigger::Scheduled => write!(f, "scheduled"),
            TaskTrigger::Manual => write!(f, "manual"),
        }
    }
}

impl FromStr for TaskTrigger {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(TaskTrigger::Scheduled),
            "manual" => Ok(TaskTrigger::Manual),
            _ => Err(()),
        }
    }
}

/// 任务状态枚举
///
/// 表示任务在其生命周期中的不同状态。状态转换遵循以下流程：
/// Queued → Active → Completed/Failed/Cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// 已入队，任务已创建但尚未开始执行
    #[default]
    Queued,
    /// 活跃中，任务正在被执行
    Active,
    /// 已完成，任务成功执行完成
    Completed,
    /// 已失败，任务执行失败且已达到最大重试次数
    Failed,
    /// 已取消，任务被取消执行
    Cancelled,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskStatus::Queued => write!(f, "queued"),
            TaskStatus::Active => write!(f, "active"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
            TaskStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(TaskStatus::Queued),
            "active" => Ok(TaskStatus::Active),
            "completed" => Ok(TaskStatus::Completed),
            "failed" => Ok(TaskStatus::Failed),
            "cancelled" => Ok(TaskStatus::Cancelled),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_is_queued() {
        let task = CrawlTask::new(Uuid::new_v4(), TaskTrigger::Manual, 3);
        assert_eq!(task.status, TaskStatus::Queued);
        assert_eq!(task.attempt_count, 0);
        assert!(task.can_retry());
        assert!(!task.is_terminal());
    }

    #[test]
    fn test_can_retry_exhausted() {
        let mut task = CrawlTask::new(Uuid::new_v4(), TaskTrigger::Scheduled, 3);
        task.attempt_count = 3;
        assert!(!task.can_retry());
    }
}
