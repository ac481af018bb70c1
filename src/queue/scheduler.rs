// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::SchedulerSettings;
use crate::config::sources::SiteSources;
use crate::domain::models::crawl_task::TaskTrigger;
use crate::domain::models::ranking::Ranking;
use crate::domain::repositories::crawl_task_repository::{CrawlTaskRepository, RepositoryError};
use crate::domain::repositories::ranking_repository::RankingRepository;
use crate::queue::task_queue::{QueueError, TaskQueue};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration as TokioDuration};
use tracing::{error, info};

/// 任务调度器
///
/// 周期性检查各榜单的更新周期，到期且没有未完成任务的榜单
/// 入队一个定时抓取任务；同一循环内执行维护工作（重置卡住的任务）。
/// 实际的任务执行由Worker通过队列主动拉取。
pub struct CrawlScheduler<Q, R, K>
where
    Q: TaskQueue + 'static,
    R: CrawlTaskRepository + 'static,
    K: RankingRepository + 'static,
{
    queue: Arc<Q>,
    task_repository: Arc<R>,
    ranking_repository: Arc<K>,
    settings: SchedulerSettings,
}

impl<Q, R, K> CrawlScheduler<Q, R, K>
where
    Q: TaskQueue + Send + Sync,
    R: CrawlTaskRepository + Send + Sync,
    K: RankingRepository + Send + Sync,
{
    /// 创建新的任务调度器实例
    ///
    /// # 参数
    ///
    /// * `queue` - 任务队列
    /// * `task_repository` - 任务仓库
    /// * `ranking_repository` - 榜单仓库
    /// * `settings` - 调度配置
    pub fn new(
        queue: Arc<Q>,
        task_repository: Arc<R>,
        ranking_repository: Arc<K>,
        settings: SchedulerSettings,
    ) -> Self {
        Self {
            queue,
            task_repository,
            ranking_repository,
            settings,
        }
    }

    /// 将urls.json中的榜单定义同步进数据库
    ///
    /// 启动时调用一次。已存在的榜单更新定义并保留抓取进度，
    /// 配置中移除的榜单不删除（历史数据仍可查询），但会被禁用。
    pub async fn sync_sources(&self, sources: &SiteSources) -> Result<(), RepositoryError> {
        for source in sources.iter() {
            let mut ranking = Ranking::new(
                source.key.clone(),
                source.name.clone(),
                source.url.clone(),
                source.interval_minutes as i32,
            );
            ranking.enabled = source.enabled;
            let synced = self.ranking_repository.upsert_definition(&ranking).await?;
            info!(key = %synced.key, enabled = synced.enabled, "ranking definition synced");
        }

        // Rankings no longer present in urls.json stop being scheduled
        for ranking in self.ranking_repository.list(true).await? {
            if sources.get(&ranking.key).is_none() {
                let mut disabled = ranking.clone();
                disabled.enabled = false;
                self.ranking_repository.upsert_definition(&disabled).await?;
                info!(key = %ranking.key, "ranking removed from sources, disabled");
            }
        }

        Ok(())
    }

    /// 启动调度器后台任务
    ///
    /// # 返回值
    ///
    /// 返回后台任务的句柄
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        let scheduler = self;

        tokio::spawn(async move {
            let mut ticker = interval(TokioDuration::from_secs(
                scheduler.settings.tick_seconds.max(1),
            ));

            loop {
                ticker.tick().await;

                if let Err(e) = scheduler.tick().await {
                    error!("Scheduler tick failed: {}", e);
                }
            }
        })
    }

    /// 执行一次调度检查
    ///
    /// 到期判断与入队分离成独立方法，便于测试
    pub async fn tick(&self) -> Result<(), RepositoryError> {
        let now = Utc::now();

        for ranking in self.ranking_repository.list(true).await? {
            if !ranking.is_due(now) {
                continue;
            }

            match self
                .queue
                .enqueue(
                    ranking.id,
                    TaskTrigger::Scheduled,
                    self.settings.task_max_retries,
                )
                .await
            {
                Ok(task) => {
                    info!(ranking = %ranking.key, task_id = %task.id, "scheduled crawl task enqueued");
                }
                Err(QueueError::Duplicate(_)) => {
                    // 上一个周期的任务还没跑完，等下一个tick
                }
                Err(QueueError::Repository(e)) => return Err(e),
            }
        }

        // 维护：重置锁过期的Active任务
        match self
            .task_repository
            .reset_stuck_tasks(Duration::minutes(self.settings.lock_timeout_minutes))
            .await
        {
            Ok(count) => {
                if count > 0 {
                    info!("Reset {} stuck tasks", count);
                }
            }
            Err(e) => {
                error!("Failed to reset stuck tasks: {}", e);
            }
        }

        Ok(())
    }
}
