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

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::models::crawl_task::{CrawlTask, TaskStatus};
use crate::domain::repositories::book_repository::BookRepository;
use crate::domain::repositories::crawl_task_repository::CrawlTaskRepository;
use crate::domain::repositories::ranking_repository::RankingRepository;
use crate::domain::services::crawl_service::CrawlService;
use crate::queue::task_queue::TaskQueue;

/// 抓取工作者
///
/// 从队列拉取到期任务，执行抓取流水线并回写任务状态
pub struct CrawlWorker<B, K, R>
where
    B: BookRepository + Send + Sync,
    K: RankingRepository + Send + Sync,
    R: CrawlTaskRepository + Send + Sync,
{
    crawl_service: Arc<CrawlService<B, K>>,
    ranking_repository: Arc<K>,
    task_repository: Arc<R>,
    worker_id: Uuid,
}

impl<B, K, R> CrawlWorker<B, K, R>
where
    B: BookRepository + Send + Sync,
    K: RankingRepository + Send + Sync,
    R: CrawlTaskRepository + Send + Sync,
{
    /// 创建新的抓取工作器实例
    pub fn new(
        crawl_service: Arc<CrawlService<B, K>>,
        ranking_repository: Arc<K>,
        task_repository: Arc<R>,
    ) -> Self {
        Self {
            crawl_service,
            ranking_repository,
            task_repository,
            worker_id: Uuid::new_v4(),
        }
    }

    /// 运行抓取工作器
    pub async fn run<Q>(&self, queue: Arc<Q>)
    where
        Q: TaskQueue + Send + Sync,
    {
        info!("Crawl worker {} started", self.worker_id);

        loop {
            match self.process_next_task(queue.as_ref()).await {
                Ok(processed) => {
                    if !processed {
                        sleep(Duration::from_secs(1)).await;
                    }
                }
                Err(e) => {
                    error!("Error processing task: {}", e);
                    sleep(Duration::from_secs(1)).await;
                }
            }
        }
    }

    async fn process_next_task<Q>(&self, queue: &Q) -> Result<bool>
    where
        Q: TaskQueue,
    {
        let task_opt = queue.dequeue(self.worker_id).await?;

        if let Some(task) = task_opt {
            self.process_task(queue, task).await?;
            return Ok(true);
        }

        Ok(false)
    }

    #[instrument(skip(self, queue, task), fields(task_id = %task.id, ranking_id = %task.ranking_id))]
    async fn process_task<Q>(&self, queue: &Q, task: CrawlTask) -> Result<()>
    where
        Q: TaskQueue,
    {
        info!("Processing crawl task");

        let Some(ranking) = self.ranking_repository.find_by_id(task.ranking_id).await? else {
            queue.fail(task.id, "ranking no longer exists").await?;
            return Ok(());
        };

        match self.crawl_service.crawl_ranking(&ranking, task.id).await {
            Ok(outcome) => {
                queue
                    .complete(task.id, outcome.books_seen, outcome.books_new)
                    .await?;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "crawl attempt failed");
                self.handle_failure(queue, task, &e.to_string()).await
            }
        }
    }

    /// 处理任务失败：可重试时按指数退避重新入队，否则标记失败
    async fn handle_failure<Q>(&self, queue: &Q, mut task: CrawlTask, error: &str) -> Result<()>
    where
        Q: TaskQueue,
    {
        // attempt_count已在acquire时递增
        if !task.can_retry() {
            warn!("Task failed after {} attempts", task.attempt_count);
            queue.fail(task.id, error).await?;
            return Ok(());
        }

        let delay_secs = 2u64.pow(task.attempt_count.max(0) as u32);
        let next_retry = Utc::now() + chrono::Duration::seconds(delay_secs as i64);

        task.status = TaskStatus::Queued;
        task.scheduled_at = Some(next_retry.into());
        task.started_at = None;
        task.error = Some(error.to_string());
        task.lock_token = None;
        task.lock_expires_at = None;

        self.task_repository.update(&task).await?;
        info!(
            "Scheduled retry {}/{} for task {} in {}s",
            task.attempt_count, task.max_retries, task.id, delay_secs
        );

        Ok(())
    }
}
