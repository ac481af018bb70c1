// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::book_repository::BookRepository;
use crate::domain::repositories::crawl_task_repository::CrawlTaskRepository;
use crate::domain::repositories::ranking_repository::RankingRepository;
use crate::domain::services::crawl_service::CrawlService;
use crate::queue::task_queue::TaskQueue;
use crate::workers::crawl_worker::CrawlWorker;
use std::sync::Arc;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 工作管理器
pub struct WorkerManager<Q, B, K, R>
where
    Q: TaskQueue + 'static,
    B: BookRepository + 'static,
    K: RankingRepository + 'static,
    R: CrawlTaskRepository + 'static,
{
    queue: Arc<Q>,
    crawl_service: Arc<CrawlService<B, K>>,
    ranking_repository: Arc<K>,
    task_repository: Arc<R>,
    handles: Vec<JoinHandle<()>>,
}

impl<Q, B, K, R> WorkerManager<Q, B, K, R>
where
    Q: TaskQueue + Send + Sync,
    B: BookRepository + Send + Sync,
    K: RankingRepository + Send + Sync,
    R: CrawlTaskRepository + Send + Sync,
{
    /// 创建新的工作管理器实例
    pub fn new(
        queue: Arc<Q>,
        crawl_service: Arc<CrawlService<B, K>>,
        ranking_repository: Arc<K>,
        task_repository: Arc<R>,
    ) -> Self {
        Self {
            queue,
            crawl_service,
            ranking_repository,
            task_repository,
            handles: Vec::new(),
        }
    }

    /// 启动工作进程
    ///
    /// 创建并启动指定数量的工作进程
    ///
    /// # 参数
    ///
    /// * `count` - 要启动的工作进程数量
    pub async fn start_workers(&mut self, count: usize) {
        for _ in 0..count {
            let worker = CrawlWorker::new(
                self.crawl_service.clone(),
                self.ranking_repository.clone(),
                self.task_repository.clone(),
            );

            let queue = self.queue.clone();
            // We spawn the worker loop on a separate task to avoid blocking the main thread
            // or the loop that spawns workers.
            let handle = tokio::spawn(async move {
                worker.run(queue).await;
            });
            self.handles.push(handle);
        }

        info!("Started {} crawl workers", count);
    }

    /// 等待关闭信号并关闭工作进程
    ///
    /// 监听关闭信号并优雅地关闭所有工作进程
    pub async fn wait_for_shutdown(&mut self) {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }

        info!("Shutting down workers...");
        for handle in &self.handles {
            handle.abort();
        }

        info!("Workers shut down successfully");
    }
}
