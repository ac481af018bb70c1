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

use migration::{Migrator, MigratorTrait};
use rankrs::config::settings::Settings;
use rankrs::config::sources::SiteSources;
use rankrs::domain::services::book_service::BookService;
use rankrs::domain::services::crawl_service::CrawlService;
use rankrs::domain::services::ranking_service::RankingService;
use rankrs::fetch::HttpFetcher;
use rankrs::infrastructure::database::connection;
use rankrs::infrastructure::repositories::book_repo_impl::BookRepositoryImpl;
use rankrs::infrastructure::repositories::crawl_task_repo_impl::CrawlTaskRepositoryImpl;
use rankrs::infrastructure::repositories::ranking_repo_impl::RankingRepositoryImpl;
use rankrs::presentation::routes;
use rankrs::queue::scheduler::CrawlScheduler;
use rankrs::queue::task_queue::DatabaseTaskQueue;
use rankrs::utils::telemetry;
use rankrs::workers::manager::WorkerManager;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting rankrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    let sources = Arc::new(SiteSources::load(&settings.crawler.sources_path)?);
    info!("Loaded {} ranking sources", sources.len());

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize Components
    let book_repo = Arc::new(BookRepositoryImpl::new(db.clone()));
    let ranking_repo = Arc::new(RankingRepositoryImpl::new(db.clone()));
    let task_repo = Arc::new(CrawlTaskRepositoryImpl::new(db.clone()));
    let queue = Arc::new(DatabaseTaskQueue::new(task_repo.clone()));

    let fetcher = Arc::new(HttpFetcher::new(&settings.crawler)?);
    let crawl_service = Arc::new(CrawlService::new(
        fetcher,
        sources.clone(),
        book_repo.clone(),
        ranking_repo.clone(),
    ));
    let ranking_service = Arc::new(RankingService::new(ranking_repo.clone(), book_repo.clone()));
    let book_service = Arc::new(BookService::new(book_repo.clone(), ranking_repo.clone()));

    // 5. Start Scheduler
    let scheduler = Arc::new(CrawlScheduler::new(
        queue.clone(),
        task_repo.clone(),
        ranking_repo.clone(),
        settings.scheduler.clone(),
    ));
    scheduler.sync_sources(&sources).await?;
    scheduler.clone().start();
    info!("Scheduler started");

    // 6. Start Workers
    let mut worker_manager = WorkerManager::new(
        queue.clone(),
        crawl_service,
        ranking_repo.clone(),
        task_repo.clone(),
    );
    worker_manager.start_workers(settings.scheduler.workers).await;

    // 7. Start HTTP server
    let app = routes::build_router(
        ranking_repo,
        book_repo,
        task_repo,
        queue,
        ranking_service,
        book_service,
        settings.clone(),
    );

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
