// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::domain::services::book_service::BookService;
use crate::domain::services::ranking_service::RankingService;
use crate::infrastructure::repositories::book_repo_impl::BookRepositoryImpl;
use crate::infrastructure::repositories::crawl_task_repo_impl::CrawlTaskRepositoryImpl;
use crate::infrastructure::repositories::ranking_repo_impl::RankingRepositoryImpl;
use crate::presentation::handlers::{
    book_handler, crawl_handler, ranking_handler, task_handler,
};
use crate::queue::task_queue::DatabaseTaskQueue;
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// 所有依赖通过Extension注入，便于测试时用内存数据库拼装
///
/// # 返回值
///
/// 返回配置好的路由
pub fn build_router(
    ranking_repo: Arc<RankingRepositoryImpl>,
    book_repo: Arc<BookRepositoryImpl>,
    task_repo: Arc<CrawlTaskRepositoryImpl>,
    queue: Arc<DatabaseTaskQueue<CrawlTaskRepositoryImpl>>,
    ranking_service: Arc<RankingService<RankingRepositoryImpl, BookRepositoryImpl>>,
    book_service: Arc<BookService<BookRepositoryImpl, RankingRepositoryImpl>>,
    settings: Arc<Settings>,
) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let api_routes = Router::new()
        .route(
            "/v1/rankings",
            get(ranking_handler::list_rankings::<RankingRepositoryImpl>),
        )
        .route(
            "/v1/rankings/{key}",
            get(ranking_handler::get_ranking::<RankingRepositoryImpl>),
        )
        .route(
            "/v1/rankings/{key}/books",
            get(ranking_handler::get_ranking_books::<RankingRepositoryImpl, BookRepositoryImpl>),
        )
        .route(
            "/v1/rankings/{key}/trend",
            get(ranking_handler::get_ranking_trend::<RankingRepositoryImpl, BookRepositoryImpl>),
        )
        .route(
            "/v1/books",
            get(book_handler::list_books::<BookRepositoryImpl>),
        )
        .route(
            "/v1/books/{id}",
            get(book_handler::get_book::<BookRepositoryImpl, RankingRepositoryImpl>),
        )
        .route(
            "/v1/books/{id}/trend",
            get(book_handler::get_book_trend::<BookRepositoryImpl, RankingRepositoryImpl>),
        )
        .route(
            "/v1/crawl",
            post(
                crawl_handler::trigger_crawl::<
                    DatabaseTaskQueue<CrawlTaskRepositoryImpl>,
                    RankingRepositoryImpl,
                >,
            ),
        )
        .route(
            "/v1/tasks",
            get(task_handler::list_tasks::<CrawlTaskRepositoryImpl, RankingRepositoryImpl>),
        )
        .route(
            "/v1/tasks/{id}",
            get(task_handler::get_task::<CrawlTaskRepositoryImpl>),
        );

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(Extension(ranking_repo))
        .layer(Extension(book_repo))
        .layer(Extension(task_repo))
        .layer(Extension(queue))
        .layer(Extension(ranking_service))
        .layer(Extension(book_service))
        .layer(Extension(settings))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
