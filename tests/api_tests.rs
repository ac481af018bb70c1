// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use rankrs::domain::models::book::{Book, BookSnapshot};
use rankrs::domain::models::ranking::{Ranking, RankingSnapshot, RankingSnapshotEntry};
use rankrs::domain::repositories::book_repository::BookRepository;
use rankrs::domain::repositories::ranking_repository::RankingRepository;
use rankrs::domain::services::book_service::BookService;
use rankrs::domain::services::ranking_service::RankingService;
use rankrs::infrastructure::repositories::book_repo_impl::BookRepositoryImpl;
use rankrs::infrastructure::repositories::crawl_task_repo_impl::CrawlTaskRepositoryImpl;
use rankrs::infrastructure::repositories::ranking_repo_impl::RankingRepositoryImpl;
use rankrs::presentation::routes;
use rankrs::queue::task_queue::DatabaseTaskQueue;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

struct Api {
    server: TestServer,
    ranking_repo: Arc<RankingRepositoryImpl>,
    book_repo: Arc<BookRepositoryImpl>,
}

fn at(minutes_ago: i64) -> DateTime<FixedOffset> {
    (Utc::now() - Duration::minutes(minutes_ago)).into()
}

async fn setup() -> Api {
    let db = Arc::new(common::setup_db().await);
    let ranking_repo = Arc::new(RankingRepositoryImpl::new(db.clone()));
    let book_repo = Arc::new(BookRepositoryImpl::new(db.clone()));
    let task_repo = Arc::new(CrawlTaskRepositoryImpl::new(db));
    let queue = Arc::new(DatabaseTaskQueue::new(task_repo.clone()));
    let ranking_service = Arc::new(RankingService::new(ranking_repo.clone(), book_repo.clone()));
    let book_service = Arc::new(BookService::new(book_repo.clone(), ranking_repo.clone()));

    let app = routes::build_router(
        ranking_repo.clone(),
        book_repo.clone(),
        task_repo,
        queue,
        ranking_service,
        book_service,
        Arc::new(common::test_settings()),
    );

    Api {
        server: TestServer::new(app).expect("test server"),
        ranking_repo,
        book_repo,
    }
}

/// 造一个榜单、两本书和两期快照（名次互换）
async fn seed_board(api: &Api) -> (Ranking, Book, Book) {
    let ranking = api
        .ranking_repo
        .upsert_definition(&Ranking::new(
            "hot".to_string(),
            "热销榜".to_string(),
            "https://example.com/rank/hot".to_string(),
            60,
        ))
        .await
        .unwrap();

    let mut book_a = Book::new("1".to_string(), "斗破星河".to_string(), "青山".to_string());
    book_a.category = Some("玄幻".to_string());
    let (book_a, _) = api.book_repo.upsert(&book_a).await.unwrap();

    let book_b = Book::new("2".to_string(), "长安夜行录".to_string(), "沈舟".to_string());
    let (book_b, _) = api.book_repo.upsert(&book_b).await.unwrap();

    for (minutes_ago, order) in [(120i64, [book_a.id, book_b.id]), (5, [book_b.id, book_a.id])] {
        let snapshot = RankingSnapshot {
            id: Uuid::new_v4(),
            ranking_id: ranking.id,
            entry_count: 2,
            task_id: None,
            captured_at: at(minutes_ago),
        };
        let entries: Vec<RankingSnapshotEntry> = order
            .iter()
            .enumerate()
            .map(|(i, book_id)| RankingSnapshotEntry {
                id: Uuid::new_v4(),
                snapshot_id: snapshot.id,
                position: i as i32 + 1,
                book_id: *book_id,
                score: Some(9.0),
                popularity: Some(1000),
            })
            .collect();
        api.ranking_repo
            .insert_snapshot(&snapshot, &entries)
            .await
            .unwrap();
    }

    let mut snapshot = BookSnapshot::new(book_a.id, at(5));
    snapshot.score = Some(9.2);
    api.book_repo.insert_snapshot(&snapshot).await.unwrap();

    (ranking, book_a, book_b)
}

#[tokio::test]
async fn test_health_and_version() {
    let api = setup().await;

    let response = api.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "OK");

    let response = api.server.get("/v1/version").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_rankings_envelope() {
    let api = setup().await;
    seed_board(&api).await;

    let response = api.server.get("/v1/rankings").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["code"], 0);
    assert_eq!(body["msg"], "ok");
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["key"], "hot");
}

#[tokio::test]
async fn test_get_ranking_not_found() {
    let api = setup().await;

    let response = api.server.get("/v1/rankings/nope").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn test_board_with_deltas() {
    let api = setup().await;
    seed_board(&api).await;

    let response = api.server.get("/v1/rankings/hot/books").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    let data = &body["data"];
    assert_eq!(data["total"], 2);
    assert_eq!(data["page"], 1);

    let entries = data["entries"].as_array().unwrap();
    assert_eq!(entries[0]["position"], 1);
    assert_eq!(entries[0]["title"], "长安夜行录");
    assert_eq!(entries[0]["delta"], 1);
    assert_eq!(entries[0]["is_new"], false);
    assert_eq!(entries[1]["delta"], -1);
}

#[tokio::test]
async fn test_board_page_size_validation() {
    let api = setup().await;
    seed_board(&api).await;

    let response = api
        .server
        .get("/v1/rankings/hot/books")
        .add_query_param("page_size", "500")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ranking_trend() {
    let api = setup().await;
    seed_board(&api).await;

    let response = api
        .server
        .get("/v1/rankings/hot/trend")
        .add_query_param("days", "7")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // 窗口上限90天
    let response = api
        .server
        .get("/v1/rankings/hot/trend")
        .add_query_param("days", "120")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_books_with_filters() {
    let api = setup().await;
    seed_board(&api).await;

    let response = api.server.get("/v1/books").await;
    let body: Value = response.json();
    assert_eq!(body["data"]["total"], 2);

    let response = api
        .server
        .get("/v1/books")
        .add_query_param("keyword", "星河")
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["title"], "斗破星河");

    let response = api
        .server
        .get("/v1/books")
        .add_query_param("category", "玄幻")
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"]["total"], 1);
}

#[tokio::test]
async fn test_book_detail_and_trend() {
    let api = setup().await;
    let (_, book_a, _) = seed_board(&api).await;

    let response = api.server.get(&format!("/v1/books/{}", book_a.id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["data"]["title"], "斗破星河");
    assert_eq!(body["data"]["latest_snapshot"]["score"], 9.2);

    let response = api
        .server
        .get(&format!("/v1/books/{}/trend", book_a.id))
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"]["snapshots"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["positions"].as_array().unwrap().len(), 2);

    let response = api
        .server
        .get(&format!("/v1/books/{}", Uuid::new_v4()))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_trigger_crawl_lifecycle() {
    let api = setup().await;
    seed_board(&api).await;

    // 未知榜单
    let response = api
        .server
        .post("/v1/crawl")
        .json(&json!({ "ranking": "nope" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    // 参数缺失
    let response = api.server.post("/v1/crawl").json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // 正常触发
    let response = api
        .server
        .post("/v1/crawl")
        .json(&json!({ "ranking": "hot" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);

    let body: Value = response.json();
    assert_eq!(body["data"]["task_ids"].as_array().unwrap().len(), 1);
    let task_id = body["data"]["task_ids"][0].as_str().unwrap().to_string();

    // 重复触发
    let response = api
        .server
        .post("/v1/crawl")
        .json(&json!({ "ranking": "hot" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    // 任务可查询
    let response = api.server.get(&format!("/v1/tasks/{}", task_id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["data"]["status"], "queued");
    assert_eq!(body["data"]["trigger"], "manual");

    let response = api
        .server
        .get("/v1/tasks")
        .add_query_param("status", "queued")
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"]["total"], 1);

    // 非法状态过滤
    let response = api
        .server
        .get("/v1/tasks")
        .add_query_param("status", "whatever")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_trigger_crawl_all_skips_pending() {
    let api = setup().await;
    seed_board(&api).await;

    let response = api
        .server
        .post("/v1/crawl")
        .json(&json!({ "ranking": "hot" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);

    let response = api.server.post("/v1/crawl").json(&json!({ "all": true })).await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);

    let body: Value = response.json();
    assert_eq!(body["data"]["task_ids"].as_array().unwrap().len(), 0);
    assert_eq!(body["data"]["skipped"][0], "hot");
}
