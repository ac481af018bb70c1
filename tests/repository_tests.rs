// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

mod common;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use rankrs::domain::models::book::{Book, BookSnapshot};
use rankrs::domain::models::crawl_task::{CrawlTask, TaskStatus, TaskTrigger};
use rankrs::domain::models::ranking::{Ranking, RankingSnapshot, RankingSnapshotEntry};
use rankrs::domain::repositories::book_repository::{BookQueryParams, BookRepository};
use rankrs::domain::repositories::crawl_task_repository::{
    CrawlTaskRepository, TaskQueryParams,
};
use rankrs::domain::repositories::ranking_repository::RankingRepository;
use rankrs::infrastructure::repositories::book_repo_impl::BookRepositoryImpl;
use rankrs::infrastructure::repositories::crawl_task_repo_impl::CrawlTaskRepositoryImpl;
use rankrs::infrastructure::repositories::ranking_repo_impl::RankingRepositoryImpl;
use std::sync::Arc;
use uuid::Uuid;

fn sample_book(source_id: &str, title: &str) -> Book {
    Book::new(
        source_id.to_string(),
        title.to_string(),
        "作者甲".to_string(),
    )
}

fn at(minutes_ago: i64) -> DateTime<FixedOffset> {
    (Utc::now() - Duration::minutes(minutes_ago)).into()
}

#[tokio::test]
async fn test_book_upsert_dedupes_by_source_id() {
    let db = Arc::new(common::setup_db().await);
    let repo = BookRepositoryImpl::new(db);

    let (first, was_new) = repo.upsert(&sample_book("10086", "旧书名")).await.unwrap();
    assert!(was_new);

    let mut updated = sample_book("10086", "新书名");
    updated.category = Some("仙侠".to_string());
    let (second, was_new) = repo.upsert(&updated).await.unwrap();

    assert!(!was_new);
    assert_eq!(second.id, first.id);
    assert_eq!(second.title, "新书名");
    assert_eq!(second.first_seen_at, first.first_seen_at);

    let (books, total) = repo
        .query_books(BookQueryParams {
            limit: 10,
            offset: 0,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(books.len(), 1);
}

#[tokio::test]
async fn test_book_query_filters() {
    let db = Arc::new(common::setup_db().await);
    let repo = BookRepositoryImpl::new(db);

    let mut a = sample_book("1", "斗破星河");
    a.category = Some("玄幻".to_string());
    let mut b = sample_book("2", "长安夜行录");
    b.author = "沈舟".to_string();
    b.category = Some("历史".to_string());
    repo.upsert(&a).await.unwrap();
    repo.upsert(&b).await.unwrap();

    let (books, total) = repo
        .query_books(BookQueryParams {
            keyword: Some("星河".to_string()),
            limit: 10,
            offset: 0,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(books[0].title, "斗破星河");

    // keyword also matches author
    let (books, _) = repo
        .query_books(BookQueryParams {
            keyword: Some("沈舟".to_string()),
            limit: 10,
            offset: 0,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "长安夜行录");

    let (books, _) = repo
        .query_books(BookQueryParams {
            category: Some("历史".to_string()),
            limit: 10,
            offset: 0,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(books.len(), 1);
}

#[tokio::test]
async fn test_book_snapshot_window() {
    let db = Arc::new(common::setup_db().await);
    let repo = BookRepositoryImpl::new(db);

    let (book, _) = repo.upsert(&sample_book("10086", "斗破星河")).await.unwrap();

    for (minutes_ago, score) in [(60 * 24 * 10, 8.0), (60, 8.5), (5, 9.0)] {
        let mut snapshot = BookSnapshot::new(book.id, at(minutes_ago));
        snapshot.score = Some(score);
        repo.insert_snapshot(&snapshot).await.unwrap();
    }

    let latest = repo.latest_snapshot(book.id).await.unwrap().unwrap();
    assert_eq!(latest.score, Some(9.0));

    // 10天前的快照不在7天窗口内
    let since = at(60 * 24 * 7);
    let window = repo.snapshots_since(book.id, since).await.unwrap();
    assert_eq!(window.len(), 2);
    assert!(window[0].captured_at <= window[1].captured_at);
}

#[tokio::test]
async fn test_ranking_definition_sync_preserves_progress() {
    let db = Arc::new(common::setup_db().await);
    let repo = RankingRepositoryImpl::new(db);

    let ranking = Ranking::new(
        "hot".to_string(),
        "热销榜".to_string(),
        "https://example.com/rank/hot".to_string(),
        60,
    );
    let created = repo.upsert_definition(&ranking).await.unwrap();

    let crawled_at = at(10);
    repo.touch_last_crawled(created.id, crawled_at).await.unwrap();

    // 重新同步定义（改名），抓取进度保留
    let mut renamed = ranking.clone();
    renamed.name = "周热销榜".to_string();
    let synced = repo.upsert_definition(&renamed).await.unwrap();

    assert_eq!(synced.id, created.id);
    assert_eq!(synced.name, "周热销榜");
    assert!(synced.last_crawled_at.is_some());
}

#[tokio::test]
async fn test_ranking_snapshot_queries() {
    let db = Arc::new(common::setup_db().await);
    let ranking_repo = RankingRepositoryImpl::new(db.clone());
    let book_repo = BookRepositoryImpl::new(db);

    let ranking = ranking_repo
        .upsert_definition(&Ranking::new(
            "hot".to_string(),
            "热销榜".to_string(),
            "https://example.com/rank/hot".to_string(),
            60,
        ))
        .await
        .unwrap();

    let (book_a, _) = book_repo.upsert(&sample_book("1", "甲")).await.unwrap();
    let (book_b, _) = book_repo.upsert(&sample_book("2", "乙")).await.unwrap();

    let mut snapshot_ids = Vec::new();
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
        ranking_repo.insert_snapshot(&snapshot, &entries).await.unwrap();
        snapshot_ids.push(snapshot.id);
    }

    let latest = ranking_repo.latest_snapshot(ranking.id).await.unwrap().unwrap();
    assert_eq!(latest.id, snapshot_ids[1]);

    let previous = ranking_repo
        .previous_snapshot(ranking.id, latest.captured_at)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(previous.id, snapshot_ids[0]);

    let entries = ranking_repo.snapshot_entries(latest.id).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].position, 1);
    assert_eq!(entries[0].book_id, book_b.id);

    // 书籍名次序列覆盖两个快照
    let positions = ranking_repo
        .book_positions_since(book_a.id, at(60 * 24))
        .await
        .unwrap();
    assert_eq!(positions.len(), 2);
    assert_eq!(positions[0].1.position, 1);
    assert_eq!(positions[1].1.position, 2);
}

#[tokio::test]
async fn test_task_lifecycle_and_queries() {
    let db = Arc::new(common::setup_db().await);
    let repo = CrawlTaskRepositoryImpl::new(db);

    let ranking_id = Uuid::new_v4();
    let task = repo
        .create(&CrawlTask::new(ranking_id, TaskTrigger::Manual, 3))
        .await
        .unwrap();

    assert!(repo.has_pending_for_ranking(ranking_id).await.unwrap());

    repo.mark_completed(task.id, 50, 3).await.unwrap();
    assert!(!repo.has_pending_for_ranking(ranking_id).await.unwrap());

    let reloaded = repo.find_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(reloaded.status, TaskStatus::Completed);
    assert_eq!(reloaded.books_seen, 50);
    assert_eq!(reloaded.books_new, 3);
    assert!(reloaded.completed_at.is_some());

    let failed = repo
        .create(&CrawlTask::new(ranking_id, TaskTrigger::Scheduled, 3))
        .await
        .unwrap();
    repo.mark_failed(failed.id, "status 500").await.unwrap();

    let (tasks, total) = repo
        .query_tasks(TaskQueryParams {
            ranking_id: Some(ranking_id),
            statuses: Some(vec![TaskStatus::Failed]),
            limit: 10,
            offset: 0,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(tasks[0].error.as_deref(), Some("status 500"));
}

#[tokio::test]
async fn test_reset_stuck_tasks() {
    let db = Arc::new(common::setup_db().await);
    let repo = CrawlTaskRepositoryImpl::new(db);

    let mut task = CrawlTask::new(Uuid::new_v4(), TaskTrigger::Scheduled, 3);
    task.status = TaskStatus::Active;
    task.started_at = Some(at(120));
    task.lock_token = Some(Uuid::new_v4());
    task.lock_expires_at = Some(at(60));
    repo.create(&task).await.unwrap();

    let reset = repo.reset_stuck_tasks(Duration::minutes(30)).await.unwrap();
    assert_eq!(reset, 1);

    let reloaded = repo.find_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(reloaded.status, TaskStatus::Queued);
    assert!(reloaded.lock_token.is_none());
}
