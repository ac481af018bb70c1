// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::book::{Book, BookSnapshot};
use crate::domain::repositories::book_repository::BookRepository;
use crate::domain::repositories::crawl_task_repository::RepositoryError;
use crate::domain::repositories::ranking_repository::RankingRepository;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// 书籍在某个榜单上的一个历史名次
#[derive(Debug, Clone)]
pub struct BookPositionPoint {
    /// 榜单ID
    pub ranking_id: Uuid,
    /// 快照捕获时间
    pub captured_at: DateTime<FixedOffset>,
    /// 名次
    pub position: i32,
}

/// 书籍趋势视图
#[derive(Debug, Clone)]
pub struct BookTrend {
    /// 时间窗口内的书籍快照，按时间升序
    pub snapshots: Vec<BookSnapshot>,
    /// 时间窗口内的榜单名次序列，按时间升序
    pub positions: Vec<BookPositionPoint>,
}

/// 书籍查询服务
///
/// 提供书籍详情与趋势聚合查询
pub struct BookService<B: BookRepository, R: RankingRepository> {
    book_repo: Arc<B>,
    ranking_repo: Arc<R>,
}

impl<B: BookRepository, R: RankingRepository> BookService<B, R> {
    /// 创建新的书籍查询服务实例
    pub fn new(book_repo: Arc<B>, ranking_repo: Arc<R>) -> Self {
        Self {
            book_repo,
            ranking_repo,
        }
    }

    /// 查询书籍详情及其最新快照
    pub async fn detail(
        &self,
        id: Uuid,
    ) -> Result<Option<(Book, Option<BookSnapshot>)>, RepositoryError> {
        let Some(book) = self.book_repo.find_by_id(id).await? else {
            return Ok(None);
        };
        let snapshot = self.book_repo.latest_snapshot(book.id).await?;
        Ok(Some((book, snapshot)))
    }

    /// 查询书籍最近N天的趋势
    ///
    /// 包括评分/人气/字数的快照序列以及书籍在各榜单上的名次序列
    pub async fn trend(&self, book_id: Uuid, days: i64) -> Result<BookTrend, RepositoryError> {
        let since: DateTime<FixedOffset> = (Utc::now() - Duration::days(days)).into();

        let snapshots = self.book_repo.snapshots_since(book_id, since).await?;
        let positions = self
            .ranking_repo
            .book_positions_since(book_id, since)
            .await?
            .into_iter()
            .map(|(snapshot, entry)| BookPositionPoint {
                ranking_id: snapshot.ranking_id,
                captured_at: snapshot.captured_at,
                position: entry.position,
            })
            .collect();

        Ok(BookTrend {
            snapshots,
            positions,
        })
    }
}
