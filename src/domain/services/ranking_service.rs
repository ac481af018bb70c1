// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::book::Book;
use crate::domain::models::ranking::{Ranking, RankingSnapshot};
use crate::domain::repositories::book_repository::BookRepository;
use crate::domain::repositories::crawl_task_repository::RepositoryError;
use crate::domain::repositories::ranking_repository::RankingRepository;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 榜单最新一期中的一个名次
#[derive(Debug, Clone)]
pub struct BoardEntry {
    /// 名次，从1开始
    pub position: i32,
    /// 相对上一期的名次变化，正数为上升；上一期不存在该书时为None
    pub delta: Option<i32>,
    /// 是否首次上榜（相对上一期）
    pub is_new: bool,
    /// 本期快照中的评分
    pub score: Option<f64>,
    /// 本期快照中的人气值
    pub popularity: Option<i64>,
    /// 书籍信息
    pub book: Book,
}

/// 榜单最新一期的分页视图
#[derive(Debug, Clone)]
pub struct BoardPage {
    /// 快照元信息
    pub snapshot: RankingSnapshot,
    /// 当前页条目
    pub entries: Vec<BoardEntry>,
    /// 全榜条目总数
    pub total: u64,
}

/// 榜单趋势上的一个点
#[derive(Debug, Clone)]
pub struct RankingTrendPoint {
    /// 快照捕获时间
    pub captured_at: chrono::DateTime<chrono::FixedOffset>,
    /// 快照条目数
    pub entry_count: i32,
}

/// 榜单查询服务
///
/// 基于已持久化的快照提供榜单展示与趋势聚合查询
pub struct RankingService<R: RankingRepository, B: BookRepository> {
    ranking_repo: Arc<R>,
    book_repo: Arc<B>,
}

impl<R: RankingRepository, B: BookRepository> RankingService<R, B> {
    /// 创建新的榜单查询服务实例
    pub fn new(ranking_repo: Arc<R>, book_repo: Arc<B>) -> Self {
        Self {
            ranking_repo,
            book_repo,
        }
    }

    /// 查询榜单最新一期，带相对上一期的名次变化
    ///
    /// # 参数
    ///
    /// * `ranking` - 目标榜单
    /// * `page` - 页码，从1开始
    /// * `page_size` - 每页条目数
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(BoardPage))` - 最新一期的分页视图
    /// * `Ok(None)` - 榜单还没有任何快照
    /// * `Err(RepositoryError)` - 查询失败
    pub async fn latest_board(
        &self,
        ranking: &Ranking,
        page: u64,
        page_size: u64,
    ) -> Result<Option<BoardPage>, RepositoryError> {
        let Some(snapshot) = self.ranking_repo.latest_snapshot(ranking.id).await? else {
            return Ok(None);
        };

        let entries = self.ranking_repo.snapshot_entries(snapshot.id).await?;
        let total = entries.len() as u64;

        // 上一期的名次映射，用于计算变化
        let previous_positions: HashMap<Uuid, i32> = match self
            .ranking_repo
            .previous_snapshot(ranking.id, snapshot.captured_at)
            .await?
        {
            Some(previous) => self
                .ranking_repo
                .snapshot_entries(previous.id)
                .await?
                .into_iter()
                .map(|e| (e.book_id, e.position))
                .collect(),
            None => HashMap::new(),
        };

        let offset = (page.saturating_sub(1) * page_size) as usize;
        let mut board_entries = Vec::new();

        for entry in entries.into_iter().skip(offset).take(page_size as usize) {
            let Some(book) = self.book_repo.find_by_id(entry.book_id).await? else {
                // Snapshot rows outliving their book only happens after manual
                // cleanup, skip instead of failing the whole board
                continue;
            };

            let previous = previous_positions.get(&entry.book_id).copied();
            board_entries.push(BoardEntry {
                position: entry.position,
                delta: previous.map(|p| p - entry.position),
                is_new: previous.is_none(),
                score: entry.score,
                popularity: entry.popularity,
                book,
            });
        }

        Ok(Some(BoardPage {
            snapshot,
            entries: board_entries,
            total,
        }))
    }

    /// 查询榜单最近N天的快照趋势
    pub async fn trend(
        &self,
        ranking_id: Uuid,
        days: i64,
    ) -> Result<Vec<RankingTrendPoint>, RepositoryError> {
        let since = (Utc::now() - Duration::days(days)).into();
        let snapshots = self.ranking_repo.snapshots_since(ranking_id, since).await?;
        Ok(snapshots
            .into_iter()
            .map(|s| RankingTrendPoint {
                captured_at: s.captured_at,
                entry_count: s.entry_count,
            })
            .collect())
    }
}
