// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::crawl_task_repository::RepositoryError;
use crate::domain::models::ranking::{Ranking, RankingSnapshot, RankingSnapshotEntry};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

/// 榜单仓库特质
///
/// 定义榜单及榜单快照的数据访问接口。榜单行来自urls.json
/// 的同步，快照及其条目由抓取流水线写入。
#[async_trait]
pub trait RankingRepository: Send + Sync {
    /// 根据ID查找榜单
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ranking>, RepositoryError>;

    /// 根据key查找榜单
    async fn find_by_key(&self, key: &str) -> Result<Option<Ranking>, RepositoryError>;

    /// 列出榜单
    ///
    /// # 参数
    ///
    /// * `enabled_only` - 仅返回启用的榜单
    async fn list(&self, enabled_only: bool) -> Result<Vec<Ranking>, RepositoryError>;

    /// 按key插入或更新榜单定义
    ///
    /// 用于启动时将urls.json同步进数据库，保留已有的
    /// last_crawled_at
    async fn upsert_definition(&self, ranking: &Ranking) -> Result<Ranking, RepositoryError>;

    /// 更新榜单最后抓取时间
    async fn touch_last_crawled(
        &self,
        id: Uuid,
        at: DateTime<FixedOffset>,
    ) -> Result<(), RepositoryError>;

    /// 写入榜单快照及其条目
    async fn insert_snapshot(
        &self,
        snapshot: &RankingSnapshot,
        entries: &[RankingSnapshotEntry],
    ) -> Result<(), RepositoryError>;

    /// 查询榜单最新快照
    async fn latest_snapshot(
        &self,
        ranking_id: Uuid,
    ) -> Result<Option<RankingSnapshot>, RepositoryError>;

    /// 查询榜单最新快照之前的那一个快照
    async fn previous_snapshot(
        &self,
        ranking_id: Uuid,
        before: DateTime<FixedOffset>,
    ) -> Result<Option<RankingSnapshot>, RepositoryError>;

    /// 查询时间窗口内的榜单快照，按捕获时间升序
    async fn snapshots_since(
        &self,
        ranking_id: Uuid,
        since: DateTime<FixedOffset>,
    ) -> Result<Vec<RankingSnapshot>, RepositoryError>;

    /// 查询快照条目，按名次升序
    async fn snapshot_entries(
        &self,
        snapshot_id: Uuid,
    ) -> Result<Vec<RankingSnapshotEntry>, RepositoryError>;

    /// 查询某书籍在时间窗口内的榜单名次序列
    async fn book_positions_since(
        &self,
        book_id: Uuid,
        since: DateTime<FixedOffset>,
    ) -> Result<Vec<(RankingSnapshot, RankingSnapshotEntry)>, RepositoryError>;
}
