// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::crawl_task_repository::RepositoryError;
use crate::domain::models::book::{Book, BookSnapshot};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

/// 书籍查询参数
#[derive(Debug, Default, Clone)]
pub struct BookQueryParams {
    /// 标题/作者模糊匹配关键字
    pub keyword: Option<String>,
    /// 分类过滤
    pub category: Option<String>,
    /// 连载状态过滤
    pub status: Option<String>,
    pub limit: u64,
    pub offset: u64,
}

/// 书籍仓库特质
///
/// 定义书籍及书籍快照的数据访问接口。书籍按来源站点ID去重，
/// 快照只追加不修改。
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// 根据ID查找书籍
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, RepositoryError>;

    /// 根据来源站点ID查找书籍
    async fn find_by_source_id(
        &self,
        source_book_id: &str,
    ) -> Result<Option<Book>, RepositoryError>;

    /// 按来源站点ID插入或更新书籍
    ///
    /// 已存在时更新元数据并保留首次收录时间，返回值的布尔位
    /// 表示本次是否新收录
    async fn upsert(&self, book: &Book) -> Result<(Book, bool), RepositoryError>;

    /// 分页查询书籍
    async fn query_books(
        &self,
        params: BookQueryParams,
    ) -> Result<(Vec<Book>, u64), RepositoryError>;

    /// 追加书籍快照
    async fn insert_snapshot(&self, snapshot: &BookSnapshot) -> Result<(), RepositoryError>;

    /// 查询书籍最新快照
    async fn latest_snapshot(
        &self,
        book_id: Uuid,
    ) -> Result<Option<BookSnapshot>, RepositoryError>;

    /// 查询时间窗口内的书籍快照，按捕获时间升序
    async fn snapshots_since(
        &self,
        book_id: Uuid,
        since: DateTime<FixedOffset>,
    ) -> Result<Vec<BookSnapshot>, RepositoryError>;
}
