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

use crate::config::sources::{RankingSource, SiteSources};
use crate::domain::models::book::{Book, BookSnapshot};
use crate::domain::models::ranking::{Ranking, RankingSnapshot, RankingSnapshotEntry};
use crate::domain::repositories::book_repository::BookRepository;
use crate::domain::repositories::crawl_task_repository::RepositoryError;
use crate::domain::repositories::ranking_repository::RankingRepository;
use crate::fetch::{FetchError, HttpFetcher};
use crate::parser::{self, ParseError, ParsedEntry};
use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// 抓取流水线错误类型
#[derive(Error, Debug)]
pub enum CrawlError {
    /// 榜单在urls.json中不存在
    #[error("No source configured for ranking '{0}'")]
    UnknownSource(String),

    /// 页面抓取失败
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// 页面解析失败
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// 持久化失败
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// 一次抓取的执行结果
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    /// 榜单条目数
    pub entry_count: i32,
    /// 抓取到的书籍总数
    pub books_seen: i32,
    /// 新收录的书籍数
    pub books_new: i32,
    /// 解析时跳过的条目数
    pub skipped: usize,
}

/// 抓取服务
///
/// fetch→parse→persist流水线：抓取榜单列表页，解析为类型化条目，
/// 更新书籍元数据并写入榜单/书籍快照。worker对每个任务调用一次。
pub struct CrawlService<B: BookRepository, R: RankingRepository> {
    fetcher: Arc<HttpFetcher>,
    sources: Arc<SiteSources>,
    book_repo: Arc<B>,
    ranking_repo: Arc<R>,
}

impl<B: BookRepository, R: RankingRepository> CrawlService<B, R> {
    /// 创建新的抓取服务实例
    ///
    /// # 参数
    ///
    /// * `fetcher` - HTTP抓取客户端
    /// * `sources` - 站点配置
    /// * `book_repo` - 书籍仓库
    /// * `ranking_repo` - 榜单仓库
    pub fn new(
        fetcher: Arc<HttpFetcher>,
        sources: Arc<SiteSources>,
        book_repo: Arc<B>,
        ranking_repo: Arc<R>,
    ) -> Self {
        Self {
            fetcher,
            sources,
            book_repo,
            ranking_repo,
        }
    }

    /// 抓取一个榜单
    ///
    /// 逐页抓取并解析榜单，随后落库：书籍按来源ID去重更新，
    /// 榜单快照与书籍快照追加，最后更新榜单抓取时间。
    ///
    /// # 参数
    ///
    /// * `ranking` - 目标榜单
    /// * `task_id` - 产生此次抓取的任务ID
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlOutcome)` - 抓取统计
    /// * `Err(CrawlError)` - 抓取、解析或持久化失败
    pub async fn crawl_ranking(
        &self,
        ranking: &Ranking,
        task_id: Uuid,
    ) -> Result<CrawlOutcome, CrawlError> {
        let source = self
            .sources
            .get(&ranking.key)
            .ok_or_else(|| CrawlError::UnknownSource(ranking.key.clone()))?;

        let mut entries: Vec<ParsedEntry> = Vec::new();
        let mut skipped = 0usize;

        for page in 1..=source.page_count.max(1) {
            let url = source.page_url(page);
            let fetched = self.fetcher.fetch_text(&url).await?;
            let parsed = parser::parse_ranking(source.kind, &fetched.body, entries.len() as i32)?;
            skipped += parsed.skipped;
            entries.extend(parsed.entries);
        }

        let captured_at: DateTime<FixedOffset> = Utc::now().into();
        let snapshot_id = Uuid::new_v4();

        let mut snapshot_entries = Vec::with_capacity(entries.len());
        let mut books_new = 0i32;

        for entry in &entries {
            let (book, was_new) = self.persist_book(source, entry, captured_at).await?;
            if was_new {
                books_new += 1;
            }

            snapshot_entries.push(RankingSnapshotEntry {
                id: Uuid::new_v4(),
                snapshot_id,
                position: entry.position,
                book_id: book.id,
                score: entry.score,
                popularity: entry.popularity,
            });
        }

        let snapshot = RankingSnapshot {
            id: snapshot_id,
            ranking_id: ranking.id,
            entry_count: snapshot_entries.len() as i32,
            task_id: Some(task_id),
            captured_at,
        };
        self.ranking_repo
            .insert_snapshot(&snapshot, &snapshot_entries)
            .await?;

        self.ranking_repo
            .touch_last_crawled(ranking.id, captured_at)
            .await?;

        let outcome = CrawlOutcome {
            entry_count: snapshot.entry_count,
            books_seen: entries.len() as i32,
            books_new,
            skipped,
        };

        info!(
            ranking = %ranking.key,
            entries = outcome.entry_count,
            new_books = outcome.books_new,
            skipped = outcome.skipped,
            "ranking crawl finished"
        );

        Ok(outcome)
    }

    /// 落库一本书：更新元数据并追加快照
    ///
    /// 首次收录且配置了详情页模板时，抓取详情页补全简介与
    /// 最新章节；详情页失败只降级为告警，不影响榜单抓取。
    async fn persist_book(
        &self,
        source: &RankingSource,
        entry: &ParsedEntry,
        captured_at: DateTime<FixedOffset>,
    ) -> Result<(Book, bool), CrawlError> {
        let existing = self
            .book_repo
            .find_by_source_id(&entry.source_book_id)
            .await?;
        let is_new = existing.is_none();

        let mut book = Book::new(
            entry.source_book_id.clone(),
            entry.title.clone(),
            entry.author.clone(),
        );
        book.category = entry.category.clone();
        book.status = entry.status;
        book.cover_url = entry.cover_url.clone();
        book.intro = entry.intro.clone();

        let mut last_chapter = None;

        if is_new {
            if let Some(url) = source.book_url(&entry.source_book_id) {
                match self.fetch_detail(&url).await {
                    Ok(detail) => {
                        if book.category.is_none() {
                            book.category = detail.category;
                        }
                        if book.cover_url.is_none() {
                            book.cover_url = detail.cover_url;
                        }
                        if book.intro.is_none() {
                            book.intro = detail.intro;
                        }
                        last_chapter = detail.last_chapter;
                    }
                    Err(e) => {
                        warn!(%url, error = %e, "book detail fetch failed, keeping list fields");
                    }
                }
            }
        } else if let Some(existing) = &existing {
            // 榜单页缺失的字段不清空已有数据
            if book.category.is_none() {
                book.category = existing.category.clone();
            }
            if book.cover_url.is_none() {
                book.cover_url = existing.cover_url.clone();
            }
            if book.intro.is_none() {
                book.intro = existing.intro.clone();
            }
        }

        let (book, was_new) = self.book_repo.upsert(&book).await?;

        let mut snapshot = BookSnapshot::new(book.id, captured_at);
        snapshot.score = entry.score;
        snapshot.popularity = entry.popularity;
        snapshot.word_count = entry.word_count;
        snapshot.last_chapter = last_chapter;
        self.book_repo.insert_snapshot(&snapshot).await?;

        Ok((book, was_new))
    }

    async fn fetch_detail(&self, url: &str) -> Result<parser::ParsedBookDetail, CrawlError> {
        let fetched = self.fetcher.fetch_text(url).await?;
        Ok(parser::book_detail::parse(&fetched.body)?)
    }
}
