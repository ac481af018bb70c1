// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::book::{Book, BookSnapshot};
use crate::domain::services::book_service::BookPositionPoint;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 书籍列表查询参数
#[derive(Debug, Deserialize, Validate)]
pub struct BookListQuery {
    /// 标题/作者模糊匹配关键字
    #[validate(length(min = 1, max = 100))]
    pub keyword: Option<String>,
    /// 分类过滤
    pub category: Option<String>,
    /// 连载状态过滤 (serializing/finished/unknown)
    pub status: Option<String>,
    #[validate(range(min = 1))]
    pub page: Option<u64>,
    #[validate(range(min = 1, max = 100))]
    pub page_size: Option<u64>,
}

/// 书籍DTO
#[derive(Debug, Serialize)]
pub struct BookDto {
    pub id: Uuid,
    pub source_book_id: String,
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    pub first_seen_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            source_book_id: book.source_book_id,
            title: book.title,
            author: book.author,
            category: book.category,
            status: book.status.to_string(),
            cover_url: book.cover_url,
            intro: book.intro,
            first_seen_at: book.first_seen_at,
            updated_at: book.updated_at,
        }
    }
}

/// 书籍快照DTO
#[derive(Debug, Serialize)]
pub struct BookSnapshotDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_chapter: Option<String>,
    pub captured_at: DateTime<FixedOffset>,
}

impl From<BookSnapshot> for BookSnapshotDto {
    fn from(snapshot: BookSnapshot) -> Self {
        Self {
            score: snapshot.score,
            popularity: snapshot.popularity,
            word_count: snapshot.word_count,
            last_chapter: snapshot.last_chapter,
            captured_at: snapshot.captured_at,
        }
    }
}

/// 书籍详情DTO：书籍信息加最新快照
#[derive(Debug, Serialize)]
pub struct BookDetailDto {
    #[serde(flatten)]
    pub book: BookDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_snapshot: Option<BookSnapshotDto>,
}

/// 书籍榜单名次点DTO
#[derive(Debug, Serialize)]
pub struct BookPositionPointDto {
    pub ranking_id: Uuid,
    pub captured_at: DateTime<FixedOffset>,
    pub position: i32,
}

impl From<BookPositionPoint> for BookPositionPointDto {
    fn from(point: BookPositionPoint) -> Self {
        Self {
            ranking_id: point.ranking_id,
            captured_at: point.captured_at,
            position: point.position,
        }
    }
}

/// 书籍趋势DTO
#[derive(Debug, Serialize)]
pub struct BookTrendDto {
    pub snapshots: Vec<BookSnapshotDto>,
    pub positions: Vec<BookPositionPointDto>,
}
