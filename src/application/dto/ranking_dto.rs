// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::ranking::Ranking;
use crate::domain::services::ranking_service::{BoardEntry, RankingTrendPoint};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 榜单DTO
#[derive(Debug, Serialize)]
pub struct RankingDto {
    pub id: Uuid,
    pub key: String,
    pub name: String,
    pub interval_minutes: i32,
    pub enabled: bool,
    pub last_crawled_at: Option<DateTime<FixedOffset>>,
}

impl From<Ranking> for RankingDto {
    fn from(ranking: Ranking) -> Self {
        Self {
            id: ranking.id,
            key: ranking.key,
            name: ranking.name,
            interval_minutes: ranking.interval_minutes,
            enabled: ranking.enabled,
            last_crawled_at: ranking.last_crawled_at,
        }
    }
}

/// 榜单列表查询参数
#[derive(Debug, Deserialize)]
pub struct RankingListQuery {
    /// 仅返回启用的榜单
    pub enabled: Option<bool>,
}

/// 榜单最新一期中的一个名次DTO
#[derive(Debug, Serialize)]
pub struct BoardEntryDto {
    pub position: i32,
    /// 相对上一期的名次变化，正数为上升
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<i32>,
    /// 是否首次上榜
    pub is_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity: Option<i64>,
    pub book_id: Uuid,
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

impl From<BoardEntry> for BoardEntryDto {
    fn from(entry: BoardEntry) -> Self {
        Self {
            position: entry.position,
            delta: entry.delta,
            is_new: entry.is_new,
            score: entry.score,
            popularity: entry.popularity,
            book_id: entry.book.id,
            title: entry.book.title,
            author: entry.book.author,
            category: entry.book.category,
            status: entry.book.status.to_string(),
            cover_url: entry.book.cover_url,
        }
    }
}

/// 榜单最新一期的分页DTO
#[derive(Debug, Serialize)]
pub struct BoardDto {
    /// 快照捕获时间
    pub captured_at: DateTime<FixedOffset>,
    pub entries: Vec<BoardEntryDto>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

/// 趋势查询参数
#[derive(Debug, Deserialize, Validate)]
pub struct TrendQuery {
    /// 时间窗口（天），默认7天
    #[validate(range(min = 1, max = 90))]
    pub days: Option<i64>,
}

impl TrendQuery {
    /// 查询天数，默认7天
    pub fn days(&self) -> i64 {
        self.days.unwrap_or(7)
    }
}

/// 榜单趋势点DTO
#[derive(Debug, Serialize)]
pub struct RankingTrendPointDto {
    pub captured_at: DateTime<FixedOffset>,
    pub entry_count: i32,
}

impl From<RankingTrendPoint> for RankingTrendPointDto {
    fn from(point: RankingTrendPoint) -> Self {
        Self {
            captured_at: point.captured_at,
            entry_count: point.entry_count,
        }
    }
}
