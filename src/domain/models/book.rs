// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 书籍实体
///
/// 表示从来源站点收录的一本书。书籍按来源站点的ID去重，
/// 元数据随每次抓取更新，时间序列数据记录在快照中。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    /// 书籍唯一标识符
    pub id: Uuid,
    /// 来源站点的书籍ID，唯一
    pub source_book_id: String,
    /// 书名
    pub title: String,
    /// 作者
    pub author: String,
    /// 分类，来源站点的频道/类型
    pub category: Option<String>,
    /// 连载状态
    pub status: BookStatus,
    /// 封面图URL
    pub cover_url: Option<String>,
    /// 简介
    pub intro: Option<String>,
    /// 首次收录时间
    pub first_seen_at: DateTime<FixedOffset>,
    /// 最后更新时间
    pub updated_at: DateTime<FixedOffset>,
}

impl Book {
    /// 根据解析结果创建新书籍
    pub fn new(source_book_id: String, title: String, author: String) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            source_book_id,
            title,
            author,
            category: None,
            status: BookStatus::default(),
            cover_url: None,
            intro: None,
            first_seen_at: now,
            updated_at: now,
        }
    }
}

/// 书籍连载状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    /// 连载中
    #[default]
    Serializing,
    /// 已完结
    Finished,
    /// 来源站点未标注
    Unknown,
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BookStatus::Serializing => write!(f, "serializing"),
            BookStatus::Finished => write!(f, "finished"),
            BookStatus::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for BookStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "serializing" => Ok(BookStatus::Serializing),
            "finished" => Ok(BookStatus::Finished),
            "unknown" => Ok(BookStatus::Unknown),
            _ => Err(()),
        }
    }
}

/// 书籍快照
///
/// 一次抓取捕获到的书籍时间序列数据点，用于趋势查询
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// 快照唯一标识符
    pub id: Uuid,
    /// 所属书籍ID
    pub book_id: Uuid,
    /// 评分
    pub score: Option<f64>,
    /// 人气值（收藏/推荐等来源站点口径）
    pub popularity: Option<i64>,
    /// 字数
    pub word_count: Option<i64>,
    /// 最新章节名
    pub last_chapter: Option<String>,
    /// 捕获时间
    pub captured_at: DateTime<FixedOffset>,
}

impl BookSnapshot {
    /// 创建书籍快照
    pub fn new(book_id: Uuid, captured_at: DateTime<FixedOffset>) -> Self {
        Self {
            id: Uuid::new_v4(),
            book_id,
            score: None,
            popularity: None,
            word_count: None,
            last_chapter: None,
            captured_at,
        }
    }
}
