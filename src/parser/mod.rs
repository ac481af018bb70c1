// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 解析器模块
///
/// 将来源站点的JSON/HTML响应映射为类型化的记录。纯数据转换，
/// 不做任何IO；无法识别的单条数据跳过并计数，整页无法解析才报错。
pub mod book_detail;
pub mod html_list;
pub mod json_list;

use crate::config::sources::SourceKind;
use crate::domain::models::book::BookStatus;
use thiserror::Error;

/// 解析错误类型
#[derive(Error, Debug)]
pub enum ParseError {
    /// JSON反序列化失败
    #[error("Invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// 站点返回了业务错误码
    #[error("Source returned error envelope: code={code}, msg={msg}")]
    Envelope { code: i64, msg: String },

    /// 页面结构无法识别
    #[error("Unrecognized page structure: {0}")]
    Structure(String),
}

/// 榜单页解析出的一个条目
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEntry {
    /// 名次，从1开始
    pub position: i32,
    /// 来源站点书籍ID
    pub source_book_id: String,
    /// 书名
    pub title: String,
    /// 作者
    pub author: String,
    /// 分类
    pub category: Option<String>,
    /// 评分
    pub score: Option<f64>,
    /// 人气值
    pub popularity: Option<i64>,
    /// 字数
    pub word_count: Option<i64>,
    /// 连载状态
    pub status: BookStatus,
    /// 封面图URL
    pub cover_url: Option<String>,
    /// 简介
    pub intro: Option<String>,
}

/// 榜单页解析结果
#[derive(Debug, Clone)]
pub struct ParsedRanking {
    /// 按名次排列的条目
    pub entries: Vec<ParsedEntry>,
    /// 因缺少关键字段而跳过的条目数
    pub skipped: usize,
}

/// 书籍详情页解析结果
#[derive(Debug, Clone)]
pub struct ParsedBookDetail {
    /// 书名
    pub title: String,
    /// 作者
    pub author: String,
    /// 分类
    pub category: Option<String>,
    /// 连载状态
    pub status: BookStatus,
    /// 字数
    pub word_count: Option<i64>,
    /// 封面图URL
    pub cover_url: Option<String>,
    /// 简介
    pub intro: Option<String>,
    /// 最新章节名
    pub last_chapter: Option<String>,
}

/// 解析榜单列表页
///
/// 根据来源类型分派到JSON或HTML解析器
///
/// # 参数
///
/// * `kind` - 页面类型
/// * `body` - 响应正文
/// * `position_offset` - 名次偏移，多页榜单的后续页传入已有条目数
pub fn parse_ranking(
    kind: SourceKind,
    body: &str,
    position_offset: i32,
) -> Result<ParsedRanking, ParseError> {
    match kind {
        SourceKind::Json => json_list::parse(body, position_offset),
        SourceKind::Html => html_list::parse(body, position_offset),
    }
}

/// 解析来源站点的连载状态标注
pub(crate) fn parse_status(raw: &str) -> BookStatus {
    let raw = raw.trim();
    if raw.is_empty() {
        return BookStatus::Unknown;
    }
    if raw.contains("完结") || raw.eq_ignore_ascii_case("finished") {
        return BookStatus::Finished;
    }
    if raw.contains("连载") || raw.eq_ignore_ascii_case("serializing") {
        return BookStatus::Serializing;
    }
    BookStatus::Unknown
}

/// 解析站点展示用的数量文本，如 "123.4万" / "8,765" / "1.2亿"
pub(crate) fn parse_count(raw: &str) -> Option<i64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let re = regex::Regex::new(r"([0-9]+(?:\.[0-9]+)?)(万|亿)?").unwrap();
    let caps = re.captures(&cleaned)?;
    let number: f64 = caps.get(1)?.as_str().parse().ok()?;
    let multiplier = match caps.get(2).map(|m| m.as_str()) {
        Some("万") => 10_000.0,
        Some("亿") => 100_000_000.0,
        _ => 1.0,
    };
    Some((number * multiplier).round() as i64)
}
