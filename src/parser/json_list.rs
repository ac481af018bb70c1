// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::{ParseError, ParsedEntry, ParsedRanking};
use serde::Deserialize;
use tracing::warn;

/// 站点JSON接口响应信封
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    msg: String,
    data: Option<Payload>,
}

#[derive(Debug, Deserialize)]
struct Payload {
    #[serde(default)]
    list: Vec<RawEntry>,
}

/// 站点JSON接口的单个榜单条目
///
/// 字段名与站点接口保持一致，缺失字段一律降级为None
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    #[serde(default)]
    book_id: Option<serde_json::Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    popularity: Option<i64>,
    #[serde(default)]
    word_count: Option<i64>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    cover: Option<String>,
    #[serde(default)]
    intro: Option<String>,
}

/// 解析站点JSON榜单接口响应
///
/// # 参数
///
/// * `body` - 响应正文
/// * `position_offset` - 名次偏移
///
/// # 返回值
///
/// * `Ok(ParsedRanking)` - 解析出的条目，缺少关键字段的条目被跳过
/// * `Err(ParseError)` - 响应不是合法JSON或站点返回错误码
pub fn parse(body: &str, position_offset: i32) -> Result<ParsedRanking, ParseError> {
    let envelope: Envelope = serde_json::from_str(body)?;

    if envelope.code != 0 {
        return Err(ParseError::Envelope {
            code: envelope.code,
            msg: envelope.msg,
        });
    }

    let list = envelope.data.map(|d| d.list).unwrap_or_default();

    let mut entries = Vec::with_capacity(list.len());
    let mut skipped = 0usize;

    for raw in list {
        // book id can be either a string or a number on the source site
        let source_book_id = match &raw.book_id {
            Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => {
                warn!("skipping ranking entry without book id");
                skipped += 1;
                continue;
            }
        };

        let title = match raw.title {
            Some(t) if !t.trim().is_empty() => t,
            _ => {
                warn!(%source_book_id, "skipping ranking entry without title");
                skipped += 1;
                continue;
            }
        };

        let position = position_offset + entries.len() as i32 + 1;
        entries.push(ParsedEntry {
            position,
            source_book_id,
            title,
            author: raw.author.unwrap_or_default(),
            category: raw.category,
            score: raw.score,
            popularity: raw.popularity,
            word_count: raw.word_count,
            status: super::parse_status(raw.status.as_deref().unwrap_or("")),
            cover_url: raw.cover,
            intro: raw.intro,
        });
    }

    Ok(ParsedRanking { entries, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::book::BookStatus;

    const FIXTURE: &str = r#"{
        "code": 0,
        "msg": "ok",
        "data": {
            "list": [
                {
                    "bookId": 10086,
                    "title": "斗破星河",
                    "author": "青山",
                    "category": "玄幻",
                    "score": 9.2,
                    "popularity": 125000,
                    "wordCount": 1234000,
                    "status": "连载中",
                    "cover": "https://img.example.com/10086.jpg",
                    "intro": "一个平凡少年的崛起之路。"
                },
                {
                    "bookId": "20010",
                    "title": "长安夜行录",
                    "author": "沈舟",
                    "category": "历史",
                    "score": 8.7,
                    "status": "已完结"
                },
                {
                    "title": "没有ID的书"
                }
            ]
        }
    }"#;

    #[test]
    fn test_parse_fixture() {
        let parsed = parse(FIXTURE, 0).unwrap();
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.skipped, 1);

        let first = &parsed.entries[0];
        assert_eq!(first.position, 1);
        assert_eq!(first.source_book_id, "10086");
        assert_eq!(first.title, "斗破星河");
        assert_eq!(first.author, "青山");
        assert_eq!(first.category.as_deref(), Some("玄幻"));
        assert_eq!(first.score, Some(9.2));
        assert_eq!(first.popularity, Some(125000));
        assert_eq!(first.word_count, Some(1_234_000));
        assert_eq!(first.status, BookStatus::Serializing);

        let second = &parsed.entries[1];
        assert_eq!(second.position, 2);
        assert_eq!(second.source_book_id, "20010");
        assert_eq!(second.status, BookStatus::Finished);
        assert_eq!(second.popularity, None);
    }

    #[test]
    fn test_position_offset() {
        let parsed = parse(FIXTURE, 20).unwrap();
        assert_eq!(parsed.entries[0].position, 21);
        assert_eq!(parsed.entries[1].position, 22);
    }

    #[test]
    fn test_error_envelope() {
        let body = r#"{"code": 1002, "msg": "rate limited"}"#;
        let err = parse(body, 0).unwrap_err();
        assert!(matches!(err, ParseError::Envelope { code: 1002, .. }));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse("<html>not json</html>", 0),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn test_empty_list() {
        let body = r#"{"code": 0, "msg": "ok", "data": {"list": []}}"#;
        let parsed = parse(body, 0).unwrap();
        assert!(parsed.entries.is_empty());
        assert_eq!(parsed.skipped, 0);
    }
}
