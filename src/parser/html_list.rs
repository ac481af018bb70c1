// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::{ParseError, ParsedEntry, ParsedRanking};
use scraper::{Html, Selector};
use tracing::warn;

/// 解析站点HTML榜单页面
///
/// 榜单页结构为 `ul.rank-list > li`，每个条目内包含书名链接、
/// 作者、分类、评分、人气与字数等字段。
///
/// # 参数
///
/// * `body` - 页面HTML
/// * `position_offset` - 名次偏移
///
/// # 返回值
///
/// * `Ok(ParsedRanking)` - 解析出的条目
/// * `Err(ParseError)` - 页面中不存在榜单列表结构
pub fn parse(body: &str, position_offset: i32) -> Result<ParsedRanking, ParseError> {
    let document = Html::parse_document(body);
    let list_selector = Selector::parse("ul.rank-list > li").unwrap();
    let name_selector = Selector::parse("a.book-name").unwrap();
    let author_selector = Selector::parse(".author").unwrap();
    let category_selector = Selector::parse(".category").unwrap();
    let score_selector = Selector::parse(".score").unwrap();
    let popularity_selector = Selector::parse(".popularity").unwrap();
    let word_count_selector = Selector::parse(".word-count").unwrap();
    let status_selector = Selector::parse(".status").unwrap();
    let cover_selector = Selector::parse("img.cover").unwrap();
    let intro_selector = Selector::parse(".intro").unwrap();

    let items: Vec<_> = document.select(&list_selector).collect();
    if items.is_empty() {
        return Err(ParseError::Structure(
            "no ul.rank-list items in page".to_string(),
        ));
    }

    let book_id_re = regex::Regex::new(r"/book/([A-Za-z0-9_-]+)").unwrap();

    let mut entries = Vec::with_capacity(items.len());
    let mut skipped = 0usize;

    for item in items {
        let Some(name_el) = item.select(&name_selector).next() else {
            warn!("skipping ranking item without book link");
            skipped += 1;
            continue;
        };

        let title = name_el.text().collect::<String>().trim().to_string();
        let href = name_el.value().attr("href").unwrap_or_default();
        let source_book_id = book_id_re
            .captures(href)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        let (Some(source_book_id), false) = (source_book_id, title.is_empty()) else {
            warn!(href, "skipping ranking item without book id or title");
            skipped += 1;
            continue;
        };

        let text_of = |selector: &Selector| -> Option<String> {
            item.select(selector)
                .next()
                .map(|e| e.text().collect::<String>().trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let score = text_of(&score_selector)
            .and_then(|s| s.trim_end_matches('分').trim().parse::<f64>().ok());
        let popularity = text_of(&popularity_selector).and_then(|s| super::parse_count(&s));
        let word_count = text_of(&word_count_selector).and_then(|s| super::parse_count(&s));
        let cover_url = item
            .select(&cover_selector)
            .next()
            .and_then(|e| e.value().attr("src"))
            .map(|s| s.to_string());

        let position = position_offset + entries.len() as i32 + 1;
        entries.push(ParsedEntry {
            position,
            source_book_id,
            title,
            author: text_of(&author_selector).unwrap_or_default(),
            category: text_of(&category_selector),
            score,
            popularity,
            word_count,
            status: super::parse_status(&text_of(&status_selector).unwrap_or_default()),
            cover_url,
            intro: text_of(&intro_selector),
        });
    }

    Ok(ParsedRanking { entries, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::book::BookStatus;

    const FIXTURE: &str = r#"
    <html><body>
    <ul class="rank-list">
      <li>
        <span class="rank-no">1</span>
        <a class="book-name" href="/book/10086">斗破星河</a>
        <span class="author">青山</span>
        <span class="category">玄幻</span>
        <span class="score">9.2分</span>
        <span class="popularity">12.5万人气</span>
        <span class="word-count">123.4万字</span>
        <span class="status">连载中</span>
        <img class="cover" src="https://img.example.com/10086.jpg">
        <p class="intro">一个平凡少年的崛起之路。</p>
      </li>
      <li>
        <span class="rank-no">2</span>
        <a class="book-name" href="/book/20010">长安夜行录</a>
        <span class="author">沈舟</span>
        <span class="status">已完结</span>
      </li>
      <li>
        <span class="rank-no">3</span>
        <span class="author">无链接的条目</span>
      </li>
    </ul>
    </body></html>
    "#;

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
        assert_eq!(first.popularity, Some(125_000));
        assert_eq!(first.word_count, Some(1_234_000));
        assert_eq!(first.status, BookStatus::Serializing);
        assert_eq!(
            first.cover_url.as_deref(),
            Some("https://img.example.com/10086.jpg")
        );

        let second = &parsed.entries[1];
        assert_eq!(second.position, 2);
        assert_eq!(second.status, BookStatus::Finished);
        assert_eq!(second.score, None);
    }

    #[test]
    fn test_unparsable_page() {
        let err = parse("<html><body><p>maintenance</p></body></html>", 0).unwrap_err();
        assert!(matches!(err, ParseError::Structure(_)));
    }
}
