// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::{ParseError, ParsedBookDetail};
use scraper::{Html, Selector};

/// 解析站点书籍详情页
///
/// 详情页结构为 `div.book-info`，包含书名、作者、分类、状态、
/// 字数、简介与最新章节。
///
/// # 参数
///
/// * `body` - 页面HTML
///
/// # 返回值
///
/// * `Ok(ParsedBookDetail)` - 解析出的书籍详情
/// * `Err(ParseError)` - 页面中不存在详情结构或缺少书名
pub fn parse(body: &str) -> Result<ParsedBookDetail, ParseError> {
    let document = Html::parse_document(body);
    let info_selector = Selector::parse("div.book-info").unwrap();
    let name_selector = Selector::parse("h1.book-name").unwrap();
    let author_selector = Selector::parse(".author").unwrap();
    let category_selector = Selector::parse(".category").unwrap();
    let status_selector = Selector::parse(".status").unwrap();
    let word_count_selector = Selector::parse(".word-count").unwrap();
    let cover_selector = Selector::parse("img.cover").unwrap();
    let intro_selector = Selector::parse(".intro").unwrap();
    let last_chapter_selector = Selector::parse("a.last-chapter").unwrap();

    let Some(info) = document.select(&info_selector).next() else {
        return Err(ParseError::Structure(
            "no div.book-info in page".to_string(),
        ));
    };

    let text_of = |selector: &Selector| -> Option<String> {
        info.select(selector)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let Some(title) = text_of(&name_selector) else {
        return Err(ParseError::Structure("book page without title".to_string()));
    };

    Ok(ParsedBookDetail {
        title,
        author: text_of(&author_selector).unwrap_or_default(),
        category: text_of(&category_selector),
        status: super::parse_status(&text_of(&status_selector).unwrap_or_default()),
        word_count: text_of(&word_count_selector).and_then(|s| super::parse_count(&s)),
        cover_url: info
            .select(&cover_selector)
            .next()
            .and_then(|e| e.value().attr("src"))
            .map(|s| s.to_string()),
        intro: text_of(&intro_selector),
        last_chapter: text_of(&last_chapter_selector),
    })
}
