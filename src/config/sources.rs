// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// 站点配置错误类型
#[derive(Error, Debug)]
pub enum SourceConfigError {
    /// 配置文件读取失败
    #[error("Failed to read sources file: {0}")]
    Io(#[from] std::io::Error),
    /// 配置文件解析失败
    #[error("Failed to parse sources file: {0}")]
    Parse(#[from] serde_json::Error),
    /// 配置内容校验失败
    #[error("Invalid source config: {0}")]
    Invalid(String),
}

/// 榜单页面类型
///
/// 决定响应体交给哪个解析器处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// 站点JSON接口
    Json,
    /// 站点HTML页面
    Html,
}

/// 单个榜单来源定义
///
/// 对应 urls.json 中的一个条目，描述要抓取的榜单页面及其更新周期
#[derive(Debug, Clone, Deserialize)]
pub struct RankingSource {
    /// 榜单唯一标识（slug）
    pub key: String,
    /// 榜单显示名称
    pub name: String,
    /// 榜单列表页URL
    pub url: String,
    /// 页面类型
    pub kind: SourceKind,
    /// 更新周期（分钟）
    pub interval_minutes: u32,
    /// 是否启用
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// 列表分页数量，多页榜单逐页抓取
    #[serde(default = "default_page_count")]
    pub page_count: u32,
    /// 书籍详情页URL模板，包含 {id} 占位符
    #[serde(default)]
    pub book_url_template: Option<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_page_count() -> u32 {
    1
}

impl RankingSource {
    /// 构造指定页码的列表页URL
    ///
    /// 第一页使用原始URL，后续页追加 page 参数
    pub fn page_url(&self, page: u32) -> String {
        if page <= 1 {
            return self.url.clone();
        }
        if self.url.contains('?') {
            format!("{}&page={}", self.url, page)
        } else {
            format!("{}?page={}", self.url, page)
        }
    }

    /// 构造书籍详情页URL
    pub fn book_url(&self, source_book_id: &str) -> Option<String> {
        self.book_url_template
            .as_ref()
            .map(|t| t.replace("{id}", source_book_id))
    }
}

/// 站点配置
///
/// urls.json 加载后的内存表示，启动时加载一次
#[derive(Debug, Clone)]
pub struct SiteSources {
    sources: Vec<RankingSource>,
}

impl SiteSources {
    /// 从文件加载站点配置
    ///
    /// # 参数
    ///
    /// * `path` - urls.json 路径
    ///
    /// # 返回值
    ///
    /// * `Ok(SiteSources)` - 加载并校验通过的站点配置
    /// * `Err(SourceConfigError)` - 读取、解析或校验失败
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SourceConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let sources: Vec<RankingSource> = serde_json::from_str(&raw)?;
        Self::from_sources(sources)
    }

    /// 从已解析的来源列表构造站点配置
    pub fn from_sources(sources: Vec<RankingSource>) -> Result<Self, SourceConfigError> {
        if sources.is_empty() {
            return Err(SourceConfigError::Invalid(
                "sources file contains no entries".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for source in &sources {
            if source.key.trim().is_empty() {
                return Err(SourceConfigError::Invalid(
                    "source key cannot be empty".to_string(),
                ));
            }
            if source.url.trim().is_empty() {
                return Err(SourceConfigError::Invalid(format!(
                    "source '{}' url cannot be empty",
                    source.key
                )));
            }
            if source.interval_minutes == 0 {
                return Err(SourceConfigError::Invalid(format!(
                    "source '{}' interval_minutes must be positive",
                    source.key
                )));
            }
            if !seen.insert(source.key.clone()) {
                return Err(SourceConfigError::Invalid(format!(
                    "duplicate source key '{}'",
                    source.key
                )));
            }
        }

        Ok(Self { sources })
    }

    /// 根据key查找来源
    pub fn get(&self, key: &str) -> Option<&RankingSource> {
        self.sources.iter().find(|s| s.key == key)
    }

    /// 遍历启用的来源
    pub fn iter_enabled(&self) -> impl Iterator<Item = &RankingSource> {
        self.sources.iter().filter(|s| s.enabled)
    }

    /// 遍历全部来源
    pub fn iter(&self) -> impl Iterator<Item = &RankingSource> {
        self.sources.iter()
    }

    /// 来源数量
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_json() -> &'static str {
        r#"[
            {
                "key": "hot-weekly",
                "name": "周热销榜",
                "url": "https://example.com/api/rank/hot",
                "kind": "json",
                "interval_minutes": 60,
                "page_count": 2,
                "book_url_template": "https://example.com/book/{id}"
            },
            {
                "key": "new-books",
                "name": "新书榜",
                "url": "https://example.com/rank/new",
                "kind": "html",
                "interval_minutes": 1440,
                "enabled": false
            }
        ]"#
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(sample_json().as_bytes()).unwrap();

        let sources = SiteSources::load(file.path()).unwrap();
        assert_eq!(sources.len(), 2);

        let hot = sources.get("hot-weekly").unwrap();
        assert_eq!(hot.name, "周热销榜");
        assert_eq!(hot.kind, SourceKind::Json);
        assert_eq!(hot.interval_minutes, 60);
        assert!(hot.enabled);

        // enabled defaults applied, disabled entries excluded from iter_enabled
        assert_eq!(sources.iter_enabled().count(), 1);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let sources = vec![
            RankingSource {
                key: "a".to_string(),
                name: "A".to_string(),
                url: "https://example.com/a".to_string(),
                kind: SourceKind::Json,
                interval_minutes: 60,
                enabled: true,
                page_count: 1,
                book_url_template: None,
            },
            RankingSource {
                key: "a".to_string(),
                name: "A2".to_string(),
                url: "https://example.com/a2".to_string(),
                kind: SourceKind::Json,
                interval_minutes: 60,
                enabled: true,
                page_count: 1,
                book_url_template: None,
            },
        ];

        let err = SiteSources::from_sources(sources).unwrap_err();
        assert!(matches!(err, SourceConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let sources = vec![RankingSource {
            key: "a".to_string(),
            name: "A".to_string(),
            url: "https://example.com/a".to_string(),
            kind: SourceKind::Html,
            interval_minutes: 0,
            enabled: true,
            page_count: 1,
            book_url_template: None,
        }];

        assert!(SiteSources::from_sources(sources).is_err());
    }

    #[test]
    fn test_page_and_book_url() {
        let source = RankingSource {
            key: "hot".to_string(),
            name: "Hot".to_string(),
            url: "https://example.com/api/rank/hot?type=week".to_string(),
            kind: SourceKind::Json,
            interval_minutes: 60,
            enabled: true,
            page_count: 3,
            book_url_template: Some("https://example.com/book/{id}".to_string()),
        };

        assert_eq!(source.page_url(1), "https://example.com/api/rank/hot?type=week");
        assert_eq!(
            source.page_url(2),
            "https://example.com/api/rank/hot?type=week&page=2"
        );
        assert_eq!(
            source.book_url("12345").unwrap(),
            "https://example.com/book/12345"
        );
    }
}
