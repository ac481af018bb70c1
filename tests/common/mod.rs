// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#![allow(dead_code)]

use migration::{Migrator, MigratorTrait};
use rankrs::config::settings::{
    CrawlerSettings, DatabaseSettings, SchedulerSettings, ServerSettings, Settings,
};
use rankrs::config::sources::{RankingSource, SiteSources, SourceKind};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// 内存SQLite测试数据库，已应用全部迁移
///
/// 连接池固定为单连接，保证所有查询落在同一个内存数据库上
pub async fn setup_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
    opt.max_connections(1).min_connections(1);

    let db = Database::connect(opt).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub fn test_settings() -> Settings {
    Settings {
        database: DatabaseSettings {
            url: "sqlite::memory:".to_string(),
            max_connections: Some(1),
            min_connections: Some(1),
            connect_timeout: Some(10),
            idle_timeout: Some(300),
        },
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        crawler: test_crawler_settings(),
        scheduler: test_scheduler_settings(),
    }
}

pub fn test_crawler_settings() -> CrawlerSettings {
    CrawlerSettings {
        sources_path: "urls.json".to_string(),
        delay_ms: 1,
        timeout_seconds: 5,
        max_retries: 2,
        user_agent: "rankrs-test".to_string(),
    }
}

pub fn test_scheduler_settings() -> SchedulerSettings {
    SchedulerSettings {
        tick_seconds: 1,
        workers: 0,
        lock_timeout_minutes: 30,
        task_max_retries: 3,
    }
}

/// 单个JSON榜单来源，指向给定的基础URL（wiremock）
pub fn json_source(key: &str, base_url: &str) -> SiteSources {
    SiteSources::from_sources(vec![RankingSource {
        key: key.to_string(),
        name: format!("{key} 榜"),
        url: format!("{base_url}/api/rank/{key}"),
        kind: SourceKind::Json,
        interval_minutes: 60,
        enabled: true,
        page_count: 1,
        book_url_template: Some(format!("{base_url}/book/{{id}}")),
    }])
    .expect("valid source config")
}

/// 站点JSON榜单响应体
pub fn ranking_body(entries: &[(u64, &str, &str)]) -> String {
    let list: Vec<serde_json::Value> = entries
        .iter()
        .map(|(id, title, author)| {
            serde_json::json!({
                "bookId": id,
                "title": title,
                "author": author,
                "category": "玄幻",
                "score": 9.0,
                "popularity": 1000,
                "wordCount": 500000,
                "status": "连载中"
            })
        })
        .collect();

    serde_json::json!({ "code": 0, "msg": "ok", "data": { "list": list } }).to_string()
}

/// 站点书籍详情页HTML
pub fn book_detail_body(title: &str) -> String {
    format!(
        r##"<html><body>
        <div class="book-info">
          <h1 class="book-name">{title}</h1>
          <span class="author">测试作者</span>
          <span class="category">玄幻</span>
          <span class="status">连载中</span>
          <span class="word-count">50万字</span>
          <div class="intro">测试简介。</div>
          <a class="last-chapter" href="#">第100章</a>
        </div>
        </body></html>"##
    )
}
