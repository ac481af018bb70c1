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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含数据库、服务器、抓取和调度等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 抓取配置
    pub crawler: CrawlerSettings,
    /// 调度配置
    pub scheduler: SchedulerSettings,
}

/// 数据库配置设置
#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 服务器配置设置
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 抓取配置设置
#[derive(Debug, Deserialize)]
pub struct CrawlerSettings {
    /// 站点配置文件路径 (urls.json)
    pub sources_path: String,
    /// 请求之间的固定延迟（毫秒）
    pub delay_ms: u64,
    /// 单个请求超时时间（秒）
    pub timeout_seconds: u64,
    /// 请求失败最大重试次数
    pub max_retries: u32,
    /// 请求User-Agent
    pub user_agent: String,
}

/// 调度配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSettings {
    /// 调度器检查周期（秒）
    pub tick_seconds: u64,
    /// 抓取工作进程数量
    pub workers: usize,
    /// 任务锁超时时间（分钟），超时后任务视为卡住
    pub lock_timeout_minutes: i64,
    /// 任务最大重试次数
    pub task_max_retries: i32,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default DB pool settings
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 2)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default crawler settings
            .set_default("crawler.sources_path", "urls.json")?
            .set_default("crawler.delay_ms", 1000)?
            .set_default("crawler.timeout_seconds", 15)?
            .set_default("crawler.max_retries", 3)?
            .set_default(
                "crawler.user_agent",
                "Mozilla/5.0 (compatible; rankrs/0.1; +https://github.com/Kirky-X/rankrs)",
            )?
            // Default scheduler settings
            .set_default("scheduler.tick_seconds", 30)?
            .set_default("scheduler.workers", 2)?
            .set_default("scheduler.lock_timeout_minutes", 30)?
            .set_default("scheduler.task_max_retries", 3)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("RANKRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}
