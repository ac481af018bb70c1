// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 手动触发抓取请求DTO
///
/// 指定单个榜单key，或 all=true 触发全部启用的榜单
#[derive(Debug, Deserialize, Default)]
pub struct CrawlTriggerRequestDto {
    /// 榜单key
    pub ranking: Option<String>,
    /// 触发全部启用的榜单
    pub all: Option<bool>,
}

/// 手动触发抓取响应DTO
#[derive(Debug, Serialize)]
pub struct CrawlTriggerResponseDto {
    /// 创建的任务ID列表
    pub task_ids: Vec<Uuid>,
    /// 因已有未完成任务而被跳过的榜单key
    pub skipped: Vec<String>,
}
