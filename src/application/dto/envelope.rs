// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 统一JSON响应信封
///
/// 成功时 code 为 0，data 携带负载；错误响应由 AppError 生成，
/// code 为对应的HTTP状态码
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 构造成功响应
    pub fn ok(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }
}

/// 分页查询参数
#[derive(Debug, Deserialize, Validate)]
pub struct PageQuery {
    /// 页码，从1开始
    #[validate(range(min = 1))]
    pub page: Option<u64>,
    /// 每页条目数
    #[validate(range(min = 1, max = 100))]
    pub page_size: Option<u64>,
}

impl PageQuery {
    /// 页码，默认第1页
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1)
    }

    /// 每页条目数，默认20
    pub fn page_size(&self) -> u64 {
        self.page_size.unwrap_or(20)
    }

    /// 查询偏移量
    pub fn offset(&self) -> u64 {
        (self.page().saturating_sub(1)) * self.page_size()
    }
}

/// 分页响应负载
#[derive(Debug, Serialize)]
pub struct PageDto<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}
