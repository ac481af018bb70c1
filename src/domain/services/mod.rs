// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务，这些服务封装了复杂的
/// 业务规则和领域逻辑，协调多个领域对象来完成业务操作。
///
/// 包含的服务：
/// - 抓取服务（crawl_service）：fetch→parse→persist流水线
/// - 榜单服务（ranking_service）：榜单展示与趋势聚合查询
/// - 书籍服务（book_service）：书籍详情与趋势聚合查询
pub mod book_service;
pub mod crawl_service;
pub mod ranking_service;
