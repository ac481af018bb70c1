// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::book_dto::{
    BookDetailDto, BookDto, BookListQuery, BookTrendDto,
};
use crate::application::dto::envelope::{ApiResponse, PageDto};
use crate::application::dto::ranking_dto::TrendQuery;
use crate::domain::repositories::book_repository::{BookQueryParams, BookRepository};
use crate::domain::repositories::ranking_repository::RankingRepository;
use crate::domain::services::book_service::BookService;
use crate::presentation::errors::AppError;
use axum::extract::{Extension, Path, Query};
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 书籍列表处理器
///
/// 支持标题/作者关键字、分类与连载状态过滤，按更新时间倒序
pub async fn list_books<B: BookRepository>(
    Extension(book_repo): Extension<Arc<B>>,
    Query(query): Query<BookListQuery>,
) -> Result<Json<ApiResponse<PageDto<BookDto>>>, AppError> {
    if let Err(errors) = query.validate() {
        return Err(AppError::from(anyhow::anyhow!(
            "Validation error: {:?}",
            errors
        )));
    }

    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(20);

    let (books, total) = book_repo
        .query_books(BookQueryParams {
            keyword: query.keyword,
            category: query.category,
            status: query.status,
            limit: page_size,
            offset: (page - 1) * page_size,
        })
        .await?;

    Ok(Json(ApiResponse::ok(PageDto {
        items: books.into_iter().map(BookDto::from).collect(),
        total,
        page,
        page_size,
    })))
}

/// 书籍详情处理器
pub async fn get_book<B: BookRepository, K: RankingRepository>(
    Extension(book_service): Extension<Arc<BookService<B, K>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookDetailDto>>, AppError> {
    let (book, snapshot) = book_service
        .detail(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("book {} not found", id)))?;

    Ok(Json(ApiResponse::ok(BookDetailDto {
        book: book.into(),
        latest_snapshot: snapshot.map(Into::into),
    })))
}

/// 书籍趋势处理器
///
/// 返回时间窗口内的评分/人气快照序列和榜单名次序列
pub async fn get_book_trend<B: BookRepository, K: RankingRepository>(
    Extension(book_repo): Extension<Arc<B>>,
    Extension(book_service): Extension<Arc<BookService<B, K>>>,
    Path(id): Path<Uuid>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<ApiResponse<BookTrendDto>>, AppError> {
    if let Err(errors) = query.validate() {
        return Err(AppError::from(anyhow::anyhow!(
            "Validation error: {:?}",
            errors
        )));
    }

    if book_repo.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found(format!("book {} not found", id)));
    }

    let trend = book_service.trend(id, query.days()).await?;
    Ok(Json(ApiResponse::ok(BookTrendDto {
        snapshots: trend.snapshots.into_iter().map(Into::into).collect(),
        positions: trend.positions.into_iter().map(Into::into).collect(),
    })))
}
