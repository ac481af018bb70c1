// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::envelope::{ApiResponse, PageQuery};
use crate::application::dto::ranking_dto::{
    BoardDto, RankingDto, RankingListQuery, RankingTrendPointDto, TrendQuery,
};
use crate::domain::repositories::book_repository::BookRepository;
use crate::domain::repositories::ranking_repository::RankingRepository;
use crate::domain::services::ranking_service::RankingService;
use crate::presentation::errors::AppError;
use axum::extract::{Extension, Path, Query};
use axum::Json;
use std::sync::Arc;
use validator::Validate;

/// 榜单列表处理器
pub async fn list_rankings<K: RankingRepository>(
    Extension(ranking_repo): Extension<Arc<K>>,
    Query(query): Query<RankingListQuery>,
) -> Result<Json<ApiResponse<Vec<RankingDto>>>, AppError> {
    let rankings = ranking_repo.list(query.enabled.unwrap_or(false)).await?;
    let dtos = rankings.into_iter().map(RankingDto::from).collect();
    Ok(Json(ApiResponse::ok(dtos)))
}

/// 榜单详情处理器
pub async fn get_ranking<K: RankingRepository>(
    Extension(ranking_repo): Extension<Arc<K>>,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<RankingDto>>, AppError> {
    let ranking = ranking_repo
        .find_by_key(&key)
        .await?
        .ok_or_else(|| AppError::not_found(format!("ranking '{}' not found", key)))?;
    Ok(Json(ApiResponse::ok(ranking.into())))
}

/// 榜单最新一期处理器
///
/// 返回最新快照的分页条目，带相对上一期的名次变化
pub async fn get_ranking_books<K: RankingRepository, B: BookRepository>(
    Extension(ranking_repo): Extension<Arc<K>>,
    Extension(ranking_service): Extension<Arc<RankingService<K, B>>>,
    Path(key): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<BoardDto>>, AppError> {
    if let Err(errors) = page.validate() {
        return Err(AppError::from(anyhow::anyhow!(
            "Validation error: {:?}",
            errors
        )));
    }

    let ranking = ranking_repo
        .find_by_key(&key)
        .await?
        .ok_or_else(|| AppError::not_found(format!("ranking '{}' not found", key)))?;

    let board = ranking_service
        .latest_board(&ranking, page.page(), page.page_size())
        .await?
        .ok_or_else(|| AppError::not_found(format!("ranking '{}' has no snapshot yet", key)))?;

    Ok(Json(ApiResponse::ok(BoardDto {
        captured_at: board.snapshot.captured_at,
        entries: board.entries.into_iter().map(Into::into).collect(),
        total: board.total,
        page: page.page(),
        page_size: page.page_size(),
    })))
}

/// 榜单趋势处理器
pub async fn get_ranking_trend<K: RankingRepository, B: BookRepository>(
    Extension(ranking_repo): Extension<Arc<K>>,
    Extension(ranking_service): Extension<Arc<RankingService<K, B>>>,
    Path(key): Path<String>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<ApiResponse<Vec<RankingTrendPointDto>>>, AppError> {
    if let Err(errors) = query.validate() {
        return Err(AppError::from(anyhow::anyhow!(
            "Validation error: {:?}",
            errors
        )));
    }

    let ranking = ranking_repo
        .find_by_key(&key)
        .await?
        .ok_or_else(|| AppError::not_found(format!("ranking '{}' not found", key)))?;

    let trend = ranking_service.trend(ranking.id, query.days()).await?;
    Ok(Json(ApiResponse::ok(
        trend.into_iter().map(Into::into).collect(),
    )))
}
