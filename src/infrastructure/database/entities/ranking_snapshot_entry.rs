// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ranking_snapshot_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub snapshot_id: Uuid,
    pub position: i32,
    pub book_id: Uuid,
    #[sea_orm(column_type = "Double", nullable)]
    pub score: Option<f64>,
    pub popularity: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ranking_snapshot::Entity",
        from = "Column::SnapshotId",
        to = "super::ranking_snapshot::Column::Id"
    )]
    RankingSnapshot,
}

impl Related<super::ranking_snapshot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RankingSnapshot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
