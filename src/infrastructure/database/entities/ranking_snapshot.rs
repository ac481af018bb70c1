// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ranking_snapshots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub ranking_id: Uuid,
    pub entry_count: i32,
    pub task_id: Option<Uuid>,
    pub captured_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ranking::Entity",
        from = "Column::RankingId",
        to = "super::ranking::Column::Id"
    )]
    Ranking,
    #[sea_orm(has_many = "super::ranking_snapshot_entry::Entity")]
    RankingSnapshotEntry,
}

impl Related<super::ranking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ranking.def()
    }
}

impl Related<super::ranking_snapshot_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RankingSnapshotEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
