//! Reviewer comment entity. Rows are append-only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentType {
    #[default]
    General,
    Suggestion,
    Concern,
    Approval,
}

impl CommentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentType::General => "general",
            CommentType::Suggestion => "suggestion",
            CommentType::Concern => "concern",
            CommentType::Approval => "approval",
        }
    }
}

impl fmt::Display for CommentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(CommentType::General),
            "suggestion" => Ok(CommentType::Suggestion),
            "concern" => Ok(CommentType::Concern),
            "approval" => Ok(CommentType::Approval),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admin_comments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub appraisal_id: Uuid,

    pub admin_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub comment: String,

    #[sea_orm(column_type = "Text")]
    pub comment_type: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::appraisal::Entity",
        from = "Column::AppraisalId",
        to = "super::appraisal::Column::Id",
        on_delete = "Cascade"
    )]
    Appraisal,
}

impl Related<super::appraisal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appraisal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
