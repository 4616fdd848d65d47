//! Appraisal entity and its status lifecycle

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Appraisal status enum
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppraisalStatus {
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
}

impl AppraisalStatus {
    pub const ALL: [AppraisalStatus; 5] = [
        AppraisalStatus::Draft,
        AppraisalStatus::Submitted,
        AppraisalStatus::UnderReview,
        AppraisalStatus::Approved,
        AppraisalStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppraisalStatus::Draft => "draft",
            AppraisalStatus::Submitted => "submitted",
            AppraisalStatus::UnderReview => "under_review",
            AppraisalStatus::Approved => "approved",
            AppraisalStatus::Rejected => "rejected",
        }
    }

    /// Faculty may (re)submit only from these states
    pub fn can_submit(&self) -> bool {
        matches!(self, AppraisalStatus::Draft | AppraisalStatus::Rejected)
    }
}

impl fmt::Display for AppraisalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppraisalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppraisalStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "appraisals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub faculty_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub academic_year: String,

    #[sea_orm(column_type = "Text")]
    pub status: String,

    #[sea_orm(column_type = "JsonBinary")]
    pub self_assessment: Json,

    #[sea_orm(column_type = "JsonBinary")]
    pub teaching_activities: Json,

    #[sea_orm(column_type = "JsonBinary")]
    pub research_activities: Json,

    #[sea_orm(column_type = "JsonBinary")]
    pub service_activities: Json,

    #[sea_orm(column_type = "JsonBinary")]
    pub professional_development: Json,

    #[sea_orm(column_type = "JsonBinary")]
    pub goals_achievements: Json,

    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub llm_analysis: Option<Json>,

    pub submitted_at: Option<DateTimeWithTimeZone>,

    pub reviewed_at: Option<DateTimeWithTimeZone>,

    pub approved_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Get the status as an enum
    pub fn appraisal_status(&self) -> AppraisalStatus {
        self.status.parse().unwrap_or(AppraisalStatus::Draft)
    }

    /// Overall score recorded by the last analysis, if any
    pub fn overall_score(&self) -> Option<f64> {
        self.llm_analysis
            .as_ref()
            .and_then(|analysis| analysis.get("overall_score"))
            .and_then(|score| score.as_f64())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::FacultyId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Faculty,

    #[sea_orm(has_many = "super::admin_comment::Entity")]
    Comments,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Faculty.def()
    }
}

impl Related<super::admin_comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
