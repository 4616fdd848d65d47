//! User (faculty profile) entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User role enum
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "faculty")]
    Faculty,
    #[serde(rename = "hod")]
    Hod,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "misAdmin")]
    MisAdmin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Faculty, Role::Hod, Role::Admin, Role::MisAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Faculty => "faculty",
            Role::Hod => "hod",
            Role::Admin => "admin",
            Role::MisAdmin => "misAdmin",
        }
    }

    /// May manage user accounts
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::MisAdmin)
    }

    /// May comment on appraisals and change their status
    pub fn can_review(&self) -> bool {
        matches!(self, Role::Hod | Role::Admin | Role::MisAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text", unique)]
    pub email: String,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub role: String,

    #[sea_orm(column_type = "Text")]
    pub department: String,

    #[sea_orm(column_type = "Text")]
    pub designation: String,

    #[sea_orm(column_type = "Text")]
    pub employee_id: String,

    #[sea_orm(column_type = "Text")]
    pub phone: String,

    /// Argon2 PHC string
    #[sea_orm(column_type = "Text")]
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub is_active: bool,

    /// Form header (institute, department, faculty, academic year, CAS stage)
    #[sea_orm(column_type = "JsonBinary")]
    pub form_header: Json,

    /// PBAS Part A sections keyed by section name
    #[sea_orm(column_type = "JsonBinary")]
    pub part_a: Json,

    /// PBAS Part B sections keyed by section name
    #[sea_orm(column_type = "JsonBinary")]
    pub part_b: Json,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

/// Top-level form documents stored on a user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPart {
    PartA,
    PartB,
}

impl FormPart {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormPart::PartA => "part_a",
            FormPart::PartB => "part_b",
        }
    }

    /// Section keys each part accepts
    pub fn sections(&self) -> &'static [&'static str] {
        match self {
            FormPart::PartA => &[
                "personal_in",
                "academic_qualifications",
                "research_degrees",
                "employment",
                "teaching_research_experience",
                "courses_fdp",
                "teaching_student_assessment",
            ],
            FormPart::PartB => &[
                "table1",
                "table2",
                "patents_policy_awards",
                "invited_lectures",
            ],
        }
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections().contains(&section)
    }

    /// Keys a cached suggestion may write into `section`: row fields for
    /// records and tables, sub-table names for grouped sections.
    pub fn section_fields(&self, section: &str) -> &'static [&'static str] {
        match (self, section) {
            (FormPart::PartA, "personal_in") => &[
                "name",
                "department",
                "current_designation",
                "date_last_promotion",
                "level_cas",
                "designation_applied",
                "date_eligibility",
                "address",
                "telephone",
                "email",
            ],
            (FormPart::PartA, "academic_qualifications") => &[
                "examination",
                "board_university",
                "year_passing",
                "percentage",
                "division",
                "subject",
            ],
            (FormPart::PartA, "research_degrees") => &["degree", "title", "date_award", "university"],
            (FormPart::PartA, "employment") => &["prior", "posts"],
            (FormPart::PartA, "teaching_research_experience") => {
                &["pg_years", "ug_years", "research_years", "specialization"]
            }
            (FormPart::PartA, "courses_fdp") => &["name", "place", "duration", "organizer"],
            (FormPart::PartA, "teaching_student_assessment") | (FormPart::PartB, "table1") => {
                &["teaching", "activities"]
            }
            (FormPart::PartB, "table2") => &[
                "researchPapers",
                "publications",
                "ictInnovations",
                "researchGuidance",
                "researchProjects",
                "consultancyProjects",
            ],
            (FormPart::PartB, "patents_policy_awards") => &["type", "title", "year", "status", "details"],
            (FormPart::PartB, "invited_lectures") => &[
                "type",
                "title",
                "event",
                "level",
                "year",
                "organizer",
                "score",
                "verification",
                "remarks",
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for FormPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormPart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "part_a" => Ok(FormPart::PartA),
            "part_b" => Ok(FormPart::PartB),
            other => Err(other.to_string()),
        }
    }
}

impl Model {
    /// A fresh active account with empty form documents
    pub fn new_account(email: &str, name: &str, role: Role, department: &str) -> Self {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            email: email.trim().to_lowercase(),
            name: name.trim().to_string(),
            role: role.as_str().to_string(),
            department: department.to_string(),
            designation: "Faculty".to_string(),
            employee_id: String::new(),
            phone: String::new(),
            password_hash: String::new(),
            is_active: true,
            form_header: Json::Object(Default::default()),
            part_a: Json::Object(Default::default()),
            part_b: Json::Object(Default::default()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Get the role as an enum, falling back to faculty for unknown values
    pub fn user_role(&self) -> Role {
        self.role.parse().unwrap_or(Role::Faculty)
    }

    fn part(&self, part: FormPart) -> &Json {
        match part {
            FormPart::PartA => &self.part_a,
            FormPart::PartB => &self.part_b,
        }
    }

    /// Stored section, `Null` if never saved
    pub fn section(&self, part: FormPart, section: &str) -> Json {
        self.part(part).get(section).cloned().unwrap_or(Json::Null)
    }

    /// Replace one section, keeping the rest of the part
    pub fn set_section(&mut self, part: FormPart, section: &str, value: Json) {
        let doc = match part {
            FormPart::PartA => &mut self.part_a,
            FormPart::PartB => &mut self.part_b,
        };
        if !doc.is_object() {
            *doc = Json::Object(Default::default());
        }
        if let Some(map) = doc.as_object_mut() {
            map.insert(section.to_string(), value);
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::appraisal::Entity")]
    Appraisals,

    #[sea_orm(has_many = "super::publication::Entity")]
    Publications,
}

impl Related<super::appraisal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appraisals.def()
    }
}

impl Related<super::publication::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Publications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("misAdmin".parse::<Role>(), Ok(Role::MisAdmin));
        assert_eq!("hod".parse::<Role>(), Ok(Role::Hod));
        assert!("dean".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_new_account_defaults() {
        let user = Model::new_account(" Asha@College.EDU ", "Asha", Role::Hod, "Physics");
        assert_eq!(user.email, "asha@college.edu");
        assert_eq!(user.designation, "Faculty");
        assert_eq!(user.user_role(), Role::Hod);
        assert!(user.is_active);
    }

    #[test]
    fn test_section_read_write() {
        let mut user = Model::new_account("a@b.edu", "A", Role::Faculty, "CSE");
        assert_eq!(user.section(FormPart::PartA, "courses_fdp"), Json::Null);

        user.part_b = Json::Null;
        user.set_section(FormPart::PartB, "table2", serde_json::json!({"researchPapers": []}));
        assert_eq!(
            user.section(FormPart::PartB, "table2"),
            serde_json::json!({"researchPapers": []})
        );

        assert_eq!("part_b".parse::<FormPart>(), Ok(FormPart::PartB));
        assert!("part_c".parse::<FormPart>().is_err());
        assert!(FormPart::PartA.has_section("employment"));
        assert!(!FormPart::PartA.has_section("table2"));
    }

    #[test]
    fn test_every_section_has_fields() {
        for part in [FormPart::PartA, FormPart::PartB] {
            for section in part.sections() {
                assert!(!part.section_fields(section).is_empty(), "{} {}", part, section);
            }
        }
        assert!(FormPart::PartA.section_fields("academic_qualifications").contains(&"examination"));
        assert!(!FormPart::PartA.section_fields("academic_qualifications").contains(&"email"));
        assert!(FormPart::PartB.section_fields("personal_in").is_empty());
    }

    #[test]
    fn test_role_permissions() {
        assert!(Role::Admin.is_admin());
        assert!(Role::MisAdmin.is_admin());
        assert!(!Role::Hod.is_admin());
        assert!(Role::Hod.can_review());
        assert!(!Role::Faculty.can_review());
    }
}
