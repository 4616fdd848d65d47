//! Static catalogue of PBAS form fields known to the field mapper

use serde::Serialize;

/// One fillable form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub id: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub sample: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<&'static str>,
}

const fn field(
    id: &'static str,
    label: &'static str,
    kind: &'static str,
    sample: &'static str,
    group: Option<&'static str>,
) -> FieldSpec {
    FieldSpec { id, label, kind, sample, group }
}

/// Ids may repeat across groups (e.g. `organizer`); lookups use the first entry.
pub static FIELD_SCHEMA: &[FieldSpec] = &[
    field("institute_name", "Name of the Institute / College", "text", "Mumbai University", None),
    field("department_name", "Name of the Department", "text", "Computer Science", None),
    field("cas_promotion_stage", "Under CAS Promotion for Stage/Level For", "text", "Stage 2 to 3", None),
    field("faculty_name", "Faculty of", "text", "Science and Technology", None),
    field("academic_year", "ACADEMIC YEAR", "text", "2023-2024", None),
    field("name", "Name (in Block Letters)", "text", "JOHN DOE", Some("personal_info")),
    field("department", "Department", "text", "Computer Science", Some("personal_info")),
    field("current_designation", "Current Designation & Academic Level", "text", "Assistant Professor, Level 10", Some("personal_info")),
    field("date_last_promotion", "Date of last Promotion Current position and Academic", "date", "2020-05-15", Some("personal_info")),
    field("current_level_cas", "Level of an applicant under CAS", "text", "Level 10", Some("personal_info")),
    field("designation_applied", "The designation and grade pay applied for under CAS", "text", "Associate Professor, Level 12", Some("personal_info")),
    field("date_eligibility", "Date of eligibility for promotion", "date", "2023-06-01", Some("personal_info")),
    field("address", "Address (with Pin code)", "textarea", "123 Main St, Mumbai, Maharashtra, 400001", Some("personal_info")),
    field("telephone", "Telephone/ Mobile No.", "tel", "+91 9876543210", Some("personal_info")),
    field("email", "E-mail", "email", "john.doe@example.com", Some("personal_info")),
    field("examination", "Examinations", "text", "SSC", Some("academic_qualifications")),
    field("board_university", "Name of the Board/ University", "text", "Maharashtra State Board", Some("academic_qualifications")),
    field("year_passing", "Year of Passing", "number", "2005", Some("academic_qualifications")),
    field("percentage", "Percentage Of Marks Obtained", "number", "85.5", Some("academic_qualifications")),
    field("division", "Division I Class I Grade", "text", "First Class", Some("academic_qualifications")),
    field("subject", "Subject", "text", "Mathematics", Some("academic_qualifications")),
    field("degree", "Degrees", "select", "Ph.D.", Some("research_degrees")),
    field("title", "Title", "text", "Advanced Algorithms in Computer Science", Some("research_degrees")),
    field("date_award", "Date of Award", "date", "2018-12-20", Some("research_degrees")),
    field("university", "Name of University", "text", "University of Mumbai", Some("research_degrees")),
    field("course_name", "Name of the Course", "text", "Advanced Data Structures", Some("hrd_courses")),
    field("place", "Place", "text", "Mumbai", Some("hrd_courses")),
    field("duration", "Duration", "text", "5 days", Some("hrd_courses")),
    field("organizer", "Name of Organizer", "text", "IIT Bombay", Some("hrd_courses")),
    field("title_paper", "Title Of paper", "text", "Advances in AI", Some("research_papers")),
    field("journal_details", "Journal Name, Page nos., Vol. no., Issue no., Year of publication", "text", "Journal of AI, pp. 1-10, Vol. 5, Issue 2, 2023", Some("research_papers")),
    field("issn_isbn", "ISSN/ ISBN NO.", "text", "1234-5678", Some("research_papers")),
    field("impact_factor", "Impact Factor if any", "number", "2.5", Some("research_papers")),
    field("no_coauthors", "No. of Co-Authors", "number", "2", Some("research_papers")),
    field("author_type", "Whether Principal Author Supervisor Co-supervisor", "select", "Principal Author", Some("research_papers")),
    field("self_appraisal_score", "Self-Appraisal Score", "number", "10", Some("research_papers")),
    field("api_score_verified", "API Score Verified", "number", "10", Some("research_papers")),
    field("page_no_documents", "Page No. Of Relevant Documents", "text", "5", Some("research_papers")),
    field("title_patent", "Title of patent Project", "text", "AI-Based Diagnostic Tool", Some("patents")),
    field("patent_number", "Patent Number", "text", "IN123456", Some("patents")),
    field("sponsored_agency", "Sponsored Agency if any", "text", "DST", Some("patents")),
    field("date_award", "Date of Award", "date", "2023-11-15", Some("patents")),
    field("patent_type", "International/ National", "select", "National", Some("patents")),
    field("self_appraisal_score", "Self-Appraisal Score", "number", "7", Some("patents")),
    field("api_score_verified", "API Score Verified", "number", "7", Some("patents")),
    field("page_no_documents", "Page No. of Relevant Documents", "text", "22", Some("patents")),
    field("title_presentation", "Title of Presentation in Academic Session", "text", "Future of AI in Education", Some("invited_lectures")),
    field("title_conference", "Title of Conference / Seminar", "text", "International AI Conference 2024", Some("invited_lectures")),
    field("presentation_mode", "Mode of Presentation: Invited lectures / Resource Person / Paper presentation", "select", "Invited lectures", Some("invited_lectures")),
    field("organizer", "Name of Organizer", "text", "IEEE", Some("invited_lectures")),
    field("conference_level", "Whether International (Abroad)/ International (within Country) /National /State / University Level", "select", "International (Abroad)", Some("invited_lectures")),
    field("self_appraisal_score", "Self-Appraisal Score", "number", "7", Some("invited_lectures")),
    field("api_score_verified", "API Score Verified", "number", "7", Some("invited_lectures")),
    field("page_no_documents", "Page No. of Relevant Documents", "text", "25", Some("invited_lectures")),
    field("enclosures_list", "List of Enclosures", "textarea", "Certificates, Letters, Sanction Orders, Papers", None),
    field("faculty_signature_date", "Signature of the faculty with Designation - Date", "date", "2024-05-01", None),
    field("faculty_signature_place", "Signature of the faculty with Designation - Place", "text", "Mumbai", None),
    field("hod_signature_date", "Head of Department - Date", "date", "2024-05-02", None),
    field("hod_signature_place", "Head of Department - Place", "text", "Mumbai", None),
    field("iqac_verification_date", "Verified by IQAC - Date", "date", "2024-05-03", None),
    field("iqac_verification_place", "Verified by IQAC - Place", "text", "Mumbai", None),
];

/// Look up a field by id
pub fn find(id: &str) -> Option<&'static FieldSpec> {
    FIELD_SCHEMA.iter().find(|f| f.id == id)
}

pub fn is_known(id: &str) -> bool {
    find(id).is_some()
}

/// Distinct fields in catalogue order
pub fn distinct() -> impl Iterator<Item = &'static FieldSpec> {
    FIELD_SCHEMA
        .iter()
        .enumerate()
        .filter(|(i, f)| !FIELD_SCHEMA[..*i].iter().any(|g| g.id == f.id))
        .map(|(_, f)| f)
}
