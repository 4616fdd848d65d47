//! Printable HTML reports
//!
//! Self-contained documents with inline CSS, meant for the browser's print
//! dialog. Every interpolated value goes through [`escape_html`].

use crate::db::models::{Appraisal, AppraisalStatus, FormPart, Publication, User};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

/// Escape text for HTML element and attribute content
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const BASE_STYLE: &str = r#"
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body { font-family: 'Times New Roman', serif; line-height: 1.6; color: #333; max-width: 210mm; margin: 0 auto; padding: 20mm; background: white; }
    .header { text-align: center; border-bottom: 3px solid #2B2D42; padding-bottom: 20px; margin-bottom: 30px; }
    .header h1 { color: #2B2D42; font-size: 24px; margin-bottom: 10px; }
    .header h2 { color: #8D99AE; font-size: 18px; font-weight: normal; }
    .footer { margin-top: 50px; padding-top: 20px; border-top: 2px solid #EDF2F4; text-align: center; color: #8D99AE; font-size: 12px; }
    @media print { body { margin: 0; padding: 15mm; } .header { page-break-after: avoid; } .section { page-break-inside: avoid; } }
"#;

const APPRAISAL_STYLE: &str = r#"
    .faculty-info { background: #EDF2F4; padding: 20px; border-radius: 8px; margin-bottom: 30px; }
    .faculty-info h3 { color: #2B2D42; margin-bottom: 15px; font-size: 18px; }
    .info-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 15px; }
    .info-item { display: flex; flex-direction: column; }
    .info-label { font-weight: bold; color: #2B2D42; margin-bottom: 5px; }
    .info-value { color: #666; }
    .section { margin-bottom: 30px; page-break-inside: avoid; }
    .section h3 { color: #2B2D42; font-size: 18px; margin-bottom: 15px; padding-bottom: 8px; border-bottom: 2px solid #EDF2F4; }
    .subsection { margin-bottom: 20px; }
    .subsection h4 { color: #8D99AE; font-size: 14px; margin-bottom: 10px; text-transform: uppercase; letter-spacing: 1px; }
    .data-list { list-style: none; padding-left: 0; }
    .data-list li { padding: 8px 0; border-bottom: 1px solid #EDF2F4; }
    .score-badge { display: inline-block; background: #2B2D42; color: white; padding: 5px 15px; border-radius: 20px; font-weight: bold; margin-left: 10px; }
    .publications-table { width: 100%; border-collapse: collapse; margin-top: 15px; }
    .publications-table th, .publications-table td { padding: 12px; text-align: left; border-bottom: 1px solid #EDF2F4; }
    .publications-table th { background: #2B2D42; color: white; }
    .analysis-section { background: #f8f9fa; padding: 20px; border-radius: 8px; border-left: 4px solid #EF233C; }
"#;

const PBAS_STYLE: &str = r#"
    .faculty-info { background: #EDF2F4; padding: 20px; border-radius: 8px; margin-bottom: 30px; }
    .info-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 15px; margin-bottom: 10px; }
    .info-item { display: flex; flex-direction: column; }
    .info-label { font-weight: bold; color: #2B2D42; margin-bottom: 5px; }
    .info-value { color: #666; }
    .part h2 { color: #2B2D42; font-size: 20px; margin: 30px 0 15px; }
    .section { margin-bottom: 25px; page-break-inside: avoid; }
    .section h3 { color: #2B2D42; font-size: 16px; margin-bottom: 10px; padding-bottom: 6px; border-bottom: 2px solid #EDF2F4; }
    .section h4 { color: #8D99AE; font-size: 13px; margin: 10px 0 6px; text-transform: uppercase; letter-spacing: 1px; }
    .form-table { width: 100%; border-collapse: collapse; font-size: 13px; }
    .form-table th, .form-table td { padding: 6px 8px; text-align: left; border: 1px solid #D9DEE2; }
    .form-table th { background: #2B2D42; color: white; }
    .empty { color: #8D99AE; font-style: italic; }
"#;

const SUMMARY_STYLE: &str = r#"
    .stats-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin-bottom: 30px; }
    .stat-card { background: #EDF2F4; padding: 20px; border-radius: 8px; text-align: center; }
    .stat-number { font-size: 32px; font-weight: bold; color: #2B2D42; margin-bottom: 5px; }
    .stat-label { color: #8D99AE; font-size: 14px; }
"#;

fn document(title: &str, style: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>{}</title>\n  <style>{}{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        BASE_STYLE,
        style,
        body
    )
}

/// Display form of a scalar JSON value; `None` for null, empty and containers
fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(escape_html(s)),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn list_items(value: Option<&Value>, empty: &str) -> String {
    let items: Vec<String> = value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(|item| scalar(Some(item))).collect())
        .unwrap_or_default();

    if items.is_empty() {
        return format!("<li>{}</li>", empty);
    }
    items.iter().map(|item| format!("<li>{}</li>", item)).collect()
}

fn info_item(label: &str, value: &str) -> String {
    format!(
        r#"<div class="info-item"><span class="info-label">{}:</span><span class="info-value">{}</span></div>"#,
        label,
        escape_html(value)
    )
}

fn publications_table(publications: &[Publication]) -> String {
    if publications.is_empty() {
        return String::new();
    }

    let mut rows = String::new();
    for publication in publications {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&publication.title),
            escape_html(publication.venue.as_deref().unwrap_or("")),
            publication.year.map(|y| y.to_string()).unwrap_or_default(),
            publication.citations
        );
    }

    format!(
        r#"<div class="subsection">
      <h4>Publications</h4>
      <table class="publications-table">
        <thead><tr><th>Title</th><th>Venue</th><th>Year</th><th>Citations</th></tr></thead>
        <tbody>{}</tbody>
      </table>
    </div>"#,
        rows
    )
}

fn analysis_section(analysis: &Value) -> String {
    let score = scalar(analysis.get("overall_score")).unwrap_or_else(|| "N/A".to_string());
    let summary = scalar(analysis.get("summary")).unwrap_or_else(|| "No summary available".to_string());

    format!(
        r#"<div class="section">
    <h3>AI Analysis &amp; Recommendations</h3>
    <div class="analysis-section">
      <p><strong>Overall Score:</strong> <span class="score-badge">{score}/100</span></p>
      <div class="subsection"><h4>Key Insights</h4><ul>{insights}</ul></div>
      <div class="subsection"><h4>Strengths</h4><ul>{strengths}</ul></div>
      <div class="subsection"><h4>Recommendations for Improvement</h4><ul>{recommendations}</ul></div>
      <div class="subsection"><h4>Summary</h4><p>{summary}</p></div>
    </div>
  </div>"#,
        score = score,
        insights = list_items(analysis.get("insights"), "No insights available"),
        strengths = list_items(analysis.get("strengths"), "No strengths identified"),
        recommendations = list_items(analysis.get("recommendations"), "No recommendations available"),
        summary = summary,
    )
}

/// Full appraisal report for one faculty member
pub fn render_appraisal(
    faculty: &User,
    appraisal: &Appraisal,
    publications: &[Publication],
    generated_at: DateTime<Utc>,
) -> String {
    let teaching = &appraisal.teaching_activities;
    let research = &appraisal.research_activities;
    let service = &appraisal.service_activities;

    let body = format!(
        r#"  <div class="header">
    <h1>Faculty Appraisal Report</h1>
    <h2>Academic Year {year}</h2>
  </div>
  <div class="faculty-info">
    <h3>Faculty Information</h3>
    <div class="info-grid">{name}{employee_id}{department}{designation}</div>
  </div>
  <div class="section">
    <h3>Teaching Performance</h3>
    <div class="subsection"><h4>Courses Taught</h4><ul class="data-list">{courses}</ul></div>
    <div class="subsection"><h4>Student Feedback</h4><p>Average Rating: <span class="score-badge">{feedback}/5.0</span></p></div>
    <div class="subsection"><h4>Teaching Innovations</h4><p>{innovations}</p></div>
  </div>
  <div class="section">
    <h3>Research Performance</h3>
    <div class="subsection">
      <h4>Research Metrics</h4>
      <ul class="data-list">
        <li>Publications: {publications_count}</li>
        <li>Grants Received: {grants}</li>
        <li>Conferences Attended: {conferences}</li>
      </ul>
    </div>
    {publications}
  </div>
  <div class="section">
    <h3>Service Performance</h3>
    <div class="subsection"><h4>Committee Memberships</h4><ul class="data-list">{committees}</ul></div>
    <div class="subsection"><h4>Administrative Roles</h4><ul class="data-list">{roles}</ul></div>
    <div class="subsection"><h4>Outreach Activities</h4><p>Number of activities: {outreach}</p></div>
  </div>
  {analysis}
  <div class="footer">
    <p>Generated on {generated} by Shikshak Sarthi Faculty Appraisal System</p>
    <p>This is a computer-generated document and does not require a signature.</p>
  </div>"#,
        year = escape_html(&appraisal.academic_year),
        name = info_item("Name", &faculty.name),
        employee_id = info_item("Employee ID", &faculty.employee_id),
        department = info_item("Department", &faculty.department),
        designation = info_item("Designation", &faculty.designation),
        courses = list_items(teaching.get("courses_taught"), "No data available"),
        feedback = scalar(teaching.get("student_feedback")).unwrap_or_else(|| "N/A".to_string()),
        innovations = scalar(teaching.get("innovations"))
            .unwrap_or_else(|| "No innovations reported".to_string()),
        publications_count = scalar(research.get("publications_count")).unwrap_or_else(|| "0".to_string()),
        grants = scalar(research.get("grants_received")).unwrap_or_else(|| "0".to_string()),
        conferences = scalar(research.get("conferences_attended")).unwrap_or_else(|| "0".to_string()),
        publications = publications_table(publications),
        committees = list_items(service.get("committees"), "No committee memberships reported"),
        roles = list_items(service.get("administrative_roles"), "No administrative roles reported"),
        outreach = scalar(service.get("outreach_activities")).unwrap_or_else(|| "0".to_string()),
        analysis = appraisal
            .llm_analysis
            .as_ref()
            .filter(|a| a.is_object())
            .map(analysis_section)
            .unwrap_or_default(),
        generated = generated_at.format("%d %b %Y"),
    );

    document(
        &format!("Appraisal Report - {}", faculty.name),
        APPRAISAL_STYLE,
        &body,
    )
}

/// `researchPapers` and `date_award` both become sentence-cased labels
fn label(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c == '_' {
            out.push(' ');
        } else if c.is_uppercase() && i > 0 {
            out.push(' ');
            out.extend(c.to_lowercase());
        } else if i == 0 {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    escape_html(&out)
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Columns in first-seen order across every record row
fn table(rows: &[&serde_json::Map<String, Value>]) -> String {
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut html = String::from(r#"<table class="form-table"><thead><tr><th>#</th>"#);
    for column in &columns {
        let _ = write!(html, "<th>{}</th>", label(column));
    }
    html.push_str("</tr></thead><tbody>");
    for (i, row) in rows.iter().enumerate() {
        let _ = write!(html, "<tr><td>{}</td>", i + 1);
        for column in &columns {
            let cell = match row.get(*column) {
                Some(nested @ (Value::Array(_) | Value::Object(_))) => form_value(nested),
                other => scalar(other).unwrap_or_default(),
            };
            let _ = write!(html, "<td>{}</td>", cell);
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

/// Records become tables, objects become label grids, scalars are escaped text
fn form_value(value: &Value) -> String {
    if is_empty(value) {
        return r#"<p class="empty">No data provided</p>"#.to_string();
    }

    match value {
        Value::Array(items) => {
            let records: Vec<_> = items.iter().filter_map(Value::as_object).collect();
            let mut html = String::new();
            if !records.is_empty() {
                html.push_str(&table(&records));
            }
            let others: String = items
                .iter()
                .filter(|item| !item.is_object())
                .filter_map(|item| scalar(Some(item)))
                .map(|item| format!("<li>{}</li>", item))
                .collect();
            if !others.is_empty() {
                let _ = write!(html, "<ul>{}</ul>", others);
            }
            html
        }
        Value::Object(map) => {
            let mut grid = String::new();
            let mut nested = String::new();
            for (key, field) in map {
                match field {
                    Value::Array(_) | Value::Object(_) => {
                        let _ = write!(nested, "<h4>{}</h4>{}", label(key), form_value(field));
                    }
                    other => {
                        let text = scalar(Some(other)).unwrap_or_default();
                        let _ = write!(
                            grid,
                            r#"<div class="info-item"><span class="info-label">{}:</span><span class="info-value">{}</span></div>"#,
                            label(key),
                            text
                        );
                    }
                }
            }
            if grid.is_empty() {
                nested
            } else {
                format!(r#"<div class="info-grid">{}</div>{}"#, grid, nested)
            }
        }
        other => format!("<p>{}</p>", scalar(Some(other)).unwrap_or_default()),
    }
}

/// The faculty member's filled PBAS form: header, then every Part A and
/// Part B section in form order
pub fn render_pbas_form(user: &User, generated_at: DateTime<Utc>) -> String {
    let header = |key: &str| {
        user.form_header
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    let department = header("department_name").unwrap_or_else(|| user.department.clone());
    let academic_year = header("academic_year").unwrap_or_default();

    let mut parts = String::new();
    for (part, title) in [
        (FormPart::PartA, "Part A: General Information"),
        (FormPart::PartB, "Part B: Academic Performance Indicators"),
    ] {
        let _ = write!(parts, r#"<div class="part"><h2>{}</h2>"#, title);
        for section in part.sections() {
            let _ = write!(
                parts,
                r#"<div class="section"><h3>{}</h3>{}</div>"#,
                label(section),
                form_value(&user.section(part, section))
            );
        }
        parts.push_str("</div>");
    }

    let body = format!(
        r#"  <div class="header">
    <h1>Performance Based Appraisal System (PBAS) Form</h1>
    <h2>{institute}{year}</h2>
  </div>
  <div class="faculty-info">
    <div class="info-grid">{name}{email}{department}{faculty}{designation}{stage}</div>
  </div>
  {parts}
  <div class="footer">
    <p>Generated on {generated} by Shikshak Sarthi Faculty Appraisal System</p>
  </div>"#,
        institute = escape_html(&header("institute_name").unwrap_or_default()),
        year = if academic_year.is_empty() {
            String::new()
        } else {
            format!(" - Academic Year {}", escape_html(&academic_year))
        },
        name = info_item("Name", &user.name),
        email = info_item("Email", &user.email),
        department = info_item("Department", &department),
        faculty = info_item("Faculty", &header("faculty_name").unwrap_or_default()),
        designation = info_item("Designation", &user.designation),
        stage = info_item("CAS Stage", &header("cas_promotion_stage").unwrap_or_default()),
        parts = parts,
        generated = generated_at.format("%d %b %Y"),
    );

    document(&format!("PBAS Form - {}", user.name), PBAS_STYLE, &body)
}

/// Aggregate appraisal statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_appraisals: usize,
    pub submitted_appraisals: usize,
    pub approved_appraisals: usize,
    /// Mean analysis score over appraisals that have one, one decimal
    pub average_score: f64,
}

impl SummaryStats {
    /// Submitted counts everything that has left draft.
    pub fn from_appraisals(appraisals: &[Appraisal]) -> Self {
        let submitted = appraisals
            .iter()
            .filter(|a| a.appraisal_status() != AppraisalStatus::Draft)
            .count();
        let approved = appraisals
            .iter()
            .filter(|a| a.appraisal_status() == AppraisalStatus::Approved)
            .count();

        let scores: Vec<f64> = appraisals.iter().filter_map(Appraisal::overall_score).collect();
        let average_score = if scores.is_empty() {
            0.0
        } else {
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            (mean * 10.0).round() / 10.0
        };

        Self {
            total_appraisals: appraisals.len(),
            submitted_appraisals: submitted,
            approved_appraisals: approved,
            average_score,
        }
    }
}

pub fn render_summary(stats: &SummaryStats, generated_at: DateTime<Utc>) -> String {
    let card = |number: String, label: &str| {
        format!(
            r#"<div class="stat-card"><div class="stat-number">{}</div><div class="stat-label">{}</div></div>"#,
            number, label
        )
    };

    let body = format!(
        r#"  <div class="header">
    <h1>Faculty Appraisal Analytics Report</h1>
    <h2>Generated on {}</h2>
  </div>
  <div class="stats-grid">{}{}{}{}</div>
  <div class="footer"><p>Generated by Shikshak Sarthi Faculty Appraisal System</p></div>"#,
        generated_at.format("%d %b %Y"),
        card(stats.total_appraisals.to_string(), "Total Appraisals"),
        card(stats.submitted_appraisals.to_string(), "Submitted"),
        card(stats.approved_appraisals.to_string(), "Approved"),
        card(stats.average_score.to_string(), "Average Score"),
    );

    document("Appraisal Analytics Report", SUMMARY_STYLE, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn faculty() -> User {
        let now = Utc::now().fixed_offset();
        User {
            id: Uuid::new_v4(),
            email: "asha@college.edu".into(),
            name: "Asha <Rao>".into(),
            role: "faculty".into(),
            department: "Physics".into(),
            designation: "Assistant Professor".into(),
            employee_id: "EMP-7".into(),
            phone: String::new(),
            password_hash: String::new(),
            is_active: true,
            form_header: json!({}),
            part_a: json!({}),
            part_b: json!({}),
            created_at: now,
            updated_at: now,
        }
    }

    fn appraisal(status: &str, analysis: Option<Value>) -> Appraisal {
        let now = Utc::now().fixed_offset();
        Appraisal {
            id: Uuid::new_v4(),
            faculty_id: Uuid::new_v4(),
            title: "Annual".into(),
            academic_year: "2023-24".into(),
            status: status.into(),
            self_assessment: json!({}),
            teaching_activities: json!({
                "courses_taught": ["Optics", "Mechanics"],
                "student_feedback": 4.5
            }),
            research_activities: json!({ "publications_count": 3 }),
            service_activities: json!({}),
            professional_development: json!({}),
            goals_achievements: json!({}),
            llm_analysis: analysis,
            submitted_at: None,
            reviewed_at: None,
            approved_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_appraisal_report_sections() {
        let html = render_appraisal(&faculty(), &appraisal("draft", None), &[], Utc::now());
        assert!(html.contains("Academic Year 2023-24"));
        assert!(html.contains("Asha &lt;Rao&gt;"));
        assert!(html.contains("<li>Optics</li>"));
        assert!(html.contains("4.5/5.0"));
        assert!(html.contains("Publications: 3"));
        assert!(html.contains("Grants Received: 0"));
        assert!(html.contains("No committee memberships reported"));
        assert!(!html.contains("publications-table\">"));
        assert!(!html.contains("Overall Score"));
    }

    #[test]
    fn test_appraisal_report_with_analysis_and_publications() {
        let analysis = json!({
            "overall_score": 91,
            "insights": ["<b>strong</b>"],
            "summary": "Good year"
        });
        let publication = Publication {
            id: Uuid::new_v4(),
            faculty_id: Uuid::new_v4(),
            title: "Quantum Dots".into(),
            authors: json!(["A"]),
            venue: Some("IEEE Access".into()),
            year: Some(2022),
            citations: 12,
            url: None,
            abstract_text: None,
            source: "manual".into(),
            metadata: json!({}),
            created_at: Utc::now().fixed_offset(),
        };

        let html = render_appraisal(
            &faculty(),
            &appraisal("approved", Some(analysis)),
            &[publication],
            Utc::now(),
        );
        assert!(html.contains("91/100"));
        assert!(html.contains("&lt;b&gt;strong&lt;/b&gt;"));
        assert!(html.contains("No strengths identified"));
        assert!(html.contains("<td>Quantum Dots</td><td>IEEE Access</td><td>2022</td><td>12</td>"));
    }

    #[test]
    fn test_summary_stats() {
        let appraisals = vec![
            appraisal("draft", None),
            appraisal("submitted", Some(json!({ "overall_score": 80 }))),
            appraisal("approved", Some(json!({ "overall_score": 95 }))),
        ];
        let stats = SummaryStats::from_appraisals(&appraisals);
        assert_eq!(stats.total_appraisals, 3);
        assert_eq!(stats.submitted_appraisals, 2);
        assert_eq!(stats.approved_appraisals, 1);
        assert_eq!(stats.average_score, 87.5);

        let html = render_summary(&stats, Utc::now());
        assert!(html.contains("Total Appraisals"));
        assert!(html.contains("87.5"));
    }

    #[test]
    fn test_summary_stats_empty() {
        assert_eq!(SummaryStats::from_appraisals(&[]), SummaryStats::default());
    }

    #[test]
    fn test_pbas_form_renders_header_and_sections() {
        let mut user = faculty();
        user.form_header = json!({
            "institute_name": "VESIT",
            "academic_year": "2024-25",
            "cas_promotion_stage": "Stage 2 to 3"
        });
        user.set_section(
            FormPart::PartA,
            "academic_qualifications",
            json!([{ "examination": "PhD", "subject": "Optics <UV>" }, "legacy note"]),
        );
        user.set_section(
            FormPart::PartB,
            "table2",
            json!({ "researchPapers": [{ "title": "Quantum Dots", "year": 2022 }] }),
        );

        let html = render_pbas_form(&user, Utc::now());
        assert!(html.contains("<h2>VESIT - Academic Year 2024-25</h2>"));
        assert!(html.contains("Stage 2 to 3"));
        // no department in the header falls back to the account's
        assert!(html.contains("Physics"));
        assert!(html.contains("Asha &lt;Rao&gt;"));
        assert!(html.contains("<h3>Academic qualifications</h3>"));
        assert!(html.contains("<td>PhD</td><td>Optics &lt;UV&gt;</td>"));
        assert!(html.contains("<li>legacy note</li>"));
        assert!(html.contains("<h4>Research papers</h4>"));
        assert!(html.contains("<td>Quantum Dots</td><td>2022</td>"));
    }

    #[test]
    fn test_pbas_form_lists_every_section() {
        let html = render_pbas_form(&faculty(), Utc::now());
        for part in [FormPart::PartA, FormPart::PartB] {
            for section in part.sections() {
                assert!(html.contains(&format!("<h3>{}</h3>", label(section))), "{}", section);
            }
        }
        assert!(html.contains("No data provided"));
        assert!(html.contains("<h3>Personal in</h3>"));
    }
}
