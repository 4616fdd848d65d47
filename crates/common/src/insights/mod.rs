//! Rule-based PBAS insights
//!
//! Reads a faculty profile (`part_a` / `part_b` documents) and produces
//! insights, a narrative summary, recommendations, a comparison against
//! department averages and an estimated Category III API score.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MODEL_NAME: &str = "PBAS-Analyzer-v1 (Local)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Recommendation,
    Analysis,
    Warning,
    Achievement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Teaching,
    Research,
    Service,
    Overall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InsightType,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub metric: String,
    pub user_value: usize,
    pub department_avg: usize,
    pub percentile: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightReport {
    pub insights: Vec<Insight>,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub comparison_data: Vec<Comparison>,
    pub estimated_api_score: u32,
    pub generated_at: DateTime<Utc>,
    pub model: String,
}

/// Read-only view over a profile document
pub struct Profile<'a> {
    part_a: &'a Value,
    part_b: &'a Value,
}

static NULL: Value = Value::Null;

impl<'a> Profile<'a> {
    /// Accepts `{part_a, part_b}` or a bare `part_b` document
    pub fn new(data: &'a Value) -> Self {
        let part_b = match data.get("part_b") {
            Some(part_b) => part_b,
            None => data,
        };
        Self {
            part_a: data.get("part_a").unwrap_or(&NULL),
            part_b,
        }
    }

    fn list(value: Option<&'a Value>) -> &'a [Value] {
        value
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn table2(&self, key: &str) -> &'a [Value] {
        Self::list(self.part_b.get("table2").and_then(|t| t.get(key)))
    }

    pub fn research_papers(&self) -> &'a [Value] {
        self.table2("researchPapers")
    }

    pub fn publications(&self) -> &'a [Value] {
        self.table2("publications")
    }

    pub fn research_projects(&self) -> &'a [Value] {
        self.table2("researchProjects")
    }

    pub fn consultancy_projects(&self) -> &'a [Value] {
        self.table2("consultancyProjects")
    }

    pub fn research_guidance(&self) -> &'a [Value] {
        self.table2("researchGuidance")
    }

    /// Patents live in the patents/policy/awards section; older documents keep them at the top level
    pub fn patents(&self) -> &'a [Value] {
        self.part_b
            .get("patents_policy_awards")
            .and_then(|s| s.get("patents"))
            .or_else(|| self.part_b.get("patents"))
            .map(|v| Self::list(Some(v)))
            .unwrap_or(&[])
    }

    pub fn awards(&self) -> &'a [Value] {
        self.part_b
            .get("patents_policy_awards")
            .and_then(|s| s.get("awards"))
            .or_else(|| self.part_b.get("awards"))
            .map(|v| Self::list(Some(v)))
            .unwrap_or(&[])
    }

    pub fn invited_lectures(&self) -> &'a [Value] {
        Self::list(self.part_b.get("invited_lectures"))
    }

    pub fn admin_responsibilities(&self) -> &'a [Value] {
        Self::list(
            self.part_b
                .get("table1")
                .and_then(|t| t.get("admin_responsibilities")),
        )
    }

    pub fn teaching_grading(&self) -> Option<&'a str> {
        self.part_b
            .get("table1")
            .and_then(|t| t.get("teaching_data"))
            .and_then(|t| t.get("self_appraisal_grading"))
            .and_then(Value::as_str)
    }

    pub fn courses(&self) -> &'a [Value] {
        Self::list(self.part_a.get("courses_fdp"))
    }

    pub fn phd_students(&self) -> usize {
        self.research_guidance()
            .iter()
            .filter(|g| field_is(g, "degree", "Ph.D."))
            .count()
    }
}

fn field_is(value: &Value, key: &str, expected: &str) -> bool {
    value.get(key).and_then(Value::as_str) == Some(expected)
}

fn truthy(value: &Value, key: &str) -> bool {
    match value.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.as_str(), "true" | "yes" | "Yes"),
        _ => false,
    }
}

fn number(value: &Value, key: &str) -> f64 {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let digits: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            digits.parse().unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

fn indexed_in(paper: &Value) -> Vec<&str> {
    paper
        .get("indexed_in")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn indexed_like(paper: &Value, needle: &str) -> bool {
    indexed_in(paper)
        .iter()
        .any(|i| i.to_lowercase().contains(needle))
}

/// Estimated Category III API score
pub fn estimate_api_score(profile: &Profile<'_>) -> u32 {
    let mut score = 0u32;

    for paper in profile.research_papers() {
        let index = indexed_in(paper);
        let mut points = if index.contains(&"SCI") || index.contains(&"SCIE") {
            15
        } else if index.contains(&"Scopus") {
            12
        } else {
            10
        };
        if truthy(paper, "is_first_author") {
            points += 2;
        }
        score += points;
    }

    for publication in profile.publications() {
        score += if field_is(publication, "type", "Book") { 30 } else { 10 };
    }

    for project in profile.research_projects() {
        score += if field_is(project, "project_type", "Major") { 30 } else { 15 };
    }

    for patent in profile.patents() {
        score += if field_is(patent, "status", "Granted") {
            30
        } else if field_is(patent, "status", "Published") {
            20
        } else {
            10
        };
    }

    for guidance in profile.research_guidance() {
        if field_is(guidance, "degree", "Ph.D.") {
            score += if field_is(guidance, "status", "Awarded") { 30 } else { 10 };
        }
    }

    for lecture in profile.invited_lectures() {
        score += if field_is(lecture, "level", "International") {
            20
        } else if field_is(lecture, "level", "National") {
            15
        } else {
            10
        };
    }

    score
}

struct Builder {
    stamp: i64,
    insights: Vec<Insight>,
}

impl Builder {
    fn push(
        &mut self,
        prefix: &str,
        kind: InsightType,
        title: &str,
        description: String,
        priority: Priority,
        category: Category,
    ) {
        self.insights.push(Insight {
            id: format!("{}-{}", prefix, self.stamp),
            kind,
            title: title.to_string(),
            description,
            priority,
            category,
        });
    }
}

fn start_year(course: &Value) -> Option<i32> {
    course
        .get("start_date")
        .and_then(Value::as_str)
        .and_then(|d| d.get(..4))
        .and_then(|y| y.parse().ok())
}

/// All rule-based insights for a profile, in a stable order
pub fn generate_insights(profile: &Profile<'_>, now: DateTime<Utc>) -> Vec<Insight> {
    use Category::*;
    use InsightType::*;

    let mut b = Builder {
        stamp: now.timestamp_millis(),
        insights: Vec::new(),
    };

    // Publications
    let papers = profile.research_papers();
    let total_pubs = papers.len() + profile.publications().len();
    let sci = papers.iter().filter(|p| indexed_like(p, "sci")).count();
    let scopus = papers.iter().filter(|p| indexed_like(p, "scopus")).count();
    let ugc = papers.iter().filter(|p| indexed_like(p, "ugc")).count();

    if total_pubs == 0 {
        b.push("pub-warn", Warning, "No Publications Found",
            "Publishing research is crucial for academic career progression. Start by documenting your work in peer-reviewed journals. For maximum API score, target SCI/Scopus indexed journals.".to_string(),
            Priority::High, Research);
    } else if total_pubs < 3 {
        b.push("pub-rec", Recommendation, "Boost Publication Output",
            format!("You have {} publication(s). For CAS Stage 13A to 14, you need at least 7 publications with 4 in peer-reviewed journals. Consider collaborative research to increase output.", total_pubs),
            Priority::Medium, Research);
    } else if total_pubs >= 5 {
        b.push("pub-ach", Achievement, "Strong Publication Portfolio",
            format!("Excellent! You have {} publications ({} SCI, {} Scopus, {} UGC Care). Continue maintaining this trajectory for career advancement.", total_pubs, sci, scopus, ugc),
            Priority::Low, Research);
    }

    if !papers.is_empty() && !papers.iter().any(|p| truthy(p, "is_first_author")) {
        b.push("auth-rec", Recommendation, "Lead Your Research",
            "Being the first author demonstrates research leadership. Aim to lead some research initiatives and publish as the primary author.".to_string(),
            Priority::Medium, Research);
    }

    if papers.len() > 3 && !papers.iter().any(|p| number(p, "impact_factor") > 2.0) {
        b.push("if-rec", Recommendation, "Target High-Impact Journals",
            "Consider submitting to journals with higher impact factors (>2.0). Quality publications in top venues carry more weight in academic evaluations.".to_string(),
            Priority::Medium, Research);
    }

    let citations: f64 = papers.iter().map(|p| number(p, "citations")).sum();
    if citations > 50.0 {
        b.push("cite-ach", Achievement, "Research Impact",
            format!("Your work has received {} citations. This indicates significant research impact in your field.", citations.round()),
            Priority::Low, Research);
    }

    // Projects
    let projects = profile.research_projects();
    let consultancy = profile.consultancy_projects();
    if projects.is_empty() && consultancy.is_empty() {
        b.push("proj-rec", Recommendation, "Apply for Research Grants",
            "Research projects demonstrate your ability to conceptualize and execute funded research. Apply to DST, AICTE, UGC, or industry for project funding.".to_string(),
            Priority::Medium, Research);
    } else {
        let major = projects.iter().filter(|p| field_is(p, "project_type", "Major")).count();
        let funding: f64 = projects.iter().map(|p| number(p, "amount")).sum();
        if major > 0 {
            b.push("proj-ach", Achievement, "Major Research Funding",
                format!("You have {} major project(s) (>₹10 Lakhs) with total funding of ₹{:.2} Lakhs. This significantly strengthens your research profile.", major, funding / 100_000.0),
                Priority::Low, Research);
        }
        if !consultancy.is_empty() {
            b.push("cons-ach", Achievement, "Industry Connect",
                format!("You have {} consultancy project(s). This demonstrates industry relevance and practical application of your expertise.", consultancy.len()),
                Priority::Low, Research);
        }
    }

    // Patents
    let patents = profile.patents();
    let granted = patents.iter().filter(|p| field_is(p, "status", "Granted")).count();
    let published = patents.iter().filter(|p| field_is(p, "status", "Published")).count();
    if patents.is_empty() {
        b.push("pat-rec", Recommendation, "Innovate and Patent",
            "Patents significantly boost your API score. Consider patenting your innovative research work. Design patents are a good starting point.".to_string(),
            Priority::Medium, Research);
    } else if granted > 0 {
        b.push("pat-ach", Achievement, "Patent Holder",
            format!("Excellent! You have {} granted patent(s). This is a significant achievement demonstrating innovation and commercial potential.", granted),
            Priority::Low, Research);
    } else {
        b.push("pat-anal", Analysis, "Patent Portfolio",
            format!("You have {} patent(s) ({} published, {} filed). Follow up on filed patents for grant.", patents.len(), published, patents.len() - published),
            Priority::Medium, Research);
    }

    // Research guidance
    let guidance = profile.research_guidance();
    let phd = profile.phd_students();
    if phd > 0 {
        let is_phd = |g: &&Value| field_is(g, "degree", "Ph.D.");
        let awarded = guidance.iter().filter(is_phd).filter(|g| field_is(g, "status", "Awarded")).count();
        let ongoing = guidance.iter().filter(is_phd).filter(|g| field_is(g, "status", "Ongoing")).count();
        b.push("guide-ach", Achievement, "Research Mentorship",
            format!("You are supervising {} Ph.D. student(s) ({} awarded, {} ongoing). Each awarded Ph.D. contributes 30 points to your API score.", phd, awarded, ongoing),
            Priority::Low, Research);
    } else {
        b.push("guide-rec", Recommendation, "Guide Research Scholars",
            "If eligible as Ph.D. guide, consider taking research scholars. Ph.D. guidance is highly valued in CAS promotions.".to_string(),
            Priority::Medium, Research);
    }

    // Professional development
    let courses = profile.courses();
    let recent = courses
        .iter()
        .filter(|c| start_year(c).map_or(false, |y| y >= now.year() - 2))
        .count();
    if courses.is_empty() {
        b.push("fdp-warn", Warning, "Professional Development Required",
            "Orientation/Refresher courses are mandatory for CAS promotions. Attend at least one FDP, STTP, or refresher course per year.".to_string(),
            Priority::High, Teaching);
    } else if recent == 0 {
        b.push("fdp-rec", Recommendation, "Update Your Skills",
            "Your last FDP/course was over 2 years ago. Stay updated with emerging technologies and pedagogical methods through recent programs.".to_string(),
            Priority::Medium, Teaching);
    } else {
        let moocs = courses.iter().filter(|c| field_is(c, "type", "MOOC")).count();
        let mooc_note = if moocs > 0 { format!(" and {} MOOC(s)", moocs) } else { String::new() };
        b.push("fdp-anal", Analysis, "Continuous Learning",
            format!("You have completed {} professional development course(s) including {} in the last 2 years{}.", courses.len(), recent, mooc_note),
            Priority::Low, Teaching);
    }

    // Invited lectures
    let lectures = profile.invited_lectures();
    if lectures.is_empty() {
        b.push("lec-rec", Recommendation, "Share Your Expertise",
            "Accept invitations to speak at conferences, FDPs, and workshops. This enhances visibility and contributes to your service profile.".to_string(),
            Priority::Medium, Service);
    } else {
        let intl = lectures.iter().filter(|l| field_is(l, "level", "International")).count();
        let national = lectures.iter().filter(|l| field_is(l, "level", "National")).count();
        let keynotes = lectures.iter().filter(|l| field_is(l, "type", "Keynote")).count();
        let keynote_note = if keynotes > 0 { format!(" including {} keynote(s)", keynotes) } else { String::new() };
        b.push("lec-ach", Achievement, "Academic Recognition",
            format!("You have delivered {} invited lecture(s){} ({} International, {} National). This reflects your expertise recognition.", lectures.len(), keynote_note, intl, national),
            Priority::Low, Service);
    }

    // Awards
    let awards = profile.awards();
    if !awards.is_empty() {
        let high_level = awards
            .iter()
            .filter(|a| field_is(a, "category", "National") || field_is(a, "category", "International"))
            .count();
        let level_note = if high_level > 0 {
            format!(" including {} at national/international level", high_level)
        } else {
            String::new()
        };
        b.push("award-ach", Achievement, "Recognized Excellence",
            format!("You have received {} award(s){}. These recognitions validate your contributions.", awards.len(), level_note),
            Priority::Low, Overall);
    }

    // Teaching and administration
    if profile.teaching_grading() == Some("Good") {
        b.push("teach-anal", Analysis, "Teaching Performance",
            "Your self-assessed teaching grading is 'Good'. Maintain student feedback scores and documentation for verified grading.".to_string(),
            Priority::Low, Teaching);
    }

    let admin = profile.admin_responsibilities();
    if !admin.is_empty() {
        b.push("admin-anal", Analysis, "Administrative Contribution",
            format!("You have held {} administrative position(s). Institutional service is valued and contributes to Category II API score.", admin.len()),
            Priority::Low, Service);
    }

    b.push("api-overall", Analysis, "Estimated API Score",
        format!("Based on your current data, your estimated Category III API score is approximately {} points. For Stage promotions, ensure you meet minimum requirements in all categories.", estimate_api_score(profile)),
        Priority::Medium, Overall);

    b.insights
}

pub fn summarize(profile: &Profile<'_>) -> String {
    let pubs = profile.research_papers().len() + profile.publications().len();
    let projects = profile.research_projects().len() + profile.consultancy_projects().len();
    let score = estimate_api_score(profile);

    let outlook = if score >= 300 {
        "Your research profile is strong for higher academic positions."
    } else if score >= 150 {
        "Your profile is developing well. Continue adding quality research outputs."
    } else {
        "Focus on building your research portfolio for career advancement."
    };

    format!(
        "Your academic profile includes {} publication(s), {} research project(s), {} patent(s), \
         {} research student(s) under supervision, {} invited lecture(s), and {} professional \
         development course(s). Your estimated Category III API score is approximately {} points. {}",
        pubs,
        projects,
        profile.patents().len(),
        profile.research_guidance().len(),
        profile.invited_lectures().len(),
        profile.courses().len(),
        score,
        outlook
    )
}

pub fn recommend(profile: &Profile<'_>) -> Vec<String> {
    let mut out = Vec::new();

    if profile.research_papers().len() < 5 {
        out.push("Publish 2-3 papers per year in SCI/Scopus/UGC Care indexed journals.");
    }
    if profile.research_projects().is_empty() {
        out.push("Apply for funded research projects from DST, AICTE, UGC, or industry.");
    }
    if profile.patents().is_empty() {
        out.push("Consider filing patents for your innovative research work.");
    }
    if profile.courses().len() < 2 {
        out.push("Attend at least one FDP/STTP per year for continuous learning.");
    }

    out.extend([
        "Collaborate on interdisciplinary research for broader impact.",
        "Present at national and international conferences.",
        "Consider writing textbooks or contributing book chapters.",
        "Apply for national/state awards in your area of expertise.",
    ]);

    out.into_iter().map(String::from).collect()
}

fn percentile(value: usize, target: usize) -> u32 {
    let pct = (value as f64 / target as f64 * 100.0).round();
    pct.min(100.0) as u32
}

pub fn compare(profile: &Profile<'_>) -> Vec<Comparison> {
    let pubs = profile.research_papers().len() + profile.publications().len();
    let projects = profile.research_projects().len();
    let patents = profile.patents().len();
    let phd = profile.phd_students();

    vec![
        Comparison { metric: "Publications".into(), user_value: pubs, department_avg: 5, percentile: percentile(pubs, 7) },
        Comparison { metric: "Projects".into(), user_value: projects, department_avg: 2, percentile: percentile(projects, 3) },
        Comparison { metric: "Patents".into(), user_value: patents, department_avg: 1, percentile: percentile(patents, 2) },
        Comparison { metric: "PhD Guidance".into(), user_value: phd, department_avg: 1, percentile: percentile(phd, 2) },
    ]
}

/// Full report for a profile document
pub fn analyze(data: &Value) -> InsightReport {
    let profile = Profile::new(data);
    let now = Utc::now();

    InsightReport {
        insights: generate_insights(&profile, now),
        summary: summarize(&profile),
        recommendations: recommend(&profile),
        comparison_data: compare(&profile),
        estimated_api_score: estimate_api_score(&profile),
        generated_at: now,
        model: MODEL_NAME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "part_a": {
                "courses_fdp": [{"title": "FDP on ML", "start_date": "2015-06-01", "type": "FDP"}]
            },
            "part_b": {
                "table2": {
                    "researchPapers": [
                        {"title": "A", "indexed_in": ["SCI"], "is_first_author": true},
                        {"title": "B", "indexed_in": ["Scopus"]},
                        {"title": "C", "indexed_in": []}
                    ],
                    "publications": [{"type": "Book"}, {"type": "Chapter"}],
                    "researchProjects": [{"project_type": "Major", "amount": "₹12,00,000"}],
                    "researchGuidance": [
                        {"degree": "Ph.D.", "status": "Awarded"},
                        {"degree": "Ph.D.", "status": "Ongoing"},
                        {"degree": "M.Tech", "status": "Awarded"}
                    ]
                },
                "patents_policy_awards": {
                    "patents": [{"status": "Granted"}, {"status": "Published"}, {"status": "Filed"}],
                    "awards": [{"category": "National"}]
                },
                "invited_lectures": [
                    {"level": "International"}, {"level": "National"}, {"level": "State"}
                ]
            }
        })
    }

    #[test]
    fn test_api_score_rules() {
        let data = sample();
        let profile = Profile::new(&data);
        // papers 17 + 12 + 10, books 30 + 10, project 30, patents 30 + 20 + 10,
        // guidance 30 + 10, lectures 20 + 15 + 10
        assert_eq!(estimate_api_score(&profile), 254);
    }

    #[test]
    fn test_empty_profile_warns() {
        let data = json!({});
        let insights = generate_insights(&Profile::new(&data), Utc::now());
        let ids: Vec<_> = insights.iter().map(|i| i.id.split('-').take(2).collect::<Vec<_>>().join("-")).collect();
        assert!(ids.contains(&"pub-warn".to_string()));
        assert!(ids.contains(&"fdp-warn".to_string()));
        assert_eq!(insights.last().map(|i| i.title.as_str()), Some("Estimated API Score"));
    }

    #[test]
    fn test_bare_part_b_accepted() {
        let data = sample();
        let part_b = data["part_b"].clone();
        let profile = Profile::new(&part_b);
        assert_eq!(profile.research_papers().len(), 3);
        assert!(profile.courses().is_empty());
    }

    #[test]
    fn test_comparison_percentiles_capped() {
        let data = sample();
        let rows = compare(&Profile::new(&data));
        let pubs = rows.iter().find(|r| r.metric == "Publications").unwrap();
        assert_eq!(pubs.user_value, 5);
        assert_eq!(pubs.percentile, 71);
        let patents = rows.iter().find(|r| r.metric == "Patents").unwrap();
        assert_eq!(patents.percentile, 100);
    }

    #[test]
    fn test_report_shape() {
        let report = analyze(&sample());
        assert_eq!(report.model, MODEL_NAME);
        assert!(report.summary.contains("254 points"));
        assert!(report.recommendations.len() >= 4);
        assert!(report.insights.iter().any(|i| i.title == "Patent Holder"));
    }
}
