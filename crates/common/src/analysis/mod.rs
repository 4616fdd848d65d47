//! Simulated appraisal analysis
//!
//! Produces a placeholder analysis of fixed shape from static catalogues.
//! No model is called; the score and list lengths are random.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

const INSIGHTS: [&str; 6] = [
    "Strong research output with consistent publication record",
    "Excellent teaching evaluations across multiple courses",
    "Active participation in institutional service activities",
    "Notable contributions to curriculum development",
    "Effective mentorship of graduate students",
    "Significant impact in professional development activities",
];

const RECOMMENDATIONS: [&str; 6] = [
    "Consider expanding research collaborations internationally",
    "Explore opportunities for interdisciplinary research projects",
    "Increase involvement in peer review activities",
    "Develop new innovative teaching methodologies",
    "Pursue leadership roles in professional organizations",
    "Focus on high-impact publication venues",
];

const STRENGTHS: [&str; 6] = [
    "Research Excellence",
    "Teaching Innovation",
    "Service Leadership",
    "Student Mentorship",
    "Professional Development",
    "Collaboration Skills",
];

const AREAS_FOR_IMPROVEMENT: [&str; 6] = [
    "Grant Writing",
    "International Visibility",
    "Industry Partnerships",
    "Technology Integration",
    "Community Outreach",
    "Publication Strategy",
];

pub const SUMMARY: &str = "This faculty member demonstrates exceptional performance across \
teaching, research, and service domains. The comprehensive evaluation indicates strong \
potential for continued academic excellence and institutional contribution.";

/// Stored in `appraisals.llm_analysis`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub overall_score: u32,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub summary: String,
    pub generated_at: DateTime<Utc>,
}

fn prefix<R: Rng>(rng: &mut R, catalogue: &[&str], len: RangeInclusive<usize>) -> Vec<String> {
    let n = rng.gen_range(len).min(catalogue.len());
    catalogue[..n].iter().map(|s| s.to_string()).collect()
}

/// Generate a simulated analysis
pub fn simulate<R: Rng>(rng: &mut R) -> Analysis {
    Analysis {
        overall_score: rng.gen_range(80..=99),
        insights: prefix(rng, &INSIGHTS, 3..=5),
        recommendations: prefix(rng, &RECOMMENDATIONS, 2..=4),
        strengths: prefix(rng, &STRENGTHS, 3..=5),
        areas_for_improvement: prefix(rng, &AREAS_FOR_IMPROVEMENT, 2..=3),
        summary: SUMMARY.to_string(),
        generated_at: Utc::now(),
    }
}

/// Sleep for a random number of milliseconds in `range`
pub async fn simulated_delay(range: RangeInclusive<u64>) {
    let ms = if range.start() >= range.end() {
        *range.start()
    } else {
        rand::thread_rng().gen_range(range)
    };

    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_simulated_shape_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let analysis = simulate(&mut rng);
            assert!((80..=99).contains(&analysis.overall_score));
            assert!((3..=5).contains(&analysis.insights.len()));
            assert!((2..=4).contains(&analysis.recommendations.len()));
            assert!((3..=5).contains(&analysis.strengths.len()));
            assert!((2..=3).contains(&analysis.areas_for_improvement.len()));
            assert_eq!(analysis.summary, SUMMARY);
        }
    }

    #[test]
    fn test_lists_are_catalogue_prefixes() {
        let mut rng = StdRng::seed_from_u64(42);
        let analysis = simulate(&mut rng);
        assert_eq!(analysis.insights[0], INSIGHTS[0]);
        assert_eq!(analysis.strengths[..], STRENGTHS[..analysis.strengths.len()]);
    }

    #[tokio::test]
    async fn test_zero_delay_returns_immediately() {
        let started = std::time::Instant::now();
        simulated_delay(0..=0).await;
        assert!(started.elapsed() < Duration::from_millis(50));
    }
}
