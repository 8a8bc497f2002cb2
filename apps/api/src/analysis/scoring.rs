//! Scorer: keyword coverage plus TF-IDF similarity, blended into a 0–100 ATS score.
//!
//! Algorithm:
//! 1. Normalize the resume text.
//! 2. keyword_score = 100 × (keywords found as substrings of the corpus) / (role keywords)
//! 3. similarity_score = 100 × cosine(resume corpus, space-joined role keywords)
//!    - a document with no vocabulary terms compares as 0
//!    - an empty shared vocabulary: keyword_score × 0.8, with a warning
//! 4. final_score = 0.6 × keyword_score + 0.4 × similarity_score
//!
//! All three scores are reported rounded to one decimal place.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::normalize::normalize_text;
use crate::analysis::roles::RoleDefinition;
use crate::analysis::similarity::{cosine_similarity, SimilarityError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub keyword: f64,
    pub similarity: f64,
    /// Share of keyword_score used as similarity when vectorization degenerates.
    pub fallback_factor: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            keyword: 0.6,
            similarity: 0.4,
            fallback_factor: 0.8,
        }
    }
}

/// Outcome of one scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub final_score: f64,
    pub keyword_score: f64,
    pub similarity_score: f64,
    /// Role keywords present in the resume, in role-list order.
    pub found_keywords: Vec<String>,
    /// Role keywords absent from the resume. Order carries no meaning.
    pub missing_keywords: Vec<String>,
}

/// Non-fatal conditions hit while scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreWarning {
    SimilarityDegraded { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub result: ScoreResult,
    pub warnings: Vec<ScoreWarning>,
}

/// Presentation tier of a final score. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    pub fn classify(score: f64) -> Self {
        if score >= 70.0 {
            ScoreTier::High
        } else if score >= 40.0 {
            ScoreTier::Medium
        } else {
            ScoreTier::Low
        }
    }

    pub fn interpretation(self) -> &'static str {
        match self {
            ScoreTier::High => "Excellent! Your resume is well-optimized for this role.",
            ScoreTier::Medium => "Good start, but consider adding more relevant keywords.",
            ScoreTier::Low => "Your resume needs significant improvement for this role.",
        }
    }
}

pub const IMPROVEMENT_TIPS: &[&str] = &[
    "Include specific technologies mentioned in the job description",
    "Use industry-standard terminology",
    "Quantify your achievements with numbers",
    "Tailor your resume for each specific job application",
    "Include both hard and soft skills relevant to the role",
];

/// Scores resume text against a role with the default weights.
pub fn score_resume(resume_text: Option<&str>, role: &RoleDefinition) -> ScoreReport {
    score_resume_with(resume_text, role, &ScoreWeights::default())
}

pub fn score_resume_with(
    resume_text: Option<&str>,
    role: &RoleDefinition,
    weights: &ScoreWeights,
) -> ScoreReport {
    let text = match resume_text {
        Some(t) if !t.trim().is_empty() => t,
        _ => return empty_report(role),
    };

    let corpus = normalize_text(text);
    let found = find_keywords(&corpus, role.keywords);

    let keyword_score = if role.keywords.is_empty() {
        0.0
    } else {
        100.0 * found.len() as f64 / role.keywords.len() as f64
    };

    let mut warnings = Vec::new();
    let similarity_score = match cosine_similarity(&corpus, &role.job_document()) {
        Ok(sim) => sim * 100.0,
        Err(SimilarityError::ZeroVector(_)) => 0.0,
        Err(e) => {
            warn!(role = role.id, "Similarity calculation limited: {e}");
            warnings.push(ScoreWarning::SimilarityDegraded {
                reason: e.to_string(),
            });
            keyword_score * weights.fallback_factor
        }
    };

    let final_score = weights.keyword * keyword_score + weights.similarity * similarity_score;

    let found_set: HashSet<&str> = found.iter().copied().collect();
    let missing = dedup_in_order(role.keywords.iter().copied().filter(|k| !found_set.contains(k)));

    ScoreReport {
        result: ScoreResult {
            final_score: round1(final_score),
            keyword_score: round1(keyword_score),
            similarity_score: round1(similarity_score),
            found_keywords: found.into_iter().map(String::from).collect(),
            missing_keywords: missing,
        },
        warnings,
    }
}

/// Substring containment over the cleaned corpus. Multi-word keywords match
/// only when both words survived normalization and ended up adjacent.
fn find_keywords<'a>(corpus: &str, keywords: &[&'a str]) -> Vec<&'a str> {
    keywords
        .iter()
        .copied()
        .filter(|kw| corpus.contains(kw))
        .collect()
}

fn empty_report(role: &RoleDefinition) -> ScoreReport {
    ScoreReport {
        result: ScoreResult {
            final_score: 0.0,
            keyword_score: 0.0,
            similarity_score: 0.0,
            found_keywords: vec![],
            missing_keywords: role.keywords.iter().map(|k| k.to_string()).collect(),
        },
        warnings: vec![],
    }
}

fn dedup_in_order<'a>(keywords: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .filter(|k| seen.insert(*k))
        .map(String::from)
        .collect()
}

fn round1(value: f64) -> f64 {
    // Exact ties go to the even digit: 6.25 reports as 6.2.
    (value * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::roles::RoleCatalog;

    fn role(id: &str) -> &'static RoleDefinition {
        RoleCatalog::builtin().find(id).unwrap()
    }

    fn assert_partition(result: &ScoreResult, role: &RoleDefinition) {
        let found: HashSet<&str> = result.found_keywords.iter().map(String::as_str).collect();
        let missing: HashSet<&str> = result.missing_keywords.iter().map(String::as_str).collect();
        let all: HashSet<&str> = role.keywords.iter().copied().collect();
        assert!(found.is_disjoint(&missing), "found and missing overlap");
        let union: HashSet<&str> = found.union(&missing).copied().collect();
        assert_eq!(union, all);
    }

    #[test]
    fn test_empty_resume_scores_zero_with_all_keywords_missing() {
        let se = role("Software Engineer");
        let report = score_resume(Some(""), se);
        assert_eq!(report.result.final_score, 0.0);
        assert_eq!(report.result.keyword_score, 0.0);
        assert_eq!(report.result.similarity_score, 0.0);
        assert!(report.result.found_keywords.is_empty());
        assert_eq!(report.result.missing_keywords.len(), 16);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_absent_and_blank_resume_take_the_empty_branch() {
        let se = role("Software Engineer");
        assert_eq!(score_resume(None, se).result, score_resume(Some(""), se).result);
        assert_eq!(
            score_resume(Some("  \n\t "), se).result,
            score_resume(Some(""), se).result
        );
    }

    #[test]
    fn test_exact_phrase_scenario() {
        let se = role("Software Engineer");
        let report = score_resume(
            Some("I have strong experience with Python and SQL databases"),
            se,
        );
        let r = &report.result;
        assert_eq!(r.found_keywords, vec!["python", "sql"]);
        assert_eq!(r.keyword_score, 12.5);
        assert_eq!(r.similarity_score, 13.5);
        assert_eq!(r.final_score, 12.9);
        assert!(report.warnings.is_empty());
        assert_partition(r, se);
    }

    #[test]
    fn test_single_word_keyword_matches() {
        let pm = role("Product Manager");
        let report = score_resume(Some("I build roadmap documents"), pm);
        assert!(report.result.found_keywords.contains(&"roadmap".to_string()));
        assert_eq!(report.result.keyword_score, 10.0);
    }

    #[test]
    fn test_split_words_do_not_match_compound_keyword() {
        let pm = role("Product Manager");
        let report = score_resume(Some("I build a road and a map"), pm);
        assert!(!report.result.found_keywords.contains(&"roadmap".to_string()));
        assert!(report.result.missing_keywords.contains(&"roadmap".to_string()));
    }

    #[test]
    fn test_multi_word_keyword_needs_adjacency_after_normalization() {
        let ds = role("Data Scientist");
        let adjacent = score_resume(Some("Applied machine learning daily"), ds);
        assert!(adjacent
            .result
            .found_keywords
            .contains(&"machine learning".to_string()));

        // Stop words vanish, so the surviving words become adjacent.
        let bridged = score_resume(Some("a machine for the learning team"), ds);
        assert!(bridged
            .result
            .found_keywords
            .contains(&"machine learning".to_string()));

        let apart = score_resume(Some("machine shop, continuous learning"), ds);
        assert!(!apart
            .result
            .found_keywords
            .contains(&"machine learning".to_string()));
    }

    #[test]
    fn test_repeated_keyword_is_counted_once() {
        let se = role("Software Engineer");
        let once = score_resume(Some("python developer"), se);
        let many = score_resume(Some("python developer python python python"), se);
        assert_eq!(once.result.found_keywords, many.result.found_keywords);
        assert_eq!(once.result.keyword_score, many.result.keyword_score);
    }

    #[test]
    fn test_substring_semantics_are_literal() {
        // "javascript" contains "java"; one-letter "r" matches any corpus with an r.
        let se = role("Software Engineer");
        let report = score_resume(Some("javascript"), se);
        assert_eq!(report.result.found_keywords, vec!["java", "javascript"]);

        let ds = role("Data Scientist");
        let report = score_resume(Some("pandas expert"), ds);
        assert!(report.result.found_keywords.contains(&"r".to_string()));
    }

    #[test]
    fn test_punctuated_keyword_never_matches() {
        let se = role("Software Engineer");
        let report = score_resume(Some("Expert in C++ and modern C++ tooling"), se);
        assert!(report.result.missing_keywords.contains(&"c++".to_string()));
    }

    #[test]
    fn test_stop_word_only_resume_has_zero_similarity() {
        let se = role("Software Engineer");
        let report = score_resume(Some("I am the one who was there"), se);
        assert_eq!(report.result.keyword_score, 0.0);
        // "one" survives normalization but shares nothing with the job document.
        assert_eq!(report.result.similarity_score, 0.0);
        assert!(report.warnings.is_empty());

        // Nothing survives normalization; the resume vector is all zeros.
        let report = score_resume(Some("and the of to"), se);
        assert_eq!(report.result.similarity_score, 0.0);
        assert_eq!(report.result.final_score, 0.0);
        assert!(report.warnings.is_empty());
    }

    static NO_KEYWORDS: RoleDefinition = RoleDefinition {
        id: "Generalist",
        keywords: &[],
        description: "Anything goes.",
    };

    static SHORT_KEYWORDS: RoleDefinition = RoleDefinition {
        id: "Statistician",
        keywords: &["r", "sas"],
        description: "Short keywords only.",
    };

    static DUPLICATE_KEYWORDS: RoleDefinition = RoleDefinition {
        id: "Echo",
        keywords: &["rust", "rust", "tokio"],
        description: "Repeats itself.",
    };

    #[test]
    fn test_role_without_keywords_scores_zero() {
        let report = score_resume(Some("python developer"), &NO_KEYWORDS);
        assert_eq!(report.result.keyword_score, 0.0);
        assert_eq!(report.result.final_score, 0.0);
        assert!(report.result.missing_keywords.is_empty());
        assert_eq!(report.result.similarity_score, 0.0);
        assert!(report.warnings.is_empty());
    }

    static ONLY_R: RoleDefinition = RoleDefinition {
        id: "R",
        keywords: &["r"],
        description: "",
    };

    #[test]
    fn test_job_document_without_terms_compares_as_zero() {
        // Job document "r sas": only "sas" is a vector term. The resume has an
        // "r" but no "sas", so similarity is a plain zero.
        let report = score_resume(Some("rust programmer"), &SHORT_KEYWORDS);
        assert_eq!(report.result.keyword_score, 50.0);
        assert_eq!(report.result.similarity_score, 0.0);
        assert!(report.warnings.is_empty());

        // "r" alone is too short to be a term, so the job vector is all zeros.
        let report = score_resume(Some("rust programmer"), &ONLY_R);
        assert_eq!(report.result.keyword_score, 100.0);
        assert_eq!(report.result.similarity_score, 0.0);
        assert_eq!(report.result.final_score, 60.0);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_empty_vocabulary_falls_back_with_warning() {
        let report = score_resume(Some("r"), &ONLY_R);
        assert_eq!(report.result.keyword_score, 0.0);
        assert_eq!(report.result.similarity_score, 0.0);
        assert_eq!(report.result.final_score, 0.0);
        assert_eq!(report.warnings.len(), 1);
        assert!(matches!(
            report.warnings[0],
            ScoreWarning::SimilarityDegraded { ref reason } if reason.contains("empty vocabulary")
        ));
    }

    #[test]
    fn test_duplicate_keywords_collapse_in_missing_set() {
        let report = score_resume(Some("python developer"), &DUPLICATE_KEYWORDS);
        assert_eq!(report.result.missing_keywords, vec!["rust", "tokio"]);
    }

    #[test]
    fn test_scores_bounded_and_partitioned_for_every_role() {
        let resumes = [
            "Senior engineer: Python, SQL, Docker, Kubernetes on AWS; React front ends.",
            "Product lead owning roadmap, agile scrum ceremonies and metrics dashboards.",
            "Figma wireframing, prototyping and usability testing for mobile apps.",
            "SEO and SEM campaigns, social media analytics, email marketing funnels.",
            "Statistics with pandas and numpy; machine learning in PyTorch and Spark.",
        ];
        for role in RoleCatalog::builtin().roles() {
            for text in resumes {
                let r = score_resume(Some(text), role).result;
                for s in [r.final_score, r.keyword_score, r.similarity_score] {
                    assert!((0.0..=100.0).contains(&s), "{} out of range for {}", s, role.id);
                }
                assert_partition(&r, role);
            }
        }
    }

    #[test]
    fn test_found_keywords_follow_role_order() {
        let se = role("Software Engineer");
        let report = score_resume(Some("microservices api docker python"), se);
        assert_eq!(
            report.result.found_keywords,
            vec!["python", "docker", "api", "microservices"]
        );
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(ScoreTier::classify(69.9), ScoreTier::Medium);
        assert_eq!(ScoreTier::classify(70.0), ScoreTier::High);
        assert_eq!(ScoreTier::classify(39.9), ScoreTier::Low);
        assert_eq!(ScoreTier::classify(40.0), ScoreTier::Medium);
        assert_eq!(ScoreTier::classify(100.0), ScoreTier::High);
        assert_eq!(ScoreTier::classify(0.0), ScoreTier::Low);
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ScoreTier::High).unwrap(), r#""high""#);
        assert_eq!(serde_json::to_string(&ScoreTier::Low).unwrap(), r#""low""#);
    }

    #[test]
    fn test_interpretation_per_tier() {
        assert!(ScoreTier::High.interpretation().starts_with("Excellent"));
        assert!(ScoreTier::Medium.interpretation().contains("more relevant keywords"));
        assert!(ScoreTier::Low.interpretation().contains("significant improvement"));
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(12.9011), 12.9);
        assert_eq!(round1(13.5028), 13.5);
        assert_eq!(round1(0.0), 0.0);
        assert_eq!(round1(6.25), 6.2);
        assert_eq!(round1(31.25), 31.2);
        assert_eq!(round1(56.25), 56.2);
        assert_eq!(round1(43.75), 43.8);
    }

    #[test]
    fn test_keyword_score_ties_round_to_even() {
        let se = role("Software Engineer");
        let report = score_resume(Some("python developer"), se);
        assert_eq!(report.result.found_keywords, vec!["python"]);
        assert_eq!(report.result.keyword_score, 6.2);

        let report = score_resume(Some("python java docker kubernetes aws"), se);
        assert_eq!(report.result.found_keywords.len(), 5);
        assert_eq!(report.result.keyword_score, 31.2);
    }

    #[test]
    fn test_default_weights() {
        let w = ScoreWeights::default();
        assert!((w.keyword + w.similarity - 1.0).abs() < f64::EPSILON);
        assert_eq!(w.fallback_factor, 0.8);
    }
}
