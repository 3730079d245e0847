//! Matching Engine: skill-overlap ranking of candidates against a job.
//!
//! Percentages are computed over case-sensitive skill sets (upstream
//! trimming is the only normalization), rounded to one decimal place, and
//! filtered by a strict threshold before a stable descending sort. Rankings
//! are recomputed per request; nothing here is cached.

use std::collections::HashSet;

use crate::models::candidate::{Candidate, CandidateMatch};

/// Candidates at or below this (rounded) percentage are excluded.
pub const MATCH_THRESHOLD: f64 = 20.0;

/// Overlap of one candidate's skills with the job's skills.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillMatch {
    /// Intersection, in job-skill order, deduplicated.
    pub matched_skills: Vec<String>,
    /// `100 * |intersection| / |job skills|`, rounded to one decimal.
    /// 0 when the job lists no skills.
    pub percentage: f64,
}

/// Scores a single candidate skill list against the job's.
pub fn score_skills(job_skills: &[String], candidate_skills: &[String]) -> SkillMatch {
    let job_set: HashSet<&str> = job_skills.iter().map(String::as_str).collect();
    let candidate_set: HashSet<&str> = candidate_skills.iter().map(String::as_str).collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let matched_skills: Vec<String> = job_skills
        .iter()
        .filter(|s| candidate_set.contains(s.as_str()) && seen.insert(s.as_str()))
        .cloned()
        .collect();

    let percentage = if job_set.is_empty() {
        0.0
    } else {
        round1(matched_skills.len() as f64 / job_set.len() as f64 * 100.0)
    };

    SkillMatch {
        matched_skills,
        percentage,
    }
}

/// Ranks candidates for a job: strict `> 20.0` inclusion, descending by
/// percentage, ties retaining the storage read order (stable sort).
///
/// A job with no skills yields an empty list by design — every candidate
/// scores exactly 0 against it.
pub fn rank_candidates(job_skills: &[String], candidates: Vec<Candidate>) -> Vec<CandidateMatch> {
    let mut ranked: Vec<CandidateMatch> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let candidate_skills = candidate.skills.as_deref().unwrap_or(&[]);
            let score = score_skills(job_skills, candidate_skills);
            if score.percentage > MATCH_THRESHOLD {
                Some(CandidateMatch {
                    candidate,
                    match_percentage: score.percentage,
                    matched_skills: score.matched_skills,
                })
            } else {
                None
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.match_percentage
            .partial_cmp(&a.match_percentage)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn candidate(name: &str, candidate_skills: &[&str]) -> Candidate {
        Candidate {
            id: Uuid::new_v4(),
            name: Some(name.to_string()),
            email: None,
            phone: None,
            skills: Some(skills(candidate_skills)),
            experience: None,
            education: None,
            location: None,
            summary: None,
            raw_text: None,
            file_hash: None,
            document_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn full_overlap_is_one_hundred() {
        let job = skills(&["Python", "FastAPI", "MongoDB"]);
        let cand = skills(&["Python", "FastAPI", "MongoDB", "React"]);
        let score = score_skills(&job, &cand);
        assert_eq!(score.percentage, 100.0);
        assert_eq!(score.matched_skills, skills(&["Python", "FastAPI", "MongoDB"]));
    }

    #[test]
    fn partial_overlap_rounds_to_one_decimal() {
        let job = skills(&["A", "B", "C"]);
        let cand = skills(&["A"]);
        // 1/3 = 33.333... -> 33.3
        assert_eq!(score_skills(&job, &cand).percentage, 33.3);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let job = skills(&["python"]);
        let cand = skills(&["Python"]);
        let score = score_skills(&job, &cand);
        assert_eq!(score.percentage, 0.0);
        assert!(score.matched_skills.is_empty());
    }

    #[test]
    fn empty_job_skills_score_zero() {
        let score = score_skills(&[], &skills(&["Rust"]));
        assert_eq!(score.percentage, 0.0);
        assert!(score.matched_skills.is_empty());
    }

    #[test]
    fn duplicate_job_skills_are_counted_once() {
        let job = skills(&["Rust", "Rust", "Go"]);
        let cand = skills(&["Rust"]);
        let score = score_skills(&job, &cand);
        // unique job skills = {Rust, Go}, matched = {Rust} -> 50%
        assert_eq!(score.percentage, 50.0);
        assert_eq!(score.matched_skills, skills(&["Rust"]));
    }

    #[test]
    fn threshold_is_strict() {
        // 1/5 = exactly 20.0 -> excluded; 2/5 = 40.0 -> included
        let job = skills(&["A", "B", "C", "D", "E"]);
        let at_threshold = candidate("at", &["A"]);
        let above = candidate("above", &["A", "B"]);
        let ranked = rank_candidates(&job, vec![at_threshold, above]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].candidate.name.as_deref(), Some("above"));
        assert_eq!(ranked[0].match_percentage, 40.0);
    }

    #[test]
    fn job_without_skills_yields_empty_ranking() {
        let candidates = vec![candidate("a", &["Rust"]), candidate("b", &["Go"])];
        assert!(rank_candidates(&[], candidates).is_empty());
    }

    #[test]
    fn ranking_is_descending_with_stable_ties() {
        let job = skills(&["A", "B", "C", "D"]);
        let candidates = vec![
            candidate("first_tie", &["A"]),  // 25.0
            candidate("top", &["A", "B", "C"]), // 75.0
            candidate("second_tie", &["B"]), // 25.0
            candidate("mid", &["A", "B"]),   // 50.0
        ];
        let ranked = rank_candidates(&job, candidates);
        let names: Vec<_> = ranked
            .iter()
            .map(|m| m.candidate.name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["top", "mid", "first_tie", "second_tie"]);
    }

    #[test]
    fn matched_skills_equal_exact_intersection() {
        let job = skills(&["A", "B", "C", "D"]);
        let cand = candidate("c", &["D", "B", "X"]);
        let ranked = rank_candidates(&job, vec![cand]);
        assert_eq!(ranked[0].matched_skills, skills(&["B", "D"]));
        assert_eq!(ranked[0].match_percentage, 50.0);
    }

    #[test]
    fn candidate_without_skills_is_excluded() {
        let job = skills(&["A"]);
        let mut cand = candidate("none", &[]);
        cand.skills = None;
        assert!(rank_candidates(&job, vec![cand]).is_empty());
    }
}
