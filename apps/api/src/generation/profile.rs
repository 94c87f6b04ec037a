//! Candidate profile derived from the canonical history.

use crate::history::models::PositionRecord;
use crate::validation::models::{CandidateProfile, ExperienceLevel};

/// Years of professional experience: summed durations of positions with parseable dates.
/// Independent and portfolio work shows skills but does not count toward tenure.
pub fn years_of_experience(history: &[PositionRecord], reference_year: i32) -> f64 {
    history
        .iter()
        .filter(|r| !r.is_independent_work())
        .filter_map(|r| r.date_range())
        .map(|range| range.duration_years(reference_year).max(0) as f64)
        .sum()
}

pub fn experience_level(years: f64) -> ExperienceLevel {
    if years <= 2.0 {
        ExperienceLevel::Entry
    } else if years <= 5.0 {
        ExperienceLevel::Mid
    } else if years <= 10.0 {
        ExperienceLevel::Senior
    } else {
        ExperienceLevel::Principal
    }
}

pub fn derive_profile(history: &[PositionRecord], reference_year: i32) -> CandidateProfile {
    let years = years_of_experience(history, reference_year);
    CandidateProfile {
        experience_level: Some(experience_level(years)),
        years_experience: Some(years),
    }
}
