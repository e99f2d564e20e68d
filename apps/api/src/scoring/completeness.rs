use serde::Serialize;

use crate::models::resume::ResumeDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    FullName,
    Email,
    Title,
    Summary,
    Experience,
    Education,
    Skills,
    Photo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Criterion {
    pub kind: CriterionKind,
    pub weight: u32,
    pub met: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletenessReport {
    pub score: u32,
    pub band: ScoreBand,
    pub hint: &'static str,
    pub criteria: Vec<Criterion>,
}

const SUMMARY_MIN_CHARS: usize = 50;
const MIN_SKILLS: usize = 3;

const CRITERION_WEIGHTS: &[(CriterionKind, u32)] = &[
    (CriterionKind::FullName, 10),
    (CriterionKind::Email, 10),
    (CriterionKind::Title, 10),
    (CriterionKind::Summary, 15),
    (CriterionKind::Experience, 20),
    (CriterionKind::Education, 10),
    (CriterionKind::Skills, 15),
    (CriterionKind::Photo, 10),
];

fn present(value: &str) -> bool {
    !value.trim().is_empty()
}

fn is_met(kind: CriterionKind, doc: &ResumeDocument) -> bool {
    let info = &doc.personal_info;
    match kind {
        CriterionKind::FullName => present(&info.full_name),
        CriterionKind::Email => present(&info.email),
        CriterionKind::Title => present(&info.title),
        CriterionKind::Summary => doc.summary.chars().count() > SUMMARY_MIN_CHARS,
        CriterionKind::Experience => !doc.experience.is_empty(),
        CriterionKind::Education => !doc.education.is_empty(),
        CriterionKind::Skills => doc.skills.len() >= MIN_SKILLS,
        CriterionKind::Photo => doc.has_photo(),
    }
}

fn band_for(score: u32) -> ScoreBand {
    match score {
        0..=49 => ScoreBand::Low,
        50..=79 => ScoreBand::Medium,
        _ => ScoreBand::High,
    }
}

/// Scores how filled-out `doc` is, 0 to 100. Pure; recomputed on every change.
pub fn compute_completeness_report(doc: &ResumeDocument) -> CompletenessReport {
    let criteria: Vec<Criterion> = CRITERION_WEIGHTS
        .iter()
        .map(|&(kind, weight)| Criterion {
            kind,
            weight,
            met: is_met(kind, doc),
        })
        .collect();

    let score = criteria
        .iter()
        .filter(|c| c.met)
        .map(|c| c.weight)
        .sum::<u32>()
        .min(100);

    CompletenessReport {
        score,
        band: band_for(score),
        hint: if score >= 100 { "Ready!" } else { "Add details" },
        criteria,
    }
}
