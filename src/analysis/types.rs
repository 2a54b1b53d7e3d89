// src/analysis/types.rs
use serde::{Deserialize, Serialize};

/// Structured view of one applicant evaluation report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub profile: Option<Profile>,
    pub overview: Option<Overview>,
    pub skills: Vec<SkillEntry>,
    pub culture_fit: Vec<CultureFitEntry>,
    pub strengths: Vec<String>,
    pub risks: Vec<String>,
    pub interview_questions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub track: Option<String>,
    pub major: Option<String>,
    pub personal_info: Option<String>,
    pub status: Option<String>,
}

impl Profile {
    pub fn is_empty(&self) -> bool {
        self.track.is_none()
            && self.major.is_none()
            && self.personal_info.is_none()
            && self.status.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub classification: Option<String>,
    pub skill_level: Option<String>,
    pub will_level: Option<String>,
}

impl Overview {
    pub fn is_empty(&self) -> bool {
        self.classification.is_none() && self.skill_level.is_none() && self.will_level.is_none()
    }
}

/// One row of the competency table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: String,
    pub level: String,
    pub evidence: String,
    pub judgment: String,
}

impl SkillEntry {
    pub fn new(name: &str, level: &str) -> Self {
        Self {
            name: name.to_string(),
            level: level.to_string(),
            evidence: String::new(),
            judgment: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitStatus {
    #[serde(rename = "확인됨")]
    Confirmed,
    #[serde(rename = "미흡")]
    Insufficient,
}

impl FitStatus {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "확인됨" => Some(FitStatus::Confirmed),
            "미흡" => Some(FitStatus::Insufficient),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FitStatus::Confirmed => "확인됨",
            FitStatus::Insufficient => "미흡",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CultureFitEntry {
    pub name: String,
    pub status: FitStatus,
    pub description: String,
}

/// Minimum lengths used to keep list fragments out of the guide section.
///
/// These were tuned by hand against real reports and have no deeper rule
/// behind them, so they stay overridable through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureThresholds {
    /// A `label: value` line must be longer than this to count as a risk or question
    pub min_labeled_line_len: usize,
    pub min_strength_len: usize,
    pub min_risk_len: usize,
    pub min_question_len: usize,
}

impl Default for CaptureThresholds {
    fn default() -> Self {
        Self {
            min_labeled_line_len: 11,
            min_strength_len: 2,
            min_risk_len: 6,
            min_question_len: 11,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParserOptions {
    pub thresholds: CaptureThresholds,
}
