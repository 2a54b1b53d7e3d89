// src/analysis/summary.rs
//! Reviewer-facing helpers on top of a parsed report.

use serde::{Deserialize, Serialize};

use super::types::{AnalysisResult, SkillEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    Medium,
    Low,
}

impl Level {
    /// Accepts the glyph, the word form and the English word, with or without brackets
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.replace(['[', ']'], "");
        match normalized.trim().to_lowercase().as_str() {
            "상" | "높음" | "high" => Some(Level::High),
            "중" | "보통" | "medium" => Some(Level::Medium),
            "하" | "낮음" | "low" => Some(Level::Low),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Level::High => "높음",
            Level::Medium => "보통",
            Level::Low => "낮음",
        }
    }
}

/// Reviewer guidance for a final classification label
pub fn classification_description(classification: &str) -> String {
    match classification.trim() {
        "즉시 면접" => "역량과 의지 모두 높은 수준으로 평가되어 즉시 면접을 권장합니다.".to_string(),
        "면접 권장" => "종합적으로 우수한 역량을 보유하고 있어 면접 대상으로 적합합니다.".to_string(),
        "조건부 검토" => {
            "일부 역량이 부족하나 잠재력이 있어 조건부 검토가 필요합니다.".to_string()
        }
        "보류" => "현재 기준에 부합하지 않는 부분이 있어 추가 검토가 필요합니다.".to_string(),
        other => format!("해당 지원자는 \"{}\" 단계로 분류되었습니다.", other),
    }
}

impl AnalysisResult {
    /// False when the report could not be structured; show the raw text instead
    pub fn has_data(&self) -> bool {
        let classified = self
            .overview
            .as_ref()
            .and_then(|o| o.classification.as_ref())
            .is_some();

        classified
            || !self.skills.is_empty()
            || !self.culture_fit.is_empty()
            || !self.strengths.is_empty()
            || !self.risks.is_empty()
            || !self.interview_questions.is_empty()
    }

    /// Skills rated medium or low, worth probing in the interview
    pub fn flagged_skills(&self) -> Vec<&SkillEntry> {
        self.skills_at(&[Level::Medium, Level::Low])
    }

    pub fn excellent_skills(&self) -> Vec<&SkillEntry> {
        self.skills_at(&[Level::High])
    }

    fn skills_at(&self, levels: &[Level]) -> Vec<&SkillEntry> {
        self.skills
            .iter()
            .filter(|s| Level::parse(&s.level).is_some_and(|l| levels.contains(&l)))
            .collect()
    }
}
