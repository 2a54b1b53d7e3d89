// src/analysis/patterns.rs
//! Label and marker patterns of the evaluation report format.
//!
//! The report is produced by an LLM prompt written in Korean, so every
//! phrase here is tied to that prompt. Keep them in one place so drift in the
//! prompt output can be fixed and tested without touching the scanner.

use once_cell::sync::Lazy;
use regex::Regex;

/// Bracketed section markers, in report order
pub const PROFILE_MARKER: &str = "[0.";
pub const OVERVIEW_MARKER: &str = "[1.";
pub const SKILLS_MARKER: &str = "[2.";
pub const CULTURE_FIT_MARKER: &str = "[3.";
pub const GUIDE_MARKER: &str = "[4.";

pub const HORIZONTAL_RULE: &str = "---";

pub const EVIDENCE_PREFIX: &str = "근거:";
pub const JUDGMENT_PREFIX: &str = "판정:";

/// Guide subsection markers: an emoji and its text equivalent
pub const STRENGTHS_MARKERS: &[&str] = &["💡", "핵심 강점"];
pub const RISKS_MARKERS: &[&str] = &["⚠", "주의 사항"];
pub const QUESTIONS_MARKERS: &[&str] = &["🙋", "면접 질문"];

/// Fixed competency rows of the skills table
pub const SKILL_CATEGORIES: &[&str] = &["직무 역량", "문제 해결", "성장 잠재력", "협업 태도"];

/// Values that mean "no data" after cleaning
pub const EMPTY_MARKERS: &[&str] = &["-", "N/A"];

pub const MIN_CLEAN_LEN: usize = 3;

fn labeled(label: &str) -> Regex {
    Regex::new(&format!(r"{}\s*[:：]\s*(.+)", regex::escape(label)))
        .expect("label pattern is valid")
}

pub static PROFILE_TRACK: Lazy<Regex> = Lazy::new(|| labeled("지원 트랙"));
pub static PROFILE_MAJOR: Lazy<Regex> = Lazy::new(|| labeled("전공 정보"));
pub static PROFILE_PERSONAL_INFO: Lazy<Regex> = Lazy::new(|| labeled("인적 사항"));
pub static PROFILE_STATUS: Lazy<Regex> = Lazy::new(|| labeled("현재 상태"));

pub static OVERVIEW_CLASSIFICATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"최종 분류\s*[:：]\s*\[?([^\]]+)\]?").expect("valid pattern"));

/// Needs the English tag to tell the two gauges apart
pub static OVERVIEW_SKILL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"역량.*?\(Skill\).*?[:：]\s*\[?([^\]]+)\]?").expect("valid pattern"));

pub static OVERVIEW_WILL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"의지.*?\(Will\).*?[:：]\s*\[?([^\]]+)\]?").expect("valid pattern"));

/// `직무 역량 | [상]`: category, then a level token holding a level glyph or word
pub static SKILL_ROW: Lazy<Regex> = Lazy::new(|| {
    let categories = SKILL_CATEGORIES
        .iter()
        .map(|c| regex::escape(c))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"^({})\s*\|\s*\[?([^\s|]*(?:[상중하높음보통낮음]+|(?i:high|medium|low)))",
        categories
    ))
    .expect("valid pattern")
});

/// `[ ] 팀워크 : [확인됨]`; the status is validated separately
pub static CULTURE_FIT_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\s*\]\s*(.+?)\s*[:：]\s*\[([^\]]+)\]").expect("valid pattern"));

pub static NUMBERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s*").expect("valid pattern"));

pub static LABELED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)[:：]\s*(.+)").expect("valid pattern"));

pub static LABELED_QUESTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(.+?)[:：]\s*"?(.+?)"?$"#).expect("valid pattern"));

// Cleaning
pub static DETAIL_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)`detail`\s*:\s*\\*\s*").expect("valid pattern"));

pub static NO_ANSWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(답변\s*내용\s*부재\)").expect("valid pattern"));

pub static ALL_ANSWERS_BLANK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(모든\s*상세\s*답변이\s*공란[^)]*\)").expect("valid pattern"));

pub static BACKSLASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\+").expect("valid pattern"));

pub static BACKTICK_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`[^`]*`\s*:\s*").expect("valid pattern"));

pub static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("valid pattern"));
