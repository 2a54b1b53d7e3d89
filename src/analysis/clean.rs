// src/analysis/clean.rs
use super::patterns::{
    ALL_ANSWERS_BLANK, BACKSLASHES, BACKTICK_LABEL, DETAIL_LABEL, EMPTY_MARKERS, MIN_CLEAN_LEN,
    NO_ANSWER, WHITESPACE_RUN,
};

/// Strip markup leftovers and "no answer" placeholders from a free-text value.
///
/// Returns an empty string when nothing meaningful is left, which callers
/// render as "no data".
pub fn clean_evidence(text: &str) -> String {
    let cleaned = strip_markup(text);
    if cleaned.chars().count() < MIN_CLEAN_LEN || EMPTY_MARKERS.contains(&cleaned.as_str()) {
        return String::new();
    }
    cleaned
}

/// Markup and placeholder removal without the short-value blanking, so
/// two-letter verdicts survive
pub(crate) fn strip_markup(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let cleaned = DETAIL_LABEL.replace_all(text, "");
    let cleaned = NO_ANSWER.replace_all(&cleaned, "");
    let cleaned = ALL_ANSWERS_BLANK.replace_all(&cleaned, "");
    let cleaned = BACKSLASHES.replace_all(&cleaned, "");
    let cleaned = BACKTICK_LABEL.replace_all(&cleaned, "");
    let cleaned = WHITESPACE_RUN.replace_all(&cleaned, " ");
    cleaned.trim().to_string()
}

/// Remove one leading `(` and one trailing `)`
pub(crate) fn strip_parens(text: &str) -> &str {
    let text = text.strip_prefix('(').unwrap_or(text);
    text.strip_suffix(')').unwrap_or(text)
}

pub(crate) fn strip_quotes(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '"' | '\u{201c}' | '\u{201d}'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_evidence_placeholders() {
        assert_eq!(clean_evidence("`detail`: (답변 내용 부재)"), "");
        assert_eq!(clean_evidence("(모든 상세 답변이 공란입니다)"), "");
        assert_eq!(clean_evidence("N/A"), "");
        assert_eq!(clean_evidence("-"), "");
        assert_eq!(clean_evidence("ab"), "");
        assert_eq!(clean_evidence(""), "");
    }

    #[test]
    fn test_clean_evidence_keeps_clean_text() {
        assert_eq!(clean_evidence("실제 경험이 있습니다"), "실제 경험이 있습니다");
    }

    #[test]
    fn test_clean_evidence_markup() {
        assert_eq!(
            clean_evidence("`answer`: 프로젝트\\n  리딩   경험"),
            "프로젝트n 리딩 경험"
        );
        assert_eq!(clean_evidence("`DETAIL` : \\\\ 3년 운영 경험"), "3년 운영 경험");
    }

    #[test]
    fn test_strip_markup_keeps_short_values() {
        assert_eq!(strip_markup("`detail`: \\\\충분"), "충분");
        assert_eq!(strip_markup("적합"), "적합");
        assert_eq!(clean_evidence("적합"), "");
    }

    #[test]
    fn test_strip_parens() {
        assert_eq!(strip_parens("(평가 불가)"), "평가 불가");
        assert_eq!(strip_parens("평가 (보류)"), "평가 (보류");
        assert_eq!(strip_parens("없음"), "없음");
    }
}
