// src/analysis/parser.rs
use std::iter::Peekable;
use std::str::Lines;

use tracing::{trace, warn};

use super::clean::{clean_evidence, strip_markup, strip_parens, strip_quotes};
use super::patterns::*;
use super::types::{
    AnalysisResult, CaptureThresholds, CultureFitEntry, FitStatus, Overview, ParserOptions,
    Profile, SkillEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Profile,
    Overview,
    Skills,
    CultureFit,
    Guide,
}

impl Section {
    fn from_marker(line: &str) -> Option<Self> {
        [
            (PROFILE_MARKER, Section::Profile),
            (OVERVIEW_MARKER, Section::Overview),
            (SKILLS_MARKER, Section::Skills),
            (CULTURE_FIT_MARKER, Section::CultureFit),
            (GUIDE_MARKER, Section::Guide),
        ]
        .into_iter()
        .find(|(marker, _)| line.contains(marker))
        .map(|(_, section)| section)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuideList {
    None,
    Strengths,
    Risks,
    InterviewQuestions,
}

impl GuideList {
    fn from_marker(line: &str) -> Option<Self> {
        let has = |markers: &[&str]| markers.iter().any(|m| line.contains(m));
        if has(STRENGTHS_MARKERS) {
            Some(GuideList::Strengths)
        } else if has(RISKS_MARKERS) {
            Some(GuideList::Risks)
        } else if has(QUESTIONS_MARKERS) {
            Some(GuideList::InterviewQuestions)
        } else {
            None
        }
    }
}

/// Parse an evaluation report with the default capture thresholds
pub fn parse(text: &str) -> AnalysisResult {
    parse_with(text, &ParserOptions::default())
}

/// Parse an evaluation report.
///
/// Never fails: lines that fit no pattern of the current section are skipped,
/// and a report in an unknown shape yields an empty result.
pub fn parse_with(text: &str, options: &ParserOptions) -> AnalysisResult {
    let mut scanner = ReportScanner::new(options.thresholds);
    let mut lines = text.lines().peekable();

    while let Some(raw) = lines.next() {
        scanner.scan_line(raw.trim(), &mut lines);
    }

    scanner.finish()
}

struct ReportScanner {
    thresholds: CaptureThresholds,
    section: Section,
    guide_list: GuideList,
    current_skill: Option<SkillEntry>,
    profile: Profile,
    overview: Overview,
    result: AnalysisResult,
}

impl ReportScanner {
    fn new(thresholds: CaptureThresholds) -> Self {
        Self {
            thresholds,
            section: Section::Preamble,
            guide_list: GuideList::None,
            current_skill: None,
            profile: Profile::default(),
            overview: Overview::default(),
            result: AnalysisResult::default(),
        }
    }

    fn scan_line(&mut self, line: &str, rest: &mut Peekable<Lines<'_>>) {
        if line.is_empty() || line == HORIZONTAL_RULE {
            return;
        }

        if let Some(section) = Section::from_marker(line) {
            trace!("Report section {:?} -> {:?}", self.section, section);
            if section == Section::CultureFit {
                self.flush_skill();
            }
            self.section = section;
            self.guide_list = GuideList::None;
            return;
        }

        match self.section {
            Section::Preamble => {}
            Section::Profile => self.scan_profile(line),
            Section::Overview => self.scan_overview(line),
            Section::Skills => self.scan_skill(line),
            Section::CultureFit => {
                let next = rest.peek().map(|l| l.trim());
                self.scan_culture_fit(line, next);
            }
            Section::Guide => self.scan_guide(line),
        }
    }

    fn scan_profile(&mut self, line: &str) {
        let fields = [
            (&*PROFILE_TRACK, &mut self.profile.track),
            (&*PROFILE_MAJOR, &mut self.profile.major),
            (&*PROFILE_PERSONAL_INFO, &mut self.profile.personal_info),
            (&*PROFILE_STATUS, &mut self.profile.status),
        ];
        for (pattern, field) in fields {
            if let Some(caps) = pattern.captures(line) {
                *field = Some(caps[1].trim().to_string());
            }
        }
    }

    fn scan_overview(&mut self, line: &str) {
        let fields = [
            (&*OVERVIEW_CLASSIFICATION, &mut self.overview.classification),
            (&*OVERVIEW_SKILL, &mut self.overview.skill_level),
            (&*OVERVIEW_WILL, &mut self.overview.will_level),
        ];
        for (pattern, field) in fields {
            if let Some(caps) = pattern.captures(line) {
                *field = Some(caps[1].trim().to_string());
            }
        }
    }

    fn scan_skill(&mut self, line: &str) {
        if let Some(caps) = SKILL_ROW.captures(line) {
            self.flush_skill();
            let level = caps[2].replace(['[', ']'], "");
            self.current_skill = Some(SkillEntry::new(caps[1].trim(), level.trim()));
            return;
        }

        let Some(skill) = self.current_skill.as_mut() else {
            return;
        };

        if let Some(evidence) = line.strip_prefix(EVIDENCE_PREFIX) {
            skill.evidence = clean_evidence(strip_quotes(evidence).trim());
        } else if let Some(judgment) = line.strip_prefix(JUDGMENT_PREFIX) {
            let judgment = strip_markup(judgment);
            skill.judgment = strip_parens(&judgment).trim().to_string();
        }
    }

    fn scan_culture_fit(&mut self, line: &str, next: Option<&str>) {
        let Some(caps) = CULTURE_FIT_ROW.captures(line) else {
            return;
        };

        let name = caps[1].trim();
        let Some(status) = FitStatus::from_label(&caps[2]) else {
            warn!(
                "Skipping culture fit item '{}' with unknown status '{}'",
                name,
                &caps[2]
            );
            return;
        };

        let description = next
            .filter(|next| is_description(next))
            .map(|next| clean_evidence(strip_parens(next).trim()))
            .unwrap_or_default();

        self.result.culture_fit.push(CultureFitEntry {
            name: name.to_string(),
            status,
            description,
        });
    }

    fn scan_guide(&mut self, line: &str) {
        if let Some(list) = GuideList::from_marker(line) {
            self.guide_list = list;
            return;
        }

        let t = self.thresholds;
        let line_len = line.chars().count();

        match self.guide_list {
            GuideList::None => {}
            GuideList::Strengths => {
                if NUMBERED_ITEM.is_match(line) {
                    let content = NUMBERED_ITEM.replace(line, "");
                    let content = content.trim();
                    if content.chars().count() >= t.min_strength_len {
                        self.result.strengths.push(content.to_string());
                    }
                }
            }
            GuideList::Risks => {
                if LABELED_LINE.is_match(line) && line_len >= t.min_labeled_line_len {
                    self.result.risks.push(line.to_string());
                } else if line.starts_with('-') || line.starts_with('(') {
                    let content = strip_list_prefix(line);
                    if content.chars().count() >= t.min_risk_len {
                        self.result.risks.push(content.to_string());
                    }
                }
            }
            GuideList::InterviewQuestions => {
                let labeled = LABELED_QUESTION.captures(line);
                match labeled {
                    Some(caps) if line_len >= t.min_labeled_line_len => {
                        let question = strip_quotes(&caps[2]);
                        let question = question.trim();
                        if question.chars().count() >= t.min_question_len {
                            self.result.interview_questions.push(question.to_string());
                        }
                    }
                    _ => {
                        if line.starts_with(['-', '(', '\u{201c}']) {
                            let content = strip_quotes(strip_list_prefix(line));
                            let content = content.trim();
                            if content.chars().count() >= t.min_question_len {
                                self.result.interview_questions.push(content.to_string());
                            }
                        }
                    }
                }
            }
        }
    }

    fn flush_skill(&mut self) {
        if let Some(skill) = self.current_skill.take() {
            self.result.skills.push(skill);
        }
    }

    fn finish(mut self) -> AnalysisResult {
        self.flush_skill();
        if !self.profile.is_empty() {
            self.result.profile = Some(self.profile);
        }
        if !self.overview.is_empty() {
            self.result.overview = Some(self.overview);
        }
        self.result
    }
}

/// The line after a culture fit item describes it unless it starts something new
fn is_description(next: &str) -> bool {
    next.starts_with('(')
        || (next.chars().count() > 3 && !next.starts_with('[') && !next.starts_with(HORIZONTAL_RULE))
}

/// Drop a leading `- ` or `(` and a trailing `)`
fn strip_list_prefix(line: &str) -> &str {
    let body = if let Some(rest) = line.strip_prefix('-') {
        rest.trim_start()
    } else {
        line.strip_prefix('(').unwrap_or(line)
    };
    body.strip_suffix(')').unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_REPORT: &str = r#"
[0. 서류 지원 현황]
지원 트랙 : 백엔드 개발
전공 정보 : 컴퓨터공학 (주전공)
인적 사항 : 만 26세
현재 상태 : 졸업 예정
---
[1. 종합 진단 결과]
최종 분류 : [즉시 면접]
역량 수준 (Skill) : [상]
의지 수준 (Will) : [보통]
---
[2. 역량 상세 분석]
직무 역량 | [상]
근거: "Spring 기반 API 서버를 2년간 운영"
판정: (충분)
문제 해결 | [중]
근거: `detail`: (답변 내용 부재)
협업 태도 | [하]
[3. 조직 적합성]
[ ] 팀워크 : [확인됨]
(스터디 리더 경험을 통해 확인)
[ ] 책임감 : [미흡]
[4. 면접 가이드]
💡 핵심 강점
1. 대규모 트래픽 처리 경험
2. 꾸준한 학습 태도
⚠️ 주의 사항
협업 경험: 팀 프로젝트 경험이 부족함
- 장기 근속 의지 확인 필요
🙋 추천 면접 질문
Q1: "가장 어려웠던 장애 대응 경험을 말씀해 주세요"
- 팀 내 갈등을 해결한 경험이 있나요?
"#;

    #[test]
    fn test_parse_full_report() {
        let result = parse(FULL_REPORT);

        let profile = result.profile.as_ref().unwrap();
        assert_eq!(profile.track.as_deref(), Some("백엔드 개발"));
        assert_eq!(profile.major.as_deref(), Some("컴퓨터공학 (주전공)"));
        assert_eq!(profile.personal_info.as_deref(), Some("만 26세"));
        assert_eq!(profile.status.as_deref(), Some("졸업 예정"));

        let overview = result.overview.as_ref().unwrap();
        assert_eq!(overview.classification.as_deref(), Some("즉시 면접"));
        assert_eq!(overview.skill_level.as_deref(), Some("상"));
        assert_eq!(overview.will_level.as_deref(), Some("보통"));

        assert_eq!(result.skills.len(), 3);
        assert_eq!(result.skills[0].name, "직무 역량");
        assert_eq!(result.skills[0].level, "상");
        assert_eq!(result.skills[0].evidence, "Spring 기반 API 서버를 2년간 운영");
        assert_eq!(result.skills[0].judgment, "충분");
        assert_eq!(result.skills[1].evidence, "");
        assert_eq!(result.skills[2].name, "협업 태도");
        assert_eq!(result.skills[2].level, "하");

        assert_eq!(result.culture_fit.len(), 2);
        assert_eq!(result.culture_fit[0].name, "팀워크");
        assert_eq!(result.culture_fit[0].status, FitStatus::Confirmed);
        assert_eq!(result.culture_fit[0].description, "스터디 리더 경험을 통해 확인");
        assert_eq!(result.culture_fit[1].status, FitStatus::Insufficient);
        assert_eq!(result.culture_fit[1].description, "");

        assert_eq!(result.strengths, vec!["대규모 트래픽 처리 경험", "꾸준한 학습 태도"]);
        assert_eq!(
            result.risks,
            vec!["협업 경험: 팀 프로젝트 경험이 부족함", "장기 근속 의지 확인 필요"]
        );
        assert_eq!(
            result.interview_questions,
            vec![
                "가장 어려웠던 장애 대응 경험을 말씀해 주세요",
                "팀 내 갈등을 해결한 경험이 있나요?"
            ]
        );
    }

    #[test]
    fn test_parse_empty_and_unstructured_input() {
        assert_eq!(parse(""), AnalysisResult::default());

        let result = parse("지원자는 전반적으로 우수합니다.\n특이사항 없음.");
        assert_eq!(result, AnalysisResult::default());
        assert!(result.profile.is_none());
        assert!(result.overview.is_none());
    }

    #[test]
    fn test_parse_tolerates_malformed_lines() {
        let text = "[2.\n직무 역량 |\n근거:\n[3.\n[ ] : []\n[ ]\n[4.\n🙋\n:\n- \n(\n\u{201c}\n1.\n[9. 기타]\r\n판정: 없음";
        let result = parse(text);
        assert!(result.skills.is_empty());
        assert!(result.culture_fit.is_empty());
        assert!(result.interview_questions.is_empty());
    }

    #[test]
    fn test_parse_is_idempotent() {
        assert_eq!(parse(FULL_REPORT), parse(FULL_REPORT));
    }

    #[test]
    fn test_skill_evidence_and_judgment() {
        let text = "[2. 역량]\n직무 역량 | [하]\n근거: \"경험 없음\"\n판정: (평가 불가)";
        let result = parse(text);
        assert_eq!(
            result.skills,
            vec![SkillEntry {
                name: "직무 역량".to_string(),
                level: "하".to_string(),
                evidence: "경험 없음".to_string(),
                judgment: "평가 불가".to_string(),
            }]
        );
    }

    #[test]
    fn test_judgment_markup_is_stripped() {
        let result = parse("[2. 역량]\n직무 역량 | [상]\n판정: `detail`: \\\\충분\n문제 해결 | [중]\n판정: (`answer`: 보완 필요)");
        assert_eq!(result.skills[0].judgment, "충분");
        assert_eq!(result.skills[1].judgment, "보완 필요");
        for skill in &result.skills {
            assert!(!skill.judgment.contains('`'));
            assert!(!skill.judgment.contains('\\'));
        }
    }

    #[test]
    fn test_skill_without_details_keeps_empty_fields() {
        let result = parse("[2. 역량]\n성장 잠재력 | [중]\n문제 해결 | [상]");
        assert_eq!(result.skills.len(), 2);
        assert_eq!(result.skills[0], SkillEntry::new("성장 잠재력", "중"));
        assert_eq!(result.skills[0].evidence, "");
        assert_eq!(result.skills[0].judgment, "");
    }

    #[test]
    fn test_open_skill_flushed_once_on_culture_fit() {
        let text = "[2. 역량]\n직무 역량 | [상]\n근거: 실무 프로젝트 3건\n[3. 적합성]\n[ ] 팀워크 : [확인됨]\n[4. 가이드]";
        let result = parse(text);
        assert_eq!(result.skills.len(), 1);
        assert_eq!(result.skills[0].evidence, "실무 프로젝트 3건");
        assert_eq!(result.culture_fit.len(), 1);
    }

    #[test]
    fn test_open_skill_flushed_at_end_of_input() {
        let result = parse("[2. 역량]\n협업 태도 | 높음\n판정: 적합");
        assert_eq!(result.skills.len(), 1);
        assert_eq!(result.skills[0].level, "높음");
        assert_eq!(result.skills[0].judgment, "적합");
    }

    #[test]
    fn test_overview_classification_only() {
        let result = parse("[1. 종합]\n최종 분류 : [즉시 면접]");
        let overview = result.overview.unwrap();
        assert_eq!(overview.classification.as_deref(), Some("즉시 면접"));
        assert!(overview.skill_level.is_none());
        assert!(result.profile.is_none());
    }

    #[test]
    fn test_labels_outside_their_section_are_ignored() {
        let result = parse("최종 분류 : [즉시 면접]\n[0. 현황]\n최종 분류 : [보류]");
        assert!(result.overview.is_none());
        assert!(result.profile.is_none());
    }

    #[test]
    fn test_unknown_culture_fit_status_is_skipped() {
        let result = parse("[3. 적합성]\n[ ] 팀워크 : [보통]\n[ ] 책임감 : [확인됨]");
        assert_eq!(result.culture_fit.len(), 1);
        assert_eq!(result.culture_fit[0].name, "책임감");
    }

    #[test]
    fn test_culture_fit_description_not_taken_from_marker_line() {
        let result = parse("[3. 적합성]\n[ ] 팀워크 : [확인됨]\n[4. 가이드]");
        assert_eq!(result.culture_fit[0].description, "");
    }

    #[test]
    fn test_guide_filters_short_fragments() {
        let text = "[4. 가이드]\n💡 강점\n1. A\n2. 좋음\n⚠️ 주의\n- 짧음\n위험: 짧다\n🙋 질문\n- 왜요?\nQ: \"짧은 질문\"";
        let result = parse(text);
        assert_eq!(result.strengths, vec!["좋음"]);
        assert!(result.risks.is_empty());
        assert!(result.interview_questions.is_empty());
    }

    #[test]
    fn test_guide_paren_and_quote_prefixed_lines() {
        let text = "[4. 가이드]\n⚠️ 주의 사항\n(이직 사유에 대한 설명이 모호함)\n🙋 면접 질문\n\u{201c}입사 후 가장 먼저 해보고 싶은 일은?\u{201d}\n(최근 학습한 기술을 소개해 주세요)";
        let result = parse(text);
        assert_eq!(result.risks, vec!["이직 사유에 대한 설명이 모호함"]);
        assert_eq!(
            result.interview_questions,
            vec![
                "입사 후 가장 먼저 해보고 싶은 일은?",
                "최근 학습한 기술을 소개해 주세요"
            ]
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let options = ParserOptions {
            thresholds: CaptureThresholds {
                min_risk_len: 2,
                ..CaptureThresholds::default()
            },
        };
        let result = parse_with("[4. 가이드]\n주의 사항\n- 짧음", &options);
        assert_eq!(result.risks, vec!["짧음"]);
    }

    #[test]
    fn test_strip_list_prefix() {
        assert_eq!(strip_list_prefix("- 항목"), "항목");
        assert_eq!(strip_list_prefix("(괄호 항목)"), "괄호 항목");
        assert_eq!(strip_list_prefix("항목"), "항목");
    }
}
