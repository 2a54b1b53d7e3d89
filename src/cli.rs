// src/cli.rs
use crate::analysis::{self, classification_description, AnalysisResult, Level, SkillEntry};
use crate::app_log;
use crate::core::{ConfigManager, FsOps};
use crate::privacy::mask_sensitive_data;
use crate::session::{
    format_countdown, is_urgent, ActivityBus, ActivityEvent, SessionPhase, SessionTimeout,
    SessionTimeoutConfig,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "hirelens")]
#[command(about = "Structure AI applicant evaluations and exercise session expiry")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse an evaluation report from a file or stdin
    Analyze {
        file: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Mask personal data in raw text output
        #[arg(long)]
        mask: bool,
    },
    /// Clean a single evidence string
    Clean { text: String },
    /// Run a session timeout fed by activity names on stdin
    Session {
        #[arg(long)]
        idle_secs: Option<u64>,
        #[arg(long)]
        warning_secs: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Summary,
}

pub async fn run(cli: Cli, config: ConfigManager) -> Result<()> {
    match cli.command {
        Command::Analyze { file, format, mask } => {
            let text = FsOps::read_input(file.as_deref()).await?;
            let result = analysis::parse_with(&text, &config.parser_options());
            app_log!(
                info,
                "Parsed report: {} skills, {} culture fit items, {} questions",
                result.skills.len(),
                result.culture_fit.len(),
                result.interview_questions.len()
            );
            let output = render_analysis(&text, &result, format, mask)?;
            println!("{}", output);
        }
        Command::Clean { text } => {
            println!("{}", analysis::clean_evidence(&text));
        }
        Command::Session {
            idle_secs,
            warning_secs,
        } => {
            let timeout_config = session_config(&config, idle_secs, warning_secs)?;
            run_session(timeout_config).await?;
        }
    }

    Ok(())
}

/// Config values with the command-line overrides applied, validated the same way
pub fn session_config(
    config: &ConfigManager,
    idle_secs: Option<u64>,
    warning_secs: Option<u64>,
) -> Result<SessionTimeoutConfig> {
    let mut config = config.clone();
    if let Some(secs) = idle_secs {
        config.session.idle_timeout_secs = secs;
    }
    if let Some(secs) = warning_secs {
        config.session.warning_secs = secs;
    }
    config.validate()?;
    Ok(config.session_timeout())
}

pub fn render_analysis(
    raw: &str,
    result: &AnalysisResult,
    format: OutputFormat,
    mask: bool,
) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(result).context("Failed to serialize analysis")
        }
        OutputFormat::Summary if !result.has_data() => {
            app_log!(warn, "Report could not be structured, showing raw text");
            Ok(if mask {
                mask_sensitive_data(raw)
            } else {
                raw.to_string()
            })
        }
        OutputFormat::Summary => Ok(render_summary(result)),
    }
}

/// Plain-text reviewer summary of a structured report
pub fn render_summary(result: &AnalysisResult) -> String {
    let mut out = String::new();

    if let Some(profile) = &result.profile {
        let fields = [
            ("지원 트랙", &profile.track),
            ("전공", &profile.major),
            ("인적 사항", &profile.personal_info),
            ("현재 상태", &profile.status),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                let _ = writeln!(out, "{}: {}", label, value);
            }
        }
    }

    if let Some(overview) = &result.overview {
        if let Some(classification) = &overview.classification {
            let _ = writeln!(out, "\n[최종 분류] {}", classification);
            let _ = writeln!(out, "{}", classification_description(classification));
        }
        for (label, level) in [("역량 (Skill)", &overview.skill_level), ("의지 (Will)", &overview.will_level)] {
            if let Some(level) = level {
                let shown = Level::parse(level).map(|l| l.label()).unwrap_or(level.as_str());
                let _ = writeln!(out, "{}: {}", label, shown);
            }
        }
    }

    write_skills(&mut out, "짚어볼 만한 역량", &result.flagged_skills());
    write_skills(&mut out, "우수 역량", &result.excellent_skills());

    if !result.culture_fit.is_empty() {
        let _ = writeln!(out, "\n[조직 적합성]");
        for item in &result.culture_fit {
            let _ = writeln!(out, "- {} [{}] {}", item.name, item.status.label(), item.description);
        }
    }

    write_list(&mut out, "핵심 강점", &result.strengths);
    write_list(&mut out, "주의 사항", &result.risks);
    write_list(&mut out, "추천 면접 질문", &result.interview_questions);

    out.trim_end().to_string()
}

fn write_skills(out: &mut String, title: &str, skills: &[&SkillEntry]) {
    if skills.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n[{}]", title);
    for skill in skills {
        let evidence = if skill.evidence.is_empty() { "-" } else { skill.evidence.as_str() };
        let _ = writeln!(out, "- {} ({}): {}", skill.name, skill.level, evidence);
        if !skill.judgment.is_empty() {
            let _ = writeln!(out, "  판정: {}", skill.judgment);
        }
    }
}

fn write_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n[{}]", title);
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, item);
    }
}

#[derive(Debug, Clone, Copy)]
enum SessionNotice {
    Warning,
    Timeout,
}

async fn run_session(config: SessionTimeoutConfig) -> Result<()> {
    let bus = ActivityBus::default();
    let (notices, mut notice_rx) = mpsc::unbounded_channel();
    let warn_tx = notices.clone();
    let timeout = SessionTimeout::new(
        config,
        bus.clone(),
        move || {
            let _ = warn_tx.send(SessionNotice::Warning);
        },
        move || {
            let _ = notices.send(SessionNotice::Timeout);
        },
    );

    timeout.set_logged_in(true).await;
    println!(
        "Session {} started: warning after {}, logout {} later",
        timeout.id(),
        format_countdown(config.idle_timeout),
        format_countdown(config.warning_duration)
    );
    println!("Type an activity ({}), 'extend', 'status' or 'logout'", activity_names());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    app_log!(info, "stdin closed, logging out");
                    break;
                };
                match line.trim() {
                    "" => {}
                    "extend" => timeout.extend_session().await,
                    "logout" => break,
                    "status" => {
                        let snapshot = timeout.snapshot().await;
                        println!("{}", serde_json::to_string(&snapshot).context("Failed to serialize status")?);
                    }
                    other => match other.parse::<ActivityEvent>() {
                        Ok(event) => {
                            bus.publish(event);
                        }
                        Err(e) => app_log!(warn, "{}", e),
                    },
                }
            }
            Some(notice) = notice_rx.recv() => match notice {
                SessionNotice::Warning => {
                    println!("Session expiring soon, type 'extend' to keep working");
                }
                SessionNotice::Timeout => {
                    println!("Session expired");
                    break;
                }
            },
            _ = ticker.tick() => {
                if timeout.phase().await == SessionPhase::Warned {
                    if let Some(remaining) = timeout.warning_remaining().await {
                        let secs = remaining.as_secs();
                        if is_urgent(remaining) || secs % 10 == 0 {
                            println!("{} 후 로그아웃", format_countdown(remaining));
                        }
                    }
                }
            }
        }
    }

    timeout.set_logged_in(false).await;
    Ok(())
}

fn activity_names() -> String {
    ActivityEvent::ALL
        .iter()
        .map(|e| e.dom_name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "[1. 종합]\n최종 분류 : [면접 권장]\n역량 수준 (Skill) : [상]\n[2. 역량]\n직무 역량 | [상]\n근거: 사내 배포 파이프라인 구축\n문제 해결 | [하]\n[4. 가이드]\n🙋 면접 질문\n- 배포 실패를 복구했던 과정을 설명해 주세요";

    #[test]
    fn test_render_summary_sections() {
        let result = analysis::parse(REPORT);
        let summary = render_summary(&result);
        assert!(summary.contains("[최종 분류] 면접 권장"));
        assert!(summary.contains("역량 (Skill): 높음"));
        assert!(summary.contains("[짚어볼 만한 역량]\n- 문제 해결 (하): -"));
        assert!(summary.contains("[우수 역량]\n- 직무 역량 (상): 사내 배포 파이프라인 구축"));
        assert!(summary.contains("1. 배포 실패를 복구했던 과정을 설명해 주세요"));
    }

    #[test]
    fn test_render_falls_back_to_raw_text() {
        let raw = "분석 실패: 담당자 010-1234-5678";
        let result = analysis::parse(raw);
        let plain = render_analysis(raw, &result, OutputFormat::Summary, false).unwrap();
        assert_eq!(plain, raw);
        let masked = render_analysis(raw, &result, OutputFormat::Summary, true).unwrap();
        assert_eq!(masked, "분석 실패: 담당자 010-****-5678");
    }

    #[test]
    fn test_session_flags_override_config() {
        let config = ConfigManager::default();
        let timeout = session_config(&config, Some(90), None).unwrap();
        assert_eq!(timeout.idle_timeout, Duration::from_secs(90));
        assert_eq!(timeout.warning_duration, Duration::from_secs(120));

        assert!(session_config(&config, Some(0), None).is_err());
        assert!(session_config(&config, None, Some(0)).is_err());
    }

    #[test]
    fn test_render_json_uses_camel_case() {
        let result = analysis::parse(REPORT);
        let json = render_analysis(REPORT, &result, OutputFormat::Json, false).unwrap();
        assert!(json.contains("\"interviewQuestions\""));
        assert!(json.contains("\"skillLevel\": \"상\""));
    }

    #[test]
    fn test_cli_parses_analyze_flags() {
        let cli = Cli::try_parse_from(["hirelens", "analyze", "report.txt", "--format", "summary", "--mask"]).unwrap();
        match cli.command {
            Command::Analyze { file, format, mask } => {
                assert_eq!(file, Some(PathBuf::from("report.txt")));
                assert_eq!(format, OutputFormat::Summary);
                assert!(mask);
            }
            _ => panic!("expected analyze"),
        }
    }
}
