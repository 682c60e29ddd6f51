use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use clap::Parser;
use tracing::{info, warn};

use engine::adapters::groq::{GroqReviewer, DEFAULT_MODEL};
use engine::adapters::mock::MockReviewer;
use engine::adapters::timeout::{TimeoutReviewer, DEFAULT_TIMEOUT};
use engine::config::{load_config, Config};
use engine::report::{serialize, to_markdown, ReportFormat};
use engine::reviewer::CodeReviewer;
use engine::session::Session;
use engine::{AnalysisRequest, Language, TaskKind};

/// One-shot code review: read code, run a single analysis, print the
/// critique, optionally write a report artifact.
#[derive(Debug, Parser)]
#[command(name = "coderefine", version, about = "AI code review and optimization")]
pub struct Cli {
    /// Source file to analyze; reads stdin when omitted.
    pub file: Option<PathBuf>,

    /// Language label (python, javascript, ...); guessed from the file
    /// extension when omitted, falling back to "other".
    #[arg(long)]
    pub language: Option<String>,

    /// Analysis task: comprehensive, bugs, performance, security,
    /// best_practices or rewrite.
    #[arg(long, default_value = "comprehensive")]
    pub task: String,

    /// Use the offline mock backend instead of the live endpoint.
    #[arg(long)]
    pub mock: bool,

    /// Model name override.
    #[arg(long)]
    pub model: Option<String>,

    /// Chat-completions base URL override.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Config file (YAML or JSON).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Per-call timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Write a report artifact: markdown or document.
    #[arg(long)]
    pub report: Option<String>,

    /// Report path; defaults to coderefine_analysis_<timestamp>.{md,txt}.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub async fn run(cli: Cli) -> Result<()> {
    let mut cfg = load_config(cli.config.as_deref()).map_err(|e| anyhow!(e))?;
    apply_flags(&mut cfg, &cli);

    let code = read_code(cli.file.as_deref())?;
    let language = resolve_language(cli.language.as_deref(), cli.file.as_deref());
    let task = TaskKind::parse(&cli.task).ok_or_else(|| {
        anyhow!(
            "unknown task: {} (expected one of: {})",
            cli.task,
            TaskKind::ALL.map(|t| t.name()).join(", ")
        )
    })?;
    let request = AnalysisRequest::new(code, language, task)?;

    let session = Session::new(build_reviewer(&cfg));
    info!(
        backend = session.reviewer_name(),
        language = %language,
        task = %task,
        "starting analysis"
    );
    let result = session.analyze(&request).await?;
    info!(issues = result.issue_count(), "analysis complete");

    print!("{}", to_markdown(&result));

    if let Some(format) = cli.report.as_deref() {
        let format = parse_format(format)?;
        let bytes = serialize(&result, format)?;
        let path = cli
            .output
            .clone()
            .unwrap_or_else(|| default_artifact_path(format, Local::now()));
        fs::write(&path, bytes)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }
    Ok(())
}

/// Command-line flags win over file and environment configuration.
fn apply_flags(cfg: &mut Config, cli: &Cli) {
    if cli.mock {
        cfg.mock = true;
    }
    if let Some(model) = &cli.model {
        cfg.model = Some(model.clone());
    }
    if let Some(url) = &cli.base_url {
        cfg.base_url = Some(url.clone());
    }
    if let Some(secs) = cli.timeout_secs {
        cfg.timeout_secs = Some(secs);
    }
}

/// Build the backend once from the resolved config. A missing credential is
/// not an error here; the live backend reports it as a config error when the
/// call is made.
pub fn build_reviewer(cfg: &Config) -> Arc<dyn CodeReviewer> {
    let deadline = cfg
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT);
    if cfg.mock {
        Arc::new(TimeoutReviewer::new(MockReviewer, deadline))
    } else {
        let model = cfg
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let key = cfg.api_key.clone().unwrap_or_default();
        let mut live = GroqReviewer::new(model, key, cfg.base_url.clone());
        if let Some(temperature) = cfg.temperature {
            live = live.with_temperature(temperature);
        }
        if let Some(max_tokens) = cfg.max_tokens {
            live = live.with_max_tokens(max_tokens);
        }
        Arc::new(TimeoutReviewer::new(live, deadline))
    }
}

fn read_code(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read code from stdin")?;
            Ok(buf)
        }
    }
}

fn resolve_language(label: Option<&str>, file: Option<&Path>) -> Language {
    if let Some(label) = label {
        let language = Language::parse(label);
        if language == Language::Other && !label.trim().eq_ignore_ascii_case("other") {
            warn!(
                label,
                known = %Language::ALL.map(|l| l.label()).join(", "),
                "unknown language label, treating as other"
            );
        }
        return language;
    }
    file.and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .and_then(Language::from_extension)
        .unwrap_or(Language::Other)
}

fn parse_format(name: &str) -> Result<ReportFormat> {
    match name.to_lowercase().as_str() {
        "markdown" | "md" => Ok(ReportFormat::Markdown),
        "document" | "txt" => Ok(ReportFormat::Document),
        other => Err(anyhow!(
            "unknown report format: {other} (expected markdown or document)"
        )),
    }
}

fn default_artifact_path(format: ReportFormat, now: DateTime<Local>) -> PathBuf {
    let ext = match format {
        ReportFormat::Markdown => "md",
        ReportFormat::Document => "txt",
    };
    PathBuf::from(format!(
        "coderefine_analysis_{}.{ext}",
        now.format("%Y%m%d_%H%M%S")
    ))
}
