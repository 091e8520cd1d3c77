//! Run assembly: merge flags over config, pick the agent CLI, build the session
//! and hand the pipeline to the scheduler.
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use policy_maker_core::api as core_api;
use policy_maker_core::api::{CliError, ConfigError};
use policy_maker_core::artifact::MemoryArtifactStore;
use policy_maker_plugins::backend::{detect_clis, find_strategy, supported_clis};
use policy_maker_plugins::executor::{JsonlRendererPlugin, TextRendererPlugin};
use policy_maker_plugins::runner::ProcessInvoker;

use crate::commands::cli::{RunArgs, StreamFormat};

/// Run input key that names the agent CLI.
pub const CLI_TOOL_KEY: &str = "CLI_TOOL";

#[tracing::instrument(name = "cli.run", skip_all, fields(input = %run_args.input, dry_run = run_args.dry_run))]
pub async fn run_pipeline(run_args: RunArgs, cfg: &core_api::AppConfig) -> Result<i32, CliError> {
    let input = core_api::RunInput::load(Path::new(&run_args.input)).await?;

    let root = match &run_args.root {
        Some(r) => PathBuf::from(r),
        None => core_api::find_project_root(&std::env::current_dir()?),
    };
    let templates_root = root.join(&cfg.workspace.templates_dir);
    let pipeline = pipeline_for_run(&run_args, cfg, &root)?;
    tracing::debug!(root = %root.display(), phases = pipeline.phases.len(), "pipeline loaded");

    if run_args.dry_run {
        let session_id = core_api::generate_session_id();
        let store = Arc::new(MemoryArtifactStore::new());
        let ctx = core_api::RunContext::new(session_id, input, store, templates_root);
        let plan = core_api::plan_dry_run(&pipeline, &ctx).await?;
        print!("{}", format_plan(&plan));
        return Ok(if plan.is_ready() { 0 } else { 1 });
    }

    let stream_format = stream_format_for_run(run_args.stream_format, cfg)?;
    let available = available_clis();
    let cli = select_cli(run_args.cli.as_deref(), &input, cfg, &available)?;
    let mut extra_args = cfg.agent.extra_args.clone();
    extra_args.extend(run_args.agent_args.iter().cloned());
    let invoker =
        ProcessInvoker::for_cli(&cli, &extra_args).map_err(|e| CliError::Agent(e.to_string()))?;

    let session = core_api::RunSession::create(&root, &cfg.workspace.data_dir, &input)
        .await
        .map_err(core_api::PipelineError::from)?;
    let ctx = core_api::RunContext::new(
        session.id(),
        input,
        Arc::new(session.store()),
        templates_root,
    );

    let renderer = renderer_for(stream_format, run_args.ascii || cfg.executor.ascii_only);
    tracing::debug!(renderer = renderer.name(), format = renderer.format(), "renderer selected");
    let progress_bar = cfg.executor.progress_bar
        && stream_format == StreamFormat::Text
        && atty::is(atty::Stream::Stderr);
    let max_parallel = run_args
        .max_parallel
        .or(Some(cfg.executor.max_parallel_tasks))
        .filter(|n| *n > 0);

    let scheduler = core_api::PhaseScheduler::builder(ctx, Arc::new(invoker))
        .renderer(renderer)
        .max_parallel(max_parallel)
        .progress_bar(progress_bar)
        .build();

    tracing::info!(session_id = %session.id(), cli = %cli, "run starting");
    match scheduler.run(&pipeline).await {
        Ok(report) => {
            if stream_format == StreamFormat::Text {
                print!("{}", format_report(&report, &session.artifacts_dir()));
            }
            Ok(0)
        }
        Err(e) => {
            eprintln!("artifacts kept in {}", session.artifacts_dir().display());
            Err(e.into())
        }
    }
}

pub fn renderer_for(
    stream_format: StreamFormat,
    ascii_only: bool,
) -> Arc<dyn core_api::OutputRendererPlugin> {
    match stream_format {
        StreamFormat::Text => Arc::new(TextRendererPlugin::new(ascii_only)),
        StreamFormat::Jsonl => Arc::new(JsonlRendererPlugin::new(false)),
    }
}

/// `--pipeline` first, then `workspace.pipeline_file`, then the built-in pipeline.
pub fn pipeline_for_run(
    run_args: &RunArgs,
    cfg: &core_api::AppConfig,
    root: &Path,
) -> Result<core_api::PipelineDef, CliError> {
    let path = run_args
        .pipeline
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| cfg.workspace.pipeline_file.as_ref().map(|p| root.join(p)));
    match path {
        Some(p) => Ok(core_api::load_pipeline(&p)?),
        None => Ok(core_api::builtin_pipeline()),
    }
}

pub fn stream_format_for_run(
    flag: Option<StreamFormat>,
    cfg: &core_api::AppConfig,
) -> Result<StreamFormat, CliError> {
    if let Some(f) = flag {
        return Ok(f);
    }
    StreamFormat::parse(&cfg.executor.stream_format).ok_or_else(|| {
        CliError::Config(ConfigError::InvalidValue {
            field: "executor.stream_format",
            value: cfg.executor.stream_format.clone(),
        })
    })
}

/// Agent CLI precedence: flag, run input `CLI_TOOL`, config, first installed.
pub fn select_cli(
    flag: Option<&str>,
    input: &core_api::RunInput,
    cfg: &core_api::AppConfig,
    available: &[&str],
) -> Result<String, CliError> {
    let requested = flag
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            input
                .non_empty(CLI_TOOL_KEY)
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
        .or(cfg.agent.cli.as_deref().map(str::trim).filter(|s| !s.is_empty()));

    match requested {
        Some(name) => match find_strategy(name) {
            Some(strategy) => Ok(strategy.name.to_string()),
            None => Err(CliError::Agent(format!(
                "unsupported agent cli '{}' (supported: {})",
                name,
                supported_clis().join(", ")
            ))),
        },
        None => available.first().map(|s| s.to_string()).ok_or_else(|| {
            CliError::Agent(format!(
                "no agent cli found on PATH (install one of: {})",
                supported_clis().join(", ")
            ))
        }),
    }
}

fn available_clis() -> Vec<&'static str> {
    detect_clis()
        .into_iter()
        .filter(|d| d.is_available())
        .map(|d| d.name)
        .collect()
}

pub fn format_plan(plan: &core_api::DryRunPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Dry run {}", plan.session_id);
    let _ = writeln!(out, "\nService context:\n{}", plan.computed_context);
    for (idx, phase) in plan.phases.iter().enumerate() {
        let _ = writeln!(out, "\nPhase {}: {}", idx + 1, phase.name);
        for task in &phase.tasks {
            let mark = if task.template_found { "ok" } else { "missing" };
            let _ = writeln!(
                out,
                "  - {} [{}] {} -> {}",
                task.name, mark, task.prompt_file, task.output_file
            );
            if !task.unbound.is_empty() {
                let _ = writeln!(out, "      unbound: {}", task.unbound.join(", "));
            }
        }
        if let Some(dir) = &phase.summary_dir {
            let _ = writeln!(out, "  summary: {}/{}", dir, core_api::SUMMARY_FILE_NAME);
        }
    }
    let missing = plan.missing_templates().count();
    if missing > 0 {
        let _ = writeln!(out, "\n{} template(s) missing", missing);
    }
    out
}

pub fn format_report(report: &core_api::RunReport, artifacts_dir: &Path) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\nDone: {} tasks in {} phases ({}ms)",
        report.task_count(),
        report.phases.len(),
        report.duration_ms
    );
    let _ = writeln!(out, "Artifacts: {}", artifacts_dir.display());
    for summary in report.summaries() {
        let _ = writeln!(out, "  summary: {}", summary);
    }
    out
}

/// Print every supported agent CLI and where it resolves.
pub fn detect() -> i32 {
    let detected = detect_clis();
    for cli in &detected {
        match &cli.path {
            Some(path) => println!("{:<10} {}", cli.name, path.display()),
            None => println!("{:<10} (not found)", cli.name),
        }
    }
    if detected.iter().any(|d| d.is_available()) {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_api::{AppConfig, RunInput};
    use policy_maker_core::executor::{PhasePlan, TaskPlan};
    use pretty_assertions::assert_eq;

    fn input_with(pairs: &[(&str, &str)]) -> RunInput {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_flag_beats_input_and_config() {
        let mut cfg = AppConfig::default();
        cfg.agent.cli = Some("gemini".into());
        let input = input_with(&[(CLI_TOOL_KEY, "codex")]);
        let cli = select_cli(Some("claude"), &input, &cfg, &["opencode"]).unwrap();
        assert_eq!(cli, "claude");
    }

    #[test]
    fn test_input_beats_config() {
        let mut cfg = AppConfig::default();
        cfg.agent.cli = Some("gemini".into());
        let input = input_with(&[(CLI_TOOL_KEY, " codex ")]);
        assert_eq!(select_cli(None, &input, &cfg, &[]).unwrap(), "codex");
    }

    #[test]
    fn test_falls_back_to_first_detected() {
        let cfg = AppConfig::default();
        let input = input_with(&[(CLI_TOOL_KEY, "  ")]);
        let cli = select_cli(None, &input, &cfg, &["claude", "codex"]).unwrap();
        assert_eq!(cli, "claude");
    }

    #[test]
    fn test_nothing_installed_is_agent_error() {
        let err = select_cli(None, &RunInput::default(), &AppConfig::default(), &[]).unwrap_err();
        assert!(matches!(err, CliError::Agent(_)));
        assert_eq!(err.exit_code(), 20);
    }

    #[test]
    fn test_unknown_cli_lists_supported() {
        let err = select_cli(Some("cursor"), &RunInput::default(), &AppConfig::default(), &[])
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("cursor"));
        assert!(msg.contains("gemini, claude, codex, opencode"));
    }

    #[test]
    fn test_stream_format_flag_then_config() {
        let mut cfg = AppConfig::default();
        cfg.executor.stream_format = "jsonl".into();
        assert_eq!(
            stream_format_for_run(Some(StreamFormat::Text), &cfg).unwrap(),
            StreamFormat::Text
        );
        assert_eq!(stream_format_for_run(None, &cfg).unwrap(), StreamFormat::Jsonl);

        cfg.executor.stream_format = "xml".into();
        let err = stream_format_for_run(None, &cfg).unwrap_err();
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn test_format_plan_marks_missing_templates() {
        let plan = core_api::DryRunPlan {
            session_id: "20250101-000000-0badcafe".into(),
            computed_context: "서비스 요약: N/A".into(),
            phases: vec![PhasePlan {
                name: "Phase 2: Experts".into(),
                summary_dir: Some("R1/expert".into()),
                tasks: vec![
                    TaskPlan {
                        name: "policy-ops".into(),
                        prompt_file: "prompts/ops.md".into(),
                        output_file: "R1/expert/policy_ops.md".into(),
                        template_found: true,
                        unbound: vec!["EXTRA".into()],
                    },
                    TaskPlan {
                        name: "policy-risk".into(),
                        prompt_file: "prompts/risk.md".into(),
                        output_file: "R1/expert/policy_risk.md".into(),
                        template_found: false,
                        unbound: vec![],
                    },
                ],
            }],
        };

        assert_eq!(
            format_plan(&plan),
            "Dry run 20250101-000000-0badcafe\n\
             \nService context:\n서비스 요약: N/A\n\
             \nPhase 1: Phase 2: Experts\n\
             \x20 - policy-ops [ok] prompts/ops.md -> R1/expert/policy_ops.md\n\
             \x20     unbound: EXTRA\n\
             \x20 - policy-risk [missing] prompts/risk.md -> R1/expert/policy_risk.md\n\
             \x20 summary: R1/expert/_summary.md\n\
             \n1 template(s) missing\n"
        );
    }

    #[test]
    fn test_renderer_matches_stream_format() {
        assert_eq!(renderer_for(StreamFormat::Text, true).format(), "text");
        assert_eq!(renderer_for(StreamFormat::Jsonl, false).format(), "jsonl");
    }

    #[test]
    fn test_pipeline_defaults_to_builtin() {
        let run_args = RunArgs {
            input: "in.json".into(),
            cli: None,
            dry_run: false,
            pipeline: None,
            root: None,
            max_parallel: None,
            stream_format: None,
            ascii: false,
            agent_args: vec![],
        };
        let pipeline = pipeline_for_run(&run_args, &AppConfig::default(), Path::new(".")).unwrap();
        assert_eq!(
            pipeline.task_count(),
            core_api::builtin_pipeline().task_count()
        );
    }

    #[tokio::test]
    async fn test_dry_run_touches_nothing_on_disk() {
        let root = tempfile::tempdir().unwrap();
        let input_path = root.path().join("input.json");
        std::fs::write(&input_path, r#"{"SERVICE_ONE_LINER":"widget marketplace"}"#).unwrap();

        let run_args = RunArgs {
            input: input_path.display().to_string(),
            cli: None,
            dry_run: true,
            pipeline: None,
            root: Some(root.path().display().to_string()),
            max_parallel: None,
            stream_format: None,
            ascii: false,
            agent_args: vec![],
        };
        let code = run_pipeline(run_args, &AppConfig::default()).await.unwrap();

        // no templates exist under the temp root
        assert_eq!(code, 1);
        assert!(!root.path().join(".policy-maker").exists());
    }

    #[tokio::test]
    async fn test_missing_input_is_config_error() {
        let root = tempfile::tempdir().unwrap();
        let run_args = RunArgs {
            input: root.path().join("absent.json").display().to_string(),
            cli: None,
            dry_run: true,
            pipeline: None,
            root: Some(root.path().display().to_string()),
            max_parallel: None,
            stream_format: None,
            ascii: false,
            agent_args: vec![],
        };
        let err = run_pipeline(run_args, &AppConfig::default()).await.unwrap_err();
        assert_eq!(err.exit_code(), 11);
    }
}
