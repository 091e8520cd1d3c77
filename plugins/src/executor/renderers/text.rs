use policy_maker_core::executor::traits::{OutputRendererPlugin, RenderEvent};

pub struct TextRendererPlugin {
    ascii_only: bool,
}

impl TextRendererPlugin {
    pub fn new(ascii_only: bool) -> Self {
        Self { ascii_only }
    }

    fn marker(&self, success: bool) -> &'static str {
        match (success, self.ascii_only) {
            (true, true) => "OK",
            (true, false) => "✅",
            (false, true) => "FAIL",
            (false, false) => "❌",
        }
    }

    fn format_event(&self, event: &RenderEvent) -> String {
        match event {
            RenderEvent::RunStart {
                session_id,
                total_phases,
                total_tasks,
            } => format!(
                "RUN START {} (phases: {}, tasks: {})",
                session_id, total_phases, total_tasks
            ),
            RenderEvent::PhaseStart {
                phase_idx,
                phase,
                tasks,
                ..
            } => {
                let rule = if self.ascii_only { "=" } else { "═" }.repeat(50);
                format!(
                    "{}\nPHASE {} {} (tasks: {})\n{}",
                    rule,
                    phase_idx + 1,
                    phase,
                    tasks.join(", "),
                    rule
                )
            }
            RenderEvent::TaskStart { task, .. } => {
                let icon = if self.ascii_only { "..." } else { "⏳" };
                format!("  {} {} running", icon, task)
            }
            RenderEvent::TaskComplete { report, .. } => format!(
                "  {} {} -> {} ({} bytes, {}ms)",
                self.marker(true),
                report.name,
                report.output_file,
                report.bytes,
                report.duration_ms
            ),
            RenderEvent::TaskFailed { task, error, .. } => {
                format!("  {} {}: {}", self.marker(false), task, error)
            }
            RenderEvent::SummaryWritten { path, sources, .. } => {
                let icon = if self.ascii_only { "SUMMARY" } else { "📋" };
                format!("  {} {} ({} sources)", icon, path, sources)
            }
            RenderEvent::PhaseEnd { phase, success, .. } => {
                format!("PHASE END {} {}", phase, self.marker(*success))
            }
            RenderEvent::RunEnd {
                session_id,
                success,
                duration_ms,
            } => format!(
                "RUN END {} {} (duration {}ms)",
                session_id,
                self.marker(*success),
                duration_ms
            ),
        }
    }
}

impl OutputRendererPlugin for TextRendererPlugin {
    fn name(&self) -> &str {
        "text-renderer"
    }

    fn format(&self) -> &str {
        "text"
    }

    fn render(&self, event: &RenderEvent) {
        println!("{}", self.format_event(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use policy_maker_core::executor::types::TaskReport;

    #[test]
    fn test_text_renderer_task_complete() {
        let renderer = TextRendererPlugin::new(true);
        let event = RenderEvent::TaskComplete {
            session_id: "s".to_string(),
            phase_idx: 1,
            report: TaskReport {
                name: "policy-ops".to_string(),
                output_file: "R1/expert/policy_ops.md".to_string(),
                duration_ms: 5,
                bytes: 42,
            },
        };

        let line = renderer.format_event(&event);
        assert_eq!(line, "  OK policy-ops -> R1/expert/policy_ops.md (42 bytes, 5ms)");
    }

    #[test]
    fn test_text_renderer_phase_start_lists_tasks() {
        let renderer = TextRendererPlugin::new(false);
        let event = RenderEvent::PhaseStart {
            session_id: "s".to_string(),
            phase_idx: 0,
            phase: "Phase 1: Domain Strategist".to_string(),
            tasks: vec!["domain-strategist".to_string()],
        };

        let text = renderer.format_event(&event);
        assert!(text.contains("PHASE 1 Phase 1: Domain Strategist (tasks: domain-strategist)"));
        assert!(text.starts_with('═'));
    }

    #[test]
    fn test_text_renderer_failure_carries_error() {
        let renderer = TextRendererPlugin::new(true);
        let event = RenderEvent::TaskFailed {
            session_id: "s".to_string(),
            phase_idx: 0,
            task: "legal".to_string(),
            error: "agent exited with code 1".to_string(),
        };
        assert_eq!(
            renderer.format_event(&event),
            "  FAIL legal: agent exited with code 1"
        );
    }
}
