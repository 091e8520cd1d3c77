use chrono::Local;
use policy_maker_core::executor::traits::{OutputRendererPlugin, RenderEvent};
use serde_json::{json, Value};

pub struct JsonlRendererPlugin {
    pretty_print: bool,
}

impl JsonlRendererPlugin {
    pub fn new(pretty_print: bool) -> Self {
        Self { pretty_print }
    }

    fn event_to_json(&self, event: &RenderEvent) -> Value {
        let ts = Local::now().to_rfc3339();
        match event {
            RenderEvent::RunStart {
                session_id,
                total_phases,
                total_tasks,
            } => json!({
                "v": 1,
                "event_type": "run.start",
                "ts": ts,
                "session_id": session_id,
                "metadata": {
                    "total_phases": total_phases,
                    "total_tasks": total_tasks,
                }
            }),
            RenderEvent::PhaseStart {
                session_id,
                phase_idx,
                phase,
                tasks,
            } => json!({
                "v": 1,
                "event_type": "phase.start",
                "ts": ts,
                "session_id": session_id,
                "metadata": {
                    "phase_idx": phase_idx,
                    "phase": phase,
                    "tasks": tasks,
                }
            }),
            RenderEvent::TaskStart {
                session_id,
                phase_idx,
                task,
            } => json!({
                "v": 1,
                "event_type": "task.start",
                "ts": ts,
                "session_id": session_id,
                "task": task,
                "metadata": {
                    "phase_idx": phase_idx,
                }
            }),
            RenderEvent::TaskComplete {
                session_id,
                phase_idx,
                report,
            } => json!({
                "v": 1,
                "event_type": "task.end",
                "ts": ts,
                "session_id": session_id,
                "task": report.name,
                "metadata": {
                    "phase_idx": phase_idx,
                    "success": true,
                    "output_file": report.output_file,
                    "bytes": report.bytes,
                    "duration_ms": report.duration_ms,
                }
            }),
            RenderEvent::TaskFailed {
                session_id,
                phase_idx,
                task,
                error,
            } => json!({
                "v": 1,
                "event_type": "task.end",
                "ts": ts,
                "session_id": session_id,
                "task": task,
                "error": error,
                "metadata": {
                    "phase_idx": phase_idx,
                    "success": false,
                }
            }),
            RenderEvent::SummaryWritten {
                session_id,
                phase_idx,
                path,
                sources,
            } => json!({
                "v": 1,
                "event_type": "summary.written",
                "ts": ts,
                "session_id": session_id,
                "metadata": {
                    "phase_idx": phase_idx,
                    "path": path,
                    "sources": sources,
                }
            }),
            RenderEvent::PhaseEnd {
                session_id,
                phase_idx,
                phase,
                success,
            } => json!({
                "v": 1,
                "event_type": "phase.end",
                "ts": ts,
                "session_id": session_id,
                "metadata": {
                    "phase_idx": phase_idx,
                    "phase": phase,
                    "success": success,
                }
            }),
            RenderEvent::RunEnd {
                session_id,
                success,
                duration_ms,
            } => json!({
                "v": 1,
                "event_type": "run.end",
                "ts": ts,
                "session_id": session_id,
                "metadata": {
                    "success": success,
                    "duration_ms": duration_ms,
                }
            }),
        }
    }
}

impl OutputRendererPlugin for JsonlRendererPlugin {
    fn name(&self) -> &str {
        "jsonl-renderer"
    }

    fn format(&self) -> &str {
        "jsonl"
    }

    fn render(&self, event: &RenderEvent) {
        let value = self.event_to_json(event);
        if self.pretty_print {
            println!("{}", serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".into()));
        } else {
            println!("{}", serde_json::to_string(&value).unwrap_or_else(|_| "{}".into()));
        }
    }
}
