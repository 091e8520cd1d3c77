use std::collections::HashMap;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Visual progress for a pipeline run: one overall bar plus a spinner per
/// in-flight task.
pub struct ProgressMonitor {
    multi: MultiProgress,
    overall: ProgressBar,
    task_bars: HashMap<String, ProgressBar>,
    enabled: bool,
}

impl ProgressMonitor {
    /// `enabled` is false for jsonl output and non-tty stderr.
    pub fn new(total_tasks: usize, enabled: bool) -> Self {
        if !enabled {
            return Self {
                multi: MultiProgress::new(),
                overall: ProgressBar::hidden(),
                task_bars: HashMap::new(),
                enabled: false,
            };
        }

        let multi = MultiProgress::new();
        let overall = multi.add(ProgressBar::new(total_tasks as u64));

        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} tasks ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░  ");
        overall.set_style(style);
        overall.set_message("Starting...");

        Self {
            multi,
            overall,
            task_bars: HashMap::new(),
            enabled: true,
        }
    }

    pub fn add_task(&mut self, task: &str) {
        if !self.enabled {
            return;
        }

        let bar = self.multi.add(ProgressBar::new_spinner());
        let style = ProgressStyle::default_spinner()
            .template("  {spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        bar.set_style(style);
        bar.set_message(format!("⏳ {}", task));
        bar.enable_steady_tick(Duration::from_millis(100));

        self.task_bars.insert(task.to_string(), bar);
    }

    pub fn complete_task(&mut self, task: &str, success: bool, duration_ms: u64) {
        if !self.enabled {
            return;
        }

        if let Some(bar) = self.task_bars.remove(task) {
            let icon = if success { "✅" } else { "❌" };
            bar.finish_with_message(format!("{} {} ({}ms)", icon, task, duration_ms));
        }

        self.overall.inc(1);
    }

    pub fn update_phase(&self, phase_idx: usize, total_phases: usize, name: &str) {
        if self.enabled {
            self.overall
                .set_message(format!("Phase {}/{}: {}", phase_idx + 1, total_phases, name));
        }
    }

    pub fn finish(&self, success: bool) {
        if !self.enabled {
            return;
        }

        let msg = if success {
            "✅ All phases completed"
        } else {
            "❌ Run aborted"
        };

        self.overall.finish_with_message(msg.to_string());
    }
}

impl Drop for ProgressMonitor {
    fn drop(&mut self) {
        for (_, bar) in self.task_bars.drain() {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_monitor_disabled() {
        let mut monitor = ProgressMonitor::new(3, false);

        monitor.add_task("domain-strategist");
        monitor.complete_task("domain-strategist", true, 100);
        monitor.update_phase(0, 3, "Phase 1");
        monitor.finish(true);
        assert!(monitor.task_bars.is_empty());
    }

    #[test]
    fn test_progress_monitor_enabled() {
        let mut monitor = ProgressMonitor::new(2, true);

        monitor.add_task("policy-ops");
        monitor.add_task("legal");
        assert_eq!(monitor.task_bars.len(), 2);

        monitor.complete_task("policy-ops", true, 100);
        monitor.complete_task("legal", false, 200);
        assert!(monitor.task_bars.is_empty());

        monitor.update_phase(1, 3, "Expert Panel");
        monitor.finish(false);
    }
}
