#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;

use policy_maker_core::api::{
    AgentInvoker, ArtifactStore, InvokeError, MemoryArtifactStore, PhaseDef, RunContext,
    RunInput, TaskDef, VarSource,
};

/// Scripted agent: the first rule whose needle occurs in the prompt decides
/// the reply; with no matching rule the prompt is echoed back.
#[derive(Default)]
pub struct FakeInvoker {
    rules: Vec<Rule>,
    prompts: Mutex<Vec<String>>,
}

struct Rule {
    needle: String,
    delay: Duration,
    /// `Ok(())` echoes the prompt.
    reply: Result<(), InvokeError>,
}

impl FakeInvoker {
    pub fn echo() -> Self {
        Self::default()
    }

    pub fn fail_on(self, needle: &str, exit_code: i32) -> Self {
        self.fail_after(needle, exit_code, 0)
    }

    pub fn fail_after(mut self, needle: &str, exit_code: i32, ms: u64) -> Self {
        self.rules.push(Rule {
            needle: needle.to_string(),
            delay: Duration::from_millis(ms),
            reply: Err(InvokeError::Execution {
                exit_code,
                stderr_excerpt: format!("scripted failure for {needle}"),
            }),
        });
        self
    }

    /// Echo prompts containing `needle`, but only after `ms` milliseconds.
    pub fn slow_on(mut self, needle: &str, ms: u64) -> Self {
        self.rules.push(Rule {
            needle: needle.to_string(),
            delay: Duration::from_millis(ms),
            reply: Ok(()),
        });
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentInvoker for FakeInvoker {
    fn name(&self) -> &str {
        "fake"
    }

    async fn invoke(&self, prompt: &str) -> Result<String, InvokeError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let Some(rule) = self.rules.iter().find(|r| prompt.contains(&r.needle)) else {
            return Ok(prompt.to_string());
        };
        if !rule.delay.is_zero() {
            tokio::time::sleep(rule.delay).await;
        }
        match &rule.reply {
            Ok(()) => Ok(prompt.to_string()),
            Err(e) => Err(e.clone()),
        }
    }
}

pub fn task(name: &str, prompt_file: &str, output_file: &str, vars: &[(&str, VarSource)]) -> TaskDef {
    TaskDef {
        name: name.to_string(),
        prompt_file: prompt_file.to_string(),
        output_file: output_file.to_string(),
        vars: vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<IndexMap<_, _>>(),
    }
}

pub fn phase(name: &str, tasks: Vec<TaskDef>) -> PhaseDef {
    PhaseDef {
        name: name.to_string(),
        summary_dir: None,
        tasks,
    }
}

pub fn fan_in(name: &str, dir: &str, tasks: Vec<TaskDef>) -> PhaseDef {
    PhaseDef {
        summary_dir: Some(dir.to_string()),
        ..phase(name, tasks)
    }
}

pub fn write_template(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

pub fn memory_context(
    input: RunInput,
    templates_root: &Path,
) -> (RunContext, Arc<MemoryArtifactStore>) {
    let store = Arc::new(MemoryArtifactStore::new());
    let dyn_store: Arc<dyn ArtifactStore> = store.clone();
    let ctx = RunContext::new("test-session", input, dyn_store, templates_root);
    (ctx, store)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("policy_maker_core=debug")
        .try_init();
}
