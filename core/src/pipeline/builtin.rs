//! The stock three-phase policy review pipeline.
//!
//! Phase 1 drafts a domain charter, phase 2 runs an expert panel against it
//! and phase 3 attacks the experts' policies. Both panels are fan-in phases so
//! later prompts can reference "all opinions so far" as one variable.

use indexmap::IndexMap;

use super::types::{PhaseDef, PipelineDef, TaskDef, VarSource};

pub const EXPERT_DIR: &str = "R1/expert";
pub const ATTACKER_DIR: &str = "R1/attacker";
pub const DOMAIN_CHARTER: &str = "R1/domain_charter.md";

pub fn builtin_pipeline() -> PipelineDef {
    PipelineDef {
        phases: vec![domain_phase(), expert_phase(), attacker_phase()],
    }
}

fn domain_phase() -> PhaseDef {
    let vars = [
        "SERVICE_ONE_LINER",
        "USER_TYPES",
        "REVENUE_MODEL",
        "LIFECYCLE_OVERVIEW",
        "INTEGRATIONS",
    ]
    .into_iter()
    .map(|key| (key.to_string(), VarSource::Direct(key.to_string())))
    .collect();

    PhaseDef {
        name: "Phase 1: Domain Strategist".to_string(),
        tasks: vec![TaskDef {
            name: "domain-strategist".to_string(),
            prompt_file: "expert/domain-strategist/prompt.md".to_string(),
            output_file: DOMAIN_CHARTER.to_string(),
            vars,
        }],
        summary_dir: None,
    }
}

fn expert_phase() -> PhaseDef {
    let tasks = [
        ("policy-ops", "policy_ops"),
        ("policy-resilience", "policy_resilience"),
        ("policy-risk", "policy_risk"),
        ("policy-security", "policy_security"),
    ]
    .into_iter()
    .map(|(name, file)| TaskDef {
        name: name.to_string(),
        prompt_file: format!("expert/{name}/prompt.md"),
        output_file: format!("{EXPERT_DIR}/{file}.md"),
        vars: expert_vars(),
    })
    .collect();

    PhaseDef {
        name: "Phase 2: Expert Panel".to_string(),
        tasks,
        summary_dir: Some(EXPERT_DIR.to_string()),
    }
}

fn expert_vars() -> IndexMap<String, VarSource> {
    IndexMap::from([
        ("SERVICE_CONTEXT".to_string(), VarSource::Computed),
        (
            "DOMAIN_CHARTER".to_string(),
            VarSource::Artifact(DOMAIN_CHARTER.to_string()),
        ),
        ("BREACH_REPORT".to_string(), VarSource::Empty),
    ])
}

fn attacker_phase() -> PhaseDef {
    let tasks = [
        ("adversary-hacker", "policy-adversaryhacker", "adversary_hacker"),
        ("angry-user", "policy-angryuser", "angry_user"),
        ("insider", "policy-insider", "insider"),
    ]
    .into_iter()
    .map(|(name, prompt_dir, file)| TaskDef {
        name: name.to_string(),
        prompt_file: format!("attacker/{prompt_dir}/PROMPT.md"),
        output_file: format!("{ATTACKER_DIR}/{file}.md"),
        vars: attacker_vars(),
    })
    .collect();

    PhaseDef {
        name: "Phase 3: Attacker Panel".to_string(),
        tasks,
        summary_dir: Some(ATTACKER_DIR.to_string()),
    }
}

fn attacker_vars() -> IndexMap<String, VarSource> {
    IndexMap::from([
        ("SERVICE_CONTEXT".to_string(), VarSource::Computed),
        (
            "DOMAIN_CHARTER".to_string(),
            VarSource::Artifact(DOMAIN_CHARTER.to_string()),
        ),
        (
            "EXPERT_POLICIES".to_string(),
            VarSource::Artifact(format!("{EXPERT_DIR}/_summary.md")),
        ),
    ])
}
