use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFormat {
    Text,
    Jsonl,
}

impl StreamFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "jsonl" => Some(Self::Jsonl),
            _ => None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "policy-maker", version, about = "Run multi-agent policy drafting pipelines")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of the default lookup.
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RunArgs {
    /// JSON object with the run input (SERVICE_ONE_LINER, USER_TYPES, ...).
    #[arg(long, short = 'i')]
    pub input: String,

    /// Agent CLI to drive (gemini, claude, codex, opencode).
    #[arg(long)]
    pub cli: Option<String>,

    /// Validate and show the plan without invoking any agent.
    #[arg(long)]
    pub dry_run: bool,

    /// Pipeline definition (TOML). Defaults to the built-in pipeline.
    #[arg(long)]
    pub pipeline: Option<String>,

    /// Project root. Defaults to the nearest ancestor holding `.git`.
    #[arg(long)]
    pub root: Option<String>,

    /// Upper bound on concurrently running tasks within a phase.
    #[arg(long)]
    pub max_parallel: Option<usize>,

    #[arg(long, value_enum)]
    pub stream_format: Option<StreamFormat>,

    /// Plain ASCII markers in text output.
    #[arg(long)]
    pub ascii: bool,

    /// Extra arguments appended to the agent CLI invocation.
    #[arg(long = "agent-arg", action = clap::ArgAction::Append, allow_hyphen_values = true)]
    pub agent_args: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a pipeline against one input file.
    Run(RunArgs),
    /// List supported agent CLIs and whether each is installed.
    Detect,
}
