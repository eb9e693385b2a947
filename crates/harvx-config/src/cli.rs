use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use harvx_types::{Format, Target, Tokenizer, TruncationStrategy};

/// `harvx` — package a source repository into an LLM-optimized context document.
///
/// Default mode (no subcommand) runs `generate`.
#[derive(Parser, Debug)]
#[command(name = "harvx", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Default options for the implicit `generate` mode (no subcommand given).
    #[command(flatten)]
    pub generate: GenerateArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration profile to use.
    #[arg(long, env = "HARVX_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Verbose output (repeat for more detail).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output.
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Flags that drive a `generate` (or `preview`) pipeline run.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Directory to scan. Defaults to the current directory.
    #[arg(value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Output file path.
    #[arg(short = 'o', long, env = "HARVX_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Write the rendered document to stdout instead of a file.
    #[arg(long, env = "HARVX_STDOUT")]
    pub stdout: bool,

    /// Output format.
    #[arg(long, value_enum, env = "HARVX_FORMAT")]
    pub format: Option<Format>,

    /// Target preset (sets format + default max-tokens unless overridden).
    #[arg(long, value_enum, env = "HARVX_TARGET")]
    pub target: Option<Target>,

    /// Maximum token budget for the rendered artifact. Accepts `k`/`m`/`g`
    /// suffixes (e.g. `128k`) and the literal `unlimited`.
    #[arg(long, env = "HARVX_MAX_TOKENS")]
    pub max_tokens: Option<String>,

    /// Tokenizer encoding used to count tokens.
    #[arg(long, value_enum, env = "HARVX_TOKENIZER")]
    pub tokenizer: Option<Tokenizer>,

    /// Strategy applied to the last file that would overflow the budget.
    #[arg(long, value_enum, env = "HARVX_TRUNCATION_STRATEGY")]
    pub truncation_strategy: Option<TruncationStrategy>,

    /// Include pattern(s) (glob). Repeatable.
    #[arg(long = "include", value_name = "PATTERN", env = "HARVX_INCLUDE", value_delimiter = ',')]
    pub include: Vec<String>,

    /// Exclude pattern(s) using gitignore syntax. Repeatable.
    #[arg(long = "exclude", value_name = "PATTERN", env = "HARVX_EXCLUDE", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Restrict to files with this extension. Repeatable.
    #[arg(short = 'f', value_name = "EXT", env = "HARVX_EXTENSION", value_delimiter = ',')]
    pub extension: Vec<String>,

    /// Only consider files tracked by git (`git ls-files`).
    #[arg(long, env = "HARVX_GIT_TRACKED_ONLY")]
    pub git_tracked_only: bool,

    /// Replace source bodies with structural signatures where a compressor
    /// is registered for the file's language.
    #[arg(long, env = "HARVX_COMPRESS")]
    pub compress: bool,

    /// Disable secret redaction entirely.
    #[arg(long, env = "HARVX_NO_REDACT")]
    pub no_redact: bool,

    /// Exit 1 (after writing the artifact) if any redaction occurred.
    #[arg(long, env = "HARVX_FAIL_ON_REDACTION")]
    pub fail_on_redaction: bool,

    /// Write a redaction report. Defaults to `<stem>.redactions.json` when
    /// no path is given.
    #[arg(long, num_args = 0..=1, default_missing_value = "", env = "HARVX_REDACTION_REPORT")]
    pub redaction_report: Option<String>,

    /// Write a `.meta.json` sidecar next to the output file.
    #[arg(long, env = "HARVX_OUTPUT_METADATA")]
    pub output_metadata: bool,

    /// Fail (exit 1) unless at least one included file matches this glob.
    #[arg(long, value_name = "PATTERN", env = "HARVX_ASSERT_INCLUDE")]
    pub assert_include: Option<String>,

    /// Print the total token count to stdout and exit without rendering.
    #[arg(long, env = "HARVX_TOKEN_COUNT")]
    pub token_count: bool,

    /// Include the top N largest files (by token count) in the summary.
    #[arg(long, value_name = "N", env = "HARVX_TOP_FILES")]
    pub top_files: Option<usize>,

    /// Append a per-tier token-density table to the summary section.
    #[arg(long, env = "HARVX_HEATMAP")]
    pub heatmap: bool,

    /// Split output into multiple parts, each at most N tokens.
    #[arg(long, value_name = "N", env = "HARVX_SPLIT")]
    pub split: Option<usize>,

    /// Prefix each rendered content line with its line number.
    #[arg(long, env = "HARVX_LINE_NUMBERS")]
    pub line_numbers: bool,

    /// Print a compact JSON summary to stdout instead of human text.
    #[arg(long, env = "HARVX_JSON")]
    pub json: bool,

    /// Overwrite the output file (and any `--split` parts) if it already exists.
    #[arg(long, env = "HARVX_FORCE")]
    pub force: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the context generation pipeline and write the artifact (default).
    Generate(GenerateArgs),

    /// Run the pipeline through tokenization only, printing a JSON summary.
    Preview(GenerateArgs),

    /// Produce a short orientation document (external collaborator).
    Brief(ExternalArgs),

    /// Emit a narrow slice of the repository around a symbol or path
    /// (external collaborator).
    Slice(ExternalArgs),

    /// Produce a reviewer-facing slice for a change set (external
    /// collaborator).
    ReviewSlice(ExternalArgs),

    /// Describe a multi-repo workspace manifest (external collaborator).
    Workspace(ExternalArgs),

    /// Diff two state snapshots (external collaborator).
    Diff(ExternalArgs),

    /// Verify a previously generated artifact against the current
    /// repository state (external collaborator).
    Verify(ExternalArgs),

    /// Run environment diagnostics (external collaborator).
    Doctor(ExternalArgs),

    /// Model Context Protocol server commands (external collaborator).
    Mcp {
        #[command(subcommand)]
        command: McpCommands,
    },

    /// Profile management commands (external collaborator).
    Profiles {
        #[command(subcommand)]
        command: ProfilesCommands,
    },

    /// Configuration inspection commands (external collaborator).
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print version information.
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum McpCommands {
    /// Start the MCP server (external collaborator).
    Serve(ExternalArgs),
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProfilesCommands {
    Init(ExternalArgs),
    List(ExternalArgs),
    Show(ExternalArgs),
    Lint(ExternalArgs),
    Explain(ExternalArgs),
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    Debug(ExternalArgs),
}

/// Placeholder argument bag for subcommands that are external
/// collaborators of the core pipeline. Parses and stores its raw
/// arguments; the dispatcher returns `HarvxErrorCode::NotImplemented`
/// rather than acting on them.
#[derive(Args, Debug, Clone, Default)]
pub struct ExternalArgs {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub raw: Vec<String>,
}
