//! # harvx-config
//!
//! **Tier 2 (Configuration)**
//!
//! CLI argument parsing (`clap`) and profile resolution: TOML config
//! file discovery, `extends` DAG flattening, and the four-source
//! precedence merge (defaults < profile file < env < flags) that
//! produces an `EffectiveConfig` for `harvx-core`'s orchestrator.
//!
//! ## What belongs here
//! * `Cli`/`GlobalArgs`/`GenerateArgs`/`Commands` (Clap derive structs)
//! * Profile file parsing and `extends` resolution
//! * The env/flag/profile/default merge producing `EffectiveConfig`
//!
//! ## What does NOT belong here
//! * Pipeline stage logic (discovery, classification, redaction, ...)

mod build;
mod cli;
mod effective;
mod file;
mod merge;
mod resolve;

pub use build::{build_effective_config, DEFAULT_PROFILE_NAME};
pub use cli::{
    Cli, Commands, ConfigCommands, ExternalArgs, GenerateArgs, GlobalArgs, McpCommands,
    ProfilesCommands,
};
pub use effective::EffectiveConfig;
pub use file::{find_config_file, load_config_file, parse_config_str, CONFIG_FILE_NAME};
pub use merge::merge_profile;
pub use resolve::resolve_profile;
