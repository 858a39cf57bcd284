use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "shastep",
    about = "shastep: walk through SHA-256 one stage and one round at a time",
    version,
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct ShastepCli {
    /// Global: path to config (TOML); default: ~/.shastep/config.toml
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Global: build the final hash from the raw working variables (no feed-forward)
    #[arg(long = "raw-final", action = ArgAction::SetTrue, global = true)]
    pub raw_final: bool,

    /// Global: disable coloured output
    #[arg(long = "no-color", action = ArgAction::SetTrue, global = true)]
    pub no_color: bool,

    /// Global: debug logging on stderr (same as SHASTEP_DEBUG=1)
    #[arg(long = "debug", action = ArgAction::SetTrue, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive stepper (default when no subcommand is given)
    Shell {
        /// Initial input text
        #[arg(value_name = "TEXT")]
        input: Option<String>,
    },

    /// Run every stage and print the digest
    ///
    /// Examples:
    ///   shastep digest abc
    ///   shastep digest "hello world" --raw-final
    Digest {
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Print every compression round of every block
    Trace {
        #[arg(value_name = "TEXT")]
        text: String,
        /// Emit JSON instead of a table
        #[arg(long = "json", action = ArgAction::SetTrue)]
        json: bool,
        /// Write to FILE instead of stdout (short: -o)
        #[arg(short = 'o', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Render a single stage snapshot
    Stage {
        #[arg(value_name = "TEXT")]
        text: String,
        /// Stage number 1-6 (Preprocessing .. Validation)
        #[arg(long = "stage", value_name = "N", default_value_t = 1,
              value_parser = clap::value_parser!(u8).range(1..=6))]
        stage: u8,
        /// Rounds to run when showing the Compression stage
        #[arg(long = "rounds", value_name = "R", default_value_t = 0,
              value_parser = clap::value_parser!(u8).range(0..=64))]
        rounds: u8,
    },

    /// Write a default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long = "force", action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_range_is_enforced() {
        assert!(ShastepCli::try_parse_from(["shastep", "stage", "abc", "--stage", "7"]).is_err());
        assert!(ShastepCli::try_parse_from(["shastep", "stage", "abc", "--rounds", "65"]).is_err());
        assert!(ShastepCli::try_parse_from(["shastep", "stage", "abc", "--rounds", "x"]).is_err());
        let ok = ShastepCli::try_parse_from(["shastep", "stage", "abc", "--stage", "4", "--rounds", "64"]);
        assert!(ok.is_ok());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = ShastepCli::try_parse_from(["shastep", "digest", "abc", "--raw-final"]).unwrap();
        assert!(cli.raw_final);
        assert!(matches!(cli.cmd, Some(Command::Digest { .. })));
    }
}
