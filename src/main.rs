//! shastep main: subcommands, interactive stepper by default.
use clap::Parser; // trait import enables ShastepCli::parse()

use shastep_project::cli::{Command, ShastepCli};
use shastep_project::commands;
use shastep_project::config::{resolve_config_path, Settings};
use shastep_project::core::{debug, FinalHashMode};
use shastep_project::{debug_log, shell};

fn set_console_title() {
    use crossterm::{execute, terminal::SetTitle};
    let _ = execute!(std::io::stdout(), SetTitle("SHA-256 Stepper"));
}

fn main() -> anyhow::Result<()> {
    let args = ShastepCli::parse();

    let cfg_path = resolve_config_path(&args.config);
    let mut settings = Settings::load(cfg_path.as_deref())?;

    // CLI flags override the file
    if args.raw_final {
        settings.final_hash_mode = FinalHashMode::Raw;
    }
    if args.no_color {
        settings.color = false;
    }
    if !settings.color {
        colored::control::set_override(false);
    }
    if args.debug || settings.debug {
        debug::force_enable();
    }
    debug_log!("[main] config {:?} -> {:?}", cfg_path, settings);

    let mode = settings.final_hash_mode;
    match args.cmd {
        None => {
            set_console_title();
            shell::start(None, settings)
        }
        Some(Command::Shell { input }) => {
            set_console_title();
            shell::start(input, settings)
        }
        Some(Command::Digest { text }) => commands::digest::main(&text, mode),
        Some(Command::Trace { text, json, out }) => commands::trace::main(&text, mode, json, out),
        Some(Command::Stage { text, stage, rounds }) => {
            commands::stage::main(&text, mode, stage, rounds, settings.color)
        }
        Some(Command::InitConfig { force }) => match cfg_path {
            Some(p) => commands::init_config::main(&p, force),
            None => anyhow::bail!("no home directory; pass --config FILE"),
        },
    }
}
