use colored::Colorize;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::thread::sleep;
use std::time::Duration;

use crate::config::Settings;
use crate::core::trace::run_to_completion;
use crate::core::{dispatch, Action, FinalHashMode, Sha256State};
use crate::debug_log;
use crate::io::atomic::atomic_write;
use crate::render::{Renderer, TextRenderer};

/// What the loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// One interactive stepping session. All output goes through `out`.
pub struct Session<W: Write> {
    pub state: Sha256State,
    settings: Settings,
    renderer: TextRenderer<W>,
    clear_screen: bool,
}

impl<W: Write> Session<W> {
    pub fn new(input: &str, settings: Settings, out: W) -> Self {
        let mut state = Sha256State::new(input, settings.final_hash_mode);
        state.show_padding = settings.show_padding;
        let renderer = TextRenderer::new(out, settings.color);
        Self { state, settings, renderer, clear_screen: false }
    }

    /// Clear the terminal between playback frames.
    pub fn with_clear_screen(mut self, on: bool) -> Self {
        self.clear_screen = on;
        self
    }

    pub fn into_output(self) -> W {
        self.renderer.into_inner()
    }

    pub fn show(&mut self) -> io::Result<()> {
        self.renderer.render(&self.state)
    }

    fn say(&mut self, msg: &str) -> io::Result<()> {
        let out = self.out();
        writeln!(out, "{msg}")
    }

    fn out(&mut self) -> &mut W {
        self.renderer.out_mut()
    }

    /// Apply an action; on rejection report and keep the state.
    fn act(&mut self, action: Action) -> io::Result<bool> {
        debug_log!("[shell] {:?}", action);
        match dispatch(&mut self.state, action) {
            Ok(()) => Ok(true),
            Err(e) => {
                let msg = format!("{} {}", "err:".red().bold(), e);
                self.say(&msg)?;
                Ok(false)
            }
        }
    }

    pub fn execute(&mut self, line: &str) -> io::Result<Flow> {
        let mut parts = shell_words(line.trim());
        if parts.is_empty() {
            return Ok(Flow::Continue);
        }
        let cmd = parts.remove(0);

        match cmd.as_str() {
            "help" | "?" => {
                let help = help_text();
                self.say(&help)?;
            }
            "exit" | "quit" => return Ok(Flow::Exit),
            "show" => self.show()?,

            "input" => {
                let text = raw_argument(line).to_string();
                self.act(Action::SetInput(text))?;
                self.show()?;
            }
            "next" => {
                if self.act(Action::NextStage)? {
                    self.show()?;
                }
            }
            "prev" => {
                if self.act(Action::PrevStage)? {
                    self.show()?;
                }
            }
            "reset" => {
                self.act(Action::Reset)?;
                self.show()?;
            }
            "rounds-reset" => {
                if self.act(Action::ResetRounds)? {
                    self.show()?;
                }
            }
            "padding" => {
                self.act(Action::TogglePadding)?;
                self.show()?;
            }
            "round" => {
                let Some(n) = self.count_arg(parts.first(), 1)? else {
                    return Ok(Flow::Continue);
                };
                let mut done = 0;
                while done < n && self.act(Action::NextRound)? {
                    done += 1;
                }
                if done > 0 {
                    self.show()?;
                }
            }
            "play" => {
                let remaining = 64 - self.state.round.min(64);
                let Some(n) = self.count_arg(parts.first(), remaining)? else {
                    return Ok(Flow::Continue);
                };
                self.play(n)?;
            }
            "mode" => match parts.first().map(String::as_str) {
                Some("standard") => {
                    self.act(Action::SetMode(FinalHashMode::Standard))?;
                    self.show()?;
                }
                Some("raw") => {
                    self.act(Action::SetMode(FinalHashMode::Raw))?;
                    self.show()?;
                }
                _ => {
                    let mode = self.state.mode;
                    self.say(&format!("mode: {mode} (usage: mode standard|raw)"))?;
                }
            },
            "export" => match parts.first() {
                Some(p) => self.export(PathBuf::from(p))?,
                None => self.say(&usage("export <file.json>"))?,
            },
            other => {
                let msg = format!("{} unknown command: {other}", "err:".red().bold());
                self.say(&msg)?;
            }
        }
        Ok(Flow::Continue)
    }

    /// `None` after reporting a bad number.
    fn count_arg(&mut self, arg: Option<&String>, default: usize) -> io::Result<Option<usize>> {
        match arg {
            None => Ok(Some(default)),
            Some(s) => match s.parse::<usize>() {
                Ok(n) => Ok(Some(n)),
                Err(_) => {
                    self.say(&format!("{} not a round count: {s}", "err:".red().bold()))?;
                    Ok(None)
                }
            },
        }
    }

    /// Cosmetic playback: the same synchronous round transition on a timer.
    fn play(&mut self, n: usize) -> io::Result<()> {
        let interval = Duration::from_millis(self.settings.playback_interval_ms);
        for _ in 0..n {
            if !self.act(Action::NextRound)? {
                break;
            }
            if self.clear_screen {
                let out = self.out();
                crossterm::execute!(
                    out,
                    crossterm::terminal::Clear(crossterm::terminal::ClearType::All),
                    crossterm::cursor::MoveTo(0, 0)
                )?;
            }
            self.show()?;
            if !interval.is_zero() {
                sleep(interval);
            }
        }
        Ok(())
    }

    fn export(&mut self, path: PathBuf) -> io::Result<()> {
        let json = match run_to_completion(&self.state.input, self.state.mode) {
            Ok((_, trace)) => trace.to_json().map_err(io::Error::other)?,
            Err(e) => {
                let msg = format!("{} {}", "err:".red().bold(), e);
                return self.say(&msg);
            }
        };
        match atomic_write(&path, json.as_bytes()) {
            Ok(()) => self.say(&format!("wrote {}", path.display())),
            Err(e) => {
                let msg = format!("{} {}: {}", "err:".red().bold(), path.display(), e);
                self.say(&msg)
            }
        }
    }
}

/// Drive a session from any line source until `exit` or end of input.
pub fn run<R: BufRead, W: Write>(reader: R, session: &mut Session<W>, prompt: bool) -> io::Result<()> {
    session.show()?;
    let mut lines = reader.lines();
    loop {
        if prompt {
            let p = format!("{} {} ", "⟦SHA-256⟧".bold().truecolor(225, 0, 180), "›".truecolor(255, 240, 0));
            write!(session.out(), "{p}")?;
            session.out().flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        if session.execute(&line?)? == Flow::Exit {
            break;
        }
    }
    Ok(())
}

pub fn start(input: Option<String>, settings: Settings) -> anyhow::Result<()> {
    banner();
    let interactive = io::stdout().is_terminal();
    let mut session = Session::new(input.as_deref().unwrap_or(""), settings, io::stdout())
        .with_clear_screen(interactive);
    let stdin = io::stdin();
    run(stdin.lock(), &mut session, interactive)?;
    Ok(())
}

fn banner() {
    println!(
        "\n{}  \n{}  \n",
        "╔══════════════════════════════════════════════════╗".truecolor(225, 0, 180),
        "║            S H A - 2 5 6   S t e p p e r         ║"
            .truecolor(255, 240, 0)
            .bold(),
    );
    println!(
        "{}  {}",
        "╚══════════════════════════════════════════════════╝".truecolor(225, 0, 180),
        "type 'help' for commands".truecolor(130, 0, 200)
    );
}

fn help_text() -> String {
    format!(
        "{}\n\
         {}\n  input <text>        # set input and start over\n  show                # render current stage\n  padding             # show/hide the padding panel\n\
         {}\n  next                # next stage (Compression: only after round 64)\n  prev                # previous stage\n  reset               # back to Preprocessing\n\
         {}\n  round [n]           # run n rounds (default 1)\n  play [n]            # animate n rounds (default: rest of block)\n  rounds-reset        # restart compression from round 0\n  mode standard|raw   # final hash with or without feed-forward\n\
         {}\n  export <file.json>  # write the full round trace\n  help                # show this help\n  exit                # quit\n",
        "SHA-256 Stepper".bold().truecolor(0, 255, 180),
        "Input:".truecolor(130, 0, 200),
        "Stages:".truecolor(130, 0, 200),
        "Rounds:".truecolor(255, 180, 0),
        "Other:".truecolor(130, 0, 200),
    )
}

fn usage(s: &str) -> String {
    format!("{} {}", "usage:".yellow().bold(), s)
}

/// Everything after the command word, verbatim apart from the surrounding
/// whitespace. One pair of enclosing quotes is removed so edge spaces can be kept.
fn raw_argument(line: &str) -> &str {
    let rest = line
        .trim_start()
        .split_once(char::is_whitespace)
        .map_or("", |(_, rest)| rest)
        .trim();
    match rest.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
        Some(inner) if !inner.contains('"') => inner,
        _ => rest,
    }
}

fn shell_words(s: &str) -> Vec<String> {
    // minimal split by whitespace respecting "quoted strings"
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut in_q = false;
    let mut quoted = false;
    for c in s.chars() {
        match (c, in_q) {
            ('"', false) => {
                in_q = true;
                quoted = true;
            }
            ('"', true) => in_q = false,
            (c, _) if c.is_whitespace() && !in_q => {
                if !buf.is_empty() || quoted {
                    out.push(std::mem::take(&mut buf));
                }
                quoted = false;
            }
            (c, _) => buf.push(c),
        }
    }
    if !buf.is_empty() || quoted {
        out.push(buf);
    }
    out
}
