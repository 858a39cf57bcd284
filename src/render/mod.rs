//! Text rendering of a session snapshot, one view per stage.

use std::fmt::Write as _;
use std::io::{self, Write};

use colored::Colorize;

use crate::core::constants::{word_hex, H0, K, ROUNDS};
use crate::core::preprocess::PaddingSummary;
use crate::core::stepper::WorkingVariables;
use crate::core::{FinalHashMode, Sha256State, Stage};

/// Anything that can show the current state.
pub trait Renderer {
    fn render(&mut self, state: &Sha256State) -> io::Result<()>;
}

/// Writes [`view`] output to any `io::Write`.
pub struct TextRenderer<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn out_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, state: &Sha256State) -> io::Result<()> {
        self.out.write_all(view(state, self.color).as_bytes())?;
        self.out.flush()
    }
}

struct Paint {
    color: bool,
}

impl Paint {
    fn title(&self, s: &str) -> String {
        if self.color { s.bold().truecolor(0, 255, 180).to_string() } else { s.to_string() }
    }
    fn current(&self, s: &str) -> String {
        if self.color { s.bold().truecolor(225, 0, 180).to_string() } else { s.to_string() }
    }
    fn dim(&self, s: &str) -> String {
        if self.color { s.truecolor(190, 190, 200).to_string() } else { s.to_string() }
    }
    fn value(&self, s: &str) -> String {
        if self.color { s.truecolor(255, 240, 0).to_string() } else { s.to_string() }
    }
    fn ok(&self, s: &str) -> String {
        if self.color { s.green().bold().to_string() } else { s.to_string() }
    }
    fn bad(&self, s: &str) -> String {
        if self.color { s.red().bold().to_string() } else { s.to_string() }
    }
}

/// Full screen for the current stage: progress line, stage body, controls.
pub fn view(state: &Sha256State, color: bool) -> String {
    let p = Paint { color };
    let mut out = String::new();
    progress(&mut out, state, &p);
    out.push('\n');
    match state.stage {
        Stage::Preprocessing => preprocessing(&mut out, state, &p),
        Stage::InitialHashValues => initial_hash(&mut out, &p),
        Stage::MessageSchedule => schedule(&mut out, state, &p),
        Stage::Compression => compression(&mut out, state, &p),
        Stage::FinalHashCalculation => final_hash(&mut out, state, &p),
        Stage::Validation => validation(&mut out, state, &p),
    }
    out.push('\n');
    controls(&mut out, state, &p);
    out
}

fn progress(out: &mut String, state: &Sha256State, p: &Paint) {
    let parts: Vec<String> = Stage::ALL
        .iter()
        .map(|s| {
            let label = format!("{} {}", s.index() + 1, s.label());
            if *s == state.stage {
                p.current(&format!("[{label}]"))
            } else {
                p.dim(&label)
            }
        })
        .collect();
    let _ = writeln!(out, "{}", parts.join(" → "));
}

fn grid(out: &mut String, cells: &[(String, String)], per_row: usize, p: &Paint) {
    for row in cells.chunks(per_row) {
        let top: Vec<String> = row.iter().map(|(v, _)| p.value(&format!("{v:>10}"))).collect();
        let bottom: Vec<String> = row.iter().map(|(_, l)| p.dim(&format!("{l:>10}"))).collect();
        let _ = writeln!(out, "{}", top.join(" "));
        let _ = writeln!(out, "{}", bottom.join(" "));
    }
}

fn printable(b: u8) -> String {
    if b.is_ascii_graphic() {
        (b as char).to_string()
    } else if b == b' ' {
        "␠".to_string()
    } else {
        "·".to_string()
    }
}

fn preprocessing(out: &mut String, state: &Sha256State, p: &Paint) {
    let _ = writeln!(out, "{}", p.title("Binary Conversion"));
    if state.binary_input.is_empty() {
        let _ = writeln!(out, "{}", p.dim("(empty input)"));
    }
    let cells: Vec<(String, String)> = state
        .binary_input
        .iter()
        .zip(state.input.bytes())
        .map(|(bits, b)| (bits.clone(), printable(b)))
        .collect();
    grid(out, &cells, 8, p);

    if state.show_padding {
        let s = PaddingSummary::for_message(state.input.as_bytes());
        let _ = writeln!(out, "\n{}", p.title("Padding"));
        let _ = writeln!(
            out,
            "{} message bits + {} + {} zero bits + {}-bit length ({}) = {} bits in {} block(s)",
            p.value(&s.message_bits.to_string()),
            p.value("1"),
            p.value(&s.zero_bits.to_string()),
            s.length_bits,
            p.value(&s.message_bits.to_string()),
            s.total_bits(),
            s.blocks
        );
    }
}

fn initial_hash(out: &mut String, p: &Paint) {
    let _ = writeln!(out, "{}", p.title("Initial Hash Values (H0 to H7)"));
    let cells: Vec<(String, String)> =
        H0.iter().enumerate().map(|(i, h)| (word_hex(*h), format!("H{i}"))).collect();
    grid(out, &cells, 4, p);
    let _ = writeln!(
        out,
        "\n{}",
        p.dim("First 32 bits of the fractional parts of the square roots of the first 8 primes (2..19).")
    );
}

fn schedule(out: &mut String, state: &Sha256State, p: &Paint) {
    let _ = writeln!(
        out,
        "{} {}",
        p.title("Message Schedule Generation"),
        p.dim(&format!("(block {}/{})", state.block_index + 1, state.block_count()))
    );
    match &state.message_schedule {
        Some(w) => {
            let cells: Vec<(String, String)> = w
                .to_hex()
                .into_iter()
                .enumerate()
                .map(|(t, hex)| {
                    let tag = if t < 16 { "msg" } else { "exp" };
                    (hex, format!("W{t} {tag}"))
                })
                .collect();
            grid(out, &cells, 8, p);
        }
        None => {
            let _ = writeln!(out, "{}", p.dim("(schedule not computed yet)"));
        }
    }
    let _ = writeln!(out, "\n{}", p.title("Round Constants (K)"));
    let cells: Vec<(String, String)> =
        K.iter().take(8).enumerate().map(|(i, k)| (word_hex(*k), format!("K{i}"))).collect();
    grid(out, &cells, 8, p);
}

fn compression(out: &mut String, state: &Sha256State, p: &Paint) {
    let _ = writeln!(
        out,
        "{} {}",
        p.title(&format!("Compression Function (Round {}/{})", state.round, ROUNDS)),
        p.dim(&format!("(block {}/{})", state.block_index + 1, state.block_count()))
    );
    let vars = state.working_variables.unwrap_or_default();
    let cells: Vec<(String, String)> = vars
        .to_hex()
        .into_iter()
        .zip(WorkingVariables::NAMES)
        .map(|(hex, n)| (hex, n.to_ascii_uppercase().to_string()))
        .collect();
    grid(out, &cells, 4, p);

    let _ = writeln!(out, "\n{}", p.title("Current Operations"));
    let _ = writeln!(out, "  Ch(e,f,g)  = (e AND f) XOR (NOT e AND g)");
    let _ = writeln!(out, "  Maj(a,b,c) = (a AND b) XOR (a AND c) XOR (b AND c)");
    let _ = writeln!(out, "  Σ0(a)      = ROTR2(a) XOR ROTR13(a) XOR ROTR22(a)");
    let _ = writeln!(out, "  Σ1(e)      = ROTR6(e) XOR ROTR11(e) XOR ROTR25(e)");
    if let Some(d) = &state.last_round {
        let _ = writeln!(out, "\n{}", p.title(&format!("Last round ({})", d.round)));
        let rows = [
            ("W", d.w),
            ("K", d.k),
            ("Σ1(e)", d.sigma1_e),
            ("Ch(e,f,g)", d.ch_efg),
            ("T1", d.t1),
            ("Σ0(a)", d.sigma0_a),
            ("Maj(a,b,c)", d.maj_abc),
            ("T2", d.t2),
        ];
        for (name, v) in rows {
            let _ = writeln!(out, "  {:<11}{}", name, p.value(&word_hex(v)));
        }
    }
}

fn final_hash(out: &mut String, state: &Sha256State, p: &Paint) {
    let _ = writeln!(out, "{}", p.title("Final Hash Calculation"));
    match &state.final_hash {
        Some(h) => {
            let _ = writeln!(out, "{}", p.value(h));
        }
        None => {
            let _ = writeln!(out, "{}", p.dim("Complete all 64 rounds to see the final hash"));
        }
    }
    if state.mode == FinalHashMode::Raw {
        let _ = writeln!(out, "{}", p.dim("raw mode: working variables without feed-forward"));
    }
    for (i, h) in state.intermediate_hashes.iter().enumerate() {
        let _ = writeln!(out, "  Block {:<3}{}", i + 1, h);
    }
}

fn validation(out: &mut String, state: &Sha256State, p: &Paint) {
    let _ = writeln!(out, "{}", p.title("Hash Validation"));
    let _ = writeln!(out, "Input text:  {}", state.input);
    match state.validation() {
        Some(v) => {
            let _ = writeln!(out, "Final hash:  {}", p.value(&v.computed));
            let _ = writeln!(out, "Reference:   {}", v.reference);
            if v.matches {
                let _ = writeln!(out, "{}", p.ok("match"));
            } else {
                let _ = writeln!(out, "{}", p.bad("mismatch"));
                if state.mode == FinalHashMode::Raw {
                    let _ = writeln!(out, "{}", p.dim("expected: raw mode skips the feed-forward addition"));
                }
            }
        }
        None => {
            let _ = writeln!(out, "{}", p.dim("(no final hash)"));
        }
    }
}

fn controls(out: &mut String, state: &Sha256State, p: &Paint) {
    let mut avail = Vec::new();
    if state.can_prev_stage() {
        avail.push("prev");
    }
    if state.can_next_stage() {
        avail.push("next");
    }
    if state.can_advance_round() {
        avail.push("round");
        avail.push("play");
    }
    if state.stage == Stage::Compression {
        avail.push("rounds-reset");
    }
    avail.push("reset");
    let _ = writeln!(out, "{}", p.dim(&format!("available: {}", avail.join(", "))));
}
