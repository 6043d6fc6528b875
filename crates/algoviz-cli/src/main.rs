//! Algorithm visualizer CLI.
//!
//! Provides the `algoviz` binary for working with animation trace files
//! offline: `check` validates a trace and prints a JSON summary, `play`
//! renders its frames as text.
//!
//! Uses the same `algoviz_core::parse_trace()` and `render_frame()` as the
//! HTTP server, so a file accepted here loads identically in the web client.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use algoviz_core::{parse_trace, render_frame, Frame, ParsedTrace, Player, PointerColors, StepFrame};

/// Algorithm visualizer tools.
#[derive(Parser)]
#[command(name = "algoviz", about = "Algorithm animation trace tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Validate a trace file and print a JSON summary.
    Check {
        /// Path to the trace file (a JSON array of steps, fenced or bare).
        file: PathBuf,
    },
    /// Render a trace file as text frames.
    Play {
        /// Path to the trace file.
        file: PathBuf,

        /// Final output shown with the terminal step.
        #[arg(short, long)]
        output: Option<String>,

        /// 1-based step position to show (clamped to the trace).
        #[arg(short, long, default_value_t = 1)]
        step: i64,

        /// Print every frame from the first step to the last.
        #[arg(long, conflicts_with = "step")]
        all: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Check { file } => run_check(&file),
        Commands::Play {
            file,
            output,
            step,
            all,
        } => run_play(&file, output, step, all),
    };
    process::exit(exit_code);
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 = valid trace, 2 = invalid trace, 3 = I/O error.
fn run_check(path: &Path) -> i32 {
    let text = match read_trace_file(path) {
        Ok(text) => text,
        Err(code) => return code,
    };

    let (summary, code) = match parse_trace(&text) {
        ParsedTrace::Valid(trace) => {
            let colors = PointerColors::from_trace(&trace);
            let pointers: Vec<serde_json::Value> = colors
                .iter()
                .map(|(name, color)| serde_json::json!({ "name": name, "color": color }))
                .collect();
            let summary = serde_json::json!({
                "valid": true,
                "steps": trace.len(),
                "pointers": pointers,
                "index_anomaly": trace.first_index_anomaly(),
            });
            (summary, 0)
        }
        ParsedTrace::Invalid(err) => {
            let summary = serde_json::json!({
                "valid": false,
                "code": err.code(),
                "message": err.to_string(),
            });
            (summary, 2)
        }
    };

    let json = serde_json::to_string_pretty(&summary)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize summary: {}\"}}", e));
    println!("{}", json);
    code
}

/// Execute the play subcommand.
///
/// Returns exit code: 0 = rendered, 2 = invalid trace, 3 = I/O error.
fn run_play(path: &Path, output: Option<String>, step: i64, all: bool) -> i32 {
    let text = match read_trace_file(path) {
        Ok(text) => text,
        Err(code) => return code,
    };

    let trace = match parse_trace(&text) {
        ParsedTrace::Valid(trace) => trace,
        ParsedTrace::Invalid(err) => {
            eprintln!("Could not load animation: {}", err);
            return 2;
        }
    };

    let mut player = Player::with_trace(trace, output);
    if all {
        loop {
            print_frame(&player);
            if player.is_at_end() {
                break;
            }
            println!();
            player.next();
        }
    } else {
        player.jump_to(step.saturating_sub(1));
        print_frame(&player);
    }
    0
}

fn read_trace_file(path: &Path) -> Result<String, i32> {
    std::fs::read_to_string(path).map_err(|e| {
        eprintln!("I/O error: failed to read '{}': {}", path.display(), e);
        3
    })
}

fn print_frame(player: &Player) {
    if let Frame::Step(frame) = render_frame(player, None) {
        print!("{}", render_text(&frame));
    }
}

/// Text rendering of one step: a header, one line per cell with its
/// highlight mark and pointer names, and the finished banner on the last
/// step.
fn render_text(frame: &StepFrame) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Step {}/{} (#{}): {}",
        frame.position, frame.total, frame.index, frame.description
    );

    let label_width = frame
        .cells
        .iter()
        .map(|cell| cell.label.chars().count())
        .max()
        .unwrap_or(0);
    let position_width = frame.cells.len().saturating_sub(1).to_string().len();

    for cell in &frame.cells {
        let mut line = format!(
            "  {:>pw$} | {:<lw$}",
            cell.position,
            cell.label,
            pw = position_width,
            lw = label_width
        );
        if cell.highlighted {
            line.push_str(" *");
        }
        if !cell.pointers.is_empty() {
            let names: Vec<&str> = cell.pointers.iter().map(|p| p.name.as_str()).collect();
            let _ = write!(line, " <- {}", names.join(", "));
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }

    if let Some(output) = &frame.finished {
        if output.is_empty() {
            let _ = writeln!(out, "Finished.");
        } else {
            let _ = writeln!(out, "Finished. Output: {}", output);
        }
    }
    out
}
