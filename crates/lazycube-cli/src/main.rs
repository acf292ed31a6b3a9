//! lazycube: command line front end for the cube scan engine.

mod simulate;

use clap::{Args, Parser, Subcommand};
use lazycube_core::{
    Cube, CubeValidator, Face, FaceAdder, FaceletVerifier, ParityCheck, ScanConfig, ScanEvent,
    ScanStatus, Scanner, ValidationReport,
};
use serde::Serialize;
use simulate::{simulate, Frame, SimulateOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

const DEFAULT_FRAME_MS: u64 = 100;

#[derive(Parser)]
#[command(name = "lazycube")]
#[command(about = "Assemble, validate and replay Rubik's cube scans")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a 54-letter cube string (O G R B W Y, N for unknown).
    Validate {
        cube: String,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Place faces one at a time and print the resulting cube.
    Assemble {
        /// Nine colour letters, row by row. Repeat for each face.
        #[arg(long = "face", required = true)]
        faces: Vec<String>,
    },
    /// Run the scanner over recorded detection frames (JSON).
    Replay(ReplayArgs),
    /// Scan synthetic noisy frames of a known cube.
    Simulate(SimulateArgs),
}

#[derive(Args)]
struct ReplayArgs {
    /// Frames file: a JSON array of {"at_ms", "predictions"} objects.
    frames: PathBuf,

    /// Promote faces after very few frames.
    #[arg(long)]
    turbo: bool,

    /// Scan configuration (JSON); missing fields take defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct SimulateArgs {
    #[arg(long, default_value = "1")]
    seed: u64,

    /// Frames shown per face.
    #[arg(long, default_value = "14")]
    frames: usize,

    /// Probability that a sticker is misread in any one frame.
    #[arg(long, default_value = "0.05")]
    noise: f64,

    #[arg(long)]
    turbo: bool,

    /// Also write the generated frames here, for `replay`.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { cube, json } => run_validate(&cube, json),
        Commands::Assemble { faces } => run_assemble(&faces),
        Commands::Replay(args) => run_replay(&args),
        Commands::Simulate(args) => run_simulate(&args),
    }
}

// ── validate ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ValidateOutput {
    report: ValidationReport,
    complete: bool,
    /// Verifier error code, 0 when solvable, absent for partial cubes
    verify_code: Option<i32>,
    verify_message: Option<String>,
}

fn run_validate(letters: &str, json: bool) -> CliResult<()> {
    let cube = Cube::from_letters(letters)?;
    let report = CubeValidator::new(&cube).report();
    let verdict = cube.is_complete().then(|| FaceletVerifier.verify(&cube));

    let output = ValidateOutput {
        report,
        complete: cube.is_complete(),
        verify_code: verdict.map(|v| v.map_or_else(|e| e.code(), |_| 0)),
        verify_message: verdict.and_then(|v| v.err()).map(|e| e.to_string()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}\n", cube);
    println!("  centres:           {}", pass(report.centres));
    println!("  edges:             {}", pass(report.edges));
    println!("  colour counts:     {}", pass(report.counts));
    println!("  corners:           {}", pass(report.corners));
    println!("  duplicate corners: {}", pass(report.no_duplicate_corners));
    match (output.verify_code, output.verify_message) {
        (None, _) => println!("  solvable:          (cube incomplete)"),
        (Some(0), _) => println!("  solvable:          yes"),
        (Some(code), msg) => println!("  solvable:          no ({}: {})", code, msg.unwrap_or_default()),
    }
    Ok(())
}

fn pass(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "FAIL"
    }
}

// ── assemble ──────────────────────────────────────────────────────────

fn run_assemble(faces: &[String]) -> CliResult<()> {
    let mut adder = FaceAdder::new();
    for letters in faces {
        let face = Face::from_letters(letters)?;
        let placed = adder.add_face(&face);
        println!("{} {}", face.to_letters(), if placed { "placed" } else { "rejected" });
    }
    print_cube(adder.cube());
    Ok(())
}

fn print_cube(cube: &Cube) {
    println!("\n{}\n", cube);
    println!("valid:    {}", CubeValidator::new(cube).is_cube_valid());
    if cube.is_complete() {
        println!("solvable: {}", !cube.parity_check_fail());
    }
    println!("solver:   {}", cube.to_direction_string());
    println!("display:  {}", cube.to_display_string());
}

// ── replay / simulate ─────────────────────────────────────────────────

fn load_config(path: Option<&Path>, turbo: bool) -> CliResult<ScanConfig> {
    let mut config = match path {
        Some(p) => serde_json::from_str(&std::fs::read_to_string(p)?)?,
        None => ScanConfig::from_env(),
    };
    config.turbo |= turbo;
    Ok(config)
}

fn run_replay(args: &ReplayArgs) -> CliResult<()> {
    tracing::info!("Loading frames: {}", args.frames.display());
    let frames: Vec<Frame> = serde_json::from_str(&std::fs::read_to_string(&args.frames)?)?;
    let config = load_config(args.config.as_deref(), args.turbo)?;
    scan(config, &frames);
    Ok(())
}

fn run_simulate(args: &SimulateArgs) -> CliResult<()> {
    let simulation = simulate(&SimulateOptions {
        seed: args.seed,
        frames: args.frames,
        noise: args.noise,
    });
    tracing::info!(frames = simulation.frames.len(), "frames generated");

    if let Some(out) = &args.out {
        std::fs::write(out, serde_json::to_string(&simulation.frames)?)?;
        tracing::info!("Frames written to {}", out.display());
    }

    let config = load_config(None, args.turbo)?;
    if let Some(cube) = scan(config, &simulation.frames) {
        let matches = cube.colours() == simulation.cube.colours();
        println!("matches the cube shown: {}", matches);
    }
    Ok(())
}

/// Feed every frame to a fresh scanner; returns the finished cube, if any.
fn scan(config: ScanConfig, frames: &[Frame]) -> Option<Cube> {
    let mut scanner = Scanner::new(config);
    let start = Instant::now();
    let mut status = ScanStatus::Scanning { buffered: 0 };

    for (i, frame) in frames.iter().enumerate() {
        let at_ms = frame.at_ms.unwrap_or(i as u64 * DEFAULT_FRAME_MS);
        let mut print_event = |event: &ScanEvent| match event {
            ScanEvent::CubeComplete(_) => println!("{:>7} ms  cube complete", at_ms),
            other => println!("{:>7} ms  {:?}", at_ms, other),
        };
        status = scanner.process_frame_at(
            &frame.predictions,
            &mut print_event,
            start + Duration::from_millis(at_ms),
        );
        if matches!(status, ScanStatus::Completed | ScanStatus::Failed) {
            break;
        }
    }

    match status {
        ScanStatus::Completed => {
            print_cube(scanner.cube());
            Some(scanner.cube().clone())
        }
        ScanStatus::Failed => {
            println!("\nscan failed: the faces cannot form a solvable cube");
            None
        }
        ScanStatus::Scanning { buffered } => {
            println!("\nframes ran out with {} of 6 faces scanned", buffered);
            None
        }
    }
}
