// src/main.rs

//! Command-line front end for the blockMeshDict generator.
//!
//! Each invocation restores the saved responses (if any), applies the
//! fields given on the command line, and runs one action.

use anyhow::{bail, Context, Result};
use blockmesh_gen::{Face, FormController, GeneratorConfig, PatchType, ScalePolicy};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blockmesh-gen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate an OpenFOAM blockMeshDict for a single hex block", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); falls back to RUST_LOG
    #[arg(short, long)]
    log_level: Option<String>,

    /// JSON file with generator settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the blockMeshDict
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Where saved responses live
    #[arg(long)]
    state: Option<PathBuf>,

    /// Reject unusable custom scales instead of falling back to 1
    #[arg(long)]
    strict_scale: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the blockMeshDict
    Generate {
        #[command(flatten)]
        form: FormArgs,

        /// Print the document instead of writing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Show cell dimensions and whether cells are cubic
    Stats {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Print the saved responses
    Show,
    /// Clear all responses
    Reset,
}

/// Field values typed on the command line; unset ones keep their saved value.
#[derive(Args, Default)]
struct FormArgs {
    #[arg(long, allow_hyphen_values = true)]
    xmin: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    ymin: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    zmin: Option<String>,
    #[arg(long)]
    length_x: Option<String>,
    #[arg(long)]
    length_y: Option<String>,
    #[arg(long)]
    length_z: Option<String>,
    #[arg(long)]
    cells_x: Option<String>,
    #[arg(long)]
    cells_y: Option<String>,
    #[arg(long)]
    cells_z: Option<String>,

    /// m, cm, mm or custom..
    #[arg(long)]
    unit: Option<String>,
    /// Sign of the custom exponent (+ or -)
    #[arg(long, allow_hyphen_values = true)]
    custom_sign: Option<String>,
    /// Custom exponent, 1 to 10
    #[arg(long, allow_hyphen_values = true)]
    custom_exp: Option<String>,

    /// Boundary as FACE=TYPE[:NAME], e.g. bottom=wall:walls (repeatable)
    #[arg(short, long = "boundary")]
    boundaries: Vec<String>,

    /// Save responses after configuring boundaries or generating
    #[arg(long)]
    save_responses: Option<bool>,
}

impl FormArgs {
    fn apply(self, controller: &mut FormController) -> Result<()> {
        let fields = controller.fields_mut();
        let overrides = [
            ("xmin", self.xmin),
            ("ymin", self.ymin),
            ("zmin", self.zmin),
            ("length_x", self.length_x),
            ("length_y", self.length_y),
            ("length_z", self.length_z),
            ("cells_x", self.cells_x),
            ("cells_y", self.cells_y),
            ("cells_z", self.cells_z),
            ("scale_unit", self.unit),
            ("custom_sign", self.custom_sign),
            ("custom_exp", self.custom_exp),
        ];
        for (name, value) in overrides {
            if let (Some(value), Some(field)) = (value, fields.field_mut(name)) {
                *field = value;
            }
        }

        if let Some(enabled) = self.save_responses {
            controller.set_save_responses(enabled);
        }

        if !self.boundaries.is_empty() {
            for spec in &self.boundaries {
                let (face, patch_type, name) = parse_boundary_spec(spec)?;
                controller.editor_mut().set_face(face, patch_type, &name);
            }
            controller.commit_boundaries()?;
            println!("Boundary types/names updated.");
        }
        Ok(())
    }
}

/// `FACE=TYPE[:NAME]`
fn parse_boundary_spec(spec: &str) -> Result<(Face, PatchType, String)> {
    let Some((face, rest)) = spec.split_once('=') else {
        bail!("boundary '{}' is not FACE=TYPE[:NAME]", spec);
    };
    let (patch_type, name) = rest.split_once(':').unwrap_or((rest, ""));
    let face: Face = face.parse().map_err(anyhow::Error::msg)?;
    let patch_type: PatchType = patch_type.parse().map_err(anyhow::Error::msg)?;
    Ok((face, patch_type, name.to_string()))
}

fn init_logging(level: Option<&str>) {
    let log_level = level
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .or_else(|| std::env::var("RUST_LOG").ok().and_then(|v| v.parse().ok()))
        .unwrap_or(LevelFilter::Warn);
    env_logger::Builder::new()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(buf, "[{} {:5}] {}", Local::now().format("%H:%M:%S"), record.level(), record.args())
        })
        .init();
    log::debug!("Logger initialized (level: {})", log_level);
}

fn build_config(cli: &Cli) -> Result<GeneratorConfig> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::from_json_file(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(output) = &cli.output {
        config.output_path = output.clone();
    }
    if let Some(state) = &cli.state {
        config.state_path = state.clone();
    }
    if cli.strict_scale {
        config.scale_policy = ScalePolicy::Strict;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let config = build_config(&cli)?;
    let mut controller = FormController::load(config);
    if controller.loaded_previous() {
        println!("Loaded previous responses.");
    }

    match cli.command {
        Commands::Generate { form, dry_run } => {
            form.apply(&mut controller)?;
            if dry_run {
                print!("{}", controller.render()?.document);
                return Ok(());
            }
            let outcome = controller.generate()?;
            println!("{} has been generated!", outcome.report.path.display());
            if let Some(Err(e)) = outcome.responses_saved {
                eprintln!("Warning: {}", e);
            }
        }
        Commands::Stats { form } => {
            form.apply(&mut controller)?;
            println!("{}", controller.cell_stats()?);
        }
        Commands::Show => show(&controller),
        Commands::Reset => {
            if controller.is_pristine() {
                println!("All fields are already reset.");
                return Ok(());
            }
            controller.reset();
            let state_path = &controller.config().state_path;
            if state_path.exists() {
                std::fs::remove_file(state_path)
                    .with_context(|| format!("Failed to remove {}", state_path.display()))?;
            }
            println!("All responses have been cleared.");
        }
    }
    Ok(())
}

fn show(controller: &FormController) {
    if let Some(saved_at) = controller.loaded_saved_at() {
        println!("Saved at: {}", saved_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"));
    }
    for (name, value) in controller.fields().geometry_fields() {
        println!("{:<10} {}", name, value);
    }
    println!("{:<10} {}", "scale", controller.fields().unit_label());
    println!("{:<10} {}", "autosave", controller.save_responses());
    println!();
    let complete = if controller.boundaries().is_complete() { "" } else { " (incomplete)" };
    println!("Boundaries{}:", complete);
    for (face, assignment) in controller.boundaries().iter() {
        println!("  {:<14} {:<14} {}", face.label(), assignment.patch_type.as_str(), assignment.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_boundary_spec() {
        let (face, patch_type, name) = parse_boundary_spec("bottom=wall:walls").unwrap();
        assert_eq!(face, Face::BottomZmin);
        assert_eq!(patch_type, PatchType::Wall);
        assert_eq!(name, "walls");

        let (face, patch_type, name) = parse_boundary_spec("xmax=symmetryPlane").unwrap();
        assert_eq!(face, Face::RightXmax);
        assert_eq!(patch_type, PatchType::SymmetryPlane);
        assert_eq!(name, "");

        assert!(parse_boundary_spec("bottom").is_err());
        assert!(parse_boundary_spec("bottom=slip:x").is_err());
    }

    #[test]
    fn test_cli_parses_negative_origin() {
        let cli = Cli::try_parse_from([
            "blockmesh-gen",
            "generate",
            "--xmin",
            "-1.5",
            "--boundary",
            "top=wall:lid",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate { form, dry_run } => {
                assert!(dry_run);
                assert_eq!(form.xmin.as_deref(), Some("-1.5"));
                assert_eq!(form.boundaries, vec!["top=wall:lid".to_string()]);
            }
            _ => panic!("expected generate"),
        }
    }
}
