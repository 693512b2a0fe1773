#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for inspecting and converting Cell Machine level codes.

mod render;

use anyhow::{Context, Result};
use cell_machine_levels_core::{Level, WallEffect};
use cell_machine_levels_formats::{format_tag, open, save, FormatRegistry};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "cell-machine-levels", about = "Inspect and convert Cell Machine level codes")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a summary and a text rendering of a level code.
    Inspect {
        /// Level code, e.g. `V3;a;a;}{)08Y;;test;2`.
        code: String,
    },
    /// Re-encode a level code in another format.
    Convert {
        /// Level code to convert.
        code: String,
        /// Tag of the target format.
        #[arg(long, value_name = "TAG")]
        to: String,
        /// Normalise cell rotations that have no effect before saving.
        #[arg(long)]
        optimize: bool,
    },
    /// List the supported format tags.
    Formats,
}

/// Entry point for the level code command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    match args.command {
        Command::Inspect { code } => inspect(&code),
        Command::Convert { code, to, optimize } => convert(&code, &to, optimize),
        Command::Formats => {
            for tag in FormatRegistry::standard().tags() {
                println!("{tag}");
            }
            Ok(())
        }
    }
}

fn inspect(code: &str) -> Result<()> {
    let level = open_level(code)?;
    let occupied = level.cells().filter(|(_, _, cell, _)| !cell.is_background()).count();
    let placeable = level.cells().filter(|(_, _, _, placeable)| *placeable).count();

    println!("format:      {}", format_tag(code));
    println!("size:        {}x{}", level.width(), level.height());
    println!("name:        {}", level.name());
    if !level.tutorial_text().is_empty() {
        println!("tutorial:    {}", level.tutorial_text());
    }
    println!("wall effect: {}", wall_effect_name(level.wall_effect()));
    println!("cells:       {occupied}");
    println!("placeable:   {placeable}");
    println!();
    print!("{}", render::grid(&level));
    Ok(())
}

fn convert(code: &str, to: &str, optimize: bool) -> Result<()> {
    let mut level = open_level(code)?;
    if optimize {
        level.optimize();
    }
    let converted = save(&level, to).with_context(|| format!("failed to save level as {to}"))?;
    println!("{converted}");
    Ok(())
}

fn open_level(code: &str) -> Result<Level> {
    open(code.trim()).context("failed to open level code")
}

fn wall_effect_name(wall_effect: WallEffect) -> &'static str {
    match wall_effect {
        WallEffect::Stop => "stop",
        WallEffect::Wrap => "wrap",
        WallEffect::Delete => "delete",
        WallEffect::Flip => "flip",
    }
}
