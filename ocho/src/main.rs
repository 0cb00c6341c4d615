use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use ocho_core::constants::DEFAULT_CLOCK_HZ;

mod audio;
mod keymap;
mod run;

#[derive(Parser, Debug)]
#[command(version, about = "A Chip-8 emulator", long_about = None)]
struct Args {
    /// Path to the rom file to run
    rom: PathBuf,

    /// Window width in pixels
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 320)]
    height: u32,

    /// Cpu clock speed in Hz
    #[arg(short, long, default_value_t = DEFAULT_CLOCK_HZ)]
    clock: u32,

    /// Shift opcodes read Vy instead of shifting Vx in place
    #[arg(long)]
    shift_quirk: bool,

    /// Jump-with-offset adds Vx instead of V0
    #[arg(long)]
    jump_quirk: bool,

    /// Disable terminal output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Enable per-cycle trace output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.quiet {
        LevelFilter::Off
    } else if args.verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new().filter_level(level).init();

    run::run(&args)
}
