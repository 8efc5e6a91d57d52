use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, LevelFilter};
use snafu::prelude::*;

use crate::cartridge::Cartridge;
use crate::error::OxyError;
use crate::gameboy::GameBoy;

mod cartridge;
mod error;
mod gameboy;
mod joypad;
mod lr35902;
mod memory;
mod sound;
mod video;

#[cfg(test)]
mod tests;

#[derive(Parser)]
#[command(name = "oxyboy", about = "Headless DMG emulator core")]
struct Args {
    /// Cartridge ROM image
    rom: PathBuf,

    /// Optional 256-byte boot ROM mapped over 0x0000-0x00ff
    #[arg(long)]
    boot_rom: Option<PathBuf>,

    /// Number of frames to emulate before exiting
    #[arg(long, default_value_t = 600)]
    frames: usize,

    /// Log more (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] [{}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .expect("logger already initialized");
}

fn run(args: &Args) -> Result<(), OxyError> {
    let cartridge = Cartridge::from_file(&args.rom)?;

    let mut gameboy = match &args.boot_rom {
        Some(path) => {
            let image = std::fs::read(path).context(error::BootRomLoadSnafu { path })?;
            GameBoy::with_boot_rom(image, cartridge)?
        }
        None => GameBoy::new(cartridge)?,
    };

    let mut frames = 0;
    while frames < args.frames {
        gameboy.tick();
        if gameboy.frame_ready() {
            frames += 1;
        }
    }

    info!(
        "Emulated {} frames in {} cycles",
        frames,
        gameboy.elapsed_cycles()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.verbose);

    if let Err(err) = run(&args) {
        error!("{}", err);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
