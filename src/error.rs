use std::path::PathBuf;

use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum OxyError {
    #[snafu(display("Failed to read cartridge image {}: {}", path.display(), source))]
    CartridgeLoad { path: PathBuf, source: std::io::Error },
    #[snafu(display("Failed to read boot ROM image {}: {}", path.display(), source))]
    BootRomLoad { path: PathBuf, source: std::io::Error },
    #[snafu(display("Cartridge image too small to hold a header ({} bytes)", len))]
    RomTooSmall { len: usize },
    #[snafu(display("Unknown cartridge mapper byte: {:#04x}", byte))]
    UnknownMapper { byte: u8 },
    #[snafu(display("Unsupported cartridge mapper: {}", mapper))]
    UnsupportedMapper { mapper: String },
    #[snafu(display("Illegal opcode {:#04x} at ${:04x}", opcode, address))]
    IllegalOpcode { opcode: u8, address: u16 },
}
