use std::path::Path;

use log::info;
use snafu::prelude::*;

use crate::error::{self, OxyError};
use crate::memory::mapper::mbc1::Mbc1;
use crate::memory::mapper::rom::Rom;
use crate::memory::mapper::Mapper;

const TITLE_OFFSET: usize = 0x134;
const MAPPER_OFFSET: usize = 0x147;
const ROM_SIZE_OFFSET: usize = 0x148;
const RAM_SIZE_OFFSET: usize = 0x149;
const HEADER_END: usize = 0x150;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MapperKind {
    None,
    Mbc1,
    Mbc2,
    Mbc3,
    Mbc5,
    Mmm01,
    HuC1,
}

impl MapperKind {
    fn from_header_byte(byte: u8) -> Result<MapperKind, OxyError> {
        match byte {
            0x00 | 0x08 | 0x09 => Ok(MapperKind::None),
            0x01..=0x03 => Ok(MapperKind::Mbc1),
            0x05 | 0x06 => Ok(MapperKind::Mbc2),
            0x0b..=0x0d => Ok(MapperKind::Mmm01),
            0x0f..=0x13 => Ok(MapperKind::Mbc3),
            0x19..=0x1e => Ok(MapperKind::Mbc5),
            0xfe => Ok(MapperKind::HuC1),
            _ => Err(OxyError::UnknownMapper { byte }),
        }
    }
}

impl std::fmt::Display for MapperKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            MapperKind::None => "ROM",
            MapperKind::Mbc1 => "MBC1",
            MapperKind::Mbc2 => "MBC2",
            MapperKind::Mbc3 => "MBC3",
            MapperKind::Mbc5 => "MBC5",
            MapperKind::Mmm01 => "MMM01",
            MapperKind::HuC1 => "HuC1",
        };

        write!(f, "{}", name)
    }
}

/// A parsed cartridge image. Only the raw ROM bytes, the mapper kind and
/// the declared bank counts are consumed by the rest of the system.
pub struct Cartridge {
    pub title: String,
    pub mapper: MapperKind,
    pub rom_banks: usize,
    pub ram_banks: usize,
    pub rom: Vec<u8>,
}

impl Cartridge {
    pub fn from_file(path: &Path) -> Result<Cartridge, OxyError> {
        let rom = std::fs::read(path).context(error::CartridgeLoadSnafu { path })?;
        Cartridge::from_bytes(rom)
    }

    pub fn from_bytes(rom: Vec<u8>) -> Result<Cartridge, OxyError> {
        ensure!(rom.len() >= HEADER_END, error::RomTooSmallSnafu { len: rom.len() });

        let title = rom[TITLE_OFFSET..TITLE_OFFSET + 16]
            .iter()
            .take_while(|&&byte| byte != 0)
            .map(|&byte| byte as char)
            .collect::<String>();

        let mapper = MapperKind::from_header_byte(rom[MAPPER_OFFSET])?;
        let rom_banks = 2usize << rom[ROM_SIZE_OFFSET];
        let ram_banks = rom[RAM_SIZE_OFFSET] as usize;

        info!(
            "Cartridge \"{}\": mapper {}, {} ROM banks, {} RAM banks",
            title, mapper, rom_banks, ram_banks
        );

        Ok(Cartridge {
            title,
            mapper,
            rom_banks,
            ram_banks,
            rom,
        })
    }

    pub fn into_mapper(self) -> Result<Box<dyn Mapper>, OxyError> {
        match self.mapper {
            MapperKind::None => Ok(Box::new(Rom::new(self.rom))),
            MapperKind::Mbc1 => Ok(Box::new(Mbc1::new(self.rom, self.rom_banks))),
            other => Err(OxyError::UnsupportedMapper {
                mapper: other.to_string(),
            }),
        }
    }
}
