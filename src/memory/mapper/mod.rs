use dyn_clone::DynClone;

pub mod mbc1;
pub mod rom;

/// Cartridge-side address decoding. Reads and writes are total: writes
/// into ROM ranges either latch bank-control state or are dropped, and
/// reads from disabled RAM return open-bus 0xff, so the bus never has to
/// surface an error for a memory access.
pub trait Mapper: DynClone {
    fn read(&self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, data: u8);
    fn current_rom_bank(&self) -> u8;
    fn current_ram_bank(&self) -> u8;
    fn name(&self) -> &'static str;
}

dyn_clone::clone_trait_object!(Mapper);
