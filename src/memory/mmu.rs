use log::debug;

use crate::joypad::Joypad;
use crate::memory::mapper::Mapper;
use crate::memory::registers::{InterruptEnable, InterruptFlags};
use crate::memory::{
    Addressable, BOOTROM_MAPPER_REGISTER, DIV_REGISTER, HRAM_SIZE, INTERRUPT_ENABLE_REGISTER,
    INTERRUPT_FLAGS_REGISTER, JOYPAD_REGISTER, OAM_DMA_REGISTER, SERIAL_CONTROL_REGISTER,
    SERIAL_DATA_REGISTER, WRAM_SIZE,
};
use crate::sound::apu::Apu;
use crate::video::ppu::Ppu;

/// Boot ROM overlay latch. The overlay disappears the first time the
/// disable register is written (or the CPU reaches the cartridge entry
/// point) and never comes back for the rest of the run.
#[derive(Clone)]
pub enum BootRom {
    Mapped(Vec<u8>),
    Unmapped,
}

#[derive(Clone)]
pub struct Mmu {
    bootrom: BootRom,
    cartridge: Box<dyn Mapper>,
    wram: Vec<u8>,
    hram: Vec<u8>,
    io: [u8; 0x80],
    pub ppu: Ppu,
    pub apu: Apu,
    pub joypad: Joypad,
    interrupt_flags: InterruptFlags,
    interrupt_enable: InterruptEnable,
}

impl Mmu {
    pub fn new(cartridge: Box<dyn Mapper>) -> Mmu {
        debug!("Bus attached to a {} cartridge", cartridge.name());

        Mmu {
            bootrom: BootRom::Unmapped,
            cartridge,
            wram: vec![0; WRAM_SIZE],
            hram: vec![0; HRAM_SIZE],
            io: [0; 0x80],
            ppu: Ppu::new(),
            apu: Apu::new(),
            joypad: Joypad::new(),
            interrupt_flags: InterruptFlags::empty(),
            interrupt_enable: InterruptEnable::empty(),
        }
    }

    pub fn with_boot_rom(bootrom: Vec<u8>, cartridge: Box<dyn Mapper>) -> Mmu {
        let mut mmu = Mmu::new(cartridge);
        mmu.bootrom = BootRom::Mapped(bootrom);
        mmu
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x00ff => match &self.bootrom {
                BootRom::Mapped(image) => image.get(addr as usize).copied().unwrap_or(0xff),
                BootRom::Unmapped => self.cartridge.read(addr),
            },
            0x0100..=0x7fff => self.cartridge.read(addr),
            0x8000..=0x9fff => self.ppu.read_vram(addr - 0x8000),
            0xa000..=0xbfff => self.cartridge.read(addr),
            // 0xe000-0xfdff mirrors work RAM.
            0xc000..=0xfdff => self.wram[addr as usize & (WRAM_SIZE - 1)],
            0xfe00..=0xfe9f => self.ppu.read_oam((addr - 0xfe00) as usize),
            0xfea0..=0xfeff => 0x00,
            JOYPAD_REGISTER => self.joypad.as_u8(self.io[0x00]),
            INTERRUPT_FLAGS_REGISTER => self.interrupt_flags.bits(),
            0xff10..=0xff3f => self.apu.read(addr),
            OAM_DMA_REGISTER => self.io[0x46],
            0xff40..=0xff4b => self.ppu.read_register(addr),
            0xff00..=0xff7f => self.io[(addr - 0xff00) as usize],
            0xff80..=0xfffe => self.hram[(addr - 0xff80) as usize],
            INTERRUPT_ENABLE_REGISTER => self.interrupt_enable.bits(),
        }
    }

    pub fn write(&mut self, addr: u16, data: u8) {
        match addr {
            0x0000..=0x00ff => match self.bootrom {
                BootRom::Mapped(_) => {
                    debug!("Dropped write of {:#04x} into the boot ROM overlay", data)
                }
                BootRom::Unmapped => self.cartridge.write(addr, data),
            },
            0x0100..=0x7fff => self.cartridge.write(addr, data),
            0x8000..=0x9fff => self.ppu.write_vram(addr - 0x8000, data),
            0xa000..=0xbfff => self.cartridge.write(addr, data),
            0xc000..=0xfdff => self.wram[addr as usize & (WRAM_SIZE - 1)] = data,
            0xfe00..=0xfe9f => self.ppu.write_oam((addr - 0xfe00) as usize, data),
            0xfea0..=0xfeff => {}
            JOYPAD_REGISTER => self.io[0x00] = data & 0b0011_0000,
            SERIAL_CONTROL_REGISTER => {
                self.io[0x02] = data;
                if data & 0x80 != 0 {
                    let byte = self.io[(SERIAL_DATA_REGISTER - 0xff00) as usize];
                    debug!("Serial: {:#04x} ({})", byte, byte as char);
                }
            }
            // Any write resets the divider.
            DIV_REGISTER => self.io[0x04] = 0,
            INTERRUPT_FLAGS_REGISTER => {
                self.interrupt_flags = InterruptFlags::from_bits_truncate(data)
            }
            0xff10..=0xff3f => self.apu.write(addr, data),
            OAM_DMA_REGISTER => {
                self.io[0x46] = data;
                self.oam_dma(data);
            }
            0xff40..=0xff4b => self.ppu.write_register(addr, data),
            BOOTROM_MAPPER_REGISTER => {
                self.io[0x50] = data;
                self.unmap_boot_rom();
            }
            0xff00..=0xff7f => self.io[(addr - 0xff00) as usize] = data,
            0xff80..=0xfffe => self.hram[(addr - 0xff80) as usize] = data,
            INTERRUPT_ENABLE_REGISTER => {
                self.interrupt_enable = InterruptEnable::from_bits_truncate(data)
            }
        }
    }

    /// 16-bit accesses are two 8-bit accesses, low byte first. The order
    /// is observable whenever the target is a hardware register.
    pub fn read16(&self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    pub fn write16(&mut self, addr: u16, data: u16) {
        self.write(addr, data as u8);
        self.write(addr.wrapping_add(1), (data >> 8) as u8);
    }

    /// Copy 160 bytes into OAM, one bus access pair at a time, so the
    /// sprite mirror sees every byte exactly as a discrete write would.
    fn oam_dma(&mut self, source: u8) {
        let base = (source as u16) << 8;
        for offset in 0..0xa0u16 {
            let byte = self.read(base + offset);
            self.write(0xfe00 + offset, byte);
        }
    }

    pub fn unmap_boot_rom(&mut self) {
        if matches!(self.bootrom, BootRom::Mapped(_)) {
            debug!("Boot ROM unmapped");
            self.bootrom = BootRom::Unmapped;
        }
    }

    pub fn is_boot_rom_mapped(&self) -> bool {
        matches!(self.bootrom, BootRom::Mapped(_))
    }

    pub fn interrupt_flags(&self) -> InterruptFlags {
        self.interrupt_flags
    }

    pub fn interrupt_enable(&self) -> InterruptEnable {
        self.interrupt_enable
    }

    pub fn request_interrupts(&mut self, flags: InterruptFlags) {
        self.interrupt_flags |= flags;
    }

    pub fn clear_interrupt(&mut self, flag: InterruptFlags) {
        self.interrupt_flags.remove(flag);
    }

    pub(crate) fn increment_divider(&mut self) {
        self.io[0x04] = self.io[0x04].wrapping_add(1);
    }

    pub fn current_rom_bank(&self) -> u8 {
        self.cartridge.current_rom_bank()
    }

    /// Registers the boot ROM would normally have initialized.
    pub fn load_post_boot_defaults(&mut self) {
        self.write(0xff40, 0x91);
        self.write(0xff47, 0xfc);
        self.write(0xff48, 0xff);
        self.write(0xff49, 0xff);
        self.write(0xff26, 0xf1);
        self.write(0xff25, 0xf3);
        self.write(0xff24, 0x77);
    }
}
