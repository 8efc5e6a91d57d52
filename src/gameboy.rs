use log::error;

use crate::cartridge::Cartridge;
use crate::error::OxyError;
use crate::joypad::Button;
use crate::lr35902::cpu::Cpu;
use crate::lr35902::timer::Timer;
use crate::memory::mmu::Mmu;
use crate::video::palette::Color;

/// The whole machine: CPU and timer beside the bus, which owns the video
/// and audio units. One `tick` is one instruction plus everything that
/// instruction's cycles buy the peripherals.
#[derive(Clone)]
pub struct GameBoy {
    pub cpu: Cpu,
    pub mmu: Mmu,
    timer: Timer,
}

impl GameBoy {
    /// Boot straight into the cartridge with post-boot defaults.
    pub fn new(cartridge: Cartridge) -> Result<GameBoy, OxyError> {
        let mut mmu = Mmu::new(cartridge.into_mapper()?);
        mmu.load_post_boot_defaults();

        Ok(GameBoy {
            cpu: Cpu::post_boot(),
            mmu,
            timer: Timer::new(),
        })
    }

    /// Start from a boot ROM overlay with a zeroed register file.
    pub fn with_boot_rom(boot_rom: Vec<u8>, cartridge: Cartridge) -> Result<GameBoy, OxyError> {
        Ok(GameBoy {
            cpu: Cpu::new(),
            mmu: Mmu::with_boot_rom(boot_rom, cartridge.into_mapper()?),
            timer: Timer::new(),
        })
    }

    /// Execute one instruction, then advance the timer and video unit by
    /// its cycle cost and cycle the audio unit once per elapsed cycle.
    /// Always completes: a debug-build decode failure is logged and
    /// absorbed as a four-cycle skip.
    pub fn tick(&mut self) -> usize {
        let cycles = match self.cpu.step(&mut self.mmu) {
            Ok(cycles) => cycles,
            Err(err) => {
                error!("{}", err);
                self.cpu.skip_illegal_opcode();
                4
            }
        };

        self.timer.tick(&mut self.mmu, cycles);

        let interrupts = self.mmu.ppu.tick(cycles);
        self.mmu.request_interrupts(interrupts);

        // The audio dividers run at clock-cycle resolution, so the APU
        // cannot take the count as a single parameter the way the video
        // unit does.
        for _ in 0..cycles {
            self.mmu.apu.cycle();
        }

        cycles
    }

    pub fn frame_ready(&self) -> bool {
        self.mmu.ppu.frame_ready()
    }

    pub fn framebuffer(&self) -> &[Color] {
        self.mmu.ppu.framebuffer()
    }

    pub fn audio_buffer_full(&self) -> bool {
        self.mmu.apu.buffer_full()
    }

    pub fn audio_samples(&self) -> &[f32] {
        self.mmu.apu.samples()
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        self.mmu.joypad.set_button(button, pressed);
    }

    pub fn elapsed_cycles(&self) -> usize {
        self.cpu.elapsed_cycles()
    }
}
