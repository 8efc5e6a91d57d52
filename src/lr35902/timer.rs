use log::trace;

use crate::memory::mmu::Mmu;
use crate::memory::registers::InterruptFlags;
use crate::memory::{TAC_REGISTER, TIMA_REGISTER, TMA_REGISTER};

/// DIV advances at 16384 Hz: one increment per 256 master-clock cycles.
const DIV_PERIOD: usize = 256;

/// The divider and timer counters. Cycle remainders carry across steps so
/// neither counter drifts against the CPU clock over long runs.
#[derive(Clone)]
pub struct Timer {
    div_cycles: usize,
    tima_cycles: usize,
}

impl Timer {
    pub fn new() -> Timer {
        Timer {
            div_cycles: 0,
            tima_cycles: 0,
        }
    }

    pub fn tick(&mut self, mmu: &mut Mmu, cycles: usize) {
        self.div_cycles += cycles;
        while self.div_cycles >= DIV_PERIOD {
            self.div_cycles -= DIV_PERIOD;
            mmu.increment_divider();
        }

        let tac = mmu.read(TAC_REGISTER);
        if tac & 0b100 == 0 {
            return;
        }

        let period = match tac & 0b11 {
            0b00 => 1024,
            0b01 => 16,
            0b10 => 64,
            _ => 256,
        };

        self.tima_cycles += cycles;
        while self.tima_cycles >= period {
            self.tima_cycles -= period;

            let tima = mmu.read(TIMA_REGISTER);
            if tima == 0xff {
                let tma = mmu.read(TMA_REGISTER);
                mmu.write(TIMA_REGISTER, tma);
                mmu.request_interrupts(InterruptFlags::TIMER);
                trace!("Timer overflow, reloaded TIMA from TMA={:#04x}", tma);
            } else {
                mmu.write(TIMA_REGISTER, tima + 1);
            }
        }
    }
}
