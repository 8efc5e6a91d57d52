use log::{trace, warn};

use crate::error::OxyError;
use crate::lr35902::irq::{Ime, Vector};
use crate::lr35902::opcodes::{CB_OPCODE_NAMES, OPCODE_CYCLES, OPCODE_LENGTHS, OPCODE_NAMES};
use crate::lr35902::registers::{Flags, Registers};
use crate::memory::mmu::Mmu;

/// Extra cycles charged when an interrupt handler is entered.
const INTERRUPT_DISPATCH_CYCLES: usize = 12;

#[cfg(debug_assertions)]
const ILLEGAL_OPCODES: [u8; 11] = [
    0xd3, 0xdb, 0xdd, 0xe3, 0xe4, 0xeb, 0xec, 0xed, 0xf4, 0xfc, 0xfd,
];

#[derive(Clone)]
pub struct Cpu {
    pub registers: Registers,
    ime: Ime,
    halted: bool,
    cycles: usize,
}

impl Cpu {
    pub fn new() -> Cpu {
        Cpu {
            registers: Registers::default(),
            ime: Ime::new(),
            halted: false,
            cycles: 0,
        }
    }

    /// A CPU that starts at the cartridge entry point with the register
    /// file the boot ROM would have left behind.
    pub fn post_boot() -> Cpu {
        Cpu {
            registers: Registers::post_boot(),
            ..Cpu::new()
        }
    }

    pub fn elapsed_cycles(&self) -> usize {
        self.cycles
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Execute the instruction at PC and return its cycle cost, including
    /// any conditional-branch penalty and interrupt dispatch charge.
    pub fn step(&mut self, mmu: &mut Mmu) -> Result<usize, OxyError> {
        // Reaching the cartridge entry point retires the boot ROM overlay.
        if self.registers.pc == 0x0100 {
            mmu.unmap_boot_rom();
        }

        if self.halted {
            let pending = mmu.interrupt_enable().bits() & mmu.interrupt_flags().bits();
            if pending != 0 {
                // Any pending interrupt wakes the CPU, IME or not;
                // dispatching still waits for IME below.
                self.halted = false;
            } else {
                self.cycles += 4;
                return Ok(4);
            }
        }

        let enable_ime_after = self.ime.enable_pending;

        let mut cycles = self.execute(mmu)?;

        if enable_ime_after && self.ime.enable_pending {
            self.ime.enabled = true;
            self.ime.enable_pending = false;
        }

        cycles += self.dispatch_interrupts(mmu);
        self.cycles += cycles;
        Ok(cycles)
    }

    /// Recovery path for a debug-build decode failure: skip the offending
    /// byte so execution can continue.
    pub fn skip_illegal_opcode(&mut self) {
        self.registers.pc = self.registers.pc.wrapping_add(1);
        self.cycles += 4;
    }

    fn dispatch_interrupts(&mut self, mmu: &mut Mmu) -> usize {
        if !self.ime.enabled {
            return 0;
        }

        let pending = mmu.interrupt_enable().bits() & mmu.interrupt_flags().bits();
        let Some(vector) = Vector::from_flags(pending.into()) else {
            return 0;
        };

        trace!("Dispatching {} interrupt to ${:04x}", vector, vector.to_address());
        mmu.clear_interrupt(vector.flag());
        self.ime.enabled = false;
        self.push_stack(mmu, self.registers.pc);
        self.registers.pc = vector.to_address();
        INTERRUPT_DISPATCH_CYCLES
    }

    fn execute(&mut self, mmu: &mut Mmu) -> Result<usize, OxyError> {
        let pc = self.registers.pc;
        let opcode = mmu.read(pc);

        #[cfg(debug_assertions)]
        if ILLEGAL_OPCODES.contains(&opcode) {
            return Err(OxyError::IllegalOpcode { opcode, address: pc });
        }

        if opcode == 0xcb {
            trace!("${:04x}  {}", pc, CB_OPCODE_NAMES[mmu.read(pc.wrapping_add(1)) as usize]);
        } else {
            trace!("${:04x}  {}  [{}]", pc, OPCODE_NAMES[opcode as usize], self);
        }

        // Classic bit-field decomposition of the opcode byte. The 16x16
        // table is symmetric enough that two or three bits at a time pick
        // the operation and its operands.
        let x = opcode >> 6;
        let y = (opcode >> 3) & 0x07;
        let z = opcode & 0x07;
        let p = y >> 1;
        let q = y & 0x01;

        // Branches write their target here; everything else falls through
        // to the table-driven PC advance.
        let mut jump: Option<u16> = None;
        let mut extra = 0usize;

        match x {
            0 => match z {
                0 => match y {
                    0 => {} // nop
                    1 => {
                        // ld (a16), sp
                        let addr = mmu.read16(pc.wrapping_add(1));
                        mmu.write16(addr, self.registers.sp);
                    }
                    2 => {
                        // stop: nothing to wake up for without a frontend
                        trace!("STOP executed at ${:04x}", pc);
                    }
                    3 => {
                        // jr r8
                        let offset = mmu.read(pc.wrapping_add(1)) as i8;
                        jump = Some(pc.wrapping_add(2).wrapping_add_signed(offset as i16));
                    }
                    _ => {
                        // jr cc, r8
                        if self.condition(y - 4) {
                            let offset = mmu.read(pc.wrapping_add(1)) as i8;
                            jump = Some(pc.wrapping_add(2).wrapping_add_signed(offset as i16));
                            extra += 4;
                        }
                    }
                },
                1 => match q {
                    0 => {
                        // ld rp, d16
                        let value = mmu.read16(pc.wrapping_add(1));
                        self.write_rp(p, value);
                    }
                    _ => {
                        // add hl, rp
                        let hl = self.registers.hl();
                        let value = self.read_rp(p);
                        let result = hl as u32 + value as u32;
                        self.update_flag(Flags::SUBTRACT, false);
                        self.update_flag(Flags::HALF_CARRY, (hl & 0x0fff) + (value & 0x0fff) > 0x0fff);
                        self.update_flag(Flags::CARRY, result > 0xffff);
                        self.registers.set_hl(result as u16);
                    }
                },
                2 => {
                    // ld (rp), a / ld a, (rp), with the HL+/HL- variants
                    let addr = match p {
                        0 => self.registers.bc(),
                        1 => self.registers.de(),
                        _ => self.registers.hl(),
                    };

                    if q == 0 {
                        mmu.write(addr, self.registers.a);
                    } else {
                        self.registers.a = mmu.read(addr);
                    }

                    match p {
                        2 => self.registers.set_hl(addr.wrapping_add(1)),
                        3 => self.registers.set_hl(addr.wrapping_sub(1)),
                        _ => {}
                    }
                }
                3 => {
                    // inc rp / dec rp (no flags)
                    let value = self.read_rp(p);
                    let value = if q == 0 {
                        value.wrapping_add(1)
                    } else {
                        value.wrapping_sub(1)
                    };
                    self.write_rp(p, value);
                }
                4 => {
                    // inc r
                    let prev = self.read_r8(mmu, y);
                    let result = prev.wrapping_add(1);
                    self.write_r8(mmu, y, result);
                    self.update_flag(Flags::ZERO, result == 0);
                    self.update_flag(Flags::SUBTRACT, false);
                    self.update_flag(Flags::HALF_CARRY, prev & 0x0f == 0x0f);
                }
                5 => {
                    // dec r
                    let prev = self.read_r8(mmu, y);
                    let result = prev.wrapping_sub(1);
                    self.write_r8(mmu, y, result);
                    self.update_flag(Flags::ZERO, result == 0);
                    self.update_flag(Flags::SUBTRACT, true);
                    self.update_flag(Flags::HALF_CARRY, prev & 0x0f == 0);
                }
                6 => {
                    // ld r, d8
                    let value = mmu.read(pc.wrapping_add(1));
                    self.write_r8(mmu, y, value);
                }
                _ => match y {
                    0 => {
                        // rlca
                        let a = self.registers.a;
                        self.registers.a = a.rotate_left(1);
                        self.set_rotate_flags(false, a & 0x80 != 0);
                    }
                    1 => {
                        // rrca
                        let a = self.registers.a;
                        self.registers.a = a.rotate_right(1);
                        self.set_rotate_flags(false, a & 0x01 != 0);
                    }
                    2 => {
                        // rla
                        let a = self.registers.a;
                        self.registers.a = (a << 1) | self.flag(Flags::CARRY) as u8;
                        self.set_rotate_flags(false, a & 0x80 != 0);
                    }
                    3 => {
                        // rra
                        let a = self.registers.a;
                        self.registers.a = (a >> 1) | ((self.flag(Flags::CARRY) as u8) << 7);
                        self.set_rotate_flags(false, a & 0x01 != 0);
                    }
                    4 => self.daa(),
                    5 => {
                        // cpl
                        self.registers.a = !self.registers.a;
                        self.update_flag(Flags::SUBTRACT, true);
                        self.update_flag(Flags::HALF_CARRY, true);
                    }
                    6 => {
                        // scf
                        self.update_flag(Flags::SUBTRACT, false);
                        self.update_flag(Flags::HALF_CARRY, false);
                        self.update_flag(Flags::CARRY, true);
                    }
                    _ => {
                        // ccf
                        let carry = self.flag(Flags::CARRY);
                        self.update_flag(Flags::SUBTRACT, false);
                        self.update_flag(Flags::HALF_CARRY, false);
                        self.update_flag(Flags::CARRY, !carry);
                    }
                },
            },
            1 => {
                if z == 6 && y == 6 {
                    // halt: the slot ld (hl), (hl) would occupy
                    self.halted = true;
                    trace!("HALT, IME={}", self.ime.enabled);
                } else {
                    // ld r, r
                    let value = self.read_r8(mmu, z);
                    self.write_r8(mmu, y, value);
                }
            }
            2 => {
                // The whole arithmetic block shares one routine; y picks
                // the operation and z the operand register.
                let value = self.read_r8(mmu, z);
                self.execute_alu(y, value);
            }
            _ => match z {
                0 => match y {
                    0..=3 => {
                        // ret cc
                        if self.condition(y) {
                            jump = Some(self.pop_stack(mmu));
                            extra += 12;
                        }
                    }
                    4 => {
                        // ldh (a8), a
                        let offset = mmu.read(pc.wrapping_add(1));
                        mmu.write(0xff00 + offset as u16, self.registers.a);
                    }
                    5 => {
                        // add sp, r8
                        let result = self.add_sp_offset(mmu, pc);
                        self.registers.sp = result;
                    }
                    6 => {
                        // ldh a, (a8)
                        let offset = mmu.read(pc.wrapping_add(1));
                        self.registers.a = mmu.read(0xff00 + offset as u16);
                    }
                    _ => {
                        // ld hl, sp+r8
                        let result = self.add_sp_offset(mmu, pc);
                        self.registers.set_hl(result);
                    }
                },
                1 => match q {
                    0 => {
                        // pop rp2
                        let value = self.pop_stack(mmu);
                        self.write_rp2(p, value);
                    }
                    _ => match p {
                        0 => jump = Some(self.pop_stack(mmu)), // ret
                        1 => {
                            // reti
                            self.ime.enabled = true;
                            jump = Some(self.pop_stack(mmu));
                        }
                        2 => jump = Some(self.registers.hl()), // jp (hl)
                        _ => self.registers.sp = self.registers.hl(), // ld sp, hl
                    },
                },
                2 => match y {
                    0..=3 => {
                        // jp cc, a16
                        if self.condition(y) {
                            jump = Some(mmu.read16(pc.wrapping_add(1)));
                            extra += 4;
                        }
                    }
                    4 => mmu.write(0xff00 + self.registers.c as u16, self.registers.a), // ld (c), a
                    5 => {
                        // ld (a16), a
                        let addr = mmu.read16(pc.wrapping_add(1));
                        mmu.write(addr, self.registers.a);
                    }
                    6 => self.registers.a = mmu.read(0xff00 + self.registers.c as u16), // ld a, (c)
                    _ => {
                        // ld a, (a16)
                        let addr = mmu.read16(pc.wrapping_add(1));
                        self.registers.a = mmu.read(addr);
                    }
                },
                3 => match y {
                    0 => jump = Some(mmu.read16(pc.wrapping_add(1))), // jp a16
                    1 => {
                        // cb prefix
                        let cb_opcode = mmu.read(pc.wrapping_add(1));
                        extra += self.execute_cb(mmu, cb_opcode);
                    }
                    6 => {
                        // di
                        self.ime.enabled = false;
                        self.ime.enable_pending = false;
                    }
                    7 => self.ime.enable_pending = true, // ei
                    _ => jump = Some(self.skip_undefined(pc, opcode)),
                },
                4 => {
                    // call cc, a16
                    if y < 4 {
                        if self.condition(y) {
                            self.push_stack(mmu, pc.wrapping_add(3));
                            jump = Some(mmu.read16(pc.wrapping_add(1)));
                            extra += 12;
                        }
                    } else {
                        jump = Some(self.skip_undefined(pc, opcode));
                    }
                }
                5 => match q {
                    0 => {
                        // push rp2
                        let value = self.read_rp2(p);
                        self.push_stack(mmu, value);
                    }
                    _ => {
                        if p == 0 {
                            // call a16
                            self.push_stack(mmu, pc.wrapping_add(3));
                            jump = Some(mmu.read16(pc.wrapping_add(1)));
                        } else {
                            jump = Some(self.skip_undefined(pc, opcode));
                        }
                    }
                },
                6 => {
                    // alu[y] d8
                    let value = mmu.read(pc.wrapping_add(1));
                    self.execute_alu(y, value);
                }
                _ => {
                    // rst y*8
                    self.push_stack(mmu, pc.wrapping_add(1));
                    jump = Some(y as u16 * 8);
                }
            },
        }

        match jump {
            Some(target) => self.registers.pc = target,
            None => {
                self.registers.pc = pc.wrapping_add(OPCODE_LENGTHS[opcode as usize] as u16)
            }
        }

        Ok(OPCODE_CYCLES[opcode as usize] as usize + extra)
    }

    /// Undefined opcode in a release build: log it and move past the byte.
    fn skip_undefined(&self, pc: u16, opcode: u8) -> u16 {
        warn!("Executed undefined opcode {:#04x} at ${:04x}", opcode, pc);
        pc.wrapping_add(1)
    }

    fn execute_alu(&mut self, op: u8, value: u8) {
        let a = self.registers.a;
        match op {
            0 => {
                // add
                let result = a as u16 + value as u16;
                self.update_flag(Flags::SUBTRACT, false);
                self.update_flag(Flags::HALF_CARRY, (a & 0x0f) + (value & 0x0f) > 0x0f);
                self.update_flag(Flags::CARRY, result > 0xff);
                self.registers.a = result as u8;
                self.update_flag(Flags::ZERO, self.registers.a == 0);
            }
            1 => {
                // adc
                let carry = self.flag(Flags::CARRY) as u16;
                let result = a as u16 + value as u16 + carry;
                self.update_flag(Flags::SUBTRACT, false);
                // The nibbles are summed separately so a carry produced by
                // the +1 alone still counts.
                self.update_flag(
                    Flags::HALF_CARRY,
                    (a & 0x0f) as u16 + (value & 0x0f) as u16 + carry > 0x0f,
                );
                self.update_flag(Flags::CARRY, result > 0xff);
                self.registers.a = result as u8;
                self.update_flag(Flags::ZERO, self.registers.a == 0);
            }
            2 => {
                // sub
                let result = a as i16 - value as i16;
                self.update_flag(Flags::SUBTRACT, true);
                self.update_flag(Flags::HALF_CARRY, a & 0x0f < value & 0x0f);
                self.update_flag(Flags::CARRY, result < 0);
                self.registers.a = result as u8;
                self.update_flag(Flags::ZERO, self.registers.a == 0);
            }
            3 => {
                // sbc
                let carry = self.flag(Flags::CARRY) as i16;
                let result = a as i16 - value as i16 - carry;
                self.update_flag(Flags::SUBTRACT, true);
                self.update_flag(
                    Flags::HALF_CARRY,
                    (a & 0x0f) as i16 - (value & 0x0f) as i16 - carry < 0,
                );
                self.update_flag(Flags::CARRY, result < 0);
                self.registers.a = result as u8;
                self.update_flag(Flags::ZERO, self.registers.a == 0);
            }
            4 => {
                // and
                self.registers.a &= value;
                self.update_flag(Flags::ZERO, self.registers.a == 0);
                self.update_flag(Flags::SUBTRACT, false);
                self.update_flag(Flags::HALF_CARRY, true);
                self.update_flag(Flags::CARRY, false);
            }
            5 => {
                // xor
                self.registers.a ^= value;
                self.update_flag(Flags::ZERO, self.registers.a == 0);
                self.update_flag(Flags::SUBTRACT, false);
                self.update_flag(Flags::HALF_CARRY, false);
                self.update_flag(Flags::CARRY, false);
            }
            6 => {
                // or
                self.registers.a |= value;
                self.update_flag(Flags::ZERO, self.registers.a == 0);
                self.update_flag(Flags::SUBTRACT, false);
                self.update_flag(Flags::HALF_CARRY, false);
                self.update_flag(Flags::CARRY, false);
            }
            _ => {
                // cp: sub without the writeback
                let result = a as i16 - value as i16;
                self.update_flag(Flags::ZERO, result as u8 == 0);
                self.update_flag(Flags::SUBTRACT, true);
                self.update_flag(Flags::HALF_CARRY, a & 0x0f < value & 0x0f);
                self.update_flag(Flags::CARRY, result < 0);
            }
        }
    }

    /// Rotate/shift/swap/bit-test block behind the CB prefix. Returns the
    /// cycles beyond the prefix's own table cost.
    fn execute_cb(&mut self, mmu: &mut Mmu, opcode: u8) -> usize {
        let x = opcode >> 6;
        let y = (opcode >> 3) & 0x07;
        let z = opcode & 0x07;

        let value = self.read_r8(mmu, z);

        let result = match x {
            0 => match y {
                0 => {
                    // rlc
                    let result = value.rotate_left(1);
                    self.set_rotate_flags(result == 0, value & 0x80 != 0);
                    result
                }
                1 => {
                    // rrc
                    let result = value.rotate_right(1);
                    self.set_rotate_flags(result == 0, value & 0x01 != 0);
                    result
                }
                2 => {
                    // rl
                    let result = (value << 1) | self.flag(Flags::CARRY) as u8;
                    self.set_rotate_flags(result == 0, value & 0x80 != 0);
                    result
                }
                3 => {
                    // rr
                    let result = (value >> 1) | ((self.flag(Flags::CARRY) as u8) << 7);
                    self.set_rotate_flags(result == 0, value & 0x01 != 0);
                    result
                }
                4 => {
                    // sla
                    let result = value << 1;
                    self.set_rotate_flags(result == 0, value & 0x80 != 0);
                    result
                }
                5 => {
                    // sra: the sign bit stays put
                    let result = (value >> 1) | (value & 0x80);
                    self.set_rotate_flags(result == 0, value & 0x01 != 0);
                    result
                }
                6 => {
                    // swap
                    let result = value.rotate_left(4);
                    self.set_rotate_flags(result == 0, false);
                    result
                }
                _ => {
                    // srl
                    let result = value >> 1;
                    self.set_rotate_flags(result == 0, value & 0x01 != 0);
                    result
                }
            },
            1 => {
                // bit y, r: flags only
                self.update_flag(Flags::ZERO, value & (1 << y) == 0);
                self.update_flag(Flags::SUBTRACT, false);
                self.update_flag(Flags::HALF_CARRY, true);
                value
            }
            2 => value & !(1 << y), // res
            _ => value | (1 << y),  // set
        };

        if x != 1 {
            self.write_r8(mmu, z, result);
        }

        // The table charges 4 for the prefix byte; register forms total 8,
        // (HL) forms 16, and the read-only bit test on (HL) 12.
        match (z, x) {
            (6, 1) => 8,
            (6, _) => 12,
            _ => 4,
        }
    }

    fn daa(&mut self) {
        let mut a = self.registers.a as i32;

        if !self.flag(Flags::SUBTRACT) {
            if self.flag(Flags::HALF_CARRY) || a & 0x0f > 0x09 {
                a += 0x06;
            }
            if self.flag(Flags::CARRY) || a > 0x9f {
                a += 0x60;
            }
        } else {
            if self.flag(Flags::HALF_CARRY) {
                a = (a - 0x06) & 0xff;
            }
            if self.flag(Flags::CARRY) {
                a -= 0x60;
            }
        }

        self.update_flag(Flags::HALF_CARRY, false);
        if a & 0x100 == 0x100 {
            self.update_flag(Flags::CARRY, true);
        }

        self.registers.a = (a & 0xff) as u8;
        self.update_flag(Flags::ZERO, self.registers.a == 0);
    }

    /// Shared flag math for ADD SP,r8 and LD HL,SP+r8: carries are taken
    /// from bits 3 and 7 of the unsigned addition.
    fn add_sp_offset(&mut self, mmu: &Mmu, pc: u16) -> u16 {
        let sp = self.registers.sp;
        let offset = mmu.read(pc.wrapping_add(1)) as i8;
        let result = sp.wrapping_add_signed(offset as i16);

        self.update_flag(Flags::ZERO, false);
        self.update_flag(Flags::SUBTRACT, false);
        self.update_flag(Flags::HALF_CARRY, result & 0x000f < sp & 0x000f);
        self.update_flag(Flags::CARRY, result & 0x00ff < sp & 0x00ff);

        result
    }

    pub fn push_stack(&mut self, mmu: &mut Mmu, value: u16) {
        self.registers.sp = self.registers.sp.wrapping_sub(2);
        mmu.write16(self.registers.sp, value);
    }

    pub fn pop_stack(&mut self, mmu: &Mmu) -> u16 {
        let value = mmu.read16(self.registers.sp);
        self.registers.sp = self.registers.sp.wrapping_add(2);
        value
    }

    /// r[index] per the decode tables; index 6 is the byte at (HL).
    fn read_r8(&self, mmu: &Mmu, index: u8) -> u8 {
        match index {
            0 => self.registers.b,
            1 => self.registers.c,
            2 => self.registers.d,
            3 => self.registers.e,
            4 => self.registers.h,
            5 => self.registers.l,
            6 => mmu.read(self.registers.hl()),
            _ => self.registers.a,
        }
    }

    fn write_r8(&mut self, mmu: &mut Mmu, index: u8, value: u8) {
        match index {
            0 => self.registers.b = value,
            1 => self.registers.c = value,
            2 => self.registers.d = value,
            3 => self.registers.e = value,
            4 => self.registers.h = value,
            5 => self.registers.l = value,
            6 => mmu.write(self.registers.hl(), value),
            _ => self.registers.a = value,
        }
    }

    fn read_rp(&self, index: u8) -> u16 {
        match index {
            0 => self.registers.bc(),
            1 => self.registers.de(),
            2 => self.registers.hl(),
            _ => self.registers.sp,
        }
    }

    fn write_rp(&mut self, index: u8, value: u16) {
        match index {
            0 => self.registers.set_bc(value),
            1 => self.registers.set_de(value),
            2 => self.registers.set_hl(value),
            _ => self.registers.sp = value,
        }
    }

    /// Same table with AF in the SP slot, used by push/pop.
    fn read_rp2(&self, index: u8) -> u16 {
        match index {
            0 => self.registers.bc(),
            1 => self.registers.de(),
            2 => self.registers.hl(),
            _ => self.registers.af(),
        }
    }

    fn write_rp2(&mut self, index: u8, value: u16) {
        match index {
            0 => self.registers.set_bc(value),
            1 => self.registers.set_de(value),
            2 => self.registers.set_hl(value),
            _ => self.registers.set_af(value),
        }
    }

    fn condition(&self, index: u8) -> bool {
        match index {
            0 => !self.flag(Flags::ZERO),
            1 => self.flag(Flags::ZERO),
            2 => !self.flag(Flags::CARRY),
            _ => self.flag(Flags::CARRY),
        }
    }

    pub fn flag(&self, flag: Flags) -> bool {
        self.registers.f.contains(flag)
    }

    pub fn update_flag(&mut self, flag: Flags, value: bool) {
        self.registers.f.set(flag, value);
    }

    fn set_rotate_flags(&mut self, zero: bool, carry: bool) {
        self.update_flag(Flags::ZERO, zero);
        self.update_flag(Flags::SUBTRACT, false);
        self.update_flag(Flags::HALF_CARRY, false);
        self.update_flag(Flags::CARRY, carry);
    }
}

impl std::fmt::Display for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "A: ${:02x}  F: ${:02x}  B: ${:02x}  C: ${:02x}  D: ${:02x}  E: ${:02x}  H: ${:02x}  L: ${:02x}  SP: ${:04x}  PC: ${:04x}",
            self.registers.a,
            self.registers.f.bits(),
            self.registers.b,
            self.registers.c,
            self.registers.d,
            self.registers.e,
            self.registers.h,
            self.registers.l,
            self.registers.sp,
            self.registers.pc
        )
    }
}
