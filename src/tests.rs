use crate::cartridge::{Cartridge, MapperKind};
use crate::error::OxyError;
use crate::gameboy::GameBoy;
use crate::joypad::Button;
use crate::lr35902::cpu::Cpu;
use crate::lr35902::registers::{Flags, Registers};
use crate::lr35902::timer::Timer;
use crate::memory::mapper::mbc1::Mbc1;
use crate::memory::mapper::rom::Rom;
use crate::memory::mapper::Mapper;
use crate::memory::mmu::Mmu;
use crate::memory::registers::InterruptFlags;
use crate::memory::Addressable;
use crate::sound::apu::Apu;
use crate::sound::channels::wave::WaveChannel;
use crate::sound::{
    DOWNSAMPLE_INTERVAL, FRAME_SEQUENCER_PERIOD, NR10, NR11, NR12, NR13, NR14, NR33, NR34, NR42,
    NR44, NR52, SAMPLE_BUFFER_SIZE, WAVE_PATTERN_RAM_START,
};
use crate::video::palette::SHADES;
use crate::video::ppu::Ppu;
use crate::video::state::Mode;
use crate::video::{
    BG_PALETTE_REGISTER, CONTROL_REGISTER, OBJ_PALETTE_0_REGISTER, SCANLINE_COMPARE_REGISTER,
    STATUS_REGISTER,
};

fn test_rom(program: &[u8]) -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];
    rom[0x100..0x100 + program.len()].copy_from_slice(program);
    rom
}

fn mmu_with_program(program: &[u8]) -> Mmu {
    Mmu::new(Box::new(Rom::new(test_rom(program))))
}

fn cpu_at_entry() -> Cpu {
    let mut cpu = Cpu::new();
    cpu.registers.pc = 0x0100;
    cpu.registers.sp = 0xfffe;
    cpu
}

fn test_cartridge() -> Cartridge {
    Cartridge::from_bytes(test_rom(&[])).unwrap()
}

// ---------------------------------------------------------------- CPU --

#[test]
fn add_reports_half_carry_out_of_bit_3() {
    let mut mmu = mmu_with_program(&[0x80]); // add a, b
    let mut cpu = cpu_at_entry();
    cpu.registers.a = 0x0f;
    cpu.registers.b = 0x01;

    let cycles = cpu.step(&mut mmu).unwrap();

    assert_eq!(cycles, 4);
    assert_eq!(cpu.registers.a, 0x10);
    assert!(cpu.flag(Flags::HALF_CARRY));
    assert!(!cpu.flag(Flags::CARRY));
    assert!(!cpu.flag(Flags::ZERO));
    assert!(!cpu.flag(Flags::SUBTRACT));
}

#[test]
fn add_wraps_with_carry_and_zero() {
    let mut mmu = mmu_with_program(&[0x80]);
    let mut cpu = cpu_at_entry();
    cpu.registers.a = 0xff;
    cpu.registers.b = 0x01;

    cpu.step(&mut mmu).unwrap();

    assert_eq!(cpu.registers.a, 0x00);
    assert!(cpu.flag(Flags::ZERO));
    assert!(cpu.flag(Flags::CARRY));
    assert!(cpu.flag(Flags::HALF_CARRY));
}

#[test]
fn adc_includes_the_carry_bit_in_both_carries() {
    let mut mmu = mmu_with_program(&[0x88]); // adc a, b
    let mut cpu = cpu_at_entry();
    cpu.registers.a = 0x0f;
    cpu.registers.b = 0x00;
    cpu.update_flag(Flags::CARRY, true);

    cpu.step(&mut mmu).unwrap();

    assert_eq!(cpu.registers.a, 0x10);
    assert!(cpu.flag(Flags::HALF_CARRY));
    assert!(!cpu.flag(Flags::CARRY));
}

#[test]
fn sub_borrow_sets_carry_and_subtract() {
    let mut mmu = mmu_with_program(&[0x90]); // sub b
    let mut cpu = cpu_at_entry();
    cpu.registers.a = 0x10;
    cpu.registers.b = 0x20;

    cpu.step(&mut mmu).unwrap();

    assert_eq!(cpu.registers.a, 0xf0);
    assert!(cpu.flag(Flags::CARRY));
    assert!(cpu.flag(Flags::SUBTRACT));
}

#[test]
fn cp_sets_flags_without_writing_a() {
    let mut mmu = mmu_with_program(&[0xb8]); // cp b
    let mut cpu = cpu_at_entry();
    cpu.registers.a = 0x42;
    cpu.registers.b = 0x42;

    cpu.step(&mut mmu).unwrap();

    assert_eq!(cpu.registers.a, 0x42);
    assert!(cpu.flag(Flags::ZERO));
    assert!(cpu.flag(Flags::SUBTRACT));
}

#[test]
fn and_sets_half_carry_xor_clears_everything() {
    let mut mmu = mmu_with_program(&[0xa0, 0xa8]); // and b; xor b
    let mut cpu = cpu_at_entry();
    cpu.registers.a = 0x0f;
    cpu.registers.b = 0xf0;

    cpu.step(&mut mmu).unwrap();
    assert_eq!(cpu.registers.a, 0x00);
    assert!(cpu.flag(Flags::ZERO));
    assert!(cpu.flag(Flags::HALF_CARRY));
    assert!(!cpu.flag(Flags::CARRY));

    cpu.step(&mut mmu).unwrap(); // 0x00 ^ 0xf0
    assert_eq!(cpu.registers.a, 0xf0);
    assert!(!cpu.flag(Flags::ZERO));
    assert!(!cpu.flag(Flags::HALF_CARRY));
}

#[test]
fn alu_takes_the_byte_at_hl() {
    let mut mmu = mmu_with_program(&[0x86]); // add a, (hl)
    let mut cpu = cpu_at_entry();
    cpu.registers.a = 0x01;
    cpu.registers.set_hl(0xc000);
    mmu.write(0xc000, 0x41);

    let cycles = cpu.step(&mut mmu).unwrap();

    assert_eq!(cycles, 8);
    assert_eq!(cpu.registers.a, 0x42);
}

#[test]
fn daa_adjusts_bcd_addition() {
    let mut mmu = mmu_with_program(&[0xc6, 0x09, 0x27]); // add a, 0x09; daa
    let mut cpu = cpu_at_entry();
    cpu.registers.a = 0x09;

    cpu.step(&mut mmu).unwrap();
    cpu.step(&mut mmu).unwrap();

    assert_eq!(cpu.registers.a, 0x18);
    assert!(!cpu.flag(Flags::CARRY));
}

#[test]
fn daa_carries_past_99() {
    let mut mmu = mmu_with_program(&[0xc6, 0x01, 0x27]); // add a, 0x01; daa
    let mut cpu = cpu_at_entry();
    cpu.registers.a = 0x99;

    cpu.step(&mut mmu).unwrap();
    cpu.step(&mut mmu).unwrap();

    assert_eq!(cpu.registers.a, 0x00);
    assert!(cpu.flag(Flags::CARRY));
}

#[test]
fn register_pairs_compose_their_halves() {
    let mut registers = Registers::default();

    registers.set_hl(0x1234);
    assert_eq!(registers.h, 0x12);
    assert_eq!(registers.l, 0x34);
    assert_eq!(registers.hl(), 0x1234);

    registers.set_bc(0xbeef);
    assert_eq!(registers.bc(), 0xbeef);
}

#[test]
fn flags_low_nibble_always_reads_zero() {
    let mut registers = Registers::default();

    registers.set_af(0x01ff);

    assert_eq!(registers.af(), 0x01f0);
    assert_eq!(registers.af() & 0x0f, 0);
}

#[test]
fn add_hl_reports_carry_out_of_bit_11() {
    let mut mmu = mmu_with_program(&[0x09]); // add hl, bc
    let mut cpu = cpu_at_entry();
    cpu.registers.set_hl(0x0fff);
    cpu.registers.set_bc(0x0001);

    cpu.step(&mut mmu).unwrap();

    assert_eq!(cpu.registers.hl(), 0x1000);
    assert!(cpu.flag(Flags::HALF_CARRY));
    assert!(!cpu.flag(Flags::CARRY));
}

#[test]
fn ld_hl_sp_offset_flags_come_from_low_byte() {
    let mut mmu = mmu_with_program(&[0xf8, 0x01]); // ld hl, sp+1
    let mut cpu = cpu_at_entry();
    cpu.registers.sp = 0x00ff;

    cpu.step(&mut mmu).unwrap();

    assert_eq!(cpu.registers.hl(), 0x0100);
    assert!(cpu.flag(Flags::HALF_CARRY));
    assert!(cpu.flag(Flags::CARRY));
    assert!(!cpu.flag(Flags::ZERO));
}

#[test]
fn taken_branches_cost_extra_cycles() {
    let mut mmu = mmu_with_program(&[0x20, 0x02]); // jr nz, +2
    let mut cpu = cpu_at_entry();

    let cycles = cpu.step(&mut mmu).unwrap();
    assert_eq!(cycles, 12);
    assert_eq!(cpu.registers.pc, 0x0104);

    let mut cpu = cpu_at_entry();
    cpu.update_flag(Flags::ZERO, true);
    let cycles = cpu.step(&mut mmu).unwrap();
    assert_eq!(cycles, 8);
    assert_eq!(cpu.registers.pc, 0x0102);
}

#[test]
fn call_pushes_the_return_address() {
    let mut rom = test_rom(&[0xcd, 0x50, 0x01]); // call 0x0150
    rom[0x150] = 0xc9; // ret
    let mut mmu = Mmu::new(Box::new(Rom::new(rom)));
    let mut cpu = cpu_at_entry();

    let cycles = cpu.step(&mut mmu).unwrap();
    assert_eq!(cycles, 24);
    assert_eq!(cpu.registers.pc, 0x0150);
    assert_eq!(cpu.registers.sp, 0xfffc);
    assert_eq!(mmu.read16(0xfffc), 0x0103);

    let cycles = cpu.step(&mut mmu).unwrap();
    assert_eq!(cycles, 16);
    assert_eq!(cpu.registers.pc, 0x0103);
    assert_eq!(cpu.registers.sp, 0xfffe);
}

#[test]
fn push_pop_round_trips_through_the_stack() {
    let mut mmu = mmu_with_program(&[0xc5, 0xd1]); // push bc; pop de
    let mut cpu = cpu_at_entry();
    cpu.registers.set_bc(0x1234);

    cpu.step(&mut mmu).unwrap();
    cpu.step(&mut mmu).unwrap();

    assert_eq!(cpu.registers.de(), 0x1234);
    assert_eq!(cpu.registers.sp, 0xfffe);
}

#[test]
fn cb_rotate_moves_bit_7_into_carry() {
    let mut mmu = mmu_with_program(&[0xcb, 0x00]); // rlc b
    let mut cpu = cpu_at_entry();
    cpu.registers.b = 0x80;

    let cycles = cpu.step(&mut mmu).unwrap();

    assert_eq!(cycles, 8);
    assert_eq!(cpu.registers.pc, 0x0102);
    assert_eq!(cpu.registers.b, 0x01);
    assert!(cpu.flag(Flags::CARRY));
    assert!(!cpu.flag(Flags::ZERO));
}

#[test]
fn cb_bit_test_on_hl_reads_memory() {
    let mut mmu = mmu_with_program(&[0xcb, 0x46]); // bit 0, (hl)
    let mut cpu = cpu_at_entry();
    cpu.registers.set_hl(0xc000);
    mmu.write(0xc000, 0x01);

    let cycles = cpu.step(&mut mmu).unwrap();

    assert_eq!(cycles, 12);
    assert!(!cpu.flag(Flags::ZERO));
    assert!(cpu.flag(Flags::HALF_CARRY));
}

#[test]
fn interrupt_priority_dispatches_vblank_first() {
    let mut mmu = mmu_with_program(&[0xfb, 0x00, 0x00]); // ei; nop; nop
    let mut cpu = cpu_at_entry();
    mmu.write(0xffff, 0b0000_0101); // enable vblank + timer
    mmu.request_interrupts(InterruptFlags::VBLANK | InterruptFlags::TIMER);

    cpu.step(&mut mmu).unwrap(); // ei takes effect after the next instruction
    assert_eq!(cpu.registers.pc, 0x0101);

    let cycles = cpu.step(&mut mmu).unwrap();
    assert_eq!(cycles, 4 + 12);
    assert_eq!(cpu.registers.pc, 0x0040);
    assert_eq!(mmu.read16(cpu.registers.sp), 0x0102);
    assert!(!mmu.interrupt_flags().contains(InterruptFlags::VBLANK));
    assert!(mmu.interrupt_flags().contains(InterruptFlags::TIMER));
}

#[test]
fn halt_wakes_on_pending_interrupt_without_dispatching() {
    let mut mmu = mmu_with_program(&[0x76, 0x00]); // halt; nop
    let mut cpu = cpu_at_entry();

    cpu.step(&mut mmu).unwrap();
    assert!(cpu.halted());
    assert_eq!(cpu.registers.pc, 0x0101);

    // Nothing pending: the CPU burns cycles in place.
    let cycles = cpu.step(&mut mmu).unwrap();
    assert_eq!(cycles, 4);
    assert_eq!(cpu.registers.pc, 0x0101);

    // A pending-but-IME-masked interrupt wakes it, but no dispatch runs.
    mmu.write(0xffff, 0b100);
    mmu.request_interrupts(InterruptFlags::TIMER);
    cpu.step(&mut mmu).unwrap();

    assert!(!cpu.halted());
    assert_eq!(cpu.registers.pc, 0x0102);
    assert!(mmu.interrupt_flags().contains(InterruptFlags::TIMER));
}

#[test]
fn illegal_opcode_fails_decode_in_debug_builds() {
    let mut mmu = mmu_with_program(&[0xd3]);
    let mut cpu = cpu_at_entry();

    let result = cpu.step(&mut mmu);

    if cfg!(debug_assertions) {
        assert!(matches!(
            result,
            Err(OxyError::IllegalOpcode {
                opcode: 0xd3,
                address: 0x0100
            })
        ));
    } else {
        assert!(result.is_ok());
    }
}

// ---------------------------------------------------------------- Bus --

#[test]
fn bus_dispatch_is_total_over_the_address_space() {
    let mmu = mmu_with_program(&[]);

    for addr in 0u16..=0xffff {
        let _ = mmu.read(addr);
    }
}

#[test]
fn word_access_is_little_endian() {
    let mut mmu = mmu_with_program(&[]);

    mmu.write16(0xc000, 0x1234);

    assert_eq!(mmu.read(0xc000), 0x34);
    assert_eq!(mmu.read(0xc001), 0x12);
    assert_eq!(mmu.read16(0xc000), 0x1234);
}

#[test]
fn echo_ram_mirrors_work_ram() {
    let mut mmu = mmu_with_program(&[]);

    mmu.write(0xc123, 0xab);

    assert_eq!(mmu.read(0xe123), 0xab);
}

#[test]
fn boot_rom_overlay_unmaps_permanently() {
    let mut rom = test_rom(&[]);
    rom[0x0000] = 0x42;
    let mut mmu = Mmu::with_boot_rom(vec![0xaa; 0x100], Box::new(Rom::new(rom)));

    assert_eq!(mmu.read(0x0000), 0xaa);

    mmu.write(0xff50, 0x01);
    assert!(!mmu.is_boot_rom_mapped());
    assert_eq!(mmu.read(0x0000), 0x42);

    // The latch is one-way: nothing maps it back.
    mmu.write(0xff50, 0x00);
    assert!(!mmu.is_boot_rom_mapped());
}

#[test]
fn cpu_unmaps_boot_rom_at_the_entry_point() {
    let mut mmu = Mmu::with_boot_rom(vec![0; 0x100], Box::new(Rom::new(test_rom(&[]))));
    let mut cpu = cpu_at_entry();

    cpu.step(&mut mmu).unwrap();

    assert!(!mmu.is_boot_rom_mapped());
}

#[test]
fn oam_dma_copies_the_whole_table_through_the_bus() {
    let mut mmu = mmu_with_program(&[]);
    for offset in 0u16..0xa0 {
        mmu.write(0xc000 + offset, offset as u8);
    }

    mmu.write(0xff46, 0xc0);

    for offset in 0u16..0xa0 {
        assert_eq!(mmu.read(0xfe00 + offset), offset as u8);
    }
    // The sprite mirror saw every byte: entry 1 starts at OAM offset 4.
    assert_eq!(mmu.ppu.sprites()[1].y, 4u8.wrapping_sub(16));
    assert_eq!(mmu.ppu.sprites()[1].x, 5u8.wrapping_sub(8));
    assert_eq!(mmu.ppu.sprites()[1].tile, 6);
}

#[test]
fn serial_data_register_round_trips() {
    let mut mmu = mmu_with_program(&[]);

    mmu.write(0xff01, 0x41);

    assert_eq!(mmu.read(0xff01), 0x41);
}

#[test]
fn readable_hardware_registers_round_trip_through_the_bus() {
    let mut mmu = mmu_with_program(&[]);

    // LCD block
    mmu.write(0xff42, 0x55);
    mmu.write(0xff43, 0xaa);
    mmu.write(0xff45, 0x90);
    mmu.write(0xff47, 0xe4);
    mmu.write(0xff48, 0x1b);
    assert_eq!(mmu.read(0xff42), 0x55);
    assert_eq!(mmu.read(0xff43), 0xaa);
    assert_eq!(mmu.read(0xff45), 0x90);
    assert_eq!(mmu.read(0xff47), 0xe4);
    assert_eq!(mmu.read(0xff48), 0x1b);

    // Sound control block
    mmu.write(0xff24, 0x77);
    mmu.write(0xff25, 0xf3);
    assert_eq!(mmu.read(0xff24), 0x77);
    assert_eq!(mmu.read(0xff25), 0xf3);

    // Timer block
    mmu.write(0xff05, 0x12);
    mmu.write(0xff06, 0x34);
    mmu.write(0xff07, 0x05);
    assert_eq!(mmu.read(0xff05), 0x12);
    assert_eq!(mmu.read(0xff06), 0x34);
    assert_eq!(mmu.read(0xff07), 0x05);
}

#[test]
fn interrupt_enable_masks_to_defined_bits() {
    let mut mmu = mmu_with_program(&[]);

    mmu.write(0xffff, 0xff);

    assert_eq!(mmu.read(0xffff), 0x1f);
}

#[test]
fn joypad_lines_read_active_low() {
    let mut mmu = mmu_with_program(&[]);
    mmu.joypad.set_button(Button::A, true);
    mmu.joypad.set_button(Button::Start, true);

    mmu.write(0xff00, 0x10); // bit 5 clear: buttons selected
    assert_eq!(mmu.read(0xff00) & 0x01, 0);
    assert_eq!(mmu.read(0xff00) & 0x08, 0);

    mmu.joypad.set_button(Button::A, false);
    assert_eq!(mmu.read(0xff00) & 0x01, 1);
}

#[test]
fn joypad_direction_lines_use_the_other_select() {
    let mut mmu = mmu_with_program(&[]);
    mmu.joypad.set_button(Button::Down, true);
    mmu.joypad.set_button(Button::Up, true);
    mmu.joypad.set_button(Button::Left, true);
    mmu.joypad.set_button(Button::Right, true);
    mmu.joypad.set_button(Button::Select, true);
    mmu.joypad.set_button(Button::B, true);

    mmu.write(0xff00, 0x20); // bit 4 clear: directions selected
    assert_eq!(mmu.read(0xff00) & 0x0f, 0x00);

    mmu.write(0xff00, 0x10); // buttons: select + b pressed
    assert_eq!(mmu.read(0xff00) & 0x0f, 0b1001);
}

// ------------------------------------------------------------ Mappers --

#[test]
fn mbc1_switches_the_upper_rom_window() {
    let mut rom = vec![0u8; 4 * 0x4000];
    for bank in 0..4 {
        rom[bank * 0x4000] = bank as u8;
    }
    let mut mbc = Mbc1::new(rom, 4);

    assert_eq!(mbc.read(0x4000), 1);

    mbc.write(0x2000, 2);
    assert_eq!(mbc.read(0x4000), 2);
    assert_eq!(mbc.current_rom_bank(), 2);

    // Bank 0 is never selectable; it maps to 1.
    mbc.write(0x2000, 0);
    assert_eq!(mbc.read(0x4000), 1);
}

#[test]
fn mbc1_masks_the_bank_to_the_declared_count() {
    let mut rom = vec![0u8; 4 * 0x4000];
    for bank in 0..4 {
        rom[bank * 0x4000] = bank as u8;
    }
    let mut mbc = Mbc1::new(rom, 4);

    mbc.write(0x2000, 0x1f);

    assert_eq!(mbc.read(0x4000), 0x1f & 3);
}

#[test]
fn mbc1_high_bits_extend_the_bank_index() {
    let mut rom = vec![0u8; 128 * 0x4000];
    for bank in 0..128 {
        rom[bank * 0x4000] = bank as u8;
    }
    let mut mbc = Mbc1::new(rom, 128);

    mbc.write(0x2000, 0x01);
    mbc.write(0x4000, 0x01); // bits 5-6

    assert_eq!(mbc.current_rom_bank(), 0x21);
    assert_eq!(mbc.read(0x4000), 0x21);
}

#[test]
fn mbc1_ram_gate_controls_external_ram() {
    let mut mbc = Mbc1::new(vec![0u8; 4 * 0x4000], 4);

    mbc.write(0xa000, 0x55);
    assert_eq!(mbc.read(0xa000), 0xff);

    mbc.write(0x0000, 0x0a);
    mbc.write(0xa000, 0x55);
    assert_eq!(mbc.read(0xa000), 0x55);
}

#[test]
fn bank_control_writes_reach_the_mapper_through_the_bus() {
    let mut rom = vec![0u8; 4 * 0x4000];
    for bank in 0..4 {
        rom[bank * 0x4000] = bank as u8;
    }
    let mut mmu = Mmu::new(Box::new(Mbc1::new(rom, 4)));

    mmu.write(0x2000, 3);

    assert_eq!(mmu.current_rom_bank(), 3);
    assert_eq!(mmu.read(0x4000), 3);
}

#[test]
fn cartridge_parses_the_header() {
    let mut rom = vec![0u8; 0x8000];
    rom[0x134..0x138].copy_from_slice(b"OXYT");
    rom[0x147] = 0x01;
    rom[0x148] = 0x02;
    rom[0x149] = 0x03;

    let cartridge = Cartridge::from_bytes(rom).unwrap();

    assert_eq!(cartridge.title, "OXYT");
    assert_eq!(cartridge.mapper, MapperKind::Mbc1);
    assert_eq!(cartridge.rom_banks, 8); // 2 << 2
    assert_eq!(cartridge.ram_banks, 3);
}

#[test]
fn cartridge_rejects_unknown_mapper_bytes() {
    let mut rom = vec![0u8; 0x8000];
    rom[0x147] = 0x42;

    let result = Cartridge::from_bytes(rom);

    assert!(matches!(result, Err(OxyError::UnknownMapper { byte: 0x42 })));
}

// -------------------------------------------------------------- Timer --

#[test]
fn timer_overflow_reloads_tma_and_raises_the_interrupt() {
    let mut mmu = mmu_with_program(&[]);
    let mut timer = Timer::new();
    mmu.write(0xff07, 0b101); // enabled, 16-cycle period
    mmu.write(0xff05, 0xff);
    mmu.write(0xff06, 0x42);

    timer.tick(&mut mmu, 16);

    assert_eq!(mmu.read(0xff05), 0x42);
    assert!(mmu.interrupt_flags().contains(InterruptFlags::TIMER));
}

#[test]
fn divider_counts_up_and_any_write_resets_it() {
    let mut mmu = mmu_with_program(&[]);
    let mut timer = Timer::new();

    timer.tick(&mut mmu, 256);
    assert_eq!(mmu.read(0xff04), 1);

    // The remainder carries: 255 + 1 more cycle crosses the next edge.
    timer.tick(&mut mmu, 255);
    assert_eq!(mmu.read(0xff04), 1);
    timer.tick(&mut mmu, 1);
    assert_eq!(mmu.read(0xff04), 2);

    mmu.write(0xff04, 0xab);
    assert_eq!(mmu.read(0xff04), 0);
}

// -------------------------------------------------------------- Video --

#[test]
fn frame_is_144_rendered_lines_and_70224_cycles() {
    let mut ppu = Ppu::new();
    ppu.write_register(CONTROL_REGISTER, 0x91);

    // Run to the first VBlank entry.
    let mut guard = 0;
    while !ppu.frame_ready() {
        ppu.tick(4);
        guard += 4;
        assert!(guard <= 70224, "first frame never became ready");
    }
    assert_eq!(ppu.current_line(), 144);

    // A full wrap back to the next VBlank entry is exactly one frame.
    let mut cycles = 0;
    let mut hblanks = 0;
    let mut saw_line_zero = false;
    let mut prev_mode = ppu.mode();
    loop {
        ppu.tick(4);
        cycles += 4;

        let mode = ppu.mode();
        if mode == Mode::HBlank && prev_mode == Mode::PixelTransfer {
            hblanks += 1;
        }
        prev_mode = mode;
        saw_line_zero |= ppu.current_line() == 0;

        if ppu.frame_ready() {
            break;
        }
    }

    assert_eq!(cycles, 70224);
    assert_eq!(hblanks, 144);
    assert!(saw_line_zero);
    assert_eq!(ppu.current_line(), 144);
}

#[test]
fn vblank_interrupt_fires_once_per_frame() {
    let mut ppu = Ppu::new();
    ppu.write_register(CONTROL_REGISTER, 0x91);

    let mut vblanks = 0;
    for _ in 0..(70224 / 4) {
        if ppu.tick(4).contains(InterruptFlags::VBLANK) {
            vblanks += 1;
        }
    }

    assert_eq!(vblanks, 1);
}

#[test]
fn stat_gates_select_their_mode_interrupts() {
    let mut ppu = Ppu::new();
    ppu.write_register(STATUS_REGISTER, 0x08); // hblank gate only

    let mut raised = InterruptFlags::empty();
    for _ in 0..((80 + 172) / 4) {
        raised |= ppu.tick(4);
    }

    assert!(raised.contains(InterruptFlags::LCD_STAT));
}

#[test]
fn lyc_coincidence_raises_stat_when_gated() {
    let mut ppu = Ppu::new();
    ppu.write_register(STATUS_REGISTER, 0x40);
    ppu.write_register(SCANLINE_COMPARE_REGISTER, 2);

    let mut raised = InterruptFlags::empty();
    while ppu.current_line() < 2 {
        raised |= ppu.tick(4);
    }

    assert!(raised.contains(InterruptFlags::LCD_STAT));
    assert_eq!(ppu.read_register(STATUS_REGISTER) & 0x04, 0x04);
}

#[test]
fn status_writes_only_touch_the_gate_bits() {
    let mut ppu = Ppu::new();

    ppu.write_register(STATUS_REGISTER, 0xff);
    assert_eq!(ppu.read_register(STATUS_REGISTER) & 0x78, 0x78);

    ppu.write_register(STATUS_REGISTER, 0x00);
    assert_eq!(ppu.read_register(STATUS_REGISTER) & 0x78, 0x00);

    // Bit 7 reads high, the mode bits come from the state machine.
    assert_eq!(ppu.read_register(STATUS_REGISTER) & 0x80, 0x80);
}

#[test]
fn background_renders_through_the_tile_cache() {
    let mut ppu = Ppu::new();
    ppu.write_register(CONTROL_REGISTER, 0x91); // lcd + bg, unsigned tile data
    ppu.write_register(BG_PALETTE_REGISTER, 0b1110_0100);

    // Tile 0, row 0: color index 3 across all eight pixels. The map is
    // zeroed, so tile 0 covers the screen.
    ppu.write_vram(0x0000, 0xff);
    ppu.write_vram(0x0001, 0xff);

    // One scanline up to the pixel-transfer -> hblank render point.
    for _ in 0..((80 + 172) / 4) {
        ppu.tick(4);
    }

    assert_eq!(ppu.framebuffer()[0], SHADES[3]);
    assert_eq!(ppu.framebuffer()[159], SHADES[3]);
}

#[test]
fn signed_tile_block_applies_the_256_bias() {
    let mut ppu = Ppu::new();
    ppu.write_register(CONTROL_REGISTER, 0x81); // signed tile-data select
    ppu.write_register(BG_PALETTE_REGISTER, 0b1110_0100);

    // Map entry 0 with the signed block selects cache tile 256, whose
    // data lives at VRAM 0x1000.
    ppu.write_vram(0x1000, 0xff);
    ppu.write_vram(0x1001, 0x00);

    for _ in 0..((80 + 172) / 4) {
        ppu.tick(4);
    }

    assert_eq!(ppu.framebuffer()[0], SHADES[1]);
}

#[test]
fn vram_writes_invalidate_one_cached_tile_row() {
    let mut ppu = Ppu::new();
    ppu.write_register(CONTROL_REGISTER, 0x91);
    ppu.write_register(BG_PALETTE_REGISTER, 0b1110_0100);

    // Render a frame with blank tiles, then touch one row and re-render.
    for _ in 0..(70224 / 4) {
        ppu.tick(4);
    }
    assert_eq!(ppu.framebuffer()[0], SHADES[0]);

    ppu.write_vram(0x0000, 0xff);
    ppu.write_vram(0x0001, 0xff);

    for _ in 0..(70224 / 4) {
        ppu.tick(4);
    }
    assert_eq!(ppu.framebuffer()[0], SHADES[3]);
}

#[test]
fn sprites_composite_with_the_observed_row_offset() {
    let mut ppu = Ppu::new();
    ppu.write_register(CONTROL_REGISTER, 0x93); // lcd + bg + sprites
    ppu.write_register(BG_PALETTE_REGISTER, 0x00);
    ppu.write_register(OBJ_PALETTE_0_REGISTER, 0b1110_0100);

    // Sprite 0 at screen origin, tile 1. Tile 1 row 0 is color index 2.
    ppu.write_oam(0, 16);
    ppu.write_oam(1, 8);
    ppu.write_oam(2, 1);
    ppu.write_oam(3, 0x00);
    ppu.write_vram(16, 0x00);
    ppu.write_vram(17, 0xff);

    // Complete line 0, then render line 1: the observed renderer hits the
    // sprite on line 1 and writes its pixels onto canvas row 0.
    for _ in 0..((456 + 80 + 172) / 4) {
        ppu.tick(4);
    }

    assert_eq!(ppu.framebuffer()[0], SHADES[2]);
    assert_eq!(ppu.framebuffer()[7], SHADES[2]);
    assert_eq!(ppu.framebuffer()[8], SHADES[0]);
}

#[test]
fn behind_background_sprites_only_cover_the_lightest_shade() {
    let mut ppu = Ppu::new();
    ppu.write_register(CONTROL_REGISTER, 0x93);
    ppu.write_register(BG_PALETTE_REGISTER, 0b1110_0100);
    ppu.write_register(OBJ_PALETTE_0_REGISTER, 0b1110_0100);

    // Background tile 0 row 1 dark, row 2 light; sprite behind it.
    ppu.write_vram(2, 0xff);
    ppu.write_vram(3, 0xff);
    ppu.write_oam(0, 16);
    ppu.write_oam(1, 8);
    ppu.write_oam(2, 1);
    ppu.write_oam(3, 0x80); // priority: behind background
    ppu.write_vram(16, 0x00);
    ppu.write_vram(17, 0xff);
    ppu.write_vram(18, 0x00);
    ppu.write_vram(19, 0xff);

    // Render lines 0-2. The sprite covers canvas rows 0 (bg dark) and 1.
    for _ in 0..((456 * 2 + 80 + 172) / 4) {
        ppu.tick(4);
    }

    // Canvas row 1: background row 1 is dark, so the sprite loses.
    assert_eq!(ppu.framebuffer()[160], SHADES[3]);
}

// -------------------------------------------------------------- Audio --

#[test]
fn wave_period_never_divides_by_zero() {
    let mut wave = WaveChannel::new();

    assert_eq!(wave.period(), 4096); // frequency 0: longest period

    wave.write(NR33, 0xff);
    wave.write(NR34, 0x07);
    assert_eq!(wave.frequency(), 2047);
    assert_eq!(wave.period(), 2); // max frequency: shortest period
}

#[test]
fn wave_pattern_ram_round_trips() {
    let mut apu = Apu::new();

    apu.write(WAVE_PATTERN_RAM_START, 0xab);
    apu.write(WAVE_PATTERN_RAM_START + 15, 0xcd);

    assert_eq!(apu.read(WAVE_PATTERN_RAM_START), 0xab);
    assert_eq!(apu.read(WAVE_PATTERN_RAM_START + 15), 0xcd);

    apu.write(NR33, 0xff);
    apu.write(NR34, 0x07);
    assert_eq!(apu.wave().frequency(), 2047);
}

#[test]
fn sample_queue_signals_each_wrap_exactly_once() {
    let mut apu = Apu::new();

    for _ in 0..(SAMPLE_BUFFER_SIZE * DOWNSAMPLE_INTERVAL) {
        apu.cycle();
    }
    assert!(apu.buffer_full());
    assert_eq!(apu.write_index(), 0);

    // The signal holds until the next fill starts.
    for _ in 0..DOWNSAMPLE_INTERVAL {
        apu.cycle();
    }
    assert!(!apu.buffer_full());
    assert_eq!(apu.write_index(), 1);

    // And fires again exactly at the next wrap.
    for _ in 0..((SAMPLE_BUFFER_SIZE - 1) * DOWNSAMPLE_INTERVAL) {
        apu.cycle();
    }
    assert!(apu.buffer_full());
}

#[test]
fn nr52_reports_power_and_channel_status() {
    let mut apu = Apu::new();

    assert_eq!(apu.read(NR52), 0x70);

    apu.write(NR52, 0x80);
    apu.write(NR12, 0xf0); // DAC on
    apu.write(NR14, 0x80); // trigger

    assert_eq!(apu.read(NR52) & 0x81, 0x81);
}

#[test]
fn length_counter_silences_the_channel() {
    let mut apu = Apu::new();
    apu.write(NR52, 0x80);
    apu.write(NR12, 0xf0);
    apu.write(NR11, 0x3f); // length data 63: counter = 1
    apu.write(NR14, 0xc0); // trigger with length enabled

    assert_eq!(apu.read(NR52) & 0x01, 0x01);

    // The first sequencer step (an even one) clocks lengths.
    for _ in 0..FRAME_SEQUENCER_PERIOD {
        apu.cycle();
    }

    assert_eq!(apu.read(NR52) & 0x01, 0x00);
}

#[test]
fn envelope_steps_on_sequencer_step_7() {
    let mut apu = Apu::new();
    apu.write(NR52, 0x80);
    apu.write(NR12, 0x51); // volume 5, decrementing, period 1
    apu.write(NR14, 0x80);

    assert_eq!(apu.channel1().volume(), 5);

    // One full sequencer rotation passes step 7 exactly once.
    for _ in 0..(FRAME_SEQUENCER_PERIOD * 8) {
        apu.cycle();
    }

    assert_eq!(apu.channel1().volume(), 4);
}

#[test]
fn sweep_adjusts_the_frequency_on_steps_2_and_6() {
    let mut apu = Apu::new();
    apu.write(NR52, 0x80);
    apu.write(NR10, 0x11); // period 1, increasing, shift 1
    apu.write(NR12, 0xf0);
    apu.write(NR13, 0x00);
    apu.write(NR14, 0x82); // trigger, frequency = 0x200

    assert_eq!(apu.channel1().frequency(), 0x200);

    // Steps 0, 1, 2 elapse; the sweep fires on step 2.
    for _ in 0..(FRAME_SEQUENCER_PERIOD * 3) {
        apu.cycle();
    }

    assert_eq!(apu.channel1().frequency(), 0x200 + 0x100);
}

#[test]
fn noise_trigger_refills_the_shift_register() {
    let mut apu = Apu::new();
    apu.write(NR42, 0xf0);
    apu.write(NR44, 0x80);

    assert_eq!(apu.noise().lfsr(), 0x7fff);

    // Period is 8 cycles with a zeroed polynomial register; the first
    // elapse shifts a zero feedback bit into bit 14.
    for _ in 0..9 {
        apu.cycle();
    }

    assert_eq!(apu.noise().lfsr(), 0x3fff);
}

#[test]
fn square_registers_read_back_with_defined_bits_high() {
    let mut apu = Apu::new();

    apu.write(NR11, 0b1000_0001); // duty 2, length data 1
    assert_eq!(apu.read(NR11), 0b1011_1111);

    apu.write(NR10, 0x7f);
    assert_eq!(apu.read(NR10), 0xff);

    // Frequency bits are write-only.
    apu.write(NR13, 0x12);
    assert_eq!(apu.read(NR13), 0xff);
}

// -------------------------------------------------------- Orchestrator --

#[test]
fn post_boot_machine_starts_at_the_entry_point() {
    let gameboy = GameBoy::new(test_cartridge()).unwrap();

    assert_eq!(gameboy.cpu.registers.pc, 0x0100);
    assert_eq!(gameboy.cpu.registers.af(), 0x01b0);
    assert_eq!(gameboy.cpu.registers.sp, 0xfffe);
}

#[test]
fn tick_advances_every_unit_by_the_instruction_cost() {
    let mut gameboy = GameBoy::new(test_cartridge()).unwrap();

    // A zero-filled ROM is a stream of NOPs.
    for _ in 0..100 {
        gameboy.tick();
    }

    assert_eq!(gameboy.elapsed_cycles(), 400);
    assert_eq!(gameboy.mmu.ppu.mode(), Mode::HBlank);
    assert_eq!(gameboy.mmu.apu.write_index(), 400 / DOWNSAMPLE_INTERVAL);
}

#[test]
fn frame_ready_is_observable_between_ticks() {
    let mut gameboy = GameBoy::new(test_cartridge()).unwrap();

    let mut frames = 0;
    let mut safety = 0;
    while frames < 2 {
        gameboy.tick();
        if gameboy.frame_ready() {
            frames += 1;
        }
        safety += 1;
        assert!(safety < 100_000, "frames never became ready");
    }

    assert_eq!(gameboy.framebuffer().len(), 160 * 144);
}

#[test]
fn cloned_machines_stay_in_lockstep() {
    let mut gameboy = GameBoy::new(test_cartridge()).unwrap();
    for _ in 0..1000 {
        gameboy.tick();
    }

    let mut snapshot = gameboy.clone();
    for _ in 0..1000 {
        gameboy.tick();
        snapshot.tick();
    }

    assert_eq!(gameboy.cpu.registers.pc, snapshot.cpu.registers.pc);
    assert_eq!(gameboy.elapsed_cycles(), snapshot.elapsed_cycles());
    assert_eq!(
        gameboy.mmu.ppu.current_line(),
        snapshot.mmu.ppu.current_line()
    );
}

#[test]
fn audio_buffer_full_is_observable_between_ticks() {
    let mut gameboy = GameBoy::new(test_cartridge()).unwrap();
    gameboy.set_button(Button::Start, true);

    // Filling the ring takes 1024 * 87 cycles of NOPs.
    let mut safety = 0;
    while !gameboy.audio_buffer_full() {
        gameboy.tick();
        safety += 1;
        assert!(safety < 100_000, "sample queue never wrapped");
    }

    assert_eq!(gameboy.audio_samples().len(), SAMPLE_BUFFER_SIZE);
}
