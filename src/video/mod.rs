pub mod palette;
pub mod ppu;
pub mod sprite;
pub mod state;
pub mod tile;

pub const SCREEN_WIDTH: usize = 160;
pub const SCREEN_HEIGHT: usize = 144;

pub const VRAM_SIZE: usize = 0x2000;
pub const OAM_SIZE: usize = 0xa0;
pub const SPRITE_COUNT: usize = 40;

// Mode durations in master-clock cycles. One scanline is 456 cycles and a
// full frame, VBlank included, is 70224.
pub const OAM_SCAN_CYCLES: usize = 80;
pub const PIXEL_TRANSFER_CYCLES: usize = 172;
pub const HBLANK_CYCLES: usize = 204;
pub const LINE_CYCLES: usize = OAM_SCAN_CYCLES + PIXEL_TRANSFER_CYCLES + HBLANK_CYCLES;

pub const VBLANK_LINES: usize = 10;

pub const CONTROL_REGISTER: u16 = 0xff40;
pub const STATUS_REGISTER: u16 = 0xff41;
pub const SCROLL_Y_REGISTER: u16 = 0xff42;
pub const SCROLL_X_REGISTER: u16 = 0xff43;
pub const SCANLINE_REGISTER: u16 = 0xff44;
pub const SCANLINE_COMPARE_REGISTER: u16 = 0xff45;
pub const BG_PALETTE_REGISTER: u16 = 0xff47;
pub const OBJ_PALETTE_0_REGISTER: u16 = 0xff48;
pub const OBJ_PALETTE_1_REGISTER: u16 = 0xff49;
pub const WINDOW_Y_REGISTER: u16 = 0xff4a;
pub const WINDOW_X_REGISTER: u16 = 0xff4b;
