use log::trace;

use crate::memory::registers::{InterruptFlags, LcdControl, LcdStatus};
use crate::video::palette::{self, Color};
use crate::video::sprite::Sprite;
use crate::video::state::Mode;
use crate::video::tile::TileCache;
use crate::video::{
    BG_PALETTE_REGISTER, CONTROL_REGISTER, HBLANK_CYCLES, LINE_CYCLES, OAM_SCAN_CYCLES, OAM_SIZE,
    OBJ_PALETTE_0_REGISTER, OBJ_PALETTE_1_REGISTER, PIXEL_TRANSFER_CYCLES,
    SCANLINE_COMPARE_REGISTER, SCANLINE_REGISTER, SCREEN_HEIGHT, SCREEN_WIDTH, SCROLL_X_REGISTER,
    SCROLL_Y_REGISTER, SPRITE_COUNT, STATUS_REGISTER, VBLANK_LINES, VRAM_SIZE, WINDOW_X_REGISTER,
    WINDOW_Y_REGISTER,
};

/// Tile data occupies the bottom of VRAM; everything above it is the two
/// tile maps.
const TILE_DATA_END: usize = 0x1800;

#[derive(Clone)]
pub struct Ppu {
    vram: Vec<u8>,
    oam: Vec<u8>,
    tiles: TileCache,
    sprites: [Sprite; SPRITE_COUNT],

    control: LcdControl,
    status: LcdStatus,
    mode: Mode,
    // Cycle debt inside the current mode. Leftovers carry across
    // transitions so long runs never drift against the CPU clock.
    cycles: usize,
    line: u8,
    line_compare: u8,
    scroll_x: u8,
    scroll_y: u8,
    window_x: u8,
    window_y: u8,
    bg_palette: u8,
    obj_palette_0: u8,
    obj_palette_1: u8,

    framebuffer: Vec<Color>,
    frame_ready: bool,
}

impl Ppu {
    pub fn new() -> Ppu {
        Ppu {
            vram: vec![0; VRAM_SIZE],
            oam: vec![0; OAM_SIZE],
            tiles: TileCache::new(),
            sprites: [Sprite::default(); SPRITE_COUNT],
            control: LcdControl::empty(),
            status: LcdStatus::empty(),
            mode: Mode::OamScan,
            cycles: 0,
            line: 0,
            line_compare: 0,
            scroll_x: 0,
            scroll_y: 0,
            window_x: 0,
            window_y: 0,
            bg_palette: 0,
            obj_palette_0: 0,
            obj_palette_1: 0,
            framebuffer: vec![palette::SHADES[0]; SCREEN_WIDTH * SCREEN_HEIGHT],
            frame_ready: false,
        }
    }

    /// Advance the scanline state machine by the cycle cost of the
    /// instruction just executed and return the interrupts to request.
    /// `frame_ready` is cleared here and re-raised at the next VBlank
    /// entry, so the consumer has to read the frame between ticks.
    pub fn tick(&mut self, cycles: usize) -> InterruptFlags {
        self.frame_ready = false;

        let mut interrupts = InterruptFlags::empty();
        self.cycles += cycles;

        loop {
            let advanced = match self.mode {
                Mode::OamScan => {
                    if self.cycles >= OAM_SCAN_CYCLES {
                        self.cycles -= OAM_SCAN_CYCLES;
                        self.mode = Mode::PixelTransfer;
                        true
                    } else {
                        false
                    }
                }
                Mode::PixelTransfer => {
                    if self.cycles >= PIXEL_TRANSFER_CYCLES {
                        self.cycles -= PIXEL_TRANSFER_CYCLES;
                        self.mode = Mode::HBlank;

                        if self.status.contains(LcdStatus::HBLANK_IRQ) {
                            interrupts |= InterruptFlags::LCD_STAT;
                        }

                        if self.control.contains(LcdControl::LCD_DISPLAY) {
                            self.render_scanline();
                        }
                        true
                    } else {
                        false
                    }
                }
                Mode::HBlank => {
                    if self.cycles >= HBLANK_CYCLES {
                        self.cycles -= HBLANK_CYCLES;
                        self.line += 1;

                        if self.line as usize == SCREEN_HEIGHT {
                            self.mode = Mode::VBlank;
                            self.frame_ready = true;
                            interrupts |= InterruptFlags::VBLANK;
                            if self.status.contains(LcdStatus::VBLANK_IRQ) {
                                interrupts |= InterruptFlags::LCD_STAT;
                            }
                            trace!("Entering VBlank");
                        } else {
                            self.mode = Mode::OamScan;
                            if self.status.contains(LcdStatus::OAM_IRQ) {
                                interrupts |= InterruptFlags::LCD_STAT;
                            }
                        }
                        true
                    } else {
                        false
                    }
                }
                Mode::VBlank => {
                    // LY keeps counting through the ten blank lines.
                    if self.cycles >= LINE_CYCLES {
                        self.cycles -= LINE_CYCLES;
                        self.line += 1;

                        if self.line as usize >= SCREEN_HEIGHT + VBLANK_LINES {
                            self.line = 0;
                            self.mode = Mode::OamScan;
                            if self.status.contains(LcdStatus::OAM_IRQ) {
                                interrupts |= InterruptFlags::LCD_STAT;
                            }
                        }
                        true
                    } else {
                        false
                    }
                }
            };

            if !advanced {
                break;
            }
        }

        self.status
            .set(LcdStatus::LYC_COINCIDENCE, self.line == self.line_compare);
        if self.status.contains(LcdStatus::LYC_IRQ)
            && self.status.contains(LcdStatus::LYC_COINCIDENCE)
        {
            interrupts |= InterruptFlags::LCD_STAT;
        }

        interrupts
    }

    pub fn read_vram(&self, offset: u16) -> u8 {
        self.vram[offset as usize]
    }

    pub fn write_vram(&mut self, offset: u16, data: u8) {
        let offset = offset as usize;
        self.vram[offset] = data;

        if offset < TILE_DATA_END {
            self.tiles.update_row(&self.vram, offset);
        }
    }

    pub fn read_oam(&self, offset: usize) -> u8 {
        self.oam[offset]
    }

    pub fn write_oam(&mut self, offset: usize, data: u8) {
        self.oam[offset] = data;
        self.sprites[offset >> 2].update(offset & 0x3, data);
    }

    pub fn read_register(&self, addr: u16) -> u8 {
        match addr {
            CONTROL_REGISTER => self.control.bits(),
            // Bit 7 is unused and reads high; the mode lives in bits 0-1.
            STATUS_REGISTER => 0x80 | self.status.bits() | self.mode.as_u8(),
            SCROLL_Y_REGISTER => self.scroll_y,
            SCROLL_X_REGISTER => self.scroll_x,
            SCANLINE_REGISTER => self.line,
            SCANLINE_COMPARE_REGISTER => self.line_compare,
            BG_PALETTE_REGISTER => self.bg_palette,
            OBJ_PALETTE_0_REGISTER => self.obj_palette_0,
            OBJ_PALETTE_1_REGISTER => self.obj_palette_1,
            WINDOW_Y_REGISTER => self.window_y,
            WINDOW_X_REGISTER => self.window_x,
            _ => 0,
        }
    }

    pub fn write_register(&mut self, addr: u16, data: u8) {
        match addr {
            CONTROL_REGISTER => self.control = LcdControl::from_bits_truncate(data),
            STATUS_REGISTER => {
                // Only the interrupt-gate bits are writable.
                let mask = LcdStatus::HBLANK_IRQ
                    | LcdStatus::VBLANK_IRQ
                    | LcdStatus::OAM_IRQ
                    | LcdStatus::LYC_IRQ;
                self.status = (self.status - mask) | (LcdStatus::from_bits_truncate(data) & mask);
            }
            SCROLL_Y_REGISTER => self.scroll_y = data,
            SCROLL_X_REGISTER => self.scroll_x = data,
            SCANLINE_REGISTER => {} // read-only
            SCANLINE_COMPARE_REGISTER => self.line_compare = data,
            BG_PALETTE_REGISTER => self.bg_palette = data,
            OBJ_PALETTE_0_REGISTER => self.obj_palette_0 = data,
            OBJ_PALETTE_1_REGISTER => self.obj_palette_1 = data,
            WINDOW_Y_REGISTER => self.window_y = data,
            WINDOW_X_REGISTER => self.window_x = data,
            _ => {}
        }
    }

    /// Render the current line into the framebuffer: the background walk
    /// first, then the sprites composited over it.
    fn render_scanline(&mut self) {
        let line = self.line as usize;

        if self.control.contains(LcdControl::BG_DISPLAY) {
            let mut tile_x = (self.scroll_x >> 3) as usize;
            let tile_y = ((line + self.scroll_y as usize) & 0xff) >> 3;

            let mut pixel_x = (self.scroll_x & 7) as usize;
            let pixel_y = (line + self.scroll_y as usize) & 7;

            let tilemap_offset = if self.control.contains(LcdControl::BG_TILE_MAP) {
                0x1c00
            } else {
                0x1800
            };

            let mut canvas_offset = line * SCREEN_WIDTH;
            let mut tile = self.background_tile(tilemap_offset + tile_y * 32 + tile_x);

            for _ in 0..SCREEN_WIDTH {
                let value = self.tiles.pixel(tile, pixel_y, pixel_x);
                self.framebuffer[canvas_offset] = palette::shade(self.bg_palette, value);

                canvas_offset += 1;
                pixel_x += 1;

                if pixel_x == 8 {
                    pixel_x = 0;

                    // Tile maps are 32 columns wide and wrap around.
                    tile_x = (tile_x + 1) & 31;
                    tile = self.background_tile(tilemap_offset + tile_y * 32 + tile_x);
                }
            }
        }

        if self.control.contains(LcdControl::OBJ_DISPLAY) {
            for index in 0..SPRITE_COUNT {
                let sprite = self.sprites[index];
                self.render_sprite(sprite, line as i32);
            }
        }
    }

    /// Resolve a tile-map entry to a cache index. The 0x8800 block is
    /// addressed with signed tile numbers, hence the +256 bias for low
    /// indices when that block is selected.
    fn background_tile(&self, map_offset: usize) -> usize {
        let mut tile = self.vram[map_offset] as usize;
        if !self.control.contains(LcdControl::BG_TILE_DATA) && tile < 128 {
            tile += 256;
        }
        tile
    }

    fn render_sprite(&mut self, sprite: Sprite, line: i32) {
        let y = sprite.y as i32;
        let x = sprite.x as i32;

        // Vertical hit test as observed, off by one against textbook
        // sprite-scanline intersection.
        if !(y + 8 >= line && y < line) {
            return;
        }

        let mut tile_row = if sprite.y_flip {
            7 - (line - y)
        } else {
            line - y
        };
        tile_row -= 1;

        // A vertically flipped sprite on its boundary line would index
        // before the tile's first row; skip it instead.
        if !(0..8).contains(&tile_row) {
            return;
        }

        let palette_byte = if sprite.palette {
            self.obj_palette_1
        } else {
            self.obj_palette_0
        };

        // The observed renderer writes the row above the hit-tested line.
        let canvas_line = (line - 1) as usize;

        for i in 0..8i32 {
            let screen_x = x + i;
            if !(0..SCREEN_WIDTH as i32).contains(&screen_x) {
                continue;
            }

            let flipped_x = if sprite.x_flip { 7 - i } else { i };
            let value = self
                .tiles
                .pixel(sprite.tile as usize, tile_row as usize, flipped_x as usize);

            // Color 0 never draws; a behind-background sprite only draws
            // over the lightest shade.
            if value == 0 {
                continue;
            }

            let canvas_offset = canvas_line * SCREEN_WIDTH + screen_x as usize;
            if sprite.priority && self.framebuffer[canvas_offset] != palette::SHADES[0] {
                continue;
            }

            self.framebuffer[canvas_offset] = palette::shade(palette_byte, value);
        }
    }

    pub fn frame_ready(&self) -> bool {
        self.frame_ready
    }

    pub fn framebuffer(&self) -> &[Color] {
        &self.framebuffer
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current_line(&self) -> u8 {
        self.line
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }
}
