/// PPU scanline mode, in the order the status register reports them.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Mode {
    HBlank,
    VBlank,
    OamScan,
    PixelTransfer,
}

impl Mode {
    pub fn as_u8(self) -> u8 {
        match self {
            Mode::HBlank => 0,
            Mode::VBlank => 1,
            Mode::OamScan => 2,
            Mode::PixelTransfer => 3,
        }
    }
}
