use log::warn;

#[derive(Copy, Clone, Debug)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Start,
    Select,
    A,
    B,
}

/// Eight button states multiplexed onto the joypad register through the
/// two select lines. The presentation layer pushes states in between
/// ticks; the bus pulls the register byte out.
#[derive(Clone)]
pub struct Joypad {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    a: bool,
    b: bool,
    start: bool,
    select: bool,
}

impl Joypad {
    pub fn new() -> Joypad {
        Joypad {
            up: false,
            down: false,
            left: false,
            right: false,
            a: false,
            b: false,
            start: false,
            select: false,
        }
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        match button {
            Button::Up => self.up = pressed,
            Button::Down => self.down = pressed,
            Button::Left => self.left = pressed,
            Button::Right => self.right = pressed,
            Button::Start => self.start = pressed,
            Button::Select => self.select = pressed,
            Button::A => self.a = pressed,
            Button::B => self.b = pressed,
        }
    }

    /// Build the joypad register byte for the given select bits. Lines are
    /// active low, so pressed buttons read as zero bits.
    pub fn as_u8(&self, select: u8) -> u8 {
        let button_select = select & 0b0010_0000 == 0;
        let direction_select = select & 0b0001_0000 == 0;
        if button_select && direction_select {
            warn!("Joypad has buttons and d-pad selected at the same time");
        }

        let mut state = select & 0b0011_0000;

        if button_select {
            if self.start {
                state |= 0b0000_1000;
            }
            if self.select {
                state |= 0b0000_0100;
            }
            if self.b {
                state |= 0b0000_0010;
            }
            if self.a {
                state |= 0b0000_0001;
            }
        } else if direction_select {
            if self.down {
                state |= 0b0000_1000;
            }
            if self.up {
                state |= 0b0000_0100;
            }
            if self.left {
                state |= 0b0000_0010;
            }
            if self.right {
                state |= 0b0000_0001;
            }
        }

        !state
    }
}
