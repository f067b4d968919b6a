//! HD44780 character LCD module.
//!
//! Write-only driver for HD44780-family controllers wired in 4-bit parallel
//! mode. The [Hd44780Bus] moves raw bytes over the five control/data lines;
//! the [Hd44780] controller on top of it tracks the mode flags and exposes
//! the usual display operations.
//!
//! The controller never reads the display back, so the session state kept
//! here is the only record of what mode the hardware is in.

mod bus;
mod controller;

pub use bus::*;
pub use controller::*;

#[cfg(test)]
pub(crate) mod testutil;

/// Register addressed by one bus transfer, driven on the RS line.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RegisterSelect {
    /// Instruction register; the byte is a command opcode.
    Command,
    /// Data register; the byte is a character code.
    Data,
}

impl RegisterSelect {
    /// Level driven on the RS line for this register.
    pub fn level(self) -> bool {
        matches!(self, RegisterSelect::Data)
    }
}

// Commands.
pub const CLEAR_DISPLAY: u8 = 0x01;
pub const RETURN_HOME: u8 = 0x02;
pub const ENTRY_MODE_SET: u8 = 0x04;
pub const DISPLAY_CONTROL: u8 = 0x08;
pub const CURSOR_SHIFT: u8 = 0x10;
pub const FUNCTION_SET: u8 = 0x20;
pub const SET_CGRAM_ADDR: u8 = 0x40;
pub const SET_DDRAM_ADDR: u8 = 0x80;

// Flags for display entry mode.
pub const ENTRY_RIGHT: u8 = 0x00;
pub const ENTRY_LEFT: u8 = 0x02;
pub const ENTRY_SHIFT_INCREMENT: u8 = 0x01;
pub const ENTRY_SHIFT_DECREMENT: u8 = 0x00;

// Flags for display on/off control.
pub const DISPLAY_ON: u8 = 0x04;
pub const DISPLAY_OFF: u8 = 0x00;
pub const CURSOR_ON: u8 = 0x02;
pub const CURSOR_OFF: u8 = 0x00;
pub const BLINK_ON: u8 = 0x01;
pub const BLINK_OFF: u8 = 0x00;

// Flags for display/cursor shift.
pub const DISPLAY_MOVE: u8 = 0x08;
pub const CURSOR_MOVE: u8 = 0x00;
pub const MOVE_RIGHT: u8 = 0x04;
pub const MOVE_LEFT: u8 = 0x00;

// Flags for function set.
pub const EIGHT_BIT_MODE: u8 = 0x10;
pub const FOUR_BIT_MODE: u8 = 0x00;
pub const TWO_LINE: u8 = 0x08;
pub const ONE_LINE: u8 = 0x00;
pub const DOTS_5X10: u8 = 0x04;
pub const DOTS_5X8: u8 = 0x00;

// Bits each flag family may occupy within its command byte. The base
// command bit always sits above its family's flag bits, so OR-ing a base
// with its flags never clobbers either.
pub const ENTRY_MODE_MASK: u8 = 0x03;
pub const DISPLAY_CONTROL_MASK: u8 = 0x07;
pub const CURSOR_SHIFT_MASK: u8 = 0x0C;
pub const FUNCTION_SET_MASK: u8 = 0x1C;

/// DDRAM base address of each physical row.
pub const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// Set-DDRAM-address command for the start of the second line, used for the
/// newline jump in [Hd44780::message].
pub const SECOND_LINE_ADDR: u8 = 0xC0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_families_occupy_disjoint_bits() {
        assert_eq!(ENTRY_LEFT & ENTRY_SHIFT_INCREMENT, 0);
        assert_eq!(DISPLAY_ON & CURSOR_ON, 0);
        assert_eq!(DISPLAY_ON & BLINK_ON, 0);
        assert_eq!(CURSOR_ON & BLINK_ON, 0);
        assert_eq!(DISPLAY_MOVE & MOVE_RIGHT, 0);
        assert_eq!(EIGHT_BIT_MODE & TWO_LINE, 0);
        assert_eq!(EIGHT_BIT_MODE & DOTS_5X10, 0);
        assert_eq!(TWO_LINE & DOTS_5X10, 0);
    }

    #[test]
    fn base_commands_sit_above_their_flag_bits() {
        assert_eq!(ENTRY_MODE_SET & ENTRY_MODE_MASK, 0);
        assert_eq!(DISPLAY_CONTROL & DISPLAY_CONTROL_MASK, 0);
        assert_eq!(CURSOR_SHIFT & CURSOR_SHIFT_MASK, 0);
        assert_eq!(FUNCTION_SET & FUNCTION_SET_MASK, 0);
    }

    #[test]
    fn masking_recovers_composed_flags() {
        let byte = DISPLAY_CONTROL | DISPLAY_ON | BLINK_ON;
        assert_eq!(byte & DISPLAY_CONTROL_MASK, DISPLAY_ON | BLINK_ON);
        assert_eq!(byte & !DISPLAY_CONTROL_MASK, DISPLAY_CONTROL);

        let byte = ENTRY_MODE_SET | ENTRY_LEFT | ENTRY_SHIFT_DECREMENT;
        assert_eq!(byte & ENTRY_MODE_MASK, ENTRY_LEFT);
        assert_eq!(byte & !ENTRY_MODE_MASK, ENTRY_MODE_SET);

        let byte = FUNCTION_SET | FOUR_BIT_MODE | TWO_LINE | DOTS_5X8;
        assert_eq!(byte & FUNCTION_SET_MASK, TWO_LINE);
        assert_eq!(byte & !FUNCTION_SET_MASK, FUNCTION_SET);
    }

    #[test]
    fn register_select_levels() {
        assert!(!RegisterSelect::Command.level());
        assert!(RegisterSelect::Data.level());
    }
}
