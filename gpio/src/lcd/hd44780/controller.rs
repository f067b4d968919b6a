use super::{
    BLINK_OFF, BLINK_ON, CLEAR_DISPLAY, CURSOR_OFF, CURSOR_ON, CURSOR_SHIFT, DISPLAY_CONTROL,
    DISPLAY_MOVE, DISPLAY_ON, DOTS_5X8, ENTRY_LEFT, ENTRY_MODE_SET, ENTRY_SHIFT_DECREMENT,
    ENTRY_SHIFT_INCREMENT, FOUR_BIT_MODE, Hd44780Bus, MOVE_LEFT, MOVE_RIGHT, ONE_LINE,
    RETURN_HOME, ROW_OFFSETS, RegisterSelect, SECOND_LINE_ADDR, SET_DDRAM_ADDR, TWO_LINE,
};
use crate::GpioResult;
use std::time::Duration;

/// Extra wait after the clear and return-home instructions. These run far
/// longer than the flat settle time the bus applies before each transfer.
const LONG_EXECUTE_TIME: Duration = Duration::from_micros(3000);

/// HD44780 display session over a 4-bit bus.
///
/// Owns its bus for the whole lifetime of the session and tracks the
/// entry-mode, display-control and function composites last sent to the
/// hardware. One controller drives exactly one physical display; callers
/// needing concurrent access must serialize it themselves, as an
/// interleaved write mid-transfer corrupts the latched byte.
///
/// Nothing but [init](Self::init) is valid on a fresh controller.
#[derive(Debug)]
pub struct Hd44780<'a> {
    bus: Hd44780Bus<'a>,

    display_control: u8,
    display_function: u8,
    display_mode: u8,

    num_lines: usize,
    curr_line: usize,
}

impl<'a> Hd44780<'a> {
    /// Wraps a bus in an uninitialized controller session.
    pub fn new(bus: Hd44780Bus<'a>) -> Self {
        Hd44780 {
            bus,
            display_control: 0,
            display_function: 0,
            display_mode: 0,
            num_lines: 0,
            curr_line: 0,
        }
    }

    /// Brings the controller from an unknown power-on state into 4-bit
    /// mode, turns the display on and clears it.
    ///
    /// The first two transfers resynchronize the controller into 8-bit
    /// instruction interpretation no matter what state it was left in; the
    /// second also drops it into 4-bit mode. The order of the sequence is
    /// mandatory.
    pub fn init(&mut self) -> GpioResult<()> {
        self.bus.transmit(0x33, RegisterSelect::Command)?;
        self.bus.transmit(0x32, RegisterSelect::Command)?;
        // Function set: 4-bit bus, 2 lines, 5x8 font
        self.bus.transmit(0x28, RegisterSelect::Command)?;
        // Display on, cursor off, blink off
        self.bus.transmit(0x0C, RegisterSelect::Command)?;
        // Entry mode: cursor moves right, no display shift
        self.bus.transmit(0x06, RegisterSelect::Command)?;

        self.display_control = DISPLAY_ON | CURSOR_OFF | BLINK_OFF;

        self.display_function = FOUR_BIT_MODE | ONE_LINE | DOTS_5X8;
        self.display_function |= TWO_LINE;

        // Default text direction for latin scripts
        self.display_mode = ENTRY_LEFT | ENTRY_SHIFT_DECREMENT;
        self.bus
            .transmit(ENTRY_MODE_SET | self.display_mode, RegisterSelect::Command)?;

        self.clear()
    }

    /// Sets the display geometry. Only the line count matters to the
    /// protocol; `cols` is accepted for callers that track it. Single-line
    /// geometries are a no-op.
    pub fn begin(&mut self, _cols: usize, lines: usize) {
        if lines > 1 {
            self.num_lines = lines;
            self.display_function |= TWO_LINE;
            self.curr_line = 0;
        }
    }

    /// Moves the cursor back to (0, 0).
    pub fn home(&mut self) -> GpioResult<()> {
        self.bus.transmit(RETURN_HOME, RegisterSelect::Command)?;
        // This instruction takes a long time
        self.bus.delay().sleep(LONG_EXECUTE_TIME);
        Ok(())
    }

    /// Clears the display and homes the cursor.
    pub fn clear(&mut self) -> GpioResult<()> {
        self.bus.transmit(CLEAR_DISPLAY, RegisterSelect::Command)?;
        // Clearing the display takes a long time
        self.bus.delay().sleep(LONG_EXECUTE_TIME);
        Ok(())
    }

    /// Moves the cursor to the given zero-based column and row.
    ///
    /// Rows past the configured line count are clamped to one past it.
    /// Columns are not bounds-checked: an address beyond the visible width
    /// goes to the hardware as-is and its effect is hardware-defined.
    pub fn set_cursor(&mut self, col: usize, row: usize) -> GpioResult<()> {
        let mut row = row;
        if row > self.num_lines {
            row = self.num_lines + 1;
        }

        self.bus.transmit(
            SET_DDRAM_ADDR | (col as u8 + ROW_OFFSETS[row]),
            RegisterSelect::Command,
        )
    }

    /// Turns the display off without losing DDRAM contents.
    pub fn no_display(&mut self) -> GpioResult<()> {
        self.display_control &= !DISPLAY_ON;
        self.bus
            .transmit(DISPLAY_CONTROL | self.display_control, RegisterSelect::Command)
    }

    /// Turns the display back on.
    pub fn display(&mut self) -> GpioResult<()> {
        self.display_control |= DISPLAY_ON;
        self.bus
            .transmit(DISPLAY_CONTROL | self.display_control, RegisterSelect::Command)
    }

    /// Hides the underline cursor.
    pub fn no_cursor(&mut self) -> GpioResult<()> {
        self.display_control &= !CURSOR_ON;
        self.bus
            .transmit(DISPLAY_CONTROL | self.display_control, RegisterSelect::Command)
    }

    /// Shows the underline cursor.
    pub fn cursor(&mut self) -> GpioResult<()> {
        self.display_control |= CURSOR_ON;
        self.bus
            .transmit(DISPLAY_CONTROL | self.display_control, RegisterSelect::Command)
    }

    /// Stops the cursor position from blinking.
    pub fn no_blink(&mut self) -> GpioResult<()> {
        self.display_control &= !BLINK_ON;
        self.bus
            .transmit(DISPLAY_CONTROL | self.display_control, RegisterSelect::Command)
    }

    /// Blinks the character cell at the cursor position.
    pub fn blink(&mut self) -> GpioResult<()> {
        self.display_control |= BLINK_ON;
        self.bus
            .transmit(DISPLAY_CONTROL | self.display_control, RegisterSelect::Command)
    }

    /// Scrolls the whole display one position left without touching DDRAM.
    pub fn scroll_display_left(&mut self) -> GpioResult<()> {
        self.bus.transmit(
            CURSOR_SHIFT | DISPLAY_MOVE | MOVE_LEFT,
            RegisterSelect::Command,
        )
    }

    /// Scrolls the whole display one position right without touching DDRAM.
    pub fn scroll_display_right(&mut self) -> GpioResult<()> {
        self.bus.transmit(
            CURSOR_SHIFT | DISPLAY_MOVE | MOVE_RIGHT,
            RegisterSelect::Command,
        )
    }

    /// Text flows left to right after each written character.
    pub fn left_to_right(&mut self) -> GpioResult<()> {
        self.display_mode |= ENTRY_LEFT;
        self.bus
            .transmit(ENTRY_MODE_SET | self.display_mode, RegisterSelect::Command)
    }

    /// Text flows right to left after each written character.
    pub fn right_to_left(&mut self) -> GpioResult<()> {
        self.display_mode &= !ENTRY_LEFT;
        self.bus
            .transmit(ENTRY_MODE_SET | self.display_mode, RegisterSelect::Command)
    }

    /// Shifts the display on each write, right-justifying text from the
    /// cursor.
    pub fn autoscroll(&mut self) -> GpioResult<()> {
        self.display_mode |= ENTRY_SHIFT_INCREMENT;
        self.bus
            .transmit(ENTRY_MODE_SET | self.display_mode, RegisterSelect::Command)
    }

    /// Keeps the display still on each write, left-justifying text from
    /// the cursor.
    pub fn no_autoscroll(&mut self) -> GpioResult<()> {
        self.display_mode &= !ENTRY_SHIFT_INCREMENT;
        self.bus
            .transmit(ENTRY_MODE_SET | self.display_mode, RegisterSelect::Command)
    }

    /// Writes a string at the current cursor position.
    ///
    /// A newline jumps to the start of the second line. There is no soft
    /// wrapping beyond that; overlong text relies on the controller's own
    /// DDRAM address wrap.
    pub fn message(&mut self, text: &str) -> GpioResult<()> {
        for byte in text.bytes() {
            if byte == b'\n' {
                self.bus.transmit(SECOND_LINE_ADDR, RegisterSelect::Command)?;
            } else {
                self.bus.transmit(byte, RegisterSelect::Data)?;
            }
        }
        Ok(())
    }
}
