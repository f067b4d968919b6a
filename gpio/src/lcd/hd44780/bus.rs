use super::RegisterSelect;
use crate::{Delay, GpioOutput, GpioResult};
use log::trace;
use std::time::Duration;

/// Settle time before every transfer. Covers the worst-case execution time
/// of ordinary instructions from the previous transfer; clear and
/// return-home need an extra wait on top, handled by the controller.
const SETTLE_TIME: Duration = Duration::from_micros(1000);

/// Guard delay around each edge of the enable pulse. The controller
/// requires the pulse to stay up for at least 450 ns.
const PULSE_TIME: Duration = Duration::from_micros(1);

/// Data line driven by each bit of the two nibble phases, most significant
/// bit first: bit 7 lands on data3 down to bit 4 on data0, and the low
/// nibble repeats the same order for bits 3..0.
const HIGH_NIBBLE_LINES: [(u8, usize); 4] = [(7, 3), (6, 2), (5, 1), (4, 0)];
const LOW_NIBBLE_LINES: [(u8, usize); 4] = [(3, 3), (2, 2), (1, 1), (0, 0)];

/// Write-only 4-bit bus to an HD44780 controller.
///
/// Owns the register-select and enable lines plus the four data lines
/// (wired to DB4..DB7 on the module), all acquired as outputs before
/// construction. Every byte goes out as two 4-bit transfers, high nibble
/// first, each latched by its own enable pulse.
#[derive(Debug)]
pub struct Hd44780Bus<'a> {
    pin_rs: &'a dyn GpioOutput,
    pin_e: &'a dyn GpioOutput,
    pins_db: [&'a dyn GpioOutput; 4],
    delay: &'a dyn Delay,
}

impl<'a> Hd44780Bus<'a> {
    pub fn new(
        pin_rs: &'a dyn GpioOutput,
        pin_e: &'a dyn GpioOutput,
        pins_db: [&'a dyn GpioOutput; 4],
        delay: &'a dyn Delay,
    ) -> Self {
        Hd44780Bus {
            pin_rs,
            pin_e,
            pins_db,
            delay,
        }
    }

    pub(super) fn delay(&self) -> &'a dyn Delay {
        self.delay
    }

    /// Transmits one byte to the instruction or data register.
    ///
    /// The sequence is fixed: settle wait, RS level, high nibble, enable
    /// pulse, low nibble, enable pulse. A failed line write aborts
    /// mid-transfer and leaves the controller desynchronized; there is no
    /// recovery short of re-running the init sequence.
    pub fn transmit(&self, byte: u8, rs: RegisterSelect) -> GpioResult<()> {
        trace!("Transmitting {:08b}, RS: {:?}", byte, rs);

        self.delay.sleep(SETTLE_TIME);

        self.pin_rs.write(rs.level())?;

        self.write_nibble(byte, &HIGH_NIBBLE_LINES)?;
        self.pulse_enable()?;
        self.write_nibble(byte, &LOW_NIBBLE_LINES)?;
        self.pulse_enable()?;

        Ok(())
    }

    fn write_nibble(&self, byte: u8, lines: &[(u8, usize); 4]) -> GpioResult<()> {
        for pin in &self.pins_db {
            pin.write(false)?;
        }

        for &(bit, line) in lines {
            if byte & (1 << bit) != 0 {
                self.pins_db[line].write(true)?;
            }
        }

        Ok(())
    }

    /// The controller latches the presented nibble on the enable edge.
    fn pulse_enable(&self) -> GpioResult<()> {
        self.pin_e.write(false)?;
        self.delay.sleep(PULSE_TIME);
        self.pin_e.write(true)?;
        self.delay.sleep(PULSE_TIME);
        self.pin_e.write(false)?;
        self.delay.sleep(PULSE_TIME);
        Ok(())
    }
}
