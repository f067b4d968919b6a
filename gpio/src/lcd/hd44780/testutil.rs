//! Recording fakes shared by the bus and controller tests.

use super::{Hd44780, Hd44780Bus, RegisterSelect};
use crate::{Delay, GpioOutput, GpioResult};
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Rs,
    E,
    Db(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Write(Line, bool),
    Sleep(Duration),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// Output line that appends every write to a shared log.
pub struct MockLine {
    line: Line,
    log: EventLog,
}

impl MockLine {
    pub fn new(line: Line, log: &EventLog) -> Self {
        MockLine {
            line,
            log: Rc::clone(log),
        }
    }
}

impl Debug for MockLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "MockLine({:?})", self.line)
    }
}

impl GpioOutput for MockLine {
    fn write(&self, value: bool) -> GpioResult<()> {
        self.log.borrow_mut().push(Event::Write(self.line, value));
        Ok(())
    }
}

/// Delay source that records instead of sleeping.
pub struct MockDelay {
    log: EventLog,
}

impl MockDelay {
    pub fn new(log: &EventLog) -> Self {
        MockDelay {
            log: Rc::clone(log),
        }
    }
}

impl Debug for MockDelay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "MockDelay")
    }
}

impl Delay for MockDelay {
    fn sleep(&self, duration: Duration) {
        self.log.borrow_mut().push(Event::Sleep(duration));
    }
}

/// One full set of mock lines with a shared event log.
pub struct Fixture {
    pub log: EventLog,
    rs: MockLine,
    e: MockLine,
    db: [MockLine; 4],
    delay: MockDelay,
}

impl Fixture {
    pub fn new() -> Self {
        let log = EventLog::default();
        Fixture {
            rs: MockLine::new(Line::Rs, &log),
            e: MockLine::new(Line::E, &log),
            db: [0usize, 1, 2, 3].map(|i| MockLine::new(Line::Db(i), &log)),
            delay: MockDelay::new(&log),
            log,
        }
    }

    pub fn bus(&self) -> Hd44780Bus<'_> {
        Hd44780Bus::new(
            &self.rs,
            &self.e,
            [&self.db[0], &self.db[1], &self.db[2], &self.db[3]],
            &self.delay,
        )
    }

    pub fn controller(&self) -> Hd44780<'_> {
        Hd44780::new(self.bus())
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().clone()
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }

    /// Nibble present on the data lines at each rising enable edge, with
    /// the RS level latched alongside it.
    pub fn latched_nibbles(&self) -> Vec<(u8, bool)> {
        let mut rs = false;
        let mut e = false;
        let mut db = [false; 4];
        let mut nibbles = Vec::new();

        for event in self.events() {
            match event {
                Event::Write(Line::Rs, value) => rs = value,
                Event::Write(Line::Db(i), value) => db[i] = value,
                Event::Write(Line::E, value) => {
                    if value && !e {
                        let mut nibble = 0u8;
                        for (i, &set) in db.iter().enumerate() {
                            if set {
                                nibble |= 1 << i;
                            }
                        }
                        nibbles.push((nibble, rs));
                    }
                    e = value;
                }
                Event::Sleep(_) => {}
            }
        }

        nibbles
    }

    /// Reassembles the transmitted bytes from the latched nibble pairs.
    pub fn transmits(&self) -> Vec<(u8, RegisterSelect)> {
        self.latched_nibbles()
            .chunks(2)
            .map(|pair| {
                let &[(high, rs), (low, _)] = pair else {
                    panic!("odd number of latched nibbles");
                };
                let rs = if rs {
                    RegisterSelect::Data
                } else {
                    RegisterSelect::Command
                };
                ((high << 4) | low, rs)
            })
            .collect()
    }
}
