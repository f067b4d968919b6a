//! Character LCD modules.

pub mod hd44780;
