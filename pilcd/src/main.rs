mod config;

use crate::config::Config;
use dotenv::dotenv;
use log::{debug, info};
use pilcd_gpio::gpiod::GpiodDriver;
use pilcd_gpio::lcd::hd44780::{Hd44780, Hd44780Bus};
use pilcd_gpio::{GpioDriver, ThreadDelay};
use std::env::var;
use std::thread;
use std::time::Duration;
use sysinfo::System;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

const CLOCK_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

fn parse_data_pins(pin_str: &str) -> eyre::Result<[usize; 4]> {
    pin_str
        .split([',', ' ', ';'])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse())
        .collect::<Result<Vec<_>, _>>()?
        .try_into()
        .map_err(|_| eyre::eyre!("Invalid number of data pins"))
}

fn main() -> eyre::Result<()> {
    // Initialize environment and logger
    dotenv().ok();
    pretty_env_logger::init();

    info!("pilcd starting...");

    // Get line numbers from env
    let rs_pin_no: usize = var("PILCD_PIN_RS")?.parse()?;
    let e_pin_no: usize = var("PILCD_PIN_E")?.parse()?;
    let data_pin_nos: [usize; 4] = parse_data_pins(&var("PILCD_PINS_DATA")?)?;
    let chip_path = var("PILCD_GPIOCHIP").unwrap_or_else(|_| "/dev/gpiochip0".to_string());

    info!(
        "LCD @ RS: {}, E: {}, Data: {:?}",
        rs_pin_no, e_pin_no, data_pin_nos
    );

    debug!("Trying to load config...");
    let config = if let Some(config) = Config::try_load() {
        info!("Config loaded.");
        config
    } else {
        info!("Config not found. Using default");
        let config = Config::default();
        config.save()?;
        info!("Default config saved.");
        config
    };

    debug!("Initializing GPIO driver...");
    let gpio = GpiodDriver::open(&chip_path)?;
    debug!("{:?} initialized.", gpio);

    debug!("Initializing LCD driver...");
    let rs_out = gpio.acquire_output(rs_pin_no)?;
    let e_out = gpio.acquire_output(e_pin_no)?;
    let db0_out = gpio.acquire_output(data_pin_nos[0])?;
    let db1_out = gpio.acquire_output(data_pin_nos[1])?;
    let db2_out = gpio.acquire_output(data_pin_nos[2])?;
    let db3_out = gpio.acquire_output(data_pin_nos[3])?;
    let delay = ThreadDelay;

    let bus = Hd44780Bus::new(
        &*rs_out,
        &*e_out,
        [&*db0_out, &*db1_out, &*db2_out, &*db3_out],
        &delay,
    );
    let mut lcd = Hd44780::new(bus);

    lcd.init()?;
    lcd.begin(config.cols, config.lines);
    debug!("{:?} initialized.", lcd);

    const UNKNOWN_HOST: &str = "pilcd";
    let banner = config
        .banner
        .replace("{host}", System::host_name().as_deref().unwrap_or(UNKNOWN_HOST));

    lcd.message(&banner)?;

    info!("pilcd initialized, entering clock loop...");

    let offset = UtcOffset::current_local_offset()?;

    loop {
        let now = OffsetDateTime::now_utc().to_offset(offset);
        lcd.set_cursor(0, 1)?;
        lcd.message(&now.format(CLOCK_FORMAT)?)?;
        thread::sleep(Duration::from_secs(1));
    }
}
