//! `vaaman show|pins|pin|detect` command handlers.

use anyhow::{anyhow, Result};

use vaaman::platform::detect_variant;
use vaaman::{build_board, BoardDescriptor, Config, FsProbe, PinEntry};

fn load_board(config: &Config) -> Result<BoardDescriptor> {
    Ok(build_board(&FsProbe, config)?)
}

/// Print the board summary, or the whole descriptor as JSON.
pub(crate) fn cmd_show(config: &Config, json: bool) -> Result<()> {
    let board = load_board(config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&board)?);
        return Ok(());
    }

    let platform = board.platform_name.unwrap_or("unrecognized");
    let header_pins = board.phy_pin_count - 1;
    let i2c = join_ids(board.i2c_buses.iter().map(|b| b.bus_id));
    let spi = join_ids(board.spi_buses.iter().map(|b| b.bus_id));

    println!("Platform:   {}", platform);
    println!("Pins:       {} ({} GPIO)", header_pins, board.gpio_count());
    println!("I2C buses:  {}", i2c);
    println!("SPI buses:  {}", spi);
    for uart in &board.uart_devs {
        println!(
            "UART {}:     {}",
            uart.index,
            uart.device_path.unwrap_or("(no device path)")
        );
    }
    println!(
        "PWM:        {} devices, period {}..{} us (default {})",
        board.pwm_dev_count, board.pwm_min_period, board.pwm_max_period, board.pwm_default_period
    );
    println!(
        "ADC:        {} channel(s), {} bit",
        board.aio_count(),
        board.adc_supported
    );
    Ok(())
}

/// Print the header table.
pub(crate) fn cmd_pins(config: &Config) -> Result<()> {
    let board = load_board(config)?;
    println!(
        "{:>3}  {:<12} {:>6}  {:>9}  CAPS",
        "PIN", "NAME", "KERNEL", "CHIP/LINE"
    );
    for (index, pin) in board.pins.iter().enumerate().skip(1) {
        println!("{}", format_pin_row(index, pin));
    }
    Ok(())
}

/// Print a single pin looked up by index or name.
pub(crate) fn cmd_pin(config: &Config, query: &str) -> Result<()> {
    let board = load_board(config)?;
    let (index, pin) = match query.parse::<usize>() {
        Ok(index) => (index, board.pin(index)?),
        Err(_) => board
            .pin_by_name(query)
            .ok_or_else(|| anyhow!("No pin named '{}'", query))?,
    };

    let out = serde_json::json!({ "index": index, "pin": pin });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Print the detected platform variant.
pub(crate) fn cmd_detect(config: &Config) -> Result<()> {
    let path = config.model_path.display();
    match detect_variant(&FsProbe, &config.model_path) {
        Some(variant) => println!("{:?}: {}", variant, variant.model_name()),
        None => println!("unrecognized (model file: {})", path),
    }
    Ok(())
}

fn format_pin_row(index: usize, pin: &PinEntry) -> String {
    let (kernel, chip_line) = match pin.gpio.pinmap {
        Some(k) => {
            let chip_line = format!("{}/{}", pin.gpio.chip, pin.gpio.line);
            (k.to_string(), chip_line)
        }
        None => ("-".to_string(), "-".to_string()),
    };
    format!(
        "{:>3}  {:<12} {:>6}  {:>9}  {}",
        index,
        pin.name,
        kernel,
        chip_line,
        pin.capabilities.letters()
    )
}

fn join_ids(ids: impl Iterator<Item = u32>) -> String {
    let ids: Vec<String> = ids.map(|id| id.to_string()).collect();
    if ids.is_empty() {
        "none".to_string()
    } else {
        ids.join(", ")
    }
}
