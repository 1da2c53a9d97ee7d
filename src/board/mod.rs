//! Vaaman board descriptor -- bus numbering, pin table and lookups.
//!
//! [`build_board`] produces a fully populated [`BoardDescriptor`] in one
//! call. The descriptor is a read model for the generic I/O runtime: it
//! translates logical pins and bus indices into the kernel numbering used
//! on the RK3399.
//!
//! # Example
//!
//! ```
//! use vaaman::board::build_board;
//! use vaaman::config::Config;
//! use vaaman::platform::FsProbe;
//!
//! let board = build_board(&FsProbe, &Config::default()).unwrap();
//! let gpio = board.gpio(3).unwrap();
//! assert_eq!((gpio.chip, gpio.line), (2, 7));
//! assert_eq!(board.spi_bus_id(0).unwrap(), 1);
//! ```

pub mod pins;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{Config, I2cPolicy};
use crate::error::{BoardError, Result};
use crate::platform::{detect_variant, PlatformVariant, SystemProbe, PLATFORM_NAME_VAAMAN};

pub use pins::{fill_pin, GpioMapping, PinCapabilities, PinEntry, PinRow, PwmMapping, PIN_TABLE};

/// GPIO-capable pins on the header.
pub const GPIO_COUNT: usize = 27;
pub const I2C_COUNT: usize = 3;
pub const SPI_COUNT: usize = 2;
pub const UART_COUNT: usize = 2;
pub const PWM_COUNT: usize = 2;
pub const AIO_COUNT: usize = 1;
/// Physical header positions.
pub const PIN_COUNT: usize = 40;

/// Serial devices backing the two UARTs, in UART index order.
pub const UART_DEVICE_PATHS: [&str; UART_COUNT] = ["/dev/ttyS2", "/dev/ttyS4"];

const UART_INDICES: [u32; UART_COUNT] = [2, 4];
const I2C_BUS_IDS: [u32; I2C_COUNT] = [7, 2, 6];
const SPI_BUS_IDS: [u32; SPI_COUNT] = [1, 2];

/// PWM periods, in microseconds.
pub const PWM_DEFAULT_PERIOD: u32 = 500;
pub const PWM_MIN_PERIOD: u32 = 1;
pub const PWM_MAX_PERIOD: u32 = 2_147_483;

/// ADC resolution in bits.
pub const ADC_RESOLUTION: u8 = 10;

/// Header pin wired to ADC channel 0.
pub const ADC_IN0_PIN: usize = 26;

/// Header pins with a dedicated PWM output, with their controller index.
const PWM_PINS: [(usize, u32); PWM_COUNT] = [(11, 0), (13, 1)];

/// Platform names are compared over at most this many bytes.
const MAX_NAME_CMP: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct I2cBus {
    pub bus_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpiBus {
    pub bus_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UartDevice {
    /// Kernel UART index.
    pub index: u32,
    /// Serial device node; attached only on a recognized platform.
    pub device_path: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AioDevice {
    /// Header pin carrying this ADC channel.
    pub pin: usize,
}

/// Board-wide description handed to the I/O runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardDescriptor {
    /// Model string of the detected variant, if any.
    pub platform_name: Option<&'static str>,
    pub platform_variant: Option<PlatformVariant>,
    /// Header positions plus the reserved index 0.
    pub phy_pin_count: usize,
    /// Bus pin-mux is set up by the kernel; the runtime must not re-mux.
    pub no_bus_mux: bool,
    /// GPIO is reachable through the character device interface.
    pub chardev_capable: bool,

    pub i2c_buses: Vec<I2cBus>,
    pub def_i2c_bus: usize,
    pub spi_buses: Vec<SpiBus>,
    pub def_spi_bus: usize,
    pub uart_devs: Vec<UartDevice>,
    pub def_uart_dev: usize,

    pub pwm_dev_count: usize,
    pub pwm_default_period: u32,
    pub pwm_min_period: u32,
    pub pwm_max_period: u32,

    pub aio_devs: Vec<AioDevice>,
    /// ADC channels are not numbered contiguously with the pins.
    pub aio_non_seq: bool,
    pub adc_raw: u8,
    pub adc_supported: u8,

    pub pins: Vec<PinEntry>,
}

/// Build the Vaaman board descriptor.
///
/// Detection reads `config.model_path` through `probe`. An unrecognized or
/// missing model file is not an error: platform fields stay unset and UART
/// device paths are not attached.
///
/// The descriptor owns two allocations, itself and its pin array. The
/// runtime's per-board hook table is empty for this board, so no extension
/// record is built.
///
/// # Errors
///
/// Returns [`BoardError::Allocation`] if the pin array cannot be allocated.
/// No descriptor is returned in that case.
pub fn build_board<P: SystemProbe + ?Sized>(probe: &P, config: &Config) -> Result<BoardDescriptor> {
    build_board_with(probe, config, PIN_COUNT + 1)
}

fn build_board_with<P: SystemProbe + ?Sized>(
    probe: &P,
    config: &Config,
    phy_pin_count: usize,
) -> Result<BoardDescriptor> {
    let variant = detect_variant(probe, &config.model_path);
    let platform_name = variant.map(PlatformVariant::model_name);

    let uart_devs = UART_INDICES
        .iter()
        .zip(UART_DEVICE_PATHS)
        .map(|(&index, path)| UartDevice {
            index,
            device_path: variant.map(|_| path),
        })
        .collect();

    let i2c_buses = if registers_i2c(config.i2c_policy, platform_name) {
        I2C_BUS_IDS
            .iter()
            .map(|&bus_id| I2cBus { bus_id })
            .collect()
    } else {
        if let Some(name) = platform_name {
            info!(
                platform = name,
                "I2C buses not registered under the legacy policy"
            );
        }
        Vec::new()
    };

    let spi_buses = SPI_BUS_IDS
        .iter()
        .map(|&bus_id| SpiBus { bus_id })
        .collect();

    let mut pins = allocate_pins(phy_pin_count)?;

    for (pin, parent_id) in PWM_PINS {
        if let Some(entry) = pins.get_mut(pin) {
            entry.pwm = PwmMapping {
                parent_id,
                pinmap: 0,
                mux_total: 0,
            };
        }
    }

    for row in &PIN_TABLE {
        fill_pin(
            &mut pins,
            row.index,
            row.kernel_pin,
            row.capabilities,
            row.name,
        );
    }

    let board = BoardDescriptor {
        platform_name,
        platform_variant: variant,
        phy_pin_count,
        no_bus_mux: true,
        chardev_capable: true,
        i2c_buses,
        def_i2c_bus: 0,
        spi_buses,
        def_spi_bus: 0,
        uart_devs,
        def_uart_dev: 0,
        pwm_dev_count: PWM_COUNT,
        pwm_default_period: PWM_DEFAULT_PERIOD,
        pwm_min_period: PWM_MIN_PERIOD,
        pwm_max_period: PWM_MAX_PERIOD,
        aio_devs: vec![AioDevice { pin: ADC_IN0_PIN }],
        aio_non_seq: true,
        adc_raw: ADC_RESOLUTION,
        adc_supported: ADC_RESOLUTION,
        pins,
    };

    info!(
        platform = board.platform_name.unwrap_or("unknown"),
        pins = board.phy_pin_count,
        i2c = board.i2c_bus_count(),
        spi = board.spi_bus_count(),
        uart = board.uart_dev_count(),
        "Vaaman board descriptor built"
    );
    Ok(board)
}

/// Whether the three I2C buses are registered for `platform_name`.
fn registers_i2c(policy: I2cPolicy, platform_name: Option<&str>) -> bool {
    match (policy, platform_name) {
        (I2cPolicy::Always, _) => true,
        (I2cPolicy::Legacy, Some(name)) => names_match(name, PLATFORM_NAME_VAAMAN),
        (I2cPolicy::Legacy, None) => false,
    }
}

/// Reserve and default-fill the pin array.
fn allocate_pins(count: usize) -> Result<Vec<PinEntry>> {
    let mut pins: Vec<PinEntry> = Vec::new();
    if let Err(e) = pins.try_reserve_exact(count) {
        let msg = format!("pin array of {} entries: {}", count, e);
        return Err(BoardError::Allocation(msg));
    }
    pins.resize(count, PinEntry::default());
    debug!(count, "Pin array allocated");
    Ok(pins)
}

/// Byte-wise equality over at most [`MAX_NAME_CMP`] bytes.
fn names_match(a: &str, b: &str) -> bool {
    let a = &a.as_bytes()[..a.len().min(MAX_NAME_CMP)];
    let b = &b.as_bytes()[..b.len().min(MAX_NAME_CMP)];
    a == b
}

fn out_of_range(bus: &'static str, index: usize) -> BoardError {
    BoardError::BusOutOfRange { bus, index }
}

impl BoardDescriptor {
    /// Look up an addressable pin. Index 0 is reserved and never addressable.
    pub fn pin(&self, index: usize) -> Result<&PinEntry> {
        if index == 0 {
            return Err(BoardError::InvalidPin(index));
        }
        self.pins.get(index).ok_or(BoardError::InvalidPin(index))
    }

    /// Find a pin by name or by one of its comma-separated functions
    /// (`"TXD4"` finds `"SPI1TX,TXD4"`). The lowest index wins.
    pub fn pin_by_name(&self, name: &str) -> Option<(usize, &PinEntry)> {
        self.pins
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, p)| p.name == name || p.name.split(',').any(|part| part == name))
    }

    /// Kernel GPIO addressing for a GPIO-capable pin.
    pub fn gpio(&self, index: usize) -> Result<GpioMapping> {
        let pin = self.pin(index)?;
        if !pin.capabilities.gpio {
            return Err(BoardError::MissingCapability {
                pin: index,
                capability: "gpio",
            });
        }
        Ok(pin.gpio)
    }

    /// PWM controller/channel for a PWM-capable pin.
    pub fn pwm(&self, index: usize) -> Result<PwmMapping> {
        let pin = self.pin(index)?;
        if !pin.capabilities.pwm {
            return Err(BoardError::MissingCapability {
                pin: index,
                capability: "pwm",
            });
        }
        Ok(pin.pwm)
    }

    /// Kernel bus number for logical I2C bus `bus`.
    pub fn i2c_bus_id(&self, bus: usize) -> Result<u32> {
        self.i2c_buses
            .get(bus)
            .map(|b| b.bus_id)
            .ok_or(out_of_range("i2c", bus))
    }

    /// Kernel bus number for logical SPI bus `bus`.
    pub fn spi_bus_id(&self, bus: usize) -> Result<u32> {
        self.spi_buses
            .get(bus)
            .map(|b| b.bus_id)
            .ok_or(out_of_range("spi", bus))
    }

    pub fn uart(&self, dev: usize) -> Result<&UartDevice> {
        self.uart_devs.get(dev).ok_or(out_of_range("uart", dev))
    }

    /// Header pin for ADC channel `channel`.
    pub fn aio_pin(&self, channel: usize) -> Result<usize> {
        self.aio_devs
            .get(channel)
            .map(|a| a.pin)
            .ok_or(out_of_range("aio", channel))
    }

    pub fn gpio_count(&self) -> usize {
        self.pins.iter().filter(|p| p.capabilities.gpio).count()
    }

    pub fn i2c_bus_count(&self) -> usize {
        self.i2c_buses.len()
    }

    pub fn spi_bus_count(&self) -> usize {
        self.spi_buses.len()
    }

    pub fn uart_dev_count(&self) -> usize {
        self.uart_devs.len()
    }

    pub fn aio_count(&self) -> usize {
        self.aio_devs.len()
    }
}
