//! Pin table -- per-pin capabilities and kernel GPIO addressing.
//!
//! The 40-pin header layout is a static table of [`PinRow`]s, written into
//! the descriptor's pin array one row at a time by [`fill_pin`]. Logical
//! index 0 is a placeholder so that logical indices match header positions.
//!
//! Kernel GPIO numbers map to a chip/line pair by fixed 32-line banks:
//! `chip = pin / 32`, `line = pin % 32`.

use serde::Serialize;
use tracing::debug;

/// Size of a pin name field, including the terminator slot.
pub const PIN_NAME_SIZE: usize = 12;

/// GPIO lines per kernel GPIO chip.
pub const LINES_PER_CHIP: u32 = 32;

/// Which subsystems may address a pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PinCapabilities {
    /// Pin exists on the header (includes power and ground).
    pub valid: bool,
    pub gpio: bool,
    pub pwm: bool,
    pub fast_gpio: bool,
    pub spi: bool,
    pub i2c: bool,
    pub aio: bool,
    pub uart: bool,
}

impl PinCapabilities {
    /// No capabilities at all.
    pub const NONE: Self = Self {
        valid: false,
        gpio: false,
        pwm: false,
        fast_gpio: false,
        spi: false,
        i2c: false,
        aio: false,
        uart: false,
    };

    /// Valid header position with no I/O function (power, ground).
    pub const POWER: Self = Self {
        valid: true,
        ..Self::NONE
    };

    /// Plain GPIO.
    pub const GPIO: Self = Self {
        gpio: true,
        ..Self::POWER
    };

    pub const fn with_pwm(self) -> Self {
        Self { pwm: true, ..self }
    }

    pub const fn with_spi(self) -> Self {
        Self { spi: true, ..self }
    }

    pub const fn with_i2c(self) -> Self {
        Self { i2c: true, ..self }
    }

    pub const fn with_aio(self) -> Self {
        Self { aio: true, ..self }
    }

    pub const fn with_uart(self) -> Self {
        Self { uart: true, ..self }
    }

    /// Compact flag string, one letter per set capability
    /// (`G`pio, `P`wm, `F`ast, `S`pi, `I`2c, `A`io, `U`art).
    pub fn letters(&self) -> String {
        [
            (self.gpio, 'G'),
            (self.pwm, 'P'),
            (self.fast_gpio, 'F'),
            (self.spi, 'S'),
            (self.i2c, 'I'),
            (self.aio, 'A'),
            (self.uart, 'U'),
        ]
        .iter()
        .filter_map(|&(set, c)| set.then_some(c))
        .collect()
    }
}

/// Kernel GPIO addressing for one pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GpioMapping {
    /// Raw kernel (sysfs) pin number, when the pin is GPIO-capable.
    pub pinmap: Option<u32>,
    pub chip: u32,
    pub line: u32,
    /// Alternate pin-mux steps; always 0 on this board.
    pub mux_total: u8,
}

impl GpioMapping {
    /// Derive chip and line from a kernel pin number.
    pub fn from_kernel_pin(pin: u32) -> Self {
        Self {
            pinmap: Some(pin),
            chip: pin / LINES_PER_CHIP,
            line: pin % LINES_PER_CHIP,
            mux_total: 0,
        }
    }
}

/// PWM controller/channel addressing for one pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PwmMapping {
    /// PWM controller (pwmchip) index.
    pub parent_id: u32,
    /// Channel within the controller.
    pub pinmap: u32,
    pub mux_total: u8,
}

/// One physical pin as seen by the I/O runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PinEntry {
    pub name: String,
    pub capabilities: PinCapabilities,
    pub gpio: GpioMapping,
    pub pwm: PwmMapping,
}

/// One row of the static pin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinRow {
    pub index: usize,
    /// Kernel GPIO number; `None` for power, ground and non-GPIO pins.
    pub kernel_pin: Option<u32>,
    pub capabilities: PinCapabilities,
    pub name: &'static str,
}

const fn row(
    index: usize,
    kernel_pin: Option<u32>,
    capabilities: PinCapabilities,
    name: &'static str,
) -> PinRow {
    PinRow {
        index,
        kernel_pin,
        capabilities,
        name,
    }
}

const NONE: PinCapabilities = PinCapabilities::NONE;
const POWER: PinCapabilities = PinCapabilities::POWER;
const GPIO: PinCapabilities = PinCapabilities::GPIO;

/// The Vaaman 40-pin header, index 0 through 40, in ascending order.
pub const PIN_TABLE: [PinRow; 41] = [
    row(0, None, NONE, "INVALID"),
    row(1, None, POWER, "3V3"),
    row(2, None, POWER, "5V"),
    row(3, Some(71), GPIO.with_i2c(), "SDA7"),
    row(4, None, POWER, "5V"),
    row(5, Some(72), GPIO.with_i2c(), "SCL7"),
    row(6, None, POWER, "GND"),
    row(7, Some(75), GPIO.with_spi(), "SPI2_CLK"),
    row(8, Some(148), GPIO.with_uart(), "TXD2"),
    row(9, None, POWER, "GND"),
    row(10, Some(147), GPIO.with_uart(), "RXD2"),
    row(11, Some(146), GPIO.with_pwm(), "PWM0"),
    row(12, Some(131), GPIO, "GPIO4_A3"),
    row(13, Some(150), GPIO.with_pwm(), "PWM1"),
    row(14, None, POWER, "GND"),
    row(15, Some(149), GPIO, "GPIO4_C5"),
    row(16, Some(154), GPIO, "GPIO4_D2"),
    row(17, None, POWER, "3V3"),
    row(18, Some(156), GPIO, "GPIO4_D4"),
    row(19, Some(40), GPIO.with_spi().with_uart(), "SPI1TX,TXD4"),
    row(20, None, POWER, "GND"),
    row(21, Some(39), GPIO.with_spi().with_uart(), "SPI1RX,RXD4"),
    row(22, Some(157), GPIO, "GPIO4_D5"),
    row(23, Some(41), GPIO.with_spi(), "SPI1CLK"),
    row(24, Some(42), GPIO.with_spi(), "SPI1CS"),
    row(25, None, POWER, "GND"),
    row(26, None, POWER.with_aio(), "ADC_IN0"),
    row(27, Some(64), GPIO.with_i2c(), "SDA2"),
    row(28, Some(65), GPIO.with_i2c(), "SCL2"),
    row(29, Some(74), GPIO.with_spi().with_i2c(), "SCL6,SPI2RX"),
    row(30, None, POWER, "GND"),
    row(31, Some(73), GPIO.with_spi().with_i2c(), "SDA6,SPI2TX"),
    row(32, Some(112), GPIO, "GPIO3_C0"),
    row(33, Some(76), GPIO.with_spi(), "SPI2CS"),
    row(34, None, POWER, "GND"),
    row(35, Some(133), GPIO, "GPIO4_A5"),
    row(36, Some(132), GPIO, "GPIO4_A4"),
    row(37, Some(158), GPIO, "GPIO4_D6"),
    row(38, Some(134), GPIO, "GPIO4_A6"),
    row(39, None, POWER, "GND"),
    row(40, Some(135), GPIO, "GPIO4_A7"),
];

/// Truncate `name` to fit a [`PIN_NAME_SIZE`] field, on a char boundary.
pub fn truncate_name(name: &str) -> &str {
    let max = PIN_NAME_SIZE - 1;
    if name.len() <= max {
        return name;
    }
    let mut end = max;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// Write one pin entry.
///
/// An `index` outside `pins` is ignored. GPIO addressing is derived only for
/// GPIO-capable pins that carry a kernel pin number; otherwise it is left as
/// it was. PWM mapping is never touched.
pub fn fill_pin(
    pins: &mut [PinEntry],
    index: usize,
    kernel_pin: Option<u32>,
    capabilities: PinCapabilities,
    name: &str,
) {
    let Some(entry) = pins.get_mut(index) else {
        debug!(
            index,
            pin_count = pins.len(),
            "Pin index out of range, skipped"
        );
        return;
    };

    entry.name = truncate_name(name).to_string();

    if capabilities.gpio {
        if let Some(pin) = kernel_pin {
            entry.gpio = GpioMapping::from_kernel_pin(pin);
        }
    }

    entry.capabilities = capabilities;
    entry.gpio.mux_total = 0;
    debug!(index, name = %entry.name, kernel_pin = ?kernel_pin, "Pin filled");
}
