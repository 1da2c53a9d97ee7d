//! Static hardware description of the Vicharak RK3399 Vaaman board.
//!
//! - **Board** (`board`): descriptor builder, the 40-pin table and lookups
//! - **Platform** (`platform`): Android/Linux build detection from the device tree
//! - **Config** (`config`): model-file location and I2C registration policy
//!
//! ```
//! use vaaman::{build_board, Config, FsProbe};
//!
//! let board = build_board(&FsProbe, &Config::default()).unwrap();
//! assert_eq!(board.pin(11).unwrap().name, "PWM0");
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod platform;

pub use board::{build_board, BoardDescriptor, PinCapabilities, PinEntry};
pub use config::{Config, I2cPolicy};
pub use error::{BoardError, Result};
pub use platform::{FsProbe, PlatformVariant, SystemProbe};
