//! End-to-end board construction against model files on disk.

use std::path::Path;

use tempfile::TempDir;
use vaaman::board::{PIN_TABLE, UART_DEVICE_PATHS};
use vaaman::platform::{PLATFORM_NAME_VAAMAN_ANDROID, PLATFORM_NAME_VAAMAN_LINUX};
use vaaman::{build_board, BoardError, Config, FsProbe, I2cPolicy, PlatformVariant};

fn config_for(model_path: &Path) -> Config {
    Config {
        model_path: model_path.to_path_buf(),
        ..Config::default()
    }
}

fn write_model(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("model");
    std::fs::write(&path, format!("{}\0", content)).unwrap();
    path
}

#[test]
fn test_linux_model_file() {
    let tmp = TempDir::new().unwrap();
    let path = write_model(&tmp, PLATFORM_NAME_VAAMAN_LINUX);

    let board = build_board(&FsProbe, &config_for(&path)).unwrap();
    assert_eq!(board.platform_variant, Some(PlatformVariant::Linux));
    assert_eq!(board.platform_name, Some(PLATFORM_NAME_VAAMAN_LINUX));
    for (dev, expected) in board.uart_devs.iter().zip(UART_DEVICE_PATHS) {
        assert_eq!(dev.device_path, Some(expected));
    }
}

#[test]
fn test_android_model_file() {
    let tmp = TempDir::new().unwrap();
    let path = write_model(&tmp, PLATFORM_NAME_VAAMAN_ANDROID);

    let board = build_board(&FsProbe, &config_for(&path)).unwrap();
    assert_eq!(board.platform_variant, Some(PlatformVariant::Android));
}

#[test]
fn test_absent_model_file_still_builds() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("model");
    let board = build_board(&FsProbe, &config_for(&path)).unwrap();

    assert_eq!(board.platform_name, None);
    let indices: Vec<u32> = board.uart_devs.iter().map(|u| u.index).collect();
    assert_eq!(indices, vec![2, 4]);
    assert_eq!(board.i2c_bus_count(), 0);
    assert_eq!(board.pins.len(), PIN_TABLE.len());
}

#[test]
fn test_two_builds_are_independent() {
    let tmp = TempDir::new().unwrap();
    let path = write_model(&tmp, PLATFORM_NAME_VAAMAN_LINUX);
    let config = config_for(&path);

    let first = build_board(&FsProbe, &config).unwrap();
    let mut second = build_board(&FsProbe, &config).unwrap();
    assert_eq!(first, second);

    second.pins.clear();
    assert_eq!(first.pins.len(), 41);
}

#[test]
fn test_always_policy_registers_i2c() {
    let tmp = TempDir::new().unwrap();
    let path = write_model(&tmp, PLATFORM_NAME_VAAMAN_LINUX);
    let config = Config {
        i2c_policy: I2cPolicy::Always,
        ..config_for(&path)
    };

    let board = build_board(&FsProbe, &config).unwrap();
    let ids: Vec<u32> = (0..board.i2c_bus_count())
        .map(|bus| board.i2c_bus_id(bus).unwrap())
        .collect();
    assert_eq!(ids, vec![7, 2, 6]);
}

#[test]
fn test_lookup_errors() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("model");
    let board = build_board(&FsProbe, &config_for(&path)).unwrap();

    assert!(matches!(board.pin(0), Err(BoardError::InvalidPin(0))));
    let err = board.uart(2).unwrap_err();
    assert!(matches!(err, BoardError::BusOutOfRange { bus: "uart", .. }));
    assert_eq!(board.gpio(40).unwrap().pinmap, Some(135));
}
