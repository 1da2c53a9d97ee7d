//! Platform detection -- which Vaaman build is running.
//!
//! Both variants run on identical hardware; they differ only in the model
//! string the kernel exposes through the device tree. The model file is read
//! through the [`SystemProbe`] trait so board construction can be exercised
//! without a real `/proc/device-tree`.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

/// Device tree root on a modern kernel.
pub const DT_BASE: &str = "/proc/device-tree";

/// Default location of the platform model string.
pub const DEFAULT_MODEL_PATH: &str = "/proc/device-tree/model";

/// Model string reported by the Android build.
pub const PLATFORM_NAME_VAAMAN_ANDROID: &str = "Vicharak RK3399 VAAMAN VO.3 ANDROID";

/// Model string reported by the Linux build.
pub const PLATFORM_NAME_VAAMAN_LINUX: &str = "Vicharak RK3399 VAAMAN VO.3 LINUX";

/// Generic board family name. Neither detected variant reports it.
pub const PLATFORM_NAME_VAAMAN: &str = "Vicharak RK3399 VAAMAN";

/// Read-only view of the system description files.
#[cfg_attr(test, mockall::automock)]
pub trait SystemProbe {
    /// Returns `true` if `path` exists.
    fn file_exists(&self, path: &Path) -> bool;

    /// Returns `true` if the content of `path` contains `needle`.
    ///
    /// Unreadable files never match.
    fn file_contains(&self, path: &Path, needle: &str) -> bool;
}

/// [`SystemProbe`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl SystemProbe for FsProbe {
    fn file_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn file_contains(&self, path: &Path, needle: &str) -> bool {
        // Device tree strings carry a trailing NUL, so read bytes rather than
        // insisting on clean UTF-8.
        match std::fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).contains(needle),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Cannot read system description file");
                false
            }
        }
    }
}

/// The two recognized builds of the Vaaman board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformVariant {
    Android,
    Linux,
}

impl PlatformVariant {
    /// Model string recorded as the board's platform name.
    pub fn model_name(self) -> &'static str {
        match self {
            Self::Android => PLATFORM_NAME_VAAMAN_ANDROID,
            Self::Linux => PLATFORM_NAME_VAAMAN_LINUX,
        }
    }
}

/// Detect the running variant from the model file at `model_path`.
///
/// Android is checked before Linux and the first match wins. Returns `None`
/// when the file is missing or matches neither model string.
pub fn detect_variant<P: SystemProbe + ?Sized>(
    probe: &P,
    model_path: &Path,
) -> Option<PlatformVariant> {
    if !probe.file_exists(model_path) {
        info!(path = %model_path.display(), "Platform model file not found");
        return None;
    }

    let variant = [PlatformVariant::Android, PlatformVariant::Linux]
        .into_iter()
        .find(|v| probe.file_contains(model_path, v.model_name()));

    match variant {
        Some(v) => info!(model = v.model_name(), "Detected Vaaman platform"),
        None => warn!(path = %model_path.display(), "Unrecognized platform model"),
    }
    variant
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn model_path() -> PathBuf {
        PathBuf::from(DEFAULT_MODEL_PATH)
    }

    #[test]
    fn test_default_model_path_under_dt_base() {
        assert_eq!(DEFAULT_MODEL_PATH, format!("{}/model", DT_BASE));
    }

    #[test]
    fn test_model_names_distinct_from_generic() {
        assert_ne!(PlatformVariant::Android.model_name(), PLATFORM_NAME_VAAMAN);
        assert_ne!(PlatformVariant::Linux.model_name(), PLATFORM_NAME_VAAMAN);
    }

    #[test]
    fn test_detect_missing_file_skips_content_checks() {
        let mut probe = MockSystemProbe::new();
        probe.expect_file_exists().times(1).return_const(false);
        probe.expect_file_contains().never();

        assert_eq!(detect_variant(&probe, &model_path()), None);
    }

    #[test]
    fn test_detect_android() {
        let mut probe = MockSystemProbe::new();
        probe.expect_file_exists().return_const(true);
        probe
            .expect_file_contains()
            .withf(|_, needle| needle == PLATFORM_NAME_VAAMAN_ANDROID)
            .times(1)
            .return_const(true);

        assert_eq!(
            detect_variant(&probe, &model_path()),
            Some(PlatformVariant::Android)
        );
    }

    #[test]
    fn test_detect_linux_after_android_miss() {
        let mut probe = MockSystemProbe::new();
        probe.expect_file_exists().return_const(true);
        probe
            .expect_file_contains()
            .withf(|_, needle| needle == PLATFORM_NAME_VAAMAN_ANDROID)
            .times(1)
            .return_const(false);
        probe
            .expect_file_contains()
            .withf(|_, needle| needle == PLATFORM_NAME_VAAMAN_LINUX)
            .times(1)
            .return_const(true);

        assert_eq!(
            detect_variant(&probe, &model_path()),
            Some(PlatformVariant::Linux)
        );
    }

    #[test]
    fn test_detect_unrecognized() {
        let mut probe = MockSystemProbe::new();
        probe.expect_file_exists().return_const(true);
        probe.expect_file_contains().times(2).return_const(false);

        assert_eq!(detect_variant(&probe, &model_path()), None);
    }

    #[test]
    fn test_fs_probe_reads_nul_terminated_model() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("model");
        std::fs::write(&path, b"Vicharak RK3399 VAAMAN VO.3 LINUX\0").unwrap();

        let probe = FsProbe;
        assert!(probe.file_exists(&path));
        assert!(probe.file_contains(&path, PLATFORM_NAME_VAAMAN_LINUX));
        assert!(!probe.file_contains(&path, PLATFORM_NAME_VAAMAN_ANDROID));
        assert_eq!(detect_variant(&probe, &path), Some(PlatformVariant::Linux));
    }

    #[test]
    fn test_fs_probe_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("absent");

        let probe = FsProbe;
        assert!(!probe.file_exists(&path));
        assert!(!probe.file_contains(&path, "anything"));
    }

    #[test]
    fn test_variant_serialize() {
        let json = serde_json::to_value(PlatformVariant::Android).unwrap();
        assert_eq!(json, "android");
    }
}
