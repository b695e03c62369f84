//! Configuration resolution: explicit flag, then environment, then default.

use std::path::PathBuf;

pub const ENV_ADAPTER_ADDR: &str = "VARLENS_DAP_ADDR";
pub const ENV_SCRIPT_DIR: &str = "VARLENS_SCRIPT_DIR";
pub const ENV_OUTPUT_DIR: &str = "VARLENS_OUT_DIR";

/// Resolve the debug adapter endpoint. `None` means there is no session to
/// capture from — the caller surfaces that as `NoActiveSession`.
pub fn resolve_adapter_addr(explicit: Option<&str>) -> Option<String> {
    if let Some(addr) = explicit {
        return Some(addr.to_string());
    }
    std::env::var(ENV_ADAPTER_ADDR).ok()
}

/// Resolve the companion-script directory. Defaults to a `python/` directory
/// shipped beside the executable.
pub fn resolve_script_dir(explicit: Option<&str>) -> PathBuf {
    if let Some(dir) = explicit {
        return PathBuf::from(dir);
    }
    if let Ok(dir) = std::env::var(ENV_SCRIPT_DIR) {
        return PathBuf::from(dir);
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|d| d.join("python")))
        .unwrap_or_else(|| PathBuf::from("python"))
}

/// Resolve the directory receiving the companion script's output files.
pub fn resolve_output_dir(explicit: Option<&str>) -> PathBuf {
    if let Some(dir) = explicit {
        return PathBuf::from(dir);
    }
    if let Ok(dir) = std::env::var(ENV_OUTPUT_DIR) {
        return PathBuf::from(dir);
    }
    std::env::temp_dir().join("varlens")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_values_win() {
        assert_eq!(
            resolve_adapter_addr(Some("127.0.0.1:5678")).as_deref(),
            Some("127.0.0.1:5678")
        );
        assert_eq!(
            resolve_script_dir(Some("/opt/varlens/python")),
            PathBuf::from("/opt/varlens/python")
        );
        assert_eq!(
            resolve_output_dir(Some("/tmp/custom")),
            PathBuf::from("/tmp/custom")
        );
    }

    #[test]
    fn output_dir_defaults_under_temp() {
        let dir = resolve_output_dir(None);
        if std::env::var(ENV_OUTPUT_DIR).is_err() {
            assert!(dir.ends_with("varlens"));
        }
    }
}
