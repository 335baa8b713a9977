use once_cell::sync::Lazy;
use std::path::PathBuf;

static DEFAULT_DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    dirs::data_local_dir()
        .map(|p| p.join("kontent"))
        .unwrap_or_else(|| PathBuf::from("~/.local/share/kontent"))
});

static DEFAULT_CONFIG_DIR: Lazy<PathBuf> = Lazy::new(|| {
    dirs::config_dir()
        .map(|p| p.join("kontent"))
        .unwrap_or_else(|| PathBuf::from("~/.config/kontent"))
});

/// Expands a leading `~` in `path`.
pub(crate) fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

pub fn get_config_dir() -> PathBuf {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config_home).join("kontent")
    } else {
        expand_path(&DEFAULT_CONFIG_DIR.to_string_lossy())
    }
}

pub fn get_data_dir() -> std::io::Result<PathBuf> {
    let path = if let Ok(xdg_data_home) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg_data_home).join("kontent")
    } else {
        expand_path(&DEFAULT_DATA_DIR.to_string_lossy())
    };
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

pub fn get_default_config() -> String {
    include_str!("../data/config.yml").to_string()
}
