//! Locating the Chromium binary. Order: `CHROME_BIN` override, then each
//! `$PATH` entry, then a fixed list of install locations. No launch is
//! attempted when nothing is found.

use std::env;
use std::path::PathBuf;

const BINARY_NAMES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
];

const INSTALL_PATHS: &[&str] = &[
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/opt/google/chrome/chrome",
    "/snap/bin/chromium",
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

pub fn chromium_binary() -> Option<PathBuf> {
    if let Ok(path) = env::var("CHROME_BIN") {
        tracing::info!("Using Chromium binary from CHROME_BIN: {}", path);
        return Some(PathBuf::from(path));
    }
    if let Some(path) = search_path() {
        tracing::info!("Found Chromium on PATH: {}", path.display());
        return Some(path);
    }
    let fallback = first_existing(INSTALL_PATHS.iter().map(PathBuf::from));
    if let Some(path) = &fallback {
        tracing::info!("Found Chromium at install path: {}", path.display());
    }
    fallback
}

fn search_path() -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    first_existing(
        env::split_paths(&path)
            .flat_map(|dir| BINARY_NAMES.iter().map(move |name| dir.join(name))),
    )
}

fn first_existing(candidates: impl Iterator<Item = PathBuf>) -> Option<PathBuf> {
    candidates.into_iter().find(|p| p.is_file())
}
