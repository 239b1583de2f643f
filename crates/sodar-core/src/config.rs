use serde::{Deserialize, Serialize};

/// Capabilities for one browser session. The headless flag is the only
/// caller-facing knob; everything else is fixed for predictable rendering
/// (sandbox off, GPU off, fixed viewport, no extensions). Image loading is
/// disabled only in headless mode so visible-debug sessions show real pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
        }
    }
}

impl SessionConfig {
    /// Headed session for watching the extraction flow during debugging.
    pub fn visible() -> Self {
        Self {
            headless: false,
            ..Self::default()
        }
    }

    /// True when image loading should be suppressed for speed.
    pub fn block_images(&self) -> bool {
        self.headless
    }
}
