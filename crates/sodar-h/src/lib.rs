//! Headless Chromium backend over CDP. Requires a Chromium/Chrome binary
//! discoverable via `CHROME_BIN`, `$PATH`, or a well-known install path.

pub mod backend;
pub mod cdp;
pub mod discover;

pub use backend::HeadlessBackend;
