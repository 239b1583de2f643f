pub mod backend;
pub mod config;

pub use backend::{Backend, BackendError, ElementId, NavigationResult};
pub use config::SessionConfig;
