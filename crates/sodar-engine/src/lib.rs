pub mod endpoint;
pub mod portal;
pub mod resolver;
pub mod session;

pub use endpoint::ResolvedEndpoint;
pub use resolver::{ResolveError, Resolver, ResolverConfig, Strategy};
pub use session::resolve_with_session;
