pub mod tracing;

pub use self::tracing::{TracingConfig, TracingGuard, init_tracing};
