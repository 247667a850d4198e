// Service module - SERIALIZED FRONT
// Single-writer actor that owns the marketplace; every mutation and query
// is applied by one worker task, so purchases never interleave

mod runtime;

pub use runtime::{MarketHandle, MarketRuntime, ServiceError};
