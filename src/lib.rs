// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod aggregate;
pub mod compare;
pub mod corpus;
pub mod generator;
pub mod metrics;
pub mod runtime;
pub mod sampler;
pub mod session;
pub mod store;
pub mod util;

/// Cadence of the sampling loop driven by the binary (1 Hz).
pub const TICK_RATE_MS: u64 = 1000;
