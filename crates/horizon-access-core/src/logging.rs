//! Tracing target names.
//!
//! Horizon Access emits structured events through the `tracing` crate and
//! never installs a subscriber itself. Use these targets in filter
//! directives to select a subsystem, for example
//! `RUST_LOG=horizon_access::bridge=debug`.

/// Target names for log filtering.
pub mod targets {
    /// Handle lifecycle (build, add, push, drop).
    pub const LIFECYCLE: &str = "horizon_access_core::lifecycle";
    /// Live tree maintenance in the platform adapter.
    pub const ADAPTER: &str = "horizon_access::adapter";
    /// Virtual-view queries and actions.
    pub const BRIDGE: &str = "horizon_access::bridge";
    /// Integer-handle binding table.
    pub const BINDINGS: &str = "horizon_access::bindings";
    /// Configuration loading.
    pub const CONFIG: &str = "horizon_access::config";
}
