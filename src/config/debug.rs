//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep the noisy ones `false` so that
//! debug builds stay readable. Every flag is only consulted under
//! `cfg(debug_assertions)`.

pub struct DebugFlags {
    /// Log every pair that fails to align on an update.
    pub print_alignment_misses: bool,
    /// Log every channel value handed to the publish sink.
    pub print_publish: bool,
    /// Log symbol resolution and history fetches during init.
    pub print_init: bool,
    /// Emit serialization/deserialization logs for the series cache.
    pub print_serde: bool,
    /// Emit details of viewer state persistence.
    pub print_state_serde: bool,
    /// Emit shutdown messages.
    pub print_shutdown: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_alignment_misses: false,
    print_publish: false,
    print_init: true,
    print_serde: false,
    print_state_serde: false,
    print_shutdown: false,
};
