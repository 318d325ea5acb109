use serde::{Deserialize, Serialize};
use validator::Validate;

/// Configuration for a single VM. These are guard rails, not semantics:
/// any program that stays under the limits behaves identically under any
/// config.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CastConfig {
    /// Maximum number of iotas the stack may hold at once. A cast that
    /// exceeds this aborts with an error rather than a mishap, since
    /// blowing the stack is a host-level concern, not program-level.
    #[validate(range(min = 1))]
    pub max_stack_depth: usize,

    /// Maximum number of continuation frames pending at once. Deeply
    /// nested Hermes/Thoth towers hit this before they hit real memory
    /// limits.
    #[validate(range(min = 1))]
    pub max_frame_depth: usize,

    /// Total frame-evaluation budget for one [run](crate::CastVm::run).
    /// This is the backstop against non-terminating programs; a
    /// continuation that jumps backwards can otherwise loop forever.
    #[validate(range(min = 1))]
    pub max_steps: u64,
}

impl Default for CastConfig {
    fn default() -> Self {
        // Generous enough that no reasonable program notices the limits
        Self {
            max_stack_depth: 1024,
            max_frame_depth: 256,
            max_steps: 65_536,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CastConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_limits_are_invalid() {
        let config = CastConfig {
            max_steps: 0,
            ..CastConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
