//! Emitter identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one running emitter instance.
///
/// Ids are handed out from a monotonically increasing counter and never
/// reused while the process runs. A particle's attached-emitter channel
/// stores one of these as a weak reference: the child emitter manages its
/// own lifetime, so lookups must tolerate an id that is no longer active.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmitterId(pub u64);

impl EmitterId {
    /// Sentinel for "no emitter": returned by failed starts and used as the
    /// attached-emitter channel default.
    pub const INVALID: Self = Self(u64::MAX);

    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for EmitterId {
    /// Channels default to "no attached emitter"
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Debug for EmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "EmitterId({})", self.0)
        } else {
            write!(f, "EmitterId(invalid)")
        }
    }
}

impl fmt::Display for EmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
