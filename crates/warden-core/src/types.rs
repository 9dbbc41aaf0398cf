//! Core types used throughout Warden

use serde::{Deserialize, Serialize};

/// Handle to a character body owned by a motion backend.
///
/// Positions live in the backend; game logic only keeps the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl BodyId {
    /// Raw index of this body
    pub fn index(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_id_display() {
        assert_eq!(BodyId(7).to_string(), "body#7");
        assert_eq!(BodyId(7).index(), 7);
    }
}
