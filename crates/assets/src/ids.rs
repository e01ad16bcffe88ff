//! Typed record identifiers.
//!
//! The source format links records through plain `u64` path ids where `0`
//! means "no reference". Each record family gets its own newtype so an
//! object id can never be looked up in the transform table by accident.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Interpret a raw reference, mapping `0` to `None`.
            #[inline]
            pub fn from_raw(raw: u64) -> Option<Self> {
                (raw != 0).then_some(Self(raw))
            }

            #[inline]
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id! {
    /// Identifier of an [`crate::ObjectRecord`].
    ObjectId
}

record_id! {
    /// Identifier of a [`crate::TransformRecord`].
    TransformId
}

record_id! {
    /// Identifier of a [`crate::RendererRecord`].
    RendererId
}

record_id! {
    /// Identifier of a [`crate::SpriteAsset`].
    SpriteId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_no_reference() {
        assert_eq!(SpriteId::from_raw(0), None);
        assert_eq!(SpriteId::from_raw(42), Some(SpriteId(42)));
    }
}
