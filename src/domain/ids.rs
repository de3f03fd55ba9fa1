//! Opaque identifiers linking engraved elements back to source entities.
//!
//! §9 Design Notes: "Notes reference source identifiers by opaque handle
//! (e.g., UUID), not by pointer; ownership of the source score remains with
//! the caller." Mirrors the teacher's `domain::ids` shape (newtype over
//! `uuid::Uuid`, `Display`, cheap `Copy`).

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! opaque_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

opaque_id!(PartId);
opaque_id!(MeasureId);
opaque_id!(NoteId);
