//! Scalar backend implementation
//!
//! This backend reduces packs lane by lane and works for every element type.

use crate::primitives::ComputePrimitives;
use crate::Element;

/// Scalar backend - works for all element types
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarBackend;

impl ScalarBackend {
    pub fn new() -> Self {
        Self
    }
}

// Generic implementation for all types
impl<T: Element> ComputePrimitives<T> for ScalarBackend {
    fn backend_name(&self) -> &'static str {
        "scalar"
    }

    // All operations use the default implementations from the trait
}
