//! Field resolution along a type's embedding chain.

use env_override_shared::{FieldDescriptor, TypeSchema};
use std::collections::BTreeSet;

/// Where a property name landed in the embedding chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// The matched field.
    pub descriptor: &'static FieldDescriptor,
    /// Name of the type that declares the field.
    pub owner: &'static str,
    /// Number of parent links walked from the root type (0 = own field).
    pub depth: usize,
}

/// Find `property` on the root type or, failing that, on each embedded
/// parent in turn. Returns `None` once the chain is exhausted.
pub fn resolve(root: &TypeSchema, property: &str) -> Option<Resolution> {
    root.chain().enumerate().find_map(|(depth, schema)| {
        schema.own_field(property).map(|descriptor| Resolution {
            descriptor,
            owner: schema.type_name(),
            depth,
        })
    })
}

/// Fields written during one override pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionRecord {
    written: BTreeSet<(usize, &'static str)>,
}

impl ResolutionRecord {
    /// Record a written field.
    pub fn insert(&mut self, resolution: &Resolution) {
        self.written
            .insert((resolution.depth, resolution.descriptor.property()));
    }

    /// Whether one of the root type's own fields was written.
    #[must_use]
    pub fn contains_own(&self, descriptor: &FieldDescriptor) -> bool {
        self.written.contains(&(0, descriptor.property()))
    }

    /// Number of distinct fields written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.written.len()
    }

    /// Whether nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }
}
