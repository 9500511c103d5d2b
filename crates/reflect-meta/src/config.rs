// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry configuration.
//!
//! Build policies applied by every [`MetadataBuilder`](crate::MetadataBuilder)
//! a [`Registry`](crate::Registry) runs. Duplicate field names are always
//! rejected; the knobs below only cover attribute handling.
//!
//! # Example
//!
//! ```
//! use reflect_meta::{DanglingAttributes, Registry, RegistryConfig};
//!
//! let registry = Registry::with_config(
//!     RegistryConfig::default().with_dangling_attributes(DanglingAttributes::Reject),
//! );
//! assert_eq!(registry.config().dangling_attributes, DanglingAttributes::Reject);
//! ```

/// What to do when two attributes of the same type land on one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateAttributes {
    /// Fail the build with `DuplicateAttribute`.
    #[default]
    Reject,
    /// Keep the first one, drop later ones.
    KeepFirst,
}

/// What to do with attributes still pending when a build finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DanglingAttributes {
    /// Drop them (logged at `warn`).
    #[default]
    Discard,
    /// Fail the build with `DanglingAttributes`.
    Reject,
}

/// Registry-wide build policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryConfig {
    pub duplicate_attributes: DuplicateAttributes,
    pub dangling_attributes: DanglingAttributes,
}

impl RegistryConfig {
    /// Reject every ambiguous registration.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            duplicate_attributes: DuplicateAttributes::Reject,
            dangling_attributes: DanglingAttributes::Reject,
        }
    }

    #[must_use]
    pub const fn with_duplicate_attributes(mut self, policy: DuplicateAttributes) -> Self {
        self.duplicate_attributes = policy;
        self
    }

    #[must_use]
    pub const fn with_dangling_attributes(mut self, policy: DanglingAttributes) -> Self {
        self.dangling_attributes = policy;
        self
    }
}
