//! Diagnostic codes with category prefixes.
//!
//! Every diagnostic the core emits falls into one of four categories, which
//! must stay distinguishable to callers: feasibility (sanity) failures,
//! routability failures, primitive configuration failures, and internal
//! invariant reports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Design feasibility (sanity check) diagnostics, prefixed with `S`.
    Sanity,
    /// Routability diagnostics, prefixed with `R`.
    Route,
    /// Primitive / bitstream configuration diagnostics, prefixed with `C`.
    Config,
    /// Internal invariant diagnostics, prefixed with `X`.
    Internal,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Sanity => 'S',
            Category::Route => 'R',
            Category::Config => 'C',
            Category::Internal => 'X',
        }
    }
}

/// A category prefix plus a numeric identifier, displayed as e.g. `S002`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
