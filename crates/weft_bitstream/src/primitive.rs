//! The contract every configurable device primitive satisfies.
//!
//! A primitive is anything with state in the configuration bitstream: a
//! clock buffer, an I/O cell, a LUT. Each knows its identity within the
//! device (routing matrix plus index), the bit offset of its configuration
//! slice, and how to load/save its logical state from/to the bit array.
//! The codec walks primitives uniformly through this trait.

use crate::bits::Bitstream;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a primitive within its device: routing matrix and index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrimitiveId {
    /// The routing matrix the primitive belongs to.
    pub matrix: u32,
    /// The primitive's index within that matrix.
    pub index: u32,
}

impl PrimitiveId {
    /// Creates a new primitive identifier.
    pub fn new(matrix: u32, index: u32) -> Self {
        Self { matrix, index }
    }
}

impl fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.matrix, self.index)
    }
}

/// An opaque descriptor for a signal source in the routing matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceId(u32);

impl SourceId {
    /// Creates a source descriptor from a raw `u32`.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` value.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A primitive input: either a concrete source node or a power-rail tie-off.
///
/// Power rails are sentinels. `Rail(false)` is the ground tie-off, which is
/// a legal input for any primitive whether or not the catalog gives it a
/// selector encoding; `Rail(true)` is a hard 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InputSource {
    /// The output of a source node in the routing matrix.
    Node(SourceId),
    /// A power rail carrying the given constant value.
    Rail(bool),
}

impl InputSource {
    /// The ground tie-off sentinel.
    pub const GROUND: InputSource = InputSource::Rail(false);

    /// Returns `true` if this input is the grounded power rail.
    pub fn is_ground(self) -> bool {
        self == InputSource::Rail(false)
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Node(id) => write!(f, "node {id}"),
            InputSource::Rail(false) => write!(f, "ground"),
            InputSource::Rail(true) => write!(f, "vcc"),
        }
    }
}

/// Errors from loading or saving a primitive's configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The selected input is not in the primitive's legal input set (and is
    /// not the grounded rail, which is always legal).
    #[error("primitive {primitive}: invalid input {input}")]
    InvalidInput {
        /// The primitive whose save failed.
        primitive: PrimitiveId,
        /// The offending input selection.
        input: InputSource,
    },
    /// The encoded state read from the bitstream is invalid for this
    /// primitive.
    #[error("primitive {primitive}: invalid encoded state")]
    InvalidEncoding {
        /// The primitive whose load failed.
        primitive: PrimitiveId,
    },
    /// A bitstream of the wrong length was offered to the codec.
    #[error("bitstream length mismatch: device has {expected} bits, got {actual}")]
    LengthMismatch {
        /// The device's configuration length in bits.
        expected: usize,
        /// The length of the offered bitstream.
        actual: usize,
    },
}

/// A configurable device primitive.
///
/// Implementations read and write only their own slice of the bitstream,
/// positioned relative to [`config_base`](Self::config_base). Slices of
/// distinct primitives are disjoint by catalog construction; the codec does
/// not re-check this at runtime.
pub trait Primitive {
    /// Returns this primitive's identity within the device.
    fn id(&self) -> PrimitiveId;

    /// Returns the absolute bit offset of this primitive's configuration
    /// slice.
    fn config_base(&self) -> usize;

    /// Populates logical state from the primitive's slice of `bits`.
    ///
    /// Fails only if the encoded state is invalid for this primitive;
    /// unrecognized-but-harmless encodings leave the state at its default.
    fn load(&mut self, bits: &Bitstream) -> Result<(), ConfigError>;

    /// Writes the primitive's slice of `bits` from its logical state.
    ///
    /// Fails if the logical state is inconsistent — for example an input
    /// outside the legal set that is not the always-legal ground rail.
    fn save(&self, bits: &mut Bitstream) -> Result<(), ConfigError>;
}
