//! The muxed clock buffer, the canonical mux-select primitive.
//!
//! A mux-select primitive picks one of up to `2^K` legal input sources and
//! encodes the choice as a K-bit selector in its configuration slice. The
//! clock buffer is the canonical instance (K = 2 on the sampled device),
//! but the width generalizes.

use crate::bits::Bitstream;
use crate::primitive::{ConfigError, InputSource, Primitive, PrimitiveId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A clock buffer fed through a configurable input mux.
///
/// `inputs` maps each legal source to its selector value; `input` is the
/// current selection and starts at the ground rail, which is a legal
/// tie-off whether or not ground has a selector of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuxedClockBuffer {
    id: PrimitiveId,
    config_base: usize,
    select_bits: u32,
    /// Serialized as a pair list; structured map keys do not survive every
    /// serde format.
    #[serde(with = "inputs_as_pairs")]
    inputs: BTreeMap<InputSource, u32>,
    input: InputSource,
}

mod inputs_as_pairs {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<InputSource, u32>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let pairs: Vec<(InputSource, u32)> = map.iter().map(|(&k, &v)| (k, v)).collect();
        pairs.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<InputSource, u32>, D::Error> {
        let pairs = Vec::<(InputSource, u32)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

impl MuxedClockBuffer {
    /// Creates a buffer whose K-bit selector starts at bit `config_base`.
    ///
    /// The new buffer has no legal inputs registered and is grounded.
    pub fn new(id: PrimitiveId, config_base: usize, select_bits: u32) -> Self {
        Self {
            id,
            config_base,
            select_bits,
            inputs: BTreeMap::new(),
            input: InputSource::GROUND,
        }
    }

    /// Registers `source` as a legal input encoded by `muxsel`.
    ///
    /// # Panics
    ///
    /// Panics if `muxsel` does not fit in the selector width; the input
    /// table comes from the device catalog, so an oversized selector is a
    /// catalog bug.
    pub fn add_input(&mut self, source: InputSource, muxsel: u32) {
        assert!(
            muxsel < (1 << self.select_bits),
            "muxsel {muxsel} does not fit in {} selector bits",
            self.select_bits
        );
        self.inputs.insert(source, muxsel);
    }

    /// Selects the buffer's input.
    ///
    /// The choice is validated at save time, not here, so a grounded
    /// tie-off never has to appear in the input table.
    pub fn select(&mut self, source: InputSource) {
        self.input = source;
    }

    /// Returns the currently selected input.
    pub fn selected_input(&self) -> InputSource {
        self.input
    }

    /// Returns the selector width in bits.
    pub fn select_bits(&self) -> u32 {
        self.select_bits
    }

    /// Returns the legal inputs and their selector encodings.
    pub fn inputs(&self) -> &BTreeMap<InputSource, u32> {
        &self.inputs
    }
}

impl Primitive for MuxedClockBuffer {
    fn id(&self) -> PrimitiveId {
        self.id
    }

    fn config_base(&self) -> usize {
        self.config_base
    }

    fn load(&mut self, bits: &Bitstream) -> Result<(), ConfigError> {
        let muxsel = bits.field(self.config_base, self.select_bits);
        for (&source, &sel) in &self.inputs {
            if sel == muxsel {
                self.input = source;
                break;
            }
        }
        // No match: the selection keeps its current value (ground on a
        // freshly constructed buffer).
        Ok(())
    }

    fn save(&self, bits: &mut Bitstream) -> Result<(), ConfigError> {
        // A grounded input is legal even if it has no muxsel encoding; the
        // selector bits stay whatever they were cleared to.
        if self.input.is_ground() {
            return Ok(());
        }

        let muxsel = *self
            .inputs
            .get(&self.input)
            .ok_or(ConfigError::InvalidInput {
                primitive: self.id,
                input: self.input,
            })?;

        bits.set_field(self.config_base, self.select_bits, muxsel);
        Ok(())
    }
}
