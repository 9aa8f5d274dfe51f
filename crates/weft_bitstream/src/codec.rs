//! Whole-device bitstream serialization.
//!
//! The codec owns the device instance's primitive list and orchestrates
//! Load/Save across all of them. Each primitive writes only its own slice;
//! the slices are disjoint by catalog construction, so a complete save
//! touches every configured bit exactly once and never conflicts.

use crate::bits::Bitstream;
use crate::primitive::{ConfigError, Primitive};
use weft_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};

/// Serializes and deserializes a device's full configuration.
pub struct BitstreamCodec {
    bit_count: usize,
    primitives: Vec<Box<dyn Primitive>>,
}

impl BitstreamCodec {
    /// Creates a codec for a device with `bit_count` configuration bits and
    /// no primitives yet.
    pub fn new(bit_count: usize) -> Self {
        Self {
            bit_count,
            primitives: Vec::new(),
        }
    }

    /// Adds a primitive to the device instance.
    ///
    /// Primitives are walked in registration order, which the catalog keeps
    /// stable.
    pub fn add_primitive(&mut self, primitive: Box<dyn Primitive>) {
        self.primitives.push(primitive);
    }

    /// Returns the device's configuration length in bits.
    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    /// Returns the number of registered primitives.
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    /// Returns the registered primitives in walk order.
    pub fn primitives(&self) -> &[Box<dyn Primitive>] {
        &self.primitives
    }

    /// Returns the primitive at `index` mutably (for selecting inputs
    /// before a save, or reading state after a load).
    pub fn primitive_mut(&mut self, index: usize) -> &mut dyn Primitive {
        &mut *self.primitives[index]
    }

    /// Saves every primitive into a freshly cleared bitstream.
    ///
    /// Serialization aborts on the first failing primitive; the error is
    /// also emitted into `sink` so it surfaces alongside any engine
    /// diagnostics.
    pub fn save(&self, sink: &DiagnosticSink) -> Result<Bitstream, ConfigError> {
        let mut bits = Bitstream::new(self.bit_count);

        for primitive in &self.primitives {
            if let Err(err) = primitive.save(&mut bits) {
                sink.emit(Diagnostic::error(
                    DiagnosticCode::new(Category::Config, 1),
                    err.to_string(),
                ));
                return Err(err);
            }
        }

        Ok(bits)
    }

    /// Loads every primitive's state from `bits`.
    ///
    /// The bitstream must be exactly the device's configuration length;
    /// anything else is rejected before any primitive is touched.
    pub fn load(&mut self, bits: &Bitstream, sink: &DiagnosticSink) -> Result<(), ConfigError> {
        if bits.len() != self.bit_count {
            let err = ConfigError::LengthMismatch {
                expected: self.bit_count,
                actual: bits.len(),
            };
            sink.emit(Diagnostic::error(
                DiagnosticCode::new(Category::Config, 2),
                err.to_string(),
            ));
            return Err(err);
        }

        for primitive in &mut self.primitives {
            if let Err(err) = primitive.load(bits) {
                sink.emit(Diagnostic::error(
                    DiagnosticCode::new(Category::Config, 1),
                    err.to_string(),
                ));
                return Err(err);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mux::MuxedClockBuffer;
    use crate::primitive::{InputSource, PrimitiveId, SourceId};

    fn node(n: u32) -> InputSource {
        InputSource::Node(SourceId::from_raw(n))
    }

    /// A single-bit enable at a fixed position — the kind of non-mux
    /// primitive a real catalog is full of.
    struct EnableBit {
        id: PrimitiveId,
        config_base: usize,
        enabled: bool,
    }

    impl Primitive for EnableBit {
        fn id(&self) -> PrimitiveId {
            self.id
        }
        fn config_base(&self) -> usize {
            self.config_base
        }
        fn load(&mut self, bits: &Bitstream) -> Result<(), ConfigError> {
            self.enabled = bits.get(self.config_base);
            Ok(())
        }
        fn save(&self, bits: &mut Bitstream) -> Result<(), ConfigError> {
            bits.set(self.config_base, self.enabled);
            Ok(())
        }
    }

    fn sample_mux(config_base: usize) -> MuxedClockBuffer {
        let mut buf = MuxedClockBuffer::new(PrimitiveId::new(0, 0), config_base, 2);
        for i in 0..4 {
            buf.add_input(node(i), i);
        }
        buf
    }

    fn sample_codec() -> BitstreamCodec {
        let mut codec = BitstreamCodec::new(12);
        let mut mux = sample_mux(4);
        mux.select(node(3));
        codec.add_primitive(Box::new(mux));
        codec.add_primitive(Box::new(EnableBit {
            id: PrimitiveId::new(1, 0),
            config_base: 9,
            enabled: true,
        }));
        codec
    }

    #[test]
    fn save_walks_every_primitive() {
        let codec = sample_codec();
        let sink = DiagnosticSink::new();
        let bits = codec.save(&sink).unwrap();

        assert_eq!(bits.len(), 12);
        // Mux selector 3 at base 4, enable at 9; everything else cleared.
        assert!(bits.get(4));
        assert!(bits.get(5));
        assert!(bits.get(9));
        assert_eq!(bits.count_ones(), 3);
        assert!(!sink.has_errors());
    }

    #[test]
    fn save_load_roundtrip_through_fresh_device() {
        let codec = sample_codec();
        let sink = DiagnosticSink::new();
        let bits = codec.save(&sink).unwrap();

        // A blank copy of the same device loads the saved image.
        let mut blank = BitstreamCodec::new(12);
        blank.add_primitive(Box::new(sample_mux(4)));
        blank.add_primitive(Box::new(EnableBit {
            id: PrimitiveId::new(1, 0),
            config_base: 9,
            enabled: false,
        }));
        blank.load(&bits, &sink).unwrap();

        let resaved = blank.save(&sink).unwrap();
        assert_eq!(resaved, bits);
    }

    #[test]
    fn failing_primitive_aborts_save() {
        let mut codec = BitstreamCodec::new(8);
        let mut bad = sample_mux(0);
        bad.select(node(7)); // not a legal input
        codec.add_primitive(Box::new(bad));
        codec.add_primitive(Box::new(EnableBit {
            id: PrimitiveId::new(1, 0),
            config_base: 4,
            enabled: true,
        }));

        let sink = DiagnosticSink::new();
        let err = codec.save(&sink).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInput { .. }));
        assert!(sink.has_errors());
        let diags = sink.diagnostics();
        assert_eq!(diags[0].code, DiagnosticCode::new(Category::Config, 1));
    }

    #[test]
    fn wrong_length_rejected_on_load() {
        let mut codec = sample_codec();
        let sink = DiagnosticSink::new();
        let short = Bitstream::new(4);
        let err = codec.load(&short, &sink).unwrap_err();
        assert_eq!(
            err,
            ConfigError::LengthMismatch {
                expected: 12,
                actual: 4,
            }
        );
        assert!(sink.has_errors());
    }

    #[test]
    fn grounded_device_saves_blank() {
        let mut codec = BitstreamCodec::new(6);
        codec.add_primitive(Box::new(sample_mux(0)));
        let sink = DiagnosticSink::new();
        let bits = codec.save(&sink).unwrap();
        assert_eq!(bits.count_ones(), 0);
        assert_eq!(codec.primitive_count(), 1);
        assert_eq!(codec.bit_count(), 6);
    }

    #[test]
    fn primitive_mut_reaches_state() {
        let mut codec = sample_codec();
        // Walk order is registration order.
        assert_eq!(codec.primitives()[0].id(), PrimitiveId::new(0, 0));
        assert_eq!(codec.primitives()[1].id(), PrimitiveId::new(1, 0));
        assert_eq!(codec.primitive_mut(1).config_base(), 9);
    }
}
