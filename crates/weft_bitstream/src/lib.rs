//! Configuration bitstream model for the weft toolchain.
//!
//! A placed-and-routed design is programmed into the device through a flat
//! array of configuration bits. Every configurable hard resource — clock
//! buffers, I/O cells, LUT blocks — satisfies the [`Primitive`] contract:
//! it knows its identity, the bit offset of its configuration slice, and
//! how to load/save its logical state. The [`BitstreamCodec`] walks all
//! primitives of a device instance uniformly to produce or decode the full
//! [`Bitstream`].
//!
//! The one primitive implemented here is the [`MuxedClockBuffer`], the
//! canonical mux-select primitive; device family catalogs supply the rest.

#![warn(missing_docs)]

pub mod bits;
pub mod codec;
pub mod mux;
pub mod primitive;

pub use bits::Bitstream;
pub use codec::BitstreamCodec;
pub use mux::MuxedClockBuffer;
pub use primitive::{ConfigError, InputSource, Primitive, PrimitiveId, SourceId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reexports_available() {
        let _ = Bitstream::new(0);
        let _ = BitstreamCodec::new(0);
        let _ = MuxedClockBuffer::new(PrimitiveId::new(0, 0), 0, 2);
        let _ = InputSource::GROUND;
        let _ = SourceId::from_raw(0);
    }
}
