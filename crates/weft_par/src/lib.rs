//! Graph-based place and route for the weft toolchain.
//!
//! This crate mates a netlist [`Graph`] (one node per logic instance) with a
//! device [`Graph`] (one node per physical site) so that every netlist edge
//! is realized by a physical wire of the device. Placement is simulated
//! annealing constrained by node labels; device-specific heuristics plug in
//! through [`PlacementStrategy`].
//!
//! # Pipeline
//!
//! 1. **Sanity check** — reject designs that provably cannot fit
//! 2. **Initial placement** — deterministic by-label mating
//! 3. **Anneal** — randomized single-node moves, temperature-gated
//! 4. **Final check** — fail if any netlist edge remains unroutable
//!
//! # Usage
//!
//! ```
//! use weft_par::{place_and_route, FullScanStrategy, Graph, PortId};
//! use weft_diagnostics::DiagnosticSink;
//!
//! let mut netlist = Graph::new();
//! let a = netlist.add_node(0);
//! let b = netlist.add_node(0);
//! netlist.add_edge(a, b, PortId::from_raw(0));
//!
//! let mut device = Graph::new();
//! let s0 = device.add_node(0);
//! let s1 = device.add_node(0);
//! device.add_edge(s0, s1, PortId::from_raw(0));
//!
//! let sink = DiagnosticSink::new();
//! let placed = place_and_route(&mut netlist, &mut device, FullScanStrategy, 1, &sink).unwrap();
//! assert!(placed);
//! assert_eq!(netlist.mate_of(a), Some(s0));
//! ```

#![warn(missing_docs)]

pub mod cost;
pub mod engine;
pub mod graph;
pub mod ids;
pub mod strategy;

pub use cost::{unroutable_cost, CostBreakdown};
pub use engine::ParEngine;
pub use graph::{Edge, Graph, Node};
pub use ids::{EdgeId, NodeId, PortId};
pub use strategy::{FullScanStrategy, PlacementStrategy};

use weft_common::WeftResult;
use weft_diagnostics::DiagnosticSink;

/// Runs the complete place-and-route flow in one call.
///
/// Constructs a [`ParEngine`] over the two graphs and runs it with the given
/// seed. Returns `Ok(true)` on success; `Ok(false)` means the design could
/// not be placed or routed, with diagnostics in `sink` and the partial
/// mating left in the graphs. `Err` indicates an internal invariant
/// violation and should be treated as fatal. Callers that need the
/// unroutable edge list afterwards should drive [`ParEngine`] directly.
pub fn place_and_route<S: PlacementStrategy>(
    netlist: &mut Graph,
    device: &mut Graph,
    strategy: S,
    seed: u64,
    sink: &DiagnosticSink,
) -> WeftResult<bool> {
    ParEngine::new(netlist, device, strategy).place_and_route(seed, sink)
}
