//! Device-specific placement heuristics.
//!
//! The base engine drives the anneal loop and computes unroutability; which
//! nodes are worth moving, where they may go, and what timing or congestion
//! cost the current placement carries are all properties of the device
//! family. The [`PlacementStrategy`] trait is the seam where a device
//! library plugs those decisions in.

use crate::cost;
use crate::graph::Graph;
use crate::ids::NodeId;
use rand::{Rng, RngCore};
use std::collections::BTreeSet;

/// Device-specific placement decisions consulted by the engine.
///
/// The two cost hooks default to zero; a strategy that overrides neither
/// leaves unroutability as the engine's only objective.
pub trait PlacementStrategy {
    /// Returns the netlist nodes whose placement is worth reconsidering.
    ///
    /// The engine picks its pivot uniformly from this list; an empty list
    /// ends the anneal. Every returned node must currently be mated.
    fn find_suboptimal_placements(&mut self, netlist: &Graph, device: &Graph) -> Vec<NodeId>;

    /// Proposes a new device site for `pivot`, or `None` to skip this
    /// iteration.
    ///
    /// The returned site must carry the pivot's label; proposing a
    /// mismatched label is an internal error and aborts the run.
    fn propose_new_placement(
        &mut self,
        netlist: &Graph,
        device: &Graph,
        pivot: NodeId,
        rng: &mut dyn RngCore,
    ) -> Option<NodeId>;

    /// Timing cost of the current placement. Defaults to 0.
    fn timing_cost(&mut self, netlist: &Graph, device: &Graph) -> u32 {
        let _ = (netlist, device);
        0
    }

    /// Congestion cost of the current placement. Defaults to 0.
    fn congestion_cost(&mut self, netlist: &Graph, device: &Graph) -> u32 {
        let _ = (netlist, device);
        0
    }
}

/// The baseline device-agnostic strategy.
///
/// Flags the endpoints of every currently-unroutable netlist edge as
/// suboptimal (so the anneal stops as soon as the placement routes), and
/// proposes a uniformly random alternative site of the pivot's label by
/// scanning the whole device graph. Device families with real structure
/// should replace this with something that understands their fabric.
#[derive(Debug, Default, Clone, Copy)]
pub struct FullScanStrategy;

impl PlacementStrategy for FullScanStrategy {
    fn find_suboptimal_placements(&mut self, netlist: &Graph, device: &Graph) -> Vec<NodeId> {
        let (_, unroutes) = cost::unroutable_cost(netlist, device);

        // Both endpoints of a failing edge are candidates; dedupe while
        // keeping a stable order so the pivot draw is reproducible.
        let mut seen = BTreeSet::new();
        let mut bad = Vec::new();
        for edge_id in unroutes {
            let edge = netlist.edge(edge_id);
            for node in [edge.src, edge.dst] {
                if netlist.mate_of(node).is_some() && seen.insert(node) {
                    bad.push(node);
                }
            }
        }
        bad
    }

    fn propose_new_placement(
        &mut self,
        netlist: &Graph,
        device: &Graph,
        pivot: NodeId,
        rng: &mut dyn RngCore,
    ) -> Option<NodeId> {
        let label = netlist.node(pivot).label;
        let current = netlist.mate_of(pivot);

        let candidates: Vec<NodeId> = device
            .nodes()
            .filter(|(id, node)| node.label == label && Some(*id) != current)
            .map(|(id, _)| id)
            .collect();

        if candidates.is_empty() {
            None
        } else {
            Some(candidates[rng.gen_range(0..candidates.len())])
        }
    }
}
