//! Placement cost model.
//!
//! The engine-provided component is the unroutability cost: the number of
//! netlist edges that no physical wire of the device can realize under the
//! current mating. Congestion and timing are strategy-provided and default
//! to zero.

use crate::graph::Graph;
use crate::ids::EdgeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three cost components of a placement, summed by [`total`](Self::total).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Number of netlist edges with no realizing device edge.
    pub unroutable: u32,
    /// Strategy-provided congestion estimate (0 in the base engine).
    pub congestion: u32,
    /// Strategy-provided timing estimate (0 in the base engine).
    pub timing: u32,
}

impl CostBreakdown {
    /// Returns the total cost of the placement.
    pub fn total(&self) -> u32 {
        self.unroutable + self.congestion + self.timing
    }
}

impl fmt::Display for CostBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unroutability cost {}, congestion cost {}, timing cost {} (total {})",
            self.unroutable,
            self.congestion,
            self.timing,
            self.total()
        )
    }
}

/// Computes the unroutability cost of the current mating.
///
/// For each netlist edge `(src, dst, port)`, searches the outgoing device
/// edges of `src`'s mate for one that reaches `dst`'s mate on the same
/// port. Each miss contributes 1 to the cost and lands in the returned
/// edge list. An edge with an unmated endpoint cannot be realized and is
/// counted the same way.
///
/// The scan is `O(E_net · avg_fanout_dev)`; adequate for the small devices
/// this engine targets.
pub fn unroutable_cost(netlist: &Graph, device: &Graph) -> (u32, Vec<EdgeId>) {
    let mut unroutes = Vec::new();

    for (edge_id, edge) in netlist.edges() {
        let realized = match (netlist.mate_of(edge.src), netlist.mate_of(edge.dst)) {
            (Some(dev_src), Some(dev_dst)) => device.out_edges(dev_src).iter().any(|&de| {
                let dev_edge = device.edge(de);
                dev_edge.dst == dev_dst && dev_edge.port == edge.port
            }),
            _ => false,
        };

        if !realized {
            unroutes.push(edge_id);
        }
    }

    (unroutes.len() as u32, unroutes)
}
