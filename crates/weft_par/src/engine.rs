//! The simulated-annealing place-and-route engine.
//!
//! Given a netlist graph and a device graph, the engine produces a mating
//! under which every netlist edge is realized by a device edge between the
//! mates of its endpoints on the same port. The search is label-constrained
//! simulated annealing: a deterministic initial placement, then repeated
//! single-node moves accepted greedily or (while the system is hot) by a
//! temperature-proportional coin flip.

use crate::cost::{self, CostBreakdown};
use crate::graph::Graph;
use crate::ids::{EdgeId, NodeId};
use crate::strategy::PlacementStrategy;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use weft_common::{InternalError, WeftResult};
use weft_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};

/// Temperature at the start of every run.
const STARTING_TEMPERATURE: u32 = 100;

/// Number of non-improving iterations after which the anneal gives up.
const STALL_LIMIT: u32 = 5;

/// The label-constrained annealing placer.
///
/// The engine borrows both graphs for the duration of a run; on failure the
/// partial mating is left in place so callers can inspect what was and was
/// not placed. All randomness comes from a xoshiro256** generator seeded
/// with the caller's seed, so identical inputs and seed reproduce the exact
/// placement on any platform.
pub struct ParEngine<'g, S: PlacementStrategy> {
    netlist: &'g mut Graph,
    device: &'g mut Graph,
    strategy: S,
    temperature: u32,
    best_cost: u32,
    iterations_since_best: u32,
    last_cost: CostBreakdown,
    unroutes: Vec<EdgeId>,
}

impl<'g, S: PlacementStrategy> ParEngine<'g, S> {
    /// Creates an engine over the given netlist and device graphs.
    pub fn new(netlist: &'g mut Graph, device: &'g mut Graph, strategy: S) -> Self {
        Self {
            netlist,
            device,
            strategy,
            temperature: STARTING_TEMPERATURE,
            best_cost: u32::MAX,
            iterations_since_best: 0,
            last_cost: CostBreakdown::default(),
            unroutes: Vec::new(),
        }
    }

    /// Runs place and route to completion.
    ///
    /// Returns `Ok(true)` on success. `Ok(false)` means the design could
    /// not be placed or routed: a diagnostic has been emitted into `sink`
    /// and the partial mating remains visible in the graphs, with
    /// [`unroutable_edges`](Self::unroutable_edges) listing any netlist
    /// edges the final placement could not realize. `Err` indicates an
    /// internal invariant violation (a bug in the placer or strategy, never
    /// in the design), reported alongside an `X`-category diagnostic;
    /// callers should treat it as fatal.
    pub fn place_and_route(&mut self, seed: u64, sink: &DiagnosticSink) -> WeftResult<bool> {
        self.temperature = STARTING_TEMPERATURE;
        self.best_cost = u32::MAX;
        self.iterations_since_best = 0;
        self.unroutes.clear();

        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);

        if !self.sanity_check(sink) {
            return Ok(false);
        }

        self.initial_placement(sink);

        loop {
            self.last_cost = self.compute_cost();
            let total = self.last_cost.total();

            self.iterations_since_best += 1;
            if total < self.best_cost {
                self.best_cost = total;
                self.iterations_since_best = 0;
            }

            if self.iterations_since_best >= STALL_LIMIT {
                break;
            }
            if !self.optimize_placement(&mut rng, sink)? {
                break;
            }

            self.temperature = self.temperature.saturating_sub(1);
        }

        let (unroutable, unroutes) = cost::unroutable_cost(self.netlist, self.device);
        self.unroutes = unroutes;
        if unroutable != 0 {
            let mut diag = Diagnostic::error(
                DiagnosticCode::new(Category::Route, 1),
                "some nets could not be completely routed",
            );
            for &edge_id in &self.unroutes {
                let edge = self.netlist.edge(edge_id);
                diag = diag.with_note(format!("{} -> {} (port {})", edge.src, edge.dst, edge.port));
            }
            sink.emit(diag);
            return Ok(false);
        }

        sink.emit(Diagnostic::note(
            DiagnosticCode::new(Category::Route, 100),
            format!("placement converged: {}", self.last_cost),
        ));
        Ok(true)
    }

    /// Returns the netlist edges the final placement could not realize.
    pub fn unroutable_edges(&self) -> &[EdgeId] {
        &self.unroutes
    }

    /// Returns the current annealing temperature.
    pub fn temperature(&self) -> u32 {
        self.temperature
    }

    /// Returns the best total cost seen so far.
    pub fn best_cost(&self) -> u32 {
        self.best_cost
    }

    /// Returns how many iterations have passed since the best cost improved.
    pub fn iterations_since_best(&self) -> u32 {
        self.iterations_since_best
    }

    /// Returns the cost breakdown of the last scored iteration.
    pub fn last_cost(&self) -> CostBreakdown {
        self.last_cost
    }

    /// Rejects designs that provably cannot fit the device.
    ///
    /// A netlist label beyond the device's vocabulary, or more netlist
    /// nodes of some label than the device has sites, can never place.
    fn sanity_check(&mut self, sink: &DiagnosticSink) -> bool {
        let nmax_net = self.netlist.max_label();
        let nmax_dev = self.device.max_label();

        if nmax_net > nmax_dev {
            sink.emit(Diagnostic::error(
                DiagnosticCode::new(Category::Sanity, 1),
                format!(
                    "netlist contains a node with label {nmax_net}, largest in device is {nmax_dev}"
                ),
            ));
            return false;
        }

        self.netlist.count_labels();
        self.device.count_labels();

        for label in 0..=nmax_net {
            let nnet = self.netlist.num_nodes_with_label(label);
            let ndev = self.device.num_nodes_with_label(label);
            if nnet > ndev {
                sink.emit(
                    Diagnostic::error(
                        DiagnosticCode::new(Category::Sanity, 2),
                        "design is too big for the device",
                    )
                    .with_note(format!(
                        "netlist has {nnet} nodes with label {label}, device only has {ndev}"
                    )),
                );
                return false;
            }
        }

        true
    }

    /// Mates the i-th netlist node of each label with the i-th device node
    /// of that label.
    ///
    /// Legal by construction once the sanity check has passed, and fully
    /// deterministic; routability is the anneal loop's problem.
    fn initial_placement(&mut self, sink: &DiagnosticSink) {
        sink.emit(
            Diagnostic::note(
                DiagnosticCode::new(Category::Route, 101),
                format!(
                    "global placement of {} instances into {} sites",
                    self.netlist.node_count(),
                    self.device.node_count()
                ),
            )
            .with_note(format!(
                "{} nets, {} routing channels available",
                self.netlist.edge_count(),
                self.device.edge_count()
            )),
        );

        self.netlist.index_nodes_by_label();
        self.device.index_nodes_by_label();

        for label in 0..=self.netlist.max_label() {
            for i in 0..self.netlist.nodes_with_label(label).len() {
                let netnode = self.netlist.node_by_label_and_index(label, i);
                let devnode = self.device.node_by_label_and_index(label, i);
                self.netlist.mate(netnode, self.device, devnode);
            }
        }
    }

    /// Attempts one annealing move.
    ///
    /// Returns `Ok(false)` when no further optimization is possible: the
    /// system has cooled to zero or the strategy reports nothing worth
    /// moving. A rejected or unproposable move still returns `Ok(true)` so
    /// the loop keeps iterating.
    fn optimize_placement(
        &mut self,
        rng: &mut Xoshiro256StarStar,
        sink: &DiagnosticSink,
    ) -> WeftResult<bool> {
        if self.temperature == 0 {
            return Ok(false);
        }

        let bad = self
            .strategy
            .find_suboptimal_placements(self.netlist, self.device);
        if bad.is_empty() {
            return Ok(false);
        }

        let pivot = bad[rng.gen_range(0..bad.len())];
        let old_site = self.netlist.mate_of(pivot);

        let new_site = match self
            .strategy
            .propose_new_placement(self.netlist, self.device, pivot, rng)
        {
            Some(site) => site,
            None => return Ok(true),
        };

        let original_cost = self.compute_cost().total();
        self.move_node(pivot, new_site, sink)?;
        let new_cost = self.compute_cost().total();

        // Accept improvements outright, and regressions with probability
        // temperature/100 while the system is still hot.
        if new_cost < original_cost {
            return Ok(true);
        }
        if rng.gen_range(0..100u32) < self.temperature {
            return Ok(true);
        }

        match old_site {
            Some(site) => self.move_node(pivot, site, sink)?,
            None => self.netlist.unmate(pivot, self.device),
        }
        Ok(true)
    }

    /// Moves a netlist node to a new device site.
    ///
    /// If the site is occupied by another netlist node, the two swap: the
    /// displaced node takes the pivot's previous site.
    ///
    /// # Errors
    ///
    /// Fails if the labels differ. The strategy contract guarantees they
    /// match, so a mismatch is a bug in the placer, not in the design; it
    /// is reported as an `X`-category diagnostic and ends the run.
    fn move_node(
        &mut self,
        node: NodeId,
        newpos: NodeId,
        sink: &DiagnosticSink,
    ) -> WeftResult<()> {
        let node_label = self.netlist.node(node).label;
        let site_label = self.device.node(newpos).label;
        if node_label != site_label {
            let message = format!(
                "tried to assign netlist node {node} (label {node_label}) to \
                 device site {newpos} (label {site_label})"
            );
            sink.emit(Diagnostic::error(
                DiagnosticCode::new(Category::Internal, 1),
                message.clone(),
            ));
            return Err(InternalError::new(message));
        }

        if let Some(displaced) = self.device.mate_of(newpos) {
            match self.netlist.mate_of(node) {
                Some(old_pos) => self.netlist.mate(displaced, self.device, old_pos),
                None => self.netlist.unmate(displaced, self.device),
            }
        }

        self.netlist.mate(node, self.device, newpos);
        Ok(())
    }

    /// Scores the current placement.
    fn compute_cost(&mut self) -> CostBreakdown {
        let (unroutable, _) = cost::unroutable_cost(self.netlist, self.device);
        let congestion = self.strategy.congestion_cost(self.netlist, self.device);
        let timing = self.strategy.timing_cost(self.netlist, self.device);
        CostBreakdown {
            unroutable,
            congestion,
            timing,
        }
    }
}
