//! [Maximum flow](https://en.wikipedia.org/wiki/Maximum_flow_problem) through
//! a small directed road network.
//!
//! Two independent algorithms are provided:
//!  - [`edmonds_karp`] repeatedly augments along a shortest path found by
//!    breadth first search in the residual network.
//!  - [`dinic`] builds a level graph and saturates it with a blocking flow
//!    before rebuilding, using per-node advance pointers.
//!
//! Max-flow theory guarantees they return the same value; [`solve`] treats a
//! mismatch as an error.

use crate::{
    error::{Error, Result},
    timing::{time, Timed},
};
use rand::Rng;
use std::collections::{BTreeSet, VecDeque};

/// Junctions of the traffic network, in display order.
pub const TRAFFIC_NODES: [&str; 9] = ["A", "B", "C", "D", "E", "F", "G", "H", "T"];

/// Roads of the traffic network.
pub const TRAFFIC_EDGES: [(&str, &str); 13] = [
    ("A", "B"),
    ("A", "C"),
    ("A", "D"),
    ("B", "E"),
    ("B", "F"),
    ("C", "E"),
    ("C", "F"),
    ("D", "F"),
    ("E", "G"),
    ("E", "H"),
    ("F", "H"),
    ("G", "T"),
    ("H", "T"),
];

/// Range road capacities are drawn from in generated rounds.
pub const TRAFFIC_CAPACITIES: std::ops::RangeInclusive<u32> = 5..=15;

/// A directed edge with a positive capacity.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Index of the tail node.
    pub from: usize,
    /// Index of the head node.
    pub to: usize,
    /// Maximum flow the edge can carry.
    pub capacity: u32,
}

/// A capacitated directed network with a designated source and sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowNetwork {
    nodes: Vec<String>,
    edges: Vec<Edge>,
    source: usize,
    sink: usize,
}

impl FlowNetwork {
    /// Create a network from node names, `(from, to, capacity)` edges and
    /// the names of the source and sink.
    ///
    /// Node names must be unique, every edge must join two distinct known
    /// nodes with a positive capacity, and no edge may appear twice.
    pub fn new<'a, N>(
        nodes: impl IntoIterator<Item = N>,
        edges: impl IntoIterator<Item = (&'a str, &'a str, u32)>,
        source: &str,
        sink: &str,
    ) -> Result<Self>
    where
        N: Into<String>,
    {
        let nodes: Vec<String> = nodes.into_iter().map(Into::into).collect();

        let unique: BTreeSet<_> = nodes.iter().collect();
        if unique.len() != nodes.len() {
            return Err(Error::InvalidNetwork("node names must be unique".into()));
        }

        let index_of = |name: &str| {
            nodes
                .iter()
                .position(|node| node == name)
                .ok_or_else(|| Error::InvalidNetwork(format!("unknown node [{}]", name)))
        };

        let source = index_of(source)?;
        let sink = index_of(sink)?;
        if source == sink {
            return Err(Error::InvalidNetwork(
                "source and sink must be different nodes".into(),
            ));
        }

        let mut seen = BTreeSet::new();
        let mut checked = Vec::new();
        for (from, to, capacity) in edges {
            let edge = Edge {
                from: index_of(from)?,
                to: index_of(to)?,
                capacity,
            };

            if edge.from == edge.to {
                return Err(Error::InvalidNetwork(format!("self loop on [{}]", from)));
            }
            if capacity == 0 {
                return Err(Error::InvalidNetwork(format!(
                    "edge [{}->{}] has zero capacity",
                    from, to
                )));
            }
            if !seen.insert((edge.from, edge.to)) {
                return Err(Error::InvalidNetwork(format!(
                    "edge [{}->{}] appears twice",
                    from, to
                )));
            }

            checked.push(edge);
        }

        if checked.is_empty() {
            return Err(Error::InvalidNetwork("network has no edges".into()));
        }

        Ok(Self {
            nodes,
            edges: checked,
            source,
            sink,
        })
    }

    /// The traffic network from `A` to `T` with the given capacities, one
    /// per entry of [`TRAFFIC_EDGES`].
    pub fn traffic(capacities: [u32; 13]) -> Result<Self> {
        Self::new(
            TRAFFIC_NODES,
            TRAFFIC_EDGES
                .iter()
                .zip(capacities)
                .map(|(&(from, to), capacity)| (from, to, capacity)),
            "A",
            "T",
        )
    }

    /// The traffic network with capacities drawn from
    /// [`TRAFFIC_CAPACITIES`].
    pub fn random_traffic(rng: &mut impl Rng) -> Result<Self> {
        let mut capacities = [0; 13];
        for capacity in &mut capacities {
            *capacity = rng.gen_range(TRAFFIC_CAPACITIES);
        }

        Self::traffic(capacities)
    }

    /// Node names, indexed the same way as [`Edge::from`] and [`Edge::to`].
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// All edges of the network.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Index of the source node.
    pub fn source(&self) -> usize {
        self.source
    }

    /// Index of the sink node.
    pub fn sink(&self) -> usize {
        self.sink
    }

    /// Capacity of the edge `from -> to` by node name, if it exists.
    pub fn capacity(&self, from: &str, to: &str) -> Option<u32> {
        self.edges
            .iter()
            .find(|edge| self.nodes[edge.from] == from && self.nodes[edge.to] == to)
            .map(|edge| edge.capacity)
    }

    /// Total capacity leaving the source, an upper bound on any flow.
    pub fn source_capacity(&self) -> u64 {
        self.edges
            .iter()
            .filter(|edge| edge.from == self.source)
            .map(|edge| u64::from(edge.capacity))
            .sum()
    }

    /// Return true if `flow` respects every capacity, is conserved at every
    /// node other than the source and sink, and its value equals the net
    /// flow out of the source.
    pub fn is_feasible(&self, flow: &Flow) -> bool {
        if flow.edge_flows.len() != self.edges.len() {
            return false;
        }

        let mut balance = vec![0i64; self.nodes.len()];
        for (edge, &amount) in self.edges.iter().zip(&flow.edge_flows) {
            if amount > u64::from(edge.capacity) {
                return false;
            }
            balance[edge.from] -= amount as i64;
            balance[edge.to] += amount as i64;
        }

        let conserved = balance
            .iter()
            .enumerate()
            .filter(|(node, _)| *node != self.source && *node != self.sink)
            .all(|(_, net)| *net == 0);

        conserved && -balance[self.source] == flow.value as i64
    }
}

/// A flow assignment produced by one of the algorithms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flow {
    /// Total flow from source to sink.
    pub value: u64,
    /// Flow on each edge, indexed like [`FlowNetwork::edges`].
    pub edge_flows: Vec<u64>,
    /// Indices of the edges crossing a minimum cut, i.e. edges leaving the
    /// set of nodes still reachable from the source in the final residual
    /// network.
    pub min_cut: Vec<usize>,
}

/// Result of running both algorithms on a network.
#[derive(Debug, Clone)]
pub struct FlowReport {
    /// The agreed maximum flow.
    pub max_flow: u64,
    /// Augmenting path result and timing.
    pub edmonds_karp: Timed<Flow>,
    /// Blocking flow result and timing.
    pub dinic: Timed<Flow>,
}

#[derive(Debug, Copy, Clone)]
struct Arc {
    to: usize,
    residual: u64,
}

/// Residual network where arc `2 * i` is edge `i` and arc `2 * i + 1` its
/// reverse.
#[derive(Debug)]
struct Residual<'n> {
    network: &'n FlowNetwork,
    arcs: Vec<Arc>,
    adjacency: Vec<Vec<usize>>,
}

impl<'n> Residual<'n> {
    fn new(network: &'n FlowNetwork) -> Self {
        let mut arcs = Vec::with_capacity(2 * network.edges.len());
        let mut adjacency = vec![Vec::new(); network.nodes.len()];

        for edge in &network.edges {
            adjacency[edge.from].push(arcs.len());
            arcs.push(Arc {
                to: edge.to,
                residual: u64::from(edge.capacity),
            });
            adjacency[edge.to].push(arcs.len());
            arcs.push(Arc {
                to: edge.from,
                residual: 0,
            });
        }

        Self {
            network,
            arcs,
            adjacency,
        }
    }

    fn push(&mut self, arc: usize, amount: u64) {
        self.arcs[arc].residual -= amount;
        self.arcs[arc ^ 1].residual += amount;
    }

    /// Breadth first search from the source over arcs with spare capacity,
    /// returning the arc used to reach every discovered node.
    fn search(&self) -> Vec<Option<usize>> {
        let source = self.network.source;
        let mut via = vec![None; self.adjacency.len()];
        let mut seen = vec![false; self.adjacency.len()];
        let mut queue = VecDeque::from([source]);
        seen[source] = true;

        while let Some(node) = queue.pop_front() {
            for &arc in &self.adjacency[node] {
                let Arc { to, residual } = self.arcs[arc];
                if residual > 0 && !seen[to] {
                    seen[to] = true;
                    via[to] = Some(arc);
                    if to == self.network.sink {
                        return via;
                    }
                    queue.push_back(to);
                }
            }
        }

        via
    }

    fn levels(&self) -> Vec<Option<usize>> {
        let mut level = vec![None; self.adjacency.len()];
        let mut queue = VecDeque::from([self.network.source]);
        level[self.network.source] = Some(0);

        while let Some(node) = queue.pop_front() {
            let next_level = level[node].map(|l| l + 1);
            for &arc in &self.adjacency[node] {
                let Arc { to, residual } = self.arcs[arc];
                if residual > 0 && level[to].is_none() {
                    level[to] = next_level;
                    queue.push_back(to);
                }
            }
        }

        level
    }

    /// Push up to `limit` units from `node` to the sink along strictly
    /// increasing levels, skipping arcs already found to be dead.
    fn blocking_path(
        &mut self,
        node: usize,
        limit: u64,
        level: &[Option<usize>],
        next: &mut [usize],
    ) -> u64 {
        if node == self.network.sink {
            return limit;
        }

        while next[node] < self.adjacency[node].len() {
            let arc = self.adjacency[node][next[node]];
            let Arc { to, residual } = self.arcs[arc];

            if residual > 0 && level[to] == level[node].map(|l| l + 1) {
                let pushed = self.blocking_path(to, limit.min(residual), level, next);
                if pushed > 0 {
                    self.push(arc, pushed);
                    return pushed;
                }
            }

            next[node] += 1;
        }

        0
    }

    fn into_flow(self, value: u64) -> Flow {
        let edge_flows = (0..self.network.edges.len())
            .map(|edge| self.arcs[2 * edge + 1].residual)
            .collect();

        let mut reachable = vec![false; self.adjacency.len()];
        reachable[self.network.source] = true;
        for (node, arc) in self.search().into_iter().enumerate() {
            if arc.is_some() {
                reachable[node] = true;
            }
        }

        let min_cut = self
            .network
            .edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| reachable[edge.from] && !reachable[edge.to])
            .map(|(index, _)| index)
            .collect();

        Flow {
            value,
            edge_flows,
            min_cut,
        }
    }
}

/// Maximum flow by repeatedly augmenting along a fewest-edges path in the
/// residual network.
pub fn edmonds_karp(network: &FlowNetwork) -> Flow {
    let mut residual = Residual::new(network);
    let mut total = 0;

    loop {
        let via = residual.search();
        if via[network.sink].is_none() {
            break;
        }

        let mut path = Vec::new();
        let mut node = network.sink;
        while let Some(arc) = via[node] {
            path.push(arc);
            node = residual.arcs[arc ^ 1].to;
        }

        let bottleneck = path
            .iter()
            .map(|&arc| residual.arcs[arc].residual)
            .min()
            .unwrap_or(0);

        for &arc in &path {
            residual.push(arc, bottleneck);
        }

        log::trace!(
            "Augmented {} units along a {}-edge path.",
            bottleneck,
            path.len()
        );
        total += bottleneck;
    }

    residual.into_flow(total)
}

/// Maximum flow by saturating successive level graphs with blocking flows.
pub fn dinic(network: &FlowNetwork) -> Flow {
    let mut residual = Residual::new(network);
    let mut total = 0;

    loop {
        let level = residual.levels();
        if level[network.sink].is_none() {
            break;
        }

        let mut next = vec![0; network.nodes.len()];
        let mut phase = 0;
        loop {
            let pushed = residual.blocking_path(network.source, u64::MAX, &level, &mut next);
            if pushed == 0 {
                break;
            }
            phase += pushed;
        }

        log::trace!("Blocking flow of {} units.", phase);
        total += phase;
    }

    residual.into_flow(total)
}

/// Run both algorithms and return the maximum flow with the timing of each.
///
/// # Errors
///  - [`Error::AlgorithmDisagreement`] if the two algorithms differ.
pub fn solve(network: &FlowNetwork) -> Result<FlowReport> {
    let edmonds_karp = time(|| edmonds_karp(network));
    let dinic = time(|| dinic(network));

    if edmonds_karp.value.value != dinic.value.value {
        log::error!(
            "Edmonds-Karp and Dinic disagree on {:?}: {} vs {}",
            network,
            edmonds_karp.value.value,
            dinic.value.value
        );

        return Err(Error::AlgorithmDisagreement {
            problem: "maximum flow",
            first: Some(edmonds_karp.value.value),
            second: Some(dinic.value.value),
        });
    }

    log::debug!(
        "Max flow {} (edmonds-karp {:.3}ms, dinic {:.3}ms).",
        dinic.value.value,
        edmonds_karp.millis(),
        dinic.millis()
    );

    Ok(FlowReport {
        max_flow: dinic.value.value,
        edmonds_karp,
        dinic,
    })
}

/// Maximum flow from source to sink.
pub fn max_flow(network: &FlowNetwork) -> Result<u64> {
    solve(network).map(|report| report.max_flow)
}
