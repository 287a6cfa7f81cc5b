//! Layered dendrite network with arena-allocated nodes and edges.
//!
//! A [`Network`] owns every node and edge it contains in `SlotMap` arenas;
//! layers and edge lists hold keys into those arenas. Each adjacent layer
//! pair is fully connected, but edges are created with the fill-rate policy,
//! so a share of them start out dead.
//!
//! Besides the graph, a network carries the transient state of one
//! evaluation pass ([`Consensus`]) and the running totals of a generation's
//! evaluation ([`Scorecard`]).

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rand::Rng;
use slotmap::SlotMap;

use crate::config::{ErrorMetric, NetworkConfig, RankBy};
use crate::gene::{Edge, EdgeId, Node, NodeId};
use crate::identity::{node_identity, split_edge_identity, split_node_identity};
use crate::topology::{Layer, LayerSpec};

/// The output-layer node with the highest activation after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Consensus {
    /// Position of the winning node in the output layer.
    pub index: usize,
    /// Its activation.
    pub confidence: f32,
}

/// Score counters accumulated over one pass through the training set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Scorecard {
    /// Trials whose error was below the match resolution.
    pub score: u32,
    /// Sum of squared errors over missed trials.
    pub sum_squares: f64,
    /// Sum of square-rooted errors over missed trials.
    pub sum_roots: f64,
    /// Confidence-weighted squared error over missed trials.
    pub custom: f64,
    /// Running confidence total; becomes meaningless after `finish`.
    pub confidence_total: f64,
    /// Mean consensus confidence over the training set.
    pub average_confidence: f64,
    /// The active error accumulator, copied in by `finish`.
    pub error: f64,
}

impl Scorecard {
    /// Record one trial.
    ///
    /// Confidence is accumulated for every trial, matched or missed, so
    /// `finish` averages it over the whole training set. Only misses feed
    /// the three error sums.
    pub fn record(&mut self, error: f64, confidence: f32, resolution: f64) {
        let confidence = f64::from(confidence);
        self.confidence_total += confidence;
        if error < resolution {
            self.score += 1;
        } else {
            self.sum_squares += error * error;
            self.sum_roots += error.sqrt();
            self.custom += error * error * (1.0 + confidence);
        }
    }

    /// Close the pass: average the confidence and select the ranking error.
    pub fn finish(&mut self, trials: usize, metric: ErrorMetric) {
        self.average_confidence = if trials > 0 {
            self.confidence_total / trials as f64
        } else {
            0.0
        };
        self.error = match metric {
            ErrorMetric::SumOfSquares => self.sum_squares,
            ErrorMetric::SumOfRoots => self.sum_roots,
            ErrorMetric::Custom => self.custom,
        };
    }

    /// Ranking order: `Less` means `self` ranks ahead of `other`.
    ///
    /// Floats compare with `total_cmp`, so this is a total order and only
    /// fully tied scorecards compare `Equal`.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self, rank_by: RankBy) -> Ordering {
        let by_score = other.score.cmp(&self.score);
        let by_error = self.error.total_cmp(&other.error);
        let by_confidence = other.average_confidence.total_cmp(&self.average_confidence);
        match rank_by {
            RankBy::Score => by_score.then(by_error).then(by_confidence),
            RankBy::Error => by_error.then(by_score).then(by_confidence),
        }
    }
}

/// Edge identity → weight over a whole network.
///
/// Keys are ordered, so distance sums always run in the same order and are
/// bit-for-bit symmetric.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fingerprint(BTreeMap<u64, f32>);

impl Fingerprint {
    /// Number of edges covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no edges are covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Weight of the edge with `identity`, if present.
    #[must_use]
    pub fn get(&self, identity: u64) -> Option<f32> {
        self.0.get(&identity).copied()
    }

    /// Euclidean distance between the weights of two same-topology fingerprints.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError`] if the key sets differ.
    pub fn distance(&self, other: &Self) -> Result<f64, TopologyError> {
        if self.0.len() != other.0.len() {
            return Err(TopologyError::EdgeCount {
                left: self.0.len(),
                right: other.0.len(),
            });
        }
        let mut sum = 0.0_f64;
        for ((&left_id, &left), (&right_id, &right)) in self.0.iter().zip(&other.0) {
            if left_id != right_id {
                return Err(TopologyError::MissingEdge(left_id.min(right_id)));
            }
            let diff = f64::from(left) - f64::from(right);
            sum += diff * diff;
        }
        Ok(sum.sqrt())
    }
}

impl FromIterator<(u64, f32)> for Fingerprint {
    fn from_iter<I: IntoIterator<Item = (u64, f32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Two networks (or fingerprints) that cannot be compared edge by edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// The networks were built from different layer specifications.
    Layers {
        /// Specification of the left-hand network.
        left: LayerSpec,
        /// Specification of the right-hand network.
        right: LayerSpec,
    },
    /// The fingerprints cover different numbers of edges.
    EdgeCount {
        /// Edges in the left-hand fingerprint.
        left: usize,
        /// Edges in the right-hand fingerprint.
        right: usize,
    },
    /// An edge identity present on one side only.
    MissingEdge(u64),
}

impl std::fmt::Display for TopologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyError::Layers { left, right } => {
                write!(f, "topology mismatch: {} vs {}", left, right)
            }
            TopologyError::EdgeCount { left, right } => {
                write!(f, "topology mismatch: {} edges vs {} edges", left, right)
            }
            TopologyError::MissingEdge(id) => {
                write!(f, "topology mismatch: edge {:#018x} missing on one side", id)
            }
        }
    }
}

impl std::error::Error for TopologyError {}

/// A fixed-topology, layered feed-forward network.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) spec: LayerSpec,
    pub(crate) config: NetworkConfig,
    pub(crate) nodes: SlotMap<NodeId, Node>,
    pub(crate) edges: SlotMap<EdgeId, Edge>,
    pub(crate) layers: Vec<Layer>,
    pub(crate) consensus: Consensus,
    pub(crate) scorecard: Scorecard,
}

impl Network {
    /// Build a fresh random individual.
    ///
    /// Layers are created in depth order and every adjacent pair is fully
    /// connected; each edge draws its strength as it is created.
    pub fn new<R: Rng>(spec: &LayerSpec, config: NetworkConfig, rng: &mut R) -> Self {
        let mut nodes: SlotMap<NodeId, Node> = SlotMap::with_capacity_and_key(spec.node_count());
        let mut layers = Vec::with_capacity(spec.depth_count());

        // LayerSpec keeps depth and width within 16 bits.
        for (depth, &size) in spec.sizes().iter().enumerate() {
            let depth = depth as u16;
            let mut layer = Layer::new(depth, size);
            for index in 0..size {
                let id = nodes.insert(Node::new(node_identity(depth, index as u16), depth));
                layer.nodes.push(id);
            }
            layers.push(layer);
        }

        let mut network = Self {
            spec: spec.clone(),
            config,
            nodes,
            edges: SlotMap::with_capacity_and_key(spec.edge_count()),
            layers,
            consensus: Consensus::default(),
            scorecard: Scorecard::default(),
        };
        for depth in 0..network.layers.len() {
            network.connect_to_next(depth, rng);
        }
        network
    }

    /// Connect every node at `depth` to every node one layer deeper.
    ///
    /// No-op for the output layer.
    fn connect_to_next<R: Rng>(&mut self, depth: usize, rng: &mut R) {
        if depth + 1 >= self.layers.len() {
            return;
        }
        for &source in &self.layers[depth].nodes {
            for &destination in &self.layers[depth + 1].nodes {
                let edge = Edge::new(
                    (source, self.nodes[source].identity),
                    (destination, self.nodes[destination].identity),
                    &self.config,
                    rng,
                );
                let edge_id = self.edges.insert(edge);
                self.nodes[source].outgoing.push(edge_id);
                self.nodes[destination].incoming.push(edge_id);
            }
        }
    }

    /// The layer specification this network was built from.
    #[must_use]
    pub fn spec(&self) -> &LayerSpec {
        &self.spec
    }

    /// Connectivity parameters used for signal propagation.
    #[must_use]
    pub fn network_config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Consensus of the most recent [`read_consensus`](Self::read_consensus).
    #[must_use]
    pub fn consensus(&self) -> Consensus {
        self.consensus
    }

    /// Score counters of the most recent evaluation.
    #[must_use]
    pub fn scorecard(&self) -> &Scorecard {
        &self.scorecard
    }

    /// Match count of the most recent evaluation.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.scorecard.score
    }

    pub(crate) fn scorecard_mut(&mut self) -> &mut Scorecard {
        &mut self.scorecard
    }

    /// Total number of edges, live or dead.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of edges with a nonzero weight.
    #[must_use]
    pub fn live_edge_count(&self) -> usize {
        self.edges.values().filter(|e| e.is_live()).count()
    }

    /// All edges in topological order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Edge weights in topological order.
    pub fn weights(&self) -> impl Iterator<Item = f32> + '_ {
        self.edges.values().map(|e| e.weight)
    }

    /// The edge with `identity`, if this network has one.
    #[must_use]
    pub fn edge(&self, identity: u64) -> Option<&Edge> {
        self.edge_key(identity).map(|key| &self.edges[key])
    }

    /// Overwrite the weight of the edge with `identity`.
    ///
    /// Returns `false` if no such edge exists.
    pub fn set_weight(&mut self, identity: u64, weight: f32) -> bool {
        match self.edge_key(identity) {
            Some(key) => {
                self.edges[key].weight = weight;
                true
            }
            None => false,
        }
    }

    /// Resolve an edge identity through the layer grid.
    ///
    /// A source node's outgoing list is ordered by destination index, so the
    /// destination's index is the edge's position in that list.
    fn edge_key(&self, identity: u64) -> Option<EdgeId> {
        let (source, destination) = split_edge_identity(identity);
        let (depth, index) = split_node_identity(source);
        let (_, target) = split_node_identity(destination);
        let node = *self
            .layers
            .get(usize::from(depth))?
            .nodes
            .get(usize::from(index))?;
        let key = *self.nodes[node].outgoing.get(usize::from(target))?;
        (self.edges[key].identity == identity).then_some(key)
    }

    /// Activations of the layer at `depth`, or `None` past the output layer.
    #[must_use]
    pub fn activations(&self, depth: usize) -> Option<Vec<f32>> {
        self.layers
            .get(depth)
            .map(|layer| layer.nodes.iter().map(|&id| self.nodes[id].activation).collect())
    }

    /// Activations of the output layer.
    #[must_use]
    pub fn output_values(&self) -> Vec<f32> {
        let last = &self.layers[self.layers.len() - 1];
        last.nodes.iter().map(|&id| self.nodes[id].activation).collect()
    }

    /// Clear every activation and the consensus.
    ///
    /// Score counters survive; see [`clear_score`](Self::clear_score).
    pub fn reset(&mut self) {
        for layer in &self.layers {
            layer.reset(&mut self.nodes);
        }
        self.consensus = Consensus::default();
    }

    /// Zero the score counters before a new generation's evaluation.
    pub fn clear_score(&mut self) {
        self.scorecard = Scorecard::default();
    }

    /// Seed the input layer.
    ///
    /// Input nodes beyond the end of `inputs` reuse its last value; an empty
    /// slice seeds zeros.
    pub fn set_inputs(&mut self, inputs: &[f32]) {
        let fallback = inputs.last().copied().unwrap_or(0.0);
        for (index, &id) in self.layers[0].nodes.iter().enumerate() {
            let value = inputs.get(index).copied().unwrap_or(fallback);
            self.nodes[id].set_initial(value);
        }
    }

    /// Fire every layer in depth order, input layer first.
    ///
    /// A layer only fires after all of its inputs have been delivered.
    pub fn propagate(&mut self) {
        for depth in 0..self.layers.len().saturating_sub(1) {
            for position in 0..self.layers[depth].nodes.len() {
                let node_id = self.layers[depth].nodes[position];
                self.fire(node_id);
            }
        }
    }

    /// Deliver one node's activation along each of its outgoing edges.
    ///
    /// An edge fires only when `activation * weight` exceeds the minimum
    /// action potential.
    fn fire(&mut self, node_id: NodeId) {
        let activation = self.nodes[node_id].activation;
        let threshold = self.config.min_action_potential;
        let fill_rate = self.config.fill_rate;

        for position in 0..self.nodes[node_id].outgoing.len() {
            let edge = &self.edges[self.nodes[node_id].outgoing[position]];
            let value = activation * edge.weight;
            if value > threshold {
                let destination = edge.destination;
                self.nodes[destination].signal(value, fill_rate);
            }
        }
    }

    /// Pick the strongest output node.
    ///
    /// Only a strictly greater activation replaces the running best, so ties
    /// go to the lowest index.
    pub fn read_consensus(&mut self) -> Consensus {
        let output = &self.layers[self.layers.len() - 1];
        let mut best = Consensus {
            index: 0,
            confidence: self.nodes[output.nodes[0]].activation,
        };
        for (index, &id) in output.nodes.iter().enumerate().skip(1) {
            let activation = self.nodes[id].activation;
            if activation > best.confidence {
                best = Consensus {
                    index,
                    confidence: activation,
                };
            }
        }
        self.consensus = best;
        best
    }

    /// Edge identity → weight mapping over the whole network.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        self.edges.values().map(|e| (e.identity, e.weight)).collect()
    }

    /// Euclidean distance between the edge weights of two networks.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::Layers`] if the networks were built from
    /// different layer specifications.
    pub fn distance_to(&self, other: &Network) -> Result<f64, TopologyError> {
        self.check_topology(other)?;
        self.fingerprint().distance(&other.fingerprint())
    }

    /// Fail unless both networks share a layer specification.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::Layers`] on mismatch.
    pub fn check_topology(&self, other: &Network) -> Result<(), TopologyError> {
        if self.spec == other.spec {
            Ok(())
        } else {
            Err(TopologyError::Layers {
                left: self.spec.clone(),
                right: other.spec.clone(),
            })
        }
    }

    /// Layer-by-layer structural equality.
    #[must_use]
    pub fn same_topology(&self, other: &Network) -> bool {
        self.layers.len() == other.layers.len()
            && self
                .layers
                .iter()
                .zip(&other.layers)
                .all(|(a, b)| a.structurally_eq(&self.nodes, b, &other.nodes))
    }

    /// Ranking order under `rank_by`: `Less` means `self` ranks ahead.
    #[must_use]
    pub fn rank_cmp(&self, other: &Network, rank_by: RankBy) -> Ordering {
        self.scorecard.rank_cmp(&other.scorecard, rank_by)
    }

    /// A copy with cleared activations and scores, ready to be overwritten
    /// as offspring.
    pub(crate) fn blank_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.reset();
        copy.clear_score();
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::edge_identity;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn spec(sizes: &[usize]) -> LayerSpec {
        LayerSpec::new(sizes.to_vec()).unwrap()
    }

    fn dense() -> NetworkConfig {
        NetworkConfig {
            fill_rate: 1.0,
            ..NetworkConfig::default()
        }
    }

    #[test]
    fn test_construction_counts() {
        let net = Network::new(&spec(&[3, 4, 2]), dense(), &mut test_rng());
        assert_eq!(net.nodes.len(), 9);
        assert_eq!(net.edge_count(), 3 * 4 + 4 * 2);
        assert_eq!(net.live_edge_count(), net.edge_count());
    }

    #[test]
    fn test_edge_lists_follow_layer_position() {
        let net = Network::new(&spec(&[2, 3, 1]), dense(), &mut test_rng());
        for &id in &net.layers[0].nodes {
            assert!(net.nodes[id].incoming.is_empty());
            assert_eq!(net.nodes[id].outgoing.len(), 3);
        }
        for &id in &net.layers[1].nodes {
            assert_eq!(net.nodes[id].incoming.len(), 2);
            assert_eq!(net.nodes[id].outgoing.len(), 1);
        }
        for &id in &net.layers[2].nodes {
            assert_eq!(net.nodes[id].incoming.len(), 3);
            assert!(net.nodes[id].outgoing.is_empty());
        }
    }

    #[test]
    fn test_edge_lookup_by_identity() {
        let mut net = Network::new(&spec(&[3, 4, 2]), dense(), &mut test_rng());
        let ids: Vec<u64> = net.edges().map(|e| e.identity).collect();
        for (i, &id) in ids.iter().enumerate() {
            assert!(net.set_weight(id, i as f32 * 0.01));
        }
        for (i, &id) in ids.iter().enumerate() {
            let edge = net.edge(id).unwrap();
            assert_eq!(edge.identity, id);
            assert!((edge.weight - i as f32 * 0.01).abs() < 1e-6);
        }

        // Skips a layer, runs backwards, points past the grid.
        let input = node_identity(0, 0);
        let output = node_identity(2, 1);
        let hidden = node_identity(1, 0);
        for bogus in [
            edge_identity(input, output),
            edge_identity(hidden, input),
            edge_identity(node_identity(0, 9), hidden),
            edge_identity(input, node_identity(1, 9)),
            edge_identity(node_identity(7, 0), hidden),
        ] {
            assert!(!net.set_weight(bogus, 0.5));
            assert!(net.edge(bogus).is_none());
        }
    }

    #[test]
    fn test_fingerprint_keys_match_across_networks() {
        let mut rng = test_rng();
        let a = Network::new(&spec(&[2, 3, 2]), NetworkConfig::default(), &mut rng);
        let b = Network::new(&spec(&[2, 3, 2]), NetworkConfig::default(), &mut rng);

        let fa = a.fingerprint();
        let fb = b.fingerprint();
        assert_eq!(fa.len(), a.edge_count());
        assert!(fa.0.keys().eq(fb.0.keys()));
        assert!(a.same_topology(&b));
    }

    #[test]
    fn test_distance_symmetric_and_zero_on_self() {
        let mut rng = test_rng();
        let a = Network::new(&spec(&[4, 5, 3]), NetworkConfig::default(), &mut rng);
        let b = Network::new(&spec(&[4, 5, 3]), NetworkConfig::default(), &mut rng);

        let ab = a.distance_to(&b).unwrap();
        let ba = b.distance_to(&a).unwrap();
        assert_eq!(ab.to_bits(), ba.to_bits());
        assert!(ab > 0.0);
        assert_eq!(a.distance_to(&a).unwrap(), 0.0);
        assert_eq!(a.distance_to(&a.clone()).unwrap(), 0.0);
    }

    #[test]
    fn test_distance_rejects_topology_mismatch() {
        let mut rng = test_rng();
        let a = Network::new(&spec(&[2, 2]), dense(), &mut rng);
        let b = Network::new(&spec(&[2, 3]), dense(), &mut rng);
        assert!(matches!(a.distance_to(&b), Err(TopologyError::Layers { .. })));
        assert!(matches!(
            a.fingerprint().distance(&b.fingerprint()),
            Err(TopologyError::EdgeCount { left: 4, right: 6 })
        ));
        assert!(!a.same_topology(&b));
    }

    #[test]
    fn test_set_inputs_reuses_last_value() {
        let mut net = Network::new(&spec(&[4, 1]), dense(), &mut test_rng());
        net.set_inputs(&[0.1, 0.6]);
        let inputs = net.activations(0).unwrap();
        assert_eq!(inputs, vec![0.1, 0.6, 0.6, 0.6]);

        net.set_inputs(&[]);
        assert_eq!(net.activations(0).unwrap(), vec![0.0; 4]);
    }

    #[test]
    fn test_propagation_is_deterministic() {
        let mut net = Network::new(&spec(&[3, 6, 4, 2]), NetworkConfig::default(), &mut test_rng());

        net.set_inputs(&[0.9, 0.2, 0.5]);
        net.propagate();
        let first = net.read_consensus();
        let first_outputs = net.output_values();

        net.reset();
        net.set_inputs(&[0.9, 0.2, 0.5]);
        net.propagate();
        let second = net.read_consensus();

        assert_eq!(first, second);
        assert_eq!(first_outputs, net.output_values());
    }

    #[test]
    fn test_activations_stay_in_unit_range() {
        let mut rng = test_rng();
        for _ in 0..20 {
            let mut net = Network::new(&spec(&[5, 8, 8, 3]), NetworkConfig::default(), &mut rng);
            net.set_inputs(&[1.0, 1.0, 0.8, 0.3, 1.0]);
            net.propagate();
            for depth in 0..4 {
                for a in net.activations(depth).unwrap() {
                    assert!((0.0..=1.0).contains(&a), "activation out of range: {}", a);
                }
            }
        }
    }

    #[test]
    fn test_dead_network_stays_silent() {
        let mut net = Network::new(&spec(&[2, 2]), dense(), &mut test_rng());
        let ids: Vec<u64> = net.edges().map(|e| e.identity).collect();
        for id in ids {
            assert!(net.set_weight(id, 0.0));
        }
        net.set_inputs(&[1.0]);
        net.propagate();
        assert_eq!(net.output_values(), vec![0.0, 0.0]);
        assert!(!net.set_weight(u64::MAX, 1.0));
    }

    #[test]
    fn test_consensus_prefers_earliest_on_tie() {
        let mut net = Network::new(&spec(&[1, 3]), dense(), &mut test_rng());
        let output_ids = net.layers[1].nodes.clone();
        net.nodes[output_ids[0]].activation = 0.2;
        net.nodes[output_ids[1]].activation = 0.7;
        net.nodes[output_ids[2]].activation = 0.7;

        let consensus = net.read_consensus();
        assert_eq!(consensus.index, 1);
        assert!((consensus.confidence - 0.7).abs() < f32::EPSILON);
        assert_eq!(net.consensus(), consensus);

        net.reset();
        assert_eq!(net.consensus(), Consensus::default());
        assert_eq!(net.read_consensus().index, 0);
    }

    #[test]
    fn test_reset_keeps_scores() {
        let mut net = Network::new(&spec(&[1, 1]), dense(), &mut test_rng());
        net.scorecard_mut().score = 3;
        net.reset();
        assert_eq!(net.score(), 3);
        net.clear_score();
        assert_eq!(net.score(), 0);
    }

    #[test]
    fn test_scorecard_record_and_finish() {
        let mut card = Scorecard::default();
        card.record(0.05, 0.8, 0.1);
        card.record(0.5, 0.4, 0.1);
        card.finish(2, ErrorMetric::SumOfSquares);

        assert_eq!(card.score, 1);
        assert!((card.sum_squares - 0.25).abs() < 1e-12);
        assert!((card.sum_roots - 0.5_f64.sqrt()).abs() < 1e-12);
        assert!((card.custom - 0.25 * (1.0 + f64::from(0.4_f32))).abs() < 1e-9);
        assert!((card.average_confidence - (f64::from(0.8_f32) + f64::from(0.4_f32)) / 2.0).abs() < 1e-12);
        assert_eq!(card.error, card.sum_squares);

        card.finish(2, ErrorMetric::SumOfRoots);
        assert_eq!(card.error, card.sum_roots);
    }

    #[test]
    fn test_rank_cmp_orders() {
        let strong = Scorecard {
            score: 5,
            error: 2.0,
            average_confidence: 0.5,
            ..Scorecard::default()
        };
        let accurate = Scorecard {
            score: 3,
            error: 0.5,
            average_confidence: 0.5,
            ..Scorecard::default()
        };
        let confident = Scorecard {
            average_confidence: 0.9,
            ..accurate
        };

        assert_eq!(strong.rank_cmp(&accurate, RankBy::Score), Ordering::Less);
        assert_eq!(strong.rank_cmp(&accurate, RankBy::Error), Ordering::Greater);
        assert_eq!(confident.rank_cmp(&accurate, RankBy::Score), Ordering::Less);
        assert_eq!(confident.rank_cmp(&accurate, RankBy::Error), Ordering::Less);
        assert_eq!(accurate.rank_cmp(&accurate, RankBy::Score), Ordering::Equal);
    }

    #[test]
    fn test_rank_cmp_is_transitive() {
        let mut rng = test_rng();
        let cards: Vec<Scorecard> = (0..30)
            .map(|_| Scorecard {
                score: rng.random_range(0..4),
                error: f64::from(rng.random_range(0..3_u8)),
                average_confidence: f64::from(rng.random_range(0..3_u8)) / 2.0,
                ..Scorecard::default()
            })
            .collect();

        for rank_by in [RankBy::Score, RankBy::Error] {
            for a in &cards {
                for b in &cards {
                    for c in &cards {
                        if a.rank_cmp(b, rank_by) == Ordering::Less
                            && b.rank_cmp(c, rank_by) == Ordering::Less
                        {
                            assert_eq!(a.rank_cmp(c, rank_by), Ordering::Less);
                        }
                    }
                }
            }
        }
    }
}
