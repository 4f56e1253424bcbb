//! Trigger chain graph.
//!
//! A directed graph over triggers and effects: a trigger points at the
//! effects its synergy patterns grant, and an effect points at the triggers
//! it `feeds`. Walking it over the currently active set shows which effects
//! keep other triggers firing, and which loops sustain themselves.

use super::model::RuleTables;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// A node in the chain graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainNode {
    Trigger(String),
    Effect(String),
}

impl ChainNode {
    pub fn id(&self) -> &str {
        match self {
            ChainNode::Trigger(id) | ChainNode::Effect(id) => id,
        }
    }
}

/// A run of active nodes where each step feeds the next.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriggerChain {
    pub nodes: Vec<ChainNode>,
    /// The last node leads back to the first.
    pub self_sustaining: bool,
}

/// Directed trigger/effect graph built from the rule tables.
#[derive(Debug, Clone)]
pub struct ChainGraph {
    graph: DiGraph<ChainNode, ()>,
    node_map: HashMap<ChainNode, NodeIndex>,
}

impl ChainGraph {
    /// Build the graph. Nodes are inserted in id order so traversal is stable.
    pub fn from_tables(tables: &RuleTables) -> Self {
        let mut graph = Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        };

        let mut triggers: Vec<&str> = tables.triggers.iter().map(|t| t.id.as_str()).collect();
        triggers.sort_unstable();
        for id in triggers {
            graph.add_node(ChainNode::Trigger(id.to_string()));
        }
        let mut effects: Vec<&str> = tables.effects.iter().map(|e| e.id.as_str()).collect();
        effects.sort_unstable();
        for id in effects {
            graph.add_node(ChainNode::Effect(id.to_string()));
        }

        let mut edges: BTreeSet<(ChainNode, ChainNode)> = BTreeSet::new();
        for pattern in &tables.patterns {
            for trigger in &pattern.triggers {
                for effect in &pattern.effects {
                    edges.insert((
                        ChainNode::Trigger(trigger.clone()),
                        ChainNode::Effect(effect.clone()),
                    ));
                }
            }
        }
        for effect in &tables.effects {
            for fed in &effect.feeds {
                edges.insert((
                    ChainNode::Effect(effect.id.clone()),
                    ChainNode::Trigger(fed.clone()),
                ));
            }
        }
        for (from, to) in edges {
            graph.add_edge(from, to);
        }

        graph
    }

    /// Add a node if it doesn't exist and return its index.
    fn add_node(&mut self, node: ChainNode) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&node) {
            idx
        } else {
            let idx = self.graph.add_node(node.clone());
            self.node_map.insert(node, idx);
            idx
        }
    }

    fn add_edge(&mut self, from: ChainNode, to: ChainNode) {
        let from_idx = self.add_node(from);
        let to_idx = self.add_node(to);
        self.graph.add_edge(from_idx, to_idx, ());
    }

    pub fn contains_node(&self, node: &ChainNode) -> bool {
        self.node_map.contains_key(node)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn successors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut next: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(node, petgraph::Direction::Outgoing)
            .collect();
        next.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
        next.dedup();
        next
    }

    fn predecessors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut prev: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(node, petgraph::Direction::Incoming)
            .collect();
        prev.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
        prev.dedup();
        prev
    }

    /// Chains among the active set: `[trigger →] effect → trigger` links
    /// where an active effect feeds an active trigger.
    ///
    /// Self-sustaining loops are reported too, after the plain chains.
    pub fn active_chains(
        &self,
        triggers: &BTreeSet<String>,
        effects: &BTreeSet<String>,
    ) -> Vec<TriggerChain> {
        let active: HashSet<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&idx| is_active(&self.graph[idx], triggers, effects))
            .collect();

        let mut chains: BTreeSet<TriggerChain> = BTreeSet::new();
        for &effect_idx in &active {
            if !matches!(self.graph[effect_idx], ChainNode::Effect(_)) {
                continue;
            }
            let fed: Vec<NodeIndex> = self
                .successors(effect_idx)
                .into_iter()
                .filter(|n| active.contains(n))
                .collect();
            if fed.is_empty() {
                continue;
            }
            let sources: Vec<NodeIndex> = self
                .predecessors(effect_idx)
                .into_iter()
                .filter(|n| active.contains(n))
                .collect();

            for &target in &fed {
                if sources.is_empty() {
                    chains.insert(TriggerChain {
                        nodes: vec![self.graph[effect_idx].clone(), self.graph[target].clone()],
                        self_sustaining: false,
                    });
                }
                for &source in &sources {
                    chains.insert(TriggerChain {
                        nodes: vec![
                            self.graph[source].clone(),
                            self.graph[effect_idx].clone(),
                            self.graph[target].clone(),
                        ],
                        self_sustaining: false,
                    });
                }
            }
        }

        let mut out: Vec<TriggerChain> = chains.into_iter().collect();
        out.extend(self.find_loops(&active));
        out
    }

    /// Cycles within `active`, one per back edge of a depth-first search.
    fn find_loops(&self, active: &HashSet<NodeIndex>) -> Vec<TriggerChain> {
        let mut visited = HashSet::new();
        let mut loops: BTreeSet<Vec<ChainNode>> = BTreeSet::new();

        let mut starts: Vec<NodeIndex> = active.iter().copied().collect();
        starts.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));

        for node_idx in starts {
            if !visited.contains(&node_idx) {
                let mut rec_stack = HashSet::new();
                let mut path = Vec::new();
                self.dfs_loops(node_idx, active, &mut visited, &mut rec_stack, &mut path, &mut loops);
            }
        }

        loops
            .into_iter()
            .map(|nodes| TriggerChain {
                nodes,
                self_sustaining: true,
            })
            .collect()
    }

    fn dfs_loops(
        &self,
        node: NodeIndex,
        active: &HashSet<NodeIndex>,
        visited: &mut HashSet<NodeIndex>,
        rec_stack: &mut HashSet<NodeIndex>,
        path: &mut Vec<NodeIndex>,
        loops: &mut BTreeSet<Vec<ChainNode>>,
    ) {
        visited.insert(node);
        rec_stack.insert(node);
        path.push(node);

        for neighbor in self.successors(node) {
            if !active.contains(&neighbor) {
                continue;
            }
            if !visited.contains(&neighbor) {
                self.dfs_loops(neighbor, active, visited, rec_stack, path, loops);
            } else if rec_stack.contains(&neighbor) {
                if let Some(start) = path.iter().position(|&n| n == neighbor) {
                    let cycle: Vec<ChainNode> =
                        path[start..].iter().map(|&n| self.graph[n].clone()).collect();
                    loops.insert(canonical_rotation(cycle));
                }
            }
        }

        rec_stack.remove(&node);
        path.pop();
    }
}

fn is_active(node: &ChainNode, triggers: &BTreeSet<String>, effects: &BTreeSet<String>) -> bool {
    match node {
        ChainNode::Trigger(id) => triggers.contains(id),
        ChainNode::Effect(id) => effects.contains(id),
    }
}

/// Rotate a cycle so its smallest node comes first.
fn canonical_rotation(mut cycle: Vec<ChainNode>) -> Vec<ChainNode> {
    if let Some(min_pos) = cycle
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.cmp(b.1))
        .map(|(i, _)| i)
    {
        cycle.rotate_left(min_pos);
    }
    cycle
}
