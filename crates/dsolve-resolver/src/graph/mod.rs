//! Arena-backed dependency graph
//!
//! Nodes live in a single `Vec` owned by the graph and are addressed by
//! [`NodeId`] handles. Forward edges are stored on each node as an ordered
//! set of the nodes it depends on; the reverse index keeps, per node, the
//! dependents in the order their edges were created. Both sides are updated
//! together, so removing an edge never leaves a dangling reverse entry.

use std::collections::HashMap;
use std::hash::Hash;

use dsolve_core::Slot;
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

/// Handle of a node inside a [`DependencyGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in creation order
    pub fn index(self) -> usize {
        self.0
    }
}

/// Graph vertex: a key, its payload slot and its outstanding dependencies
#[derive(Debug, Clone)]
pub struct Node<K, V> {
    key: K,
    value: Slot<V>,
    dependencies: IndexSet<NodeId>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: Slot<V>) -> Self {
        Self {
            key,
            value,
            dependencies: IndexSet::new(),
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &Slot<V> {
        &self.value
    }

    /// Nodes this one still waits on, in edge creation order
    pub fn dependencies(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.dependencies.iter().copied()
    }

    /// Number of dependencies not yet resolved
    pub fn outstanding(&self) -> usize {
        self.dependencies.len()
    }
}

/// Registry of nodes with forward and reverse dependency edges
#[derive(Debug, Clone)]
pub struct DependencyGraph<K, V> {
    /// Node arena, in creation order
    nodes: Vec<Node<K, V>>,
    /// Map from key to handle for fast lookups
    index: IndexMap<K, NodeId>,
    /// Reverse edges, parallel to `nodes`
    dependents: Vec<Vec<NodeId>>,
    /// Keys whose payload is still unset, in first-reference order
    unregistered: IndexSet<K>,
}

impl<K, V> DependencyGraph<K, V> {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: IndexMap::new(),
            dependents: Vec::new(),
            unregistered: IndexSet::new(),
        }
    }

    pub fn node(&self, id: NodeId) -> &Node<K, V> {
        &self.nodes[id.0]
    }

    /// All handles, in creation order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Dependents of `id`, in edge creation order
    pub fn dependents(&self, id: NodeId) -> &[NodeId] {
        &self.dependents[id.0]
    }

    /// Get number of nodes in the graph, placeholders included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get number of outstanding dependency edges
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(Node::outstanding).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Keys referenced as dependencies but never registered
    pub fn unregistered(&self) -> impl Iterator<Item = &K> {
        self.unregistered.iter()
    }

    /// Remove an edge from both sides
    pub fn remove_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        if !self.nodes[from.0].dependencies.shift_remove(&to) {
            return false;
        }
        self.dependents[to.0].retain(|&dependent| dependent != from);
        true
    }

    /// Drop every edge pointing at `id`, returning the detached dependents
    ///
    /// Used once `id` is resolved: each dependent gets one step closer to
    /// having no outstanding dependencies.
    pub fn detach_dependents(&mut self, id: NodeId) -> Vec<NodeId> {
        let dependents = std::mem::take(&mut self.dependents[id.0]);
        for dependent in &dependents {
            self.nodes[dependent.0].dependencies.shift_remove(&id);
        }
        dependents
    }

    /// Follow outstanding dependencies from `start` until a node repeats
    ///
    /// Returns the cycle as a closed path (first and last handles equal).
    /// `None` when the walk reaches a node without outstanding dependencies.
    pub fn find_cycle(&self, start: NodeId) -> Option<Vec<NodeId>> {
        let mut path = Vec::new();
        let mut seen: HashMap<NodeId, usize> = HashMap::new();
        let mut current = start;

        loop {
            if let Some(&position) = seen.get(&current) {
                let mut cycle = path[position..].to_vec();
                cycle.push(current);
                return Some(cycle);
            }

            seen.insert(current, path.len());
            path.push(current);

            // Move to next node (first outstanding dependency)
            current = *self.nodes[current.0].dependencies.first()?;
        }
    }

    /// Discard every node, edge and placeholder
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.dependents.clear();
        self.unregistered.clear();
    }
}

impl<K, V> Default for DependencyGraph<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> DependencyGraph<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    /// Get the handle registered for `key`
    pub fn lookup(&self, key: &K) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    /// Add a node; an unset slot marks the key as unregistered
    pub fn insert(&mut self, key: K, value: Slot<V>) -> NodeId {
        let id = NodeId(self.nodes.len());
        if value.is_unset() {
            self.unregistered.insert(key.clone());
        }
        self.index.insert(key.clone(), id);
        self.nodes.push(Node::new(key, value));
        self.dependents.push(Vec::new());
        id
    }

    /// Look up `key`, creating a placeholder when it has not been seen yet
    pub fn node_for(&mut self, key: K) -> NodeId {
        if let Some(id) = self.lookup(&key) {
            return id;
        }

        debug!(key = ?key, "creating placeholder for forward reference");
        self.insert(key, Slot::Unset)
    }

    /// Give a placeholder its payload
    pub fn complete(&mut self, id: NodeId, value: V) {
        let node = &mut self.nodes[id.0];
        node.value.fill(value);
        self.unregistered.shift_remove(&node.key);
    }

    /// Record that `from` depends on `to`
    ///
    /// Returns false when the edge already exists; the reverse index then
    /// stays untouched so each edge is notified once.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        if !self.nodes[from.0].dependencies.insert(to) {
            return false;
        }
        self.dependents[to.0].push(from);
        true
    }
}
