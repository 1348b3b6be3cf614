//! Registration and resolution of named items
//!
//! Items are registered with the names of the items they depend on, in any
//! order. Names referenced before they are registered become placeholders
//! that a later `register` call completes in place. `resolve` then walks
//! the graph in dependency order and calls back once per dependency edge.
//!
//! Resolution is all-or-nothing per call: a missing registration is
//! reported before any callback fires, a cycle is reported when it is
//! reached. Callbacks already fired for earlier nodes are not rolled back.
//!
//! `resolve` borrows the resolver mutably for the whole pass, so the
//! callback cannot register more items while resolution is running.

use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;

use dsolve_core::{DependencyError, Slot};
use tracing::{debug, trace, warn};

use crate::graph::{DependencyGraph, NodeId};
use crate::strategy::SelectionStrategy;
use crate::ResolverResult;

/// Dependency resolver over caller-supplied keys and payloads
#[derive(Debug, Clone)]
pub struct Resolver<K, V> {
    graph: DependencyGraph<K, V>,
    strategy: SelectionStrategy,
}

impl<K, V> Resolver<K, V> {
    /// Create a resolver using the default selection strategy
    pub fn new() -> Self {
        Self::with_strategy(SelectionStrategy::default())
    }

    pub fn with_strategy(strategy: SelectionStrategy) -> Self {
        Self {
            graph: DependencyGraph::new(),
            strategy,
        }
    }

    pub fn strategy(&self) -> SelectionStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: SelectionStrategy) {
        self.strategy = strategy;
    }

    /// Number of known keys, placeholders included
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Number of dependency edges not yet consumed by a resolution pass
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Read-only view of the underlying graph
    pub fn graph(&self) -> &DependencyGraph<K, V> {
        &self.graph
    }

    /// Discard every registered item, placeholder and edge
    pub fn clear(&mut self) {
        debug!(nodes = self.graph.node_count(), "clearing resolver");
        self.graph.clear();
    }
}

impl<K, V> Default for Resolver<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Resolver<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: PartialEq + Clone,
{
    /// Register `key` with its payload and the keys it depends on
    ///
    /// Dependencies that are not registered yet get placeholder nodes.
    /// Registering a placeholder completes it; registering a completed key
    /// again with an equal value only adds the new dependencies. A different
    /// value fails with `DuplicateKey` and leaves the graph untouched.
    pub fn register<I>(&mut self, key: K, value: V, dependencies: I) -> ResolverResult<(), K, V>
    where
        I: IntoIterator<Item = K>,
    {
        let id = match self.graph.lookup(&key) {
            None => self.graph.insert(key, Slot::Set(value)),
            Some(id) => match self.graph.node(id).value() {
                Slot::Unset => {
                    debug!(key = ?key, "completing placeholder");
                    self.graph.complete(id, value);
                    id
                },
                Slot::Set(old) if *old != value => {
                    return Err(DependencyError::DuplicateKey {
                        key,
                        old: old.clone(),
                        new: value,
                    });
                },
                Slot::Set(_) => id,
            },
        };

        for dependency in dependencies {
            let dependency = self.graph.node_for(dependency);
            if self.graph.add_edge(id, dependency) {
                trace!(
                    dependent = ?self.graph.node(id).key(),
                    dependency = ?self.graph.node(dependency).key(),
                    "added dependency edge"
                );
            }
        }

        Ok(())
    }

    /// Resolve the graph, calling `callback(dependency, dependent)` once per edge
    ///
    /// A node's edges are reported only after all of its own dependencies
    /// have been resolved. Dependents of the same node are reported in the
    /// order their edges were registered.
    pub fn resolve<F>(&mut self, callback: F) -> ResolverResult<(), K, V>
    where
        F: FnMut(&V, &V),
    {
        self.run(callback).map(|_| ())
    }

    /// Like [`Resolver::resolve`], also returning the keys in resolution order
    pub fn resolve_order<F>(&mut self, callback: F) -> ResolverResult<Vec<K>, K, V>
    where
        F: FnMut(&V, &V),
    {
        let order = self.run(callback)?;
        Ok(order
            .into_iter()
            .map(|id| self.graph.node(id).key().clone())
            .collect())
    }

    /// Keys referenced as dependencies but not registered yet
    pub fn unregistered(&self) -> Vec<K> {
        self.graph.unregistered().cloned().collect()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.graph.lookup(key).is_some()
    }

    /// Payload registered for `key`; `None` for unknown keys and placeholders
    pub fn get(&self, key: &K) -> Option<&V> {
        let id = self.graph.lookup(key)?;
        self.graph.node(id).value().as_set()
    }

    /// Outstanding dependencies of `key`, in registration order
    pub fn dependencies_of(&self, key: &K) -> Option<Vec<K>> {
        let id = self.graph.lookup(key)?;
        Some(
            self.graph
                .node(id)
                .dependencies()
                .map(|dependency| self.graph.node(dependency).key().clone())
                .collect(),
        )
    }

    /// Keys waiting on `key`, in registration order
    pub fn dependents_of(&self, key: &K) -> Option<Vec<K>> {
        let id = self.graph.lookup(key)?;
        Some(
            self.graph
                .dependents(id)
                .iter()
                .map(|&dependent| self.graph.node(dependent).key().clone())
                .collect(),
        )
    }

    fn run<F>(&mut self, mut callback: F) -> ResolverResult<Vec<NodeId>, K, V>
    where
        F: FnMut(&V, &V),
    {
        if let Some(key) = self.graph.unregistered().next() {
            warn!(key = ?key, "cannot resolve: dependency was never registered");
            return Err(DependencyError::UnregisteredDependency { key: key.clone() });
        }

        debug!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            strategy = %self.strategy,
            "resolving dependency graph"
        );

        let order = match self.strategy {
            SelectionStrategy::LeastOutstanding => self.resolve_least_outstanding(&mut callback)?,
            SelectionStrategy::ReadyQueue => self.resolve_ready_queue(&mut callback)?,
        };

        debug!(resolved = order.len(), "dependency graph resolved");
        Ok(order)
    }

    /// Repeated arg-min scan over the pending nodes
    fn resolve_least_outstanding<F>(&mut self, callback: &mut F) -> ResolverResult<Vec<NodeId>, K, V>
    where
        F: FnMut(&V, &V),
    {
        let mut pending: Vec<NodeId> = self.graph.ids().collect();
        let mut order = Vec::with_capacity(pending.len());

        while !pending.is_empty() {
            // min_by_key keeps the first minimum, so ties go to the oldest node
            let position = pending
                .iter()
                .enumerate()
                .min_by_key(|(_, id)| self.graph.node(**id).outstanding())
                .map(|(position, _)| position)
                .unwrap_or(0);
            let id = pending.remove(position);

            if self.graph.node(id).outstanding() != 0 {
                return Err(self.circular(id));
            }

            self.settle(id, callback)?;
            order.push(id);
        }

        Ok(order)
    }

    /// Kahn's algorithm with a FIFO ready queue
    fn resolve_ready_queue<F>(&mut self, callback: &mut F) -> ResolverResult<Vec<NodeId>, K, V>
    where
        F: FnMut(&V, &V),
    {
        let mut ready: VecDeque<NodeId> = self
            .graph
            .ids()
            .filter(|&id| self.graph.node(id).outstanding() == 0)
            .collect();
        let mut resolved = vec![false; self.graph.node_count()];
        let mut order = Vec::with_capacity(self.graph.node_count());

        while let Some(id) = ready.pop_front() {
            for dependent in self.settle(id, callback)? {
                if self.graph.node(dependent).outstanding() == 0 {
                    ready.push_back(dependent);
                }
            }
            resolved[id.index()] = true;
            order.push(id);
        }

        // Every node left over waits on another leftover node
        if let Some(stuck) = self.graph.ids().find(|id| !resolved[id.index()]) {
            return Err(self.circular(stuck));
        }

        Ok(order)
    }

    /// Notify the dependents of a resolved node, then drop its edges
    fn settle<F>(&mut self, id: NodeId, callback: &mut F) -> ResolverResult<Vec<NodeId>, K, V>
    where
        F: FnMut(&V, &V),
    {
        trace!(key = ?self.graph.node(id).key(), "resolved");

        let dependents = self.graph.dependents(id);
        if !dependents.is_empty() {
            let value = self.payload(id)?;
            for &dependent in dependents {
                trace!(
                    dependency = ?self.graph.node(id).key(),
                    dependent = ?self.graph.node(dependent).key(),
                    "notifying dependent"
                );
                callback(value, self.payload(dependent)?);
            }
        }

        Ok(self.graph.detach_dependents(id))
    }

    fn payload(&self, id: NodeId) -> ResolverResult<&V, K, V> {
        let node = self.graph.node(id);
        node.value()
            .as_set()
            .ok_or_else(|| DependencyError::UnregisteredDependency {
                key: node.key().clone(),
            })
    }

    /// Build the cycle error for a node that can never be resolved
    fn circular(&self, stuck: NodeId) -> DependencyError<K, V> {
        let cycle: Vec<K> = match self.graph.find_cycle(stuck) {
            Some(cycle) => cycle
                .into_iter()
                .map(|id| self.graph.node(id).key().clone())
                .collect(),
            None => vec![self.graph.node(stuck).key().clone()],
        };
        let key = cycle[0].clone();

        warn!(
            key = ?key,
            cycle = %dsolve_core::format_cycle(&cycle),
            "cannot resolve: circular dependency"
        );
        DependencyError::CircularDependency { key, cycle }
    }
}
