//! Common utilities for benchmarks

use criterion::Criterion;
use dsolve_resolver::{Resolver, SelectionStrategy};
use petgraph::graph::{DiGraph, NodeIndex};
use pprof::criterion::{Output, PProfProfiler};

/// Items as (key, dependencies), in registration order
pub type GraphLayout = Vec<(usize, Vec<usize>)>;

/// Configure criterion with flamegraph profiling support
pub fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(std::time::Duration::from_secs(3))
        .measurement_time(std::time::Duration::from_secs(10))
        .sample_size(100)
        .with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
}

/// `n` items where each one depends on the previous
pub fn chain(n: usize) -> GraphLayout {
    (0..n)
        .map(|i| (i, if i == 0 { Vec::new() } else { vec![i - 1] }))
        .collect()
}

/// Layers of `width` items, each depending on every item of the layer below
pub fn lattice(width: usize, depth: usize) -> GraphLayout {
    (0..width * depth)
        .map(|i| {
            let layer = i / width;
            let dependencies = if layer == 0 {
                Vec::new()
            } else {
                ((layer - 1) * width..layer * width).collect()
            };
            (i, dependencies)
        })
        .collect()
}

/// One root depending on `n` leaves
pub fn fan_in(n: usize) -> GraphLayout {
    let mut layout: GraphLayout = (1..=n).map(|leaf| (leaf, Vec::new())).collect();
    layout.push((0, (1..=n).collect()));
    layout
}

/// Register `layout` back to front, so most dependencies start as placeholders
pub fn load(layout: &GraphLayout, strategy: SelectionStrategy) -> Resolver<usize, usize> {
    let mut resolver = Resolver::with_strategy(strategy);
    for (key, dependencies) in layout.iter().rev() {
        resolver
            .register(*key, *key, dependencies.iter().copied())
            .expect("generated graphs have unique values");
    }
    resolver
}

/// Same graph as a petgraph DiGraph with edges from dependency to dependent
pub fn petgraph_baseline(layout: &GraphLayout) -> DiGraph<usize, ()> {
    let mut graph = DiGraph::new();
    let indices: Vec<NodeIndex> = (0..layout.len()).map(|key| graph.add_node(key)).collect();
    for (key, dependencies) in layout {
        for dependency in dependencies {
            graph.add_edge(indices[*dependency], indices[*key], ());
        }
    }
    graph
}
