//! Module ordering by hard dependencies.
//!
//! A module whose `dependency-type` is `hard` must be deployed after every
//! module it requires, either by module name or through a dependency the
//! other module provides. Soft dependencies impose no order. Modules that are
//! not constrained keep their descriptor order.

use std::collections::{BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, trace};

use crate::descriptor::DeploymentDescriptor;
use crate::error::{ContentError, MessageKey, Result};

/// Orders a descriptor's modules for processing.
pub trait ModuleSorter: Send + Sync {
  /// Return every module name of `descriptor` in processing order.
  ///
  /// `hard` holds the names of modules with hard dependencies.
  fn sort(&self, descriptor: &DeploymentDescriptor, hard: &BTreeSet<String>) -> Result<Vec<String>>;
}

/// Default sorter: a dependency graph over the descriptor's modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardDependencySorter;

impl HardDependencySorter {
  fn graph(descriptor: &DeploymentDescriptor, hard: &BTreeSet<String>) -> DiGraph<usize, ()> {
    let mut graph = DiGraph::new();
    let nodes: HashMap<&str, NodeIndex> = descriptor
      .modules
      .iter()
      .enumerate()
      .map(|(position, module)| (module.name.as_str(), graph.add_node(position)))
      .collect();

    for module in descriptor.modules.iter().filter(|m| hard.contains(&m.name)) {
      let dependent = nodes[module.name.as_str()];
      for dependency in &module.requires {
        let target = descriptor
          .module(dependency.name())
          .or_else(|| descriptor.provider_of(dependency.name()));
        if let Some(target) = target
          && target.name != module.name
        {
          // Edge from dependency to dependent
          graph.update_edge(nodes[target.name.as_str()], dependent, ());
        }
      }
    }

    graph
  }
}

impl ModuleSorter for HardDependencySorter {
  fn sort(&self, descriptor: &DeploymentDescriptor, hard: &BTreeSet<String>) -> Result<Vec<String>> {
    let graph = Self::graph(descriptor, hard);

    let mut in_degree: HashMap<NodeIndex, usize> = graph
      .node_indices()
      .map(|idx| (idx, graph.neighbors_directed(idx, Direction::Incoming).count()))
      .collect();

    // Ready nodes ordered by descriptor position keep the sort stable.
    let mut ready: BTreeSet<(usize, NodeIndex)> = graph
      .node_indices()
      .filter(|idx| in_degree[idx] == 0)
      .map(|idx| (graph[idx], idx))
      .collect();

    let mut order = Vec::with_capacity(descriptor.modules.len());
    while let Some((position, idx)) = ready.pop_first() {
      order.push(descriptor.modules[position].name.clone());
      for dependent in graph.neighbors_directed(idx, Direction::Outgoing) {
        if let Some(degree) = in_degree.get_mut(&dependent) {
          *degree = degree.saturating_sub(1);
          if *degree == 0 {
            ready.insert((graph[dependent], dependent));
          }
        }
      }
    }

    if order.len() < descriptor.modules.len() {
      let cyclic: Vec<&str> = descriptor
        .modules
        .iter()
        .map(|m| m.name.as_str())
        .filter(|name| !order.iter().any(|o| o == name))
        .collect();
      debug!(modules = ?cyclic, "hard dependency cycle");
      return Err(ContentError::new(MessageKey::CircularModuleDependencies, cyclic).into());
    }

    trace!(order = ?order, "module order");
    Ok(order)
  }
}
