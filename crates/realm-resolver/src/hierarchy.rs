//! Extends-from closures for legacy named configurations.
//!
//! Definitions are loaded into an index-addressed petgraph table, then walked
//! with an explicit stack. The stack doubles as the active recursion path, so
//! revisiting a configuration that is still on it reports a cycle instead of
//! looping, and the depth of the walk never touches the call stack.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use realm_core::configuration::{Configuration, Hierarchy};
use realm_util::errors::RealmError;

/// A configuration as indexed: the definitions key is its name.
struct Node<'a> {
    name: &'a str,
    extends_from: &'a [String],
}

/// Configuration definitions indexed for traversal.
///
/// Edges point from a configuration to each declared parent that exists.
/// Parent names are kept on the node so that dangling references are only
/// reported when a traversal actually reaches them.
pub struct ConfigurationGraph<'a> {
    graph: DiGraph<Node<'a>, ()>,
    index: HashMap<&'a str, NodeIndex>,
}

impl<'a> ConfigurationGraph<'a> {
    pub fn new(definitions: &'a BTreeMap<String, Configuration>) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        for (name, configuration) in definitions {
            if configuration.name != *name {
                tracing::warn!(
                    "Configuration keyed '{}' is named '{}'; using the key",
                    name,
                    configuration.name
                );
            }
            let idx = graph.add_node(Node {
                name: name.as_str(),
                extends_from: &configuration.extends_from,
            });
            index.insert(name.as_str(), idx);
        }
        for (name, configuration) in definitions {
            let from = index[name.as_str()];
            for parent in &configuration.extends_from {
                if let Some(&to) = index.get(parent.as_str()) {
                    graph.update_edge(from, to, ());
                }
            }
        }
        Self { graph, index }
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Every configuration reachable from `name`, `name` included.
    pub fn hierarchy_of(&self, name: &str) -> Result<Hierarchy, RealmError> {
        let start = *self
            .index
            .get(name)
            .ok_or_else(|| RealmError::UnknownConfiguration {
                name: name.to_string(),
            })?;

        if self.graph[start].extends_from.is_empty() {
            return Ok(Hierarchy::singleton(name));
        }

        let mut members = vec![name.to_string()];
        let mut visited = HashSet::from([start]);
        let mut on_path = HashSet::from([start]);
        // (configuration, index of the next parent to visit)
        let mut stack: Vec<(NodeIndex, usize)> = vec![(start, 0)];

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            let configuration = &self.graph[node];
            let Some(parent_name) = configuration.extends_from.get(next) else {
                stack.pop();
                on_path.remove(&node);
                continue;
            };
            frame.1 += 1;

            let parent = *self.index.get(parent_name.as_str()).ok_or_else(|| {
                RealmError::UndeclaredConfiguration {
                    name: parent_name.clone(),
                    referenced_by: configuration.name.to_string(),
                }
            })?;

            if on_path.contains(&parent) {
                return Err(self.cycle_error(&stack, parent));
            }
            if visited.insert(parent) {
                members.push(self.graph[parent].name.to_string());
                on_path.insert(parent);
                stack.push((parent, 0));
            }
        }

        tracing::debug!("Hierarchy of '{}': {} configurations", name, members.len());
        Ok(Hierarchy::from_members(name, members))
    }

    /// The closure of every configuration, keyed by name.
    ///
    /// Each closure is computed on its own: a cyclic or dangling configuration
    /// fails only its own entry and the ones that inherit from it.
    pub fn hierarchies(&self) -> BTreeMap<String, Result<Hierarchy, RealmError>> {
        self.index
            .keys()
            .map(|&name| (name.to_string(), self.hierarchy_of(name)))
            .collect()
    }

    /// One path per group of configurations that inherit from each other in a
    /// loop. Each path starts and ends at the group's first name in sorted
    /// order; a configuration extending itself gives `[name, name]`.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .filter_map(|scc| self.loop_through(&scc))
            .collect();
        cycles.sort();
        cycles
    }

    /// `(configuration, missing parent)` pairs for every dangling extends-from.
    pub fn undeclared_references(&self) -> Vec<(String, String)> {
        let mut missing = Vec::new();
        for configuration in self.graph.node_weights() {
            for parent in configuration.extends_from {
                if !self.index.contains_key(parent.as_str()) {
                    missing.push((configuration.name.to_string(), parent.clone()));
                }
            }
        }
        missing.sort();
        missing
    }

    // Shortest path from the group's first member back to itself, staying
    // inside the group and following parents in declaration order.
    fn loop_through(&self, scc: &[NodeIndex]) -> Option<Vec<String>> {
        let start = *scc.iter().min_by_key(|&&idx| self.graph[idx].name)?;
        let members: HashSet<NodeIndex> = scc.iter().copied().collect();
        let mut previous: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::from([start]);

        while let Some(node) = queue.pop_front() {
            for parent in self.graph[node].extends_from {
                let Some(&next) = self.index.get(parent.as_str()) else {
                    continue;
                };
                if next == start {
                    let mut between = Vec::new();
                    let mut cursor = node;
                    while cursor != start {
                        between.push(cursor);
                        cursor = *previous.get(&cursor)?;
                    }
                    let path = std::iter::once(start)
                        .chain(between.into_iter().rev())
                        .chain(std::iter::once(start))
                        .map(|idx| self.graph[idx].name.to_string())
                        .collect();
                    return Some(path);
                }
                if members.contains(&next) && !previous.contains_key(&next) {
                    previous.insert(next, node);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    fn cycle_error(&self, stack: &[(NodeIndex, usize)], back_to: NodeIndex) -> RealmError {
        let start = stack.iter().position(|(idx, _)| *idx == back_to).unwrap_or(0);
        let mut path: Vec<&str> = stack[start..]
            .iter()
            .map(|(idx, _)| self.graph[*idx].name)
            .collect();
        path.push(self.graph[back_to].name);
        RealmError::ConfigurationCycle {
            path: render_cycle(&path),
        }
    }
}

/// Render a cycle path as `a -> b -> a`.
pub fn render_cycle<S: AsRef<str>>(path: &[S]) -> String {
    path.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" -> ")
}

/// Every configuration reachable from `name` through extends-from, `name` included.
pub fn hierarchy_of(
    name: &str,
    definitions: &BTreeMap<String, Configuration>,
) -> Result<Hierarchy, RealmError> {
    ConfigurationGraph::new(definitions).hierarchy_of(name)
}

/// The closure of every configuration in `definitions`, keyed by name, each
/// computed independently.
pub fn hierarchies(
    definitions: &BTreeMap<String, Configuration>,
) -> BTreeMap<String, Result<Hierarchy, RealmError>> {
    ConfigurationGraph::new(definitions).hierarchies()
}
