use std::collections::BTreeMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use schema_model::Schema;

use crate::error::DependencyError;

/// Orders tables by foreign-key dependency. Vertex per table, directed
/// edge A → B whenever A has a foreign key referencing B ("A depends on
/// B"). Self-references are dropped: PostgreSQL handles them within a
/// single `CREATE TABLE`.
pub struct DependencyResolver {
    graph: DiGraph<String, ()>,
    index_of: BTreeMap<String, NodeIndex>,
}

impl DependencyResolver {
    pub fn new(schema: &Schema) -> Self {
        let mut graph = DiGraph::new();
        let mut index_of = BTreeMap::new();

        let mut table_names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
        table_names.sort();
        for name in &table_names {
            let idx = graph.add_node((*name).to_string());
            index_of.insert((*name).to_string(), idx);
        }

        for table in &schema.tables {
            let Some(&from) = index_of.get(&table.name) else { continue };
            for fk in &table.foreign_keys {
                if fk.referenced_table == table.name {
                    continue;
                }
                if let Some(&to) = index_of.get(&fk.referenced_table) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        Self { graph, index_of }
    }

    /// Kahn's algorithm over each table's own dependency count: tables
    /// depending on nothing emit first.
    pub fn creation_order(&self) -> Result<Vec<String>, DependencyError> {
        self.kahn(Direction::Outgoing)
    }

    /// Symmetric Kahn's algorithm over each table's dependent count: tables
    /// nobody depends on (leaves) emit first.
    pub fn deletion_order(&self) -> Result<Vec<String>, DependencyError> {
        self.kahn(Direction::Incoming)
    }

    fn kahn(&self, degree_direction: Direction) -> Result<Vec<String>, DependencyError> {
        let mut degree: BTreeMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|node| (node, self.graph.edges_directed(node, degree_direction).count()))
            .collect();

        let mut ready: Vec<NodeIndex> = degree.iter().filter(|(_, d)| **d == 0).map(|(n, _)| *n).collect();
        self.sort_by_name(&mut ready);

        let opposite = match degree_direction {
            Direction::Outgoing => Direction::Incoming,
            Direction::Incoming => Direction::Outgoing,
        };

        let mut order = Vec::with_capacity(self.graph.node_count());
        while !ready.is_empty() {
            let node = ready.remove(0);
            order.push(self.graph[node].clone());

            let mut newly_ready = Vec::new();
            for neighbor in self.graph.neighbors_directed(node, opposite) {
                let d = degree.get_mut(&neighbor).expect("every node has a degree entry");
                *d -= 1;
                if *d == 0 {
                    newly_ready.push(neighbor);
                }
            }
            ready.extend(newly_ready);
            self.sort_by_name(&mut ready);
        }

        if order.len() != self.graph.node_count() {
            return Err(DependencyError::Cycle(self.find_cycles()));
        }

        Ok(order)
    }

    fn sort_by_name(&self, nodes: &mut [NodeIndex]) {
        nodes.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
    }

    /// DFS cycle enumeration: walks the graph tracking the current path
    /// and records a cycle whenever a node already on that path is
    /// revisited.
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        let mut cycles = Vec::new();
        let mut visited = vec![false; self.graph.node_count()];

        for start in self.graph.node_indices() {
            if !visited[start.index()] {
                let mut path = Vec::new();
                let mut on_path = vec![false; self.graph.node_count()];
                self.dfs(start, &mut path, &mut on_path, &mut visited, &mut cycles);
            }
        }

        cycles
    }

    fn dfs(
        &self,
        node: NodeIndex,
        path: &mut Vec<NodeIndex>,
        on_path: &mut [bool],
        visited: &mut [bool],
        cycles: &mut Vec<Vec<String>>,
    ) {
        path.push(node);
        on_path[node.index()] = true;

        for neighbor in self.graph.neighbors_directed(node, Direction::Outgoing) {
            if on_path[neighbor.index()] {
                let start = path.iter().position(|&n| n == neighbor).expect("neighbor is on path");
                cycles.push(path[start..].iter().map(|&n| self.graph[n].clone()).collect());
            } else if !visited[neighbor.index()] {
                self.dfs(neighbor, path, on_path, visited, cycles);
            }
        }

        on_path[node.index()] = false;
        visited[node.index()] = true;
        path.pop();
    }
}
