//! Representing control flow graphs.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io::Write;
use std::ops::{Deref, Index, IndexMut};
use std::process::{Command, Stdio};

use anyhow::Context as AnyhowContext;
use anyhow::Result;

use super::Branch;

/// A node index in the graph.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIx(u64);

impl fmt::Debug for NodeIx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "§{}", self.0)
    }
}

impl fmt::Display for NodeIx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

/// Type alias for a label (node index) in the control flow graph.
pub type CfgLabel = NodeIx;

/// An edge index in the graph.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct EdgeIx(u64);

impl fmt::Debug for EdgeIx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "§{}", self.0)
    }
}

/// A node in the graph.
#[derive(PartialEq, Eq, Debug)]
struct Node<N> {
    /// Value/weight of that node.
    value: N,
    /// List of ingoing edges, with their branch.
    ins: BTreeMap<EdgeIx, Branch>,
    /// List of outgoing edges, indexed by their branch.
    outs: BTreeMap<Branch, EdgeIx>,
}

/// An edge in the graph.
///
/// All edges are directed.
#[derive(PartialEq, Eq, Debug, Hash)]
struct Edge {
    /// Node index of the origin of the edge.
    from: NodeIx,
    /// Node index of the target of the edge.
    to: NodeIx,
}

impl<N> Deref for Node<N> {
    type Target = N;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<N> From<N> for Node<N> {
    fn from(value: N) -> Self {
        Self {
            value,
            ins: BTreeMap::new(),
            outs: BTreeMap::new(),
        }
    }
}

/// A control flow graph. It's basically a graph, tailored to our needs.
///
/// Nodes and edges are kept in index order, so that every traversal is
/// deterministic.
#[derive(PartialEq, Eq)]
pub struct Cfg<N> {
    /// Map of node indexes to node data.
    node_map: BTreeMap<NodeIx, Node<N>>,
    /// Map of edge indexes to the edge data.
    edge_map: BTreeMap<EdgeIx, Edge>,
    /// Fresh node index counter.
    node_ix_counter: u64,
    /// Fresh edge index counter.
    edge_ix_counter: u64,
}

impl<N> Cfg<N> {
    /// Adds a new node to the graph, returning its label in the CFG.
    pub fn add_node(&mut self, node: N) -> CfgLabel {
        let label = NodeIx(self.node_ix_counter);
        self.node_ix_counter += 1;
        self.node_map.insert(label, node.into());
        label
    }

    /// Adds a new edge between `from` and `to` in the graph for `branch`.
    ///
    /// # Panics
    /// Panics if `from` already has an outgoing edge for that branch.
    pub fn add_edge(&mut self, from: CfgLabel, to: CfgLabel, branch: Branch) {
        let ix = EdgeIx(self.edge_ix_counter);
        self.edge_ix_counter += 1;

        // Add at `from` and `to`
        assert!(
            self.node_map
                .get_mut(&from)
                .expect("edge from an unknown node")
                .outs
                .insert(branch, ix)
                .is_none(),
            "there is already an outgoing edge from {from:?} for branch {branch:?}",
        );
        self.node_map
            .get_mut(&to)
            .expect("edge to an unknown node")
            .ins
            .insert(ix, branch);

        // Add the edge in itself
        self.edge_map.insert(ix, Edge { from, to });
    }

    /// Removes a node and all its edges.
    fn remove_node(&mut self, label: CfgLabel) -> Option<N> {
        let node = self.node_map.remove(&label)?;
        for ix in node.outs.values() {
            if let Some(edge) = self.edge_map.remove(ix) {
                if let Some(target) = self.node_map.get_mut(&edge.to) {
                    target.ins.remove(ix);
                }
            }
        }
        for ix in node.ins.keys() {
            if let Some(edge) = self.edge_map.remove(ix) {
                if let Some(source) = self.node_map.get_mut(&edge.from) {
                    source.outs.retain(|_, out| out != ix);
                }
            }
        }
        Some(node.value)
    }

    /// Removes every node that cannot be reached from `start`.
    ///
    /// Returns the number of removed nodes.
    pub fn retain_reachable(&mut self, start: CfgLabel) -> usize {
        let reachable: HashSet<CfgLabel> = self.postorder(start).collect();
        let unreachable: Vec<CfgLabel> = self
            .labels()
            .filter(|label| !reachable.contains(label))
            .collect();
        for &label in &unreachable {
            self.remove_node(label);
        }
        unreachable.len()
    }

    /// All labels, in creation order.
    pub fn labels(&self) -> impl Iterator<Item = CfgLabel> + '_ {
        self.node_map.keys().copied()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// Is the graph empty?
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    /// Outgoing neighbors, in branch order.
    pub fn neighbors(&self, node: CfgLabel) -> impl Iterator<Item = CfgLabel> + '_ {
        self.node_map[&node]
            .outs
            .values()
            .map(|e| self.edge_map[e].to)
    }

    /// Outgoing edges with their branch, in branch order.
    pub fn out_edges(&self, node: CfgLabel) -> impl Iterator<Item = (Branch, CfgLabel)> + '_ {
        self.node_map[&node]
            .outs
            .iter()
            .map(|(branch, e)| (*branch, self.edge_map[e].to))
    }

    /// Ingoing neighbors.
    pub fn preneighbors(&self, node: CfgLabel) -> impl Iterator<Item = CfgLabel> + '_ {
        self.node_map[&node]
            .ins
            .keys()
            .map(|e| self.edge_map[e].from)
    }

    /// Returns a postorder iterator over the nodes reachable from `start`.
    pub fn postorder(&self, start: CfgLabel) -> PostOrder {
        PostOrder::new(self, start)
    }

    /// Labels reachable from `start`, in reverse postorder.
    ///
    /// This is the usual forward dataflow order: a node comes before its
    /// successors, except along back edges.
    pub fn reverse_postorder(&self, start: CfgLabel) -> Vec<CfgLabel> {
        let mut order: Vec<_> = self.postorder(start).collect();
        order.reverse();
        order
    }
}

impl<N: fmt::Debug> Cfg<N> {
    /// GraphViz rendering of the graph, with the debug output of each node as
    /// its label.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph cfg {\n\tnode [shape=box, fontname=monospace];\n");
        for (ix, node) in &self.node_map {
            let value = format!("{:?}", node.value)
                .replace('"', "\\\"")
                .replace('\n', "\\l");
            dot.push_str(&format!("\t{ix} [label=\"{ix}:\\l{value}\\l\"];\n"));
        }
        for (from, node) in &self.node_map {
            for (branch, e) in &node.outs {
                let to = self.edge_map[e].to;
                dot.push_str(&format!("\t{from} -> {to} [label=\"{branch:?}\"];\n"));
            }
        }
        dot.push('}');
        dot
    }

    /// Plots the graph to `name.png` in the working directory.
    ///
    /// Needs the GraphViz `dot` tool.
    pub fn print_image(&self, name: impl Borrow<str>) -> Result<()> {
        let name = name.borrow();
        ensure!(
            !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_'),
            "`{name}` cannot be used as a file name"
        );
        let mut plot = Command::new("dot")
            .arg("-Tpng")
            .arg("-o")
            .arg(format!("{name}.png"))
            .stdin(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context("could not run `dot`, is GraphViz installed?")?;
        plot.stdin
            .take()
            .context("no input stream to `dot`")?
            .write_all(self.to_dot().as_bytes())?;
        let output = plot.wait_with_output()?;
        ensure!(
            output.status.success(),
            "could not plot the control flow graph: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        Ok(())
    }
}

impl<N> Default for Cfg<N> {
    fn default() -> Self {
        Self {
            node_map: BTreeMap::new(),
            edge_map: BTreeMap::new(),
            node_ix_counter: 0,
            edge_ix_counter: 0,
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for Cfg<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.node_map.iter().map(|(ix, node)| (ix, &node.value)))
            .finish()
    }
}

impl<N> Index<&CfgLabel> for Cfg<N> {
    type Output = N;

    fn index(&self, index: &CfgLabel) -> &N {
        &self.node_map[index].value
    }
}

impl<N> IndexMut<&CfgLabel> for Cfg<N> {
    fn index_mut(&mut self, index: &CfgLabel) -> &mut N {
        &mut self
            .node_map
            .get_mut(index)
            .expect("no node with that label")
            .value
    }
}

/// Post-order iterator over a graph.
///
/// Its reverse is the standard flow control linearization you would expect: it
/// returns items in the order you would see them in a source code.
pub struct PostOrder {
    /// Labels in postorder, computed eagerly.
    result: std::vec::IntoIter<NodeIx>,
}

impl PostOrder {
    /// Computes the postorder of the nodes of `graph` reachable from `start`.
    fn new<N>(graph: &Cfg<N>, start: CfgLabel) -> Self {
        let mut result = vec![];
        let mut visited = HashSet::new();
        // Iterative DFS: each stack entry is a node and its pending successors
        let mut stack: Vec<(NodeIx, Vec<NodeIx>)> = vec![];
        if graph.node_map.contains_key(&start) {
            visited.insert(start);
            stack.push((start, graph.neighbors(start).collect()));
        }
        while let Some((node, pending)) = stack.last_mut() {
            // Visit successors in branch order
            if pending.is_empty() {
                result.push(*node);
                stack.pop();
            } else {
                let next = pending.remove(0);
                if visited.insert(next) {
                    stack.push((next, graph.neighbors(next).collect()));
                }
            }
        }
        Self {
            result: result.into_iter(),
        }
    }
}

impl Iterator for PostOrder {
    type Item = NodeIx;

    fn next(&mut self) -> Option<Self::Item> {
        self.result.next()
    }
}

impl DoubleEndedIterator for PostOrder {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.result.next_back()
    }
}
