//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

//! Basic instantiation graph using vector indices.
//!
//! Unlike a general-purpose graph, outgoing edges are remembered in the order
//! they were added because the hierarchy listing depends on that order.

pub type NodeIndex = usize;

#[derive(Debug, PartialEq)]
struct NodeData<V> {
    node: V,
    outgoing: Vec<NodeIndex>,
    in_degree: usize,
}

#[derive(Debug, PartialEq)]
pub struct Graph<V> {
    vertices: Vec<NodeData<V>>,
    edge_count: usize,
}

#[derive(Debug, PartialEq)]
pub enum EdgeStatus {
    MissingSource,
    MissingTarget,
    AlreadyExists,
    Success,
}

impl EdgeStatus {
    pub fn is_ok(&self) -> bool {
        match self {
            Self::Success => true,
            _ => false,
        }
    }
}

impl<V> Graph<V> {
    /// Creates an empty `Graph` struct.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edge_count: 0,
        }
    }

    /// Adds a new node to the graph.
    ///
    /// Returns the `NodeIndex` to remember the node.
    pub fn add_node(&mut self, node: V) -> NodeIndex {
        let index = self.vertices.len();
        self.vertices.push(NodeData {
            node: node,
            outgoing: Vec::new(),
            in_degree: 0,
        });
        index
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Accesses the node data label behind the `node` index.
    pub fn get_node(&self, node: NodeIndex) -> Option<&V> {
        Some(&self.vertices.get(node)?.node)
    }

    /// Checks if a given `source` node is connected to the given `target` node.
    pub fn has_edge(&self, source: NodeIndex, target: NodeIndex) -> bool {
        match self.vertices.get(source) {
            Some(n) => n.outgoing.contains(&target),
            None => false,
        }
    }

    /// Adds a new edge to the graph from `source` to `target`.
    ///
    /// Self-loops are accepted so that they can later be reported as cycles.
    pub fn add_edge(&mut self, source: NodeIndex, target: NodeIndex) -> EdgeStatus {
        if source >= self.node_count() {
            return EdgeStatus::MissingSource;
        }
        if target >= self.node_count() {
            return EdgeStatus::MissingTarget;
        }
        // do not allow duplicate edges
        if self.has_edge(source, target) == true {
            return EdgeStatus::AlreadyExists;
        }
        self.vertices[source].outgoing.push(target);
        self.vertices[target].in_degree += 1;
        self.edge_count += 1;
        EdgeStatus::Success
    }

    /// Returns the number of predecessors to the `target` node.
    pub fn in_degree(&self, target: NodeIndex) -> usize {
        self.vertices[target].in_degree
    }

    /// Iterates over the outgoing nodes from the `source` node in insertion order.
    pub fn successors(&self, source: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.vertices[source].outgoing.iter().copied()
    }

    /// Collects every node that is never the target of an edge, in index order.
    pub fn roots(&self) -> Vec<NodeIndex> {
        (0..self.node_count())
            .filter(|i| self.in_degree(*i) == 0)
            .collect()
    }

    /// Walks the tree reachable from `root` depth-first, pairing every visited
    /// node with its depth below `root`.
    ///
    /// Errors with the repeated node as soon as a node is reached again while
    /// it is still on the current path.
    pub fn depth_first_tree(&self, root: NodeIndex) -> Result<Vec<(usize, NodeIndex)>, NodeIndex> {
        let mut path = Vec::new();
        self.recurse_tree(root, &mut path)
    }

    fn recurse_tree(
        &self,
        target: NodeIndex,
        path: &mut Vec<NodeIndex>,
    ) -> Result<Vec<(usize, NodeIndex)>, NodeIndex> {
        if path.contains(&target) == true {
            return Err(target);
        }
        let mut traversal = vec![(0, target)];
        path.push(target);
        for child in self.successors(target) {
            let subtree = self.recurse_tree(child, path)?;
            traversal.extend(subtree.into_iter().map(|(lvl, n)| (lvl + 1, n)));
        }
        path.pop();
        Ok(traversal)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Twig {
    EndLeaf(Option<Box<Twig>>),
    MidBranch(Option<Box<Twig>>),
}

impl Twig {
    /// Accesses what type of node was the parent to the current `self`.
    pub fn get_upper(&self) -> Option<&Twig> {
        match self {
            Self::EndLeaf(e) => e.as_deref(),
            Self::MidBranch(e) => e.as_deref(),
        }
    }

    /// Builds the twig for every entry of a flattened tree listing given the
    /// depth of each entry.
    pub fn from_levels(levels: &[usize]) -> Vec<Twig> {
        // an entry continues its branch if a sibling follows before the branch closes
        let has_sibling = |i: usize| -> bool {
            for lvl in &levels[i + 1..] {
                if *lvl < levels[i] {
                    return false;
                } else if *lvl == levels[i] {
                    return true;
                }
            }
            false
        };
        let mut twigs = Vec::with_capacity(levels.len());
        // the twig of the latest entry seen at each depth
        let mut stack: Vec<Twig> = Vec::new();
        for (i, lvl) in levels.iter().enumerate() {
            stack.truncate(*lvl);
            let twig = match stack.last() {
                None => Twig::EndLeaf(None),
                Some(upper) => {
                    let upper = Some(Box::new(upper.clone()));
                    match has_sibling(i) {
                        true => Twig::MidBranch(upper),
                        false => Twig::EndLeaf(upper),
                    }
                }
            };
            stack.push(twig.clone());
            twigs.push(twig);
        }
        twigs
    }

    /// Converts the treeview text from using extended ascii characters to
    /// the original ascii characters.
    pub fn to_ascii(s: &str) -> String {
        s.chars()
            .map(|c| match c {
                '─' => '-',
                '│' => '|',
                '├' => '+',
                '└' => '\\',
                _ => c,
            })
            .collect()
    }
}

impl std::fmt::Display for Twig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // determine the spacing leading up the node in the tree
        let space: String = {
            let mut space = String::new();
            let mut x = self;
            while let Some(n) = x.get_upper() {
                match n {
                    Self::EndLeaf(q) => {
                        if q.is_some() {
                            space.push_str("   ")
                        }
                    }
                    Self::MidBranch(q) => {
                        if q.is_some() {
                            space.push_str("  │")
                        }
                    }
                }
                x = n;
            }
            // twig chains are rewound through the parents
            space.chars().rev().collect()
        };

        match self {
            Self::EndLeaf(m) => match m {
                None => write!(f, ""),
                Some(_) => write!(f, "{}└─ ", space),
            },
            Self::MidBranch(_) => write!(f, "{}├─ ", space),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Creates an example binary tree with height = 2. Edges are directed down
    /// from the instantiating node to the instantiated node.
    ///
    ///         n0
    ///        /  \
    ///     n1     n4
    ///    /  \   /  \
    /// n2   n3 n5   n6
    fn binary_tree() -> Graph<()> {
        let mut g = Graph::new();
        let n0 = g.add_node(());
        let n1 = g.add_node(());
        let n2 = g.add_node(());
        let n3 = g.add_node(());
        let n4 = g.add_node(());
        let n5 = g.add_node(());
        let n6 = g.add_node(());
        g.add_edge(n0, n1);
        g.add_edge(n0, n4);
        g.add_edge(n1, n2);
        g.add_edge(n1, n3);
        g.add_edge(n4, n5);
        g.add_edge(n4, n6);
        g
    }

    #[test]
    fn add_edge() {
        let mut g = Graph::new();
        let n0 = g.add_node(());
        let n1 = g.add_node(());
        assert_eq!(g.add_edge(n0, n1).is_ok(), true);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.add_edge(n1, n0).is_ok(), true);
        // do not allow duplicate edges
        assert_eq!(g.add_edge(n1, n0), EdgeStatus::AlreadyExists);
        assert_eq!(g.edge_count(), 2);
        // self-loops are kept for cycle reporting
        assert_eq!(g.add_edge(n0, n0).is_ok(), true);
        assert_eq!(g.add_edge(n0, 9), EdgeStatus::MissingTarget);
        assert_eq!(g.add_edge(9, n0), EdgeStatus::MissingSource);
    }

    #[test]
    fn successors_keep_insertion_order() {
        let g = binary_tree();
        assert_eq!(g.successors(0).collect::<Vec<NodeIndex>>(), vec![1, 4]);
        assert_eq!(g.successors(4).collect::<Vec<NodeIndex>>(), vec![5, 6]);
        assert_eq!(g.successors(6).count(), 0);
    }

    #[test]
    fn roots() {
        let mut g = binary_tree();
        assert_eq!(g.roots(), vec![0]);
        let n7 = g.add_node(());
        assert_eq!(g.roots(), vec![0, n7]);
        g.add_edge(n7, 4);
        assert_eq!(g.roots(), vec![0, n7]);
    }

    #[test]
    fn dfs_tree() {
        let g = binary_tree();
        assert_eq!(
            g.depth_first_tree(0),
            Ok(vec![(0, 0), (1, 1), (2, 2), (2, 3), (1, 4), (2, 5), (2, 6)])
        );
        assert_eq!(g.depth_first_tree(4), Ok(vec![(0, 4), (1, 5), (1, 6)]));
        assert_eq!(g.depth_first_tree(6), Ok(vec![(0, 6)]));
    }

    #[test]
    fn dfs_tree_shared_child_is_not_a_cycle() {
        let mut g = binary_tree();
        // diamond: n3 also instantiates n5
        g.add_edge(3, 5);
        let tree = g.depth_first_tree(0).unwrap();
        assert_eq!(tree.len(), 8);
        assert_eq!(tree.iter().filter(|(_, n)| *n == 5).count(), 2);
    }

    #[test]
    fn dfs_tree_cycle() {
        let mut g = binary_tree();
        g.add_edge(5, 0);
        assert_eq!(g.depth_first_tree(0), Err(0));
        // self-loop
        let mut g = binary_tree();
        g.add_edge(2, 2);
        assert_eq!(g.depth_first_tree(1), Err(2));
    }

    #[test]
    fn twigs_from_levels() {
        let levels = vec![0, 1, 2, 2, 1, 2, 3];
        let display: String = Twig::from_levels(&levels)
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{}{}\n", t, i))
            .collect();
        assert_eq!(
            display,
            "\
0
├─ 1
│  ├─ 2
│  └─ 3
└─ 4
   └─ 5
      └─ 6
"
        );
        assert_eq!(Twig::to_ascii("│  ├─ 2"), "|  +- 2");
    }

    #[test]
    fn twigs_for_many_roots() {
        let levels = vec![0, 1, 0];
        let display: Vec<String> = Twig::from_levels(&levels)
            .iter()
            .map(|t| t.to_string())
            .collect();
        assert_eq!(display, vec!["", "└─ ", ""]);
    }
}
