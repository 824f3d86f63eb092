use std::{collections::VecDeque, fmt};

use crate::{BstMap, NodeId};

// One level of depth in the sideways sketch.
const INDENT: &str = "       ";

impl<K: Ord, V> BstMap<K, V> {
    /// Writes a sideways ASCII sketch of the tree to `w`.
    ///
    /// Entries are written in descending key order, so the right branch of the tree is at the
    /// top and the left branch at the bottom. Each entry is indented by its depth, approximated
    /// as the root's height minus the entry's height. A `\` line above an entry marks a left
    /// child, a `/` line below it marks a right child, and the root carries no marker.
    ///
    /// When `include_values` is `true` each key is followed by ` -> ` and its value.
    ///
    /// ```
    /// let map: bstmap::BstMap<u32, &str> = [(2, "b"), (1, "a"), (3, "c")].into_iter().collect();
    ///
    /// let mut out = String::new();
    /// map.print(&mut out, true).unwrap();
    ///
    /// assert_eq!(out, "       3 -> c\n       /\n2 -> b\n       \\\n       1 -> a\n\n");
    /// ```
    pub fn print<W>(&self, w: W, include_values: bool) -> fmt::Result
    where
        W: fmt::Write,
        K: fmt::Display,
        V: fmt::Display,
    {
        self.sketch(w, |w, key, value| {
            if include_values {
                write!(w, "{key} -> {value}")
            } else {
                write!(w, "{key}")
            }
        })
    }

    fn sketch<W, F>(&self, mut w: W, mut entry: F) -> fmt::Result
    where
        W: fmt::Write,
        F: FnMut(&mut W, &K, &V) -> fmt::Result,
    {
        if let Some(root) = self.root_id() {
            let root_height = self.height_of(root);
            let mut opt_cur = self.last_id();

            while let Some(cur) = opt_cur {
                let depth = (root_height - self.height_of(cur)) as usize;
                let indent = INDENT.repeat(depth);
                let node = self.node(cur);

                match self.edge_symbol(cur) {
                    '\\' => {
                        writeln!(w, "{indent}\\")?;
                        w.write_str(&indent)?;
                        entry(&mut w, &node.key, &node.value)?;
                        writeln!(w)?;
                    }
                    '/' => {
                        w.write_str(&indent)?;
                        entry(&mut w, &node.key, &node.value)?;
                        writeln!(w)?;
                        writeln!(w, "{indent}/")?;
                    }
                    _ => {
                        w.write_str(&indent)?;
                        entry(&mut w, &node.key, &node.value)?;
                        writeln!(w)?;
                    }
                }

                opt_cur = self.predecessor(cur);
            }
        }

        writeln!(w)
    }

    /// Writes the shape of the tree to `w` as a Graphviz digraph named `name`.
    ///
    /// Nodes at the same distance from the root share a rank, and missing children are drawn as
    /// points. Each node is labelled with its key and cached height.
    pub fn dotgraph<W>(&self, name: &str, mut w: W) -> fmt::Result
    where
        W: fmt::Write,
        K: fmt::Display,
    {
        let root = match self.root_id() {
            Some(r) => r,
            None => return write!(w, "digraph \"graph-{name}\" {{}}"),
        };

        enum Item {
            Node(NodeId),
            Missing(u32),
        }

        let mut queue = VecDeque::new();
        queue.push_back(Item::Node(root));

        write!(
            w,
            "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
        )?;

        let mut missing = 0;
        let mut links = String::new();

        while !queue.is_empty() {
            use fmt::Write;

            write!(w, "{{rank=same; ")?;

            for _ in 0..queue.len() {
                let node = match queue.pop_front() {
                    Some(Item::Node(node)) => node,
                    Some(Item::Missing(id)) => {
                        write!(w, "\"graph{name}-missing{id}\" [shape=point]; ")?;
                        continue;
                    }
                    None => break,
                };

                let key = &self.node(node).key;
                let height = self.height_of(node);
                write!(w, "\"graph{name}-{key}\" [label=\"{key}:{height}\"]; ")?;

                for child in [self.left(node), self.right(node)] {
                    match child {
                        Some(child) => {
                            let child_key = &self.node(child).key;

                            queue.push_back(Item::Node(child));
                            writeln!(
                                links,
                                "\"graph{name}-{key}\" -> \"graph{name}-{child_key}\";"
                            )?;
                        }
                        None => {
                            queue.push_back(Item::Missing(missing));
                            writeln!(
                                links,
                                "\"graph{name}-{key}\" -> \"graph{name}-missing{missing}\";"
                            )?;
                            missing += 1;
                        }
                    }
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&links)?;

        w.write_str(" }\n}")
    }
}

/// Writes the sideways sketch of [`BstMap::print`] with values left out.
impl<K: Ord + fmt::Display, V> fmt::Display for BstMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.sketch(f, |f, key, _| write!(f, "{key}"))
    }
}
