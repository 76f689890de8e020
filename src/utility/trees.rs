//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use smallvec::SmallVec;

/// Models a type that can be traversed in a tree-like fashion. This is
/// intended for debug passes that dump human-readable trees, it is not
/// meant to be in the hot path of anything.
pub trait IntoTree<'a> {
    /// The node type of the tree
    type Node: Copy;

    /// Returns the root tree node
    fn root(&'a self) -> Self::Node;

    /// Returns the list of children that a given node has
    fn children(&'a self, node: Self::Node) -> SmallVec<[Self::Node; 12]>;
}

/// Prints a tree in a consistent format.
///
/// Ex:
///
/// ```none
/// root
/// ├── child 1
/// │   ├── grandchild 1
/// │   └── grandchild 2
/// └── child 2
/// ```
pub fn stringify_tree<'a, N, T, F>(tree: &'a T, mut stringify: F) -> String
where
    N: Copy,
    T: IntoTree<'a, Node = N>,
    F: FnMut(N) -> String,
{
    let mut result = String::default();

    stringify_tree_recursive(&mut result, "", tree.root(), tree, &mut stringify);

    result
}

fn stringify_tree_recursive<'a, N, T, F>(
    out: &mut String,
    prefix: &str,
    curr: T::Node,
    tree: &'a T,
    stringify: &mut F,
) where
    N: Copy,
    T: IntoTree<'a, Node = N>,
    F: FnMut(N) -> String,
{
    let children = tree.children(curr);

    *out += &stringify(curr);
    out.push('\n');

    if children.is_empty() {
        return;
    }

    // every subtree except the last needs a continuing bar in its prefix,
    // because there are more siblings below it
    let new_start = format!("{prefix}├── ");
    let new_prefix = format!("{prefix}│   ");

    for child in &children[0..children.len() - 1] {
        *out += &new_start;

        stringify_tree_recursive(out, &new_prefix, *child, tree, stringify);
    }

    *out += &format!("{prefix}└── ");
    stringify_tree_recursive(
        out,
        &format!("{prefix}    "),
        children[children.len() - 1],
        tree,
        stringify,
    );
}
