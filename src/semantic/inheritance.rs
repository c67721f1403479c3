//! Depth-first ordering of inheritance graphs.
//!
//! Both compilers resolve inheritance the same way: every node is merged only
//! after all of its parents have been merged. [`resolution_order`] turns an
//! inheritance graph into such an order, visiting roots in the order given and
//! parents in declaration order, and reports the first cycle it walks into.

use std::hash::Hash;

use rustc_hash::FxHashMap;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Active,
    Done,
}

/// Order `roots` and their transitive parents so that parents come first.
///
/// `parents` returns the parents of a node that still need resolving; nodes
/// outside the graph should yield an empty list. On a cycle, returns the path
/// that closes it, starting and ending with the same node.
pub fn resolution_order<K, I, F>(roots: I, mut parents: F) -> Result<Vec<K>, Vec<K>>
where
    K: Clone + Eq + Hash,
    I: IntoIterator<Item = K>,
    F: FnMut(&K) -> Vec<K>,
{
    let mut marks: FxHashMap<K, Mark> = FxHashMap::default();
    let mut order = Vec::new();

    for root in roots {
        if marks.contains_key(&root) {
            continue;
        }
        // Explicit stack of (node, remaining parents) to avoid recursion depth limits
        let mut path: Vec<K> = vec![root.clone()];
        let mut stack: Vec<std::vec::IntoIter<K>> = vec![parents(&root).into_iter()];
        marks.insert(root, Mark::Active);

        while let Some(pending) = stack.last_mut() {
            match pending.next() {
                Some(parent) => match marks.get(&parent) {
                    Some(Mark::Done) => {}
                    Some(Mark::Active) => {
                        let start = path.iter().position(|k| *k == parent).unwrap_or(0);
                        let mut cycle = path[start..].to_vec();
                        cycle.push(parent);
                        return Err(cycle);
                    }
                    None => {
                        marks.insert(parent.clone(), Mark::Active);
                        stack.push(parents(&parent).into_iter());
                        path.push(parent);
                    }
                },
                None => {
                    stack.pop();
                    if let Some(done) = path.pop() {
                        marks.insert(done.clone(), Mark::Done);
                        order.push(done);
                    }
                }
            }
        }
    }
    Ok(order)
}
