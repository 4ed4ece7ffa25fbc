//! The permuterm B-tree: resolves wildcard terms (already rewritten to a
//! single trailing-`$`-rotated prefix search) against the vocabulary.
//!
//! Grounded on the arena-of-nodes idiom (`Vec<Node>` plus a `NodeIndex`
//! newtype standing in for a pointer) rather than `Box`-linked nodes, since
//! a B-tree's node lifetimes don't nest the way a recursive enum's would.

use std::cmp::Ordering;

use crate::index::vocab::WordId;

/// Degree-9 B-tree: each node holds at most 8 keys and (if internal) 9
/// children, per the spec's node-size contract.
const MAX_KEYS: usize = 8;
const MEDIAN_INDEX: usize = 4;

/// Index into [`PermutermTree`]'s node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeIndex(usize);

/// A permuterm key: one rotation of `word$`, e.g. `$hello`, `o$hell`,
/// `lo$hel`, ... paired with the `WordId` it resolves to.
#[derive(Debug, Clone)]
struct PermutermKey {
    rotation: Vec<u8>,
    word: WordId,
}

#[derive(Debug, Default)]
struct Node {
    keys: Vec<PermutermKey>,
    children: Vec<NodeIndex>,
}

impl Node {
    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Produces every rotation of `word$`: `word$`, `ord$w`, `rd$wo`, ...,
/// `$word`, the set of keys one word contributes to the tree.
pub fn rotations(word: &[u8]) -> Vec<Vec<u8>> {
    let mut tagged = Vec::with_capacity(word.len() + 1);
    tagged.extend_from_slice(word);
    tagged.push(b'$');

    let n = tagged.len();
    (0..n)
        .map(|i| {
            let mut rotated = Vec::with_capacity(n);
            rotated.extend_from_slice(&tagged[i..]);
            rotated.extend_from_slice(&tagged[..i]);
            rotated
        })
        .collect()
}

/// A B-tree over permuterm rotations, supporting prefix enumeration for
/// wildcard resolution.
#[derive(Debug)]
pub struct PermutermTree {
    nodes: Vec<Node>,
    root: NodeIndex,
}

impl Default for PermutermTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PermutermTree {
    pub fn new() -> Self {
        let root = Node::default();
        Self {
            nodes: vec![root],
            root: NodeIndex(0),
        }
    }

    fn alloc(&mut self, node: Node) -> NodeIndex {
        self.nodes.push(node);
        NodeIndex(self.nodes.len() - 1)
    }

    /// Inserts every rotation of `word` (tagged with `word_id`) into the tree.
    pub fn insert_word(&mut self, word: &[u8], word_id: WordId) {
        for rotation in rotations(word) {
            self.insert_key(PermutermKey {
                rotation,
                word: word_id,
            });
        }
    }

    /// Inserts a single rotation key, splitting overflowing nodes on the
    /// way back up from the leaf.
    ///
    /// Iterative rather than recursive: each indexed word contributes
    /// `|word| + 1` insertions, so this path sees the heaviest repeated use
    /// of anything in the crate during ingestion.
    fn insert_key(&mut self, key: PermutermKey) {
        let mut path: Vec<(NodeIndex, usize)> = Vec::new();
        let mut current = self.root;

        loop {
            let idx = self.lower_bound(current, &key.rotation);
            if self.nodes[current.0].is_leaf() {
                path.push((current, idx));
                break;
            }
            path.push((current, idx));
            current = self.nodes[current.0].children[idx];
        }

        let (leaf, pos) = *path.last().unwrap();
        let leaf_keys = &self.nodes[leaf.0].keys;
        if pos < leaf_keys.len() && leaf_keys[pos].rotation == key.rotation {
            panic!(
                "duplicate permuterm key {:?} (words {:?} and {:?})",
                String::from_utf8_lossy(&key.rotation),
                leaf_keys[pos].word,
                key.word,
            );
        }
        self.nodes[leaf.0].keys.insert(pos, key);

        // Walk back up, splitting any node left with more than MAX_KEYS keys.
        let mut child_to_attach: Option<NodeIndex> = None;
        for (i, &(node, _)) in path.iter().enumerate().rev() {
            if let Some(new_right) = child_to_attach {
                // Re-derive the insertion position for the promoted median
                // in this ancestor: it's the slot right after the child we
                // just split (tracked via `path[i].1`, the child index we
                // descended through from this node).
                let child_pos = path[i].1;
                let promoted = self.nodes[new_right.0].keys.remove(0);
                // The right sibling produced by a child split is inserted
                // immediately after that child.
                self.nodes[node.0].keys.insert(child_pos, promoted);
                self.nodes[node.0].children.insert(child_pos + 1, new_right);
                child_to_attach = None;
            }

            if self.nodes[node.0].keys.len() > MAX_KEYS {
                child_to_attach = Some(self.split(node));
            } else {
                break;
            }
        }

        if let Some(new_right) = child_to_attach {
            // The root itself overflowed and split; grow the tree by one level.
            let promoted = self.nodes[new_right.0].keys.remove(0);
            let old_root = self.root;
            let mut new_root = Node::default();
            new_root.keys.push(promoted);
            new_root.children.push(old_root);
            new_root.children.push(new_right);
            self.root = self.alloc(new_root);
        }
    }

    /// Splits an overflowing node (`MAX_KEYS + 1` keys) into two nodes of
    /// `MAX_KEYS / 2` keys each, returning the new right-hand sibling. The
    /// median key is left at index 0 of the returned node's key vector as a
    /// signal to the caller to promote it (and is removed from there by the
    /// caller, never double-counted).
    fn split(&mut self, node: NodeIndex) -> NodeIndex {
        let is_leaf = self.nodes[node.0].is_leaf();
        let right_keys = self.nodes[node.0].keys.split_off(MEDIAN_INDEX + 1);
        let median = self.nodes[node.0].keys.pop().unwrap();

        let right_children = if is_leaf {
            Vec::new()
        } else {
            self.nodes[node.0].children.split_off(MEDIAN_INDEX + 1)
        };

        let mut right = Node {
            keys: right_keys,
            children: right_children,
        };
        // Smuggle the median out via index 0 for the caller to promote;
        // callers always `.remove(0)` it before touching `right.keys` again.
        right.keys.insert(0, median);

        self.alloc(right)
    }

    /// Index of the first key in `node` that is `>= target`, the standard
    /// B-tree descent/insertion point.
    fn lower_bound(&self, node: NodeIndex, target: &[u8]) -> usize {
        let keys = &self.nodes[node.0].keys;
        keys.partition_point(|k| k.rotation.as_slice() < target)
    }

    /// Enumerates every word whose permuterm rotation carries `prefix`,
    /// appending matches (deduped isn't this layer's job; callers fold
    /// duplicates via the generation counter) to `out`.
    pub fn search_prefix(&self, prefix: &[u8], out: &mut Vec<WordId>) {
        self.search_node(self.root, prefix, out);
    }

    /// Iterative, explicit-stack equivalent of the recursive descent: for
    /// every key, the child immediately to its left is always visited
    /// first (that subtree holds every rotation between the previous key
    /// and this one, which can still carry prefix matches regardless of
    /// how this key itself compares), and only then does the key's own
    /// comparison decide whether to record it and keep scanning the node
    /// or stop (`Greater` with no prefix match means every later key and
    /// the rightmost child are strictly past the prefix range).
    fn search_node(&self, node: NodeIndex, prefix: &[u8], out: &mut Vec<WordId>) {
        enum Frame {
            /// Begin processing `node`'s keys from index `next` on.
            EnterNode(NodeIndex, usize),
            /// The child (if any) to the left of key `index` in `node` has
            /// been fully visited; apply that key's own comparison.
            AfterChild(NodeIndex, usize),
            /// Every key in `node` has been handled; visit the rightmost
            /// child if the prefix range can still reach it.
            RightmostChild(NodeIndex),
        }

        let mut stack = vec![Frame::EnterNode(node, 0)];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::EnterNode(node, i) => {
                    let n = &self.nodes[node.0];
                    if i >= n.keys.len() {
                        stack.push(Frame::RightmostChild(node));
                        continue;
                    }
                    stack.push(Frame::AfterChild(node, i));
                    if !n.is_leaf() {
                        stack.push(Frame::EnterNode(n.children[i], 0));
                    }
                }
                Frame::AfterChild(node, i) => {
                    let n = &self.nodes[node.0];
                    let key = &n.keys[i];
                    match cmp_prefix(&key.rotation, prefix) {
                        Ordering::Less => {
                            stack.push(Frame::EnterNode(node, i + 1));
                        }
                        Ordering::Equal => {
                            if is_prefix_of(prefix, &key.rotation) {
                                out.push(key.word);
                            }
                            stack.push(Frame::EnterNode(node, i + 1));
                        }
                        Ordering::Greater => {
                            if is_prefix_of(prefix, &key.rotation) {
                                out.push(key.word);
                                stack.push(Frame::EnterNode(node, i + 1));
                            }
                            // Else: this key and everything after it (plus
                            // the rightmost child) are past the prefix
                            // range — stop scanning this node entirely.
                        }
                    }
                }
                Frame::RightmostChild(node) => {
                    // This frame is only ever pushed after every key in
                    // `node` has been walked without an early `Greater`-and-
                    // non-matching stop (that case returns without pushing
                    // anything further), so the rightmost child is always
                    // reachable here. Gating this on a truncated
                    // `cmp_prefix` comparison against the last key would be
                    // wrong anyway: a last key that is strictly shorter than
                    // `prefix` but a genuine byte-prefix of it compares
                    // `Equal` under `cmp_prefix` while failing
                    // `is_prefix_of`, which would skip a child the B-tree's
                    // own ordering (shorter-is-less) guarantees can still
                    // hold matches.
                    let n = &self.nodes[node.0];
                    if let Some(&last_child) = n.children.last() {
                        stack.push(Frame::EnterNode(last_child, 0));
                    }
                }
            }
        }
    }

    #[cfg(test)]
    fn key_count(&self, node: NodeIndex) -> usize {
        self.nodes[node.0].keys.len()
    }

    #[cfg(test)]
    fn root_key_count(&self) -> usize {
        self.key_count(self.root)
    }

    #[cfg(test)]
    fn height(&self) -> usize {
        let mut h = 1;
        let mut cur = self.root;
        while !self.nodes[cur.0].is_leaf() {
            cur = self.nodes[cur.0].children[0];
            h += 1;
        }
        h
    }
}

/// Compares `rotation` against `prefix` over just the overlapping length:
/// `Less` if `rotation < prefix` lexicographically within that overlap,
/// `Greater` if `rotation > prefix`, `Equal` if one is a prefix of the
/// other (the case that needs [`is_prefix_of`] to disambiguate true
/// containment from a merely-shorter byte string).
fn cmp_prefix(rotation: &[u8], prefix: &[u8]) -> Ordering {
    let n = rotation.len().min(prefix.len());
    rotation[..n].cmp(&prefix[..n])
}

fn is_prefix_of(prefix: &[u8], rotation: &[u8]) -> bool {
    rotation.len() >= prefix.len() && &rotation[..prefix.len()] == prefix
}
