//! Memo of face volumes for the cached triangulation.
//!
//! Why this design
//! - The same face is reached from many parents; storing its volume (times
//!   `dim!`) once lets every later visit skip the whole subtree.
//! - Nodes live in a `Vec` arena and refer to children by index. There is no
//!   deletion, so slots stay valid for the lifetime of the cache and a reserved
//!   slot can be filled after the subtree has been computed.
//! - AVL rebalancing keeps lookups logarithmic even though faces arrive in
//!   nearly sorted order.

use std::cmp::Ordering;

use crate::face::VertexSet;

/// Cache key; ordered by dimension, then cardinality, then the id sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceKey {
    pub dim: usize,
    pub face: VertexSet,
}

fn cmp_parts(dim: usize, face: &VertexSet, other: &FaceKey) -> Ordering {
    dim.cmp(&other.dim)
        .then_with(|| face.len().cmp(&other.face.len()))
        .then_with(|| face.as_slice().cmp(other.face.as_slice()))
}

impl Ord for FaceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_parts(self.dim, &self.face, other)
    }
}

impl PartialOrd for FaceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Handle of a cache node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotId(usize);

/// Outcome of `FaceCache::lookup_or_reserve`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Lookup {
    /// The face was computed before.
    Stored(f64),
    /// The face is new (or still being computed); fill the slot with `store`.
    Reserved(SlotId),
}

#[derive(Debug)]
struct Node {
    key: FaceKey,
    /// `None` while the volume is pending.
    value: Option<f64>,
    left: Option<usize>,
    right: Option<usize>,
    height: u32,
}

/// AVL tree of face volumes in an index arena.
#[derive(Debug, Default)]
pub struct FaceCache {
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl FaceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of faces known to the cache, pending ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Height of the tree (0 when empty).
    #[inline]
    pub fn height(&self) -> u32 {
        self.h(self.root)
    }

    /// Stored volume of `(dim, face)`, or a slot to fill once it is known.
    pub fn lookup_or_reserve(&mut self, dim: usize, face: &VertexSet) -> Lookup {
        let mut at = self.root;
        while let Some(i) = at {
            let node = &self.nodes[i];
            match cmp_parts(dim, face, &node.key) {
                Ordering::Less => at = node.left,
                Ordering::Greater => at = node.right,
                Ordering::Equal => {
                    return match node.value {
                        Some(v) => Lookup::Stored(v),
                        None => Lookup::Reserved(SlotId(i)),
                    };
                }
            }
        }
        let slot = self.nodes.len();
        let key = FaceKey {
            dim,
            face: face.clone(),
        };
        let root = self.insert(self.root, key);
        self.root = Some(root);
        Lookup::Reserved(SlotId(slot))
    }

    /// Fill a reserved slot.
    pub fn store(&mut self, slot: SlotId, volume: f64) {
        let node = &mut self.nodes[slot.0];
        debug_assert!(node.value.is_none(), "cache slot filled twice");
        node.value = Some(volume);
    }

    fn insert(&mut self, at: Option<usize>, key: FaceKey) -> usize {
        let Some(i) = at else {
            self.nodes.push(Node {
                key,
                value: None,
                left: None,
                right: None,
                height: 1,
            });
            return self.nodes.len() - 1;
        };
        match key.cmp(&self.nodes[i].key) {
            Ordering::Less => {
                let l = self.insert(self.nodes[i].left, key);
                self.nodes[i].left = Some(l);
            }
            Ordering::Greater => {
                let r = self.insert(self.nodes[i].right, key);
                self.nodes[i].right = Some(r);
            }
            Ordering::Equal => return i,
        }
        self.rebalance(i)
    }

    #[inline]
    fn h(&self, at: Option<usize>) -> u32 {
        at.map_or(0, |i| self.nodes[i].height)
    }

    fn update(&mut self, i: usize) {
        let n = &self.nodes[i];
        let h = 1 + self.h(n.left).max(self.h(n.right));
        self.nodes[i].height = h;
    }

    fn balance(&self, i: usize) -> i64 {
        let n = &self.nodes[i];
        i64::from(self.h(n.left)) - i64::from(self.h(n.right))
    }

    fn rotate_right(&mut self, i: usize) -> usize {
        let Some(l) = self.nodes[i].left else {
            return i;
        };
        self.nodes[i].left = self.nodes[l].right;
        self.nodes[l].right = Some(i);
        self.update(i);
        self.update(l);
        l
    }

    fn rotate_left(&mut self, i: usize) -> usize {
        let Some(r) = self.nodes[i].right else {
            return i;
        };
        self.nodes[i].right = self.nodes[r].left;
        self.nodes[r].left = Some(i);
        self.update(i);
        self.update(r);
        r
    }

    fn rebalance(&mut self, i: usize) -> usize {
        self.update(i);
        let bf = self.balance(i);
        if bf > 1 {
            if let Some(l) = self.nodes[i].left {
                if self.balance(l) < 0 {
                    let nl = self.rotate_left(l);
                    self.nodes[i].left = Some(nl);
                }
            }
            return self.rotate_right(i);
        }
        if bf < -1 {
            if let Some(r) = self.nodes[i].right {
                if self.balance(r) > 0 {
                    let nr = self.rotate_right(r);
                    self.nodes[i].right = Some(nr);
                }
            }
            return self.rotate_left(i);
        }
        i
    }
}

/// Whether face volumes at recursion `level` of a `top_dim` polytope go through
/// the cache. Levels `top_dim` and `top_dim - 1` are never cached; below that,
/// `storage_level` levels are (0 disables caching).
#[inline]
pub fn should_cache(top_dim: usize, level: usize, storage_level: usize) -> bool {
    let diff = top_dim.saturating_sub(level);
    diff >= 2 && storage_level > diff - 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polytope::VertexId;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn face(ids: &[usize]) -> VertexSet {
        ids.iter().copied().map(VertexId).collect()
    }

    fn in_order(cache: &FaceCache, at: Option<usize>, out: &mut Vec<FaceKey>) {
        if let Some(i) = at {
            in_order(cache, cache.nodes[i].left, out);
            out.push(cache.nodes[i].key.clone());
            in_order(cache, cache.nodes[i].right, out);
        }
    }

    fn assert_avl(cache: &FaceCache, at: Option<usize>) -> u32 {
        let Some(i) = at else { return 0 };
        let l = assert_avl(cache, cache.nodes[i].left);
        let r = assert_avl(cache, cache.nodes[i].right);
        assert!(l.abs_diff(r) <= 1);
        assert_eq!(cache.nodes[i].height, 1 + l.max(r));
        1 + l.max(r)
    }

    #[test]
    fn second_lookup_sees_stored_value() {
        let mut cache = FaceCache::new();
        let f = face(&[1, 4, 7]);
        let Lookup::Reserved(slot) = cache.lookup_or_reserve(2, &f) else {
            panic!("fresh key must be reserved");
        };
        // Pending keys hand out the same slot again.
        assert_eq!(cache.lookup_or_reserve(2, &f), Lookup::Reserved(slot));
        cache.store(slot, 3.5);
        assert_eq!(cache.lookup_or_reserve(2, &f), Lookup::Stored(3.5));
        assert_eq!(cache.len(), 1);
        // Same vertices at another dimension are another key.
        assert!(matches!(cache.lookup_or_reserve(1, &f), Lookup::Reserved(_)));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn key_order_is_dim_then_len_then_ids() {
        let a = FaceKey {
            dim: 1,
            face: face(&[5, 6, 7]),
        };
        let b = FaceKey {
            dim: 2,
            face: face(&[0, 1]),
        };
        let c = FaceKey {
            dim: 2,
            face: face(&[0, 1, 2]),
        };
        let d = FaceKey {
            dim: 2,
            face: face(&[0, 1, 3]),
        };
        assert!(a < b && b < c && c < d);
    }

    #[test]
    fn stays_balanced_under_sorted_and_shuffled_inserts() {
        let mut faces: Vec<VertexSet> = (0..600).map(|i| face(&[i, i + 1000])).collect();
        let mut sorted = FaceCache::new();
        for f in &faces {
            let _ = sorted.lookup_or_reserve(3, f);
        }
        faces.shuffle(&mut StdRng::seed_from_u64(11));
        let mut shuffled = FaceCache::new();
        for f in &faces {
            let _ = shuffled.lookup_or_reserve(3, f);
            let _ = shuffled.lookup_or_reserve(3, f);
        }
        for cache in [&sorted, &shuffled] {
            assert_eq!(cache.len(), 600);
            assert_eq!(assert_avl(cache, cache.root), cache.height());
            let bound = 1.45 * ((cache.len() + 2) as f64).log2();
            assert!(f64::from(cache.height()) <= bound);
            let mut keys = Vec::new();
            in_order(cache, cache.root, &mut keys);
            assert!(keys.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn storage_gating() {
        // Never the top two levels.
        assert!(!should_cache(5, 5, usize::MAX));
        assert!(!should_cache(5, 4, usize::MAX));
        assert!(should_cache(5, 3, 1));
        assert!(!should_cache(5, 2, 1));
        assert!(should_cache(5, 2, 2));
        assert!(!should_cache(5, 3, 0));
    }
}
