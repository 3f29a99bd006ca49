use std::cmp::Ordering;
use std::ops::Index;
use std::rc::Rc;

use crate::balance;
use crate::Error;

// A loser tree is a search tree over split keys whose nodes also carry the
// bindings that lost a tournament match. Each payload is the winner of the
// half its key falls in, minus the matches recorded above it; the side a
// payload lost in is recovered by comparing its key with the split, so no
// origin tag is stored.
#[derive(Debug, Clone)]
pub(crate) struct LoserNode<K, V> {
    // Cached subtree size, so rebalancing can weigh subtrees in O(1).
    pub(crate) size: usize,
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: LoserTree<K, V>,
    pub(crate) split_key: K,
    pub(crate) right: LoserTree<K, V>,
}

#[derive(Debug, Clone)]
pub(crate) enum LoserTree<K, V> {
    Leaf,
    Node(Rc<LoserNode<K, V>>),
}

impl<K, V> LoserTree<K, V> {
    pub(crate) fn size(&self) -> usize {
        match self {
            LoserTree::Leaf => 0,
            LoserTree::Node(node) => node.size,
        }
    }
}

#[derive(Debug, Clone)]
struct Winner<K, V> {
    key: K,
    value: V,
    losers: LoserTree<K, V>,
    // The largest key anywhere in this pennant. Lets a merge know the two
    // key ranges are disjoint in O(1), and guides descent during updates.
    max_key: K,
}

/// One step of the tournament view: a pennant is either empty, a single
/// binding, or the merge of two pennants over adjacent key ranges.
enum TournamentView<K, V> {
    Singleton { key: K, value: V },
    Play(Pennant<K, V>, Pennant<K, V>),
}

/// A persistent priority search queue.
///
/// `Pennant` keeps its bindings simultaneously ordered by key (for lookup,
/// insertion, deletion and ordered traversal) and heap-ordered by value (the
/// minimum binding is always at the top). Both aspects cost O(log n); peeking
/// at the minimum is O(1). Ties in value go to the smaller key.
///
/// The value type drives the heap, so both `K: Ord` and `V: Ord` are
/// required: the `Ord` impls are the injected comparators.
///
/// `Clone` is cheap and versions share their unmodified subtrees.
///
/// # Examples
///
/// ```rust
/// # use persimmon_pennant::Pennant;
/// let mut queue: Pennant<i32, &str> =
///     [(3, "c"), (1, "a"), (2, "b")].into_iter().collect();
///
/// // Ordered-map face:
/// assert_eq!(queue.get(&2), Some(&"b"));
/// let keys: Vec<i32> = queue.iter_ordered().map(|(k, _)| k).collect();
/// assert_eq!(keys, vec![1, 2, 3]);
///
/// // Priority-queue face: "a" is the smallest value.
/// assert_eq!(queue.min(), Some((&1, &"a")));
/// assert_eq!(queue.pop_min(), Some((1, "a")));
/// assert_eq!(queue.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Pennant<K, V> {
    root: Option<Winner<K, V>>,
}

impl<K, V> Pennant<K, V> {
    pub fn new() -> Self {
        Pennant { root: None }
    }

    /// The number of bindings in the queue.
    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, |w| 1 + w.losers.size())
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The minimal binding by value, or `None` if the queue is empty. O(1).
    pub fn min(&self) -> Option<(&K, &V)> {
        self.root.as_ref().map(|w| (&w.key, &w.value))
    }

    /// Like [`Pennant::min`], but empty queues are an error.
    pub fn min_binding(&self) -> Result<(&K, &V), Error> {
        self.min().ok_or(Error::Empty)
    }

    /// The largest key in the queue, or `None` if it is empty. O(1).
    pub fn max_key(&self) -> Option<&K> {
        self.root.as_ref().map(|w| &w.max_key)
    }
}

impl<K: Ord, V> Pennant<K, V> {
    /// Looks up the value bound to `key`, or `None` if absent. O(log n).
    ///
    /// The walk goes straight down the loser tree guided by the split keys;
    /// a binding's node always lies on its own key's search path.
    pub fn get(&self, key: &K) -> Option<&V> {
        let w = self.root.as_ref()?;
        if w.key == *key {
            return Some(&w.value);
        }
        let mut tree = &w.losers;
        while let LoserTree::Node(node) = tree {
            if node.key == *key {
                return Some(&node.value);
            }
            tree = if *key <= node.split_key {
                &node.left
            } else {
                &node.right
            };
        }
        None
    }

    /// Like [`Pennant::get`], but an absent key is an error.
    pub fn find(&self, key: &K) -> Result<&V, Error> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over all bindings by reference, in unspecified order.
    ///
    /// This is a plain tree walk: O(n), no clones, no rebalancing. For key
    /// order use [`Pennant::iter_ordered`].
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.into_iter()
    }
}

impl<K: Ord + Clone, V: Ord + Clone> Pennant<K, V> {
    pub fn singleton(key: K, value: V) -> Self {
        Pennant {
            root: Some(Winner {
                max_key: key.clone(),
                key,
                value,
                losers: LoserTree::Leaf,
            }),
        }
    }

    /// Merges two pennants whose key ranges are disjoint, every key of `self`
    /// below every key of `other`. O(1) plus one balance step.
    ///
    /// The winner with the smaller value wins the merged tournament; the
    /// other becomes the top entry of the merged loser tree. This is the
    /// structural constructor behind every update below.
    fn play(self, other: Self) -> Self {
        let (w1, w2) = match (self.root, other.root) {
            (None, root) => return Pennant { root },
            (root, None) => return Pennant { root },
            (Some(w1), Some(w2)) => (w1, w2),
        };
        debug_assert!(w1.max_key < w2.key);
        let root = if w1.value <= w2.value {
            Winner {
                key: w1.key,
                value: w1.value,
                losers: balance::balance(w2.key, w2.value, w1.losers, w1.max_key, w2.losers),
                max_key: w2.max_key,
            }
        } else {
            Winner {
                key: w2.key,
                value: w2.value,
                losers: balance::balance(w1.key, w1.value, w1.losers, w1.max_key, w2.losers),
                max_key: w2.max_key,
            }
        };
        Pennant { root: Some(root) }
    }

    /// Undoes one [`Pennant::play`]: splits off the top loser-tree entry and
    /// reconstructs the two pennants that merged there. O(1) amortized over a
    /// traversal; shared nodes are copied out, unique ones are moved.
    fn tournament_view(self) -> Option<TournamentView<K, V>> {
        let w = self.root?;
        let node = match w.losers {
            LoserTree::Leaf => {
                return Some(TournamentView::Singleton {
                    key: w.key,
                    value: w.value,
                });
            }
            LoserTree::Node(node) => node,
        };
        let LoserNode {
            key: loser_key,
            value: loser_value,
            left,
            split_key,
            right,
            ..
        } = Rc::unwrap_or_clone(node);
        // The top loser won the half its key falls in; the overall winner
        // came out of the other one.
        let (p1, p2) = if loser_key <= split_key {
            (
                Winner {
                    key: loser_key,
                    value: loser_value,
                    losers: left,
                    max_key: split_key,
                },
                Winner {
                    key: w.key,
                    value: w.value,
                    losers: right,
                    max_key: w.max_key,
                },
            )
        } else {
            (
                Winner {
                    key: w.key,
                    value: w.value,
                    losers: left,
                    max_key: split_key,
                },
                Winner {
                    key: loser_key,
                    value: loser_value,
                    losers: right,
                    max_key: w.max_key,
                },
            )
        };
        Some(TournamentView::Play(
            Pennant { root: Some(p1) },
            Pennant { root: Some(p2) },
        ))
    }

    /// Inserts a binding, returning the previously bound value if the key was
    /// already present. Average O(log n).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use persimmon_pennant::Pennant;
    /// let mut queue = Pennant::singleton(1, 10);
    /// assert_eq!(queue.insert(2, 5), None);
    /// assert_eq!(queue.insert(1, 20), Some(10));
    /// assert_eq!(queue.min(), Some((&2, &5)));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (rebuilt, old) = std::mem::take(self).insert_rec(key, value);
        *self = rebuilt;
        old
    }

    fn insert_rec(self, key: K, value: V) -> (Self, Option<V>) {
        match self.tournament_view() {
            None => (Pennant::singleton(key, value), None),
            Some(TournamentView::Singleton {
                key: other_key,
                value: other_value,
            }) => match key.cmp(&other_key) {
                Ordering::Less => (
                    Pennant::singleton(key, value).play(Pennant::singleton(other_key, other_value)),
                    None,
                ),
                Ordering::Equal => (Pennant::singleton(key, value), Some(other_value)),
                Ordering::Greater => (
                    Pennant::singleton(other_key, other_value).play(Pennant::singleton(key, value)),
                    None,
                ),
            },
            Some(TournamentView::Play(p1, p2)) => {
                // unwrap: both halves of a play are non-empty
                if key <= p1.root.as_ref().unwrap().max_key {
                    let (p1, old) = p1.insert_rec(key, value);
                    (p1.play(p2), old)
                } else {
                    let (p2, old) = p2.insert_rec(key, value);
                    (p1.play(p2), old)
                }
            }
        }
    }

    /// Removes the binding for `key`, returning its value, or `None` (and
    /// changing nothing) if the key is absent. Average O(log n).
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let (rebuilt, removed) = std::mem::take(self).remove_rec(key);
        *self = rebuilt;
        removed
    }

    fn remove_rec(self, key: &K) -> (Self, Option<V>) {
        match self.tournament_view() {
            None => (Pennant::new(), None),
            Some(TournamentView::Singleton {
                key: other_key,
                value: other_value,
            }) => {
                if *key == other_key {
                    (Pennant::new(), Some(other_value))
                } else {
                    (Pennant::singleton(other_key, other_value), None)
                }
            }
            Some(TournamentView::Play(p1, p2)) => {
                // unwrap: both halves of a play are non-empty
                if *key <= p1.root.as_ref().unwrap().max_key {
                    let (p1, removed) = p1.remove_rec(key);
                    (p1.play(p2), removed)
                } else {
                    let (p2, removed) = p2.remove_rec(key);
                    (p1.play(p2), removed)
                }
            }
        }
    }

    /// Applies `f` to the value bound to `key`, if present. Returns whether a
    /// binding was adjusted. The heap is restored on the way back up, so `f`
    /// may move the binding's priority in either direction.
    pub fn adjust<F: FnOnce(&mut V)>(&mut self, key: &K, f: F) -> bool {
        let (rebuilt, adjusted) = std::mem::take(self).adjust_rec(key, f);
        *self = rebuilt;
        adjusted
    }

    fn adjust_rec<F: FnOnce(&mut V)>(self, key: &K, f: F) -> (Self, bool) {
        match self.tournament_view() {
            None => (Pennant::new(), false),
            Some(TournamentView::Singleton {
                key: other_key,
                value: mut other_value,
            }) => {
                let found = *key == other_key;
                if found {
                    f(&mut other_value);
                }
                (Pennant::singleton(other_key, other_value), found)
            }
            Some(TournamentView::Play(p1, p2)) => {
                // unwrap: both halves of a play are non-empty
                if *key <= p1.root.as_ref().unwrap().max_key {
                    let (p1, adjusted) = p1.adjust_rec(key, f);
                    (p1.play(p2), adjusted)
                } else {
                    let (p2, adjusted) = p2.adjust_rec(key, f);
                    (p1.play(p2), adjusted)
                }
            }
        }
    }

    /// Removes and returns the minimal binding by value, or `None` if the
    /// queue is empty. O(log n).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use persimmon_pennant::Pennant;
    /// let mut queue: Pennant<&str, u32> =
    ///     [("x", 3), ("y", 1), ("z", 2)].into_iter().collect();
    /// assert_eq!(queue.pop_min(), Some(("y", 1)));
    /// assert_eq!(queue.pop_min(), Some(("z", 2)));
    /// assert_eq!(queue.pop_min(), Some(("x", 3)));
    /// assert_eq!(queue.pop_min(), None);
    /// ```
    pub fn pop_min(&mut self) -> Option<(K, V)> {
        let w = std::mem::take(self).root?;
        *self = second_best(w.losers, w.max_key);
        Some((w.key, w.value))
    }

    /// Builds a queue from bindings in strictly ascending key order, O(n).
    ///
    /// Fails with [`Error::Unsorted`] on out-of-order or duplicate keys.
    /// The input is split in halves, so the loser tree comes out balanced
    /// without any rotations.
    pub fn from_sorted<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Result<Self, Error> {
        let pairs: Vec<(K, V)> = pairs.into_iter().collect();
        if pairs.windows(2).any(|w| w[0].0 >= w[1].0) {
            return Err(Error::Unsorted);
        }
        let n = pairs.len();
        Ok(Self::build_sorted(&mut pairs.into_iter(), n))
    }

    fn build_sorted<I: Iterator<Item = (K, V)>>(pairs: &mut I, n: usize) -> Self {
        match n {
            0 => Pennant::new(),
            1 => {
                // unwrap: the caller counted the pairs
                let (key, value) = pairs.next().unwrap();
                Pennant::singleton(key, value)
            }
            _ => {
                let left = Self::build_sorted(pairs, n / 2);
                let right = Self::build_sorted(pairs, n - n / 2);
                left.play(right)
            }
        }
    }

    /// Iterates over all bindings in ascending key order, yielding owned
    /// pairs. Amortized O(1) per binding.
    ///
    /// Works off a list of pending sub-pennants, repeatedly splitting the
    /// leftmost one through the tournament view until it collapses to a
    /// singleton.
    pub fn iter_ordered(&self) -> OrdIter<K, V> {
        self.clone().into_iter()
    }

    pub fn to_ordered_vec(&self) -> Vec<(K, V)> {
        self.iter_ordered().collect()
    }

    /// Maps every value through `f`, preserving the key set. O(n).
    ///
    /// Values drive the heap, so the result re-runs the whole tournament
    /// rather than patching values in place.
    pub fn map_values<W, F>(&self, mut f: F) -> Pennant<K, W>
    where
        W: Ord + Clone,
        F: FnMut(&K, &V) -> W,
    {
        let pairs: Vec<(K, W)> = self
            .iter_ordered()
            .map(|(key, value)| {
                let mapped = f(&key, &value);
                (key, mapped)
            })
            .collect();
        let n = pairs.len();
        Pennant::build_sorted(&mut pairs.into_iter(), n)
    }

    /// Keeps only the bindings satisfying `pred`. O(n).
    pub fn filter<F: FnMut(&K, &V) -> bool>(&self, mut pred: F) -> Self {
        let pairs: Vec<(K, V)> = self
            .iter_ordered()
            .filter(|(key, value)| pred(key, value))
            .collect();
        let n = pairs.len();
        Self::build_sorted(&mut pairs.into_iter(), n)
    }

    pub fn check_invariants(&self) {
        fn check_half<K: Ord, V: Ord>(
            key: &K,
            value: &V,
            losers: &LoserTree<K, V>,
            lo: Option<&K>,
            hi: &K,
        ) {
            // This winner's key lies inside its half's range.
            if let Some(lo) = lo {
                assert!(lo < key);
            }
            assert!(key <= hi);
            match losers {
                // A singleton's half is exactly its own key.
                LoserTree::Leaf => assert!(key == hi),
                LoserTree::Node(node) => {
                    assert_eq!(node.size, 1 + node.left.size() + node.right.size());
                    let (ls, rs) = (node.left.size(), node.right.size());
                    assert!(
                        ls + rs <= 1 || (ls <= 4 * rs && rs <= 4 * ls),
                        "weight balance violated: {ls} vs {rs}"
                    );
                    // The winner beat this loser at some point.
                    assert!(value <= &node.value);
                    if node.key <= node.split_key {
                        check_half(&node.key, &node.value, &node.left, lo, &node.split_key);
                        check_half(key, value, &node.right, Some(&node.split_key), hi);
                    } else {
                        check_half(key, value, &node.left, lo, &node.split_key);
                        check_half(&node.key, &node.value, &node.right, Some(&node.split_key), hi);
                    }
                }
            }
        }

        if let Some(w) = &self.root {
            check_half(&w.key, &w.value, &w.losers, None, &w.max_key);
        }
    }
}

/// Rebuilds the pennant of everything but the old winner: splits the loser
/// tree around the winner of each match and plays the pieces back together.
fn second_best<K: Ord + Clone, V: Ord + Clone>(
    losers: LoserTree<K, V>,
    max_key: K,
) -> Pennant<K, V> {
    match losers {
        LoserTree::Leaf => Pennant::new(),
        LoserTree::Node(node) => {
            let LoserNode {
                key,
                value,
                left,
                split_key,
                right,
                ..
            } = Rc::unwrap_or_clone(node);
            if key <= split_key {
                let winner = Pennant {
                    root: Some(Winner {
                        key,
                        value,
                        losers: left,
                        max_key: split_key,
                    }),
                };
                winner.play(second_best(right, max_key))
            } else {
                let winner = Pennant {
                    root: Some(Winner {
                        key,
                        value,
                        losers: right,
                        max_key,
                    }),
                };
                second_best(left, split_key).play(winner)
            }
        }
    }
}

impl<K, V> Default for Pennant<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, V: Ord + Clone> PartialEq for Pennant<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter_ordered().eq(other.iter_ordered())
    }
}

impl<K: Ord + Clone, V: Ord + Clone> Eq for Pennant<K, V> {}

impl<K: Ord + Clone, V: Ord + Clone> FromIterator<(K, V)> for Pennant<K, V> {
    /// Collects bindings by repeated insertion; on duplicate keys the last
    /// binding wins.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut queue = Pennant::new();
        queue.extend(iter);
        queue
    }
}

impl<K: Ord + Clone, V: Ord + Clone> Extend<(K, V)> for Pennant<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> Index<&K> for Pennant<K, V> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found")
    }
}

/// Unordered borrowing iterator: the winner, then the loser payloads in tree
/// order.
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    winner: Option<(&'a K, &'a V)>,
    stack: Vec<&'a LoserNode<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(binding) = self.winner.take() {
            self.remaining -= 1;
            return Some(binding);
        }
        let node = self.stack.pop()?;
        if let LoserTree::Node(n) = &node.left {
            self.stack.push(n);
        }
        if let LoserTree::Node(n) = &node.right {
            self.stack.push(n);
        }
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> std::iter::FusedIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a Pennant<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let mut stack = Vec::new();
        let winner = self.root.as_ref().map(|w| {
            if let LoserTree::Node(n) = &w.losers {
                stack.push(n.as_ref());
            }
            (&w.key, &w.value)
        });
        Iter {
            winner,
            stack,
            remaining: self.len(),
        }
    }
}

/// Consuming key-ordered iterator; see [`Pennant::iter_ordered`].
pub struct OrdIter<K, V> {
    pending: Vec<Pennant<K, V>>,
    remaining: usize,
}

impl<K: Ord + Clone, V: Ord + Clone> Iterator for OrdIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let pennant = self.pending.pop()?;
            match pennant.tournament_view() {
                None => continue,
                Some(TournamentView::Singleton { key, value }) => {
                    self.remaining -= 1;
                    return Some((key, value));
                }
                Some(TournamentView::Play(p1, p2)) => {
                    self.pending.push(p2);
                    self.pending.push(p1);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Ord + Clone, V: Ord + Clone> ExactSizeIterator for OrdIter<K, V> {}
impl<K: Ord + Clone, V: Ord + Clone> std::iter::FusedIterator for OrdIter<K, V> {}

impl<K: Ord + Clone, V: Ord + Clone> IntoIterator for Pennant<K, V> {
    type Item = (K, V);
    type IntoIter = OrdIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        OrdIter {
            remaining: self.len(),
            pending: vec![self],
        }
    }
}

impl<K, V> serde::Serialize for Pennant<K, V>
where
    K: Ord + serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;

        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for binding in self.iter() {
            seq.serialize_element(&binding)?;
        }
        seq.end()
    }
}

impl<'de, K, V> serde::Deserialize<'de> for Pennant<K, V>
where
    K: Ord + Clone + serde::Deserialize<'de>,
    V: Ord + Clone + serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let pairs: Vec<(K, V)> = Vec::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic() {
        let mut queue: Pennant<i32, &str> = Pennant::new();
        queue.check_invariants();
        assert_eq!(queue.min(), None);
        assert_eq!(queue.min_binding(), Err(Error::Empty));
        assert_eq!(queue.pop_min(), None);

        queue.insert(3, "c");
        queue.insert(1, "a");
        queue.insert(2, "b");
        queue.check_invariants();

        assert_eq!(queue.len(), 3);
        let keys: Vec<i32> = queue.iter_ordered().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![1, 2, 3]);

        // "a" < "b" < "c", so the binding at key 1 wins the tournament.
        assert_eq!(queue.min(), Some((&1, &"a")));
        assert_eq!(queue.pop_min(), Some((1, "a")));
        queue.check_invariants();
        assert_eq!(queue.to_ordered_vec(), vec![(2, "b"), (3, "c")]);
    }

    #[test]
    fn lookup() {
        let queue: Pennant<u32, u32> = (0..100).map(|i| (i, 1000 - i)).collect();
        queue.check_invariants();
        for i in 0..100 {
            assert_eq!(queue.get(&i), Some(&(1000 - i)));
            assert_eq!(queue.find(&i), Ok(&(1000 - i)));
            assert_eq!(queue[&i], 1000 - i);
        }
        assert_eq!(queue.get(&100), None);
        assert_eq!(queue.find(&100), Err(Error::KeyNotFound));
        assert_eq!(queue.min(), Some((&99, &901)));
    }

    #[test]
    fn insert_replaces_and_remove_inverts() {
        let mut queue: Pennant<u32, u32> = (0..50).map(|i| (i, i + 100)).collect();
        let snapshot = queue.clone();

        assert_eq!(queue.insert(25, 1), Some(125));
        assert_eq!(queue.min(), Some((&25, &1)));
        queue.check_invariants();

        assert_eq!(queue.insert(500, 0), None);
        assert_eq!(queue.remove(&500), Some(0));
        assert_eq!(queue.insert(25, 125), Some(1));
        queue.check_invariants();
        assert_eq!(queue, snapshot);

        assert_eq!(queue.remove(&999), None);
        assert_eq!(queue, snapshot);
    }

    #[test]
    fn clones_are_independent() {
        let mut queue: Pennant<u32, u32> = (0..100).map(|i| (i, i)).collect();
        let snapshot = queue.clone();
        for i in 0..100 {
            queue.remove(&i);
            queue.check_invariants();
        }
        assert!(queue.is_empty());
        assert_eq!(snapshot.len(), 100);
        snapshot.check_invariants();
    }

    #[test]
    fn adjust_moves_priorities_both_ways() {
        let mut queue: Pennant<u32, i64> = (0..20).map(|i| (i, i as i64)).collect();

        assert!(queue.adjust(&10, |v| *v = -1));
        assert_eq!(queue.min(), Some((&10, &-1)));
        queue.check_invariants();

        assert!(queue.adjust(&10, |v| *v = 100));
        assert_eq!(queue.min(), Some((&0, &0)));
        queue.check_invariants();

        assert!(!queue.adjust(&999, |v| *v = 0));
        assert_eq!(queue.len(), 20);
    }

    #[test]
    fn value_ties_go_to_the_smaller_key() {
        let mut queue: Pennant<u32, u32> = Pennant::new();
        for key in [5, 1, 9, 3] {
            queue.insert(key, 7);
        }
        assert_eq!(queue.min(), Some((&1, &7)));
        assert_eq!(queue.pop_min(), Some((1, 7)));
        assert_eq!(queue.pop_min(), Some((3, 7)));
        assert_eq!(queue.pop_min(), Some((5, 7)));
        assert_eq!(queue.pop_min(), Some((9, 7)));
    }

    #[test]
    fn pop_min_drains_in_value_order() {
        let queue: Pennant<u32, u32> = (0..100).map(|i| (i, (i * 37) % 100)).collect();
        let mut queue = queue;
        let mut drained = Vec::new();
        while let Some((_, value)) = queue.pop_min() {
            queue.check_invariants();
            drained.push(value);
        }
        let mut sorted = drained.clone();
        sorted.sort();
        assert_eq!(drained, sorted);
    }

    #[test]
    fn from_sorted_matches_insertion() {
        let pairs: Vec<(u32, u32)> = (0..100).map(|i| (i, 1000 - i)).collect();
        let built = Pennant::from_sorted(pairs.clone()).unwrap();
        built.check_invariants();
        let inserted: Pennant<u32, u32> = pairs.into_iter().collect();
        assert_eq!(built, inserted);

        assert_eq!(
            Pennant::from_sorted([(2u32, 0u32), (1, 0)]),
            Err(Error::Unsorted)
        );
        assert_eq!(
            Pennant::from_sorted([(1u32, 0u32), (1, 1)]),
            Err(Error::Unsorted)
        );
    }

    #[test]
    fn map_values_and_filter() {
        let queue: Pennant<u32, u32> = (0..20).map(|i| (i, i)).collect();

        let flipped = queue.map_values(|_, v| 100 - *v);
        flipped.check_invariants();
        assert_eq!(flipped.min(), Some((&19, &81)));
        assert_eq!(flipped.len(), 20);

        let evens = queue.filter(|k, _| k % 2 == 0);
        evens.check_invariants();
        assert_eq!(evens.len(), 10);
        assert!(evens.contains_key(&4));
        assert!(!evens.contains_key(&5));
    }

    #[test]
    fn unordered_iteration_visits_everything() {
        let queue: Pennant<u32, u32> = (0..50).map(|i| (i, i ^ 21)).collect();
        let mut seen: Vec<u32> = queue.iter().map(|(k, _)| *k).collect();
        seen.sort();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
        assert_eq!(queue.iter().len(), 50);
    }

    #[test]
    fn serde_roundtrip() {
        let queue: Pennant<u32, u32> = (0..50).map(|i| (i, 1000 - i)).collect();
        let json = serde_json::to_string(&queue).unwrap();
        let back: Pennant<u32, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(queue, back);
    }
}
