//! Weight-balanced rebalancing for the loser tree.
//!
//! These are the classic single/double rotations of a weight-balanced search
//! tree, with one extra obligation: a loser node's payload must stay the
//! winner of the half its key falls in. A rotation changes which halves meet
//! in which match, so besides moving subtrees it has to re-decide, per
//! affected node, which of the two payloads won the rebuilt match — by origin
//! side where the halves differ, by value where the payloads genuinely meet.

use std::rc::Rc;

use crate::pennant::{LoserNode, LoserTree};

/// Rebalance when one side outweighs the other by more than this factor.
const RATIO: usize = 4;

/// Plain node constructor; computes the cached size.
pub(crate) fn node<K, V>(
    key: K,
    value: V,
    left: LoserTree<K, V>,
    split_key: K,
    right: LoserTree<K, V>,
) -> LoserTree<K, V> {
    let size = 1 + left.size() + right.size();
    LoserTree::Node(Rc::new(LoserNode {
        size,
        key,
        value,
        left,
        split_key,
        right,
    }))
}

/// Smart constructor: builds `Nd(key, value, left, split_key, right)`,
/// restoring the weight-balance invariant if an insertion or deletion left
/// the two sides more than a factor of [`RATIO`] apart.
pub(crate) fn balance<K: Ord + Clone, V: Ord + Clone>(
    key: K,
    value: V,
    left: LoserTree<K, V>,
    split_key: K,
    right: LoserTree<K, V>,
) -> LoserTree<K, V> {
    if left.size() + right.size() < 2 {
        node(key, value, left, split_key, right)
    } else if right.size() > RATIO * left.size() {
        balance_left(key, value, left, split_key, right)
    } else if left.size() > RATIO * right.size() {
        balance_right(key, value, left, split_key, right)
    } else {
        node(key, value, left, split_key, right)
    }
}

fn balance_left<K: Ord + Clone, V: Ord + Clone>(
    key: K,
    value: V,
    left: LoserTree<K, V>,
    split_key: K,
    right: LoserTree<K, V>,
) -> LoserTree<K, V> {
    // unwrap: the right side outweighs the left, so it can't be empty
    let LoserTree::Node(r) = &right else {
        unreachable!();
    };
    if r.left.size() < r.right.size() {
        single_left(key, value, left, split_key, right)
    } else {
        double_left(key, value, left, split_key, right)
    }
}

fn balance_right<K: Ord + Clone, V: Ord + Clone>(
    key: K,
    value: V,
    left: LoserTree<K, V>,
    split_key: K,
    right: LoserTree<K, V>,
) -> LoserTree<K, V> {
    // unwrap: the left side outweighs the right, so it can't be empty
    let LoserTree::Node(l) = &left else {
        unreachable!();
    };
    if l.right.size() < l.left.size() {
        single_right(key, value, left, split_key, right)
    } else {
        double_right(key, value, left, split_key, right)
    }
}

/// Rotates `Nd(k1, v1, t1, s1, Nd(k2, v2, t2, s2, t3))` into
/// `Nd(top, Nd(bottom, t1, s1, t2), s2, t3)`.
///
/// Which payload ends up on top follows from where each payload's key lives:
/// the payload keyed right of its split shares a half with the other one only
/// when the second payload is keyed left of `s2`, and only then does a value
/// comparison decide the rebuilt match.
fn single_left<K: Ord + Clone, V: Ord + Clone>(
    k1: K,
    v1: V,
    t1: LoserTree<K, V>,
    s1: K,
    right: LoserTree<K, V>,
) -> LoserTree<K, V> {
    let LoserTree::Node(r) = right else {
        unreachable!();
    };
    let LoserNode {
        key: k2,
        value: v2,
        left: t2,
        split_key: s2,
        right: t3,
        ..
    } = Rc::unwrap_or_clone(r);
    let first_on_top = k2 <= s2 && (k1 > s1 || v1 <= v2);
    if first_on_top {
        node(k1, v1, node(k2, v2, t1, s1, t2), s2, t3)
    } else {
        node(k2, v2, node(k1, v1, t1, s1, t2), s2, t3)
    }
}

/// Mirror image of [`single_left`]: rotates
/// `Nd(k1, v1, Nd(k2, v2, t1, s1, t2), s2, t3)` into
/// `Nd(top, t1, s1, Nd(bottom, t2, s2, t3))`.
fn single_right<K: Ord + Clone, V: Ord + Clone>(
    k1: K,
    v1: V,
    left: LoserTree<K, V>,
    s2: K,
    t3: LoserTree<K, V>,
) -> LoserTree<K, V> {
    let LoserTree::Node(l) = left else {
        unreachable!();
    };
    let LoserNode {
        key: k2,
        value: v2,
        left: t1,
        split_key: s1,
        right: t2,
        ..
    } = Rc::unwrap_or_clone(l);
    let first_on_top = k2 > s1 && (k1 <= s2 || v1 < v2);
    if first_on_top {
        node(k1, v1, t1, s1, node(k2, v2, t2, s2, t3))
    } else {
        node(k2, v2, t1, s1, node(k1, v1, t2, s2, t3))
    }
}

fn double_left<K: Ord + Clone, V: Ord + Clone>(
    k1: K,
    v1: V,
    t1: LoserTree<K, V>,
    s1: K,
    right: LoserTree<K, V>,
) -> LoserTree<K, V> {
    let LoserTree::Node(r) = right else {
        unreachable!();
    };
    let LoserNode {
        key: k2,
        value: v2,
        left: rl,
        split_key: s2,
        right: rr,
        ..
    } = Rc::unwrap_or_clone(r);
    single_left(k1, v1, t1, s1, single_right(k2, v2, rl, s2, rr))
}

fn double_right<K: Ord + Clone, V: Ord + Clone>(
    k1: K,
    v1: V,
    left: LoserTree<K, V>,
    s2: K,
    t3: LoserTree<K, V>,
) -> LoserTree<K, V> {
    let LoserTree::Node(l) = left else {
        unreachable!();
    };
    let LoserNode {
        key: k2,
        value: v2,
        left: ll,
        split_key: s1,
        right: lr,
        ..
    } = Rc::unwrap_or_clone(l);
    single_right(k1, v1, single_left(k2, v2, ll, s1, lr), s2, t3)
}
