use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

/// Checks ordering, recorded heights and AVL balance at every node, and
/// returns the number of reachable nodes.
pub(crate) fn validate_tree<T: Entry>(t: &AvlTree<T>) -> usize {
    fn walk<T: Entry>(link: &Link<T>, count: &mut usize) -> u8 {
        let Some(node) = link else {
            return 0;
        };
        *count += 1;

        if let Some(left) = &node.left {
            assert!(
                left.entry.key() < node.entry.key(),
                "left child must order before its parent"
            );
        }
        if let Some(right) = &node.right {
            assert!(
                right.entry.key() > node.entry.key(),
                "right child must order after its parent"
            );
        }

        let hl = walk(&node.left, count);
        let hr = walk(&node.right, count);
        assert_eq!(
            node.height,
            hl.max(hr) + 1,
            "stored node height must match children"
        );
        assert!(
            hl.abs_diff(hr) <= 1,
            "subtree heights {hl} and {hr} violate AVL balance"
        );
        node.height
    }

    let mut count = 0usize;
    walk(&t.root, &mut count);

    // Parent/child checks alone do not bound whole subtrees.
    let listed = t.to_list();
    for pair in listed.windows(2) {
        assert!(
            pair[0].key() < pair[1].key(),
            "in-order traversal must be strictly ascending"
        );
    }

    assert_eq!(listed.len(), count, "iterator must visit every node");
    assert_eq!(t.count_nodes(), count, "count_nodes must match reachable nodes");
    count
}

#[derive(Arbitrary, Clone, Debug)]
enum Op {
    Insert(u16, u8),
    SearchExact(u16),
    SearchContains(u8),
}

/// Display name derived from the key and a tag so that substring queries have
/// something non-trivial to match.
fn name_for(key: u16, tag: u8) -> String {
    format!("{}-{key}", tag % 16)
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(any::<Op>(), 0..=1500)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_btreemap(ops in ops_strategy()) {
        let mut t: AvlTree<Named<u16>> = AvlTree::new();
        let mut m: BTreeMap<u16, String> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, tag) => {
                    let name = name_for(key, tag);
                    let fresh = !m.contains_key(&key);
                    m.entry(key).or_insert_with(|| name.clone());
                    prop_assert_eq!(t.insert(Named::new(key, name)), fresh);
                }
                Op::SearchExact(key) => {
                    let got = t.search_exact(&key).map(|e| e.name());
                    prop_assert_eq!(got, m.get(&key).map(String::as_str));
                }
                Op::SearchContains(tag) => {
                    let fragment = format!("{}-", tag % 16);
                    let got: Vec<u16> = t.search_by_contains(&fragment).iter().map(|e| e.key).collect();
                    let expected: Vec<u16> = m
                        .iter()
                        .filter(|(_, name)| name.contains(&fragment))
                        .map(|(k, _)| *k)
                        .collect();
                    prop_assert_eq!(got, expected);
                }
            }
        }

        prop_assert_eq!(validate_tree(&t), m.len());
        let got: Vec<(u16, &str)> = t.iter().map(|e| (e.key, e.name())).collect();
        let expected: Vec<(u16, &str)> = m.iter().map(|(k, v)| (*k, v.as_str())).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_balanced_after_every_insert(keys in prop::collection::vec(any::<i32>(), 0..=300)) {
        let mut t: AvlTree<Named<i32>> = AvlTree::new();
        for key in keys {
            t.insert(Named::new(key, ""));
            validate_tree(&t);
        }
    }

    #[test]
    fn prop_pages_concatenate_to_listing(
        keys in prop::collection::vec(any::<u16>(), 0..=200),
        page_size in 1usize..=20,
    ) {
        let t: AvlTree<Named<u16>> = keys.into_iter().map(|k| Named::new(k, "")).collect();
        let pages: Vec<Vec<&Named<u16>>> = t.pages(page_size).collect();

        for page in pages.iter().take(pages.len().saturating_sub(1)) {
            prop_assert_eq!(page.len(), page_size);
        }
        for (i, page) in pages.iter().enumerate() {
            prop_assert_eq!(page, &t.page(i, page_size));
        }
        let flat: Vec<&Named<u16>> = pages.into_iter().flatten().collect();
        prop_assert_eq!(flat, t.to_list());
    }
}

/// Visits every ordering of `items` (Heap's algorithm, iterative form).
fn each_ordering<T: Clone>(items: &[T], mut visit: impl FnMut(&[T])) {
    let mut order = items.to_vec();
    let mut counters = vec![0usize; order.len()];
    visit(&order);

    let mut depth = 1;
    while depth < order.len() {
        if counters[depth] < depth {
            let other = if depth % 2 == 0 { 0 } else { counters[depth] };
            order.swap(other, depth);
            visit(&order);
            counters[depth] += 1;
            depth = 1;
        } else {
            counters[depth] = 0;
            depth += 1;
        }
    }
}

#[test]
fn each_ordering_visits_all_distinct() {
    let mut seen = std::collections::BTreeSet::new();
    each_ordering(&[1, 2, 3, 4], |order| {
        seen.insert(order.to_vec());
    });
    assert_eq!(seen.len(), 24);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys: Vec<String> = ["c", "a", "e", "b", "d", "f", "g"]
        .into_iter()
        .map(String::from)
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();

    each_ordering(&keys, |order| {
        let t: AvlTree<String> = order.iter().cloned().collect();

        assert_eq!(validate_tree(&t), sorted.len());
        // 7 nodes fit in an AVL tree of height 3 or 4.
        assert!(t.height() <= 4);
        let got: Vec<&String> = t.to_list();
        let expected: Vec<&String> = sorted.iter().collect();
        assert_eq!(got, expected);
        for k in &sorted {
            assert_eq!(t.search_exact(k.as_str()), Some(k));
        }
    });
}
