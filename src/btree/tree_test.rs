#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::core::config::DebugTraits;

    type TestTree = BTree<i32, i32, DefaultComparator, DebugTraits, false>;

    #[test]
    fn new_tree_is_empty() {
        let t = TestTree::new();
        assert!(t.empty());
        assert_eq!(t.size(), 0);
        assert!(t.begin() == t.end());
    }

    #[test]
    fn clear_resets_to_the_new_state() {
        let mut t = TestTree::new();
        for i in 0..50 {
            t.insert(i, i * 2);
        }
        t.clear();
        assert!(t.empty());
        assert_eq!(t.size(), 0);
        assert_eq!(t.stats().leaves, 0);
    }

    #[test]
    fn swap_exchanges_whole_contents() {
        let mut a = TestTree::new();
        let mut b = TestTree::new();
        a.insert(1, 10);
        b.insert(2, 20);
        b.insert(3, 30);
        a.swap(&mut b);
        assert_eq!(a.size(), 2);
        assert_eq!(b.size(), 1);
        assert!(a.exists(&2));
        assert!(b.exists(&1));
    }

    #[test]
    fn find_lower_upper_and_equal_range_on_unique_keys() {
        let mut t = TestTree::new();
        for i in (0..200).step_by(2) {
            t.insert(i, i);
        }
        assert!(t.exists(&100));
        assert!(!t.exists(&101));
        assert_eq!(t.count(&100), 1);
        assert_eq!(t.count(&101), 0);

        let lb = t.lower_bound(&101);
        assert_eq!(lb.key(), Some(&102));
        let ub = t.upper_bound(&100);
        assert_eq!(ub.key(), Some(&102));

        let (lo, hi) = t.equal_range(&100);
        assert_eq!(lo.key(), Some(&100));
        assert_eq!(hi.key(), Some(&102));
    }

    #[test]
    fn get_mut_updates_value_in_place_without_moving_the_key() {
        let mut t = TestTree::new();
        t.insert(5, 50);
        *t.get_mut(&5).unwrap() += 1;
        assert_eq!(t.find(&5).value(), Some(&51));
        assert!(t.get_mut(&999).is_none());
    }

    #[test]
    fn lexicographic_cmp_matches_key_then_value_ordering() {
        let mut a: TestTree = TestTree::new();
        let mut b: TestTree = TestTree::new();
        a.insert(1, 1);
        a.insert(2, 2);
        b.insert(1, 1);
        b.insert(2, 2);
        assert_eq!(a.lexicographic_cmp(&b), std::cmp::Ordering::Equal);

        b.insert(3, 3);
        assert_eq!(a.lexicographic_cmp(&b), std::cmp::Ordering::Less);
        assert_eq!(b.lexicographic_cmp(&a), std::cmp::Ordering::Greater);
    }

    #[test]
    fn partial_eq_and_partial_ord_delegate_to_lexicographic_cmp() {
        let mut a: TestTree = TestTree::new();
        let mut b: TestTree = TestTree::new();
        a.insert(1, 1);
        a.insert(2, 2);
        b.insert(1, 1);
        b.insert(2, 2);
        assert!(a == b);
        assert!(a <= b);
        assert!(a >= b);

        b.insert(3, 3);
        assert!(a != b);
        assert!(a < b);
        assert!(b > a);
    }

    #[test]
    fn lexicographic_cmp_is_antisymmetric_on_a_value_tie_break() {
        let mut a: TestTree = TestTree::new();
        let mut b: TestTree = TestTree::new();
        a.insert(1, 1);
        a.insert(2, 10);
        b.insert(1, 1);
        b.insert(2, 20);

        assert_eq!(a.lexicographic_cmp(&b), std::cmp::Ordering::Less);
        assert_eq!(b.lexicographic_cmp(&a), std::cmp::Ordering::Greater);
        assert!(a != b);
        assert!(b != a);
        assert!(a < b);
        assert!(b > a);
        assert!(!(a > b));
        assert!(!(b < a));
    }

    #[test]
    fn forward_iteration_over_many_inserts_is_sorted() {
        let mut t = TestTree::new();
        let mut keys: Vec<i32> = (0..500).collect();
        // insert out of order to exercise splits from every direction
        keys.sort_by_key(|k| k.wrapping_mul(2654435761u32 as i32) ^ *k);
        for k in &keys {
            t.insert(*k, *k);
        }
        let collected: Vec<i32> = t.iter().map(|(k, _)| k).collect();
        let mut expected: Vec<i32> = (0..500).collect();
        expected.sort();
        assert_eq!(collected, expected);
    }

    #[test]
    fn reverse_iteration_is_the_mirror_of_forward() {
        let mut t = TestTree::new();
        for i in 0..300 {
            t.insert(i, i);
        }
        let forward: Vec<i32> = t.iter().map(|(k, _)| k).collect();
        let mut reverse: Vec<i32> = t.rbegin().map(|(k, _)| k).collect();
        reverse.reverse();
        assert_eq!(forward, reverse);
    }
}
