#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::core::config::DebugTraits;

    type TestTree = BTree<i32, i32, DefaultComparator, DebugTraits, false>;

    #[test]
    fn empty_tree_cursor_is_not_dereferenceable() {
        let t = TestTree::new();
        let c = t.begin();
        assert!(!c.is_dereferenceable());
        assert_eq!(c.key(), None);
        assert_eq!(c.value(), None);
    }

    #[test]
    fn advance_walks_across_a_leaf_boundary() {
        let mut t = TestTree::new();
        for i in 0..40 {
            t.insert(i, i);
        }
        let mut c = t.begin();
        let mut seen = Vec::new();
        while c.is_dereferenceable() {
            seen.push(*c.key().unwrap());
            c.advance();
        }
        assert_eq!(seen, (0..40).collect::<Vec<_>>());
        assert_eq!(c, t.end());
    }

    #[test]
    fn retreat_from_begin_stays_at_begin() {
        let mut t = TestTree::new();
        t.insert(1, 1);
        t.insert(2, 2);
        let mut c = t.begin();
        c.retreat();
        assert_eq!(c, t.begin());
    }

    #[test]
    fn retreat_walks_back_across_a_leaf_boundary() {
        let mut t = TestTree::new();
        for i in 0..40 {
            t.insert(i, i);
        }
        let mut c = t.end();
        c.retreat();
        assert_eq!(c.key(), Some(&39));
        for _ in 0..39 {
            c.retreat();
        }
        assert_eq!(c.key(), Some(&0));
        assert_eq!(c, t.begin());
    }

    #[test]
    fn reverse_cursor_terminates_instead_of_repeating_begin() {
        let mut t = TestTree::new();
        for i in 0..10 {
            t.insert(i, i);
        }
        let collected: Vec<i32> = t.rbegin().map(|(k, _)| k).collect();
        assert_eq!(collected.len(), 10);
        assert_eq!(collected, (0..10).rev().collect::<Vec<_>>());
    }

    #[test]
    fn pair_returns_an_owned_copy_not_a_reference() {
        let mut t = TestTree::new();
        t.insert(7, 70);
        let c = t.find(&7);
        let (k, v) = c.pair().unwrap();
        assert_eq!((k, v), (7, 70));
    }
}
