#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::core::config::DebugTraits;
    use crate::error::BTreeError;

    type TestTree = BTree<i32, i32, DefaultComparator, DebugTraits, false>;
    type MultiTree = BTree<i32, i32, DefaultComparator, DebugTraits, true>;

    #[test]
    fn dump_then_restore_round_trips_an_empty_tree() {
        let t = TestTree::new();
        let bytes = dump(&t).unwrap();
        let restored: TestTree = restore(&bytes).unwrap();
        assert!(restored.empty());
    }

    #[test]
    fn dump_then_restore_preserves_every_key_value_pair_and_counters() {
        let mut t = TestTree::new();
        for i in 0..900 {
            t.insert(i, i * 3);
        }
        let bytes = dump(&t).unwrap();
        let restored: TestTree = restore(&bytes).unwrap();

        assert_eq!(restored.size(), t.size());
        assert_eq!(restored.stats(), t.stats());
        assert!(restored.verify().is_ok());
        assert_eq!(restored.iter().collect::<Vec<_>>(), t.iter().collect::<Vec<_>>());
    }

    #[test]
    fn dump_then_restore_preserves_duplicates_in_a_multimap() {
        let mut t = MultiTree::new();
        for _ in 0..10 {
            t.insert(1, 1);
        }
        t.insert(2, 2);
        let bytes = dump(&t).unwrap();
        let restored: MultiTree = restore(&bytes).unwrap();
        assert_eq!(restored.count(&1), 10);
        assert_eq!(restored.size(), 11);
    }

    #[test]
    fn restore_rejects_a_bad_magic() {
        let mut bytes = dump(&TestTree::new()).unwrap();
        bytes[0] = b'X';
        let err = restore::<i32, i32, DefaultComparator, DebugTraits, false>(&bytes).unwrap_err();
        assert!(matches!(err, BTreeError::BadDumpMagic { .. }));
    }

    #[test]
    fn restore_rejects_a_flipped_payload_byte_via_checksum() {
        let mut t = TestTree::new();
        for i in 0..40 {
            t.insert(i, i);
        }
        let mut bytes = dump(&t).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        let err = restore::<i32, i32, DefaultComparator, DebugTraits, false>(&bytes).unwrap_err();
        assert!(matches!(err, BTreeError::DumpChecksumMismatch { .. }));
    }

    #[test]
    fn restore_rejects_a_cross_instantiation_load() {
        let mut t = TestTree::new();
        t.insert(1, 1);
        let bytes = dump(&t).unwrap();
        // u64 keys have a different sizeof than i32, so the instantiation
        // check must reject this even though the bytes decode cleanly.
        let err = restore::<u64, i32, DefaultComparator, DebugTraits, false>(&bytes).unwrap_err();
        assert!(matches!(err, BTreeError::DumpDecodeError { .. }));
    }
}
