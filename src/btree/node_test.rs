#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn alloc_then_free_reuses_the_slot() {
        let mut arena: Arena<i32, i32> = Arena::new();
        let a = arena.alloc_leaf(LeafNode::new());
        let b = arena.alloc_leaf(LeafNode::new());
        arena.free(a);
        let c = arena.alloc_leaf(LeafNode::new());
        assert_ne!(b, c);
        // c reused a's freed slot.
        assert_eq!(format!("{a:?}"), format!("{c:?}"));
    }

    #[test]
    fn leaf_and_inner_accessors_round_trip() {
        let mut arena: Arena<i32, &'static str> = Arena::new();
        let leaf_id = arena.alloc_leaf(LeafNode::new());
        arena.leaf_mut(leaf_id).keys.push(1);
        arena.leaf_mut(leaf_id).values.push("one");
        assert_eq!(arena.leaf(leaf_id).keys, vec![1]);
        assert!(arena.is_leaf(leaf_id));

        let inner_id = arena.alloc_inner(InnerNode::new(1));
        arena.inner_mut(inner_id).keys.push(5);
        arena.inner_mut(inner_id).children.push(leaf_id);
        assert_eq!(arena.inner(inner_id).keys, vec![5]);
        assert!(!arena.is_leaf(inner_id));
    }

    #[test]
    #[should_panic(expected = "does not refer to a leaf")]
    fn leaf_accessor_panics_on_inner_node() {
        let mut arena: Arena<i32, i32> = Arena::new();
        let inner_id = arena.alloc_inner(InnerNode::new(1));
        let _ = arena.leaf(inner_id);
    }

    #[test]
    fn leaf_chain_links_survive_round_trips() {
        let mut arena: Arena<i32, i32> = Arena::new();
        let a = arena.alloc_leaf(LeafNode::new());
        let b = arena.alloc_leaf(LeafNode::new());
        arena.leaf_mut(a).next = Some(b);
        arena.leaf_mut(b).prev = Some(a);
        assert_eq!(arena.leaf(a).next, Some(b));
        assert_eq!(arena.leaf(b).prev, Some(a));
    }
}
