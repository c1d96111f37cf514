use std::cmp::Ordering;

use amr_forest::element::{
    ElementScheme, HexScheme, LineScheme, PyramidElement, PyramidKind, PyramidScheme, QuadScheme,
    Shape, TetScheme,
};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

/// Follows `path` from the root, reducing each step modulo the child count.
fn descend<S: ElementScheme>(scheme: &S, path: &[usize]) -> S::Element {
    path.iter().fold(scheme.root(), |element, &step| {
        let n = scheme.num_children(&element);
        scheme.child(&element, step % n)
    })
}

fn check_key<S: ElementScheme>(scheme: &S, path: &[usize]) -> Result<(), TestCaseError> {
    let key = descend(scheme, path);
    let level = scheme.level(&key);
    prop_assert!(scheme.is_valid(&key), "{:?}", key);

    // parent(child(k, i)) == k and child_id(child(k, i)) == i
    let children = scheme.children(&key);
    for (i, child) in children.iter().enumerate() {
        prop_assert_eq!(scheme.parent(child), key);
        prop_assert_eq!(scheme.child_id(child), i);
        prop_assert_eq!(scheme.num_siblings(child), children.len());
    }

    // children form a family in ascending curve order
    prop_assert!(scheme.is_family(&children));
    for pair in children.windows(2) {
        prop_assert_eq!(scheme.compare(&pair[0], &pair[1]), Ordering::Less);
    }
    prop_assert_eq!(scheme.compare(&key, &children[0]), Ordering::Less);

    // from_linear_id inverts linear_id on every ancestor level
    for l in 0..=level {
        let id = scheme.linear_id(&key, l);
        prop_assert_eq!(scheme.from_linear_id(l, id), scheme.ancestor(&key, l));
    }

    // descendants span a contiguous id range
    let deeper = level + 2;
    let first = scheme.first_descendant(&key, deeper);
    let last = scheme.last_descendant(&key, deeper);
    let first_id = scheme.linear_id(&first, deeper);
    prop_assert_eq!(first_id, scheme.linear_id(&key, deeper));
    prop_assert_eq!(
        scheme.linear_id(&last, deeper),
        first_id + scheme.num_descendants(&key, deeper) - 1
    );
    prop_assert!(scheme.is_ancestor(&key, &last));

    // successor is the next id
    if level > 0 {
        let id = scheme.linear_id(&key, level);
        if id + 1 < scheme.num_descendants(&scheme.root(), level) {
            let next = scheme.successor(&key, level);
            prop_assert_eq!(scheme.linear_id(&next, level), id + 1);
            prop_assert_eq!(scheme.compare(&key, &next), Ordering::Less);
        }
    }
    Ok(())
}

/// Walks a whole level with `successor` and checks it visits every id once.
fn walk_level<S: ElementScheme>(scheme: &S, level: u8) -> Vec<S::Element> {
    let root = scheme.root();
    let count = scheme.num_descendants(&root, level);
    let mut current = scheme.first_descendant(&root, level);
    let mut visited = vec![current];
    for expected_id in 1..count {
        current = scheme.successor(&current, level);
        assert_eq!(scheme.linear_id(&current, level), expected_id);
        visited.push(current);
    }
    assert_eq!(current, scheme.last_descendant(&root, level));
    visited
}

proptest! {
    #[test]
    fn pyramid_keys(path in proptest::collection::vec(0usize..10, 0..8)) {
        check_key(&PyramidScheme, &path)?;
    }

    #[test]
    fn tet_keys(path in proptest::collection::vec(0usize..8, 0..12)) {
        check_key(&TetScheme, &path)?;
    }

    #[test]
    fn hex_keys(path in proptest::collection::vec(0usize..8, 0..19)) {
        check_key(&HexScheme::new(), &path)?;
    }

    #[test]
    fn quad_keys(path in proptest::collection::vec(0usize..4, 0..19)) {
        check_key(&QuadScheme::new(), &path)?;
    }

    #[test]
    fn line_keys(path in proptest::collection::vec(0usize..2, 0..19)) {
        check_key(&LineScheme::new(), &path)?;
    }
}

#[test]
fn successor_covers_pyramid_levels() {
    let scheme = PyramidScheme;
    for (level, expected) in [(1u8, 10usize), (2, 92), (3, 808)] {
        let visited = walk_level(&scheme, level);
        assert_eq!(visited.len(), expected);
        assert!(visited.iter().all(|e| scheme.is_valid(e)));
        for pair in visited.windows(2) {
            assert_eq!(scheme.compare(&pair[0], &pair[1]), Ordering::Less);
        }
    }
}

#[test]
fn successor_covers_tet_and_hex_levels() {
    assert_eq!(walk_level(&TetScheme, 3).len(), 512);
    assert_eq!(walk_level(&HexScheme::new(), 3).len(), 512);
    assert_eq!(walk_level(&QuadScheme::new(), 4).len(), 256);
}

#[test]
fn pyramid_level_one_families_round_trip() {
    let scheme = PyramidScheme;
    for pyramid in scheme
        .children(&scheme.root())
        .into_iter()
        .filter(|e| scheme.element_shape(e) == Shape::Pyramid)
    {
        for (i, child) in scheme.children(&pyramid).into_iter().enumerate() {
            assert_eq!(scheme.parent_and_child_id(&child), (pyramid, i));
            if let PyramidKind::Tet(_) = child.kind {
                // Tetrahedra below tetrahedra next to the diagonal faces.
                for (j, grandchild) in scheme.children(&child).into_iter().enumerate() {
                    assert_eq!(scheme.parent_and_child_id(&grandchild), (child, j));
                    assert_eq!(scheme.ancestor(&grandchild, 1), pyramid);
                    assert_eq!(scheme.num_siblings(&grandchild), 8);
                }
                assert_eq!(scheme.num_siblings(&child), 10);
            }
        }
    }
}

#[test]
fn hybrid_ids_stay_dense_at_the_deepest_level() {
    let scheme = PyramidScheme;
    let level = scheme.max_level();
    let root = PyramidElement::root();
    let last = scheme.last_descendant(&root, level);
    assert_eq!(
        scheme.linear_id(&last, level),
        scheme.num_descendants(&root, level) - 1
    );
    assert_eq!(scheme.from_linear_id(level, 0), scheme.first_descendant(&root, level));
}
