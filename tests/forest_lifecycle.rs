use amr_forest::element::{decode_elements, encode_elements};
use amr_forest::prelude::*;

#[test]
fn uniform_forests_have_the_expected_sizes() {
    let lines = Forest::new_uniform(LineScheme::new(), &[Shape::Line; 4], 5).unwrap();
    assert_eq!(lines.local_num_elements(), 4 * 32);

    let hexes = Forest::new_uniform(HexScheme::new(), &[Shape::Hex], 3).unwrap();
    assert_eq!(hexes.local_num_elements(), 512);

    let tets = Forest::new_uniform(TetScheme, &[Shape::Tet; 6], 2).unwrap();
    assert_eq!(tets.local_num_elements(), 6 * 64);
    assert_eq!(tets.tree(5).element_offset(), 5 * 64);

    let pyramids = Forest::new_uniform(PyramidScheme, &[Shape::Pyramid], 3).unwrap();
    assert_eq!(pyramids.local_num_elements(), 808);
    assert!(pyramids.validate_invariants().is_ok());
}

#[test]
fn uniform_forest_elements_are_in_linear_id_order() {
    let forest = Forest::new_uniform(PyramidScheme, &[Shape::Pyramid], 2).unwrap();
    let scheme = forest.scheme();
    for (index, element) in forest.tree(0).elements().iter().enumerate() {
        assert_eq!(scheme.linear_id(element, 2), index as u64);
    }
}

#[test]
fn empty_coarse_mesh_gives_an_empty_forest() {
    let forest = Forest::new_uniform(QuadScheme::new(), &Vec::<Shape>::new(), 3).unwrap();
    assert_eq!(forest.num_trees(), 0);
    assert_eq!(forest.global_num_elements(), 0);
    let adapted = forest.adapt(AdaptOptions::default(), |_| Decision::Refine);
    assert_eq!(adapted.num_trees(), 0);
}

#[test]
fn builder_rejects_foreign_shapes() {
    let mut builder = ForestBuilder::new(PyramidScheme);
    builder
        .add_tree(Shape::Pyramid, vec![PyramidElement::root()])
        .add_tree(Shape::Tet, vec![PyramidElement::root()]);
    assert_eq!(builder.num_trees(), 2);
    assert_eq!(
        builder.commit().unwrap_err(),
        ForestError::ShapeMismatch {
            tree_id: 1,
            expected: Shape::Pyramid,
            found: Shape::Tet,
        }
    );
}

#[test]
fn builder_rejects_keys_outside_the_tree() {
    // A tetrahedron of type 3 is never a child of the root tetrahedron.
    let foreign = TetElement {
        anchor: [0, 0, 0],
        level: 1,
        tet_type: TetType::new(3).unwrap(),
    };
    let mut builder = ForestBuilder::new(TetScheme);
    builder.add_tree(Shape::Tet, vec![TetElement::root().child(0), foreign]);
    assert_eq!(
        builder.commit().unwrap_err(),
        ForestError::InvalidElement {
            tree_id: 0,
            index: 1
        }
    );
}

#[test]
fn builder_rejects_unsorted_elements() {
    let root = PyramidElement::root();
    let mut builder = ForestBuilder::new(PyramidScheme);
    builder.add_tree(Shape::Pyramid, vec![root.child(1), root.child(0)]);
    assert_eq!(
        builder.commit().unwrap_err(),
        ForestError::UnsortedElements {
            tree_id: 0,
            index: 1
        }
    );
}

#[test]
fn committed_forest_keeps_tree_data() {
    let root = PyramidElement::root();
    let elements: Vec<_> = (0..10).map(|i| root.child(i)).collect();
    let mut builder = ForestBuilder::new(PyramidScheme);
    builder.add_tree(Shape::Pyramid, elements.clone());
    let forest = builder.commit().unwrap();
    assert_eq!(forest.tree(0).elements(), elements.as_slice());
    assert_eq!(forest.tree(0).shape(), Shape::Pyramid);
    assert_eq!(forest.element(0, 8).map(|e| e.kind), Some(PyramidKind::Downward));
    assert_eq!(forest.element(0, 10), None);
    let centroid = forest.element_centroid(0, 0).unwrap();
    // Upward pyramid in the lower corner cube: base average plus apex.
    assert_eq!(centroid, [0.3, 0.3, 0.1]);
}

#[test]
fn packed_buffers_rebuild_the_same_forest() {
    let forest = Forest::new_uniform(PyramidScheme, &[Shape::Pyramid], 2)
        .unwrap()
        .adapt(AdaptOptions::default(), |query| {
            if query.element_id() % 3 == 0 {
                Decision::Refine
            } else {
                Decision::Keep
            }
        });
    let bytes = encode_elements(forest.tree(0).elements());
    assert_eq!(bytes.len(), forest.tree(0).num_elements() * PackedElement::SIZE);

    let decoded: Vec<PyramidElement> = decode_elements(&bytes).unwrap();
    let mut builder = ForestBuilder::new(PyramidScheme);
    builder.add_tree(Shape::Pyramid, decoded);
    let rebuilt = builder.commit().unwrap();
    assert_eq!(rebuilt.tree(0).elements(), forest.tree(0).elements());
}

#[test]
fn packed_keys_serialize_to_json() {
    let element = PyramidElement::root().child(8).child(3);
    let packed = element.pack();
    let json = serde_json::to_string(&packed).unwrap();
    let back: PackedElement = serde_json::from_str(&json).unwrap();
    assert_eq!(PyramidElement::unpack(&back), Ok(element));

    let direct = serde_json::to_value(element).unwrap();
    assert_eq!(direct["kind"], serde_json::json!(element.kind.code()));
    let parsed: PyramidElement = serde_json::from_value(direct).unwrap();
    assert_eq!(parsed, element);

    let bad = serde_json::json!({ "anchor": [0, 0, 0], "level": 0, "kind": 9 });
    assert!(serde_json::from_value::<PyramidElement>(bad).is_err());
}

#[test]
fn cube_keys_pack_with_zero_padding_axes() {
    let quad = QuadScheme::new().root().child(3).child(1);
    let packed = quad.pack();
    assert_eq!(packed.coords()[2], 0);
    assert_eq!(packed.type_tag, 0);
    assert_eq!(CubeElement::<2>::unpack(&packed), Ok(quad));
}
