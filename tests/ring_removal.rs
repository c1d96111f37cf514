//! Refine a band around a ring, punch out its inside, then coarsen
//! whatever families remain, including the ones left incomplete by removal.

use amr_forest::prelude::*;

const MIDPOINT: [f64; 3] = [0.5, 0.5, 0.0];
const RADIUS: f64 = 0.3;
const RING_WIDTH: f64 = 0.1;

fn distance(query: &AdaptQuery<'_, QuadScheme>) -> f64 {
    let centroid = query.scheme().centroid(query.element());
    centroid
        .iter()
        .zip(MIDPOINT)
        .map(|(c, m)| (c - m).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn area(forest: &Forest<QuadScheme>) -> f64 {
    forest
        .iter_elements()
        .map(|(_, e)| 0.25f64.powi(i32::from(forest.scheme().level(e))))
        .sum()
}

#[test]
fn ring_scenario() {
    let uniform = Forest::new_uniform(QuadScheme::new(), &[Shape::Quad], 3).unwrap();
    assert_eq!(uniform.local_num_elements(), 64);

    let mut close = 0;
    let refined = uniform.adapt(AdaptOptions::default(), |query| {
        if distance(query) < RADIUS + RING_WIDTH {
            close += 1;
            Decision::Refine
        } else {
            Decision::Keep
        }
    });
    assert!(close > 0 && close < 64);
    assert_eq!(refined.local_num_elements(), 64 + 3 * close);
    assert!((area(&refined) - 1.0).abs() < 1e-12);

    let removed = refined.adapt(AdaptOptions::default(), |query| {
        if distance(query) < RADIUS {
            Decision::from(amr_forest::forest::adapt::REMOVE)
        } else {
            Decision::Keep
        }
    });
    assert!(removed.local_num_elements() < refined.local_num_elements());
    for index in 0..removed.tree(0).num_elements() {
        let centroid = removed.element_centroid(0, index).unwrap();
        let d = ((centroid[0] - 0.5).powi(2) + (centroid[1] - 0.5).powi(2)).sqrt();
        assert!(d >= RADIUS);
    }

    let mut incomplete = 0;
    let coarsened = removed.adapt(AdaptOptions::default(), |query| {
        if query.num_elements() > 1 {
            if query.num_elements() < 4 {
                incomplete += 1;
            }
            Decision::Coarsen
        } else {
            Decision::Keep
        }
    });
    assert!(incomplete > 0);
    assert!(coarsened.local_num_elements() < removed.local_num_elements());
    assert!(coarsened.validate_invariants().is_ok());
    // Coarsening incomplete families reclaims part of the removed area, and
    // every surviving element lies inside some coarsened element.
    assert!(area(&coarsened) > area(&removed));
    let scheme = coarsened.scheme();
    for (_, element) in removed.iter_elements() {
        assert!(
            coarsened
                .iter_elements()
                .any(|(_, coarse)| scheme.is_ancestor(coarse, element)),
            "{element:?} is not covered"
        );
    }
}
