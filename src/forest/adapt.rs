//! Adaptation driver: builds a new forest from a source forest and a
//! per-element decision callback.
//!
//! Each tree is scanned once in curve order. At every position the driver
//! loads a candidate: a complete family when the next `num_siblings`
//! elements are one, an incomplete family when the candidate's siblings at
//! a non-conforming boundary are only partly present, or a single element.
//! The callback's [`Decision`] is clamped by two policies (no refinement
//! beyond the maximum level, no coarsening of a lone element) and then
//! applied by appending to the new tree's array, which keeps it in order.
//!
//! In recursive mode refined children are re-examined through an explicit
//! worklist, and every kept or coarsened last sibling triggers a check of
//! the tail of the new array for a further coarsening.

use crate::element::ElementScheme;
use crate::forest::{Forest, ForestBuilder};

/// Integer code of [`Decision::Remove`] in the integer decision protocol.
pub const REMOVE: i32 = -2;

/// What to do with a candidate element or family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Replace the element by its children.
    Refine,
    /// Copy the element unchanged.
    Keep,
    /// Replace the family by its parent. Downgraded to `Keep` for single elements.
    Coarsen,
    /// Drop the element.
    Remove,
}

impl From<i32> for Decision {
    /// `> 0` refines, `0` keeps, [`REMOVE`] removes, any other negative value coarsens.
    fn from(value: i32) -> Self {
        match value {
            REMOVE => Decision::Remove,
            v if v > 0 => Decision::Refine,
            0 => Decision::Keep,
            _ => Decision::Coarsen,
        }
    }
}

impl From<Decision> for i32 {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Refine => 1,
            Decision::Keep => 0,
            Decision::Coarsen => -1,
            Decision::Remove => REMOVE,
        }
    }
}

/// Configuration of an adaptation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdaptOptions {
    /// Re-examine refined children and coarsened parents until the callback
    /// keeps them.
    pub recursive: bool,
    /// Refinement bound of this pass; `None` inherits the source forest's.
    pub max_level: Option<u8>,
}

impl AdaptOptions {
    /// One-shot adaptation bounded by the source forest's maximum level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables recursive adaptation.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Bounds refinement at `max_level`.
    pub fn max_level(mut self, max_level: u8) -> Self {
        self.max_level = Some(max_level);
        self
    }
}

/// Everything the decision callback may look at.
#[derive(Debug)]
pub struct AdaptQuery<'a, S: ElementScheme> {
    source: &'a Forest<S>,
    tree_id: usize,
    element_id: usize,
    elements: &'a [S::Element],
    family: bool,
}

impl<'a, S: ElementScheme> AdaptQuery<'a, S> {
    /// The forest being adapted.
    #[inline]
    pub fn source(&self) -> &'a Forest<S> {
        self.source
    }

    /// Tree of the candidate.
    #[inline]
    pub fn tree_id(&self) -> usize {
        self.tree_id
    }

    /// Index in the source tree of the element that led to this query.
    #[inline]
    pub fn element_id(&self) -> usize {
        self.element_id
    }

    /// The scheme of the source forest.
    #[inline]
    pub fn scheme(&self) -> &'a S {
        self.source.scheme()
    }

    /// The candidate: one element, or the members of a family in child order.
    #[inline]
    pub fn elements(&self) -> &'a [S::Element] {
        self.elements
    }

    /// The first candidate element.
    #[inline]
    pub fn element(&self) -> &'a S::Element {
        &self.elements[0]
    }

    /// Number of candidate elements.
    #[inline]
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// True if the candidate is a family that may be coarsened. Incomplete
    /// families hold fewer elements than the parent has children.
    #[inline]
    pub fn is_family(&self) -> bool {
        self.family
    }
}

/// Builds a new forest from `source`, asking `callback` about every element
/// or family.
///
/// The source is only read. Refinement never exceeds the pass's maximum
/// level (`options.max_level` or the source forest's); the result carries the
/// larger of that bound and the source's.
pub fn adapt_forest<S, F>(source: &Forest<S>, options: AdaptOptions, mut callback: F) -> Forest<S>
where
    S: ElementScheme + Clone,
    F: FnMut(&AdaptQuery<'_, S>) -> Decision,
{
    let scheme = source.scheme();
    let max_level = options
        .max_level
        .unwrap_or(source.max_level())
        .min(scheme.max_level());
    log::info!(
        "adapting forest: {} trees, {} elements, max level {max_level}, recursive: {}",
        source.num_trees(),
        source.local_num_elements(),
        options.recursive
    );

    let mut builder =
        ForestBuilder::new(scheme.clone()).with_max_level(max_level.max(source.max_level()));
    for (tree_id, tree) in source.trees().iter().enumerate() {
        let adapter = TreeAdapter {
            source,
            tree_id,
            from: tree.elements(),
            recursive: options.recursive,
            max_level,
            callback: &mut callback,
            to: Vec::with_capacity(tree.num_elements()),
            coarsen_floor: 0,
        };
        let elements = adapter.run();
        log::debug!(
            "tree {tree_id}: {} -> {} elements",
            tree.num_elements(),
            elements.len()
        );
        builder.add_tree(tree.shape(), elements);
    }

    let forest = builder.commit_unchecked();
    log::info!(
        "adapted forest: {} -> {} elements",
        source.local_num_elements(),
        forest.local_num_elements()
    );
    forest
}

/// Per-tree state of one adaptation pass.
struct TreeAdapter<'a, S: ElementScheme, F> {
    source: &'a Forest<S>,
    tree_id: usize,
    from: &'a [S::Element],
    recursive: bool,
    max_level: u8,
    callback: &'a mut F,
    to: Vec<S::Element>,
    /// Recursive coarsening never reaches below this index of `to`, so
    /// children produced by a recursive refinement stay.
    coarsen_floor: usize,
}

impl<'a, S, F> TreeAdapter<'a, S, F>
where
    S: ElementScheme,
    F: FnMut(&AdaptQuery<'_, S>) -> Decision,
{
    fn scheme(&self) -> &'a S {
        self.source.scheme()
    }

    fn run(mut self) -> Vec<S::Element> {
        let from = self.from;
        let scheme = self.scheme();
        let mut cursor = 0;
        while cursor < from.len() {
            let (len, family) = self.load_candidate(cursor);
            let candidate = &from[cursor..cursor + len];
            let element_id = cursor;
            match self.decide(element_id, candidate, family) {
                Decision::Refine => {
                    cursor += 1;
                    if self.recursive {
                        self.refine_recursive(&candidate[0], element_id);
                    } else {
                        self.to.extend(scheme.children(&candidate[0]));
                    }
                }
                Decision::Keep => {
                    cursor += 1;
                    self.to.push(candidate[0]);
                    if self.recursive {
                        self.coarsen_recursive(element_id);
                    }
                }
                Decision::Coarsen => {
                    cursor += len;
                    self.to.push(scheme.parent(&candidate[0]));
                    if self.recursive {
                        self.coarsen_recursive(element_id);
                    }
                }
                Decision::Remove => cursor += 1,
            }
        }
        self.to
    }

    /// Number of source elements starting at `cursor` that form the
    /// candidate, and whether they are a (possibly incomplete) family.
    fn load_candidate(&self, cursor: usize) -> (usize, bool) {
        let scheme = self.scheme();
        let from = self.from;
        let first = &from[cursor];
        let level = scheme.level(first);
        if level == 0 {
            return (1, false);
        }
        let num_siblings = scheme.num_siblings(first);
        if let Some(window) = from.get(cursor..cursor + num_siblings) {
            if scheme.is_family(window) {
                return (num_siblings, true);
            }
        }

        // Incomplete family: the siblings present are a contiguous run at the
        // candidate's level, and no other part of the parent's region is in
        // the tree, neither before the candidate nor refined further after it.
        let parent = scheme.parent(first);
        if cursor > 0 && scheme.is_ancestor(&parent, &from[cursor - 1]) {
            return (1, false);
        }
        let mut len = 1;
        for next in &from[cursor + 1..] {
            if len == num_siblings || !scheme.is_ancestor(&parent, next) {
                break;
            }
            if scheme.level(next) != level {
                return (1, false);
            }
            len += 1;
        }
        (len, true)
    }

    /// Asks the callback and applies the level and family policies.
    fn decide(&mut self, element_id: usize, elements: &[S::Element], family: bool) -> Decision {
        let query = AdaptQuery {
            source: self.source,
            tree_id: self.tree_id,
            element_id,
            elements,
            family,
        };
        let scheme = self.scheme();
        match (self.callback)(&query) {
            Decision::Refine if scheme.level(&elements[0]) >= self.max_level => {
                log::trace!(
                    "tree {}: refinement of {:?} clamped at level {}",
                    self.tree_id,
                    elements[0],
                    self.max_level
                );
                Decision::Keep
            }
            Decision::Coarsen if !family => {
                log::trace!(
                    "tree {}: coarsening of lone element {:?} ignored",
                    self.tree_id,
                    elements[0]
                );
                Decision::Keep
            }
            decision => decision,
        }
    }

    /// Refines `element` and keeps refining its descendants while the
    /// callback asks for it.
    fn refine_recursive(&mut self, element: &S::Element, element_id: usize) {
        let scheme = self.scheme();
        let mut worklist: Vec<S::Element> = scheme.children(element);
        worklist.reverse();
        while let Some(current) = worklist.pop() {
            match self.decide(element_id, std::slice::from_ref(&current), false) {
                Decision::Refine => worklist.extend(scheme.children(&current).into_iter().rev()),
                Decision::Remove => {}
                Decision::Keep | Decision::Coarsen => self.to.push(current),
            }
        }
        self.coarsen_floor = self.to.len();
    }

    /// Coarsens the tail of `to` while it ends in a complete family the
    /// callback wants coarsened.
    fn coarsen_recursive(&mut self, element_id: usize) {
        let scheme = self.scheme();
        while let Some(last) = self.to.last() {
            if scheme.level(last) == 0 {
                return;
            }
            let num_siblings = scheme.num_siblings(last);
            let child_id = scheme.child_id(last);
            if num_siblings < 2 || child_id + 1 != num_siblings {
                return;
            }
            let Some(start) = self.to.len().checked_sub(num_siblings) else {
                return;
            };
            if start < self.coarsen_floor || !scheme.is_family(&self.to[start..]) {
                return;
            }
            let family = self.to[start..].to_vec();
            if self.decide(element_id, &family, true) != Decision::Coarsen {
                return;
            }
            let parent = scheme.parent(&family[0]);
            self.to.truncate(start);
            self.to.push(parent);
        }
    }
}
