//! Forests of adaptive space-trees.
//!
//! A [`Forest`] owns one element array per tree, each in strict
//! space-filling-curve order, plus the aggregate element counts. Forests are
//! immutable once committed: they are produced by [`Forest::new_uniform`], by
//! [`ForestBuilder::commit`] from caller-supplied arrays, or by
//! [`Forest::adapt`] from a source forest.

pub mod adapt;
pub mod cmesh;

use itertools::Itertools;

use crate::debug_invariants::DebugInvariants;
use crate::element::{ElementScheme, Shape};
use crate::forest_error::ForestError;

pub use adapt::{AdaptOptions, AdaptQuery, Decision, adapt_forest};
pub use cmesh::CoarseMesh;

/// One tree of a forest: its root shape and its leaf elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tree<E> {
    shape: Shape,
    elements: Vec<E>,
    element_offset: u64,
}

impl<E> Tree<E> {
    /// Shape of the tree root.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Leaf elements in space-filling-curve order.
    #[inline]
    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    /// Number of leaf elements.
    #[inline]
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Forest-wide index of this tree's first element.
    #[inline]
    pub fn element_offset(&self) -> u64 {
        self.element_offset
    }

    /// The element at `index`, if any.
    #[inline]
    pub fn element(&self, index: usize) -> Option<&E> {
        self.elements.get(index)
    }
}

/// A committed forest over a single element scheme.
#[derive(Clone, Debug)]
pub struct Forest<S: ElementScheme> {
    scheme: S,
    trees: Vec<Tree<S::Element>>,
    max_level: u8,
    local_num_elements: u64,
    global_num_elements: u64,
}

impl<S: ElementScheme> Forest<S> {
    /// Refines every tree of `cmesh` uniformly to `level`.
    ///
    /// # Errors
    /// - [`ForestError::LevelOutOfRange`] if `level` exceeds the scheme's maximum.
    /// - [`ForestError::ShapeMismatch`] if a tree's shape differs from the scheme's.
    /// - [`ForestError::ElementCountOverflow`] if a tree's element count exceeds `usize`.
    pub fn new_uniform<C>(scheme: S, cmesh: &C, level: u8) -> Result<Self, ForestError>
    where
        C: CoarseMesh + ?Sized,
    {
        let max_level = scheme.max_level();
        if level > max_level {
            return Err(ForestError::LevelOutOfRange { level, max_level });
        }
        let root = scheme.root();
        let count = scheme.num_descendants(&root, level);
        let per_tree = usize::try_from(count)
            .map_err(|_| ForestError::ElementCountOverflow { count })?;

        let mut builder = ForestBuilder::new(scheme);
        for tree_id in 0..cmesh.num_trees() {
            let shape = cmesh.tree_shape(tree_id);
            builder.check_shape(tree_id, shape)?;
            let scheme = &builder.scheme;
            let mut elements = Vec::with_capacity(per_tree);
            let mut current = scheme.first_descendant(&root, level);
            elements.push(current);
            for _ in 1..per_tree {
                current = scheme.successor(&current, level);
                elements.push(current);
            }
            builder.add_tree(shape, elements);
        }
        let forest = builder.commit_unchecked();
        log::info!(
            "uniform forest: {} trees at level {level}, {} elements",
            forest.num_trees(),
            forest.local_num_elements
        );
        Ok(forest)
    }

    /// The element scheme shared by all trees.
    #[inline]
    pub fn scheme(&self) -> &S {
        &self.scheme
    }

    /// Deepest level elements of this forest may be refined to.
    #[inline]
    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    /// Number of trees.
    #[inline]
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Tree `tree_id`.
    ///
    /// # Panics
    /// Panics if `tree_id` is out of range.
    #[inline]
    pub fn tree(&self, tree_id: usize) -> &Tree<S::Element> {
        &self.trees[tree_id]
    }

    /// All trees in order.
    #[inline]
    pub fn trees(&self) -> &[Tree<S::Element>] {
        &self.trees
    }

    /// Element `index` of tree `tree_id`, if both exist.
    pub fn element(&self, tree_id: usize, index: usize) -> Option<&S::Element> {
        self.trees.get(tree_id).and_then(|tree| tree.element(index))
    }

    /// Number of elements held by this process.
    #[inline]
    pub fn local_num_elements(&self) -> u64 {
        self.local_num_elements
    }

    /// Number of elements across all processes. Forests are not partitioned,
    /// so this equals [`Self::local_num_elements`].
    #[inline]
    pub fn global_num_elements(&self) -> u64 {
        self.global_num_elements
    }

    /// Reference-space centroid of element `index` of tree `tree_id`.
    pub fn element_centroid(&self, tree_id: usize, index: usize) -> Option<[f64; 3]> {
        self.element(tree_id, index)
            .map(|element| self.scheme.centroid(element))
    }

    /// Iterates over `(tree_id, element)` pairs in forest order.
    pub fn iter_elements(&self) -> impl Iterator<Item = (usize, &S::Element)> + '_ {
        self.trees
            .iter()
            .enumerate()
            .flat_map(|(tree_id, tree)| tree.elements.iter().map(move |e| (tree_id, e)))
    }

    /// Builds a new forest by asking `callback` about every element or family.
    /// See [`adapt_forest`].
    pub fn adapt<F>(&self, options: AdaptOptions, callback: F) -> Forest<S>
    where
        S: Clone,
        F: FnMut(&AdaptQuery<'_, S>) -> Decision,
    {
        adapt_forest(self, options, callback)
    }
}

impl<S: ElementScheme> DebugInvariants for Forest<S> {
    fn validate_invariants(&self) -> Result<(), ForestError> {
        let scheme_max = self.scheme.max_level();
        if self.max_level > scheme_max {
            return Err(ForestError::LevelOutOfRange {
                level: self.max_level,
                max_level: scheme_max,
            });
        }
        let expected = self.scheme.shape();
        let mut offset = 0u64;
        for (tree_id, tree) in self.trees.iter().enumerate() {
            if tree.shape != expected {
                return Err(ForestError::ShapeMismatch {
                    tree_id,
                    expected,
                    found: tree.shape,
                });
            }
            if let Some(index) = tree
                .elements
                .iter()
                .position(|element| !self.scheme.is_valid(element))
            {
                return Err(ForestError::InvalidElement { tree_id, index });
            }
            if let Some(element) = tree
                .elements
                .iter()
                .find(|element| self.scheme.level(element) > self.max_level)
            {
                return Err(ForestError::LevelOutOfRange {
                    level: self.scheme.level(element),
                    max_level: self.max_level,
                });
            }
            if let Some(index) = tree.elements.iter().tuple_windows().position(|(a, b)| {
                self.scheme.compare(a, b).is_ge() || self.scheme.is_ancestor(a, b)
            }) {
                return Err(ForestError::UnsortedElements {
                    tree_id,
                    index: index + 1,
                });
            }
            debug_assert_eq!(tree.element_offset, offset);
            offset += tree.elements.len() as u64;
        }
        debug_assert_eq!(offset, self.local_num_elements);
        Ok(())
    }
}

/// Construction context of a forest.
///
/// Collects per-tree element arrays; [`Self::commit`] validates them and
/// computes offsets and counts.
#[derive(Clone, Debug)]
pub struct ForestBuilder<S: ElementScheme> {
    scheme: S,
    max_level: u8,
    trees: Vec<(Shape, Vec<S::Element>)>,
}

impl<S: ElementScheme> ForestBuilder<S> {
    /// Starts an empty forest whose elements may reach the scheme's maximum level.
    pub fn new(scheme: S) -> Self {
        let max_level = scheme.max_level();
        Self {
            scheme,
            max_level,
            trees: Vec::new(),
        }
    }

    /// Lowers (or restores) the deepest admissible level.
    pub fn with_max_level(mut self, max_level: u8) -> Self {
        self.max_level = max_level;
        self
    }

    /// The scheme the forest will use.
    #[inline]
    pub fn scheme(&self) -> &S {
        &self.scheme
    }

    /// Appends the next tree.
    pub fn add_tree(&mut self, shape: Shape, elements: Vec<S::Element>) -> &mut Self {
        self.trees.push((shape, elements));
        self
    }

    /// Number of trees added so far.
    #[inline]
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    fn check_shape(&self, tree_id: usize, found: Shape) -> Result<(), ForestError> {
        let expected = self.scheme.shape();
        if found == expected {
            Ok(())
        } else {
            Err(ForestError::ShapeMismatch {
                tree_id,
                expected,
                found,
            })
        }
    }

    fn assemble(self) -> Forest<S> {
        let mut offset = 0u64;
        let trees: Vec<_> = self
            .trees
            .into_iter()
            .map(|(shape, elements)| {
                let tree = Tree {
                    shape,
                    element_offset: offset,
                    elements,
                };
                offset += tree.elements.len() as u64;
                tree
            })
            .collect();
        Forest {
            scheme: self.scheme,
            trees,
            max_level: self.max_level,
            local_num_elements: offset,
            global_num_elements: offset,
        }
    }

    /// Validates the collected trees and freezes them into a forest.
    ///
    /// # Errors
    /// - [`ForestError::ShapeMismatch`] for a tree whose shape is not the scheme's.
    /// - [`ForestError::InvalidElement`] for a key that is not part of its tree.
    /// - [`ForestError::LevelOutOfRange`] for an element (or the builder's
    ///   maximum level) beyond the admissible level.
    /// - [`ForestError::UnsortedElements`] for elements out of curve order or
    ///   overlapping their predecessor.
    pub fn commit(self) -> Result<Forest<S>, ForestError> {
        let forest = self.assemble();
        forest.validate_invariants()?;
        log::debug!(
            "committed forest: {} trees, {} elements",
            forest.num_trees(),
            forest.local_num_elements
        );
        Ok(forest)
    }

    /// Freezes trees produced by the crate's own algorithms, checking
    /// invariants only when invariant checks are enabled.
    pub(crate) fn commit_unchecked(self) -> Forest<S> {
        let forest = self.assemble();
        forest.debug_assert_invariants();
        forest
    }
}
