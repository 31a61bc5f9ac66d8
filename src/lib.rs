//! This crate backs a course advising tool: it loads a catalog of courses from a CSV file
//! into an ordered index and answers lookups against it.
//!
//! ## Binary Search Tree
//!
//! The index is a Binary Search Tree keyed by course id. A BST is defined recursively using
//! the notion of a `Node`. Every `Node` stores one course and has up to two child `Node`s.
//! The invariants that make it a BST are:
//!
//! 1. For every `Node`, all the `Node`s in its left subtree have an id less than its own.
//! 2. For every `Node`, all the `Node`s in its right subtree have an id greater than or equal
//!    to its own. Equal ids only show up when the index is told to keep duplicates.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching takes `O(height)` (where `height` is the longest path from the root `Node` to a
//! leaf `Node`). This tree does no rebalancing, so a catalog inserted in sorted order gives a
//! tree whose height is the number of courses. Sorted iteration falls out of visiting the left
//! subtree, then the subtree root, then the right subtree.
//!
//! ## Layout
//!
//! - [`course`]: the record stored in the index.
//! - [`index`]: the tree itself.
//! - [`loader`]: turns CSV rows into courses.
//! - [`display`]: formats courses for the menu.
//! - [`menu`]: the interactive loop used by the `advising` binary.
//! - [`error`]: error types.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod course;
pub mod display;
pub mod error;
pub mod index;
pub mod loader;
pub mod menu;

#[cfg(test)]
mod test {
    pub(crate) mod quick;
}
