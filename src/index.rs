//! An unbalanced BST of [`Course`]s keyed by course id. Nodes own their children through
//! `Option<Box<_>>` slots and nothing points back up the tree.
//!
//! None of the operations recurse. A catalog that arrives already sorted (which real ones
//! usually do) turns the tree into a chain as long as the catalog, so every walk here uses a
//! loop or an explicit stack instead of the call stack.
//!
//! # Examples
//!
//! ```
//! use advising::course::Course;
//! use advising::index::CourseIndex;
//!
//! let mut index = CourseIndex::new();
//!
//! // Nothing in here yet.
//! assert!(index.search("CSCI101").is_none());
//!
//! index.insert(Course::new("CSCI201", "Data Structures")).unwrap();
//! index.insert(Course::new("CSCI101", "Introduction to Programming")).unwrap();
//! assert_eq!(index.search("CSCI101").map(|c| c.title()), Some("Introduction to Programming"));
//!
//! // Iteration is in ascending id order.
//! let ids: Vec<_> = index.iter().map(|c| c.id()).collect();
//! assert_eq!(ids, ["CSCI101", "CSCI201"]);
//!
//! // Removing a course hands it back.
//! let removed = index.remove("CSCI101");
//! assert_eq!(removed.map(|c| c.title().to_string()), Some("Introduction to Programming".to_string()));
//! assert!(index.search("CSCI101").is_none());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::mem;

use crate::course::Course;
use crate::error::IndexError;

/// What [`CourseIndex::insert`] does with a course whose id is already present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Store it anyway, to the right of the existing course. Both copies show up when
    /// iterating but [`CourseIndex::search`] only ever finds the first one inserted.
    #[default]
    Keep,
    /// Overwrite the existing course.
    Replace,
    /// Refuse it with [`IndexError::DuplicateKey`].
    Reject,
}

type Link = Option<Box<Node>>;

struct Node {
    course: Course,
    left: Link,
    right: Link,
}

impl Node {
    fn new_boxed(course: Course) -> Box<Self> {
        Box::new(Self {
            course,
            left: None,
            right: None,
        })
    }

    fn key(&self) -> &str {
        self.course.id()
    }
}

/// An ordered index of courses. Supports inserting, searching by id, removing by id, and
/// iterating in ascending id order.
///
/// For every node, ids in its left subtree compare less than its own id and ids in its right
/// subtree compare greater than or equal to it. Ids are compared as plain strings, so
/// `"CSCI100" < "CSCI20"`.
pub struct CourseIndex {
    root: Link,
    len: usize,
    policy: DuplicatePolicy,
}

impl Default for CourseIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CourseIndex {
    fn drop(&mut self) {
        self.clear();
    }
}

impl Clone for CourseIndex {
    fn clone(&self) -> Self {
        enum Visit<'a> {
            Enter(Option<&'a Node>),
            Build(&'a Node),
        }

        // Post-order: a node is rebuilt once both of its children are sitting on `built`.
        let mut work = vec![Visit::Enter(self.root.as_deref())];
        let mut built: Vec<Link> = Vec::new();
        while let Some(visit) = work.pop() {
            match visit {
                Visit::Enter(None) => built.push(None),
                Visit::Enter(Some(node)) => {
                    work.push(Visit::Build(node));
                    work.push(Visit::Enter(node.right.as_deref()));
                    work.push(Visit::Enter(node.left.as_deref()));
                }
                Visit::Build(node) => {
                    let right = built.pop().flatten();
                    let left = built.pop().flatten();
                    built.push(Some(Box::new(Node {
                        course: node.course.clone(),
                        left,
                        right,
                    })));
                }
            }
        }

        Self {
            root: built.pop().flatten(),
            len: self.len,
            policy: self.policy,
        }
    }
}

impl fmt::Debug for CourseIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl CourseIndex {
    /// Creates an empty index that keeps duplicate ids.
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::default())
    }

    /// Creates an empty index with the given duplicate policy.
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            root: None,
            len: 0,
            policy,
        }
    }

    /// The duplicate policy this index was created with.
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Number of courses stored, duplicates included.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no courses.
    pub fn is_empty(&self) -> bool {
        debug_assert_eq!(self.root.is_none(), self.len == 0);
        self.len == 0
    }

    /// Inserts a course. Only fails when the policy is [`DuplicatePolicy::Reject`] and the id
    /// is already present, in which case the index is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use advising::course::Course;
    /// use advising::error::IndexError;
    /// use advising::index::{CourseIndex, DuplicatePolicy};
    ///
    /// let mut index = CourseIndex::with_policy(DuplicatePolicy::Reject);
    ///
    /// assert!(index.insert(Course::new("MATH201", "Discrete Mathematics")).is_ok());
    /// assert_eq!(
    ///     index.insert(Course::new("MATH201", "Discrete Math")),
    ///     Err(IndexError::DuplicateKey("MATH201".to_string())),
    /// );
    /// assert_eq!(index.len(), 1);
    /// ```
    pub fn insert(&mut self, course: Course) -> Result<(), IndexError> {
        match self.policy {
            DuplicatePolicy::Keep => {}
            DuplicatePolicy::Replace => {
                if let Some(existing) = self.search_mut(course.id()) {
                    *existing = course;
                    return Ok(());
                }
            }
            DuplicatePolicy::Reject => {
                if self.search(course.id()).is_some() {
                    return Err(IndexError::DuplicateKey(course.id().to_string()));
                }
            }
        }

        self.attach(course);
        Ok(())
    }

    /// Finds the course with the given id. With duplicate ids this is the first one inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use advising::course::Course;
    /// use advising::index::CourseIndex;
    ///
    /// let mut index = CourseIndex::new();
    /// index.insert(Course::new("CSCI201", "Data Structures")).unwrap();
    ///
    /// assert_eq!(index.search("CSCI201").map(|c| c.id()), Some("CSCI201"));
    /// assert!(index.search("PHYS100").is_none());
    /// ```
    pub fn search(&self, key: &str) -> Option<&Course> {
        let mut link = &self.root;
        while let Some(node) = link {
            match key.cmp(node.key()) {
                Ordering::Less => link = &node.left,
                Ordering::Equal => return Some(&node.course),
                Ordering::Greater => link = &node.right,
            }
        }
        None
    }

    /// Removes the first course found with the given id and returns it. Removing an id that
    /// isn't present does nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use advising::course::Course;
    /// use advising::index::CourseIndex;
    ///
    /// let mut index = CourseIndex::new();
    /// index.insert(Course::new("CSCI101", "Introduction to Programming")).unwrap();
    ///
    /// assert!(index.remove("CSCI101").is_some());
    /// assert!(index.remove("CSCI101").is_none());
    /// assert!(index.is_empty());
    /// ```
    pub fn remove(&mut self, key: &str) -> Option<Course> {
        let mut link = &mut self.root;
        loop {
            match key.cmp(link.as_deref()?.key()) {
                Ordering::Less => link = &mut link.as_mut()?.left,
                Ordering::Equal => break,
                Ordering::Greater => link = &mut link.as_mut()?.right,
            }
        }

        let removed = Self::unlink(link)?;
        self.len -= 1;
        Some(removed)
    }

    /// Iterates over the courses in ascending id order.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.root, self.len)
    }

    /// Number of nodes on the longest path from the root down to a leaf. An empty index has a
    /// depth of 0 and a catalog inserted in sorted order has a depth equal to its length.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending: Vec<(&Node, usize)> =
            self.root.as_deref().map(|root| (root, 1)).into_iter().collect();
        while let Some((node, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            pending.extend(node.left.as_deref().map(|child| (child, depth + 1)));
            pending.extend(node.right.as_deref().map(|child| (child, depth + 1)));
        }
        deepest
    }

    /// Removes every course. Nodes are released one at a time from a work list so the
    /// depth of the tree doesn't matter.
    pub fn clear(&mut self) {
        let mut pending: Vec<Box<Node>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
        self.len = 0;
    }

    /// Places a course at the bottom of the tree. Equal ids go right.
    fn attach(&mut self, course: Course) {
        let mut link = &mut self.root;
        while let Some(node) = link {
            link = if course.id() < node.key() {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *link = Some(Node::new_boxed(course));
        self.len += 1;
    }

    fn search_mut(&mut self, key: &str) -> Option<&mut Course> {
        let mut link = &mut self.root;
        while let Some(node) = link {
            match key.cmp(node.key()) {
                Ordering::Less => link = &mut node.left,
                Ordering::Equal => return Some(&mut node.course),
                Ordering::Greater => link = &mut node.right,
            }
        }
        None
    }

    /// Removes the node in `link` and returns its course, keeping the rest of its subtree.
    fn unlink(link: &mut Link) -> Option<Course> {
        let node = link.as_mut()?;
        if node.left.is_some() && node.right.is_some() {
            // The in-order successor's course moves up into this node and the successor's
            // own node (which never has a left child) is spliced out.
            let successor = Self::take_min(&mut node.right)?;
            return Some(mem::replace(&mut node.course, successor.course));
        }

        // Zero children leave the slot empty. One child, on either side, moves up into it.
        let mut node = link.take()?;
        *link = node.left.take().or_else(|| node.right.take());
        Some(node.course)
    }

    /// Detaches the leftmost node of the subtree in `link`, putting its right child in its place.
    fn take_min(mut link: &mut Link) -> Option<Box<Node>> {
        while link.as_ref().map_or(false, |node| node.left.is_some()) {
            if let Some(node) = link {
                link = &mut node.left;
            }
        }

        let mut min = link.take()?;
        *link = min.right.take();
        Some(min)
    }
}

impl<'a> IntoIterator for &'a CourseIndex {
    type Item = &'a Course;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over a [`CourseIndex`]. Holds the path of nodes still waiting to be
/// yielded rather than recursing.
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    fn new(root: &'a Link, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_edge(root.as_deref());
        iter
    }

    fn push_left_edge(&mut self, mut node: Option<&'a Node>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Course;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_edge(node.right.as_deref());
        self.remaining -= 1;
        Some(&node.course)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
