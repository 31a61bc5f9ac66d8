//! The record stored in a [`CourseIndex`][crate::index::CourseIndex].

use std::fmt;

use tracing::warn;

/// A course can list at most this many prerequisites.
pub const MAX_PREREQUISITES: usize = 2;

/// One course from the catalog: its identifier (the index key), its title and up to
/// [`MAX_PREREQUISITES`] prerequisite identifiers.
///
/// # Examples
///
/// ```
/// use advising::course::Course;
///
/// let course = Course::new("CSCI200", "Data Structures").with_prerequisite("CSCI101");
///
/// assert_eq!(course.id(), "CSCI200");
/// assert_eq!(course.prerequisites(), ["CSCI101"]);
/// assert_eq!(course.to_string(), "CSCI200: Data Structures");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Course {
    id: String,
    title: String,
    prerequisites: Vec<String>,
}

impl Course {
    /// Creates a course with no prerequisites.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            prerequisites: Vec::new(),
        }
    }

    /// Adds a prerequisite. Anything past [`MAX_PREREQUISITES`] is dropped.
    pub fn with_prerequisite(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        if self.prerequisites.len() < MAX_PREREQUISITES {
            self.prerequisites.push(id);
        } else {
            warn!(course = %self.id, prerequisite = %id, "ignoring extra prerequisite");
        }
        self
    }

    /// The course identifier. This is the key the index orders by.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The course title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Prerequisite identifiers in the order they were given.
    pub fn prerequisites(&self) -> &[String] {
        &self.prerequisites
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.title)
    }
}
