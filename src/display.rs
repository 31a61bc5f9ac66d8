//! Text shown to the person using the advising menu.

use crate::course::Course;
use crate::index::CourseIndex;

/// `"<id>: <title>"`, followed by a `Prerequisites:` line when the course has any.
///
/// # Examples
///
/// ```
/// use advising::course::Course;
/// use advising::display::course_details;
///
/// let course = Course::new("CSCI300", "Introduction to Algorithms")
///     .with_prerequisite("CSCI200")
///     .with_prerequisite("MATH201");
///
/// assert_eq!(
///     course_details(&course),
///     "CSCI300: Introduction to Algorithms\nPrerequisites: CSCI200, MATH201",
/// );
/// ```
pub fn course_details(course: &Course) -> String {
    let mut details = course.to_string();
    if !course.prerequisites().is_empty() {
        details.push_str("\nPrerequisites: ");
        details.push_str(&course.prerequisites().join(", "));
    }
    details
}

/// One `"<id>: <title>"` line per course in ascending id order.
pub fn course_list(index: &CourseIndex) -> String {
    index
        .iter()
        .map(Course::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Message for a course id that isn't in the index.
pub fn not_found(key: &str) -> String {
    format!("Course Number {key} not found.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_without_prerequisites() {
        let course = Course::new("CSCI100", "Introduction to Computer Science");

        assert_eq!(
            course_details(&course),
            "CSCI100: Introduction to Computer Science"
        );
    }

    #[test]
    fn details_with_one_prerequisite() {
        let course = Course::new("CSCI200", "Data Structures").with_prerequisite("CSCI101");

        assert_eq!(
            course_details(&course),
            "CSCI200: Data Structures\nPrerequisites: CSCI101"
        );
    }

    #[test]
    fn list_is_ordered() {
        let mut index = CourseIndex::new();
        index.insert(Course::new("MATH201", "Discrete Mathematics")).unwrap();
        index
            .insert(Course::new("CSCI200", "Data Structures").with_prerequisite("CSCI101"))
            .unwrap();

        assert_eq!(
            course_list(&index),
            "CSCI200: Data Structures\nMATH201: Discrete Mathematics"
        );
        assert_eq!(course_list(&CourseIndex::new()), "");
    }

    #[test]
    fn not_found_message() {
        assert_eq!(not_found("PHYS100"), "Course Number PHYS100 not found.");
    }
}
