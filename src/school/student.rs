//! Students and their enrollments

use serde::{Deserialize, Serialize};

/// A student enrolled in classes by name
///
/// Enrollment is a weak reference: the names are matched against the class
/// registry when a class is resolved, and a name with no registered class
/// simply never matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Student name
    #[serde(rename = "Name")]
    pub name: String,
    /// Student age
    #[serde(rename = "Age")]
    pub age: u32,
    /// Names of the classes the student attends, in enrollment order
    #[serde(rename = "Classes")]
    pub enrolled_classes: Vec<String>,
}

impl Student {
    /// Create a new student
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        age: u32,
        classes: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            age,
            enrolled_classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether the student is enrolled in the named class
    pub fn is_enrolled_in(&self, class_name: &str) -> bool {
        self.enrolled_classes.iter().any(|c| c == class_name)
    }
}
