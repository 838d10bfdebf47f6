//! School scheduling
//!
//! This module owns the school's hour counter, class registry and student
//! roster, and resolves which class and which students belong to an hour.
//!
//! # Overview
//!
//! - **ClassDefinition**: a named class held at one hour
//! - **Student**: a participant enrolled in classes by name
//! - **School**: the scheduler aggregate
//! - **SchoolApi**: the capability trait tick callers depend on
//!
//! # Usage Example
//!
//! ```rust
//! use goat_school_simulator::school::*;
//!
//! let mut school = School::new("Kid Valley High");
//! school.add_class("History", 1).unwrap();
//! school.add_student("Billy", 5, ["History", "Biology"]);
//!
//! let hour = school.advance();
//! let class = school.resolve_current_class(hour).unwrap();
//! assert_eq!(class.name, "History");
//! assert_eq!(school.students_for(&class.name).len(), 1);
//! ```

pub mod class;
pub mod scheduler;
pub mod student;

// Re-export all public types for convenience
pub use class::ClassDefinition;
pub use scheduler::{School, SchoolApi};
pub use student::Student;
