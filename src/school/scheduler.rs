//! The school scheduler
//!
//! This module contains the [`School`] aggregate and the [`SchoolApi`]
//! capability trait through which tick callers drive it.

use crate::school::{ClassDefinition, Student};
use crate::simulation::error::{SchoolError, SchoolResult};
use crate::types::{SchoolConfig, SlotCounter, TimeSlot};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument};

/// Scheduling operations a tick caller needs from a school
pub trait SchoolApi: Send + Sync {
    /// Name of the school
    fn name(&self) -> &str;

    /// Move to the next hour and return it
    fn advance(&self) -> TimeSlot;

    /// The current hour, or `None` before the first advance
    fn current_slot(&self) -> Option<TimeSlot>;

    /// Find the class held at `slot`
    fn resolve_current_class(&self, slot: TimeSlot) -> SchoolResult<ClassDefinition>;

    /// Students enrolled in the named class, in roster order
    fn students_for(&self, class_name: &str) -> Vec<Student>;
}

/// A school with its hour counter, class registry and student roster
///
/// Classes and students are registered through `&mut self` during setup.
/// Once the school is shared, only the hour counter changes, and every
/// advance goes through its mutex.
#[derive(Debug)]
pub struct School {
    name: String,
    clock: Mutex<SlotCounter>,
    max_slot: u32,
    allow_shared_start_slots: bool,
    classes: Vec<ClassDefinition>,
    students: Vec<Student>,
}

impl School {
    /// Create an empty school with the default eight-hour day
    pub fn new(name: impl Into<String>) -> Self {
        let clock = SlotCounter::default();
        Self {
            name: name.into(),
            max_slot: clock.max_slot(),
            clock: Mutex::new(clock),
            allow_shared_start_slots: false,
            classes: Vec::new(),
            students: Vec::new(),
        }
    }

    /// Create an empty school with a day of `max_slot` hours
    pub fn with_max_slot(name: impl Into<String>, max_slot: u32) -> SchoolResult<Self> {
        let clock = SlotCounter::new(max_slot)?;
        Ok(Self {
            name: name.into(),
            max_slot,
            clock: Mutex::new(clock),
            allow_shared_start_slots: false,
            classes: Vec::new(),
            students: Vec::new(),
        })
    }

    /// Let several classes share a start hour; the first registered wins
    pub fn allowing_shared_start_slots(mut self) -> Self {
        self.allow_shared_start_slots = true;
        self
    }

    /// Build a school from configuration
    #[instrument(skip(config), fields(school = %config.school_name))]
    pub fn from_config(config: &SchoolConfig) -> SchoolResult<Self> {
        config.validate()?;

        let mut school = Self::with_max_slot(config.school_name.clone(), config.max_slot)?;
        school.allow_shared_start_slots = config.allow_shared_start_slots;

        for class in &config.classes {
            school.add_class(class.name.clone(), class.start_slot)?;
        }
        for student in &config.students {
            school.add_student(student.name.clone(), student.age, student.classes.clone());
        }

        info!(
            "School '{}' set up with {} classes and {} students over {} hours",
            school.name,
            school.classes.len(),
            school.students.len(),
            school.max_slot
        );
        Ok(school)
    }

    /// Register a class held at `start_slot`
    pub fn add_class(&mut self, name: impl Into<String>, start_slot: u32) -> SchoolResult<()> {
        let name = name.into();
        let slot = TimeSlot::within(start_slot, self.max_slot)?;

        if self.classes.iter().any(|c| c.name == name) {
            return Err(SchoolError::DuplicateClass(name));
        }

        if !self.allow_shared_start_slots {
            if let Some(existing) = self.classes.iter().find(|c| c.is_held_at(slot)) {
                return Err(SchoolError::DuplicateStartSlot {
                    class: name,
                    existing: existing.name.clone(),
                    slot,
                });
            }
        }

        debug!("Registered class {} at hour {}", name, slot);
        self.classes.push(ClassDefinition::new(name, slot));
        Ok(())
    }

    /// Register a student enrolled in the named classes
    pub fn add_student<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        age: u32,
        classes: impl IntoIterator<Item = S>,
    ) {
        let student = Student::new(name, age, classes);
        debug!("Registered student {} in {:?}", student.name, student.enrolled_classes);
        self.students.push(student);
    }

    /// Number of hours in the school day
    pub fn max_slot(&self) -> u32 {
        self.max_slot
    }

    /// All registered classes in registration order
    pub fn classes(&self) -> &[ClassDefinition] {
        &self.classes
    }

    /// All registered students in registration order
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    fn lock_clock(&self) -> MutexGuard<'_, SlotCounter> {
        // The counter is valid after every operation, so a poisoned lock is still usable
        self.clock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SchoolApi for School {
    fn name(&self) -> &str {
        &self.name
    }

    fn advance(&self) -> TimeSlot {
        let slot = self.lock_clock().advance();
        debug!("School '{}' advanced to hour {}", self.name, slot);
        slot
    }

    fn current_slot(&self) -> Option<TimeSlot> {
        self.lock_clock().current()
    }

    fn resolve_current_class(&self, slot: TimeSlot) -> SchoolResult<ClassDefinition> {
        self.classes
            .iter()
            .find(|class| class.is_held_at(slot))
            .cloned()
            .ok_or(SchoolError::ClassNotFound { slot })
    }

    fn students_for(&self, class_name: &str) -> Vec<Student> {
        self.students.iter().filter(|s| s.is_enrolled_in(class_name)).cloned().collect()
    }
}
