//! Input rules for technology records.

use chrono::{Datelike, NaiveDate};

use crate::error::ValidationError;
use crate::models::{NewTechnology, TechnologyUpdate};

pub const TITLE_MIN_CHARS: usize = 2;
pub const DESCRIPTION_MIN_CHARS: usize = 10;
pub const NOTES_MAX_CHARS: usize = 1000;
pub const LATEST_DEADLINE_YEAR: i32 = 2030;

pub fn validate_new(input: &NewTechnology, today: NaiveDate) -> Result<(), ValidationError> {
    let mut errors = ValidationError::new();

    check_title(&mut errors, &input.title);
    check_description(&mut errors, &input.description);
    if let Some(hours) = input.estimated_hours {
        check_hours(&mut errors, hours);
    }
    if let Some(deadline) = input.deadline {
        if let Err(message) = check_deadline(deadline, today) {
            errors.add("deadline", message);
        }
    }
    if let Some(notes) = &input.notes {
        if let Err(e) = validate_notes(notes) {
            for (field, message) in e.fields() {
                errors.add(field.clone(), message.clone());
            }
        }
    }

    errors.into_result()
}

/// Only the fields present in the update are checked.
pub fn validate_update(input: &TechnologyUpdate) -> Result<(), ValidationError> {
    let mut errors = ValidationError::new();

    if let Some(title) = &input.title {
        check_title(&mut errors, title);
    }
    if let Some(description) = &input.description {
        check_description(&mut errors, description);
    }
    if let Some(hours) = input.estimated_hours {
        check_hours(&mut errors, hours);
    }

    errors.into_result()
}

/// Deadlines may not lie before `today` nor after the end of 2030.
pub fn check_deadline(deadline: NaiveDate, today: NaiveDate) -> Result<(), &'static str> {
    if deadline < today {
        Err("cannot be in the past")
    } else if deadline.year() > LATEST_DEADLINE_YEAR {
        Err("must not be later than 2030")
    } else {
        Ok(())
    }
}

/// Notes are capped by callers before they reach the repository.
pub fn validate_notes(notes: &str) -> Result<(), ValidationError> {
    if notes.chars().count() > NOTES_MAX_CHARS {
        return Err(ValidationError::single("notes", "maximum 1000 characters"));
    }
    Ok(())
}

fn check_title(errors: &mut ValidationError, title: &str) {
    let title = title.trim();
    if title.is_empty() {
        errors.add("title", "required");
    } else if title.chars().count() < TITLE_MIN_CHARS {
        errors.add("title", "minimum 2 characters");
    }
}

fn check_description(errors: &mut ValidationError, description: &str) {
    let description = description.trim();
    if description.is_empty() {
        errors.add("description", "required");
    } else if description.chars().count() < DESCRIPTION_MIN_CHARS {
        errors.add("description", "minimum 10 characters");
    }
}

fn check_hours(errors: &mut ValidationError, hours: i64) {
    if hours < 1 {
        errors.add("estimatedHours", "minimum 1 hour");
    } else if u32::try_from(hours).is_err() {
        errors.add("estimatedHours", "too large");
    }
}
