//! Request validation helpers. Each check returns `Some(message)` on
//! failure; handlers collect the messages into one Validation error.

use chrono::DateTime;

use crate::models::poll::{NewPoll, NewQuestion, PollDetailsForm};

/// Validate a required text field with a max length.
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.len() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate an optional text field with a max length (empty is OK).
pub fn validate_optional(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.len() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate an optional end date: when present it must parse as RFC 3339.
pub fn validate_end_date(value: Option<&str>) -> Option<String> {
    match value {
        Some(raw) if DateTime::parse_from_rfc3339(raw).is_err() => {
            Some("End date must be an RFC 3339 timestamp".to_string())
        }
        _ => None,
    }
}

/// Validate one question and its options; `label` names the question
/// in error messages.
pub fn validate_question(question: &NewQuestion, label: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if let Some(e) = validate_required(&question.text, &format!("{label} text"), 500) {
        errors.push(e);
    }
    if question.options.len() < 2 {
        errors.push(format!("{label} needs at least 2 options"));
    }
    for (idx, option) in question.options.iter().enumerate() {
        if let Some(e) = validate_required(option, &format!("{label} option {}", idx + 1), 200) {
            errors.push(e);
        }
    }
    errors
}

/// Validate a poll creation request.
pub fn validate_new_poll(input: &NewPoll) -> Vec<String> {
    let mut errors = Vec::new();
    if let Some(e) = validate_required(&input.title, "Title", 200) {
        errors.push(e);
    }
    if let Some(e) = validate_optional(&input.description, "Description", 2000) {
        errors.push(e);
    }
    if let Some(e) = validate_end_date(input.end_date.as_deref()) {
        errors.push(e);
    }
    if input.questions.is_empty() {
        errors.push("At least one question is required".to_string());
    }
    for (idx, question) in input.questions.iter().enumerate() {
        errors.extend(validate_question(question, &format!("Question {}", idx + 1)));
    }
    errors
}

/// Validate a poll details update.
pub fn validate_poll_details(form: &PollDetailsForm) -> Vec<String> {
    let mut errors = Vec::new();
    if let Some(e) = validate_required(&form.title, "Title", 200) {
        errors.push(e);
    }
    if let Some(e) = validate_optional(&form.description, "Description", 2000) {
        errors.push(e);
    }
    if let Some(e) = validate_end_date(form.end_date.as_deref()) {
        errors.push(e);
    }
    errors
}
