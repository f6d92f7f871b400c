use crate::error::{ApiError, FieldError};
use crate::models::{LoginRequest, PlacePayload, RegisterRequest, ReviewPayload};

/// Rule
///
/// One declarative field constraint: the field it guards, the message reported
/// when it fails, and the predicate that must hold for a valid payload.
/// Payloads keep every field optional at the type level so that "missing" is a
/// rule failure (400 with a field message) rather than a deserialization error.
pub struct Rule<T> {
    pub field: &'static str,
    pub message: &'static str,
    pub check: fn(&T) -> bool,
}

/// validate
///
/// Evaluates a rule table against a payload, collecting every failed rule into
/// field-level errors. Handlers call this before touching the store, so no
/// invalid payload ever reaches a write.
pub fn validate<T>(payload: &T, rules: &[Rule<T>]) -> Result<(), ApiError> {
    let errors: Vec<FieldError> = rules
        .iter()
        .filter(|rule| !(rule.check)(payload))
        .map(|rule| FieldError {
            field: rule.field,
            message: rule.message,
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

// --- Predicate helpers ---

fn present_non_empty(value: &Option<String>) -> bool {
    value
        .as_deref()
        .map(|s| !s.trim().is_empty())
        .unwrap_or(false)
}

fn within_len(value: &Option<String>, max: usize) -> bool {
    // Length limits only apply when the value is present; requiredness is a
    // separate rule so each failure gets its own message.
    value.as_deref().map(|s| s.trim().len() <= max).unwrap_or(true)
}

fn in_range(value: &Option<f64>, min: f64, max: f64) -> bool {
    value
        .map(|v| v.is_finite() && v >= min && v <= max)
        .unwrap_or(false)
}

/// Shape check for email addresses: local and domain part around a single '@',
/// with a dot somewhere in the address.
fn is_email(value: &Option<String>) -> bool {
    let Some(email) = value.as_deref() else {
        return false;
    };
    if !email.contains('@') || !email.contains('.') {
        return false;
    }
    let parts: Vec<&str> = email.split('@').collect();
    parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty()
}

// --- Rule tables ---

/// Constraints for place create/update, mirrored from the place schema:
/// required title/image.src/summary, coordinates within the valid degree
/// ranges, and the documented length caps.
pub const PLACE_RULES: &[Rule<PlacePayload>] = &[
    Rule {
        field: "title",
        message: "Title is required",
        check: |p| present_non_empty(&p.title),
    },
    Rule {
        field: "title",
        message: "Title cannot be more than 100 characters",
        check: |p| within_len(&p.title, 100),
    },
    Rule {
        field: "image.src",
        message: "Image source is required",
        check: |p| {
            p.image
                .as_ref()
                .map(|img| present_non_empty(&img.src))
                .unwrap_or(false)
        },
    },
    Rule {
        field: "longitude",
        message: "Longitude must be between -180 and 180",
        check: |p| in_range(&p.longitude, -180.0, 180.0),
    },
    Rule {
        field: "latitude",
        message: "Latitude must be between -90 and 90",
        check: |p| in_range(&p.latitude, -90.0, 90.0),
    },
    Rule {
        field: "summary",
        message: "Summary is required",
        check: |p| present_non_empty(&p.summary),
    },
    Rule {
        field: "summary",
        message: "Summary cannot be more than 1000 characters",
        check: |p| within_len(&p.summary, 1000),
    },
];

/// Constraints for review create/update: integral 1-5 rating and a required
/// comment capped at 500 characters.
pub const REVIEW_RULES: &[Rule<ReviewPayload>] = &[
    Rule {
        field: "rating",
        message: "Rating must be between 1 and 5",
        check: |p| {
            p.rating
                .map(|r| r.is_finite() && r.fract() == 0.0 && (1.0..=5.0).contains(&r))
                .unwrap_or(false)
        },
    },
    Rule {
        field: "comment",
        message: "Comment is required",
        check: |p| present_non_empty(&p.comment),
    },
    Rule {
        field: "comment",
        message: "Comment cannot be more than 500 characters",
        check: |p| within_len(&p.comment, 500),
    },
];

/// Constraints for registration: name, well-formed email, password length.
pub const REGISTER_RULES: &[Rule<RegisterRequest>] = &[
    Rule {
        field: "name",
        message: "Name is required",
        check: |p| present_non_empty(&p.name),
    },
    Rule {
        field: "email",
        message: "Please provide a valid email",
        check: |p| is_email(&p.email),
    },
    Rule {
        field: "password",
        message: "Password must be at least 6 characters",
        check: |p| p.password.as_deref().map(|s| s.len() >= 6).unwrap_or(false),
    },
];

/// Constraints for login: well-formed email, non-empty password.
pub const LOGIN_RULES: &[Rule<LoginRequest>] = &[
    Rule {
        field: "email",
        message: "Please provide a valid email",
        check: |p| is_email(&p.email),
    },
    Rule {
        field: "password",
        message: "Password is required",
        check: |p| present_non_empty(&p.password),
    },
];
