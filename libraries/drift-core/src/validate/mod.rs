//! Name validation for the create / rename / quick-add dialogs
//!
//! Each validator holds the current proposed value plus the set of existing
//! playlist names, and recomputes its message whenever either changes. The
//! storage layer feeds the name set (one-shot via `playlist_names`, or live via
//! the `watch_names` subscription); the UI binds `message()` to the input field
//! and gates its confirm action on `is_valid()`.

use thiserror::Error;

/// Whether the user has edited the proposed name yet
///
/// A blank default must not show an error before the user has typed anything,
/// so the blank-name rule only fires once this reaches `Touched`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TouchState {
    /// The field still holds its untouched default
    #[default]
    Untouched,
    /// The field has been edited at least once
    Touched,
}

/// Validation failure for a single proposed name
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameError {
    /// The proposed name is blank
    #[error("The name must not be blank")]
    Blank,
    /// The proposed name collides with an existing playlist
    #[error("A playlist with this name already exists")]
    Duplicate,
}

/// Validation failure for a batch of proposed names
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchNameError {
    /// At least one proposed name is blank
    #[error("Every entry needs a name")]
    Blank,
    /// Two entries in the batch share a name
    #[error("\"{0}\" is used more than once")]
    DuplicateProposed(String),
    /// An entry collides with an existing playlist
    #[error("A playlist named \"{0}\" already exists")]
    AlreadyExists(String),
}

fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

/// Validator for a brand-new playlist name
#[derive(Debug, Clone, Default)]
pub struct NewNameValidator {
    value: String,
    touch: TouchState,
    existing: Vec<String>,
}

impl NewNameValidator {
    /// Create a validator over the current set of playlist names
    pub fn new(existing: Vec<String>) -> Self {
        Self {
            value: String::new(),
            touch: TouchState::Untouched,
            existing,
        }
    }

    /// Current proposed value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the field has been edited yet
    pub fn touch_state(&self) -> TouchState {
        self.touch
    }

    /// Update the proposed value; marks the field as touched
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.touch = TouchState::Touched;
    }

    /// Replace the set of existing names (live name-set updates)
    pub fn set_existing_names(&mut self, existing: Vec<String>) {
        self.existing = existing;
    }

    /// Current validation message for display, if any
    pub fn message(&self) -> Option<NameError> {
        if self.existing.iter().any(|n| n == &self.value) {
            return Some(NameError::Duplicate);
        }
        if is_blank(&self.value) && self.touch == TouchState::Touched {
            return Some(NameError::Blank);
        }
        None
    }

    /// Whether the confirm action may proceed
    ///
    /// Unlike `message()`, a blank untouched default still blocks the confirm.
    pub fn is_valid(&self) -> bool {
        !is_blank(&self.value) && !self.existing.iter().any(|n| n == &self.value)
    }
}

/// Validator for renaming an existing playlist
///
/// Identical rules to [`NewNameValidator`], except the original name of the
/// entity being renamed is always accepted (a no-op rename).
#[derive(Debug, Clone)]
pub struct RenameValidator {
    original: String,
    inner: NewNameValidator,
}

impl RenameValidator {
    /// Create a validator for renaming `original` over the current name set
    pub fn new(original: impl Into<String>, existing: Vec<String>) -> Self {
        let original = original.into();
        let mut inner = NewNameValidator::new(existing);
        inner.value = original.clone();
        Self { original, inner }
    }

    /// Current proposed value
    pub fn value(&self) -> &str {
        self.inner.value()
    }

    /// Update the proposed value; marks the field as touched
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.inner.set_value(value);
    }

    /// Replace the set of existing names
    pub fn set_existing_names(&mut self, existing: Vec<String>) {
        self.inner.set_existing_names(existing);
    }

    /// Current validation message for display, if any
    pub fn message(&self) -> Option<NameError> {
        if self.inner.value() == self.original {
            return None;
        }
        self.inner.message()
    }

    /// Whether the confirm action may proceed
    pub fn is_valid(&self) -> bool {
        self.inner.value() == self.original || self.inner.is_valid()
    }
}

/// Validator for a whole batch of proposed names (multi-file quick add)
#[derive(Debug, Clone, Default)]
pub struct BatchNameValidator {
    existing: Vec<String>,
}

impl BatchNameValidator {
    /// Create a validator over the current set of playlist names
    pub fn new(existing: Vec<String>) -> Self {
        Self { existing }
    }

    /// Replace the set of existing names
    pub fn set_existing_names(&mut self, existing: Vec<String>) {
        self.existing = existing;
    }

    /// Validate the whole batch; the first failure wins
    pub fn validate(&self, proposed: &[String]) -> Option<BatchNameError> {
        if proposed.iter().any(|n| is_blank(n)) {
            return Some(BatchNameError::Blank);
        }
        for (i, name) in proposed.iter().enumerate() {
            if proposed[..i].contains(name) {
                return Some(BatchNameError::DuplicateProposed(name.clone()));
            }
            if self.existing.contains(name) {
                return Some(BatchNameError::AlreadyExists(name.clone()));
            }
        }
        None
    }

    /// Whether the whole batch may be confirmed
    pub fn is_valid(&self, proposed: &[String]) -> bool {
        self.validate(proposed).is_none()
    }
}
