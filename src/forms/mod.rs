//! Editable document models backing multi-section forms.

pub mod resume;
