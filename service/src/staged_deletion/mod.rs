//! Permanent deletion of staged photos.
//!
//! The only irreversible operation in the review flow. The staging store is
//! only changed after the photo catalog has answered, so a failed batch can be
//! retried as is.

pub mod context;
pub mod service;
pub mod steps;
