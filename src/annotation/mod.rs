mod composer;

pub use composer::{compose, is_already_annotated};
