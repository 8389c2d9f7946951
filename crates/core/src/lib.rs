//! Core library: classification, duplicate detection, undo bookkeeping, and
//! filename search.

pub mod classifier;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod organizer;
pub mod rules;
pub mod search;
pub mod tokenize;
