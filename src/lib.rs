//! Retrieval-augmented question answering over a private document corpus.
//!
//! Documents are split into overlapping chunks, embedded, and published as an
//! immutable index snapshot. Queries and chats retrieve from whichever snapshot
//! is current and optionally ground a language model on the results.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
