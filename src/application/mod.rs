//! Application layer - Use cases and orchestration.
//!
//! Services here depend on domain ports (traits) rather than concrete
//! adapters. [`Assistant`] ties chunking, indexing, retrieval and the
//! language model together behind the operations the API and CLI expose.

pub mod services;

pub use services::{
    Answer, Assistant, ChatReply, ChatService, ContextComposer, DocumentService, IndexReport,
    IndexStatus, RagService,
};
