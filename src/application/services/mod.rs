mod assistant;
mod chat;
mod composer;
mod document;
mod rag;

pub use assistant::{Assistant, IndexReport, IndexStatus};
pub use chat::{Answer, ChatReply, ChatService};
pub use composer::ContextComposer;
pub use document::{ChunkedCorpus, DocumentService};
pub use rag::RagService;
