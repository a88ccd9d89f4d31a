mod directory;
mod in_memory;

pub use directory::DirectoryDocumentSource;
pub use in_memory::InMemoryDocumentSource;
