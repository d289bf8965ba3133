pub mod catalog;
pub mod corpus;
pub mod embeddings;
pub mod pinecone;
pub mod store;

pub use catalog::{CatalogHit, CatalogSearch, TOP_K};
pub use corpus::DirectoryCorpus;
pub use embeddings::ClipEmbeddings;
pub use pinecone::{IndexDescription, IndexSpec, PineconeControl, PineconeIndex};
pub use store::InMemoryIndex;
