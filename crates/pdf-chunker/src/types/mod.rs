//! Record types flowing from the extractor to the chunker

pub mod chunk;
pub mod page;

pub use chunk::ChunkRecord;
pub use page::PageRecord;
