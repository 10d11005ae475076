use thiserror::Error;

/// Fatal conditions that abort an extraction run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("line {line}: back-reference to unknown notary '{name}'")]
    UnresolvedBackReference { line: usize, name: String },
    #[error("line {line}: notary number {found} does not follow {previous}")]
    EntityOrder {
        line: usize,
        previous: u32,
        found: u32,
    },
    #[error("chunk {position} starts with notary number {header_number}")]
    ChunkMisaligned { position: usize, header_number: u32 },
    #[error("chunk for notary {number} has no registry record")]
    UnknownEntity { number: u32 },
    #[error("found {chunks} chunks for {entities} registered notaries")]
    ChunkCountMismatch { chunks: usize, entities: usize },
}
