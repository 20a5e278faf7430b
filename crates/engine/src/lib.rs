pub mod enricher;
pub mod insight;
pub mod normalizer;
pub mod pipeline;
