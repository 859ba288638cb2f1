//! Word embeddings
//!
//! Loading pretrained GloVe vectors and scoring words by their
//! masculine/feminine association.

pub mod gender;
pub mod store;

pub use gender::{GenderScores, GloveDistances, ReferenceWords};
pub use store::{VectorDimensions, VectorSource, WordVectors};
