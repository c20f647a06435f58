//! Text splitting for embedding-sized chunks.
//!
//! The splitter turns one document's extracted text into an ordered sequence
//! of overlapping character windows. It is a pure function of its input: no
//! configuration is read here and no failure mode exists.

mod recursive;

pub use recursive::RecursiveSplitter;
