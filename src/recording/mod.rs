pub mod aligner;
pub mod buffer;

pub use aligner::{AlignerStats, StreamAligner};
pub use buffer::{Rows, Sample, SampleBuffer, PRESSURE_PLACEHOLDER};
