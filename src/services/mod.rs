// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - ingestion and clustering logic.

pub mod clustering;
pub mod colocation;
pub mod dataset;
pub mod labels;
pub mod segmenter;
pub mod trajectory;

pub use colocation::CoLocationDetector;
pub use dataset::{Dataset, DatasetReader, IngestStats};
pub use labels::LabelIndex;
pub use segmenter::{ActivitySegmenter, IdAllocator, Segment};
pub use trajectory::{PointStreamReader, Trajectory};
