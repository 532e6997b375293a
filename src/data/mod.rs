pub mod dataset;
pub mod shard;
pub mod skip;

pub use dataset::{Cursor, Dataset, InMemoryCursor, InMemoryDataset};
pub use shard::{interleaved, interleaved_buckets};
pub use skip::{Bucket, SkipCursor, SkipDataset};
