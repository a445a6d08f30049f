pub mod frequency_buckets;
pub mod slot_arena;

pub use frequency_buckets::{BucketIter, DEFAULT_BUCKET_PREALLOC, FrequencyBuckets};
pub use slot_arena::{SlotArena, SlotId};
