pub use crate::builder::LfuCacheBuilder;
pub use crate::ds::{FrequencyBuckets, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "concurrency")]
pub use crate::policy::lfu::ConcurrentLfuCache;
pub use crate::policy::lfu::LfuCache;
pub use crate::traits::{CoreCache, LfuCacheTrait};
