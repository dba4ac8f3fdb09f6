//! Decoder for the _group metadata_ messages of the Kafka `__consumer_offsets` internal topic.
//!
//! Those are the messages that the [Group Coordinator] writes to persist the state of a consumer group:
//! its members, and the partitions assigned to each of them.
//!
//! The format is big-endian throughout, and made of:
//!
//! * `i16` versions and string lengths
//! * `i32` generations, counts, timeouts, partitions and bytes lengths
//! * strings as an `i16` length followed by that many bytes
//!
//! A message value starts with its version: only `0` and `1` are supported, the latter adding
//! a rebalance timeout to each member. The assignment of each member is an opaque blob, that carries
//! its own version.
//!
//! # Examples
//!
//! ```rust
//! use konsumer_group_metadata::{GroupMetadata, GroupMetadataError};
//!
//! // The key only carries the group
//! let key = [0x00, 0x02, b'g', b'1'];
//!
//! // The value version 2 is not supported
//! let value = [0x00, 0x02];
//!
//! assert_eq!(
//!     GroupMetadata::try_from_bytes(Some(key.as_slice()), Some(value.as_slice())),
//!     Err(GroupMetadataError::UnsupportedVersion(2))
//! );
//! ```
//!
//! [Group Coordinator]: https://github.com/apache/kafka/blob/trunk/core/src/main/scala/kafka/coordinator/group/GroupCoordinator.scala

mod assignment;
mod errors;
mod group_metadata;
mod member;
mod observer;
mod record;
mod utils;

#[cfg(test)]
mod test_utils;

pub use assignment::Assignment;
pub use errors::{Field, GroupMetadataError};
pub use group_metadata::{GroupHeader, GroupMetadata};
pub use member::MemberMetadata;
pub use observer::{NoopObserver, OwnershipObserver, PartitionOwnership, TracingObserver};
pub use record::MessageKind;
