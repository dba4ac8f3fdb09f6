use bytes_parser::BytesParser;

use crate::errors::{
    Field,
    GroupMetadataError::{self, MessageKeyMissing, NotGroupMetadataKey},
};
use crate::group_metadata::GroupMetadata;
use crate::observer::OwnershipObserver;
use crate::utils::parse_i16;

const KEY_V0_OFFSET_COMMIT: i16 = 0;
const KEY_V1_OFFSET_COMMIT: i16 = 1;
const KEY_V2_GROUP_METADATA: i16 = 2;

/// Possible types of messages stored in `__consumer_offsets` topic, as told by the key version.
///
/// Ideally Kafka could have used 2 different topics, but it doesn't so... here we are.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MessageKind {
    /// Offset committed by a consumer: not decoded by this crate.
    OffsetCommit(i16),

    /// State of a consumer group, see [`GroupMetadata`].
    GroupMetadata,

    /// A key version this crate knows nothing about.
    Unknown(i16),
}

impl MessageKind {
    /// Classifies a `__consumer_offsets` message by the version at the start of its key.
    pub fn of_key(key: &[u8]) -> Result<Self, GroupMetadataError> {
        let mut parser = BytesParser::from(key);
        Ok(Self::from_key_version(parse_i16(&mut parser, Field::KeyVersion)?))
    }

    fn from_key_version(version: i16) -> Self {
        match version {
            KEY_V0_OFFSET_COMMIT..=KEY_V1_OFFSET_COMMIT => MessageKind::OffsetCommit(version),
            KEY_V2_GROUP_METADATA => MessageKind::GroupMetadata,
            _ => MessageKind::Unknown(version),
        }
    }
}

impl GroupMetadata {
    /// Decodes a message, exactly as it was read from the `__consumer_offsets` topic.
    ///
    /// Differently from [`GroupMetadata::try_from_bytes`], the `key` is expected to start with
    /// the `i16` key version, followed by the group: only messages with key version `2`
    /// are group metadata, everything else fails with [`GroupMetadataError::NotGroupMetadataKey`].
    ///
    /// # Arguments
    ///
    /// * `key` - An [`Option`] of `&[u8]`: if `None`, this function will return an error,
    ///     as it's likely that the message it's not actually from the `__consumer_offsets` topic.
    /// * `value` - An [`Option`] of `&[u8]`, containing the version, the header and the members.
    /// * `observer` - Receives the partitions owned by each decoded member.
    pub fn try_from_record<O>(
        key: Option<&[u8]>,
        value: Option<&[u8]>,
        observer: &mut O,
    ) -> Result<Self, GroupMetadataError>
    where
        O: OwnershipObserver + ?Sized,
    {
        let key_bytes = key.ok_or(MessageKeyMissing)?;
        let mut key_parser = BytesParser::from(key_bytes);

        let key_version = parse_i16(&mut key_parser, Field::KeyVersion)?;
        match MessageKind::from_key_version(key_version) {
            MessageKind::GroupMetadata => Self::try_from_parsers(&mut key_parser, value, observer),
            _ => Err(NotGroupMetadataKey(key_version)),
        }
    }
}
