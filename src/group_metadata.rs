use bytes_parser::BytesParser;
use tracing::{debug, trace};

use crate::errors::{
    Field,
    GroupMetadataError::{
        self, HeaderDecodeFailed, InvalidKey, MemberDecodeFailed, MessageKeyMissing, MessageValueMissing,
        MissingValueVersion, TrailingBytes, UnsupportedVersion,
    },
};
use crate::member::MemberMetadata;
use crate::observer::{NoopObserver, OwnershipObserver, PartitionOwnership};
use crate::utils::{parse_count, parse_i16, parse_i32, parse_str};

const VALUE_V0: i16 = 0;
const VALUE_V1: i16 = 1;

/// Contains the current state of a consumer group.
///
/// It is used by the [Group Coordinator] Broker to track:
///
/// 1. which consumer is part of the group
/// 2. which consumer is assigned of which partition
///
/// [`GroupMetadata`] appears _relatively infrequently_ in [`__consumer_offsets`]:
/// this is because it's usually produced when consumers join or leave groups.
///
/// **Note:** The [`GroupMetadata::group`] is parsed from the message key, everything else
/// is parsed from the message value.
///
/// [Group Coordinator]: https://github.com/apache/kafka/blob/trunk/core/src/main/scala/kafka/coordinator/group/GroupCoordinator.scala
/// [`__consumer_offsets`]: https://kafka.apache.org/documentation/#impl_offsettracking
#[derive(Debug, Default, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupMetadata {
    /// Group that this struct describes.
    pub group: String,

    /// Version of the message value.
    ///
    /// This controls the bespoke binary parser behaviour: only `0` and `1` are supported.
    pub version: i16,

    /// Group-wide state.
    pub header: GroupHeader,

    /// Members that are part of this [`GroupMetadata::group`], in the order they were encoded.
    pub members: Vec<MemberMetadata>,
}

/// Group-wide state, that precedes the members in a [`GroupMetadata`] message value.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupHeader {
    /// The class (type) of [`GroupHeader::protocol`] used by this group.
    ///
    /// Possible values are `consumer` or `connect`.
    pub protocol_type: String,

    /// Monotonically increasing integers, changes when group members change.
    ///
    /// This is useful when concurrent operations get out of order,
    /// and original order has to be determined.
    pub generation: i32,

    /// The protocol of [`GroupHeader::protocol_type`] used by this group.
    ///
    /// If `protocol_type == consumer`, this field will contain the identifier of the partition
    /// assignment strategy (ex. `range`, `roundrobin`).
    pub protocol: String,

    /// Identifier (ID) of the group leader.
    ///
    /// This corresponds to the [`MemberMetadata::member_id`] of one of the [`GroupMetadata::members`].
    /// It can be empty.
    pub leader: String,
}

impl GroupHeader {
    fn try_from(parser: &mut BytesParser) -> Result<Self, GroupMetadataError> {
        Ok(Self {
            protocol_type: parse_str(parser, Field::ProtocolType)?,
            generation: parse_i32(parser, Field::Generation)?,
            protocol: parse_str(parser, Field::Protocol)?,
            leader: parse_str(parser, Field::Leader)?,
        })
    }
}

impl GroupMetadata {
    /// Decodes a group metadata message, out of its key and value.
    ///
    /// The `key` is expected to contain just the group (i.e. a string): for keys that
    /// start with the `__consumer_offsets` key version, see [`GroupMetadata::try_from_record`].
    ///
    /// **NOTE:** As Kafka messages have key and value both optional, the signature reflects that.
    /// But a group metadata message needs both: if either is absent, this returns an error.
    ///
    /// # Arguments
    ///
    /// * `key` - An [`Option`] of `&[u8]`, containing the group.
    /// * `value` - An [`Option`] of `&[u8]`, containing the version, the header and the members.
    pub fn try_from_bytes(key: Option<&[u8]>, value: Option<&[u8]>) -> Result<Self, GroupMetadataError> {
        Self::try_from_bytes_observed(key, value, &mut NoopObserver)
    }

    /// Same as [`Self::try_from_bytes`], but reporting the partitions owned by each member to `observer`.
    pub fn try_from_bytes_observed<O>(
        key: Option<&[u8]>,
        value: Option<&[u8]>,
        observer: &mut O,
    ) -> Result<Self, GroupMetadataError>
    where
        O: OwnershipObserver + ?Sized,
    {
        let key_bytes = key.ok_or(MessageKeyMissing)?;
        let mut key_parser = BytesParser::from(key_bytes);
        Self::try_from_parsers(&mut key_parser, value, observer)
    }

    /// Same as [`Self::try_from_bytes`], but handling input as [`Option<Vec<u8>>`].
    pub fn try_from_bytes_vec(key: Option<Vec<u8>>, value: Option<Vec<u8>>) -> Result<Self, GroupMetadataError> {
        Self::try_from_bytes(key.as_deref(), value.as_deref())
    }

    /// Decodes the group from `key_parser` and then everything else from `value`.
    pub(crate) fn try_from_parsers<O>(
        key_parser: &mut BytesParser,
        value: Option<&[u8]>,
        observer: &mut O,
    ) -> Result<Self, GroupMetadataError>
    where
        O: OwnershipObserver + ?Sized,
    {
        let key_group = parse_str(key_parser, Field::Group).map_err(|e| InvalidKey(Box::new(e)))?;
        let group = key_group.as_str();

        let value_bytes = value.ok_or(MessageValueMissing)?;
        let mut value_parser = BytesParser::from(value_bytes);

        let version = parse_i16(&mut value_parser, Field::ValueVersion).map_err(|_| MissingValueVersion)?;

        let result = match version {
            VALUE_V0 | VALUE_V1 => Self::parse_value(group, version, &mut value_parser, observer),
            _ => Err(UnsupportedVersion(version)),
        };

        match &result {
            Ok(gm) => trace!(group, version, members = gm.members.len(), "Decoded group metadata"),
            Err(e) => {
                let reason = e.field_path().unwrap_or_default();
                debug!(group, version, reason = reason.as_str(), error = %e, "Failed to decode group metadata");
            },
        }

        result
    }

    /// Parse header and members, with `parser` positioned right after the value version.
    ///
    /// The members must end the value: leftover bytes mean the value was decoded with the wrong layout.
    ///
    /// This is based on the generated `kafka.internals.generated.GroupMetadataValue#read` method.
    fn parse_value<O>(
        group: &str,
        version: i16,
        parser: &mut BytesParser,
        observer: &mut O,
    ) -> Result<Self, GroupMetadataError>
    where
        O: OwnershipObserver + ?Sized,
    {
        let header = GroupHeader::try_from(parser).map_err(|e| HeaderDecodeFailed(Box::new(e)))?;

        let members_len = parse_count(parser, Field::MemberCount, MemberMetadata::min_size(version))?;
        let mut members = Vec::with_capacity(members_len);
        for index in 0..members_len {
            let member = MemberMetadata::try_from(parser, version).map_err(|e| MemberDecodeFailed {
                index,
                source: Box::new(e),
            })?;

            report_ownership(group, &member, observer);
            members.push(member);
        }

        if !parser.is_at_end() {
            return Err(TrailingBytes {
                remaining: parser.parseable(),
            });
        }

        Ok(Self {
            group: group.to_string(),
            version,
            header,
            members,
        })
    }
}

fn report_ownership<O>(group: &str, member: &MemberMetadata, observer: &mut O)
where
    O: OwnershipObserver + ?Sized,
{
    for (topic, partitions) in &member.assignment {
        for partition in partitions {
            observer.report_ownership(&PartitionOwnership {
                group,
                topic,
                partition: *partition,
                client_host: &member.client_host,
                client_id: &member.client_id,
                member_id: &member.member_id,
            });
        }
    }
}
