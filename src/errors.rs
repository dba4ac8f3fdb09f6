use std::fmt;

use bytes_parser::BytesParserError;
use thiserror::Error;

/// Identifies which field of a group metadata record a decoding failure happened at.
///
/// The [`fmt::Display`] of each variant is the field's name relative to the structure
/// that contains it: [`GroupMetadataError::field_path`] composes them into a full path.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Field {
    KeyVersion,
    Group,
    ValueVersion,
    ProtocolType,
    Generation,
    Protocol,
    Leader,
    MemberCount,
    MemberId,
    ClientId,
    ClientHost,
    RebalanceTimeout,
    SessionTimeout,
    SubscriptionBytes,
    AssignmentBytes,
    ConsumerProtocolVersion,
    AssignmentTopicCount,
    TopicName,
    AssignmentPartitionCount,
    AssignmentPartitionId,
    UserBytes,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::KeyVersion => "key_version",
            Field::Group => "group",
            Field::ValueVersion => "version",
            Field::ProtocolType => "protocol_type",
            Field::Generation => "generation",
            Field::Protocol => "protocol",
            Field::Leader => "leader",
            Field::MemberCount => "member_count",
            Field::MemberId => "member_id",
            Field::ClientId => "client_id",
            Field::ClientHost => "client_host",
            Field::RebalanceTimeout => "rebalance_timeout",
            Field::SessionTimeout => "session_timeout",
            Field::SubscriptionBytes => "subscription_bytes",
            Field::AssignmentBytes => "assignment_bytes",
            Field::ConsumerProtocolVersion => "consumer_protocol_version",
            Field::AssignmentTopicCount => "assignment_topic_count",
            Field::TopicName => "topic_name",
            Field::AssignmentPartitionCount => "assignment_partition_count",
            Field::AssignmentPartitionId => "assignment_partition_id",
            Field::UserBytes => "user_bytes",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Eq, PartialEq)]
pub enum GroupMetadataError {
    #[error("Cannot parse message without its key: unable to determine group")]
    MessageKeyMissing,

    #[error("Cannot parse group metadata without a message value")]
    MessageValueMissing,

    #[error("Unable to decode group from message key: {0}")]
    InvalidKey(#[source] Box<GroupMetadataError>),

    #[error("Message key does not describe group metadata (key version: {0})")]
    NotGroupMetadataKey(i16),

    #[error("Message value is too short to contain a version")]
    MissingValueVersion,

    #[error("Encountered a not (yet) supported group metadata value version: {0}")]
    UnsupportedVersion(i16),

    #[error("Not enough bytes to parse {field}: needed {needed}, remaining {remaining}")]
    TruncatedInput {
        field: Field,
        needed: usize,
        remaining: usize,
    },

    #[error("Invalid length {length} for {field}")]
    MalformedLength { field: Field, length: i32 },

    #[error("Invalid count {count} for {field}")]
    MalformedCount { field: Field, count: i32 },

    #[error("Encountered an invalid consumer protocol assignment version: {0}")]
    InvalidAssignmentVersion(i16),

    #[error("Failed to decode group header: {0}")]
    HeaderDecodeFailed(#[source] Box<GroupMetadataError>),

    #[error("Found {remaining} unexpected bytes after the last member")]
    TrailingBytes { remaining: usize },

    #[error("Failed to decode member assignment: {0}")]
    AssignmentDecodeFailed(#[source] Box<GroupMetadataError>),

    #[error("Failed to decode member #{index}: {source}")]
    MemberDecodeFailed {
        index: usize,
        #[source]
        source: Box<GroupMetadataError>,
    },

    #[error("Failure while parsing bytes: {0}")]
    ByteParsingError(#[source] BytesParserError),
}

impl GroupMetadataError {
    /// Dotted path to the field the decoding failed at, if the failure is tied to one.
    ///
    /// For example, a truncated topic name in the assignment of the second member
    /// yields `members[1].assignment.topic_name`.
    pub fn field_path(&self) -> Option<String> {
        match self {
            Self::TruncatedInput { field, .. } | Self::MalformedLength { field, .. } | Self::MalformedCount { field, .. } => {
                Some(field.to_string())
            },
            Self::InvalidAssignmentVersion(_) => Some(Field::ConsumerProtocolVersion.to_string()),
            Self::InvalidKey(source) => source.field_path().map(|p| format!("key.{p}")),
            Self::HeaderDecodeFailed(source) => source.field_path().map(|p| format!("header.{p}")),
            Self::AssignmentDecodeFailed(source) => source.field_path().map(|p| format!("assignment.{p}")),
            Self::MemberDecodeFailed { index, source } => source.field_path().map(|p| format!("members[{index}].{p}")),
            _ => None,
        }
    }

    /// Is this failure caused by the input ending before a field could be fully read?
    pub fn is_truncation(&self) -> bool {
        match self {
            Self::TruncatedInput { .. } | Self::MissingValueVersion => true,
            Self::InvalidKey(source)
            | Self::HeaderDecodeFailed(source)
            | Self::AssignmentDecodeFailed(source)
            | Self::MemberDecodeFailed { source, .. } => source.is_truncation(),
            _ => false,
        }
    }
}
