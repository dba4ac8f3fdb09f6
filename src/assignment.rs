use std::collections::BTreeMap;

use bytes_parser::BytesParser;

use crate::errors::{Field, GroupMetadataError};
use crate::utils::{parse_bytes_len, parse_count, parse_i32, parse_str, skip_bytes};

/// Partitions assigned to a consumer, by topic.
///
/// Partitions of each topic are kept in the order they were encoded, duplicates included.
pub type Assignment = BTreeMap<String, Vec<i32>>;

/// Smallest possible encoding of a topic: empty name and no partitions.
const MIN_TOPIC_SIZE: usize = 2 + 4;
const PARTITION_SIZE: usize = 4;

/// Parse the topic partitions of a `ConsumerProtocolAssignment`.
///
/// `parser` must cover exactly the assignment blob of a member, with its internal cursor
/// positioned right after the assignment version.
/// The trailing user data is skipped, as its content is specific to the assignor that produced it.
///
/// If a topic appears more than once, the last occurrence wins.
pub(crate) fn parse_assignment(parser: &mut BytesParser) -> Result<Assignment, GroupMetadataError> {
    let topics_len = parse_count(parser, Field::AssignmentTopicCount, MIN_TOPIC_SIZE)?;

    let mut assignment = Assignment::new();
    for _ in 0..topics_len {
        let topic = parse_str(parser, Field::TopicName)?;

        let partitions_len = parse_count(parser, Field::AssignmentPartitionCount, PARTITION_SIZE)?;
        let mut partitions = Vec::with_capacity(partitions_len);
        for _ in 0..partitions_len {
            partitions.push(parse_i32(parser, Field::AssignmentPartitionId)?);
        }

        assignment.insert(topic, partitions);
    }

    let user_data_len = parse_bytes_len(parser, Field::UserBytes)?;
    skip_bytes(parser, Field::UserBytes, user_data_len)?;

    Ok(assignment)
}
