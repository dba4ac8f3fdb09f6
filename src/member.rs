use bytes_parser::BytesParser;

use crate::assignment::{parse_assignment, Assignment};
use crate::errors::{
    Field,
    GroupMetadataError::{self, AssignmentDecodeFailed, InvalidAssignmentVersion},
};
use crate::utils::{carve_bytes, parse_bytes_len, parse_i16, parse_i32, parse_str, skip_bytes};

/// Metadata for a Consumer Group Member.
///
/// Note that the words "Member" and "Consumer" can be used interchangeably in this context.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberMetadata {
    /// Consumer Group Member identifier.
    pub member_id: String,

    /// Consumer Client identifier.
    ///
    /// This corresponds to the Kafka (client) configuration option `client.id`.
    pub client_id: String,

    /// Consumer Client host.
    ///
    /// Usually its IP.
    pub client_host: String,

    /// Maximum time (ms) that Group Coordinator will wait for member to rejoin when rebalancing the group.
    ///
    /// Only present when the [`GroupMetadata::version`](crate::GroupMetadata::version) is `1`.
    pub rebalance_timeout: Option<i32>,

    /// Group Coordinator considers member (i.e. consumer) "dead" if it receives no heartbeat after this timeout (ms).
    pub session_timeout: i32,

    /// Partitions assigned to this member by the Group Coordinator.
    ///
    /// Empty if the member carried no assignment.
    pub assignment: Assignment,
}

impl MemberMetadata {
    /// Smallest possible encoding of a member for the given value version.
    ///
    /// That is: 3 empty strings, the timeouts and 2 empty byte regions.
    pub(crate) const fn min_size(version: i16) -> usize {
        let size = 3 * 2 + 4 + 4 + 4;
        if version == 1 {
            size + 4
        } else {
            size
        }
    }

    /// Parse a member out of the payload part of the message.
    ///
    /// Fields are read straight off `parser`, that is shared with the rest of the payload.
    /// The subscription is skipped, while the assignment is carved into a parser of its own,
    /// and decoded according to its own version.
    pub(crate) fn try_from(parser: &mut BytesParser, version: i16) -> Result<Self, GroupMetadataError> {
        let mut member = Self {
            member_id: parse_str(parser, Field::MemberId)?,
            client_id: parse_str(parser, Field::ClientId)?,
            client_host: parse_str(parser, Field::ClientHost)?,
            ..Default::default()
        };

        if version == 1 {
            member.rebalance_timeout = Some(parse_i32(parser, Field::RebalanceTimeout)?);
        }

        member.session_timeout = parse_i32(parser, Field::SessionTimeout)?;

        let subscription_bytes_len = parse_bytes_len(parser, Field::SubscriptionBytes)?;
        skip_bytes(parser, Field::SubscriptionBytes, subscription_bytes_len)?;

        let assignment_bytes_len = parse_bytes_len(parser, Field::AssignmentBytes)?;
        if assignment_bytes_len > 0 {
            let mut assignment_parser = carve_bytes(parser, Field::AssignmentBytes, assignment_bytes_len)?;

            let assignment_version = parse_i16(&mut assignment_parser, Field::ConsumerProtocolVersion)?;
            if assignment_version < 0 {
                return Err(InvalidAssignmentVersion(assignment_version));
            }

            member.assignment =
                parse_assignment(&mut assignment_parser).map_err(|e| AssignmentDecodeFailed(Box::new(e)))?;
        }

        Ok(member)
    }
}
