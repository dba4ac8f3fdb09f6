//! Encoder for the `__consumer_offsets` group metadata format, used to build test fixtures.

use bytes::{BufMut, BytesMut};

use crate::{Assignment, GroupHeader, MemberMetadata};

pub(crate) fn put_str(buf: &mut BytesMut, s: &str) {
    buf.put_i16(s.len() as i16);
    buf.put_slice(s.as_bytes());
}

pub(crate) fn put_bytes(buf: &mut BytesMut, bytes: &[u8]) {
    buf.put_i32(bytes.len() as i32);
    buf.put_slice(bytes);
}

/// Key of a group metadata message, _without_ the leading key version.
pub(crate) fn encode_key(group: &str) -> Vec<u8> {
    let mut buf = BytesMut::new();
    put_str(&mut buf, group);
    buf.to_vec()
}

/// Body of an assignment (i.e. what follows its version).
pub(crate) fn encode_assignment_body(assignment: &Assignment, user_data: &[u8]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    buf.put_i32(assignment.len() as i32);
    for (topic, partitions) in assignment {
        put_str(&mut buf, topic);
        buf.put_i32(partitions.len() as i32);
        for partition in partitions {
            buf.put_i32(*partition);
        }
    }
    put_bytes(&mut buf, user_data);
    buf.to_vec()
}

/// Assignment blob, as carried by a member.
pub(crate) fn encode_assignment(version: i16, assignment: &Assignment, user_data: &[u8]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    buf.put_i16(version);
    buf.put_slice(&encode_assignment_body(assignment, user_data));
    buf.to_vec()
}

/// Member, with the given opaque subscription and assignment blobs.
pub(crate) fn put_member_with_blobs(
    buf: &mut BytesMut,
    version: i16,
    member: &MemberMetadata,
    subscription: &[u8],
    assignment: &[u8],
) {
    put_str(buf, &member.member_id);
    put_str(buf, &member.client_id);
    put_str(buf, &member.client_host);
    if version == 1 {
        buf.put_i32(member.rebalance_timeout.unwrap_or_default());
    }
    buf.put_i32(member.session_timeout);
    put_bytes(buf, subscription);
    put_bytes(buf, assignment);
}

/// Member, with its assignment encoded as version 0 (or left empty, if it has none).
pub(crate) fn put_member(buf: &mut BytesMut, version: i16, member: &MemberMetadata) {
    let assignment = if member.assignment.is_empty() {
        Vec::new()
    } else {
        encode_assignment(0, &member.assignment, &[])
    };
    put_member_with_blobs(buf, version, member, &[], &assignment);
}

pub(crate) fn put_header(buf: &mut BytesMut, version: i16, header: &GroupHeader) {
    buf.put_i16(version);
    put_str(buf, &header.protocol_type);
    buf.put_i32(header.generation);
    put_str(buf, &header.protocol);
    put_str(buf, &header.leader);
}

/// Value of a group metadata message.
pub(crate) fn encode_value(version: i16, header: &GroupHeader, members: &[MemberMetadata]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    put_header(&mut buf, version, header);
    buf.put_i32(members.len() as i32);
    for member in members {
        put_member(&mut buf, version, member);
    }
    buf.to_vec()
}

pub(crate) fn assignment_of(topics: &[(&str, &[i32])]) -> Assignment {
    topics.iter().map(|(topic, partitions)| (topic.to_string(), partitions.to_vec())).collect()
}

pub(crate) fn header() -> GroupHeader {
    GroupHeader {
        protocol_type: "consumer".to_string(),
        generation: 5,
        protocol: "range".to_string(),
        leader: "m1".to_string(),
    }
}

pub(crate) fn member(id: &str, version: i16, assignment: Assignment) -> MemberMetadata {
    MemberMetadata {
        member_id: id.to_string(),
        client_id: format!("client-{id}"),
        client_host: "/10.0.0.1".to_string(),
        rebalance_timeout: (version == 1).then_some(300_000),
        session_timeout: 30_000,
        assignment,
    }
}
