use tracing::info;

/// A single partition, as owned by a member of a consumer group.
///
/// One of these is reported to an [`OwnershipObserver`] for each partition in the assignment
/// of each decoded [`MemberMetadata`](crate::MemberMetadata).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct PartitionOwnership<'a> {
    /// Group the owning member belongs to.
    pub group: &'a str,

    /// Topic the partition belongs to.
    pub topic: &'a str,

    /// Partition index.
    pub partition: i32,

    /// Client host of the owning member (usually its IP).
    pub client_host: &'a str,

    /// Client identifier of the owning member.
    pub client_id: &'a str,

    /// Identifier of the owning member.
    pub member_id: &'a str,
}

/// Receives partition ownership, as it's discovered while decoding [`GroupMetadata`](crate::GroupMetadata).
///
/// Ownership of a member is reported as soon as that member is decoded: if a later member fails
/// to decode, the decoding returns an error, but what was reported so far is not retracted.
///
/// Any `FnMut(&PartitionOwnership)` closure is an observer.
pub trait OwnershipObserver {
    fn report_ownership(&mut self, ownership: &PartitionOwnership<'_>);
}

impl<F> OwnershipObserver for F
where
    F: FnMut(&PartitionOwnership<'_>),
{
    fn report_ownership(&mut self, ownership: &PartitionOwnership<'_>) {
        self(ownership)
    }
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl OwnershipObserver for NoopObserver {
    fn report_ownership(&mut self, _: &PartitionOwnership<'_>) {}
}

/// Observer that emits an `INFO` [`tracing`] event for each owned partition.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl OwnershipObserver for TracingObserver {
    fn report_ownership(&mut self, ownership: &PartitionOwnership<'_>) {
        info!(
            group = ownership.group,
            topic = ownership.topic,
            partition = ownership.partition,
            owner = ownership.client_host,
            client_id = ownership.client_id,
            member_id = ownership.member_id,
            "Got group metadata"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::is_thread_safe;

    fn ownership(partition: i32) -> PartitionOwnership<'static> {
        PartitionOwnership {
            group: "g1",
            topic: "topicA",
            partition,
            client_host: "/10.0.0.1",
            client_id: "c1",
            member_id: "m1",
        }
    }

    #[test]
    fn closures_are_observers() {
        let mut seen = Vec::new();
        let mut observer = |o: &PartitionOwnership<'_>| seen.push(o.partition);

        observer.report_ownership(&ownership(3));
        observer.report_ownership(&ownership(1));

        assert_eq!(seen, vec![3, 1]);
    }

    #[test]
    fn sinks_accept_ownership() {
        NoopObserver.report_ownership(&ownership(0));
        TracingObserver.report_ownership(&ownership(0));
    }

    #[test]
    fn test_types_thread_safety() {
        is_thread_safe::<PartitionOwnership>();
        is_thread_safe::<NoopObserver>();
        is_thread_safe::<TracingObserver>();
    }
}
