//! Replica determinism: the same message sequence against the same initial
//! state must leave byte-identical ledgers.

#[cfg(test)]
mod tests {
    use crate::support::{decision, proposal, role, user, Harness};
    use rbac_types::{Action, MessageType, ProposalKind, RelationshipKind};

    fn member_add() -> ProposalKind {
        ProposalKind::membership(RelationshipKind::RoleMember, Action::Add)
    }

    async fn run_sequence(h: &Harness) {
        h.apply(MessageType::CreateUser, &user("alice", None), "alice")
            .await
            .unwrap();
        h.apply(MessageType::CreateUser, &user("bob", Some("alice")), "bob")
            .await
            .unwrap();
        h.apply(MessageType::CreateUser, &user("carol", None), "carol")
            .await
            .unwrap();
        h.apply(
            MessageType::CreateRole,
            &role("eng", &["alice"], &["carol"]),
            "alice",
        )
        .await
        .unwrap();

        h.apply(
            MessageType::Propose(member_add()),
            &proposal("p1", "eng", "bob"),
            "bob",
        )
        .await
        .unwrap();
        h.apply(
            MessageType::Confirm(member_add()),
            &decision("p1", "eng", "bob"),
            "alice",
        )
        .await
        .unwrap();

        h.apply(
            MessageType::Propose(member_add()),
            &proposal("p2", "eng", "carol"),
            "carol",
        )
        .await
        .unwrap();
        h.apply(
            MessageType::Reject(member_add()),
            &decision("p2", "eng", "carol"),
            "alice",
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_two_replicas_converge_byte_for_byte() {
        let first = Harness::new();
        let second = Harness::new();

        run_sequence(&first).await;
        run_sequence(&second).await;

        let left = first.ledger.snapshot().unwrap();
        let right = second.ledger.snapshot().unwrap();
        assert!(!left.is_empty());
        assert_eq!(left, right);
    }

    /// Rejected messages leave no trace: after a failed apply the snapshot
    /// is unchanged.
    #[tokio::test]
    async fn test_rejected_message_writes_nothing() {
        let h = Harness::new();
        run_sequence(&h).await;
        let before = h.ledger.snapshot().unwrap();

        // mallory has no standing on "eng".
        h.apply(MessageType::CreateUser, &user("mallory", None), "mallory")
            .await
            .unwrap();
        let snapshot_with_mallory = h.ledger.snapshot().unwrap();

        let denied = h
            .apply(
                MessageType::Propose(member_add()),
                &proposal("p9", "eng", "alice"),
                "mallory",
            )
            .await;
        assert!(denied.is_err());

        let after = h.ledger.snapshot().unwrap();
        assert_eq!(snapshot_with_mallory, after);
        assert_ne!(before, after); // mallory's own record did land
    }
}
