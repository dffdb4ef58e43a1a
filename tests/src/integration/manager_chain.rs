//! Delegated authority through the manager hierarchy, including the
//! manager-change proposal flow.

#[cfg(test)]
mod tests {
    use crate::support::{decision, proposal, role, user, Harness};
    use rbac_addressing::user_attributes_address;
    use rbac_engine::EngineError;
    use rbac_types::{
        from_bytes, Action, MessageType, ProposalKind, RelationshipKind, UserContainer,
    };

    fn member_add() -> ProposalKind {
        ProposalKind::membership(RelationshipKind::RoleMember, Action::Add)
    }

    /// Re-pointing a manager link: the subject proposes, the incoming
    /// manager confirms, and from then on the new manager can act for the
    /// subject.
    #[tokio::test]
    async fn test_manager_change_grants_delegated_authority() {
        let h = Harness::new();
        h.apply(MessageType::CreateUser, &user("alice", None), "alice")
            .await
            .unwrap();
        h.apply(MessageType::CreateUser, &user("boss", None), "boss")
            .await
            .unwrap();
        h.apply(MessageType::CreateUser, &user("owner", None), "owner")
            .await
            .unwrap();
        h.apply(
            MessageType::CreateRole,
            &role("eng", &["owner"], &[]),
            "owner",
        )
        .await
        .unwrap();

        // boss is a stranger to alice today.
        let premature = h
            .apply(
                MessageType::Propose(member_add()),
                &proposal("p0", "eng", "alice"),
                "boss",
            )
            .await;
        assert!(matches!(premature, Err(EngineError::Unauthorized { .. })));

        h.apply(
            MessageType::Propose(ProposalKind::UpdateUserManager),
            &proposal("m1", "alice", "boss"),
            "alice",
        )
        .await
        .unwrap();
        h.apply(
            MessageType::Confirm(ProposalKind::UpdateUserManager),
            &decision("m1", "alice", "boss"),
            "boss",
        )
        .await
        .unwrap();

        let users: UserContainer = from_bytes(
            &h.ledger
                .get_raw(&user_attributes_address("alice"))
                .unwrap()
                .unwrap(),
        )
        .unwrap();
        assert_eq!(users.get("alice").unwrap().manager_id.as_deref(), Some("boss"));

        // Now the same propose succeeds through the hierarchy.
        let delegated = h
            .apply(
                MessageType::Propose(member_add()),
                &proposal("p1", "eng", "alice"),
                "boss",
            )
            .await;
        assert!(delegated.is_ok());
    }

    /// The walk stops at the hop bound: a manager six links up has no
    /// delegated authority.
    #[tokio::test]
    async fn test_hop_bound_caps_delegation() {
        let h = Harness::new();
        // u0 reports to u1 reports to ... reports to u6.
        let mut manager = None::<String>;
        for id in (0..=6).rev().map(|i| format!("u{i}")) {
            h.apply(
                MessageType::CreateUser,
                &user(&id, manager.as_deref()),
                &id,
            )
            .await
            .unwrap();
            manager = Some(id);
        }
        h.apply(MessageType::CreateUser, &user("owner", None), "owner")
            .await
            .unwrap();
        h.apply(
            MessageType::CreateRole,
            &role("eng", &["owner"], &[]),
            "owner",
        )
        .await
        .unwrap();

        // Five hops up (u5) still counts as a manager of u0.
        let within = h
            .apply(
                MessageType::Propose(member_add()),
                &proposal("p1", "eng", "u0"),
                "u5",
            )
            .await;
        assert!(within.is_ok());

        // u6 sits exactly five hops above u1, still inside the bound.
        let edge = h
            .apply(
                MessageType::Propose(member_add()),
                &proposal("p2", "eng", "u1"),
                "u6",
            )
            .await;
        assert!(edge.is_ok());

        // But u6 is six hops above u0, one past the bound.
        let too_far = h
            .apply(
                MessageType::Propose(member_add()),
                &proposal("p3", "eng", "u0"),
                "u6",
            )
            .await;
        assert!(matches!(too_far, Err(EngineError::Unauthorized { .. })));
    }

    /// Cyclic manager links never loop the walk; authority checks fail
    /// closed instead.
    #[tokio::test]
    async fn test_manager_cycle_fails_closed() {
        let h = Harness::new();
        h.apply(MessageType::CreateUser, &user("a", None), "a")
            .await
            .unwrap();
        h.apply(MessageType::CreateUser, &user("b", Some("a")), "b")
            .await
            .unwrap();
        h.apply(MessageType::CreateUser, &user("outsider", None), "outsider")
            .await
            .unwrap();

        // Close the loop: a now reports to b.
        h.apply(
            MessageType::Propose(ProposalKind::UpdateUserManager),
            &proposal("m1", "a", "b"),
            "a",
        )
        .await
        .unwrap();
        h.apply(
            MessageType::Confirm(ProposalKind::UpdateUserManager),
            &decision("m1", "a", "b"),
            "b",
        )
        .await
        .unwrap();

        h.apply(MessageType::CreateUser, &user("owner", None), "owner")
            .await
            .unwrap();
        h.apply(
            MessageType::CreateRole,
            &role("eng", &["owner"], &[]),
            "owner",
        )
        .await
        .unwrap();

        let denied = h
            .apply(
                MessageType::Propose(member_add()),
                &proposal("p1", "eng", "a"),
                "outsider",
            )
            .await;
        assert!(matches!(denied, Err(EngineError::Unauthorized { .. })));
    }

    /// The subject themselves cannot confirm their own manager-change
    /// proposal; the incoming manager must consent.
    #[tokio::test]
    async fn test_manager_change_needs_incoming_consent() {
        let h = Harness::new();
        h.apply(MessageType::CreateUser, &user("alice", None), "alice")
            .await
            .unwrap();
        h.apply(MessageType::CreateUser, &user("boss", None), "boss")
            .await
            .unwrap();

        h.apply(
            MessageType::Propose(ProposalKind::UpdateUserManager),
            &proposal("m1", "alice", "boss"),
            "alice",
        )
        .await
        .unwrap();

        let by_subject = h
            .apply(
                MessageType::Confirm(ProposalKind::UpdateUserManager),
                &decision("m1", "alice", "boss"),
                "alice",
            )
            .await;
        assert!(matches!(by_subject, Err(EngineError::Unauthorized { .. })));

        // The subject may withdraw instead.
        let withdrawn = h
            .apply(
                MessageType::Reject(ProposalKind::UpdateUserManager),
                &decision("m1", "alice", "boss"),
                "alice",
            )
            .await;
        assert!(withdrawn.is_ok());
    }
}
