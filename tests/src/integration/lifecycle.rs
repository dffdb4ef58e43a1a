//! End-to-end proposal lifecycle scenarios.

#[cfg(test)]
mod tests {
    use crate::support::{decision, proposal, role, task, user, Harness};
    use rbac_addressing::{proposal_address, role_members_address, role_tasks_address};
    use rbac_engine::EngineError;
    use rbac_types::{
        from_bytes, Action, MessageType, ProposalContainer, ProposalKind, ProposalStatus,
        RelationshipContainer, RelationshipKind,
    };

    fn member_add() -> ProposalKind {
        ProposalKind::membership(RelationshipKind::RoleMember, Action::Add)
    }

    fn member_remove() -> ProposalKind {
        ProposalKind::membership(RelationshipKind::RoleMember, Action::Remove)
    }

    /// The canonical happy path: create the actors, open a membership
    /// proposal, confirm it, and observe both the relationship and the
    /// terminal proposal record.
    #[tokio::test]
    async fn test_membership_lifecycle_end_to_end() {
        let h = Harness::new();
        h.apply(MessageType::CreateUser, &user("alice", None), "alice")
            .await
            .unwrap();
        h.apply(MessageType::CreateUser, &user("bob", None), "bob")
            .await
            .unwrap();
        h.apply(
            MessageType::CreateRole,
            &role("eng", &["alice"], &["alice"]),
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

        let members: RelationshipContainer = from_bytes(
            &h.ledger
                .get_raw(&role_members_address("eng"))
                .unwrap()
                .unwrap(),
        )
        .unwrap();
        assert!(members.contains("eng", "bob"));

        let proposals: ProposalContainer = from_bytes(
            &h.ledger
                .get_raw(&proposal_address("eng", "bob"))
                .unwrap()
                .unwrap(),
        )
        .unwrap();
        let record = proposals.by_id("p1").unwrap();
        assert_eq!(record.status, ProposalStatus::Confirmed);
        assert_eq!(record.opener, "bob");

        // Terminal means terminal: a second decision on p1 is rejected.
        let again = h
            .apply(
                MessageType::Confirm(member_add()),
                &decision("p1", "eng", "bob"),
                "alice",
            )
            .await;
        assert!(matches!(again, Err(EngineError::ProposalNotOpen { .. })));
    }

    /// After a rejection the relationship set is untouched and a fresh
    /// proposal for the same tuple may be opened.
    #[tokio::test]
    async fn test_rejection_then_reopen() {
        let h = Harness::new();
        h.apply(MessageType::CreateUser, &user("alice", None), "alice")
            .await
            .unwrap();
        h.apply(MessageType::CreateUser, &user("bob", None), "bob")
            .await
            .unwrap();
        h.apply(MessageType::CreateRole, &role("eng", &["alice"], &[]), "alice")
            .await
            .unwrap();

        h.apply(
            MessageType::Propose(member_add()),
            &proposal("p1", "eng", "bob"),
            "bob",
        )
        .await
        .unwrap();

        // Duplicate while p1 is open.
        let dup = h
            .apply(
                MessageType::Propose(member_add()),
                &proposal("p2", "eng", "bob"),
                "bob",
            )
            .await;
        assert!(matches!(dup, Err(EngineError::DuplicateProposal { .. })));

        h.apply(
            MessageType::Reject(member_add()),
            &decision("p1", "eng", "bob"),
            "alice",
        )
        .await
        .unwrap();
        assert!(h
            .ledger
            .get_raw(&role_members_address("eng"))
            .unwrap()
            .is_none());

        // Closed proposals no longer block the tuple.
        let reopened = h
            .apply(
                MessageType::Propose(member_add()),
                &proposal("p3", "eng", "bob"),
                "bob",
            )
            .await;
        assert!(reopened.is_ok());
    }

    /// Granting a task to a role goes through owner proposal and owner
    /// confirmation; there is no self-serve path for task grants.
    #[tokio::test]
    async fn test_role_task_grant_flow() {
        let h = Harness::new();
        let grant = ProposalKind::membership(RelationshipKind::RoleTask, Action::Add);

        h.apply(MessageType::CreateUser, &user("alice", None), "alice")
            .await
            .unwrap();
        h.apply(MessageType::CreateRole, &role("eng", &["alice"], &[]), "alice")
            .await
            .unwrap();
        h.apply(MessageType::CreateTask, &task("deploy", &["alice"], &[]), "alice")
            .await
            .unwrap();

        h.apply(
            MessageType::Propose(grant),
            &proposal("p1", "eng", "deploy"),
            "alice",
        )
        .await
        .unwrap();
        h.apply(
            MessageType::Confirm(grant),
            &decision("p1", "eng", "deploy"),
            "alice",
        )
        .await
        .unwrap();

        let tasks: RelationshipContainer = from_bytes(
            &h.ledger
                .get_raw(&role_tasks_address("eng"))
                .unwrap()
                .unwrap(),
        )
        .unwrap();
        assert!(tasks.contains("eng", "deploy"));
    }

    /// Changes to the owner set need admin approval; an owner alone cannot
    /// confirm them.
    #[tokio::test]
    async fn test_owner_set_changes_need_admin() {
        let h = Harness::new();
        let owner_add = ProposalKind::membership(RelationshipKind::RoleOwner, Action::Add);

        h.apply(MessageType::CreateUser, &user("alice", None), "alice")
            .await
            .unwrap();
        h.apply(MessageType::CreateUser, &user("carol", None), "carol")
            .await
            .unwrap();
        h.apply(MessageType::CreateUser, &user("bob", None), "bob")
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
            MessageType::Propose(owner_add),
            &proposal("p1", "eng", "bob"),
            "bob",
        )
        .await
        .unwrap();

        let by_owner = h
            .apply(
                MessageType::Confirm(owner_add),
                &decision("p1", "eng", "bob"),
                "alice",
            )
            .await;
        assert!(matches!(by_owner, Err(EngineError::Unauthorized { .. })));

        let by_admin = h
            .apply(
                MessageType::Confirm(owner_add),
                &decision("p1", "eng", "bob"),
                "carol",
            )
            .await;
        assert!(by_admin.is_ok());
    }

    /// A remove confirmed after the member already left fails rather than
    /// silently writing nothing.
    #[tokio::test]
    async fn test_stale_remove_confirmation_fails() {
        let h = Harness::new();
        h.apply(MessageType::CreateUser, &user("alice", None), "alice")
            .await
            .unwrap();
        h.apply(MessageType::CreateUser, &user("bob", None), "bob")
            .await
            .unwrap();
        h.apply(MessageType::CreateRole, &role("eng", &["alice"], &[]), "alice")
            .await
            .unwrap();

        // Get bob in, then race two removal paths.
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
            MessageType::Propose(member_remove()),
            &proposal("p2", "eng", "bob"),
            "bob",
        )
        .await
        .unwrap();
        h.apply(
            MessageType::Confirm(member_remove()),
            &decision("p2", "eng", "bob"),
            "alice",
        )
        .await
        .unwrap();

        // p2 is closed; replaying its decision cannot remove again.
        let replay = h
            .apply(
                MessageType::Confirm(member_remove()),
                &decision("p2", "eng", "bob"),
                "alice",
            )
            .await;
        assert!(matches!(replay, Err(EngineError::ProposalNotOpen { .. })));
    }

    /// Envelopes whose declared sets omit an address the handler touches
    /// are rejected before any state access.
    #[tokio::test]
    async fn test_undeclared_address_is_rejected() {
        use rbac_types::{to_bytes, TransactionEnvelope};

        let h = Harness::new();
        let payload = user("alice", None);
        let content = to_bytes(&payload).unwrap();
        let envelope = TransactionEnvelope::unsigned(
            MessageType::CreateUser,
            content,
            vec![],
            vec![],
            "alice",
            0,
        );
        let result = rbac_engine::TransactionProcessingApi::apply(&h.service, &envelope).await;
        assert!(matches!(
            result,
            Err(EngineError::UndeclaredAddress { direction: "input", .. })
        ));
    }
}
