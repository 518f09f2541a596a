//! # Integration Test Flows
//!
//! End-to-end walkthroughs across the code registry (ea-01), the linkage
//! registry (ea-02) and the entitlement service (ea-03), driven by a mock
//! clock.
//!
//! ## Flows Tested:
//!
//! 1. **Activation**: issue → status NotActivated → activate → status Expired
//!    once the period has passed
//! 2. **Linking**: issue → bot redeems → identity resolves to the account
//! 3. **Maintenance**: retention window, eviction, subscription expiry

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ea_01_code_registry::{CodeRegistryConfig, CodeStatus, IssueRequest, SequenceCodeGenerator};
    use ea_03_entitlement::{
        EntitlementApi, EntitlementConfig, EntitlementError, EntitlementService, InactiveReason,
        LinkResult,
    };
    use shared_types::{
        AccountId, CodeValue, ExternalIdentity, MockTimeSource, Plan, SubscriptionLevel, DAY_MS,
        HOUR_MS, MINUTE_MS,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const T0: u64 = 1_700_000_000_000;

    struct Harness {
        clock: Arc<MockTimeSource>,
        service: EntitlementService,
    }

    fn harness(codes: &[&str]) -> Harness {
        let clock = Arc::new(MockTimeSource::new(T0));
        let service = EntitlementService::in_memory(
            EntitlementConfig::default(),
            CodeRegistryConfig::for_testing(),
            Arc::new(SequenceCodeGenerator::new(codes.iter().copied())),
            clock.clone(),
        );
        Harness { clock, service }
    }

    fn code_status(service: &EntitlementService, code: &str) -> Option<CodeStatus> {
        let value = CodeValue::parse(code).unwrap();
        service.code_store().get(&value).map(|c| c.status(T0))
    }

    // =============================================================================
    // ACTIVATION FLOW
    // =============================================================================

    #[test]
    fn test_activation_walkthrough() {
        let h = harness(&["ABC123"]);
        let account = AccountId::new("buyer-1");

        let code = h
            .service
            .issue_code(
                IssueRequest::activation(account.clone(), Plan::for_level(SubscriptionLevel::Standard))
                    .with_ttl(10 * MINUTE_MS),
            )
            .unwrap();
        assert_eq!(code.value.as_str(), "ABC123");
        assert_eq!(code.expires_at, T0 + 10 * MINUTE_MS);

        let status = h.service.check_status("ABC123").unwrap();
        assert!(!status.is_active);
        assert_eq!(status.reason, Some(InactiveReason::NotActivated));
        assert_eq!(status.level, None);
        assert_eq!(status.expiration_date, None);

        h.clock.advance(MINUTE_MS);
        let activated = h.service.activate("ABC123").unwrap();
        assert_eq!(activated.account_id, account);
        assert!(activated.snapshot.is_active);
        assert_eq!(activated.snapshot.level, Some(SubscriptionLevel::Standard));
        assert_eq!(activated.snapshot.expiration_date, Some(T0 + 30 * DAY_MS));

        let status = h.service.check_status("abc123").unwrap();
        assert!(status.is_active);
        assert!(status.grants(SubscriptionLevel::Basic));
        assert!(!status.grants(SubscriptionLevel::Premium));

        h.clock.set(T0 + 31 * DAY_MS);
        let status = h.service.check_status("ABC123").unwrap();
        assert!(!status.is_active);
        assert_eq!(status.reason, Some(InactiveReason::Expired));
        assert_eq!(status.level, None);
    }

    #[test]
    fn test_redeemed_code_cannot_be_reused() {
        let h = harness(&["ONCE01"]);
        h.service
            .issue_code(IssueRequest::activation(
                AccountId::new("a"),
                Plan::for_level(SubscriptionLevel::Premium),
            ))
            .unwrap();

        let first = h.service.activate("ONCE01").unwrap();
        let before = h.service.subscription_for(&AccountId::new("a")).unwrap();

        h.clock.advance(MINUTE_MS);
        assert_eq!(
            h.service.activate("ONCE01").unwrap_err(),
            EntitlementError::CodeAlreadyRedeemed
        );
        let after = h.service.subscription_for(&AccountId::new("a")).unwrap();
        assert_eq!(before, after);
        assert_eq!(first.snapshot.expiration_date, after.expiration_date);
    }

    #[test]
    fn test_expired_code_rejected_without_sweep() {
        let h = harness(&["LATE01"]);
        let code = h
            .service
            .issue_code(
                IssueRequest::activation(AccountId::new("a"), Plan::for_level(SubscriptionLevel::Basic))
                    .with_ttl(10 * MINUTE_MS),
            )
            .unwrap();

        h.clock.set(code.expires_at + 1);
        assert_eq!(
            h.service.activate("LATE01").unwrap_err(),
            EntitlementError::CodeExpired {
                expires_at: code.expires_at
            }
        );

        let status = h.service.check_status("LATE01").unwrap();
        assert_eq!(status.reason, Some(InactiveReason::Expired));
        assert!(!status.is_active);
    }

    #[test]
    fn test_code_purposes_do_not_cross() {
        let h = harness(&["LINK01", "ACT001"]);
        h.service
            .issue_code(IssueRequest::linking(AccountId::new("a")))
            .unwrap();
        h.service
            .issue_code(IssueRequest::activation(
                AccountId::new("a"),
                Plan::for_level(SubscriptionLevel::Basic),
            ))
            .unwrap();

        assert!(matches!(
            h.service.activate("LINK01"),
            Err(EntitlementError::WrongPurpose { .. })
        ));
        assert!(matches!(
            h.service
                .redeem_for_linking("ACT001", &ExternalIdentity::new("bot#1")),
            Err(EntitlementError::WrongPurpose { .. })
        ));

        // Neither code was consumed.
        assert_eq!(code_status(&h.service, "LINK01"), Some(CodeStatus::Pending));
        assert_eq!(code_status(&h.service, "ACT001"), Some(CodeStatus::Pending));
    }

    #[test]
    fn test_renewal_extends_active_period() {
        let h = harness(&["REN001", "REN002"]);
        let account = AccountId::new("renewer");
        for _ in 0..2 {
            h.service
                .issue_code(IssueRequest::activation(
                    account.clone(),
                    Plan::for_level(SubscriptionLevel::Standard),
                ))
                .unwrap();
        }

        h.service.activate("REN001").unwrap();
        h.clock.advance(10 * HOUR_MS);
        let renewed = h.service.activate("REN002").unwrap();

        assert_eq!(renewed.snapshot.expiration_date, Some(T0 + 60 * DAY_MS));
        // Both codes report the same account record.
        assert_eq!(
            h.service.check_status("REN001").unwrap(),
            h.service.check_status("REN002").unwrap()
        );
    }

    // =============================================================================
    // LINKING FLOW
    // =============================================================================

    #[test]
    fn test_linking_walkthrough() {
        let h = harness(&["LNK777"]);
        let account = AccountId::new("acct-9");
        let identity = ExternalIdentity::new("discordUser#1234");

        h.service
            .issue_code(IssueRequest::linking(account.clone()))
            .unwrap();
        assert_eq!(h.service.linked_account(&identity), None);

        let outcome = h.service.redeem_for_linking("LNK777", &identity).unwrap();
        match outcome {
            LinkResult::Linked { linkage } => {
                assert_eq!(linkage.account_id, account);
                assert_eq!(linkage.external_identity, identity);
                assert_eq!(linkage.linked_at, T0);
            }
            other => panic!("expected Linked, got {other:?}"),
        }

        assert_eq!(h.service.linked_account(&identity), Some(account.clone()));
        assert_eq!(h.service.linked_identity(&account), Some(identity.clone()));

        assert_eq!(
            h.service
                .redeem_for_linking("LNK777", &ExternalIdentity::new("other#1"))
                .unwrap_err(),
            EntitlementError::CodeAlreadyRedeemed
        );
    }

    #[test]
    fn test_link_conflict_keeps_code_redeemable() {
        let h = harness(&["FIRST1", "SECND2"]);
        let identity = ExternalIdentity::new("discordUser#1234");

        h.service
            .issue_code(IssueRequest::linking(AccountId::new("acct-1")))
            .unwrap();
        h.service
            .issue_code(IssueRequest::linking(AccountId::new("acct-2")))
            .unwrap();

        assert!(h
            .service
            .redeem_for_linking("FIRST1", &identity)
            .unwrap()
            .is_linked());

        let conflict = h.service.redeem_for_linking("SECND2", &identity).unwrap();
        assert_eq!(
            conflict,
            LinkResult::AlreadyLinked {
                existing_account: AccountId::new("acct-1")
            }
        );
        assert_eq!(code_status(&h.service, "SECND2"), Some(CodeStatus::Pending));

        // A fresh identity can still use it.
        let other = ExternalIdentity::new("otherUser#5678");
        assert!(h
            .service
            .redeem_for_linking("SECND2", &other)
            .unwrap()
            .is_linked());
        assert_eq!(
            h.service.linked_account(&other),
            Some(AccountId::new("acct-2"))
        );
    }

    #[test]
    fn test_bot_sees_linked_subscription() {
        let h = harness(&["LINKAA", "SUBSAA"]);
        let account = AccountId::new("gamer");
        let identity = ExternalIdentity::new("gamer#0001");

        h.service
            .issue_code(IssueRequest::linking(account.clone()))
            .unwrap();
        h.service
            .issue_code(IssueRequest::activation(
                account.clone(),
                Plan::lifetime(SubscriptionLevel::Premium),
            ))
            .unwrap();

        assert!(matches!(
            h.service.status_for_identity(&identity),
            Err(EntitlementError::IdentityNotLinked { .. })
        ));

        h.service.redeem_for_linking("LINKAA", &identity).unwrap();
        let before = h.service.status_for_identity(&identity).unwrap();
        assert_eq!(before.reason, Some(InactiveReason::NotActivated));

        h.service.activate("SUBSAA").unwrap();
        let after = h.service.status_for_identity(&identity).unwrap();
        assert!(after.is_active);
        assert_eq!(after.expiration_date, None);
        assert!(h
            .service
            .has_entitlement(&account, SubscriptionLevel::Premium)
            .unwrap());
    }

    // =============================================================================
    // MAINTENANCE
    // =============================================================================

    #[test]
    fn test_maintenance_retention_and_expiry() {
        let h = harness(&["KEEP01", "DROP01"]);
        let account = AccountId::new("m");

        h.service
            .issue_code(IssueRequest::activation(
                account.clone(),
                Plan::with_duration(SubscriptionLevel::Basic, DAY_MS),
            ))
            .unwrap();
        h.service
            .issue_code(IssueRequest::linking(AccountId::new("n")).with_ttl(MINUTE_MS))
            .unwrap();
        h.service.activate("KEEP01").unwrap();

        // Within retention: nothing evicted, subscription past its day.
        h.clock.advance(2 * DAY_MS);
        let report = h.service.run_maintenance().unwrap();
        assert_eq!(report.codes.evicted, 0);
        assert_eq!(report.subscriptions_deactivated, 1);
        assert_eq!(
            h.service.check_status("KEEP01").unwrap().reason,
            Some(InactiveReason::Expired)
        );

        // Past retention for both codes.
        h.clock.advance(7 * DAY_MS);
        let report = h.service.run_maintenance().unwrap();
        assert_eq!(report.codes.evicted, 2);
        assert_eq!(report.subscriptions_deactivated, 0);

        // The subscription record outlives its code.
        assert_eq!(
            h.service.check_status("KEEP01").unwrap().reason,
            Some(InactiveReason::Expired)
        );
        assert_eq!(
            h.service.check_status("DROP01").unwrap_err(),
            EntitlementError::CodeNotFound
        );
    }
}
