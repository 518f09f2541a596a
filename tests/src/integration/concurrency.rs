//! # Concurrency Properties
//!
//! Races on the same code or the same identity must resolve to exactly one
//! winner, whatever the interleaving.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;

    use ea_01_code_registry::{CodeRegistryConfig, CodeStatus, CsprngCodeGenerator, IssueRequest};
    use ea_03_entitlement::{
        EntitlementApi, EntitlementConfig, EntitlementError, EntitlementService, LinkResult,
    };
    use shared_types::{AccountId, CodeValue, ExternalIdentity, MockTimeSource, Plan, SubscriptionLevel};

    const THREADS: usize = 32;
    const T0: u64 = 1_700_000_000_000;

    fn service() -> Arc<EntitlementService> {
        Arc::new(EntitlementService::in_memory(
            EntitlementConfig::default(),
            CodeRegistryConfig::default(),
            Arc::new(CsprngCodeGenerator::default()),
            Arc::new(MockTimeSource::new(T0)),
        ))
    }

    /// Runs `f` on `THREADS` threads released together.
    fn race<T, F>(f: F) -> Vec<T>
    where
        T: Send + 'static,
        F: Fn(usize) -> T + Send + Sync + 'static,
    {
        let barrier = Arc::new(Barrier::new(THREADS));
        let f = Arc::new(f);
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let barrier = Arc::clone(&barrier);
                let f = Arc::clone(&f);
                thread::spawn(move || {
                    barrier.wait();
                    f(i)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    }

    #[test]
    fn test_activation_is_at_most_once() {
        let service = service();
        let code = service
            .issue_code(IssueRequest::activation(
                AccountId::new("racer"),
                Plan::for_level(SubscriptionLevel::Standard),
            ))
            .unwrap()
            .value
            .to_string();

        let svc = Arc::clone(&service);
        let results = race(move |_| svc.activate(&code));

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| *e == EntitlementError::CodeAlreadyRedeemed));

        // One period granted, not THREADS of them.
        let snapshot = service.subscription_for(&AccountId::new("racer")).unwrap();
        let winner = results.into_iter().find_map(Result::ok).unwrap();
        assert_eq!(snapshot.expiration_date, winner.snapshot.expiration_date);
    }

    #[test]
    fn test_linking_code_is_at_most_once() {
        let service = service();
        let code = service
            .issue_code(IssueRequest::linking(AccountId::new("acct")))
            .unwrap()
            .value
            .to_string();

        let svc = Arc::clone(&service);
        let results = race(move |i| {
            svc.redeem_for_linking(&code, &ExternalIdentity::new(format!("user#{i}")))
        });

        let linked: Vec<_> = results
            .iter()
            .filter(|r| matches!(r, Ok(LinkResult::Linked { .. })))
            .collect();
        assert_eq!(linked.len(), 1);

        let identity = service.linked_identity(&AccountId::new("acct")).unwrap();
        assert_eq!(
            service.linked_account(&identity),
            Some(AccountId::new("acct"))
        );
    }

    #[test]
    fn test_one_identity_links_once() {
        let service = service();
        let codes: Vec<String> = (0..THREADS)
            .map(|i| {
                service
                    .issue_code(IssueRequest::linking(AccountId::new(format!("acct-{i}"))))
                    .unwrap()
                    .value
                    .to_string()
            })
            .collect();

        let svc = Arc::clone(&service);
        let identity = ExternalIdentity::new("discordUser#1234");
        let racing = codes.clone();
        let results = race(move |i| svc.redeem_for_linking(&racing[i], &identity));

        let mut linked = 0;
        let mut conflicts = 0;
        for result in &results {
            match result {
                Ok(LinkResult::Linked { .. }) => linked += 1,
                Ok(LinkResult::AlreadyLinked { .. }) => conflicts += 1,
                other => panic!("unexpected outcome {other:?}"),
            }
        }
        assert_eq!(linked, 1);
        assert_eq!(conflicts, THREADS - 1);

        // Losing codes were released, not consumed.
        let pending = codes
            .iter()
            .map(|c| service.code_store().get(&CodeValue::parse(c).unwrap()).unwrap())
            .filter(|c| c.status(T0) == CodeStatus::Pending)
            .count();
        assert_eq!(pending, THREADS - 1);
    }

    #[test]
    fn test_concurrent_issuance_yields_unique_codes() {
        let service = service();
        let svc = Arc::clone(&service);
        let results = race(move |i| {
            svc.issue_code(IssueRequest::linking(AccountId::new(format!("a{i}"))))
                .map(|c| c.value)
        });

        let mut values: Vec<_> = results.into_iter().map(Result::unwrap).collect();
        values.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        values.dedup();
        assert_eq!(values.len(), THREADS);

        for value in &values {
            let stored = service.code_store().get(value).unwrap();
            assert_eq!(stored.status(T0), CodeStatus::Pending);
        }
    }
}
