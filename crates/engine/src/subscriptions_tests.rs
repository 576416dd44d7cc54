// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn covers_every_cached_domain() {
    let subs = build(&PlayerId::from("42"), &ClaimId::from("1001"));
    assert_eq!(subs.len(), 12);
    for domain in Domain::CACHED {
        assert!(subs.iter().any(|s| s.domain == domain), "{domain} has no subscription");
    }
}

#[test]
fn claim_scoped_queries_use_the_claim_id() {
    let subs = build(&PlayerId::from("42"), &ClaimId::from("1001"));
    for sub in subs.iter().filter(|s| matches!(s.domain, Domain::Inventory | Domain::PassiveCrafting)) {
        assert!(sub.query.contains("'1001'"), "{}", sub.query);
    }
    assert!(subs.iter().filter(|s| s.domain == Domain::Tasks).skip(1).all(|s| s.query.contains("'42'")));
}
