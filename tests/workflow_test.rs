//! Workflow tests covering the gating, referral-attribution and
//! locale-toggle rules end to end against an in-memory store.

mod helpers;

use assert_matches::assert_matches;

use helpers::{
    test_workflow, test_workflow_with_default, StubOracle, TEST_BOT_USERNAME, TEST_INVITE_LINK,
};
use reftrack::models::Locale;
use reftrack::services::membership::MembershipStatus;
use reftrack::workflow::{CheckJoinOutcome, StartOutcome};
use reftrack::{RefTrackError, UserStore};

#[tokio::test]
async fn fresh_start_registers_with_zero_referrals() {
    let workflow = test_workflow(StubOracle::member());

    let outcome = workflow.handle_start(100, "Alice", None).await.unwrap();

    let StartOutcome::Welcome { text, .. } = outcome else {
        panic!("expected welcome");
    };
    assert!(text.contains("Alice"));
    assert!(text.contains(&format!("https://t.me/{TEST_BOT_USERNAME}?start=100")));
    assert!(text.contains('0'));

    let user = workflow.store().get_user(100).await.unwrap().unwrap();
    assert_eq!(user.referral_count, 0);
    assert_eq!(user.language, Locale::Ar);
}

#[tokio::test]
async fn referred_start_credits_referrer_once() {
    let workflow = test_workflow(StubOracle::member());

    workflow.handle_start(100, "Alice", None).await.unwrap();
    workflow.handle_start(200, "Bob", Some("100")).await.unwrap();

    assert_eq!(workflow.store().referral_count(100).await.unwrap(), 1);
    assert_eq!(workflow.store().referral_count(200).await.unwrap(), 0);
}

#[tokio::test]
async fn repeat_visits_never_credit_again() {
    let workflow = test_workflow(StubOracle::member());

    workflow.handle_start(100, "Alice", None).await.unwrap();
    for _ in 0..5 {
        workflow.handle_start(200, "Bob", Some("100")).await.unwrap();
    }

    assert_eq!(workflow.store().referral_count(100).await.unwrap(), 1);
}

#[tokio::test]
async fn registration_is_idempotent() {
    let workflow = test_workflow(StubOracle::member());

    workflow.handle_start(100, "Alice", None).await.unwrap();
    workflow.handle_start(200, "Bob", Some("100")).await.unwrap();
    workflow.handle_toggle_language(100).await.unwrap();

    // Second start with a different display name must not reset anything.
    workflow.handle_start(100, "Alicia", None).await.unwrap();

    let user = workflow.store().get_user(100).await.unwrap().unwrap();
    assert_eq!(user.first_name, "Alicia");
    assert_eq!(user.referral_count, 1);
    assert_eq!(user.language, Locale::En);
}

#[tokio::test]
async fn self_referral_is_never_credited() {
    let workflow = test_workflow(StubOracle::member());

    workflow.handle_start(5, "Selma", Some("5")).await.unwrap();

    assert_eq!(workflow.store().referral_count(5).await.unwrap(), 0);
}

#[tokio::test]
async fn unknown_referrer_forfeits_credit_without_error() {
    let workflow = test_workflow(StubOracle::member());

    let outcome = workflow.handle_start(7, "Nora", Some("999")).await.unwrap();

    assert_matches!(outcome, StartOutcome::Welcome { .. });
    assert!(workflow.store().get_user(7).await.unwrap().is_some());
    assert!(workflow.store().get_user(999).await.unwrap().is_none());
}

#[tokio::test]
async fn malformed_referrer_is_treated_as_absent() {
    let workflow = test_workflow(StubOracle::member());

    let outcome = workflow
        .handle_start(7, "Nora", Some("not-a-number"))
        .await
        .unwrap();

    assert_matches!(outcome, StartOutcome::Welcome { .. });
    assert_eq!(workflow.store().referral_count(7).await.unwrap(), 0);
}

#[tokio::test]
async fn gating_blocks_unregistered_users() {
    let workflow = test_workflow(StubOracle::not_member());

    let outcome = workflow.handle_start(100, "Alice", Some("50")).await.unwrap();

    let StartOutcome::JoinPrompt {
        join_url, referrer, ..
    } = outcome
    else {
        panic!("expected join prompt");
    };
    assert_eq!(join_url, TEST_INVITE_LINK);
    assert_eq!(referrer, Some(50));

    // Stop means stop: no record, no credit.
    assert!(workflow.store().get_user(100).await.unwrap().is_none());
}

#[tokio::test]
async fn oracle_failure_is_fail_closed() {
    let gated = test_workflow(StubOracle::not_member());
    let failing = test_workflow(StubOracle::unavailable());

    let gated_outcome = gated.handle_start(100, "Alice", None).await.unwrap();
    let failing_outcome = failing.handle_start(100, "Alice", None).await.unwrap();

    // Unavailable must be indistinguishable from NotMember at the outcome level.
    assert_eq!(gated_outcome, failing_outcome);
    assert!(failing.store().get_user(100).await.unwrap().is_none());
}

#[tokio::test]
async fn locale_toggle_is_a_pure_flip() {
    let workflow = test_workflow(StubOracle::member());
    workflow.handle_start(100, "Alice", None).await.unwrap();

    let first = workflow.handle_toggle_language(100).await.unwrap();
    assert_eq!(first.locale, Locale::En);
    assert_eq!(workflow.store().get_locale(100).await.unwrap(), Locale::En);

    let second = workflow.handle_toggle_language(100).await.unwrap();
    assert_eq!(second.locale, Locale::Ar);
    assert_eq!(workflow.store().get_locale(100).await.unwrap(), Locale::Ar);

    assert_ne!(first.text, second.text);
}

#[tokio::test]
async fn configured_default_locale_applies_before_and_after_registration() {
    let oracle = StubOracle::not_member();
    let workflow = test_workflow_with_default(oracle.clone(), Locale::En);

    // Gated and unregistered: the prompt must already render in the
    // configured default, not a built-in one.
    let prompt = workflow.handle_start(100, "Alice", None).await.unwrap();
    let StartOutcome::JoinPrompt { text, .. } = prompt else {
        panic!("expected join prompt");
    };
    assert!(text.contains("join the channel"));

    oracle.set(MembershipStatus::Member);
    let outcome = workflow.handle_start(100, "Alice", None).await.unwrap();

    let StartOutcome::Welcome { text, .. } = outcome else {
        panic!("expected welcome");
    };
    assert!(text.contains("Welcome Alice"));

    let user = workflow.store().get_user(100).await.unwrap().unwrap();
    assert_eq!(user.language, Locale::En);
}

#[tokio::test]
async fn locale_toggle_for_unregistered_user_is_an_error() {
    let workflow = test_workflow(StubOracle::member());

    let result = workflow.handle_toggle_language(42).await;

    assert_matches!(result, Err(RefTrackError::UserNotFound { user_id: 42 }));
}

#[tokio::test]
async fn join_prompt_respects_stored_locale() {
    let oracle = StubOracle::member();
    let workflow = test_workflow(oracle.clone());

    workflow.handle_start(100, "Alice", None).await.unwrap();
    workflow.handle_toggle_language(100).await.unwrap();

    oracle.set(MembershipStatus::NotMember);
    let outcome = workflow.handle_start(100, "Alice", None).await.unwrap();

    let StartOutcome::JoinPrompt { text, .. } = outcome else {
        panic!("expected join prompt");
    };
    assert!(text.contains("join the channel"));
}

#[tokio::test]
async fn check_join_while_still_gated_only_alerts() {
    let workflow = test_workflow(StubOracle::not_member());

    let outcome = workflow
        .handle_check_join(100, "Alice", None)
        .await
        .unwrap();

    assert_matches!(outcome, CheckJoinOutcome::StillNotMember { .. });
    assert!(workflow.store().get_user(100).await.unwrap().is_none());
}

#[tokio::test]
async fn check_join_after_joining_runs_onboarding_once() {
    let oracle = StubOracle::member();
    let workflow = test_workflow(oracle.clone());

    // The referrer registers while the channel check passes.
    workflow.handle_start(100, "Alice", None).await.unwrap();

    // The referee arrives via the deep link but has not joined yet.
    oracle.set(MembershipStatus::NotMember);
    let prompt = workflow.handle_start(200, "Bob", Some("100")).await.unwrap();
    let StartOutcome::JoinPrompt { referrer, .. } = prompt else {
        panic!("expected join prompt");
    };
    assert_eq!(referrer, Some(100));

    // They join the channel and press the recheck button.
    oracle.set(MembershipStatus::Member);
    let outcome = workflow
        .handle_check_join(200, "Bob", Some("100"))
        .await
        .unwrap();

    assert_matches!(outcome, CheckJoinOutcome::Joined(StartOutcome::Welcome { .. }));
    assert_eq!(workflow.store().referral_count(100).await.unwrap(), 1);

    // A second recheck is a repeat visit, not a second registration.
    let again = workflow
        .handle_check_join(200, "Bob", Some("100"))
        .await
        .unwrap();
    assert_matches!(again, CheckJoinOutcome::Joined(StartOutcome::Welcome { .. }));
    assert_eq!(workflow.store().referral_count(100).await.unwrap(), 1);
}

#[tokio::test]
async fn concurrent_first_visits_credit_exactly_once() {
    use std::sync::Arc;

    let workflow = Arc::new(test_workflow(StubOracle::member()));
    workflow.handle_start(100, "Alice", None).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let workflow = workflow.clone();
        handles.push(tokio::spawn(async move {
            workflow.handle_start(200, "Bob", Some("100")).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(workflow.store().referral_count(100).await.unwrap(), 1);
}
