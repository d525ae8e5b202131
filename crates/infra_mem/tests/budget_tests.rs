//! Store-backed budget commitment and realization tests

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use uuid::Uuid;

use core_kernel::{AccountId, BudgetId, UserId};
use domain_budget::{
    BudgetError, BudgetLine, BudgetStore, BudgetTracker, CommitmentStatus, Reference,
};
use infra_mem::MemoryBudgetStore;
use test_utils::{CommitmentBuilder, MoneyFixtures};

fn tracker() -> BudgetTracker<MemoryBudgetStore> {
    BudgetTracker::new(Arc::new(MemoryBudgetStore::new()))
}

fn line(budget_id: BudgetId, account_id: AccountId) -> BudgetLine {
    BudgetLine::new(budget_id, account_id, MoneyFixtures::idr(dec!(10000)))
}

#[tokio::test]
async fn duplicate_reference_is_rejected_while_blocking() {
    let tracker = tracker();
    let budget_id = BudgetId::new();
    let account_id = AccountId::new();
    let reference = Reference::new("purchase_order", Uuid::new_v4(), "PO-77");

    tracker
        .commit(
            CommitmentBuilder::new(budget_id, account_id, MoneyFixtures::idr(dec!(1000)))
                .referencing(reference.clone())
                .build(),
        )
        .await
        .unwrap();

    let second = tracker
        .commit(
            CommitmentBuilder::new(budget_id, account_id, MoneyFixtures::idr(dec!(500)))
                .referencing(reference.clone())
                .build(),
        )
        .await;
    assert!(matches!(
        second,
        Err(BudgetError::DuplicateReference { .. })
    ));
}

#[tokio::test]
async fn released_reference_can_be_recommitted() {
    let tracker = tracker();
    let budget_id = BudgetId::new();
    let account_id = AccountId::new();
    let reference = Reference::new("purchase_order", Uuid::new_v4(), "PO-78");
    let user = UserId::new();

    let first = tracker
        .commit(
            CommitmentBuilder::new(budget_id, account_id, MoneyFixtures::idr(dec!(1000)))
                .referencing(reference.clone())
                .build(),
        )
        .await
        .unwrap();
    tracker
        .release(first.id, user, "requote requested")
        .await
        .unwrap();

    let second = tracker
        .commit(
            CommitmentBuilder::new(budget_id, account_id, MoneyFixtures::idr(dec!(900)))
                .referencing(reference)
                .build(),
        )
        .await
        .unwrap();
    assert_eq!(second.status, CommitmentStatus::Active);
}

#[tokio::test]
async fn realized_reference_stays_blocked() {
    let tracker = tracker();
    let budget_id = BudgetId::new();
    let account_id = AccountId::new();
    let reference = Reference::new("purchase_order", Uuid::new_v4(), "PO-79");

    let commitment = tracker
        .commit(
            CommitmentBuilder::new(budget_id, account_id, MoneyFixtures::idr(dec!(1000)))
                .referencing(reference.clone())
                .build(),
        )
        .await
        .unwrap();
    tracker
        .realize(
            commitment.id,
            MoneyFixtures::idr(dec!(1000)),
            Reference::new("invoice", Uuid::new_v4(), "INV-10"),
            NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            UserId::new(),
        )
        .await
        .unwrap();

    let again = tracker
        .commit(
            CommitmentBuilder::new(budget_id, account_id, MoneyFixtures::idr(dec!(100)))
                .referencing(reference)
                .build(),
        )
        .await;
    assert!(matches!(again, Err(BudgetError::DuplicateReference { .. })));
}

#[tokio::test]
async fn realize_flips_the_commitment_exactly_once() {
    let tracker = tracker();
    let budget_id = BudgetId::new();
    let account_id = AccountId::new();

    let commitment = tracker
        .commit(
            CommitmentBuilder::new(budget_id, account_id, MoneyFixtures::idr(dec!(2000)))
                .build(),
        )
        .await
        .unwrap();

    tracker
        .realize(
            commitment.id,
            MoneyFixtures::idr(dec!(1800)),
            Reference::new("invoice", Uuid::new_v4(), "INV-20"),
            NaiveDate::from_ymd_opt(2025, 6, 21).unwrap(),
            UserId::new(),
        )
        .await
        .unwrap();

    let stored = tracker.get(commitment.id).await.unwrap();
    assert_eq!(stored.status, CommitmentStatus::Realized);

    // second realization and a late release both fail
    let again = tracker
        .realize(
            commitment.id,
            MoneyFixtures::idr(dec!(1)),
            Reference::new("invoice", Uuid::new_v4(), "INV-21"),
            NaiveDate::from_ymd_opt(2025, 6, 22).unwrap(),
            UserId::new(),
        )
        .await;
    assert!(matches!(again, Err(BudgetError::NotActive { .. })));
    assert!(matches!(
        tracker.release(commitment.id, UserId::new(), "no").await,
        Err(BudgetError::NotActive { .. })
    ));
}

#[tokio::test]
async fn stale_release_cannot_overwrite_a_realized_commitment() {
    let store = Arc::new(MemoryBudgetStore::new());
    let tracker = BudgetTracker::new(store.clone());
    let budget_id = BudgetId::new();
    let account_id = AccountId::new();

    let commitment = tracker
        .commit(
            CommitmentBuilder::new(budget_id, account_id, MoneyFixtures::idr(dec!(2000)))
                .build(),
        )
        .await
        .unwrap();

    // copy loaded while the commitment was still active
    let mut stale = tracker.get(commitment.id).await.unwrap();

    tracker
        .realize(
            commitment.id,
            MoneyFixtures::idr(dec!(2000)),
            Reference::new("invoice", Uuid::new_v4(), "INV-40"),
            NaiveDate::from_ymd_opt(2025, 6, 25).unwrap(),
            UserId::new(),
        )
        .await
        .unwrap();

    // the stale copy transitions fine in memory, but the store must
    // reject the overwrite or both terminal transitions would land
    stale.release(UserId::new(), "cancelled").unwrap();
    let result = store.update_commitment(&stale).await;
    assert!(matches!(result, Err(ref e) if e.is_conflict()));

    let stored = tracker.get(commitment.id).await.unwrap();
    assert_eq!(stored.status, CommitmentStatus::Realized);
    let realizations = store
        .realizations_for_line(budget_id, account_id)
        .await
        .unwrap();
    assert_eq!(realizations.len(), 1);
    assert_eq!(realizations[0].commitment_id, Some(commitment.id));
}

#[tokio::test]
async fn available_budget_is_always_derived() {
    let tracker = tracker();
    let budget_id = BudgetId::new();
    let account_id = AccountId::new();
    let line = line(budget_id, account_id);
    let user = UserId::new();

    // nothing committed yet
    let available = tracker.available_budget(&line).await.unwrap();
    assert_eq!(available.amount(), dec!(10000));

    // active commitment counts
    let commitment = tracker
        .commit(
            CommitmentBuilder::new(budget_id, account_id, MoneyFixtures::idr(dec!(3000)))
                .build(),
        )
        .await
        .unwrap();
    assert_eq!(
        tracker.available_budget(&line).await.unwrap().amount(),
        dec!(7000)
    );

    // realization replaces the earmark in the formula
    tracker
        .realize(
            commitment.id,
            MoneyFixtures::idr(dec!(2500)),
            Reference::new("invoice", Uuid::new_v4(), "INV-30"),
            NaiveDate::from_ymd_opt(2025, 6, 23).unwrap(),
            user,
        )
        .await
        .unwrap();
    assert_eq!(
        tracker.available_budget(&line).await.unwrap().amount(),
        dec!(7500)
    );

    // direct spend with no commitment also counts
    tracker
        .realize_direct(
            budget_id,
            account_id,
            MoneyFixtures::idr(dec!(500)),
            Reference::new("expense_claim", Uuid::new_v4(), "EXP-1"),
            NaiveDate::from_ymd_opt(2025, 6, 24).unwrap(),
            user,
        )
        .await
        .unwrap();
    assert_eq!(
        tracker.available_budget(&line).await.unwrap().amount(),
        dec!(7000)
    );
}

#[tokio::test]
async fn released_commitment_returns_its_earmark() {
    let tracker = tracker();
    let budget_id = BudgetId::new();
    let account_id = AccountId::new();
    let line = line(budget_id, account_id);

    let commitment = tracker
        .commit(
            CommitmentBuilder::new(budget_id, account_id, MoneyFixtures::idr(dec!(4000)))
                .build(),
        )
        .await
        .unwrap();
    assert_eq!(
        tracker.available_budget(&line).await.unwrap().amount(),
        dec!(6000)
    );

    tracker
        .release(commitment.id, UserId::new(), "cancelled")
        .await
        .unwrap();
    assert_eq!(
        tracker.available_budget(&line).await.unwrap().amount(),
        dec!(10000)
    );
}

#[tokio::test]
async fn check_availability_reports_shortfall_without_enforcing() {
    let tracker = tracker();
    let budget_id = BudgetId::new();
    let account_id = AccountId::new();
    let line = line(budget_id, account_id);

    tracker
        .commit(
            CommitmentBuilder::new(budget_id, account_id, MoneyFixtures::idr(dec!(9500)))
                .build(),
        )
        .await
        .unwrap();

    let fits = tracker
        .check_availability(&line, MoneyFixtures::idr(dec!(500)))
        .await
        .unwrap();
    assert!(fits.is_available());
    assert_eq!(fits.available.amount(), dec!(500));

    let too_much = tracker
        .check_availability(&line, MoneyFixtures::idr(dec!(800)))
        .await
        .unwrap();
    assert!(!too_much.is_available());
    assert_eq!(too_much.shortfall.unwrap().amount(), dec!(300));

    // over-committing is still allowed; the budget can go negative
    let over = tracker
        .commit(
            CommitmentBuilder::new(budget_id, account_id, MoneyFixtures::idr(dec!(800)))
                .build(),
        )
        .await
        .unwrap();
    assert_eq!(over.status, CommitmentStatus::Active);
    assert_eq!(
        tracker.available_budget(&line).await.unwrap().amount(),
        dec!(-300)
    );
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let tracker = tracker();
    let result = tracker
        .commit(
            CommitmentBuilder::new(
                BudgetId::new(),
                AccountId::new(),
                MoneyFixtures::idr(dec!(0)),
            )
            .build(),
        )
        .await;
    assert!(matches!(result, Err(BudgetError::Validation(_))));
}
