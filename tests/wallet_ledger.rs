mod common;

use common::wallet_service;
use marketpay::domain::errors::DomainError;
use marketpay::domain::{Money, TransactionType};
use rand::Rng;
use rust_decimal_macros::dec;

#[tokio::test]
async fn get_or_create_is_idempotent() {
    let service = wallet_service();

    let first = service.get_or_create("C2").await.unwrap();
    let second = service.get_or_create("C2").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.balance, Money::zero());
    assert_eq!(second.balance, Money::zero());
    assert_eq!(first.currency, "INR");
}

#[tokio::test]
async fn top_up_then_spend() {
    let service = wallet_service();

    let wallet = service.get_or_create("C2").await.unwrap();
    assert_eq!(wallet.balance, Money::zero());

    let credit = service
        .credit(
            "C2",
            Money::new(dec!(1000)),
            TransactionType::Credit,
            "top-up".to_string(),
            None,
            None,
        )
        .await
        .unwrap();
    assert_eq!(credit.balance_after, Money::new(dec!(1000)));

    let debit = service
        .debit(
            "C2",
            Money::new(dec!(1000)),
            TransactionType::Debit,
            "order #O1".to_string(),
            Some("O1".to_string()),
            Some("order".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(debit.balance_after, Money::zero());

    assert_eq!(service.get_balance("C2").await.unwrap(), Money::zero());

    // Most-recent-first: debit entry before credit entry
    let history = service.transaction_history("C2").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].txn_type, TransactionType::Debit);
    assert_eq!(history[0].balance_after, Money::zero());
    assert_eq!(history[1].txn_type, TransactionType::Credit);
    assert_eq!(history[1].balance_after, Money::new(dec!(1000)));
}

#[tokio::test]
async fn insufficient_funds_leaves_no_trace() {
    let service = wallet_service();
    service
        .credit(
            "C3",
            Money::new(dec!(100)),
            TransactionType::Credit,
            "top-up".to_string(),
            None,
            None,
        )
        .await
        .unwrap();

    let result = service
        .debit(
            "C3",
            Money::new(dec!(150)),
            TransactionType::Debit,
            "order".to_string(),
            None,
            None,
        )
        .await;
    assert!(matches!(
        result,
        Err(DomainError::InsufficientBalance { .. })
    ));

    assert_eq!(service.get_balance("C3").await.unwrap(), Money::new(dec!(100)));
    assert_eq!(service.transaction_history("C3").await.unwrap().len(), 1);
}

#[tokio::test]
async fn locked_wallet_refuses_everything() {
    let service = wallet_service();
    service
        .credit(
            "C4",
            Money::new(dec!(500)),
            TransactionType::Credit,
            "top-up".to_string(),
            None,
            None,
        )
        .await
        .unwrap();

    let locked = service.lock("C4", "fraud review".to_string()).await.unwrap();
    assert!(locked.locked);
    assert_eq!(locked.lock_reason.as_deref(), Some("fraud review"));

    let before = service.get_or_create("C4").await.unwrap().balance;

    let credit = service
        .credit(
            "C4",
            Money::new(dec!(10)),
            TransactionType::Credit,
            "x".to_string(),
            None,
            None,
        )
        .await;
    assert!(matches!(credit, Err(DomainError::WalletLocked { reason }) if reason == "fraud review"));

    let debit = service
        .debit(
            "C4",
            Money::new(dec!(10)),
            TransactionType::Debit,
            "x".to_string(),
            None,
            None,
        )
        .await;
    assert!(matches!(debit, Err(DomainError::WalletLocked { .. })));

    let after = service.get_or_create("C4").await.unwrap().balance;
    assert_eq!(before, after);
    assert_eq!(service.transaction_history("C4").await.unwrap().len(), 1);

    // Unlock restores normal operation
    service.unlock("C4").await.unwrap();
    service
        .debit(
            "C4",
            Money::new(dec!(10)),
            TransactionType::Debit,
            "order".to_string(),
            None,
            None,
        )
        .await
        .unwrap();
    assert_eq!(service.get_balance("C4").await.unwrap(), Money::new(dec!(490)));
}

#[tokio::test]
async fn deactivated_wallet_accepts_refunds_but_not_spends() {
    let service = wallet_service();
    service
        .credit(
            "C5",
            Money::new(dec!(200)),
            TransactionType::Credit,
            "top-up".to_string(),
            None,
            None,
        )
        .await
        .unwrap();

    let wallet = service.deactivate("C5").await.unwrap();
    assert!(!wallet.active);

    // Refund credit still lands
    service
        .credit(
            "C5",
            Money::new(dec!(50)),
            TransactionType::Refund,
            "order refund".to_string(),
            Some("O9".to_string()),
            Some("refund".to_string()),
        )
        .await
        .unwrap();

    let debit = service
        .debit(
            "C5",
            Money::new(dec!(10)),
            TransactionType::Debit,
            "order".to_string(),
            None,
            None,
        )
        .await;
    assert!(matches!(debit, Err(DomainError::WalletInactive(_))));

    service.reactivate("C5").await.unwrap();
    assert!(
        service
            .debit(
                "C5",
                Money::new(dec!(10)),
                TransactionType::Debit,
                "order".to_string(),
                None,
                None,
            )
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn convenience_wrappers_tag_references() {
    let service = wallet_service();

    let wallet = service
        .apply_bonus("C6", Money::new(dec!(300)), "WELCOME50", None)
        .await
        .unwrap();
    assert_eq!(wallet.balance, Money::new(dec!(300)));

    let wallet = service
        .pay_with_wallet("C6", Money::new(dec!(120)), "O42")
        .await
        .unwrap();
    assert_eq!(wallet.balance, Money::new(dec!(180)));

    let wallet = service
        .withdraw("C6", Money::new(dec!(80)), None)
        .await
        .unwrap();
    assert_eq!(wallet.balance, Money::new(dec!(100)));

    let history = service.transaction_history("C6").await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].txn_type, TransactionType::Withdrawal);
    assert_eq!(history[0].reference_type.as_deref(), Some("withdrawal"));
    assert!(history[0].description.contains("bank_transfer"));
    assert_eq!(history[1].txn_type, TransactionType::Debit);
    assert_eq!(history[1].reference_id.as_deref(), Some("O42"));
    assert_eq!(history[1].reference_type.as_deref(), Some("order"));
    assert_eq!(history[2].txn_type, TransactionType::Bonus);
    assert_eq!(history[2].reference_id.as_deref(), Some("WELCOME50"));
}

#[tokio::test]
async fn sufficient_balance_check_has_no_side_effect() {
    let service = wallet_service();
    service
        .credit(
            "C7",
            Money::new(dec!(75)),
            TransactionType::Credit,
            "top-up".to_string(),
            None,
            None,
        )
        .await
        .unwrap();

    assert!(service.has_sufficient_balance("C7", Money::new(dec!(75))).await.unwrap());
    assert!(!service.has_sufficient_balance("C7", Money::new(dec!(76))).await.unwrap());
    assert_eq!(service.transaction_history("C7").await.unwrap().len(), 1);
}

#[tokio::test]
async fn recent_transactions_limits_the_page() {
    let service = wallet_service();
    for i in 0..5 {
        service
            .credit(
                "C8",
                Money::new(dec!(10)),
                TransactionType::Credit,
                format!("top-up {}", i),
                None,
                None,
            )
            .await
            .unwrap();
    }

    let recent = service.recent_transactions("C8", 2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].description, "top-up 4");
    assert_eq!(recent[1].description, "top-up 3");
}

#[tokio::test]
async fn summary_aggregates_full_history() {
    let service = wallet_service();
    service
        .credit(
            "C9",
            Money::new(dec!(500)),
            TransactionType::Credit,
            "top-up".to_string(),
            None,
            None,
        )
        .await
        .unwrap();
    service
        .credit(
            "C9",
            Money::new(dec!(30)),
            TransactionType::Cashback,
            "cashback".to_string(),
            None,
            None,
        )
        .await
        .unwrap();
    service
        .credit(
            "C9",
            Money::new(dec!(70)),
            TransactionType::Refund,
            "refund".to_string(),
            None,
            None,
        )
        .await
        .unwrap();
    service
        .debit(
            "C9",
            Money::new(dec!(100)),
            TransactionType::Debit,
            "order".to_string(),
            None,
            None,
        )
        .await
        .unwrap();

    let summary = service.summary("C9").await.unwrap();
    assert_eq!(summary.balance, Money::new(dec!(500)));
    assert_eq!(summary.total_credits, Money::new(dec!(600)));
    assert_eq!(summary.total_debits, Money::new(dec!(100)));
    assert_eq!(summary.total_refunds, Money::new(dec!(70)));
    assert_eq!(summary.total_cashback, Money::new(dec!(30)));
    assert_eq!(summary.transaction_count, 4);
    assert!(summary.active);
    assert!(!summary.locked);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_debits_cannot_overdraw() {
    let service = wallet_service();
    service
        .credit(
            "C10",
            Money::new(dec!(50)),
            TransactionType::Credit,
            "top-up".to_string(),
            None,
            None,
        )
        .await
        .unwrap();

    // Ten concurrent debits of 10 against a balance of 50: exactly five win
    let mut handles = Vec::new();
    for _ in 0..10 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .debit(
                    "C10",
                    Money::new(dec!(10)),
                    TransactionType::Debit,
                    "race".to_string(),
                    None,
                    None,
                )
                .await
        }));
    }

    let mut succeeded = 0;
    let mut refused = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(DomainError::InsufficientBalance { .. }) => refused += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(succeeded, 5);
    assert_eq!(refused, 5);
    assert_eq!(service.get_balance("C10").await.unwrap(), Money::zero());
    // 1 credit + 5 successful debits, failed attempts leave no entries
    assert_eq!(service.transaction_history("C10").await.unwrap().len(), 6);
}

#[tokio::test]
async fn random_interleaving_preserves_ledger_invariant() {
    let service = wallet_service();
    let mut rng = rand::thread_rng();

    let mut expected = Money::zero();
    for _ in 0..200 {
        let amount = Money::from_minor_units(rng.gen_range(1..5_000));
        if rng.gen_bool(0.5) {
            service
                .credit(
                    "C11",
                    amount,
                    TransactionType::Credit,
                    "c".to_string(),
                    None,
                    None,
                )
                .await
                .unwrap();
            expected = expected + amount;
        } else {
            match service
                .debit(
                    "C11",
                    amount,
                    TransactionType::Debit,
                    "d".to_string(),
                    None,
                    None,
                )
                .await
            {
                Ok(_) => expected = expected - amount,
                Err(DomainError::InsufficientBalance { .. }) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
    }

    let balance = service.get_balance("C11").await.unwrap();
    assert_eq!(balance, expected);
    assert!(balance >= Money::zero());

    // Rebuild the balance from the ledger
    let history = service.transaction_history("C11").await.unwrap();
    let mut rebuilt = Money::zero();
    for txn in &history {
        if txn.txn_type.is_credit() {
            rebuilt = rebuilt + txn.amount;
        } else {
            rebuilt = rebuilt - txn.amount;
        }
    }
    assert_eq!(rebuilt, balance);
    assert_eq!(history.first().unwrap().balance_after, balance);
}
