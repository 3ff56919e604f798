mod common;

use common::{settle, PaymentHarness};
use marketpay::application::{CreateOrderRequest, MarkFailedRequest, RefundRequest, VerifyPaymentRequest};
use marketpay::domain::errors::DomainError;
use marketpay::domain::Money;
use marketpay::ports::OrderPaymentStatus;
use rust_decimal_macros::dec;
use std::sync::atomic::Ordering;

fn create_request(amount: Money) -> CreateOrderRequest {
    CreateOrderRequest {
        amount,
        currency: None,
        customer_id: "C1".to_string(),
        vendor_id: Some("V1".to_string()),
        order_id: Some("MKT-1001".to_string()),
        description: Some("Checkout".to_string()),
    }
}

#[tokio::test]
async fn happy_path_create_verify_refund() {
    let harness = PaymentHarness::new();

    // Create: remote order in minor units, local record in Created
    let created = harness
        .service
        .create_order(create_request(Money::new(dec!(499.00))))
        .await
        .unwrap();
    assert_eq!(created.status, "created");
    assert_eq!(created.amount_minor, 49900);
    assert_eq!(created.currency, "INR");
    assert_eq!(created.gateway_key_id, common::TEST_KEY_ID);
    assert_eq!(harness.gateway.order_calls(), 1);

    // Verify with a correctly computed signature
    let signature = harness
        .verifier
        .sign(&created.external_order_id, "pay_001");
    let verified = harness
        .service
        .verify(VerifyPaymentRequest {
            external_order_id: created.external_order_id.clone(),
            external_payment_id: "pay_001".to_string(),
            signature,
        })
        .await
        .unwrap();
    assert_eq!(verified.status, "success");
    assert!(verified.completed_at.is_some());

    settle().await;
    let notifications = harness.order_client.recorded();
    assert_eq!(notifications.len(), 1);
    assert_eq!(
        notifications[0],
        (
            "MKT-1001".to_string(),
            OrderPaymentStatus::Paid,
            Some("pay_001".to_string())
        )
    );

    // Full refund
    let refunded = harness
        .service
        .refund(RefundRequest {
            payment_id: Some(created.payment_id),
            external_payment_id: None,
            amount: None,
            reason: "changed mind".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(refunded.status, "refunded");
    assert_eq!(refunded.refund_amount, Some(Money::new(dec!(499.00))));
    assert_eq!(refunded.refund_reason.as_deref(), Some("changed mind"));
    assert!(refunded.refunded_at.is_some());
    assert_eq!(harness.gateway.refund_calls(), 1);

    settle().await;
    let notifications = harness.order_client.recorded();
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[1].1, OrderPaymentStatus::Refunded);
    assert_eq!(notifications[1].2, None);
}

#[tokio::test]
async fn forged_callback_fails_closed() {
    let harness = PaymentHarness::new();
    let created = harness
        .service
        .create_order(create_request(Money::new(dec!(250.00))))
        .await
        .unwrap();

    // Syntactically valid hex, wrong value
    let verified = harness
        .service
        .verify(VerifyPaymentRequest {
            external_order_id: created.external_order_id.clone(),
            external_payment_id: "pay_evil".to_string(),
            signature: "deadbeef".repeat(8),
        })
        .await
        .unwrap();
    assert_eq!(verified.status, "failed");
    assert_eq!(verified.error_code.as_deref(), Some("SIGNATURE_MISMATCH"));

    // The order collaborator must never hear about it
    settle().await;
    assert!(harness.order_client.recorded().is_empty());

    // Failed is terminal: a later genuine-looking verify is rejected
    let signature = harness.verifier.sign(&created.external_order_id, "pay_evil");
    let retry = harness
        .service
        .verify(VerifyPaymentRequest {
            external_order_id: created.external_order_id,
            external_payment_id: "pay_evil".to_string(),
            signature,
        })
        .await;
    assert!(matches!(retry, Err(DomainError::InvalidState { .. })));
}

#[tokio::test]
async fn verify_unknown_order_is_not_silent() {
    let harness = PaymentHarness::new();
    let result = harness
        .service
        .verify(VerifyPaymentRequest {
            external_order_id: "order_missing".to_string(),
            external_payment_id: "pay_1".to_string(),
            signature: "00".to_string(),
        })
        .await;
    assert!(matches!(
        result,
        Err(DomainError::PaymentRecordNotFound(_))
    ));
}

#[tokio::test]
async fn duplicate_verify_is_idempotent() {
    let harness = PaymentHarness::new();
    let created = harness
        .service
        .create_order(create_request(Money::new(dec!(100.00))))
        .await
        .unwrap();
    let signature = harness.verifier.sign(&created.external_order_id, "pay_dup");

    let request = VerifyPaymentRequest {
        external_order_id: created.external_order_id.clone(),
        external_payment_id: "pay_dup".to_string(),
        signature,
    };
    let first = harness
        .service
        .verify(VerifyPaymentRequest {
            external_order_id: request.external_order_id.clone(),
            external_payment_id: request.external_payment_id.clone(),
            signature: request.signature.clone(),
        })
        .await
        .unwrap();
    let second = harness.service.verify(request).await.unwrap();

    assert_eq!(first.status, "success");
    assert_eq!(second.status, "success");
    assert_eq!(first.completed_at, second.completed_at);

    // The PAID side effect fires exactly once
    settle().await;
    assert_eq!(harness.order_client.recorded().len(), 1);

    // Replay with a different payment id is an illegal transition
    let other_signature = harness
        .verifier
        .sign(&created.external_order_id, "pay_other");
    let replay = harness
        .service
        .verify(VerifyPaymentRequest {
            external_order_id: created.external_order_id,
            external_payment_id: "pay_other".to_string(),
            signature: other_signature,
        })
        .await;
    assert!(matches!(replay, Err(DomainError::InvalidState { .. })));
}

#[tokio::test]
async fn refund_requires_success_state() {
    let harness = PaymentHarness::new();
    let created = harness
        .service
        .create_order(create_request(Money::new(dec!(80.00))))
        .await
        .unwrap();

    // From Created: illegal
    let early = harness
        .service
        .refund(RefundRequest {
            payment_id: Some(created.payment_id),
            external_payment_id: None,
            amount: None,
            reason: "too soon".to_string(),
        })
        .await;
    assert!(matches!(early, Err(DomainError::InvalidState { .. })));
    assert_eq!(harness.gateway.refund_calls(), 0);

    // Verify, refund, then a second refund must fail
    let signature = harness.verifier.sign(&created.external_order_id, "pay_r");
    harness
        .service
        .verify(VerifyPaymentRequest {
            external_order_id: created.external_order_id,
            external_payment_id: "pay_r".to_string(),
            signature,
        })
        .await
        .unwrap();
    harness
        .service
        .refund(RefundRequest {
            payment_id: Some(created.payment_id),
            external_payment_id: None,
            amount: Some(Money::new(dec!(40.00))),
            reason: "partial".to_string(),
        })
        .await
        .unwrap();

    let again = harness
        .service
        .refund(RefundRequest {
            payment_id: Some(created.payment_id),
            external_payment_id: None,
            amount: None,
            reason: "again".to_string(),
        })
        .await;
    assert!(matches!(again, Err(DomainError::InvalidState { .. })));
    assert_eq!(harness.gateway.refund_calls(), 1);
}

#[tokio::test]
async fn refund_amount_cannot_exceed_original() {
    let harness = PaymentHarness::new();
    let created = harness
        .service
        .create_order(create_request(Money::new(dec!(80.00))))
        .await
        .unwrap();
    let signature = harness.verifier.sign(&created.external_order_id, "pay_x");
    harness
        .service
        .verify(VerifyPaymentRequest {
            external_order_id: created.external_order_id,
            external_payment_id: "pay_x".to_string(),
            signature,
        })
        .await
        .unwrap();

    let result = harness
        .service
        .refund(RefundRequest {
            payment_id: Some(created.payment_id),
            external_payment_id: None,
            amount: Some(Money::new(dec!(100.00))),
            reason: "too much".to_string(),
        })
        .await;
    assert!(matches!(result, Err(DomainError::InvalidAmount(_))));
    assert_eq!(harness.gateway.refund_calls(), 0);
}

#[tokio::test]
async fn gateway_failure_persists_nothing() {
    let harness = PaymentHarness::new();
    harness.gateway.fail_orders.store(true, Ordering::SeqCst);

    let result = harness
        .service
        .create_order(create_request(Money::new(dec!(10.00))))
        .await;
    assert!(matches!(result, Err(DomainError::GatewayError(_))));

    let records = harness.service.list_by_customer("C1").await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn refund_gateway_failure_leaves_record_untouched() {
    let harness = PaymentHarness::new();
    let created = harness
        .service
        .create_order(create_request(Money::new(dec!(60.00))))
        .await
        .unwrap();
    let signature = harness.verifier.sign(&created.external_order_id, "pay_g");
    harness
        .service
        .verify(VerifyPaymentRequest {
            external_order_id: created.external_order_id,
            external_payment_id: "pay_g".to_string(),
            signature,
        })
        .await
        .unwrap();

    harness.gateway.fail_refunds.store(true, Ordering::SeqCst);
    let result = harness
        .service
        .refund(RefundRequest {
            payment_id: Some(created.payment_id),
            external_payment_id: None,
            amount: None,
            reason: "flaky".to_string(),
        })
        .await;
    assert!(matches!(result, Err(DomainError::RefundFailed(_))));

    let record = harness.service.get(created.payment_id).await.unwrap();
    assert_eq!(record.status, "success");
    assert!(record.refund_id.is_none());
}

#[tokio::test]
async fn out_of_band_failure_report() {
    let harness = PaymentHarness::new();
    let created = harness
        .service
        .create_order(create_request(Money::new(dec!(75.00))))
        .await
        .unwrap();

    let failed = harness
        .service
        .mark_failed(MarkFailedRequest {
            external_payment_id: None,
            external_order_id: Some(created.external_order_id.clone()),
            error_code: "PAYMENT_DECLINED".to_string(),
            error_description: "Card declined by issuer".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(failed.status, "failed");
    assert_eq!(failed.error_code.as_deref(), Some("PAYMENT_DECLINED"));

    settle().await;
    let notifications = harness.order_client.recorded();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].1, OrderPaymentStatus::Failed);
}

#[tokio::test]
async fn create_rejects_non_positive_amount() {
    let harness = PaymentHarness::new();
    let result = harness
        .service
        .create_order(create_request(Money::zero()))
        .await;
    assert!(matches!(result, Err(DomainError::InvalidAmount(_))));
    assert_eq!(harness.gateway.order_calls(), 0);
}

#[tokio::test]
async fn lookups_by_every_reference() {
    let harness = PaymentHarness::new();
    let created = harness
        .service
        .create_order(create_request(Money::new(dec!(42.00))))
        .await
        .unwrap();

    let by_id = harness.service.get(created.payment_id).await.unwrap();
    assert_eq!(by_id.id, created.payment_id);

    let by_external = harness
        .service
        .get_by_external_order_id(&created.external_order_id)
        .await
        .unwrap();
    assert_eq!(by_external.id, created.payment_id);

    let by_order = harness.service.get_by_order_id("MKT-1001").await.unwrap();
    assert_eq!(by_order.id, created.payment_id);

    assert_eq!(harness.service.list_by_customer("C1").await.unwrap().len(), 1);
    assert_eq!(harness.service.list_by_vendor("V1").await.unwrap().len(), 1);
    assert!(harness.service.list_by_vendor("V2").await.unwrap().is_empty());
}
