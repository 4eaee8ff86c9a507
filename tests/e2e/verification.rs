//! Product verification against the emulated registry and gateway.

use super::TestHarness;
use alloy_primitives::Address;
use luxauth::{Error, TokenId, VerificationClient, VerificationEvent, VerificationStatus};
use serde_json::json;
use std::time::Duration;

fn admin() -> Address {
    Address::repeat_byte(0xad)
}

fn collector() -> Address {
    Address::repeat_byte(0x42)
}

/// Registry with six unrelated products, then `0xHASH2` as token 7.
async fn seeded() -> TestHarness {
    let harness = TestHarness::start(admin()).await;
    for i in 0..6 {
        harness.mint(&format!("0xFILLER{i}"), admin(), &format!("ipfs://filler{i}"));
    }
    let token = harness.mint("0xHASH2", collector(), "ipfs://doc1");
    assert_eq!(token, TokenId::from(7));
    harness
}

#[tokio::test]
async fn test_unregistered_hash_is_not_found() {
    let harness = seeded().await;
    let client = VerificationClient::from_config(&harness.config())
        .await
        .expect("connect");

    let result = client.verify("0xHASH1").await.expect("verify");

    assert_eq!(result.status, VerificationStatus::NotFound);
    assert_eq!(result.token_id, None);
    assert_eq!(result.owner, None);
    assert_eq!(result.metadata, None);
    assert_eq!(result.product_hash, "0xHASH1");
    assert_eq!(harness.gateway_requests().await, 0);
}

#[tokio::test]
async fn test_registered_hash_is_authentic() {
    let harness = seeded().await;
    let document = json!({
        "name": "Classic Flap Bag",
        "description": "Luxury Authentication NFT for Classic Flap Bag",
        "attributes": [{"trait_type": "Product Hash", "value": "0xHASH2"}],
    });
    harness.serve_document("doc1", &document).await;
    let client = VerificationClient::from_config(&harness.config())
        .await
        .expect("connect");

    let result = client.verify("0xHASH2").await.expect("verify");

    assert_eq!(result.status, VerificationStatus::Authentic);
    assert_eq!(result.token_id.map(|t| t.to_string()).as_deref(), Some("7"));
    assert_eq!(result.owner, Some(collector()));
    assert_eq!(result.metadata, Some(document));
    assert_eq!(
        result.product_metadata().as_ref().and_then(|m| m.product_hash()),
        Some("0xHASH2")
    );
}

#[tokio::test]
async fn test_slow_gateway_leaves_metadata_empty() {
    let harness = seeded().await;
    harness
        .serve_document_slowly("doc1", &json!({"name": "Bag"}), Duration::from_secs(3))
        .await;
    let client = VerificationClient::from_config(&harness.config())
        .await
        .expect("connect");
    let mut events = client.subscribe_events();

    let result = client.verify("0xHASH2").await.expect("verify");

    assert_eq!(result.status, VerificationStatus::Authentic);
    assert_eq!(result.token_id, Some(TokenId::from(7)));
    assert_eq!(result.owner, Some(collector()));
    assert_eq!(result.metadata, None);

    let mut saw_metadata_event = false;
    while let Ok(event) = events.try_recv() {
        if let VerificationEvent::MetadataUnavailable { uri, .. } = event {
            assert_eq!(uri, "ipfs://doc1");
            saw_metadata_event = true;
        }
    }
    assert!(saw_metadata_event);
}

#[tokio::test]
async fn test_bad_documents_leave_metadata_empty() {
    let harness = TestHarness::start(admin()).await;
    harness.mint("0xMISSING", collector(), "ipfs://absent");
    harness.mint("0xBROKEN", collector(), "ipfs://broken");
    harness.mint("0xERROR", collector(), "ipfs://error");
    harness.mint("0xLARGE", collector(), "ipfs://large");
    harness.mint("0xFTP", collector(), "ftp://example.com/doc.json");
    harness.serve_raw("broken", 200, "{not json").await;
    harness.serve_raw("error", 502, "bad gateway").await;
    harness
        .serve_document("large", &json!({"description": "x".repeat(256)}))
        .await;

    let mut config = harness.config();
    config.metadata.max_document_bytes = 64;
    let client = VerificationClient::from_config(&config)
        .await
        .expect("connect");

    for hash in ["0xMISSING", "0xBROKEN", "0xERROR", "0xLARGE", "0xFTP"] {
        let result = client.verify(hash).await.expect("verify");
        assert_eq!(result.status, VerificationStatus::Authentic, "{hash}");
        assert_eq!(result.metadata, None, "{hash}");
    }
}

#[tokio::test]
async fn test_documents_are_cached_between_verifications() {
    let harness = seeded().await;
    harness.serve_document("doc1", &json!({"name": "Bag"})).await;
    let client = VerificationClient::from_config(&harness.config())
        .await
        .expect("connect");

    let first = client.verify("0xHASH2").await.expect("verify");
    let second = client.verify("0xHASH2").await.expect("verify");

    assert_eq!(first, second);
    assert_eq!(harness.gateway_requests().await, 1);
    assert_eq!(client.cache_stats().hits, 1);
}

#[tokio::test]
async fn test_http_failure_is_inconclusive() {
    let harness = seeded().await;
    let client = VerificationClient::from_config(&harness.config())
        .await
        .expect("connect");
    harness.break_chain_with_status(503).await;

    let err = client.verify("0xHASH1").await.expect_err("chain down");

    assert!(matches!(err, Error::Network(_)), "{err:?}");
    assert!(err.is_inconclusive());
}

#[tokio::test]
async fn test_rpc_error_is_inconclusive() {
    let harness = seeded().await;
    let client = VerificationClient::from_config(&harness.config())
        .await
        .expect("connect");
    harness.break_chain_with_rpc_error().await;

    let err = client.verify("0xHASH2").await.expect_err("rpc error");

    assert!(matches!(err, Error::Protocol(_)), "{err:?}");
    assert!(err.is_inconclusive());
}

#[tokio::test]
async fn test_deadline_covers_whole_verification() {
    let harness = seeded().await;
    harness
        .serve_document_slowly("doc1", &json!({"name": "Bag"}), Duration::from_secs(3))
        .await;
    let client = VerificationClient::from_config(&harness.config())
        .await
        .expect("connect");

    let err = client
        .verify_within("0xHASH2", Duration::from_millis(200))
        .await
        .expect_err("deadline");

    assert!(matches!(err, Error::Timeout(_)), "{err:?}");
    assert!(err.is_inconclusive());

    let result = client
        .verify_within("0xHASH1", Duration::from_secs(5))
        .await
        .expect("verify");
    assert_eq!(result.status, VerificationStatus::NotFound);
}

#[tokio::test]
async fn test_wrong_chain_is_rejected() {
    let harness = seeded().await;
    let mut config = harness.config();
    config.chain.chain_id = 1;

    let err = VerificationClient::from_config(&config)
        .await
        .err()
        .expect("wrong chain");

    assert!(
        matches!(
            err,
            Error::WrongChain {
                expected: 1,
                actual: 11_155_111
            }
        ),
        "{err:?}"
    );

    config.chain.verify_chain_id = false;
    let client = VerificationClient::from_config(&config)
        .await
        .expect("connect without check");
    let result = client.verify("0xHASH1").await.expect("verify");
    assert_eq!(result.status, VerificationStatus::NotFound);
}

#[tokio::test]
async fn test_blank_hash_makes_no_requests() {
    let harness = seeded().await;
    let client = VerificationClient::from_config(&harness.config())
        .await
        .expect("connect");

    let err = client.verify("   ").await.expect_err("blank");

    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(!err.is_inconclusive());
}
