mod common;

use common::*;
use pretty_assertions::assert_eq;
use query_core::{CoreError, GraphQLProtocolAdapter, ResolverConfig, UserFacingErrorKind};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const NESTED: &str = "{ users(first: 10) { edges { node { posts(first: 2) { edges { node { id } } } } } } }";

#[tokio::test]
async fn connector_failures_fail_the_whole_resolution() {
    let api = TestApi::with(connector().failing_on("posts"), ResolverConfig::default());

    let err = api.query(NESTED).await.unwrap_err();

    assert!(matches!(err, CoreError::ConnectorError(_)));

    let user_facing = err.user_facing();
    assert_eq!(user_facing.kind, UserFacingErrorKind::DataAccess);
    assert!(!user_facing.message.contains("posts"));
}

#[tokio::test]
async fn cancelled_resolutions_stop_early() {
    let api = TestApi::new();
    let document = GraphQLProtocolAdapter::parse(NESTED, None, &serde_json::Map::new()).unwrap();

    let token = CancellationToken::new();
    token.cancel();

    let err = api
        .executor
        .execute_with_cancellation(&document, token)
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Cancelled));
    assert_eq!(err.user_facing().kind, UserFacingErrorKind::Cancelled);
}

#[tokio::test]
async fn cancellation_interrupts_pending_reads() {
    let api = TestApi::with(
        connector().with_latency(Duration::from_millis(200)),
        ResolverConfig::default(),
    );
    let document = GraphQLProtocolAdapter::parse(NESTED, None, &serde_json::Map::new()).unwrap();

    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let err = api
        .executor
        .execute_with_cancellation(&document, token)
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Cancelled));
    assert_eq!(api.reads("posts"), 0);
}

#[tokio::test]
async fn slow_resolutions_time_out() {
    let api = TestApi::with(
        connector().with_latency(Duration::from_millis(200)),
        ResolverConfig::default().with_query_timeout(Duration::from_millis(20)),
    );

    let err = api.query(NESTED).await.unwrap_err();

    assert!(matches!(err, CoreError::Timeout(limit) if limit == Duration::from_millis(20)));
    assert_eq!(err.user_facing().kind, UserFacingErrorKind::Cancelled);
}

#[tokio::test]
async fn a_concurrency_limit_of_one_still_resolves_everything() {
    let api = TestApi::with(connector(), ResolverConfig::default().with_concurrency_limit(1));

    let response = api
        .query("{ user(id: 1) { posts(first: 3) { count } feed(first: 3) { count } } }")
        .await
        .unwrap();

    let user = one(&response, "user").unwrap();

    assert_eq!(user.many("posts").unwrap().total_count, 3);
    assert_eq!(user.many("feed").unwrap().total_count, 5);
}
