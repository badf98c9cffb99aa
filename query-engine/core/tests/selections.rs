mod common;

use common::*;
use pretty_assertions::assert_eq;
use query_core::{CoreError, QueryGraphBuilderError, QueryParserErrorKind, UserFacingErrorKind};

#[tokio::test]
async fn aliases_resolve_independently() {
    let api = TestApi::new();

    let response = api
        .query("{ ada: user(id: 1) { first_name } alan: user(id: 2) { last_name } }")
        .await
        .unwrap();

    let keys: Vec<&String> = response.keys().collect();
    assert_eq!(keys, vec!["ada", "alan"]);

    assert_eq!(string(one(&response, "ada").unwrap(), "first_name"), "Ada");
    assert_eq!(string(one(&response, "alan").unwrap(), "last_name"), "Turing");
}

#[tokio::test]
async fn repeated_fields_are_merged() {
    let api = TestApi::new();

    let response = api
        .query("{ user(id: 1) { first_name } user(id: 1) { last_name full_name } }")
        .await
        .unwrap();

    let user = one(&response, "user").unwrap();

    assert_eq!(response.len(), 1);
    assert_eq!(string(user, "first_name"), "Ada");
    assert_eq!(string(user, "full_name"), "Ada Lovelace");
    assert_eq!(api.reads("users"), 1);
}

#[tokio::test]
async fn conflicting_arguments_under_one_key_are_rejected() {
    let api = TestApi::new();

    let err = api
        .query("{ user(id: 1) { posts(first: 1) { count } posts(first: 2) { count } } }")
        .await
        .unwrap_err();

    match &err {
        CoreError::QueryParserError(err) => {
            assert_eq!(err.path.to_string(), "Query.user.posts");
            assert_eq!(err.error_kind, QueryParserErrorKind::DuplicateField { field: "posts".into() });
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(err.user_facing().kind, UserFacingErrorKind::QueryValidation);
    assert_eq!(api.connector.query_log().len(), 0);
}

#[tokio::test]
async fn named_fragments_and_variables() {
    let api = TestApi::new();

    let response = api
        .query_with_variables(
            r#"
                query Author($id: ID!) { user(id: $id) { ...Names } }
                fragment Names on User { first_name last_name }
            "#,
            serde_json::json!({ "id": 4 }),
        )
        .await
        .unwrap();

    let user = one(&response, "user").unwrap();

    assert_eq!(string(user, "first_name"), "Edsger");
    assert_eq!(string(user, "last_name"), "Dijkstra");
}

#[tokio::test]
async fn unknown_records_resolve_to_nothing() {
    let api = TestApi::new();

    let response = api.query("{ user(id: 42) { id } }").await.unwrap();

    assert!(one(&response, "user").is_none());
}

#[tokio::test]
async fn unknown_fields_name_their_position() {
    let api = TestApi::new();

    let err = api.query("{ user(id: 1) { email } }").await.unwrap_err();

    match &err {
        CoreError::QueryGraphBuilderError(QueryGraphBuilderError::UnsupportedField { field, type_name, .. }) => {
            assert_eq!(field, "email");
            assert_eq!(type_name, "User");
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(err.user_facing().message.contains("email"));
}

#[tokio::test]
async fn unknown_arguments_are_rejected() {
    let api = TestApi::new();

    let err = api
        .query("{ user(id: 1) { posts(first: 1, colour: RED) { count } } }")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CoreError::QueryGraphBuilderError(QueryGraphBuilderError::UnknownArgument { .. })
    ));
}

#[tokio::test]
async fn syntax_errors_are_malformed_queries() {
    let api = TestApi::new();

    let err = api.query("{ user(id: 1) { id }").await.unwrap_err();

    assert!(err.is_malformed_query());
}
