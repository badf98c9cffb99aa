mod common;

use common::*;
use memory_query_connector::ReadKind;
use pretty_assertions::assert_eq;
use query_core::ResolverConfig;

#[tokio::test]
async fn every_association_is_read_once_per_level() {
    let api = TestApi::new();

    let response = api
        .query(
            r#"{
                users(first: 10) {
                    edges { node {
                        first_name
                        posts(first: 2) {
                            edges { node {
                                title
                                author { full_name }
                                comments(first: 5) { count edges { node { body } } }
                            } }
                        }
                    } }
                }
            }"#,
        )
        .await
        .unwrap();

    // Root users, then the posts' authors.
    assert_eq!(api.reads("users"), 2);
    assert_eq!(api.reads("posts"), 1);
    assert_eq!(api.reads("comments"), 2);
    assert_eq!(api.connector.query_log().len(), 5);

    let users = many(&response, "users");
    assert_eq!(ids(users), vec![4, 3, 1, 2]);

    let posts_per_user: Vec<Vec<i64>> = users.iter().map(|user| ids(user.many("posts").unwrap())).collect();
    assert_eq!(posts_per_user, vec![vec![6], vec![], vec![3, 2], vec![5, 4]]);

    let ada = users.iter().find(|user| id(user) == 1).unwrap();
    let latest = &ada.many("posts").unwrap().records[0];
    assert_eq!(string(latest.one("author").unwrap(), "full_name"), "Ada Lovelace");

    let alan = users.iter().find(|user| id(user) == 2).unwrap();
    let older = &alan.many("posts").unwrap().records[1];
    let comments = older.many("comments").unwrap();
    assert_eq!(comments.total_count, 1);
    assert_eq!(string(&comments.records[0], "body"), "nice");
}

#[tokio::test]
async fn many_parents_are_limited_per_group() {
    let api = TestApi::new();

    let response = api
        .query("{ users(first: 10) { edges { node { posts(first: 1) { edges { node { id } } } } } } }")
        .await
        .unwrap();

    let log = api.connector.query_log().for_table("posts");
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].kind, ReadKind::WindowedFetch);
    assert_eq!(log[0].take, Some(1));

    let latest: Vec<Vec<i64>> = many(&response, "users")
        .iter()
        .map(|user| ids(user.many("posts").unwrap()))
        .collect();

    assert_eq!(latest, vec![vec![6], vec![], vec![3], vec![5]]);
}

#[tokio::test]
async fn many_parents_page_backwards_per_group() {
    let api = TestApi::new();

    let response = api
        .query(
            r#"{
                users(first: 10) { edges { node {
                    posts(last: 1) { pageInfo { hasPreviousPage } edges { node { id } } }
                } } }
            }"#,
        )
        .await
        .unwrap();

    let oldest: Vec<(Vec<i64>, bool)> = many(&response, "users")
        .iter()
        .map(|user| {
            let posts = user.many("posts").unwrap();
            (ids(posts), posts.page_info.as_ref().unwrap().has_previous_page)
        })
        .collect();

    assert_eq!(
        oldest,
        vec![(vec![6], false), (vec![], false), (vec![1], true), (vec![4], true)]
    );

    // One extra row per author tells whether older posts exist.
    let log = api.connector.query_log().for_table("posts");
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].kind, ReadKind::WindowedFetch);
    assert_eq!(log[0].take, Some(2));
}

#[tokio::test]
async fn a_single_parent_uses_a_plain_limit() {
    let api = TestApi::new();

    let response = api
        .query("{ user(id: 1) { posts(first: 2) { edges { node { id } } } } }")
        .await
        .unwrap();

    let log = api.connector.query_log().for_table("posts");
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].kind, ReadKind::Fetch);
    assert_eq!(log[0].take, Some(2));

    let user = one(&response, "user").unwrap();
    assert_eq!(ids(user.many("posts").unwrap()), vec![3, 2]);
}

#[tokio::test]
async fn large_key_sets_are_split_into_chunks() {
    let api = TestApi::with(connector(), ResolverConfig::default().with_max_bind_values(2));

    let response = api
        .query("{ users(first: 10) { edges { node { posts(first: 1) { count edges { node { id } } } } } } }")
        .await
        .unwrap();

    let log = api.connector.query_log().for_table("posts");
    let windowed = log.iter().filter(|query| query.kind == ReadKind::WindowedFetch).count();
    let grouped = log.iter().filter(|query| query.kind == ReadKind::GroupedCount).count();

    assert_eq!(windowed, 2);
    assert_eq!(grouped, 2);

    let counts: Vec<usize> = many(&response, "users")
        .iter()
        .map(|user| user.many("posts").unwrap().total_count)
        .collect();

    assert_eq!(counts, vec![1, 0, 3, 2]);
}

#[tokio::test]
async fn parents_without_children_skip_the_next_level() {
    let api = TestApi::new();

    let response = api
        .query("{ user(id: 3) { posts(first: 5) { count edges { node { comments(first: 1) { count } } } } } }")
        .await
        .unwrap();

    let posts = one(&response, "user").unwrap().many("posts").unwrap();

    assert!(posts.is_empty());
    assert_eq!(posts.total_count, 0);
    assert_eq!(api.reads("comments"), 0);
}

#[tokio::test]
async fn declared_filters_restrict_children_and_counts() {
    let api = TestApi::new();

    let response = api
        .query("{ user(id: 1) { posts(first: 5, status: PUBLISHED) { totalCount edges { node { id } } } } }")
        .await
        .unwrap();

    let posts = one(&response, "user").unwrap().many("posts").unwrap();

    assert_eq!(ids(posts), vec![2, 1]);
    assert_eq!(posts.total_count, 2);
}
