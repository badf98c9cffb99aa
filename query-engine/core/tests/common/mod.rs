#![allow(dead_code)]

use memory_query_connector::InMemoryConnector;
use query_core::{CoreResult, QueryExecutor, ResolverConfig, ResultRecord, ResultSet};
use query_structure::*;
use std::sync::Arc;

pub type Response = query_core::Response;

fn full_name(values: &[GraphValue]) -> GraphValue {
    let parts: Vec<&str> = values.iter().filter_map(GraphValue::as_string).collect();
    GraphValue::from(parts.join(" "))
}

fn newest_first() -> OrderExpression {
    OrderExpression::new(vec![OrderBy::desc("created_at")])
}

/// Users write posts and publish photos; posts collect comments. Posts and photos together form
/// the `FeedItem` interface.
pub fn schema() -> Schema {
    Schema::builder()
        .object_type(
            ObjectType::new("User", "users")
                .with_attribute(Attribute::scalar("id", ScalarKind::Id))
                .with_attribute(Attribute::scalar("first_name", ScalarKind::String))
                .with_attribute(Attribute::scalar("last_name", ScalarKind::String))
                .with_attribute(Attribute::computed(
                    "full_name",
                    ScalarKind::String,
                    &["first_name", "last_name"],
                    full_name,
                ))
                .with_association(
                    Association::one_to_many("posts", "Post", "id", "author_id", newest_first())
                        .with_filter(DeclaredFilter::new("status", "status", FilterCondition::Equals)),
                )
                .with_association(Association::one_to_many("feed", "FeedItem", "id", "author_id", newest_first())),
        )
        .object_type(
            ObjectType::new("Post", "posts")
                .with_attribute(Attribute::scalar("id", ScalarKind::Id))
                .with_attribute(Attribute::scalar("title", ScalarKind::String))
                .with_attribute(Attribute::scalar("status", ScalarKind::Enum))
                .with_attribute(Attribute::scalar("created_at", ScalarKind::Int))
                .with_association(Association::many_to_one("author", "User", "author_id", "id").required())
                .with_association(Association::one_to_many(
                    "comments",
                    "Comment",
                    "id",
                    "post_id",
                    OrderExpression::new(vec![OrderBy::asc("id")]),
                )),
        )
        .object_type(
            ObjectType::new("Comment", "comments")
                .with_attribute(Attribute::scalar("id", ScalarKind::Id))
                .with_attribute(Attribute::scalar("body", ScalarKind::String))
                .with_association(Association::many_to_one("post", "Post", "post_id", "id").required()),
        )
        .object_type(
            ObjectType::new("Photo", "photos")
                .with_attribute(Attribute::scalar("id", ScalarKind::Id))
                .with_attribute(Attribute::scalar("url", ScalarKind::String))
                .with_attribute(Attribute::scalar("created_at", ScalarKind::Int))
                .with_association(Association::many_to_one("author", "User", "author_id", "id").required()),
        )
        .interface(Interface::new("FeedItem", ["Post", "Photo"]))
        .root_field(RootField::single("user", "User"))
        .root_field(RootField::connection(
            "users",
            "User",
            OrderExpression::new(vec![OrderBy::asc("last_name")]),
        ))
        .root_field(
            RootField::connection("posts", "Post", newest_first())
                .with_filter(DeclaredFilter::new("status", "status", FilterCondition::Equals)),
        )
        .root_field(RootField::connection("feed", "FeedItem", newest_first()))
        .root_field(RootField::single("node", "FeedItem"))
        .build()
        .unwrap()
}

fn published(published: bool) -> GraphValue {
    GraphValue::Enum(if published { "PUBLISHED" } else { "DRAFT" }.to_owned())
}

/// Four users, of which Grace has written nothing. Ada has three posts and two photos.
pub fn connector() -> InMemoryConnector {
    let mut connector = InMemoryConnector::new()
        .with_table("users")
        .with_table("posts")
        .with_table("comments")
        .with_table("photos");

    for (id, first_name, last_name) in [
        (1, "Ada", "Lovelace"),
        (2, "Alan", "Turing"),
        (3, "Grace", "Hopper"),
        (4, "Edsger", "Dijkstra"),
    ] {
        connector.insert(
            "users",
            [
                ("id", GraphValue::Int(id)),
                ("first_name", GraphValue::from(first_name)),
                ("last_name", GraphValue::from(last_name)),
            ],
        );
    }

    for (id, author_id, created_at, is_published) in [
        (1, 1, 100, true),
        (2, 1, 200, true),
        (3, 1, 300, false),
        (4, 2, 150, true),
        (5, 2, 250, true),
        (6, 4, 120, true),
    ] {
        connector.insert(
            "posts",
            [
                ("id", GraphValue::Int(id)),
                ("author_id", GraphValue::Int(author_id)),
                ("title", GraphValue::from(format!("Post {id}"))),
                ("status", published(is_published)),
                ("created_at", GraphValue::Int(created_at)),
            ],
        );
    }

    for (id, post_id, body) in [(1, 1, "first"), (2, 1, "second"), (3, 4, "nice")] {
        connector.insert(
            "comments",
            [
                ("id", GraphValue::Int(id)),
                ("post_id", GraphValue::Int(post_id)),
                ("body", GraphValue::from(body)),
            ],
        );
    }

    for (id, author_id, created_at) in [(1, 1, 260), (2, 1, 50), (3, 2, 175)] {
        connector.insert(
            "photos",
            [
                ("id", GraphValue::Int(id)),
                ("author_id", GraphValue::Int(author_id)),
                ("url", GraphValue::from(format!("https://img.example/{id}.png"))),
                ("created_at", GraphValue::Int(created_at)),
            ],
        );
    }

    connector
}

pub struct TestApi {
    pub executor: QueryExecutor,
    pub connector: Arc<InMemoryConnector>,
}

impl TestApi {
    pub fn new() -> Self {
        Self::with(connector(), ResolverConfig::default())
    }

    pub fn with(connector: InMemoryConnector, config: ResolverConfig) -> Self {
        let connector = Arc::new(connector);
        let executor = QueryExecutor::new(Arc::new(schema()), connector.clone(), config);

        Self { executor, connector }
    }

    pub async fn query(&self, query: &str) -> CoreResult<Response> {
        self.executor.execute_graphql(query, None, &serde_json::Map::new()).await
    }

    pub async fn query_with_variables(&self, query: &str, variables: serde_json::Value) -> CoreResult<Response> {
        let variables = match variables {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };

        self.executor.execute_graphql(query, None, &variables).await
    }

    /// Number of reads issued against `table` so far.
    pub fn reads(&self, table: &str) -> usize {
        self.connector.query_log().for_table(table).len()
    }
}

pub fn many<'a>(response: &'a Response, key: &str) -> &'a ResultSet {
    response[key].as_many().unwrap()
}

pub fn one<'a>(response: &'a Response, key: &str) -> Option<&'a ResultRecord> {
    response[key].as_one()
}

pub fn ids(set: &ResultSet) -> Vec<i64> {
    set.iter().map(|record| id(record)).collect()
}

pub fn typed_ids(set: &ResultSet) -> Vec<(String, i64)> {
    set.iter().map(|record| (record.type_name().to_owned(), id(record))).collect()
}

pub fn id(record: &ResultRecord) -> i64 {
    record.id().and_then(GraphValue::as_i64).unwrap()
}

pub fn string(record: &ResultRecord, attribute: &str) -> String {
    record.attribute(attribute).unwrap().into_string().unwrap()
}
