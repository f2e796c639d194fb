//! Integration tests for armature-doctype

use armature_doctype::*;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Transport that records every request and answers from a script.
///
/// When the script runs out it answers `200 {}`.
#[derive(Default)]
struct RecordingTransport {
    requests: Mutex<Vec<Request>>,
    replies: Mutex<VecDeque<Result<Response>>>,
}

impl RecordingTransport {
    fn reply(&self, status: u16, body: Value) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(Response::new(status, body)));
    }

    fn fail(&self, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(DocTypeError::Transport(message.to_string())));
    }

    fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    fn last(&self) -> Request {
        self.requests().pop().expect("no request was sent")
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn perform(&self, request: Request) -> Result<Response> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Response::new(200, json!({}))))
    }
}

fn setup(auto_populate: bool) -> (Arc<RecordingTransport>, Type) {
    let transport = Arc::new(RecordingTransport::default());
    let config = OpenSearchConfig::default().with_auto_populate(auto_populate);
    let client = Client::with_transport(transport.clone(), config);
    let user = client.index("users").get_type("user");
    (transport, user)
}

fn options(pairs: &[(&str, Value)]) -> Options {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

// =============================================================================
// add
// =============================================================================

#[tokio::test]
async fn test_add_with_id_puts_at_id() {
    let (transport, user) = setup(false);
    let mut doc = Document::new("1", json!({ "name": "hans" }));

    user.add(&mut doc).await.unwrap();

    let request = transport.last();
    assert_eq!(request.method, Method::Put);
    assert_eq!(request.path, "users/user/1");
    assert_eq!(request.json(), Some(&json!({ "name": "hans" })));
}

#[tokio::test]
async fn test_add_without_id_posts_to_type_root() {
    let (transport, user) = setup(false);
    let mut doc = Document::from_data(json!({ "name": "hans" }));

    user.add(&mut doc).await.unwrap();

    let request = transport.last();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.path, "users/user/");
}

#[tokio::test]
async fn test_add_encodes_id() {
    let (transport, user) = setup(false);
    let mut doc = Document::new("a b/c", json!({}));

    user.add(&mut doc).await.unwrap();

    assert_eq!(transport.last().path, "users/user/a%20b%2Fc");
}

#[tokio::test]
async fn test_add_auto_populates_id_and_version() {
    let (transport, user) = setup(true);
    transport.reply(201, json!({ "_id": "generated", "_version": 1 }));
    let mut doc = Document::from_data(json!({ "name": "hans" }));

    user.add(&mut doc).await.unwrap();

    assert_eq!(doc.id, "generated");
    assert_eq!(doc.version, Some(1));
    assert_eq!(doc.type_name.as_deref(), Some("user"));
    assert_eq!(doc.index.as_deref(), Some("users"));
}

#[tokio::test]
async fn test_add_without_auto_populate_keeps_empty_id() {
    let (transport, user) = setup(false);
    transport.reply(201, json!({ "_id": "generated", "_version": 4 }));
    let mut doc = Document::from_data(json!({}));

    user.add(&mut doc).await.unwrap();

    assert_eq!(doc.id, "");
    assert_eq!(doc.version, Some(4));
}

#[tokio::test]
async fn test_document_overrides_auto_populate() {
    let (transport, user) = setup(false);
    transport.reply(201, json!({ "_id": "generated" }));
    let mut doc = Document::from_data(json!({})).with_auto_populate(true);

    user.add(&mut doc).await.unwrap();

    assert_eq!(doc.id, "generated");
    assert_eq!(doc.version, None);
}

#[tokio::test]
async fn test_type_default_enables_auto_populate_for_every_document() {
    let (transport, user) = setup(true);
    transport.reply(201, json!({ "_id": "generated", "_version": 1 }));
    let mut doc = Document::from_data(json!({})).with_auto_populate(false);

    user.add(&mut doc).await.unwrap();

    assert_eq!(doc.id, "generated");
    assert_eq!(doc.version, Some(1));
}

#[tokio::test]
async fn test_add_keeps_existing_id() {
    let (transport, user) = setup(true);
    transport.reply(200, json!({ "_id": "other", "_version": 2 }));
    let mut doc = Document::new("mine", json!({}));

    user.add(&mut doc).await.unwrap();

    assert_eq!(doc.id, "mine");
    assert_eq!(doc.version, Some(2));
}

#[tokio::test]
async fn test_add_filters_options() {
    let (transport, user) = setup(false);
    let mut doc = Document::new("1", json!({}))
        .with_option("version", 1)
        .with_option("bogus", "x");

    user.add(&mut doc).await.unwrap();

    assert_eq!(transport.last().query, options(&[("version", json!(1))]));
}

#[tokio::test]
async fn test_add_surfaces_transport_errors() {
    let (transport, user) = setup(true);
    transport.reply(409, json!({ "error": { "reason": "version conflict" } }));
    let mut doc = Document::from_data(json!({}));

    let err = user.add(&mut doc).await.unwrap_err();

    assert_eq!(err.status_code(), Some(409));
    assert_eq!(doc.id, "");

    transport.fail("connection reset");
    let err = user.add(&mut doc).await.unwrap_err();
    assert!(matches!(err, DocTypeError::Transport(_)));
}

// =============================================================================
// add_object / add_objects
// =============================================================================

#[derive(Serialize)]
struct User {
    name: String,
}

fn hans() -> User {
    User {
        name: "hans".to_string(),
    }
}

#[tokio::test]
async fn test_add_object_requires_serializer() {
    let transport = Arc::new(RecordingTransport::default());
    let client = Client::with_transport(transport.clone(), OpenSearchConfig::default());
    let user: Type<User> = client.index("users").get_typed("user");

    let err = user.add_object(&hans(), None).await.unwrap_err();
    assert!(matches!(err, DocTypeError::Configuration(_)));

    let err = user.add_objects(&[hans()]).await.unwrap_err();
    assert!(matches!(err, DocTypeError::Configuration(_)));

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_add_object_sends_serialized_payload() {
    let transport = Arc::new(RecordingTransport::default());
    let client = Client::with_transport(transport.clone(), OpenSearchConfig::default());
    let serialize = |user: &User| -> Result<Value> {
        Ok(json!({ "name": user.name.to_uppercase(), "kind": "user" }))
    };
    let user = client
        .index("users")
        .get_typed::<User>("user")
        .with_serializer(serialize);
    transport.reply(201, json!({ "_id": "1", "_version": 1 }));

    let template = Document::new("1", Value::Null).with_option("refresh", true);
    let (doc, response) = user.add_object(&hans(), Some(template)).await.unwrap();

    let request = transport.last();
    assert_eq!(request.json(), Some(&serialize(&hans()).unwrap()));
    assert_eq!(request.path, "users/user/1");
    assert_eq!(request.query, options(&[("refresh", json!(true))]));
    assert_eq!(doc.version, Some(1));
    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn test_add_objects_uses_bulk() {
    let transport = Arc::new(RecordingTransport::default());
    let client = Client::with_transport(transport.clone(), OpenSearchConfig::default());
    let user = client
        .index("users")
        .get_typed::<User>("user")
        .with_serializer(SerdeSerializer);
    transport.reply(
        200,
        json!({
            "took": 1,
            "errors": false,
            "items": [
                { "index": { "_index": "users", "_type": "user", "_id": "a", "status": 201 } },
                { "index": { "_index": "users", "_type": "user", "_id": "b", "status": 201 } }
            ]
        }),
    );

    let set = user.add_objects(&[hans(), hans()]).await.unwrap();
    assert!(set.is_ok());
    assert_eq!(set.len(), 2);

    let request = transport.last();
    assert_eq!(request.path, "_bulk");
    assert_eq!(
        request.body,
        Some(Body::Lines(vec![
            json!({ "index": { "_index": "users", "_type": "user" } }),
            json!({ "name": "hans" }),
            json!({ "index": { "_index": "users", "_type": "user" } }),
            json!({ "name": "hans" }),
        ]))
    );
}

// =============================================================================
// add_documents
// =============================================================================

#[tokio::test]
async fn test_add_documents_stamps_type() {
    let (transport, user) = setup(false);
    let mut docs = vec![
        Document::new("1", json!({ "n": 1 })).with_type("other"),
        Document::new("2", json!({ "n": 2 })),
    ];

    user.add_documents(&mut docs).await.unwrap();

    assert_eq!(docs[0].type_name.as_deref(), Some("user"));
    assert_eq!(docs[1].type_name.as_deref(), Some("user"));

    let request = transport.last();
    assert_eq!(request.method, Method::Post);
    let Some(Body::Lines(lines)) = request.body else {
        panic!("bulk body expected");
    };
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        json!({ "index": { "_index": "users", "_type": "user", "_id": "1" } })
    );
}

#[tokio::test]
async fn test_add_documents_empty_sends_nothing() {
    let (transport, user) = setup(false);

    let set = user.add_documents(&mut []).await.unwrap();

    assert!(set.is_empty());
    assert!(transport.requests().is_empty());
}

// =============================================================================
// update
// =============================================================================

#[tokio::test]
async fn test_update_without_id_sends_nothing() {
    let (transport, user) = setup(false);

    let err = user
        .update(Document::from_data(json!({ "name": "x" })))
        .await
        .unwrap_err();
    assert!(matches!(err, DocTypeError::Validation(_)));

    let err = user.update(Script::new("ctx._source.n += 1")).await.unwrap_err();
    assert!(matches!(err, DocTypeError::Validation(_)));

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_update_with_script() {
    let (transport, user) = setup(false);
    let script = Script::new("ctx._source.n += params.by")
        .with_id("7")
        .with_param("by", 2)
        .with_option("retry_on_conflict", 3)
        .with_option("op_type", "create");

    user.update(script).await.unwrap();

    let request = transport.last();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.path, "users/user/7/_update");
    assert_eq!(request.query, options(&[("retry_on_conflict", json!(3))]));
    assert_eq!(
        request.json(),
        Some(&json!({ "script": { "source": "ctx._source.n += params.by", "params": { "by": 2 } } }))
    );
}

#[tokio::test]
async fn test_update_with_document() {
    let (transport, user) = setup(false);

    user.update(Document::new("7", json!({ "name": "new" })))
        .await
        .unwrap();

    assert_eq!(transport.last().json(), Some(&json!({ "doc": { "name": "new" } })));
}

// =============================================================================
// get_document
// =============================================================================

#[tokio::test]
async fn test_get_document_transport_failure_is_not_found() {
    let (transport, user) = setup(false);
    transport.fail("connection refused");

    let err = user.get_document("missing-id", &Options::new()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_get_document_error_status_is_not_found() {
    let (transport, user) = setup(false);
    transport.reply(404, json!({ "_id": "missing-id", "found": false }));

    let err = user.get_document("missing-id", &Options::new()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_get_document_exists_false_is_not_found() {
    let (transport, user) = setup(false);
    transport.reply(200, json!({ "_id": "missing-id", "exists": false }));

    let err = user.get_document("missing-id", &Options::new()).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Document not found: users/user/missing-id"
    );
}

#[tokio::test]
async fn test_get_document_without_source() {
    let (transport, user) = setup(false);
    transport.reply(200, json!({ "_id": "1", "_version": 5, "exists": true }));

    let doc = user
        .get_document("1", &options(&[("routing", json!("r1"))]))
        .await
        .unwrap();

    assert_eq!(doc.data, json!({}));
    assert_eq!(doc.version, Some(5));
    assert_eq!(transport.last().method, Method::Get);
    assert_eq!(transport.last().query, options(&[("routing", json!("r1"))]));
}

#[tokio::test]
async fn test_round_trip() {
    let (transport, user) = setup(false);
    let data = json!({ "name": "hans", "tags": ["a", "b"] });
    transport.reply(201, json!({ "_id": "1", "_version": 3 }));

    let mut doc = user.create_document("1", data.clone());
    let response = user.add(&mut doc).await.unwrap();

    transport.reply(
        200,
        json!({ "_id": "1", "_version": 3, "exists": true, "_source": data.clone() }),
    );
    let fetched = user.get_document("1", &Options::new()).await.unwrap();

    assert_eq!(fetched.data, data);
    assert_eq!(fetched.version, response.version());
    assert_eq!(fetched.id, doc.id);
}

// =============================================================================
// delete
// =============================================================================

#[tokio::test]
async fn test_delete_by_id_rejects_blank_ids() {
    let (transport, user) = setup(false);

    for id in ["", "   ", "\t\n"] {
        let err = user.delete_by_id(id, &Options::new()).await.unwrap_err();
        assert!(matches!(err, DocTypeError::InvalidArgument(_)));
    }

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_delete_by_id_found() {
    let (transport, user) = setup(false);
    transport.reply(200, json!({ "found": true, "_id": "1" }));
    user.delete_by_id("1", &Options::new()).await.unwrap();

    transport.reply(200, json!({ "_id": "1" }));
    user.delete_by_id("1", &Options::new()).await.unwrap();

    let request = transport.last();
    assert_eq!(request.method, Method::Delete);
    assert_eq!(request.path, "users/user/1");
}

#[tokio::test]
async fn test_delete_by_id_not_found() {
    let (transport, user) = setup(false);
    transport.reply(404, json!({ "found": false, "_id": "1" }));

    let err = user.delete_by_id("1", &Options::new()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_by_id_result_not_found() {
    let (transport, user) = setup(false);
    transport.reply(404, json!({ "_id": "1", "_version": 1, "result": "not_found" }));

    let err = user.delete_by_id("1", &Options::new()).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn test_delete_document_uses_delete_whitelist() {
    let (transport, user) = setup(false);
    let doc = Document::new("1", json!({}))
        .with_option("routing", "r1")
        .with_option("percolate", "*");

    user.delete_document(&doc).await.unwrap();

    assert_eq!(transport.last().query, options(&[("routing", json!("r1"))]));
}

#[tokio::test]
async fn test_delete_ids_uses_bulk() {
    let (transport, user) = setup(false);

    user.delete_ids(&["1", "2"]).await.unwrap();

    let request = transport.last();
    assert_eq!(request.path, "_bulk");
    assert_eq!(
        request.body,
        Some(Body::Lines(vec![
            json!({ "delete": { "_index": "users", "_type": "user", "_id": "1" } }),
            json!({ "delete": { "_index": "users", "_type": "user", "_id": "2" } }),
        ]))
    );
}

#[tokio::test]
async fn test_delete_by_query() {
    let (transport, user) = setup(false);

    user.delete_by_query(Query::term("name", "hans")).await.unwrap();

    let request = transport.last();
    assert_eq!(request.method, Method::Delete);
    assert_eq!(request.path, "users/user/_query");
    assert_eq!(
        request.json(),
        Some(&json!({ "query": { "term": { "name": "hans" } } }))
    );
}

#[tokio::test]
async fn test_delete_type() {
    let (transport, user) = setup(false);

    user.delete().await.unwrap();

    let request = transport.last();
    assert_eq!(request.method, Method::Delete);
    assert_eq!(request.path, "users/user/");
}

// =============================================================================
// search and mapping
// =============================================================================

#[tokio::test]
async fn test_search_scoped_to_type() {
    let (transport, user) = setup(false);
    transport.reply(
        200,
        json!({ "took": 2, "hits": { "total": 1, "hits": [
            { "_index": "users", "_type": "user", "_id": "1", "_source": { "name": "hans" } }
        ] } }),
    );

    let results = user
        .search("name:hans", &options(&[("limit", json!(10))]))
        .await
        .unwrap();

    assert_eq!(results.total, 1);
    assert_eq!(results.hits[0].id, "1");

    let request = transport.last();
    assert_eq!(request.path, "users/user/_search");
    assert_eq!(request.json().unwrap()["size"], json!(10));
}

#[tokio::test]
async fn test_count() {
    let (transport, user) = setup(false);
    transport.reply(200, json!({ "count": 42 }));

    assert_eq!(user.count(()).await.unwrap(), 42);
    assert_eq!(transport.last().path, "users/user/_count");
    assert_eq!(
        transport.last().json(),
        Some(&json!({ "query": { "match_all": {} } }))
    );
}

#[tokio::test]
async fn test_more_like_this() {
    let (transport, user) = setup(false);
    transport.reply(200, json!({ "hits": { "total": 0, "hits": [] } }));
    let doc = Document::new("1", json!({}));

    let results = user
        .more_like_this(&doc, &options(&[("min_term_freq", json!(1))]), Query::term("lang", "en"))
        .await
        .unwrap();

    assert!(results.is_empty());
    assert_eq!(
        results.query().clause(),
        Some(&Query::term("lang", "en"))
    );

    let request = transport.last();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.path, "users/user/1/_mlt");
    assert_eq!(request.query, options(&[("min_term_freq", json!(1))]));
}

#[tokio::test]
async fn test_more_like_this_empty_id_path() {
    let (transport, user) = setup(false);
    transport.reply(200, json!({ "hits": { "total": 0, "hits": [] } }));

    user.more_like_this(&Document::default(), &Options::new(), ())
        .await
        .unwrap();

    assert_eq!(transport.last().path, "users/user//_mlt");
}

#[tokio::test]
async fn test_set_mapping_from_raw_properties() {
    let (transport, user) = setup(false);

    user.set_mapping(json!({ "name": { "type": "text" } }))
        .await
        .unwrap();

    let request = transport.last();
    assert_eq!(request.method, Method::Put);
    assert_eq!(request.path, "users/user/_mapping");
    assert_eq!(
        request.json(),
        Some(&json!({ "user": { "properties": { "name": { "type": "text" } } } }))
    );
}

#[tokio::test]
async fn test_get_mapping_returns_raw_payload() {
    let (transport, user) = setup(false);
    let payload = json!({ "users": { "mappings": { "user": { "properties": {} } } } });
    transport.reply(200, payload.clone());

    assert_eq!(user.get_mapping().await.unwrap(), payload);
    assert_eq!(transport.last().path, "users/user/_mapping");
}

#[tokio::test]
async fn test_type_exists() {
    let (transport, user) = setup(false);
    transport.reply(404, json!({}));
    assert!(!user.exists().await.unwrap());

    transport.reply(200, json!({ "users": {} }));
    assert!(user.exists().await.unwrap());
}
