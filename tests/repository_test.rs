mod common;

use common::{MemoryEngine, document};
use rat_quickmodel::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Account {
    owner: String,
    balance: i64,
}

fn repository() -> (Arc<MemoryEngine>, Repository<Account>) {
    let engine = Arc::new(MemoryEngine::new());
    let context = ModelContext::new(engine.clone());
    let repo = context
        .model::<Account>("Account", |f| {
            Ok(vec![
                f.field("owner").string()?.required().index(true),
                f.field("balance").number()?.min(0).default_value(0),
            ])
        })
        .unwrap()
        .build()
        .unwrap();
    (engine, repo)
}

#[tokio::test]
async fn test_none_filter_equals_empty_filter() {
    let (engine, repo) = repository();

    repo.find(None).await.unwrap();
    repo.find(Some(Vec::new())).await.unwrap();
    repo.count(None).await.unwrap();
    repo.count(Some(Vec::new())).await.unwrap();

    let calls = engine.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0], calls[1]);
    assert_eq!(calls[2], calls[3]);
    assert_eq!(calls[0].filter, Some(Vec::new()));
    assert!(calls.iter().all(|c| c.model == "Account"));
}

#[tokio::test]
async fn test_crud_round_trip() {
    let (_, repo) = repository();

    let created = repo
        .create(document(&[("owner", DataValue::from("alice")), ("balance", DataValue::Int(10))]))
        .await
        .unwrap()
        .expect_object()
        .unwrap();
    let id = created.get("id").and_then(DataValue::as_str).unwrap().to_string();

    repo.create_many(vec![
        document(&[("owner", DataValue::from("bob")), ("balance", DataValue::Int(5))]),
        document(&[("owner", DataValue::from("carol")), ("balance", DataValue::Int(50))]),
    ])
    .await
    .unwrap();

    assert_eq!(repo.count(None).await.unwrap(), 3);
    assert_eq!(repo.find(Some(vec![QueryCondition::gte("balance", 10)])).await.unwrap().len(), 2);
    assert!(repo.find_by_id(&id).await.unwrap().is_some());

    let updated = repo
        .find_by_id_and_update(
            &id,
            vec![UpdateOperation::increment("balance", 5)],
            Some(ModifyOptions::new().return_new()),
        )
        .await
        .unwrap()
        .unwrap()
        .expect_object()
        .unwrap();
    assert_eq!(updated.get("balance"), Some(&DataValue::Int(15)));

    let before = repo
        .find_one_and_update(
            vec![QueryCondition::eq("owner", "bob")],
            vec![UpdateOperation::set("balance", 6)],
            None,
        )
        .await
        .unwrap()
        .unwrap()
        .expect_object()
        .unwrap();
    assert_eq!(before.get("balance"), Some(&DataValue::Int(5)));

    let modified = repo
        .update(Vec::new(), vec![UpdateOperation::set("active", true)])
        .await
        .unwrap();
    assert_eq!(modified, 3);
    assert_eq!(
        repo.update_one(vec![QueryCondition::eq("owner", "carol")], vec![UpdateOperation::unset("active")])
            .await
            .unwrap(),
        1
    );

    let record = repo
        .find_one(Some(vec![QueryCondition::eq("owner", "carol")]))
        .await
        .unwrap()
        .unwrap()
        .expect_object()
        .unwrap();
    let account = Repository::<Account>::from_document(record).unwrap();
    assert_eq!(account, Account { owner: "carol".to_string(), balance: 50 });

    assert!(repo.find_one_and_delete(vec![QueryCondition::eq("owner", "bob")]).await.unwrap().is_some());
    assert!(repo.find_by_id_and_delete(&id).await.unwrap().is_some());
    assert_eq!(repo.delete_one(Vec::new()).await.unwrap(), 1);
    assert_eq!(repo.delete(Vec::new()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_operations_forwarded_verbatim() {
    let (engine, repo) = repository();
    let filter = vec![QueryCondition::eq("owner", "dave")];

    repo.update(filter.clone(), vec![UpdateOperation::set("balance", 1)]).await.unwrap();
    repo.delete(filter.clone()).await.unwrap();

    let stage = DataValue::from(serde_json::json!({"$match": {"owner": "dave"}}));
    let echoed = repo.aggregate(vec![stage.clone()]).await.unwrap();
    assert_eq!(echoed, vec![stage]);

    let operations: Vec<_> = engine.calls().iter().map(|c| c.operation).collect();
    assert_eq!(operations, vec!["update", "delete", "aggregate"]);
    assert_eq!(engine.calls()[0].filter, Some(filter));
}

#[tokio::test]
async fn test_engine_errors_propagate_unchanged() {
    let (engine, repo) = repository();
    engine.fail_with("连接已断开");

    let expect_query_error = |result: QuickModelError| match result {
        QuickModelError::QueryError { message } => assert_eq!(message, "连接已断开"),
        other => panic!("期望 QueryError，实际为 {:?}", other),
    };

    expect_query_error(repo.find(None).await.unwrap_err());
    expect_query_error(
        repo.update(vec![QueryCondition::eq("owner", "frank")], vec![UpdateOperation::set("balance", 2)])
            .await
            .unwrap_err(),
    );
    expect_query_error(repo.aggregate(Vec::new()).await.unwrap_err());

    let operations: Vec<_> = engine.calls().iter().map(|c| c.operation).collect();
    assert_eq!(operations, vec!["find", "update", "aggregate"]);
}

#[tokio::test]
async fn test_typed_document_helpers() {
    let (_, repo) = repository();
    let account = Account { owner: "erin".to_string(), balance: 3 };

    let created = repo.create(Repository::<Account>::to_document(&account).unwrap()).await.unwrap();
    let mut stored = created.expect_object().unwrap();
    stored.remove("id");
    assert_eq!(Repository::<Account>::from_document(stored).unwrap(), account);
}

#[tokio::test]
async fn test_default_index_sync_is_noop() {
    let (engine, repo) = repository();
    repo.sync_indexes().await.unwrap();
    assert!(engine.calls().is_empty());
    assert_eq!(repo.name(), "Account");
}

#[test]
fn test_blocking_count() {
    let (engine, repo) = repository();
    let count = tokio_test::block_on(repo.count(Some(vec![QueryCondition::eq("owner", "nobody")]))).unwrap();
    assert_eq!(count, 0);
    assert_eq!(engine.calls()[0].operation, "count");
}
