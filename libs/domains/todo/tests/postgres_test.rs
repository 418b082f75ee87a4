//! Runs against a real PostgreSQL container; `cargo test -- --ignored` with Docker available.

use domain_todo::{PgTodoStore, TodoError, TodoService};
use rpc::todo::v1::{
    CreateRequest, DeleteRequest, ReadAllRequest, ReadRequest, ToDo, UpdateRequest,
};
use test_utils::assertions::assert_same_content;
use test_utils::{TestDataBuilder, TestDatabase};
use tonic::Code;

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_postgres_scenario() {
    let db = TestDatabase::new().await;
    let service = TodoService::new(PgTodoStore::new(db.pool()));
    let builder = TestDataBuilder::from_test_name("test_postgres_scenario");
    let original = builder.todo("milk");

    let id = service
        .create(CreateRequest {
            api: "v1".into(),
            to_do: Some(original.clone()),
        })
        .await
        .unwrap()
        .id;
    assert!(id > 0);

    let read = service
        .read(ReadRequest {
            api: "v1".into(),
            id,
        })
        .await
        .unwrap()
        .to_do
        .unwrap();
    assert_same_content(&read, &original, "postgres read");

    let updated = service
        .update(UpdateRequest {
            api: "v1".into(),
            to_do: Some(ToDo {
                id,
                title: "buy oat milk".into(),
                ..original.clone()
            }),
        })
        .await
        .unwrap();
    assert_eq!(updated.updated, 1);

    let all = service
        .read_all(ReadAllRequest { api: "v1".into() })
        .await
        .unwrap()
        .to_dos;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "buy oat milk");

    let request = DeleteRequest {
        api: "v1".into(),
        id,
    };
    assert_eq!(service.delete(request.clone()).await.unwrap().deleted, 1);
    assert_eq!(
        service.delete(request).await.unwrap_err().code(),
        Code::NotFound
    );

    let err = service
        .read(ReadRequest {
            api: "v1".into(),
            id,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TodoError::NotFound(_)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_postgres_update_missing_is_not_found() {
    let db = TestDatabase::new().await;
    let service = TodoService::new(PgTodoStore::new(db.pool()));
    let mut ghost = TestDataBuilder::from_test_name("ghost").todo("ghost");
    ghost.id = 4242;

    let err = service
        .update(UpdateRequest {
            api: "v1".into(),
            to_do: Some(ghost),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::NotFound);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_postgres_closed_pool_is_unavailable() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let service = TodoService::new(PgTodoStore::new(pool.clone()));
    pool.close().await;

    let err = service
        .read_all(ReadAllRequest { api: "v1".into() })
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::Unavailable);
}
