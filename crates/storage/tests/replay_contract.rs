//! Replays a mixed operation script against both stores and compares the
//! outcome with a plain model of the expected records.

use std::collections::BTreeMap;

use shared::{
    domain::{ClientId, ClientRecord},
    form::ClientFields,
};
use storage::{MemoryStore, RecordStore, SqliteStore};

enum Op {
    Create(&'static str),
    Update(i64, &'static str),
    Delete(i64),
}

const SCRIPT: &[Op] = &[
    Op::Create("Fry"),
    Op::Create("Leela"),
    Op::Create("Bender"),
    Op::Update(2, "Turanga Leela"),
    Op::Delete(1),
    Op::Create("Zoidberg"),
    Op::Delete(4),
    Op::Create("Amy"),
    Op::Update(3, "Bender B. Rodriguez"),
    Op::Delete(9),
];

async fn replay(store: &dyn RecordStore) -> Vec<ClientRecord> {
    let mut expected: BTreeMap<i64, String> = BTreeMap::new();
    let mut next_id = 1;

    for op in SCRIPT {
        match op {
            Op::Create(name) => {
                let created = store
                    .create(ClientFields::new(*name, format!("{name}@pe.com")))
                    .await
                    .expect("create")
                    .value;
                assert_eq!(created.id, ClientId(next_id));
                expected.insert(next_id, name.to_string());
                next_id += 1;
            }
            Op::Update(id, name) => {
                store
                    .update(ClientId(*id), ClientFields::new(*name, "crew@pe.com"))
                    .await
                    .expect("update");
                expected.insert(*id, name.to_string());
            }
            Op::Delete(id) => {
                let outcome = store.delete(ClientId(*id)).await;
                assert_eq!(outcome.is_ok(), expected.remove(id).is_some());
            }
        }
    }

    let records = store.list().await.expect("list");
    let actual: Vec<(i64, String)> = records.iter().map(|r| (r.id.0, r.name.clone())).collect();
    let wanted: Vec<(i64, String)> = expected.into_iter().collect();
    assert_eq!(actual, wanted);
    records
}

#[tokio::test]
async fn memory_and_sqlite_agree_on_replayed_script() {
    let memory = replay(&MemoryStore::new()).await;
    let sqlite_store = SqliteStore::new("sqlite::memory:").await.expect("db");
    let sqlite = replay(&sqlite_store).await;

    let names = |records: &[ClientRecord]| -> Vec<String> {
        records.iter().map(|r| r.name.clone()).collect()
    };
    assert_eq!(names(&memory), names(&sqlite));
    assert_eq!(
        names(&memory),
        vec!["Turanga Leela", "Bender B. Rodriguez", "Amy"]
    );
}
