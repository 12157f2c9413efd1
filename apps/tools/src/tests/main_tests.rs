use chrono::Utc;
use storage::{MemoryStore, RecordStore};

use super::*;

fn hermes() -> ClientRecord {
    ClientRecord {
        id: ClientId(1),
        name: "Hermes Conrad".to_string(),
        email: "hermes@planetexpress.com".to_string(),
        phone: Some("3000-0134".to_string()),
        address: Some("Bureaucrat Row, NNY".to_string()),
        created_at: Utc::now(),
    }
}

#[test]
fn left_out_flags_keep_stored_values() {
    let patch = FieldPatch {
        email: Some("conrad@central-bureaucracy.gov".to_string()),
        ..FieldPatch::default()
    };

    let fields = patch.apply(hermes());

    assert_eq!(fields.name, "Hermes Conrad");
    assert_eq!(fields.email, "conrad@central-bureaucracy.gov");
    assert_eq!(fields.phone.as_deref(), Some("3000-0134"));
    assert_eq!(fields.address.as_deref(), Some("Bureaucrat Row, NNY"));
}

#[test]
fn empty_patch_reproduces_the_record() {
    let record = hermes();
    let fields = FieldPatch::default().apply(record.clone());
    assert_eq!(
        fields,
        ClientFields {
            name: record.name,
            email: record.email,
            phone: record.phone,
            address: record.address,
        }
    );
}

#[tokio::test]
async fn empty_optional_flag_clears_the_stored_value() {
    let store = MemoryStore::with_records([hermes()]);
    let patch = FieldPatch {
        phone: Some(String::new()),
        ..FieldPatch::default()
    };

    let current = store.get(ClientId(1)).await.expect("hermes");
    let updated = store
        .update(ClientId(1), patch.apply(current))
        .await
        .expect("update");

    assert_eq!(updated.value.phone, None);
    assert_eq!(updated.value.address.as_deref(), Some("Bureaucrat Row, NNY"));
    assert_eq!(updated.value.name, "Hermes Conrad");
}
