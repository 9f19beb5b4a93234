use skema_domain::entity::Entity;
use skema_domain::events::{self, PushEvent};
use skema_domain::field::{Field, FieldType};
use skema_domain::store::{Store, StoreSet};

fn field(id: &str, name: &str) -> Field {
    Field {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        field_type: FieldType::String,
        default_value: None,
        is_required: false,
        message_id: Some("m-1".to_string()),
        parent_field_id: None,
        created_date: None,
        last_modified_date: None,
    }
}

fn nested_field(id: &str, name: &str, parent_field_id: &str) -> Field {
    Field {
        message_id: None,
        parent_field_id: Some(parent_field_id.to_string()),
        ..field(id, name)
    }
}

#[tokio::test]
async fn upsert_then_lookup_then_delete() {
    let store: Store<Field> = Store::new();
    assert!(store.is_empty().await);

    store.upsert(field("1", "Widget")).await;
    let found = store.by_id("1").await.expect("entity present after upsert");
    assert_eq!(found.name, "Widget");

    // A delete push event for the same id goes through the same remove.
    store.remove("1").await;
    assert!(store.by_id("1").await.is_none());
}

#[tokio::test]
async fn upsert_is_idempotent() {
    let store: Store<Field> = Store::new();
    let entity = field("f-1", "amount");
    store.upsert(entity.clone()).await;
    let once = store.all().await;
    store.upsert(entity).await;
    let twice = store.all().await;
    assert_eq!(once, twice);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn remove_is_idempotent() {
    let store: Store<Field> = Store::new();
    store.upsert(field("f-1", "amount")).await;
    store.remove("f-1").await;
    let once = store.all().await;
    store.remove("f-1").await;
    let twice = store.all().await;
    assert_eq!(once, twice);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn upsert_existing_id_replaces_without_duplicating() {
    let store: Store<Field> = Store::new();
    store.upsert(field("f-1", "amount")).await;
    store.upsert(field("f-1", "total")).await;
    assert_eq!(store.len().await, 1);
    assert_eq!(store.by_id("f-1").await.unwrap().name, "total");
}

#[tokio::test]
async fn replace_all_makes_collection_exactly_the_given_items() {
    let store: Store<Field> = Store::new();
    store.upsert(field("old", "stale")).await;
    store
        .replace_all(vec![field("a", "one"), field("b", "two")])
        .await;
    assert_eq!(store.len().await, 2);
    assert!(store.by_id("old").await.is_none());
    assert!(store.by_id("a").await.is_some());
}

#[tokio::test]
async fn by_parent_filters_the_live_collection() {
    let store: Store<Field> = Store::new();
    store.upsert(nested_field("f-1", "first", "A")).await;
    store.upsert(nested_field("f-2", "second", "A")).await;
    store.upsert(nested_field("f-3", "third", "B")).await;
    store.upsert(field("f-4", "top-level")).await;

    let mut under_a = store
        .by_parent(|f| f.parent_field_id.as_deref(), "A")
        .await;
    under_a.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(
        under_a.iter().map(|f| f.id.as_str()).collect::<Vec<_>>(),
        vec!["f-1", "f-2"]
    );

    // Reflects the live collection, not a snapshot at subscription time.
    store.remove("f-1").await;
    let under_a = store
        .by_parent(|f| f.parent_field_id.as_deref(), "A")
        .await;
    assert_eq!(under_a.len(), 1);
}

#[tokio::test]
async fn command_path_and_push_path_converge() {
    // Same logical operations, delivered once through direct store calls
    // (the command-success path) and once as push events. The final state
    // must depend only on the set of (id -> last value) pairs.
    let via_commands = StoreSet::new();
    via_commands.fields.upsert(field("f-1", "v1")).await;
    via_commands.fields.upsert(field("f-2", "other")).await;
    via_commands.fields.upsert(field("f-1", "v2")).await;
    via_commands.fields.remove("f-2").await;

    let via_events = StoreSet::new();
    for event in [
        PushEvent::FieldUpdated(field("f-1", "v1")),
        PushEvent::FieldUpdated(field("f-2", "other")),
        PushEvent::FieldUpdated(field("f-1", "v2")),
        PushEvent::FieldDeleted("f-2".to_string()),
    ] {
        events::apply(&via_events, event).await;
    }

    assert_eq!(
        via_commands.snapshot().await,
        via_events.snapshot().await
    );
    assert_eq!(via_events.fields.by_id("f-1").await.unwrap().name, "v2");
}

#[tokio::test]
async fn revision_feed_bumps_on_mutation_only() {
    let store: Store<Field> = Store::new();
    let rx = store.subscribe();
    let start = *rx.borrow();

    store.upsert(field("f-1", "amount")).await;
    assert_eq!(*rx.borrow(), start + 1);

    // Removing an absent id is a no-op and must not wake subscribers.
    store.remove("missing").await;
    assert_eq!(*rx.borrow(), start + 1);

    store.remove("f-1").await;
    assert_eq!(*rx.borrow(), start + 2);
}

#[tokio::test]
async fn entity_kind_is_stable_per_store() {
    let entity = field("f-1", "amount");
    assert_eq!(Field::KIND.resource(), "fields");
    assert_eq!(entity.id(), "f-1");
    assert_eq!(entity.label(), "amount");
}
