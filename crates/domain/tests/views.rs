use skema_domain::entity::EntityKind;
use skema_domain::enum_value::EnumValue;
use skema_domain::field::{Field, FieldType};
use skema_domain::message::Message;
use skema_domain::project::Project;
use skema_domain::root::Root;
use skema_domain::store::StoreSet;
use skema_domain::views;

fn project(id: &str, name: &str) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        created_date: None,
        last_modified_date: None,
    }
}

fn root(id: &str, name: &str, project_id: &str) -> Root {
    Root {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        project_id: project_id.to_string(),
        created_date: None,
        last_modified_date: None,
    }
}

fn message(id: &str, name: &str, root_id: &str) -> Message {
    Message {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        root_id: root_id.to_string(),
        created_date: None,
        last_modified_date: None,
    }
}

fn field(id: &str, name: &str, field_type: FieldType) -> Field {
    Field {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        field_type,
        default_value: None,
        is_required: false,
        message_id: None,
        parent_field_id: None,
        created_date: None,
        last_modified_date: None,
    }
}

fn message_field(id: &str, name: &str, field_type: FieldType, message_id: &str) -> Field {
    Field {
        message_id: Some(message_id.to_string()),
        ..field(id, name, field_type)
    }
}

fn nested_field(id: &str, name: &str, field_type: FieldType, parent_field_id: &str) -> Field {
    Field {
        parent_field_id: Some(parent_field_id.to_string()),
        ..field(id, name, field_type)
    }
}

fn enum_value(id: &str, name: &str, field_id: &str) -> EnumValue {
    EnumValue {
        id: id.to_string(),
        name: name.to_string(),
        value: 0,
        description: String::new(),
        field_id: field_id.to_string(),
        created_date: None,
        last_modified_date: None,
    }
}

async fn populated_stores() -> StoreSet {
    let stores = StoreSet::new();
    stores.projects.upsert(project("p-1", "Billing")).await;
    stores.roots.upsert(root("r-1", "Invoices", "p-1")).await;
    stores
        .messages
        .upsert(message("m-1", "InvoiceCreated", "r-1"))
        .await;
    stores
        .fields
        .upsert(message_field("f-1", "lines", FieldType::Complex, "m-1"))
        .await;
    stores
        .fields
        .upsert(nested_field("f-2", "amount", FieldType::Decimal, "f-1"))
        .await;
    stores
        .fields
        .upsert(message_field("f-3", "status", FieldType::Enum, "m-1"))
        .await;
    stores
        .enum_values
        .upsert(enum_value("e-1", "Draft", "f-3"))
        .await;
    stores
        .enum_values
        .upsert(enum_value("e-2", "Sent", "f-3"))
        .await;
    stores
}

#[tokio::test]
async fn project_tree_nests_the_full_hierarchy() {
    let stores = populated_stores().await;
    let tree = views::project_tree(&stores.snapshot().await);

    assert_eq!(tree.len(), 1);
    let project = &tree[0];
    assert_eq!(project.kind, EntityKind::Project);
    let root = &project.children[0];
    let message = &root.children[0];
    assert_eq!(message.label, "InvoiceCreated");

    let labels: Vec<&str> = message.children.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, vec!["lines", "status"]);

    let lines = &message.children[0];
    assert_eq!(lines.children[0].label, "amount");

    let status = &message.children[1];
    let enum_labels: Vec<&str> = status.children.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(enum_labels, vec!["Draft", "Sent"]);
}

#[tokio::test]
async fn projection_is_pure_over_a_fixed_snapshot() {
    let stores = populated_stores().await;
    let snapshot = stores.snapshot().await;
    assert_eq!(views::project_tree(&snapshot), views::project_tree(&snapshot));
    assert_eq!(
        views::field_subtree(&snapshot, "f-1"),
        views::field_subtree(&snapshot, "f-1")
    );
}

#[tokio::test]
async fn malformed_field_is_excluded_not_fatal() {
    let stores = populated_stores().await;
    // A push event from a misbehaving peer: both parent references set.
    let mut malformed = message_field("f-bad", "ghost", FieldType::String, "m-1");
    malformed.parent_field_id = Some("f-1".to_string());
    stores.fields.upsert(malformed).await;

    let tree = views::project_tree(&stores.snapshot().await);
    let message = &tree[0].children[0].children[0];
    let labels: Vec<&str> = message.children.iter().map(|n| n.label.as_str()).collect();
    assert!(!labels.contains(&"ghost"));
    assert_eq!(labels, vec!["lines", "status"]);
}

#[tokio::test]
async fn field_cycle_is_truncated_instead_of_hanging() {
    let stores = StoreSet::new();
    stores
        .fields
        .upsert(nested_field("f-a", "a", FieldType::Complex, "f-b"))
        .await;
    stores
        .fields
        .upsert(nested_field("f-b", "b", FieldType::Complex, "f-a"))
        .await;

    let snapshot = stores.snapshot().await;
    let subtree = views::field_subtree(&snapshot, "f-a").expect("node built");
    assert_eq!(subtree.id, "f-a");
    assert_eq!(subtree.children.len(), 1);
    assert_eq!(subtree.children[0].id, "f-b");
    // The revisit of f-a is cut off.
    assert!(subtree.children[0].children.is_empty());
}

#[tokio::test]
async fn field_subtree_of_malformed_field_is_none() {
    let stores = populated_stores().await;
    let mut malformed = message_field("f-bad", "ghost", FieldType::String, "m-1");
    malformed.parent_field_id = Some("f-1".to_string());
    stores.fields.upsert(malformed).await;
    assert!(views::field_subtree(&stores.snapshot().await, "f-bad").is_none());
}

#[tokio::test]
async fn breadcrumbs_walk_from_project_to_leaf() {
    let stores = populated_stores().await;
    let crumbs = views::breadcrumbs(&stores.snapshot().await, EntityKind::EnumValue, "e-1");
    let chain: Vec<(EntityKind, &str)> = crumbs
        .iter()
        .map(|c| (c.kind, c.label.as_str()))
        .collect();
    assert_eq!(
        chain,
        vec![
            (EntityKind::Project, "Billing"),
            (EntityKind::Root, "Invoices"),
            (EntityKind::Message, "InvoiceCreated"),
            (EntityKind::Field, "status"),
            (EntityKind::EnumValue, "Draft"),
        ]
    );
}

#[tokio::test]
async fn breadcrumbs_truncate_at_unloaded_ancestors() {
    let stores = populated_stores().await;
    // Project not loaded yet (lazy navigation): chain starts at the root.
    stores.projects.remove("p-1").await;
    let crumbs = views::breadcrumbs(&stores.snapshot().await, EntityKind::Field, "f-2");
    let kinds: Vec<EntityKind> = crumbs.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EntityKind::Root,
            EntityKind::Message,
            EntityKind::Field,
            EntityKind::Field,
        ]
    );
}
