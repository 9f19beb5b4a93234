use std::collections::{HashMap, HashSet};

use crate::entity::EntityKind;
use crate::enum_value::EnumValue;
use crate::field::{Field, FieldParent, FieldType};
use crate::message::Message;
use crate::project::Project;
use crate::root::Root;
use crate::store::Snapshot;

/// Display-ready hierarchy node. Built fresh from a snapshot on every
/// projection; equal snapshots yield value-equal trees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    pub kind: EntityKind,
    pub id: String,
    pub label: String,
    pub children: Vec<TreeNode>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Crumb {
    pub kind: EntityKind,
    pub id: String,
    pub label: String,
}

struct FieldIndex<'a> {
    by_message: HashMap<&'a str, Vec<&'a Field>>,
    by_parent_field: HashMap<&'a str, Vec<&'a Field>>,
    enum_values_by_field: HashMap<&'a str, Vec<&'a EnumValue>>,
}

impl<'a> FieldIndex<'a> {
    /// Groups fields under their parent key. A field whose parent shape
    /// is malformed (both references set, or neither) came from a
    /// misbehaving peer or an inconsistent server; it is excluded from
    /// every projection rather than crashing the builder.
    fn build(snapshot: &'a Snapshot) -> Self {
        let mut by_message: HashMap<&str, Vec<&Field>> = HashMap::new();
        let mut by_parent_field: HashMap<&str, Vec<&Field>> = HashMap::new();
        for field in &snapshot.fields {
            match field.parent() {
                Ok(FieldParent::Message(_)) => {
                    let key = field.message_id.as_deref().unwrap_or_default();
                    by_message.entry(key).or_default().push(field);
                }
                Ok(FieldParent::Field(_)) => {
                    let key = field.parent_field_id.as_deref().unwrap_or_default();
                    by_parent_field.entry(key).or_default().push(field);
                }
                Err(err) => {
                    tracing::warn!(field_id = %field.id, error = %err, "excluding malformed field from projection");
                }
            }
        }
        let mut enum_values_by_field: HashMap<&str, Vec<&EnumValue>> = HashMap::new();
        for enum_value in &snapshot.enum_values {
            enum_values_by_field
                .entry(enum_value.field_id.as_str())
                .or_default()
                .push(enum_value);
        }
        for children in by_message.values_mut().chain(by_parent_field.values_mut()) {
            children.sort_by(|a, b| (&a.name, &a.id).cmp(&(&b.name, &b.id)));
        }
        for values in enum_values_by_field.values_mut() {
            values.sort_by(|a, b| (&a.name, &a.id).cmp(&(&b.name, &b.id)));
        }
        Self {
            by_message,
            by_parent_field,
            enum_values_by_field,
        }
    }
}

/// Full Project → Root → Message → Field tree for the navigation pane.
pub fn project_tree(snapshot: &Snapshot) -> Vec<TreeNode> {
    let index = FieldIndex::build(snapshot);

    let mut roots_by_project: HashMap<&str, Vec<&Root>> = HashMap::new();
    for root in &snapshot.roots {
        roots_by_project
            .entry(root.project_id.as_str())
            .or_default()
            .push(root);
    }
    let mut messages_by_root: HashMap<&str, Vec<&Message>> = HashMap::new();
    for message in &snapshot.messages {
        messages_by_root
            .entry(message.root_id.as_str())
            .or_default()
            .push(message);
    }
    for roots in roots_by_project.values_mut() {
        roots.sort_by(|a, b| (&a.name, &a.id).cmp(&(&b.name, &b.id)));
    }
    for messages in messages_by_root.values_mut() {
        messages.sort_by(|a, b| (&a.name, &a.id).cmp(&(&b.name, &b.id)));
    }

    let mut projects: Vec<&Project> = snapshot.projects.iter().collect();
    projects.sort_by(|a, b| (&a.name, &a.id).cmp(&(&b.name, &b.id)));

    projects
        .into_iter()
        .map(|project| {
            let children = roots_by_project
                .get(project.id.as_str())
                .map(|roots| {
                    roots
                        .iter()
                        .map(|root| root_node(root, &messages_by_root, &index))
                        .collect()
                })
                .unwrap_or_default();
            TreeNode {
                kind: EntityKind::Project,
                id: project.id.clone(),
                label: project.name.clone(),
                children,
            }
        })
        .collect()
}

/// Subtree of one field, recursively. `None` when the field is absent or
/// excluded as malformed.
pub fn field_subtree(snapshot: &Snapshot, field_id: &str) -> Option<TreeNode> {
    let index = FieldIndex::build(snapshot);
    let field = snapshot.fields.iter().find(|field| field.id == field_id)?;
    if !field.is_well_formed() {
        return None;
    }
    let mut visited = HashSet::new();
    field_node(field, &index, &mut visited)
}

/// Ancestry chain for the breadcrumb bar, topmost entity first. The chain
/// is as long as the loaded collections allow: a missing ancestor
/// (not yet lazily loaded) truncates it there instead of failing.
pub fn breadcrumbs(snapshot: &Snapshot, kind: EntityKind, id: &str) -> Vec<Crumb> {
    let projects: HashMap<&str, &Project> = snapshot
        .projects
        .iter()
        .map(|entity| (entity.id.as_str(), entity))
        .collect();
    let roots: HashMap<&str, &Root> = snapshot
        .roots
        .iter()
        .map(|entity| (entity.id.as_str(), entity))
        .collect();
    let messages: HashMap<&str, &Message> = snapshot
        .messages
        .iter()
        .map(|entity| (entity.id.as_str(), entity))
        .collect();
    let fields: HashMap<&str, &Field> = snapshot
        .fields
        .iter()
        .map(|entity| (entity.id.as_str(), entity))
        .collect();

    // Collected leaf-first, reversed at the end.
    let mut chain: Vec<Crumb> = Vec::new();
    let mut cursor: Option<(EntityKind, String)> = Some((kind, id.to_string()));
    let mut visited_fields: HashSet<String> = HashSet::new();

    while let Some((kind, id)) = cursor.take() {
        match kind {
            EntityKind::EnumValue => {
                let Some(enum_value) = snapshot.enum_values.iter().find(|ev| ev.id == id) else {
                    break;
                };
                chain.push(crumb(EntityKind::EnumValue, &enum_value.id, &enum_value.name));
                cursor = Some((EntityKind::Field, enum_value.field_id.clone()));
            }
            EntityKind::Field => {
                let Some(field) = fields.get(id.as_str()) else {
                    break;
                };
                if !visited_fields.insert(field.id.clone()) {
                    tracing::warn!(field_id = %field.id, "field ancestry cycle detected, truncating breadcrumbs");
                    break;
                }
                chain.push(crumb(EntityKind::Field, &field.id, &field.name));
                match field.parent() {
                    Ok(FieldParent::Field(parent_id)) => {
                        cursor = Some((EntityKind::Field, parent_id));
                    }
                    Ok(FieldParent::Message(message_id)) => {
                        cursor = Some((EntityKind::Message, message_id));
                    }
                    Err(err) => {
                        tracing::warn!(field_id = %field.id, error = %err, "malformed field in breadcrumb chain");
                        break;
                    }
                }
            }
            EntityKind::Message => {
                let Some(message) = messages.get(id.as_str()) else {
                    break;
                };
                chain.push(crumb(EntityKind::Message, &message.id, &message.name));
                cursor = Some((EntityKind::Root, message.root_id.clone()));
            }
            EntityKind::Root => {
                let Some(root) = roots.get(id.as_str()) else {
                    break;
                };
                chain.push(crumb(EntityKind::Root, &root.id, &root.name));
                cursor = Some((EntityKind::Project, root.project_id.clone()));
            }
            EntityKind::Project => {
                let Some(project) = projects.get(id.as_str()) else {
                    break;
                };
                chain.push(crumb(EntityKind::Project, &project.id, &project.name));
            }
        }
    }

    chain.reverse();
    chain
}

fn crumb(kind: EntityKind, id: &str, label: &str) -> Crumb {
    Crumb {
        kind,
        id: id.to_string(),
        label: label.to_string(),
    }
}

fn root_node(
    root: &Root,
    messages_by_root: &HashMap<&str, Vec<&Message>>,
    index: &FieldIndex<'_>,
) -> TreeNode {
    let children = messages_by_root
        .get(root.id.as_str())
        .map(|messages| {
            messages
                .iter()
                .map(|message| message_node(message, index))
                .collect()
        })
        .unwrap_or_default();
    TreeNode {
        kind: EntityKind::Root,
        id: root.id.clone(),
        label: root.name.clone(),
        children,
    }
}

fn message_node(message: &Message, index: &FieldIndex<'_>) -> TreeNode {
    let mut visited = HashSet::new();
    let children = index
        .by_message
        .get(message.id.as_str())
        .map(|fields| {
            fields
                .iter()
                .filter_map(|field| field_node(field, index, &mut visited))
                .collect()
        })
        .unwrap_or_default();
    TreeNode {
        kind: EntityKind::Message,
        id: message.id.clone(),
        label: message.name.clone(),
        children,
    }
}

/// A field node's children are exactly the fields whose `parent_field_id`
/// equals its id, plus its enum values when the field is `Enum`-typed.
/// The visited set truncates reference cycles so a corrupt subtree can
/// never hang the builder.
fn field_node(
    field: &Field,
    index: &FieldIndex<'_>,
    visited: &mut HashSet<String>,
) -> Option<TreeNode> {
    if !visited.insert(field.id.clone()) {
        tracing::warn!(field_id = %field.id, "field reference cycle detected, truncating subtree");
        return None;
    }
    let mut children: Vec<TreeNode> = index
        .by_parent_field
        .get(field.id.as_str())
        .map(|nested| {
            nested
                .iter()
                .filter_map(|nested_field| field_node(nested_field, index, visited))
                .collect()
        })
        .unwrap_or_default();
    if field.field_type == FieldType::Enum {
        if let Some(enum_values) = index.enum_values_by_field.get(field.id.as_str()) {
            children.extend(enum_values.iter().map(|enum_value| TreeNode {
                kind: EntityKind::EnumValue,
                id: enum_value.id.clone(),
                label: enum_value.name.clone(),
                children: Vec::new(),
            }));
        }
    }
    Some(TreeNode {
        kind: EntityKind::Field,
        id: field.id.clone(),
        label: field.name.clone(),
        children,
    })
}
