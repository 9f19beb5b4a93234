use skema_domain::entity::EntityKind;
use skema_domain::events::PushEvent;
use skema_domain::field::FieldType;

#[test]
fn updated_event_decodes_the_full_entity_payload() {
    let frame = r#"{
        "event": "FieldUpdated",
        "payload": {
            "id": "f-1",
            "name": "amount",
            "type": "Decimal",
            "isRequired": true,
            "messageId": "m-1",
            "createdDate": "2026-08-24T10:00:00Z"
        }
    }"#;

    let event: PushEvent = serde_json::from_str(frame).unwrap();
    assert_eq!(event.kind(), EntityKind::Field);
    assert_eq!(event.entity_id(), "f-1");
    let PushEvent::FieldUpdated(field) = event else {
        panic!("wrong variant");
    };
    assert_eq!(field.field_type, FieldType::Decimal);
    assert!(field.is_required);
    assert_eq!(field.message_id.as_deref(), Some("m-1"));
    assert!(field.parent_field_id.is_none());
    assert!(field.created_date.is_some());
}

#[test]
fn deleted_event_carries_only_the_id() {
    let frame = r#"{"event": "EnumValueDeleted", "payload": "e-9"}"#;
    let event: PushEvent = serde_json::from_str(frame).unwrap();
    assert_eq!(event.kind(), EntityKind::EnumValue);
    assert_eq!(event.entity_id(), "e-9");
}

#[test]
fn unknown_event_names_are_rejected_not_misread() {
    let frame = r#"{"event": "SchemaRebuilt", "payload": {}}"#;
    assert!(serde_json::from_str::<PushEvent>(frame).is_err());
}
