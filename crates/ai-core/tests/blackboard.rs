use ai_core::{BbKey, Blackboard, BlackboardSchema, DataType};

#[test]
fn blackboard_set_get_remove_roundtrip() {
    let k_u32 = BbKey::<u32>::new(1);
    let k_str = BbKey::<String>::new(2);

    let mut bb = Blackboard::new();
    assert!(!bb.contains(k_u32));

    bb.set(k_u32, 123);
    bb.set(k_str, "hello".to_string());

    assert_eq!(bb.get(k_u32).copied(), Some(123));
    assert_eq!(bb.get(k_str).map(|s| s.as_str()), Some("hello"));
    assert_eq!(bb.len(), 2);

    assert_eq!(bb.remove(k_u32), Some(123));
    assert_eq!(bb.get(k_u32), None);
}

#[test]
#[should_panic(expected = "blackboard type mismatch")]
fn blackboard_type_mismatch_panics() {
    let mut bb = Blackboard::new();
    bb.set(BbKey::<u32>::new(1), 1u32);
    let _ = bb.get(BbKey::<i32>::new(1));
}

#[test]
fn get_or_insert_with_only_builds_once() {
    let key = BbKey::<Vec<u8>>::new(7);
    let mut bb = Blackboard::new();

    bb.get_or_insert_with(key, Vec::new).push(1);
    bb.get_or_insert_with(key, || vec![9, 9]).push(2);

    assert_eq!(bb.get(key), Some(&vec![1, 2]));
}

#[test]
fn named_keys_match_schema_variables() {
    const TARGET: BbKey<u64> = BbKey::named("target");

    let mut schema = BlackboardSchema::new();
    assert!(schema.declare("target", DataType::Object));

    let variable = schema.get("target").unwrap();
    assert_eq!(variable.key::<u64>(), TARGET);
    assert_ne!(BbKey::<u64>::named("other").id(), TARGET.id());
}

#[test]
fn schema_keeps_first_declaration_and_merges_missing_names() {
    let mut schema = BlackboardSchema::new();
    assert!(schema.declare("speed", DataType::Float));
    assert!(!schema.declare("speed", DataType::Int));
    assert_eq!(schema.get("speed").unwrap().data_type, DataType::Float);

    let mut nested = BlackboardSchema::new();
    nested.declare("speed", DataType::Bool);
    nested.declare("enemy", DataType::Object);

    schema.merge(&nested);

    let names: Vec<&str> = schema.iter().map(|v| v.name.as_ref()).collect();
    assert_eq!(names, vec!["speed", "enemy"]);
    assert_eq!(schema.get("speed").unwrap().data_type, DataType::Float);
}
