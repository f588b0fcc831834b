//! Engine tests driven through the simulated host.

use expect_test::expect;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use scry_sim::{Sim, Value};

use scry_inspect::DescribeOptions;
use scry_inspect::enumerate::{EnumerateOptions, PropertyFilter};
use scry_inspect::error::InspectError;
use scry_inspect::host::{FrameInfo, NodeInfo, ScopeInfo};
use scry_inspect::{previewable, SecondLevel};
use scry_inspect::protocol::{CallFrameId, ScopeKind, Subtype, ValueKind};
use scry_inspect::registry::CONSOLE_GROUP;
use scry_inspect::Inspector;

fn inspector(sim: Sim) -> Inspector<Sim> {
    Inspector::new(sim, 1)
}

fn describe(inspector: &mut Inspector<Sim>, value: &Value) -> scry_inspect::protocol::RemoteValue {
    inspector.describe(value, DescribeOptions::default())
}

fn own_only() -> EnumerateOptions {
    EnumerateOptions {
        filter: PropertyFilter::OwnOnly,
        include_proto: false,
        ..EnumerateOptions::default()
    }
}

#[test]
fn primitives_inline_without_handles() {
    let mut inspector = inspector(Sim::new());

    let wire = describe(&mut inspector, &Value::Bool(true));
    assert_eq!(wire.kind, ValueKind::Boolean);
    assert_eq!(wire.value, Some(serde_json::json!(true)));
    assert_eq!(wire.object_id, None);

    let wire = describe(&mut inspector, &Value::Number(3.5));
    assert_eq!(wire.value, Some(serde_json::json!(3.5)));
    assert_eq!(wire.description.as_deref(), Some("3.5"));

    let wire = describe(&mut inspector, &Value::String("hi".into()));
    assert_eq!(wire.kind, ValueKind::String);
    assert_eq!(wire.value, Some(serde_json::json!("hi")));

    let wire = describe(&mut inspector, &Value::Undefined);
    assert_eq!(wire.kind, ValueKind::Undefined);
    assert_eq!(wire.value, None);
    assert_eq!(wire.object_id, None);

    let wire = describe(&mut inspector, &Value::Null);
    assert_eq!(wire.kind, ValueKind::Object);
    assert_eq!(wire.subtype, Some(Subtype::Null));
    assert_eq!(wire.value, Some(serde_json::Value::Null));
    assert_eq!(wire.object_id, None);
}

#[test]
fn numbers_get_readable_descriptions() {
    let mut inspector = inspector(Sim::new());

    let wire = describe(&mut inspector, &Value::Number(-0.0));
    assert_eq!(wire.description.as_deref(), Some("-0"));

    let wire = describe(&mut inspector, &Value::Number(f64::NAN));
    assert_eq!(wire.value, None);
    assert_eq!(wire.description.as_deref(), Some("NaN"));

    let wire = describe(&mut inspector, &Value::Number(f64::INFINITY));
    assert_eq!(wire.description.as_deref(), Some("Infinity"));

    let wire = describe(&mut inspector, &Value::BigInt(17));
    assert_eq!(wire.kind, ValueKind::Bigint);
    assert_eq!(wire.value, Some(serde_json::json!("17n")));
    assert_eq!(wire.description.as_deref(), Some("17n"));
    assert_eq!(wire.object_id, None);
}

#[test]
fn objects_bind_and_resolve() {
    let sim = Sim::new();
    let object = sim.object();
    let mut inspector = inspector(sim);

    let handle = inspector.bind(Value::Object(object), None);
    assert_eq!(inspector.resolve(handle), Ok(&Value::Object(object)));

    inspector.release(handle);
    assert_eq!(inspector.resolve(handle), Err(InspectError::NotFound));
    // Releasing again stays a no-op.
    inspector.release(handle);
    assert_eq!(inspector.resolve(handle), Err(InspectError::NotFound));
}

#[test]
fn release_group_is_scoped() {
    let sim = Sim::new();
    let first = sim.object();
    let second = sim.object();
    let mut inspector = inspector(sim);

    let watched = inspector.bind(Value::Object(first), Some("watch"));
    let probed = inspector.bind(Value::Object(second), Some("probe"));
    inspector.release_group("watch");
    assert_eq!(inspector.resolve(watched), Err(InspectError::NotFound));
    assert!(inspector.resolve(probed).is_ok());
}

#[test]
fn console_release_clears_saved_results() {
    let sim = Sim::new();
    let object = sim.object();
    let mut inspector = inspector(sim);

    let index = inspector.save_result(Value::Object(object)).unwrap();
    assert_eq!(inspector.saved_result(index), Some(&Value::Object(object)));
    inspector.release_group(CONSOLE_GROUP);
    assert_eq!(inspector.saved_result(index), None);
    // The wrap counter restarts at one.
    assert_eq!(inspector.save_result(Value::Number(5.0)), Some(1));
}

#[test]
fn saved_results_dedupe_and_wrap() {
    let sim = Sim::new();
    let object = sim.object();
    let mut inspector = inspector(sim);

    assert_eq!(inspector.save_result(Value::Undefined), None);
    assert_eq!(inspector.save_result(Value::Null), None);

    let first = inspector.save_result(Value::Object(object)).unwrap();
    assert_eq!(inspector.save_result(Value::Object(object)), Some(first));

    for n in 0..150 {
        let index = inspector.save_result(Value::Number(f64::from(n))).unwrap();
        assert!((1..=99).contains(&index));
    }
}

#[test]
fn descriptor_snapshot() {
    let sim = Sim::new();
    let object = sim.object();
    sim.define(object, "label", "ready");
    sim.define(object, "count", 3);
    let mut inspector = inspector(sim);

    let wire = inspector.describe(
        &Value::Object(object),
        DescribeOptions {
            generate_preview: true,
            ..DescribeOptions::default()
        },
    );
    expect![[r#"
        {
          "type": "object",
          "description": "Object",
          "objectId": {
            "sessionId": 1,
            "id": 1
          },
          "className": "Object",
          "preview": {
            "type": "object",
            "description": "Object",
            "lossless": true,
            "properties": [
              {
                "name": "label",
                "type": "string",
                "value": "ready"
              },
              {
                "name": "count",
                "type": "number",
                "value": "3"
              }
            ]
          }
        }"#]]
    .assert_eq(&serde_json::to_string_pretty(&wire).unwrap());
}

#[test]
fn describe_tags_subtypes_and_sizes() {
    let sim = Sim::new();
    let map = sim.map_object(vec![(Value::from("a"), Value::from(1))]);
    let set = sim.set_object(vec![1.into(), 2.into(), 3.into()]);
    let weak = sim.weak_map_object(vec![(Value::from("k"), Value::from(2))]);
    let array = sim.array(vec![1.into(), 2.into()]);
    let regexp = sim.regexp("/ab+c/g");
    let date = sim.date("Tue Aug 04 2026");
    let error = sim.error("boom");
    let class = sim.class_object("Point");
    let function = sim.function("function add(a, b) { return a + b; }");
    let mut inspector = inspector(sim);

    let wire = describe(&mut inspector, &Value::Object(map));
    assert_eq!(wire.subtype, Some(Subtype::Map));
    assert_eq!(wire.size, Some(1));
    assert_eq!(wire.description.as_deref(), Some("Map"));

    let wire = describe(&mut inspector, &Value::Object(set));
    assert_eq!(wire.subtype, Some(Subtype::Set));
    assert_eq!(wire.size, Some(3));

    let wire = describe(&mut inspector, &Value::Object(weak));
    assert_eq!(wire.subtype, Some(Subtype::WeakMap));
    assert_eq!(wire.size, Some(1));

    let wire = describe(&mut inspector, &Value::Object(array));
    assert_eq!(wire.subtype, Some(Subtype::Array));
    assert_eq!(wire.size, Some(2));
    assert_eq!(wire.description.as_deref(), Some("Array[2]"));

    let wire = describe(&mut inspector, &Value::Object(regexp));
    assert_eq!(wire.subtype, Some(Subtype::Regexp));
    assert_eq!(wire.description.as_deref(), Some("/ab+c/g"));

    let wire = describe(&mut inspector, &Value::Object(date));
    assert_eq!(wire.description.as_deref(), Some("Tue Aug 04 2026"));

    let wire = describe(&mut inspector, &Value::Object(error));
    assert_eq!(wire.subtype, Some(Subtype::Error));
    assert_eq!(wire.description.as_deref(), Some("Error: boom"));

    let wire = describe(&mut inspector, &Value::Object(class));
    assert_eq!(wire.kind, ValueKind::Function);
    assert_eq!(wire.subtype, Some(Subtype::Class));
    assert_eq!(wire.description.as_deref(), Some("class Point { }"));

    let wire = describe(&mut inspector, &Value::Object(function));
    assert_eq!(wire.kind, ValueKind::Function);
    assert_eq!(
        wire.description.as_deref(),
        Some("function add(a, b) { return a + b; }")
    );
}

#[test]
fn node_descriptions_are_tag_summaries() {
    let sim = Sim::new();
    let with_id = sim.node(NodeInfo::Element {
        tag: "div".into(),
        id: Some("app".into()),
        class_attr: Some("main".into()),
        type_attr: None,
    });
    let with_type = sim.node(NodeInfo::Element {
        tag: "input".into(),
        id: None,
        class_attr: None,
        type_attr: Some("text".into()),
    });
    let text = sim.node(NodeInfo::Text {
        text: "hello".to_string(),
    });
    let comment = sim.node(NodeInfo::Comment {
        text: "note".to_string(),
    });
    let doctype = sim.node(NodeInfo::Doctype {
        name: "html".into(),
    });
    let mut inspector = inspector(sim);

    let cases = [
        (with_id, "<div id=\"app\">"),
        (with_type, "<input type=\"text\">"),
        (text, "\"hello\""),
        (comment, "<!--note-->"),
        (doctype, "<!DOCTYPE html>"),
    ];
    for (node, expected) in cases {
        let wire = describe(&mut inspector, &Value::Object(node));
        assert_eq!(wire.subtype, Some(Subtype::Node));
        assert_eq!(wire.description.as_deref(), Some(expected));
    }
}

#[test]
fn array_heuristic_applies_to_array_likes() {
    let sim = Sim::new();
    let list = sim.object();
    sim.define(list, "length", 2);
    sim.define(list, "0", "a");
    sim.define(list, "1", "b");
    sim.define(
        list,
        "splice",
        Value::Object(sim.function("function splice() {}")),
    );
    let mut inspector = inspector(sim);

    let wire = describe(&mut inspector, &Value::Object(list));
    assert_eq!(wire.subtype, Some(Subtype::Array));
    assert_eq!(wire.size, Some(2));

    let handle = wire.object_id.unwrap();
    let names: Vec<_> = inspector
        .properties(handle, own_only())
        .unwrap()
        .into_iter()
        .map(|descriptor| descriptor.name)
        .collect();
    assert_eq!(names, ["0", "1"]);
}

#[test]
fn host_collection_quirk_displays_as_array() {
    let sim = Sim::new();
    let all = sim.array(vec![1.into(), 2.into()]);
    sim.mark_host_collection(all);
    let mut inspector = inspector(sim);

    let wire = inspector.describe(
        &Value::Object(all),
        DescribeOptions {
            generate_preview: true,
            ..DescribeOptions::default()
        },
    );
    assert_eq!(wire.kind, ValueKind::Undefined);
    assert!(wire.object_id.is_some());
    assert_eq!(wire.subtype, Some(Subtype::Array));
    assert_eq!(wire.preview.unwrap().properties.len(), 2);
}

#[test]
fn fallback_describe_never_binds() {
    let sim = Sim::new();
    let object = sim.object();
    let inspector = inspector(sim);

    let wire = inspector.fallback_describe(&Value::Object(object));
    assert_eq!(wire.kind, ValueKind::Object);
    assert_eq!(wire.object_id, None);
    assert_eq!(wire.description.as_deref(), Some("[object Object]"));

    let wire = inspector.fallback_describe(&Value::Number(4.0));
    assert_eq!(wire.value, Some(serde_json::json!(4.0)));
}

#[test]
fn describe_recovers_from_throwing_coercion() {
    let sim = Sim::new();
    let regexp = sim.regexp("/a/");
    sim.throw_on_coerce(regexp, Value::String("boom".into()));
    let poison = sim.object();
    sim.throw_on_coerce(poison, Value::Object(poison));
    let stubborn = sim.regexp("/b/");
    sim.throw_on_coerce(stubborn, Value::Object(poison));
    let mut inspector = inspector(sim);

    let wire = describe(&mut inspector, &Value::Object(regexp));
    assert_eq!(wire.description.as_deref(), Some("boom"));

    let wire = describe(&mut inspector, &Value::Object(stubborn));
    assert_eq!(
        wire.description.as_deref(),
        Some("<failed to convert exception to string>")
    );
}

#[test]
fn enumeration_walks_chain_in_order() {
    let sim = Sim::new();
    let base = sim.object();
    sim.define(base, "inherited", 1);
    sim.define(base, "shadowed", 2);
    let derived = sim.object();
    sim.set_proto(derived, Some(base));
    sim.define(derived, "own", 3);
    sim.define(derived, "shadowed", 4);
    let mut inspector = inspector(sim);

    let handle = inspector.bind(Value::Object(derived), None);
    let descriptors = inspector
        .properties(
            handle,
            EnumerateOptions {
                include_proto: false,
                ..EnumerateOptions::default()
            },
        )
        .unwrap();
    let names: Vec<_> = descriptors
        .iter()
        .map(|descriptor| descriptor.name.clone())
        .collect();
    assert_eq!(names, ["own", "shadowed", "inherited"]);
    assert_eq!(descriptors[0].is_own, Some(true));
    assert_eq!(descriptors[2].is_own, None);
    // The shadowing level wins.
    assert_eq!(
        descriptors[1].value.as_ref().unwrap().value,
        Some(serde_json::json!(4.0))
    );
}

#[test]
fn enumeration_skips_proxies() {
    let sim = Sim::new();
    let target = sim.object();
    sim.define(target, "hidden", 1);
    let proxy = sim.proxy(target);
    let mut inspector = inspector(sim);

    let handle = inspector.bind(Value::Object(proxy), None);
    let descriptors = inspector
        .properties(handle, EnumerateOptions::default())
        .unwrap();
    assert!(descriptors.is_empty());
}

#[test]
fn pagination_returns_requested_window() {
    let sim = Sim::new();
    let object = sim.object();
    for name in ["a", "b", "c", "d", "e"] {
        sim.define(object, name, 1);
    }
    let mut inspector = inspector(sim);

    let handle = inspector.bind(Value::Object(object), None);
    let descriptors = inspector
        .properties(
            handle,
            EnumerateOptions {
                fetch_start: 2,
                fetch_count: 2,
                ..EnumerateOptions::default()
            },
        )
        .unwrap();
    let names: Vec<_> = descriptors
        .iter()
        .map(|descriptor| descriptor.name.clone())
        .collect();
    assert_eq!(names, ["c", "d"]);
}

#[test]
fn proto_synthetic_only_on_first_page() {
    let sim = Sim::new();
    let object = sim.object();
    sim.define(object, "a", 1);
    let mut inspector = inspector(sim);

    let handle = inspector.bind(Value::Object(object), None);
    let first_page = inspector
        .properties(handle, EnumerateOptions::default())
        .unwrap();
    let last = first_page.last().unwrap();
    assert_eq!(last.name, "__proto__");
    assert_eq!(last.is_own, Some(true));
    assert_eq!(last.writable, Some(true));
    assert!(last.value.as_ref().unwrap().object_id.is_some());

    let second_page = inspector
        .properties(
            handle,
            EnumerateOptions {
                fetch_start: 1,
                ..EnumerateOptions::default()
            },
        )
        .unwrap();
    assert!(second_page
        .iter()
        .all(|descriptor| descriptor.name != "__proto__"));
}

#[test]
fn native_getters_become_fake_value_descriptors() {
    let sim = Sim::new();
    let object = sim.object();
    sim.define_accessor(object, "x", Some(sim.native_getter(42.into())), None, false);
    sim.define_accessor(object, "plain", Some(sim.getter(7.into())), None, true);
    let mut inspector = inspector(sim);

    let handle = inspector.bind(Value::Object(object), None);
    let descriptors = inspector
        .properties(
            handle,
            EnumerateOptions {
                filter: PropertyFilter::NativeGettersOnly,
                native_getters_as_values: true,
                include_proto: false,
                ..EnumerateOptions::default()
            },
        )
        .unwrap();
    assert_eq!(descriptors.len(), 1);
    let descriptor = &descriptors[0];
    assert_eq!(descriptor.name, "x");
    assert_eq!(descriptor.native_getter, Some(true));
    assert_eq!(
        descriptor.value.as_ref().unwrap().value,
        Some(serde_json::json!(42.0))
    );
    assert!(descriptor.get.is_none());
}

#[test]
fn thrown_getters_are_recovered() {
    let sim = Sim::new();
    let object = sim.object();
    let error = sim.error("getter exploded");
    sim.define_accessor(
        object,
        "trap",
        Some(sim.throwing_native_getter(Value::Object(error))),
        None,
        true,
    );
    let mut inspector = inspector(sim);

    let handle = inspector.bind(Value::Object(object), None);
    let descriptors = inspector
        .properties(
            handle,
            EnumerateOptions {
                filter: PropertyFilter::OwnAndNativeGetters,
                native_getters_as_values: true,
                include_proto: false,
                ..EnumerateOptions::default()
            },
        )
        .unwrap();
    let descriptor = &descriptors[0];
    assert_eq!(descriptor.was_thrown, Some(true));
    let value = descriptor.value.as_ref().unwrap();
    assert_eq!(value.subtype, Some(Subtype::Error));
    assert_eq!(value.description.as_deref(), Some("Error: getter exploded"));
}

#[test]
fn accessor_pairs_keep_at_least_one_side() {
    let sim = Sim::new();
    let object = sim.object();
    // Declared but absent on both sides, reported without conversion.
    sim.define_accessor(object, "ghost", None, None, true);
    let mut inspector = inspector(sim);

    let handle = inspector.bind(Value::Object(object), None);
    let descriptors = inspector.properties(handle, own_only()).unwrap();
    let descriptor = &descriptors[0];
    assert!(descriptor.value.is_none());
    assert_eq!(descriptor.get.as_ref().unwrap().kind, ValueKind::Undefined);
}

#[test]
fn symbol_properties_follow_names() {
    let sim = Sim::new();
    let object = sim.object();
    sim.define(object, "plain", 1);
    let tag = sim.symbol("tag");
    sim.define_symbol_property(object, tag, "marked".into());
    let mut inspector = inspector(sim);

    let handle = inspector.bind(Value::Object(object), None);
    let descriptors = inspector.properties(handle, own_only()).unwrap();
    assert_eq!(descriptors[0].name, "plain");
    let symbol = &descriptors[1];
    assert_eq!(symbol.name, "Symbol(tag)");
    let key = symbol.symbol.as_ref().unwrap();
    assert_eq!(key.kind, ValueKind::Symbol);
    assert!(key.object_id.is_some());
    assert_eq!(key.description.as_deref(), Some("Symbol(tag)"));
}

#[test]
fn collection_entries_respect_the_window() {
    let sim = Sim::new();
    let set = sim.set_object(vec![10.into(), 20.into(), 30.into(), 40.into()]);
    let map = sim.map_object(vec![
        (Value::from("a"), Value::from(1)),
        (Value::from("b"), Value::from(2)),
    ]);
    let mut inspector = inspector(sim);

    let handle = inspector.bind(Value::Object(set), None);
    let entries = inspector.collection_entries(handle, 1, 2).unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].key.is_none());
    assert_eq!(entries[0].value.value, Some(serde_json::json!(20.0)));
    assert_eq!(entries[1].value.value, Some(serde_json::json!(30.0)));

    let handle = inspector.bind(Value::Object(map), None);
    let entries = inspector.collection_entries(handle, 0, 0).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(
        entries[0].key.as_ref().unwrap().value,
        Some(serde_json::json!("a"))
    );
}

#[test]
fn entries_for_non_collections_is_an_error() {
    let sim = Sim::new();
    let object = sim.object();
    let mut inspector = inspector(sim);

    let handle = inspector.bind(Value::Object(object), None);
    assert_eq!(
        inspector.collection_entries(handle, 0, 0),
        Err(InspectError::NotACollection)
    );
}

#[test]
fn weak_entries_are_bounded_by_the_host() {
    let sim = Sim::new();
    let weak = sim.weak_map_object(vec![
        (Value::from("x"), Value::from(1)),
        (Value::from("y"), Value::from(2)),
        (Value::from("z"), Value::from(3)),
    ]);
    let mut inspector = inspector(sim);

    let handle = inspector.bind(Value::Object(weak), None);
    let entries = inspector.collection_entries(handle, 0, 2).unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].key.is_some());
}

#[test]
fn iterator_entries_consume_the_iterator() {
    let sim = Sim::new();
    let iterator = sim.iterator_object(vec![1.into(), 2.into(), 3.into()]);
    let mut inspector = inspector(sim);

    let handle = inspector.bind(Value::Object(iterator), None);
    assert_eq!(inspector.collection_entries(handle, 0, 2).unwrap().len(), 2);
    assert_eq!(inspector.collection_entries(handle, 0, 2).unwrap().len(), 1);
    assert_eq!(inspector.collection_entries(handle, 0, 2).unwrap().len(), 0);
}

#[test]
fn map_preview_builds_entries() {
    let sim = Sim::new();
    let map = sim.map_object(vec![
        (Value::from("a"), Value::from(1)),
        (Value::from("b"), Value::from(2)),
    ]);
    let inspector = inspector(sim);

    let preview = inspector.preview(&Value::Object(map), SecondLevel::Auto);
    assert!(preview.lossless);
    assert_eq!(preview.size, Some(2));
    assert!(preview.properties.is_empty());
    let entries = preview.entries.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].key.as_ref().unwrap().description, "a");
    assert_eq!(entries[0].value.description, "1");
    assert_eq!(entries[1].key.as_ref().unwrap().description, "b");
    assert_eq!(entries[1].value.description, "2");
}

#[test]
fn entry_previews_cap_at_five() {
    let sim = Sim::new();
    let set = sim.set_object((0..7).map(|n| Value::from(n)).collect());
    let inspector = inspector(sim);

    let preview = inspector.preview(&Value::Object(set), SecondLevel::Auto);
    assert_eq!(preview.entries.unwrap().len(), 5);
    assert_eq!(preview.overflow, Some(true));
    assert!(!preview.lossless);
}

#[test]
fn preview_is_idempotent() {
    let sim = Sim::new();
    let inner = sim.object();
    sim.define(inner, "deep", 1);
    let object = sim.object();
    sim.define(object, "a", 1);
    sim.define(object, "b", "two");
    sim.define(object, "nested", Value::Object(inner));
    let inspector = inspector(sim);

    let first = inspector.preview(&Value::Object(object), SecondLevel::Auto);
    let second = inspector.preview(&Value::Object(object), SecondLevel::Auto);
    assert_eq!(first, second);
}

#[test]
fn cyclic_previews_terminate() {
    let sim = Sim::new();
    let object = sim.object();
    sim.define(object, "self", Value::Object(object));
    let inspector = inspector(sim);

    let preview = inspector.preview(&Value::Object(object), SecondLevel::Auto);
    assert!(!preview.lossless);
    let own = &preview.properties[0];
    assert_eq!(own.name, "self");
    // The cycle degrades to a description instead of recursing.
    assert!(own.value_preview.is_none());
    assert_eq!(own.value.as_deref(), Some("Object"));
}

#[test]
fn indexed_overflow_keeps_ten_entries() {
    let sim = Sim::new();
    let array = sim.array((0..1000).map(Value::from).collect());
    let inspector = inspector(sim);

    let preview = inspector.preview(&Value::Object(array), SecondLevel::Auto);
    assert_eq!(preview.overflow, Some(true));
    assert!(!preview.lossless);
    assert_eq!(preview.properties.len(), 10);
    assert_eq!(preview.size, Some(1000));
    assert_eq!(preview.description, "Array[1000]");
}

#[test]
fn nested_simple_objects_preview_losslessly() {
    let sim = Sim::new();
    let inner = sim.object();
    sim.define(inner, "deep", 1);
    let object = sim.object();
    sim.define(object, "nested", Value::Object(inner));
    let inspector = inspector(sim);

    let preview = inspector.preview(&Value::Object(object), SecondLevel::Auto);
    assert!(preview.lossless);
    let nested = preview.properties[0].value_preview.as_ref().unwrap();
    assert_eq!(nested.properties[0].name, "deep");
    assert_eq!(nested.properties[0].value.as_deref(), Some("1"));
}

#[test]
fn string_previews_truncate_and_mark_newlines() {
    let sim = Sim::new();
    let object = sim.object();
    sim.define(object, "long", Value::from("x".repeat(150).as_str()));
    sim.define(object, "wrapped", "line1\nline2");
    let inspector = inspector(sim);

    let preview = inspector.preview(&Value::Object(object), SecondLevel::Auto);
    assert!(!preview.lossless);
    let long = &preview.properties[0];
    let text = long.value.as_deref().unwrap();
    assert_eq!(text.chars().count(), 100);
    assert!(text.contains('\u{2026}'));
    let wrapped = &preview.properties[1];
    assert_eq!(wrapped.value.as_deref(), Some("line1\u{21B5}line2"));
}

#[test]
fn accessors_and_user_prototypes_cost_losslessness() {
    let sim = Sim::new();
    let object = sim.object();
    sim.define_accessor(object, "lazy", Some(sim.getter(1.into())), None, true);
    let instance = sim.instance_of("Point");
    sim.define(instance, "x", 1);
    let inspector = inspector(sim);

    let preview = inspector.preview(&Value::Object(object), SecondLevel::Auto);
    assert!(!preview.lossless);
    assert_eq!(preview.properties[0].kind, ValueKind::Accessor);
    assert!(preview.properties[0].value.is_none());

    let preview = inspector.preview(&Value::Object(instance), SecondLevel::Auto);
    // The user prototype is dropped but costs the lossless flag.
    assert!(!preview.lossless);
    assert!(preview
        .properties
        .iter()
        .all(|property| property.name != "__proto__"));
}

#[test]
fn previewable_budget() {
    let sim = Sim::new();
    let empty = FxHashSet::default();

    let simple = sim.object();
    sim.define(simple, "a", 1);
    assert!(previewable(&sim, &Value::Object(simple), &empty, 3));

    assert!(previewable(&sim, &Value::Number(1.0), &empty, 3));
    assert!(previewable(&sim, &Value::Null, &empty, 3));

    let busy = sim.object();
    for name in ["a", "b", "c", "d"] {
        sim.define(busy, name, 1);
    }
    assert!(!previewable(&sim, &Value::Object(busy), &empty, 3));

    let guarded = sim.object();
    sim.define_accessor(guarded, "x", Some(sim.getter(1.into())), None, true);
    assert!(!previewable(&sim, &Value::Object(guarded), &empty, 3));

    let small_array = sim.array((0..5).map(Value::from).collect());
    assert!(previewable(&sim, &Value::Object(small_array), &empty, 3));
    let big_array = sim.array((0..6).map(Value::from).collect());
    assert!(!previewable(&sim, &Value::Object(big_array), &empty, 3));

    // Three levels of nesting fit the depth budget, four do not.
    let d3 = sim.object();
    let c3 = sim.object();
    sim.define(c3, "d", Value::Object(d3));
    let b3 = sim.object();
    sim.define(b3, "c", Value::Object(c3));
    assert!(previewable(&sim, &Value::Object(b3), &empty, 3));
    let a4 = sim.object();
    sim.define(a4, "b", Value::Object(b3));
    assert!(!previewable(&sim, &Value::Object(a4), &empty, 3));

    let cyclic = sim.object();
    sim.define(cyclic, "me", Value::Object(cyclic));
    assert!(!previewable(&sim, &Value::Object(cyclic), &empty, 3));

    let map = sim.map_object(Vec::new());
    assert!(!previewable(&sim, &Value::Object(map), &empty, 3));

    let instance = sim.instance_of("Point");
    assert!(!previewable(&sim, &Value::Object(instance), &empty, 3));
}

#[test]
fn proxies_preview_their_target_non_losslessly() {
    let sim = Sim::new();
    let target = sim.object();
    sim.define(target, "a", 1);
    let proxy = sim.proxy(target);
    let mut inspector = inspector(sim);

    let wire = inspector.describe(
        &Value::Object(proxy),
        DescribeOptions {
            generate_preview: true,
            ..DescribeOptions::default()
        },
    );
    assert_eq!(wire.description.as_deref(), Some("Proxy"));
    let preview = wire.preview.unwrap();
    assert!(!preview.lossless);
    assert_eq!(preview.properties[0].name, "a");
}

#[test]
fn table_previews_recurse_rows_with_column_filters() {
    let sim = Sim::new();
    let rows: Vec<Value> = [("ada", 36), ("alan", 41)]
        .into_iter()
        .map(|(name, age)| {
            let row = sim.object();
            sim.define(row, "name", name);
            sim.define(row, "age", age);
            Value::Object(row)
        })
        .collect();
    let table = sim.array(rows);
    let mut inspector = inspector(sim);

    let columns = [SmolStr::new("name")];
    let wire = inspector.describe_table(&Value::Object(table), Some(&columns));
    let preview = wire.preview.unwrap();
    assert_eq!(preview.properties.len(), 2);
    for property in &preview.properties {
        let row = property.value_preview.as_ref().unwrap();
        assert_eq!(row.properties.len(), 1);
        assert_eq!(row.properties[0].name, "name");
    }
}

#[test]
fn internal_properties_surface_first() {
    let sim = Sim::new();
    let promise = sim.object();
    sim.set_class_name(promise, "Promise");
    sim.set_constructor_name(promise, None);
    sim.define_internal(promise, "status", "pending".into());
    sim.define_internal(promise, "result", 7.into());
    let mut inspector = inspector(sim);

    let handle = inspector.bind(Value::Object(promise), None);
    let descriptors = inspector.internal_properties(handle).unwrap();
    assert_eq!(descriptors.len(), 2);
    assert_eq!(descriptors[0].name, "status");
    assert_eq!(
        descriptors[0].value.as_ref().unwrap().value,
        Some(serde_json::json!("pending"))
    );

    let preview = inspector.preview(&Value::Object(promise), SecondLevel::Auto);
    assert_eq!(preview.properties[0].name, "status");
    assert_eq!(preview.properties[0].internal, Some(true));
}

#[test]
fn call_frames_wrap_scope_chains() {
    let sim = Sim::new();
    let locals = sim.object();
    sim.define(locals, "x", 1);
    let global = sim.object();
    let frames = vec![FrameInfo {
        function_name: "compute".to_string(),
        script_id: "42".into(),
        line: 12,
        column: 3,
        scope_chain: vec![
            ScopeInfo {
                kind: ScopeKind::Closure,
                object: Value::Object(locals),
                name: Some("compute".into()),
            },
            ScopeInfo {
                kind: ScopeKind::Global,
                object: Value::Object(global),
                name: None,
            },
        ],
        this_value: Value::Undefined,
    }];
    let mut inspector = Inspector::new(sim, 9);

    let wrapped = inspector.wrap_call_frames(&frames);
    assert_eq!(wrapped.len(), 1);
    let frame = &wrapped[0];
    assert_eq!(
        frame.call_frame_id,
        CallFrameId {
            session_id: 9,
            ordinal: 0
        }
    );
    assert_eq!(frame.function_name, "compute");
    assert_eq!(frame.location.line_number, 12);
    assert_eq!(frame.scope_chain[0].kind, ScopeKind::Closure);
    assert!(!frame.scope_chain[0].empty);
    assert!(frame.scope_chain[1].empty);
    assert_eq!(frame.this.kind, ValueKind::Undefined);

    assert_eq!(
        inspector.call_frame(&frames, 1),
        Err(InspectError::InvalidOrdinal(1))
    );
}

#[test]
fn forced_values_serialize_in_place() {
    let sim = Sim::new();
    let object = sim.object();
    sim.define(object, "a", 1);
    sim.define(object, "b", "two");
    let mut inspector = inspector(sim);

    let wire = inspector.describe(
        &Value::Object(object),
        DescribeOptions {
            force_value: true,
            ..DescribeOptions::default()
        },
    );
    assert_eq!(wire.object_id, None);
    assert_eq!(
        wire.value,
        Some(serde_json::json!({ "a": 1.0, "b": "two" }))
    );
}
