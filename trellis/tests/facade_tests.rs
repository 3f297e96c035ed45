//! Facade-level behavior: scalars, mappings, markers, policies, paths,
//! objects, sets, extension, equality and inference.

use pretty_assertions::assert_eq;
use trellis::prelude::*;
use trellis::validators::Coerce;

fn empty_map() -> Value {
    Value::map(Vec::<(Value, Value)>::new())
}

#[test]
fn literal_matches_by_equality() {
    let schema = Schema::new(Node::from("foo")).unwrap();
    assert_eq!(schema.validate(&Value::from("foo")), Ok(Value::from("foo")));
    let errors = schema.validate(&Value::from("bar")).unwrap_err();
    assert_eq!(errors.to_string(), "not a valid value");
    assert_eq!(errors.kind(), ErrorKind::Value);
}

#[test]
fn null_literal_matches_only_null() {
    let schema = Schema::new(Node::Literal(Value::Null)).unwrap();
    assert!(schema.validate(&Value::Null).is_ok());
    // Falsy values are not null.
    assert!(schema.validate(&Value::Int(0)).is_err());
    assert!(schema.validate(&Value::from("")).is_err());
}

#[test]
fn null_type_reports_null_semantics() {
    let schema = Schema::new(Node::Type(Kind::Null)).unwrap();
    assert!(schema.validate(&Value::Null).is_ok());
    let errors = schema.validate(&Value::Int(0)).unwrap_err();
    assert_eq!(errors.message(), "expected a null value");
}

#[test]
fn boolean_types_and_literals_disambiguate() {
    let bool_type = Schema::new(Node::Type(Kind::Bool)).unwrap();
    assert!(bool_type.validate(&Value::Int(1)).is_err());
    assert!(bool_type.validate(&Value::Int(0)).is_err());
    assert!(bool_type.validate(&Value::from("")).is_err());
    assert!(bool_type.validate(&Value::Bool(true)).is_ok());

    // The literal compares by numeric equality, so integer 1 passes.
    let true_literal = Schema::new(Node::from(true)).unwrap();
    assert!(true_literal.validate(&Value::Bool(true)).is_ok());
    assert!(true_literal.validate(&Value::Int(1)).is_ok());
    assert!(true_literal.validate(&Value::Bool(false)).is_err());
}

#[test]
fn type_mismatches_name_the_expected_kind() {
    let schema = Schema::new(Node::Type(Kind::Int)).unwrap();
    let errors = schema.validate(&Value::from("x")).unwrap_err();
    assert_eq!(errors.to_string(), "expected an integer");
    assert_eq!(errors.kind(), ErrorKind::Type);
}

#[test]
fn mapping_validates_keys_and_values() {
    let schema = Schema::new(Node::mapping([("one", "two"), ("three", "four")])).unwrap();

    let errors = schema.validate(&Value::map([("one", "three")])).unwrap_err();
    assert_eq!(
        errors.to_string(),
        "not a valid value for dictionary value @ data['one']"
    );
    assert_eq!(errors.message(), "not a valid value");

    let errors = schema.validate(&Value::map([("two", "three")])).unwrap_err();
    assert_eq!(errors.to_string(), "extra keys not allowed @ data['two']");
    assert_eq!(errors.kind(), ErrorKind::Extra);

    let errors = schema.validate(&Value::Int(1)).unwrap_err();
    assert_eq!(errors.to_string(), "expected a dictionary");
}

#[test]
fn pattern_keys_match_by_type() {
    let schema = Schema::new(Node::mapping([(
        Key::from(Kind::Int),
        Node::Type(Kind::Str),
    )]))
    .unwrap();
    assert!(schema
        .validate(&Value::map([(Value::Int(10), Value::from("twenty"))]))
        .is_ok());

    // A string key does not satisfy the int pattern; the key error is
    // reported rather than a generic extra-key error.
    let errors = schema
        .validate(&Value::map([("10", "twenty")]))
        .unwrap_err();
    assert_eq!(errors.to_string(), "expected an integer @ data['10']");
}

#[test]
fn coercing_pattern_keys_transform_keys() {
    let schema = Schema::new(Node::mapping([(
        Key::from(Node::from(Coerce::new(Kind::Int))),
        Node::Type(Kind::Str),
    )]))
    .unwrap();
    let out = schema.validate(&Value::map([("10", "twenty")])).unwrap();
    assert_eq!(out, Value::map([(Value::Int(10), Value::from("twenty"))]));
}

#[test]
fn failing_pattern_keys_report_per_pair() {
    // A coercing key that rejects non-numeric strings.
    let as_int = Node::from(Coerce::new(Kind::Int).msg("expecting a number"));
    let schema = Schema::new(Node::mapping([(Key::from(as_int), Node::Type(Kind::Str))])).unwrap();
    let errors = schema
        .validate(&Value::map([
            ("1", "one"),
            ("two", "2"),
            ("3", "three"),
            ("four", "4"),
        ]))
        .unwrap_err();
    assert_eq!(errors.len(), 2);
    let rendered: Vec<String> = errors.iter().map(ToString::to_string).collect();
    assert_eq!(rendered[0], "expecting a number @ data['two']");
    assert_eq!(rendered[1], "expecting a number @ data['four']");
}

#[test]
fn required_keys_report_when_missing() {
    let schema = Schema::new(Node::mapping([(
        Key::from(required("q")),
        Node::Type(Kind::Int),
    )]))
    .unwrap();
    schema.validate(&Value::map([("q", 123)])).unwrap();
    let errors = schema.validate(&empty_map()).unwrap_err();
    assert_eq!(errors.to_string(), "required key not provided @ data['q']");
    assert_eq!(errors.kind(), ErrorKind::Required);
}

#[test]
fn required_key_custom_message() {
    let schema = Schema::new(Node::mapping([(
        Key::from(required("one").msg("required")),
        Node::from("two"),
    )]))
    .unwrap();
    let errors = schema.validate(&empty_map()).unwrap_err();
    assert_eq!(errors.to_string(), "required @ data['one']");
}

#[test]
fn required_by_default_options() {
    let schema = Schema::compile(
        Node::mapping([("k", Node::Type(Kind::Int))]),
        Options::new().required(true),
    )
    .unwrap();
    assert!(schema.validate(&empty_map()).is_err());
    assert!(schema.validate(&Value::map([("k", 1)])).is_ok());

    // Optional markers stay exempt.
    let schema = Schema::compile(
        Node::mapping([(Key::from(optional("k")), Node::Type(Kind::Int))]),
        Options::new().required(true),
    )
    .unwrap();
    assert_eq!(schema.validate(&empty_map()), Ok(empty_map()));
}

#[test]
fn missing_required_keys_report_alphabetically() {
    let schema = Schema::compile(
        Node::mapping([
            ("foo", Node::Type(Kind::Int)),
            ("bar", Node::Type(Kind::Int)),
        ]),
        Options::new().required(true),
    )
    .unwrap();
    let errors = schema.validate(&empty_map()).unwrap_err();
    let paths: Vec<String> = errors
        .iter()
        .map(|e| trellis::format_path(e.path()))
        .collect();
    assert_eq!(paths, vec!["data['bar']", "data['foo']"]);
}

#[test]
fn required_defaulting() {
    let schema = Schema::new(Node::mapping([(
        Key::from(required("k").default_value(5)),
        Node::Type(Kind::Int),
    )]))
    .unwrap();
    assert_eq!(schema.validate(&empty_map()), Ok(Value::map([("k", 5)])));

    // A provided value wins over the default.
    assert_eq!(
        schema.validate(&Value::map([("k", 7)])),
        Ok(Value::map([("k", 7)]))
    );
}

#[test]
fn optional_defaults_and_factories() {
    let schema = Schema::new(Node::mapping([
        (
            Key::from(optional("n").default_value(1)),
            Node::Type(Kind::Int),
        ),
        (
            Key::from(optional("xs").default_factory(|| Value::list(Vec::<Value>::new()))),
            Node::Type(Kind::List),
        ),
    ]))
    .unwrap();
    assert_eq!(
        schema.validate(&empty_map()),
        Ok(Value::map([
            ("n", Value::Int(1)),
            ("xs", Value::list(Vec::<Value>::new())),
        ]))
    );
}

#[test]
fn extra_key_policies() {
    let tree = Node::mapping(Vec::<(Key, Node)>::new());

    let forbid = Schema::new(tree.clone()).unwrap();
    assert_eq!(forbid.validate(&empty_map()), Ok(empty_map()));
    let errors = forbid.validate(&Value::map([("x", 1)])).unwrap_err();
    assert_eq!(errors.to_string(), "extra keys not allowed @ data['x']");

    let allow = Schema::compile(tree.clone(), Options::new().extra(ExtraPolicy::Allow)).unwrap();
    assert_eq!(
        allow.validate(&Value::map([("x", 1)])),
        Ok(Value::map([("x", 1)]))
    );

    let remove = Schema::compile(tree, Options::new().extra(ExtraPolicy::Remove)).unwrap();
    assert_eq!(remove.validate(&Value::map([("x", 1)])), Ok(empty_map()));
}

#[test]
fn extra_sentinel_passes_unmatched_pairs() {
    let schema = Schema::new(Node::mapping([
        (Key::from(required("toaster")), Node::Type(Kind::Str)),
        (Key::Extra, Node::Type(Kind::Int)),
    ]))
    .unwrap();
    let input = Value::map([
        ("toaster", Value::from("blue")),
        ("another_valid_key", Value::from("another_valid_value")),
    ]);
    // The sentinel accepts key and value unchanged; the paired schema is
    // not applied.
    assert_eq!(schema.validate(&input), Ok(input.clone()));
}

#[test]
fn error_paths_are_precise() {
    let schema = Schema::new(Node::mapping([(
        Key::from("a"),
        Node::mapping([("b", Node::Type(Kind::Int))]),
    )]))
    .unwrap();
    let errors = schema
        .validate(&Value::map([("a", Value::map([("b", "x")]))]))
        .unwrap_err();
    assert_eq!(
        errors.path().to_vec(),
        vec![PathSegment::key("a"), PathSegment::key("b")]
    );
    assert_eq!(
        errors.to_string(),
        "expected an integer for dictionary value @ data['a']['b']"
    );
}

#[test]
fn every_failure_is_reported() {
    let schema = Schema::new(Node::mapping([
        ("a", Node::Type(Kind::Int)),
        ("b", Node::list([Node::Type(Kind::Str)])),
    ]))
    .unwrap();
    let errors = schema
        .validate(&Value::map([
            ("a", Value::from("not an int")),
            ("b", Value::list([123])),
        ]))
        .unwrap_err();
    assert_eq!(errors.len(), 2);
    let rendered: Vec<String> = errors.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "expected an integer for dictionary value @ data['a']".to_string(),
            "expected a string @ data['b'][0]".to_string(),
        ]
    );
}

#[test]
fn list_element_errors_carry_index_paths() {
    let is_even = Node::Custom(trellis::CustomValidator::new("is_even", |v: &Value| match v {
        Value::Int(i) if i % 2 == 0 => Ok(v.clone()),
        Value::Int(i) => Err(ValidationError::new(ErrorKind::Value, format!("{i} is not even")).into()),
        _ => Err(ValidationError::new(ErrorKind::Type, "expected an integer").into()),
    }));
    let schema = Schema::new(Node::mapping([(
        Key::from("even_numbers"),
        Node::list([all([Node::Type(Kind::Int), is_even])]),
    )]))
    .unwrap();
    let errors = schema
        .validate(&Value::map([("even_numbers", Value::list([3]))]))
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.to_string(), "3 is not even @ data['even_numbers'][0]");
}

#[test]
fn ordered_mappings_keep_key_order() {
    let schema = Schema::new(Node::mapping([(
        Key::from(Kind::Float),
        Node::Type(Kind::Float),
    )]))
    .unwrap();
    let data = Value::map([
        (Value::Float(5.0), Value::Float(3.7)),
        (Value::Float(24.0), Value::Float(8.7)),
        (Value::Float(43.0), Value::Float(1.5)),
    ]);
    let out = schema.validate(&data).unwrap();
    let in_keys: Vec<Value> = data.as_map().unwrap().keys().cloned().collect();
    let out_keys: Vec<Value> = out.as_map().unwrap().keys().cloned().collect();
    assert_eq!(in_keys, out_keys);
}

#[test]
fn remove_drops_matched_keys() {
    let schema = Schema::new(Node::mapping([
        (Key::from("weight"), Node::Type(Kind::Int)),
        (Key::from(remove("color")), Node::Type(Kind::Str)),
        (Key::from(remove("amount")), Node::Type(Kind::Int)),
    ]))
    .unwrap();
    let out = schema
        .validate(&Value::map([
            ("weight", Value::Int(10)),
            ("color", Value::from("red")),
            ("amount", Value::Int(1)),
        ]))
        .unwrap();
    assert_eq!(out, Value::map([("weight", 10)]));
}

#[test]
fn remove_pattern_keys_fall_through_on_value_mismatch() {
    let schema = Schema::new(Node::mapping([
        (Key::from("weight"), Node::Type(Kind::Float)),
        (Key::from("amount"), Node::Type(Kind::Int)),
        // Remove string keys with int values, keep string keys with
        // string values.
        (Key::from(remove(Kind::Str)), Node::Type(Kind::Int)),
        (Key::from(Kind::Str), Node::Type(Kind::Str)),
    ]))
    .unwrap();
    let out = schema
        .validate(&Value::map([
            ("weight", Value::Float(73.4)),
            ("condition", Value::from("new")),
            ("amount", Value::Int(5)),
            ("left", Value::Int(2)),
        ]))
        .unwrap();
    let out = out.as_map().unwrap();
    assert!(out.contains_key(&Value::from("amount")));
    assert!(!out.contains_key(&Value::from("left")));
    assert!(out.contains_key(&Value::from("condition")));
}

#[test]
fn remove_in_sequences_drops_elements() {
    let schema = Schema::new(Node::list([Node::from(remove(1)), Node::Type(Kind::Int)])).unwrap();
    let out = schema
        .validate(&Value::list([1, 2, 3, 4, 1, 5, 6, 1, 1, 1]))
        .unwrap();
    assert_eq!(out, Value::list([2, 3, 4, 5, 6]));

    let schema = Schema::new(Node::list([
        Node::from(1.0),
        Node::from(remove(Kind::Float)),
        Node::Type(Kind::Int),
    ]))
    .unwrap();
    let out = schema
        .validate(&Value::list([
            Value::Int(1),
            Value::Int(2),
            Value::Float(1.0),
            Value::Float(2.0),
            Value::Float(3.0),
            Value::Int(4),
        ]))
        .unwrap();
    assert_eq!(
        out,
        Value::list([Value::Int(1), Value::Int(2), Value::Float(1.0), Value::Int(4)])
    );
}

#[test]
fn exclusive_groups_allow_at_most_one_member() {
    let schema = Schema::new(Node::mapping([
        (Key::from(exclusive("x", "stuff")), Node::Type(Kind::Int)),
        (Key::from(exclusive("y", "stuff")), Node::Type(Kind::Int)),
    ]))
    .unwrap();
    assert_eq!(schema.validate(&empty_map()), Ok(empty_map()));
    assert_eq!(
        schema.validate(&Value::map([("x", 1)])),
        Ok(Value::map([("x", 1)]))
    );
    let errors = schema
        .validate(&Value::map([("x", 1), ("y", 2)]))
        .unwrap_err();
    assert_eq!(
        errors.to_string(),
        "two or more values in the same group of exclusion 'stuff' @ data[<stuff>]"
    );
    assert_eq!(errors.kind(), ErrorKind::Exclusion);
}

#[test]
fn inclusive_groups_require_all_or_none() {
    let schema = Schema::new(Node::mapping([
        (Key::from(inclusive("x", "stuff")), Node::Type(Kind::Int)),
        (Key::from(inclusive("y", "stuff")), Node::Type(Kind::Int)),
    ]))
    .unwrap();
    assert_eq!(schema.validate(&empty_map()), Ok(empty_map()));
    assert_eq!(
        schema.validate(&Value::map([("x", 1), ("y", 2)])),
        Ok(Value::map([("x", 1), ("y", 2)]))
    );
    let errors = schema.validate(&Value::map([("x", 1)])).unwrap_err();
    assert_eq!(
        errors.to_string(),
        "some but not all values in the same group of inclusion 'stuff' @ data[<stuff>]"
    );
    assert_eq!(errors.kind(), ErrorKind::Inclusion);
}

#[test]
fn inclusive_group_defaults_fill_a_fully_absent_group() {
    let schema = Schema::new(Node::mapping([
        (
            Key::from(inclusive("x", "stuff").default_value(3)),
            Node::Type(Kind::Int),
        ),
        (
            Key::from(inclusive("y", "stuff").default_value(4)),
            Node::Type(Kind::Int),
        ),
    ]))
    .unwrap();
    assert_eq!(
        schema.validate(&empty_map()),
        Ok(Value::map([("x", 3), ("y", 4)]))
    );
    // Presence is judged on the raw input; defaults do not repair a
    // half-present group.
    assert!(schema.validate(&Value::map([("x", 1)])).is_err());
}

#[test]
fn object_schemas_match_attributes() {
    let schema = Schema::compile(
        Node::object([("value", 1)]),
        Options::new().required(true),
    )
    .unwrap();
    let ok = Instance::new().with("value", 1);
    assert_eq!(
        schema.validate(&Value::Object(ok.clone())),
        Ok(Value::Object(ok))
    );

    let errors = schema
        .validate(&Value::Object(Instance::new().with("value", 2)))
        .unwrap_err();
    assert_eq!(
        errors.to_string(),
        "not a valid value for object value @ data['value']"
    );

    assert!(schema.validate(&Value::Int(345)).is_err());
}

#[test]
fn object_class_restrictions() {
    let schema = Schema::new(Node::object_of_class(
        "Point",
        [("x", Node::Type(Kind::Int))],
    ))
    .unwrap();
    assert!(schema
        .validate(&Value::Object(Instance::of_class("Point").with("x", 1)))
        .is_ok());
    let errors = schema
        .validate(&Value::Object(Instance::of_class("Other").with("x", 1)))
        .unwrap_err();
    assert_eq!(errors.message(), "expected an instance of 'Point'");
}

#[test]
fn object_null_attributes_are_absent() {
    let schema = Schema::new(Node::object_of_class(
        "Point",
        [("x", Node::Type(Kind::Int))],
    ))
    .unwrap();
    let instance = Instance::of_class("Point").with("x", 1).with("y", Value::Null);
    let out = schema.validate(&Value::Object(instance)).unwrap();
    assert_eq!(
        out,
        Value::Object(Instance::of_class("Point").with("x", 1))
    );
}

#[test]
fn set_schemas_validate_element_shapes() {
    let schema = Schema::new(Node::set([Node::Type(Kind::Int)])).unwrap();
    let errors = schema.validate(&Value::Int(42)).unwrap_err();
    assert_eq!(errors.to_string(), "expected a set");
    assert!(schema.validate(&Value::frozen_set([42])).is_err());

    assert!(schema.validate(&Value::set(Vec::<Value>::new())).is_ok());
    assert!(schema.validate(&Value::set([42])).is_ok());
    assert!(schema.validate(&Value::set([42, 43, 44])).is_ok());

    let errors = schema.validate(&Value::set(["abc"])).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.to_string(), "invalid value in set");

    // Several failing elements still collapse into exactly one error.
    let errors = schema.validate(&Value::set(["a", "b"])).unwrap_err();
    assert_eq!(errors.len(), 1);
}

#[test]
fn frozenset_schemas_are_distinct() {
    let schema = Schema::new(Node::frozen_set([Node::Type(Kind::Int)])).unwrap();
    let errors = schema.validate(&Value::set([42])).unwrap_err();
    assert_eq!(errors.to_string(), "expected a frozenset");
    assert!(schema.validate(&Value::frozen_set([42, 43])).is_ok());
    let errors = schema.validate(&Value::frozen_set(["abc"])).unwrap_err();
    assert_eq!(errors.to_string(), "invalid value in frozenset");
}

#[test]
fn mixed_set_schemas_accept_any_allowed_shape() {
    let schema = Schema::new(Node::set([Node::Type(Kind::Int), Node::Type(Kind::Str)])).unwrap();
    assert!(schema
        .validate(&Value::set([Value::Int(42), Value::from("abc")]))
        .is_ok());
    let errors = schema.validate(&Value::set([Value::Null])).unwrap_err();
    assert_eq!(errors.len(), 1);
}

#[test]
fn empty_sequence_schema_is_identity() {
    let schema = Schema::new(Node::list(Vec::<Node>::new())).unwrap();
    assert_eq!(
        schema.validate(&Value::list([123])),
        Ok(Value::list([123]))
    );
    assert!(schema.validate(&Value::Int(1)).is_err());
    assert!(schema.validate(&Value::tuple([1])).is_err());
}

#[test]
fn tuples_and_lists_are_distinct_containers() {
    let list_schema = Schema::new(Node::list([Node::Type(Kind::Int)])).unwrap();
    assert!(list_schema.validate(&Value::tuple([1])).is_err());

    let tuple_schema = Schema::new(Node::tuple([Node::Type(Kind::Int)])).unwrap();
    assert_eq!(
        tuple_schema.validate(&Value::tuple([1])),
        Ok(Value::tuple([1]))
    );
    let errors = tuple_schema.validate(&Value::list([1])).unwrap_err();
    assert_eq!(errors.to_string(), "expected a tuple");
}

#[test]
fn validation_does_not_mutate_the_input() {
    let schema = Schema::new(Node::mapping([(
        Key::from(Kind::Str),
        Node::from(Coerce::new(Kind::Int)),
    )]))
    .unwrap();
    let input = Value::map([("a", "1"), ("b", "2")]);
    let out = schema.validate(&input).unwrap();
    assert_eq!(input, Value::map([("a", "1"), ("b", "2")]));
    assert_eq!(out, Value::map([("a", 1), ("b", 2)]));
}

#[test]
fn extend_merges_without_mutating() {
    let base = Schema::compile(
        Node::mapping([("a", Node::Type(Kind::Int))]),
        Options::new().required(true),
    )
    .unwrap();
    let extended = base
        .extend(Node::mapping([("b", Node::Type(Kind::Str))]))
        .unwrap();

    assert_eq!(base.node(), &Node::mapping([("a", Node::Type(Kind::Int))]));
    assert_eq!(
        extended.node(),
        &Node::mapping([("a", Node::Type(Kind::Int)), ("b", Node::Type(Kind::Str))])
    );
    assert_eq!(extended.options(), base.options());
}

#[test]
fn extend_overrides_options() {
    let base = Schema::compile(
        Node::mapping([("a", Node::Type(Kind::Int))]),
        Options::new().required(true),
    )
    .unwrap();
    let extended = base
        .extend_with(
            Node::mapping([("b", Node::Type(Kind::Str))]),
            Some(false),
            Some(ExtraPolicy::Allow),
        )
        .unwrap();
    assert!(base.options().required);
    assert_eq!(base.options().extra, ExtraPolicy::Forbid);
    assert!(!extended.options().required);
    assert_eq!(extended.options().extra, ExtraPolicy::Allow);
}

#[test]
fn extend_merges_sub_mappings_with_right_hand_precedence() {
    let base = Schema::new(Node::mapping([(
        Key::from("a"),
        Node::mapping([("b", Node::Type(Kind::Int)), ("c", Node::Type(Kind::Float))]),
    )]))
    .unwrap();
    let extended = base
        .extend(Node::mapping([
            (Key::from("d"), Node::Type(Kind::Str)),
            (
                Key::from("a"),
                Node::mapping([("b", Node::Type(Kind::Str)), ("e", Node::Type(Kind::Int))]),
            ),
        ]))
        .unwrap();
    assert_eq!(
        extended.node(),
        &Node::mapping([
            (
                Key::from("a"),
                Node::mapping([
                    ("b", Node::Type(Kind::Str)),
                    ("c", Node::Type(Kind::Float)),
                    ("e", Node::Type(Kind::Int)),
                ]),
            ),
            (Key::from("d"), Node::Type(Kind::Str)),
        ])
    );
}

#[test]
fn schema_equality_is_structural() {
    assert_eq!(
        Schema::new(Node::from("foo")).unwrap(),
        Schema::new(Node::from("foo")).unwrap()
    );
    assert_ne!(
        Schema::new(Node::from("foo")).unwrap(),
        Schema::new(Node::from("bar")).unwrap()
    );

    // Equivalent mappings built in different orders are equal.
    let a = Schema::new(Node::mapping([("foo", 1), ("bar", 2), ("baz", 3)])).unwrap();
    let b = Schema::new(Node::mapping([("baz", 3), ("bar", 2), ("foo", 1)])).unwrap();
    assert_eq!(a, b);

    let mut set = std::collections::HashSet::new();
    set.insert(a);
    set.insert(b);
    assert_eq!(set.len(), 1);

    // Options are part of identity.
    let node = Node::mapping([("a", Node::Type(Kind::Int))]);
    assert_ne!(
        Schema::new(node.clone()).unwrap(),
        Schema::compile(node, Options::new().required(true)).unwrap()
    );
}

#[test]
fn infer_builds_required_typed_mappings() {
    let schema = Schema::infer(&Value::map([
        ("str", Value::from("foo")),
        ("bool", Value::Bool(true)),
        ("int", Value::Int(42)),
        ("float", Value::Float(3.14)),
    ]))
    .unwrap();
    assert_eq!(
        schema.node(),
        &Node::mapping([
            (Key::from(required("str")), Node::Type(Kind::Str)),
            (Key::from(required("bool")), Node::Type(Kind::Bool)),
            (Key::from(required("int")), Node::Type(Kind::Int)),
            (Key::from(required("float")), Node::Type(Kind::Float)),
        ])
    );
}

#[test]
fn infer_recurses_and_handles_scalars() {
    let schema = Schema::infer(&Value::map([(
        "a",
        Value::map([("b", Value::from("foo"))]),
    )]))
    .unwrap();
    assert_eq!(
        schema.node(),
        &Node::mapping([(
            Key::from(required("a")),
            Node::mapping([(Key::from(required("b")), Node::Type(Kind::Str))]),
        )])
    );

    assert_eq!(
        Schema::infer(&Value::from("foo")).unwrap().node(),
        &Node::Type(Kind::Str)
    );
    assert_eq!(
        Schema::infer(&empty_map()).unwrap().node(),
        &Node::Type(Kind::Map)
    );
    assert_eq!(
        Schema::infer(&Value::map([(
            "list",
            Value::list([Value::from("foo"), Value::Bool(true), Value::Int(42)]),
        )]))
        .unwrap()
        .node(),
        &Node::mapping([(
            Key::from(required("list")),
            Node::List(vec![
                Node::Type(Kind::Str),
                Node::Type(Kind::Bool),
                Node::Type(Kind::Int),
            ]),
        )])
    );
}

#[test]
fn duplicate_literal_keys_are_a_schema_error() {
    let result = Schema::new(Node::mapping([("a", 1), ("a", 2)]));
    assert!(matches!(result, Err(SchemaError::DuplicateKey { .. })));
}
