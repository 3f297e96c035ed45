//! Property tests: validation of already-validated data is a fixed point.

use proptest::prelude::*;
use trellis::prelude::*;
use trellis::validators::Coerce;

proptest! {
    #[test]
    fn validation_is_idempotent(
        entries in prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..16)
    ) {
        let schema = Schema::new(Node::mapping([(
            Key::from(Kind::Str),
            Node::Type(Kind::Int),
        )]))
        .unwrap();
        let data = Value::map(entries.into_iter().map(|(k, v)| (k, Value::Int(v))));
        let once = schema.validate(&data).unwrap();
        let twice = schema.validate(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn coercion_reaches_a_fixed_point(
        numbers in prop::collection::vec(0i64..1000, 0..10)
    ) {
        let schema = Schema::new(Node::list([Node::from(Coerce::new(Kind::Int))])).unwrap();
        let data = Value::list(numbers.iter().map(|n| n.to_string()));
        let once = schema.validate(&data).unwrap();
        let twice = schema.validate(&once).unwrap();
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once, Value::list(numbers.iter().copied().map(Value::from)));
    }

    #[test]
    fn defaults_are_stable_under_revalidation(
        provided in proptest::option::of(any::<i64>())
    ) {
        let schema = Schema::new(Node::mapping([(
            Key::from(required("k").default_value(5)),
            Node::Type(Kind::Int),
        )]))
        .unwrap();
        let data = match provided {
            Some(v) => Value::map([("k", Value::Int(v))]),
            None => Value::map(Vec::<(Value, Value)>::new()),
        };
        let once = schema.validate(&data).unwrap();
        let twice = schema.validate(&once).unwrap();
        prop_assert_eq!(once, twice);
    }
}
