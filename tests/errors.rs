use json_field::{
    Array, Date, Error, Field, FieldType, Int, Json, JsonKind, Num, ParseError, Str, Variant, codec,
    json_object,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

json_object! {
    pub struct Inner {
        pub b: Int,
    }
}

json_object! {
    pub struct Outer {
        pub a: Inner,
        pub list: Array<Int>,
        pub name: Str,
    }
}

fn parse_into(target: &mut dyn Field, text: &str) -> Result<(), ParseError> {
    json_field::from_str(text, target)
}

#[rstest]
#[case::int(Box::new(Int::default()))]
#[case::num(Box::new(Num::default()))]
#[case::str(Box::new(Str::default()))]
#[case::date(Box::new(Date::default()))]
#[case::array(Box::new(Array::<Int>::new()))]
#[case::object(Box::new(Outer::default()))]
#[case::variant(Box::new(Variant::new()))]
fn empty_and_null_inputs(#[case] mut target: Box<dyn Field>) {
    parse_into(target.as_mut(), "").unwrap();
    assert!(target.is_undefined());
    assert!(!target.is_null());
    assert!(!target.has_value());

    parse_into(target.as_mut(), "null").unwrap();
    assert!(!target.is_undefined());
    assert!(target.is_null());
}

#[test]
fn hex_and_exponent_literals() {
    let mut int = Int::default();
    int.from_json("0x1F").unwrap();
    assert_eq!(int.get(), Some(&31));

    let mut num = Num::default();
    num.from_json("1.5e3").unwrap();
    assert_eq!(num.get(), Some(&1500.0));
}

#[test]
fn string_into_int_is_a_type_mismatch() {
    let mut int = Int::default();
    let error = int.from_json("\"abc\"").unwrap_err();
    assert_eq!(
        error.error(),
        &Error::TypeMismatch { field: "<root>".into(), expected: FieldType::Int, actual: JsonKind::String }
    );
    assert_eq!(error.offset(), 0);
    assert!(int.is_undefined());
}

#[test]
fn dotted_key_defines_the_outer_field() {
    let mut outer = Outer::default();
    outer.from_json(r#"{"a.b": 1}"#).unwrap();
    assert_eq!(outer.a.b.get(), Some(&1));
    assert!(outer.a.has_value());
}

#[test]
fn failure_resets_a_populated_tree() {
    let mut outer = Outer::default();
    outer.from_json(r#"{"name": "x", "list": [1, 2]}"#).unwrap();
    assert!(outer.has_value());

    let error = outer.from_json(r#"{"name": "y", "list": [1, 2.5]}"#).unwrap_err();
    assert_eq!(error.error(), &Error::UnexpectedCharacter);
    assert_eq!(error.offset(), 27);
    assert!(outer.is_undefined());
    assert!(outer.name.is_undefined());
    assert_eq!(outer.list.len(), 0);
}

#[rstest]
#[case("[1, 2", Error::UnexpectedEndOfInput, 5)]
#[case("[1 2]", Error::UnexpectedCharacter, 3)]
#[case("[1, 2]]", Error::UnexpectedCharacter, 6)]
#[case("[\"x\"]", Error::TypeMismatch { field: "<root>[0]".into(), expected: FieldType::Int, actual: JsonKind::String }, 1)]
#[case("[{}]", Error::TypeMismatch { field: "<root>[0]".into(), expected: FieldType::Int, actual: JsonKind::Object }, 1)]
#[case("{}", Error::TypeMismatch { field: "<root>".into(), expected: FieldType::Arr, actual: JsonKind::Object }, 0)]
#[case("[true]", Error::TypeMismatch { field: "<root>[0]".into(), expected: FieldType::Int, actual: JsonKind::Bool }, 1)]
#[case("[-]", Error::MalformedNumber("-".into()), 1)]
#[case("[1e5]", Error::UnexpectedCharacter, 2)]
#[case("[nul]", Error::UnexpectedCharacter, 4)]
fn int_array_diagnostics(#[case] text: &str, #[case] expected: Error, #[case] offset: usize) {
    let mut array = Array::<Int>::new();
    let error = array.from_json(text).unwrap_err();
    assert_eq!(error.error(), &expected);
    assert_eq!(error.offset(), offset);
    assert!(array.is_undefined());
}

#[test]
fn mismatch_names_the_member() {
    let mut outer = Outer::default();
    let error = outer.from_json(r#"{"list": 3}"#).unwrap_err();
    assert_eq!(
        error.error(),
        &Error::TypeMismatch { field: "list".into(), expected: FieldType::Arr, actual: JsonKind::Number }
    );
    assert_eq!(error.offset(), 9);
    assert_eq!(error.to_string(), "type mismatch on `list`: expected arr, found number at byte 9");
    assert_eq!(error.into_error().to_string(), "type mismatch on `list`: expected arr, found number");
}

#[test]
fn dotted_key_through_a_leaf_is_rejected_at_the_key() {
    let mut outer = Outer::default();
    let error = outer.from_json(r#"{"name": "n", "name.x": 1}"#).unwrap_err();
    assert_eq!(
        error.error(),
        &Error::TypeMismatch { field: "name.x".into(), expected: FieldType::Str, actual: JsonKind::Object }
    );
    assert_eq!(error.offset(), 14);
}

#[test]
fn nesting_limit_applies_to_skipped_values_too() {
    let mut outer = Outer::default();
    let deep = format!(r#"{{"unknown": {}}}"#, "[".repeat(codec::MAX_DEPTH));
    let error = outer.from_json(&deep).unwrap_err();
    assert_eq!(error.error(), &Error::NestingTooDeep(codec::MAX_DEPTH));
}

#[test]
fn reader_errors() {
    struct Broken;
    impl std::io::Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk gone"))
        }
    }
    let mut int = Int::new(3);
    let error = int.from_json_reader(Broken).unwrap_err();
    assert_eq!(error.error(), &Error::Io("disk gone".into()));
    assert_eq!(error.offset(), 0);
    assert!(int.is_undefined());

    int.from_json_reader(&b"  42 "[..]).unwrap();
    assert_eq!(int.get(), Some(&42));
}
