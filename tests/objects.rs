use json_field::{Array, Date, Field, Int, Json, Num, ObjectField, Schema, Str, Timestamp, Variant, json_object};
use pretty_assertions::assert_eq;

json_object! {
    /// Postal address.
    pub struct Address {
        pub street: Str,
        pub city: Str,
        pub geo: Geo,
    }
}

json_object! {
    pub struct Geo {
        pub lat: Num,
        pub lon: Num,
    }
}

json_object! {
    pub struct Person {
        /// Full name.
        pub name: Str,
        #[key = "years"]
        pub age: Int,
        pub address: Address,
        pub nicknames: Array<Str>,
        pub meta: Variant,
    }
}

json_object! {
    pub struct Employee extends Person {
        pub badge: Int,
        pub hired: Date,
    }
}

json_object! {
    pub struct Manager extends Employee {
        pub reports: Array<Employee>,
    }
}

#[test]
fn fresh_object_is_undefined() {
    let person = Person::default();
    assert!(person.is_undefined());
    assert_eq!(person.to_json(), "");
}

#[test]
fn assigning_a_member_defines_the_parent() {
    let mut person = Person::default();
    person.address.city.set("Lyon");
    assert!(person.address.has_value());
    assert!(person.has_value());
    assert_eq!(person.to_json(), r#"{"address":{"city":"Lyon"}}"#);
}

#[test]
fn undefined_members_leave_no_comma() {
    let mut person = Person::default();
    person.name.set("Ada");
    person.nicknames.push(Str::new("Countess"));
    assert_eq!(person.to_json(), r#"{"name":"Ada","nicknames":["Countess"]}"#);
    let checked: serde_json::Value = serde_json::from_str(&person.to_json()).unwrap();
    assert_eq!(checked["nicknames"][0], "Countess");
}

#[test]
fn dotted_keys_reach_nested_members() {
    let mut person = Person::default();
    person.from_json(r#"{"address.geo.lat": 1.5, "address.city": "Nice"}"#).unwrap();
    assert_eq!(person.address.geo.lat.get(), Some(&1.5));
    assert_eq!(person.address.city.as_str(), Some("Nice"));
    assert!(person.address.has_value());
    assert!(person.name.is_undefined());
    assert_eq!(person.to_json(), r#"{"address":{"city":"Nice","geo":{"lat":1.5}}}"#);
}

#[test]
fn dotted_key_side_effect_on_outer_member() {
    let mut person = Person::default();
    assert!(person.address.is_undefined());
    person.from_json(r#"{"address.street": "Rue 1"}"#).unwrap();
    assert!(person.address.has_value());
    assert_eq!(person.address.street.as_str(), Some("Rue 1"));
}

#[test]
fn dotted_key_into_variant_member_nests() {
    let mut person = Person::default();
    person.from_json(r#"{"meta.tags.first": "x", "meta.n": 2}"#).unwrap();
    assert_eq!(person.meta["tags"]["first"].as_str(), Some("x"));
    assert_eq!(person.meta["n"].as_int(), Some(2));
}

#[test]
fn dotted_key_leaves_a_variant_array_alone() {
    let mut person = Person::default();
    person.from_json(r#"{"meta": [1, 2], "meta.x": 3}"#).unwrap();
    assert_eq!(person.to_json(), r#"{"meta":[1,2]}"#);
}

#[test]
fn renamed_key_is_the_only_spelling() {
    let mut person = Person::default();
    person.from_json(r#"{"age": 1, "years": 40}"#).unwrap();
    assert_eq!(person.age.get(), Some(&40));
    assert_eq!(person.to_json(), r#"{"years":40}"#);
    assert!(person.field("age").is_none());
    assert!(person.field("years").is_some());
}

#[test]
fn inheritance_looks_up_derived_then_base() {
    let mut employee = Employee::default();
    employee
        .from_json(r#"{"name": "Grace", "badge": 3, "hired": "2000-01-01T00:00:00Z", "address.city": "NYC"}"#)
        .unwrap();
    assert_eq!(employee.name.as_str(), Some("Grace"));
    assert_eq!(employee.badge.get(), Some(&3));
    assert_eq!(employee.hired.get(), Some(&Timestamp::from_secs(946_684_800)));
    assert_eq!(
        employee.to_json(),
        r#"{"badge":3,"hired":"2000-01-01T00:00:00Z","name":"Grace","address":{"city":"NYC"}}"#
    );
    assert_eq!(
        employee.field_names(),
        vec!["badge", "hired", "name", "years", "address", "nicknames", "meta"]
    );
}

#[test]
fn registries_hold_own_members_only() {
    let person = Person::registry();
    assert_eq!(person.len(), 5);
    assert!(!person.has_base());
    let employee = Employee::registry();
    assert_eq!(employee.len(), 2);
    assert!(!employee.is_empty());
    assert!(employee.has_base());
    assert_eq!(employee.names().collect::<Vec<_>>(), ["badge", "hired"]);
    assert!(std::ptr::eq(Employee::registry(), employee));
}

#[test]
fn derived_is_undefined_only_with_base_undefined() {
    let mut employee = Employee::default();
    assert!(employee.is_undefined());
    employee.base.name.set("x");
    assert!(employee.has_value());
    employee.clear();
    assert!(employee.is_undefined());
    assert!(employee.base.name.is_undefined());
}

#[test]
fn two_levels_of_inheritance() {
    let mut manager = Manager::default();
    manager
        .from_json(r#"{"reports": [{"badge": 1}, {"name": "B"}], "badge": 9, "years": 50}"#)
        .unwrap();
    assert_eq!(manager.reports.len(), 2);
    assert_eq!(manager.reports[1].name.as_str(), Some("B"));
    assert_eq!(manager.badge.get(), Some(&9));
    assert_eq!(manager.age.get(), Some(&50));
    assert_eq!(
        manager.to_json(),
        r#"{"reports":[{"badge":1},{"name":"B"}],"badge":9,"years":50}"#
    );
}

#[test]
fn null_object_drops_members() {
    let mut person = Person::default();
    person.name.set("x");
    person.set_null();
    assert!(person.is_null());
    assert!(person.name.is_undefined());
    assert_eq!(person.to_json(), "null");

    person.from_json(r#"{"address": null}"#).unwrap();
    assert!(person.address.is_null());
    assert_eq!(person.to_json(), r#"{"address":null}"#);
}

#[test]
fn dotted_key_revives_a_null_parent() {
    let mut person = Person::default();
    person.from_json(r#"{"address": null, "address.city": "Rome"}"#).unwrap();
    assert!(person.address.has_value());
    assert_eq!(person.to_json(), r#"{"address":{"city":"Rome"}}"#);
}

#[test]
fn equality_tracks_state_and_members() {
    let mut left = Person::default();
    let mut right = Person::default();
    assert_eq!(left, right);
    left.from_json("{}").unwrap();
    assert_ne!(left, right);
    right.from_json("{ }").unwrap();
    assert_eq!(left, right);
    left.age.set(1);
    assert_ne!(left, right);
}
