/// Declares a schema struct and its static field registry.
///
/// ```
/// use json_field::{json_object, Int, Json, Str};
///
/// json_object! {
///     pub struct Person {
///         pub name: Str,
///         #[key = "years"]
///         pub age: Int,
///     }
/// }
///
/// json_object! {
///     pub struct Employee extends Person {
///         pub badge: Int,
///     }
/// }
///
/// let mut employee = Employee::default();
/// employee.from_json(r#"{"badge": 7, "name": "Ada", "years": 36}"#).unwrap();
/// assert_eq!(employee.name.as_str(), Some("Ada"));
/// assert_eq!(employee.to_json(), r#"{"badge":7,"name":"Ada","years":36}"#);
/// ```
///
/// The generated struct derives `Debug`, `Clone` and `Default`, and gets a
/// `PartialEq` that compares reported state plus members. `extends` embeds the
/// base as `pub base` and derefs to it.
#[macro_export]
macro_rules! json_object {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident extends $base:ty {
            $(
                $(#[doc = $doc:literal])*
                $(#[key = $key:literal])?
                $fvis:vis $field:ident : $fty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        $vis struct $name {
            $(
                $(#[doc = $doc])*
                $fvis $field: $fty,
            )*
            pub base: $base,
            __presence: $crate::Presence,
        }

        $crate::__json_object_impl!($name);

        impl $crate::Schema for $name {
            fn registry() -> &'static $crate::Registry<Self> {
                static REGISTRY: $crate::__private::Lazy<$crate::Registry<$name>> =
                    $crate::__private::Lazy::new(|| {
                        $crate::Registry::new(
                            ::std::vec![
                                $((
                                    $crate::__json_key!($($key)? ; $field),
                                    $crate::Accessor::<$name>::new(
                                        |object| &object.$field,
                                        |object| &mut object.$field,
                                    ),
                                )),*
                            ],
                            ::std::option::Option::Some($crate::BaseAccessor::<$name>::new(
                                |object| &object.base,
                                |object| &mut object.base,
                            )),
                        )
                    });
                &REGISTRY
            }
            fn presence(&self) -> $crate::Presence {
                self.__presence
            }
            fn presence_mut(&mut self) -> &mut $crate::Presence {
                &mut self.__presence
            }
        }

        impl ::std::cmp::PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                $crate::Field::state(self) == $crate::Field::state(other)
                    $(&& self.$field == other.$field)*
                    && self.base == other.base
            }
        }

        impl ::std::ops::Deref for $name {
            type Target = $base;
            fn deref(&self) -> &$base {
                &self.base
            }
        }

        impl ::std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut $base {
                &mut self.base
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[doc = $doc:literal])*
                $(#[key = $key:literal])?
                $fvis:vis $field:ident : $fty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        $vis struct $name {
            $(
                $(#[doc = $doc])*
                $fvis $field: $fty,
            )*
            __presence: $crate::Presence,
        }

        $crate::__json_object_impl!($name);

        impl $crate::Schema for $name {
            fn registry() -> &'static $crate::Registry<Self> {
                static REGISTRY: $crate::__private::Lazy<$crate::Registry<$name>> =
                    $crate::__private::Lazy::new(|| {
                        $crate::Registry::new(
                            ::std::vec![
                                $((
                                    $crate::__json_key!($($key)? ; $field),
                                    $crate::Accessor::<$name>::new(
                                        |object| &object.$field,
                                        |object| &mut object.$field,
                                    ),
                                )),*
                            ],
                            ::std::option::Option::None,
                        )
                    });
                &REGISTRY
            }
            fn presence(&self) -> $crate::Presence {
                self.__presence
            }
            fn presence_mut(&mut self) -> &mut $crate::Presence {
                &mut self.__presence
            }
        }

        impl ::std::cmp::PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                $crate::Field::state(self) == $crate::Field::state(other)
                    $(&& self.$field == other.$field)*
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __json_object_impl {
    ($name:ident) => {
        impl $crate::Field for $name {
            fn node(&self) -> $crate::Node<'_> {
                $crate::Node::Object(self)
            }
            fn node_mut(&mut self) -> $crate::NodeMut<'_> {
                $crate::NodeMut::Object(self)
            }
            fn state(&self) -> $crate::State {
                $crate::field::object::state(self)
            }
            fn clear(&mut self) {
                $crate::field::object::clear(self)
            }
            fn set_null(&mut self) {
                $crate::field::object::set_null(self)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __json_key {
    ($key:literal ; $field:ident) => {
        $key
    };
    (; $field:ident) => {
        ::std::stringify!($field)
    };
}
