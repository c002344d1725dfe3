use std::fmt;

use super::{Field, Node, NodeMut, State};

/// Storage of a leaf. The three states are exclusive by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    Undefined,
    Null,
    Value(T),
}

/// A tri-state scalar field.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf<T> {
    slot: Slot<T>,
}

/// Seconds since the Unix epoch, the payload of [`Date`] leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(i64);

pub type Int = Leaf<i64>;
pub type Num = Leaf<f64>;
pub type Str = Leaf<String>;
pub type Bool = Leaf<bool>;
pub type Date = Leaf<Timestamp>;

/// Payload types a [`Leaf`] can hold.
pub trait Scalar: Clone + fmt::Debug + PartialEq + private::Sealed + 'static {
    fn view(leaf: &Leaf<Self>) -> Node<'_>;
    fn view_mut(leaf: &mut Leaf<Self>) -> NodeMut<'_>;
}

mod private {
    pub trait Sealed {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
    impl Sealed for String {}
    impl Sealed for bool {}
    impl Sealed for super::Timestamp {}
}

macro_rules! scalar {
    ($ty:ty => $variant:ident) => {
        impl Scalar for $ty {
            fn view(leaf: &Leaf<Self>) -> Node<'_> {
                Node::$variant(leaf)
            }
            fn view_mut(leaf: &mut Leaf<Self>) -> NodeMut<'_> {
                NodeMut::$variant(leaf)
            }
        }
    };
}

scalar!(i64 => Int);
scalar!(f64 => Num);
scalar!(String => Str);
scalar!(bool => Bool);
scalar!(Timestamp => Date);

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot::Undefined
    }
}

impl<T> Default for Leaf<T> {
    fn default() -> Self {
        Self { slot: Slot::Undefined }
    }
}

impl<T> Slot<T> {
    pub fn state(&self) -> State {
        match self {
            Slot::Undefined => State::Undefined,
            Slot::Null => State::Null,
            Slot::Value(_) => State::HasValue,
        }
    }
}

impl<T: Scalar> Leaf<T> {
    pub fn new(value: impl Into<T>) -> Self {
        Self { slot: Slot::Value(value.into()) }
    }
    pub fn null() -> Self {
        Self { slot: Slot::Null }
    }
    pub fn set(&mut self, value: impl Into<T>) {
        self.slot = Slot::Value(value.into());
    }
    pub fn get(&self) -> Option<&T> {
        match &self.slot {
            Slot::Value(value) => Some(value),
            _ => None,
        }
    }
    pub fn value_or(&self, default: T) -> T {
        self.get().cloned().unwrap_or(default)
    }
    pub fn slot(&self) -> &Slot<T> {
        &self.slot
    }
    /// Moves the slot out, leaving the leaf Undefined.
    pub fn take(&mut self) -> Slot<T> {
        std::mem::take(&mut self.slot)
    }
}

impl<T: Scalar> Field for Leaf<T> {
    fn node(&self) -> Node<'_> {
        T::view(self)
    }
    fn node_mut(&mut self) -> NodeMut<'_> {
        T::view_mut(self)
    }
    fn state(&self) -> State {
        self.slot.state()
    }
    fn clear(&mut self) {
        self.slot = Slot::Undefined;
    }
    fn set_null(&mut self) {
        self.slot = Slot::Null;
    }
}

impl<T: Scalar> From<T> for Leaf<T> {
    fn from(value: T) -> Self {
        Self { slot: Slot::Value(value) }
    }
}

impl From<&str> for Str {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Str {
    pub fn as_str(&self) -> Option<&str> {
        self.get().map(String::as_str)
    }
}

impl Timestamp {
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }
    pub const fn secs(self) -> i64 {
        self.0
    }
    /// Reads either date literal grammar; see [`crate::date`].
    pub fn parse(text: &str) -> crate::error::Result<Self> {
        crate::date::parse(text)
    }
    /// `YYYY-MM-DDTHH:MM:SSZ`, or `None` outside the representable calendar.
    pub fn to_iso8601(self) -> Option<String> {
        crate::date::format(self)
    }
}

impl From<i64> for Timestamp {
    fn from(secs: i64) -> Self {
        Self(secs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_iso8601() {
            Some(text) => f.write_str(&text),
            None => write!(f, "@{}", self.0),
        }
    }
}
