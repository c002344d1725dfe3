//! Schema objects.
//!
//! A schema is a plain struct of fields plus a per-type [`Registry`]: the
//! ordered `(name, accessor)` table built once per process and shared by all
//! instances. Derived schemas embed their base and register an accessor to
//! it; lookup and iteration go derived-first, then base. The
//! [`json_object!`](crate::json_object) macro writes all of this.
use indexmap::IndexMap;

use super::{Field, Presence, State};

/// Borrows one member out of a schema instance.
pub struct Accessor<S> {
    get: fn(&S) -> &dyn Field,
    get_mut: fn(&mut S) -> &mut dyn Field,
}

/// Borrows the embedded base schema out of a derived instance.
pub struct BaseAccessor<S> {
    get: fn(&S) -> &dyn ObjectField,
    get_mut: fn(&mut S) -> &mut dyn ObjectField,
}

/// Static reflection table of one schema type.
pub struct Registry<S> {
    fields: IndexMap<&'static str, Accessor<S>>,
    base: Option<BaseAccessor<S>>,
}

/// Implemented by generated schema structs.
pub trait Schema: Field + Default + 'static {
    fn registry() -> &'static Registry<Self>;
    fn presence(&self) -> Presence;
    fn presence_mut(&mut self) -> &mut Presence;
}

/// Object-safe face of a schema used by the parser, serializer and bridge.
pub trait ObjectField: Field {
    /// Looks up `name` in this schema, then in its base.
    fn field(&self, name: &str) -> Option<&dyn Field>;
    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Field>;
    /// Visits members in declaration order, own members before the base's.
    fn for_each_field(&self, visit: &mut dyn FnMut(&str, &dyn Field));
    fn field_names(&self) -> Vec<&'static str>;
    /// Transitions to HasValue without assigning any member.
    fn define(&mut self);
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl<S> Accessor<S> {
    pub fn new(get: fn(&S) -> &dyn Field, get_mut: fn(&mut S) -> &mut dyn Field) -> Self {
        Self { get, get_mut }
    }
}

impl<S> BaseAccessor<S> {
    pub fn new(
        get: fn(&S) -> &dyn ObjectField,
        get_mut: fn(&mut S) -> &mut dyn ObjectField,
    ) -> Self {
        Self { get, get_mut }
    }
}

impl<S> Registry<S> {
    pub fn new(fields: Vec<(&'static str, Accessor<S>)>, base: Option<BaseAccessor<S>>) -> Self {
        Self { fields: fields.into_iter().collect(), base }
    }
    pub fn len(&self) -> usize {
        self.fields.len()
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }
    pub fn has_base(&self) -> bool {
        self.base.is_some()
    }
}

/// Null iff flagged Null; Undefined iff flagged Undefined and every member
/// (own and inherited) is Undefined; HasValue otherwise.
pub fn state<S: Schema>(object: &S) -> State {
    match object.presence() {
        Presence::Null => State::Null,
        Presence::Defined => State::HasValue,
        Presence::Undefined => {
            let registry = S::registry();
            let own_undefined = registry
                .fields
                .values()
                .all(|accessor| (accessor.get)(object).is_undefined());
            let base_undefined = registry
                .base
                .as_ref()
                .is_none_or(|base| (base.get)(object).is_undefined());
            if own_undefined && base_undefined {
                State::Undefined
            } else {
                State::HasValue
            }
        }
    }
}

pub fn clear<S: Schema>(object: &mut S) {
    let registry = S::registry();
    for accessor in registry.fields.values() {
        (accessor.get_mut)(object).clear();
    }
    if let Some(base) = &registry.base {
        (base.get_mut)(object).clear();
    }
    *object.presence_mut() = Presence::Undefined;
}

pub fn set_null<S: Schema>(object: &mut S) {
    clear(object);
    *object.presence_mut() = Presence::Null;
}

impl<S: Schema> ObjectField for S {
    fn field(&self, name: &str) -> Option<&dyn Field> {
        let registry = S::registry();
        if let Some(accessor) = registry.fields.get(name) {
            return Some((accessor.get)(self));
        }
        let base = registry.base.as_ref()?;
        (base.get)(self).field(name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Field> {
        let registry = S::registry();
        if let Some(accessor) = registry.fields.get(name) {
            return Some((accessor.get_mut)(self));
        }
        let base = registry.base.as_ref()?;
        (base.get_mut)(self).field_mut(name)
    }

    fn for_each_field(&self, visit: &mut dyn FnMut(&str, &dyn Field)) {
        let registry = S::registry();
        for (name, accessor) in &registry.fields {
            visit(name, (accessor.get)(self));
        }
        if let Some(base) = &registry.base {
            (base.get)(self).for_each_field(visit);
        }
    }

    fn field_names(&self) -> Vec<&'static str> {
        let registry = S::registry();
        let mut names: Vec<&'static str> = registry.names().collect();
        if let Some(base) = &registry.base {
            names.extend((base.get)(self).field_names());
        }
        names
    }

    fn define(&mut self) {
        *self.presence_mut() = Presence::Defined;
    }
}
