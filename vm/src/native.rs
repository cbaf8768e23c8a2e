//! The narrow capability surface GraphScript needs from the host's
//! reflection system: per class, a name, an optional parent, and a list of
//! scalar fields readable as float or int.

use std::any::Any;
use std::fmt;

use crate::state::ScriptState;

/// The unified signature for all registered native functions.
/// The function pops its arguments from the state and pushes its results.
pub type NativeFn = fn(state: &mut ScriptState);

/// Scalar shape of one reflected native field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NativeFieldKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float,
}

impl NativeFieldKind {
    pub fn is_float(self) -> bool {
        matches!(self, NativeFieldKind::Float)
    }
}

/// One reflected field on a native class: a name, a scalar kind, and typed
/// accessors. The accessors receive the bound object as `&dyn Any` and are
/// expected to downcast to the concrete type the class describes.
pub struct NativeField {
    pub name: &'static str,
    pub kind: NativeFieldKind,
    pub get_float: fn(&dyn Any) -> f32,
    pub get_int: fn(&dyn Any) -> i64,
}

impl fmt::Debug for NativeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeField")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Static reflection info for one native class, forming a single-inheritance
/// chain through `parent`.
#[derive(Debug)]
pub struct NativeClassDef {
    pub name: &'static str,
    pub parent: Option<&'static NativeClassDef>,
    pub fields: &'static [NativeField],
}

impl NativeClassDef {
    /// Finds a field by name, searching the most-derived class first and
    /// walking up the parent chain.
    pub fn field_by_name(&'static self, name: &str) -> Option<&'static NativeField> {
        let mut class = Some(self);
        while let Some(c) = class {
            if let Some(field) = c.fields.iter().find(|f| f.name == name) {
                return Some(field);
            }
            class = c.parent;
        }
        None
    }

    /// True when `self` is `other` or inherits from it.
    pub fn is_subtype_of(&'static self, other: &'static NativeClassDef) -> bool {
        let mut class = Some(self);
        while let Some(c) = class {
            if std::ptr::eq(c, other) {
                return true;
            }
            class = c.parent;
        }
        false
    }
}
