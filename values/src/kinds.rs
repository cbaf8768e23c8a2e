use serde::{Deserialize, Serialize};

/// The closed set of value kinds a script expression can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    /// `b`: one slot, zero/nonzero.
    Bool,
    /// `i`: one slot, 32-bit signed integer in the low word.
    Int,
    /// `f`: one slot, 32-bit float in the low word.
    Float,
    /// `n`: one slot, 64-bit hashed-string handle.
    Name,
    /// `p`: one slot, 64-bit opaque handle to a named pointer type.
    Pointer,
    /// `s`: a registry-defined struct type; the struct index lives in the
    /// parallel `custom_types` list of the owning [`CompileResult`].
    Custom,
    /// `e`: zero slots, the "no value" produced by statements.
    Empty,
}

impl ValueKind {
    /// Slots this kind occupies on the operand stack.
    #[inline]
    pub fn width(self) -> usize {
        match self {
            ValueKind::Empty => 0,
            _ => 1,
        }
    }

    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueKind::Bool | ValueKind::Int | ValueKind::Float)
    }
}

/// The ordered sequence of kinds an expression produces.
///
/// Order is significant: it is the expression's return arity. `Custom` slots
/// consume, in order, the entries of `custom_types` (registry struct
/// indices); the two lists stay in lockstep by construction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileResult {
    pub out_types: Vec<ValueKind>,
    pub custom_types: Vec<u16>,
}

impl CompileResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-kind result, the common case.
    pub fn of(kind: ValueKind) -> Self {
        let mut r = Self::new();
        r.push_kind(kind);
        r
    }

    pub fn push_kind(&mut self, kind: ValueKind) {
        debug_assert!(kind != ValueKind::Custom, "custom kinds need an index");
        self.out_types.push(kind);
    }

    pub fn push_custom(&mut self, struct_index: u16) {
        self.out_types.push(ValueKind::Custom);
        self.custom_types.push(struct_index);
    }

    pub fn clear(&mut self) {
        self.out_types.clear();
        self.custom_types.clear();
    }

    /// Total operand-stack slots the result occupies.
    pub fn width(&self) -> usize {
        self.out_types.iter().map(|k| k.width()).sum()
    }

    /// The single kind, if the result has exactly one entry.
    pub fn single(&self) -> Option<ValueKind> {
        match self.out_types.as_slice() {
            [k] => Some(*k),
            _ => None,
        }
    }

    pub fn is_single_numeric(&self) -> bool {
        self.single().is_some_and(|k| k.is_numeric())
    }

    pub fn is_single_float(&self) -> bool {
        self.single() == Some(ValueKind::Float)
    }

    pub fn is_single_bool(&self) -> bool {
        self.single() == Some(ValueKind::Bool)
    }

    /// Bool or int, the kinds logical operators accept.
    pub fn is_single_logical(&self) -> bool {
        matches!(self.single(), Some(ValueKind::Bool | ValueKind::Int))
    }

    /// True when the result carries no values at all.
    pub fn is_empty_result(&self) -> bool {
        self.out_types.is_empty() || self.out_types == [ValueKind::Empty]
    }
}
