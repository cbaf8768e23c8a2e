//! Operand stack handed to the executor and to native functions.

use std::any::Any;

use values::{Name, ScriptValue};

/// A borrowed operand stack plus a stack pointer. Native functions receive
/// this to pop their arguments and push their results; the optional user
/// pointer lets the host smuggle per-call context to them.
///
/// Over- and underflow are programming errors on the host or compiler side,
/// so the accessors assert instead of returning results.
pub struct ScriptState<'a> {
    stack: &'a mut [ScriptValue],
    sp: usize,
    user: Option<&'a dyn Any>,
}

impl<'a> ScriptState<'a> {
    pub fn new(stack: &'a mut [ScriptValue]) -> Self {
        Self {
            stack,
            sp: 0,
            user: None,
        }
    }

    pub fn with_user(stack: &'a mut [ScriptValue], user: &'a dyn Any) -> Self {
        Self {
            stack,
            sp: 0,
            user: Some(user),
        }
    }

    pub fn user_ptr(&self) -> Option<&'a dyn Any> {
        self.user
    }

    #[inline]
    pub fn sp(&self) -> usize {
        self.sp
    }

    #[inline]
    pub(crate) fn set_sp(&mut self, sp: usize) {
        debug_assert!(sp <= self.stack.len());
        self.sp = sp;
    }

    #[inline]
    pub(crate) fn slots(&mut self) -> &mut [ScriptValue] {
        self.stack
    }

    #[inline]
    pub fn push_value(&mut self, v: ScriptValue) {
        assert!(self.sp < self.stack.len(), "operand stack overflow");
        self.stack[self.sp] = v;
        self.sp += 1;
    }

    #[inline]
    pub fn pop_value(&mut self) -> ScriptValue {
        assert!(self.sp > 0, "operand stack underflow");
        self.sp -= 1;
        self.stack[self.sp]
    }

    /// Value at `depth` below the top without popping (0 = top).
    #[inline]
    pub fn peek(&self, depth: usize) -> ScriptValue {
        assert!(depth < self.sp, "operand stack underflow");
        self.stack[self.sp - 1 - depth]
    }

    pub fn push_float(&mut self, f: f32) {
        self.push_value(ScriptValue::from_float(f));
    }

    pub fn pop_float(&mut self) -> f32 {
        self.pop_value().as_float()
    }

    pub fn push_int(&mut self, i: i32) {
        self.push_value(ScriptValue::from_int(i));
    }

    pub fn pop_int(&mut self) -> i32 {
        self.pop_value().as_int()
    }

    pub fn push_bool(&mut self, b: bool) {
        self.push_value(ScriptValue::from_bool(b));
    }

    pub fn pop_bool(&mut self) -> bool {
        self.pop_value().as_bool()
    }

    pub fn push_name(&mut self, name: Name) {
        self.push_value(ScriptValue::from_name(name));
    }

    pub fn pop_name(&mut self) -> Name {
        self.pop_value().as_name()
    }
}
