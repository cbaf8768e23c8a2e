//! Built-in numeric natives every host gets for free.

use values::{ScriptValue, ValueKind};

use crate::program::Library;
use crate::state::ScriptState;

fn native_min(state: &mut ScriptState) {
    let b = state.pop_float();
    let a = state.pop_float();
    state.push_float(a.min(b));
}

fn native_max(state: &mut ScriptState) {
    let b = state.pop_float();
    let a = state.pop_float();
    state.push_float(a.max(b));
}

fn native_clamp(state: &mut ScriptState) {
    let hi = state.pop_float();
    let lo = state.pop_float();
    let x = state.pop_float();
    state.push_float(x.clamp(lo, hi));
}

fn native_abs(state: &mut ScriptState) {
    let x = state.pop_float();
    state.push_float(x.abs());
}

fn native_lerp(state: &mut ScriptState) {
    let t = state.pop_float();
    let b = state.pop_float();
    let a = state.pop_float();
    state.push_float(a + (b - a) * t);
}

/// The base library: `min`, `max`, `clamp`, `abs`, `lerp`, and `PI`.
pub fn base_library() -> Library {
    let mut lib = Library::new();
    lib.push_function_def("min", "f", "f,f", native_min);
    lib.push_function_def("max", "f", "f,f", native_max);
    lib.push_function_def("clamp", "f", "f,f,f", native_clamp);
    lib.push_function_def("abs", "f", "f", native_abs);
    lib.push_function_def("lerp", "f", "f,f,f", native_lerp);
    lib.push_constant_def(
        "PI",
        ValueKind::Float,
        ScriptValue::from_float(std::f32::consts::PI),
    );
    lib
}
