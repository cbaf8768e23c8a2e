#[cfg(test)]
mod tests {
    use crate::kinds::{CompileResult, ValueKind};
    use crate::name::{name_hash, Name};
    use crate::ScriptValue;

    #[test]
    fn test_float_roundtrip() {
        let v = ScriptValue::from_float(3.5);
        assert_eq!(v.as_float(), 3.5);

        let v_neg = ScriptValue::from_float(-0.25);
        assert_eq!(v_neg.as_float(), -0.25);
    }

    #[test]
    fn test_int_roundtrip() {
        let v = ScriptValue::from_int(-42);
        assert_eq!(v.as_int(), -42);
        assert_eq!(v.as_u32(), (-42i32) as u32);
    }

    #[test]
    fn test_bool_is_nonzero_word() {
        assert!(ScriptValue::from_bool(true).as_bool());
        assert!(!ScriptValue::from_bool(false).as_bool());
        assert_eq!(ScriptValue::from_bool(true).as_int(), 1);
    }

    #[test]
    fn test_name_uses_full_width() {
        let n = Name::new("run_speed");
        let v = ScriptValue::from_name(n);
        assert_eq!(v.as_name(), n);
        assert_eq!(v.as_u64(), name_hash("run_speed"));
    }

    #[test]
    fn test_in_place_cast_rewrites_word() {
        let mut v = ScriptValue::from_int(7);
        v.set_float(v.as_int() as f32);
        assert_eq!(v.as_float(), 7.0);
    }

    #[test]
    fn test_name_hash_is_stable_and_distinct() {
        assert_eq!(name_hash("walk"), name_hash("walk"));
        assert_ne!(name_hash("walk"), name_hash("run"));
        assert_eq!(Name::new("walk"), Name::from_hash(name_hash("walk")));
    }

    #[test]
    fn test_kind_widths() {
        assert_eq!(ValueKind::Empty.width(), 0);
        assert_eq!(ValueKind::Float.width(), 1);
        assert_eq!(ValueKind::Name.width(), 1);
    }

    #[test]
    fn test_compile_result_structural_equality() {
        let mut a = CompileResult::new();
        a.push_kind(ValueKind::Int);
        a.push_custom(3);

        let mut b = CompileResult::new();
        b.push_kind(ValueKind::Int);
        b.push_custom(3);
        assert_eq!(a, b);

        let mut c = CompileResult::new();
        c.push_kind(ValueKind::Int);
        c.push_custom(4);
        assert_ne!(a, c);

        assert_eq!(a.width(), 2);
        assert_eq!(a.custom_types.len(), 1);
    }

    #[test]
    fn test_compile_result_helpers() {
        assert!(CompileResult::of(ValueKind::Float).is_single_numeric());
        assert!(CompileResult::of(ValueKind::Int).is_single_logical());
        assert!(!CompileResult::of(ValueKind::Float).is_single_logical());
        assert!(CompileResult::of(ValueKind::Empty).is_empty_result());
        assert!(CompileResult::new().is_empty_result());
        assert!(!CompileResult::of(ValueKind::Bool).is_empty_result());
    }
}
