use std::fmt;

use crate::name::Name;

/// One operand-stack slot.
///
/// Every scalar kind occupies the same physical 8 bytes: floats and 32-bit
/// integers live in the low word, name handles use the full 64 bits. The
/// bytecode's push/store-slot opcodes copy whole slots and rely on this
/// uniform width, so the accessors below reinterpret rather than convert.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct ScriptValue(pub u64);

impl ScriptValue {
    // --- Constructors ---

    #[inline]
    pub fn zero() -> Self {
        ScriptValue(0)
    }

    #[inline]
    pub fn from_float(f: f32) -> Self {
        ScriptValue(f.to_bits() as u64)
    }

    #[inline]
    pub fn from_int(i: i32) -> Self {
        ScriptValue(i as u32 as u64)
    }

    #[inline]
    pub fn from_bool(b: bool) -> Self {
        ScriptValue(b as u64)
    }

    #[inline]
    pub fn from_name(n: Name) -> Self {
        ScriptValue(n.hash())
    }

    #[inline]
    pub fn from_u64(v: u64) -> Self {
        ScriptValue(v)
    }

    // --- Reinterpreting accessors ---

    #[inline]
    pub fn as_float(self) -> f32 {
        f32::from_bits(self.0 as u32)
    }

    #[inline]
    pub fn as_int(self) -> i32 {
        self.0 as u32 as i32
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0 as u32
    }

    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_bool(self) -> bool {
        self.0 as u32 != 0
    }

    #[inline]
    pub fn as_name(self) -> Name {
        Name::from_hash(self.0)
    }

    // --- In-place word rewrites (used by the cast opcodes) ---

    #[inline]
    pub fn set_float(&mut self, f: f32) {
        self.0 = f.to_bits() as u64;
    }

    #[inline]
    pub fn set_int(&mut self, i: i32) {
        self.0 = i as u32 as u64;
    }
}

impl fmt::Debug for ScriptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Untagged storage: show both plausible readings.
        write!(
            f,
            "ScriptValue(0x{:016x} i:{} f:{})",
            self.0,
            self.as_int(),
            self.as_float()
        )
    }
}
