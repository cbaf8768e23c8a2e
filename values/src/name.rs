use std::fmt;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a hash of a string, the wire representation of a [`Name`].
pub const fn name_hash(s: &str) -> u64 {
    let bytes = s.as_bytes();
    let mut hash = FNV_OFFSET;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

/// A 64-bit interned-string handle.
///
/// Scripts compare and pass names by hash only; the original spelling is not
/// recoverable from a `Name`. Hosts that need the text keep their own table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(u64);

impl Name {
    pub fn new(s: &str) -> Self {
        Name(name_hash(s))
    }

    #[inline]
    pub const fn from_hash(hash: u64) -> Self {
        Name(hash)
    }

    #[inline]
    pub const fn hash(self) -> u64 {
        self.0
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name::new(s)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name(0x{:016x})", self.0)
    }
}
