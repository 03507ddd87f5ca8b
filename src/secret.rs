//! The buffer a password is assembled in.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// An in-progress or finished password.
///
/// The generator owns the buffer exclusively while it fills and repairs it,
/// seals it, and hands it to the caller. Once sealed it can no longer be
/// mutated. Storage is zeroized when the buffer is dropped, on every path.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretBuffer {
    chars: Vec<char>,
    sealed: bool,
}

opaque_debug::implement!(SecretBuffer);

impl SecretBuffer {
    pub(crate) fn with_capacity(capacity: usize) -> SecretBuffer {
        SecretBuffer {
            chars: Vec::with_capacity(capacity),
            sealed: false,
        }
    }

    pub(crate) fn push(&mut self, ch: char) {
        assert!(!self.sealed, "cannot append to a sealed buffer");
        self.chars.push(ch);
    }

    pub(crate) fn set(&mut self, index: usize, ch: char) {
        assert!(!self.sealed, "cannot mutate a sealed buffer");
        self.chars[index] = ch;
    }

    pub(crate) fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The password characters, in order.
    ///
    /// The caller decides what to do with them (and takes on the
    /// responsibility for any copies it makes).
    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}
