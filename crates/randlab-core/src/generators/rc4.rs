//! RC4 keystream.

use super::Generator;
use crate::error::GeneratorError;

/// RC4 state after the key schedule; each draw is one keystream byte.
#[derive(Clone)]
pub struct Rc4 {
    s: [u8; 256],
    i: u8,
    j: u8,
}

impl Rc4 {
    /// Run the key-scheduling algorithm over `key`, repeated to 256 bytes.
    pub fn new(key: &[u8]) -> Result<Self, GeneratorError> {
        if key.is_empty() {
            return Err(GeneratorError::ParameterCount {
                method: "rc4",
                expected: "at least 1",
                got: 0,
            });
        }
        let mut s = [0u8; 256];
        for (i, slot) in s.iter_mut().enumerate() {
            *slot = i as u8;
        }
        let mut j: u8 = 0;
        for i in 0..256 {
            j = j.wrapping_add(s[i]).wrapping_add(key[i % key.len()]);
            s.swap(i, j as usize);
        }
        Ok(Self { s, i: 0, j: 0 })
    }

    pub fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.s[self.i as usize]);
        self.s.swap(self.i as usize, self.j as usize);
        let k = self.s[self.i as usize].wrapping_add(self.s[self.j as usize]);
        self.s[k as usize]
    }
}

impl Generator for Rc4 {
    fn next_value(&mut self) -> Result<u64, GeneratorError> {
        Ok(self.next_byte() as u64)
    }
}
