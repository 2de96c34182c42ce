//! Signature tags: which parts of a transaction a signature commits to.
//!
//! Encoding: the first byte carries flags, bit 0 selects all inputs (else
//! only the input being unlocked), bit 1 selects all outputs. When bit 1 is
//! clear the remaining bytes are a bitmap of covered output indices, least
//! significant bit first, with no trailing zero byte. Every tag therefore has
//! exactly one encoding, which matters because the tag is itself hashed.

use std::collections::BTreeSet;

use crate::VmError;

const ALL_INPUTS: u8 = 0b01;
const ALL_OUTPUTS: u8 = 0b10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputScope {
    /// Only the input being unlocked.
    Single,
    All,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputScope {
    All,
    /// An explicit set of output indices, possibly empty.
    Only(BTreeSet<usize>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub inputs: InputScope,
    pub outputs: OutputScope,
}

impl Tag {
    /// Commit to the whole transaction.
    pub fn all() -> Self {
        Self {
            inputs: InputScope::All,
            outputs: OutputScope::All,
        }
    }

    /// Commit to the current input and the listed outputs only.
    pub fn single_input_with_outputs(outputs: impl IntoIterator<Item = usize>) -> Self {
        Self {
            inputs: InputScope::Single,
            outputs: OutputScope::Only(outputs.into_iter().collect()),
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, VmError> {
        let (&flags, bitmap) = bytes
            .split_first()
            .ok_or_else(|| VmError::InvalidTag("empty tag".into()))?;
        if flags & !(ALL_INPUTS | ALL_OUTPUTS) != 0 {
            return Err(VmError::InvalidTag(format!("unknown flag bits 0x{flags:02x}")));
        }
        let inputs = if flags & ALL_INPUTS != 0 {
            InputScope::All
        } else {
            InputScope::Single
        };
        let outputs = if flags & ALL_OUTPUTS != 0 {
            if !bitmap.is_empty() {
                return Err(VmError::InvalidTag("bitmap given with all-outputs flag".into()));
            }
            OutputScope::All
        } else {
            if bitmap.last() == Some(&0) {
                return Err(VmError::InvalidTag("bitmap has a trailing zero byte".into()));
            }
            let mut indices = BTreeSet::new();
            for (byte_idx, byte) in bitmap.iter().enumerate() {
                for bit in 0..8 {
                    if byte & (1 << bit) != 0 {
                        indices.insert(byte_idx * 8 + bit);
                    }
                }
            }
            OutputScope::Only(indices)
        };
        Ok(Self { inputs, outputs })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut flags = 0u8;
        if self.inputs == InputScope::All {
            flags |= ALL_INPUTS;
        }
        match &self.outputs {
            OutputScope::All => vec![flags | ALL_OUTPUTS],
            OutputScope::Only(indices) => {
                let len = indices.iter().next_back().map_or(0, |max| max / 8 + 1);
                let mut out = vec![0u8; 1 + len];
                out[0] = flags;
                for idx in indices {
                    out[1 + idx / 8] |= 1 << (idx % 8);
                }
                out
            }
        }
    }

    pub fn covers_output(&self, index: usize) -> bool {
        match &self.outputs {
            OutputScope::All => true,
            OutputScope::Only(indices) => indices.contains(&index),
        }
    }
}
