//! Opcodes and the byte encoding of scripts.
//!
//! The opcode set is closed: adding an instruction is a protocol change, and
//! any byte that is not listed here makes the whole script fail to decode.

use crate::VmError;

pub mod opcode {
    pub const NOP: u8 = 0x00;
    pub const FAIL: u8 = 0x03;
    pub const NOT: u8 = 0x10;
    pub const EQ: u8 = 0x11;
    pub const PUSH: u8 = 0x30;
    pub const POP: u8 = 0x31;
    pub const PUSHB: u8 = 0x32;
    pub const DUP: u8 = 0x33;
    pub const SWAP: u8 = 0x34;
    pub const CHKSIG: u8 = 0x80;
    pub const CHKMULTISIG: u8 = 0x81;
    pub const BLAKE256: u8 = 0x90;
    pub const SHA256: u8 = 0x91;
    pub const CHKTIMELOCK: u8 = 0xb0;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    Nop,
    Fail,
    Not,
    Eq,
    /// Push a small integer literal.
    Push(u8),
    Pop,
    /// Push a blob of at most 255 bytes.
    PushB(Vec<u8>),
    Dup,
    Swap,
    ChkSig,
    ChkMultiSig,
    Blake256,
    Sha256,
    ChkTimelock,
}

impl Instruction {
    pub fn is_push(&self) -> bool {
        matches!(self, Self::Push(_) | Self::PushB(_))
    }
}

/// Decode a script into instructions.
pub fn decode(script: &[u8]) -> Result<Vec<Instruction>, VmError> {
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < script.len() {
        let op = script[pos];
        let inst = match op {
            opcode::NOP => Instruction::Nop,
            opcode::FAIL => Instruction::Fail,
            opcode::NOT => Instruction::Not,
            opcode::EQ => Instruction::Eq,
            opcode::PUSH => {
                let value = *script
                    .get(pos + 1)
                    .ok_or(VmError::TruncatedPush { offset: pos })?;
                pos += 1;
                Instruction::Push(value)
            }
            opcode::POP => Instruction::Pop,
            opcode::PUSHB => {
                let len = *script
                    .get(pos + 1)
                    .ok_or(VmError::TruncatedPush { offset: pos })? as usize;
                let start = pos + 2;
                let blob = script
                    .get(start..start + len)
                    .ok_or(VmError::TruncatedPush { offset: pos })?;
                pos += 1 + len;
                Instruction::PushB(blob.to_vec())
            }
            opcode::DUP => Instruction::Dup,
            opcode::SWAP => Instruction::Swap,
            opcode::CHKSIG => Instruction::ChkSig,
            opcode::CHKMULTISIG => Instruction::ChkMultiSig,
            opcode::BLAKE256 => Instruction::Blake256,
            opcode::SHA256 => Instruction::Sha256,
            opcode::CHKTIMELOCK => Instruction::ChkTimelock,
            other => return Err(VmError::UnknownOpcode(other)),
        };
        out.push(inst);
        pos += 1;
    }
    Ok(out)
}

/// Encode instructions into script bytes.
///
/// # Panics
///
/// Panics if a `PushB` blob is longer than 255 bytes; such a script has no
/// encoding.
pub fn encode(instructions: &[Instruction]) -> Vec<u8> {
    let mut out = Vec::new();
    for inst in instructions {
        match inst {
            Instruction::Nop => out.push(opcode::NOP),
            Instruction::Fail => out.push(opcode::FAIL),
            Instruction::Not => out.push(opcode::NOT),
            Instruction::Eq => out.push(opcode::EQ),
            Instruction::Push(v) => out.extend_from_slice(&[opcode::PUSH, *v]),
            Instruction::Pop => out.push(opcode::POP),
            Instruction::PushB(blob) => {
                let len = u8::try_from(blob.len()).expect("PUSHB blob longer than 255 bytes");
                out.push(opcode::PUSHB);
                out.push(len);
                out.extend_from_slice(blob);
            }
            Instruction::Dup => out.push(opcode::DUP),
            Instruction::Swap => out.push(opcode::SWAP),
            Instruction::ChkSig => out.push(opcode::CHKSIG),
            Instruction::ChkMultiSig => out.push(opcode::CHKMULTISIG),
            Instruction::Blake256 => out.push(opcode::BLAKE256),
            Instruction::Sha256 => out.push(opcode::SHA256),
            Instruction::ChkTimelock => out.push(opcode::CHKTIMELOCK),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_push_and_pushb() {
        let script = [opcode::PUSH, 7, opcode::PUSHB, 2, 0xaa, 0xbb, opcode::DUP];
        assert_eq!(
            decode(&script).unwrap(),
            vec![
                Instruction::Push(7),
                Instruction::PushB(vec![0xaa, 0xbb]),
                Instruction::Dup
            ]
        );
    }

    #[test]
    fn unknown_opcode_rejected() {
        assert_eq!(decode(&[0xff]), Err(VmError::UnknownOpcode(0xff)));
    }

    #[test]
    fn truncated_pushb_rejected() {
        assert_eq!(
            decode(&[opcode::NOP, opcode::PUSHB, 3, 1, 2]),
            Err(VmError::TruncatedPush { offset: 1 })
        );
        assert_eq!(
            decode(&[opcode::PUSH]),
            Err(VmError::TruncatedPush { offset: 0 })
        );
    }

    #[test]
    fn encode_inverts_decode() {
        let program = vec![
            Instruction::Push(2),
            Instruction::PushB(vec![1; 32]),
            Instruction::PushB(vec![2; 32]),
            Instruction::Push(2),
            Instruction::ChkMultiSig,
        ];
        assert_eq!(decode(&encode(&program)).unwrap(), program);
    }

    #[test]
    fn only_pushes_are_push() {
        assert!(Instruction::Push(0).is_push());
        assert!(Instruction::PushB(vec![]).is_push());
        assert!(!Instruction::Dup.is_push());
        assert!(!Instruction::Nop.is_push());
    }
}
