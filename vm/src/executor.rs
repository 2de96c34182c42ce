//! The stack machine.

use tessera_crypto::{blake2b_256, sha256, verify_signature};
use tessera_types::{PublicKey, Signature, Timelock};

use crate::instruction::{decode, Instruction};
use crate::{ExecutionContext, Tag, VmConfig, VmError};

/// Upper bound on keys a single `CHKMULTISIG` may name.
pub const MAX_MULTISIG_KEYS: u64 = 16;

/// Outcome of running one input's scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptResult {
    Unlocked,
    Fail(VmError),
}

impl ScriptResult {
    pub fn is_unlocked(&self) -> bool {
        matches!(self, Self::Unlocked)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Item(Vec<u8>);

impl Item {
    fn is_true(&self) -> bool {
        self.0.iter().any(|b| *b != 0)
    }

    /// Interpret as a big-endian unsigned integer of at most 8 bytes.
    fn as_u64(&self) -> Result<u64, VmError> {
        if self.0.len() > 8 {
            return Err(VmError::InvalidInteger);
        }
        Ok(self.0.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
    }
}

impl From<bool> for Item {
    fn from(value: bool) -> Self {
        if value {
            Item(vec![1])
        } else {
            Item(vec![])
        }
    }
}

struct Stack<'a> {
    items: Vec<Item>,
    config: &'a VmConfig,
}

impl<'a> Stack<'a> {
    fn new(config: &'a VmConfig) -> Self {
        Self {
            items: Vec::new(),
            config,
        }
    }

    fn push(&mut self, item: Item) -> Result<(), VmError> {
        if item.0.len() > self.config.max_item_bytes {
            return Err(VmError::ItemTooLarge {
                size: item.0.len(),
                max: self.config.max_item_bytes,
            });
        }
        if self.items.len() >= self.config.max_stack_items {
            return Err(VmError::StackOverflow {
                max: self.config.max_stack_items,
            });
        }
        self.items.push(item);
        Ok(())
    }

    fn pop(&mut self) -> Result<Item, VmError> {
        self.items.pop().ok_or(VmError::StackUnderflow)
    }

    /// Pop `n` items, returned in the order they were pushed.
    fn pop_many(&mut self, n: usize) -> Result<Vec<Item>, VmError> {
        if n > self.items.len() {
            return Err(VmError::StackUnderflow);
        }
        Ok(self.items.split_off(self.items.len() - n))
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// Run `unlock`, then `parameters` as pushes, then `lock`.
///
/// The unlock script may contain only pushes. The run unlocks the input iff it
/// finishes with exactly one truthy item on the stack.
pub fn execute(
    unlock: &[u8],
    parameters: &[Vec<u8>],
    lock: &[u8],
    context: &dyn ExecutionContext,
    config: &VmConfig,
) -> ScriptResult {
    match run(unlock, parameters, lock, context, config) {
        Ok(()) => ScriptResult::Unlocked,
        Err(e) => ScriptResult::Fail(e),
    }
}

fn run(
    unlock: &[u8],
    parameters: &[Vec<u8>],
    lock: &[u8],
    context: &dyn ExecutionContext,
    config: &VmConfig,
) -> Result<(), VmError> {
    let size = unlock.len() + lock.len();
    if size > config.max_script_bytes {
        return Err(VmError::ScriptTooLong {
            size,
            max: config.max_script_bytes,
        });
    }
    let unlock = decode(unlock)?;
    let lock = decode(lock)?;
    if !unlock.iter().all(Instruction::is_push) {
        return Err(VmError::UnlockNotPushOnly);
    }

    let mut stack = Stack::new(config);
    for inst in &unlock {
        step(inst, &mut stack, context)?;
    }
    for param in parameters {
        stack.push(Item(param.clone()))?;
    }
    for inst in &lock {
        step(inst, &mut stack, context)?;
    }

    match stack.len() {
        1 if stack.pop()?.is_true() => Ok(()),
        1 => Err(VmError::FalseResult),
        n => Err(VmError::UnbalancedStack(n)),
    }
}

fn step(inst: &Instruction, stack: &mut Stack, context: &dyn ExecutionContext) -> Result<(), VmError> {
    match inst {
        Instruction::Nop => {}
        Instruction::Fail => return Err(VmError::ExplicitFail),
        Instruction::Not => {
            let item = stack.pop()?;
            stack.push(Item::from(!item.is_true()))?;
        }
        Instruction::Eq => {
            let a = stack.pop()?;
            let b = stack.pop()?;
            stack.push(Item::from(a == b))?;
        }
        Instruction::Push(v) => stack.push(Item(vec![*v]))?,
        Instruction::Pop => {
            stack.pop()?;
        }
        Instruction::PushB(blob) => stack.push(Item(blob.clone()))?,
        Instruction::Dup => {
            let top = stack.pop()?;
            stack.push(top.clone())?;
            stack.push(top)?;
        }
        Instruction::Swap => {
            let a = stack.pop()?;
            let b = stack.pop()?;
            stack.push(a)?;
            stack.push(b)?;
        }
        Instruction::ChkSig => {
            let key = stack.pop()?;
            let sig = stack.pop()?;
            let tag = Tag::decode(&stack.pop()?.0)?;
            let message = context.signing_hash(&tag)?;
            let ok = verify_ordered(&message, &[sig], &[key]);
            stack.push(Item::from(ok))?;
        }
        Instruction::ChkMultiSig => {
            let key_count = stack.pop()?.as_u64()?;
            if key_count == 0 || key_count > MAX_MULTISIG_KEYS {
                return Err(VmError::InvalidMultisig {
                    threshold: 0,
                    keys: key_count,
                });
            }
            let keys = stack.pop_many(key_count as usize)?;
            let threshold = stack.pop()?.as_u64()?;
            if threshold == 0 || threshold > key_count {
                return Err(VmError::InvalidMultisig {
                    threshold,
                    keys: key_count,
                });
            }
            let sigs = stack.pop_many(threshold as usize)?;
            let tag = Tag::decode(&stack.pop()?.0)?;
            let message = context.signing_hash(&tag)?;
            let ok = verify_ordered(&message, &sigs, &keys);
            stack.push(Item::from(ok))?;
        }
        Instruction::Blake256 => {
            let item = stack.pop()?;
            stack.push(Item(blake2b_256(&item.0).to_vec()))?;
        }
        Instruction::Sha256 => {
            let item = stack.pop()?;
            stack.push(Item(sha256(&item.0).to_vec()))?;
        }
        Instruction::ChkTimelock => {
            let kind = stack.pop()?.as_u64()?;
            let value = stack.pop()?.as_u64()?;
            let timelock = Timelock::from_kind(kind, value).ok_or(VmError::InvalidTimelock(kind))?;
            let (created_height, created_at) = context.spent_output_origin();
            let ok = timelock.is_satisfied(&context.chain_head(), created_height, created_at);
            stack.push(Item::from(ok))?;
        }
    }
    Ok(())
}

/// Match signatures to keys left to right. Each key is consumed at most once
/// and a key passed over can never be used by a later signature.
fn verify_ordered(message: &[u8; 32], sigs: &[Item], keys: &[Item]) -> bool {
    let mut remaining = keys.iter();
    sigs.iter().all(|sig| {
        let Ok(sig) = Signature::try_from(sig.0.as_slice()) else {
            return false;
        };
        remaining.any(|key| {
            PublicKey::try_from(key.0.as_slice())
                .map(|key| verify_signature(message, &sig, &key))
                .unwrap_or(false)
        })
    })
}
