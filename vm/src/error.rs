use thiserror::Error;

/// Why a script run did not unlock its input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VmError {
    #[error("unknown opcode 0x{0:02x}")]
    UnknownOpcode(u8),

    #[error("push at offset {offset} runs past the end of the script")]
    TruncatedPush { offset: usize },

    #[error("script is {size} bytes, limit is {max}")]
    ScriptTooLong { size: usize, max: usize },

    #[error("unlock script may only contain push instructions")]
    UnlockNotPushOnly,

    #[error("stack underflow")]
    StackUnderflow,

    #[error("stack exceeds {max} items")]
    StackOverflow { max: usize },

    #[error("stack item of {size} bytes exceeds limit of {max}")]
    ItemTooLarge { size: usize, max: usize },

    #[error("stack item is not a valid integer")]
    InvalidInteger,

    #[error("invalid signature tag: {0}")]
    InvalidTag(String),

    #[error("invalid multisig arity: {threshold} of {keys}")]
    InvalidMultisig { threshold: u64, keys: u64 },

    #[error("unknown timelock kind {0}")]
    InvalidTimelock(u64),

    #[error("script executed FAIL")]
    ExplicitFail,

    #[error("script ended with {0} items on the stack")]
    UnbalancedStack(usize),

    #[error("script ended with a false result")]
    FalseResult,
}
