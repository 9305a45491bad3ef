//! Constants shared across the workspace.

/// Size of an account address in bytes.
pub const ADDRESS_SIZE: usize = 20;

/// Length of an address rendered as hex, without the `0x` prefix.
pub const ADDRESS_HEX_LENGTH: usize = ADDRESS_SIZE * 2;

/// Category tag for plain value transfers.
pub const CATEGORY_TRANSFER: &str = "transfer";

/// Category tag for contract invocations.
pub const CATEGORY_CONTRACT_CALL: &str = "contract_call";

/// Category tag for contract deployments.
pub const CATEGORY_DEPLOYMENT: &str = "deployment";
