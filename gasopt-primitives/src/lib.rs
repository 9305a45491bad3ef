//! # gasopt primitives
//!
//! Fundamental types shared by every gasopt crate.
//!
//! - [`Address`]: 20-byte account identifier used for callers, recipients
//!   and administrators
//! - Shared size constants and well-known category tags
//!
//! ## Example
//!
//! ```rust
//! use gasopt_primitives::Address;
//!
//! let zero = Address::zero();
//! assert!(zero.is_zero());
//!
//! let account = Address::parse("0x00000000000000000000000000000000000000a1").unwrap();
//! assert!(!account.is_zero());
//! ```

pub mod address;
pub mod constants;
pub mod error;

pub use address::Address;
pub use constants::*;
pub use error::{PrimitiveError, PrimitiveResult};
