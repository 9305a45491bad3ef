//! Administrator checks supplied by the embedding layer.
//!
//! The engine never authenticates anyone. It receives an already
//! authenticated caller and asks an [`AdminPolicy`] whether that caller may
//! run administrator operations.

use gasopt_primitives::Address;

/// Decides whether a caller holds the administrator role.
pub trait AdminPolicy: Send + Sync {
    /// Returns true when `caller` is the administrator.
    fn is_administrator(&self, caller: &Address) -> bool;
}

/// A single fixed administrator account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleAdministrator {
    administrator: Address,
}

impl SingleAdministrator {
    /// Creates a policy that accepts only `administrator`.
    pub fn new(administrator: Address) -> Self {
        Self { administrator }
    }

    /// The accepted account.
    pub fn administrator(&self) -> Address {
        self.administrator
    }
}

impl AdminPolicy for SingleAdministrator {
    fn is_administrator(&self, caller: &Address) -> bool {
        !caller.is_zero() && *caller == self.administrator
    }
}

/// Policy that refuses every caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAdministrator;

impl AdminPolicy for NoAdministrator {
    fn is_administrator(&self, _caller: &Address) -> bool {
        false
    }
}

impl<F> AdminPolicy for F
where
    F: Fn(&Address) -> bool + Send + Sync,
{
    fn is_administrator(&self, caller: &Address) -> bool {
        self(caller)
    }
}
