// # Signer Trait
//
// Supplies the account on whose behalf the adapter acts. The account is the
// requester and admin of every registration and the `from` of every
// transaction. Key custody lives behind the broadcaster.

use alloy_primitives::Address;

/// Source of the caller's account address
pub trait Signer: Send + Sync {
    /// The caller's account
    fn address(&self) -> Address;
}

/// Signer with a fixed, preconfigured address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticSigner {
    address: Address,
}

impl StaticSigner {
    /// Create a signer for the given account
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

impl Signer for StaticSigner {
    fn address(&self) -> Address {
        self.address
    }
}
