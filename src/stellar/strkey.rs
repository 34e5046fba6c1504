//! Account ID encoding
//!
//! Account IDs are ed25519 public keys rendered as strkeys (the `G...`
//! form). Encoding and checksum handling is done by `stellar-strkey`.

use std::fmt;
use std::str::FromStr;
use stellar_strkey::ed25519::PublicKey;
use stellar_xdr::curr as xdr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId([u8; 32]);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrKeyError {
    #[error("not a valid account id")]
    Invalid,
}

impl AccountId {
    pub fn from_public_key(key: [u8; 32]) -> Self {
        Self(key)
    }

    pub fn public_key(&self) -> &[u8; 32] {
        &self.0
    }

    /// Ledger form of the account as a transaction or operation source
    pub fn to_muxed_account(&self) -> xdr::MuxedAccount {
        xdr::MuxedAccount::Ed25519(xdr::Uint256(self.0))
    }

    /// Ledger form of the account as an asset issuer
    pub fn to_xdr_account_id(&self) -> xdr::AccountId {
        xdr::AccountId(xdr::PublicKey::PublicKeyTypeEd25519(xdr::Uint256(self.0)))
    }
}

impl FromStr for AccountId {
    type Err = StrKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PublicKey::from_string(s)
            .map(|key| Self(key.0))
            .map_err(|_| StrKeyError::Invalid)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&PublicKey(self.0).to_string())
    }
}
