//! Well-known development keys (the standard Foundry/Hardhat test mnemonic),
//! compiled into test builds only.

use super::LocalSigner;

/// First five accounts of `test test test ... junk`.
pub(crate) const DEV_PRIVATE_KEYS: [&str; 5] = [
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
    "5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
    "7c852118294e51e653712a81e05800f419141751be58f605c371e15141b007a6",
    "47e179ec197488593b187f80a00eb0da91f1b9d0b13f8733639f19c30a34926a",
];

/// Signer for dev account `index`.
///
/// # Panics
/// If `index` is out of range.
pub(crate) fn dev_signer(index: usize) -> LocalSigner {
    LocalSigner::from_hex(DEV_PRIVATE_KEYS[index]).expect("dev keys are valid")
}
