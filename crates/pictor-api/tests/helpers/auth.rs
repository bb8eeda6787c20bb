//! Fixed API keys and owner identities for tests.

use uuid::Uuid;

pub const OWNER_A_KEY: &str = "test-owner-a-key-0123456789abcdef";
pub const OWNER_B_KEY: &str = "test-owner-b-key-fedcba9876543210";

pub fn owner_a_id() -> Uuid {
    Uuid::from_u128(0xA11CE)
}

pub fn owner_b_id() -> Uuid {
    Uuid::from_u128(0xB0B)
}
