mod hs256;
mod jwks;

pub use hs256::Hs256Verifier;
pub use jwks::JwksVerifier;
