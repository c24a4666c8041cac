pub mod clock;
pub mod jwt;
pub mod token_verifier;
