//! # memeforge-shared
//!
//! Types shared between the HTTP server and any future clients: wire request
//! types with their validation layer, and synthetic identifier generation for
//! the stubbed deployment collaborators (chain, content hosting, Farcaster).

pub mod synth;
pub mod validate;

pub use validate::{DeployRequest, ValidatedDeploy, ValidationError};
