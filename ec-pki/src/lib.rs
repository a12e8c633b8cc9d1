//! Two-tier ECDSA PKI bootstrap: key generation, certificate
//! construction, and PEM artifact serialization.
#![deny(missing_docs)]

pub extern crate rcgen;

pub mod artifact;
pub mod cert;
pub mod error;
pub mod keys;

pub use error::{Error, Result};
