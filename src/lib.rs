#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Usage
//!
//! An envelope is generated from the payload bytes, a content-encryption
//! algorithm and the recipient's X.509 certificate. The recipient's RSA
//! public key protects the freshly generated content-encryption key.
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use pkcs_pki_envelope::{ContentEncryptionAlgorithm, EnvelopeBuilder, RecipientCertificate};
//!
//! let mut rng = rand::thread_rng(); // rand@0.8
//!
//! let recipient = RecipientCertificate::from_der(&std::fs::read("ca.der")?)?;
//! let builder = EnvelopeBuilder::new(ContentEncryptionAlgorithm::DesCbc);
//!
//! let envelope = builder.generate(&mut rng, b"hello scep", &recipient)?;
//! assert_eq!(envelope.message_data(), b"hello scep");
//!
//! // DER-encoded `ContentInfo` ready to hand to the transport layer
//! let der: Vec<u8> = envelope.into_der();
//! # let _ = der;
//! # Ok(())
//! # }
//! ```
//!
//! The algorithm can also be picked from an `AlgorithmIdentifier` OID, e.g.
//! one advertised by a SCEP server's capabilities:
//!
//! ```
//! use pkcs_pki_envelope::{cipher::AES_256_CBC, ContentEncryptionAlgorithm};
//!
//! let algorithm = ContentEncryptionAlgorithm::try_from(AES_256_CBC).unwrap();
//! assert_eq!(algorithm, ContentEncryptionAlgorithm::Aes256Cbc);
//! assert_eq!(algorithm.to_string(), "AES-256-CBC");
//! ```
//!
//! # Logging
//!
//! Generation progress is reported through the [`log`] facade at `debug`
//! and `trace` level. Key material is never logged.
//!
//! [`log`]: https://docs.rs/log

#[macro_use]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use cms;
pub use der;
pub use rand_core;
pub use rsa;
pub use x509_cert;

pub mod cipher;
pub mod envelope;
pub mod errors;
pub mod key_wrap;
pub mod recipient;
pub mod traits;

pub use crate::{
    cipher::{ContentEncryptionAlgorithm, SymmetricKey},
    envelope::{generate, Envelope, EnvelopeBuilder},
    errors::{Error, Result},
    key_wrap::RsaKeyWrapper,
    recipient::RecipientCertificate,
    traits::KeyWrapper,
};
