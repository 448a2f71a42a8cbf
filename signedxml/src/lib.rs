//! Prepare documents and keys for XML digital signatures.
//!
//! Two independent pieces live here:
//!     - Splicing a payload (an XML document or plain text) into the `Object`
//!       element of a `Signature` template, see [insert_xml] and [insert_text].
//!     - Decoding a PEM wrapped PKCS#8 private key into a [KeyMaterial], see
//!       [prepare_pkcs8_private_key].
//!
//! Nothing is signed or canonicalized here, the output is meant to be handed
//! to a signer.
pub mod error;
pub mod key;
pub mod pem;
pub mod template;
pub mod xml;

pub use crate::{
    error::{Error, Result},
    key::{prepare_pkcs8_private_key, KeyMaterial},
    template::{insert_text, insert_xml, SpliceOptions},
};
