//! PEM block decoding.
//!
//! Only the first block in the input is looked at. Text before the BEGIN line
//! and after the END line is ignored, the same way explanatory text around a
//! key in a file is ignored by most tools. The block itself is decoded by
//! `pem-rfc7468` (through `pkcs8`'s `der` re-export), which rejects bad
//! labels, mismatched END lines, RFC 1421 headers and bad base64.
use crate::error::{Error, Result};
use pkcs8::der::pem;

const BEGIN: &str = "-----BEGIN ";
const END: &str = "-----END ";

/// A decoded PEM block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PemBlock {
    /// Type from the BEGIN line, e.g. `PRIVATE KEY`.
    pub label: String,
    /// The base64 decoded body.
    pub contents: Vec<u8>,
}

/// Decode the first PEM block in `data`.
#[tracing::instrument(level = "debug", skip(data), fields(data_len = data.len()))]
pub fn decode_first(data: &[u8]) -> Result<PemBlock> {
    // Non UTF8 bytes can only be outside the block, the block is ASCII.
    let text = String::from_utf8_lossy(data);
    let start = text
        .find(BEGIN)
        .ok_or_else(|| Error::Pem("no PEM block found".into()))?;
    let block = &text[start..];
    let end = block
        .find(END)
        .and_then(|end| block[end..].find('\n').map(|eol| end + eol + 1))
        .unwrap_or(block.len());

    let (label, contents) =
        pem::decode_vec(block[..end].as_bytes()).map_err(|err| Error::Pem(err.to_string()))?;
    tracing::debug!(label = %label, contents_len = contents.len(), "Decoded PEM block");

    Ok(PemBlock {
        label: label.to_owned(),
        contents,
    })
}
