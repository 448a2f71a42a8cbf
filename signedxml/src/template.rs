//! Splice a payload into an XML signature template.
//!
//! A template is a `Signature` document with an `Object` element somewhere
//! below the root. The payload, either a whole XML document or a piece of
//! text, ends up inside the first `Object` and the result is ready to be
//! handed to a signer.
use crate::{
    error::{Error, Result},
    xml,
};
use libxml::tree::{Document, Node};

/// Local name the template's root element must have.
pub const SIGNATURE_TAG: &str = "Signature";
/// Local name of the element the payload is inserted into.
pub const OBJECT_TAG: &str = "Object";

const PROLOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Output options for a splice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpliceOptions {
    /// Drop whitespace used purely for indentation.
    pub unindent: bool,
    /// Start the output with `<?xml version="1.0" encoding="UTF-8"?>`.
    pub add_prolog: bool,
}

impl SpliceOptions {
    pub fn unindent(mut self, unindent: bool) -> Self {
        self.unindent = unindent;
        self
    }

    pub fn add_prolog(mut self, add_prolog: bool) -> Self {
        self.add_prolog = add_prolog;
        self
    }
}

/// Insert the XML document `payload` into `template`.
///
/// The root element of `payload` becomes the last child of the template's
/// first `Object` element (document order). Returns an empty string, and no
/// error, when either input is empty.
#[tracing::instrument(
    level = "debug",
    skip(template, payload),
    fields(template_len = template.len(), payload_len = payload.len())
)]
pub fn insert_xml(template: &str, payload: &str, options: SpliceOptions) -> Result<String> {
    if template.is_empty() || payload.is_empty() {
        return Ok(String::new());
    }
    splice(template, options, |document, mut anchor| {
        let payload = xml::parse(payload)?;
        let mut root = xml::adopt_root(document, &payload)?;
        tracing::debug!("Attaching <{}> to <{}>", root.get_name(), anchor.get_name());
        xml::append_child(&mut anchor, &mut root)
    })
}

/// Insert `text` as the text content of the template's first `Object`
/// element.
///
/// Any text already directly inside the `Object` is replaced. The text is
/// escaped when written, nothing else is done to it. Returns an empty string,
/// and no error, when either input is empty.
#[tracing::instrument(
    level = "debug",
    skip(template, text),
    fields(template_len = template.len(), text_len = text.len())
)]
pub fn insert_text(template: &str, text: &str, options: SpliceOptions) -> Result<String> {
    if template.is_empty() || text.is_empty() {
        return Ok(String::new());
    }
    splice(template, options, |document, mut anchor| {
        tracing::debug!("Setting text of <{}>", anchor.get_name());
        xml::set_text(document, &mut anchor, text)
    })
}

// Everything both splice variants share: validate the template, find the
// anchor, let `attach` put the payload in, then format and serialize. Only
// the root element is written out, so the template's own declaration and
// anything else outside the root is dropped.
fn splice<F>(template: &str, options: SpliceOptions, attach: F) -> Result<String>
where
    F: FnOnce(&mut Document, Node) -> Result<()>,
{
    let mut document = xml::parse(template)?;
    let root = document
        .get_root_element()
        .filter(|root| root.get_name() == SIGNATURE_TAG)
        .ok_or_else(|| {
            Error::Structural(format!(
                "No root element in the signature template or its tag is not `{}`",
                SIGNATURE_TAG
            ))
        })?;
    let anchor = xml::find_descendant(&root, OBJECT_TAG).ok_or_else(|| {
        Error::Structural(format!(
            "No `{}` element found in the signature template, nowhere to insert the payload",
            OBJECT_TAG
        ))
    })?;
    tracing::debug!(id = ?anchor.get_property("Id"), "Found anchor element");

    attach(&mut document, anchor)?;

    if options.unindent {
        xml::unindent(&root);
        tracing::debug!("Removed indentation");
    }
    let body = xml::to_xml(&document, &root);
    if options.add_prolog {
        Ok(format!("{}\n{}", PROLOG, body))
    } else {
        Ok(body)
    }
}
