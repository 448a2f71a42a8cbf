use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use signedxml::{insert_text, insert_xml, prepare_pkcs8_private_key, KeyMaterial, SpliceOptions};
use tracing_subscriber::fmt::format::FmtSpan;

const HELP: &str = "
signedxml

USAGE:
    signedxml insert-xml  --template FILE --payload FILE [--unindent] [--prolog]
    signedxml insert-text --template FILE --text TEXT    [--unindent] [--prolog]
    signedxml inspect-key --key FILE

FLAGS:
    -h, --help              Print this message
    --unindent              Strip indentation from the output
    --prolog                Start the output with an XML declaration

OPTIONS:
    --template FILE         Signature template with an Object element
    --payload FILE          XML document to insert into the Object element
    --text TEXT             Text to set as the content of the Object element
    --key FILE              PEM encoded PKCS#8 private key
";

#[derive(Debug, PartialEq)]
enum Command {
    InsertXml {
        template: PathBuf,
        payload: PathBuf,
        options: SpliceOptions,
    },
    InsertText {
        template: PathBuf,
        text: String,
        options: SpliceOptions,
    },
    InspectKey {
        key: PathBuf,
    },
}

fn parse_options(pargs: &mut pico_args::Arguments) -> SpliceOptions {
    SpliceOptions::default()
        .unindent(pargs.contains("--unindent"))
        .add_prolog(pargs.contains("--prolog"))
}

fn parse_args(mut pargs: pico_args::Arguments) -> Result<Option<Command>> {
    if pargs.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let command = match pargs.subcommand()?.as_deref() {
        Some("insert-xml") => Command::InsertXml {
            options: parse_options(&mut pargs),
            template: pargs.value_from_str("--template")?,
            payload: pargs.value_from_str("--payload")?,
        },
        Some("insert-text") => Command::InsertText {
            options: parse_options(&mut pargs),
            template: pargs.value_from_str("--template")?,
            text: pargs.value_from_str("--text")?,
        },
        Some("inspect-key") => Command::InspectKey {
            key: pargs.value_from_str("--key")?,
        },
        Some(other) => bail!("Unknown subcommand: {}", other),
        None => return Ok(None),
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        bail!("Unexpected arguments: {:?}", remaining);
    }
    Ok(Some(command))
}

fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn describe_key(key: &KeyMaterial) -> Result<String> {
    let bits = key.to_pkey()?.bits();
    Ok(format!("{} private key ({} bits)", key.algorithm(), bits))
}

#[tracing::instrument(level = "info", skip(command))]
fn run(command: Command) -> Result<String> {
    match command {
        Command::InsertXml {
            template,
            payload,
            options,
        } => {
            let out = insert_xml(&read_to_string(&template)?, &read_to_string(&payload)?, options)?;
            tracing::info!("Inserted {} into {}", payload.display(), template.display());
            Ok(out)
        }
        Command::InsertText {
            template,
            text,
            options,
        } => {
            let out = insert_text(&read_to_string(&template)?, &text, options)?;
            tracing::info!("Inserted text into {}", template.display());
            Ok(out)
        }
        Command::InspectKey { key } => {
            let pem = fs::read(&key).with_context(|| format!("failed to read {}", key.display()))?;
            let key = prepare_pkcs8_private_key(Some(pem.as_slice()))?;
            describe_key(&key)
        }
    }
}

fn main() -> Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "signedxml=info".to_owned());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .try_init();

    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    let command = match parse_args(pico_args::Arguments::from_vec(args))? {
        Some(command) => command,
        None => {
            eprintln!("{}", HELP);
            std::process::exit(1);
        }
    };

    let out = run(command)?;
    println!("{}", out);
    Ok(())
}
