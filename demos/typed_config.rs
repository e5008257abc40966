//! Reading ISC configuration into Rust structs, with typed defaults.
//!
//! Run with: cargo run --example typed_config

use serde::{Deserialize, Serialize};
use serde_isc::{from_value, parse_str, to_string, to_value};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
enum Accounting {
    Off,
    Local,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Server {
    port: u16,
    secret: Option<String>,
    accounting: Accounting,
    clients: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let defaults = Server {
        port: 1812,
        secret: None,
        accounting: Accounting::Off,
        clients: vec!["127.0.0.1".to_string()],
    };

    // Defaults written out as ISC text
    println!("Defaults:\n{}", to_string(&defaults)?);

    let mut settings = parse_str(
        r#"
        secret "s3cr3t";
        accounting "local";
        "#,
    )?;
    settings.fill_defaults(&to_value(&defaults)?)?;

    let server: Server = from_value(settings)?;
    println!("Merged: {:#?}", server);

    // Keys present in the defaults replace the file's entries.
    assert_eq!(server.accounting, Accounting::Off);
    assert_eq!(server.port, 1812);
    assert_eq!(server.secret.as_deref(), Some("s3cr3t"));
    println!("✓ Defaults applied");

    Ok(())
}
