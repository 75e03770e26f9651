//! Shared record-body arguments for `create` and `update`.

use std::io::{self, Read};

use anyhow::{Context, Result, bail};
use clap::Args;
use serde_json::Value;

use claimdesk_core::{Attachment, Payload};

#[derive(Args, Debug)]
pub struct PayloadArgs {
    /// JSON file with record fields (use - for stdin)
    #[arg(long)]
    pub json: Option<String>,

    /// Set a field (KEY=VALUE); VALUE is parsed as JSON, else taken as text
    #[arg(long = "field", short = 'f', value_name = "KEY=VALUE")]
    pub fields: Vec<String>,

    /// Attach a file (FIELD=PATH), e.g. photo_path[]=roof.jpg
    #[arg(long = "attach", value_name = "FIELD=PATH")]
    pub attachments: Vec<String>,
}

impl PayloadArgs {
    pub fn build(&self) -> Result<Payload> {
        let mut payload = match &self.json {
            Some(source) => Payload::from_value(read_json(source)?).context("Invalid record JSON")?,
            None => Payload::new(),
        };

        for pair in &self.fields {
            let (key, raw) = split_pair(pair, "--field")?;
            let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
            payload = payload.field(key, value);
        }

        for pair in &self.attachments {
            let (field, path) = split_pair(pair, "--attach")?;
            let attachment = Attachment::from_path(field, path)
                .with_context(|| format!("Failed to read attachment {path}"))?;
            payload = payload.attach(attachment);
        }

        Ok(payload)
    }
}

fn split_pair<'a>(pair: &'a str, flag: &str) -> Result<(&'a str, &'a str)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("{flag} expects KEY=VALUE, got '{pair}'"),
    }
}

fn read_json(source: &str) -> Result<Value> {
    if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        serde_json::from_str(&buf).context("Invalid JSON from stdin")
    } else {
        let content = std::fs::read_to_string(source).context("Failed to read JSON file")?;
        serde_json::from_str(&content).context("Invalid JSON in file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(fields: &[&str]) -> PayloadArgs {
        PayloadArgs {
            json: None,
            fields: fields.iter().map(|s| s.to_string()).collect(),
            attachments: Vec::new(),
        }
    }

    #[test]
    fn field_values_parse_as_json_or_text() {
        let payload = args(&["photo_order=2", "zone_name=North", "notes=\"quoted\""])
            .build()
            .unwrap();

        assert_eq!(payload.fields()["photo_order"], 2);
        assert_eq!(payload.fields()["zone_name"], "North");
        assert_eq!(payload.fields()["notes"], "quoted");
    }

    #[test]
    fn malformed_pair_is_rejected() {
        assert!(args(&["no-equals"]).build().is_err());
        assert!(args(&["=value"]).build().is_err());
    }
}
