//! Protobuf text-format rendering of wallet messages.
//!
//! The output mirrors the protocol buffer text format: one `name: value` pair
//! per line, nested messages as `name { ... }`, enum values by name and bytes
//! as C-escaped string literals. It is meant for diagnostics only.

use std::fmt::{Display, Write};

use super::{
    key, wallet, DeterministicKey, EncryptedData, Extension, Key, ScryptParameters, Wallet,
    WalletPocket,
};

const INDENT: &str = "  ";

/// Accumulates text-format output with nesting.
#[derive(Debug, Default)]
pub struct TextWriter {
    out: String,
    depth: usize,
}

impl TextWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    /// Writes a scalar field.
    pub fn field(&mut self, name: &str, value: impl Display) {
        self.indent();
        // Writing into a String cannot fail
        let _ = writeln!(self.out, "{name}: {value}");
    }

    /// Writes an optional scalar field, skipping it when absent.
    pub fn optional<T: Display>(&mut self, name: &str, value: Option<T>) {
        if let Some(value) = value {
            self.field(name, value);
        }
    }

    /// Writes a bytes field as an escaped string literal.
    pub fn bytes(&mut self, name: &str, value: &[u8]) {
        self.field(name, format_args!("\"{}\"", escape_bytes(value)));
    }

    /// Writes a string field as an escaped string literal.
    pub fn string(&mut self, name: &str, value: &str) {
        self.bytes(name, value.as_bytes());
    }

    /// Writes a nested message.
    pub fn message(&mut self, name: &str, body: impl FnOnce(&mut Self)) {
        self.indent();
        self.out.push_str(name);
        self.out.push_str(" {\n");
        self.depth += 1;
        body(self);
        self.depth -= 1;
        self.indent();
        self.out.push_str("}\n");
    }

    /// Returns the rendered text.
    #[must_use]
    pub fn finish(self) -> String {
        self.out
    }
}

/// Escapes bytes the way the protobuf text format does.
///
/// Printable ASCII is kept as is, quotes and backslashes are escaped and
/// everything else is written as a three digit octal escape, so the rendering
/// is lossless.
#[must_use]
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        match byte {
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b'"' => out.push_str("\\\""),
            b'\'' => out.push_str("\\'"),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(char::from(byte)),
            _ => {
                let _ = write!(out, "\\{byte:03o}");
            }
        }
    }
    out
}

/// Messages that can render themselves in text format.
pub trait TextFormat {
    /// Writes the fields of the message into `writer`.
    fn write_fields(&self, writer: &mut TextWriter);

    /// Renders the message as a standalone text-format document.
    fn to_text(&self) -> String {
        let mut writer = TextWriter::new();
        self.write_fields(&mut writer);
        writer.finish()
    }
}

fn write_enum(writer: &mut TextWriter, name: &str, value: i32, label: Option<&'static str>) {
    match label {
        Some(label) => writer.field(name, label),
        None => writer.field(name, value),
    }
}

impl TextFormat for Wallet {
    fn write_fields(&self, writer: &mut TextWriter) {
        writer.optional("version", self.version);
        if let Some(master_key) = &self.master_key {
            writer.message("master_key", |w| master_key.write_fields(w));
        }
        if let Some(value) = self.encryption_type {
            let label = wallet::EncryptionType::try_from(value)
                .ok()
                .map(|t| t.as_str_name());
            write_enum(writer, "encryption_type", value, label);
        }
        if let Some(params) = &self.encryption_parameters {
            writer.message("encryption_parameters", |w| params.write_fields(w));
        }
        for pocket in &self.pockets {
            writer.message("pockets", |w| pocket.write_fields(w));
        }
        for extension in &self.extension {
            writer.message("extension", |w| extension.write_fields(w));
        }
    }
}

impl TextFormat for Key {
    fn write_fields(&self, writer: &mut TextWriter) {
        if let Some(value) = self.r#type {
            let label = key::Type::try_from(value).ok().map(|t| t.as_str_name());
            write_enum(writer, "type", value, label);
        }
        if let Some(secret) = &self.secret_bytes {
            writer.bytes("secret_bytes", secret);
        }
        if let Some(public_key) = &self.public_key {
            writer.bytes("public_key", public_key);
        }
        if let Some(encrypted) = &self.encrypted_data {
            writer.message("encrypted_data", |w| encrypted.write_fields(w));
        }
        if let Some(det) = &self.deterministic_key {
            writer.message("deterministic_key", |w| det.write_fields(w));
        }
    }
}

impl TextFormat for DeterministicKey {
    fn write_fields(&self, writer: &mut TextWriter) {
        if let Some(chain_code) = &self.chain_code {
            writer.bytes("chain_code", chain_code);
        }
        for child in &self.path {
            writer.field("path", child);
        }
    }
}

impl TextFormat for EncryptedData {
    fn write_fields(&self, writer: &mut TextWriter) {
        if let Some(iv) = &self.initialisation_vector {
            writer.bytes("initialisation_vector", iv);
        }
        if let Some(ciphertext) = &self.encrypted_private_key {
            writer.bytes("encrypted_private_key", ciphertext);
        }
    }
}

impl TextFormat for ScryptParameters {
    fn write_fields(&self, writer: &mut TextWriter) {
        if let Some(salt) = &self.salt {
            writer.bytes("salt", salt);
        }
        writer.optional("n", self.n);
        writer.optional("r", self.r);
        writer.optional("p", self.p);
    }
}

impl TextFormat for WalletPocket {
    fn write_fields(&self, writer: &mut TextWriter) {
        if let Some(network) = &self.network_identifier {
            writer.string("network_identifier", network);
        }
        if let Some(description) = &self.description {
            writer.string("description", description);
        }
        if let Some(key) = &self.key {
            writer.message("key", |w| key.write_fields(w));
        }
        writer.optional("last_seen_block_height", self.last_seen_block_height);
        if let Some(hash) = &self.last_seen_block_hash {
            writer.bytes("last_seen_block_hash", hash);
        }
        for tx in &self.transaction {
            writer.bytes("transaction", tx);
        }
    }
}

impl TextFormat for Extension {
    fn write_fields(&self, writer: &mut TextWriter) {
        if let Some(id) = &self.id {
            writer.string("id", id);
        }
        if let Some(data) = &self.data {
            writer.bytes("data", data);
        }
        writer.optional("mandatory", self.mandatory);
    }
}
