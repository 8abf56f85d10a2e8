//! Delivery of prepared files to the host page.

use std::io::Write;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::SandboxFile;

/// Action tag of the message announcing a compiled batch.
pub const FILES_COMPILED_ACTION: &str = "cmd_files_compiled";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostMessage {
    pub action: String,
    pub files_compiled: Vec<SandboxFile>,
}

impl HostMessage {
    pub fn files_compiled(files: Vec<SandboxFile>) -> Self {
        Self {
            action: FILES_COMPILED_ACTION.to_owned(),
            files_compiled: files,
        }
    }
}

/// Message-passing channel to the page hosting the sandbox.
pub trait HostChannel {
    fn post_message(&mut self, message: &HostMessage) -> Result<()>;
}

/// Collects messages in memory.
impl HostChannel for Vec<HostMessage> {
    fn post_message(&mut self, message: &HostMessage) -> Result<()> {
        self.push(message.clone());
        Ok(())
    }
}

/// Writes every message as one line of JSON.
#[derive(Debug)]
pub struct JsonLinesChannel<W> {
    writer: W,
}

impl<W: Write> JsonLinesChannel<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> HostChannel for JsonLinesChannel<W> {
    fn post_message(&mut self, message: &HostMessage) -> Result<()> {
        serde_json::to_writer(&mut self.writer, message)
            .with_context(|| format!("failed to serialize {} message", message.action))?;
        writeln!(self.writer).context("failed to write host message")?;
        self.writer.flush().context("failed to flush host message")?;
        Ok(())
    }
}
