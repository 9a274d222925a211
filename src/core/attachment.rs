//! Plain-text file attachments.

use std::io;
use std::path::Path;

/// A file picked by the user, not yet decoded.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Decoded attachment waiting to be sent with the next message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub content: String,
}

impl SelectedFile {
    /// Decode as UTF-8 text, replacing invalid sequences, and trim.
    pub fn decode(self) -> Attachment {
        Attachment {
            name: self.name,
            content: String::from_utf8_lossy(&self.bytes).trim().to_string(),
        }
    }
}

/// Read a file from disk. The attachment name is the file name without
/// its directory.
pub async fn read_selected_file(path: &Path) -> io::Result<SelectedFile> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SelectedFile { name, bytes })
}
