//! System clipboard access.

use arboard::Clipboard;

use crate::error::{MelcookieError, Result};

/// Copy `text` to the system clipboard.
///
/// Clipboard initialization can fail on headless systems.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new()
        .map_err(|e| MelcookieError::Clipboard(format!("Failed to access clipboard: {}", e)))?;
    clipboard
        .set_text(text.to_owned())
        .map_err(|e| MelcookieError::Clipboard(format!("Failed to copy: {}", e)))?;
    Ok(())
}
