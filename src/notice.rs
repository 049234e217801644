//! User-facing banner messages.

/// Severity of a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A single banner shown on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Banner shown after a successful upload.
    pub fn upload_succeeded() -> Self {
        Self::success("File caricato correttamente!")
    }

    /// Banner shown while nothing has been uploaded yet.
    pub fn upload_prompt() -> Self {
        Self::info("Carica un file Excel per procedere con l'analisi.")
    }

    /// Banner shown when the uploaded file cannot be parsed.
    pub fn parse_failed(cause: &str) -> Self {
        Self::error(format!(
            "Errore nella lettura del file: {}. Assicurati che sia un file Excel valido.",
            cause
        ))
    }
}
