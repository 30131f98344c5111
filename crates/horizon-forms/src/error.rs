//! Error types for the form layer.

use crate::kind::RendererKind;

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;

/// Errors that can occur while building or driving forms.
///
/// Programming errors (asking for a row outside the bounds the form reported
/// to its widget) are not represented here; they panic.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// A selected option is not a member of the row's options.
    #[error("Selected option '{title}' is not one of the row's options")]
    OptionNotFound { title: String },

    /// Renderers can only be registered before the registry is handed to a widget.
    #[error("Renderer registry is sealed; cannot register '{kind}'")]
    RegistrySealed { kind: RendererKind },

    /// A renderer kind was registered twice.
    #[error("Renderer kind '{kind}' is already registered")]
    DuplicateRendererKind { kind: RendererKind },

    /// A remote schema names a row type without a registered builder.
    #[error("No row builder registered for remote row type '{row_type}'")]
    UnknownRowType { row_type: String },

    /// A remote schema document could not be decoded.
    #[error("Invalid form schema: {0}")]
    Schema(#[from] serde_json::Error),

    /// A remote form URL could not be parsed.
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A row tried to present a screen from a form without a navigator.
    #[error("Form has no navigator to present '{title}'")]
    NoNavigator { title: String },
}

impl FormError {
    /// Create an option-not-found error.
    pub fn option_not_found(title: impl Into<String>) -> Self {
        Self::OptionNotFound {
            title: title.into(),
        }
    }

    /// Create an unknown-row-type error.
    pub fn unknown_row_type(row_type: impl Into<String>) -> Self {
        Self::UnknownRowType {
            row_type: row_type.into(),
        }
    }
}
