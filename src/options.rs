//! Configuration for templates
//!
//! Options are attached to a [`Template`](crate::Template) when it is
//! created and travel with it. A process-wide default is used by
//! [`Template::new`](crate::Template::new); it can be installed once, before
//! first use, with [`TemplateOptions::install_default`].

use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use thiserror::Error;

use crate::argument::{ArgumentComparer, DefaultComparer};

/// Errors that can occur when loading options
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Failed to read options file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse options TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration options for a template
#[derive(Debug, Clone)]
pub struct TemplateOptions {
    /// Double `{` and `}` in appended literals so they render as braces
    pub auto_escape_curly_braces: bool,

    /// Keep `:format` in the buffer's placeholders, not only in the argument
    pub preserve_argument_format: bool,

    /// Reuse an existing equal argument instead of adding a duplicate
    pub reuse_identical_arguments: bool,

    /// Dedent multi-line format strings before parsing
    pub auto_adjust_multiline: bool,

    /// Equality used when `reuse_identical_arguments` is set
    pub argument_comparer: Arc<dyn ArgumentComparer>,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            auto_escape_curly_braces: true,
            preserve_argument_format: true,
            reuse_identical_arguments: false,
            auto_adjust_multiline: false,
            argument_comparer: Arc::new(DefaultComparer),
        }
    }
}

/// TOML structure for deserializing options
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlOptions {
    template: Option<TomlTemplate>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlTemplate {
    auto_escape_curly_braces: Option<bool>,
    preserve_argument_format: Option<bool>,
    reuse_identical_arguments: Option<bool>,
    auto_adjust_multiline: Option<bool>,
}

static PROCESS_DEFAULT: OnceLock<TemplateOptions> = OnceLock::new();

impl TemplateOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether literal braces are escaped
    pub fn with_auto_escape_curly_braces(mut self, escape: bool) -> Self {
        self.auto_escape_curly_braces = escape;
        self
    }

    /// Set whether format specifiers stay in the buffer
    pub fn with_preserve_argument_format(mut self, preserve: bool) -> Self {
        self.preserve_argument_format = preserve;
        self
    }

    /// Set whether identical arguments share one slot
    pub fn with_reuse_identical_arguments(mut self, reuse: bool) -> Self {
        self.reuse_identical_arguments = reuse;
        self
    }

    /// Set whether multi-line format strings are dedented
    pub fn with_auto_adjust_multiline(mut self, adjust: bool) -> Self {
        self.auto_adjust_multiline = adjust;
        self
    }

    /// Set the equality used for argument reuse
    pub fn with_argument_comparer(mut self, comparer: impl ArgumentComparer + 'static) -> Self {
        self.argument_comparer = Arc::new(comparer);
        self
    }

    /// The comparer to consult when adding arguments, if reuse is enabled
    pub(crate) fn comparer(&self) -> Option<&dyn ArgumentComparer> {
        self.reuse_identical_arguments
            .then(|| self.argument_comparer.as_ref())
    }

    /// Load options from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load options from a TOML string
    ///
    /// Keys live in a `[template]` table; missing keys keep their defaults.
    pub fn from_str(content: &str) -> Result<Self, OptionsError> {
        let parsed: TomlOptions = toml::from_str(content)?;
        let mut options = Self::default();

        if let Some(t) = parsed.template {
            if let Some(v) = t.auto_escape_curly_braces {
                options.auto_escape_curly_braces = v;
            }
            if let Some(v) = t.preserve_argument_format {
                options.preserve_argument_format = v;
            }
            if let Some(v) = t.reuse_identical_arguments {
                options.reuse_identical_arguments = v;
            }
            if let Some(v) = t.auto_adjust_multiline {
                options.auto_adjust_multiline = v;
            }
        }
        Ok(options)
    }

    /// Install the process-wide default.
    ///
    /// Succeeds only once and only before the default was first read;
    /// otherwise the rejected options are handed back. Changing the default
    /// afterwards is not possible.
    pub fn install_default(options: TemplateOptions) -> Result<(), TemplateOptions> {
        PROCESS_DEFAULT.set(options)
    }

    /// The process-wide default, initialized to [`TemplateOptions::default`]
    /// on first use if nothing was installed
    pub fn process_default() -> &'static TemplateOptions {
        PROCESS_DEFAULT.get_or_init(TemplateOptions::default)
    }
}
