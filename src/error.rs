//! Structured errors for truthtree
//!
//! The rule engine itself has no failure modes: developing a ticked node or
//! removing the root are reported as `Ok(false)`. Errors only arise at the
//! edges of the crate:
//!
//! - Tree errors (1xxx): stale or unknown node ids, premises that can no
//!   longer be added
//! - Input errors (2xxx): malformed problem documents
//! - Configuration errors (7xxx)
//! - I/O errors (8xxx)
//!
//! # Example
//!
//! ```
//! use truthtree::error::{ErrorCode, TreeError};
//!
//! let err = TreeError::unknown_node(7, 3).with_hint("ids come from Tableau::nodes()");
//! assert_eq!(err.code, ErrorCode::UnknownNode);
//! assert!(err.to_string().starts_with("[1001]"));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::tree::NodeId;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Tree errors (1xxx)
    /// Node id never handed out by this tree
    UnknownNode = 1001,
    /// Node id refers to a removed node
    RemovedNode = 1002,
    /// Premise added after the tree branched
    PremiseAfterBranching = 1003,
    /// Premise added below a closed branch
    ClosedBranch = 1004,

    // Input errors (2xxx)
    /// Generic input error
    InvalidInput = 2000,
    /// Empty input
    EmptyInput = 2001,
    /// Input is not valid JSON or has the wrong structure
    InvalidFormat = 2002,

    // Config errors (7xxx)
    /// Generic config error
    ConfigError = 7000,
    /// Config file not found
    ConfigNotFound = 7001,
    /// Invalid config syntax
    InvalidConfigSyntax = 7002,
    /// Invalid config value
    InvalidConfigValue = 7003,

    // I/O errors (8xxx)
    /// Generic I/O error
    IoError = 8000,
    /// File not found
    FileNotFound = 8001,
    /// Permission denied
    FileAccessDenied = 8002,
}

impl ErrorCode {
    pub fn code(&self) -> u32 {
        *self as u32
    }

    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::UnknownNode => "no such node",
            ErrorCode::RemovedNode => "node was removed",
            ErrorCode::PremiseAfterBranching => "tree has already branched",
            ErrorCode::ClosedBranch => "branch is closed",

            ErrorCode::InvalidInput => "invalid problem",
            ErrorCode::EmptyInput => "empty problem",
            ErrorCode::InvalidFormat => "malformed JSON",

            ErrorCode::ConfigError => "configuration error",
            ErrorCode::ConfigNotFound => "configuration file unreadable",
            ErrorCode::InvalidConfigSyntax => "configuration is not valid TOML",
            ErrorCode::InvalidConfigValue => "configuration value out of range",

            ErrorCode::IoError => "I/O error",
            ErrorCode::FileNotFound => "file not found",
            ErrorCode::FileAccessDenied => "permission denied",
        }
    }

    /// Family name of the code: `tree`, `input`, `config` or `io`
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "tree",
            2 => "input",
            7 => "config",
            _ => "io",
        }
    }

    /// Whether the error was caused by what the caller passed in
    pub fn is_user_error(&self) -> bool {
        matches!(self.category(), "tree" | "input" | "config")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Key/value details and underlying causes attached to an error
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorContext {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

/// The error type of the crate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl TreeError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        TreeError {
            code,
            message: message.into(),
            context: None,
            hint: None,
        }
    }

    pub fn unknown_node(id: NodeId, len: usize) -> Self {
        Self::new(
            ErrorCode::UnknownNode,
            format!("node {} does not exist (tree has {} slots)", id, len),
        )
        .with_context("node", id.to_string())
    }

    pub fn removed_node(id: NodeId) -> Self {
        Self::new(ErrorCode::RemovedNode, format!("node {} has been removed", id))
            .with_context("node", id.to_string())
    }

    pub fn premise_after_branching(leaves: usize) -> Self {
        Self::new(
            ErrorCode::PremiseAfterBranching,
            format!("cannot add a premise to a tree with {} leaves", leaves),
        )
        .with_hint("add every premise before developing a branching node")
    }

    pub fn closed_branch(leaf: NodeId) -> Self {
        Self::new(
            ErrorCode::ClosedBranch,
            format!("cannot add a premise below closed leaf {}", leaf),
        )
        .with_context("node", leaf.to_string())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn empty_input(what: &str) -> Self {
        Self::new(ErrorCode::EmptyInput, format!("no {} given", what))
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context
            .get_or_insert_with(ErrorContext::default)
            .fields
            .insert(key.into(), value.into());
        self
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.context
            .get_or_insert_with(ErrorContext::default)
            .causes
            .push(cause.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Value of a context field, if set
    pub fn field(&self, key: &str) -> Option<&str> {
        self.context
            .as_ref()
            .and_then(|ctx| ctx.fields.get(key))
            .map(String::as_str)
    }

    pub fn is_user_error(&self) -> bool {
        self.code.is_user_error()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)?;
        if let Some(ctx) = &self.context {
            if !ctx.fields.is_empty() {
                let fields: Vec<String> = ctx
                    .fields
                    .iter()
                    .map(|(key, value)| format!("{}={}", key, value))
                    .collect();
                write!(f, " ({})", fields.join(", "))?;
            }
            for cause in &ctx.causes {
                write!(f, "\n  caused by: {}", cause)?;
            }
        }
        if let Some(hint) = &self.hint {
            write!(f, "\n  hint: {}", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for TreeError {}

impl From<std::io::Error> for TreeError {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::FileAccessDenied,
            _ => ErrorCode::IoError,
        };
        TreeError::new(code, err.to_string())
    }
}

impl From<serde_json::Error> for TreeError {
    fn from(err: serde_json::Error) -> Self {
        let kind = match err.classify() {
            serde_json::error::Category::Io => "io",
            serde_json::error::Category::Syntax => "syntax",
            serde_json::error::Category::Data => "data",
            serde_json::error::Category::Eof => "eof",
        };
        TreeError::new(ErrorCode::InvalidFormat, err.to_string())
            .with_context("line", err.line().to_string())
            .with_context("column", err.column().to_string())
            .with_cause(format!("{} error", kind))
    }
}

impl From<ConfigError> for TreeError {
    fn from(err: ConfigError) -> Self {
        let code = match err {
            ConfigError::Io(..) => ErrorCode::ConfigNotFound,
            ConfigError::Parse(..) => ErrorCode::InvalidConfigSyntax,
            ConfigError::Serialize(_) => ErrorCode::ConfigError,
            ConfigError::Invalid(_) => ErrorCode::InvalidConfigValue,
        };
        TreeError::new(code, err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TreeError>;
