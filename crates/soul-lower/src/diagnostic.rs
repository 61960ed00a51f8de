//! The diagnostic record surfaced at pipeline-pass boundaries.
//!
//! `ErrorNode.message` is the only thing a semantic pass actually
//! produces, so `DiagnosticCode` is reconstructed from that free text by
//! prefix-matching into the same structured shapes the passes that raise
//! them document (spec §7's taxonomy). `source_location` is unavailable
//! for internally-synthesized errors since lexing/parsing (the only stage
//! that sees source text) is a collaborator's responsibility out of scope
//! here, so it is reported as `(0, 0)` for every diagnostic this crate
//! raises.

use std::fmt;

use serde::{Deserialize, Serialize};

use soul_ast::CollectedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Hint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    pub row: u32,
    pub column: u32,
}

/// `E0001`-`E0005` are reserved for the lexer/parser, which is out of
/// scope here; this crate only ever raises these semantic-pass codes
/// (101/102/103/100/199).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum DiagnosticCode {
    #[error("redefinition of type '{name}'")]
    Redefinition { name: String },

    #[error("cannot resolve type '{name}', because no such type exists")]
    UnknownType { name: String },

    #[error("impossible cast from {from} to {to}")]
    ImpossibleCast { from: String, to: String },

    #[error("internal error: {message}")]
    Internal { message: String },

    #[error("{message}")]
    Other { message: String },
}

impl DiagnosticCode {
    pub fn numeric(&self) -> u32 {
        match self {
            DiagnosticCode::Redefinition { .. } => 101,
            DiagnosticCode::UnknownType { .. } => 102,
            DiagnosticCode::ImpossibleCast { .. } => 103,
            DiagnosticCode::Internal { .. } => 199,
            DiagnosticCode::Other { .. } => 100,
        }
    }

    /// Reconstructs the structured code from an `ErrorNode`'s free-text
    /// message -- the only form semantic passes actually produce.
    fn from_message(message: &str) -> Self {
        if let Some(rest) = message.strip_prefix("[INTERNAL] ") {
            return DiagnosticCode::Internal { message: rest.to_string() };
        }
        if let Some(name) = message
            .strip_prefix("redefinition of type '")
            .and_then(|s| s.strip_suffix('\''))
        {
            return DiagnosticCode::Redefinition { name: name.to_string() };
        }
        if let Some(name) = message
            .strip_prefix("cannot resolve type '")
            .and_then(|s| s.strip_suffix("', because no such type exists"))
        {
            return DiagnosticCode::UnknownType { name: name.to_string() };
        }
        if let Some(rest) = message.strip_prefix("impossible cast from ") {
            if let Some((from, to)) = rest.split_once(" to ") {
                return DiagnosticCode::ImpossibleCast { from: from.to_string(), to: to.to_string() };
            }
        }
        DiagnosticCode::Other { message: message.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub location: SourceLocation,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} E{:03} at {}:{}: {}",
            self.severity,
            self.code.numeric(),
            self.location.row,
            self.location.column,
            self.code
        )
    }
}

impl Diagnostic {
    pub fn from_collected_error(err: &CollectedError<'_>) -> Self {
        let message = match err.node {
            soul_ast::ASTNode::Error(e) => e.message.clone(),
            other => format!("[INTERNAL] non-Error node reached diagnostic conversion: {other:?}"),
        };
        Diagnostic {
            severity: Severity::Error,
            code: DiagnosticCode::from_message(&message),
            location: SourceLocation::default(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            code: DiagnosticCode::Internal { message: message.into() },
            location: SourceLocation::default(),
        }
    }
}
