use crate::ast::NodeKind;
use quill_common::SourcePosition;

/// A node whose children do not have the shape its kind requires.
///
/// This is a parser contract violation. Compilation of the whole tree stops
/// at the first one and reports the offending node's position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("malformed {kind} node at {position}: {reason}")]
    MalformedNode {
        kind: NodeKind,
        position: SourcePosition,
        reason: MalformedReason,
    },
}

impl CompileError {
    pub(crate) fn malformed(kind: NodeKind, position: SourcePosition, reason: MalformedReason) -> Self {
        Self::MalformedNode {
            kind,
            position,
            reason,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::MalformedNode { kind, .. } => *kind,
        }
    }

    pub fn position(&self) -> SourcePosition {
        match self {
            Self::MalformedNode { position, .. } => *position,
        }
    }

    pub fn reason(&self) -> MalformedReason {
        match self {
            Self::MalformedNode { reason, .. } => *reason,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MalformedReason {
    #[error("else branch has statements but no `else` was recorded")]
    ElseWithoutIntroducer,
    #[error("a program block can only appear at the root")]
    NestedProgram,
    #[error("an expression cannot stand alone as a statement")]
    ExpressionStatement,
    #[error("initializer must be an expression")]
    InvalidInitializer,
    #[error("identifier is empty")]
    EmptyName,
}
