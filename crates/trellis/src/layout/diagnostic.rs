//! Non-fatal findings collected while laying out a roadmap.

use std::fmt;

use log::warn;

use trellis_core::identifier::Id;

/// A condition the pipeline worked around instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An edge references a node that does not exist. The edge is returned
    /// unmodified and ignored by every stage.
    DanglingEdge { edge: Id, missing: Id },

    /// A rib with no inbound spine edge. It is pinned at the origin.
    OrphanRib { node: Id },

    /// Two nodes still overlap after the collision resolver gave up.
    ResidualCollision { first: Id, second: Id },
}

impl Diagnostic {
    /// Stable machine readable name of the diagnostic kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DanglingEdge { .. } => "dangling_edge",
            Self::OrphanRib { .. } => "orphan_rib",
            Self::ResidualCollision { .. } => "residual_collision",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingEdge { edge, missing } => {
                write!(f, "edge `{edge}` references unknown node `{missing}`")
            }
            Self::OrphanRib { node } => {
                write!(f, "rib `{node}` has no spine parent, placed at the origin")
            }
            Self::ResidualCollision { first, second } => {
                write!(f, "nodes `{first}` and `{second}` still overlap")
            }
        }
    }
}

/// Ordered collection of diagnostics. Every pushed entry is logged at `warn`.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!(code = diagnostic.code(); "{diagnostic}");
        self.0.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let dangling = Diagnostic::DanglingEdge {
            edge: Id::new("e1"),
            missing: Id::new("ghost"),
        };
        let orphan = Diagnostic::OrphanRib {
            node: Id::new("lost"),
        };
        assert_eq!(dangling.code(), "dangling_edge");
        assert_eq!(orphan.code(), "orphan_rib");
    }

    #[test]
    fn test_display_names_nodes() {
        let diagnostic = Diagnostic::ResidualCollision {
            first: Id::new("a"),
            second: Id::new("b"),
        };
        assert_eq!(diagnostic.to_string(), "nodes `a` and `b` still overlap");
    }

    #[test]
    fn test_collection_keeps_order() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.push(Diagnostic::OrphanRib { node: Id::new("x") });
        diagnostics.push(Diagnostic::OrphanRib { node: Id::new("y") });

        assert_eq!(diagnostics.len(), 2);
        let all = diagnostics.into_vec();
        assert_eq!(all[0], Diagnostic::OrphanRib { node: Id::new("x") });
        assert_eq!(all[1], Diagnostic::OrphanRib { node: Id::new("y") });
    }
}
