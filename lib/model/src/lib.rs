mod entity;
mod facet;
mod selection;
mod type_label;
pub mod vocab;

pub use entity::*;
pub use facet::*;
pub use selection::FilterSelection;
pub use type_label::normalize_type_label;

// Re-export some oxrdf types.
pub use oxrdf::{
    IriParseError, Literal, NamedNode, NamedNodeRef, Term, Variable, VariableNameParseError,
};
