//! Identifying-parameter handling shared by the CRUD commands.
//!
//! Each get/delete command accepts either a set of names or a set of ids.
//! The combination is validated here, once, at the boundary — before any
//! network call is attempted.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("the --name and --id parameters cannot be used together")]
    ConflictingParameters,
}

/// How a command identifies the resources it operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    All,
    ByName(Vec<String>),
    ById(Vec<String>),
}

impl Selector {
    pub fn from_flags(names: Vec<String>, ids: Vec<String>) -> Result<Self, SelectorError> {
        match (names.is_empty(), ids.is_empty()) {
            (false, false) => Err(SelectorError::ConflictingParameters),
            (false, true) => Ok(Self::ByName(names)),
            (true, false) => Ok(Self::ById(ids)),
            (true, true) => Ok(Self::All),
        }
    }
}

/// Warning literal for an unresolved name lookup.
pub fn not_found_by_name(kind: &str, name: &str) -> String {
    format!("The {kind} '{name}' does not exist.")
}

/// Warning literal for an unresolved id lookup.
pub fn not_found_by_id(kind: &str, id: &str) -> String {
    format!("A {kind} with the id '{id}' does not exist.")
}
