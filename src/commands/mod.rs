pub mod certificate;
pub mod channel;
pub mod connect;
pub mod disconnect;
pub mod environment;
pub mod feed;
pub mod group;
pub mod library;
pub mod machine;
pub mod project;
pub mod status;
pub mod step;
pub mod variable;

#[cfg(test)]
mod group_tests;
#[cfg(test)]
mod status_tests;
#[cfg(test)]
mod step_tests;

/// Rendering for list/get output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

use crate::deps::{MessageStyle, UserInterface};
use crate::selector::{not_found_by_id, not_found_by_name, Selector};

/// Resolve a selector against an already-fetched resource list. Unmatched
/// names and ids each produce a warning and are skipped.
pub(crate) fn select_from<T: Clone>(
    items: &[T],
    selector: &Selector,
    kind: &str,
    name_of: impl Fn(&T) -> &str,
    id_of: impl Fn(&T) -> Option<&str>,
    ui: &dyn UserInterface,
) -> Vec<T> {
    match selector {
        Selector::All => items.to_vec(),
        Selector::ByName(names) => names
            .iter()
            .filter_map(|name| {
                let found = items.iter().find(|item| name_of(item) == name);
                if found.is_none() {
                    ui.print_styled(&not_found_by_name(kind, name), MessageStyle::Warning);
                }
                found.cloned()
            })
            .collect(),
        Selector::ById(ids) => ids
            .iter()
            .filter_map(|id| {
                let found = items.iter().find(|item| id_of(item) == Some(id));
                if found.is_none() {
                    ui.print_styled(&not_found_by_id(kind, id), MessageStyle::Warning);
                }
                found.cloned()
            })
            .collect(),
    }
}
