// Copyright (C) 2026 by GiGa infosystems

//! Utilities for reading `Gopkg.lock` style TOML documents
//!
//! Keys are looked up ignoring ASCII case, matching how `dep` itself decodes its lock files.

use toml_edit::{DocumentMut, Item, TableLike, Value};

/// Find a key in a table, ignoring ASCII case
pub fn get_ignore_case<'a>(table: &'a dyn TableLike, key: &str) -> Option<&'a Item> {
    table
        .iter()
        .find_map(|(name, item)| name.eq_ignore_ascii_case(key).then_some(item))
}

/// Collect the tables of either an array of tables (`[[projects]]`) or an inline array of inline
/// tables (`projects = [{ ... }]`).
///
/// Returns [`None`] if the item is neither, or the inline array contains anything else than
/// inline tables.
pub fn table_array(item: &Item) -> Option<Vec<&dyn TableLike>> {
    match item {
        Item::ArrayOfTables(tables) => Some(
            tables
                .iter()
                .map(|table| table as &dyn TableLike)
                .collect(),
        ),
        Item::Value(Value::Array(array)) => array
            .iter()
            .map(|value| value.as_inline_table().map(|table| table as &dyn TableLike))
            .collect(),
        _ => None,
    }
}

/// Utility to follow paths of string keys in a TOML file.
///
/// This is used to access the list of locked projects.
pub trait TomlPathLookup {
    fn path_lookup(&self, path: impl IntoIterator<Item: AsRef<str>>) -> Option<&Item>;
}

impl TomlPathLookup for Item {
    fn path_lookup(&self, path: impl IntoIterator<Item: AsRef<str>>) -> Option<&Item> {
        let mut item = self;
        for i in path {
            item = get_ignore_case(item.as_table_like()?, i.as_ref())?;
        }

        Some(item)
    }
}

impl TomlPathLookup for DocumentMut {
    fn path_lookup(&self, path: impl IntoIterator<Item: AsRef<str>>) -> Option<&Item> {
        self.as_item().path_lookup(path)
    }
}
