// Copyright (C) 2026 by GiGa infosystems

//! Various utility functions associated with this crate

/// The number of characters a full revision gets shortened to.
///
/// Every place a revision gets compared has to use the same length, otherwise the same commit
/// shows up as a change.
pub const SHORT_REVISION_LEN: usize = 12;

/// Shorten a revision to at most [`SHORT_REVISION_LEN`] characters
///
/// Revisions that are already shorter are returned unchanged.
pub fn short_revision(revision: &str) -> &str {
    match revision.char_indices().nth(SHORT_REVISION_LEN) {
        Some((end, _)) => &revision[..end],
        None => revision,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn shortens_full_revision() {
        assert_eq!(
            short_revision("c2843e01d9a2bc60bb1f1f3a6ed2e4c5f3b1dd3e"),
            "c2843e01d9a2"
        );
    }

    #[test]
    fn keeps_short_revisions() {
        assert_eq!(short_revision("c2843e01d9a2"), "c2843e01d9a2");
        assert_eq!(short_revision("abc"), "abc");
        assert_eq!(short_revision(""), "");
    }
}
