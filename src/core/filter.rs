//! Search filter and page slicing.

use crate::core::model::Entry;

/// An entry paired with the rank shown next to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked<'a> {
    pub rank: usize,
    pub entry: &'a Entry,
}

/// Case-insensitive substring match on the producer key.
///
/// Matches keep their 1-based position in the unfiltered ordering as rank,
/// and the relative order of `entries` is preserved.
#[must_use]
pub fn filter<'a>(entries: &'a [Entry], search: Option<&str>) -> Vec<Ranked<'a>> {
    let needle = search.filter(|term| !term.is_empty()).map(str::to_lowercase);

    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| {
            needle
                .as_deref()
                .is_none_or(|needle| entry.key.to_lowercase().contains(needle))
        })
        .map(|(idx, entry)| Ranked {
            rank: idx + 1,
            entry,
        })
        .collect()
}

/// Takes `[offset, offset + page_size)` clipped to `filtered`.
///
/// Unfiltered pages number rows sequentially from `offset + 1`; searched
/// pages keep the rank assigned by [`filter`].
#[must_use]
pub fn slice<'a>(
    filtered: &[Ranked<'a>],
    offset: usize,
    page_size: usize,
    searching: bool,
) -> Vec<Ranked<'a>> {
    filtered
        .iter()
        .skip(offset)
        .take(page_size)
        .enumerate()
        .map(|(idx, ranked)| Ranked {
            rank: if searching { ranked.rank } else { offset + idx + 1 },
            entry: ranked.entry,
        })
        .collect()
}
