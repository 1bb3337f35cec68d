//! Merging icon candidates from the three evidence sources.
//!
//! Candidates are concatenated in fixed precedence order (markup, manifest,
//! well-known) and merged by absolute URL. The first candidate seen for a URL
//! owns the entry; later duplicates only fill fields it left empty. Output
//! keeps first-seen order.
//!
//! Declared sizes take part in identity only when they disagree: a second
//! candidate for the same URL with a known size that no existing entry has
//! becomes its own entry (a manifest descriptor with `"sizes": "48x48 96x96"`
//! stays two icons), while an unsized candidate, or a sized one meeting an
//! unsized entry, is merged.

use std::collections::HashMap;

use crate::Icon;

/// Merge the per-source candidate lists in precedence order.
///
/// ```rust
/// use fav_core::discovery::aggregate::merge_candidates;
/// use fav_core::{Icon, IconSource};
/// use url::Url;
///
/// let url = Url::parse("https://example.com/favicon.ico").unwrap();
/// let from_markup = Icon::new(&url, IconSource::Markup);
/// let from_probe =
///     Icon::new(&url, IconSource::WellKnown).with_mime_type(Some("image/x-icon"));
///
/// let merged = merge_candidates(vec![from_markup], Vec::new(), vec![from_probe]);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].source, IconSource::Markup);
/// assert_eq!(merged[0].mime_type.as_deref(), Some("image/x-icon"));
/// ```
pub fn merge_candidates(markup: Vec<Icon>, manifest: Vec<Icon>, well_known: Vec<Icon>) -> Vec<Icon> {
    dedup_merge(markup.into_iter().chain(manifest).chain(well_known))
}

/// Deduplicate candidates in iteration order. See the module docs for rules.
pub fn dedup_merge<I>(candidates: I) -> Vec<Icon>
where
    I: IntoIterator<Item = Icon>,
{
    let mut merged: Vec<Icon> = Vec::new();
    let mut by_url: HashMap<String, Vec<usize>> = HashMap::new();

    for candidate in candidates {
        let Some(indices) = by_url.get_mut(&candidate.url) else {
            by_url.insert(candidate.url.clone(), vec![merged.len()]);
            merged.push(candidate);
            continue;
        };

        match merge_target(&merged, indices, &candidate) {
            Some(index) => fill_gaps(&mut merged[index], candidate),
            None => {
                indices.push(merged.len());
                merged.push(candidate);
            },
        }
    }

    merged
}

/// Pick the existing entry a duplicate should merge into, or `None` when it
/// declares a size no entry for the URL has.
fn merge_target(merged: &[Icon], indices: &[usize], candidate: &Icon) -> Option<usize> {
    let first = *indices.first()?;
    if !candidate.has_size() {
        return Some(first);
    }

    indices
        .iter()
        .copied()
        .find(|&i| merged[i].size() == candidate.size())
        .or_else(|| indices.iter().copied().find(|&i| !merged[i].has_size()))
}

/// Copy fields the existing entry lacks; never overwrite.
fn fill_gaps(existing: &mut Icon, candidate: Icon) {
    if existing.mime_type.is_none() {
        existing.mime_type = candidate.mime_type;
    }
    if existing.purpose.is_none() {
        existing.purpose = candidate.purpose;
    }
    if !existing.has_size() {
        existing.width = candidate.width;
        existing.height = candidate.height;
    }
}
