//! Candidate collection from the three evidence sources, plus merging and
//! filtering.
//!
//! Each submodule handles one stage and can be used on its own; the
//! [`Finder`](crate::Finder) wires them together.
//!
//! | Stage | Module | Network |
//! |-------|--------|---------|
//! | `<link>` declarations | [`markup`] | no |
//! | Web-app manifest | [`manifest`] | one GET |
//! | Conventional paths | [`well_known`] | one probe per path |
//! | Deduplication | [`aggregate`] | no |
//! | Caller filters | [`filter`] | no |

pub mod aggregate;
pub mod filter;
pub mod manifest;
pub mod markup;
pub mod well_known;

pub use aggregate::merge_candidates;
pub use filter::{IconFilter, apply_filters};
pub use manifest::{DEFAULT_MANIFEST_PATH, parse_manifest};
pub use markup::{MarkupScan, parse_markup};
pub use well_known::{DEFAULT_MAX_CONCURRENT_PROBES, WELL_KNOWN_PATHS};
