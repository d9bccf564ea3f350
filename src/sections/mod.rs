//! Section addressing over raw wikitext.
//!
//! - `indexer` builds the `SectionIndex` (by position and by unique name).
//! - `locator` resolves a `SectionRef` to a byte range, optionally with subsections.
//! - `renderer` slices that range out of the text, optionally without the heading.

pub mod enums;
pub mod indexer;
pub mod locator;
pub mod renderer;

pub use enums::{KeyMode, SectionRef};
pub use indexer::{INTRO, Section, SectionIndex};
pub use locator::SectionRange;
pub use renderer::render;
