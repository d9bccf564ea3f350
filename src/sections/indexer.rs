//! Heading scan and section table.
//!
//! `SectionIndex::parse` walks a wikitext article once and splits it into
//! sections. Section 0 is the implicit intro (everything before the first
//! heading); every heading line starts a new section that runs until the next
//! heading or the end of the text. The same records are exposed by position
//! and by unique name.

use indexmap::IndexMap;
use lazy_regex::regex;

/// Name under which the intro section is indexed.
pub const INTRO: &str = "intro";

/// Deepest heading level MediaWiki renders (`====== h6 ======`).
pub const MAX_DEPTH: usize = 6;

/// A contiguous region of the article text.
///
/// `offset` and `length` are byte positions into the UTF-8 text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Section {
    pub offset: usize,
    pub length: usize,
    /// Heading level, `0` for the intro.
    pub depth: u8,
}

impl Section {
    /// Byte position right after the section.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// A heading line found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Heading {
    offset: usize,
    depth: u8,
    name: String,
}

/// Validate a candidate heading line.
///
/// The delimiter runs on both sides must have the same length (1 to 6). A line
/// made only of `=` is not a heading. The name is the line with every `=`
/// removed, trimmed.
fn parse_heading(offset: usize, line: &str) -> Option<Heading> {
    let line = line.trim_end_matches([' ', '\t', '\r']);
    let lead = line.bytes().take_while(|b| *b == b'=').count();
    if lead == line.len() {
        return None;
    }
    let trail = line.bytes().rev().take_while(|b| *b == b'=').count();
    if lead != trail || lead > MAX_DEPTH {
        return None;
    }

    Some(Heading {
        offset,
        depth: u8::try_from(lead).ok()?,
        name: line.replace('=', "").trim().to_owned(),
    })
}

/// All headings of `text`, left to right. Each search resumes after the end of
/// the previous candidate line so matches never overlap.
fn headings(text: &str) -> impl Iterator<Item = Heading> + '_ {
    regex!(r"(?m)^=[^\n]*=[ \t]*\r?$")
        .find_iter(text)
        .filter_map(|m: regex::Match<'_>| parse_heading(m.start(), m.as_str()))
}

/// Table of sections of one article, by position and by unique name.
///
/// Both views hold the same records in the same order and together partition
/// the text: no gaps, no overlaps, the last record ends at the text length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionIndex {
    by_index: Vec<Section>,
    by_name: IndexMap<String, Section>,
}

impl Default for SectionIndex {
    /// Index of an empty text: a single empty intro.
    fn default() -> Self {
        Self::parse("")
    }
}

impl SectionIndex {
    /// Build the section table of `text`.
    pub fn parse(text: &str) -> Self {
        let mut index = SectionIndex {
            by_index: Vec::new(),
            by_name: IndexMap::new(),
        };

        let mut current = (INTRO.to_owned(), Section::default());
        for heading in headings(text) {
            let (name, mut section) = current;
            section.length = heading.offset - section.offset;
            index.push(name, section);

            let name = index.unique_name(heading.name);
            current = (
                name,
                Section {
                    offset: heading.offset,
                    length: 0,
                    depth: heading.depth,
                },
            );
        }

        let (name, mut section) = current;
        section.length = text.len() - section.offset;
        index.push(name, section);

        log::trace!("indexed {} sections", index.num_sections());
        index
    }

    fn push(&mut self, name: String, section: Section) {
        self.by_index.push(section);
        self.by_name.insert(name, section);
    }

    /// `name`, or `name_2`, `name_3`, ... if it is already taken.
    fn unique_name(&self, name: String) -> String {
        if !self.by_name.contains_key(&name) {
            return name;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}_{}", name, n);
            if !self.by_name.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Number of sections, intro included.
    pub fn num_sections(&self) -> usize {
        self.by_index.len()
    }

    /// Sections in text order.
    pub fn by_index(&self) -> &[Section] {
        &self.by_index
    }

    /// Sections keyed by unique name, in text order.
    pub fn by_name(&self) -> &IndexMap<String, Section> {
        &self.by_name
    }

    pub fn get(&self, idx: usize) -> Option<&Section> {
        self.by_index.get(idx)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Section> {
        self.by_name.get(name)
    }

    /// Position of the section called `name`.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.by_name.get_index_of(name)
    }

    /// Unique name of the section at `idx`.
    pub fn name_at(&self, idx: usize) -> Option<&str> {
        self.by_name.get_index(idx).map(|(name, _)| name.as_str())
    }
}
