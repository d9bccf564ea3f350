//! Resolve a `SectionRef` against a `SectionIndex`.

use super::enums::SectionRef;
use super::indexer::{Section, SectionIndex};

/// Byte range covered by a located section, possibly with its subsections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRange {
    pub offset: usize,
    pub length: usize,
    /// Depth of the section the range starts with (`0` for the intro).
    pub depth: u8,
}

impl SectionRange {
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

impl From<Section> for SectionRange {
    fn from(value: Section) -> Self {
        Self {
            offset: value.offset,
            length: value.length,
            depth: value.depth,
        }
    }
}

impl SectionIndex {
    /// Locate `section`, returning `None` when it does not resolve.
    ///
    /// With `include_subsections`, every following section that is nested
    /// deeper than the target is absorbed into the range. The walk stops at
    /// the first sibling or ancestor heading. The intro has no subsections.
    pub fn locate(&self, section: &SectionRef, include_subsections: bool) -> Option<SectionRange> {
        let position = match section {
            SectionRef::Index(idx) => *idx,
            SectionRef::Name(name) => self.position_of(name)?,
            SectionRef::New => return None,
        };
        let target = *self.get(position)?;
        let mut range = SectionRange::from(target);

        if include_subsections && target.depth > 0 {
            range.length += self.by_index()[position + 1..]
                .iter()
                .take_while(|s| s.depth > target.depth)
                .map(|s| s.length)
                .sum::<usize>();
        }

        Some(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "=A=\nx\n==B==\ny\n==C==\nz\n=D=\nw\n";

    #[test]
    fn subsections_are_absorbed_until_a_sibling() {
        let index = SectionIndex::parse(TEXT);
        let a = index.locate(&"A".into(), true).unwrap();
        assert_eq!(&TEXT[a.offset..a.end()], "=A=\nx\n==B==\ny\n==C==\nz\n");

        let only_a = index.locate(&"A".into(), false).unwrap();
        assert_eq!(&TEXT[only_a.offset..only_a.end()], "=A=\nx\n");
    }

    #[test]
    fn leaf_section_is_unchanged_by_subsection_flag() {
        let index = SectionIndex::parse(TEXT);
        assert_eq!(
            index.locate(&SectionRef::Index(2), true),
            index.locate(&SectionRef::Index(2), false)
        );
    }

    #[test]
    fn deeper_then_shallower_nesting() {
        let text = "== A ==\n=== B ===\n==== C ====\n=== D ===\n== E ==\n";
        let index = SectionIndex::parse(text);
        let b = index.locate(&"B".into(), true).unwrap();
        assert_eq!(&text[b.offset..b.end()], "=== B ===\n==== C ====\n");
        let a = index.locate(&"A".into(), true).unwrap();
        assert_eq!(&text[a.offset..a.end()], "== A ==\n=== B ===\n==== C ====\n=== D ===\n");
    }

    #[test]
    fn first_line_heading_still_collects_subsections() {
        let text = "= Top =\na\n== Child ==\nb\n";
        let index = SectionIndex::parse(text);
        let top = index.locate(&SectionRef::Index(1), true).unwrap();
        assert_eq!(top.offset, 0);
        assert_eq!(top.length, text.len());
    }

    #[test]
    fn intro_never_grows() {
        let index = SectionIndex::parse("intro\n== A ==\nx\n");
        let intro = index.locate(&SectionRef::Index(0), true).unwrap();
        assert_eq!((intro.offset, intro.length, intro.depth), (0, 6, 0));
    }

    #[test]
    fn unknown_refs_are_not_found() {
        let index = SectionIndex::parse(TEXT);
        assert_eq!(index.locate(&"Nonexistent".into(), true), None);
        assert_eq!(index.locate(&SectionRef::Index(99), false), None);
        assert_eq!(index.locate(&SectionRef::New, false), None);
    }
}
