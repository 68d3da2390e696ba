//! Filter construction for note listing.

use crate::id::ObjectId;
use crate::models::note::Note;
use regex::{Regex, RegexBuilder};

/// Case-insensitive literal matcher for the free-text search term.
#[derive(Debug, Clone)]
enum TextMatcher {
    Pattern(Regex),
    // Only reached when the escaped term exceeds the regex size limit.
    Lowercase(String),
}

impl TextMatcher {
    fn new(term: &str) -> Self {
        match RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => Self::Pattern(pattern),
            Err(err) => {
                tracing::debug!("search term fell back to substring match: {}", err);
                Self::Lowercase(term.to_lowercase())
            }
        }
    }

    fn is_match(&self, haystack: &str) -> bool {
        match self {
            Self::Pattern(pattern) => pattern.is_match(haystack),
            Self::Lowercase(needle) => haystack.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// Predicate over notes built from the optional list parameters.
///
/// Every present constraint must hold. The free-text term matches when it
/// occurs in the title or in the content, ignoring case.
#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    folder_id: Option<ObjectId>,
    tag_id: Option<ObjectId>,
    search: Option<TextMatcher>,
}

impl NoteFilter {
    /// Build a filter; blank search terms are ignored.
    pub fn new(
        search_term: Option<&str>,
        folder_id: Option<ObjectId>,
        tag_id: Option<ObjectId>,
    ) -> Self {
        Self::default()
            .with_folder(folder_id)
            .with_tag(tag_id)
            .with_search_term(search_term)
    }

    /// Restrict to notes in `folder_id`.
    pub fn with_folder(mut self, folder_id: Option<ObjectId>) -> Self {
        self.folder_id = folder_id;
        self
    }

    /// Restrict to notes carrying `tag_id`.
    pub fn with_tag(mut self, tag_id: Option<ObjectId>) -> Self {
        self.tag_id = tag_id;
        self
    }

    /// Restrict to notes whose title or content contains `term`.
    pub fn with_search_term(mut self, term: Option<&str>) -> Self {
        self.search = term
            .filter(|value| !value.trim().is_empty())
            .map(TextMatcher::new);
        self
    }

    /// `true` when no constraint is set.
    pub fn is_empty(&self) -> bool {
        self.folder_id.is_none() && self.tag_id.is_none() && self.search.is_none()
    }

    /// Evaluate the filter against one note.
    pub fn matches(&self, note: &Note) -> bool {
        if let Some(folder_id) = self.folder_id {
            if note.folder_id != Some(folder_id) {
                return false;
            }
        }
        if let Some(tag_id) = self.tag_id {
            if !note.has_tag(tag_id) {
                return false;
            }
        }
        match &self.search {
            Some(matcher) => {
                matcher.is_match(&note.title)
                    || note
                        .content
                        .as_deref()
                        .map(|content| matcher.is_match(content))
                        .unwrap_or(false)
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::note::NoteFields;

    fn id(n: u8) -> ObjectId {
        let mut bytes = [0u8; 12];
        bytes[11] = n;
        ObjectId::from_bytes(bytes)
    }

    fn note(title: &str, content: Option<&str>, folder: Option<u8>, tags: &[u8]) -> Note {
        Note::new(NoteFields {
            title: title.to_string(),
            content: content.map(str::to_string),
            folder_id: folder.map(id),
            tags: tags.iter().copied().map(id).collect(),
        })
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = NoteFilter::new(None, None, None);
        assert!(filter.is_empty());
        assert!(filter.matches(&note("anything", None, None, &[])));
        assert!(filter.matches(&note("x", Some("y"), Some(1), &[2])));
    }

    #[test]
    fn blank_search_term_is_ignored() {
        let filter = NoteFilter::new(Some("   "), None, None);
        assert!(filter.is_empty());
    }

    #[test]
    fn search_matches_title_or_content_ignoring_case() {
        let filter = NoteFilter::new(Some("LADY gaga"), None, None);
        assert!(filter.matches(&note("Why lady Gaga is great", None, None, &[])));
        assert!(filter.matches(&note("Cats", Some("...like lady gaga..."), None, &[])));
        assert!(!filter.matches(&note("Cats", Some("dogs"), None, &[])));
        assert!(!filter.matches(&note("Cats", None, None, &[])));
    }

    #[test]
    fn search_term_is_literal_not_a_pattern() {
        let filter = NoteFilter::new(Some("c.t"), None, None);
        assert!(!filter.matches(&note("cat", None, None, &[])));
        assert!(filter.matches(&note("the c.t file", None, None, &[])));

        let anchors = NoteFilter::new(Some("^(a|b)+$"), None, None);
        assert!(!anchors.matches(&note("aaa", None, None, &[])));
    }

    #[test]
    fn folder_and_tag_constraints_combine_with_search() {
        let filter = NoteFilter::new(Some("cats"), Some(id(1)), Some(id(7)));
        assert!(filter.matches(&note("Cats", None, Some(1), &[3, 7])));
        assert!(!filter.matches(&note("Cats", None, Some(2), &[7])));
        assert!(!filter.matches(&note("Cats", None, Some(1), &[3])));
        assert!(!filter.matches(&note("Dogs", None, Some(1), &[7])));
        assert!(!filter.matches(&note("Cats", None, None, &[7])));
    }

    #[test]
    fn lowercase_fallback_matches_like_pattern() {
        let matcher = TextMatcher::Lowercase("gaga".to_string());
        assert!(matcher.is_match("Lady GaGa"));
        assert!(!matcher.is_match("Lady"));
    }
}
