//! Statically declared form fields per entity and the rules each one carries.

use crate::photo::PHOTO_MAX_LENGTH;

/// How a raw form value is coerced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Multi-line text; no length cap unless `max_length` is set.
    TextArea,
    Email,
    /// `YYYY-MM-DD`.
    Date,
    /// Integer id of a row in the named entity.
    Reference(&'static str),
    /// Stored cover image path or a bare file name to place under today's upload path.
    Photo,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::TextArea => "textarea",
            FieldKind::Email => "email",
            FieldKind::Date => "date",
            FieldKind::Reference(_) => "select",
            FieldKind::Photo => "file",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Maximum length in characters.
    pub max_length: Option<usize>,
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind, max_length: Option<usize>) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required: true,
        max_length,
    }
}

const fn optional(spec: FieldSpec) -> FieldSpec {
    FieldSpec {
        required: false,
        ..spec
    }
}

pub const PUBLISHER_FIELDS: &[FieldSpec] = &[
    field("name", "Name", FieldKind::Text, Some(30)),
    field("address", "Address", FieldKind::Text, Some(50)),
];

pub const AUTHOR_FIELDS: &[FieldSpec] = &[
    field("name", "Name", FieldKind::Text, Some(30)),
    field("email", "Email", FieldKind::Email, Some(254)),
];

pub const BOOK_FIELDS: &[FieldSpec] = &[
    field("title", "Title", FieldKind::Text, Some(100)),
    field("author", "Author", FieldKind::Reference("author"), None),
    field("publisher", "Publisher", FieldKind::Reference("publisher"), None),
    field("publication_date", "Publication date", FieldKind::Date, None),
    optional(field("post_photo", "Photo", FieldKind::Photo, Some(PHOTO_MAX_LENGTH))),
];

/// Longest session user name that can be recorded as a comment author.
pub const COMMENT_AUTHOR_MAX_LENGTH: usize = 200;

/// The comment author comes from the session, so only the text is a form field.
pub const COMMENT_FIELDS: &[FieldSpec] = &[field("text", "Text", FieldKind::TextArea, None)];

pub fn find<'a>(fields: &'a [FieldSpec], name: &str) -> Option<&'a FieldSpec> {
    fields.iter().find(|f| f.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_photo_is_the_only_optional_book_field() {
        let optional: Vec<_> = BOOK_FIELDS.iter().filter(|f| !f.required).map(|f| f.name).collect();
        assert_eq!(optional, vec!["post_photo"]);
    }

    #[test]
    fn comment_form_has_no_author_field() {
        assert!(find(COMMENT_FIELDS, "author").is_none());
        assert!(find(COMMENT_FIELDS, "text").is_some());
    }

    #[test]
    fn length_caps_follow_the_table_schema() {
        assert_eq!(find(PUBLISHER_FIELDS, "name").and_then(|f| f.max_length), Some(30));
        assert_eq!(find(PUBLISHER_FIELDS, "address").and_then(|f| f.max_length), Some(50));
        assert_eq!(find(BOOK_FIELDS, "title").and_then(|f| f.max_length), Some(100));
    }
}
