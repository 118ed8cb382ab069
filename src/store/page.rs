use crate::routing::Title;

/// A title plus its body bytes
///
/// Bodies are opaque: stored and returned exactly as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: Title,
    pub body: Vec<u8>,
}

impl Page {
    pub const fn new(title: Title, body: Vec<u8>) -> Self {
        Self { title, body }
    }

    /// Page with an empty body, used when editing a title that has no record
    pub const fn empty(title: Title) -> Self {
        Self::new(title, Vec::new())
    }

    /// Body as text for rendering, replacing invalid UTF-8 sequences
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
