//! Form field extraction
//!
//! Fields come from the query string and an urlencoded request body; a body
//! field replaces a query field of the same name. Values stay raw bytes so a
//! page body is stored exactly as it was sent.

use std::collections::HashMap;

/// Content type whose body is parsed as form fields
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Decoded form fields, first value per name wins within each source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    fields: HashMap<String, Vec<u8>>,
}

impl Form {
    /// Build from the query string and, if present, an urlencoded body
    pub fn parse(query: Option<&str>, body: Option<&[u8]>) -> Self {
        let mut form = Self::default();
        if let Some(query) = query {
            form.merge(parse_pairs(query.as_bytes()));
        }
        if let Some(body) = body {
            form.merge(parse_pairs(body));
        }
        form
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, Vec<u8>)>) -> Self {
        let mut form = Self::default();
        form.merge(pairs);
        form
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// Field as text; a value that is not UTF-8 counts as absent
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| std::str::from_utf8(v).ok())
    }

    fn merge(&mut self, pairs: impl IntoIterator<Item = (String, Vec<u8>)>) {
        let mut seen = HashMap::new();
        for (name, value) in pairs {
            seen.entry(name).or_insert(value);
        }
        self.fields.extend(seen);
    }
}

/// Split `a=1&b=2` into decoded pairs
fn parse_pairs(input: &[u8]) -> Vec<(String, Vec<u8>)> {
    input
        .split(|&b| b == b'&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = match pair.iter().position(|&b| b == b'=') {
                Some(eq) => (&pair[..eq], &pair[eq + 1..]),
                None => (pair, &[][..]),
            };
            (String::from_utf8_lossy(&decode(name)).into_owned(), decode(value))
        })
        .collect()
}

/// `+` is a space, then percent-decode without any charset conversion
fn decode(raw: &[u8]) -> Vec<u8> {
    let spaced: Vec<u8> = raw.iter().map(|&b| if b == b'+' { b' ' } else { b }).collect();
    urlencoding::decode_binary(&spaced).into_owned()
}

/// Whether a Content-Type header value denotes an urlencoded form
pub fn is_form_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}
