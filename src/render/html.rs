//! Built-in HTML views

use super::{RenderError, Renderer, View, ViewData};
use crate::routing::STATIC_PREFIX;
use crate::store::Page;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

/// Renders the wiki views as self-contained HTML documents
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    site_name: String,
}

impl HtmlRenderer {
    pub fn new(site_name: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
        }
    }

    fn layout(&self, heading: &str, content: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{heading} - {site}</title>
    <link rel="stylesheet" href="{STATIC_PREFIX}style.css">
</head>
<body>
    <nav><a href="/">{site}</a> | <a href="/create">New page</a></nav>
    <h1>{heading}</h1>
{content}
</body>
</html>"#,
            heading = encode_text(heading),
            site = encode_text(&self.site_name),
        )
    }

    fn index(&self, pages: &[Page]) -> String {
        let mut content = String::from("    <ul class=\"pages\">\n");
        for page in pages {
            let _ = writeln!(
                content,
                "        <li><a href=\"/view/{href}\">{title}</a></li>",
                href = encode_double_quoted_attribute(&page.title.url_encoded()),
                title = encode_text(page.title.as_str()),
            );
        }
        content.push_str("    </ul>");
        if pages.is_empty() {
            content.push_str("\n    <p>No pages yet.</p>");
        }
        self.layout("All pages", &content)
    }

    fn create(&self) -> String {
        let content = r#"    <form action="/store" method="POST">
        <input type="text" name="title" pattern="[a-zA-Z0-9 ]+" required>
        <textarea name="body" rows="20" cols="80"></textarea>
        <input type="submit" value="Save">
    </form>"#;
        self.layout("New page", content)
    }

    fn view(&self, page: &Page) -> String {
        let href = encode_double_quoted_attribute(&page.title.url_encoded()).into_owned();
        let content = format!(
            r#"    <p>[<a href="/edit/{href}">edit</a>] [<a href="/delete/{href}">delete</a>]</p>
    <pre class="body">{body}</pre>"#,
            body = encode_text(&page.body_text()),
        );
        self.layout(page.title.as_str(), &content)
    }

    fn edit(&self, page: &Page) -> String {
        let content = format!(
            r#"    <form action="/save/{href}" method="POST">
        <textarea name="body" rows="20" cols="80">
{body}</textarea>
        <input type="submit" value="Save">
    </form>"#,
            href = encode_double_quoted_attribute(&page.title.url_encoded()),
            body = encode_text(&page.body_text()),
        );
        self.layout(&format!("Editing {}", page.title), &content)
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, view: View, data: ViewData<'_>) -> Result<String, RenderError> {
        match (view, data) {
            (View::Index, ViewData::Pages(pages)) => Ok(self.index(pages)),
            (View::Create, ViewData::None) => Ok(self.create()),
            (View::View, ViewData::Page(page)) => Ok(self.view(page)),
            (View::Edit, ViewData::Page(page)) => Ok(self.edit(page)),
            (view, data) => Err(RenderError::DataMismatch {
                view,
                data: data.kind(),
            }),
        }
    }
}
