//! HTML pages.
//!
//! Every value that comes from a user or a document is escaped with
//! [`escape_html`] before it is interpolated. The only exception is the
//! output of [`crate::render_markdown`], which is already HTML.

use std::fmt::Write;

use pulldown_cmark_escape::FmtWriter;

/// What every page shows besides its own content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageContext {
    /// Signed-in user, for the banner.
    pub user: Option<String>,
    /// One-shot status message.
    pub message: Option<String>,
}

impl PageContext {
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Escape `text` for element content and double-quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let _ = pulldown_cmark_escape::escape_html(FmtWriter(&mut out), text);
    out
}

/// Percent-encode `text` for use as a single URL path segment.
///
/// Everything outside the unreserved set is encoded, including `?`, `#`
/// and `%`, which are valid in document names.
pub fn encode_segment(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}

fn layout(ctx: &PageContext, title: &str, body: &str) -> String {
    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(page, "<title>{}</title>", escape_html(title));
    page.push_str("</head>\n<body>\n");

    if let Some(message) = &ctx.message {
        let _ = writeln!(page, "<p class=\"message\">{}</p>", escape_html(message));
    }

    page.push_str(body);

    page.push_str("<footer>\n");
    match &ctx.user {
        Some(user) => {
            let _ = writeln!(page, "<p class=\"user-status\">Signed in as {}.</p>", escape_html(user));
            page.push_str(
                "<form method=\"post\" action=\"/users/signout\">\
                 <button type=\"submit\">Sign Out</button></form>\n",
            );
        }
        None => page.push_str("<p class=\"user-status\"><a href=\"/users/signin\">Sign In</a></p>\n"),
    }
    page.push_str("</footer>\n</body>\n</html>\n");
    page
}

/// The document list.
pub fn index(ctx: &PageContext, names: &[String]) -> String {
    let mut body = String::from("<ul>\n");
    for name in names {
        let href = encode_segment(name);
        let label = escape_html(name);
        let _ = writeln!(
            body,
            "<li><a href=\"/{href}\">{label}</a> \
             <a href=\"/{href}/edit\">Edit</a> \
             <form class=\"inline\" method=\"post\" action=\"/{href}/delete\">\
             <button type=\"submit\">Delete</button></form></li>"
        );
    }
    body.push_str("</ul>\n<p><a href=\"/new\">New Document</a></p>\n");
    layout(ctx, "Folio", &body)
}

/// The new-document form. `filename` refills the input after a 422.
pub fn new_document(ctx: &PageContext, filename: &str) -> String {
    let body = format!(
        "<form method=\"post\" action=\"/create\">\n\
         <label for=\"new_filename\">Add a new document:</label>\n\
         <input name=\"new_filename\" id=\"new_filename\" value=\"{}\">\n\
         <input type=\"submit\" value=\"Create\">\n\
         </form>\n",
        escape_html(filename)
    );
    layout(ctx, "New Document", &body)
}

/// The edit form for `name`, prefilled with `content`.
pub fn edit_document(ctx: &PageContext, name: &str, content: &str) -> String {
    let body = format!(
        "<form method=\"post\" action=\"/{href}\">\n\
         <label for=\"content\">Edit content of {label}:</label>\n\
         <textarea name=\"content\" id=\"content\" rows=\"20\" cols=\"100\">{content}</textarea>\n\
         <button type=\"submit\">Save Changes</button>\n\
         </form>\n",
        href = encode_segment(name),
        label = escape_html(name),
        content = escape_html(content),
    );
    layout(ctx, &format!("Edit {name}"), &body)
}

/// The sign-in form. `username` refills the input after a failed attempt.
pub fn signin(ctx: &PageContext, username: &str) -> String {
    let body = format!(
        "<form method=\"post\" action=\"/users/signin\">\n\
         <label for=\"user_id\">Username</label>\n\
         <input name=\"user_id\" id=\"user_id\" value=\"{}\">\n\
         <label for=\"password\">Password</label>\n\
         <input type=\"password\" name=\"password\" id=\"password\">\n\
         <button type=\"submit\">Sign In</button>\n\
         </form>\n",
        escape_html(username)
    );
    layout(ctx, "Sign In", &body)
}

/// A markdown document, already rendered to HTML.
pub fn markdown_document(ctx: &PageContext, name: &str, rendered: &str) -> String {
    let body = format!("<article>\n{rendered}</article>\n");
    layout(ctx, name, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html("<a href=\"x\">&</a>"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }

    #[test]
    fn encodes_segments() {
        assert_eq!(encode_segment("about.md"), "about.md");
        assert_eq!(encode_segment("my notes.txt"), "my%20notes.txt");
        assert_eq!(encode_segment("a/b?c"), "a%2Fb%3Fc");
        assert_eq!(encode_segment("100%#1.txt"), "100%25%231.txt");
        assert_eq!(encode_segment("é"), "%C3%A9");
    }

    #[test]
    fn index_lists_names_and_links() {
        let html = index(&PageContext::default(), &["about.md".into(), "changes.txt".into()]);
        assert!(html.contains("<a href=\"/about.md\">about.md</a>"));
        assert!(html.contains("/changes.txt/edit"));
        assert!(html.contains("/changes.txt/delete"));
        assert!(html.contains("Sign In"));
    }

    #[test]
    fn banner_for_signed_in_user() {
        let ctx = PageContext {
            user: Some("admin".into()),
            message: Some("Welcome!".into()),
        };
        let html = index(&ctx, &[]);
        assert!(html.contains("Signed in as admin."));
        assert!(html.contains("Sign Out"));
        assert!(html.contains("Welcome!"));
    }

    #[test]
    fn names_are_escaped() {
        let html = index(&PageContext::default(), &["<b>.txt".into()]);
        assert!(html.contains("&lt;b&gt;.txt"));
        assert!(!html.contains("<b>.txt"));
    }

    #[test]
    fn forms_have_expected_controls() {
        let ctx = PageContext::default();
        assert!(new_document(&ctx, "").contains("<input type=\"submit\""));
        assert!(signin(&ctx, "").contains("<button type=\"submit\""));

        let edit = edit_document(&ctx, "changes.txt", "a < b");
        assert!(edit.contains("<textarea"));
        assert!(edit.contains("a &lt; b"));
        assert!(edit.contains("action=\"/changes.txt\""));
    }

    #[test]
    fn form_values_are_refilled() {
        let ctx = PageContext::default().with_message("Invalid credentials.");
        let html = signin(&ctx, "admin");
        assert!(html.contains("value=\"admin\""));
        assert!(html.contains("Invalid credentials."));
    }
}
