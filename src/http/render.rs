//! Error page rendering.
//!
//! The router only needs `render(view, context) -> body`; real template
//! engines plug in behind `TemplateRenderer`. `PlainRenderer` is the built-in
//! fallback and produces a minimal HTML page.

use serde_json::Value;

pub const ERROR_VIEW: &str = "error.html";
pub const LOGIN_VIEW: &str = "login.html";

pub trait TemplateRenderer: Send + Sync {
    fn render(&self, view: &str, context: &Value) -> String;
}

/// Minimal HTML renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn field<'a>(context: &'a Value, key: &str) -> &'a str {
    context.get(key).and_then(Value::as_str).unwrap_or_default()
}

impl TemplateRenderer for PlainRenderer {
    fn render(&self, view: &str, context: &Value) -> String {
        let title = match context.get("status").and_then(Value::as_u64) {
            Some(status) => format!("{status} {}", field(context, "title")),
            None => field(context, "title").to_string(),
        };
        let mut body = format!("<h1>{}</h1>", escape_html(title.trim()));

        let message = field(context, "message");
        if !message.is_empty() {
            body.push_str(&format!("<p>{}</p>", escape_html(message)));
        }
        let route = field(context, "route");
        if view == LOGIN_VIEW && !route.is_empty() {
            body.push_str(&format!("<p>Requested: <code>{}</code></p>", escape_html(route)));
        }

        format!("<!DOCTYPE html><html><head><title>{t}</title></head><body>{body}</body></html>", t = escape_html(title.trim()))
    }
}
