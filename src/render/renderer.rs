//! HTML and JSON renderers.

use std::fmt::Write;

use thiserror::Error;

use crate::content::{ContentError, Item};
use crate::render::ViewModel;
use crate::route::Route;

/// Error type for rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read item content: {0}")]
    Content(#[from] ContentError),

    #[error("failed to serialize view model: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Turns a resolved item into response bytes.
pub trait ItemRenderer: Send + Sync {
    fn content_type(&self) -> &'static str;

    /// Render `item`; theme assets are linked below `theme_route`.
    fn render(&self, item: &Item, theme_route: &Route) -> Result<Vec<u8>, RenderError>;
}

/// Minimal HTML page.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl ItemRenderer for HtmlRenderer {
    fn content_type(&self) -> &'static str {
        "text/html; charset=utf-8"
    }

    fn render(&self, item: &Item, theme_route: &Route) -> Result<Vec<u8>, RenderError> {
        let model = ViewModel::from_item(item, theme_route)?;
        Ok(render_html(&model).into_bytes())
    }
}

/// The view model as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl ItemRenderer for JsonRenderer {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn render(&self, item: &Item, theme_route: &Route) -> Result<Vec<u8>, RenderError> {
        let model = ViewModel::from_item(item, theme_route)?;
        Ok(serde_json::to_vec_pretty(&model)?)
    }
}

/// Pick a renderer from an `Accept` header value.
pub fn renderer_for(accept: Option<&str>) -> &'static dyn ItemRenderer {
    static HTML: HtmlRenderer = HtmlRenderer;
    static JSON: JsonRenderer = JsonRenderer;

    let wants_json = accept.is_some_and(|a| {
        let a = a.to_ascii_lowercase();
        a.contains("application/json") && !a.contains("text/html")
    });
    if wants_json {
        &JSON
    } else {
        &HTML
    }
}

fn render_html(model: &ViewModel) -> String {
    let mut out = String::new();
    let title = escape(&model.title);

    // Writing to a String cannot fail.
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <link rel=\"stylesheet\" href=\"{}\">\n</head>\n<body class=\"{}\">\n",
        escape(&model.stylesheet_url),
        model.item_type
    );
    if let Some(parent) = &model.parent {
        let _ = writeln!(out, "<nav><a href=\"{}\">up</a></nav>", escape(&parent.url));
    }
    let _ = writeln!(out, "<h1>{title}</h1>");
    let _ = writeln!(out, "<pre class=\"content\">{}</pre>", escape(&model.content));

    if !model.children.is_empty() {
        out.push_str("<ul class=\"children\">\n");
        for child in &model.children {
            let _ = writeln!(
                out,
                "<li><a href=\"{}\">{}</a></li>",
                escape(&child.url),
                escape(&child.title)
            );
        }
        out.push_str("</ul>\n");
    }

    if !model.files.is_empty() {
        out.push_str("<ul class=\"files\">\n");
        for file in &model.files {
            let _ = writeln!(
                out,
                "<li><a href=\"{}\">{}</a></li>",
                escape(&file.url),
                escape(&file.title)
            );
        }
        out.push_str("</ul>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
