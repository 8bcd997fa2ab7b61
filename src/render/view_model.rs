//! Presentational view of an item.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::content::{ContentError, Item};
use crate::route::Route;

/// Stylesheet expected below the theme route.
const STYLESHEET: &str = "screen.css";

/// Link to a related item or file.
#[derive(Debug, Clone, Serialize)]
pub struct LinkModel {
    pub route: String,
    pub title: String,
    /// Percent-encoded absolute path that resolves back to `route`.
    pub url: String,
}

impl LinkModel {
    fn new(route: &Route, title: impl Into<String>) -> Self {
        Self {
            route: route.to_string(),
            title: title.into(),
            url: route.to_url_path(),
        }
    }
}

/// Fields consumed by templates and the JSON representation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub route: String,
    pub url: String,
    pub level: usize,
    pub parent: Option<LinkModel>,
    #[serde(rename = "type")]
    pub item_type: &'static str,
    pub title: String,
    pub content: String,
    pub children: Vec<LinkModel>,
    pub files: Vec<LinkModel>,
    pub stylesheet_url: String,
    pub creation_date: Option<u64>,
    pub last_modified_date: Option<u64>,
}

impl ViewModel {
    /// Build the view model, reading the item's content.
    ///
    /// `theme_route` locates the stylesheet.
    pub fn from_item(item: &Item, theme_route: &Route) -> Result<Self, ContentError> {
        let content = String::from_utf8_lossy(&item.data()?).into_owned();
        let metadata = item.metadata();
        let route = item.route();

        Ok(Self {
            route: route.to_string(),
            url: route.to_url_path(),
            level: route.level(),
            parent: route.parent().map(|p| {
                let title = p.last_segment().unwrap_or_default().to_string();
                LinkModel::new(&p, title)
            }),
            item_type: item.item_type().as_str(),
            title: item.title().to_string(),
            content,
            children: item
                .children()
                .iter()
                .map(|child| LinkModel::new(child.route(), child.title()))
                .collect(),
            files: item
                .files()
                .iter()
                .map(|f| LinkModel::new(f.route(), f.route().last_segment().unwrap_or_default()))
                .collect(),
            stylesheet_url: stylesheet_url(theme_route),
            creation_date: metadata.created.and_then(unix_secs),
            last_modified_date: metadata.modified.and_then(unix_secs),
        })
    }
}

fn stylesheet_url(theme_route: &Route) -> String {
    let base = theme_route.to_url_path();
    format!("{}/{STYLESHEET}", base.trim_end_matches('/'))
}

fn unix_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}
