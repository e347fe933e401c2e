//! HTML views rendered with minijinja.
//!
//! Templates are compiled into the binary. Names end in `.html`, which turns
//! on minijinja's HTML auto-escaping for every value.

use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;

use crate::error::AppResult;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("login.html", include_str!("../../templates/login.html")),
    ("dashboard.html", include_str!("../../templates/dashboard.html")),
    ("contacts.html", include_str!("../../templates/contacts.html")),
    ("campaigns.html", include_str!("../../templates/campaigns.html")),
    (
        "campaign_stats.html",
        include_str!("../../templates/campaign_stats.html"),
    ),
    ("unsubscribed.html", include_str!("../../templates/unsubscribed.html")),
];

/// Compiled page templates.
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    /// Compile every page template.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Render a page with the given context.
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> AppResult<Html<String>> {
        let html = self.env.get_template(name)?.render(ctx)?;
        Ok(Html(html))
    }
}
