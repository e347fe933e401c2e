//! Campaign message rendering.
//!
//! Message templates only understand three literal placeholders. Anything
//! else, including other `{{ }}` sequences, is passed through untouched.

use crate::db::models::Contact;

/// Replace `{{name}}`, `{{phone}}` and `{{tags}}` with the contact's values.
pub fn render_message(template: &str, contact: &Contact) -> String {
    template
        .replace("{{name}}", &contact.name)
        .replace("{{phone}}", &contact.phone)
        .replace("{{tags}}", &contact.tags)
}

/// Public unsubscribe link for a phone number.
pub fn opt_out_link(public_base_url: &str, phone: &str) -> String {
    format!("{}/u/{}", public_base_url.trim_end_matches('/'), phone)
}

/// Final SMS body: rendered text followed by the opt-out line.
pub fn compose_body(template: &str, contact: &Contact, public_base_url: &str) -> String {
    let text = render_message(template, contact);
    format!(
        "{}\nOpt out: {}",
        text.trim(),
        opt_out_link(public_base_url, &contact.phone)
    )
}
