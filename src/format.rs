//! Severity-aware rendering of service replies
//!
//! Suggestions appear from `MODERATE` upwards and crisis resources from
//! `HIGH` upwards. Empty lists never leave a dangling header.

use crate::dialogue::StructuredReply;
use std::fmt::Write;

const SUGGESTIONS_HEADER: &str = "Suggestions:";
const RESOURCES_HEADER: &str = "Important Resources:";

/// Render a reply into the text stored on the assistant turn
pub fn format_reply(reply: &StructuredReply) -> String {
    let mut text = String::with_capacity(reply.response.len() + 2);
    text.push_str(&reply.response);
    text.push_str("\n\n");

    if reply.severity.discloses_suggestions() && !reply.suggestions.is_empty() {
        text.push_str(SUGGESTIONS_HEADER);
        text.push('\n');
        for suggestion in &reply.suggestions {
            text.push_str(suggestion);
            text.push('\n');
        }
        text.push('\n');
    }

    if reply.severity.discloses_resources() && !reply.resources.is_empty() {
        text.push_str(RESOURCES_HEADER);
        text.push('\n');
        for resource in &reply.resources {
            // Writing into a String cannot fail
            let _ = writeln!(
                text,
                "{}: {} ({})",
                resource.name, resource.contact, resource.available
            );
        }
    }

    text
}
