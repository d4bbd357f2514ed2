//! Token listing
//!
//! One line per token: `<line>:<column>  <kind>  <text>`, positions 1-based, text quoted
//! with Rust escapes so newlines and tabs stay visible.

use crate::renpy::token::TokenStream;

/// List every token of `stream`, or only the visible ones when `include_trivia` is false.
pub fn to_token_listing(stream: &TokenStream, source: &str, include_trivia: bool) -> String {
    let mut output = String::new();
    for token in stream.flatten() {
        if !include_trivia && token.kind.is_trivia() {
            continue;
        }
        let mut kind = token.kind.name().to_string();
        if let Some(wrapped) = token.wrapped {
            kind = format!("{}({})", kind, wrapped.name());
        }
        output.push_str(&format!(
            "{:<8}{:<20}{:?}\n",
            token.start.to_display_string(),
            kind,
            token.value(source)
        ));
    }
    output
}
