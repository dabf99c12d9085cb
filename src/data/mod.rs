//! Core data models for the testimonials service
//!
//! This module contains the display-ready testimonial records served to the
//! portfolio frontend, plus the spreadsheet row shape they are built from.

pub mod row;
pub mod sheets;

pub use row::{testimonials_from_rows, RawRow};
pub use sheets::{FetchError, SheetsClient};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Base URL of the avatar generator used for every author
const AVATAR_BASE_URL: &str = "https://ui-avatars.com/api/";

/// Name used for the avatar when the author has none
const AVATAR_FALLBACK_NAME: &str = "User";

/// Characters left unescaped by JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A display-ready testimonial built from one form response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    /// What the author said; never empty
    pub quote: String,
    /// Who said it
    pub author: Author,
}

/// Attribution shown under a testimonial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Trimmed full name, or "Anonymous"
    pub name: String,
    /// "<position> at <company>", either part alone, or "Client"
    pub description: String,
    /// Generated avatar image
    pub avatar: Avatar,
}

/// Image source pair for an author's avatar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    /// Image URL at 1x density
    pub src: String,
    /// Same URL declared for 2x density
    pub srcset: String,
}

impl Avatar {
    /// Generates the avatar for an author name.
    ///
    /// The URL depends only on the name, so the same author always gets the
    /// same image URL.
    pub fn for_name(name: &str) -> Self {
        let name = match name.trim() {
            "" => AVATAR_FALLBACK_NAME,
            trimmed => trimmed,
        };
        let encoded = utf8_percent_encode(name, URI_COMPONENT);
        let src = format!("{AVATAR_BASE_URL}?name={encoded}&background=random&size=128");

        Self {
            srcset: format!("{src} 2x"),
            src,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_url_encodes_name() {
        let avatar = Avatar::for_name("Jane Doe");
        assert_eq!(
            avatar.src,
            "https://ui-avatars.com/api/?name=Jane%20Doe&background=random&size=128"
        );
        assert_eq!(avatar.srcset, format!("{} 2x", avatar.src));
    }

    #[test]
    fn test_avatar_matches_uri_component_escaping() {
        let avatar = Avatar::for_name("O'Brien (Jr.) ~ José*!");
        assert!(avatar
            .src
            .contains("name=O'Brien%20(Jr.)%20~%20Jos%C3%A9*!&"));
    }

    #[test]
    fn test_avatar_escapes_reserved_characters() {
        let avatar = Avatar::for_name("A&B=C");
        assert!(avatar.src.contains("name=A%26B%3DC&"));
    }

    #[test]
    fn test_avatar_is_deterministic() {
        assert_eq!(Avatar::for_name("Sam"), Avatar::for_name("  Sam "));
    }

    #[test]
    fn test_avatar_blank_name_uses_fallback() {
        let avatar = Avatar::for_name("   ");
        assert!(avatar.src.contains("name=User&"));
    }

    #[test]
    fn test_testimonial_serializes_nested_author() {
        let testimonial = Testimonial {
            quote: "Great to work with.".to_string(),
            author: Author {
                name: "Jane Doe".to_string(),
                description: "Engineer at Acme".to_string(),
                avatar: Avatar::for_name("Jane Doe"),
            },
        };

        let json = serde_json::to_value(&testimonial).expect("Failed to serialize Testimonial");

        assert_eq!(json["quote"], "Great to work with.");
        assert_eq!(json["author"]["name"], "Jane Doe");
        assert_eq!(json["author"]["description"], "Engineer at Acme");
        assert!(json["author"]["avatar"]["src"].is_string());
        assert!(json["author"]["avatar"]["srcset"]
            .as_str()
            .unwrap()
            .ends_with(" 2x"));
    }
}
