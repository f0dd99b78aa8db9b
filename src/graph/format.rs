//! Format nodes, categories, domains and edge metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad family a format belongs to.
///
/// Categories are informational for callers and drive the "delivery
/// optimisation" check in [`crate::workflow::justify`]: a final hop that stays
/// inside the target's category is tuning for the destination rather than
/// wandering across media types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatCategory {
    Audio,
    Video,
    Image,
    Document,
    Archive,
    Presentation,
    Font,
}

impl fmt::Display for FormatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FormatCategory::Audio => "audio",
            FormatCategory::Video => "video",
            FormatCategory::Image => "image",
            FormatCategory::Document => "document",
            FormatCategory::Archive => "archive",
            FormatCategory::Presentation => "presentation",
            FormatCategory::Font => "font",
        };
        f.write_str(s)
    }
}

/// A named subset of formats a planner instance is allowed to route between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Everyday audio, video, image, document, archive and font formats. (default)
    #[default]
    General,
    /// E-book formats plus the document formats e-books are built from.
    Ebook,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::General => f.write_str("general"),
            Domain::Ebook => f.write_str("e-book"),
        }
    }
}

/// A declared format in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatNode {
    /// Lowercase extension token, e.g. `"pdf"`.
    pub format: String,
    pub category: FormatCategory,
    /// Domains this format is routable in. Never empty.
    pub domains: Vec<Domain>,
    /// Hub formats bridge otherwise-disconnected formats (PDF, PNG, WAV, …).
    #[serde(default)]
    pub hub: bool,
}

impl FormatNode {
    pub fn in_domain(&self, domain: Domain) -> bool {
        self.domains.contains(&domain)
    }
}

/// Optional metadata attached to a direct conversion edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeMeta {
    /// `true` when the hop preserves every bit of the source's information.
    #[serde(default)]
    pub lossless: bool,
    /// Base fidelity score (0–100) for this single hop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    /// Human-readable description of the hop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_domain_membership() {
        let pdf = FormatNode {
            format: "pdf".into(),
            category: FormatCategory::Document,
            domains: vec![Domain::General, Domain::Ebook],
            hub: true,
        };
        assert!(pdf.in_domain(Domain::General));
        assert!(pdf.in_domain(Domain::Ebook));

        let mobi = FormatNode {
            format: "mobi".into(),
            category: FormatCategory::Document,
            domains: vec![Domain::Ebook],
            hub: false,
        };
        assert!(!mobi.in_domain(Domain::General));
    }

    #[test]
    fn domain_serde_is_snake_case() {
        assert_eq!(serde_json::to_string(&Domain::Ebook).unwrap(), "\"ebook\"");
        let d: Domain = serde_json::from_str("\"general\"").unwrap();
        assert_eq!(d, Domain::General);
    }
}
