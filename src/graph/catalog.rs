//! Built-in format catalog.
//!
//! The default graph shipped with the crate: roughly fifty formats across
//! seven categories, the direct conversions between them, and base quality
//! figures for the hops whose fidelity differs noticeably from the planner
//! default.
//!
//! E-book formats (epub, mobi, azw3, fb2) live only in [`Domain::Ebook`];
//! the document formats e-books are built from (pdf, txt, html, md, docx, rtf)
//! belong to both domains.

use crate::graph::format::{Domain, EdgeMeta, FormatCategory, FormatNode};
use crate::graph::spec::{EdgeSpec, GraphSpec};

use crate::graph::format::Domain::{Ebook, General};
use crate::graph::format::FormatCategory::*;

/// (format, category, domains, hub)
const NODES: &[(&str, FormatCategory, &[Domain], bool)] = &[
    // ── Audio ────────────────────────────────────────────────────────────
    ("mp3", Audio, &[General], false),
    ("wav", Audio, &[General], true),
    ("flac", Audio, &[General], true),
    ("alac", Audio, &[General], false),
    ("aiff", Audio, &[General], false),
    ("aac", Audio, &[General], false),
    ("ogg", Audio, &[General], false),
    ("m4a", Audio, &[General], false),
    ("opus", Audio, &[General], false),
    ("wma", Audio, &[General], false),
    // ── Video ────────────────────────────────────────────────────────────
    ("mp4", Video, &[General], true),
    ("mov", Video, &[General], false),
    ("mkv", Video, &[General], true),
    ("avi", Video, &[General], false),
    ("webm", Video, &[General], false),
    ("wmv", Video, &[General], false),
    ("flv", Video, &[General], false),
    // ── Image ────────────────────────────────────────────────────────────
    ("jpg", Image, &[General], false),
    ("png", Image, &[General], true),
    ("gif", Image, &[General], false),
    ("bmp", Image, &[General], false),
    ("webp", Image, &[General], false),
    ("tiff", Image, &[General], true),
    ("svg", Image, &[General], false),
    ("heic", Image, &[General], false),
    ("ico", Image, &[General], false),
    // ── Document ─────────────────────────────────────────────────────────
    ("pdf", Document, &[General, Ebook], true),
    ("docx", Document, &[General, Ebook], true),
    ("doc", Document, &[General], false),
    ("odt", Document, &[General], false),
    ("rtf", Document, &[General, Ebook], false),
    ("txt", Document, &[General, Ebook], false),
    ("html", Document, &[General, Ebook], true),
    ("md", Document, &[General, Ebook], false),
    ("xlsx", Document, &[General], false),
    ("csv", Document, &[General], false),
    ("ods", Document, &[General], false),
    // ── E-book (document category, e-book domain only) ───────────────────
    ("epub", Document, &[Ebook], true),
    ("mobi", Document, &[Ebook], false),
    ("azw3", Document, &[Ebook], false),
    ("fb2", Document, &[Ebook], false),
    // ── Presentation ─────────────────────────────────────────────────────
    ("pptx", Presentation, &[General], false),
    ("ppt", Presentation, &[General], false),
    ("odp", Presentation, &[General], false),
    // ── Archive ──────────────────────────────────────────────────────────
    ("zip", Archive, &[General], true),
    ("tar", Archive, &[General], false),
    ("gz", Archive, &[General], false),
    ("7z", Archive, &[General], false),
    ("rar", Archive, &[General], false),
    // ── Font ─────────────────────────────────────────────────────────────
    ("ttf", Font, &[General], true),
    ("otf", Font, &[General], false),
    ("woff", Font, &[General], false),
    ("woff2", Font, &[General], false),
];

/// Adjacency: source → ordered direct targets.
const ADJACENCY: &[(&str, &[&str])] = &[
    // Audio
    ("wav", &["flac", "mp3", "aiff", "aac", "ogg", "m4a", "opus"]),
    ("flac", &["wav", "alac", "mp3", "aac", "ogg", "m4a", "opus"]),
    ("alac", &["flac", "m4a", "mp3", "aiff"]),
    ("aiff", &["wav", "flac", "mp3", "alac"]),
    ("mp3", &["wav", "flac", "aac", "ogg", "m4a", "opus"]),
    ("aac", &["mp3", "wav", "m4a", "ogg"]),
    ("ogg", &["mp3", "wav", "flac", "opus"]),
    ("m4a", &["mp3", "aac", "wav", "flac"]),
    ("opus", &["ogg", "mp3", "wav"]),
    ("wma", &["mp3", "wav"]),
    // Video
    ("mp4", &["mov", "mkv", "webm", "avi", "gif", "mp3"]),
    ("mov", &["mp4", "mkv", "avi"]),
    ("mkv", &["mp4", "webm", "mov", "avi"]),
    ("avi", &["mp4", "mkv"]),
    ("webm", &["mp4", "mkv", "gif"]),
    ("wmv", &["mp4", "avi"]),
    ("flv", &["mp4"]),
    // Image
    ("jpg", &["png", "webp", "pdf", "gif", "bmp", "tiff", "ico"]),
    ("png", &["jpg", "webp", "pdf", "gif", "bmp", "tiff", "ico"]),
    ("gif", &["png", "jpg", "mp4", "webp"]),
    ("bmp", &["png", "jpg"]),
    ("webp", &["png", "jpg", "gif"]),
    ("tiff", &["png", "jpg", "pdf"]),
    ("svg", &["png", "pdf"]),
    ("heic", &["jpg", "png"]),
    ("ico", &["png"]),
    // Document
    ("pdf", &["docx", "txt", "html", "md", "png", "jpg", "epub"]),
    ("docx", &["pdf", "odt", "txt", "html", "rtf", "md", "epub"]),
    ("doc", &["docx", "pdf"]),
    ("odt", &["docx", "pdf"]),
    ("rtf", &["docx", "pdf", "txt"]),
    ("txt", &["pdf", "docx", "html", "md", "epub"]),
    ("html", &["pdf", "md", "txt", "docx", "epub"]),
    ("md", &["html", "pdf", "docx", "txt", "epub"]),
    ("xlsx", &["csv", "pdf", "ods"]),
    ("csv", &["xlsx", "ods"]),
    ("ods", &["xlsx", "csv", "pdf"]),
    // E-book
    ("epub", &["mobi", "azw3", "fb2", "pdf", "txt", "html"]),
    ("mobi", &["epub", "azw3", "pdf"]),
    ("azw3", &["epub", "mobi", "pdf"]),
    ("fb2", &["epub", "pdf"]),
    // Presentation
    ("pptx", &["pdf", "odp", "png"]),
    ("ppt", &["pptx", "pdf"]),
    ("odp", &["pptx", "pdf"]),
    // Archive
    ("zip", &["tar", "7z"]),
    ("tar", &["zip", "gz"]),
    ("gz", &["tar"]),
    ("7z", &["zip"]),
    ("rar", &["zip"]),
    // Font
    ("ttf", &["otf", "woff", "woff2"]),
    ("otf", &["ttf", "woff", "woff2"]),
    ("woff", &["ttf", "woff2"]),
    ("woff2", &["ttf", "woff"]),
];

/// (from, to, lossless, quality, description)
const EDGE_META: &[(&str, &str, bool, u8, &str)] = &[
    ("wav", "flac", true, 100, "Lossless compression of PCM audio"),
    ("flac", "wav", true, 100, "Lossless decode to PCM"),
    ("flac", "alac", true, 100, "Lossless transcode between lossless codecs"),
    ("alac", "flac", true, 100, "Lossless transcode between lossless codecs"),
    ("wav", "aiff", true, 100, "PCM rewrap into AIFF container"),
    ("aiff", "wav", true, 100, "PCM rewrap into WAV container"),
    ("aiff", "flac", true, 100, "Lossless compression of PCM audio"),
    ("aiff", "alac", true, 100, "Lossless compression of PCM audio"),
    ("alac", "aiff", true, 100, "Lossless decode to PCM"),
    ("wav", "mp3", false, 85, "Perceptual MP3 encode"),
    ("flac", "mp3", false, 88, "Perceptual MP3 encode from lossless master"),
    ("alac", "mp3", false, 88, "Perceptual MP3 encode from lossless master"),
    ("mp3", "wav", false, 80, "Decode lossy MP3 to PCM"),
    ("mp3", "aac", false, 75, "Lossy-to-lossy transcode"),
    ("mp3", "ogg", false, 75, "Lossy-to-lossy transcode"),
    ("mkv", "mp4", true, 98, "Remux streams into MP4 container"),
    ("mp4", "mkv", true, 98, "Remux streams into Matroska container"),
    ("avi", "mkv", true, 96, "Remux legacy AVI streams into Matroska"),
    ("mkv", "mov", false, 95, "Intermediate-codec transcode for editing"),
    ("mov", "mp4", false, 92, "H.264 delivery encode"),
    ("avi", "mp4", false, 85, "Re-encode legacy AVI for web delivery"),
    ("mp4", "gif", false, 65, "Palette-reduced animation"),
    ("jpg", "pdf", false, 95, "Embed image as a PDF page"),
    ("png", "pdf", true, 98, "Embed lossless image as a PDF page"),
    ("tiff", "pdf", true, 98, "Embed lossless raster as a PDF page"),
    ("jpg", "png", true, 95, "Lossless re-encode of decoded JPEG"),
    ("png", "jpg", false, 88, "Lossy JPEG encode"),
    ("png", "tiff", true, 100, "Lossless raster rewrap"),
    ("tiff", "png", true, 100, "Lossless raster rewrap"),
    ("heic", "png", true, 96, "Lossless decode of HEIC"),
    ("heic", "jpg", false, 88, "Lossy JPEG encode of HEIC"),
    ("pdf", "png", true, 90, "Rasterise PDF pages"),
    ("pdf", "jpg", false, 85, "Rasterise PDF pages to JPEG"),
    ("pdf", "docx", false, 80, "Reconstruct editable layout from PDF"),
    ("pdf", "txt", false, 75, "Extract plain text from PDF"),
    ("docx", "pdf", true, 97, "Render document to PDF"),
    ("txt", "pdf", true, 96, "Typeset plain text to PDF"),
    ("md", "html", true, 98, "Render Markdown to HTML"),
    ("html", "md", false, 85, "Simplify HTML to Markdown"),
    ("xlsx", "csv", false, 80, "Export first sheet values"),
    ("epub", "mobi", false, 90, "Kindle legacy format"),
    ("epub", "azw3", false, 93, "Kindle KF8 format"),
    ("epub", "pdf", false, 85, "Reflowable to fixed-layout"),
    ("pptx", "pdf", true, 96, "Render slides to PDF"),
    ("zip", "tar", true, 100, "Repack archive entries"),
    ("tar", "zip", true, 100, "Repack archive entries"),
    ("tar", "gz", true, 100, "Gzip-compress tarball"),
    ("gz", "tar", true, 100, "Decompress gzip stream"),
    ("zip", "7z", true, 100, "Repack archive entries"),
    ("7z", "zip", true, 100, "Repack archive entries"),
    ("rar", "zip", true, 100, "Repack archive entries"),
    ("ttf", "woff2", true, 100, "Brotli-compressed web font"),
    ("ttf", "otf", false, 95, "Outline conversion to CFF"),
];

/// Alternative spellings accepted in requests.
const ALIASES: &[(&str, &str)] = &[
    ("jpeg", "jpg"),
    ("jpe", "jpg"),
    ("tif", "tiff"),
    ("htm", "html"),
    ("markdown", "md"),
    ("text", "txt"),
    ("oga", "ogg"),
    ("aif", "aiff"),
    ("heif", "heic"),
    ("azw", "azw3"),
    ("7zip", "7z"),
];

/// Build the declarative definition of the built-in graph.
pub fn builtin_spec() -> GraphSpec {
    let nodes = NODES
        .iter()
        .map(|&(format, category, domains, hub)| FormatNode {
            format: format.to_string(),
            category,
            domains: domains.to_vec(),
            hub,
        })
        .collect();

    let edges = ADJACENCY
        .iter()
        .flat_map(|&(from, targets)| targets.iter().map(move |&to| edge(from, to)))
        .collect();

    let aliases = ALIASES
        .iter()
        .map(|&(alias, format)| (alias.to_string(), format.to_string()))
        .collect();

    GraphSpec {
        nodes,
        edges,
        aliases,
    }
}

fn edge(from: &str, to: &str) -> EdgeSpec {
    match EDGE_META.iter().find(|m| m.0 == from && m.1 == to) {
        Some(&(_, _, lossless, quality, description)) => EdgeSpec {
            from: from.to_string(),
            to: to.to_string(),
            meta: EdgeMeta {
                lossless,
                quality: Some(quality),
                description: Some(description.to_string()),
            },
        },
        None => EdgeSpec::plain(from, to),
    }
}
