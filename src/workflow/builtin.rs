//! Workflow templates shipped with the crate.
//!
//! Each route passes through a lossless or archival intermediate before the
//! delivery encode. Thresholds use binary megabytes.

use super::{Trigger, WorkflowTemplate};

const MIB: u64 = 1024 * 1024;

fn route(formats: &[&str]) -> Vec<String> {
    formats.iter().map(|f| (*f).to_string()).collect()
}

fn benefits(items: &[&str]) -> Vec<String> {
    items.iter().map(|b| (*b).to_string()).collect()
}

/// Built-in templates, in declaration order.
pub fn templates() -> Vec<WorkflowTemplate> {
    vec![
        WorkflowTemplate {
            name: "audio_mastering".into(),
            priority: 10,
            trigger: Trigger {
                source: "wav".into(),
                target: "mp3".into(),
                min_file_size_bytes: 50 * MIB,
            },
            route: route(&["wav", "flac", "alac", "mp3"]),
            base_quality: 95,
            step_penalty: 8,
            floor_quality: 60,
            step_time_secs: 8,
            justification: "Large masters are archived losslessly before the delivery encode, \
                            so the final MP3 is cut from a verified lossless source"
                .into(),
            technical_benefits: benefits(&[
                "FLAC stage verifies the PCM stream with embedded checksums",
                "ALAC copy keeps a lossless master for Apple ecosystem delivery",
                "MP3 encoded from a lossless master avoids generational loss",
            ]),
        },
        WorkflowTemplate {
            name: "video_mastering".into(),
            priority: 10,
            trigger: Trigger {
                source: "avi".into(),
                target: "mp4".into(),
                min_file_size_bytes: 500 * MIB,
            },
            route: route(&["avi", "mkv", "mov", "mp4"]),
            base_quality: 95,
            step_penalty: 8,
            floor_quality: 60,
            step_time_secs: 20,
            justification: "Large legacy captures are remuxed into an editing container \
                            before the streaming encode"
                .into(),
            technical_benefits: benefits(&[
                "MKV remux preserves every audio and subtitle track",
                "MOV intermediate is edit-friendly for colour and audio fixes",
                "MP4 delivery encode starts from a clean intra-frame source",
            ]),
        },
        WorkflowTemplate {
            name: "print_preparation".into(),
            priority: 5,
            trigger: Trigger {
                source: "heic".into(),
                target: "pdf".into(),
                min_file_size_bytes: 20 * MIB,
            },
            route: route(&["heic", "png", "tiff", "pdf"]),
            base_quality: 95,
            step_penalty: 8,
            floor_quality: 60,
            step_time_secs: 6,
            justification: "High-resolution photos are flattened to a lossless raster and \
                            staged as TIFF, the format print shops expect inside a PDF"
                .into(),
            technical_benefits: benefits(&[
                "PNG decode avoids HEIC re-compression artefacts",
                "TIFF stage carries full resolution and colour depth",
                "PDF wraps a print-ready raster without further loss",
            ]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_has_three_steps_and_benefits() {
        for t in templates() {
            assert_eq!(t.steps(), 3, "{}", t.name);
            assert!(!t.technical_benefits.is_empty(), "{}", t.name);
            assert!(!t.justification.is_empty(), "{}", t.name);
        }
    }

    #[test]
    fn names_are_unique() {
        let names: std::collections::HashSet<String> =
            templates().into_iter().map(|t| t.name).collect();
        assert_eq!(names.len(), templates().len());
    }
}
