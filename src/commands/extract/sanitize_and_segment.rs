use super::*;

pub(super) fn sanitize_lines(lines: &[String], parser: &RepertoriumParser) -> Vec<String> {
    lines
        .iter()
        .filter(|line| !parser.is_page_marker_line(line))
        .filter(|line| !parser.vocabulary.is_locality(line))
        .filter(|line| !parser.is_back_reference_line(line))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Chunk {
    pub(super) position: usize,
    pub(super) lines: Vec<String>,
}

#[derive(Debug, Default)]
pub(super) struct Segmentation {
    pub(super) chunks: Vec<Chunk>,
    pub(super) dropped_trailing_lines: usize,
}

/// Split sanitized lines into chunks at blank lines.
///
/// Only a blank line closes a chunk. Unless `flush_trailing` is set, lines
/// after the last blank line are dropped.
pub(super) fn segment_chunks(lines: &[String], flush_trailing: bool) -> Segmentation {
    let mut segmentation = Segmentation::default();
    let mut current = Vec::<String>::new();

    for line in lines {
        if line.trim().is_empty() {
            if !current.is_empty() {
                let position = segmentation.chunks.len() + 1;
                segmentation.chunks.push(Chunk {
                    position,
                    lines: std::mem::take(&mut current),
                });
            }
            continue;
        }
        current.push(line.clone());
    }

    if !current.is_empty() {
        if flush_trailing {
            let position = segmentation.chunks.len() + 1;
            segmentation.chunks.push(Chunk {
                position,
                lines: current,
            });
        } else {
            warn!(
                lines = current.len(),
                first_line = %current[0],
                "dropping unterminated trailing chunk; the transcription lacks a final blank line"
            );
            segmentation.dropped_trailing_lines = current.len();
        }
    }

    segmentation
}
