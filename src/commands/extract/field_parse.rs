use super::*;

/// Undo the column line-wrapping of one chunk.
///
/// A line opens a new field when the text before its first `:` is a known
/// label; any other line continues the previous field. The first line and
/// whatever continues it form the name block, which is not returned.
pub(super) fn reassemble_chunk(lines: &[String], vocabulary: &Vocabulary) -> Vec<String> {
    let mut logical = Vec::<String>::new();
    let mut current: Option<String> = None;

    for line in lines.iter().skip(1) {
        if opens_field(line, vocabulary) {
            if let Some(previous) = current.take() {
                logical.push(previous.trim().to_string());
            }
            current = Some(line.clone());
            continue;
        }

        match current.as_mut() {
            Some(value) => {
                value.push(' ');
                value.push_str(line);
            }
            None => debug!(line = %line, "continuation of name line"),
        }
    }

    if let Some(last) = current {
        logical.push(last.trim().to_string());
    }

    logical
}

fn opens_field(line: &str, vocabulary: &Vocabulary) -> bool {
    line.split_once(':')
        .map(|(head, _)| vocabulary.is_field_label(head))
        .unwrap_or(false)
}

/// Labels are tried longest first, so `aanstelling` never captures an
/// `aanstelling voor een ambachtsheerlijkheid` line.
pub(super) fn match_field<'a>(line: &'a str, labels: &'a [String]) -> Option<(&'a str, &'a str)> {
    labels.iter().find_map(|label| {
        let rest = line.strip_prefix(label.as_str())?;
        let value = match rest.strip_prefix(": ") {
            Some(value) => value,
            None => rest.strip_prefix(':')?.trim_start(),
        };
        Some((label.as_str(), value.trim_end()))
    })
}

pub(super) fn extract_fields(
    record: &mut NotaryRecord,
    logical_lines: &[String],
    parser: &RepertoriumParser,
) -> usize {
    let mut extracted = 0usize;
    for line in logical_lines {
        let Some((label, value)) = match_field(line, &parser.labels_by_priority) else {
            debug!(number = record.number, line = %line, "line has no recognized label");
            continue;
        };
        if let Some(previous) = record.fields.insert(label.to_string(), value.to_string()) {
            debug!(
                number = record.number,
                label,
                previous = %previous,
                "label repeated within chunk; keeping the later value"
            );
        }
        extracted += 1;
    }
    extracted
}

pub(super) fn chunk_identity(chunk: &Chunk, parser: &RepertoriumParser) -> Result<u32> {
    let position = u32::try_from(chunk.position).context("chunk position exceeds u32")?;
    let header = chunk
        .lines
        .first()
        .and_then(|line| parser.entity_header(line));

    match header {
        Some((number, _)) if number != position => Err(PipelineError::ChunkMisaligned {
            position: chunk.position,
            header_number: number,
        }
        .into()),
        Some((number, _)) => Ok(number),
        None => {
            debug!(position = chunk.position, "chunk has no numbered header; using its position");
            Ok(position)
        }
    }
}
