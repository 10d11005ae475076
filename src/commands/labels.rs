use anyhow::{Context, Result};

use crate::cli::LabelsArgs;
use crate::vocabulary::Vocabulary;

pub fn run(args: LabelsArgs) -> Result<()> {
    let vocabulary = Vocabulary::load_or_default(args.vocabulary_path.as_deref())?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&vocabulary.field_labels)
            .context("failed to serialize field labels")?;
        println!("{rendered}");
        return Ok(());
    }

    print!("{}", render_label_table(&vocabulary));
    Ok(())
}

/// One line per label; usage notes are indented below their label.
fn render_label_table(vocabulary: &Vocabulary) -> String {
    let mut out = String::new();
    for field in &vocabulary.field_labels {
        out.push_str(&field.label);
        out.push('\n');
        if !field.note.is_empty() {
            out.push_str("    ");
            out.push_str(&field.note);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::FieldLabel;

    #[test]
    fn label_table_indents_notes_under_their_label() {
        let vocabulary = Vocabulary {
            localities: Vec::new(),
            field_labels: vec![
                FieldLabel {
                    label: "geboren".to_string(),
                    note: String::new(),
                },
                FieldLabel {
                    label: "nevenfuncties".to_string(),
                    note: "De andere functies tijdens zijn leven.".to_string(),
                },
            ],
        };

        assert_eq!(
            render_label_table(&vocabulary),
            "geboren\nnevenfuncties\n    De andere functies tijdens zijn leven.\n"
        );
    }
}
