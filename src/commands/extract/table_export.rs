use super::*;

const IDENTITY_COLUMNS: &[&str] = &["number", "literalName", "pages", "localities"];

pub(super) fn table_columns(
    records: &BTreeMap<u32, NotaryRecord>,
    vocabulary: &Vocabulary,
) -> Vec<String> {
    let mut labels = records
        .values()
        .flat_map(|record| record.fields.keys())
        .collect::<BTreeSet<&String>>()
        .into_iter()
        .collect::<Vec<&String>>();
    labels.sort_by_key(|label| vocabulary.canonical_index(label).unwrap_or(usize::MAX));

    IDENTITY_COLUMNS
        .iter()
        .map(|column| column.to_string())
        .chain(labels.into_iter().cloned())
        .chain(DERIVED_KEYS.iter().map(|key| key.to_string()))
        .collect()
}

pub(super) fn table_row(record: &NotaryRecord, columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .map(|column| match column.as_str() {
            "number" => record.number.to_string(),
            "literalName" => record.literal_name.clone(),
            "pages" => record.pages.join("; "),
            "localities" => record.localities.join("; "),
            key if DERIVED_KEYS.contains(&key) => record.derived.cell(key).unwrap_or_default(),
            label => record.fields.get(label).cloned().unwrap_or_default(),
        })
        .collect()
}

pub(super) fn write_csv(
    path: &Path,
    records: &BTreeMap<u32, NotaryRecord>,
    vocabulary: &Vocabulary,
) -> Result<()> {
    ensure_parent_directory(path)?;

    let file = fs::File::create(path)
        .with_context(|| format!("failed to create csv file: {}", path.display()))?;
    let columns = write_csv_rows(file, records, vocabulary)
        .with_context(|| format!("failed to write csv file: {}", path.display()))?;

    info!(path = %path.display(), rows = records.len(), columns, "wrote csv");
    Ok(())
}

pub(super) fn write_csv_rows<W: Write>(
    sink: W,
    records: &BTreeMap<u32, NotaryRecord>,
    vocabulary: &Vocabulary,
) -> Result<usize> {
    let columns = table_columns(records, vocabulary);
    let mut writer = csv::Writer::from_writer(sink);
    writer
        .write_record(&columns)
        .context("failed to write csv header")?;
    for record in records.values() {
        writer
            .write_record(table_row(record, &columns))
            .with_context(|| format!("failed to write notary {} to csv", record.number))?;
    }
    writer.flush().context("failed to flush csv writer")?;
    Ok(columns.len())
}

pub(super) fn write_json(path: &Path, records: &BTreeMap<u32, NotaryRecord>) -> Result<()> {
    let rows = records.values().collect::<Vec<&NotaryRecord>>();
    write_json_pretty(path, &rows)?;
    info!(path = %path.display(), rows = rows.len(), "wrote json");
    Ok(())
}
