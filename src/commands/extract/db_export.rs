use super::*;

fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}

fn reset_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            DROP TABLE IF EXISTS notary_derived;
            DROP TABLE IF EXISTS notary_fields;
            DROP TABLE IF EXISTS notaries;

            CREATE TABLE IF NOT EXISTS metadata (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );

            CREATE TABLE notaries (
              number INTEGER PRIMARY KEY,
              literal_name TEXT NOT NULL,
              pages TEXT NOT NULL,
              localities TEXT NOT NULL
            );

            CREATE TABLE notary_fields (
              number INTEGER NOT NULL,
              label TEXT NOT NULL,
              raw_value TEXT NOT NULL,
              PRIMARY KEY(number, label),
              FOREIGN KEY(number) REFERENCES notaries(number)
            );

            CREATE TABLE notary_derived (
              number INTEGER NOT NULL,
              key TEXT NOT NULL,
              value TEXT NOT NULL,
              value_json TEXT,
              PRIMARY KEY(number, key),
              FOREIGN KEY(number) REFERENCES notaries(number)
            );
            ",
        )
        .context("failed to create export schema")
}

fn upsert_metadata(connection: &Connection, key: &str, value: &str) -> Result<()> {
    connection
        .execute(
            "INSERT INTO metadata(key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .with_context(|| format!("failed to write metadata key {key}"))?;
    Ok(())
}

pub(super) fn write_sqlite(
    db_path: &Path,
    records: &BTreeMap<u32, NotaryRecord>,
    run_id: &str,
    input_sha256: &str,
) -> Result<()> {
    ensure_parent_directory(db_path)?;

    let mut connection = Connection::open(db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    configure_connection(&connection)?;
    write_records(&mut connection, records)?;

    upsert_metadata(&connection, "db_schema_version", DB_SCHEMA_VERSION)?;
    upsert_metadata(&connection, "run_id", run_id)?;
    upsert_metadata(&connection, "input_sha256", input_sha256)?;

    info!(path = %db_path.display(), notaries = records.len(), "wrote sqlite export");
    Ok(())
}

pub(super) fn write_records(
    connection: &mut Connection,
    records: &BTreeMap<u32, NotaryRecord>,
) -> Result<()> {
    reset_schema(connection)?;

    let tx = connection
        .transaction()
        .context("failed to start export transaction")?;
    {
        let mut notary_statement = tx.prepare(
            "INSERT INTO notaries(number, literal_name, pages, localities) VALUES (?1, ?2, ?3, ?4)",
        )?;
        let mut field_statement = tx.prepare(
            "INSERT INTO notary_fields(number, label, raw_value) VALUES (?1, ?2, ?3)",
        )?;
        let mut derived_statement = tx.prepare(
            "INSERT INTO notary_derived(number, key, value, value_json) VALUES (?1, ?2, ?3, ?4)",
        )?;

        for record in records.values() {
            notary_statement
                .execute(params![
                    record.number,
                    record.literal_name,
                    serde_json::to_string(&record.pages)?,
                    serde_json::to_string(&record.localities)?,
                ])
                .with_context(|| format!("failed to insert notary {}", record.number))?;

            for (label, raw_value) in &record.fields {
                field_statement
                    .execute(params![record.number, label, raw_value])
                    .with_context(|| {
                        format!("failed to insert field '{label}' of notary {}", record.number)
                    })?;
            }

            let derived_json = serde_json::to_value(&record.derived)?;
            for key in DERIVED_KEYS {
                let Some(value) = record.derived.cell(key) else {
                    continue;
                };
                let value_json = derived_json
                    .get(*key)
                    .map(serde_json::Value::to_string);
                derived_statement
                    .execute(params![record.number, key, value, value_json])
                    .with_context(|| {
                        format!("failed to insert '{key}' of notary {}", record.number)
                    })?;
            }
        }
    }
    tx.commit().context("failed to commit export transaction")
}
