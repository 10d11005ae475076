use super::*;

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let output_dir = args.output_dir.clone();
    let manifest_dir = output_dir.join("manifests");
    let csv_path = args
        .csv_path
        .clone()
        .unwrap_or_else(|| output_dir.join("notaries.csv"));
    let json_path = args
        .json_path
        .clone()
        .unwrap_or_else(|| output_dir.join("notaries.json"));
    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        manifest_dir.join(format!("extract_run_{}.json", utc_compact_string(started_ts)))
    });

    info!(input = %args.input.display(), run_id = %run_id, "starting extraction");

    let vocabulary = Vocabulary::load_or_default(args.vocabulary_path.as_deref())?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let options = ExtractOptions {
        vocabulary,
        precision_mode: args.precision_mode,
        today,
        flush_trailing_chunk: args.flush_trailing_chunk,
    };

    let source = read_source_text(&args.input)?;
    let lines = split_lines(&source.text);
    let extraction = extract_records(&lines, &options)
        .with_context(|| format!("failed to extract notaries from {}", args.input.display()))?;

    if args.dry_run {
        info!(
            notaries = extraction.counts.notary_count,
            dates_parsed = extraction.counts.dates_parsed,
            dates_failed = extraction.counts.dates_failed,
            "extraction dry-run complete"
        );
        return Ok(());
    }

    ensure_directory(&output_dir)?;
    write_csv(&csv_path, &extraction.records, &options.vocabulary)?;
    write_json(&json_path, &extraction.records)?;
    if let Some(db_path) = &args.db_path {
        write_sqlite(db_path, &extraction.records, &run_id, &source.sha256)?;
    }

    let manifest = ExtractRunManifest {
        manifest_version: 1,
        run_id,
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        input_sha256: source.sha256,
        precision_mode: args.precision_mode.as_str().to_string(),
        paths: ExtractPaths {
            input_path: args.input.display().to_string(),
            csv_path: Some(csv_path.display().to_string()),
            json_path: Some(json_path.display().to_string()),
            db_path: args.db_path.as_ref().map(|path| path.display().to_string()),
        },
        counts: extraction.counts.clone(),
        warnings: extraction.warnings,
    };
    write_json_pretty(&manifest_path, &manifest)?;

    info!(path = %manifest_path.display(), "wrote extraction run manifest");
    info!(
        notaries = manifest.counts.notary_count,
        dates_parsed = manifest.counts.dates_parsed,
        dates_failed = manifest.counts.dates_failed,
        "extraction completed"
    );

    Ok(())
}

pub(super) fn extract_records(lines: &[String], options: &ExtractOptions) -> Result<Extraction> {
    let parser = RepertoriumParser::new(options.vocabulary.clone())?;
    let dates = DateNormalizer::new(
        Box::new(DutchDateInterpreter::new(options.today)),
        PrecisionPolicy::from_mode(options.precision_mode, options.today),
    );

    let registry = build_registry(lines, &parser)?;
    let content_lines = sanitize_lines(lines, &parser);
    let segmentation = segment_chunks(&content_lines, options.flush_trailing_chunk);

    let mut warnings = registry.warnings.clone();
    if segmentation.dropped_trailing_lines > 0 {
        warnings.push(format!(
            "dropped {} lines after the last blank line",
            segmentation.dropped_trailing_lines
        ));
    }

    if segmentation.chunks.len() != registry.records.len() {
        return Err(PipelineError::ChunkCountMismatch {
            chunks: segmentation.chunks.len(),
            entities: registry.records.len(),
        }
        .into());
    }

    let Registry {
        mut records,
        mut pages,
        mut localities,
        back_reference_count,
        ..
    } = registry;

    let mut stats = NormalizeStats::default();
    let mut raw_field_count = 0usize;
    for chunk in &segmentation.chunks {
        let number = chunk_identity(chunk, &parser)?;
        let record = records
            .get_mut(&number)
            .ok_or(PipelineError::UnknownEntity { number })?;

        let logical_lines = reassemble_chunk(&chunk.lines, &parser.vocabulary);
        raw_field_count += extract_fields(record, &logical_lines, &parser);
        normalize_record(record, &dates, &parser, &mut stats);

        record.pages = pages.remove(&number).unwrap_or_default();
        record.localities = localities.remove(&number).unwrap_or_default();
    }

    let counts = ExtractCounts {
        line_count: lines.len(),
        content_line_count: content_lines.len(),
        chunk_count: segmentation.chunks.len(),
        notary_count: records.len(),
        page_reference_count: records.values().map(|record| record.pages.len()).sum(),
        back_reference_count,
        raw_field_count,
        dates_parsed: stats.dates_parsed,
        dates_failed: stats.dates_failed,
    };

    Ok(Extraction {
        records,
        counts,
        warnings,
    })
}
