use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate, Utc};
use regex::Regex;
use rusqlite::{Connection, params};
use tracing::{debug, info, warn};

use crate::cli::{ExtractArgs, PrecisionMode};
use crate::error::PipelineError;
use crate::model::{
    DERIVED_KEYS, DateValue, DerivedFields, ExtractCounts, ExtractPaths, ExtractRunManifest,
    NotaryRecord, PartialDate, Precision,
};
use crate::util::{
    ensure_directory, ensure_parent_directory, now_utc_string, read_source_text, split_lines,
    utc_compact_string, write_json_pretty,
};
use crate::vocabulary::{
    BACK_REFERENCE_DELIMITER, LANGUAGE_BOILERPLATE, NOMINATION_PHRASE, PAGE_MARKER, Vocabulary,
    is_known_religion, title_case,
};

const DB_SCHEMA_VERSION: &str = "0.1.0";

mod dates;
mod db_export;
mod field_parse;
mod normalize;
mod registry;
mod run;
mod sanitize_and_segment;
mod table_export;

pub use run::run;

use dates::*;
use db_export::*;
use field_parse::*;
use normalize::*;
use registry::*;
use sanitize_and_segment::*;
use table_export::*;

struct RepertoriumParser {
    page_marker: Regex,
    entity_header: Regex,
    withdrawal_split: Regex,
    vocabulary: Vocabulary,
    labels_by_priority: Vec<String>,
}

impl RepertoriumParser {
    fn new(vocabulary: Vocabulary) -> Result<Self> {
        let labels_by_priority = vocabulary.labels_by_priority();
        Ok(Self {
            page_marker: Regex::new(r"<pagina\s+(\d+)")
                .context("failed to compile page marker regex")?,
            entity_header: Regex::new(r"^(\d+)\. (.*)$")
                .context("failed to compile notary header regex")?,
            withdrawal_split: Regex::new(r" \d{1,2} ")
                .context("failed to compile withdrawal split regex")?,
            vocabulary,
            labels_by_priority,
        })
    }

    fn is_page_marker_line(&self, line: &str) -> bool {
        line.contains(PAGE_MARKER)
    }

    fn page_number(&self, line: &str) -> Option<String> {
        self.page_marker
            .captures(line)
            .and_then(|captures| captures.get(1))
            .map(|value| value.as_str().to_string())
    }

    fn entity_header(&self, line: &str) -> Option<(u32, String)> {
        let captures = self.entity_header.captures(line)?;
        let number = captures.get(1)?.as_str().parse::<u32>().ok()?;
        let name = captures.get(2)?.as_str().to_string();
        Some((number, name))
    }

    fn is_back_reference_line(&self, line: &str) -> bool {
        line.contains(BACK_REFERENCE_DELIMITER)
    }
}

struct ExtractOptions {
    vocabulary: Vocabulary,
    precision_mode: PrecisionMode,
    /// Reference date for fields missing from the text; also the date the
    /// legacy precision heuristic compares against.
    today: NaiveDate,
    flush_trailing_chunk: bool,
}

#[derive(Debug)]
struct Extraction {
    records: BTreeMap<u32, NotaryRecord>,
    counts: ExtractCounts,
    warnings: Vec<String>,
}
