use super::*;

#[derive(Debug, Default)]
pub(super) struct Registry {
    pub(super) records: BTreeMap<u32, NotaryRecord>,
    pub(super) pages: BTreeMap<u32, Vec<String>>,
    pub(super) localities: BTreeMap<u32, Vec<String>>,
    pub(super) back_reference_count: usize,
    pub(super) warnings: Vec<String>,
}

#[derive(Debug, Default)]
struct RegistryScan {
    current_locality: Option<String>,
    current_number: Option<u32>,
    last_page: Option<String>,
    registry: Registry,
}

impl RegistryScan {
    fn observe(
        mut self,
        line_number: usize,
        line: &str,
        parser: &RepertoriumParser,
    ) -> Result<Self> {
        if parser.vocabulary.is_locality(line) {
            self.current_locality = Some(title_case(line));
            return Ok(self);
        }

        if parser.is_page_marker_line(line) {
            let Some(page) = parser.page_number(line) else {
                self.warn(format!("line {line_number}: page marker without page number"));
                return Ok(self);
            };
            // A marker inside a notary's description is a continuation page.
            if let Some(number) = self.current_number {
                self.registry.pages.entry(number).or_default().push(page.clone());
            }
            self.last_page = Some(page);
            return Ok(self);
        }

        let Some((number, name)) = parser.entity_header(line) else {
            return Ok(self);
        };

        if let Some(previous) = self.current_number {
            if number <= previous {
                return Err(PipelineError::EntityOrder {
                    line: line_number,
                    previous,
                    found: number,
                }
                .into());
            }
            if number != previous + 1 {
                self.warn(format!(
                    "line {line_number}: notary numbering jumps from {previous} to {number}"
                ));
            }
        }

        self.current_number = Some(number);
        self.registry
            .records
            .insert(number, NotaryRecord::new(number, name));

        match self.last_page.clone() {
            Some(page) => self.registry.pages.entry(number).or_default().push(page),
            None => {
                self.registry.pages.entry(number).or_default();
                self.warn(format!("line {line_number}: notary {number} precedes any page marker"));
            }
        }

        match self.current_locality.clone() {
            Some(locality) => self
                .registry
                .localities
                .entry(number)
                .or_default()
                .push(locality),
            None => {
                self.registry.localities.entry(number).or_default();
                self.warn(format!(
                    "line {line_number}: notary {number} precedes any locality header"
                ));
            }
        }

        Ok(self)
    }

    fn warn(&mut self, message: String) {
        warn!("{message}");
        self.registry.warnings.push(message);
    }
}

pub(super) fn build_registry(lines: &[String], parser: &RepertoriumParser) -> Result<Registry> {
    let scan = lines
        .iter()
        .enumerate()
        .try_fold(RegistryScan::default(), |scan, (index, line)| {
            scan.observe(index + 1, line, parser)
        })?;
    let mut registry = scan.registry;

    resolve_back_references(lines, parser, &mut registry)?;

    info!(
        notaries = registry.records.len(),
        back_references = registry.back_reference_count,
        "built notary registry"
    );

    Ok(registry)
}

fn resolve_back_references(
    lines: &[String],
    parser: &RepertoriumParser,
    registry: &mut Registry,
) -> Result<()> {
    let mut names = HashMap::<&str, u32>::new();
    for (number, record) in &registry.records {
        if let Some(previous) = names.insert(record.literal_name.as_str(), *number) {
            debug!(
                name = %record.literal_name,
                previous,
                number,
                "duplicate literal name; back-references resolve to the later notary"
            );
        }
    }

    let mut resolved = Vec::<(u32, String)>::new();
    for (index, line) in lines.iter().enumerate() {
        if !parser.is_back_reference_line(line) {
            continue;
        }
        let Some((name, locality)) = line.split_once(BACK_REFERENCE_DELIMITER) else {
            continue;
        };
        let number = names.get(name).copied().ok_or_else(|| {
            PipelineError::UnresolvedBackReference {
                line: index + 1,
                name: name.to_string(),
            }
        })?;
        resolved.push((number, locality.trim().to_string()));
    }

    registry.back_reference_count = resolved.len();
    for (number, locality) in resolved {
        registry.localities.entry(number).or_default().push(locality);
    }

    Ok(())
}
