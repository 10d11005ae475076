use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum DateSlot {
    Birth,
    Baptism,
    Death,
    IntendedMarriage,
    Marriage,
    Divorce,
    Appointment,
    Commission,
    MentionedAsNotary,
    Bankrupcy,
}

impl DateSlot {
    fn slot(self, derived: &mut DerivedFields) -> &mut Option<DateValue> {
        match self {
            Self::Birth => &mut derived.birth_date,
            Self::Baptism => &mut derived.baptism_date,
            Self::Death => &mut derived.death_date,
            Self::IntendedMarriage => &mut derived.intended_marriage_date,
            Self::Marriage => &mut derived.marriage_date,
            Self::Divorce => &mut derived.divorce_date,
            Self::Appointment => &mut derived.appointment_date,
            Self::Commission => &mut derived.commission_date,
            Self::MentionedAsNotary => &mut derived.mentioned_as_notary_date,
            Self::Bankrupcy => &mut derived.bankrupcy_date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ListSlot {
    Addresses,
    Religions,
    ForeignLanguages,
}

impl ListSlot {
    fn slot(self, derived: &mut DerivedFields) -> &mut Option<Vec<String>> {
        match self {
            Self::Addresses => &mut derived.adresses,
            Self::Religions => &mut derived.religions,
            Self::ForeignLanguages => &mut derived.foreign_languages,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Normalizer {
    Date(DateSlot),
    Admission,
    Withdrawal,
    List {
        slot: ListSlot,
        separator: &'static str,
    },
}

pub(super) const NORMALIZERS: &[(&str, Normalizer)] = &[
    ("geboren", Normalizer::Date(DateSlot::Birth)),
    ("doop", Normalizer::Date(DateSlot::Baptism)),
    ("overlijden", Normalizer::Date(DateSlot::Death)),
    ("ondertrouw", Normalizer::Date(DateSlot::IntendedMarriage)),
    ("huwelijk", Normalizer::Date(DateSlot::Marriage)),
    ("gescheiden", Normalizer::Date(DateSlot::Divorce)),
    ("benoeming", Normalizer::Date(DateSlot::Appointment)),
    ("admissie", Normalizer::Admission),
    ("aanstelling", Normalizer::Date(DateSlot::Commission)),
    ("vermeld als notaris", Normalizer::Date(DateSlot::MentionedAsNotary)),
    ("faillissement", Normalizer::Date(DateSlot::Bankrupcy)),
    ("ambtsbeëindiging", Normalizer::Withdrawal),
    (
        "adres",
        Normalizer::List {
            slot: ListSlot::Addresses,
            separator: "; ",
        },
    ),
    (
        "godsdienst",
        Normalizer::List {
            slot: ListSlot::Religions,
            separator: "; ",
        },
    ),
    (
        "vreemde talen in zijn protocol",
        Normalizer::List {
            slot: ListSlot::ForeignLanguages,
            separator: ", ",
        },
    ),
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(super) struct NormalizeStats {
    pub(super) dates_parsed: usize,
    pub(super) dates_failed: usize,
}

impl NormalizeStats {
    fn record(&mut self, number: u32, label: &str, text: &str, value: &Option<DateValue>) {
        match value {
            Some(value) => self.dates_parsed += value.date_count(),
            None => {
                self.dates_failed += 1;
                debug!(number, label, text = %text, "unparseable date");
            }
        }
    }
}

pub(super) fn normalize_record(
    record: &mut NotaryRecord,
    dates: &DateNormalizer,
    parser: &RepertoriumParser,
    stats: &mut NormalizeStats,
) {
    for (label, normalizer) in NORMALIZERS {
        let Some(raw) = record.fields.get(*label).filter(|raw| !raw.is_empty()) else {
            continue;
        };
        let raw = raw.clone();
        let number = record.number;
        let derived = &mut record.derived;

        match *normalizer {
            Normalizer::Date(slot) => {
                let value = dates.normalize(&raw);
                stats.record(number, label, &raw, &value);
                *slot.slot(derived) = value;
            }
            Normalizer::Admission => {
                let (admission_dates, nominators) = split_admissions(&raw, dates);
                for (entry, value) in raw.split("; ").zip(&admission_dates) {
                    stats.record(number, label, entry, value);
                }
                derived.admission_date = Some(admission_dates);
                derived.nominated_by = Some(nominators);
            }
            Normalizer::Withdrawal => {
                let (date_text, reason) = split_withdrawal(&raw, parser);
                let value = dates.normalize(date_text);
                stats.record(number, label, date_text, &value);
                derived.withdrawal_date = value;
                derived.withdrawal_reason = reason.map(str::to_string);
            }
            Normalizer::List { slot, separator } => {
                let items = split_list(&raw, slot, separator);
                if slot == ListSlot::Religions {
                    for religion in items.iter().filter(|value| !is_known_religion(value)) {
                        debug!(number, religion = %religion, "religion outside the known list");
                    }
                }
                *slot.slot(derived) = Some(items);
            }
        }
    }
}

pub(super) fn split_admissions(
    raw: &str,
    dates: &DateNormalizer,
) -> (Vec<Option<DateValue>>, Vec<Option<String>>) {
    raw.split("; ")
        .map(|entry| match entry.split_once(NOMINATION_PHRASE) {
            Some((date, nominator)) => (dates.normalize(date), Some(nominator.to_string())),
            None => (dates.normalize(entry), None),
        })
        .unzip()
}

/// Split an `ambtsbeëindiging` value into its date and optional reason.
///
/// The date runs up to and including the first ` D ` or ` DD ` token.
pub(super) fn split_withdrawal<'a>(
    raw: &'a str,
    parser: &RepertoriumParser,
) -> (&'a str, Option<&'a str>) {
    match parser.withdrawal_split.find(raw) {
        Some(token) => {
            let reason = &raw[token.end()..];
            (
                raw[..token.end()].trim_end(),
                (!reason.is_empty()).then_some(reason),
            )
        }
        None => (raw, None),
    }
}

fn split_list(raw: &str, slot: ListSlot, separator: &str) -> Vec<String> {
    let value = if slot == ListSlot::ForeignLanguages && raw.contains(LANGUAGE_BOILERPLATE) {
        raw.replace(LANGUAGE_BOILERPLATE, "").trim().to_string()
    } else {
        raw.to_string()
    };
    value.split(separator).map(str::to_string).collect()
}
