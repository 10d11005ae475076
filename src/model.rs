use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    Year,
    YearMonth,
    Day,
}

/// A calendar date known only up to `precision`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialDate {
    pub date: NaiveDate,
    pub precision: Precision,
}

impl PartialDate {
    pub fn new(date: NaiveDate, precision: Precision) -> Self {
        Self { date, precision }
    }
}

#[cfg(test)]
impl PartialDate {
    pub fn year(year: i32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, 1, 1).map(|date| Self::new(date, Precision::Year))
    }

    pub fn year_month(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|date| Self::new(date, Precision::YearMonth))
    }

    pub fn ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(|date| Self::new(date, Precision::Day))
    }
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.precision {
            Precision::Year => write!(f, "{}", self.date.year()),
            Precision::YearMonth => write!(f, "{}-{:02}", self.date.year(), self.date.month()),
            Precision::Day => write!(
                f,
                "{}-{:02}-{:02}",
                self.date.year(),
                self.date.month(),
                self.date.day()
            ),
        }
    }
}

impl Serialize for PartialDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A normalized date expression.
///
/// `AllOf` comes from `;`-separated enumerations where every date holds,
/// `OneOf` from `of` alternatives where only one does. `OneOf` keeps its
/// failed slots so both alternatives stay positionally visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateValue {
    Single(PartialDate),
    AllOf(Vec<DateValue>),
    OneOf(Vec<Option<DateValue>>),
}

impl DateValue {
    /// Number of concrete dates inside this value.
    pub fn date_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::AllOf(values) => values.iter().map(DateValue::date_count).sum(),
            Self::OneOf(values) => values.iter().flatten().map(DateValue::date_count).sum(),
        }
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(date) => write!(f, "{date}"),
            Self::AllOf(values) => write_tuple(f, values.iter().map(Some)),
            Self::OneOf(values) => write_tuple(f, values.iter().map(Option::as_ref)),
        }
    }
}

fn write_tuple<'a>(
    f: &mut fmt::Formatter<'_>,
    values: impl Iterator<Item = Option<&'a DateValue>>,
) -> fmt::Result {
    f.write_str("(")?;
    for (index, value) in values.enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write_tuple_item(f, value)?;
    }
    f.write_str(")")
}

fn write_tuple_item(f: &mut fmt::Formatter<'_>, value: Option<&DateValue>) -> fmt::Result {
    match value {
        None => f.write_str("None"),
        Some(DateValue::Single(date)) => write!(f, "'{date}'"),
        Some(nested) => write!(f, "{nested}"),
    }
}

/// Values derived from raw fields by label-specific normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<DateValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baptism_date: Option<DateValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death_date: Option<DateValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intended_marriage_date: Option<DateValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marriage_date: Option<DateValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub divorce_date: Option<DateValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_date: Option<DateValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admission_date: Option<Vec<Option<DateValue>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nominated_by: Option<Vec<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission_date: Option<DateValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentioned_as_notary_date: Option<DateValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bankrupcy_date: Option<DateValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdrawal_date: Option<DateValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdrawal_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adresses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub religions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_languages: Option<Vec<String>>,
}

/// Output keys of the derived values, in column order.
pub const DERIVED_KEYS: &[&str] = &[
    "birthDate",
    "baptismDate",
    "deathDate",
    "intendedMarriageDate",
    "marriageDate",
    "divorceDate",
    "appointmentDate",
    "admissionDate",
    "nominatedBy",
    "commissionDate",
    "mentionedAsNotaryDate",
    "bankrupcyDate",
    "withdrawalDate",
    "withdrawalReason",
    "adresses",
    "religions",
    "foreignLanguages",
];

impl DerivedFields {
    /// Rendered cell text for a derived key, `None` when the value is absent.
    pub fn cell(&self, key: &str) -> Option<String> {
        let date = |value: &Option<DateValue>| value.as_ref().map(ToString::to_string);
        let list = |value: &Option<Vec<String>>| value.as_ref().map(|items| items.join("; "));
        match key {
            "birthDate" => date(&self.birth_date),
            "baptismDate" => date(&self.baptism_date),
            "deathDate" => date(&self.death_date),
            "intendedMarriageDate" => date(&self.intended_marriage_date),
            "marriageDate" => date(&self.marriage_date),
            "divorceDate" => date(&self.divorce_date),
            "appointmentDate" => date(&self.appointment_date),
            "admissionDate" => self
                .admission_date
                .as_ref()
                .map(|dates| render_admission_dates(dates)),
            "nominatedBy" => self
                .nominated_by
                .as_ref()
                .map(|names| render_nominators(names)),
            "commissionDate" => date(&self.commission_date),
            "mentionedAsNotaryDate" => date(&self.mentioned_as_notary_date),
            "bankrupcyDate" => date(&self.bankrupcy_date),
            "withdrawalDate" => date(&self.withdrawal_date),
            "withdrawalReason" => self.withdrawal_reason.clone(),
            "adresses" => list(&self.adresses),
            "religions" => list(&self.religions),
            "foreignLanguages" => list(&self.foreign_languages),
            _ => None,
        }
    }
}

// A single admission renders as a bare value, or an empty cell when absent,
// in both the date and the nominator column.
fn render_admission_dates(dates: &[Option<DateValue>]) -> String {
    if let [single] = dates {
        return single.as_ref().map(ToString::to_string).unwrap_or_default();
    }
    DateValue::OneOf(dates.to_vec()).to_string()
}

fn render_nominators(names: &[Option<String>]) -> String {
    if let [single] = names {
        return single.clone().unwrap_or_default();
    }
    let items = names
        .iter()
        .map(|name| match name {
            Some(name) => format!("'{name}'"),
            None => "None".to_string(),
        })
        .collect::<Vec<String>>();
    format!("({})", items.join(", "))
}

/// One notary: identity, provenance, raw labelled values and derived values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotaryRecord {
    pub number: u32,
    pub literal_name: String,
    pub pages: Vec<String>,
    pub localities: Vec<String>,
    pub fields: BTreeMap<String, String>,
    pub derived: DerivedFields,
}

impl NotaryRecord {
    pub fn new(number: u32, literal_name: impl Into<String>) -> Self {
        Self {
            number,
            literal_name: literal_name.into(),
            pages: Vec::new(),
            localities: Vec::new(),
            fields: BTreeMap::new(),
            derived: DerivedFields::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractPaths {
    pub input_path: String,
    pub csv_path: Option<String>,
    pub json_path: Option<String>,
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractCounts {
    pub line_count: usize,
    pub content_line_count: usize,
    pub chunk_count: usize,
    pub notary_count: usize,
    pub page_reference_count: usize,
    pub back_reference_count: usize,
    pub raw_field_count: usize,
    pub dates_parsed: usize,
    pub dates_failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub input_sha256: String,
    pub precision_mode: String,
    pub paths: ExtractPaths,
    pub counts: ExtractCounts,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(value: PartialDate) -> DateValue {
        DateValue::Single(value)
    }

    #[test]
    fn partial_date_renders_at_its_precision() {
        assert_eq!(PartialDate::year(1701).unwrap().to_string(), "1701");
        assert_eq!(PartialDate::year_month(1701, 3).unwrap().to_string(), "1701-03");
        assert_eq!(PartialDate::ymd(1701, 3, 12).unwrap().to_string(), "1701-03-12");
    }

    #[test]
    fn tuples_render_in_legacy_notation() {
        let value = DateValue::AllOf(vec![
            single(PartialDate::ymd(1701, 3, 12).unwrap()),
            single(PartialDate::year(1701).unwrap()),
        ]);
        assert_eq!(value.to_string(), "('1701-03-12', '1701')");

        let alternatives = DateValue::OneOf(vec![Some(single(PartialDate::year(1650).unwrap())), None]);
        assert_eq!(alternatives.to_string(), "('1650', None)");
    }

    #[test]
    fn nested_alternatives_inside_enumeration_render_nested() {
        let value = DateValue::AllOf(vec![
            DateValue::OneOf(vec![
                Some(single(PartialDate::year(1700).unwrap())),
                Some(single(PartialDate::year(1701).unwrap())),
            ]),
            single(PartialDate::year(1710).unwrap()),
        ]);
        assert_eq!(value.to_string(), "(('1700', '1701'), '1710')");
        assert_eq!(value.date_count(), 3);
    }

    #[test]
    fn derived_cells_render_admissions_and_lists() {
        let derived = DerivedFields {
            admission_date: Some(vec![
                Some(single(PartialDate::ymd(1701, 3, 12).unwrap())),
                Some(single(PartialDate::year(1702).unwrap())),
            ]),
            nominated_by: Some(vec![Some("Amsterdam".to_string()), None]),
            adresses: Some(vec!["Kalverstraat".to_string(), "Dam".to_string()]),
            ..DerivedFields::default()
        };

        assert_eq!(
            derived.cell("admissionDate").as_deref(),
            Some("('1701-03-12', '1702')")
        );
        assert_eq!(derived.cell("nominatedBy").as_deref(), Some("('Amsterdam', None)"));
        assert_eq!(derived.cell("adresses").as_deref(), Some("Kalverstraat; Dam"));
        assert_eq!(derived.cell("birthDate"), None);
    }

    #[test]
    fn single_admission_renders_bare_values() {
        let nominated = DerivedFields {
            admission_date: Some(vec![Some(single(
                PartialDate::ymd(1701, 3, 12).unwrap(),
            ))]),
            nominated_by: Some(vec![Some("Amsterdam".to_string())]),
            ..DerivedFields::default()
        };
        assert_eq!(nominated.cell("admissionDate").as_deref(), Some("1701-03-12"));
        assert_eq!(nominated.cell("nominatedBy").as_deref(), Some("Amsterdam"));

        let unparsed = DerivedFields {
            admission_date: Some(vec![None]),
            nominated_by: Some(vec![None]),
            ..DerivedFields::default()
        };
        assert_eq!(unparsed.cell("admissionDate").as_deref(), Some(""));
        assert_eq!(unparsed.cell("nominatedBy").as_deref(), Some(""));
    }

    #[test]
    fn partial_date_serializes_as_iso_string() {
        let value = single(PartialDate::year_month(1701, 3).unwrap());
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"single":"1701-03"}"#
        );
    }
}
