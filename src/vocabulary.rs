use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const PAGE_MARKER: &str = "<pagina";
pub const BACK_REFERENCE_DELIMITER: &str = ": zie ";
pub const NOMINATION_PHRASE: &str = " op nominatie van ";
pub const LANGUAGE_BOILERPLATE: &str = "vreemde taal welke hij kende";

/// Localities under which notaries are grouped, as printed in the section headers.
pub const LOCALITIES: &[&str] = &[
    "AMSTERDAM",
    "AMSTELLAND",
    "BUIKSLOOT",
    "DIEMEN",
    "HOLYSLOOT",
    "HOUTRIJK",
    "LEIMUIDEN",
    "NIEUWENDAM",
    "NIEUWER-AMSTEL",
    "OSDORP",
    "OUDERKERK",
    "POLANEN",
    "RANSDORP",
    "SCHELLINGWOUDE",
    "SLOTEN",
    "SLOTERDIJK",
    "VRIEZEKOOP",
    "DE VRIJE GEER",
    "WATERGRAAFSMEER",
    "ZUNDERDORP",
];

pub const KNOWN_RELIGIONS: &[&str] = &[
    "gereformeerd (hervormd)",
    "rooms-katholiek",
    "remonstrants",
    "Waals hervormd",
    "Engels presbyteriaans",
    "luthers",
    "joods",
];

/// Field labels in the order of the legend on page 26 of the printed book.
///
/// `familierelaties` and `nevenfuncties` use the plural forms that actually
/// occur in the text, and `zijn klerk was` replaces the legend's
/// `zijn klerken waren`, which never occurs.
pub const FIELD_LABELS: &[(&str, &str)] = &[
    ("benoeming", ""),
    ("admissie", ""),
    ("creatie", ""),
    ("aanstelling", ""),
    ("vermeld als notaris", ""),
    (
        "leeftijd bij aanstelling",
        "De vroegste datum van benoeming, aanstelling of admissie; ongeacht op nominatie van welke plaats de admissie heeft plaatsgevonden.",
    ),
    ("aanstelling voor een ambachtsheerlijkheid", ""),
    ("vermeld als notaris van een ambachtsheerlijkheid", ""),
    ("notaris voor een instelling", ""),
    ("notaris voor een vorst", ""),
    ("protocol", ""),
    ("faillissement", ""),
    (
        "ambtsbeëindiging",
        "Deze werd soms veel later ingeschreven. De redenen om het notarisambt te beëindigen lopen uiteen van een andere functie, vertrek naar elders, slechte gezondheid, ouderdom, overlijden tot gekwiteerd (het ambt verlaten). Een aantal notarissen is, soms met zeer zware straffen, wegens overtredingen uit het ambt gezet.",
    ),
    ("tijdelijk ambt gestaakt", ""),
    ("opvolger van", ""),
    ("opgevolgd door", ""),
    ("samenwerking met", ""),
    ("familierelaties", ""),
    (
        "adres",
        "Uit de ambtsperiode. Indien deze niet bekend is, zijn ook de daaraan voorafgaande of nakomende straatnamen opgenomen. De vier grote grachten zijn opgedeeld aan de hand van nadere adres aanduidingen. Het kantooradres heeft voorrang boven het huisadres. Achter de straatnaam is zo nodig tussen haakjes de huidige naam vermeld.",
    ),
    ("godsdienst", ""),
    ("was klerk bij", ""),
    ("studie", ""),
    ("vreemde talen in zijn protocol", ""),
    ("vreemde talen welke hij kende", ""),
    ("zijn klerk was", ""),
    ("nevenfuncties", "De andere functies tijdens zijn leven."),
    ("herkomst", ""),
    ("geboren", ""),
    ("doop", ""),
    ("ondertrouw", ""),
    ("huwelijk", ""),
    ("gescheiden", ""),
    ("overlijden", ""),
    ("begraven", ""),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLabel {
    pub label: String,
    #[serde(default)]
    pub note: String,
}

/// The closed vocabularies the parser recognizes: locality headers and field labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    #[serde(default = "default_localities")]
    pub localities: Vec<String>,
    #[serde(default = "default_field_labels")]
    pub field_labels: Vec<FieldLabel>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            localities: default_localities(),
            field_labels: default_field_labels(),
        }
    }
}

fn default_localities() -> Vec<String> {
    LOCALITIES.iter().map(|value| value.to_string()).collect()
}

fn default_field_labels() -> Vec<FieldLabel> {
    FIELD_LABELS
        .iter()
        .map(|(label, note)| FieldLabel {
            label: label.to_string(),
            note: note.to_string(),
        })
        .collect()
}

impl Vocabulary {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let vocabulary: Vocabulary = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse vocabulary {}", path.display()))?;
        Ok(vocabulary)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn is_locality(&self, line: &str) -> bool {
        self.localities.iter().any(|locality| locality == line)
    }

    pub fn is_field_label(&self, candidate: &str) -> bool {
        self.field_labels.iter().any(|field| field.label == candidate)
    }

    /// Position of a label in the canonical table, used to order output columns.
    pub fn canonical_index(&self, label: &str) -> Option<usize> {
        self.field_labels.iter().position(|field| field.label == label)
    }

    /// Labels in dispatch order: longest first, canonical order among equals.
    ///
    /// No label can shadow a longer label it is a prefix of.
    pub fn labels_by_priority(&self) -> Vec<String> {
        let mut labels = self
            .field_labels
            .iter()
            .map(|field| field.label.clone())
            .collect::<Vec<String>>();
        labels.sort_by_key(|label| std::cmp::Reverse(label.chars().count()));
        labels
    }
}

/// `NIEUWER-AMSTEL` -> `Nieuwer-Amstel`: capitalize after every non-letter.
pub fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut previous_is_letter = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                result.extend(ch.to_lowercase());
            } else {
                result.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(ch);
            previous_is_letter = false;
        }
    }
    result
}

pub fn is_known_religion(value: &str) -> bool {
    KNOWN_RELIGIONS.iter().any(|known| *known == value)
}
