use super::*;

const ENUMERATION_SEPARATOR: &str = "; ";
const PLACE_QUALIFIER: &str = " te ";
const ALTERNATIVE_SEPARATOR: &str = " of ";
const ANNOTATION_SEPARATOR: &str = ", ";

/// Fields missing from the text are filled from the interpreter's reference
/// date; `has_month` and `has_day` tell which ones were really there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct InterpretedDate {
    pub(super) date: NaiveDate,
    pub(super) has_month: bool,
    pub(super) has_day: bool,
}

pub(super) trait DateInterpreter {
    fn interpret(&self, text: &str) -> Option<InterpretedDate>;
}

// `12 maart 1701`, `mrt. 1701`, `1701`, `12-3-1701`, `1701-03-12`.
#[derive(Debug, Clone, Copy)]
pub(super) struct DutchDateInterpreter {
    today: NaiveDate,
}

impl DutchDateInterpreter {
    pub(super) fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    fn fill(&self, year: i32, month: Option<u32>, day: Option<u32>) -> Option<InterpretedDate> {
        let has_month = month.is_some();
        let has_day = day.is_some();
        let month = month.unwrap_or_else(|| self.today.month());
        let day = match day {
            Some(day) => day,
            None => self.today.day().min(last_day_of_month(year, month)?),
        };
        Some(InterpretedDate {
            date: NaiveDate::from_ymd_opt(year, month, day)?,
            has_month,
            has_day,
        })
    }
}

impl DateInterpreter for DutchDateInterpreter {
    fn interpret(&self, text: &str) -> Option<InterpretedDate> {
        let lowered = text.trim().to_lowercase();
        let tokens = lowered.split_whitespace().collect::<Vec<&str>>();

        match tokens.as_slice() {
            [single] if single.contains(['-', '/']) => {
                let parts = single.split(['-', '/']).collect::<Vec<&str>>();
                let [first, month, last] = parts.as_slice() else {
                    return None;
                };
                let month = parse_day(month).filter(|value| (1..=12).contains(value))?;
                let (year, day) = if first.len() >= 3 {
                    (first, last)
                } else {
                    (last, first)
                };
                self.fill(parse_year(year)?, Some(month), Some(parse_day(day)?))
            }
            [year] => self.fill(parse_year(year)?, None, None),
            [month, year] => self.fill(parse_year(year)?, Some(month_token_to_number(month)?), None),
            [day, month, year] => self.fill(
                parse_year(year)?,
                Some(month_token_to_number(month)?),
                Some(parse_day(day)?),
            ),
            _ => None,
        }
    }
}

fn parse_year(token: &str) -> Option<i32> {
    let token = token.trim_end_matches('.');
    if !(3..=4).contains(&token.len()) || !token.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    token.parse::<i32>().ok()
}

fn parse_day(token: &str) -> Option<u32> {
    let token = token.trim_end_matches('.');
    if !(1..=2).contains(&token.len()) || !token.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    token.parse::<u32>().ok()
}

fn month_token_to_number(token: &str) -> Option<u32> {
    match token.trim_end_matches('.') {
        "januari" | "jan" => Some(1),
        "februari" | "feb" | "febr" => Some(2),
        "maart" | "mrt" | "mar" | "maa" => Some(3),
        "april" | "apr" => Some(4),
        "mei" => Some(5),
        "juni" | "jun" => Some(6),
        "juli" | "jul" => Some(7),
        "augustus" | "aug" => Some(8),
        "september" | "sep" | "sept" => Some(9),
        "oktober" | "okt" | "oct" => Some(10),
        "november" | "nov" => Some(11),
        "december" | "dec" => Some(12),
        _ => None,
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    first_of_next.pred_opt().map(|date| date.day())
}

/// How the precision of an interpreted date is decided. The stored date is
/// always truncated to that precision, so equal text gives equal values
/// whatever the reference date was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PrecisionPolicy {
    /// Trust the interpreter's record of which fields were present.
    Explicit,
    /// Legacy rule: a day and month equal to `today` mean "year only", a day
    /// equal to today's day means "year and month". Misfires on events that
    /// really happened on today's day or date.
    TodayHeuristic { today: NaiveDate },
}

impl PrecisionPolicy {
    pub(super) fn from_mode(mode: PrecisionMode, today: NaiveDate) -> Self {
        match mode {
            PrecisionMode::Explicit => Self::Explicit,
            PrecisionMode::TodayHeuristic => Self::TodayHeuristic { today },
        }
    }

    fn collapse(self, interpreted: InterpretedDate) -> PartialDate {
        let precision = match self {
            Self::Explicit if !interpreted.has_month => Precision::Year,
            Self::Explicit if !interpreted.has_day => Precision::YearMonth,
            Self::Explicit => Precision::Day,
            Self::TodayHeuristic { today } => {
                let same_day = interpreted.date.day() == today.day();
                let same_month = interpreted.date.month() == today.month();
                if same_day && same_month {
                    Precision::Year
                } else if same_day {
                    Precision::YearMonth
                } else {
                    Precision::Day
                }
            }
        };
        let date = interpreted.date;
        let truncated = match precision {
            Precision::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
            Precision::YearMonth => date.with_day(1),
            Precision::Day => Some(date),
        };
        PartialDate::new(truncated.unwrap_or(date), precision)
    }
}

pub(super) struct DateNormalizer {
    interpreter: Box<dyn DateInterpreter>,
    policy: PrecisionPolicy,
}

impl DateNormalizer {
    pub(super) fn new(interpreter: Box<dyn DateInterpreter>, policy: PrecisionPolicy) -> Self {
        Self {
            interpreter,
            policy,
        }
    }

    pub(super) fn normalize(&self, text: &str) -> Option<DateValue> {
        if text.contains(ENUMERATION_SEPARATOR) {
            let mut values = text
                .split(ENUMERATION_SEPARATOR)
                .filter_map(|segment| self.normalize(segment))
                .collect::<Vec<DateValue>>();
            return match values.len() {
                0 => None,
                1 => values.pop(),
                _ => Some(DateValue::AllOf(values)),
            };
        }

        // The place after `te` is not kept.
        let text = text
            .split_once(PLACE_QUALIFIER)
            .map_or(text, |(date, _place)| date);

        if let Some((first, second)) = text.split_once(ALTERNATIVE_SEPARATOR) {
            return Some(DateValue::OneOf(vec![
                self.normalize(first),
                self.normalize(second),
            ]));
        }

        let text = text
            .rsplit_once(ANNOTATION_SEPARATOR)
            .map_or(text, |(date, _annotation)| date);

        let interpreted = self.interpreter.interpret(text)?;
        Some(DateValue::Single(self.policy.collapse(interpreted)))
    }
}
