//! Domain models shared by the table component, the HTML renderer and the
//! terminal shell. These types stay light-weight data holders so the other
//! layers can focus on presentation and editing logic.

use std::fmt;
use std::str::FromStr;

use crate::error::TableError;

#[derive(Debug, Clone, PartialEq)]
/// One animal row. The `name` doubles as the identity key when a table checks
/// for duplicates.
pub struct Record {
    /// Display name, unique within one table.
    pub name: String,
    /// URI of a picture. Only its presence is ever validated.
    pub image: String,
    /// Free-form habitat text.
    pub location: String,
    /// Size in feet.
    pub size: f64,
    /// Weight in kilograms.
    pub weight: f64,
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        image: impl Into<String>,
        location: impl Into<String>,
        size: f64,
        weight: f64,
    ) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            location: location.into(),
            size,
            weight,
        }
    }

    /// Borrow the value stored under `field`, keeping numbers numeric so the
    /// sort comparator can tell both kinds apart.
    pub fn value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Name => FieldValue::Text(&self.name),
            Field::Image => FieldValue::Text(&self.image),
            Field::Location => FieldValue::Text(&self.location),
            Field::Size => FieldValue::Number(self.size),
            Field::Weight => FieldValue::Number(self.weight),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The fixed column schema of every table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    Image,
    Location,
    Size,
    Weight,
}

impl Field {
    /// Every field in display order.
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Image,
        Field::Location,
        Field::Size,
        Field::Weight,
    ];

    /// Lowercase key used in markup handles and sortable-field lists.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Image => "image",
            Field::Location => "location",
            Field::Size => "size",
            Field::Weight => "weight",
        }
    }

    /// Column header text.
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Image => "Image",
            Field::Location => "Location",
            Field::Size => "Size",
            Field::Weight => "Weight",
        }
    }

    /// Placeholder shown by an empty form input.
    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Image => "Image URL",
            Field::Location => "Location",
            Field::Size => "Size (in numbers)",
            Field::Weight => "Weight (in numbers)",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Field::Size | Field::Weight)
    }

    /// Message surfaced when the field is left blank on submit.
    pub fn required_message(self) -> &'static str {
        match self {
            Field::Name => "Name is required.",
            Field::Image => "Image URL is required.",
            Field::Location => "Location is required.",
            Field::Size => "Size is required.",
            Field::Weight => "Weight is required.",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Field::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TableError::UnknownField(wanted.to_string()))
    }
}

/// A borrowed field value. Text and numbers are kept apart so comparison can
/// pick numeric ordering when both sides are numbers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Number(number) => write!(f, "{}", format_number(*number)),
        }
    }
}

/// Convert raw input text into a number: surrounding whitespace is ignored,
/// blank text becomes `0` and anything unparsable becomes `NaN`.
pub fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Shortest textual form of a number (`10`, `2.3`, `NaN`). Magnitudes from
/// `1e21` up and below `1e-6` switch to exponent form (`1e+21`, `1.5e-7`).
pub fn format_number(number: f64) -> String {
    if number.is_nan() {
        "NaN".to_string()
    } else if number == f64::INFINITY {
        "Infinity".to_string()
    } else if number == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if number == 0.0 {
        "0".to_string()
    } else if number.abs() >= 1e21 || number.abs() < 1e-6 {
        let exponent = format!("{number:e}");
        match exponent.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exponent,
        }
    } else {
        number.to_string()
    }
}
