//! Draft state of the add/edit form and the checks run on submit.

use crate::models::{format_number, parse_number, Field, Record};

/// Raw contents of the shared add/edit form. Inputs are kept as typed text;
/// conversion to a [`Record`] only happens when the form is read.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordForm {
    name: String,
    image: String,
    location: String,
    size: String,
    weight: String,
    active: FormField,
}

/// Newtype over [`Field`] so the focused input can default to the name.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct FormField(Field);

impl Default for FormField {
    fn default() -> Self {
        FormField(Field::Name)
    }
}

impl RecordForm {
    /// Text currently typed into `field`.
    pub fn input(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Image => &self.image,
            Field::Location => &self.location,
            Field::Size => &self.size,
            Field::Weight => &self.weight,
        }
    }

    fn input_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Image => &mut self.image,
            Field::Location => &mut self.location,
            Field::Size => &mut self.size,
            Field::Weight => &mut self.weight,
        }
    }

    /// Replace the text of one input.
    pub fn set_input(&mut self, field: Field, value: impl Into<String>) {
        *self.input_mut(field) = value.into();
    }

    /// Field that receives typed characters.
    pub fn active(&self) -> Field {
        self.active.0
    }

    pub fn focus(&mut self, field: Field) {
        self.active = FormField(field);
    }

    /// Move focus to the next input, wrapping after the last one.
    pub fn next_field(&mut self) {
        self.shift_focus(1);
    }

    /// Move focus to the previous input, wrapping before the first one.
    pub fn previous_field(&mut self) {
        self.shift_focus(Field::ALL.len() - 1);
    }

    fn shift_focus(&mut self, step: usize) {
        let current = Field::ALL
            .iter()
            .position(|field| *field == self.active.0)
            .unwrap_or(0);
        self.active = FormField(Field::ALL[(current + step) % Field::ALL.len()]);
    }

    /// Append a character to the focused input. Control characters are
    /// rejected; numeric inputs accept anything a number literal may contain.
    pub fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let field = self.active.0;
        if field.is_numeric() && !(ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+' | 'e' | 'E'))
        {
            return false;
        }
        self.input_mut(field).push(ch);
        true
    }

    /// Remove the last character from the focused input.
    pub fn backspace(&mut self) {
        let field = self.active.0;
        self.input_mut(field).pop();
    }

    /// Character count of an input, used to place the terminal cursor.
    pub fn value_len(&self, field: Field) -> usize {
        self.input(field).chars().count()
    }

    /// Read the inputs into a candidate record: text is trimmed, numbers are
    /// coerced with [`parse_number`].
    pub fn candidate(&self) -> Record {
        Record {
            name: self.name.trim().to_string(),
            image: self.image.trim().to_string(),
            location: self.location.trim().to_string(),
            size: parse_number(&self.size),
            weight: parse_number(&self.weight),
        }
    }

    /// Load an existing record into the inputs, keeping focus where it is.
    pub fn fill(&mut self, record: &Record) {
        self.name = record.name.clone();
        self.image = record.image.clone();
        self.location = record.location.clone();
        self.size = format_number(record.size);
        self.weight = format_number(record.weight);
    }

    /// Blank every input and return focus to the name.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_blank(&self) -> bool {
        Field::ALL.iter().all(|field| self.input(*field).is_empty())
    }
}

/// Check a candidate in fixed order and report the first blank field.
/// A number counts as missing when it is zero or `NaN`.
pub fn first_missing_field(candidate: &Record) -> Option<Field> {
    let number_missing = |value: f64| value == 0.0 || value.is_nan();
    if candidate.name.is_empty() {
        Some(Field::Name)
    } else if candidate.image.is_empty() {
        Some(Field::Image)
    } else if candidate.location.is_empty() {
        Some(Field::Location)
    } else if number_missing(candidate.size) {
        Some(Field::Size)
    } else if number_missing(candidate.weight) {
        Some(Field::Weight)
    } else {
        None
    }
}
