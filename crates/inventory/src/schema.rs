//! Validation schema for inventory records.
//!
//! Each field is described declaratively by a normalization step, a presence
//! requirement and an ordered list of rules. Validation is pure: it never
//! touches storage, it only reports what is wrong.
//!
//! - [`validate_field`] checks one candidate value (every keystroke/selection).
//! - [`validate_record`] checks a whole record and collects every violation.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

use shopbill_core::decimal;

/// A validated field of an inventory record.
///
/// Declaration order is the order errors are reported in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Category,
    Metric,
    ItemName,
    ItemQuantity,
    Rate,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Category,
        Field::Metric,
        Field::ItemName,
        Field::ItemQuantity,
        Field::Rate,
    ];

    /// Serialized (camelCase) field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Category => "category",
            Field::Metric => "metric",
            Field::ItemName => "itemName",
            Field::ItemQuantity => "itemQuantity",
            Field::Rate => "rate",
        }
    }
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When absent values are acceptable.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValidationMode {
    /// Field-by-field editing of a stored item: quantity and rate may be blank.
    Editing,
    /// Committing a new item: quantity required, rate optional.
    Create,
    /// Moving an item into the bill: everything required.
    Transfer,
}

/// One field, one message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Every violation found in one record, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, error: FieldError) {
        self.errors.insert(error.field, error.message);
    }

    /// Drop the error recorded for `field`, if any.
    pub fn clear(&mut self, field: Field) {
        self.errors.remove(&field);
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl FromIterator<FieldError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        let mut errors = Self::new();
        for e in iter {
            errors.insert(e);
        }
        errors
    }
}

/// Read access to the raw field values of a record.
pub trait FieldValues {
    fn value(&self, field: Field) -> Option<&str>;
}

/// Normalized values of a record that passed [`validate_record`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    values: BTreeMap<Field, String>,
}

impl Normalized {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }
}

/// Title-case an item name: lowercase, trim, collapse runs of spaces, capitalize
/// each word (`"  apple   JUICE "` → `"Apple Juice"`).
pub fn normalize_name(raw: &str) -> String {
    raw.to_lowercase()
        .trim()
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Validate one candidate value.
///
/// Returns the normalized value to store, or `None` for an optional field left
/// blank in a mode that allows it.
pub fn validate_field(
    field: Field,
    value: Option<&str>,
    mode: ValidationMode,
) -> Result<Option<String>, FieldError> {
    schema_for(field).check(value, mode)
}

/// Validate a whole record, collecting one message for every invalid field.
pub fn validate_record<R>(record: &R, mode: ValidationMode) -> Result<Normalized, ValidationErrors>
where
    R: FieldValues + ?Sized,
{
    let mut normalized = Normalized::default();
    let mut errors = ValidationErrors::new();

    for field in Field::ALL {
        match validate_field(field, record.value(field), mode) {
            Ok(Some(v)) => {
                normalized.values.insert(field, v);
            }
            Ok(None) => {}
            Err(e) => errors.insert(e),
        }
    }

    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(errors)
    }
}

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("item name pattern compiles"));

static AMOUNT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d{1,2})?$").expect("amount pattern compiles"));

const CATEGORY_NAMES: [&str; 5] = ["Grocery", "Vegetables", "Fruits", "Meat", "Dairy"];

const METRIC_NAMES: [&str; 6] = ["kg", "oz", "dozen", "litre", "packet", "pieces"];

/// Fixed decimal bound `mantissa × 10^-scale`.
#[derive(Debug, Copy, Clone)]
struct Bound {
    mantissa: i64,
    scale: u32,
}

impl Bound {
    const fn new(mantissa: i64, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    fn value(self) -> Decimal {
        Decimal::new(self.mantissa, self.scale)
    }
}

#[derive(Debug, Copy, Clone)]
enum Normalize {
    Verbatim,
    Trim,
    TitleCase,
}

#[derive(Debug, Copy, Clone)]
enum Presence {
    Always,
    /// Required unless editing.
    OnCommit,
    /// Required only when transferring to the bill.
    OnTransfer,
}

impl Presence {
    fn required(self, mode: ValidationMode) -> bool {
        match self {
            Presence::Always => true,
            Presence::OnCommit => mode != ValidationMode::Editing,
            Presence::OnTransfer => mode == ValidationMode::Transfer,
        }
    }
}

#[derive(Debug)]
enum Rule {
    OneOf(&'static [&'static str], &'static str),
    Matches(&'static LazyLock<Regex>, &'static str),
    MinChars(usize, &'static str),
    MaxChars(usize, &'static str),
    GreaterThan(Bound, &'static str),
    AtLeast(Bound, &'static str),
    /// Also fails when the value is too large to parse at all.
    AtMost(Bound, &'static str),
}

impl Rule {
    fn passes(&self, value: &str) -> bool {
        match self {
            Rule::OneOf(allowed, _) => allowed.contains(&value),
            Rule::Matches(pattern, _) => pattern.is_match(value),
            Rule::MinChars(min, _) => value.chars().count() >= *min,
            Rule::MaxChars(max, _) => value.chars().count() <= *max,
            // A pattern-matched digit string that does not parse is too large,
            // so it clears every lower bound and fails `AtMost`.
            Rule::GreaterThan(bound, _) => decimal::parse(value).is_none_or(|v| v > bound.value()),
            Rule::AtLeast(bound, _) => decimal::parse(value).is_none_or(|v| v >= bound.value()),
            Rule::AtMost(bound, _) => decimal::parse(value).is_some_and(|v| v <= bound.value()),
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Rule::OneOf(_, m)
            | Rule::Matches(_, m)
            | Rule::MinChars(_, m)
            | Rule::MaxChars(_, m)
            | Rule::GreaterThan(_, m)
            | Rule::AtLeast(_, m)
            | Rule::AtMost(_, m) => m,
        }
    }
}

#[derive(Debug)]
struct FieldSchema {
    field: Field,
    normalize: Normalize,
    presence: Presence,
    required_message: &'static str,
    rules: &'static [Rule],
}

impl FieldSchema {
    fn check(&self, value: Option<&str>, mode: ValidationMode) -> Result<Option<String>, FieldError> {
        let normalized = match self.normalize {
            Normalize::Verbatim => value.unwrap_or_default().to_string(),
            Normalize::Trim => value.unwrap_or_default().trim().to_string(),
            Normalize::TitleCase => normalize_name(value.unwrap_or_default()),
        };

        if normalized.is_empty() {
            return if self.presence.required(mode) {
                Err(FieldError::new(self.field, self.required_message))
            } else {
                Ok(None)
            };
        }

        match self.rules.iter().find(|rule| !rule.passes(&normalized)) {
            Some(rule) => Err(FieldError::new(self.field, rule.message())),
            None => Ok(Some(normalized)),
        }
    }
}

static SCHEMA: [FieldSchema; 5] = [
    FieldSchema {
        field: Field::Category,
        normalize: Normalize::Verbatim,
        presence: Presence::Always,
        required_message: "Category is required",
        rules: &[Rule::OneOf(&CATEGORY_NAMES, "Please select a valid category")],
    },
    FieldSchema {
        field: Field::Metric,
        normalize: Normalize::Verbatim,
        presence: Presence::Always,
        required_message: "Metric is Required",
        rules: &[Rule::OneOf(&METRIC_NAMES, "Please select a valid unit")],
    },
    FieldSchema {
        field: Field::ItemName,
        normalize: Normalize::TitleCase,
        presence: Presence::Always,
        required_message: "Item name is required",
        rules: &[
            Rule::Matches(&NAME_PATTERN, "Item name must contain only letters and spaces"),
            Rule::MinChars(2, "Item name must be at least 2 characters"),
            Rule::MaxChars(30, "Item name cannot exceed 30 characters"),
        ],
    },
    FieldSchema {
        field: Field::ItemQuantity,
        normalize: Normalize::Trim,
        presence: Presence::OnCommit,
        required_message: "Quantity is required",
        rules: &[
            Rule::Matches(
                &AMOUNT_PATTERN,
                "Quantity must be a positive number with up to 2 decimal places",
            ),
            Rule::GreaterThan(Bound::new(0, 0), "Quantity must be greater than 0"),
            Rule::AtMost(Bound::new(99_999, 2), "Quantity cannot exceed 999.99"),
        ],
    },
    FieldSchema {
        field: Field::Rate,
        normalize: Normalize::Trim,
        presence: Presence::OnTransfer,
        required_message: "Rate is required",
        rules: &[
            Rule::Matches(&AMOUNT_PATTERN, "Rate must be a number with up to 2 decimal places"),
            Rule::AtLeast(Bound::new(0, 0), "Rate cannot be negative"),
            Rule::AtMost(Bound::new(9_999_999, 2), "Rate cannot exceed ₹99,999.99"),
        ],
    },
];

fn schema_for(field: Field) -> &'static FieldSchema {
    match field {
        Field::Category => &SCHEMA[0],
        Field::Metric => &SCHEMA[1],
        Field::ItemName => &SCHEMA[2],
        Field::ItemQuantity => &SCHEMA[3],
        Field::Rate => &SCHEMA[4],
    }
}
