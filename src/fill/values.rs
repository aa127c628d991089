//! Synthetic values keyed on field type and field name.

use super::fake_data::{format_date, FakeData};
use crate::fields::FieldType;
use crate::record::FieldRecord;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

/// Value used for choice fields without options.
pub const DEFAULT_CHOICE: &str = "Option 1";

/// Date used for date-like fields when no fake-data source is available.
pub const FALLBACK_DATE: &str = "01/01/2025";

/// A generated value for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Checked or unchecked (buttons)
    Checked(bool),
    /// Text (text, choice and everything else)
    Text(String),
}

impl FieldValue {
    /// Text form of the value, as a viewer would show it.
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Checked(true) => "Yes".to_string(),
            FieldValue::Checked(false) => "Off".to_string(),
            FieldValue::Text(text) => text.clone(),
        }
    }
}

/// Generate a plausible value for a field.
///
/// The decision is made on the field type first, then on substrings of the
/// lower-cased key:
///
/// | key contains                   | value                          |
/// |--------------------------------|--------------------------------|
/// | `date` `day` `month` `year`    | date this year, `MM/DD/YYYY`   |
/// | `name` `seller` `buyer`        | person name                    |
/// | `zip` / `city` / `state`       | postal code / city / state     |
/// | `address`                      | street address on one line     |
/// | `price` `amount` `dollar`      | grouped integer 1,000–1,000,000 |
/// | `phone` `number`               | phone number                   |
/// | `email`                        | email address                  |
/// | `company` `firm`               | company name                   |
/// | anything else                  | three-word phrase              |
///
/// Without a fake-data source, date-like keys containing `date` get
/// [`FALLBACK_DATE`] and everything else gets `Dummy <child>`.
pub fn synthesize_value(
    field: &FieldRecord,
    rng: &mut dyn RngCore,
    fake: Option<&dyn FakeData>,
    checked_probability: f64,
) -> FieldValue {
    match field.field_type {
        FieldType::Button => return FieldValue::Checked(rng.gen_bool(checked_probability.clamp(0.0, 1.0))),
        FieldType::Choice => {
            let choice = field
                .choice_list()
                .choose(rng)
                .cloned()
                .unwrap_or_else(|| DEFAULT_CHOICE.to_string());
            return FieldValue::Text(choice);
        },
        _ => {},
    }

    let key = field.key.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| key.contains(n));

    let Some(fake) = fake else {
        if key.contains("date") {
            return FieldValue::Text(FALLBACK_DATE.to_string());
        }
        return FieldValue::Text(format!("Dummy {}", field.child));
    };

    let text = if has(&["date", "day", "month", "year"]) {
        format_date(fake.date_this_year(rng))
    } else if has(&["name", "seller", "buyer"]) {
        fake.name(rng)
    } else if has(&["address", "city", "zip", "state"]) {
        if key.contains("zip") {
            fake.zip_code(rng)
        } else if key.contains("city") {
            fake.city(rng)
        } else if key.contains("state") {
            fake.state(rng)
        } else {
            fake.address(rng).replace('\n', ", ")
        }
    } else if has(&["price", "amount", "dollar"]) {
        group_thousands(rng.gen_range(1_000..=1_000_000))
    } else if has(&["phone", "number"]) {
        fake.phone_number(rng)
    } else if key.contains("email") {
        fake.email(rng)
    } else if has(&["company", "firm"]) {
        fake.company(rng)
    } else {
        fake.sentence(rng, 3).trim_end_matches('.').to_string()
    };

    FieldValue::Text(text)
}

/// Format an integer with `,` between groups of three digits.
///
/// # Examples
///
/// ```
/// use pdf_formkit::fill::group_thousands;
///
/// assert_eq!(group_thousands(1000), "1,000");
/// assert_eq!(group_thousands(1_000_000), "1,000,000");
/// assert_eq!(group_thousands(999), "999");
/// ```
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
