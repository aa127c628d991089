//! Realistic fake values for text fields.
//!
//! [`FakeData`] is the pluggable generator used by value synthesis. With the
//! `fake-data` feature (on by default) [`FakerSource`] provides English
//! names, addresses and the like from the `fake` crate. Without a generator
//! the filler falls back to fixed placeholders.

use chrono::{Datelike, Duration, Local, NaiveDate};
use rand::{Rng, RngCore};

/// Date format written into date-like fields.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// A source of realistic values for text fields.
///
/// All methods take the caller's RNG so that a seeded RNG gives repeatable
/// output.
pub trait FakeData {
    /// A person's full name.
    fn name(&self, rng: &mut dyn RngCore) -> String;

    /// A postal code.
    fn zip_code(&self, rng: &mut dyn RngCore) -> String;

    /// A city name.
    fn city(&self, rng: &mut dyn RngCore) -> String;

    /// A state name.
    fn state(&self, rng: &mut dyn RngCore) -> String;

    /// A full street address. May contain newlines.
    fn address(&self, rng: &mut dyn RngCore) -> String;

    /// A phone number.
    fn phone_number(&self, rng: &mut dyn RngCore) -> String;

    /// An email address.
    fn email(&self, rng: &mut dyn RngCore) -> String;

    /// A company name.
    fn company(&self, rng: &mut dyn RngCore) -> String;

    /// A short sentence of `words` words, without trailing period.
    fn sentence(&self, rng: &mut dyn RngCore, words: usize) -> String;

    /// A date between January 1st of the current year and today.
    fn date_this_year(&self, rng: &mut dyn RngCore) -> NaiveDate {
        date_this_year(rng, Local::now().date_naive())
    }
}

/// Uniform date between January 1st of `today`'s year and `today`.
pub fn date_this_year(rng: &mut dyn RngCore, today: NaiveDate) -> NaiveDate {
    let elapsed = i64::from(today.ordinal0());
    let offset = rng.gen_range(0..=elapsed);
    today - Duration::days(elapsed - offset)
}

#[cfg(feature = "fake-data")]
pub use faker::FakerSource;

#[cfg(feature = "fake-data")]
mod faker {
    use super::FakeData;
    use fake::faker::address::en::{
        BuildingNumber, CityName, SecondaryAddress, StateAbbr, StateName, StreetName, StreetSuffix, ZipCode,
    };
    use fake::faker::company::en::CompanyName;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::lorem::en::Words;
    use fake::faker::name::en::Name;
    use fake::faker::phone_number::en::PhoneNumber;
    use fake::Fake;
    use rand::{Rng, RngCore};

    /// English fake data from the `fake` crate.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct FakerSource;

    impl FakerSource {
        /// Create the generator.
        pub fn new() -> Self {
            Self
        }
    }

    impl FakeData for FakerSource {
        fn name(&self, mut rng: &mut dyn RngCore) -> String {
            Name().fake_with_rng(&mut rng)
        }

        fn zip_code(&self, mut rng: &mut dyn RngCore) -> String {
            ZipCode().fake_with_rng(&mut rng)
        }

        fn city(&self, mut rng: &mut dyn RngCore) -> String {
            CityName().fake_with_rng(&mut rng)
        }

        fn state(&self, mut rng: &mut dyn RngCore) -> String {
            StateName().fake_with_rng(&mut rng)
        }

        fn address(&self, mut rng: &mut dyn RngCore) -> String {
            let number: String = BuildingNumber().fake_with_rng(&mut rng);
            let street: String = StreetName().fake_with_rng(&mut rng);
            let suffix: String = StreetSuffix().fake_with_rng(&mut rng);
            let city: String = CityName().fake_with_rng(&mut rng);
            let state: String = StateAbbr().fake_with_rng(&mut rng);
            let zip: String = ZipCode().fake_with_rng(&mut rng);

            let mut first_line = format!("{} {} {}", number, street, suffix);
            if rng.gen_bool(0.3) {
                let unit: String = SecondaryAddress().fake_with_rng(&mut rng);
                first_line = format!("{} {}", first_line, unit);
            }
            format!("{}\n{}, {} {}", first_line, city, state, zip)
        }

        fn phone_number(&self, mut rng: &mut dyn RngCore) -> String {
            PhoneNumber().fake_with_rng(&mut rng)
        }

        fn email(&self, mut rng: &mut dyn RngCore) -> String {
            SafeEmail().fake_with_rng(&mut rng)
        }

        fn company(&self, mut rng: &mut dyn RngCore) -> String {
            CompanyName().fake_with_rng(&mut rng)
        }

        fn sentence(&self, mut rng: &mut dyn RngCore, words: usize) -> String {
            let words: Vec<String> = Words(words..words + 1).fake_with_rng(&mut rng);
            capitalize(&words.join(" "))
        }
    }

    fn capitalize(text: &str) -> String {
        let mut chars = text.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

}

/// Render a date the way date fields are filled.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
