//! Dynamic variables
//!
//! Names prefixed with `$` produce a fresh value on every occurrence. A few
//! generators read optional constraints from a [`GeneratorConfigMap`] that
//! the caller passes in; without an entry they fall back to built-in ranges.

use std::collections::BTreeMap;

use chrono::{Duration, SecondsFormat, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while generating a dynamic value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubstitutionError {
    /// The name is not in the catalogue.
    #[error("unknown dynamic variable: {0}")]
    Unknown(String),

    /// The generator could not produce a value with its configuration.
    #[error("generator for {name} failed: {reason}")]
    GeneratorFailed {
        /// Variable name including `$`.
        name: String,
        /// What went wrong.
        reason: String,
    },
}

/// Result type alias for dynamic value generation.
pub type SubstitutionResult<T> = Result<T, SubstitutionError>;

/// Optional constraints for a single generator.
///
/// Numeric generators read `minValue`/`maxValue`; the password and username
/// generators read the length and character-class fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    /// Minimum length of the generated string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Maximum length of the generated string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Lower numeric bound, inclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    /// Upper numeric bound, inclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    /// Required uppercase letters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_uppercase: Option<usize>,
    /// Required lowercase letters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_lowercase: Option<usize>,
    /// Required digits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_digits: Option<usize>,
    /// Required special characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_special: Option<usize>,
}

impl GeneratorConfig {
    /// Creates a config with a numeric range.
    #[must_use]
    pub const fn range(min_value: f64, max_value: f64) -> Self {
        Self {
            min_length: None,
            max_length: None,
            min_value: Some(min_value),
            max_value: Some(max_value),
            min_uppercase: None,
            min_lowercase: None,
            min_digits: None,
            min_special: None,
        }
    }

    /// Creates a config with a length range.
    #[must_use]
    pub fn length(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length: Some(min_length),
            max_length: Some(max_length),
            ..Self::default()
        }
    }
}

/// Generator constraints keyed by variable name.
///
/// Keys may be written with or without the leading `$`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratorConfigMap(BTreeMap<String, GeneratorConfig>);

impl GeneratorConfigMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the config for a variable.
    #[must_use]
    pub fn with(mut self, name: &str, config: GeneratorConfig) -> Self {
        self.insert(name, config);
        self
    }

    /// Adds or replaces the config for a variable.
    pub fn insert(&mut self, name: &str, config: GeneratorConfig) {
        self.0
            .insert(name.trim_start_matches('$').to_string(), config);
    }

    /// Looks up the config for a variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&GeneratorConfig> {
        let bare = name.trim_start_matches('$');
        self.0
            .get(bare)
            .or_else(|| self.0.get(&format!("${bare}")))
    }

    /// Returns true if no variable has a config.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Catalogue entry for a dynamic variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicInfo {
    /// Variable name including `$`.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Example output.
    pub example: &'static str,
}

const fn info(
    name: &'static str,
    description: &'static str,
    example: &'static str,
) -> DynamicInfo {
    DynamicInfo {
        name,
        description,
        example,
    }
}

const CATALOGUE: &[DynamicInfo] = &[
    info("$randomFirstName", "Random first name", "Olivia"),
    info("$randomLastName", "Random last name", "Garcia"),
    info("$randomFullName", "Random first and last name", "Olivia Garcia"),
    info("$randomUserName", "Random user name", "olivia_garcia"),
    info("$randomEmail", "Random email address", "olivia.garcia@example.com"),
    info("$randomUrl", "Random URL", "https://bright-harbor.net"),
    info("$randomIP", "Random IPv4 address", "192.168.14.7"),
    info("$randomIPv6", "Random IPv6 address", "2001:0db8:85a3:0000:0000:8a2e:0370:7334"),
    info("$randomPassword", "Random password", "q7Rb2kXpL9ma"),
    info("$randomDomainName", "Random domain name", "silver-river.com"),
    info("$randomInt", "Random integer (default 1-1000)", "427"),
    info("$randomFloat", "Random decimal (default 1-1000)", "318.42"),
    info("$randomPhoneNumber", "Random phone number", "555-201-8841"),
    info("$timestamp", "Unix time in milliseconds", "1706284800000"),
    info("$isoTimestamp", "Current time, ISO 8601 UTC", "2024-01-26T12:00:00.000Z"),
    info("$randomDate", "Date within the last week", "2024-01-22T08:14:09.311Z"),
    info("$randomFutureDate", "Date within the next year", "2024-09-03T17:40:51.002Z"),
    info("$randomPastDate", "Date within the last year", "2023-05-11T02:09:33.870Z"),
    info("$randomWord", "Random word", "harbor"),
    info("$randomWords", "Three random words", "amber quiet harbor"),
    info("$randomSentence", "Random sentence", "Quiet rivers carry amber light."),
    info("$randomParagraph", "Random paragraph", "Quiet rivers carry amber light. ..."),
    info("$randomUUID", "Random UUID v4", "550e8400-e29b-41d4-a716-446655440000"),
    info("$guid", "Random UUID v4", "550e8400-e29b-41d4-a716-446655440000"),
    info("$randomHexColor", "Random hex color", "#3fa2c9"),
    info("$randomRgbColor", "Random RGB color", "rgb(63, 162, 201)"),
    info("$randomBoolean", "Random boolean", "true"),
    info("$randomCity", "Random city", "Lisbon"),
    info("$randomCountry", "Random country", "Portugal"),
    info("$randomLatitude", "Random latitude", "38.7223"),
    info("$randomLongitude", "Random longitude", "-9.1393"),
    info("$randomZipCode", "Random ZIP code", "90210"),
    info("$randomCompanyName", "Random company name", "Northwind Labs"),
    info("$randomJobTitle", "Random job title", "Senior Data Engineer"),
    info("$randomPrice", "Random price", "129.00"),
    info("$randomProduct", "Random product name", "Chair"),
];

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "John", "Patricia", "Robert", "Jennifer", "Michael", "Linda", "William",
    "Elizabeth", "David", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Charles", "Karen", "Emma", "Olivia", "Liam", "Noah", "Ava",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson",
];

const WORDS: &[&str] = &[
    "amber", "anchor", "bright", "canyon", "cedar", "copper", "delta", "ember", "falcon",
    "forest", "granite", "harbor", "island", "jasper", "lantern", "meadow", "nimble", "orbit",
    "pepper", "quiet", "river", "silver", "summit", "timber", "velvet", "willow",
];

const TLDS: &[&str] = &["com", "net", "org", "io", "dev"];

const CITIES: &[&str] = &[
    "Lisbon", "Madrid", "Berlin", "Oslo", "Toronto", "Denver", "Austin", "Osaka", "Sydney",
    "Nairobi", "Lima", "Bogota", "Prague", "Dublin",
];

const COUNTRIES: &[&str] = &[
    "Portugal", "Spain", "Germany", "Norway", "Canada", "United States", "Japan", "Australia",
    "Kenya", "Peru", "Colombia", "Czechia", "Ireland",
];

const COMPANY_SUFFIXES: &[&str] = &["Labs", "Group", "Systems", "Holdings", "and Sons", "Inc"];

const JOB_LEVELS: &[&str] = &["Junior", "Senior", "Lead", "Principal", "Chief"];

const JOB_AREAS: &[&str] = &["Data", "Product", "Security", "Marketing", "Infrastructure"];

const JOB_ROLES: &[&str] = &["Engineer", "Analyst", "Designer", "Manager", "Architect"];

const PRODUCTS: &[&str] = &[
    "Chair", "Table", "Keyboard", "Shoes", "Gloves", "Lamp", "Bike", "Towels", "Computer",
    "Hat", "Pizza", "Salad",
];

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"!@#$%^&*()-_=+[]{};:,.?";

/// Longest string the password and user name generators produce.
pub const MAX_GENERATED_LENGTH: usize = 4096;

/// Generates values for dynamic variables.
pub struct DynamicVariables;

impl DynamicVariables {
    /// Generates a fresh value for `name` (including the `$`).
    ///
    /// # Errors
    ///
    /// - `Unknown` if the name is not in the catalogue
    /// - `GeneratorFailed` if the configured constraints cannot be met
    pub fn generate(name: &str, configs: &GeneratorConfigMap) -> SubstitutionResult<String> {
        let config = configs.get(name);
        let value = match name {
            "$randomFirstName" => pick(FIRST_NAMES).to_string(),
            "$randomLastName" => pick(LAST_NAMES).to_string(),
            "$randomFullName" => format!("{} {}", pick(FIRST_NAMES), pick(LAST_NAMES)),
            "$randomUserName" => random_user_name(name, config)?,
            "$randomEmail" => random_email(),
            "$randomUrl" => format!("https://{}", random_domain()),
            "$randomIP" => random_ipv4(),
            "$randomIPv6" => random_ipv6(),
            "$randomPassword" => random_password(name, config)?,
            "$randomDomainName" => random_domain(),
            "$randomInt" => random_int(name, config)?.to_string(),
            "$randomFloat" => format!("{:.2}", random_float(name, config)?),
            "$randomPhoneNumber" => random_phone_number(),
            "$timestamp" => Utc::now().timestamp_millis().to_string(),
            "$isoTimestamp" => iso(Utc::now()),
            "$randomDate" => iso(Utc::now() - random_seconds(7 * 24 * 3600)),
            "$randomFutureDate" => iso(Utc::now() + random_seconds(365 * 24 * 3600)),
            "$randomPastDate" => iso(Utc::now() - random_seconds(365 * 24 * 3600)),
            "$randomWord" => pick(WORDS).to_string(),
            "$randomWords" => random_words(3),
            "$randomSentence" => random_sentence(),
            "$randomParagraph" => {
                let count = rand::rng().random_range(3..=5);
                (0..count).map(|_| random_sentence()).collect::<Vec<_>>().join(" ")
            }
            "$randomUUID" | "$guid" => Uuid::new_v4().to_string(),
            "$randomHexColor" => {
                let [r, g, b] = random_rgb();
                format!("#{r:02x}{g:02x}{b:02x}")
            }
            "$randomRgbColor" => {
                let [r, g, b] = random_rgb();
                format!("rgb({r}, {g}, {b})")
            }
            "$randomBoolean" => rand::rng().random_bool(0.5).to_string(),
            "$randomCity" => pick(CITIES).to_string(),
            "$randomCountry" => pick(COUNTRIES).to_string(),
            "$randomLatitude" => format!("{:.4}", rand::rng().random_range(-90.0_f64..=90.0)),
            "$randomLongitude" => format!("{:.4}", rand::rng().random_range(-180.0_f64..=180.0)),
            "$randomZipCode" => format!("{:05}", rand::rng().random_range(501..=99_950)),
            "$randomCompanyName" => format!("{} {}", pick(LAST_NAMES), pick(COMPANY_SUFFIXES)),
            "$randomJobTitle" => {
                format!("{} {} {}", pick(JOB_LEVELS), pick(JOB_AREAS), pick(JOB_ROLES))
            }
            "$randomPrice" => format!("{:.2}", random_price(name, config)?),
            "$randomProduct" => pick(PRODUCTS).to_string(),
            _ => return Err(SubstitutionError::Unknown(name.to_string())),
        };
        Ok(value)
    }

    /// Returns whether the name is in the catalogue.
    #[must_use]
    pub fn is_dynamic(name: &str) -> bool {
        CATALOGUE.iter().any(|info| info.name == name)
    }

    /// Returns the catalogue with descriptions.
    #[must_use]
    pub const fn available() -> &'static [DynamicInfo] {
        CATALOGUE
    }
}

/// Names of every dynamic variable, for suggestions.
#[must_use]
pub fn dynamic_variable_names() -> Vec<&'static str> {
    CATALOGUE.iter().map(|info| info.name).collect()
}

fn failed(name: &str, reason: impl Into<String>) -> SubstitutionError {
    SubstitutionError::GeneratorFailed {
        name: name.to_string(),
        reason: reason.into(),
    }
}

fn pick(items: &'static [&'static str]) -> &'static str {
    items[rand::rng().random_range(0..items.len())]
}

fn iso(at: chrono::DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn random_seconds(max: i64) -> Duration {
    Duration::seconds(rand::rng().random_range(1..=max))
}

fn random_rgb() -> [u8; 3] {
    let mut rng = rand::rng();
    [rng.random(), rng.random(), rng.random()]
}

/// Resolves the configured numeric range, swapping inverted bounds.
fn value_range(config: Option<&GeneratorConfig>, default: (f64, f64)) -> (f64, f64) {
    let min = config.and_then(|c| c.min_value).unwrap_or(default.0);
    let max = config.and_then(|c| c.max_value).unwrap_or(default.1);
    if min > max { (max, min) } else { (min, max) }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn random_int(name: &str, config: Option<&GeneratorConfig>) -> SubstitutionResult<i64> {
    let (min, max) = value_range(config, (1.0, 1000.0));
    let (low, high) = (min.ceil(), max.floor());
    if !low.is_finite() || !high.is_finite() || low > high {
        return Err(failed(name, format!("no integer between {min} and {max}")));
    }
    if low < i64::MIN as f64 || high > i64::MAX as f64 {
        return Err(failed(name, "range exceeds 64-bit integers"));
    }
    Ok(rand::rng().random_range(low as i64..=high as i64))
}

fn random_float(name: &str, config: Option<&GeneratorConfig>) -> SubstitutionResult<f64> {
    let (min, max) = value_range(config, (1.0, 1000.0));
    if !min.is_finite() || !max.is_finite() || !(max - min).is_finite() {
        return Err(failed(name, "range must be finite"));
    }
    if (max - min).abs() < f64::EPSILON {
        return Ok(min);
    }
    Ok(rand::rng().random_range(min..=max))
}

fn random_price(name: &str, config: Option<&GeneratorConfig>) -> SubstitutionResult<f64> {
    let cents = random_float(name, config)? * 100.0;
    Ok(cents.round() / 100.0)
}

/// Resolves the configured length range, swapping inverted bounds.
fn length_range(config: Option<&GeneratorConfig>, default: (usize, usize)) -> (usize, usize) {
    let min = config.and_then(|c| c.min_length).unwrap_or(default.0);
    let max = config.and_then(|c| c.max_length).unwrap_or(default.1);
    if min > max { (max, min) } else { (min, max) }
}

fn check_length(name: &str, length: usize) -> SubstitutionResult<()> {
    if length > MAX_GENERATED_LENGTH {
        return Err(failed(
            name,
            format!("length {length} exceeds {MAX_GENERATED_LENGTH}"),
        ));
    }
    Ok(())
}

fn random_password(name: &str, config: Option<&GeneratorConfig>) -> SubstitutionResult<String> {
    let (min_len, max_len) = length_range(config, (12, 16));
    let classes: [(&[u8], usize); 4] = [
        (UPPERCASE, config.and_then(|c| c.min_uppercase).unwrap_or(1)),
        (LOWERCASE, config.and_then(|c| c.min_lowercase).unwrap_or(1)),
        (DIGITS, config.and_then(|c| c.min_digits).unwrap_or(1)),
        (SPECIAL, config.and_then(|c| c.min_special).unwrap_or(0)),
    ];
    check_length(name, max_len)?;
    let required = classes
        .iter()
        .try_fold(0_usize, |sum, (_, n)| sum.checked_add(*n))
        .ok_or_else(|| failed(name, "character class minimums overflow"))?;
    check_length(name, required)?;

    let mut rng = rand::rng();
    let length = rng.random_range(min_len..=max_len).max(required);
    if length == 0 {
        return Err(failed(name, "password length must be positive"));
    }

    let mut pool: Vec<u8> = [UPPERCASE, LOWERCASE, DIGITS].concat();
    if classes[3].1 > 0 {
        pool.extend_from_slice(SPECIAL);
    }

    let mut chars: Vec<u8> = Vec::with_capacity(length);
    for (charset, count) in classes {
        chars.extend((0..count).map(|_| charset[rng.random_range(0..charset.len())]));
    }
    while chars.len() < length {
        chars.push(pool[rng.random_range(0..pool.len())]);
    }
    chars.shuffle(&mut rng);

    Ok(chars.into_iter().map(char::from).collect())
}

fn random_user_name(name: &str, config: Option<&GeneratorConfig>) -> SubstitutionResult<String> {
    let (min_len, max_len) = length_range(config, (4, 16));
    check_length(name, max_len)?;
    if max_len == 0 {
        return Err(failed(name, "user name length must be positive"));
    }

    let mut rng = rand::rng();
    let first = pick(FIRST_NAMES).to_lowercase();
    let last = pick(LAST_NAMES).to_lowercase();
    let mut user = match rng.random_range(0..5) {
        0 => format!("{first}{}", rng.random_range(1..=999)),
        1 => format!("{first}_{last}"),
        2 => format!("{}{last}{}", &first[..1], rng.random_range(1..=99)),
        3 => format!("{}{}", pick(WORDS), rng.random_range(1..=999)),
        _ => format!("{}_{}", pick(WORDS), pick(WORDS)),
    };

    user.truncate(max_len);
    while user.len() < min_len {
        user.push(char::from(DIGITS[rng.random_range(0..DIGITS.len())]));
    }
    Ok(user)
}

fn random_email() -> String {
    let mut rng = rand::rng();
    let first = pick(FIRST_NAMES).to_lowercase();
    let last = pick(LAST_NAMES).to_lowercase();
    let domain = pick(&["example.com", "example.net", "example.org"]);
    match rng.random_range(0..3) {
        0 => format!("{first}.{last}@{domain}"),
        1 => format!("{first}{}@{domain}", rng.random_range(1..=99)),
        _ => format!("{}{last}@{domain}", &first[..1]),
    }
}

fn random_domain() -> String {
    format!("{}-{}.{}", pick(WORDS), pick(WORDS), pick(TLDS))
}

fn random_ipv4() -> String {
    let mut rng = rand::rng();
    let octets: [u8; 4] = [
        rng.random_range(1..=254),
        rng.random(),
        rng.random(),
        rng.random_range(1..=254),
    ];
    octets.map(|o| o.to_string()).join(".")
}

fn random_ipv6() -> String {
    let mut rng = rand::rng();
    (0..8)
        .map(|_| format!("{:04x}", rng.random::<u16>()))
        .collect::<Vec<_>>()
        .join(":")
}

fn random_phone_number() -> String {
    let mut rng = rand::rng();
    format!(
        "{}-{:03}-{:04}",
        rng.random_range(200..=999),
        rng.random_range(0..=999),
        rng.random_range(0..=9999)
    )
}

fn random_words(count: usize) -> String {
    (0..count).map(|_| pick(WORDS)).collect::<Vec<_>>().join(" ")
}

fn random_sentence() -> String {
    let count = rand::rng().random_range(4..=9);
    let mut sentence = random_words(count);
    if let Some(first) = sentence.get_mut(..1) {
        first.make_ascii_uppercase();
    }
    sentence.push('.');
    sentence
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn generate(name: &str) -> String {
        DynamicVariables::generate(name, &GeneratorConfigMap::new()).unwrap()
    }

    #[test]
    fn test_every_catalogue_entry_generates() {
        for info in DynamicVariables::available() {
            let value = generate(info.name);
            assert!(!value.is_empty(), "{} produced nothing", info.name);
        }
    }

    #[test]
    fn test_unknown_name() {
        let result = DynamicVariables::generate("$nope", &GeneratorConfigMap::new());
        assert_eq!(result, Err(SubstitutionError::Unknown("$nope".to_string())));
        assert!(!DynamicVariables::is_dynamic("$nope"));
    }

    #[test]
    fn test_random_int_default_range() {
        for _ in 0..200 {
            let value: i64 = generate("$randomInt").parse().unwrap();
            assert!((1..=1000).contains(&value));
        }
    }

    #[test]
    fn test_random_int_fixed_range() {
        let configs = GeneratorConfigMap::new().with("randomInt", GeneratorConfig::range(5.0, 5.0));
        for _ in 0..20 {
            assert_eq!(DynamicVariables::generate("$randomInt", &configs).unwrap(), "5");
        }
    }

    #[test]
    fn test_inverted_range_is_swapped() {
        let configs =
            GeneratorConfigMap::new().with("$randomInt", GeneratorConfig::range(10.0, 8.0));
        for _ in 0..50 {
            let value: i64 = DynamicVariables::generate("$randomInt", &configs)
                .unwrap()
                .parse()
                .unwrap();
            assert!((8..=10).contains(&value));
        }
    }

    #[test]
    fn test_empty_integer_range_fails() {
        let configs = GeneratorConfigMap::new().with("randomInt", GeneratorConfig::range(5.2, 5.8));
        let result = DynamicVariables::generate("$randomInt", &configs);
        assert!(matches!(result, Err(SubstitutionError::GeneratorFailed { .. })));
    }

    #[test]
    fn test_unbounded_float_range_fails() {
        for name in ["$randomFloat", "$randomPrice"] {
            let configs =
                GeneratorConfigMap::new().with(name, GeneratorConfig::range(-1e308, 1e308));
            let result = DynamicVariables::generate(name, &configs);
            assert!(matches!(result, Err(SubstitutionError::GeneratorFailed { .. })), "{name}");
        }
    }

    #[test]
    fn test_oversized_lengths_fail() {
        for name in ["$randomPassword", "$randomUserName"] {
            let configs =
                GeneratorConfigMap::new().with(name, GeneratorConfig::length(usize::MAX, usize::MAX));
            let result = DynamicVariables::generate(name, &configs);
            assert!(matches!(result, Err(SubstitutionError::GeneratorFailed { .. })), "{name}");
        }
    }

    #[test]
    fn test_class_minimums_that_overflow_fail() {
        let config = GeneratorConfig {
            min_uppercase: Some(usize::MAX),
            min_digits: Some(usize::MAX),
            ..GeneratorConfig::length(8, 8)
        };
        let configs = GeneratorConfigMap::new().with("randomPassword", config);
        let result = DynamicVariables::generate("$randomPassword", &configs);
        assert!(matches!(result, Err(SubstitutionError::GeneratorFailed { .. })));

        let config = GeneratorConfig {
            min_special: Some(MAX_GENERATED_LENGTH + 1),
            ..GeneratorConfig::length(8, 8)
        };
        let configs = GeneratorConfigMap::new().with("randomPassword", config);
        let result = DynamicVariables::generate("$randomPassword", &configs);
        assert!(matches!(result, Err(SubstitutionError::GeneratorFailed { .. })));
    }

    #[test]
    fn test_password_meets_class_minimums() {
        let config = GeneratorConfig {
            min_uppercase: Some(3),
            min_digits: Some(4),
            min_special: Some(2),
            ..GeneratorConfig::length(10, 10)
        };
        let configs = GeneratorConfigMap::new().with("randomPassword", config);

        for _ in 0..50 {
            let password = DynamicVariables::generate("$randomPassword", &configs).unwrap();
            assert_eq!(password.len(), 10);
            assert!(password.chars().filter(char::is_ascii_uppercase).count() >= 3);
            assert!(password.chars().filter(char::is_ascii_digit).count() >= 4);
            assert!(password.bytes().filter(|b| SPECIAL.contains(b)).count() >= 2);
        }
    }

    #[test]
    fn test_password_minimums_raise_length() {
        let config = GeneratorConfig {
            min_uppercase: Some(4),
            min_lowercase: Some(4),
            min_digits: Some(4),
            ..GeneratorConfig::length(2, 6)
        };
        let configs = GeneratorConfigMap::new().with("randomPassword", config);
        let password = DynamicVariables::generate("$randomPassword", &configs).unwrap();
        assert_eq!(password.len(), 12);
    }

    #[test]
    fn test_password_zero_length_fails() {
        let config = GeneratorConfig {
            min_uppercase: Some(0),
            min_lowercase: Some(0),
            min_digits: Some(0),
            ..GeneratorConfig::length(0, 0)
        };
        let configs = GeneratorConfigMap::new().with("randomPassword", config);
        assert!(DynamicVariables::generate("$randomPassword", &configs).is_err());
    }

    #[test]
    fn test_user_name_respects_length() {
        let configs = GeneratorConfigMap::new().with("randomUserName", GeneratorConfig::length(6, 8));
        for _ in 0..100 {
            let user = DynamicVariables::generate("$randomUserName", &configs).unwrap();
            assert!((6..=8).contains(&user.len()), "{user}");
        }
    }

    #[test]
    fn test_config_lookup_ignores_dollar() {
        let configs = GeneratorConfigMap::new().with("$randomInt", GeneratorConfig::range(1.0, 2.0));
        assert!(configs.get("randomInt").is_some());
        assert!(configs.get("$randomInt").is_some());
        assert!(configs.get("randomFloat").is_none());
    }

    #[test]
    fn test_config_map_deserializes_from_json() {
        let configs: GeneratorConfigMap = serde_json::from_str(
            r#"{"randomPassword": {"minLength": 20, "maxLength": 24, "minSpecial": 1}}"#,
        )
        .unwrap();
        let config = configs.get("$randomPassword").unwrap();
        assert_eq!(config.min_length, Some(20));
        assert_eq!(config.min_special, Some(1));
        assert_eq!(config.min_uppercase, None);
    }

    #[test]
    fn test_guid_is_uuid() {
        assert!(Uuid::parse_str(&generate("$guid")).is_ok());
    }

    #[test]
    fn test_iso_timestamp_is_utc() {
        assert!(generate("$isoTimestamp").ends_with('Z'));
    }

    #[test]
    fn test_names_list_matches_catalogue() {
        let names = dynamic_variable_names();
        assert_eq!(names.len(), DynamicVariables::available().len());
        assert!(names.contains(&"$randomEmail"));
    }
}
