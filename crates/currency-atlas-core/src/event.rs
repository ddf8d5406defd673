//! The currency-reform event record and its composite key.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// The fixed set of reform categories an event can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReformType {
    /// A brand new currency replaces the old one.
    #[serde(rename = "New Currency")]
    NewCurrency,
    /// Zeros are dropped from the existing currency.
    Redenomination,
    /// Move to a base-10 subdivision.
    Decimalization,
    /// Official lowering of the exchange rate.
    Devaluation,
    /// Official raising of the exchange rate.
    Revaluation,
    /// Adoption of the euro.
    #[serde(rename = "Join Euro")]
    JoinEuro,
    /// Abandonment of the euro.
    #[serde(rename = "Leave Euro")]
    LeaveEuro,
    /// Adoption of the US dollar.
    Dollarization,
    /// Abandonment of the US dollar.
    #[serde(rename = "De-Dollarization")]
    DeDollarization,
    /// Change of the anchor or rate of a peg.
    #[serde(rename = "Peg Change")]
    PegChange,
    /// Introduction of a currency board.
    #[serde(rename = "Currency Board")]
    CurrencyBoard,
    /// Entry into a monetary union.
    #[serde(rename = "Monetary Union")]
    MonetaryUnion,
    /// Exit from a monetary union.
    #[serde(rename = "Exit Union")]
    ExitUnion,
    /// Adoption of the gold standard.
    #[serde(rename = "Gold Standard")]
    GoldStandard,
    /// Abandonment of the gold standard.
    #[serde(rename = "Abandon Gold")]
    AbandonGold,
    /// New banknote series.
    #[serde(rename = "Banknotes Redesign")]
    BanknotesRedesign,
    /// Switch between fixed, floating or managed regimes.
    #[serde(rename = "Exchange Regime Change")]
    ExchangeRegimeChange,
    /// Legal-tender or state cryptocurrency.
    Cryptocurrency,
    /// Reform of the central bank or monetary authority.
    #[serde(rename = "Institution Reform")]
    InstitutionReform,
    /// Anything else.
    Other,
}

impl ReformType {
    /// Every category, in the order editors see them.
    pub const ALL: [ReformType; 20] = [
        Self::NewCurrency,
        Self::Redenomination,
        Self::Decimalization,
        Self::Devaluation,
        Self::Revaluation,
        Self::JoinEuro,
        Self::LeaveEuro,
        Self::Dollarization,
        Self::DeDollarization,
        Self::PegChange,
        Self::CurrencyBoard,
        Self::MonetaryUnion,
        Self::ExitUnion,
        Self::GoldStandard,
        Self::AbandonGold,
        Self::BanknotesRedesign,
        Self::ExchangeRegimeChange,
        Self::Cryptocurrency,
        Self::InstitutionReform,
        Self::Other,
    ];

    /// The wire name of the category.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewCurrency => "New Currency",
            Self::Redenomination => "Redenomination",
            Self::Decimalization => "Decimalization",
            Self::Devaluation => "Devaluation",
            Self::Revaluation => "Revaluation",
            Self::JoinEuro => "Join Euro",
            Self::LeaveEuro => "Leave Euro",
            Self::Dollarization => "Dollarization",
            Self::DeDollarization => "De-Dollarization",
            Self::PegChange => "Peg Change",
            Self::CurrencyBoard => "Currency Board",
            Self::MonetaryUnion => "Monetary Union",
            Self::ExitUnion => "Exit Union",
            Self::GoldStandard => "Gold Standard",
            Self::AbandonGold => "Abandon Gold",
            Self::BanknotesRedesign => "Banknotes Redesign",
            Self::ExchangeRegimeChange => "Exchange Regime Change",
            Self::Cryptocurrency => "Cryptocurrency",
            Self::InstitutionReform => "Institution Reform",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for ReformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known reform category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown reform type: {0}")]
pub struct UnknownReformType(pub String);

impl FromStr for ReformType {
    type Err = UnknownReformType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownReformType(s.to_owned()))
    }
}

/// The category carried by a stored event.
///
/// Writes only ever produce [`EventType::Known`]. Records saved before the
/// category set was fixed may name something else; those decode as
/// [`EventType::Unrecognized`] so they stay visible instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    /// One of the fixed reform categories.
    Known(ReformType),
    /// A category name outside the fixed set, kept verbatim.
    Unrecognized(String),
}

impl EventType {
    /// The wire name of the category.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(reform_type) => reform_type.as_str(),
            Self::Unrecognized(name) => name,
        }
    }

    /// The fixed category, if this is one.
    #[must_use]
    pub fn known(&self) -> Option<ReformType> {
        match self {
            Self::Known(reform_type) => Some(*reform_type),
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<ReformType> for EventType {
    fn from(reform_type: ReformType) -> Self {
        Self::Known(reform_type)
    }
}

impl From<String> for EventType {
    fn from(name: String) -> Self {
        name.parse::<ReformType>()
            .map_or(Self::Unrecognized(name), Self::Known)
    }
}

impl PartialEq<ReformType> for EventType {
    fn eq(&self, other: &ReformType) -> bool {
        self.known() == Some(*other)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(String::deserialize(deserializer)?.into())
    }
}

/// Composite identity of an event: one record per country per year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey {
    /// ISO 3166-1 country code.
    pub country_code: String,
    /// Signed year, negative for BCE.
    pub year: i32,
}

impl EventKey {
    /// Creates a key from its parts.
    #[must_use]
    pub fn new(country_code: impl Into<String>, year: i32) -> Self {
        Self {
            country_code: country_code.into(),
            year,
        }
    }
}

/// Serializes as `<countryCode>:<year>`. The field order is the lookup
/// contract of keyed backends and must not change.
impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.country_code, self.year)
    }
}

/// Returned when a storage field key is not `<countryCode>:<year>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed event key: {0}")]
pub struct MalformedEventKey(pub String);

impl FromStr for EventKey {
    type Err = MalformedEventKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (country_code, year) = s
            .rsplit_once(':')
            .ok_or_else(|| MalformedEventKey(s.to_owned()))?;
        if country_code.is_empty() {
            return Err(MalformedEventKey(s.to_owned()));
        }
        let year = year
            .parse()
            .map_err(|_| MalformedEventKey(s.to_owned()))?;
        Ok(Self::new(country_code, year))
    }
}

/// A currency reform attached to one country in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReformEvent {
    /// ISO 3166-1 country code.
    pub country_code: String,
    /// Signed year, negative for BCE.
    #[serde(deserialize_with = "year_from_number_or_string")]
    pub year: i32,
    /// Reform category.
    #[serde(rename = "type")]
    pub reform_type: EventType,
    /// Short headline.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    /// Free-text description.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub desc: String,
    /// URL of the attached file, empty when there is none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub file_url: String,
    /// Identity that last saved the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_by: Option<String>,
    /// When the event was last saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ReformEvent {
    /// The composite key this event is stored under.
    #[must_use]
    pub fn key(&self) -> EventKey {
        EventKey::new(self.country_code.clone(), self.year)
    }
}

/// Formats a signed year for display: `1960`, `300 BCE`.
#[must_use]
pub fn display_year(year: i32) -> String {
    if year < 0 {
        format!("{} BCE", i64::from(year).abs())
    } else {
        year.to_string()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Older records carry the year as a string.
fn year_from_number_or_string<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawYear {
        Number(i64),
        Text(String),
    }

    let wide = match RawYear::deserialize(deserializer)? {
        RawYear::Number(n) => n,
        RawYear::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom(format!("year is not an integer: {s:?}")))?,
    };
    i32::try_from(wide)
        .map_err(|_| serde::de::Error::custom(format!("year out of range: {wide}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reform_type_parses_every_wire_name() {
        for reform_type in ReformType::ALL {
            assert_eq!(reform_type.as_str().parse::<ReformType>(), Ok(reform_type));
        }
    }

    #[test]
    fn test_reform_type_rejects_unknown_name() {
        let result = "Hyperinflation".parse::<ReformType>();

        assert_eq!(result, Err(UnknownReformType("Hyperinflation".to_owned())));
    }

    #[test]
    fn test_reform_type_serializes_with_spaces() {
        let json = serde_json::to_string(&ReformType::ExchangeRegimeChange).unwrap();

        assert_eq!(json, "\"Exchange Regime Change\"");
    }

    #[test]
    fn test_event_key_displays_country_then_year() {
        assert_eq!(EventKey::new("FRA", 1960).to_string(), "FRA:1960");
        assert_eq!(EventKey::new("EGY", -300).to_string(), "EGY:-300");
    }

    #[test]
    fn test_event_key_parses_negative_year() {
        let key: EventKey = "EGY:-300".parse().unwrap();

        assert_eq!(key, EventKey::new("EGY", -300));
    }

    #[test]
    fn test_event_key_rejects_malformed_input() {
        assert!("FRA".parse::<EventKey>().is_err());
        assert!(":1960".parse::<EventKey>().is_err());
        assert!("FRA:nineteen".parse::<EventKey>().is_err());
    }

    #[test]
    fn test_reform_event_uses_camel_case_wire_format() {
        let event = ReformEvent {
            country_code: "FRA".to_owned(),
            year: 1960,
            reform_type: ReformType::Redenomination.into(),
            title: "New Franc".to_owned(),
            desc: String::new(),
            file_url: String::new(),
            saved_by: None,
            timestamp: None,
        };

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["countryCode"], "FRA");
        assert_eq!(json["type"], "Redenomination");
        assert_eq!(json["fileUrl"], "");
        assert!(json.get("savedBy").is_none());
    }

    #[test]
    fn test_reform_event_accepts_string_year_and_null_text() {
        let json = serde_json::json!({
            "countryCode": "DEU",
            "year": "1948",
            "type": "New Currency",
            "title": null,
        });

        let event: ReformEvent = serde_json::from_value(json).unwrap();

        assert_eq!(event.year, 1948);
        assert_eq!(event.title, "");
        assert_eq!(event.desc, "");
    }

    #[test]
    fn test_reform_event_keeps_unrecognized_type_verbatim() {
        let json = serde_json::json!({
            "countryCode": "DEU",
            "year": 1923,
            "type": "Hyperinflation",
        });

        let event: ReformEvent = serde_json::from_value(json).unwrap();

        assert_eq!(
            event.reform_type,
            EventType::Unrecognized("Hyperinflation".to_owned())
        );
        assert_eq!(event.reform_type.known(), None);
        assert_eq!(serde_json::to_value(&event).unwrap()["type"], "Hyperinflation");
    }

    #[test]
    fn test_event_type_from_known_name_is_known() {
        let event_type = EventType::from("Peg Change".to_owned());

        assert_eq!(event_type, ReformType::PegChange);
        assert_eq!(event_type.as_str(), "Peg Change");
    }

    #[test]
    fn test_display_year_marks_bce() {
        assert_eq!(display_year(1960), "1960");
        assert_eq!(display_year(-300), "300 BCE");
        assert_eq!(display_year(i32::MIN), "2147483648 BCE");
    }
}
