//! Row values.
//!
//! A row holds at most one [`Value`]. The set of value shapes is closed:
//! renderers and typed accessors narrow it once, here, instead of each
//! renderer guessing at a dynamic type.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// Wire format used when a date value is turned into a parameter string.
pub const PARAMETER_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    /// Latitude, -90 to 90.
    pub latitude: f64,
    /// Longitude, -180 to 180.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` if both components are within their valid ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// A reference to one option of a selection row.
///
/// The index points into the owning options row's option list; the title is
/// captured so renderers can show it without knowing the option type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Choice {
    /// Position in the option list.
    pub index: usize,
    /// The option's display title.
    pub title: String,
}

impl Choice {
    /// Creates a choice reference.
    pub fn new(index: usize, title: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
        }
    }
}

/// The value bound to a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Free text.
    Text(String),
    /// A number (decimal, currency, slider position).
    Number(f64),
    /// A boolean (switches, choice marks).
    Bool(bool),
    /// A date and/or time.
    Date(NaiveDateTime),
    /// A map location.
    Coordinate(Coordinate),
    /// One option of a selection row.
    Choice(Choice),
}

impl Value {
    /// Short name of the variant, used in logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Date(_) => "date",
            Value::Coordinate(_) => "coordinate",
            Value::Choice(_) => "choice",
        }
    }

    /// Returns the text if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a `Number` value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the flag if this is a `Bool` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the date if this is a `Date` value.
    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the coordinate if this is a `Coordinate` value.
    pub fn as_coordinate(&self) -> Option<Coordinate> {
        match self {
            Value::Coordinate(c) => Some(*c),
            _ => None,
        }
    }

    /// Returns the choice if this is a `Choice` value.
    pub fn as_choice(&self) -> Option<&Choice> {
        match self {
            Value::Choice(c) => Some(c),
            _ => None,
        }
    }

    /// Renders the value as a submitted form parameter.
    pub fn to_parameter_string(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Date(d) => d.format(PARAMETER_DATE_FORMAT).to_string(),
            Value::Coordinate(c) => format!("{},{}", c.latitude, c.longitude),
            Value::Choice(c) => c.title.clone(),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value.and_time(chrono::NaiveTime::MIN))
    }
}

impl From<Coordinate> for Value {
    fn from(value: Coordinate) -> Self {
        Value::Coordinate(value)
    }
}

impl From<Choice> for Value {
    fn from(value: Choice) -> Self {
        Value::Choice(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_narrow_once() {
        let text = Value::from("Otto");
        assert_eq!(text.as_text(), Some("Otto"));
        assert_eq!(text.as_number(), None);
        assert_eq!(text.kind_name(), "text");

        let number = Value::from(0.5f32);
        assert_eq!(number.as_number(), Some(0.5));
        assert_eq!(number.as_bool(), None);

        let choice = Value::from(Choice::new(2, "Sheep"));
        assert_eq!(choice.as_choice().map(|c| c.index), Some(2));
    }

    #[test]
    fn test_date_from_naive_date_is_midnight() {
        let date = NaiveDate::from_ymd_opt(2016, 2, 26).unwrap();
        let value = Value::from(date);
        assert_eq!(
            value.as_date(),
            Some(date.and_hms_opt(0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parameter_strings() {
        assert_eq!(Value::from("a b").to_parameter_string(), "a b");
        assert_eq!(Value::from(3.0).to_parameter_string(), "3");
        assert_eq!(Value::from(2.75).to_parameter_string(), "2.75");
        assert_eq!(Value::from(true).to_parameter_string(), "true");
        assert_eq!(
            Value::from(NaiveDate::from_ymd_opt(2016, 4, 29).unwrap()).to_parameter_string(),
            "2016-04-29T00:00:00"
        );
        assert_eq!(
            Value::from(Coordinate::new(46.5, 11.25)).to_parameter_string(),
            "46.5,11.25"
        );
        assert_eq!(Value::from(Choice::new(0, "Cow")).to_parameter_string(), "Cow");
    }

    #[test]
    fn test_coordinate() {
        let bolzano = Coordinate::new(46.49067, 11.33982);
        assert!(bolzano.is_valid());
        assert_eq!(bolzano.to_string(), "46.49067, 11.33982");
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
    }
}
