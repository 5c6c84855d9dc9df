//! Typed tile property values

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type tag of a property as written in a Tiled document
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// Implicit when the `type` attribute is absent
    #[default]
    String,
    Int,
    Float,
    Bool,
    Color,
    File,
}

impl PropertyType {
    /// The tag as it appears in the `type` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Int => "int",
            PropertyType::Float => "float",
            PropertyType::Bool => "bool",
            PropertyType::Color => "color",
            PropertyType::File => "file",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(PropertyType::String),
            "int" => Ok(PropertyType::Int),
            "float" => Ok(PropertyType::Float),
            "bool" => Ok(PropertyType::Bool),
            "color" => Ok(PropertyType::Color),
            "file" => Ok(PropertyType::File),
            other => Err(format!("unsupported property type '{}'", other)),
        }
    }
}

/// A single typed property value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// `#AARRGGBB` or `#RRGGBB`
    Color(String),
    /// Path relative to the document
    File(String),
}

impl PropertyValue {
    /// Parse a literal according to its declared type tag.
    ///
    /// Returns a message describing the mismatch when the literal is not a
    /// valid value of that type.
    pub fn parse(prop_type: PropertyType, literal: &str) -> Result<Self, String> {
        match prop_type {
            PropertyType::Bool => match literal {
                "true" => Ok(PropertyValue::Bool(true)),
                "false" => Ok(PropertyValue::Bool(false)),
                other => Err(format!("'{}' is not a boolean literal", other)),
            },
            PropertyType::Int => literal
                .trim()
                .parse::<i64>()
                .map(PropertyValue::Int)
                .map_err(|_| format!("'{}' is not an integer literal", literal)),
            PropertyType::Float => match literal.trim().parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(PropertyValue::Float(f)),
                _ => Err(format!("'{}' is not a finite float literal", literal)),
            },
            PropertyType::Color => {
                if is_color_literal(literal) {
                    Ok(PropertyValue::Color(literal.to_string()))
                } else {
                    Err(format!("'{}' is not a #RRGGBB or #AARRGGBB color", literal))
                }
            }
            PropertyType::File => Ok(PropertyValue::File(literal.to_string())),
            PropertyType::String => Ok(PropertyValue::String(literal.to_string())),
        }
    }

    /// The type tag for this value
    pub fn property_type(&self) -> PropertyType {
        match self {
            PropertyValue::Bool(_) => PropertyType::Bool,
            PropertyValue::Int(_) => PropertyType::Int,
            PropertyValue::Float(_) => PropertyType::Float,
            PropertyValue::String(_) => PropertyType::String,
            PropertyValue::Color(_) => PropertyType::Color,
            PropertyValue::File(_) => PropertyType::File,
        }
    }

    /// Literal text as written back into a document
    pub fn to_literal(&self) -> String {
        match self {
            PropertyValue::Bool(b) => b.to_string(),
            PropertyValue::Int(i) => i.to_string(),
            // Display for f64 prints `15` for 15.0, matching Tiled's output
            PropertyValue::Float(f) => f.to_string(),
            PropertyValue::String(s) | PropertyValue::Color(s) | PropertyValue::File(s) => {
                s.clone()
            }
        }
    }

    /// Get value as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get value as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get value as float, widening integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            PropertyValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get value as string reference (any textual type)
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) | PropertyValue::Color(s) | PropertyValue::File(s) => Some(s),
            _ => None,
        }
    }

    /// Widen an integer to a float; other values are returned unchanged
    pub fn widened(self) -> Self {
        match self {
            PropertyValue::Int(i) => PropertyValue::Float(i as f64),
            other => other,
        }
    }
}

fn is_color_literal(s: &str) -> bool {
    let Some(hex) = s.strip_prefix('#') else {
        return false;
    };
    (hex.len() == 6 || hex.len() == 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "\"{}\"", s),
            other => f.write_str(&other.to_literal()),
        }
    }
}

// Convenience conversions
impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Int(i)
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        PropertyValue::Int(i as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_literal_is_typed() {
        assert_eq!(
            PropertyValue::parse(PropertyType::Bool, "true"),
            Ok(PropertyValue::Bool(true))
        );
        assert_ne!(
            PropertyValue::parse(PropertyType::Bool, "true"),
            Ok(PropertyValue::String("true".to_string()))
        );
        assert!(PropertyValue::parse(PropertyType::Bool, "yes").is_err());
        assert!(PropertyValue::parse(PropertyType::Bool, "True").is_err());
    }

    #[test]
    fn test_numeric_literals() {
        assert_eq!(
            PropertyValue::parse(PropertyType::Int, "3"),
            Ok(PropertyValue::Int(3))
        );
        assert!(PropertyValue::parse(PropertyType::Int, "1.5").is_err());
        assert_eq!(
            PropertyValue::parse(PropertyType::Float, "15"),
            Ok(PropertyValue::Float(15.0))
        );
        assert!(PropertyValue::parse(PropertyType::Float, "fast").is_err());
        assert!(PropertyValue::parse(PropertyType::Float, "NaN").is_err());
    }

    #[test]
    fn test_color_literal() {
        assert!(PropertyValue::parse(PropertyType::Color, "#ff00ff").is_ok());
        assert!(PropertyValue::parse(PropertyType::Color, "#80ff00ff").is_ok());
        assert!(PropertyValue::parse(PropertyType::Color, "ff00ff").is_err());
        assert!(PropertyValue::parse(PropertyType::Color, "#ff00f").is_err());
    }

    #[test]
    fn test_float_literal_has_no_trailing_zero() {
        assert_eq!(PropertyValue::Float(5.0).to_literal(), "5");
        assert_eq!(PropertyValue::Float(0.25).to_literal(), "0.25");
    }

    #[test]
    fn test_type_tag_parsing() {
        assert_eq!("bool".parse::<PropertyType>(), Ok(PropertyType::Bool));
        assert!("object".parse::<PropertyType>().is_err());
        assert!("class".parse::<PropertyType>().is_err());
    }

    #[test]
    fn test_widen() {
        assert_eq!(PropertyValue::Int(1).widened(), PropertyValue::Float(1.0));
        assert_eq!(PropertyValue::Bool(true).widened(), PropertyValue::Bool(true));
    }

    #[test]
    fn test_value_json_shape() {
        let json = serde_json::to_string(&PropertyValue::Float(5.0)).unwrap();
        assert_eq!(json, r#"{"type":"float","value":5.0}"#);
        let parsed: PropertyValue = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, PropertyValue::Float(5.0));
    }
}
