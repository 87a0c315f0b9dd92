use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Resource link returned by the server. Used as the row key and as the
/// target URL for update/delete.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    pub fn new(href: impl Into<String>) -> Self {
        Self(href.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locator {
    fn from(href: &str) -> Self {
        Self(href.to_string())
    }
}

impl From<String> for Locator {
    fn from(href: String) -> Self {
        Self(href)
    }
}

/// The six editable attributes of a car. Free-form text on the client side;
/// the server decides what is a valid year or price.
///
/// Also serves as the draft record held by an open editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarFields {
    #[serde(default, deserialize_with = "free_text")]
    pub brand: String,
    #[serde(default, deserialize_with = "free_text")]
    pub model: String,
    #[serde(default, deserialize_with = "free_text")]
    pub color: String,
    #[serde(default, deserialize_with = "free_text")]
    pub year: String,
    #[serde(default, deserialize_with = "free_text")]
    pub fuel: String,
    #[serde(default, deserialize_with = "free_text")]
    pub price: String,
}

impl CarFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Brand => &self.brand,
            Field::Model => &self.model,
            Field::Color => &self.color,
            Field::Year => &self.year,
            Field::Fuel => &self.fuel,
            Field::Price => &self.price,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Brand => &mut self.brand,
            Field::Model => &mut self.model,
            Field::Color => &mut self.color,
            Field::Year => &mut self.year,
            Field::Fuel => &mut self.fuel,
            Field::Price => &mut self.price,
        };
        *slot = value.into();
    }
}

// Servers commonly send year/price as numbers; keep them as text.
fn free_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Brand,
    Model,
    Color,
    Year,
    Fuel,
    Price,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Brand,
        Field::Model,
        Field::Color,
        Field::Year,
        Field::Fuel,
        Field::Price,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Brand => "brand",
            Field::Model => "model",
            Field::Color => "color",
            Field::Year => "year",
            Field::Fuel => "fuel",
            Field::Price => "price",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Brand => "Brand",
            Field::Model => "Model",
            Field::Color => "Color",
            Field::Year => "Year",
            Field::Fuel => "Fuel",
            Field::Price => "Price",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown field '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car: Option<Link>,
}

/// A car as fetched from the server. Never modified after the fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    #[serde(flatten)]
    pub fields: CarFields,
    #[serde(rename = "_links")]
    pub links: CarLinks,
}

impl Car {
    /// The record's own link, used as its key
    pub fn locator(&self) -> Locator {
        Locator::new(self.links.self_link.href.clone())
    }

    /// Link used for update. Falls back to the self link when the server
    /// omits the `car` relation.
    pub fn edit_target(&self) -> Locator {
        match &self.links.car {
            Some(link) => Locator::new(link.href.clone()),
            None => self.locator(),
        }
    }
}
