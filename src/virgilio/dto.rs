use serde::{Deserialize, Deserializer};
use serde_either::SingleOrVec;
use serde_json::Value;

/// One scraped event, exactly as the Virgilio.it scraper writes it.
// Note: the scraper writes `null` for fields it couldn't extract, so every
// String field tolerates both null and missing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Titolo evento", default, deserialize_with = "deserialize_str")]
    pub title: String,
    #[serde(rename = "Data", default, deserialize_with = "deserialize_str")]
    pub date: String,
    #[serde(rename = "Descrizione di Virgilio.it", default, deserialize_with = "deserialize_opt_str")]
    pub description: Option<String>,
    #[serde(rename = "Descrizione Groq", default, deserialize_with = "deserialize_opt_str")]
    pub groq_description: Option<String>,
    #[serde(rename = "Luogo", default, deserialize_with = "deserialize_str")]
    pub location: String,
    #[serde(rename = "Indirizzo", default, deserialize_with = "deserialize_opt_str")]
    pub address: Option<String>,
    #[serde(rename = "Prezzo", default, deserialize_with = "deserialize_price")]
    pub price: Option<SingleOrVec<String>>,
    #[serde(rename = "Orario", default, deserialize_with = "deserialize_opt_str")]
    pub time: Option<String>,
}

impl RawRecord {
    /// Key used to tell whether two scrapes describe the same event.
    pub fn identity(&self) -> (&str, &str, &str) {
        (&self.title, &self.date, &self.location)
    }
}

fn deserialize_str<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_opt_str(d)?.unwrap_or_default())
}

// Empty strings count as absent, the same way the calendar treats them
fn deserialize_opt_str<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn deserialize_price<'de, D>(d: D) -> Result<Option<SingleOrVec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::String(s) if !s.is_empty() => Some(SingleOrVec::Single(s)),
        Value::Array(values) => Some(SingleOrVec::Vec(
            values
                .into_iter()
                .filter_map(|value| match value {
                    Value::String(s) => Some(s),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
        )),
        _ => None,
    })
}
