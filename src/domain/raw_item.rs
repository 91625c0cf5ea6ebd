use serde::Deserialize;
use serde_json::{Map, Value};

/// One scraped post as produced by the actor. The service owns the shape, so
/// every field is looked up optionally.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawItem(Map<String, Value>);

impl RawItem {
    /// Returns the value at a dotted path such as `["authorMeta", "fans"]`.
    /// A missing key, a `null`, or a non-object step along the way yields `None`.
    pub fn lookup(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.0.get(*first)?;

        for key in rest {
            current = current.as_object()?.get(*key)?;
        }

        match current {
            Value::Null => None,
            value => Some(value),
        }
    }
}

impl From<Map<String, Value>> for RawItem {
    fn from(value: Map<String, Value>) -> Self {
        RawItem(value)
    }
}

impl TryFrom<Value> for RawItem {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(RawItem(map)),
            other => Err(other),
        }
    }
}
