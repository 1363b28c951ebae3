use serde::{Deserialize, Deserializer, Serialize};

/// A tag attached to a photo.
///
/// Some endpoints send tags as bare strings, others as `{"name": ...}`
/// objects; both decode to the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Tag {
    pub name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagRepr {
    Name(String),
    Object { name: String },
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = match TagRepr::deserialize(deserializer)? {
            TagRepr::Name(name) => name,
            TagRepr::Object { name } => name,
        };
        Ok(Tag { name })
    }
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
