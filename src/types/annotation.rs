//! Token annotation types.
//!
//! The model returns one `[token, tag]` pair per whitespace token of the
//! input. [`AnnotatedToken`] keeps that pair shape on the wire (it
//! serialises as a two-element array) while exposing a typed label.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::label::EntityLabel;

/// A single token with its entity label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedToken {
    /// The token text, exactly as returned by the model.
    pub token: String,
    /// The entity category assigned to the token.
    pub label: EntityLabel,
}

impl AnnotatedToken {
    pub fn new(token: impl Into<String>, label: EntityLabel) -> Self {
        Self {
            token: token.into(),
            label,
        }
    }
}

impl Serialize for AnnotatedToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.token, self.label.as_str()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AnnotatedToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (token, tag) = <(String, String)>::deserialize(deserializer)?;
        Ok(Self {
            token,
            label: EntityLabel::parse(&tag),
        })
    }
}

/// The full annotation sequence for one input, in model order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotations(Vec<AnnotatedToken>);

impl Annotations {
    pub fn new(tokens: Vec<AnnotatedToken>) -> Self {
        Self(tokens)
    }

    /// Build annotations from `(token, tag)` pairs.
    pub fn from_pairs<I, T, U>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
        T: Into<String>,
        U: AsRef<str>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(token, tag)| AnnotatedToken::new(token, EntityLabel::parse(tag.as_ref())))
                .collect(),
        )
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnnotatedToken> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of tokens labelled as part of an entity.
    pub fn entity_count(&self) -> usize {
        self.0.iter().filter(|t| t.label.is_entity()).count()
    }
}

impl From<Vec<AnnotatedToken>> for Annotations {
    fn from(tokens: Vec<AnnotatedToken>) -> Self {
        Self(tokens)
    }
}

impl IntoIterator for Annotations {
    type Item = AnnotatedToken;
    type IntoIter = std::vec::IntoIter<AnnotatedToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Annotations {
    type Item = &'a AnnotatedToken;
    type IntoIter = std::slice::Iter<'a, AnnotatedToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
