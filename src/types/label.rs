//! Entity label taxonomy.
//!
//! Labels follow the GMB-style tagset used by the hosted NER model: nine
//! entity categories plus the `O` sentinel for tokens outside any entity.
//! Tags the model emits that fall outside this set are preserved verbatim
//! as [`EntityLabel::Unknown`] rather than dropped.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An RGB badge color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Badge color for tags outside the known taxonomy (neutral gray).
pub const UNKNOWN_COLOR: Rgb = Rgb(107, 114, 128);

/// The entity category assigned to a single token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityLabel {
    /// Geographical entity (mountains, rivers, regions).
    Geo,
    /// Organization.
    Org,
    /// Location.
    Loc,
    /// Person.
    Per,
    /// Artifact (human-made objects, works).
    Art,
    /// Geopolitical entity (countries, cities, states).
    Gpe,
    /// Time indicator.
    Tim,
    /// Natural phenomenon.
    Nat,
    /// Event.
    Eve,
    /// The `O` sentinel: token is not part of any named entity.
    Outside,
    /// A tag outside the known taxonomy, preserved as received.
    Unknown(String),
}

impl EntityLabel {
    /// The nine known entity categories, in display order.
    pub const KNOWN: [EntityLabel; 9] = [
        EntityLabel::Geo,
        EntityLabel::Org,
        EntityLabel::Loc,
        EntityLabel::Per,
        EntityLabel::Art,
        EntityLabel::Gpe,
        EntityLabel::Tim,
        EntityLabel::Nat,
        EntityLabel::Eve,
    ];

    /// Parse a wire tag into a label.
    ///
    /// Matching is exact: the model emits uppercase tags, so `"geo"` is an
    /// unknown tag, not `Geo`. Unrecognised tags never fail; they become
    /// [`EntityLabel::Unknown`] with the original text preserved.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "GEO" => EntityLabel::Geo,
            "ORG" => EntityLabel::Org,
            "LOC" => EntityLabel::Loc,
            "PER" => EntityLabel::Per,
            "ART" => EntityLabel::Art,
            "GPE" => EntityLabel::Gpe,
            "TIM" => EntityLabel::Tim,
            "NAT" => EntityLabel::Nat,
            "EVE" => EntityLabel::Eve,
            "O" => EntityLabel::Outside,
            other => EntityLabel::Unknown(other.to_string()),
        }
    }

    /// The wire tag for this label.
    pub fn as_str(&self) -> &str {
        match self {
            EntityLabel::Geo => "GEO",
            EntityLabel::Org => "ORG",
            EntityLabel::Loc => "LOC",
            EntityLabel::Per => "PER",
            EntityLabel::Art => "ART",
            EntityLabel::Gpe => "GPE",
            EntityLabel::Tim => "TIM",
            EntityLabel::Nat => "NAT",
            EntityLabel::Eve => "EVE",
            EntityLabel::Outside => "O",
            EntityLabel::Unknown(tag) => tag,
        }
    }

    /// Human-readable category name.
    pub fn description(&self) -> &'static str {
        match self {
            EntityLabel::Geo => "geographical entity",
            EntityLabel::Org => "organization",
            EntityLabel::Loc => "location",
            EntityLabel::Per => "person",
            EntityLabel::Art => "artifact",
            EntityLabel::Gpe => "geopolitical entity",
            EntityLabel::Tim => "time indicator",
            EntityLabel::Nat => "natural phenomenon",
            EntityLabel::Eve => "event",
            EntityLabel::Outside => "outside any entity",
            EntityLabel::Unknown(_) => "unrecognised tag",
        }
    }

    /// Badge color for this label, or `None` for the `O` sentinel, which
    /// renders as plain text.
    ///
    /// The palette is the tailwind 500-series hues.
    pub fn color(&self) -> Option<Rgb> {
        match self {
            EntityLabel::Geo => Some(Rgb(249, 115, 22)),  // orange
            EntityLabel::Org => Some(Rgb(132, 204, 22)),  // lime
            EntityLabel::Loc => Some(Rgb(239, 68, 68)),   // red
            EntityLabel::Per => Some(Rgb(59, 130, 246)),  // blue
            EntityLabel::Art => Some(Rgb(34, 197, 94)),   // green
            EntityLabel::Gpe => Some(Rgb(244, 63, 94)),   // rose
            EntityLabel::Tim => Some(Rgb(99, 102, 241)),  // indigo
            EntityLabel::Nat => Some(Rgb(245, 158, 11)),  // amber
            EntityLabel::Eve => Some(Rgb(6, 182, 212)),   // cyan
            EntityLabel::Outside => None,
            EntityLabel::Unknown(_) => Some(UNKNOWN_COLOR),
        }
    }

    /// Whether this label marks an entity token (anything but `O`).
    pub fn is_entity(&self) -> bool {
        !matches!(self, EntityLabel::Outside)
    }
}

impl Serialize for EntityLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntityLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(EntityLabel::parse(&tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_tags() {
        assert_eq!(EntityLabel::parse("GEO"), EntityLabel::Geo);
        assert_eq!(EntityLabel::parse("PER"), EntityLabel::Per);
        assert_eq!(EntityLabel::parse("EVE"), EntityLabel::Eve);
    }

    #[test]
    fn parse_sentinel() {
        assert_eq!(EntityLabel::parse("O"), EntityLabel::Outside);
        assert!(!EntityLabel::parse("O").is_entity());
    }

    #[test]
    fn parse_is_case_sensitive() {
        // The model emits uppercase tags; anything else is unknown.
        assert_eq!(
            EntityLabel::parse("geo"),
            EntityLabel::Unknown("geo".to_string())
        );
    }

    #[test]
    fn unknown_preserves_tag_text() {
        let label = EntityLabel::parse("MISC");
        assert_eq!(label.as_str(), "MISC");
        assert_eq!(label.color(), Some(UNKNOWN_COLOR));
    }

    #[test]
    fn sentinel_has_no_color() {
        assert_eq!(EntityLabel::Outside.color(), None);
        for label in EntityLabel::KNOWN {
            assert!(label.color().is_some());
        }
    }

    #[test]
    fn wire_tags_round_trip() {
        for label in EntityLabel::KNOWN {
            assert_eq!(EntityLabel::parse(label.as_str()), label);
        }
    }

    #[test]
    fn serde_uses_wire_tags() {
        let json = serde_json::to_string(&EntityLabel::Gpe).unwrap();
        assert_eq!(json, "\"GPE\"");
        let back: EntityLabel = serde_json::from_str("\"TIM\"").unwrap();
        assert_eq!(back, EntityLabel::Tim);
    }
}
