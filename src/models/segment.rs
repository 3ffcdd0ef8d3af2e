use serde::{Deserialize, Serialize};

/// A body-part category that partitions workouts.
///
/// The set is fixed: every workout belongs to exactly one segment, and the
/// store keeps at least one workout in each.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Back,
    Chest,
    Legs,
}

impl Segment {
    /// Every segment, in display order.
    pub const ALL: [Segment; 3] = [Self::Back, Self::Chest, Self::Legs];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Back => "back",
            Self::Chest => "chest",
            Self::Legs => "legs",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "back" => Some(Self::Back),
            "chest" => Some(Self::Chest),
            "legs" => Some(Self::Legs),
            _ => None,
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_round_trip_for_every_segment() {
        for segment in Segment::ALL {
            assert_eq!(Segment::from_str(segment.as_str()), Some(segment));
        }
    }

    #[test]
    fn test_unknown_segment_is_rejected() {
        assert_eq!(Segment::from_str("arms"), None);
        assert_eq!(Segment::from_str("Back"), None);
    }

    #[test]
    fn test_serializes_as_snake_case() {
        let json = serde_json::to_string(&Segment::Chest).unwrap();
        assert_eq!(json, "\"chest\"");
    }
}
