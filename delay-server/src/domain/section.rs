//! Route sections a train can be reported on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a section name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown section: {0}")]
pub struct InvalidSection(pub String);

/// A route segment approaching the tracked station.
///
/// Serialized as its identifier; deserialized from the identifier or the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Section {
    ShinOsakaKyoto,
    KyotoGifuHashima,
    GifuHashimaNagoya,
}

impl Section {
    /// Every section, in route order.
    pub const ALL: [Section; 3] = [
        Section::ShinOsakaKyoto,
        Section::KyotoGifuHashima,
        Section::GifuHashimaNagoya,
    ];

    /// Identifier used in forms and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::ShinOsakaKyoto => "shin_osaka_kyoto",
            Section::KyotoGifuHashima => "kyoto_gifu_hashima",
            Section::GifuHashimaNagoya => "gifu_hashima_nagoya",
        }
    }

    /// Japanese label, which is also what the registry stores.
    pub fn label(&self) -> &'static str {
        match self {
            Section::ShinOsakaKyoto => "新大阪→京都",
            Section::KyotoGifuHashima => "京都→岐阜羽島",
            Section::GifuHashimaNagoya => "岐阜羽島→名古屋",
        }
    }
}

impl FromStr for Section {
    type Err = InvalidSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s || section.label() == s)
            .ok_or_else(|| InvalidSection(s.to_string()))
    }
}

impl TryFrom<String> for Section {
    type Error = InvalidSection;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_str() {
        for section in Section::ALL {
            assert_eq!(section.label().parse::<Section>().unwrap(), section);
            assert_eq!(section.as_str().parse::<Section>().unwrap(), section);
        }
    }

    #[test]
    fn reject_unknown() {
        assert!("名古屋→東京".parse::<Section>().is_err());
    }

    #[test]
    fn serde_writes_identifier_and_reads_either_form() {
        let json = serde_json::to_string(&Section::KyotoGifuHashima).unwrap();
        assert_eq!(json, "\"kyoto_gifu_hashima\"");

        let parsed: Section = serde_json::from_str("\"京都→岐阜羽島\"").unwrap();
        assert_eq!(parsed, Section::KyotoGifuHashima);
        let parsed: Section = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Section::KyotoGifuHashima);

        assert!(serde_json::from_str::<Section>("\"tokyo_shinagawa\"").is_err());
    }

    #[test]
    fn display_is_label() {
        assert_eq!(Section::GifuHashimaNagoya.to_string(), "岐阜羽島→名古屋");
    }
}
