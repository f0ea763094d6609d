// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Catalog item types as returned by the IGDB API.

use serde::{Deserialize, Serialize};

/// Cover art reference. IGDB returns thumbnail-sized URLs; the service
/// layer rewrites them to a larger variant before they reach clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cover {
    pub url: String,
}

/// A game as returned by search and batch lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<Cover>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_release_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// A named sub-resource (genre, platform).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

/// Company reference inside an involved-company record.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyRef {
    pub name: Option<String>,
}

/// An organization involved with a game, with role flags.
///
/// A single company can be both developer and publisher.
#[derive(Debug, Clone, Deserialize)]
pub struct InvolvedCompany {
    pub company: Option<CompanyRef>,
    #[serde(default)]
    pub developer: bool,
    #[serde(default)]
    pub publisher: bool,
}

/// Raw detailed game record from IGDB, before post-processing.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGameDetails {
    pub id: i64,
    pub name: String,
    pub cover: Option<Cover>,
    pub first_release_date: Option<i64>,
    pub summary: Option<String>,
    pub genres: Option<Vec<NamedRef>>,
    pub platforms: Option<Vec<NamedRef>>,
    pub involved_companies: Option<Vec<InvolvedCompany>>,
}

/// Detailed game record with developer/publisher lists derived from
/// the involved-companies role flags.
#[derive(Debug, Clone, Serialize)]
pub struct GameDetails {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<Cover>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_release_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub genres: Vec<String>,
    pub platforms: Vec<String>,
    pub developers: Vec<String>,
    pub publishers: Vec<String>,
}

impl From<RawGameDetails> for GameDetails {
    fn from(raw: RawGameDetails) -> Self {
        // Partition involved companies on their role flags, deduplicating
        // while preserving upstream order.
        let mut developers: Vec<String> = Vec::new();
        let mut publishers: Vec<String> = Vec::new();

        for entry in raw.involved_companies.unwrap_or_default() {
            let Some(name) = entry.company.and_then(|c| c.name) else {
                continue;
            };
            if entry.developer && !developers.contains(&name) {
                developers.push(name.clone());
            }
            if entry.publisher && !publishers.contains(&name) {
                publishers.push(name);
            }
        }

        Self {
            id: raw.id,
            name: raw.name,
            cover: raw.cover,
            first_release_date: raw.first_release_date,
            summary: raw.summary,
            genres: raw
                .genres
                .unwrap_or_default()
                .into_iter()
                .map(|g| g.name)
                .collect(),
            platforms: raw
                .platforms
                .unwrap_or_default()
                .into_iter()
                .map(|p| p.name)
                .collect(),
            developers,
            publishers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn involved(name: &str, developer: bool, publisher: bool) -> InvolvedCompany {
        InvolvedCompany {
            company: Some(CompanyRef {
                name: Some(name.to_string()),
            }),
            developer,
            publisher,
        }
    }

    #[test]
    fn partitions_companies_by_role_flags() {
        let raw = RawGameDetails {
            id: 1,
            name: "Test Game".to_string(),
            cover: None,
            first_release_date: None,
            summary: None,
            genres: None,
            platforms: None,
            involved_companies: Some(vec![
                involved("DevCo", true, false),
                involved("PubCo", false, true),
                involved("BothCo", true, true),
                involved("PortCo", false, false),
            ]),
        };

        let details = GameDetails::from(raw);
        assert_eq!(details.developers, vec!["DevCo", "BothCo"]);
        assert_eq!(details.publishers, vec!["PubCo", "BothCo"]);
    }

    #[test]
    fn deduplicates_repeated_companies() {
        let raw = RawGameDetails {
            id: 1,
            name: "Test Game".to_string(),
            cover: None,
            first_release_date: None,
            summary: None,
            genres: None,
            platforms: None,
            involved_companies: Some(vec![
                involved("DevCo", true, false),
                involved("DevCo", true, false),
            ]),
        };

        let details = GameDetails::from(raw);
        assert_eq!(details.developers, vec!["DevCo"]);
        assert!(details.publishers.is_empty());
    }

    #[test]
    fn missing_company_name_is_skipped() {
        let raw = RawGameDetails {
            id: 1,
            name: "Test Game".to_string(),
            cover: None,
            first_release_date: None,
            summary: None,
            genres: None,
            platforms: None,
            involved_companies: Some(vec![InvolvedCompany {
                company: None,
                developer: true,
                publisher: true,
            }]),
        };

        let details = GameDetails::from(raw);
        assert!(details.developers.is_empty());
        assert!(details.publishers.is_empty());
    }
}
