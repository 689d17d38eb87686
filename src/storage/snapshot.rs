use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::{Favorite, LaunchId, Theme};

/// Everything the selection store persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Snapshot {
    /// Whether first-run seeding has happened.
    pub initialized: bool,
    pub favorites: HashMap<LaunchId, Favorite>,
    pub configuration: Configuration,
}

/// The user's configuration choices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub theme: Theme,
}

impl Snapshot {
    pub fn decode(blob: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(blob)
    }

    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}

/// The serialized versions of the snapshot.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        initialized: bool,

        /// Favorites as a list; the map key is the favorite's own id.
        #[serde(default)]
        favorites: Vec<Favorite>,

        #[serde(default)]
        configuration: Configuration,
    },
}

impl From<Versions> for Snapshot {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                initialized,
                favorites,
                configuration,
            } => Self {
                initialized,
                favorites: favorites
                    .into_iter()
                    .map(|favorite| (favorite.id.clone(), favorite))
                    .collect(),
                configuration,
            },
        }
    }
}

impl From<Snapshot> for Versions {
    fn from(snapshot: Snapshot) -> Self {
        let sorted: BTreeMap<_, _> = snapshot.favorites.into_iter().collect();
        Self::V1 {
            initialized: snapshot.initialized,
            favorites: sorted.into_values().collect(),
            configuration: snapshot.configuration,
        }
    }
}
