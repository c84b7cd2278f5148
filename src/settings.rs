//! Pile visual settings
//!
//! Persisted separately from any business data in LocalStorage. The
//! simulation itself owns no persisted state.

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PileSettings {
    /// Inset from the stage edges to the overflow boundaries
    pub inset: f32,
    /// Draw the boundary lines and spawn-range indicator
    pub show_guides: bool,
    /// Seed override for reproducible piles (0 = derive from clock)
    pub seed: u64,
}

impl Default for PileSettings {
    fn default() -> Self {
        Self {
            inset: DEFAULT_INSET,
            show_guides: false,
            seed: 0,
        }
    }
}

impl PileSettings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "tsundoku_pile_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded pile settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default pile settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Pile settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_roundtrip() {
        let settings = PileSettings {
            inset: 48.0,
            show_guides: true,
            seed: 99,
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: PileSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.inset, 48.0);
        assert!(back.show_guides);
        assert_eq!(back.seed, 99);
    }

    #[test]
    fn test_default_inset_matches_stage_constant() {
        assert_eq!(PileSettings::default().inset, DEFAULT_INSET);
    }
}
