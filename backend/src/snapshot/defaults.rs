//! Defaults for cosmetic sections the storefront cannot render without.

use serde::{Deserialize, Serialize};

/// Navigation bar button labels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ButtonLabels {
    pub home: String,
    pub shop: String,
    pub collections: String,
    pub about: String,
    pub contact: String,
}

impl Default for ButtonLabels {
    fn default() -> Self {
        Self {
            home: "Home".to_string(),
            shop: "Shop All".to_string(),
            collections: "Collections".to_string(),
            about: "About Us".to_string(),
            contact: "Contact".to_string(),
        }
    }
}

/// Navigation bar color palette.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavigationColors {
    pub background: String,
    pub text: String,
    pub accent: String,
    pub hover: String,
    pub active: String,
}

impl Default for NavigationColors {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#1f2937".to_string(),
            accent: "#e11d48".to_string(),
            hover: "#be123c".to_string(),
            active: "#9f1239".to_string(),
        }
    }
}

/// Navigation settings injected when a draft has none.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavigationSettings {
    pub button_labels: ButtonLabels,
    pub colors: NavigationColors,
    pub show_search: bool,
    pub sticky: bool,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            button_labels: ButtonLabels::default(),
            colors: NavigationColors::default(),
            show_search: true,
            sticky: true,
        }
    }
}
