//! Vector font descriptors and CSS-style family chains.
//!
//! Vector fonts are named the way a stylesheet names them:
//! `"'Press Start 2P', cursive"`. [`FamilyChain::from_css`] splits such a
//! string into an ordered fallback list that the text backend walks until
//! it finds an installed family.

use std::fmt;

// ── Generic family ──────────────────────────────────────────────────

/// CSS generic font families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenericFamily {
    Serif,
    SansSerif,
    Monospace,
    Cursive,
    Fantasy,
}

impl GenericFamily {
    /// Parse a generic family keyword (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "serif" => Some(Self::Serif),
            "sans-serif" => Some(Self::SansSerif),
            "monospace" => Some(Self::Monospace),
            "cursive" => Some(Self::Cursive),
            "fantasy" => Some(Self::Fantasy),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Serif => "serif",
            Self::SansSerif => "sans-serif",
            Self::Monospace => "monospace",
            Self::Cursive => "cursive",
            Self::Fantasy => "fantasy",
        }
    }
}

// ── Family chain ────────────────────────────────────────────────────

/// One entry of a family chain.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FamilyName {
    /// A concrete family, casing as written.
    Named(String),
    Generic(GenericFamily),
}

impl fmt::Display for FamilyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "'{name}'"),
            Self::Generic(generic) => f.write_str(generic.keyword()),
        }
    }
}

/// Ordered fallback list parsed from a CSS `font-family` value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FamilyChain {
    pub families: Vec<FamilyName>,
}

impl FamilyChain {
    /// Parse `"'VT323', monospace"` into `[Named("VT323"), Generic(Monospace)]`.
    ///
    /// An empty string yields `[sans-serif]`.
    pub fn from_css(family_str: &str) -> Self {
        let families: Vec<FamilyName> = family_str
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| {
                let quoted = s.starts_with(['"', '\'']);
                let name = s.trim_matches('"').trim_matches('\'').trim();
                match GenericFamily::parse(name) {
                    // A quoted keyword names a real family, per CSS.
                    Some(generic) if !quoted => FamilyName::Generic(generic),
                    _ => FamilyName::Named(name.to_string()),
                }
            })
            .filter(|f| !matches!(f, FamilyName::Named(n) if n.is_empty()))
            .collect();

        Self {
            families: if families.is_empty() {
                vec![FamilyName::Generic(GenericFamily::SansSerif)]
            } else {
                families
            },
        }
    }

    /// First generic keyword in the chain, if any.
    pub fn generic(&self) -> Option<GenericFamily> {
        self.families.iter().find_map(|f| match f {
            FamilyName::Generic(g) => Some(*g),
            FamilyName::Named(_) => None,
        })
    }
}

// ── Vector font descriptors ─────────────────────────────────────────

/// A selectable vector font: display name plus backend family string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VectorFont {
    pub name: String,
    /// CSS-style family chain handed to the text backend.
    pub family: String,
}

impl VectorFont {
    pub fn new(name: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            family: family.into(),
        }
    }

    pub fn chain(&self) -> FamilyChain {
        FamilyChain::from_css(&self.family)
    }
}

/// The vector fonts offered next to the bitmap bundle.
pub fn default_vector_fonts() -> Vec<VectorFont> {
    [
        ("VT323", "'VT323', monospace"),
        ("IBM Plex Mono", "'IBM Plex Mono', monospace"),
        ("Space Mono", "'Space Mono', monospace"),
        ("Inconsolata", "'Inconsolata', monospace"),
        ("Cousine", "'Cousine', monospace"),
        ("Source Code Pro", "'Source Code Pro', monospace"),
        ("Roboto Mono", "'Roboto Mono', monospace"),
        ("Fira Code", "'Fira Code', monospace"),
        ("Press Start 2P", "'Press Start 2P', cursive"),
        ("Pixelify Sans", "'Pixelify Sans', sans-serif"),
        ("DotGothic16", "'DotGothic16', sans-serif"),
        ("Cutive Mono", "'Cutive Mono', monospace"),
        ("Fugaz One", "'Fugaz One', sans-serif"),
        ("Orbitron", "'Orbitron', sans-serif"),
        ("Oswald", "'Oswald', sans-serif"),
        ("Bebas Neue", "'Bebas Neue', sans-serif"),
        ("Monospace (System)", "monospace"),
        ("Courier New", "Courier New, monospace"),
    ]
    .into_iter()
    .map(|(name, family)| VectorFont::new(name, family))
    .collect()
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_from_css_quoted() {
        let chain = FamilyChain::from_css("'Press Start 2P', cursive");
        assert_eq!(
            chain.families,
            vec![
                FamilyName::Named("Press Start 2P".into()),
                FamilyName::Generic(GenericFamily::Cursive),
            ]
        );
        assert_eq!(chain.generic(), Some(GenericFamily::Cursive));
    }

    #[test]
    fn test_chain_from_css_unquoted() {
        let chain = FamilyChain::from_css("Courier New, monospace");
        assert_eq!(chain.families[0], FamilyName::Named("Courier New".into()));
        assert_eq!(chain.families[1], FamilyName::Generic(GenericFamily::Monospace));
    }

    #[test]
    fn test_chain_quoted_keyword_is_named() {
        let chain = FamilyChain::from_css("\"serif\", sans-serif");
        assert_eq!(chain.families[0], FamilyName::Named("serif".into()));
        assert_eq!(chain.generic(), Some(GenericFamily::SansSerif));
    }

    #[test]
    fn test_chain_empty() {
        let chain = FamilyChain::from_css("  , ''");
        assert_eq!(chain.families, vec![FamilyName::Generic(GenericFamily::SansSerif)]);
    }

    #[test]
    fn test_parse_generic() {
        assert_eq!(GenericFamily::parse("Monospace"), Some(GenericFamily::Monospace));
        assert_eq!(GenericFamily::parse("fantasy"), Some(GenericFamily::Fantasy));
        assert_eq!(GenericFamily::parse("arial"), None);
    }

    #[test]
    fn test_family_name_display() {
        assert_eq!(FamilyName::Named("VT323".into()).to_string(), "'VT323'");
        assert_eq!(FamilyName::Generic(GenericFamily::SansSerif).to_string(), "sans-serif");
    }

    #[test]
    fn test_default_vector_fonts() {
        let fonts = default_vector_fonts();
        assert_eq!(fonts.len(), 18);
        assert_eq!(fonts[0].name, "VT323");
        assert!(fonts.iter().all(|f| f.chain().generic().is_some()));
        let system = fonts.iter().find(|f| f.name == "Monospace (System)").unwrap();
        assert_eq!(system.chain().families, vec![FamilyName::Generic(GenericFamily::Monospace)]);
    }
}
