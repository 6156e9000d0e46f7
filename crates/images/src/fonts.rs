use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, anyhow, bail};
use resvg::usvg::fontdb;

/// Font data for a single family, keyed by weight.
#[derive(Debug, Clone)]
pub struct FontSet {
    family: String,
    faces: BTreeMap<u16, Arc<Vec<u8>>>,
}

impl FontSet {
    pub fn new(family: impl Into<String>) -> Self {
        Self { family: family.into(), faces: BTreeMap::new() }
    }

    pub fn family(&self) -> &str { &self.family }

    pub fn get(&self, weight: u16) -> Option<&[u8]> { self.faces.get(&weight).map(|d| d.as_slice()) }

    pub fn insert(&mut self, weight: u16, data: Vec<u8>) { self.faces.insert(weight, Arc::new(data)); }

    pub fn weights(&self) -> impl Iterator<Item = u16> + '_ { self.faces.keys().copied() }

    /// Font database containing only the faces in this set.
    pub fn database(&self) -> fontdb::Database {
        let mut db = fontdb::Database::new();
        for data in self.faces.values() {
            db.load_font_source(fontdb::Source::Binary(data.clone()));
        }
        db
    }
}

/// Load the requested weights of `family` from the fonts in `dir`.
/// Fails if the directory is missing or any weight has no exact match.
pub async fn load_font(dir: impl AsRef<Path>, family: &str, weights: &[u16]) -> Result<FontSet> {
    let dir = dir.as_ref().to_path_buf();
    let family = family.to_string();
    let weights = weights.to_vec();
    tokio::task::spawn_blocking(move || load_font_blocking(dir, &family, &weights))
        .await
        .context("Font loader task failed")?
}

fn load_font_blocking(dir: PathBuf, family: &str, weights: &[u16]) -> Result<FontSet> {
    if !dir.is_dir() {
        bail!("Font directory {} not found", dir.display());
    }
    let mut db = fontdb::Database::new();
    db.load_fonts_dir(&dir);
    let families = [fontdb::Family::Name(family)];
    let mut set = FontSet::new(family);
    for &weight in weights {
        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight(weight),
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        let id = db
            .query(&query)
            .filter(|id| db.face(*id).is_some_and(|face| face.weight.0 == weight))
            .ok_or_else(|| {
                anyhow!("Font {} (weight {}) not found in {}", family, weight, dir.display())
            })?;
        let data = db
            .with_face_data(id, |data, _index| data.to_vec())
            .ok_or_else(|| anyhow!("Failed to read font {} (weight {})", family, weight))?;
        tracing::debug!("Loaded font {} (weight {}, {} bytes)", family, weight, data.len());
        set.insert(weight, data);
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_FONTS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fonts");

    #[tokio::test]
    async fn test_load_font() {
        let set = load_font(TEST_FONTS, "Tuffy", &[500]).await.unwrap();
        assert_eq!(set.family(), "Tuffy");
        assert_eq!(set.weights().collect::<Vec<_>>(), vec![500]);
        assert!(set.get(500).is_some_and(|data| !data.is_empty()));
        let db = set.database();
        assert_eq!(db.len(), 1);
        assert!(db.faces().all(|face| face.families.iter().any(|(name, _)| name == "Tuffy")));
    }

    #[tokio::test]
    async fn test_weight_mismatch() {
        // Only weight 500 exists; the nearest face is not accepted
        for weight in [400, 600, 700] {
            let err = load_font(TEST_FONTS, "Tuffy", &[weight]).await.unwrap_err();
            assert!(err.to_string().contains(&format!("Tuffy (weight {weight})")), "{err}");
        }
        let err = load_font(TEST_FONTS, "Tuffy", &[500, 700]).await.unwrap_err();
        assert!(err.to_string().contains("weight 700"), "{err}");
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let err = load_font("/nonexistent/fonts", "Montserrat", &[600]).await.unwrap_err();
        assert!(err.to_string().contains("not found"), "{err}");
    }

    #[tokio::test]
    async fn test_missing_family() {
        let dir = std::env::temp_dir().join(format!("pwf-fonts-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("readme.txt"), "not a font").unwrap();
        let err = load_font(&dir, "Montserrat", &[600]).await.unwrap_err();
        assert!(err.to_string().contains("Montserrat (weight 600)"), "{err}");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_font_set() {
        let mut set = FontSet::new("Montserrat");
        assert_eq!(set.family(), "Montserrat");
        assert!(set.get(600).is_none());
        set.insert(600, vec![1, 2, 3]);
        set.insert(400, vec![4]);
        assert_eq!(set.get(600), Some(&[1u8, 2, 3][..]));
        assert_eq!(set.weights().collect::<Vec<_>>(), vec![400, 600]);
        // Garbage data is not a face
        assert_eq!(set.database().len(), 0);
    }
}
