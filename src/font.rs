//! Font lookup for numerals and panel labels.

use fontdb::{Database, Family, Query, Weight};
use rusttype::Font;

use crate::config::ClockConfig;
use crate::error::ClockError;

/// Loads the configured font file, or a bold system sans-serif face.
pub fn load_font(config: &ClockConfig) -> Result<Font<'static>, ClockError> {
    if let Some(path) = &config.font_path {
        let data = std::fs::read(path)
            .map_err(|e| ClockError::Font(format!("cannot read {}: {}", path.display(), e)))?;
        return Font::try_from_vec(data)
            .ok_or_else(|| ClockError::Font(format!("cannot parse {}", path.display())));
    }

    let mut db = Database::new();
    db.load_system_fonts();
    log::debug!("font database holds {} faces", db.len());

    let mut families = Vec::with_capacity(2);
    if let Some(name) = config.font_family.as_deref() {
        families.push(Family::Name(name));
    }
    families.push(Family::SansSerif);

    let query = Query {
        families: &families,
        weight: Weight::BOLD,
        ..Query::default()
    };
    let id = db
        .query(&query)
        .ok_or_else(|| ClockError::Font("no sans-serif system font found".to_string()))?;

    db.with_face_data(id, |data, index| Font::try_from_vec_and_index(data.to_vec(), index))
        .flatten()
        .ok_or_else(|| ClockError::Font("system font could not be parsed".to_string()))
}
