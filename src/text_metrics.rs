use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

static MEASURER: Lazy<Mutex<Measurer>> = Lazy::new(|| Mutex::new(Measurer::new()));

/// Width of `text` at `size` in the first resolvable font of `family`.
/// Falls back to a fixed per-character estimate when no face resolves, so
/// layout never depends on the host font set.
pub fn text_width(text: &str, size: f32, family: &str) -> f32 {
    if text.is_empty() || size <= 0.0 {
        return 0.0;
    }
    let measured = MEASURER
        .lock()
        .ok()
        .and_then(|mut measurer| measurer.measure(text, size, family));
    measured.unwrap_or_else(|| estimate_width(text, size))
}

/// Heuristic used when no system font is available.
pub fn estimate_width(text: &str, size: f32) -> f32 {
    text.chars().filter(|c| *c != '\n').count() as f32 * size * 0.56
}

struct Measurer {
    db: Database,
    loaded_system_fonts: bool,
    advances: HashMap<String, Option<FaceAdvances>>,
}

impl Measurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            advances: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, size: f32, family: &str) -> Option<f32> {
        let key = family.trim().to_string();
        if !self.advances.contains_key(&key) {
            let loaded = self.load(family);
            self.advances.insert(key.clone(), loaded);
        }
        let face = self.advances.get(&key)?.as_ref()?;
        Some(face.width_of(text, size))
    }

    fn load(&mut self, family: &str) -> Option<FaceAdvances> {
        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }
        let names: Vec<String> = family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\'').to_string())
            .filter(|part| !part.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = Vec::with_capacity(names.len() + 1);
        for name in &names {
            match name.to_ascii_lowercase().as_str() {
                "serif" => families.push(Family::Serif),
                "sans-serif" | "system-ui" => families.push(Family::SansSerif),
                "monospace" => families.push(Family::Monospace),
                _ => families.push(Family::Name(name.as_str())),
            }
        }
        families.push(Family::SansSerif);

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let mut loaded = None;
        self.db.with_face_data(id, |data, index| {
            if let Ok(face) = Face::parse(data, index) {
                loaded = Some(FaceAdvances::from_face(&face));
            }
        });
        loaded
    }
}

/// Pre-scaled ASCII advance table; non-ASCII characters use the estimate.
struct FaceAdvances {
    units_per_em: f32,
    ascii: [u16; 128],
}

impl FaceAdvances {
    fn from_face(face: &Face<'_>) -> Self {
        let mut ascii = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph) = face.glyph_index(byte as char) {
                ascii[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
            }
        }
        Self {
            units_per_em: face.units_per_em().max(1) as f32,
            ascii,
        }
    }

    fn width_of(&self, text: &str, size: f32) -> f32 {
        let scale = size / self.units_per_em;
        let fallback = size * 0.56;
        let mut width = 0.0f32;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let advance = if ch.is_ascii() {
                self.ascii[ch as usize]
            } else {
                0
            };
            if advance == 0 {
                width += fallback;
            } else {
                width += advance as f32 * scale;
            }
        }
        width.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_zero_width() {
        assert_eq!(text_width("", 12.0, "Arial"), 0.0);
    }

    #[test]
    fn width_grows_with_content() {
        let short = text_width("ab", 12.0, "Arial");
        let long = text_width("abcdef", 12.0, "Arial");
        assert!(long > short);
    }

    #[test]
    fn estimate_scales_with_size() {
        assert!(estimate_width("abc", 20.0) > estimate_width("abc", 10.0));
    }
}
