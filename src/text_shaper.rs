use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::{Face, OutlineBuilder};

use crate::geometry::Point;
use crate::label::{ShapeError, TextRequest, TextShaper};
use crate::path::Command;

static FONT_LIBRARY: Lazy<Mutex<FontLibrary>> = Lazy::new(|| Mutex::new(FontLibrary::new()));

/// Advance used for characters the face has no glyph for, in ems.
const MISSING_GLYPH_ADVANCE: f32 = 0.56;

/// Shapes text with system fonts discovered through fontdb.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontShaper;

impl FontShaper {
    pub fn new() -> Self {
        Self
    }
}

impl TextShaper for FontShaper {
    fn shape(&self, request: &TextRequest) -> Result<Vec<Command>, ShapeError> {
        if request.text.trim().is_empty() {
            return Err(ShapeError::EmptyText);
        }
        if !request.font_size.is_finite() || request.font_size <= 0.0 {
            return Err(ShapeError::Unavailable(format!(
                "invalid font size {}",
                request.font_size
            )));
        }
        let mut library = FONT_LIBRARY
            .lock()
            .map_err(|_| ShapeError::Unavailable("font library lock poisoned".to_string()))?;
        let font = library.face_for(&request.family, request.weight, request.italic)?;
        font.outline_text(request)
    }
}

#[derive(Clone, Copy)]
enum FamilyToken {
    Generic(Family<'static>),
    Name(usize),
}

struct LoadedFont {
    data: Vec<u8>,
    index: u32,
}

impl LoadedFont {
    fn outline_text(&self, request: &TextRequest) -> Result<Vec<Command>, ShapeError> {
        let face = Face::parse(&self.data, self.index).map_err(|err| ShapeError::Face(err.to_string()))?;
        let scale = request.font_size / face.units_per_em().max(1) as f32;
        let mut pen_x = request.x;
        let mut builder = GlyphOutline {
            commands: Vec::new(),
            origin: Point::ZERO,
            scale,
            last: Point::ZERO,
        };

        for ch in request.text.chars() {
            if ch == '\n' {
                continue;
            }
            let Some(glyph_id) = face.glyph_index(ch) else {
                pen_x += request.font_size * MISSING_GLYPH_ADVANCE;
                continue;
            };
            builder.origin = Point::new(pen_x, request.y);
            face.outline_glyph(glyph_id, &mut builder);
            let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0) as f32 * scale;
            pen_x += advance;
        }

        if builder.commands.is_empty() {
            return Err(ShapeError::EmptyText);
        }
        Ok(builder.commands)
    }
}

/// Collects glyph outlines in SVG space: font units scaled, y flipped,
/// translated to the current pen position.
struct GlyphOutline {
    commands: Vec<Command>,
    origin: Point,
    scale: f32,
    last: Point,
}

impl GlyphOutline {
    fn map(&self, x: f32, y: f32) -> Point {
        Point::new(self.origin.x + x * self.scale, self.origin.y - y * self.scale)
    }
}

impl OutlineBuilder for GlyphOutline {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.commands.push(Command::move_to(p));
        self.last = p;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.commands.push(Command::line_to(p));
        self.last = p;
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let ctrl = self.map(x1, y1);
        let to = self.map(x, y);
        // Degree elevation: both cubic handles sit 2/3 of the way to the quad control.
        let cp1 = self.last.lerp(ctrl, 2.0 / 3.0);
        let cp2 = to.lerp(ctrl, 2.0 / 3.0);
        self.commands.push(Command::curve_to(cp1, cp2, to));
        self.last = to;
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let to = self.map(x, y);
        self.commands
            .push(Command::curve_to(self.map(x1, y1), self.map(x2, y2), to));
        self.last = to;
    }

    fn close(&mut self) {
        self.commands.push(Command::Close);
    }
}

struct FontLibrary {
    db: Database,
    loaded_system_fonts: bool,
    cache: HashMap<String, Option<LoadedFont>>,
}

impl FontLibrary {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            cache: HashMap::new(),
        }
    }

    fn face_for(&mut self, family: &str, weight: u16, italic: bool) -> Result<&LoadedFont, ShapeError> {
        let key = format!("{}|{weight}|{italic}", normalize_family_key(family));
        if !self.cache.contains_key(&key) {
            let font = self.load(family, weight, italic);
            self.cache.insert(key.clone(), font);
        }
        self.cache
            .get(&key)
            .and_then(|font| font.as_ref())
            .ok_or_else(|| ShapeError::NoFont(family.to_string()))
    }

    fn load(&mut self, family: &str, weight: u16, italic: bool) -> Option<LoadedFont> {
        let mut names: Vec<String> = Vec::new();
        let mut order: Vec<FamilyToken> = Vec::new();
        for part in family.split(',') {
            let raw = part.trim().trim_matches('"').trim_matches('\'');
            if raw.is_empty() {
                continue;
            }
            match raw.to_ascii_lowercase().as_str() {
                "serif" => order.push(FamilyToken::Generic(Family::Serif)),
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    order.push(FamilyToken::Generic(Family::SansSerif))
                }
                "monospace" | "ui-monospace" => order.push(FamilyToken::Generic(Family::Monospace)),
                "cursive" => order.push(FamilyToken::Generic(Family::Cursive)),
                "fantasy" => order.push(FamilyToken::Generic(Family::Fantasy)),
                _ => {
                    order.push(FamilyToken::Name(names.len()));
                    names.push(raw.to_string());
                }
            }
        }
        if order.is_empty() {
            order.push(FamilyToken::Generic(Family::SansSerif));
        }
        let families: Vec<Family<'_>> = order
            .iter()
            .map(|token| match *token {
                FamilyToken::Generic(family) => family,
                FamilyToken::Name(idx) => Family::Name(names[idx].as_str()),
            })
            .collect();

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
            log::debug!("loaded {} system font faces", self.db.len());
        }

        let query = Query {
            families: &families,
            weight: Weight(weight),
            stretch: Stretch::Normal,
            style: if italic { Style::Italic } else { Style::Normal },
        };
        let id = self.db.query(&query)?;
        self.db.with_face_data(id, |data, index| {
            Face::parse(data, index).ok().map(|_| LoadedFont {
                data: data.to_vec(),
                index,
            })
        })?
    }
}

fn normalize_family_key(font_family: &str) -> String {
    font_family
        .split(',')
        .map(|part| part.trim().trim_matches('"').trim_matches('\'').to_ascii_lowercase())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}
