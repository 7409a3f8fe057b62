//! Tile type palette and the swatches used to pick from it

use crate::{GridGeometry, Point, Rect};
use serde::{Deserialize, Serialize};

/// Each type is saved as a single ASCII digit
pub const MAX_TILE_TYPES: usize = 10;

/// An 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const CANVAS: Rgb = Rgb(200, 200, 200);
}

/// A paintable tile category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileType {
    pub name: String,
    /// Color used when a cell has this type
    pub fill: Rgb,
    /// Darker variant for the selected swatch
    pub highlight: Rgb,
}

impl TileType {
    pub fn new(name: impl Into<String>, fill: Rgb, highlight: Rgb) -> Self {
        Self {
            name: name.into(),
            fill,
            highlight,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaletteError {
    Empty,
    TooManyTypes(usize),
}

impl std::fmt::Display for PaletteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaletteError::Empty => write!(f, "Palette needs at least one tile type"),
            PaletteError::TooManyTypes(count) => write!(
                f,
                "Palette has {} tile types, at most {} are supported",
                count, MAX_TILE_TYPES
            ),
        }
    }
}

impl std::error::Error for PaletteError {}

/// Ordered, immutable set of tile types. Index 0 is the empty type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypePalette {
    types: Vec<TileType>,
}

impl Default for TypePalette {
    fn default() -> Self {
        Self {
            types: vec![
                TileType::new("Empty", Rgb(200, 200, 200), Rgb(150, 150, 150)),
                TileType::new("Red", Rgb(255, 0, 0), Rgb(180, 0, 0)),
                TileType::new("Blue", Rgb(0, 0, 255), Rgb(0, 0, 180)),
            ],
        }
    }
}

impl TypePalette {
    pub fn new(types: Vec<TileType>) -> Result<Self, PaletteError> {
        if types.is_empty() {
            return Err(PaletteError::Empty);
        }
        if types.len() > MAX_TILE_TYPES {
            return Err(PaletteError::TooManyTypes(types.len()));
        }
        Ok(Self { types })
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TileType> {
        self.types.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileType> {
        self.types.iter()
    }

    /// Fill color for a cell's type index, falling back to the empty type
    pub fn fill_color(&self, type_index: u8) -> Rgb {
        self.types
            .get(type_index as usize)
            .or_else(|| self.types.first())
            .map_or(Rgb::CANVAS, |tile_type| tile_type.fill)
    }

    /// Swatch rectangles, spread evenly along the bottom row of the canvas
    pub fn swatch_rects(&self, geometry: &GridGeometry) -> Vec<Rect> {
        let count = self.types.len() as f32;
        let cell = geometry.cell_size();
        let width = geometry.canvas_width() as f32;
        let y = geometry.canvas_height() as f32 - cell;
        (0..self.types.len())
            .map(|idx| {
                let x = (idx as f32 + 1.0) * width / (count + 1.0) - cell / 2.0;
                Rect::square(x, y, cell)
            })
            .collect()
    }

    /// Index of the swatch under a screen point
    pub fn swatch_at(&self, geometry: &GridGeometry, point: Point) -> Option<usize> {
        self.swatch_rects(geometry)
            .iter()
            .position(|rect| rect.contains(point))
    }
}

/// Which palette entry the next paint stroke uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaletteState {
    selected: usize,
}

impl PaletteState {
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Select a type. Indices outside the palette are ignored.
    pub fn select(&mut self, index: usize, palette: &TypePalette) -> bool {
        if index < palette.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    /// Color a swatch is drawn with: highlight when selected, fill otherwise
    pub fn swatch_color(&self, palette: &TypePalette, index: usize) -> Rgb {
        match palette.get(index) {
            Some(tile_type) if index == self.selected => tile_type.highlight,
            Some(tile_type) => tile_type.fill,
            None => Rgb::BLACK,
        }
    }
}
