//! Player colors and per-color data storage.
//!
//! ## Color
//!
//! The four seats of the board, in fixed turn rotation order:
//! Yellow → Red → Green → Blue → Yellow.
//!
//! ## ColorMap
//!
//! Fixed-size per-color storage backed by an array for O(1) access.
//! Supports iteration and indexing by `Color`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the four player colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Yellow,
    Red,
    Green,
    Blue,
}

impl Color {
    /// All colors in turn rotation order.
    pub const ROTATION: [Color; 4] = [Color::Yellow, Color::Red, Color::Green, Color::Blue];

    /// Get the 0-based rotation index.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Get the color at a rotation index.
    ///
    /// Panics if `index >= 4`.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ROTATION[index]
    }

    /// The color after this one in rotation, regardless of who is playing.
    ///
    /// ```
    /// use ludo_engine::core::Color;
    ///
    /// assert_eq!(Color::Yellow.next(), Color::Red);
    /// assert_eq!(Color::Blue.next(), Color::Yellow);
    /// ```
    #[must_use]
    pub const fn next(self) -> Self {
        Self::ROTATION[(self.index() + 1) % 4]
    }

    /// Lowercase name, also used in token labels.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Color::Yellow => "yellow",
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-color data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use ludo_engine::core::{Color, ColorMap};
///
/// let mut finished: ColorMap<u8> = ColorMap::with_value(0);
/// finished[Color::Green] = 2;
/// assert_eq!(finished[Color::Green], 2);
/// assert_eq!(finished[Color::Red], 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorMap<T> {
    data: [T; 4],
}

impl<T> ColorMap<T> {
    /// Create a new ColorMap with values from a factory function.
    pub fn new(factory: impl Fn(Color) -> T) -> Self {
        Self {
            data: Color::ROTATION.map(factory),
        }
    }

    /// Create a new ColorMap with all entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new ColorMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a color's data.
    #[must_use]
    pub fn get(&self, color: Color) -> &T {
        &self.data[color.index()]
    }

    /// Get a mutable reference to a color's data.
    pub fn get_mut(&mut self, color: Color) -> &mut T {
        &mut self.data[color.index()]
    }

    /// Iterate over (Color, &T) pairs in rotation order.
    pub fn iter(&self) -> impl Iterator<Item = (Color, &T)> {
        Color::ROTATION.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Color, &mut T) pairs in rotation order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Color, &mut T)> {
        Color::ROTATION.into_iter().zip(self.data.iter_mut())
    }
}

impl<T: Default> Default for ColorMap<T> {
    fn default() -> Self {
        Self::with_default()
    }
}

impl<T> Index<Color> for ColorMap<T> {
    type Output = T;

    fn index(&self, color: Color) -> &Self::Output {
        self.get(color)
    }
}

impl<T> IndexMut<Color> for ColorMap<T> {
    fn index_mut(&mut self, color: Color) -> &mut Self::Output {
        self.get_mut(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_order() {
        assert_eq!(Color::Yellow.next(), Color::Red);
        assert_eq!(Color::Red.next(), Color::Green);
        assert_eq!(Color::Green.next(), Color::Blue);
        assert_eq!(Color::Blue.next(), Color::Yellow);
    }

    #[test]
    fn test_index_roundtrip() {
        for color in Color::ROTATION {
            assert_eq!(Color::from_index(color.index()), color);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Color::Green), "green");
    }

    #[test]
    fn test_color_map_new() {
        let map: ColorMap<usize> = ColorMap::new(|c| c.index() * 10);

        assert_eq!(map[Color::Yellow], 0);
        assert_eq!(map[Color::Red], 10);
        assert_eq!(map[Color::Green], 20);
        assert_eq!(map[Color::Blue], 30);
    }

    #[test]
    fn test_color_map_mutation_and_iter() {
        let mut map: ColorMap<i32> = ColorMap::with_value(0);
        map[Color::Blue] = 7;

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[3], (Color::Blue, &7));
        assert_eq!(pairs[0], (Color::Yellow, &0));
    }

    #[test]
    fn test_color_serialization() {
        let json = serde_json::to_string(&Color::Red).unwrap();
        assert_eq!(json, "\"red\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::Red);
    }

    #[test]
    fn test_color_map_serialization() {
        let map: ColorMap<String> = ColorMap::new(|c| c.name().to_uppercase());
        let json = serde_json::to_string(&map).unwrap();
        let back: ColorMap<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, back);
    }
}
