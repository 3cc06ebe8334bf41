//! Compass wind directions and degree quantization

use serde::{Deserialize, Serialize};

/// Sixteen compass points, ordered clockwise from North
///
/// The discriminant order matters: quantization maps onto indices of this list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindDirection {
    North,
    NorthNorthEast,
    NorthEast,
    EastNorthEast,
    East,
    EastSouthEast,
    SouthEast,
    SouthSouthEast,
    South,
    SouthSouthWest,
    SouthWest,
    WestSouthWest,
    West,
    WestNorthWest,
    NorthWest,
    NorthNorthWest,
}

/// How many distinct directions a display distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionResolution {
    /// North, east, south and west
    Four = 4,
    /// Eight directions, used for arrows
    Eight = 8,
    /// All sixteen compass points
    Sixteen = 16,
}

impl DirectionResolution {
    pub fn count(self) -> u32 {
        self as u32
    }
}

impl WindDirection {
    pub const ALL: [WindDirection; 16] = [
        WindDirection::North,
        WindDirection::NorthNorthEast,
        WindDirection::NorthEast,
        WindDirection::EastNorthEast,
        WindDirection::East,
        WindDirection::EastSouthEast,
        WindDirection::SouthEast,
        WindDirection::SouthSouthEast,
        WindDirection::South,
        WindDirection::SouthSouthWest,
        WindDirection::SouthWest,
        WindDirection::WestSouthWest,
        WindDirection::West,
        WindDirection::WestNorthWest,
        WindDirection::NorthWest,
        WindDirection::NorthNorthWest,
    ];

    /// Quantizes a compass bearing into one of `resolution` buckets, expressed
    /// as a point of the full 16-point compass
    pub fn from_degrees(degrees: f64, resolution: DirectionResolution) -> Self {
        let count = resolution.count();
        let index = degree_to_index(degrees, count) * 16 / count;
        Self::ALL[index as usize]
    }

    /// Position in the 16-point compass (North is 0)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Standard English abbreviation, e.g. `"NNE"`
    pub fn abbreviation(self) -> &'static str {
        const ABBREVIATIONS: [&str; 16] = [
            "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W",
            "WNW", "NW", "NNW",
        ];
        ABBREVIATIONS[self.index()]
    }
}

/// Maps a bearing onto a bucket index in `0..directions`
///
/// Buckets are centred on their compass points, so a bearing of 0 and one of
/// 359 both fall into bucket 0.
pub fn degree_to_index(degrees: f64, directions: u32) -> u32 {
    if directions == 0 || !degrees.is_finite() {
        return 0;
    }
    let count = f64::from(directions);
    let mut degrees = degrees % 360.0;
    if degrees < 0.0 {
        degrees += 360.0;
    }
    degrees += 180.0 / count;
    let bucket = (degrees * count / 360.0).floor() as u32;
    bucket % directions
}
