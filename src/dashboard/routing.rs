//! Route options and map overlay
//!
//! Route search is simulated: every search yields the same three options and
//! the same overlay, independent of origin and destination.

use serde::{Deserialize, Serialize};

/// Default map center (New Delhi)
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    lat: 28.6139,
    lon: 77.2090,
};

/// Default map zoom level
pub const DEFAULT_ZOOM: u8 = 12;

const DESTINATION: Coordinate = Coordinate {
    lat: 28.6300,
    lon: 77.2400,
};

/// Pollution exposure along a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollutionLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for PollutionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollutionLevel::Low => write!(f, "Low"),
            PollutionLevel::Medium => write!(f, "Medium"),
            PollutionLevel::High => write!(f, "High"),
        }
    }
}

/// Tree cover along a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeCover {
    Low,
    #[default]
    Medium,
    High,
}

/// Display color class of a route option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteColor {
    Green,
    Yellow,
    Red,
}

impl RouteColor {
    /// Polyline stroke color
    pub fn hex(&self) -> &'static str {
        match self {
            RouteColor::Green => "#22c55e",
            RouteColor::Yellow => "#fbbf24",
            RouteColor::Red => "#ef4444",
        }
    }
}

impl std::fmt::Display for RouteColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteColor::Green => write!(f, "green"),
            RouteColor::Yellow => write!(f, "yellow"),
            RouteColor::Red => write!(f, "red"),
        }
    }
}

/// One simulated route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOption {
    pub name: String,
    pub distance_km: f64,
    pub duration_min: u32,
    pub pollution: PollutionLevel,
    pub co2_kg: f64,
    pub color: RouteColor,
}

impl RouteOption {
    fn new(
        name: &str,
        distance_km: f64,
        duration_min: u32,
        pollution: PollutionLevel,
        co2_kg: f64,
        color: RouteColor,
    ) -> Self {
        Self {
            name: name.to_string(),
            distance_km,
            duration_min,
            pollution,
            co2_kg,
            color,
        }
    }

    /// e.g. "12.5 km"
    pub fn distance(&self) -> String {
        format!("{:.1} km", self.distance_km)
    }

    /// e.g. "28 min"
    pub fn time(&self) -> String {
        format!("{} min", self.duration_min)
    }

    /// e.g. "1.2 kg"
    pub fn co2(&self) -> String {
        format!("{:.1} kg", self.co2_kg)
    }

    /// Eco score with default tree cover and AQI
    pub fn eco_score(&self) -> u8 {
        eco_score(self.pollution, TreeCover::default(), DEFAULT_AQI)
    }
}

/// The three route options returned by every search
pub fn route_options() -> Vec<RouteOption> {
    vec![
        RouteOption::new("Eco Route", 12.5, 28, PollutionLevel::Low, 1.2, RouteColor::Green),
        RouteOption::new("Moderate Route", 10.8, 22, PollutionLevel::Medium, 2.5, RouteColor::Yellow),
        RouteOption::new("Fast Route", 9.2, 18, PollutionLevel::High, 4.8, RouteColor::Red),
    ]
}

/// AQI assumed when none is supplied
pub const DEFAULT_AQI: u32 = 100;

/// Eco-friendliness score in 0..=100.
///
/// Base 50; pollution low +30 / medium +15; tree cover high +20 / medium +10;
/// AQI below 50 adds 10, above 150 subtracts 20.
pub fn eco_score(pollution: PollutionLevel, tree_cover: TreeCover, aqi: u32) -> u8 {
    let mut score: i32 = 50;

    score += match pollution {
        PollutionLevel::Low => 30,
        PollutionLevel::Medium => 15,
        PollutionLevel::High => 0,
    };

    score += match tree_cover {
        TreeCover::High => 20,
        TreeCover::Medium => 10,
        TreeCover::Low => 0,
    };

    if aqi < 50 {
        score += 10;
    } else if aqi > 150 {
        score -= 20;
    }

    score.clamp(0, 100) as u8
}

// ============================================
// Map overlay
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// A colored line drawn over the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub coords: Vec<Coordinate>,
    pub color: String,
    pub weight: u8,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub position: Coordinate,
    pub popup: String,
}

/// Everything a map widget needs to draw the current view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapOverlay {
    pub center: Coordinate,
    pub zoom: u8,
    pub polylines: Vec<Polyline>,
    pub markers: Vec<Marker>,
}

impl MapOverlay {
    /// Initial view: centered on the user's location with one marker
    pub fn initial() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            polylines: Vec::new(),
            markers: vec![Marker {
                position: DEFAULT_CENTER,
                popup: "New Delhi - Your Location".to_string(),
            }],
        }
    }

    /// View after a search: previous lines and markers are replaced by one
    /// polyline per route plus start and destination markers.
    pub fn for_routes(routes: &[RouteOption]) -> Self {
        let waypoints = [
            Coordinate { lat: 28.6200, lon: 77.2200 },
            Coordinate { lat: 28.6250, lon: 77.2150 },
            Coordinate { lat: 28.6180, lon: 77.2250 },
        ];

        let polylines = routes
            .iter()
            .zip(waypoints)
            .enumerate()
            .map(|(i, (route, via))| Polyline {
                coords: vec![DEFAULT_CENTER, via, DESTINATION],
                color: route.color.hex().to_string(),
                weight: if i == 0 { 6 } else { 4 },
                opacity: 0.7,
            })
            .collect();

        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            polylines,
            markers: vec![
                Marker {
                    position: DEFAULT_CENTER,
                    popup: "Start".to_string(),
                },
                Marker {
                    position: DESTINATION,
                    popup: "Destination".to_string(),
                },
            ],
        }
    }
}
