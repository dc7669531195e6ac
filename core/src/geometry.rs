//! Conversions between geographic coordinates and grid cells.

use serde::{Deserialize, Serialize};

use crate::{CellId, CellWindow};

/// Geographic position expressed in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees; grows northward.
    pub latitude: f64,
    /// Longitude in degrees; grows eastward.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a new geographic point.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Axis-aligned geographic rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// Northern latitude edge.
    pub north: f64,
    /// Southern latitude edge.
    pub south: f64,
    /// Eastern longitude edge.
    pub east: f64,
    /// Western longitude edge.
    pub west: f64,
}

impl GeoBounds {
    /// Creates a rectangle from its four edges.
    #[must_use]
    pub const fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Creates a rectangle of the provided extent centred on `center`.
    #[must_use]
    pub fn centered_on(center: GeoPoint, latitude_span: f64, longitude_span: f64) -> Self {
        let half_latitude = latitude_span / 2.0;
        let half_longitude = longitude_span / 2.0;
        Self::new(
            center.latitude + half_latitude,
            center.latitude - half_latitude,
            center.longitude + half_longitude,
            center.longitude - half_longitude,
        )
    }

    /// Midpoint of the rectangle.
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }

    /// Returns the rectangle shifted by the provided deltas.
    #[must_use]
    pub fn translated(self, latitude: f64, longitude: f64) -> Self {
        Self::new(
            self.north + latitude,
            self.south + latitude,
            self.east + longitude,
            self.west + longitude,
        )
    }
}

/// Maps the infinite cell grid onto geographic coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    tile_size: f64,
}

impl GridGeometry {
    /// Creates a geometry with square cells of `tile_size` degrees.
    #[must_use]
    pub const fn new(tile_size: f64) -> Self {
        Self { tile_size }
    }

    /// Rectangle covered by the provided cell.
    #[must_use]
    pub fn bounds_of(&self, cell: CellId) -> GeoBounds {
        let south = f64::from(cell.row()) * self.tile_size;
        let west = f64::from(cell.column()) * self.tile_size;
        GeoBounds::new(
            (f64::from(cell.row()) + 1.0) * self.tile_size,
            south,
            (f64::from(cell.column()) + 1.0) * self.tile_size,
            west,
        )
    }

    /// Midpoint of the provided cell, where labels and the player marker sit.
    #[must_use]
    pub fn center_of(&self, cell: CellId) -> GeoPoint {
        GeoPoint::new(
            (f64::from(cell.row()) + 0.5) * self.tile_size,
            (f64::from(cell.column()) + 0.5) * self.tile_size,
        )
    }

    /// Cell that contains the provided point.
    #[must_use]
    pub fn cell_containing(&self, point: GeoPoint) -> CellId {
        CellId::new(self.index_of(point.latitude), self.index_of(point.longitude))
    }

    /// Inclusive window of cells touched by `bounds`, grown by `margin` cells per side.
    #[must_use]
    pub fn window_for(&self, bounds: GeoBounds, margin: u32) -> CellWindow {
        let margin = i32::try_from(margin).unwrap_or(i32::MAX);
        CellWindow::new(
            self.index_of(bounds.north),
            self.index_of(bounds.south),
            self.index_of(bounds.east),
            self.index_of(bounds.west),
        )
        .expanded(margin)
    }

    // Float-to-int casts saturate, so far-away coordinates clamp to the grid edge.
    fn index_of(&self, coordinate: f64) -> i32 {
        (coordinate / self.tile_size).floor() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEOMETRY: GridGeometry = GridGeometry::new(0.0001);

    #[test]
    fn bounds_span_one_tile() {
        let bounds = GEOMETRY.bounds_of(CellId::new(2, -3));
        assert!((bounds.south - 0.0002).abs() < 1e-12);
        assert!((bounds.north - 0.0003).abs() < 1e-12);
        assert!((bounds.west + 0.0003).abs() < 1e-12);
        assert!((bounds.east + 0.0002).abs() < 1e-12);
    }

    #[test]
    fn center_maps_back_to_its_cell() {
        for cell in [
            CellId::new(0, 0),
            CellId::new(-1, -1),
            CellId::new(369_979, -1_220_571),
        ] {
            assert_eq!(GEOMETRY.cell_containing(GEOMETRY.center_of(cell)), cell);
        }
    }

    #[test]
    fn negative_coordinates_floor_toward_south_west() {
        let cell = GEOMETRY.cell_containing(GeoPoint::new(-0.00005, -0.00015));
        assert_eq!(cell, CellId::new(-1, -2));
    }

    #[test]
    fn start_location_resolves_to_expected_cell() {
        let cell =
            GEOMETRY.cell_containing(GeoPoint::new(36.997936938057016, -122.05703507501151));
        assert_eq!(cell, CellId::new(369_979, -1_220_571));
    }

    #[test]
    fn window_covers_touched_cells_and_margin() {
        let bounds = GeoBounds::new(0.00025, -0.00005, 0.00015, -0.00015);
        let window = GEOMETRY.window_for(bounds, 0);
        assert_eq!(window, CellWindow::new(2, -1, 1, -2));
        assert_eq!(GEOMETRY.window_for(bounds, 2), CellWindow::new(4, -3, 3, -4));
    }

    #[test]
    fn centered_bounds_round_trip_center() {
        let center = GeoPoint::new(1.5, -2.5);
        let bounds = GeoBounds::centered_on(center, 0.2, 0.4);
        assert!((bounds.center().latitude - 1.5).abs() < 1e-12);
        assert!((bounds.center().longitude + 2.5).abs() < 1e-12);
        assert!((bounds.north - bounds.south - 0.2).abs() < 1e-12);
    }
}
