//! Albers equal-area conic projection with Alaska and Hawaii insets
//!
//! Output is in unit-sphere radians with y pointing north. The lower 48 is
//! centred on the origin; the insets sit below and to the left of it.

/// Which part of the composite projection a region is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inset {
    Lower48,
    Alaska,
    Hawaii,
}

impl Inset {
    pub fn for_region(name: &str) -> Self {
        match name {
            "Alaska" => Inset::Alaska,
            "Hawaii" => Inset::Hawaii,
            _ => Inset::Lower48,
        }
    }
}

/// Spherical Albers projection, recentred so `center` maps to the origin
#[derive(Debug, Clone, Copy)]
pub struct ConicEqualArea {
    n: f64,
    c: f64,
    rho0: f64,
    lambda0: f64,
    offset: [f64; 2],
}

impl ConicEqualArea {
    /// `parallels` and `center` are in degrees; `center` is `(lon, lat)`
    pub fn new(parallels: (f64, f64), center: (f64, f64)) -> Self {
        let (phi1, phi2) = (parallels.0.to_radians(), parallels.1.to_radians());
        let n = (phi1.sin() + phi2.sin()) / 2.0;
        let c = phi1.cos().powi(2) + 2.0 * n * phi1.sin();

        let mut projection = Self {
            n,
            c,
            rho0: 0.0,
            lambda0: center.0.to_radians(),
            offset: [0.0, 0.0],
        };
        projection.rho0 = projection.rho(center.1.to_radians());
        projection.offset = projection.project(center.0, center.1);
        projection
    }

    fn rho(&self, phi: f64) -> f64 {
        (self.c - 2.0 * self.n * phi.sin()).max(0.0).sqrt() / self.n
    }

    pub fn project(&self, lon: f64, lat: f64) -> [f64; 2] {
        let theta = self.n * (lon.to_radians() - self.lambda0);
        let rho = self.rho(lat.to_radians());
        [
            rho * theta.sin() - self.offset[0],
            self.rho0 - rho * theta.cos() - self.offset[1],
        ]
    }
}

/// Composite projection for the fifty states
#[derive(Debug, Clone, Copy)]
pub struct AlbersUsa {
    lower48: ConicEqualArea,
    alaska: ConicEqualArea,
    hawaii: ConicEqualArea,
}

const ALASKA_SCALE: f64 = 0.35;
const ALASKA_OFFSET: [f64; 2] = [-0.307, -0.201];
const HAWAII_OFFSET: [f64; 2] = [-0.205, -0.212];

impl Default for AlbersUsa {
    fn default() -> Self {
        Self {
            lower48: ConicEqualArea::new((29.5, 45.5), (-96.6, 38.7)),
            alaska: ConicEqualArea::new((55.0, 65.0), (-156.0, 58.5)),
            hawaii: ConicEqualArea::new((8.0, 18.0), (-160.0, 19.9)),
        }
    }
}

impl AlbersUsa {
    pub fn project(&self, inset: Inset, lon: f64, lat: f64) -> [f64; 2] {
        match inset {
            Inset::Lower48 => self.lower48.project(lon, lat),
            Inset::Alaska => {
                // The western Aleutians cross the antimeridian
                let lon = if lon > 0.0 { lon - 360.0 } else { lon };
                let [x, y] = self.alaska.project(lon, lat);
                [x * ALASKA_SCALE + ALASKA_OFFSET[0], y * ALASKA_SCALE + ALASKA_OFFSET[1]]
            }
            Inset::Hawaii => {
                let [x, y] = self.hawaii.project(lon, lat);
                [x + HAWAII_OFFSET[0], y + HAWAII_OFFSET[1]]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_maps_to_origin() {
        let albers = AlbersUsa::default();
        let [x, y] = albers.project(Inset::Lower48, -96.6, 38.7);
        assert!(x.abs() < 1e-12 && y.abs() < 1e-12);
    }

    #[test]
    fn test_lower48_orientation() {
        let albers = AlbersUsa::default();
        let denver = albers.project(Inset::Lower48, -104.99, 39.74);
        let new_york = albers.project(Inset::Lower48, -74.0, 40.71);
        let miami = albers.project(Inset::Lower48, -80.19, 25.76);
        let seattle = albers.project(Inset::Lower48, -122.33, 47.61);

        assert!(denver[0] < 0.0);
        assert!(new_york[0] > 0.0);
        assert!(miami[1] < new_york[1]);
        assert!(seattle[1] > denver[1]);
        assert!(seattle[0] < denver[0]);
    }

    #[test]
    fn test_insets_sit_bottom_left() {
        let albers = AlbersUsa::default();
        let anchorage = albers.project(Inset::Alaska, -149.9, 61.2);
        let honolulu = albers.project(Inset::Hawaii, -157.86, 21.31);
        let san_diego = albers.project(Inset::Lower48, -117.16, 32.72);

        assert!(anchorage[0] < 0.0);
        assert!(anchorage[1] < san_diego[1]);
        assert!(honolulu[1] < san_diego[1]);
    }

    #[test]
    fn test_aleutians_stay_continuous() {
        let albers = AlbersUsa::default();
        let west = albers.project(Inset::Alaska, 179.5, 51.8);
        let east = albers.project(Inset::Alaska, -179.5, 51.8);
        assert!((west[0] - east[0]).abs() < 0.01);
    }

    #[test]
    fn test_inset_for_region() {
        assert_eq!(Inset::for_region("Alaska"), Inset::Alaska);
        assert_eq!(Inset::for_region("Hawaii"), Inset::Hawaii);
        assert_eq!(Inset::for_region("Texas"), Inset::Lower48);
    }
}
