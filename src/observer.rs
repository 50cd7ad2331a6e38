//! # Observer location
//!
//! [`GeoLocation`] stores the geographic position of the observer and its
//! **geocentric parallax coordinates** (ρ·cosφ, ρ·sinφ), precomputed once from the
//! geodetic latitude and elevation on the reference ellipsoid. The parallax
//! coordinates feed the topocentric correction of the altitude annotator.
//!
//! ## Units
//!
//! - Longitude: **degrees**, east positive.
//! - Latitude: **degrees**, geodetic.
//! - Elevation: **meters** above the ellipsoid.
//! - UTC offset: **hours**, used to place the start of a calendar month at local midnight.
//! - (ρ·cosφ, ρ·sinφ): **Earth equatorial radii**.
//!
//! Locations are validated at construction: the geographic poles are rejected
//! because the local horizon frame degenerates there.

use serde::{Deserialize, Serialize};

use crate::{
    constants::{Degree, Meter, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS},
    jovian_errors::JovianError,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation", into = "RawLocation")]
pub struct GeoLocation {
    longitude: Degree,
    latitude: Degree,
    elevation: Meter,
    utc_offset: f64,
    rho_cos_phi: f64,
    rho_sin_phi: f64,
}

/// Serialized form of [`GeoLocation`]; parallax terms are recomputed on load.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawLocation {
    longitude: Degree,
    latitude: Degree,
    elevation: Meter,
    #[serde(default)]
    utc_offset: f64,
}

impl TryFrom<RawLocation> for GeoLocation {
    type Error = JovianError;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        GeoLocation::new(raw.longitude, raw.latitude, raw.elevation, raw.utc_offset)
    }
}

impl From<GeoLocation> for RawLocation {
    fn from(loc: GeoLocation) -> Self {
        RawLocation {
            longitude: loc.longitude,
            latitude: loc.latitude,
            elevation: loc.elevation,
            utc_offset: loc.utc_offset,
        }
    }
}

impl GeoLocation {
    /// Create a new location from geodetic coordinates.
    ///
    /// Arguments
    /// -----------------
    /// * `longitude`: geodetic longitude in **degrees**, east positive, within `[-180, 180]`.
    /// * `latitude`: geodetic latitude in **degrees**, strictly inside `(-90, 90)`.
    /// * `elevation`: height above the ellipsoid in **meters**.
    /// * `utc_offset`: local time minus UTC in **hours**, within `[-14, 14]`.
    ///
    /// Errors
    /// ----------
    /// * [`JovianError::InvalidLocation`] for non-finite values, out-of-range
    ///   coordinates or a pole latitude.
    pub fn new(
        longitude: Degree,
        latitude: Degree,
        elevation: Meter,
        utc_offset: f64,
    ) -> Result<Self, JovianError> {
        if !(longitude.is_finite()
            && latitude.is_finite()
            && elevation.is_finite()
            && utc_offset.is_finite())
        {
            return Err(JovianError::InvalidLocation(
                "coordinates must be finite".into(),
            ));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(JovianError::InvalidLocation(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        if latitude.abs() >= 90.0 {
            return Err(JovianError::InvalidLocation(format!(
                "latitude {latitude} must be strictly between -90 and 90"
            )));
        }
        if !(-14.0..=14.0).contains(&utc_offset) {
            return Err(JovianError::InvalidLocation(format!(
                "UTC offset {utc_offset} h outside [-14, 14]"
            )));
        }

        let (rho_cos_phi, rho_sin_phi) = geodetic_to_parallax(latitude, elevation);

        Ok(GeoLocation {
            longitude,
            latitude,
            elevation,
            utc_offset,
            rho_cos_phi,
            rho_sin_phi,
        })
    }

    /// Greenwich, at sea level, UTC.
    pub fn greenwich() -> Self {
        let (rho_cos_phi, rho_sin_phi) = geodetic_to_parallax(51.4769, 0.0);
        GeoLocation {
            longitude: 0.0,
            latitude: 51.4769,
            elevation: 0.0,
            utc_offset: 0.0,
            rho_cos_phi,
            rho_sin_phi,
        }
    }

    pub fn longitude(&self) -> Degree {
        self.longitude
    }

    pub fn latitude(&self) -> Degree {
        self.latitude
    }

    pub fn elevation(&self) -> Meter {
        self.elevation
    }

    pub fn utc_offset(&self) -> f64 {
        self.utc_offset
    }

    /// ρ·cosφ′ in Earth equatorial radii.
    pub fn rho_cos_phi(&self) -> f64 {
        self.rho_cos_phi
    }

    /// ρ·sinφ′ in Earth equatorial radii.
    pub fn rho_sin_phi(&self) -> f64 {
        self.rho_sin_phi
    }
}

/// Convert geodetic latitude and height into normalized parallax coordinates.
///
/// Arguments
/// ---------
/// * `lat` - Geodetic latitude of the observer in **degrees**.
/// * `height` - Observer's altitude above the reference ellipsoid in **meters**.
///
/// Returns
/// -------
/// A tuple `(rho_cos_phi, rho_sin_phi)` in Earth equatorial radii, computed through
/// the parametric latitude `u = atan((b/a)·tan φ)`:
///
/// ```text
/// ρ_sinφ = (b/a) * sin u + (h/a) * sin φ
/// ρ_cosφ = cos u + (h/a) * cos φ
/// ```
pub fn geodetic_to_parallax(lat: Degree, height: Meter) -> (f64, f64) {
    let lat = lat.to_radians();
    let axis_ratio = EARTH_MINOR_AXIS / EARTH_MAJOR_AXIS;

    let u = (lat.sin() * axis_ratio).atan2(lat.cos());

    let rho_sin_phi = axis_ratio * u.sin() + (height / EARTH_MAJOR_AXIS) * lat.sin();
    let rho_cos_phi = u.cos() + (height / EARTH_MAJOR_AXIS) * lat.cos();

    (rho_cos_phi, rho_sin_phi)
}
