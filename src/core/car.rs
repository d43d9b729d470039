//! The car entity and its writable field set

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned car identifier (autoincrement, immutable)
pub type CarId = i64;

/// Kilometre to mile conversion factor used for `mileage_miles`
pub const MILES_PER_KM: f64 = 0.621371;

/// Derive the mileage in miles from a kilometre reading
///
/// Always `floor(km * 0.621371)`; this is the only way `mileage_miles` is set.
pub fn km_to_miles(km: i64) -> i64 {
    (km as f64 * MILES_PER_KM).floor() as i64
}

/// The full set of client-supplied descriptive fields
///
/// Used both for creation and for full replacement. It deliberately carries
/// neither `photos` nor `mileage_miles`: photos are only mutated through the
/// attachment manager and miles are always derived from `mileage_km`.
///
/// No numeric bounds are enforced; a negative price is stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarFields {
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub series: Option<String>,
    pub year: i32,
    pub mileage_km: i64,
    pub engine_cm3: i32,
    /// e.g. "stacjonarny", "odpala", "odpala i jezdzi"
    pub car_status: String,
    /// e.g. "na miejscu", "w drodze"
    pub location_status: String,
    pub price: f64,
}

/// A persisted vehicle listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: CarId,
    pub brand: String,
    pub model: String,
    pub series: Option<String>,
    pub year: i32,
    pub mileage_km: i64,
    pub mileage_miles: i64,
    pub engine_cm3: i32,
    pub car_status: String,
    pub location_status: String,
    pub price: f64,

    /// Public photo URLs in insertion order
    ///
    /// Positions are not stable identifiers: removing an element shifts every
    /// later element down by one.
    #[serde(default)]
    pub photos: Vec<String>,

    pub created_at: DateTime<Utc>,

    /// Optimistic concurrency stamp, bumped on every successful write
    pub version: u64,
}

impl Car {
    /// Build a freshly created car: empty photo list, version 1
    pub fn new(id: CarId, fields: CarFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            mileage_miles: km_to_miles(fields.mileage_km),
            brand: fields.brand,
            model: fields.model,
            series: fields.series,
            year: fields.year,
            mileage_km: fields.mileage_km,
            engine_cm3: fields.engine_cm3,
            car_status: fields.car_status,
            location_status: fields.location_status,
            price: fields.price,
            photos: Vec::new(),
            created_at,
            version: 1,
        }
    }

    /// Overwrite every descriptive field and recompute `mileage_miles`
    ///
    /// Leaves `id`, `photos`, `created_at` and `version` untouched.
    pub fn apply_fields(&mut self, fields: CarFields) {
        self.brand = fields.brand;
        self.model = fields.model;
        self.series = fields.series;
        self.year = fields.year;
        self.mileage_km = fields.mileage_km;
        self.mileage_miles = km_to_miles(fields.mileage_km);
        self.engine_cm3 = fields.engine_cm3;
        self.car_status = fields.car_status;
        self.location_status = fields.location_status;
        self.price = fields.price;
    }

    /// The descriptive fields of this car
    pub fn fields(&self) -> CarFields {
        CarFields {
            brand: self.brand.clone(),
            model: self.model.clone(),
            series: self.series.clone(),
            year: self.year,
            mileage_km: self.mileage_km,
            engine_cm3: self.engine_cm3,
            car_status: self.car_status.clone(),
            location_status: self.location_status.clone(),
            price: self.price,
        }
    }
}
