//! Fee calculation
//!
//! Pure functions that turn an order subtotal and a delivery distance into the platform fee, the delivery fee and the
//! order total. Money never passes through floating point; only the distance does.
use bazaar_common::{Money, MoneyConversionError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db_types::GeoPoint;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// The fee constants for a deployment. [`FeeSchedule::default`] carries the marketplace's standard rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Charged when the subtotal is below `platform_fee_threshold`.
    pub platform_fee_fixed: Money,
    pub platform_fee_threshold: Money,
    /// Fraction of the subtotal charged at or above the threshold.
    pub platform_fee_rate: Decimal,
    pub nearby_radius_km: f64,
    pub nearby_delivery_fee: Money,
    pub distant_delivery_fee: Money,
    /// Used when the vendor or the delivery location has no coordinates.
    pub default_delivery_fee: Money,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            platform_fee_fixed: Money::from_rupees(10),
            platform_fee_threshold: Money::from_rupees(100),
            platform_fee_rate: Decimal::new(10, 2),
            nearby_radius_km: 1.0,
            nearby_delivery_fee: Money::from_rupees(10),
            distant_delivery_fee: Money::from_rupees(15),
            default_delivery_fee: Money::from_rupees(12),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub subtotal: Money,
    pub platform_fee: Money,
    pub delivery_fee: Money,
    pub total: Money,
}

impl FeeSchedule {
    pub fn platform_fee(&self, subtotal: Money) -> Result<Money, MoneyConversionError> {
        if !subtotal.is_positive() {
            return Ok(Money::ZERO);
        }
        if subtotal < self.platform_fee_threshold {
            return Ok(self.platform_fee_fixed);
        }
        Money::from_decimal_rounded(subtotal.to_decimal() * self.platform_fee_rate)
    }

    pub fn delivery_fee(&self, distance_km: Option<f64>) -> Money {
        match distance_km {
            Some(d) if d.is_finite() && d >= 0.0 => {
                if d <= self.nearby_radius_km {
                    self.nearby_delivery_fee
                } else {
                    self.distant_delivery_fee
                }
            },
            _ => self.default_delivery_fee,
        }
    }

    /// Delivery fee for a route between two optional points. A missing point means the distance is unknown.
    pub fn delivery_fee_between(&self, from: Option<GeoPoint>, to: Option<GeoPoint>) -> Money {
        self.delivery_fee(distance_km(from, to))
    }

    pub fn calculate(&self, subtotal: Money, distance_km: Option<f64>) -> Result<FeeBreakdown, MoneyConversionError> {
        let platform_fee = self.platform_fee(subtotal)?;
        let delivery_fee = self.delivery_fee(distance_km);
        Ok(FeeBreakdown { subtotal, platform_fee, delivery_fee, total: subtotal + platform_fee + delivery_fee })
    }
}

pub fn distance_km(from: Option<GeoPoint>, to: Option<GeoPoint>) -> Option<f64> {
    match (from, to) {
        (Some(a), Some(b)) => Some(haversine_km(a, b)),
        _ => None,
    }
}

/// Great-circle distance in kilometres.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2) +
        a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}
