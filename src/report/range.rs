//! Widen a point estimate into a fixed-margin price band.

use crate::domain::{PriceRange, PropertyType};

/// `[price - margin, price + margin]` with the property type's fixed margin.
///
/// The lower bound is not clamped and can go negative for very low estimates.
pub fn estimate_range(property_type: PropertyType, predicted_price: i64) -> PriceRange {
    let margin = property_type.error_margin();
    PriceRange {
        min: predicted_price.saturating_sub(margin),
        max: predicted_price.saturating_add(margin),
    }
}
