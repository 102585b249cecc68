//! Terminal output for predictions and artifact summaries.

use crate::domain::{PredictionResult, PropertyDetails};
use crate::encode::{EncodedField, EncodingKind};
use crate::io::Artifacts;

/// The two result lines shown to the user.
pub fn format_prediction(result: &PredictionResult) -> String {
    format!(
        "Predicted Price: €{}\nPrice Range: €{} - €{}\n",
        result.predicted_price, result.predicted_price_range.min, result.predicted_price_range.max
    )
}

/// Echo of the submitted form, printed above the result.
pub fn format_input_summary(details: &PropertyDetails) -> String {
    let mut out = String::new();

    out.push_str("=== Property Price Predictor (Belgium) ===\n");
    out.push_str(&format!(
        "{} in {} ({}), built {}\n",
        details.property_type, details.locality, details.zip_code, details.construction_year
    ));
    out.push_str(&format!(
        "Area: {:.1} m² | Land: {:.1} m² | Garden: {:.1} m²\n",
        details.total_area_sqm, details.surface_land_sqm, details.garden_sqm
    ));
    out.push_str(&format!(
        "Bedrooms: {} | Frontages: {} | Kitchen: {} | State: {} | EPC: {}\n",
        details.nbr_bedrooms,
        details.nbr_frontages,
        details.kitchen_type.label(),
        details.building_state.label(),
        details.epc.label()
    ));
    out.push_str(&format!(
        "Double glazing: {} | Terrace: {} | Swimming pool: {} | Flood zone: {}\n",
        yes_no(details.fl_double_glazing),
        yes_no(details.fl_terrace),
        yes_no(details.fl_swimming_pool),
        yes_no(details.fl_floodzone)
    ));

    out
}

/// Summary of loaded artifacts for `estimate inspect`.
pub fn format_artifacts(artifacts: &Artifacts) -> String {
    let mut out = String::new();

    out.push_str("Models:\n");
    for model in [&artifacts.models().house, &artifacts.models().apartment] {
        out.push_str(&format!(
            "- {:<10} schema={} columns={} regressor={}\n",
            model.property_type.label(),
            model.schema.version,
            model.n_features(),
            model.regressor.kind_name()
        ));
    }

    out.push_str("\nEncoders:\n");
    for field in EncodedField::ALL {
        let enc = artifacts.encoders().get(field);
        let kind = match enc.kind() {
            EncodingKind::Ordinal => "ordinal",
            EncodingKind::OneHot => "one_hot",
        };
        out.push_str(&format!(
            "- {:<15} {:<8} categories={} columns={}\n",
            field.name(),
            kind,
            enc.categories().len(),
            enc.width()
        ));
    }

    out.push_str(&format!("\nFeature layout: {} columns\n", artifacts.layout().len()));
    for (i, col) in artifacts.layout().columns().iter().enumerate() {
        out.push_str(&format!("{i:>4}  {col}\n"));
    }

    out
}

fn yes_no(b: bool) -> &'static str {
    if b { "Yes" } else { "No" }
}
