use serde::Serialize;

/// How precisely a geocoding match pins down the address, from an exact
/// building down to "somewhere in this region".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Granularity {
    #[serde(rename = "PREMISE")]
    Premise,
    #[serde(rename = "PREMISE_PROXIMITY")]
    PremiseProximity,
    #[serde(rename = "BLOCK")]
    Block,
    #[serde(rename = "ROUTE")]
    Route,
    #[serde(rename = "NEIGHBORHOOD")]
    Neighborhood,
    #[serde(rename = "LOCALITY")]
    Locality,
    #[serde(rename = "SUBLOCALITY")]
    Sublocality,
    #[serde(rename = "ADMINISTRATIVE_AREA")]
    AdministrativeArea,
    #[serde(rename = "OTHER")]
    Other,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Granularity::Premise => "PREMISE",
            Granularity::PremiseProximity => "PREMISE_PROXIMITY",
            Granularity::Block => "BLOCK",
            Granularity::Route => "ROUTE",
            Granularity::Neighborhood => "NEIGHBORHOOD",
            Granularity::Locality => "LOCALITY",
            Granularity::Sublocality => "SUBLOCALITY",
            Granularity::AdministrativeArea => "ADMINISTRATIVE_AREA",
            Granularity::Other => "OTHER",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    Accept,
    Warning,
    Reject,
}

/// Classify a match's granularity from its place-type tags.
/// First matching rule wins, most specific first.
pub fn classify(place_types: &[String]) -> Granularity {
    let has = |t: &str| place_types.iter().any(|p| p == t);

    if has("street_address") || has("premise") {
        return Granularity::Premise;
    }
    if has("subpremise") {
        return Granularity::Premise;
    }
    if has("route") {
        // A route with a house number is as good as an exact address.
        if has("street_number") {
            return Granularity::Premise;
        }
        return Granularity::Route;
    }
    if has("intersection") {
        return Granularity::Block;
    }
    if has("neighborhood") {
        return Granularity::Neighborhood;
    }
    if has("locality") || has("political") {
        return Granularity::Locality;
    }
    if has("sublocality") {
        return Granularity::Sublocality;
    }
    if has("administrative_area_level_1") || has("administrative_area_level_2") {
        return Granularity::AdministrativeArea;
    }
    Granularity::Other
}

pub fn validation_level(granularity: Granularity) -> ValidationLevel {
    match granularity {
        Granularity::Premise | Granularity::PremiseProximity => ValidationLevel::Accept,
        Granularity::Block | Granularity::Route => ValidationLevel::Warning,
        _ => ValidationLevel::Reject,
    }
}

pub fn warning_message(granularity: Granularity) -> Option<String> {
    match validation_level(granularity) {
        ValidationLevel::Accept => None,
        ValidationLevel::Warning => Some(format!(
            "La dirección no es muy precisa (nivel: {granularity}). \
             Considera agregar número de casa o especificar mejor la ubicación."
        )),
        ValidationLevel::Reject => Some(format!(
            "La dirección es demasiado imprecisa (nivel: {granularity}). \
             Por favor proporciona una dirección más específica con número de casa."
        )),
    }
}

/// Confidence in [0, 1]: base score from the provider's positional-precision
/// tag, scaled by how granular the match is, rounded to 2 decimals.
pub fn confidence(precision: &str, granularity: Granularity) -> f64 {
    let base: f64 = match precision {
        "ROOFTOP" => 1.0,
        "RANGE_INTERPOLATED" => 0.8,
        "GEOMETRIC_CENTER" => 0.6,
        "APPROXIMATE" => 0.4,
        _ => 0.3,
    };

    let multiplier = match granularity {
        Granularity::Premise => 1.0,
        Granularity::PremiseProximity => 0.95,
        Granularity::Block => 0.7,
        Granularity::Route => 0.6,
        Granularity::Neighborhood => 0.4,
        Granularity::Locality => 0.3,
        Granularity::Sublocality => 0.35,
        Granularity::AdministrativeArea => 0.2,
        Granularity::Other => 0.1,
    };

    (base * multiplier * 100.0).round() / 100.0
}
