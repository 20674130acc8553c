//! Product records, payload validation, and duplicate detection.
//!
//! Pure domain logic over in-memory record sequences. The catalog itself is
//! a flat JSON collection; callers load it through `vitrina-store` and pass
//! the records in.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Field constants
// ---------------------------------------------------------------------------

/// Fields every submission payload must carry, in validation order.
pub const COMMON_REQUIRED_FIELDS: &[&str] =
    &["category", "brand", "name", "flavor", "price", "description"];

/// Fields the HTTP catalog endpoint requires, in validation order. The bot
/// supplies `image_url` itself, which is why it sits between `flavor` and
/// `price` here but is forbidden in chat submissions.
pub const API_REQUIRED_FIELDS: &[&str] = &[
    "category",
    "brand",
    "name",
    "flavor",
    "image_url",
    "price",
    "description",
];

/// Location fields that turn a payload into a located product.
pub const LOCATION_FIELDS: &[&str] = &["city", "street"];

/// The image reference field, forbidden in chat payloads.
pub const IMAGE_URL_FIELD: &str = "image_url";

/// Characters outside Cyrillic/latin letters, digits, and whitespace are
/// stripped when building the street comparison key.
static STREET_JUNK_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"[^а-яa-z0-9\s]").expect("valid regex"));

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// Product fields as submitted (everything except the server-generated id).
///
/// A record with both `city` and `street` present is a *located* product and
/// participates in duplicate detection; promotions and new items never carry
/// the location fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductFields {
    pub category: String,
    pub brand: String,
    pub name: String,
    pub flavor: String,
    pub image_url: String,
    /// Stored verbatim; existing data files carry both numbers and
    /// strings here, so no numeric type is forced on it.
    pub price: Value,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
}

impl ProductFields {
    /// A located product carries both location fields.
    pub fn is_located(&self) -> bool {
        self.city.is_some() && self.street.is_some()
    }
}

/// A catalog record: server-generated numeric-string id plus the submitted
/// fields. The id is assigned at insertion and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(flatten)]
    pub fields: ProductFields,
}

// ---------------------------------------------------------------------------
// Id generation
// ---------------------------------------------------------------------------

/// Generate an opaque numeric-string product id (decimal random `u32`).
pub fn generate_id() -> String {
    rand::random::<u32>().to_string()
}

// ---------------------------------------------------------------------------
// Street normalization
// ---------------------------------------------------------------------------

/// Build the street comparison key: lower-case, strip everything outside
/// `{Cyrillic letters, latin letters, digits, whitespace}`, trim edges.
///
/// This is purely a comparison key; stored records keep the original
/// (trimmed) street text.
pub fn normalize_street(raw: &str) -> String {
    STREET_JUNK_RE
        .replace_all(&raw.to_lowercase(), "")
        .trim()
        .to_string()
}

// ---------------------------------------------------------------------------
// Duplicate detection
// ---------------------------------------------------------------------------

/// Returns true iff an existing located record matches `candidate` on
/// `category`, `brand`, `name`, `flavor`, `city` (exact, case-sensitive)
/// and on normalized street.
///
/// Unlocated candidates and unlocated existing records never match, so
/// promotions and new items are never deduplicated.
pub fn is_duplicate(existing: &[Product], candidate: &ProductFields) -> bool {
    let (Some(city), Some(street)) = (&candidate.city, &candidate.street) else {
        return false;
    };
    let street_key = normalize_street(street);

    existing.iter().any(|product| {
        let f = &product.fields;
        match (&f.city, &f.street) {
            (Some(existing_city), Some(existing_street)) => {
                f.category == candidate.category
                    && f.brand == candidate.brand
                    && f.name == candidate.name
                    && f.flavor == candidate.flavor
                    && existing_city == city
                    && normalize_street(existing_street) == street_key
            }
            _ => false,
        }
    })
}

// ---------------------------------------------------------------------------
// Payload validation (HTTP catalog endpoint)
// ---------------------------------------------------------------------------

/// Validate a raw `POST /api/add-product` payload into typed fields.
///
/// Check order: required-field presence first
/// (`Missing required field: X` names the first gap), then the located
/// check (`city` and `street` both present must both be non-empty), then
/// field typing. The street is trimmed; everything else is stored as given.
pub fn validate_product_payload(payload: &Value) -> Result<ProductFields, CoreError> {
    let object = payload
        .as_object()
        .ok_or_else(|| CoreError::Parse("expected a JSON object".into()))?;

    for field in API_REQUIRED_FIELDS {
        if !object.contains_key(*field) {
            return Err(CoreError::Validation(format!(
                "Missing required field: {field}"
            )));
        }
    }

    let is_located =
        object.contains_key(LOCATION_FIELDS[0]) && object.contains_key(LOCATION_FIELDS[1]);
    if is_located {
        let city_empty = object["city"].as_str().map_or(true, str::is_empty);
        let street_empty = object["street"].as_str().map_or(true, str::is_empty);
        if city_empty || street_empty {
            return Err(CoreError::Validation("Missing city or street".into()));
        }
    }

    let text = |field: &str| -> Result<String, CoreError> {
        object[field]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| CoreError::Validation(format!("Field '{field}' must be a string")))
    };

    let price = object["price"].clone();
    if price.is_null() {
        return Err(CoreError::Validation("Field 'price' must not be null".into()));
    }

    Ok(ProductFields {
        category: text("category")?,
        brand: text("brand")?,
        name: text("name")?,
        flavor: text("flavor")?,
        image_url: text("image_url")?,
        price,
        description: text("description")?,
        city: if is_located { Some(text("city")?) } else { None },
        street: if is_located {
            Some(text("street")?.trim().to_string())
        } else {
            None
        },
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn located(category: &str, brand: &str, name: &str, flavor: &str, city: &str, street: &str) -> ProductFields {
        ProductFields {
            category: category.into(),
            brand: brand.into(),
            name: name.into(),
            flavor: flavor.into(),
            image_url: "/images/x.jpg".into(),
            price: json!(150),
            description: "d".into(),
            city: Some(city.into()),
            street: Some(street.into()),
        }
    }

    fn stored(fields: ProductFields) -> Product {
        Product {
            id: generate_id(),
            fields,
        }
    }

    // -- Street normalization ------------------------------------------------

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize_street("Ленина, 1!"), "ленина 1");
        assert_eq!(normalize_street("  Lenina 1  "), "lenina 1");
    }

    #[test]
    fn streets_differing_only_by_punctuation_share_a_key() {
        assert_eq!(normalize_street("Lenina 1"), normalize_street("lenina, 1!"));
        assert_eq!(
            normalize_street("пр-кт Ломоносова, д. 5"),
            normalize_street("пркт ломоносова д 5"),
        );
    }

    // -- Duplicate detection -------------------------------------------------

    #[test]
    fn duplicate_detected_across_street_spelling_variants() {
        let existing = vec![stored(located("A", "B", "C", "D", "X", "Lenina 1"))];
        let candidate = located("A", "B", "C", "D", "X", "lenina, 1!");
        assert!(is_duplicate(&existing, &candidate));
    }

    #[test]
    fn different_city_is_not_a_duplicate() {
        let existing = vec![stored(located("A", "B", "C", "D", "X", "Lenina 1"))];
        let candidate = located("A", "B", "C", "D", "Y", "Lenina 1");
        assert!(!is_duplicate(&existing, &candidate));
    }

    #[test]
    fn city_comparison_is_case_sensitive() {
        let existing = vec![stored(located("A", "B", "C", "D", "X", "Lenina 1"))];
        let candidate = located("A", "B", "C", "D", "x", "Lenina 1");
        assert!(!is_duplicate(&existing, &candidate));
    }

    #[test]
    fn unlocated_candidate_never_matches() {
        let existing = vec![stored(located("A", "B", "C", "D", "X", "Lenina 1"))];
        let mut candidate = located("A", "B", "C", "D", "X", "Lenina 1");
        candidate.city = None;
        candidate.street = None;
        assert!(!is_duplicate(&existing, &candidate));
    }

    #[test]
    fn unlocated_existing_record_never_matches() {
        let mut unlocated = located("A", "B", "C", "D", "X", "Lenina 1");
        unlocated.city = None;
        unlocated.street = None;
        let existing = vec![stored(unlocated)];
        let candidate = located("A", "B", "C", "D", "X", "Lenina 1");
        assert!(!is_duplicate(&existing, &candidate));
    }

    // -- Payload validation --------------------------------------------------

    fn full_payload() -> serde_json::Value {
        json!({
            "category": "A", "brand": "B", "name": "C", "flavor": "D",
            "image_url": "/images/x.jpg", "price": 150, "description": "d",
            "city": "X", "street": " Lenina 1 ",
        })
    }

    #[test]
    fn valid_payload_parses_and_trims_street() {
        let fields = validate_product_payload(&full_payload()).unwrap();
        assert!(fields.is_located());
        assert_eq!(fields.street.as_deref(), Some("Lenina 1"));
    }

    #[test]
    fn first_missing_field_is_named() {
        let mut payload = full_payload();
        payload.as_object_mut().unwrap().remove("brand");
        payload.as_object_mut().unwrap().remove("price");
        let err = validate_product_payload(&payload).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "Missing required field: brand");
    }

    #[test]
    fn empty_street_is_rejected_when_both_location_fields_present() {
        let mut payload = full_payload();
        payload["street"] = json!("");
        let err = validate_product_payload(&payload).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "Missing city or street");
    }

    #[test]
    fn payload_with_only_city_is_unlocated() {
        let mut payload = full_payload();
        payload.as_object_mut().unwrap().remove("street");
        let fields = validate_product_payload(&payload).unwrap();
        assert!(!fields.is_located());
        assert_eq!(fields.city, None);
    }

    #[test]
    fn non_object_payload_is_a_parse_error() {
        let err = validate_product_payload(&json!([1, 2, 3])).unwrap_err();
        assert_matches!(err, CoreError::Parse(_));
    }

    #[test]
    fn generated_ids_are_numeric_strings() {
        let id = generate_id();
        assert!(id.parse::<u32>().is_ok());
    }
}
