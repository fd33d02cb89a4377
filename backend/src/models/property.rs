//! Models that represent property listings and their API payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::user::User;
use crate::validation::rules::validate_price;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "kebab-case")]
/// Enumerated kind of property stored in the database.
pub enum PropertyType {
    House,
    Apartment,
    Land,
    Commercial,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "house",
            PropertyType::Apartment => "apartment",
            PropertyType::Land => "land",
            PropertyType::Commercial => "commercial",
        }
    }
}

impl Serialize for PropertyType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PropertyType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "house" => Ok(PropertyType::House),
            "apartment" => Ok(PropertyType::Apartment),
            "land" => Ok(PropertyType::Land),
            "commercial" => Ok(PropertyType::Commercial),
            other => Err(serde::de::Error::unknown_variant(
                other,
                &["house", "apartment", "land", "commercial"],
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "kebab-case")]
/// Whether a listing is offered for sale or for rent.
pub enum ListingStatus {
    ForSale,
    ForRent,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::ForSale => "for-sale",
            ListingStatus::ForRent => "for-rent",
        }
    }
}

impl Serialize for ListingStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ListingStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "for-sale" => Ok(ListingStatus::ForSale),
            "for-rent" => Ok(ListingStatus::ForRent),
            other => Err(serde::de::Error::unknown_variant(
                other,
                &["for-sale", "for-rent"],
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[validate(length(min = 1))]
    pub zip_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
/// Optional amenity fields; every field is independently nullable.
pub struct Features {
    #[validate(range(min = 0))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 0))]
    pub bathrooms: Option<i32>,
    /// In square meters.
    pub building_size: Option<f64>,
    /// In square meters.
    pub land_size: Option<f64>,
    #[validate(range(min = 0))]
    pub garage: Option<i32>,
    pub year_built: Option<i32>,
    pub furnished: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Payload for creating a listing. The owner is never client-supplied; it is
/// stamped from the verified session.
pub struct CreatePropertyRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub status: ListingStatus,
    #[validate(custom(function = validate_price))]
    pub price: f64,
    #[validate(nested)]
    pub location: Location,
    #[serde(default)]
    #[validate(nested)]
    pub features: Features,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, FromRow)]
/// Flat row shape for a listing joined with its owner's display fields.
pub struct PropertyRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub status: ListingStatus,
    pub price: f64,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub zip_code: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub building_size: Option<f64>,
    pub land_size: Option<f64>,
    pub garage: Option<i32>,
    pub year_built: Option<i32>,
    pub furnished: Option<bool>,
    pub images: Vec<String>,
    pub owner_id: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_phone: Option<String>,
}

impl PropertyRecord {
    /// Builds a new listing from a validated payload, owned by `owner`.
    pub fn new(payload: CreatePropertyRequest, owner: &User) -> Self {
        let now = Utc::now();
        let coordinates = payload.location.coordinates;
        Self {
            id: Uuid::new_v4().to_string(),
            title: payload.title,
            description: payload.description,
            property_type: payload.property_type,
            status: payload.status,
            price: payload.price,
            address: payload.location.address,
            city: payload.location.city,
            state: payload.location.state,
            zip_code: payload.location.zip_code,
            lat: coordinates.map(|c| c.lat),
            lng: coordinates.map(|c| c.lng),
            bedrooms: payload.features.bedrooms,
            bathrooms: payload.features.bathrooms,
            building_size: payload.features.building_size,
            land_size: payload.features.land_size,
            garage: payload.features.garage,
            year_built: payload.features.year_built,
            furnished: payload.features.furnished,
            images: payload.images,
            owner_id: owner.id.clone(),
            featured: payload.featured,
            created_at: now,
            updated_at: now,
            owner_name: owner.name.clone(),
            owner_email: owner.email.clone(),
            owner_phone: owner.phone.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
/// Owner display subset resolved for listing responses.
pub struct PropertyOwner {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
/// Public-facing representation of a listing with the owner populated.
pub struct PropertyResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub status: ListingStatus,
    pub price: f64,
    pub location: Location,
    pub features: Features,
    pub images: Vec<String>,
    pub owner: PropertyOwner,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PropertyRecord> for PropertyResponse {
    fn from(record: PropertyRecord) -> Self {
        let coordinates = match (record.lat, record.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        };
        PropertyResponse {
            id: record.id,
            title: record.title,
            description: record.description,
            property_type: record.property_type,
            status: record.status,
            price: record.price,
            location: Location {
                address: record.address,
                city: record.city,
                state: record.state,
                zip_code: record.zip_code,
                coordinates,
            },
            features: Features {
                bedrooms: record.bedrooms,
                bathrooms: record.bathrooms,
                building_size: record.building_size,
                land_size: record.land_size,
                garage: record.garage,
                year_built: record.year_built,
                furnished: record.furnished,
            },
            images: record.images,
            owner: PropertyOwner {
                id: record.owner_id,
                name: record.owner_name,
                email: record.owner_email,
                phone: record.owner_phone,
            },
            featured: record.featured,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;

    fn sample_owner() -> User {
        User::new(
            "Alice".into(),
            "alice@example.com".into(),
            "hash".into(),
            Some("+62123".into()),
            UserRole::Agent,
        )
    }

    #[test]
    fn enum_serde_uses_wire_values() {
        assert_eq!(
            serde_json::to_value(PropertyType::Commercial).unwrap(),
            "commercial"
        );
        assert_eq!(
            serde_json::to_value(ListingStatus::ForSale).unwrap(),
            "for-sale"
        );
        assert!(matches!(
            serde_json::from_str::<ListingStatus>("\"for-rent\"").unwrap(),
            ListingStatus::ForRent
        ));
        assert!(serde_json::from_str::<PropertyType>("\"castle\"").is_err());
        assert!(serde_json::from_str::<ListingStatus>("\"sold\"").is_err());
    }

    #[test]
    fn create_payload_accepts_minimal_listing() {
        let payload: CreatePropertyRequest = serde_json::from_value(serde_json::json!({
            "title": "T",
            "description": "D",
            "type": "house",
            "status": "for-sale",
            "price": 100,
            "location": { "address": "A", "city": "C", "zipCode": "123" }
        }))
        .expect("deserialize payload");
        assert!(payload.validate().is_ok());
        assert_eq!(payload.property_type, PropertyType::House);
        assert!(payload.features.bedrooms.is_none());
        assert!(payload.images.is_empty());
        assert!(!payload.featured);
    }

    #[test]
    fn create_payload_rejects_invalid_fields() {
        let empty_title: CreatePropertyRequest = serde_json::from_value(serde_json::json!({
            "title": "",
            "description": "D",
            "type": "house",
            "status": "for-sale",
            "price": 100,
            "location": { "address": "A", "city": "C", "zipCode": "123" }
        }))
        .unwrap();
        assert!(empty_title.validate().is_err());

        let negative_price: CreatePropertyRequest = serde_json::from_value(serde_json::json!({
            "title": "T",
            "description": "D",
            "type": "house",
            "status": "for-sale",
            "price": -5,
            "location": { "address": "A", "city": "C", "zipCode": "123" }
        }))
        .unwrap();
        assert!(negative_price.validate().is_err());
    }

    #[test]
    fn record_stamps_owner_and_timestamps() {
        let owner = sample_owner();
        let payload: CreatePropertyRequest = serde_json::from_value(serde_json::json!({
            "title": "Seaside villa",
            "description": "D",
            "type": "house",
            "status": "for-rent",
            "price": 1200.5,
            "location": {
                "address": "A", "city": "C", "zipCode": "123",
                "coordinates": { "lat": -6.2, "lng": 106.8 }
            },
            "features": { "bedrooms": 3, "furnished": true }
        }))
        .unwrap();

        let record = PropertyRecord::new(payload, &owner);
        assert_eq!(record.owner_id, owner.id);
        assert_eq!(record.owner_email, "alice@example.com");
        assert_eq!(record.created_at, record.updated_at);
        assert_eq!(record.lat, Some(-6.2));
        assert_eq!(record.bedrooms, Some(3));
    }

    #[test]
    fn response_shape_matches_wire_format() {
        let owner = sample_owner();
        let payload: CreatePropertyRequest = serde_json::from_value(serde_json::json!({
            "title": "T",
            "description": "D",
            "type": "apartment",
            "status": "for-sale",
            "price": 100,
            "location": { "address": "A", "city": "C", "zipCode": "123" }
        }))
        .unwrap();
        let response = PropertyResponse::from(PropertyRecord::new(payload, &owner));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["type"], "apartment");
        assert_eq!(json["status"], "for-sale");
        assert_eq!(json["location"]["zipCode"], "123");
        assert!(json["location"].get("coordinates").is_none());
        assert_eq!(json["owner"]["email"], "alice@example.com");
        assert!(json.get("ownerId").is_none());
        assert!(json.get("createdAt").is_some());
        // The owner subset must never leak credentials.
        assert!(json["owner"].get("password_hash").is_none());
    }
}
