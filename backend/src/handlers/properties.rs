use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::property::{
        CreatePropertyRequest, ListingStatus, PropertyRecord, PropertyResponse, PropertyType,
    },
    models::user::User,
    repositories::property as property_repo,
    repositories::property::PropertyFilter,
};

/// Search parameters for the listing index. All fields are optional; typed
/// deserialization rejects malformed values (an invalid enum or a
/// non-numeric price is a 400, never a silently ignored constraint).
#[derive(Debug, Deserialize)]
pub struct PropertySearchQuery {
    #[serde(rename = "type")]
    pub property_type: Option<PropertyType>,
    pub status: Option<ListingStatus>,
    pub city: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<f64>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<f64>,
    pub bedrooms: Option<i32>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct PropertyListResponse {
    pub properties: Vec<PropertyResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

pub async fn list_properties(
    State((pool, _config)): State<(PgPool, Config)>,
    Query(query): Query<PropertySearchQuery>,
) -> Result<Json<PropertyListResponse>, AppError> {
    let (page, limit, offset) = paginate(query.page, query.limit)?;

    let filter = PropertyFilter {
        property_type: query.property_type,
        status: query.status,
        // An empty `city=` imposes no constraint, same as an absent one.
        city: query.city.filter(|city| !city.trim().is_empty()),
        min_price: query.min_price,
        max_price: query.max_price,
        min_bedrooms: query.bedrooms,
    };

    let (records, total) = property_repo::search_properties(&pool, &filter, limit, offset)
        .await
        .map_err(|err| AppError::InternalServerError(err.into()))?;

    Ok(Json(PropertyListResponse {
        properties: records.into_iter().map(PropertyResponse::from).collect(),
        pagination: Pagination {
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        },
    }))
}

pub async fn get_property(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(id): Path<String>,
) -> Result<Json<PropertyResponse>, AppError> {
    let record = property_repo::find_property_by_id(&pool, &id)
        .await
        .map_err(|err| AppError::InternalServerError(err.into()))?
        .ok_or_else(|| AppError::NotFound("Property not found".to_string()))?;

    Ok(Json(PropertyResponse::from(record)))
}

pub async fn create_property(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreatePropertyRequest>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    let record = PropertyRecord::new(payload, &user);
    property_repo::insert_property(&pool, &record)
        .await
        .map_err(|err| AppError::InternalServerError(err.into()))?;

    Ok(Json(json!({
        "message": "Property created successfully",
        "property": PropertyResponse::from(record),
    })))
}

pub async fn my_properties(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<PropertyResponse>>, AppError> {
    let records = property_repo::list_properties_by_owner(&pool, &user.id)
        .await
        .map_err(|err| AppError::InternalServerError(err.into()))?;

    Ok(Json(
        records.into_iter().map(PropertyResponse::from).collect(),
    ))
}

/// Resolves page/limit defaults and the resulting offset.
/// Page defaults to 1 (clamped up), limit to 10 (clamped into 1..=100).
pub fn paginate(page: Option<i64>, limit: Option<i64>) -> Result<(i64, i64, i64), AppError> {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(10).clamp(1, 100);
    let offset = page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(limit))
        .ok_or_else(|| AppError::BadRequest("page is too large".to_string()))?;
    Ok((page, limit, offset))
}

/// Ceiling division; zero matches mean zero pages.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_applies_defaults() {
        let (page, limit, offset) = paginate(None, None).unwrap();
        assert_eq!((page, limit, offset), (1, 10, 0));
    }

    #[test]
    fn paginate_computes_offset() {
        let (page, limit, offset) = paginate(Some(3), Some(20)).unwrap();
        assert_eq!((page, limit, offset), (3, 20, 40));
    }

    #[test]
    fn paginate_clamps_out_of_range_values() {
        let (page, limit, _) = paginate(Some(0), Some(0)).unwrap();
        assert_eq!((page, limit), (1, 1));

        let (page, limit, _) = paginate(Some(-5), Some(5000)).unwrap();
        assert_eq!((page, limit), (1, 100));
    }

    #[test]
    fn paginate_rejects_overflowing_page() {
        assert!(paginate(Some(i64::MAX), Some(100)).is_err());
    }

    #[test]
    fn total_pages_is_ceiling_of_total_over_limit() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(95, 10), 10);
    }

    #[test]
    fn search_query_accepts_wire_parameter_names() {
        let query: PropertySearchQuery = serde_json::from_value(serde_json::json!({
            "type": "house",
            "status": "for-sale",
            "city": "C",
            "minPrice": 50.0,
            "maxPrice": 150.0,
            "bedrooms": 2,
            "page": 2,
            "limit": 5
        }))
        .unwrap();
        assert_eq!(query.property_type, Some(PropertyType::House));
        assert_eq!(query.status, Some(ListingStatus::ForSale));
        assert_eq!(query.min_price, Some(50.0));
        assert_eq!(query.max_price, Some(150.0));
    }

    #[test]
    fn search_query_rejects_unknown_enum_values() {
        let result = serde_json::from_value::<PropertySearchQuery>(serde_json::json!({
            "type": "castle"
        }));
        assert!(result.is_err());
    }
}
