//! Repository functions for listings, including the search filter builder.
//!
//! Every optional search parameter narrows the result set by logical AND;
//! absent parameters impose no constraint.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::property::{ListingStatus, PropertyRecord, PropertyType};

/// Constraints derived from validated search parameters.
#[derive(Debug, Default)]
pub struct PropertyFilter {
    pub property_type: Option<PropertyType>,
    pub status: Option<ListingStatus>,
    pub city: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_bedrooms: Option<i32>,
}

const PROPERTY_SELECT: &str = "SELECT p.id, p.title, p.description, p.property_type, p.status, \
     p.price, p.address, p.city, p.state, p.zip_code, p.lat, p.lng, p.bedrooms, p.bathrooms, \
     p.building_size, p.land_size, p.garage, p.year_built, p.furnished, p.images, p.owner_id, \
     p.featured, p.created_at, p.updated_at, \
     u.name AS owner_name, u.email AS owner_email, u.phone AS owner_phone \
     FROM properties p JOIN users u ON u.id = p.owner_id";

/// Runs the filtered, paginated search plus the matching count.
/// Results are sorted by creation time, newest first.
pub async fn search_properties(
    pool: &PgPool,
    filter: &PropertyFilter,
    limit: i64,
    offset: i64,
) -> Result<(Vec<PropertyRecord>, i64), sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(PROPERTY_SELECT);
    let mut has_clause = false;
    apply_property_filters(&mut builder, &mut has_clause, filter);
    builder
        .push(" ORDER BY p.created_at DESC, p.id DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let items = builder
        .build_query_as::<PropertyRecord>()
        .fetch_all(pool)
        .await?;

    let mut count_builder: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM properties p");
    let mut count_has_clause = false;
    apply_property_filters(&mut count_builder, &mut count_has_clause, filter);
    let total = count_builder
        .build_query_scalar::<i64>()
        .fetch_one(pool)
        .await?;

    Ok((items, total))
}

pub async fn find_property_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<PropertyRecord>, sqlx::Error> {
    sqlx::query_as::<_, PropertyRecord>(&format!("{PROPERTY_SELECT} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_properties_by_owner(
    pool: &PgPool,
    owner_id: &str,
) -> Result<Vec<PropertyRecord>, sqlx::Error> {
    sqlx::query_as::<_, PropertyRecord>(&format!(
        "{PROPERTY_SELECT} WHERE p.owner_id = $1 ORDER BY p.created_at DESC, p.id DESC"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_property(pool: &PgPool, record: &PropertyRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO properties (id, title, description, property_type, status, price, address, \
         city, state, zip_code, lat, lng, bedrooms, bathrooms, building_size, land_size, garage, \
         year_built, furnished, images, owner_id, featured, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
         $18, $19, $20, $21, $22, $23, $24)",
    )
    .bind(&record.id)
    .bind(&record.title)
    .bind(&record.description)
    .bind(record.property_type.as_str())
    .bind(record.status.as_str())
    .bind(record.price)
    .bind(&record.address)
    .bind(&record.city)
    .bind(&record.state)
    .bind(&record.zip_code)
    .bind(record.lat)
    .bind(record.lng)
    .bind(record.bedrooms)
    .bind(record.bathrooms)
    .bind(record.building_size)
    .bind(record.land_size)
    .bind(record.garage)
    .bind(record.year_built)
    .bind(record.furnished)
    .bind(&record.images)
    .bind(&record.owner_id)
    .bind(record.featured)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await
    .map(|_| ())
}

fn apply_property_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    has_clause: &mut bool,
    filter: &PropertyFilter,
) {
    if let Some(property_type) = filter.property_type {
        push_clause(builder, has_clause);
        builder
            .push("p.property_type = ")
            .push_bind(property_type.as_str());
    }
    if let Some(status) = filter.status {
        push_clause(builder, has_clause);
        builder.push("p.status = ").push_bind(status.as_str());
    }
    if let Some(city) = filter.city.as_ref() {
        // Case-insensitive substring match on the city name.
        push_clause(builder, has_clause);
        builder
            .push("p.city ILIKE ")
            .push_bind(format!("%{}%", city));
    }
    if let Some(min_price) = filter.min_price {
        push_clause(builder, has_clause);
        builder.push("p.price >= ").push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        push_clause(builder, has_clause);
        builder.push("p.price <= ").push_bind(max_price);
    }
    if let Some(min_bedrooms) = filter.min_bedrooms {
        push_clause(builder, has_clause);
        builder.push("p.bedrooms >= ").push_bind(min_bedrooms);
    }
}

fn push_clause(builder: &mut QueryBuilder<'_, Postgres>, has_clause: &mut bool) {
    if *has_clause {
        builder.push(" AND ");
    } else {
        builder.push(" WHERE ");
        *has_clause = true;
    }
}
