//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. When a migration
//! changes a table, regenerate them with `diesel print-schema` or edit by
//! hand.

diesel::table! {
    /// Registered accounts. `email` is unique and stored lower-cased.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        password_hash -> Text,
        /// One of `USER`, `COMPANY`, `ORGANIZER`.
        role -> Varchar,
        avatar_url -> Nullable<Text>,
        profile_public_info -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    companies (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        contact_email -> Varchar,
        owner_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    events (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        city -> Varchar,
        venue -> Varchar,
        date -> Timestamptz,
        organizer_company_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Group trips. `code` is the unique, immutable join code.
    trips (id) {
        id -> Uuid,
        title -> Varchar,
        origin_city -> Varchar,
        destination_city -> Varchar,
        date -> Timestamptz,
        code -> Varchar,
        organizer_id -> Uuid,
        event_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Trip memberships, unique per `(user_id, trip_id)`.
    participants (id) {
        id -> Uuid,
        user_id -> Uuid,
        trip_id -> Uuid,
        joined_at -> Timestamptz,
        profile_public_info -> Nullable<Text>,
    }
}

diesel::table! {
    cost_items (id) {
        id -> Uuid,
        label -> Varchar,
        total_amount -> Numeric,
        trip_id -> Uuid,
        creator_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Seat offers. `trip_id` is cleared when the trip is deleted.
    vehicle_offers (id) {
        id -> Uuid,
        capacity -> Int4,
        price_per_person -> Nullable<Numeric>,
        pickup_location -> Varchar,
        pickup_time -> Timestamptz,
        notes -> Nullable<Text>,
        company_id -> Uuid,
        trip_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(companies -> users (owner_id));
diesel::joinable!(events -> companies (organizer_company_id));
diesel::joinable!(trips -> events (event_id));
diesel::joinable!(trips -> users (organizer_id));
diesel::joinable!(participants -> trips (trip_id));
diesel::joinable!(participants -> users (user_id));
diesel::joinable!(cost_items -> trips (trip_id));
diesel::joinable!(vehicle_offers -> companies (company_id));
diesel::joinable!(vehicle_offers -> trips (trip_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    companies,
    events,
    trips,
    participants,
    cost_items,
    vehicle_offers,
);
