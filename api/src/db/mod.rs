// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Database abstraction in terms of the operations needed by the server.

use crate::model::{ClientId, NewClient, Pesel, Registration, Trip, TripId, TripWithCountries};
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use time::OffsetDateTime;
#[cfg(feature = "postgres")]
use travel_agency_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use travel_agency_core::db::sqlite::{self, build_timestamp, unpack_timestamp};
use travel_agency_core::db::{DbError, DbResult, Executor};
use travel_agency_core::model::EmailAddress;

#[cfg(test)]
mod tests;

/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

#[cfg(feature = "postgres")]
impl TryFrom<&PgRow> for Trip {
    type Error = DbError;

    fn try_from(row: &PgRow) -> DbResult<Self> {
        let id: i32 = row.try_get("id_trip").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        let description: Option<String> =
            row.try_get("description").map_err(postgres::map_sqlx_error)?;
        let date_from: OffsetDateTime =
            row.try_get("date_from").map_err(postgres::map_sqlx_error)?;
        let date_to: OffsetDateTime = row.try_get("date_to").map_err(postgres::map_sqlx_error)?;
        let max_people: i32 = row.try_get("max_people").map_err(postgres::map_sqlx_error)?;

        Ok(Trip::new(TripId::new(id), name, description, date_from, date_to, max_people))
    }
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Registration {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let client_id: i32 = row.try_get("id_client").map_err(postgres::map_sqlx_error)?;
        let trip_id: i32 = row.try_get("id_trip").map_err(postgres::map_sqlx_error)?;
        let registered_at: OffsetDateTime =
            row.try_get("registered_at").map_err(postgres::map_sqlx_error)?;
        let payment_date: Option<OffsetDateTime> =
            row.try_get("payment_date").map_err(postgres::map_sqlx_error)?;

        Ok(Registration::new(
            ClientId::new(client_id),
            TripId::new(trip_id),
            registered_at,
            payment_date,
        ))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<&SqliteRow> for Trip {
    type Error = DbError;

    fn try_from(row: &SqliteRow) -> DbResult<Self> {
        let id: i32 = row.try_get("id_trip").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let description: Option<String> =
            row.try_get("description").map_err(sqlite::map_sqlx_error)?;
        let date_from_sec: i64 = row.try_get("date_from_sec").map_err(sqlite::map_sqlx_error)?;
        let date_from_nsec: i64 = row.try_get("date_from_nsec").map_err(sqlite::map_sqlx_error)?;
        let date_to_sec: i64 = row.try_get("date_to_sec").map_err(sqlite::map_sqlx_error)?;
        let date_to_nsec: i64 = row.try_get("date_to_nsec").map_err(sqlite::map_sqlx_error)?;
        let max_people: i32 = row.try_get("max_people").map_err(sqlite::map_sqlx_error)?;

        let date_from = build_timestamp(date_from_sec, date_from_nsec)?;
        let date_to = build_timestamp(date_to_sec, date_to_nsec)?;

        Ok(Trip::new(TripId::new(id), name, description, date_from, date_to, max_people))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Registration {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let client_id: i32 = row.try_get("id_client").map_err(sqlite::map_sqlx_error)?;
        let trip_id: i32 = row.try_get("id_trip").map_err(sqlite::map_sqlx_error)?;
        let registered_at_sec: i64 =
            row.try_get("registered_at_sec").map_err(sqlite::map_sqlx_error)?;
        let registered_at_nsec: i64 =
            row.try_get("registered_at_nsec").map_err(sqlite::map_sqlx_error)?;
        let payment_date_sec: Option<i64> =
            row.try_get("payment_date_sec").map_err(sqlite::map_sqlx_error)?;
        let payment_date_nsec: Option<i64> =
            row.try_get("payment_date_nsec").map_err(sqlite::map_sqlx_error)?;

        let registered_at = build_timestamp(registered_at_sec, registered_at_nsec)?;
        let payment_date = match (payment_date_sec, payment_date_nsec) {
            (Some(sec), Some(nsec)) => Some(build_timestamp(sec, nsec)?),
            (None, None) => None,
            (_, _) => {
                return Err(DbError::DataIntegrityError(
                    "Inconsistent values for payment_date".to_owned(),
                ));
            }
        };

        Ok(Registration::new(
            ClientId::new(client_id),
            TripId::new(trip_id),
            registered_at,
            payment_date,
        ))
    }
}

/// Folds the result of joining trips with their countries into one entry per trip.
///
/// All `rows` for the same trip must be consecutive.  A row without a country name comes from a
/// trip that visits no countries.
fn group_trips(rows: Vec<(Trip, Option<String>)>) -> Vec<TripWithCountries> {
    let mut trips: Vec<(Trip, Vec<String>)> = vec![];
    for (trip, country) in rows {
        if trips.last().is_none_or(|(last, _)| last.id() != trip.id()) {
            trips.push((trip, vec![]));
        }
        if let (Some(country), Some((_, countries))) = (country, trips.last_mut()) {
            if !countries.contains(&country) {
                countries.push(country);
            }
        }
    }
    trips.into_iter().map(|(trip, countries)| TripWithCountries::new(trip, countries)).collect()
}

/// Gets all trips along with their countries, ordered by start date with the latest first.
///
/// If `client_id` is present, only returns the trips the client is registered for.
async fn get_trips(
    ex: &mut Executor,
    client_id: Option<ClientId>,
) -> DbResult<Vec<TripWithCountries>> {
    let mut rows = vec![];
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let filter = match client_id {
                Some(_) => "WHERE t.id_trip IN (SELECT id_trip FROM client_trip WHERE id_client = $1)",
                None => "",
            };
            let query_str = format!(
                "
                SELECT
                    t.id_trip, t.name, t.description, t.date_from, t.date_to, t.max_people,
                    c.name AS country
                FROM trip t
                LEFT JOIN country_trip ct ON ct.id_trip = t.id_trip
                LEFT JOIN country c ON c.id_country = ct.id_country
                {}
                ORDER BY t.date_from DESC, t.id_trip, c.name",
                filter
            );
            let mut query = sqlx::query(&query_str);
            if let Some(client_id) = client_id {
                query = query.bind(client_id.as_i32());
            }
            for row in query.fetch_all(ex.conn()).await.map_err(postgres::map_sqlx_error)? {
                let trip = Trip::try_from(&row)?;
                let country: Option<String> =
                    row.try_get("country").map_err(postgres::map_sqlx_error)?;
                rows.push((trip, country));
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let filter = match client_id {
                Some(_) => "WHERE t.id_trip IN (SELECT id_trip FROM client_trip WHERE id_client = ?)",
                None => "",
            };
            let query_str = format!(
                "
                SELECT
                    t.id_trip, t.name, t.description,
                    t.date_from_sec, t.date_from_nsec, t.date_to_sec, t.date_to_nsec,
                    t.max_people, c.name AS country
                FROM trip t
                LEFT JOIN country_trip ct ON ct.id_trip = t.id_trip
                LEFT JOIN country c ON c.id_country = ct.id_country
                {}
                ORDER BY t.date_from_sec DESC, t.date_from_nsec DESC, t.id_trip, c.name",
                filter
            );
            let mut query = sqlx::query(&query_str);
            if let Some(client_id) = client_id {
                query = query.bind(client_id.as_i32());
            }
            for row in query.fetch_all(ex.conn()).await.map_err(sqlite::map_sqlx_error)? {
                let trip = Trip::try_from(&row)?;
                let country: Option<String> =
                    row.try_get("country").map_err(sqlite::map_sqlx_error)?;
                rows.push((trip, country));
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(group_trips(rows))
}

/// Gets all trips along with their countries, ordered by start date with the latest first.
pub(crate) async fn list_trips(ex: &mut Executor) -> DbResult<Vec<TripWithCountries>> {
    get_trips(ex, None).await
}

/// Gets the trips `client_id` is registered for along with their countries, ordered by start date
/// with the latest first.
pub(crate) async fn list_client_trips(
    ex: &mut Executor,
    client_id: ClientId,
) -> DbResult<Vec<TripWithCountries>> {
    get_trips(ex, Some(client_id)).await
}

/// Gets the details of the trip `trip_id`, or `None` if it does not exist.
///
/// When running within a transaction, the trip is locked until the transaction completes so that
/// concurrent registrations for the same trip happen one after the other.
pub(crate) async fn get_trip(ex: &mut Executor, trip_id: TripId) -> DbResult<Option<Trip>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT id_trip, name, description, date_from, date_to, max_people
                FROM trip
                WHERE id_trip = $1
                FOR UPDATE";
            let row = sqlx::query(query_str)
                .bind(trip_id.as_i32())
                .fetch_optional(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.as_ref().map(Trip::try_from).transpose()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT
                    id_trip, name, description,
                    date_from_sec, date_from_nsec, date_to_sec, date_to_nsec,
                    max_people
                FROM trip
                WHERE id_trip = ?";
            let row = sqlx::query(query_str)
                .bind(trip_id.as_i32())
                .fetch_optional(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.as_ref().map(Trip::try_from).transpose()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Runs a `query_str` with a single `id` parameter and returns whether it yielded any row.
///
/// The query must use the placeholder syntax of the backend behind `ex`.
async fn any_row_with_id(ex: &mut Executor, query_str: &str, id: i32) -> DbResult<bool> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let row = sqlx::query(query_str)
                .bind(id)
                .fetch_optional(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Ok(row.is_some())
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let row = sqlx::query(query_str)
                .bind(id)
                .fetch_optional(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Ok(row.is_some())
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Returns the parameter placeholder for position `n` (1-based) in the backend behind `ex`.
fn placeholder(ex: &Executor, n: usize) -> String {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(_) => format!("${}", n),

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(_) => "?".to_owned(),

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Checks whether the client `client_id` exists.
pub(crate) async fn client_exists(ex: &mut Executor, client_id: ClientId) -> DbResult<bool> {
    let query_str = format!("SELECT 1 FROM client WHERE id_client = {}", placeholder(ex, 1));
    any_row_with_id(ex, &query_str, client_id.as_i32()).await
}

/// Checks whether the trip `trip_id` exists.
pub(crate) async fn trip_exists(ex: &mut Executor, trip_id: TripId) -> DbResult<bool> {
    let query_str = format!("SELECT 1 FROM trip WHERE id_trip = {}", placeholder(ex, 1));
    any_row_with_id(ex, &query_str, trip_id.as_i32()).await
}

/// Checks whether the client `client_id` is registered for the trip `trip_id`.
pub(crate) async fn is_registered(
    ex: &mut Executor,
    client_id: ClientId,
    trip_id: TripId,
) -> DbResult<bool> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT 1 FROM client_trip WHERE id_client = $1 AND id_trip = $2";
            let row = sqlx::query(query_str)
                .bind(client_id.as_i32())
                .bind(trip_id.as_i32())
                .fetch_optional(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Ok(row.is_some())
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT 1 FROM client_trip WHERE id_client = ? AND id_trip = ?";
            let row = sqlx::query(query_str)
                .bind(client_id.as_i32())
                .bind(trip_id.as_i32())
                .fetch_optional(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Ok(row.is_some())
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Runs a `query_str` with a single string parameter `value` and returns whether it yielded no
/// rows.
async fn no_row_with_value(ex: &mut Executor, query_str: &str, value: &str) -> DbResult<bool> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let row = sqlx::query(query_str)
                .bind(value)
                .fetch_optional(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Ok(row.is_none())
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let row = sqlx::query(query_str)
                .bind(value)
                .fetch_optional(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Ok(row.is_none())
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Checks that no client uses the `email` address yet.
pub(crate) async fn is_email_unique(ex: &mut Executor, email: &EmailAddress) -> DbResult<bool> {
    let query_str = format!("SELECT 1 FROM client WHERE email = {}", placeholder(ex, 1));
    no_row_with_value(ex, &query_str, email.as_str()).await
}

/// Checks that no client uses the `pesel` yet.
pub(crate) async fn is_pesel_unique(ex: &mut Executor, pesel: &Pesel) -> DbResult<bool> {
    let query_str = format!("SELECT 1 FROM client WHERE pesel = {}", placeholder(ex, 1));
    no_row_with_value(ex, &query_str, pesel.as_str()).await
}

/// Counts how many clients are registered for the trip `trip_id`.
pub(crate) async fn count_registrations(ex: &mut Executor, trip_id: TripId) -> DbResult<i64> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM client_trip WHERE id_trip = $1";
            let row = sqlx::query(query_str)
                .bind(trip_id.as_i32())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("count").map_err(postgres::map_sqlx_error)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM client_trip WHERE id_trip = ?";
            let row = sqlx::query(query_str)
                .bind(trip_id.as_i32())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.try_get("count").map_err(sqlite::map_sqlx_error)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Stores a new `client` and returns the identifier assigned to it.
///
/// Fails with `DbError::AlreadyExists` if another client already has the same email address or
/// PESEL.
pub(crate) async fn add_client(ex: &mut Executor, client: &NewClient) -> DbResult<ClientId> {
    let id = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO client (first_name, last_name, email, telephone, pesel)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id_client";
            let row = sqlx::query(query_str)
                .bind(client.first_name().as_str())
                .bind(client.last_name().as_str())
                .bind(client.email().as_str())
                .bind(client.telephone().as_ref().map(|t| t.as_str()))
                .bind(client.pesel().as_str())
                .fetch_optional(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            match row {
                Some(row) => row.try_get::<i32, _>("id_client").map_err(postgres::map_sqlx_error)?,
                None => {
                    return Err(DbError::BackendError(
                        "Insertion did not return the new client id".to_owned(),
                    ));
                }
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO client (first_name, last_name, email, telephone, pesel)
                VALUES (?, ?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(client.first_name().as_str())
                .bind(client.last_name().as_str())
                .bind(client.email().as_str())
                .bind(client.telephone().as_ref().map(|t| t.as_str()))
                .bind(client.pesel().as_str())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            if done.rows_affected() != 1 {
                return Err(DbError::BackendError(
                    "Insertion affected more than one row".to_owned(),
                ));
            }
            i32::try_from(done.last_insert_rowid()).map_err(|e| {
                DbError::DataIntegrityError(format!("New client id out of range: {}", e))
            })?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(ClientId::new(id))
}

/// Stores a new `registration` of a client for a trip.
///
/// Fails with `DbError::AlreadyExists` if the client is already registered for the trip and with
/// `DbError::NotFound` if either the client or the trip do not exist.
pub(crate) async fn assign_client_to_trip(
    ex: &mut Executor,
    registration: &Registration,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO client_trip (id_client, id_trip, registered_at, payment_date)
                VALUES ($1, $2, $3, $4)";
            let done = sqlx::query(query_str)
                .bind(registration.client_id().as_i32())
                .bind(registration.trip_id().as_i32())
                .bind(*registration.registered_at())
                .bind(*registration.payment_date())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (registered_at_sec, registered_at_nsec) =
                unpack_timestamp(*registration.registered_at());
            let payment_date = registration.payment_date().map(unpack_timestamp);

            let query_str = "
                INSERT INTO client_trip
                    (id_client, id_trip, registered_at_sec, registered_at_nsec,
                    payment_date_sec, payment_date_nsec)
                VALUES (?, ?, ?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(registration.client_id().as_i32())
                .bind(registration.trip_id().as_i32())
                .bind(registered_at_sec)
                .bind(registered_at_nsec)
                .bind(payment_date.map(|(sec, _nsec)| sec))
                .bind(payment_date.map(|(_sec, nsec)| nsec))
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    if rows_affected != 1 {
        return Err(DbError::BackendError(format!("Insertion affected {} rows", rows_affected)));
    }
    Ok(())
}

/// Deletes the registration of the client `client_id` for the trip `trip_id`.
pub(crate) async fn remove_client_from_trip(
    ex: &mut Executor,
    client_id: ClientId,
    trip_id: TripId,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM client_trip WHERE id_client = $1 AND id_trip = $2";
            let done = sqlx::query(query_str)
                .bind(client_id.as_i32())
                .bind(trip_id.as_i32())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM client_trip WHERE id_client = ? AND id_trip = ?";
            let done = sqlx::query(query_str)
                .bind(client_id.as_i32())
                .bind(trip_id.as_i32())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Deletion affected more than one row".to_owned())),
    }
}

/// Gets the registration of the client `client_id` for the trip `trip_id`.
#[cfg(test)]
pub(crate) async fn get_registration(
    ex: &mut Executor,
    client_id: ClientId,
    trip_id: TripId,
) -> DbResult<Registration> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT id_client, id_trip, registered_at, payment_date
                FROM client_trip
                WHERE id_client = $1 AND id_trip = $2";
            let row = sqlx::query(query_str)
                .bind(client_id.as_i32())
                .bind(trip_id.as_i32())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Registration::try_from(row)
        }

        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT
                    id_client, id_trip, registered_at_sec, registered_at_nsec,
                    payment_date_sec, payment_date_nsec
                FROM client_trip
                WHERE id_client = ? AND id_trip = ?";
            let row = sqlx::query(query_str)
                .bind(client_id.as_i32())
                .bind(trip_id.as_i32())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Registration::try_from(row)
        }
    }
}

/// Creates a new trip with the given details and returns its identifier.
///
/// Trips are managed outside of this service, so this is only useful to populate test databases.
#[cfg(test)]
pub(crate) async fn create_trip(
    ex: &mut Executor,
    name: &str,
    description: Option<&str>,
    date_from: OffsetDateTime,
    date_to: OffsetDateTime,
    max_people: i32,
) -> DbResult<TripId> {
    let id: i32 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO trip (name, description, date_from, date_to, max_people)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id_trip";
            let row = sqlx::query(query_str)
                .bind(name)
                .bind(description)
                .bind(date_from)
                .bind(date_to)
                .bind(max_people)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("id_trip").map_err(postgres::map_sqlx_error)?
        }

        Executor::Sqlite(ex) => {
            let (date_from_sec, date_from_nsec) = unpack_timestamp(date_from);
            let (date_to_sec, date_to_nsec) = unpack_timestamp(date_to);

            let query_str = "
                INSERT INTO trip
                    (name, description, date_from_sec, date_from_nsec,
                    date_to_sec, date_to_nsec, max_people)
                VALUES (?, ?, ?, ?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(name)
                .bind(description)
                .bind(date_from_sec)
                .bind(date_from_nsec)
                .bind(date_to_sec)
                .bind(date_to_nsec)
                .bind(max_people)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            i32::try_from(done.last_insert_rowid()).expect("Test ids must fit in an i32")
        }
    };
    Ok(TripId::new(id))
}

/// Creates a new country named `name` and returns its identifier.
#[cfg(test)]
pub(crate) async fn create_country(ex: &mut Executor, name: &str) -> DbResult<i32> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "INSERT INTO country (name) VALUES ($1) RETURNING id_country";
            let row = sqlx::query(query_str)
                .bind(name)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("id_country").map_err(postgres::map_sqlx_error)
        }

        Executor::Sqlite(ex) => {
            let done = sqlx::query("INSERT INTO country (name) VALUES (?)")
                .bind(name)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Ok(i32::try_from(done.last_insert_rowid()).expect("Test ids must fit in an i32"))
        }
    }
}

/// Records that the trip `trip_id` visits the country `country_id`.
#[cfg(test)]
pub(crate) async fn add_country_to_trip(
    ex: &mut Executor,
    country_id: i32,
    trip_id: TripId,
) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            sqlx::query("INSERT INTO country_trip (id_country, id_trip) VALUES ($1, $2)")
                .bind(country_id)
                .bind(trip_id.as_i32())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
        }

        Executor::Sqlite(ex) => {
            sqlx::query("INSERT INTO country_trip (id_country, id_trip) VALUES (?, ?)")
                .bind(country_id)
                .bind(trip_id.as_i32())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
        }
    }
    Ok(())
}
