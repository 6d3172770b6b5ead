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

//! Entry point to the REST server.

use crate::driver::Driver;
use crate::model::{TripId, TripWithCountries};
use axum::Router;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tower_http::cors::CorsLayer;

mod client_trip_delete;
mod client_trip_post;
mod client_trips_get;
mod clients_post;
#[cfg(test)]
mod testutils;
mod trips_get;

/// A country visited by a trip, as returned to clients.
#[derive(Deserialize, Serialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct CountryResponse {
    /// Name of the country.
    pub(crate) name: String,
}

/// Details of a trip as returned by the APIs that list trips.
#[derive(Deserialize, Serialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
#[serde(rename_all = "camelCase")]
pub(crate) struct TripResponse {
    /// Identifier of the trip.
    pub(crate) id_trip: TripId,

    /// Name of the trip.
    pub(crate) name: String,

    /// Optional long description of the trip.
    pub(crate) description: Option<String>,

    /// Start of the trip.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) date_from: OffsetDateTime,

    /// End of the trip.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) date_to: OffsetDateTime,

    /// Maximum number of clients that can register for the trip.
    pub(crate) max_people: i32,

    /// Countries visited by the trip.
    pub(crate) countries: Vec<CountryResponse>,
}

impl From<TripWithCountries> for TripResponse {
    fn from(trip: TripWithCountries) -> Self {
        let (trip, countries) = trip.dissolve();
        let (id, name, description, date_from, date_to, max_people) = trip.dissolve();
        Self {
            id_trip: id,
            name,
            description,
            date_from,
            date_to,
            max_people,
            countries: countries.into_iter().map(|name| CountryResponse { name }).collect(),
        }
    }
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::{get, post};
    Router::new()
        .route("/api/trips", get(trips_get::handler))
        .route("/api/clients", post(clients_post::handler))
        .route("/api/clients/:id/trips", get(client_trips_get::handler))
        .route(
            "/api/clients/:id/trips/:trip_id",
            post(client_trip_post::handler).delete(client_trip_delete::handler),
        )
        .layer(CorsLayer::permissive())
        .with_state(driver)
}
