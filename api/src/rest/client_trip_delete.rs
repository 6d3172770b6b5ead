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

//! API to cancel the registration of a client for a trip.

use crate::driver::Driver;
use crate::model::{ClientId, TripId};
use axum::extract::State;
use axum::http;
use travel_agency_core::rest::{EmptyBody, PathParams, RestResult};

/// DELETE handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    PathParams((client_id, trip_id)): PathParams<(ClientId, TripId)>,
    _: EmptyBody,
) -> RestResult<http::StatusCode> {
    driver.remove_client_from_trip(client_id, trip_id).await?;
    Ok(http::StatusCode::NO_CONTENT)
}
