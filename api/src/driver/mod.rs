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

//! Business logic for the service.

use crate::model::{ClientId, TripId};
use std::sync::Arc;
use travel_agency_core::clocks::Clock;
use travel_agency_core::db::Db;
use travel_agency_core::driver::DriverError;

mod clients;
mod registrations;
#[cfg(test)]
pub(crate) mod testutils;
mod trips;

/// Creates the error returned when the client `id` does not exist.
fn client_not_found(id: ClientId) -> DriverError {
    DriverError::NotFound(format!("Client with id {} not found.", id))
}

/// Creates the error returned when the trip `id` does not exist.
fn trip_not_found(id: TripId) -> DriverError {
    DriverError::NotFound(format!("Trip with id {} not found.", id))
}

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": they start and commit a
/// transaction, so it's incorrect for the caller to use two separate calls.  For this reason,
/// these operations consume the driver in an attempt to minimize the possibility of executing
/// two operations.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,

    /// Clock instance to obtain the current time.
    clock: Arc<dyn Clock + Send + Sync>,
}

impl Driver {
    /// Creates a new driver backed by the given dependencies.
    pub(crate) fn new(db: Arc<dyn Db + Send + Sync>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self { db, clock }
    }
}
