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

//! Extends the driver with the operations on the registrations of clients for trips.

use crate::db;
use crate::driver::{Driver, client_not_found, trip_not_found};
use crate::model::{ClientId, Registration, TripId};
use log::{info, warn};
use time::OffsetDateTime;
use travel_agency_core::clocks::Clock;
use travel_agency_core::db::{DbError, TxExecutor};
use travel_agency_core::driver::{DriverError, DriverResult, ensure};

/// Error returned when a client is already registered for a trip.
fn already_registered() -> DriverError {
    DriverError::Conflict("Client is already registered for this trip.".to_owned())
}

/// Checks whether `client_id` can register for `trip_id` at time `now`.
///
/// The trip row is locked for the remainder of the transaction in `tx` so that the capacity
/// check stays valid until the registration is stored.
async fn check_assignment(
    tx: &mut TxExecutor,
    client_id: ClientId,
    trip_id: TripId,
    now: OffsetDateTime,
) -> DriverResult<()> {
    ensure(db::client_exists(tx.ex(), client_id).await?, client_not_found(client_id))?;

    let trip = match db::get_trip(tx.ex(), trip_id).await? {
        Some(trip) => trip,
        None => return Err(trip_not_found(trip_id)),
    };

    ensure(
        *trip.date_from() > now,
        DriverError::Conflict(
            "Cannot assign client to a trip that has already started or is in the past."
                .to_owned(),
        ),
    )?;

    ensure(!db::is_registered(tx.ex(), client_id, trip_id).await?, already_registered())?;

    let registered = db::count_registrations(tx.ex(), trip_id).await?;
    ensure(
        registered < i64::from(*trip.max_people()),
        DriverError::Conflict("Trip is full. No available slots.".to_owned()),
    )?;

    Ok(())
}

/// Stores `registration`, reporting a duplicate stored after the checks as a conflict.
async fn insert_registration(
    tx: &mut TxExecutor,
    registration: &Registration,
) -> DriverResult<()> {
    match db::assign_client_to_trip(tx.ex(), registration).await {
        Ok(()) => Ok(()),
        Err(DbError::AlreadyExists) => Err(already_registered()),
        Err(e) => Err(e.into()),
    }
}

impl Driver {
    /// Registers the client `client_id` for the trip `trip_id`.
    pub(crate) async fn assign_client_to_trip(
        self,
        client_id: ClientId,
        trip_id: TripId,
    ) -> DriverResult<()> {
        let now = self.clock.now_utc();
        let mut tx = self.db.begin().await?;

        check_assignment(&mut tx, client_id, trip_id, now).await.inspect_err(|e| {
            warn!("Rejected registration of client {} for trip {}: {}", client_id, trip_id, e)
        })?;

        insert_registration(&mut tx, &Registration::new(client_id, trip_id, now, None)).await?;

        tx.commit().await?;
        info!("Registered client {} for trip {}", client_id, trip_id);
        Ok(())
    }

    /// Cancels the registration of the client `client_id` for the trip `trip_id`.
    pub(crate) async fn remove_client_from_trip(
        self,
        client_id: ClientId,
        trip_id: TripId,
    ) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;

        ensure(db::client_exists(tx.ex(), client_id).await?, client_not_found(client_id))?;
        ensure(db::trip_exists(tx.ex(), trip_id).await?, trip_not_found(trip_id))?;

        match db::remove_client_from_trip(tx.ex(), client_id, trip_id).await {
            Ok(()) => (),
            Err(DbError::NotFound) => {
                return Err(DriverError::NotFound(format!(
                    "Registration for Client Id {} on Trip Id {} not found or already deleted.",
                    client_id, trip_id
                )));
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;
        info!("Removed registration of client {} for trip {}", client_id, trip_id);
        Ok(())
    }
}
