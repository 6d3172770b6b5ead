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

//! Extends the driver with the operations on clients.

use crate::db;
use crate::driver::{Driver, client_not_found};
use crate::model::{ClientId, NewClient, TripWithCountries};
use log::{info, warn};
use travel_agency_core::db::{DbError, TxExecutor};
use travel_agency_core::driver::{DriverError, DriverResult, ensure};

/// Checks that `client` does not clash with any existing client.
async fn check_new_client(tx: &mut TxExecutor, client: &NewClient) -> DriverResult<()> {
    ensure(
        db::is_email_unique(tx.ex(), client.email()).await?,
        DriverError::Conflict(format!(
            "Client with email '{}' already exists.",
            client.email().as_str()
        )),
    )?;
    ensure(
        db::is_pesel_unique(tx.ex(), client.pesel()).await?,
        DriverError::Conflict(format!(
            "Client with PESEL '{}' already exists.",
            client.pesel().as_str()
        )),
    )?;
    Ok(())
}

/// Stores `client`, reporting a clash with a client created after the checks as a conflict.
async fn insert_client(tx: &mut TxExecutor, client: &NewClient) -> DriverResult<ClientId> {
    match db::add_client(tx.ex(), client).await {
        Ok(id) => Ok(id),
        Err(DbError::AlreadyExists) => {
            warn!("Rejected new client due to a concurrent registration");
            Err(DriverError::Conflict(format!(
                "Client with email '{}' or PESEL '{}' already exists.",
                client.email().as_str(),
                client.pesel().as_str()
            )))
        }
        Err(e) => Err(e.into()),
    }
}

impl Driver {
    /// Creates a new client and returns the identifier assigned to it.
    pub(crate) async fn add_client(self, client: NewClient) -> DriverResult<ClientId> {
        let mut tx = self.db.begin().await?;

        check_new_client(&mut tx, &client)
            .await
            .inspect_err(|e| warn!("Rejected new client: {}", e))?;

        let id = insert_client(&mut tx, &client).await?;

        tx.commit().await?;
        info!("Added client {}", id);
        Ok(id)
    }

    /// Gets the trips the client `client_id` is registered for.
    pub(crate) async fn list_client_trips(
        self,
        client_id: ClientId,
    ) -> DriverResult<Vec<TripWithCountries>> {
        let mut ex = self.db.ex().await?;

        ensure(db::client_exists(&mut ex, client_id).await?, client_not_found(client_id))?;

        Ok(db::list_client_trips(&mut ex, client_id).await?)
    }
}
