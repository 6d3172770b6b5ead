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

//! Test utilities for the business logic.

use crate::db;
use crate::driver::Driver;
use crate::model::{ClientId, NewClient, PersonName, Pesel, TripId};
use std::sync::Arc;
use time::OffsetDateTime;
use time::macros::datetime;
use travel_agency_core::clocks::testutils::SettableClock;
use travel_agency_core::db::{Db, Executor, TxExecutor};
use travel_agency_core::model::EmailAddress;

/// Creates a client record whose unique fields are derived from `i`.
pub(crate) fn new_client(i: u32) -> NewClient {
    NewClient::new(
        PersonName::new(format!("First{}", i)).unwrap(),
        PersonName::new(format!("Last{}", i)).unwrap(),
        EmailAddress::new(format!("client{}@example.com", i)).unwrap(),
        None,
        Pesel::new(format!("{:011}", i)).unwrap(),
    )
}

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the driver.
    db: Arc<dyn Db + Send + Sync>,

    /// The clock backing the driver, which tests can modify at will.
    clock: Arc<SettableClock>,

    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    /// Initial time returned by the clock of the test context.
    pub(crate) const NOW: OffsetDateTime = datetime!(2030-01-01 12:00:00 UTC);

    /// Initializes the driver using an in-memory database and a settable clock that starts at
    /// `NOW`.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::from(travel_agency_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::from(SettableClock::new(Self::NOW));
        let driver = Driver::new(db.clone(), clock.clone());
        Self { db, clock, driver }
    }

    /// Gets a direct executor against the database.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Starts a transaction against the database.
    pub(crate) async fn begin(&self) -> TxExecutor {
        self.db.begin().await.unwrap()
    }

    /// Gets a copy of the driver in this test context.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Gets the clock used by the driver.
    pub(crate) fn clock(&self) -> &SettableClock {
        &self.clock
    }

    /// Creates a trip named `name` that starts `days` days after `NOW` (or before if negative)
    /// and that has room for `max_people` clients.
    pub(crate) async fn create_trip(&self, name: &str, days: i64, max_people: i32) -> TripId {
        let date_from = Self::NOW + time::Duration::days(days);
        let date_to = date_from + time::Duration::days(7);
        db::create_trip(&mut self.ex().await, name, None, date_from, date_to, max_people)
            .await
            .unwrap()
    }

    /// Records that the trip `trip_id` visits a new country named `name`.
    pub(crate) async fn add_country(&self, trip_id: TripId, name: &str) {
        let mut ex = self.ex().await;
        let country_id = db::create_country(&mut ex, name).await.unwrap();
        db::add_country_to_trip(&mut ex, country_id, trip_id).await.unwrap();
    }

    /// Creates the client described by `new_client(i)` directly in the database.
    pub(crate) async fn create_client(&self, i: u32) -> ClientId {
        db::add_client(&mut self.ex().await, &new_client(i)).await.unwrap()
    }

    /// Checks whether the client `client_id` is registered for the trip `trip_id`.
    pub(crate) async fn is_registered(&self, client_id: ClientId, trip_id: TripId) -> bool {
        db::is_registered(&mut self.ex().await, client_id, trip_id).await.unwrap()
    }
}
