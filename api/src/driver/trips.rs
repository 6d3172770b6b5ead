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

//! Extends the driver with the operations on trips.

use crate::db;
use crate::driver::Driver;
use crate::model::TripWithCountries;
use travel_agency_core::driver::DriverResult;

impl Driver {
    /// Gets all trips offered by the agency along with the countries they visit.
    pub(crate) async fn list_trips(self) -> DriverResult<Vec<TripWithCountries>> {
        let mut ex = self.db.ex().await?;
        Ok(db::list_trips(&mut ex).await?)
    }
}
