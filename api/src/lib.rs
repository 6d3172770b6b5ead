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

//! REST service for a travel agency: lists the trips on offer, creates clients and manages the
//! registrations of clients for trips.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use log::info;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use travel_agency_core::clocks::SystemClock;
use travel_agency_core::db::Db;

pub mod db;
pub(crate) mod driver;
use driver::Driver;
pub(crate) mod model;
mod rest;
use rest::app;

/// Instantiates all resources to serve the application on `bind_addr` backed by `db`.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    db: Arc<dyn Db + Send + Sync>,
) -> Result<(), Box<dyn Error>> {
    let driver = Driver::new(db, Arc::from(SystemClock::default()));
    let app = app(driver);

    let bind_addr = bind_addr.into();
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Listening on {}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
