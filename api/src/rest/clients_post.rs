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

//! API to create a new client.

use crate::driver::Driver;
use crate::model::{ClientId, NewClient, PersonName, Pesel, Telephone};
use axum::extract::State;
use axum::{Json, http};
use serde::{Deserialize, Serialize};
use travel_agency_core::model::EmailAddress;
use travel_agency_core::rest::{JsonBody, RestResult};

/// Message sent to the server to create a client.
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClientRequest {
    /// First name of the client.
    pub(crate) first_name: PersonName,

    /// Last name of the client.
    pub(crate) last_name: PersonName,

    /// Email address of the client.  Must not be in use by any other client.
    pub(crate) email: EmailAddress,

    /// Optional contact telephone.
    pub(crate) telephone: Option<Telephone>,

    /// PESEL of the client.  Must not be in use by any other client.
    pub(crate) pesel: Pesel,
}

/// Message returned by the server after creating a client.
#[derive(Deserialize, Serialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct ClientResponse {
    /// Identifier assigned to the new client.
    pub(crate) id: ClientId,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    JsonBody(request): JsonBody<ClientRequest>,
) -> RestResult<(http::StatusCode, Json<ClientResponse>)> {
    let client = NewClient::new(
        request.first_name,
        request.last_name,
        request.email,
        request.telephone,
        request.pesel,
    );
    let id = driver.add_client(client).await?;
    Ok((http::StatusCode::CREATED, Json(ClientResponse { id })))
}
