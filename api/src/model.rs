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

//! High-level data types.

use derive_getters::{Dissolve, Getters};
use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use travel_agency_core::model::{EmailAddress, ModelError, ModelResult};

/// Maximum length of any free-form text field provided for a client.
pub(crate) const MAX_TEXT_LENGTH: usize = 120;

/// Validates the length of a free-form text field named `what` with a raw value `s`.
fn validate_length(what: &str, s: String) -> ModelResult<String> {
    if s.chars().count() > MAX_TEXT_LENGTH {
        return Err(ModelError(format!(
            "{} cannot be longer than {} characters",
            what, MAX_TEXT_LENGTH
        )));
    }
    Ok(s)
}

/// Validates a required free-form text field named `what` with a raw value `s`.
///
/// The value is stored as given, but it must contain something other than whitespace and must
/// fit in the database column.
fn validate_text(what: &str, s: String) -> ModelResult<String> {
    if s.trim().is_empty() {
        return Err(ModelError(format!("{} cannot be empty", what)));
    }
    validate_length(what, s)
}

/// Identifier of a client as assigned by the database.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub(crate) struct ClientId(i32);

impl ClientId {
    /// Creates a new client identifier from its raw database value.
    pub(crate) fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw database value of the identifier.
    pub(crate) fn as_i32(self) -> i32 {
        self.0
    }
}

/// Identifier of a trip as assigned by the database.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub(crate) struct TripId(i32);

impl TripId {
    /// Creates a new trip identifier from its raw database value.
    pub(crate) fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw database value of the identifier.
    pub(crate) fn as_i32(self) -> i32 {
        self.0
    }
}

/// The first or last name of a person.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) struct PersonName(String);

impl PersonName {
    /// Creates a new name from an untrusted string `s`, making sure it is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        validate_text("Name", s.into()).map(Self)
    }

    /// Returns a string view of the name.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PersonName {
    type Error = ModelError;

    fn try_from(s: String) -> ModelResult<Self> {
        Self::new(s)
    }
}

impl From<PersonName> for String {
    fn from(name: PersonName) -> Self {
        name.0
    }
}

/// A contact telephone number.  Its format is not validated and it may be blank.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) struct Telephone(String);

impl Telephone {
    /// Creates a new telephone number from an untrusted string `s`, making sure it is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        validate_length("Telephone", s.into()).map(Self)
    }

    /// Returns a string view of the telephone number.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Telephone {
    type Error = ModelError;

    fn try_from(s: String) -> ModelResult<Self> {
        Self::new(s)
    }
}

impl From<Telephone> for String {
    fn from(telephone: Telephone) -> Self {
        telephone.0
    }
}

/// A PESEL number, the Polish national identification number.
///
/// Only the length is validated: clients are identified by whatever value they provide as long as
/// no other client has registered the same one.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) struct Pesel(String);

impl Pesel {
    /// Creates a new PESEL from an untrusted string `s`, making sure it is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        validate_text("PESEL", s.into()).map(Self)
    }

    /// Returns a string view of the PESEL.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Pesel {
    type Error = ModelError;

    fn try_from(s: String) -> ModelResult<Self> {
        Self::new(s)
    }
}

impl From<Pesel> for String {
    fn from(pesel: Pesel) -> Self {
        pesel.0
    }
}

/// Details of a client that is yet to be stored.
#[derive(Clone, Constructor, Getters)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct NewClient {
    /// First name of the client.
    first_name: PersonName,

    /// Last name of the client.
    last_name: PersonName,

    /// Email address of the client, unique across all clients.
    email: EmailAddress,

    /// Optional contact telephone.
    telephone: Option<Telephone>,

    /// PESEL of the client, unique across all clients.
    pesel: Pesel,
}

/// A trip offered by the agency.
#[derive(Constructor, Dissolve, Getters)]
#[cfg_attr(test, derive(Clone, Debug, PartialEq))]
pub(crate) struct Trip {
    /// Identifier of the trip.
    id: TripId,

    /// Name of the trip.
    name: String,

    /// Optional long description of the trip.
    description: Option<String>,

    /// Start of the trip.
    date_from: OffsetDateTime,

    /// End of the trip.
    date_to: OffsetDateTime,

    /// Maximum number of clients that can register for the trip.
    max_people: i32,
}

/// A trip along with the names of the countries it visits.
#[derive(Constructor, Dissolve, Getters)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct TripWithCountries {
    /// The trip details.
    trip: Trip,

    /// Names of the countries visited by the trip, without duplicates.
    countries: Vec<String>,
}

/// The registration of a client for a trip.
#[derive(Constructor, Getters)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct Registration {
    /// The registered client.
    client_id: ClientId,

    /// The trip the client registered for.
    trip_id: TripId,

    /// When the registration happened.
    registered_at: OffsetDateTime,

    /// When the registration was paid for, if at all.
    payment_date: Option<OffsetDateTime>,
}
