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

//! Common tests for any database implementation.

use crate::db::*;
use crate::model::{PersonName, Telephone};
use time::macros::datetime;
use travel_agency_core::db::Db;

/// Initializes the schema of `db` and returns a direct executor against it.
async fn setup_ex(db: &(dyn Db + Send + Sync)) -> Executor {
    let mut ex = db.ex().await.unwrap();
    init_schema(&mut ex).await.unwrap();
    ex
}

/// Creates a client record whose unique fields are derived from `i`.
fn new_client(i: u32) -> NewClient {
    NewClient::new(
        PersonName::new(format!("First{}", i)).unwrap(),
        PersonName::new(format!("Last{}", i)).unwrap(),
        EmailAddress::new(format!("client{}@example.com", i)).unwrap(),
        Some(Telephone::new("+48 123 456 789").unwrap()),
        Pesel::new(format!("9001011234{}", i)).unwrap(),
    )
}

/// Creates a trip named `name` starting at `date_from` with room for `max_people` clients.
async fn create_simple_trip(
    ex: &mut Executor,
    name: &str,
    date_from: OffsetDateTime,
    max_people: i32,
) -> TripId {
    let date_to = date_from + time::Duration::days(7);
    create_trip(ex, name, None, date_from, date_to, max_people).await.unwrap()
}

pub(crate) async fn test_list_trips_empty(db: Box<dyn Db + Send + Sync>) {
    let mut ex = setup_ex(db.as_ref()).await;

    assert!(list_trips(&mut ex).await.unwrap().is_empty());
}

pub(crate) async fn test_list_trips_with_countries(db: Box<dyn Db + Send + Sync>) {
    let mut ex = setup_ex(db.as_ref()).await;

    let early = create_trip(
        &mut ex,
        "Early",
        Some("The first one"),
        datetime!(2030-01-10 08:00:00 UTC),
        datetime!(2030-01-20 20:00:00.123456 UTC),
        10,
    )
    .await
    .unwrap();
    let late = create_simple_trip(&mut ex, "Late", datetime!(2031-06-01 00:00:00 UTC), 5).await;
    let none = create_simple_trip(&mut ex, "None", datetime!(2030-06-01 00:00:00 UTC), 5).await;

    let poland = create_country(&mut ex, "Poland").await.unwrap();
    let poland_again = create_country(&mut ex, "Poland").await.unwrap();
    let italy = create_country(&mut ex, "Italy").await.unwrap();
    let spain = create_country(&mut ex, "Spain").await.unwrap();
    add_country_to_trip(&mut ex, poland, early).await.unwrap();
    add_country_to_trip(&mut ex, poland_again, early).await.unwrap();
    add_country_to_trip(&mut ex, italy, early).await.unwrap();
    add_country_to_trip(&mut ex, spain, late).await.unwrap();

    let trips = list_trips(&mut ex).await.unwrap();
    let summary = trips
        .iter()
        .map(|t| (*t.trip().id(), t.countries().clone()))
        .collect::<Vec<(TripId, Vec<String>)>>();
    assert_eq!(
        vec![
            (late, vec!["Spain".to_owned()]),
            (none, vec![]),
            (early, vec!["Italy".to_owned(), "Poland".to_owned()]),
        ],
        summary
    );

    let early_trip = trips[2].trip();
    assert_eq!("Early", early_trip.name());
    assert_eq!(&Some("The first one".to_owned()), early_trip.description());
    assert_eq!(datetime!(2030-01-10 08:00:00 UTC), *early_trip.date_from());
    assert_eq!(datetime!(2030-01-20 20:00:00.123456 UTC), *early_trip.date_to());
    assert_eq!(10, *early_trip.max_people());
}

pub(crate) async fn test_list_client_trips(db: Box<dyn Db + Send + Sync>) {
    let mut ex = setup_ex(db.as_ref()).await;

    let trip1 = create_simple_trip(&mut ex, "One", datetime!(2030-01-01 00:00:00 UTC), 5).await;
    let trip2 = create_simple_trip(&mut ex, "Two", datetime!(2030-02-01 00:00:00 UTC), 5).await;
    let trip3 = create_simple_trip(&mut ex, "Three", datetime!(2030-03-01 00:00:00 UTC), 5).await;
    let country = create_country(&mut ex, "Greece").await.unwrap();
    add_country_to_trip(&mut ex, country, trip1).await.unwrap();

    let client1 = add_client(&mut ex, &new_client(1)).await.unwrap();
    let client2 = add_client(&mut ex, &new_client(2)).await.unwrap();
    let now = datetime!(2029-12-01 10:00:00 UTC);
    for (client, trip) in [(client1, trip1), (client1, trip3), (client2, trip2)] {
        assign_client_to_trip(&mut ex, &Registration::new(client, trip, now, None)).await.unwrap();
    }

    let trips = list_client_trips(&mut ex, client1).await.unwrap();
    assert_eq!(2, trips.len());
    assert_eq!(trip3, *trips[0].trip().id());
    assert!(trips[0].countries().is_empty());
    assert_eq!(trip1, *trips[1].trip().id());
    assert_eq!(&vec!["Greece".to_owned()], trips[1].countries());

    let client3 = add_client(&mut ex, &new_client(3)).await.unwrap();
    assert!(list_client_trips(&mut ex, client3).await.unwrap().is_empty());
}

pub(crate) async fn test_get_trip(db: Box<dyn Db + Send + Sync>) {
    let mut ex = setup_ex(db.as_ref()).await;

    let id = create_simple_trip(&mut ex, "Trip", datetime!(2030-05-05 12:00:00 UTC), 3).await;

    let trip = get_trip(&mut ex, id).await.unwrap().unwrap();
    assert_eq!(id, *trip.id());
    assert_eq!("Trip", trip.name());
    assert_eq!(&None, trip.description());
    assert_eq!(datetime!(2030-05-12 12:00:00 UTC), *trip.date_to());
    assert_eq!(3, *trip.max_people());

    assert_eq!(None, get_trip(&mut ex, TripId::new(id.as_i32() + 1)).await.unwrap());
}

pub(crate) async fn test_exists_predicates(db: Box<dyn Db + Send + Sync>) {
    let mut ex = setup_ex(db.as_ref()).await;

    let trip = create_simple_trip(&mut ex, "Trip", datetime!(2030-05-05 12:00:00 UTC), 3).await;
    let client = add_client(&mut ex, &new_client(1)).await.unwrap();
    let other_trip = TripId::new(trip.as_i32() + 100);
    let other_client = ClientId::new(client.as_i32() + 100);

    assert!(trip_exists(&mut ex, trip).await.unwrap());
    assert!(!trip_exists(&mut ex, other_trip).await.unwrap());
    assert!(client_exists(&mut ex, client).await.unwrap());
    assert!(!client_exists(&mut ex, other_client).await.unwrap());

    assert!(!is_registered(&mut ex, client, trip).await.unwrap());
    let now = datetime!(2030-01-01 00:00:00 UTC);
    assign_client_to_trip(&mut ex, &Registration::new(client, trip, now, None)).await.unwrap();
    assert!(is_registered(&mut ex, client, trip).await.unwrap());
    assert!(!is_registered(&mut ex, other_client, trip).await.unwrap());
}

pub(crate) async fn test_add_client_uniqueness(db: Box<dyn Db + Send + Sync>) {
    let mut ex = setup_ex(db.as_ref()).await;

    let client = new_client(1);
    assert!(is_email_unique(&mut ex, client.email()).await.unwrap());
    assert!(is_pesel_unique(&mut ex, client.pesel()).await.unwrap());

    let id1 = add_client(&mut ex, &client).await.unwrap();
    assert!(client_exists(&mut ex, id1).await.unwrap());
    assert!(!is_email_unique(&mut ex, client.email()).await.unwrap());
    assert!(!is_pesel_unique(&mut ex, client.pesel()).await.unwrap());

    let same_email = NewClient::new(
        PersonName::new("Other").unwrap(),
        PersonName::new("Person").unwrap(),
        client.email().clone(),
        None,
        Pesel::new("different").unwrap(),
    );
    assert_eq!(DbError::AlreadyExists, add_client(&mut ex, &same_email).await.unwrap_err());

    let same_pesel = NewClient::new(
        PersonName::new("Other").unwrap(),
        PersonName::new("Person").unwrap(),
        EmailAddress::from("different@example.com"),
        None,
        client.pesel().clone(),
    );
    assert_eq!(DbError::AlreadyExists, add_client(&mut ex, &same_pesel).await.unwrap_err());

    let id2 = add_client(&mut ex, &new_client(2)).await.unwrap();
    assert_ne!(id1, id2);
}

pub(crate) async fn test_add_client_rolled_back(db: Box<dyn Db + Send + Sync>) {
    drop(setup_ex(db.as_ref()).await);

    let client = new_client(1);
    let id = {
        let mut tx = db.begin().await.unwrap();
        add_client(tx.ex(), &client).await.unwrap()
    };

    let mut ex = db.ex().await.unwrap();
    assert!(!client_exists(&mut ex, id).await.unwrap());
    assert!(is_email_unique(&mut ex, client.email()).await.unwrap());
}

pub(crate) async fn test_registrations(db: Box<dyn Db + Send + Sync>) {
    let mut ex = setup_ex(db.as_ref()).await;

    let trip = create_simple_trip(&mut ex, "Trip", datetime!(2030-05-05 12:00:00 UTC), 3).await;
    let client1 = add_client(&mut ex, &new_client(1)).await.unwrap();
    let client2 = add_client(&mut ex, &new_client(2)).await.unwrap();
    assert_eq!(0, count_registrations(&mut ex, trip).await.unwrap());

    let registration1 =
        Registration::new(client1, trip, datetime!(2030-01-01 10:20:30.000456 UTC), None);
    assign_client_to_trip(&mut ex, &registration1).await.unwrap();
    assert_eq!(1, count_registrations(&mut ex, trip).await.unwrap());
    assert_eq!(registration1, get_registration(&mut ex, client1, trip).await.unwrap());

    let registration2 = Registration::new(
        client2,
        trip,
        datetime!(2030-01-02 00:00:00 UTC),
        Some(datetime!(2030-01-03 00:00:00 UTC)),
    );
    assign_client_to_trip(&mut ex, &registration2).await.unwrap();
    assert_eq!(2, count_registrations(&mut ex, trip).await.unwrap());
    assert_eq!(registration2, get_registration(&mut ex, client2, trip).await.unwrap());

    assert_eq!(
        DbError::AlreadyExists,
        assign_client_to_trip(&mut ex, &registration1).await.unwrap_err()
    );
    assert_eq!(2, count_registrations(&mut ex, trip).await.unwrap());
}

pub(crate) async fn test_assign_unknown_entities(db: Box<dyn Db + Send + Sync>) {
    let mut ex = setup_ex(db.as_ref()).await;

    let trip = create_simple_trip(&mut ex, "Trip", datetime!(2030-05-05 12:00:00 UTC), 3).await;
    let client = add_client(&mut ex, &new_client(1)).await.unwrap();
    let now = datetime!(2030-01-01 00:00:00 UTC);

    let registration = Registration::new(ClientId::new(client.as_i32() + 1), trip, now, None);
    assert_eq!(DbError::NotFound, assign_client_to_trip(&mut ex, &registration).await.unwrap_err());

    let registration = Registration::new(client, TripId::new(trip.as_i32() + 1), now, None);
    assert_eq!(DbError::NotFound, assign_client_to_trip(&mut ex, &registration).await.unwrap_err());
}

pub(crate) async fn test_remove_client_from_trip(db: Box<dyn Db + Send + Sync>) {
    let mut ex = setup_ex(db.as_ref()).await;

    let trip = create_simple_trip(&mut ex, "Trip", datetime!(2030-05-05 12:00:00 UTC), 3).await;
    let client = add_client(&mut ex, &new_client(1)).await.unwrap();
    let now = datetime!(2030-01-01 00:00:00 UTC);

    assert_eq!(
        DbError::NotFound,
        remove_client_from_trip(&mut ex, client, trip).await.unwrap_err()
    );

    assign_client_to_trip(&mut ex, &Registration::new(client, trip, now, None)).await.unwrap();
    remove_client_from_trip(&mut ex, client, trip).await.unwrap();
    assert!(!is_registered(&mut ex, client, trip).await.unwrap());
    assert!(list_client_trips(&mut ex, client).await.unwrap().is_empty());

    assert_eq!(
        DbError::NotFound,
        remove_client_from_trip(&mut ex, client, trip).await.unwrap_err()
    );
}

macro_rules! generate_db_tests [
    ( $setup:expr $(, #[$extra:meta] )? ) => {
        travel_agency_core::db::testutils::generate_tests!(
            $(#[$extra],)?
            $setup,
            $crate::db::tests,
            test_list_trips_empty,
            test_list_trips_with_countries,
            test_list_client_trips,
            test_get_trip,
            test_exists_predicates,
            test_add_client_uniqueness,
            test_add_client_rolled_back,
            test_registrations,
            test_assign_unknown_entities,
            test_remove_client_from_trip
        );
    }
];

#[cfg(feature = "postgres")]
mod postgres {
    use travel_agency_core::db::postgres::testutils::setup;

    generate_db_tests!(
        Box::from(setup().await),
        #[ignore = "Requires environment configuration and is expensive"]
    );
}

mod sqlite {
    use travel_agency_core::db::sqlite::testutils::setup;

    generate_db_tests!(Box::from(setup().await));
}
