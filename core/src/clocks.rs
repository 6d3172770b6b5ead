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

//! Collection of clock implementations.
//!
//! Business logic that depends on the current time must obtain it from a `Clock` so that tests
//! can control what "now" means.

use time::OffsetDateTime;

/// Generic definition of a clock.
pub trait Clock {
    /// Returns the current UTC time.
    fn now_utc(&self) -> OffsetDateTime;
}

/// Clock implementation that uses the system clock.
#[derive(Clone, Default)]
pub struct SystemClock {}

impl Clock for SystemClock {
    fn now_utc(&self) -> OffsetDateTime {
        let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();

        // Truncate the timestamp to microsecond resolution as this is the resolution supported by
        // timestamps in the PostgreSQL database.  Doing it here keeps the values we hand out equal
        // to the values we later read back.
        let nanos = nanos / 1000 * 1000;

        OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .expect("nanos must be in range because they come from the current timestamp")
    }
}

/// Test utilities.
#[cfg(any(test, feature = "testutils"))]
pub mod testutils {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::time::Duration;

    /// A clock that returns a preconfigured instant and that can be modified at will.
    ///
    /// Only supports microsecond-level precision.
    pub struct SettableClock {
        /// Current fake time in microseconds since the epoch.
        now_us: AtomicI64,
    }

    /// Converts `ts` to microseconds since the epoch, panicking if precision would be lost.
    fn to_micros(ts: OffsetDateTime) -> i64 {
        let nanos = ts.unix_timestamp_nanos();
        assert!(nanos % 1000 == 0, "Nanosecond precision not supported");
        i64::try_from(nanos / 1000).unwrap()
    }

    impl SettableClock {
        /// Creates a new clock that returns `now` until reconfigured with `set`.
        pub fn new(now: OffsetDateTime) -> Self {
            Self { now_us: AtomicI64::new(to_micros(now)) }
        }

        /// Sets the new value of `now` that the clock returns.
        pub fn set(&self, now: OffsetDateTime) {
            self.now_us.store(to_micros(now), Ordering::SeqCst);
        }

        /// Advances the current time by `delta`.
        pub fn advance(&self, delta: Duration) {
            let delta_ns = delta.as_nanos();
            assert!(delta_ns % 1000 == 0, "Nanosecond precision not supported");
            let delta_us = i64::try_from(delta_ns / 1000).unwrap();
            self.now_us.fetch_add(delta_us, Ordering::SeqCst);
        }
    }

    impl Clock for SettableClock {
        fn now_utc(&self) -> OffsetDateTime {
            let now_us = self.now_us.load(Ordering::SeqCst);
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(now_us) * 1000).unwrap()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::panic::catch_unwind;
        use time::macros::datetime;

        #[test]
        fn test_settableclock_set_and_advance() {
            let now = datetime!(2024-05-01 10:15:00.123456 UTC);
            let clock = SettableClock::new(now);
            assert_eq!(now, clock.now_utc());

            let now = datetime!(2024-06-10 08:00:00 UTC);
            clock.set(now);
            assert_eq!(now, clock.now_utc());

            clock.advance(Duration::from_secs(24 * 60 * 60));
            assert_eq!(datetime!(2024-06-11 08:00:00 UTC), clock.now_utc());
        }

        #[test]
        fn test_settableclock_nanosecond_precision_unsupported() {
            catch_unwind(|| {
                SettableClock::new(datetime!(2024-05-01 10:20:00.123456001 UTC));
            })
            .unwrap_err();

            let clock = SettableClock::new(datetime!(2024-05-01 10:20:00 UTC));
            catch_unwind(|| {
                clock.advance(Duration::from_nanos(1));
            })
            .unwrap_err();
        }
    }
}
