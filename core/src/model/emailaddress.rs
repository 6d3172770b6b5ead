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

//! The `EmailAddress` data type.

use crate::model::{ModelError, ModelResult};
use serde::de::Visitor;
use serde::{Deserialize, Serialize};

/// Maximum length of email addresses per the schema.
pub const MAX_EMAIL_LENGTH: usize = 120;

/// Represents a correctly-formatted email address.
///
/// According to the standard, the local part of an email address may be case sensitive but the
/// domain part is case insensitive.  We only compare addresses for uniqueness purposes so this
/// treats them as case sensitive overall and leaves any smarter matching to the database.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a new email address from an untrusted string `s`, making sure it is valid.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();

        if s.trim().is_empty() {
            return Err(ModelError("Email address cannot be empty".to_owned()));
        }
        if s.chars().count() > MAX_EMAIL_LENGTH {
            return Err(ModelError(format!(
                "Email address cannot be longer than {} characters",
                MAX_EMAIL_LENGTH
            )));
        }

        // Attempting to fully validate email addresses is futile, so we only check the basic
        // local@domain shape.
        let valid = match s.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !s.chars().any(char::is_whitespace)
            }
            None => false,
        };
        if !valid {
            return Err(ModelError(format!("Email does not look like a valid address '{}'", s)));
        }

        Ok(Self(s))
    }

    /// Creates a new email address from an untrusted string `s`, without validation.  Useful for
    /// testing purposes only.
    #[cfg(any(test, feature = "testutils"))]
    pub fn new_invalid<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    /// Returns a string view of the email address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(any(test, feature = "testutils"))]
impl From<&str> for EmailAddress {
    fn from(raw_email: &str) -> Self {
        Self::new(raw_email).expect("Hardcoded email addresses for testing must be valid")
    }
}

/// Visitor to deserialize an `EmailAddress` from a string.
struct EmailAddressVisitor;

impl Visitor<'_> for EmailAddressVisitor {
    type Value = EmailAddress;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("an email address")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        EmailAddress::new(v).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        EmailAddress::new(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for EmailAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_string(EmailAddressVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{Token, assert_de_tokens_error, assert_tokens};

    #[test]
    fn test_emailaddress_ok() {
        assert_eq!("simple@example.com", EmailAddress::new("simple@example.com").unwrap().as_str());
        assert_eq!("a!b@c", EmailAddress::new("a!b@c").unwrap().as_str());
    }

    #[test]
    fn test_emailaddress_error() {
        assert!(EmailAddress::new("").is_err());
        assert!(EmailAddress::new("   ").is_err());
        assert!(EmailAddress::new("foo").is_err());
        assert!(EmailAddress::new("@example.com").is_err());
        assert!(EmailAddress::new("foo@").is_err());
        assert!(EmailAddress::new("foo@bar@example.com").is_err());
        assert!(EmailAddress::new("foo bar@example.com").is_err());
    }

    #[test]
    fn test_emailaddress_too_long() {
        let mut long_string = format!("{}@example.com", "a".repeat(MAX_EMAIL_LENGTH - 12));
        assert_eq!(MAX_EMAIL_LENGTH, long_string.len());
        assert!(EmailAddress::new(&long_string).is_ok());
        long_string.push('x');
        match EmailAddress::new(&long_string) {
            Err(ModelError(msg)) => assert!(msg.contains("longer than 120")),
            e => panic!("{:?}", e),
        }
    }

    #[test]
    fn test_emailaddress_case_sensitive() {
        assert_ne!(EmailAddress::from("foo@example.com"), EmailAddress::from("Foo@example.com"));
    }

    #[test]
    fn test_emailaddress_ser_de_ok() {
        let email = EmailAddress::new("HelloWorld@example.com").unwrap();
        assert_tokens(&email, &[Token::String("HelloWorld@example.com")]);
    }

    #[test]
    fn test_emailaddress_de_error() {
        assert_de_tokens_error::<EmailAddress>(
            &[Token::String("HelloWorld")],
            "Email does not look like a valid address 'HelloWorld'",
        );
    }
}
