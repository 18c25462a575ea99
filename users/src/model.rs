// crudsvc
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

use crudsvc_core::model::{ModelError, ModelResult};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Identifier of a user as assigned by the database.
///
/// The database stores identifiers as integers but they travel through the API as opaque strings.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct UserId(String);

impl UserId {
    /// Creates a new identifier from its textual representation.
    pub(crate) fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    /// Returns the string view of the identifier.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the numeric value of the identifier as stored in the database.
    ///
    /// Only the canonical decimal form names a stored user, so `01`, `+1` or `1.0` yield `None`
    /// instead of aliasing user `1`.
    pub(crate) fn as_i64(&self) -> Option<i64> {
        let raw = self.0.parse::<i64>().ok()?;
        if raw.to_string() == self.0 { Some(raw) } else { None }
    }
}

impl From<i64> for UserId {
    fn from(raw: i64) -> Self {
        Self(raw.to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns true if `age` has its default value and should be left out of serialized forms.
fn is_zero(age: &i32) -> bool {
    *age == 0
}

/// A user as stored in the database and exchanged with clients.
///
/// Fields that hold their default value are omitted when serialized and take their default value
/// when absent from the input.
#[derive(Clone, Debug, Default, Deserialize, Getters, PartialEq, Serialize)]
pub(crate) struct User {
    /// Identifier of the user, only known once the user has been stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<UserId>,

    /// Name of the user.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    name: String,

    /// Age of the user.
    #[serde(default, skip_serializing_if = "is_zero")]
    age: i32,

    /// Email address of the user.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    email: String,
}

impl User {
    /// Creates a new user without an identifier.
    pub(crate) fn new<N: Into<String>, E: Into<String>>(name: N, age: i32, email: E) -> Self {
        Self { id: None, name: name.into(), age, email: email.into() }
    }

    /// Sets the identifier of the user, replacing any previous value.
    pub(crate) fn with_id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    /// Drops the identifier of the user, if any.
    pub(crate) fn without_id(mut self) -> Self {
        self.id = None;
        self
    }
}

/// A single mutable column of a user along with its new value.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum UserField {
    /// New value for the `name` column.
    Name(String),

    /// New value for the `age` column.
    Age(i32),

    /// New value for the `email` column.
    Email(String),
}

impl UserField {
    /// Returns the name of the database column that this field updates.
    pub(crate) fn column(&self) -> &'static str {
        match self {
            UserField::Name(_) => "name",
            UserField::Age(_) => "age",
            UserField::Email(_) => "email",
        }
    }

    /// Parses the JSON `value` given to the field named `key`.
    fn parse(key: &str, value: Value) -> ModelResult<Self> {
        match key {
            "name" => Ok(UserField::Name(expect_string(key, value)?)),
            "age" => {
                let age = value
                    .as_i64()
                    .ok_or_else(|| ModelError(format!("Field '{}' must be an integer", key)))?;
                let age = i32::try_from(age)
                    .map_err(|_| ModelError(format!("Field '{}' is out of range", key)))?;
                Ok(UserField::Age(age))
            }
            "email" => Ok(UserField::Email(expect_string(key, value)?)),
            key => Err(ModelError(format!("Unknown or immutable field '{}'", key))),
        }
    }
}

/// Extracts a string from the JSON `value` given to the field named `key`.
fn expect_string(key: &str, value: Value) -> ModelResult<String> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(ModelError(format!("Field '{}' must be a string", key))),
    }
}

/// A non-empty set of changes to apply to a user, in the order in which the client sent them.
#[derive(Debug, PartialEq)]
pub(crate) struct UserPatch(Vec<UserField>);

impl UserPatch {
    /// Returns the fields to update.
    pub(crate) fn fields(&self) -> &[UserField] {
        &self.0
    }
}

impl TryFrom<Map<String, Value>> for UserPatch {
    type Error = ModelError;

    fn try_from(raw: Map<String, Value>) -> ModelResult<Self> {
        if raw.is_empty() {
            return Err(ModelError("Patch must contain at least one field".to_owned()));
        }

        let mut fields = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            fields.push(UserField::parse(&key, value)?);
        }
        Ok(UserPatch(fields))
    }
}
