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

//! API to update some fields of an existing user.

use crate::driver::Driver;
use crate::model::{UserId, UserPatch};
use axum::extract::{Path, State};
use crudsvc_core::rest::{JsonBody, RestError};
use serde_json::{Map, Value};

/// PATCH handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    JsonBody(raw): JsonBody<Map<String, Value>>,
) -> Result<String, RestError> {
    let patch = UserPatch::try_from(raw)?;
    let id = UserId::new(id);
    driver.patch_user(id.clone(), patch).await?;
    Ok(format!("User with ID {} patched successfully", id))
}
