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

//! Operations on a single user.

use crate::db;
use crate::driver::{Driver, require_rows};
use crate::model::{User, UserId, UserPatch};
use crudsvc_core::db::DbError;
use crudsvc_core::driver::{DriverError, DriverResult};

/// Message returned when looking up or deleting a user that does not exist.
const USER_NOT_FOUND: &str = "User not found";

/// Builds the error returned when modifying the user `id` that does not exist.
fn no_such_user(id: &UserId) -> DriverError {
    DriverError::NotFound(format!("User with ID {} doesn't exist", id))
}

impl Driver {
    /// Gets the user whose identifier, name or email address matches `key`.
    pub(crate) async fn get_user(self, key: String) -> DriverResult<User> {
        let mut ex = self.db.ex().await?;
        match db::get_user(&mut ex, &key).await {
            Ok(user) => Ok(user),
            Err(DbError::NotFound) => Err(DriverError::NotFound(USER_NOT_FOUND.to_owned())),
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces all mutable fields of the user `id` with those in `user`.
    ///
    /// The identifier in `user`, if any, is overridden by `id`.
    pub(crate) async fn replace_user(self, id: UserId, user: User) -> DriverResult<User> {
        let user = user.with_id(id.clone());

        let mut tx = self.db.begin().await?;
        let result = db::update_user(tx.ex(), &id, &user).await.and_then(require_rows);
        match tx.finish(result).await {
            Ok(_) => Ok(user),
            Err(DbError::NotFound) => Err(no_such_user(&id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Applies the changes in `patch` to the user `id`.
    pub(crate) async fn patch_user(self, id: UserId, patch: UserPatch) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;
        let result = db::patch_user(tx.ex(), &id, &patch).await.and_then(require_rows);
        match tx.finish(result).await {
            Ok(_) => Ok(()),
            Err(DbError::NotFound) => Err(no_such_user(&id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes the user `id`.
    pub(crate) async fn delete_user(self, id: UserId) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;
        let result = db::delete_user(tx.ex(), &id).await.and_then(require_rows);
        match tx.finish(result).await {
            Ok(_) => Ok(()),
            Err(DbError::NotFound) => Err(DriverError::NotFound(USER_NOT_FOUND.to_owned())),
            Err(e) => Err(e.into()),
        }
    }
}
