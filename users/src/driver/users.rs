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

//! Operations on the collection of users.

use crate::db;
use crate::driver::Driver;
use crate::model::User;
use crudsvc_core::driver::DriverResult;

impl Driver {
    /// Gets all existing users.
    pub(crate) async fn list_users(self) -> DriverResult<Vec<User>> {
        let mut ex = self.db.ex().await?;
        Ok(db::list_users(&mut ex).await?)
    }

    /// Creates a new user out of `user` and returns it with the identifier assigned to it.
    ///
    /// Any identifier already present in `user` is ignored.
    pub(crate) async fn create_user(self, user: User) -> DriverResult<User> {
        let mut tx = self.db.begin().await?;
        let result = db::create_user(tx.ex(), user.without_id()).await;
        Ok(tx.finish(result).await?)
    }
}
