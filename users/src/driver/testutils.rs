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

//! Test utilities for the business logic layer.

use crate::db;
use crate::driver::Driver;
use crate::model::User;
use crudsvc_core::db::{Db, Executor};
use std::sync::Arc;

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the driver.
    db: Arc<dyn Db + Send + Sync>,

    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    /// Initializes the driver using an in-memory database with the schema already in place.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::from(crudsvc_core::db::sqlite::testutils::setup().await);
        Self::setup_with(db).await
    }

    /// Initializes the driver against an already-connected `db`.
    pub(crate) async fn setup_with(db: Arc<dyn Db + Send + Sync>) -> Self {
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let driver = Driver::new(db.clone());
        Self { db, driver }
    }

    /// Gets a direct executor against the database.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Gets a copy of the driver in this test context.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Creates a user by directly modifying the backing database.
    pub(crate) async fn create_user(&self, name: &str, age: i32, email: &str) -> User {
        db::create_user(&mut self.ex().await, User::new(name, age, email)).await.unwrap()
    }

    /// Returns all users by directly querying the backing database.
    pub(crate) async fn all_users(&self) -> Vec<User> {
        db::list_users(&mut self.ex().await).await.unwrap()
    }
}
