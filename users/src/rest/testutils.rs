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

//! Test utilities for the REST API.

use crate::db;
use crate::driver::Driver;
use crate::model::{User, UserId};
use crate::rest::app;
use axum::Router;
use crudsvc_core::db::{Db, DbError, Executor};
use std::sync::Arc;

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the app.
    db: Arc<dyn Db + Send + Sync>,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Initializes the app using an in-memory database with the schema already in place.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::from(crudsvc_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let driver = Driver::new(db.clone());
        let app = app(driver);
        Self { db, app }
    }

    /// Gets a copy of the app router to send a request to it.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and returns the app router.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Creates a user by directly modifying the backing database and returns its identifier.
    pub(crate) async fn create_user(&self, name: &str, age: i32, email: &str) -> UserId {
        let user = db::create_user(&mut self.db.ex().await.unwrap(), User::new(name, age, email))
            .await
            .unwrap();
        user.id().clone().unwrap()
    }

    /// Gets the user identified by `id` or `None` if it does not exist.
    pub(crate) async fn get_user(&self, id: &UserId) -> Option<User> {
        match db::get_user(&mut self.db.ex().await.unwrap(), id.as_str()).await {
            Ok(user) => Some(user),
            Err(DbError::NotFound) => None,
            Err(e) => panic!("{:?}", e),
        }
    }

    /// Returns all users by directly querying the backing database.
    pub(crate) async fn all_users(&self) -> Vec<User> {
        db::list_users(&mut self.db.ex().await.unwrap()).await.unwrap()
    }

    /// Runs the raw `sql` statements against the backing database.
    async fn run_sql(&self, sql: &str) {
        match &mut self.db.ex().await.unwrap() {
            Executor::Sqlite(ex) => crudsvc_core::db::sqlite::run_schema(ex, sql).await.unwrap(),

            #[allow(unused)]
            _ => unreachable!(),
        }
    }

    /// Removes the `users` table so that any further query fails in the backend.
    pub(crate) async fn break_table(&self) {
        self.run_sql("DROP TABLE users").await;
    }

    /// Makes the backend silently discard any new rows inserted into the `users` table.
    pub(crate) async fn discard_inserts(&self) {
        self.run_sql(
            "CREATE TRIGGER discard_inserts BEFORE INSERT ON users BEGIN SELECT RAISE(IGNORE); END",
        )
        .await;
    }
}
