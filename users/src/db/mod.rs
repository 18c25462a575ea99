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

//! Database abstraction to manipulate the `users` table.

use crate::model::{User, UserField, UserId, UserPatch};
#[cfg(feature = "postgres")]
use crudsvc_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use crudsvc_core::db::sqlite;
use crudsvc_core::db::{DbError, DbResult, Executor};
use futures::TryStreamExt;
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;


/// Initializes the database schema.
pub(crate) async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for User {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        let age: i32 = row.try_get("age").map_err(postgres::map_sqlx_error)?;
        let email: String = row.try_get("email").map_err(postgres::map_sqlx_error)?;

        Ok(User::new(name, age, email).with_id(UserId::from(id)))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for User {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let age: i32 = row.try_get("age").map_err(sqlite::map_sqlx_error)?;
        let email: String = row.try_get("email").map_err(sqlite::map_sqlx_error)?;

        Ok(User::new(name, age, email).with_id(UserId::from(id)))
    }
}

/// Builds the statement to apply `patch` to the user with a given identifier.
///
/// Column names come exclusively from `UserField::column` and values are left as parameters, whose
/// syntax is given by `placeholder` for the 1-based position of each parameter.  The identifier
/// is always the last parameter.
fn build_patch_query<F>(patch: &UserPatch, placeholder: F) -> String
where
    F: Fn(usize) -> String,
{
    let assignments = patch
        .fields()
        .iter()
        .enumerate()
        .map(|(i, field)| format!("{} = {}", field.column(), placeholder(i + 1)))
        .collect::<Vec<String>>();
    let id_param = placeholder(patch.fields().len() + 1);
    format!("UPDATE users SET {} WHERE id = {}", assignments.join(", "), id_param)
}

/// Gets all users ordered by their identifier.
pub(crate) async fn list_users(ex: &mut Executor) -> DbResult<Vec<User>> {
    let query_str = "SELECT id, name, age, email FROM users ORDER BY id";

    let mut users = vec![];
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let mut rows = sqlx::query(query_str).fetch(ex);
            while let Some(row) = rows.try_next().await.map_err(postgres::map_sqlx_error)? {
                users.push(User::try_from(row)?);
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let mut rows = sqlx::query(query_str).fetch(ex);
            while let Some(row) = rows.try_next().await.map_err(sqlite::map_sqlx_error)? {
                users.push(User::try_from(row)?);
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(users)
}

/// Gets the user whose identifier, name or email address matches `key`.
///
/// `key` is only compared against identifiers when it is in their canonical numeric form.  If more
/// than one user matches, the one with the lowest identifier wins.
pub(crate) async fn get_user(ex: &mut Executor, key: &str) -> DbResult<User> {
    let id = UserId::new(key).as_i64();
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT id, name, age, email FROM users
                WHERE id = $1 OR name = $2 OR email = $2
                ORDER BY id
                LIMIT 1
            ";
            let row = sqlx::query(query_str)
                .bind(id)
                .bind(key)
                .fetch_one(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            User::try_from(row)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT id, name, age, email FROM users
                WHERE id = ? OR name = ? OR email = ?
                ORDER BY id
                LIMIT 1
            ";
            let row = sqlx::query(query_str)
                .bind(id)
                .bind(key)
                .bind(key)
                .fetch_one(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            User::try_from(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Inserts a new `user` and returns it with the identifier assigned by the database.
///
/// Any identifier already present in `user` is ignored.
pub(crate) async fn create_user(ex: &mut Executor, user: User) -> DbResult<User> {
    let id = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "INSERT INTO users (name, age, email) VALUES ($1, $2, $3) RETURNING id";
            let row = sqlx::query(query_str)
                .bind(user.name())
                .bind(user.age())
                .bind(user.email())
                .fetch_optional(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            match row {
                Some(row) => row.try_get::<i64, _>("id").map_err(postgres::map_sqlx_error)?,
                None => {
                    return Err(DbError::BackendError(
                        "Insertion did not affect any rows".to_owned(),
                    ));
                }
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "INSERT INTO users (name, age, email) VALUES (?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(user.name())
                .bind(user.age())
                .bind(user.email())
                .execute(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            if done.rows_affected() != 1 {
                return Err(DbError::BackendError(format!(
                    "Insertion affected {} rows instead of 1",
                    done.rows_affected()
                )));
            }
            done.last_insert_rowid()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    Ok(user.with_id(UserId::from(id)))
}

/// Replaces all mutable fields of the user identified by `id` with those in `user`.
///
/// Returns the number of affected rows, which is zero if the user does not exist or if `id` cannot
/// name a stored user.
pub(crate) async fn update_user(ex: &mut Executor, id: &UserId, user: &User) -> DbResult<u64> {
    let Some(id) = id.as_i64() else {
        return Ok(0);
    };
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "UPDATE users SET name = $1, age = $2, email = $3 WHERE id = $4";
            let done = sqlx::query(query_str)
                .bind(user.name())
                .bind(user.age())
                .bind(user.email())
                .bind(id)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "UPDATE users SET name = ?, age = ?, email = ? WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(user.name())
                .bind(user.age())
                .bind(user.email())
                .bind(id)
                .execute(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(rows_affected)
}

/// Applies the changes in `patch` to the user identified by `id`.
///
/// Returns the number of affected rows, which is zero if the user does not exist or if `id` cannot
/// name a stored user.
pub(crate) async fn patch_user(ex: &mut Executor, id: &UserId, patch: &UserPatch) -> DbResult<u64> {
    let Some(id) = id.as_i64() else {
        return Ok(0);
    };
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = build_patch_query(patch, |i| format!("${}", i));
            let mut query = sqlx::query(&query_str);
            for field in patch.fields() {
                query = match field {
                    UserField::Name(value) | UserField::Email(value) => query.bind(value.as_str()),
                    UserField::Age(value) => query.bind(*value),
                };
            }
            let done = query.bind(id).execute(ex).await.map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = build_patch_query(patch, |_| "?".to_owned());
            let mut query = sqlx::query(&query_str);
            for field in patch.fields() {
                query = match field {
                    UserField::Name(value) | UserField::Email(value) => query.bind(value.as_str()),
                    UserField::Age(value) => query.bind(*value),
                };
            }
            let done = query.bind(id).execute(ex).await.map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(rows_affected)
}

/// Deletes the user identified by `id`.
///
/// Returns the number of affected rows, which is zero if the user does not exist or if `id` cannot
/// name a stored user.
pub(crate) async fn delete_user(ex: &mut Executor, id: &UserId) -> DbResult<u64> {
    let Some(id) = id.as_i64() else {
        return Ok(0);
    };
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM users WHERE id = $1";
            let done = sqlx::query(query_str)
                .bind(id)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM users WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(id)
                .execute(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(rows_affected)
}

#[cfg(test)]
mod query_tests {
    use super::*;
    use serde_json::json;

    fn patch(value: serde_json::Value) -> UserPatch {
        match value {
            serde_json::Value::Object(map) => UserPatch::try_from(map).unwrap(),
            _ => panic!("Test value must be an object"),
        }
    }

    #[test]
    fn test_build_patch_query_postgres() {
        let patch = patch(json!({"email": "a@b", "age": 3}));
        assert_eq!(
            "UPDATE users SET email = $1, age = $2 WHERE id = $3",
            build_patch_query(&patch, |i| format!("${}", i))
        );
    }

    #[test]
    fn test_build_patch_query_sqlite() {
        let patch = patch(json!({"name": "x"}));
        assert_eq!(
            "UPDATE users SET name = ? WHERE id = ?",
            build_patch_query(&patch, |_| "?".to_owned())
        );
    }
}
