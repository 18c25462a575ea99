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

//! REST interface for the users service.

use crate::driver::Driver;
use axum::Router;
use crudsvc_core::rest::log_request;

mod user_delete;
mod user_get;
mod user_patch;
mod user_put;
mod users_get;
mod users_post;
#[cfg(test)]
mod testutils;

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/users", get(users_get::handler).post(users_post::handler))
        .route(
            "/users/:id",
            get(user_get::handler)
                .put(user_put::handler)
                .patch(user_patch::handler)
                .delete(user_delete::handler),
        )
        .layer(axum::middleware::from_fn(log_request))
        .with_state(driver)
}

#[cfg(test)]
mod tests {
    use super::testutils::*;
    use crate::model::User;
    use axum::http;
    use crudsvc_core::rest::testutils::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_e2e_user_lifecycle() {
        let context = TestContext::setup().await;

        let created = OneShotBuilder::new(context.app(), (http::Method::POST, "/users"))
            .send_json(json!({"name": "jane", "age": 31, "email": "jane@example.com"}))
            .await
            .expect_status(http::StatusCode::CREATED)
            .expect_json::<User>()
            .await;
        let id = created.id().clone().unwrap();
        let user_path = format!("/users/{}", id);

        let fetched = OneShotBuilder::new(context.app(), (http::Method::GET, &user_path))
            .send_empty()
            .await
            .expect_json::<User>()
            .await;
        assert_eq!(created, fetched);

        OneShotBuilder::new(context.app(), (http::Method::PATCH, &user_path))
            .send_json(json!({"email": "new@example.com"}))
            .await
            .expect_text("patched successfully")
            .await;

        let fetched = OneShotBuilder::new(context.app(), (http::Method::GET, &user_path))
            .send_empty()
            .await
            .expect_json::<User>()
            .await;
        assert_eq!(User::new("jane", 31, "new@example.com").with_id(id.clone()), fetched);

        OneShotBuilder::new(context.app(), (http::Method::DELETE, &user_path))
            .send_empty()
            .await
            .expect_text("deleted successfully")
            .await;

        OneShotBuilder::new(context.app(), (http::Method::GET, &user_path))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("User not found")
            .await;
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), (http::Method::GET, "/groups"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_empty()
            .await;
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), (http::Method::DELETE, "/users"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::METHOD_NOT_ALLOWED)
            .expect_empty()
            .await;
    }
}
