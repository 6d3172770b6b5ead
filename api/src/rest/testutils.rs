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

//! Test utilities for the REST API.

use crate::driver;
use crate::rest::app;
use axum::Router;
use std::ops::Deref;

/// State of a running test, giving access to the app router and to the backing database.
pub(crate) struct TestContext {
    /// Driver-level context, used to prepare and inspect the database.
    context: driver::testutils::TestContext,

    /// The app router under test.
    app: Router,
}

impl TestContext {
    pub(crate) async fn setup() -> Self {
        let context = driver::testutils::TestContext::setup().await;
        let app = app(context.driver());
        Self { context, app }
    }

    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    pub(crate) fn into_app(self) -> Router {
        self.app
    }
}

impl Deref for TestContext {
    type Target = driver::testutils::TestContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}
