// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assembly of the hashed `user_data` block.

use std::sync::Arc;

use pitstop_core::{CookieReader, CustomerInfo, PageContext, UserData};

use crate::normalize::Normalizer;

/// Ad-attribution browser id cookie.
pub const FBP_COOKIE: &str = "_fbp";
/// Ad-attribution click id cookie.
pub const FBC_COOKIE: &str = "_fbc";

/// Builds [`UserData`] from optional customer attributes.
///
/// There is no minimum: a visitor with nothing known still gets a block
/// carrying the user agent and any attribution cookies.
pub struct UserDataBuilder {
    normalizer: Normalizer,
    page: Arc<dyn PageContext>,
    cookies: Arc<dyn CookieReader>,
}

impl UserDataBuilder {
    pub fn new(
        normalizer: Normalizer,
        page: Arc<dyn PageContext>,
        cookies: Arc<dyn CookieReader>,
    ) -> Self {
        Self {
            normalizer,
            page,
            cookies,
        }
    }

    pub fn build(&self, info: Option<&CustomerInfo>) -> UserData {
        let mut data = UserData {
            client_user_agent: self.page.user_agent(),
            fbp: self.cookies.cookie(FBP_COOKIE),
            fbc: self.cookies.cookie(FBC_COOKIE),
            ..UserData::default()
        };

        let Some(info) = info else {
            return data;
        };

        let hash = |value: &Option<String>| value.as_deref().and_then(|v| self.normalizer.hash(v));
        data.em = hash(&info.email);
        data.ph = hash(&info.phone);
        data.first_name = hash(&info.first_name);
        data.ln = hash(&info.last_name);
        data.ct = hash(&info.city);
        data.st = hash(&info.state);
        data.country = hash(&info.country);
        data.zp = hash(&info.postal_code);
        data.db = hash(&info.date_of_birth);
        data.ge = hash(&info.gender);
        data
    }
}
