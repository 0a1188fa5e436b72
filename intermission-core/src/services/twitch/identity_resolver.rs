use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use intermission_common::models::ChannelIdentity;

use crate::Error;
use crate::platforms::twitch_helix::HelixApi;

/// Maps channel logins to numeric broadcaster ids with one batched lookup.
pub struct IdentityResolver {
    helix: Arc<dyn HelixApi>,
}

impl IdentityResolver {
    pub fn new(helix: Arc<dyn HelixApi>) -> Self {
        Self { helix }
    }

    /// Returns one identity per login that exists, in input order.
    ///
    /// Unknown logins are warned about and left out. Transport and HTTP errors are
    /// returned as-is; the caller treats them as fatal.
    pub async fn resolve(&self, logins: &[String]) -> Result<Vec<ChannelIdentity>, Error> {
        let mut seen = HashSet::new();
        let wanted: Vec<String> = logins
            .iter()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty() && seen.insert(l.clone()))
            .collect();

        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let users = self.helix.get_users_by_login(&wanted).await?;

        let mut resolved = Vec::with_capacity(wanted.len());
        for login in &wanted {
            match users.iter().find(|u| u.login.eq_ignore_ascii_case(login)) {
                Some(user) => resolved.push(ChannelIdentity::new(login.as_str(), user.id.as_str())),
                None => warn!("Channel '{}' did not resolve to a user id; skipping", login),
            }
        }

        info!("Resolved {}/{} channel(s)", resolved.len(), wanted.len());
        Ok(resolved)
    }
}
