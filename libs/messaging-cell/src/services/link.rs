// libs/messaging-cell/src/services/link.rs
const INVITATION_PREFIX: &str = "Gold Standard Medical Group invites you to a secure video call: ";

/// Providers whose meeting room does not follow the `<token>gsmg` convention.
const VANITY_ROOMS: &[(&str, &str)] = &[("vivian", "viviangsmg1")];

/// Builds per-provider meeting links and the invitation text that carries them.
#[derive(Debug, Clone)]
pub struct MeetingLinkBuilder {
    host: String,
}

impl MeetingLinkBuilder {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    pub fn link_for(&self, provider_token: &str) -> String {
        let token = provider_token.to_lowercase();
        let room = VANITY_ROOMS
            .iter()
            .find(|(provider, _)| *provider == token)
            .map(|(_, room)| room.to_string())
            .unwrap_or_else(|| format!("{}gsmg", token));

        format!("{}/{}", self.host.trim_end_matches('/'), room)
    }

    pub fn message_body(&self, provider_token: &str) -> String {
        format!("{}{}.", INVITATION_PREFIX, self.link_for(provider_token))
    }
}
