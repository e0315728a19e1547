use reqwest::RequestBuilder;
use tokio::sync::watch;

use super::Session;

/// Adds `Authorization: Bearer <token>` to requests while a session is live.
///
/// Reads the in-memory session at send time, so a login or logout takes
/// effect on the very next request without touching storage.
#[derive(Debug, Clone)]
pub struct Authorizer {
    session: watch::Receiver<Session>,
}

impl Authorizer {
    pub fn new(session: watch::Receiver<Session>) -> Self {
        Self { session }
    }

    /// An authorizer that never attaches a token.
    pub fn anonymous() -> Self {
        let (_tx, rx) = watch::channel(Session::anonymous());
        Self { session: rx }
    }

    pub fn token(&self) -> Option<String> {
        self.session.borrow().token().map(str::to_string)
    }

    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}
