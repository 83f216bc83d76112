//! Request tokens guarding state against stale responses
//!
//! Every outbound request takes a token. A response may only be applied while
//! its token is still the latest one issued; older responses are dropped.

/// Identifies one issued request
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Monotonic token source for one kind of request
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    /// Issue a new token, superseding every earlier one
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}
