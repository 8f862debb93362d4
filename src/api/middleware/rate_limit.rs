//! Rate limiting middleware using token bucket algorithm.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Token bucket parameters for a group of routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Public endpoints: 2 requests per second, burst of 100.
    Public,
    /// Authenticated API endpoints: 1 request per second, burst of 10.
    Secure,
}

impl Tier {
    fn per_second(self) -> u64 {
        match self {
            Tier::Public => 2,
            Tier::Secure => 1,
        }
    }

    fn burst_size(self) -> u32 {
        match self {
            Tier::Public => 100,
            Tier::Secure => 10,
        }
    }
}

/// Creates a rate limiter keyed by `key_extractor`.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
pub fn layer<K: KeyExtractor>(
    tier: Tier,
    key_extractor: K,
) -> GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(key_extractor)
            .per_second(tier.per_second())
            .burst_size(tier.burst_size())
            .finish()
            .expect("rate limit tiers use non-zero period and burst"),
    );

    GovernorLayer::new(governor_conf)
}

/// Applies the rate limiter for `tier` to every route of `router`.
///
/// With `behind_proxy` the client IP is read from `X-Forwarded-For` /
/// `X-Real-IP` / `Forwarded` headers, otherwise from the socket peer address.
/// Enable it only when the service runs behind a trusted reverse proxy.
///
/// # Example
///
/// ```rust,ignore
/// let api = rate_limit::apply(api::routes::protected_routes(), Tier::Secure, false);
/// ```
pub fn apply<S>(router: Router<S>, tier: Tier, behind_proxy: bool) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if behind_proxy {
        router.layer(layer(tier, SmartIpKeyExtractor))
    } else {
        router.layer(layer(tier, PeerIpKeyExtractor))
    }
}
