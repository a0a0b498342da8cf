use actix_web::HttpRequest;

use crate::entities::client::ClientKey;

/// Resolve the caller's key from the request.
/// `trust_x_forwarded_for`: only behind a proxy that rewrites the header,
/// otherwise clients could pick their own bucket.
pub fn get_client_ip(req: &HttpRequest, trust_x_forwarded_for: bool) -> ClientKey {
    if trust_x_forwarded_for {
        if let Some(first_hop) = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            return ClientKey::new(first_hop);
        }
    }
    req.peer_addr()
        .map(|addr| ClientKey::new(addr.ip().to_string()))
        .unwrap_or_else(ClientKey::unknown)
}
