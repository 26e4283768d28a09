use super::{AccessClaims, AuthError, Identity, Result};

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn extract_bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Turns already signature-checked claims into an identity.
///
/// Only access tokens are accepted, and when `client_id` is configured the
/// token must have been issued to that client.
pub fn claims_to_identity(claims: AccessClaims, client_id: Option<&str>) -> Result<Identity> {
    if claims.token_use != "access" {
        return Err(AuthError::WrongTokenUse(claims.token_use));
    }
    if let Some(expected) = client_id {
        if claims.client_id.as_deref() != Some(expected) {
            return Err(AuthError::ClientMismatch);
        }
    }
    let username = claims
        .username
        .filter(|u| !u.is_empty())
        .ok_or(AuthError::MissingClaim("username"))?;

    Ok(Identity {
        username,
        subject: claims.sub,
        groups: claims.groups,
    })
}

/// Fails unless `identity` belongs to `group`.
pub fn require_group(identity: &Identity, group: &str) -> Result<()> {
    if identity.is_member_of(group) {
        Ok(())
    } else {
        Err(AuthError::MissingGroup(group.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> AccessClaims {
        AccessClaims {
            sub: "sub-1".to_string(),
            username: Some("alice".to_string()),
            groups: vec!["admin-users".to_string()],
            token_use: "access".to_string(),
            client_id: Some("client-1".to_string()),
            iss: None,
            exp: 0,
        }
    }

    #[test]
    fn extract_bearer_strips_scheme() {
        assert_eq!(extract_bearer("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer("Bearer "), None);
        assert_eq!(extract_bearer("Basic abc"), None);
    }

    #[test]
    fn claims_to_identity_accepts_access_token() {
        let identity = claims_to_identity(claims(), Some("client-1")).unwrap();
        assert_eq!(identity.username, "alice");
        assert!(identity.is_member_of("admin-users"));
    }

    #[test]
    fn claims_to_identity_rejects_id_token() {
        let mut id_token = claims();
        id_token.token_use = "id".to_string();
        assert_eq!(
            claims_to_identity(id_token, None),
            Err(AuthError::WrongTokenUse("id".to_string()))
        );
    }

    #[test]
    fn claims_to_identity_checks_client() {
        assert_eq!(
            claims_to_identity(claims(), Some("client-2")),
            Err(AuthError::ClientMismatch)
        );
    }

    #[test]
    fn claims_to_identity_requires_username() {
        let mut anonymous = claims();
        anonymous.username = None;
        assert_eq!(
            claims_to_identity(anonymous, None),
            Err(AuthError::MissingClaim("username"))
        );
    }

    #[test]
    fn require_group_reports_missing_group() {
        let identity = claims_to_identity(claims(), None).unwrap();
        assert!(require_group(&identity, "admin-users").is_ok());
        let err = require_group(&identity, "editors").unwrap_err();
        assert!(err.is_forbidden());
    }

    #[test]
    fn groups_claim_uses_provider_name() {
        let json = serde_json::to_value(claims()).unwrap();
        assert_eq!(json["cognito:groups"][0], "admin-users");
    }
}
