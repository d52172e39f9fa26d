//! Defines functions for handling user authentication with a private session cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, user::UserID};

/// The name of the cookie holding the serialized session token.
pub(crate) const COOKIE_TOKEN: &str = "token";

/// The default duration for which auth cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(30);

/// The session claims sealed inside the private cookie.
///
/// The expiry is serialized as a unix timestamp, so the stored form carries
/// no datetime formatting to get wrong on the way back in.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub(crate) struct SessionToken {
    pub user_id: UserID,

    #[serde(with = "time::serde::timestamp")]
    pub expires_at: OffsetDateTime,
}

/// Add an auth cookie to the cookie jar, indicating that a user is logged in and authenticated.
///
/// Sets the expiry of the cookie and the embedded token to `duration` from the current time.
///
/// Returns the cookie jar with the cookie added.
///
/// # Errors
///
/// Returns an [Error::JsonSerialization] if the token cannot be serialized.
pub(crate) fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc() + duration;
    let token = SessionToken {
        user_id,
        expires_at,
    };
    let token_string = serde_json::to_string(&token)
        .map_err(|error| Error::JsonSerialization(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, token_string))
            .expires(expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Set the auth cookie to an invalid value and set its max age to zero, which
/// should delete the cookie on the client side.
pub(crate) fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Extract and validate the session token from the cookie jar.
///
/// # Errors
///
/// Returns [Error::Unauthenticated] if the cookie is missing, cannot be parsed,
/// or the embedded token has expired.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<SessionToken, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::Unauthenticated)?;

    let token: SessionToken =
        serde_json::from_str(cookie.value_trimmed()).map_err(|_| Error::Unauthenticated)?;

    if token.expires_at <= OffsetDateTime::now_utc() {
        return Err(Error::Unauthenticated);
    }

    Ok(token)
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime, macros::datetime};

    use crate::{Error, user::UserID};

    use super::{
        COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, SessionToken, get_token_from_cookies,
        invalidate_auth_cookie, set_auth_cookie,
    };

    #[test]
    fn session_token_serializes_as_a_unix_timestamp() {
        let token = SessionToken {
            user_id: UserID::new(7),
            expires_at: datetime!(2026-01-01 00:00:00 UTC),
        };

        let serialized = serde_json::to_string(&token).unwrap();

        assert_eq!(serialized, r#"{"user_id":7,"expires_at":1767225600}"#);
    }

    #[test]
    fn session_token_deserializes_to_the_same_claims() {
        let token = SessionToken {
            user_id: UserID::new(7),
            expires_at: datetime!(2026-01-01 00:00:00 UTC),
        };

        let deserialized: SessionToken =
            serde_json::from_str(&serde_json::to_string(&token).unwrap()).unwrap();

        assert_eq!(deserialized, token);
    }

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"foobar");
        let key = Key::from(&hash);

        PrivateCookieJar::new(key)
    }

    #[test]
    fn set_cookie_round_trips_token() {
        let jar = get_jar();
        let user_id = UserID::new(1);

        let jar = set_auth_cookie(jar, user_id, DEFAULT_COOKIE_DURATION).unwrap();
        let token = get_token_from_cookies(&jar).unwrap();

        assert_eq!(token.user_id, user_id);
        assert!(
            (token.expires_at - OffsetDateTime::now_utc() - DEFAULT_COOKIE_DURATION).abs()
                < Duration::seconds(1)
        );
    }

    #[test]
    fn get_token_fails_on_missing_cookie() {
        let jar = get_jar();

        assert_eq!(
            get_token_from_cookies(&jar),
            Err(Error::Unauthenticated),
        );
    }

    #[test]
    fn get_token_fails_on_expired_token() {
        let jar = get_jar();
        let jar = set_auth_cookie(jar, UserID::new(1), Duration::seconds(-5)).unwrap();

        assert_eq!(
            get_token_from_cookies(&jar),
            Err(Error::Unauthenticated),
        );
    }

    #[test]
    fn invalidate_auth_cookie_rejects_future_reads() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), DEFAULT_COOKIE_DURATION).unwrap();

        let jar = invalidate_auth_cookie(jar);
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(cookie.value(), "deleted");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(
            get_token_from_cookies(&jar),
            Err(Error::Unauthenticated),
        );
    }
}
