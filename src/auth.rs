use crate::err::Error;
use crate::models::{Role, User};
use crate::store::Store;

/**
Check `password` against the stored one for `user_id`.

An unknown user and a wrong password fail the same way, so a caller can't
probe for valid ids.
*/
pub fn login(store: &Store, user_id: &str, password: &str) -> Result<User, Error> {
    log::trace!("auth::login( {:?}, [ password ] ) called.", user_id);

    let user = match store.users.get(user_id) {
        Some(user) => user,
        None => {
            log::warn!("Login attempt for unknown user {:?}.", user_id);
            return Err(invalid_credentials());
        }
    };

    if !user.check_password(password) {
        log::warn!("Bad password for user {:?}.", user_id);
        return Err(invalid_credentials());
    }

    log::info!("{} {} ({}) authenticated.", user.role(), user.name(), user.id());
    Ok(user.clone())
}

fn invalid_credentials() -> Error {
    Error::InvalidCredentials {
        message: "Invalid user id/password combination.".to_string(),
    }
}

/// Fetch `user_id`, insisting it has `role`.
pub fn require_role<'a>(store: &'a Store, user_id: &str, role: Role) -> Result<&'a User, Error> {
    let user = store.users.fetch(user_id)?;
    if user.role() != role {
        return Err(Error::unauthorized(format!(
            "User `{}` is a {}, not a {}.",
            user_id,
            user.role(),
            role
        )));
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{ensure_logging, populated_store};

    #[test]
    fn login_succeeds_with_exact_password() {
        ensure_logging();
        let store = populated_store();
        let user = login(&store, "prof_a", "prof_pass_a").unwrap();
        assert_eq!(user.id(), "prof_a");
        assert_eq!(user.role(), Role::Professor);
    }

    #[test]
    fn login_fails_on_wrong_or_differently_cased_password() {
        ensure_logging();
        let store = populated_store();
        let err = login(&store, "prof_a", "wrong_pass").unwrap_err();
        assert_eq!(err.kind(), "InvalidCredentials");
        assert!(login(&store, "prof_a", "PROF_PASS_A").is_err());
    }

    #[test]
    fn login_fails_for_unknown_user() {
        ensure_logging();
        let store = populated_store();
        let err = login(&store, "nobody", "prof_pass_a").unwrap_err();
        assert_eq!(err.kind(), "InvalidCredentials");
    }

    #[test]
    fn require_role_distinguishes_missing_from_wrong_role() {
        let store = populated_store();
        assert!(require_role(&store, "stud_a", Role::Student).is_ok());
        assert_eq!(
            require_role(&store, "stud_a", Role::Professor).unwrap_err().kind(),
            "Unauthorized"
        );
        assert_eq!(
            require_role(&store, "stud_z", Role::Student).unwrap_err().kind(),
            "NotFound"
        );
    }
}
