//! Session commands.

#![allow(clippy::print_stdout)]

use secrecy::SecretString;

use ix_core::Username;
use ix_storefront::AppError;
use ix_storefront::models::CurrentUser;
use ix_storefront::services::SessionService;
use ix_storefront::state::AppState;

/// Log in and remember the user.
///
/// # Errors
///
/// Returns error for an invalid username or rejected credentials.
pub async fn login(state: &AppState, username: &str, password: String) -> Result<(), AppError> {
    let username = Username::parse(username)?;
    let slot = state.session_slot();
    let user = SessionService::new(state.api(), &slot)
        .login(username, &SecretString::from(password))
        .await?;
    println!("Logged in as {}.", user.username);
    Ok(())
}

/// Create an account and remember the new user.
///
/// # Errors
///
/// Returns error for an invalid username or a rejected registration.
pub async fn register(
    state: &AppState,
    username: &str,
    email: Option<&str>,
    password: String,
) -> Result<(), AppError> {
    let username = Username::parse(username)?;
    let slot = state.session_slot();
    let user = SessionService::new(state.api(), &slot)
        .register(username, email, &SecretString::from(password))
        .await?;
    println!("Registered and logged in as {}.", user.username);
    Ok(())
}

/// Log out, forget the user and clear the cart.
///
/// # Errors
///
/// Returns error if the backend request fails; local state is cleared
/// regardless.
pub async fn logout(state: &AppState) -> Result<(), AppError> {
    let slot = state.session_slot();
    let mut cart = state.open_cart();
    SessionService::new(state.api(), &slot)
        .logout(&mut cart)
        .await?;
    println!("Logged out.");
    Ok(())
}

/// Resolve the user for a command that needs a backend session.
///
/// The cookie jar does not outlive the process, so when a password is
/// available (flag, `IX_PASSWORD`, or configured credentials) a fresh
/// session is opened first. Without one, the remembered user is returned
/// as-is and the backend decides whether its session is still valid.
///
/// # Errors
///
/// Returns error if re-authentication fails.
pub async fn ensure_session(
    state: &AppState,
    password: Option<String>,
) -> Result<Option<CurrentUser>, AppError> {
    let slot = state.session_slot();
    let session = SessionService::new(state.api(), &slot);
    let remembered = session.current_user();
    let configured = state.config().credentials.as_ref();

    let login = match (password, remembered.as_ref(), configured) {
        (Some(password), Some(user), _) => {
            Some((user.username.clone(), SecretString::from(password)))
        }
        (Some(password), None, Some(credentials)) => {
            Some((credentials.username.clone(), SecretString::from(password)))
        }
        (Some(_), None, None) => {
            return Err(AppError::BadRequest(
                "no remembered user; run `ix-cli login <username>` first".to_string(),
            ));
        }
        (None, _, Some(credentials)) => {
            Some((credentials.username.clone(), credentials.password.clone()))
        }
        (None, _, None) => None,
    };

    match login {
        Some((username, password)) => Ok(Some(session.login(username, &password).await?)),
        None => Ok(remembered),
    }
}
