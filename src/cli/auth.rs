use crate::{
    Res,
    management::{CredentialStore, Session},
    success,
};

/// Runs the consent flow. `force` ignores tokens already in the store.
pub async fn auth<S: CredentialStore>(session: &mut Session<S>, force: bool) -> Res<()> {
    session.ensure_authorized(force).await?;
    success!("Authentication successful!");
    Ok(())
}

pub fn logout<S: CredentialStore>(session: &mut Session<S>) -> Res<()> {
    session.logout()?;
    success!("Stored Spotify credentials removed.");
    Ok(())
}
