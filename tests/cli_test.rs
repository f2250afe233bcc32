mod common;

use common::{BrowserUser, ISSUED_ACCESS_TOKEN, MockProvider};
use spotti::{
    cli::{self, PromptCommand},
    error::SpottiError,
    management::{AuthState, MemoryStore},
    spotify::Playback,
};

async fn player_with(
    provider: &MockProvider,
    browser: impl Fn(&str) + Send + Sync + 'static,
) -> Playback<MemoryStore> {
    let mut session = provider.authorized_session().with_browser(browser);
    session.ensure_authorized(false).await.unwrap();
    Playback::new(session)
}

#[tokio::test]
async fn rejected_tokens_trigger_one_consent_flow_and_a_replay() {
    let provider = MockProvider::start().await;
    provider.script(401, "");
    provider.script(401, "");
    provider.script(204, "");
    let browser = BrowserUser::default();
    let mut player = player_with(&provider, browser.consenting()).await;

    cli::execute(&mut player, PromptCommand::Next).await.unwrap();

    assert_eq!(provider.refreshes(), 1);
    assert_eq!(provider.code_exchanges(), 1);
    assert_eq!(browser.opened(), 1);

    let requests = provider.api_requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(
        requests[2].authorization,
        Some(format!("Bearer {ISSUED_ACCESS_TOKEN}"))
    );
    assert_eq!(player.session().state(), AuthState::Authorized);
}

#[tokio::test]
async fn denied_reauthorization_surfaces_without_looping() {
    let provider = MockProvider::start().await;
    provider.script(401, "");
    provider.script(401, "");
    let browser = BrowserUser::default();
    let mut player = player_with(
        &provider,
        browser.answer_with(|q| Some(format!("error=access_denied&state={}", q["state"]))),
    )
    .await;

    let err = cli::execute(&mut player, PromptCommand::Pause).await.unwrap_err();

    assert!(matches!(err, SpottiError::AuthorizationDenied));
    assert_eq!(browser.opened(), 1);
    assert_eq!(provider.code_exchanges(), 0);
    assert_eq!(provider.api_requests().len(), 2);
    assert_eq!(player.session().state(), AuthState::Unauthenticated);
}

#[tokio::test]
async fn other_failures_do_not_reauthorize() {
    let provider = MockProvider::start().await;
    provider.script(404, r#"{"error":{"status":404,"message":"Player command failed: No active device found"}}"#);
    let browser = BrowserUser::default();
    let mut player = player_with(&provider, browser.consenting()).await;

    let err = cli::execute(&mut player, PromptCommand::Play).await.unwrap_err();

    assert!(matches!(err, SpottiError::Provider { status: 404, .. }));
    assert_eq!(browser.opened(), 0);
    assert_eq!(provider.api_requests().len(), 1);
}
