use std::time::Duration;

use reqwest::{Client, StatusCode};
use spotti::{error::SpottiError, server::RedirectListener};

fn browser() -> Client {
    Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn captures_code_and_state_and_answers_the_browser() {
    let listener = RedirectListener::bind(0).await.unwrap();
    let port = listener.local_port().unwrap();
    let url = format!("http://127.0.0.1:{port}/callback?code=abc123&state=xyz");

    let (redirect, response) = tokio::join!(
        listener.await_redirect(Duration::from_secs(5)),
        browser().get(url).send()
    );

    let redirect = redirect.unwrap();
    assert_eq!(redirect.code, "abc123");
    assert_eq!(redirect.state.as_deref(), Some("xyz"));

    let response = response.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Authentication successful"));
}

#[tokio::test]
async fn access_denied_raises_authorization_denied() {
    let listener = RedirectListener::bind(0).await.unwrap();
    let port = listener.local_port().unwrap();
    let url = format!("http://127.0.0.1:{port}/callback?error=access_denied&state=xyz");

    let (redirect, response) = tokio::join!(
        listener.await_redirect(Duration::from_secs(5)),
        browser().get(url).send()
    );

    assert!(matches!(redirect, Err(SpottiError::AuthorizationDenied)));
    assert_eq!(response.unwrap().status(), StatusCode::OK);
}

#[tokio::test]
async fn no_redirect_times_out() {
    let listener = RedirectListener::bind(0).await.unwrap();

    let result = listener.await_redirect(Duration::from_millis(100)).await;

    match result {
        Err(SpottiError::AuthorizationTimeout(waited)) => {
            assert_eq!(waited, Duration::from_millis(100))
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn port_is_released_after_waiting() {
    let listener = RedirectListener::bind(0).await.unwrap();
    let port = listener.local_port().unwrap();

    listener
        .await_redirect(Duration::from_millis(50))
        .await
        .unwrap_err();

    RedirectListener::bind(port).await.unwrap();
}
