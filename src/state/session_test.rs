use super::*;
use crate::test_helpers::{ScriptedClient, alice, alice_json, expired_body, response, store};
use serde_json::json;

const ME: &str = "/auth/me";
const LOGIN: &str = "/auth/login";
const LOGOUT: &str = "/auth/logout";

fn bob() -> User {
    User { username: "bob".to_owned(), name: "Bob".to_owned(), ..alice() }
}

fn recorder(store: &SessionStore) -> (Rc<RefCell<Vec<SessionEvent>>>, Subscription) {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    let sub = store.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    (events, sub)
}

// =============================================================
// Session value
// =============================================================

#[test]
fn session_default_is_uninitialized_and_anonymous() {
    let session = Session::default();
    assert_eq!(session.status(), SessionStatus::Uninitialized);
    assert!(session.user().is_none());
    assert!(!session.is_ready());
}

#[test]
fn authenticated_session_is_ready() {
    let session = Session::authenticated(alice());
    assert!(session.is_ready());
    assert!(session.is_authenticated());
}

#[test]
fn new_store_starts_uninitialized() {
    let client = ScriptedClient::new();
    assert_eq!(store(&client).session(), Session::default());
}

// =============================================================
// bootstrap
// =============================================================

#[tokio::test]
async fn bootstrap_with_active_session_sets_user() {
    let client = ScriptedClient::new();
    client.reply(ME, 200, json!({ "success": true, "user": alice_json() }));
    let store = store(&client);

    let session = store.bootstrap().await;
    assert_eq!(session, Session::authenticated(alice()));
}

#[tokio::test]
async fn bootstrap_without_session_is_anonymous_not_error() {
    let client = ScriptedClient::new();
    client.reply(ME, 400, json!({ "success": false, "message": "인증되지 않은 사용자입니다." }));
    let store = store(&client);

    assert_eq!(store.bootstrap().await, Session::anonymous());
}

#[tokio::test]
async fn bootstrap_network_failure_is_anonymous() {
    let client = ScriptedClient::new();
    client.fail(ME);
    let store = store(&client);

    assert_eq!(store.bootstrap().await, Session::anonymous());
}

#[tokio::test]
async fn bootstrap_reports_loading_then_ready() {
    let client = ScriptedClient::new();
    client.reply(ME, 200, json!({ "success": true, "user": alice_json() }));
    let store = store(&client);
    let (events, _sub) = recorder(&store);

    store.bootstrap().await;
    assert_eq!(
        *events.borrow(),
        vec![SessionEvent::Changed(Session::loading()), SessionEvent::Changed(Session::authenticated(alice()))]
    );
}

#[tokio::test]
async fn concurrent_bootstraps_share_one_request() {
    let client = ScriptedClient::new();
    let gate = client.gate(ME);
    let store = store(&client);

    let (first, second, ()) = tokio::join!(store.bootstrap(), store.bootstrap(), async {
        assert_eq!(store.session().status(), SessionStatus::Loading);
        let _ = gate.send(response(200, json!({ "success": true, "user": alice_json() })));
    });

    assert_eq!(client.count(ME), 1);
    assert_eq!(first, Session::authenticated(alice()));
    assert_eq!(second, first);
}

#[tokio::test]
async fn bootstrap_after_completion_does_not_refetch() {
    let client = ScriptedClient::new();
    client.reply(ME, 200, json!({ "success": true, "user": alice_json() }));
    let store = store(&client);

    store.bootstrap().await;
    let again = store.bootstrap().await;
    assert_eq!(client.count(ME), 1);
    assert_eq!(again, Session::authenticated(alice()));
}

#[tokio::test]
async fn expiry_during_bootstrap_wins() {
    let client = ScriptedClient::new();
    let gate = client.gate(ME);
    client.reply("/home", 401, expired_body());
    let store = store(&client);

    let (session, ()) = tokio::join!(store.bootstrap(), async {
        let _ = store.api().home().await;
        let _ = gate.send(response(200, json!({ "success": true, "user": alice_json() })));
    });

    assert_eq!(session, Session::anonymous());
}

// =============================================================
// refresh
// =============================================================

#[tokio::test]
async fn refresh_joins_in_flight_bootstrap() {
    let client = ScriptedClient::new();
    let gate = client.gate(ME);
    let store = store(&client);

    let (boot, refreshed, ()) = tokio::join!(store.bootstrap(), store.refresh(), async {
        let _ = gate.send(response(200, json!({ "success": true, "user": alice_json() })));
    });

    assert_eq!(client.count(ME), 1);
    assert_eq!(boot, refreshed);
}

#[tokio::test]
async fn refresh_picks_up_new_user() {
    let client = ScriptedClient::new();
    client.reply(ME, 200, json!({ "success": true, "user": alice_json() }));
    client.reply(ME, 200, json!({ "success": true, "user": { "username": "bob", "name": "Bob", "email": "a@x.com", "role": "USER" } }));
    let store = store(&client);

    store.bootstrap().await;
    assert_eq!(store.refresh().await, Session::authenticated(bob()));
    assert_eq!(client.count(ME), 2);
}

#[tokio::test]
async fn refresh_network_failure_keeps_signed_in_user() {
    let client = ScriptedClient::new();
    client.reply(ME, 200, json!({ "success": true, "user": alice_json() }));
    client.fail(ME);
    let store = store(&client);

    store.bootstrap().await;
    assert_eq!(store.refresh().await, Session::authenticated(alice()));
}

#[tokio::test]
async fn refresh_without_session_clears_user() {
    let client = ScriptedClient::new();
    client.reply(ME, 200, json!({ "success": true, "user": alice_json() }));
    client.reply(ME, 400, json!({ "success": false, "message": "인증되지 않은 사용자입니다." }));
    let store = store(&client);

    store.bootstrap().await;
    assert_eq!(store.refresh().await, Session::anonymous());
}

// =============================================================
// login
// =============================================================

#[tokio::test]
async fn login_success_sets_ready_user() {
    let client = ScriptedClient::new();
    client.reply(LOGIN, 200, json!({ "success": true, "user": alice_json(), "message": "ok" }));
    let store = store(&client);

    let user = store.login(&Credentials::new("alice", "secret1")).await.unwrap();
    assert_eq!(user, alice());
    assert_eq!(store.session(), Session::authenticated(alice()));
}

#[tokio::test]
async fn login_failure_leaves_state_unchanged() {
    let client = ScriptedClient::new();
    client.reply(ME, 200, json!({ "success": true, "user": alice_json() }));
    client.reply(LOGIN, 400, json!({ "success": false, "message": "Bad credentials." }));
    let store = store(&client);
    store.bootstrap().await;
    let before = store.session();

    let err = store.login(&Credentials::new("bob", "wrong")).await.unwrap_err();
    assert_eq!(err.message, "Bad credentials.");
    assert_eq!(store.session(), before);
}

#[tokio::test]
async fn login_failure_on_anonymous_session_stays_anonymous() {
    let client = ScriptedClient::new();
    client.reply(ME, 400, json!({ "success": false }));
    client.reply(LOGIN, 401, json!({ "message": "인증에 실패했습니다." }));
    let store = store(&client);
    store.bootstrap().await;

    assert!(store.login(&Credentials::new("alice", "wrong")).await.is_err());
    assert_eq!(store.session(), Session::anonymous());
}

#[tokio::test]
async fn expiry_during_in_flight_login_wins() {
    let client = ScriptedClient::new();
    let gate = client.gate(LOGIN);
    client.reply("/home", 401, expired_body());
    let store = store(&client);
    let (events, _sub) = recorder(&store);

    let credentials = Credentials::new("alice", "secret1");
    let (login, ()) = tokio::join!(store.login(&credentials), async {
        let err = store.api().home().await.unwrap_err();
        assert!(err.is_session_expired());
        let _ = gate.send(response(200, json!({ "success": true, "user": alice_json() })));
    });

    assert!(login.unwrap_err().is_superseded());
    assert_eq!(store.session(), Session::anonymous());
    assert!(events.borrow().contains(&SessionEvent::Expired));
}

#[tokio::test]
async fn logout_during_in_flight_login_wins() {
    let client = ScriptedClient::new();
    let gate = client.gate(LOGIN);
    client.reply(LOGOUT, 200, json!({ "success": true }));
    let store = store(&client);

    let credentials = Credentials::new("alice", "secret1");
    let (login, ()) = tokio::join!(store.login(&credentials), async {
        store.logout().await;
        let _ = gate.send(response(200, json!({ "success": true, "user": alice_json() })));
    });

    let err = login.unwrap_err();
    assert!(err.is_superseded());
    assert!(!err.is_session_expired());
    assert_eq!(store.session(), Session::anonymous());
}

#[tokio::test]
async fn overlapping_logins_last_to_land_wins() {
    let client = ScriptedClient::new();
    let first = client.gate(LOGIN);
    let second = client.gate(LOGIN);
    let store = store(&client);
    let (events, _sub) = recorder(&store);

    let alice_credentials = Credentials::new("alice", "secret1");
    let bob_credentials = Credentials::new("bob", "secret2");
    let (a, b, ()) = tokio::join!(store.login(&alice_credentials), store.login(&bob_credentials), async {
        let _ = first.send(response(200, json!({ "success": true, "user": alice_json() })));
        while !store.session().is_authenticated() {
            tokio::task::yield_now().await;
        }
        let bob = json!({ "username": "bob", "name": "Bob", "email": "a@x.com", "role": "USER" });
        let _ = second.send(response(200, json!({ "success": true, "user": bob })));
    });

    assert_eq!(a.unwrap(), alice());
    assert_eq!(b.unwrap(), bob());
    assert_eq!(store.session(), Session::authenticated(bob()));
    assert!(!events.borrow().contains(&SessionEvent::Expired));
}

#[tokio::test]
async fn login_after_expiry_succeeds() {
    let client = ScriptedClient::new();
    client.reply("/home", 401, expired_body());
    client.reply(LOGIN, 200, json!({ "success": true, "user": alice_json() }));
    let store = store(&client);

    let _ = store.api().home().await;
    store.login(&Credentials::new("alice", "secret1")).await.unwrap();
    assert_eq!(store.session(), Session::authenticated(alice()));
}

// =============================================================
// logout
// =============================================================

#[tokio::test]
async fn logout_clears_user_on_success() {
    let client = ScriptedClient::new();
    client.reply(LOGIN, 200, json!({ "success": true, "user": alice_json() }));
    client.reply(LOGOUT, 200, json!({ "success": true }));
    let store = store(&client);
    store.login(&Credentials::new("alice", "secret1")).await.unwrap();

    store.logout().await;
    assert_eq!(store.session(), Session::anonymous());
}

#[tokio::test]
async fn logout_clears_user_when_backend_fails() {
    let client = ScriptedClient::new();
    client.reply(LOGIN, 200, json!({ "success": true, "user": alice_json() }));
    client.reply(LOGOUT, 500, json!({ "message": "서버에서 오류가 발생했습니다." }));
    let store = store(&client);
    store.login(&Credentials::new("alice", "secret1")).await.unwrap();

    store.logout().await;
    assert_eq!(store.session(), Session::anonymous());
}

#[tokio::test]
async fn logout_clears_user_when_network_fails() {
    let client = ScriptedClient::new();
    client.reply(LOGIN, 200, json!({ "success": true, "user": alice_json() }));
    client.fail(LOGOUT);
    let store = store(&client);
    store.login(&Credentials::new("alice", "secret1")).await.unwrap();

    store.logout().await;
    assert_eq!(store.session(), Session::anonymous());
}

// =============================================================
// subscriptions
// =============================================================

#[tokio::test]
async fn expiry_emits_changed_then_expired() {
    let client = ScriptedClient::new();
    client.reply(LOGIN, 200, json!({ "success": true, "user": alice_json() }));
    client.reply("/home", 401, expired_body());
    let store = store(&client);
    store.login(&Credentials::new("alice", "secret1")).await.unwrap();
    let (events, _sub) = recorder(&store);

    let _ = store.api().home().await;
    assert_eq!(*events.borrow(), vec![SessionEvent::Changed(Session::anonymous()), SessionEvent::Expired]);
}

#[tokio::test]
async fn unchanged_session_emits_nothing() {
    let client = ScriptedClient::new();
    client.reply(ME, 400, json!({ "success": false }));
    let store = store(&client);
    store.bootstrap().await;
    let (events, _sub) = recorder(&store);

    store.logout().await;
    assert!(events.borrow().is_empty());
}

#[tokio::test]
async fn dropped_subscription_stops_events() {
    let client = ScriptedClient::new();
    client.reply(LOGIN, 200, json!({ "success": true, "user": alice_json() }));
    let store = store(&client);
    let (events, sub) = recorder(&store);
    drop(sub);

    store.login(&Credentials::new("alice", "secret1")).await.unwrap();
    assert!(events.borrow().is_empty());
}

#[tokio::test]
async fn detached_subscription_keeps_receiving() {
    let client = ScriptedClient::new();
    client.reply(LOGIN, 200, json!({ "success": true, "user": alice_json() }));
    let store = store(&client);
    let (events, sub) = recorder(&store);
    sub.detach();

    store.login(&Credentials::new("alice", "secret1")).await.unwrap();
    assert_eq!(events.borrow().len(), 1);
}

#[tokio::test]
async fn expiry_after_store_dropped_is_harmless() {
    let client = ScriptedClient::new();
    client.reply("/home", 401, expired_body());
    let store = store(&client);
    let api = store.api().clone();
    drop(store);

    assert!(api.home().await.unwrap_err().is_session_expired());
}

// =============================================================
// signup
// =============================================================

#[tokio::test]
async fn signup_does_not_touch_session() {
    let client = ScriptedClient::new();
    client.reply("/auth/signup", 200, json!({ "success": true, "message": "done" }));
    let store = store(&client);
    let payload = SignupPayload {
        username: "bob".to_owned(),
        email: "b@x.com".to_owned(),
        password: "abcdef".to_owned(),
        name: "Bob".to_owned(),
    };

    assert_eq!(store.signup(&payload).await.unwrap(), "done");
    assert_eq!(store.session(), Session::default());
}
