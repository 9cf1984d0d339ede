//! Login and logout flows.

mod common;

use actix_web::http::StatusCode;
use actix_web::{App, test};

use common::{location, login, uncached_state};
use quill::inbound::http::test_utils::test_session_middleware;
use quill::server::configure;
use quill::test_support::MemoryStore;

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .configure(|cfg| configure(cfg, $state)),
        )
        .await
    };
}

async fn body_of(res: actix_web::dev::ServiceResponse) -> String {
    let bytes = test::read_body(res).await;
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

#[actix_web::test]
async fn successful_login_redirects_to_next() {
    let store = MemoryStore::new();
    store.add_user("ada", "pw");
    let app = init_app!(uncached_state(&store));

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_form([("username", "ada"), ("password", "pw"), ("next", "/create/")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/create/");
}

#[actix_web::test]
async fn off_site_next_is_replaced_with_the_feed() {
    let store = MemoryStore::new();
    store.add_user("ada", "pw");
    let app = init_app!(uncached_state(&store));

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_form([
                ("username", "ada"),
                ("password", "pw"),
                ("next", "https://evil.example/"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");
}

#[actix_web::test]
async fn wrong_password_redisplays_the_form() {
    let store = MemoryStore::new();
    store.add_user("ada", "pw");
    let app = init_app!(uncached_state(&store));

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_form([("username", "ada"), ("password", "wrong")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_of(res).await;
    assert!(body.contains("Username and password did not match."));
    // The submitted username is kept for correction.
    assert!(body.contains("value=\"ada\""));
}

#[actix_web::test]
async fn unknown_user_gets_the_same_message_as_wrong_password() {
    let store = MemoryStore::new();
    store.add_user("ada", "pw");
    let app = init_app!(uncached_state(&store));

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_form([("username", "ghost"), ("password", "pw")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_of(res).await;
    assert!(body.contains("Username and password did not match."));
}

#[actix_web::test]
async fn logout_ends_the_session() {
    let store = MemoryStore::new();
    store.add_user("ada", "pw");
    let app = init_app!(uncached_state(&store));
    let cookie = login(&app, "ada", "pw").await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/auth/logout/")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");

    let cleared = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie rewritten");
    // A purged session cookie is emptied so the browser drops it.
    assert!(cleared.value().is_empty());
}

#[actix_web::test]
async fn login_form_carries_the_next_parameter() {
    let store = MemoryStore::new();
    let app = init_app!(uncached_state(&store));

    let body = body_of(
        test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/auth/login/?next=/follow/")
                .to_request(),
        )
        .await,
    )
    .await;
    assert!(body.contains("name=\"next\" value=\"/follow/\""));
}
