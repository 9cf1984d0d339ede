//! Post lifecycle over HTTP: creation, editing, ownership, and comments.

mod common;

use actix_web::http::StatusCode;
use actix_web::{App, test};

use common::{location, login, multipart_request, uncached_state};
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
async fn anonymous_create_is_sent_to_login_with_next() {
    let store = MemoryStore::new();
    let app = init_app!(uncached_state(&store));

    let res = test::call_service(&app, test::TestRequest::get().uri("/create/").to_request()).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/auth/login/?next=%2Fcreate%2F");
}

#[actix_web::test]
async fn creating_a_post_lands_on_the_authors_profile() {
    let store = MemoryStore::new();
    store.add_user("ada", "pw");
    let app = init_app!(uncached_state(&store));
    let cookie = login(&app, "ada", "pw").await;

    let res = test::call_service(
        &app,
        multipart_request("/create/", &[("text", "fresh post"), ("group", "")])
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/profile/ada/");

    let profile = body_of(
        test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/profile/ada/")
                .cookie(cookie)
                .to_request(),
        )
        .await,
    )
    .await;
    assert!(profile.contains("fresh post"));
}

#[actix_web::test]
async fn creating_a_post_into_a_group_links_it_there() {
    let store = MemoryStore::new();
    store.add_user("ada", "pw");
    let rust = store.add_group("Rustaceans", "rust", "systems talk");
    let app = init_app!(uncached_state(&store));
    let cookie = login(&app, "ada", "pw").await;

    let group_id = rust.id().to_string();
    let res = test::call_service(
        &app,
        multipart_request("/create/", &[("text", "grouped"), ("group", &group_id)])
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);

    let group_page = body_of(
        test::call_service(
            &app,
            test::TestRequest::get().uri("/group/rust/").to_request(),
        )
        .await,
    )
    .await;
    assert!(group_page.contains("grouped"));
}

#[actix_web::test]
async fn blank_text_redisplays_the_form_with_an_error() {
    let store = MemoryStore::new();
    store.add_user("ada", "pw");
    let app = init_app!(uncached_state(&store));
    let cookie = login(&app, "ada", "pw").await;

    let res = test::call_service(
        &app,
        multipart_request("/create/", &[("text", "   "), ("group", "")])
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_of(res).await;
    assert!(body.contains("Enter the post text."));
}

#[actix_web::test]
async fn author_can_edit_their_post() {
    let store = MemoryStore::new();
    let ada = store.add_user("ada", "pw");
    let post = store.add_post(&ada, "original wording", None);
    let app = init_app!(uncached_state(&store));
    let cookie = login(&app, "ada", "pw").await;

    let edit_url = format!("/posts/{}/edit/", post.id);
    let res = test::call_service(
        &app,
        multipart_request(&edit_url, &[("text", "revised wording"), ("group", "")])
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), format!("/posts/{}/", post.id));
    assert_eq!(store.post_text(post.id).as_deref(), Some("revised wording"));
}

#[actix_web::test]
async fn non_author_edit_redirects_home_and_changes_nothing() {
    let store = MemoryStore::new();
    let ada = store.add_user("ada", "pw");
    store.add_user("brian", "pw");
    let post = store.add_post(&ada, "ada's words", None);
    let app = init_app!(uncached_state(&store));
    let cookie = login(&app, "brian", "pw").await;

    let edit_url = format!("/posts/{}/edit/", post.id);
    let form_page = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&edit_url)
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(form_page.status(), StatusCode::FOUND);
    assert_eq!(location(&form_page), "/");

    let submit = test::call_service(
        &app,
        multipart_request(&edit_url, &[("text", "hijacked"), ("group", "")])
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(submit.status(), StatusCode::FOUND);
    assert_eq!(location(&submit), "/");
    assert_eq!(store.post_text(post.id).as_deref(), Some("ada's words"));
}

#[actix_web::test]
async fn detail_page_shows_comments_oldest_first() {
    let store = MemoryStore::new();
    let ada = store.add_user("ada", "pw");
    store.add_user("brian", "pw");
    let post = store.add_post(&ada, "discuss", None);
    let app = init_app!(uncached_state(&store));
    let cookie = login(&app, "brian", "pw").await;

    let comment_url = format!("/posts/{}/comment/", post.id);
    for text in ["first comment", "second comment"] {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&comment_url)
                .cookie(cookie.clone())
                .set_form([("text", text)])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);
    }

    let detail = body_of(
        test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/posts/{}/", post.id))
                .to_request(),
        )
        .await,
    )
    .await;
    let first = detail.find("first comment").expect("first comment shown");
    let second = detail.find("second comment").expect("second comment shown");
    assert!(first < second);
}

#[actix_web::test]
async fn anonymous_comment_is_sent_to_login() {
    let store = MemoryStore::new();
    let ada = store.add_user("ada", "pw");
    let post = store.add_post(&ada, "discuss", None);
    let app = init_app!(uncached_state(&store));

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/comment/", post.id))
            .set_form([("text", "drive-by")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert!(location(&res).starts_with("/auth/login/?next="));
}

#[actix_web::test]
async fn unknown_post_id_is_a_404() {
    let store = MemoryStore::new();
    let app = init_app!(uncached_state(&store));

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/posts/00000000-0000-0000-0000-000000000000/")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let malformed = test::call_service(
        &app,
        test::TestRequest::get().uri("/posts/not-a-uuid/").to_request(),
    )
    .await;
    assert_eq!(malformed.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn edit_form_is_prefilled_for_the_author() {
    let store = MemoryStore::new();
    let ada = store.add_user("ada", "pw");
    let post = store.add_post(&ada, "words to keep", None);
    let app = init_app!(uncached_state(&store));
    let cookie = login(&app, "ada", "pw").await;

    let body = body_of(
        test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/posts/{}/edit/", post.id))
                .cookie(cookie)
                .to_request(),
        )
        .await,
    )
    .await;
    assert!(body.contains("words to keep"));
    assert!(body.contains("Edit post"));
}
